use chrono::Utc;

use super::{TransitionError, Transitioned};
use crate::domain::{
    ContentDraft, DraftStatus, EntityKind, NewStatusEvent, OrganizationContext, StatusHistoryEntry,
    UserRole,
};

const AUTHORS: &[UserRole] = &[UserRole::Creative, UserRole::Admin];
const REVIEWERS: &[UserRole] = &[UserRole::Client, UserRole::Admin];

/// Draft review cycle:
///
/// ```text
/// DRAFT -> AWAITING_FEEDBACK -> APPROVED -> PUBLISHED
///   ^             |
///   |             +-> AWAITING_REVISION --+
///   |             +-> REJECTED            |
///   +-------------------------------------+
/// ```
pub struct DraftWorkflow;

impl DraftWorkflow {
    pub fn is_valid(from: DraftStatus, to: DraftStatus) -> bool {
        Self::allowed_roles(from, to).is_some()
    }

    /// Roles allowed to drive an edge, `None` if the edge does not exist.
    fn allowed_roles(from: DraftStatus, to: DraftStatus) -> Option<&'static [UserRole]> {
        use DraftStatus::*;
        match (from, to) {
            // Submit for review
            (Draft, AwaitingFeedback) => Some(AUTHORS),

            // Client review
            (AwaitingFeedback, Approved) => Some(REVIEWERS),
            (AwaitingFeedback, AwaitingRevision) => Some(REVIEWERS),
            (AwaitingFeedback, Rejected) => Some(REVIEWERS),

            // Rework
            (AwaitingRevision, Draft) => Some(AUTHORS),

            (Approved, Published) => Some(AUTHORS),

            _ => None,
        }
    }

    pub fn allowed_next_states(from: DraftStatus) -> Vec<DraftStatus> {
        use DraftStatus::*;
        match from {
            Draft => vec![AwaitingFeedback],
            AwaitingFeedback => vec![Approved, AwaitingRevision, Rejected],
            AwaitingRevision => vec![Draft],
            Approved => vec![Published],
            Rejected | Published => vec![],
        }
    }

    pub fn can_transition(from: DraftStatus, to: DraftStatus, role: Option<UserRole>) -> bool {
        match (Self::allowed_roles(from, to), role) {
            (Some(roles), Some(role)) => roles.contains(&role),
            _ => false,
        }
    }

    fn refusal(from: DraftStatus, to: DraftStatus) -> &'static str {
        match (from, to) {
            (DraftStatus::Draft, _) => "Only creatives can submit drafts for review",
            (DraftStatus::AwaitingFeedback, _) => "Only clients can review drafts",
            (DraftStatus::AwaitingRevision, _) => "Only creatives can rework drafts",
            _ => "Only creatives can publish drafts",
        }
    }

    /// Validates the edge, then the role, then records the change in
    /// `metadata.statusHistory` and bumps `version`.
    pub fn apply_transition(
        draft: &ContentDraft,
        to: DraftStatus,
        actor: &OrganizationContext,
        reason: Option<String>,
    ) -> Result<Transitioned<ContentDraft>, TransitionError> {
        let from = draft.status;
        if !Self::is_valid(from, to) {
            return Err(TransitionError::invalid(from, to));
        }
        if !Self::can_transition(from, to, actor.effective_role()) {
            return Err(TransitionError::NotPermitted(
                Self::refusal(from, to).to_string(),
            ));
        }

        let now = Utc::now();
        let mut updated = draft.clone();
        updated.status = to;
        updated.version = draft.version + 1;
        updated.updated_at = now;
        updated.push_status_history(StatusHistoryEntry {
            status: to.as_str().to_string(),
            changed_by: actor.user_id,
            changed_at: now,
            reason: reason.clone(),
            previous_status: Some(from.as_str().to_string()),
        });

        Ok(Transitioned {
            event: NewStatusEvent {
                organization_id: draft.organization_id,
                entity_kind: EntityKind::Draft,
                entity_id: draft.id,
                status: to.as_str().to_string(),
                previous_status: from.as_str().to_string(),
                changed_by: actor.user_id,
                reason,
                changed_at: now,
            },
            entity: updated,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ContentType;
    use serde_json::json;
    use uuid::Uuid;
    use DraftStatus::*;

    const ALL: [DraftStatus; 6] = [
        Draft,
        AwaitingFeedback,
        AwaitingRevision,
        Approved,
        Rejected,
        Published,
    ];

    fn draft(status: DraftStatus) -> ContentDraft {
        ContentDraft {
            id: Uuid::new_v4(),
            organization_id: Uuid::new_v4(),
            idea_id: Uuid::new_v4(),
            created_by: Uuid::new_v4(),
            body: "Body".to_string(),
            content_type: ContentType::Article,
            status,
            metadata: json!({}),
            version: 3,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn actor(role: UserRole) -> OrganizationContext {
        OrganizationContext {
            organization_id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            user_role: Some(role),
            organization_role: role,
            permissions: vec![],
            is_super_admin: false,
        }
    }

    #[test]
    fn table_matches_allowed_next_states() {
        for from in ALL {
            for to in ALL {
                assert_eq!(
                    DraftWorkflow::is_valid(from, to),
                    DraftWorkflow::allowed_next_states(from).contains(&to),
                    "{from} -> {to}"
                );
            }
        }
    }

    #[test]
    fn no_self_loops() {
        for status in ALL {
            assert!(!DraftWorkflow::is_valid(status, status));
        }
    }

    #[test]
    fn draft_cannot_jump_to_published() {
        let err = DraftWorkflow::apply_transition(&draft(Draft), Published, &actor(UserRole::Admin), None)
            .unwrap_err();
        assert_eq!(err.to_string(), "Invalid status transition from DRAFT to PUBLISHED");
    }

    #[test]
    fn roles_per_edge() {
        assert!(DraftWorkflow::can_transition(Draft, AwaitingFeedback, Some(UserRole::Creative)));
        assert!(!DraftWorkflow::can_transition(Draft, AwaitingFeedback, Some(UserRole::Client)));
        assert!(DraftWorkflow::can_transition(AwaitingFeedback, Approved, Some(UserRole::Client)));
        assert!(!DraftWorkflow::can_transition(AwaitingFeedback, Approved, Some(UserRole::Creative)));
        assert!(DraftWorkflow::can_transition(AwaitingRevision, Draft, Some(UserRole::Creative)));
        assert!(DraftWorkflow::can_transition(Approved, Published, Some(UserRole::Admin)));
        assert!(!DraftWorkflow::can_transition(Approved, Published, Some(UserRole::Client)));
        assert!(!DraftWorkflow::can_transition(Approved, Published, None));
    }

    #[test]
    fn review_appends_history_and_bumps_version() {
        let before = draft(AwaitingFeedback);
        let client = actor(UserRole::Client);

        let out = DraftWorkflow::apply_transition(
            &before,
            AwaitingRevision,
            &client,
            Some("Shorter intro".to_string()),
        )
        .unwrap();

        assert_eq!(out.entity.status, AwaitingRevision);
        assert_eq!(out.entity.version, 4);
        let history = out.entity.status_history();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].status, "AWAITING_REVISION");
        assert_eq!(history[0].previous_status.as_deref(), Some("AWAITING_FEEDBACK"));
        assert_eq!(history[0].reason.as_deref(), Some("Shorter intro"));
        assert_eq!(history[0].changed_by, client.user_id);
        assert_eq!(out.event.reason.as_deref(), Some("Shorter intro"));
    }

    #[test]
    fn client_cannot_submit() {
        let err = DraftWorkflow::apply_transition(&draft(Draft), AwaitingFeedback, &actor(UserRole::Client), None)
            .unwrap_err();
        assert!(matches!(err, TransitionError::NotPermitted(_)));
    }

    #[test]
    fn input_is_left_untouched() {
        let before = draft(Approved);
        let _ = DraftWorkflow::apply_transition(&before, Published, &actor(UserRole::Creative), None)
            .unwrap();
        assert_eq!(before.status, Approved);
        assert!(before.status_history().is_empty());
    }
}
