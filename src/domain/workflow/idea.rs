use chrono::Utc;

use super::{TransitionError, Transitioned};
use crate::domain::{EntityKind, Idea, IdeaStatus, NewStatusEvent, OrganizationContext, UserRole};

const REVIEWERS: &[UserRole] = &[UserRole::Client, UserRole::Admin];

/// PENDING ideas are approved or rejected by the client. Both outcomes are final.
pub struct IdeaWorkflow;

impl IdeaWorkflow {
    pub fn is_valid(from: IdeaStatus, to: IdeaStatus) -> bool {
        matches!(
            (from, to),
            (IdeaStatus::Pending, IdeaStatus::Approved) | (IdeaStatus::Pending, IdeaStatus::Rejected)
        )
    }

    pub fn allowed_next_states(from: IdeaStatus) -> Vec<IdeaStatus> {
        match from {
            IdeaStatus::Pending => vec![IdeaStatus::Approved, IdeaStatus::Rejected],
            IdeaStatus::Approved | IdeaStatus::Rejected => vec![],
        }
    }

    /// Unknown roles never pass.
    pub fn can_transition(from: IdeaStatus, to: IdeaStatus, role: Option<UserRole>) -> bool {
        Self::is_valid(from, to) && role.is_some_and(|r| REVIEWERS.contains(&r))
    }

    /// Checks the edge first and the caller's role second.
    pub fn apply_transition(
        idea: &Idea,
        to: IdeaStatus,
        actor: &OrganizationContext,
        reason: Option<String>,
    ) -> Result<Transitioned<Idea>, TransitionError> {
        if !Self::is_valid(idea.status, to) {
            return Err(TransitionError::invalid(idea.status, to));
        }
        if !Self::can_transition(idea.status, to, actor.effective_role()) {
            return Err(TransitionError::NotPermitted(
                "Only clients can update idea status".to_string(),
            ));
        }

        let now = Utc::now();
        let mut updated = idea.clone();
        updated.status = to;
        updated.updated_at = now;

        Ok(Transitioned {
            event: NewStatusEvent {
                organization_id: idea.organization_id,
                entity_kind: EntityKind::Idea,
                entity_id: idea.id,
                status: to.as_str().to_string(),
                previous_status: idea.status.as_str().to_string(),
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
    use uuid::Uuid;

    fn idea(status: IdeaStatus) -> Idea {
        Idea {
            id: Uuid::new_v4(),
            organization_id: Uuid::new_v4(),
            created_by: Uuid::new_v4(),
            title: "Launch teaser".to_string(),
            description: None,
            status,
            delivery_item_id: None,
            publishing_date: None,
            publishing_time: None,
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
    fn pending_is_the_only_source_state() {
        assert!(IdeaWorkflow::is_valid(IdeaStatus::Pending, IdeaStatus::Approved));
        assert!(IdeaWorkflow::is_valid(IdeaStatus::Pending, IdeaStatus::Rejected));
        assert!(!IdeaWorkflow::is_valid(IdeaStatus::Approved, IdeaStatus::Rejected));
        assert!(!IdeaWorkflow::is_valid(IdeaStatus::Rejected, IdeaStatus::Pending));
        assert!(IdeaWorkflow::allowed_next_states(IdeaStatus::Approved).is_empty());
    }

    #[test]
    fn same_status_is_invalid() {
        for status in [IdeaStatus::Pending, IdeaStatus::Approved, IdeaStatus::Rejected] {
            assert!(!IdeaWorkflow::is_valid(status, status));
        }
    }

    #[test]
    fn roles_gate_review() {
        let (from, to) = (IdeaStatus::Pending, IdeaStatus::Approved);
        assert!(IdeaWorkflow::can_transition(from, to, Some(UserRole::Client)));
        assert!(IdeaWorkflow::can_transition(from, to, Some(UserRole::Admin)));
        assert!(!IdeaWorkflow::can_transition(from, to, Some(UserRole::Creative)));
        assert!(!IdeaWorkflow::can_transition(from, to, None));
    }

    #[test]
    fn client_approval_produces_event() {
        let before = idea(IdeaStatus::Pending);
        let client = actor(UserRole::Client);

        let out = IdeaWorkflow::apply_transition(&before, IdeaStatus::Approved, &client, None)
            .unwrap();

        assert_eq!(out.entity.status, IdeaStatus::Approved);
        assert_eq!(out.event.entity_id, before.id);
        assert_eq!(out.event.previous_status, "PENDING");
        assert_eq!(out.event.status, "APPROVED");
        assert_eq!(out.event.changed_by, client.user_id);
    }

    #[test]
    fn creative_is_refused_with_client_message() {
        let err = IdeaWorkflow::apply_transition(
            &idea(IdeaStatus::Pending),
            IdeaStatus::Approved,
            &actor(UserRole::Creative),
            None,
        )
        .unwrap_err();
        assert_eq!(
            err,
            TransitionError::NotPermitted("Only clients can update idea status".to_string())
        );
    }

    #[test]
    fn reapplying_is_rejected_before_the_role_check() {
        let err = IdeaWorkflow::apply_transition(
            &idea(IdeaStatus::Approved),
            IdeaStatus::Approved,
            &actor(UserRole::Creative),
            None,
        )
        .unwrap_err();
        assert_eq!(err.to_string(), "Invalid status transition from APPROVED to APPROVED");
    }
}
