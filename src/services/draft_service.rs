//! Content drafts: authoring, the review cycle, publishing and media.

use async_trait::async_trait;
use chrono::Utc;
use std::sync::Arc;
use uuid::Uuid;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

use super::Notifier;
use crate::domain::{
    ContentDraft, ContentType, DraftFilter, DraftStatus, DraftWorkflow, Media, NewDraft, NewMedia,
    OrganizationContext, UserRole,
};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::UnitOfWork;
use crate::types::{Paginated, PaginationParams};

const AUTHORS: &[UserRole] = &[UserRole::Creative, UserRole::Admin];

#[derive(Debug, Clone, PartialEq)]
pub struct DraftInput {
    pub idea_id: Uuid,
    pub body: String,
    pub content_type: ContentType,
}

/// Partial edit. `expected_version`, when given, must match the stored row.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DraftChanges {
    pub body: Option<String>,
    pub content_type: Option<ContentType>,
    pub expected_version: Option<i32>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MediaInput {
    pub file_name: String,
    pub mime_type: String,
    pub size_bytes: i64,
    pub url: String,
}

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait DraftService: Send + Sync {
    async fn create(&self, ctx: &OrganizationContext, input: DraftInput) -> AppResult<ContentDraft>;

    async fn list(
        &self,
        ctx: &OrganizationContext,
        filter: DraftFilter,
        pagination: PaginationParams,
    ) -> AppResult<Paginated<ContentDraft>>;

    async fn get(&self, ctx: &OrganizationContext, id: Uuid) -> AppResult<ContentDraft>;

    /// Edit body or content type while the draft is DRAFT or AWAITING_REVISION.
    async fn update(
        &self,
        ctx: &OrganizationContext,
        id: Uuid,
        changes: DraftChanges,
    ) -> AppResult<ContentDraft>;

    /// Move the draft along one edge of the review cycle.
    async fn transition(
        &self,
        ctx: &OrganizationContext,
        id: Uuid,
        to: DraftStatus,
        reason: Option<String>,
    ) -> AppResult<ContentDraft>;

    async fn add_media(
        &self,
        ctx: &OrganizationContext,
        draft_id: Uuid,
        input: MediaInput,
    ) -> AppResult<Media>;

    async fn list_media(&self, ctx: &OrganizationContext, draft_id: Uuid) -> AppResult<Vec<Media>>;
}

pub struct DraftManager<U: UnitOfWork> {
    uow: Arc<U>,
    notifier: Arc<dyn Notifier>,
}

impl<U: UnitOfWork> DraftManager<U> {
    pub fn new(uow: Arc<U>, notifier: Arc<dyn Notifier>) -> Self {
        Self { uow, notifier }
    }

    async fn find(&self, ctx: &OrganizationContext, id: Uuid) -> AppResult<ContentDraft> {
        self.uow
            .drafts()
            .find_in_org(ctx.organization_id, id)
            .await?
            .ok_or_not_found()
    }

    /// Side effects that follow a committed transition. None of them can
    /// undo it.
    async fn after_transition(&self, from: DraftStatus, draft: &ContentDraft) {
        match (from, draft.status) {
            (_, DraftStatus::AwaitingFeedback) => self.notify_clients(draft).await,
            (DraftStatus::AwaitingFeedback, _) => self.notify_author(draft).await,
            (_, DraftStatus::Published) => {
                match self
                    .uow
                    .schedules()
                    .mark_published_for_draft(draft.organization_id, draft.id)
                    .await
                {
                    Ok(count) => {
                        tracing::info!(draft_id = %draft.id, count, "Scheduled posts marked published")
                    }
                    Err(e) => {
                        tracing::error!(error = %e, draft_id = %draft.id, "Failed to mark scheduled posts published")
                    }
                }
            }
            _ => {}
        }
    }

    async fn notify_clients(&self, draft: &ContentDraft) {
        let members = match self
            .uow
            .organizations()
            .list_active_members(draft.organization_id)
            .await
        {
            Ok(members) => members,
            Err(e) => {
                tracing::warn!(error = %e, draft_id = %draft.id, "Could not load reviewers");
                return;
            }
        };

        let client_ids: Vec<Uuid> = members
            .into_iter()
            .filter(|m| m.role == UserRole::Client)
            .map(|m| m.user_id)
            .collect();
        if client_ids.is_empty() {
            tracing::debug!(draft_id = %draft.id, "No clients to notify");
            return;
        }

        match self.uow.users().find_by_ids(client_ids).await {
            Ok(clients) => self.notifier.draft_submitted(draft, clients).await,
            Err(e) => tracing::warn!(error = %e, draft_id = %draft.id, "Could not load reviewers"),
        }
    }

    async fn notify_author(&self, draft: &ContentDraft) {
        match self.uow.users().find_by_id(draft.created_by).await {
            Ok(Some(author)) => self.notifier.draft_reviewed(draft, author).await,
            Ok(None) => {}
            Err(e) => tracing::warn!(error = %e, draft_id = %draft.id, "Could not load draft author"),
        }
    }
}

#[async_trait]
impl<U: UnitOfWork> DraftService for DraftManager<U> {
    async fn create(&self, ctx: &OrganizationContext, input: DraftInput) -> AppResult<ContentDraft> {
        ctx.require_role(AUTHORS, "Only creatives can create drafts")?;

        let idea = self
            .uow
            .ideas()
            .find_in_org(ctx.organization_id, input.idea_id)
            .await?
            .ok_or_not_found()?;

        let draft = self
            .uow
            .drafts()
            .create(NewDraft {
                organization_id: idea.organization_id,
                idea_id: idea.id,
                created_by: ctx.user_id,
                body: input.body,
                content_type: input.content_type,
            })
            .await?;

        tracing::info!(draft_id = %draft.id, idea_id = %idea.id, "Draft created");
        Ok(draft)
    }

    async fn list(
        &self,
        ctx: &OrganizationContext,
        filter: DraftFilter,
        pagination: PaginationParams,
    ) -> AppResult<Paginated<ContentDraft>> {
        let (drafts, total) = self
            .uow
            .drafts()
            .list(ctx.organization_id, filter, pagination)
            .await?;
        Ok(Paginated::new(drafts, pagination, total))
    }

    async fn get(&self, ctx: &OrganizationContext, id: Uuid) -> AppResult<ContentDraft> {
        self.find(ctx, id).await
    }

    async fn update(
        &self,
        ctx: &OrganizationContext,
        id: Uuid,
        changes: DraftChanges,
    ) -> AppResult<ContentDraft> {
        let mut draft = self.find(ctx, id).await?;
        ctx.require_role(AUTHORS, "Only creatives can edit drafts")?;
        if !draft.status.is_editable() {
            return Err(AppError::validation(format!(
                "Draft cannot be edited while {}",
                draft.status
            )));
        }
        if changes.expected_version.is_some_and(|v| v != draft.version) {
            return Err(AppError::conflict("Draft has been modified since you loaded it"));
        }

        let expected_version = draft.version;
        if let Some(body) = changes.body {
            draft.body = body;
        }
        if let Some(content_type) = changes.content_type {
            draft.content_type = content_type;
        }
        draft.version += 1;
        draft.updated_at = Utc::now();

        self.uow
            .drafts()
            .update_content(draft, expected_version)
            .await?
            .ok_or_else(|| AppError::conflict("Draft has been modified since you loaded it"))
    }

    async fn transition(
        &self,
        ctx: &OrganizationContext,
        id: Uuid,
        to: DraftStatus,
        reason: Option<String>,
    ) -> AppResult<ContentDraft> {
        let draft = self.find(ctx, id).await?;
        let from = draft.status;
        let expected_version = draft.version;
        let transitioned = DraftWorkflow::apply_transition(&draft, to, ctx, reason)?;

        let updated = self
            .uow
            .drafts()
            .transition_status(transitioned.entity, from, expected_version, transitioned.event)
            .await?
            .ok_or_else(|| AppError::conflict("Draft status was changed by someone else"))?;

        tracing::info!(
            draft_id = %updated.id,
            from = %from,
            to = %updated.status,
            version = updated.version,
            changed_by = %ctx.user_id,
            "Draft status changed"
        );
        self.after_transition(from, &updated).await;
        Ok(updated)
    }

    async fn add_media(
        &self,
        ctx: &OrganizationContext,
        draft_id: Uuid,
        input: MediaInput,
    ) -> AppResult<Media> {
        let draft = self.find(ctx, draft_id).await?;
        ctx.require_role(AUTHORS, "Only creatives can attach media")?;

        self.uow
            .media()
            .create(NewMedia {
                organization_id: draft.organization_id,
                draft_id: draft.id,
                uploaded_by: ctx.user_id,
                file_name: input.file_name,
                mime_type: input.mime_type,
                size_bytes: input.size_bytes,
                url: input.url,
            })
            .await
    }

    async fn list_media(&self, ctx: &OrganizationContext, draft_id: Uuid) -> AppResult<Vec<Media>> {
        let draft = self.find(ctx, draft_id).await?;
        self.uow
            .media()
            .list_for_draft(ctx.organization_id, draft.id)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Idea, IdeaStatus, Membership, User};
    use crate::infra::{
        DraftRepository, IdeaRepository, MockDraftRepository, MockIdeaRepository,
        MockOrganizationRepository, MockScheduleRepository, MockUnitOfWork, MockUserRepository,
        OrganizationRepository, ScheduleRepository, UserRepository,
    };
    use crate::services::MockNotifier;
    use serde_json::json;

    fn ctx(role: UserRole) -> OrganizationContext {
        OrganizationContext {
            organization_id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            user_role: Some(role),
            organization_role: role,
            permissions: vec![],
            is_super_admin: false,
        }
    }

    fn draft(ctx: &OrganizationContext, status: DraftStatus) -> ContentDraft {
        ContentDraft {
            id: Uuid::new_v4(),
            organization_id: ctx.organization_id,
            idea_id: Uuid::new_v4(),
            created_by: Uuid::new_v4(),
            body: "Our new product line".to_string(),
            content_type: ContentType::Post,
            status,
            metadata: json!({ "statusHistory": [] }),
            version: 3,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn user(role: UserRole) -> User {
        User {
            id: Uuid::new_v4(),
            email: format!("{}@example.com", role.as_str().to_lowercase()),
            password_hash: String::new(),
            name: "Someone".to_string(),
            role,
            is_super_admin: false,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    struct Fixture {
        drafts: MockDraftRepository,
        ideas: MockIdeaRepository,
        organizations: MockOrganizationRepository,
        users: MockUserRepository,
        schedules: MockScheduleRepository,
        notifier: MockNotifier,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                drafts: MockDraftRepository::new(),
                ideas: MockIdeaRepository::new(),
                organizations: MockOrganizationRepository::new(),
                users: MockUserRepository::new(),
                schedules: MockScheduleRepository::new(),
                notifier: MockNotifier::new(),
            }
        }

        fn with_draft(mut self, found: ContentDraft) -> Self {
            self.drafts
                .expect_find_in_org()
                .returning(move |_, _| Ok(Some(found.clone())));
            self
        }

        fn build(self) -> DraftManager<MockUnitOfWork> {
            let drafts: Arc<dyn DraftRepository> = Arc::new(self.drafts);
            let ideas: Arc<dyn IdeaRepository> = Arc::new(self.ideas);
            let organizations: Arc<dyn OrganizationRepository> = Arc::new(self.organizations);
            let users: Arc<dyn UserRepository> = Arc::new(self.users);
            let schedules: Arc<dyn ScheduleRepository> = Arc::new(self.schedules);
            let mut uow = MockUnitOfWork::new();
            uow.expect_drafts().returning(move || drafts.clone());
            uow.expect_ideas().returning(move || ideas.clone());
            uow.expect_organizations()
                .returning(move || organizations.clone());
            uow.expect_users().returning(move || users.clone());
            uow.expect_schedules().returning(move || schedules.clone());
            DraftManager::new(Arc::new(uow), Arc::new(self.notifier))
        }
    }

    #[tokio::test]
    async fn draft_to_published_is_a_validation_error() {
        let creative = ctx(UserRole::Creative);
        let mut f = Fixture::new().with_draft(draft(&creative, DraftStatus::Draft));
        f.drafts.expect_transition_status().never();

        let err = f
            .build()
            .transition(&creative, Uuid::new_v4(), DraftStatus::Published, None)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
        assert_eq!(
            err.to_string(),
            "Invalid status transition from DRAFT to PUBLISHED"
        );
    }

    #[tokio::test]
    async fn submit_uses_status_and_version_cas_and_notifies_clients() {
        let creative = ctx(UserRole::Creative);
        let current = draft(&creative, DraftStatus::Draft);
        let client = user(UserRole::Client);
        let client_id = client.id;

        let mut f = Fixture::new().with_draft(current.clone());
        f.drafts
            .expect_transition_status()
            .withf(|d, status, version, event| {
                d.status == DraftStatus::AwaitingFeedback
                    && d.version == 4
                    && *status == DraftStatus::Draft
                    && *version == 3
                    && event.status == "AWAITING_FEEDBACK"
            })
            .returning(|d, _, _, _| Ok(Some(d)));
        f.organizations
            .expect_list_active_members()
            .returning(move |org| {
                Ok(vec![Membership {
                    id: Uuid::new_v4(),
                    organization_id: org,
                    user_id: client_id,
                    role: UserRole::Client,
                    is_active: true,
                    permissions: vec![],
                    joined_at: Utc::now(),
                    invited_at: None,
                }])
            });
        f.users
            .expect_find_by_ids()
            .withf(move |ids| ids == &vec![client_id])
            .returning(move |_| Ok(vec![client.clone()]));
        f.notifier
            .expect_draft_submitted()
            .withf(|_, recipients| recipients.len() == 1)
            .times(1)
            .return_const(());

        let submitted = f
            .build()
            .transition(&creative, current.id, DraftStatus::AwaitingFeedback, None)
            .await
            .unwrap();
        assert_eq!(submitted.status, DraftStatus::AwaitingFeedback);
        assert_eq!(submitted.status_history().len(), 1);
    }

    #[tokio::test]
    async fn repeating_a_transition_is_rejected_the_same_way() {
        let client = ctx(UserRole::Client);
        let approved = draft(&client, DraftStatus::Approved);
        let service = Fixture::new().with_draft(approved).build();

        for _ in 0..2 {
            let err = service
                .transition(&client, Uuid::new_v4(), DraftStatus::Approved, None)
                .await
                .unwrap_err();
            assert_eq!(
                err.to_string(),
                "Invalid status transition from APPROVED to APPROVED"
            );
        }
    }

    #[tokio::test]
    async fn publish_marks_scheduled_posts() {
        let creative = ctx(UserRole::Creative);
        let approved = draft(&creative, DraftStatus::Approved);
        let draft_id = approved.id;

        let mut f = Fixture::new().with_draft(approved);
        f.drafts
            .expect_transition_status()
            .returning(|d, _, _, _| Ok(Some(d)));
        f.schedules
            .expect_mark_published_for_draft()
            .withf(move |_, id| *id == draft_id)
            .times(1)
            .returning(|_, _| Ok(2));

        let published = f
            .build()
            .transition(&creative, draft_id, DraftStatus::Published, None)
            .await
            .unwrap();
        assert_eq!(published.status, DraftStatus::Published);
    }

    #[tokio::test]
    async fn lost_race_is_a_conflict() {
        let client = ctx(UserRole::Client);
        let mut f = Fixture::new().with_draft(draft(&client, DraftStatus::AwaitingFeedback));
        f.drafts
            .expect_transition_status()
            .returning(|_, _, _, _| Ok(None));
        f.notifier.expect_draft_reviewed().never();

        let err = f
            .build()
            .transition(&client, Uuid::new_v4(), DraftStatus::Approved, None)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[tokio::test]
    async fn stale_version_is_a_conflict() {
        let creative = ctx(UserRole::Creative);
        let mut f = Fixture::new().with_draft(draft(&creative, DraftStatus::Draft));
        f.drafts.expect_update_content().never();

        let err = f
            .build()
            .update(
                &creative,
                Uuid::new_v4(),
                DraftChanges {
                    body: Some("edited".to_string()),
                    expected_version: Some(1),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[tokio::test]
    async fn drafts_under_review_are_read_only() {
        let creative = ctx(UserRole::Creative);
        let service = Fixture::new()
            .with_draft(draft(&creative, DraftStatus::AwaitingFeedback))
            .build();

        let err = service
            .update(&creative, Uuid::new_v4(), DraftChanges::default())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn create_copies_the_idea_organization() {
        let creative = ctx(UserRole::Creative);
        let idea = Idea {
            id: Uuid::new_v4(),
            organization_id: creative.organization_id,
            created_by: creative.user_id,
            title: "Idea".to_string(),
            description: None,
            status: IdeaStatus::Approved,
            delivery_item_id: None,
            publishing_date: None,
            publishing_time: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let idea_id = idea.id;
        let org_id = idea.organization_id;

        let mut f = Fixture::new();
        f.ideas
            .expect_find_in_org()
            .returning(move |_, _| Ok(Some(idea.clone())));
        f.drafts
            .expect_create()
            .withf(move |d| d.organization_id == org_id && d.idea_id == idea_id)
            .returning(move |d| {
                Ok(ContentDraft {
                    id: Uuid::new_v4(),
                    organization_id: d.organization_id,
                    idea_id: d.idea_id,
                    created_by: d.created_by,
                    body: d.body,
                    content_type: d.content_type,
                    status: DraftStatus::Draft,
                    metadata: json!({ "statusHistory": [] }),
                    version: 1,
                    created_at: Utc::now(),
                    updated_at: Utc::now(),
                })
            });

        let created = f
            .build()
            .create(
                &creative,
                DraftInput {
                    idea_id,
                    body: "Copy".to_string(),
                    content_type: ContentType::Article,
                },
            )
            .await
            .unwrap();
        assert_eq!(created.organization_id, org_id);
    }
}
