//! Shared fixtures for the integration tests: an in-memory store behind the
//! real services and router.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use chrono::Utc;
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;
use uuid::Uuid;

use content_approval::api::{create_router, AppState};
use content_approval::config::{Config, SELECTED_ORGANIZATION_HEADER};
use content_approval::domain::{
    ContentDraft, ContentType, DeliveryItem, DeliveryPlan, DraftFilter, DraftStatus, Feedback,
    FeedbackTarget, Idea, IdeaFilter, IdeaStatus, Media, Membership, MembershipSummary,
    NewDeliveryPlan, NewDraft, NewFeedback, NewIdea, NewMedia, NewMembership, NewOrganization,
    NewScheduledPost, NewStatusEvent, NewUser, Organization, ScheduleStatus, ScheduledPost,
    SubscriptionStatus, User, UserRole,
};
use content_approval::errors::{AppError, AppResult};
use content_approval::infra::{
    DeliveryRepository, DraftRepository, FeedbackRepository, IdeaRepository, MediaRepository,
    OrganizationRepository, ScheduleRepository, UnitOfWork, UserRepository,
};
use content_approval::services::{issue_token, Notifier, Services};
use content_approval::types::PaginationParams;

pub const TEST_SECRET: &str = "integration-test-secret-at-least-32-chars";

#[derive(Default)]
pub struct Tables {
    pub users: Vec<User>,
    pub organizations: Vec<Organization>,
    pub memberships: Vec<Membership>,
    pub ideas: Vec<Idea>,
    pub drafts: Vec<ContentDraft>,
    pub feedback: Vec<Feedback>,
    pub media: Vec<Media>,
    pub posts: Vec<ScheduledPost>,
    pub plans: Vec<DeliveryPlan>,
    pub items: Vec<DeliveryItem>,
    pub events: Vec<NewStatusEvent>,
}

/// Every repository over one set of in-memory tables.
#[derive(Default)]
pub struct Memory {
    tables: Mutex<Tables>,
}

impl Memory {
    pub fn tables(&self) -> MutexGuard<'_, Tables> {
        self.tables.lock().unwrap()
    }
}

fn page<T: Clone>(rows: Vec<T>, pagination: PaginationParams) -> (Vec<T>, u64) {
    let total = rows.len() as u64;
    let rows = rows
        .into_iter()
        .skip(pagination.offset() as usize)
        .take(pagination.limit() as usize)
        .collect();
    (rows, total)
}

#[async_trait]
impl UserRepository for Memory {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        Ok(self.tables().users.iter().find(|u| u.id == id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        Ok(self.tables().users.iter().find(|u| u.email == email).cloned())
    }

    async fn find_by_ids(&self, ids: Vec<Uuid>) -> AppResult<Vec<User>> {
        Ok(self
            .tables()
            .users
            .iter()
            .filter(|u| ids.contains(&u.id))
            .cloned()
            .collect())
    }

    async fn create(&self, user: NewUser) -> AppResult<User> {
        let mut tables = self.tables();
        if tables.users.iter().any(|u| u.email == user.email) {
            return Err(AppError::conflict("Email already registered"));
        }
        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            email: user.email,
            password_hash: user.password_hash,
            name: user.name,
            role: user.role,
            is_super_admin: false,
            created_at: now,
            updated_at: now,
        };
        tables.users.push(user.clone());
        Ok(user)
    }
}

#[async_trait]
impl OrganizationRepository for Memory {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Organization>> {
        Ok(self
            .tables()
            .organizations
            .iter()
            .find(|o| o.id == id)
            .cloned())
    }

    async fn create_with_owner(
        &self,
        organization: NewOrganization,
        owner_id: Uuid,
    ) -> AppResult<(Organization, Membership)> {
        let mut tables = self.tables();
        if tables.organizations.iter().any(|o| o.slug == organization.slug) {
            return Err(AppError::conflict("Organization slug already taken"));
        }
        let now = Utc::now();
        let org = Organization {
            id: Uuid::new_v4(),
            name: organization.name,
            slug: organization.slug,
            brand_color: organization.brand_color,
            subscription_status: SubscriptionStatus::Trial,
            created_at: now,
            updated_at: now,
        };
        let membership = Membership {
            id: Uuid::new_v4(),
            organization_id: org.id,
            user_id: owner_id,
            role: UserRole::Admin,
            is_active: true,
            permissions: Vec::new(),
            joined_at: now,
            invited_at: None,
        };
        tables.organizations.push(org.clone());
        tables.memberships.push(membership.clone());
        Ok((org, membership))
    }

    async fn find_active_membership(
        &self,
        user_id: Uuid,
        organization_id: Uuid,
    ) -> AppResult<Option<Membership>> {
        Ok(self
            .tables()
            .memberships
            .iter()
            .find(|m| m.user_id == user_id && m.organization_id == organization_id && m.is_active)
            .cloned())
    }

    async fn find_latest_active_membership(&self, user_id: Uuid) -> AppResult<Option<Membership>> {
        Ok(self
            .tables()
            .memberships
            .iter()
            .filter(|m| m.user_id == user_id && m.is_active)
            .max_by_key(|m| (m.joined_at, m.id))
            .cloned())
    }

    async fn find_membership(
        &self,
        organization_id: Uuid,
        user_id: Uuid,
    ) -> AppResult<Option<Membership>> {
        Ok(self
            .tables()
            .memberships
            .iter()
            .find(|m| m.user_id == user_id && m.organization_id == organization_id)
            .cloned())
    }

    async fn list_active_memberships(&self, user_id: Uuid) -> AppResult<Vec<MembershipSummary>> {
        let tables = self.tables();
        let mut memberships: Vec<_> = tables
            .memberships
            .iter()
            .filter(|m| m.user_id == user_id && m.is_active)
            .collect();
        memberships.sort_by(|a, b| b.joined_at.cmp(&a.joined_at));
        Ok(memberships
            .into_iter()
            .filter_map(|m| {
                let organization = tables
                    .organizations
                    .iter()
                    .find(|o| o.id == m.organization_id)?
                    .clone();
                Some(MembershipSummary {
                    organization,
                    role: m.role,
                    permissions: m.permissions.clone(),
                    joined_at: m.joined_at,
                })
            })
            .collect())
    }

    async fn list_active_members(&self, organization_id: Uuid) -> AppResult<Vec<Membership>> {
        Ok(self
            .tables()
            .memberships
            .iter()
            .filter(|m| m.organization_id == organization_id && m.is_active)
            .cloned()
            .collect())
    }

    async fn add_member(&self, membership: NewMembership) -> AppResult<Membership> {
        let membership = Membership {
            id: Uuid::new_v4(),
            organization_id: membership.organization_id,
            user_id: membership.user_id,
            role: membership.role,
            is_active: true,
            permissions: membership.permissions,
            joined_at: Utc::now(),
            invited_at: membership.invited_at,
        };
        self.tables().memberships.push(membership.clone());
        Ok(membership)
    }

    async fn set_membership_active(
        &self,
        organization_id: Uuid,
        user_id: Uuid,
        active: bool,
        role: Option<UserRole>,
    ) -> AppResult<Option<Membership>> {
        let mut tables = self.tables();
        let Some(membership) = tables
            .memberships
            .iter_mut()
            .find(|m| m.user_id == user_id && m.organization_id == organization_id)
        else {
            return Ok(None);
        };
        membership.is_active = active;
        if let Some(role) = role {
            membership.role = role;
        }
        Ok(Some(membership.clone()))
    }
}

#[async_trait]
impl IdeaRepository for Memory {
    async fn create(&self, idea: NewIdea) -> AppResult<Idea> {
        let now = Utc::now();
        let idea = Idea {
            id: Uuid::new_v4(),
            organization_id: idea.organization_id,
            created_by: idea.created_by,
            title: idea.title,
            description: idea.description,
            status: IdeaStatus::Pending,
            delivery_item_id: idea.delivery_item_id,
            publishing_date: idea.publishing_date,
            publishing_time: idea.publishing_time,
            created_at: now,
            updated_at: now,
        };
        self.tables().ideas.push(idea.clone());
        Ok(idea)
    }

    async fn find_in_org(&self, organization_id: Uuid, id: Uuid) -> AppResult<Option<Idea>> {
        Ok(self
            .tables()
            .ideas
            .iter()
            .find(|i| i.id == id && i.organization_id == organization_id)
            .cloned())
    }

    async fn list(
        &self,
        organization_id: Uuid,
        filter: IdeaFilter,
        pagination: PaginationParams,
    ) -> AppResult<(Vec<Idea>, u64)> {
        let mut rows: Vec<Idea> = self
            .tables()
            .ideas
            .iter()
            .filter(|i| i.organization_id == organization_id)
            .filter(|i| filter.status.map_or(true, |s| i.status == s))
            .filter(|i| {
                filter
                    .delivery_item_id
                    .map_or(true, |d| i.delivery_item_id == Some(d))
            })
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(page(rows, pagination))
    }

    async fn update_pending(&self, idea: Idea) -> AppResult<Option<Idea>> {
        let mut tables = self.tables();
        let Some(stored) = tables.ideas.iter_mut().find(|i| {
            i.id == idea.id
                && i.organization_id == idea.organization_id
                && i.status == IdeaStatus::Pending
        }) else {
            return Ok(None);
        };
        *stored = idea.clone();
        Ok(Some(idea))
    }

    async fn delete(&self, organization_id: Uuid, id: Uuid) -> AppResult<bool> {
        let mut tables = self.tables();
        let before = tables.ideas.len();
        tables
            .ideas
            .retain(|i| !(i.id == id && i.organization_id == organization_id));
        Ok(tables.ideas.len() < before)
    }

    async fn transition_status(
        &self,
        idea: Idea,
        expected: IdeaStatus,
        event: NewStatusEvent,
    ) -> AppResult<Option<Idea>> {
        let mut tables = self.tables();
        let Some(stored) = tables.ideas.iter_mut().find(|i| {
            i.id == idea.id && i.organization_id == idea.organization_id && i.status == expected
        }) else {
            return Ok(None);
        };
        *stored = idea.clone();
        tables.events.push(event);
        Ok(Some(idea))
    }

    async fn count_by_delivery_items(
        &self,
        organization_id: Uuid,
        item_ids: Vec<Uuid>,
    ) -> AppResult<HashMap<Uuid, u64>> {
        let mut counts = HashMap::new();
        for idea in self
            .tables()
            .ideas
            .iter()
            .filter(|i| i.organization_id == organization_id)
        {
            if let Some(item) = idea.delivery_item_id.filter(|id| item_ids.contains(id)) {
                *counts.entry(item).or_insert(0) += 1;
            }
        }
        Ok(counts)
    }
}

#[async_trait]
impl DraftRepository for Memory {
    async fn create(&self, draft: NewDraft) -> AppResult<ContentDraft> {
        let now = Utc::now();
        let draft = ContentDraft {
            id: Uuid::new_v4(),
            organization_id: draft.organization_id,
            idea_id: draft.idea_id,
            created_by: draft.created_by,
            body: draft.body,
            content_type: draft.content_type,
            status: DraftStatus::Draft,
            metadata: serde_json::json!({}),
            version: 1,
            created_at: now,
            updated_at: now,
        };
        self.tables().drafts.push(draft.clone());
        Ok(draft)
    }

    async fn find_in_org(
        &self,
        organization_id: Uuid,
        id: Uuid,
    ) -> AppResult<Option<ContentDraft>> {
        Ok(self
            .tables()
            .drafts
            .iter()
            .find(|d| d.id == id && d.organization_id == organization_id)
            .cloned())
    }

    async fn list(
        &self,
        organization_id: Uuid,
        filter: DraftFilter,
        pagination: PaginationParams,
    ) -> AppResult<(Vec<ContentDraft>, u64)> {
        let mut rows: Vec<ContentDraft> = self
            .tables()
            .drafts
            .iter()
            .filter(|d| d.organization_id == organization_id)
            .filter(|d| filter.idea_id.map_or(true, |id| d.idea_id == id))
            .filter(|d| filter.status.map_or(true, |s| d.status == s))
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        Ok(page(rows, pagination))
    }

    async fn update_content(
        &self,
        draft: ContentDraft,
        expected_version: i32,
    ) -> AppResult<Option<ContentDraft>> {
        let mut tables = self.tables();
        let Some(stored) = tables.drafts.iter_mut().find(|d| {
            d.id == draft.id
                && d.organization_id == draft.organization_id
                && d.version == expected_version
        }) else {
            return Ok(None);
        };
        *stored = draft.clone();
        Ok(Some(draft))
    }

    async fn transition_status(
        &self,
        draft: ContentDraft,
        expected_status: DraftStatus,
        expected_version: i32,
        event: NewStatusEvent,
    ) -> AppResult<Option<ContentDraft>> {
        let mut tables = self.tables();
        let Some(stored) = tables.drafts.iter_mut().find(|d| {
            d.id == draft.id
                && d.organization_id == draft.organization_id
                && d.status == expected_status
                && d.version == expected_version
        }) else {
            return Ok(None);
        };
        *stored = draft.clone();
        tables.events.push(event);
        Ok(Some(draft))
    }
}

#[async_trait]
impl FeedbackRepository for Memory {
    async fn create(&self, feedback: NewFeedback) -> AppResult<Feedback> {
        let feedback = Feedback {
            id: Uuid::new_v4(),
            organization_id: feedback.organization_id,
            author_id: feedback.author_id,
            draft_id: feedback.target.draft_id(),
            idea_id: feedback.target.idea_id(),
            content: feedback.content,
            created_at: Utc::now(),
        };
        self.tables().feedback.push(feedback.clone());
        Ok(feedback)
    }

    async fn list_for(
        &self,
        organization_id: Uuid,
        target: FeedbackTarget,
    ) -> AppResult<Vec<Feedback>> {
        Ok(self
            .tables()
            .feedback
            .iter()
            .filter(|f| f.organization_id == organization_id)
            .filter(|f| match target {
                FeedbackTarget::Draft(id) => f.draft_id == Some(id),
                FeedbackTarget::Idea(id) => f.idea_id == Some(id),
            })
            .cloned()
            .collect())
    }
}

#[async_trait]
impl MediaRepository for Memory {
    async fn create(&self, media: NewMedia) -> AppResult<Media> {
        let media = Media {
            id: Uuid::new_v4(),
            organization_id: media.organization_id,
            draft_id: media.draft_id,
            uploaded_by: media.uploaded_by,
            file_name: media.file_name,
            mime_type: media.mime_type,
            size_bytes: media.size_bytes,
            url: media.url,
            created_at: Utc::now(),
        };
        self.tables().media.push(media.clone());
        Ok(media)
    }

    async fn list_for_draft(&self, organization_id: Uuid, draft_id: Uuid) -> AppResult<Vec<Media>> {
        Ok(self
            .tables()
            .media
            .iter()
            .filter(|m| m.organization_id == organization_id && m.draft_id == draft_id)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl ScheduleRepository for Memory {
    async fn create(&self, post: NewScheduledPost) -> AppResult<ScheduledPost> {
        let now = Utc::now();
        let post = ScheduledPost {
            id: Uuid::new_v4(),
            organization_id: post.organization_id,
            draft_id: post.draft_id,
            platform: post.platform,
            scheduled_for: post.scheduled_for,
            status: ScheduleStatus::Scheduled,
            created_by: post.created_by,
            created_at: now,
            updated_at: now,
        };
        self.tables().posts.push(post.clone());
        Ok(post)
    }

    async fn find_in_org(
        &self,
        organization_id: Uuid,
        id: Uuid,
    ) -> AppResult<Option<ScheduledPost>> {
        Ok(self
            .tables()
            .posts
            .iter()
            .find(|p| p.id == id && p.organization_id == organization_id)
            .cloned())
    }

    async fn list(
        &self,
        organization_id: Uuid,
        status: Option<ScheduleStatus>,
        pagination: PaginationParams,
    ) -> AppResult<(Vec<ScheduledPost>, u64)> {
        let mut rows: Vec<ScheduledPost> = self
            .tables()
            .posts
            .iter()
            .filter(|p| p.organization_id == organization_id)
            .filter(|p| status.map_or(true, |s| p.status == s))
            .cloned()
            .collect();
        rows.sort_by(|a, b| a.scheduled_for.cmp(&b.scheduled_for));
        Ok(page(rows, pagination))
    }

    async fn cancel(&self, organization_id: Uuid, id: Uuid) -> AppResult<Option<ScheduledPost>> {
        let mut tables = self.tables();
        let Some(post) = tables.posts.iter_mut().find(|p| {
            p.id == id && p.organization_id == organization_id && p.status == ScheduleStatus::Scheduled
        }) else {
            return Ok(None);
        };
        post.status = ScheduleStatus::Cancelled;
        post.updated_at = Utc::now();
        Ok(Some(post.clone()))
    }

    async fn mark_published_for_draft(
        &self,
        organization_id: Uuid,
        draft_id: Uuid,
    ) -> AppResult<u64> {
        let mut count = 0;
        for post in self.tables().posts.iter_mut().filter(|p| {
            p.organization_id == organization_id
                && p.draft_id == draft_id
                && p.status == ScheduleStatus::Scheduled
        }) {
            post.status = ScheduleStatus::Published;
            count += 1;
        }
        Ok(count)
    }
}

#[async_trait]
impl DeliveryRepository for Memory {
    async fn create_plan(
        &self,
        plan: NewDeliveryPlan,
    ) -> AppResult<(DeliveryPlan, Vec<DeliveryItem>)> {
        let stored = DeliveryPlan {
            id: Uuid::new_v4(),
            organization_id: plan.organization_id,
            name: plan.name,
            month: plan.month,
            description: plan.description,
            created_by: plan.created_by,
            created_at: Utc::now(),
        };
        let items: Vec<DeliveryItem> = plan
            .items
            .into_iter()
            .map(|item| DeliveryItem {
                id: Uuid::new_v4(),
                plan_id: stored.id,
                organization_id: stored.organization_id,
                content_type: item.content_type,
                quantity: item.quantity,
                notes: item.notes,
            })
            .collect();
        let mut tables = self.tables();
        tables.plans.push(stored.clone());
        tables.items.extend(items.iter().cloned());
        Ok((stored, items))
    }

    async fn list_plans(&self, organization_id: Uuid) -> AppResult<Vec<DeliveryPlan>> {
        let mut plans: Vec<DeliveryPlan> = self
            .tables()
            .plans
            .iter()
            .filter(|p| p.organization_id == organization_id)
            .cloned()
            .collect();
        plans.sort_by(|a, b| b.month.cmp(&a.month));
        Ok(plans)
    }

    async fn find_plan(&self, organization_id: Uuid, id: Uuid) -> AppResult<Option<DeliveryPlan>> {
        Ok(self
            .tables()
            .plans
            .iter()
            .find(|p| p.id == id && p.organization_id == organization_id)
            .cloned())
    }

    async fn list_items(
        &self,
        organization_id: Uuid,
        plan_id: Uuid,
    ) -> AppResult<Vec<DeliveryItem>> {
        Ok(self
            .tables()
            .items
            .iter()
            .filter(|i| i.organization_id == organization_id && i.plan_id == plan_id)
            .cloned()
            .collect())
    }

    async fn find_item(&self, organization_id: Uuid, id: Uuid) -> AppResult<Option<DeliveryItem>> {
        Ok(self
            .tables()
            .items
            .iter()
            .find(|i| i.id == id && i.organization_id == organization_id)
            .cloned())
    }
}

pub struct MemoryUnitOfWork {
    pub memory: Arc<Memory>,
}

impl UnitOfWork for MemoryUnitOfWork {
    fn users(&self) -> Arc<dyn UserRepository> {
        self.memory.clone()
    }

    fn organizations(&self) -> Arc<dyn OrganizationRepository> {
        self.memory.clone()
    }

    fn ideas(&self) -> Arc<dyn IdeaRepository> {
        self.memory.clone()
    }

    fn drafts(&self) -> Arc<dyn DraftRepository> {
        self.memory.clone()
    }

    fn feedback(&self) -> Arc<dyn FeedbackRepository> {
        self.memory.clone()
    }

    fn media(&self) -> Arc<dyn MediaRepository> {
        self.memory.clone()
    }

    fn schedules(&self) -> Arc<dyn ScheduleRepository> {
        self.memory.clone()
    }

    fn deliveries(&self) -> Arc<dyn DeliveryRepository> {
        self.memory.clone()
    }
}

/// Records what would have been e-mailed.
#[derive(Default)]
pub struct RecordingNotifier {
    pub sent: Mutex<Vec<(String, String)>>,
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn draft_submitted(&self, draft: &ContentDraft, recipients: Vec<User>) {
        let mut sent = self.sent.lock().unwrap();
        for user in recipients {
            sent.push((user.email, format!("submitted {}", draft.id)));
        }
    }

    async fn draft_reviewed(&self, draft: &ContentDraft, author: User) {
        self.sent
            .lock()
            .unwrap()
            .push((author.email, format!("reviewed {}", draft.id)));
    }

    async fn idea_reviewed(&self, idea: &Idea, author: User) {
        self.sent
            .lock()
            .unwrap()
            .push((author.email, format!("idea {}", idea.id)));
    }
}

/// Router over in-memory storage, plus handles to inspect it.
pub struct TestApp {
    pub router: Router,
    pub memory: Arc<Memory>,
    pub notifier: Arc<RecordingNotifier>,
    pub config: Config,
}

impl TestApp {
    pub fn new() -> Self {
        let memory = Arc::new(Memory::default());
        let notifier = Arc::new(RecordingNotifier::default());
        let config = Config::with_secret(TEST_SECRET);

        let services = Services::from_unit_of_work(
            Arc::new(MemoryUnitOfWork {
                memory: memory.clone(),
            }),
            config.clone(),
            notifier.clone(),
        );
        let state = AppState::new(&services, None, None, config.clone());

        Self {
            router: create_router(state),
            memory,
            notifier,
            config,
        }
    }

    pub fn seed_user(&self, email: &str, role: UserRole) -> User {
        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            email: email.to_string(),
            password_hash: "not-a-real-hash".to_string(),
            name: email.to_string(),
            role,
            is_super_admin: false,
            created_at: now,
            updated_at: now,
        };
        self.memory.tables().users.push(user.clone());
        user
    }

    pub fn seed_organization(&self, name: &str) -> Organization {
        let now = Utc::now();
        let org = Organization {
            id: Uuid::new_v4(),
            name: name.to_string(),
            slug: name.to_lowercase().replace(' ', "-"),
            brand_color: None,
            subscription_status: SubscriptionStatus::Active,
            created_at: now,
            updated_at: now,
        };
        self.memory.tables().organizations.push(org.clone());
        org
    }

    pub fn seed_membership(&self, user: &User, org: &Organization, role: UserRole, active: bool) {
        self.memory.tables().memberships.push(Membership {
            id: Uuid::new_v4(),
            organization_id: org.id,
            user_id: user.id,
            role,
            is_active: active,
            permissions: Vec::new(),
            joined_at: Utc::now(),
            invited_at: None,
        });
    }

    pub fn seed_idea(&self, org: &Organization, author: &User, status: IdeaStatus) -> Idea {
        let now = Utc::now();
        let idea = Idea {
            id: Uuid::new_v4(),
            organization_id: org.id,
            created_by: author.id,
            title: "Launch teaser".to_string(),
            description: None,
            status,
            delivery_item_id: None,
            publishing_date: None,
            publishing_time: None,
            created_at: now,
            updated_at: now,
        };
        self.memory.tables().ideas.push(idea.clone());
        idea
    }

    pub fn seed_draft(&self, idea: &Idea, author: &User, status: DraftStatus) -> ContentDraft {
        let now = Utc::now();
        let draft = ContentDraft {
            id: Uuid::new_v4(),
            organization_id: idea.organization_id,
            idea_id: idea.id,
            created_by: author.id,
            body: "Draft body".to_string(),
            content_type: ContentType::Post,
            status,
            metadata: serde_json::json!({}),
            version: 1,
            created_at: now,
            updated_at: now,
        };
        self.memory.tables().drafts.push(draft.clone());
        draft
    }

    pub fn token_for(&self, user: &User) -> String {
        issue_token(user, &self.config).unwrap().access_token
    }

    pub async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, body)
    }
}

/// Request builder with the usual headers.
pub fn request(
    method: Method,
    uri: &str,
    token: Option<&str>,
    org: Option<Uuid>,
    body: Option<Value>,
) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    if let Some(org) = org {
        builder = builder.header(SELECTED_ORGANIZATION_HEADER, org.to_string());
    }
    match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}
