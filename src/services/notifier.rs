//! Outbound notifications for review events.
//!
//! Delivery is best-effort: failures are logged and never fail the request
//! that triggered them.

use ammonia::clean_text;
use async_trait::async_trait;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

use crate::domain::{ContentDraft, Idea, User};
use crate::infra::EmailQueue;
use crate::jobs::EmailJob;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait Notifier: Send + Sync {
    /// A draft entered AWAITING_FEEDBACK; tell the organization's clients.
    async fn draft_submitted(&self, draft: &ContentDraft, recipients: Vec<User>);

    /// A client reviewed a draft; tell its author.
    async fn draft_reviewed(&self, draft: &ContentDraft, author: User);

    /// A client approved or rejected an idea; tell its author.
    async fn idea_reviewed(&self, idea: &Idea, author: User);
}

/// Turns review events into `EmailJob`s. Without a queue the jobs are only
/// logged.
pub struct EmailNotifier {
    queue: Option<EmailQueue>,
    app_base_url: String,
}

impl EmailNotifier {
    pub fn new(queue: Option<EmailQueue>, app_base_url: impl Into<String>) -> Self {
        Self {
            queue,
            app_base_url: app_base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn draft_link(&self, draft: &ContentDraft) -> String {
        format!("{}/drafts/{}", self.app_base_url, draft.id)
    }

    fn idea_link(&self, idea: &Idea) -> String {
        format!("{}/ideas/{}", self.app_base_url, idea.id)
    }

    async fn send(&self, job: EmailJob) {
        match &self.queue {
            Some(queue) => {
                if let Err(e) = queue.push(job.clone()).await {
                    tracing::warn!(error = %e, to = %job.to, subject = %job.subject, "Notification not enqueued");
                }
            }
            None => {
                tracing::info!(to = %job.to, subject = %job.subject, "Email queue disabled; notification logged only");
            }
        }
    }
}

// User-supplied names and titles are escaped before they reach the HTML.

fn draft_submitted_html(recipient: &str, draft: &ContentDraft, link: &str) -> String {
    format!(
        "<p>Hi {},</p><p>A new {} draft is waiting for your review.</p><p><a href=\"{}\">Open draft</a></p>",
        clean_text(recipient),
        draft.content_type.as_str().to_lowercase(),
        link
    )
}

fn draft_reviewed_html(author: &str, draft: &ContentDraft, link: &str) -> String {
    format!(
        "<p>Hi {},</p><p>Your draft is now <strong>{}</strong>.</p><p><a href=\"{}\">Open draft</a></p>",
        clean_text(author),
        draft.status,
        link
    )
}

fn idea_reviewed_html(author: &str, idea: &Idea, link: &str) -> String {
    format!(
        "<p>Hi {},</p><p>Your idea \"{}\" was <strong>{}</strong>.</p><p><a href=\"{}\">Open idea</a></p>",
        clean_text(author),
        clean_text(&idea.title),
        idea.status,
        link
    )
}

#[async_trait]
impl Notifier for EmailNotifier {
    async fn draft_submitted(&self, draft: &ContentDraft, recipients: Vec<User>) {
        let link = self.draft_link(draft);
        for user in recipients {
            let html = draft_submitted_html(&user.name, draft, &link);
            self.send(EmailJob::new(user.email, "Draft ready for review", html))
                .await;
        }
    }

    async fn draft_reviewed(&self, draft: &ContentDraft, author: User) {
        let html = draft_reviewed_html(&author.name, draft, &self.draft_link(draft));
        let subject = format!("Draft {}", draft.status.as_str().to_lowercase().replace('_', " "));
        self.send(EmailJob::new(author.email, subject, html)).await;
    }

    async fn idea_reviewed(&self, idea: &Idea, author: User) {
        let html = idea_reviewed_html(&author.name, idea, &self.idea_link(idea));
        let subject = format!("Idea {}", idea.status.as_str().to_lowercase());
        self.send(EmailJob::new(author.email, subject, html)).await;
    }
}
