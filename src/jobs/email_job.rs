//! E-mail notification job.
//!
//! Delivery is not wired to an SMTP transport; the worker logs each message
//! it would send.

use serde::{Deserialize, Serialize};

use crate::errors::AppError;

/// Queue payload: `{to, subject, html}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailJob {
    pub to: String,
    pub subject: String,
    pub html: String,
}

impl EmailJob {
    pub fn new(to: impl Into<String>, subject: impl Into<String>, html: impl Into<String>) -> Self {
        Self {
            to: to.into(),
            subject: subject.into(),
            html: html.into(),
        }
    }
}

pub async fn email_job_handler(job: EmailJob) -> Result<(), AppError> {
    if job.to.trim().is_empty() {
        tracing::warn!(subject = %job.subject, "Dropping email job without recipient");
        return Ok(());
    }

    tracing::info!(
        to = %job.to,
        subject = %job.subject,
        bytes = job.html.len(),
        "Email processed (logged, not sent)"
    );
    tracing::debug!(to = %job.to, html = %job.html, "Email body");
    Ok(())
}
