//! Background jobs processed by the `jobs work` worker.

mod email_job;

pub use email_job::{email_job_handler, EmailJob};
