//! Status state machines.
//!
//! Each entity type has one workflow that owns its transition table and the
//! roles allowed to drive each edge. Handlers never change a status without
//! going through it.

mod draft;
mod idea;

pub use draft::DraftWorkflow;
pub use idea::IdeaWorkflow;

use thiserror::Error;

use super::NewStatusEvent;
use crate::errors::AppError;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransitionError {
    /// The edge is not in the table. Same-status moves land here too.
    #[error("Invalid status transition from {from} to {to}")]
    Invalid { from: String, to: String },

    #[error("{0}")]
    NotPermitted(String),
}

impl TransitionError {
    fn invalid(from: impl ToString, to: impl ToString) -> Self {
        TransitionError::Invalid {
            from: from.to_string(),
            to: to.to_string(),
        }
    }
}

impl From<TransitionError> for AppError {
    fn from(err: TransitionError) -> Self {
        match err {
            TransitionError::Invalid { .. } => AppError::Validation(err.to_string()),
            TransitionError::NotPermitted(msg) => AppError::Forbidden(msg),
        }
    }
}

/// The updated entity together with the audit event describing the change.
#[derive(Debug, Clone)]
pub struct Transitioned<E> {
    pub entity: E,
    pub event: NewStatusEvent,
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[test]
    fn errors_map_onto_the_http_taxonomy() {
        let invalid: AppError = TransitionError::invalid("DRAFT", "PUBLISHED").into();
        assert_eq!(invalid.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            invalid.to_string(),
            "Invalid status transition from DRAFT to PUBLISHED"
        );

        let denied: AppError = TransitionError::NotPermitted("nope".to_string()).into();
        assert_eq!(denied.status(), StatusCode::FORBIDDEN);
    }
}
