//! JSON body extractor that runs `validator` rules before the handler.

use axum::{
    async_trait,
    body::{to_bytes, Body},
    extract::{rejection::JsonRejection, FromRequest, Request},
    Json,
};
use serde::de::DeserializeOwned;
use validator::{Validate, ValidationErrors};

use crate::errors::AppError;

/// A deserialized body whose `Validate` rules have passed.
///
/// ```rust,ignore
/// async fn add_feedback(ValidatedJson(body): ValidatedJson<FeedbackRequest>) {
///     // body.content is non-empty here
/// }
/// ```
pub struct ValidatedJson<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate,
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|e| AppError::validation(e.body_text()))?;

        value
            .validate()
            .map_err(|e| AppError::validation(describe(&e)))?;

        Ok(ValidatedJson(value))
    }
}

/// Body cap while buffering an optional body; matches axum's default limit.
const OPTIONAL_BODY_LIMIT: usize = 2 * 1024 * 1024;

/// Like [`ValidatedJson`], but an empty body yields `None`.
///
/// A body that is present must still parse and validate; its errors are
/// returned, never swallowed.
pub struct OptionalValidatedJson<T>(pub Option<T>);

#[async_trait]
impl<S, T> FromRequest<S> for OptionalValidatedJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate,
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let (parts, body) = req.into_parts();
        let bytes = to_bytes(body, OPTIONAL_BODY_LIMIT)
            .await
            .map_err(|_| AppError::validation("Request body is too large"))?;

        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(OptionalValidatedJson(None));
        }

        let req = Request::from_parts(parts, Body::from(bytes));
        let ValidatedJson(value) = ValidatedJson::<T>::from_request(req, state).await?;
        Ok(OptionalValidatedJson(Some(value)))
    }
}

/// One message per failed rule, sorted by field so output is stable.
fn describe(errors: &ValidationErrors) -> String {
    let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
    fields.sort_by(|a, b| a.0.cmp(&b.0));

    fields
        .into_iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |e| {
                e.message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("{} is invalid", field))
            })
        })
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, http::header::CONTENT_TYPE};
    use serde::Deserialize;

    #[derive(Debug, Deserialize, Validate)]
    struct Comment {
        #[validate(length(min = 1, message = "Content is required"))]
        content: String,
        #[validate(range(min = 1))]
        rating: u8,
    }

    fn request(body: &'static str) -> Request {
        Request::builder()
            .method("POST")
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(body))
            .unwrap()
    }

    #[tokio::test]
    async fn valid_body_passes() {
        let ValidatedJson(comment) =
            ValidatedJson::<Comment>::from_request(request(r#"{"content":"ok","rating":3}"#), &())
                .await
                .unwrap();
        assert_eq!(comment.content, "ok");
    }

    #[tokio::test]
    async fn rule_failures_are_listed() {
        let err = ValidatedJson::<Comment>::from_request(request(r#"{"content":"","rating":0}"#), &())
            .await
            .err()
            .unwrap();
        assert_eq!(err.to_string(), "Content is required, rating is invalid");
    }

    #[derive(Debug, Deserialize, Validate)]
    struct Note {
        #[validate(length(max = 10, message = "Reason is too long"))]
        reason: Option<String>,
    }

    #[tokio::test]
    async fn empty_optional_body_is_none() {
        let req = Request::builder().method("POST").body(Body::empty()).unwrap();
        let OptionalValidatedJson(note) = OptionalValidatedJson::<Note>::from_request(req, &())
            .await
            .unwrap();
        assert!(note.is_none());
    }

    #[tokio::test]
    async fn present_optional_body_is_parsed() {
        let OptionalValidatedJson(note) =
            OptionalValidatedJson::<Note>::from_request(request(r#"{"reason":"typo"}"#), &())
                .await
                .unwrap();
        assert_eq!(note.unwrap().reason.as_deref(), Some("typo"));
    }

    #[tokio::test]
    async fn invalid_optional_body_is_rejected() {
        let err = OptionalValidatedJson::<Note>::from_request(
            request(r#"{"reason":"far too long a reason"}"#),
            &(),
        )
        .await
        .err()
        .unwrap();
        assert_eq!(err.to_string(), "Reason is too long");

        let err = OptionalValidatedJson::<Note>::from_request(request("{"), &())
            .await
            .err()
            .unwrap();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn malformed_json_is_a_validation_error() {
        let err = ValidatedJson::<Comment>::from_request(request("{"), &())
            .await
            .err()
            .unwrap();
        assert!(matches!(err, AppError::Validation(_)));
    }
}
