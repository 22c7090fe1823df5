//! Organization-context extractors.
//!
//! Both run after the session middleware. The selected organization comes
//! from the `x-selected-organization` header, then the `organizationId`
//! query parameter.

use axum::{
    async_trait,
    extract::{FromRequestParts, Query},
    http::request::Parts,
};
use std::collections::HashMap;
use uuid::Uuid;

use crate::api::AppState;
use crate::config::{SELECTED_ORGANIZATION_HEADER, SELECTED_ORGANIZATION_QUERY};
use crate::domain::{OrganizationContext, Session};
use crate::errors::AppError;

/// Required organization context; rejects with the resolution error.
pub struct OrgContext(pub OrganizationContext);

/// Optional organization context; `None` when nothing usable resolves.
pub struct MaybeOrgContext(pub Option<OrganizationContext>);

fn parse_selector(raw: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw.trim())
        .map_err(|_| AppError::validation("Selected organization must be a valid UUID"))
}

/// The explicitly selected organization, if the request names one.
pub fn selected_organization(parts: &Parts) -> Result<Option<Uuid>, AppError> {
    if let Some(value) = parts.headers.get(SELECTED_ORGANIZATION_HEADER) {
        let raw = value
            .to_str()
            .map_err(|_| AppError::validation("Selected organization must be a valid UUID"))?;
        if !raw.trim().is_empty() {
            return parse_selector(raw).map(Some);
        }
    }

    let query = Query::<HashMap<String, String>>::try_from_uri(&parts.uri)
        .map(|Query(q)| q)
        .unwrap_or_default();
    match query.get(SELECTED_ORGANIZATION_QUERY).map(|raw| raw.trim()) {
        Some(raw) if !raw.is_empty() => parse_selector(raw).map(Some),
        _ => Ok(None),
    }
}

fn session(parts: &Parts) -> Result<Session, AppError> {
    parts
        .extensions
        .get::<Session>()
        .cloned()
        .ok_or(AppError::Unauthorized)
}

#[async_trait]
impl FromRequestParts<AppState> for OrgContext {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let session = session(parts)?;
        let explicit = selected_organization(parts)?;
        state
            .context_resolver
            .require_organization_context(&session, explicit)
            .await
            .map(OrgContext)
    }
}

#[async_trait]
impl FromRequestParts<AppState> for MaybeOrgContext {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let session = session(parts)?;
        let explicit = selected_organization(parts)?;
        Ok(MaybeOrgContext(
            state
                .context_resolver
                .get_organization_context(&session, explicit)
                .await,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    fn parts(uri: &str, header: Option<&str>) -> Parts {
        let mut builder = Request::builder().uri(uri);
        if let Some(value) = header {
            builder = builder.header(SELECTED_ORGANIZATION_HEADER, value);
        }
        builder.body(()).unwrap().into_parts().0
    }

    #[test]
    fn header_takes_precedence_over_query() {
        let from_header = Uuid::new_v4();
        let from_query = Uuid::new_v4();
        let p = parts(
            &format!("/api/ideas?organizationId={}", from_query),
            Some(&from_header.to_string()),
        );
        assert_eq!(selected_organization(&p).unwrap(), Some(from_header));
    }

    #[test]
    fn query_is_the_fallback() {
        let id = Uuid::new_v4();
        let p = parts(&format!("/api/ideas?page=2&organizationId={}", id), None);
        assert_eq!(selected_organization(&p).unwrap(), Some(id));
    }

    #[test]
    fn nothing_selected() {
        assert_eq!(selected_organization(&parts("/api/ideas", None)).unwrap(), None);
        assert_eq!(selected_organization(&parts("/api/ideas", Some(""))).unwrap(), None);
    }

    #[test]
    fn malformed_selector_is_a_validation_error() {
        let err = selected_organization(&parts("/api/ideas", Some("acme"))).unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));

        let err = selected_organization(&parts("/api/ideas?organizationId=42", None)).unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }
}
