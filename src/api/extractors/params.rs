//! `Path` and `Query` that reject through `AppError`, so a malformed id or
//! query value gets the same JSON error body as every other failure.

use axum::extract::FromRequestParts;

use crate::errors::AppError;

#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(AppError))]
pub struct Path<T>(pub T);

#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(AppError))]
pub struct Query<T>(pub T);
