use axum::extract::{FromRequest, FromRequestParts};

use crate::error::ServerError;

/// `axum::Json` whose rejections are reported as [`ServerError`].
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(ServerError))]
pub struct ApiJson<T>(pub T);

/// `axum::extract::Path` whose rejections are reported as [`ServerError`].
#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(ServerError))]
pub struct ApiPath<T>(pub T);

/// `axum::extract::Query` whose rejections are reported as [`ServerError`].
#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(ServerError))]
pub struct ApiQuery<T>(pub T);
