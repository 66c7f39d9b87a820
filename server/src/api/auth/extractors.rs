//! Authorization extractor for Axum handlers
//!
//! Pulls the `AuthContext` injected by the auth middleware out of
//! request extensions so handlers take it as a parameter.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use super::context::AuthContext;
use crate::api::types::ApiError;

/// Authenticated caller identity
pub struct Auth(pub AuthContext);

impl<S> FromRequestParts<S> for Auth
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthContext>()
            .cloned()
            .map(Auth)
            .ok_or_else(|| ApiError::internal("Auth context not available"))
    }
}
