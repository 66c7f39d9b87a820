//! Authentication middleware

use std::sync::Arc;

use axum::Json;
use axum::extract::{Request, State};
use axum::http::{StatusCode, header};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use super::context::AuthContext;
use super::jwt::JwtError;
use super::manager::AuthManager;

/// Authentication error response
#[derive(Debug)]
pub struct AuthError {
    pub status: StatusCode,
    pub error: &'static str,
    pub code: &'static str,
    pub message: String,
}

impl AuthError {
    pub fn required() -> Self {
        Self {
            status: StatusCode::UNAUTHORIZED,
            error: "unauthorized",
            code: "AUTH_REQUIRED",
            message: "Authentication required".to_string(),
        }
    }

    pub fn expired() -> Self {
        Self {
            status: StatusCode::UNAUTHORIZED,
            error: "unauthorized",
            code: "TOKEN_EXPIRED",
            message: "Access token has expired".to_string(),
        }
    }

    pub fn invalid() -> Self {
        Self {
            status: StatusCode::UNAUTHORIZED,
            error: "unauthorized",
            code: "TOKEN_INVALID",
            message: "Invalid access token".to_string(),
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let body = json!({
            "error": self.error,
            "code": self.code,
            "message": self.message,
        });
        (self.status, Json(body)).into_response()
    }
}

/// Shared auth state for middleware
#[derive(Clone)]
pub struct AuthState {
    pub auth_manager: Arc<AuthManager>,
}

/// Authentication middleware
///
/// Validates the `Authorization: Bearer` token and injects an
/// `AuthContext` into request extensions. With auth disabled every
/// request runs as the local default user.
pub async fn require_auth(
    State(state): State<AuthState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AuthError> {
    if !state.auth_manager.is_enabled() {
        request.extensions_mut().insert(AuthContext::LocalDefault);
        return Ok(next.run(request).await);
    }

    let token = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .ok_or_else(AuthError::required)?;

    let claims = state
        .auth_manager
        .authenticate(token)
        .await
        .map_err(|e| match e {
            JwtError::Expired => AuthError::expired(),
            JwtError::KeyFetch(msg) => {
                tracing::error!(error = %msg, "Signing key fetch failed");
                AuthError::invalid()
            }
            _ => AuthError::invalid(),
        })?;

    let auth_ctx = AuthContext::Session {
        user_id: claims.user_id().to_string(),
        email: claims.email().map(String::from),
        display_name: claims.display_name().to_string(),
    };
    request.extensions_mut().insert(auth_ctx);

    Ok(next.run(request).await)
}
