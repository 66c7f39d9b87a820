//! Users API endpoints

pub mod types;

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};

use types::{
    CreateUserRequest, FriendsResponse, SearchUsersQuery, SearchUsersResponse, UserResponse,
};

use crate::api::auth::Auth;
use crate::api::extractors::{ValidatedJson, ValidatedQuery};
use crate::api::types::ApiError;
use crate::domain::{FriendService, UserService};

/// Shared state for Users API endpoints
#[derive(Clone)]
pub struct UsersApiState {
    pub users: Arc<UserService>,
    pub friends: Arc<FriendService>,
}

/// Build Users API routes
pub fn routes(users: Arc<UserService>, friends: Arc<FriendService>) -> Router<()> {
    let state = UsersApiState { users, friends };

    Router::new()
        .route("/", post(create_user))
        .route("/search", get(search_users))
        .route("/{user_id}", get(get_user))
        .route("/{user_id}/friends", get(list_friends))
        .with_state(state)
}

/// Create the caller's account, or return the existing one
#[utoipa::path(
    post,
    path = "/api/v1/users",
    tag = "users",
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "Account created", body = UserResponse),
        (status = 200, description = "Account already existed", body = UserResponse),
        (status = 400, description = "Invalid request"),
        (status = 409, description = "Email already registered")
    )
)]
pub async fn create_user(
    State(state): State<UsersApiState>,
    Auth(auth): Auth,
    ValidatedJson(body): ValidatedJson<CreateUserRequest>,
) -> Result<(StatusCode, Json<UserResponse>), ApiError> {
    let email = body
        .email
        .as_deref()
        .or_else(|| auth.email())
        .ok_or_else(|| {
            ApiError::bad_request(
                "EMAIL_REQUIRED",
                "Access token carries no email; provide one in the request body",
            )
        })?;
    let display_name = body.display_name.as_deref().unwrap_or(auth.display_name());

    let existed = state.users.get_profile(auth.user_id()).await.is_ok();
    let user = state
        .users
        .ensure_user(auth.user_id(), email, display_name)
        .await?;

    let status = if existed {
        StatusCode::OK
    } else {
        StatusCode::CREATED
    };
    Ok((status, Json(user.into())))
}

/// Search users by email or display name
#[utoipa::path(
    get,
    path = "/api/v1/users/search",
    tag = "users",
    params(
        ("q" = String, Query, description = "Substring to match against email and display name")
    ),
    responses(
        (status = 200, description = "Matching users", body = SearchUsersResponse),
        (status = 400, description = "Invalid query")
    )
)]
pub async fn search_users(
    State(state): State<UsersApiState>,
    Auth(auth): Auth,
    ValidatedQuery(query): ValidatedQuery<SearchUsersQuery>,
) -> Result<Json<SearchUsersResponse>, ApiError> {
    let users = state.users.search(auth.user_id(), &query.q).await?;
    Ok(Json(SearchUsersResponse {
        users: users.into_iter().map(Into::into).collect(),
    }))
}

/// Get a user profile
#[utoipa::path(
    get,
    path = "/api/v1/users/{user_id}",
    tag = "users",
    params(
        ("user_id" = String, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "User profile", body = UserResponse),
        (status = 404, description = "User not found")
    )
)]
pub async fn get_user(
    State(state): State<UsersApiState>,
    Auth(_auth): Auth,
    Path(user_id): Path<String>,
) -> Result<Json<UserResponse>, ApiError> {
    let user = state.users.get_profile(&user_id).await?;
    Ok(Json(user.into()))
}

/// List a user's friends. Restricted to the caller's own friend list.
#[utoipa::path(
    get,
    path = "/api/v1/users/{user_id}/friends",
    tag = "users",
    params(
        ("user_id" = String, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "Friend list", body = FriendsResponse),
        (status = 403, description = "Not your friend list")
    )
)]
pub async fn list_friends(
    State(state): State<UsersApiState>,
    Auth(auth): Auth,
    Path(user_id): Path<String>,
) -> Result<Json<FriendsResponse>, ApiError> {
    if user_id != auth.user_id() {
        return Err(ApiError::forbidden(
            "NOT_YOUR_FRIENDS",
            "You can only view your own friend list",
        ));
    }
    let friends = state.friends.list_friends(&user_id).await?;
    Ok(Json(FriendsResponse {
        friends: friends.into_iter().map(Into::into).collect(),
    }))
}
