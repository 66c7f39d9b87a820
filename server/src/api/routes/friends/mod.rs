//! Friends API endpoints

pub mod types;

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{delete, get, put};
use axum::{Json, Router};

use types::{
    FriendRequestResponse, ListRequestsResponse, RespondRequestBody, SendRequestBody,
};

use crate::api::auth::Auth;
use crate::api::extractors::ValidatedJson;
use crate::api::types::ApiError;
use crate::domain::FriendService;

/// Shared state for Friends API endpoints
#[derive(Clone)]
pub struct FriendsApiState {
    pub friends: Arc<FriendService>,
}

/// Build friend request routes (mounted at /friend-requests)
pub fn request_routes(friends: Arc<FriendService>) -> Router<()> {
    let state = FriendsApiState { friends };

    Router::new()
        .route("/", get(list_requests).post(send_request))
        .route("/{request_id}", put(respond_to_request))
        .with_state(state)
}

/// Build friendship routes (mounted at /friends)
pub fn friendship_routes(friends: Arc<FriendService>) -> Router<()> {
    let state = FriendsApiState { friends };

    Router::new()
        .route("/{friend_id}", delete(remove_friend))
        .with_state(state)
}

/// Send a friend request
#[utoipa::path(
    post,
    path = "/api/v1/friend-requests",
    tag = "friends",
    request_body = SendRequestBody,
    responses(
        (status = 201, description = "Request sent", body = FriendRequestResponse),
        (status = 400, description = "Invalid request"),
        (status = 404, description = "Target user not found"),
        (status = 409, description = "Already friends or request pending")
    )
)]
pub async fn send_request(
    State(state): State<FriendsApiState>,
    Auth(auth): Auth,
    ValidatedJson(body): ValidatedJson<SendRequestBody>,
) -> Result<(StatusCode, Json<FriendRequestResponse>), ApiError> {
    let request = state
        .friends
        .send_request(auth.user_id(), &body.to_user_id)
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(FriendRequestResponse::from_row(request)),
    ))
}

/// List the caller's pending friend requests
#[utoipa::path(
    get,
    path = "/api/v1/friend-requests",
    tag = "friends",
    responses(
        (status = 200, description = "Pending requests", body = ListRequestsResponse)
    )
)]
pub async fn list_requests(
    State(state): State<FriendsApiState>,
    Auth(auth): Auth,
) -> Result<Json<ListRequestsResponse>, ApiError> {
    let inbox = state.friends.list_requests(auth.user_id()).await?;
    Ok(Json(ListRequestsResponse {
        sent: inbox.sent.into_iter().map(Into::into).collect(),
        received: inbox.received.into_iter().map(Into::into).collect(),
    }))
}

/// Accept or decline a friend request. Recipient only.
#[utoipa::path(
    put,
    path = "/api/v1/friend-requests/{request_id}",
    tag = "friends",
    request_body = RespondRequestBody,
    params(
        ("request_id" = String, Path, description = "Friend request ID")
    ),
    responses(
        (status = 200, description = "Request resolved", body = FriendRequestResponse),
        (status = 403, description = "Only the recipient can respond"),
        (status = 404, description = "Request not found"),
        (status = 409, description = "Request already resolved")
    )
)]
pub async fn respond_to_request(
    State(state): State<FriendsApiState>,
    Auth(auth): Auth,
    Path(request_id): Path<String>,
    ValidatedJson(body): ValidatedJson<RespondRequestBody>,
) -> Result<Json<FriendRequestResponse>, ApiError> {
    let request = state
        .friends
        .respond(auth.user_id(), &request_id, body.accept)
        .await?;
    Ok(Json(FriendRequestResponse::from_row(request)))
}

/// Remove a friend
#[utoipa::path(
    delete,
    path = "/api/v1/friends/{friend_id}",
    tag = "friends",
    params(
        ("friend_id" = String, Path, description = "Friend's user ID")
    ),
    responses(
        (status = 204, description = "Friendship removed"),
        (status = 400, description = "Users are not friends"),
        (status = 404, description = "User not found")
    )
)]
pub async fn remove_friend(
    State(state): State<FriendsApiState>,
    Auth(auth): Auth,
    Path(friend_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    state
        .friends
        .remove_friend(auth.user_id(), &friend_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
