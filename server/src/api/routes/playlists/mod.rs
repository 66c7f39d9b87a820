//! Playlists API endpoints

pub mod types;

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{delete, get, post, put};
use axum::{Json, Router};

use types::{
    AddItemRequest, CreatePlaylistRequest, ListPermissionsResponse, ListPlaylistsResponse,
    PermissionResponse, PlaylistItemResponse, PlaylistResponse, ReorderItemsRequest,
    SharePlaylistRequest,
};

use crate::api::auth::Auth;
use crate::api::extractors::ValidatedJson;
use crate::api::types::ApiError;
use crate::data::types::PermissionLevel;
use crate::domain::{PlaylistService, SharingService};

/// Shared state for Playlists API endpoints
#[derive(Clone)]
pub struct PlaylistsApiState {
    pub playlists: Arc<PlaylistService>,
    pub sharing: Arc<SharingService>,
}

/// Build Playlists API routes
pub fn routes(playlists: Arc<PlaylistService>, sharing: Arc<SharingService>) -> Router<()> {
    let state = PlaylistsApiState { playlists, sharing };

    Router::new()
        .route("/", get(list_playlists).post(create_playlist))
        .route("/{playlist_id}", get(get_playlist).delete(delete_playlist))
        .route("/{playlist_id}/items", post(add_item))
        .route("/{playlist_id}/items/order", put(reorder_items))
        .route("/{playlist_id}/items/{item_id}", delete(remove_item))
        .route("/{playlist_id}/share", post(share_playlist))
        .route("/{playlist_id}/permissions", get(list_permissions))
        .route(
            "/{playlist_id}/permissions/{user_id}",
            delete(revoke_permission),
        )
        .with_state(state)
}

/// Path parameters for item routes
#[derive(serde::Deserialize)]
pub struct ItemPath {
    pub playlist_id: String,
    pub item_id: String,
}

/// Path parameters for permission routes
#[derive(serde::Deserialize)]
pub struct PermissionPath {
    pub playlist_id: String,
    pub user_id: String,
}

/// List the caller's owned and shared playlists
#[utoipa::path(
    get,
    path = "/api/v1/playlists",
    tag = "playlists",
    responses(
        (status = 200, description = "Owned and shared playlists", body = ListPlaylistsResponse)
    )
)]
pub async fn list_playlists(
    State(state): State<PlaylistsApiState>,
    Auth(auth): Auth,
) -> Result<Json<ListPlaylistsResponse>, ApiError> {
    let overview = state.playlists.list_playlists(auth.user_id()).await?;
    Ok(Json(overview.into()))
}

/// Create a playlist
#[utoipa::path(
    post,
    path = "/api/v1/playlists",
    tag = "playlists",
    request_body = CreatePlaylistRequest,
    responses(
        (status = 201, description = "Playlist created", body = PlaylistResponse),
        (status = 400, description = "Invalid request")
    )
)]
pub async fn create_playlist(
    State(state): State<PlaylistsApiState>,
    Auth(auth): Auth,
    ValidatedJson(body): ValidatedJson<CreatePlaylistRequest>,
) -> Result<(StatusCode, Json<PlaylistResponse>), ApiError> {
    let playlist = state
        .playlists
        .create_playlist(
            auth.user_id(),
            &body.title,
            body.description.as_deref(),
            body.is_public,
        )
        .await?;
    Ok((StatusCode::CREATED, Json(playlist.into())))
}

/// Get a playlist with its items
#[utoipa::path(
    get,
    path = "/api/v1/playlists/{playlist_id}",
    tag = "playlists",
    params(
        ("playlist_id" = String, Path, description = "Playlist ID")
    ),
    responses(
        (status = 200, description = "Playlist", body = PlaylistResponse),
        (status = 403, description = "Access denied"),
        (status = 404, description = "Playlist not found")
    )
)]
pub async fn get_playlist(
    State(state): State<PlaylistsApiState>,
    Auth(auth): Auth,
    Path(playlist_id): Path<String>,
) -> Result<Json<PlaylistResponse>, ApiError> {
    let playlist = state
        .playlists
        .get_playlist(auth.user_id(), &playlist_id)
        .await?;
    Ok(Json(playlist.into()))
}

/// Delete a playlist. Owner only.
#[utoipa::path(
    delete,
    path = "/api/v1/playlists/{playlist_id}",
    tag = "playlists",
    params(
        ("playlist_id" = String, Path, description = "Playlist ID")
    ),
    responses(
        (status = 204, description = "Playlist deleted"),
        (status = 403, description = "Only the owner can delete"),
        (status = 404, description = "Playlist not found")
    )
)]
pub async fn delete_playlist(
    State(state): State<PlaylistsApiState>,
    Auth(auth): Auth,
    Path(playlist_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    state
        .playlists
        .delete_playlist(auth.user_id(), &playlist_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Append an item to a playlist
#[utoipa::path(
    post,
    path = "/api/v1/playlists/{playlist_id}/items",
    tag = "playlists",
    request_body = AddItemRequest,
    params(
        ("playlist_id" = String, Path, description = "Playlist ID")
    ),
    responses(
        (status = 201, description = "Item added", body = PlaylistItemResponse),
        (status = 400, description = "Invalid request"),
        (status = 403, description = "Edit access required"),
        (status = 404, description = "Playlist not found")
    )
)]
pub async fn add_item(
    State(state): State<PlaylistsApiState>,
    Auth(auth): Auth,
    Path(playlist_id): Path<String>,
    ValidatedJson(body): ValidatedJson<AddItemRequest>,
) -> Result<(StatusCode, Json<PlaylistItemResponse>), ApiError> {
    let item = state
        .playlists
        .add_item(
            auth.user_id(),
            &playlist_id,
            &body.title,
            body.artist.as_deref(),
            &body.url,
        )
        .await?;
    Ok((StatusCode::CREATED, Json(item.into())))
}

/// Remove an item from a playlist
#[utoipa::path(
    delete,
    path = "/api/v1/playlists/{playlist_id}/items/{item_id}",
    tag = "playlists",
    params(
        ("playlist_id" = String, Path, description = "Playlist ID"),
        ("item_id" = String, Path, description = "Item ID")
    ),
    responses(
        (status = 204, description = "Item removed"),
        (status = 403, description = "Edit access required"),
        (status = 404, description = "Playlist or item not found")
    )
)]
pub async fn remove_item(
    State(state): State<PlaylistsApiState>,
    Auth(auth): Auth,
    Path(path): Path<ItemPath>,
) -> Result<StatusCode, ApiError> {
    state
        .playlists
        .remove_item(auth.user_id(), &path.playlist_id, &path.item_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Reorder playlist items
#[utoipa::path(
    put,
    path = "/api/v1/playlists/{playlist_id}/items/order",
    tag = "playlists",
    request_body = ReorderItemsRequest,
    params(
        ("playlist_id" = String, Path, description = "Playlist ID")
    ),
    responses(
        (status = 200, description = "Reordered playlist", body = PlaylistResponse),
        (status = 400, description = "Order does not match the current item set"),
        (status = 403, description = "Edit access required"),
        (status = 404, description = "Playlist not found")
    )
)]
pub async fn reorder_items(
    State(state): State<PlaylistsApiState>,
    Auth(auth): Auth,
    Path(playlist_id): Path<String>,
    ValidatedJson(body): ValidatedJson<ReorderItemsRequest>,
) -> Result<Json<PlaylistResponse>, ApiError> {
    let playlist = state
        .playlists
        .reorder_items(auth.user_id(), &playlist_id, &body.item_order)
        .await?;
    Ok(Json(playlist.into()))
}

/// Share a playlist with another user
#[utoipa::path(
    post,
    path = "/api/v1/playlists/{playlist_id}/share",
    tag = "playlists",
    request_body = SharePlaylistRequest,
    params(
        ("playlist_id" = String, Path, description = "Playlist ID")
    ),
    responses(
        (status = 201, description = "Permission granted", body = PermissionResponse),
        (status = 400, description = "Invalid request"),
        (status = 403, description = "Admin access required"),
        (status = 404, description = "Playlist or user not found"),
        (status = 409, description = "User already has a permission")
    )
)]
pub async fn share_playlist(
    State(state): State<PlaylistsApiState>,
    Auth(auth): Auth,
    Path(playlist_id): Path<String>,
    ValidatedJson(body): ValidatedJson<SharePlaylistRequest>,
) -> Result<(StatusCode, Json<PermissionResponse>), ApiError> {
    let level = PermissionLevel::parse(&body.level).ok_or_else(|| {
        ApiError::bad_request("VALIDATION_ERROR", "Level must be one of: view, edit, admin")
    })?;
    let permission = state
        .sharing
        .share_playlist(auth.user_id(), &playlist_id, &body.user_id, level)
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(PermissionResponse::from_row(permission, None)),
    ))
}

/// List permissions on a playlist
#[utoipa::path(
    get,
    path = "/api/v1/playlists/{playlist_id}/permissions",
    tag = "playlists",
    params(
        ("playlist_id" = String, Path, description = "Playlist ID")
    ),
    responses(
        (status = 200, description = "Granted permissions", body = ListPermissionsResponse),
        (status = 403, description = "Access denied"),
        (status = 404, description = "Playlist not found")
    )
)]
pub async fn list_permissions(
    State(state): State<PlaylistsApiState>,
    Auth(auth): Auth,
    Path(playlist_id): Path<String>,
) -> Result<Json<ListPermissionsResponse>, ApiError> {
    let permissions = state
        .sharing
        .list_permissions(auth.user_id(), &playlist_id)
        .await?;
    Ok(Json(ListPermissionsResponse {
        permissions: permissions
            .into_iter()
            .map(|(p, u)| PermissionResponse::from_row(p, u))
            .collect(),
    }))
}

/// Revoke a user's permission on a playlist
#[utoipa::path(
    delete,
    path = "/api/v1/playlists/{playlist_id}/permissions/{user_id}",
    tag = "playlists",
    params(
        ("playlist_id" = String, Path, description = "Playlist ID"),
        ("user_id" = String, Path, description = "User whose permission to revoke")
    ),
    responses(
        (status = 204, description = "Permission revoked (idempotent)"),
        (status = 403, description = "Admin access required"),
        (status = 404, description = "Playlist not found")
    )
)]
pub async fn revoke_permission(
    State(state): State<PlaylistsApiState>,
    Auth(auth): Auth,
    Path(path): Path<PermissionPath>,
) -> Result<StatusCode, ApiError> {
    state
        .sharing
        .revoke_permission(auth.user_id(), &path.playlist_id, &path.user_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
