//! OpenAPI specification and Swagger UI

use axum::http::header;
use axum::response::{Html, IntoResponse, Json};
use utoipa::OpenApi;

use crate::api::routes::{friends, health, playlists, users};
use crate::data::types::{FriendRequestStatus, PermissionLevel};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Playdeck API",
        version = env!("CARGO_PKG_VERSION"),
        description = "Playlist sharing service"
    ),
    tags(
        (name = "health", description = "Health check endpoint"),
        (name = "users", description = "User accounts and search"),
        (name = "playlists", description = "Playlists, items, and sharing"),
        (name = "friends", description = "Friend requests and friendships")
    ),
    paths(
        // Health
        health::health,
        // Users
        users::create_user,
        users::search_users,
        users::get_user,
        users::list_friends,
        // Playlists
        playlists::list_playlists,
        playlists::create_playlist,
        playlists::get_playlist,
        playlists::delete_playlist,
        playlists::add_item,
        playlists::remove_item,
        playlists::reorder_items,
        playlists::share_playlist,
        playlists::list_permissions,
        playlists::revoke_permission,
        // Friends
        friends::send_request,
        friends::list_requests,
        friends::respond_to_request,
        friends::remove_friend,
    ),
    components(schemas(
        // Health
        health::HealthResponse,
        // Users
        users::types::CreateUserRequest,
        users::types::SearchUsersQuery,
        users::types::UserResponse,
        users::types::SearchUsersResponse,
        users::types::FriendsResponse,
        // Playlists
        PermissionLevel,
        playlists::types::CreatePlaylistRequest,
        playlists::types::AddItemRequest,
        playlists::types::ReorderItemsRequest,
        playlists::types::SharePlaylistRequest,
        playlists::types::PlaylistItemResponse,
        playlists::types::PlaylistResponse,
        playlists::types::ListPlaylistsResponse,
        playlists::types::PermissionResponse,
        playlists::types::ListPermissionsResponse,
        // Friends
        FriendRequestStatus,
        friends::types::SendRequestBody,
        friends::types::RespondRequestBody,
        friends::types::FriendRequestResponse,
        friends::types::ListRequestsResponse,
    ))
)]
pub struct ApiDoc;

/// Serve OpenAPI JSON specification
pub async fn openapi_json() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "application/json")],
        Json(ApiDoc::openapi()),
    )
}

/// Serve Swagger UI from CDN
pub async fn swagger_ui_html() -> Html<&'static str> {
    Html(SWAGGER_UI_HTML)
}

const SWAGGER_UI_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Playdeck API Documentation</title>
    <link rel="stylesheet" type="text/css" href="https://unpkg.com/swagger-ui-dist@5/swagger-ui.css">
    <style>
        html { box-sizing: border-box; overflow-y: scroll; }
        *, *:before, *:after { box-sizing: inherit; }
        body { margin: 0; background: #fafafa; }
    </style>
</head>
<body>
    <div id="swagger-ui"></div>
    <script src="https://unpkg.com/swagger-ui-dist@5/swagger-ui-bundle.js"></script>
    <script src="https://unpkg.com/swagger-ui-dist@5/swagger-ui-standalone-preset.js"></script>
    <script>
        window.onload = () => {
            window.ui = SwaggerUIBundle({
                url: "/api/openapi.json",
                dom_id: '#swagger-ui',
                presets: [
                    SwaggerUIBundle.presets.apis,
                    SwaggerUIStandalonePreset
                ],
                layout: "StandaloneLayout",
                deepLinking: true,
                showExtensions: true,
                showCommonExtensions: true
            });
        };
    </script>
</body>
</html>"#;
