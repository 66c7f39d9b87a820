//! API server initialization

use std::net::SocketAddr;

use anyhow::Result;
use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::routing::get;
use tokio::net::TcpListener;
use tower_http::compression::CompressionLayer;
use tower_http::trace::TraceLayer;

use super::auth::{AuthState, require_auth};
use super::middleware::{self, AllowedOrigins};
use super::openapi::{openapi_json, swagger_ui_html};
use super::routes::{friends, health, playlists, users};
use crate::core::CoreApp;
use crate::core::constants::DEFAULT_BODY_LIMIT;

pub struct ApiServer {
    app: CoreApp,
    allowed_origins: AllowedOrigins,
}

impl ApiServer {
    pub fn new(app: CoreApp) -> Self {
        let allowed_origins = AllowedOrigins::new(
            &app.config.server.host,
            app.config.server.port,
            &app.config.cors.allowed_origins,
        );

        Self {
            app,
            allowed_origins,
        }
    }

    /// Returns CoreApp for graceful shutdown
    pub async fn start(self) -> Result<CoreApp> {
        let Self {
            app,
            allowed_origins,
        } = self;

        // Clone shutdown before moving app
        let shutdown = app.shutdown.clone();

        let host = app.config.server.host.clone();
        let port = app.config.server.port;
        let addr = SocketAddr::new(host.parse()?, port);

        let auth_state = AuthState {
            auth_manager: app.auth.clone(),
        };

        let users_routes = users::routes(app.users.clone(), app.friends.clone()).layer(
            axum::middleware::from_fn_with_state(auth_state.clone(), require_auth),
        );
        let playlists_routes = playlists::routes(app.playlists.clone(), app.sharing.clone())
            .layer(axum::middleware::from_fn_with_state(
                auth_state.clone(),
                require_auth,
            ));
        let friend_request_routes = friends::request_routes(app.friends.clone()).layer(
            axum::middleware::from_fn_with_state(auth_state.clone(), require_auth),
        );
        let friendship_routes = friends::friendship_routes(app.friends.clone()).layer(
            axum::middleware::from_fn_with_state(auth_state, require_auth),
        );

        let router = Router::new()
            .route("/api/v1/health", get(health::health))
            .route("/api/openapi.json", get(openapi_json))
            .route("/api/docs", get(swagger_ui_html))
            .route("/api/docs/", get(swagger_ui_html))
            .nest("/api/v1/users", users_routes)
            .nest("/api/v1/playlists", playlists_routes)
            .nest("/api/v1/friend-requests", friend_request_routes)
            .nest("/api/v1/friends", friendship_routes)
            .fallback(middleware::handle_404)
            .layer(TraceLayer::new_for_http())
            .layer(CompressionLayer::new())
            .layer(middleware::cors(&allowed_origins))
            .layer(DefaultBodyLimit::max(DEFAULT_BODY_LIMIT));

        let listener = TcpListener::bind(addr).await?;
        tracing::info!("API server listening on http://{}", addr);
        axum::serve(
            listener,
            router.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .with_graceful_shutdown(shutdown.wait())
        .await?;

        Ok(app)
    }
}
