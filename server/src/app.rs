//! Core application

use std::sync::Arc;

use anyhow::Result;

use crate::api::{ApiServer, AuthManager};
use crate::core::banner;
use crate::core::cli::{self, CliConfig, Commands};
use crate::core::config::AppConfig;
use crate::core::constants::{APP_NAME_LOWER, ENV_LOG};
use crate::core::shutdown::ShutdownService;
use crate::data::TransactionalService;
use crate::domain::{FriendService, PlaylistService, SharingService, UserService};

pub struct CoreApp {
    pub shutdown: ShutdownService,
    pub config: AppConfig,
    pub database: Arc<TransactionalService>,
    pub auth: Arc<AuthManager>,
    pub users: Arc<UserService>,
    pub friends: Arc<FriendService>,
    pub playlists: Arc<PlaylistService>,
    pub sharing: Arc<SharingService>,
}

impl CoreApp {
    /// Run the application with CLI argument parsing
    pub async fn run() -> Result<()> {
        dotenvy::dotenv().ok();
        Self::init_logging();

        tracing::debug!("Application starting");

        let (cli_config, command) = cli::parse();
        tracing::trace!(command = ?command, "Parsed command");

        match command {
            Some(Commands::Start) | None => {}
        }

        let app = Self::init(&cli_config).await?;
        Self::start_server(app).await
    }

    async fn init(cli: &CliConfig) -> Result<Self> {
        let config = AppConfig::load(cli)?;

        let database = Arc::new(
            TransactionalService::init(config.database.transactional, &config.database.path)
                .await?,
        );

        tracing::debug!(backend = database.backend_name(), "Database initialized");

        let users = Arc::new(UserService::new(database.clone()));
        let friends = Arc::new(FriendService::new(database.clone()));
        let playlists = Arc::new(PlaylistService::new(database.clone()));
        let sharing = Arc::new(SharingService::new(database.clone()));

        let auth = Arc::new(AuthManager::init(&config.auth)?);
        let shutdown = ShutdownService::new(database.clone());

        Ok(Self {
            config,
            database,
            auth,
            users,
            friends,
            playlists,
            sharing,
            shutdown,
        })
    }

    fn init_logging() {
        let default_filter = format!("info,{}=info", APP_NAME_LOWER);

        let filter = std::env::var(ENV_LOG)
            .or_else(|_| std::env::var("RUST_LOG"))
            .unwrap_or(default_filter);

        tracing_subscriber::fmt()
            .with_target(false)
            .with_thread_ids(false)
            .with_level(true)
            .with_ansi(true)
            .compact()
            .with_env_filter(filter)
            .init();
    }

    async fn start_server(app: Self) -> Result<()> {
        // Install signal handlers FIRST (before any blocking calls)
        app.shutdown.install_signal_handlers();

        app.start_background_tasks().await;

        banner::print_banner(
            &app.config.server.host,
            app.config.server.port,
            app.auth.is_enabled(),
            &app.config.database.path.display().to_string(),
        );

        let server = ApiServer::new(app);
        let app = server.start().await?;
        app.shutdown.shutdown().await;

        Ok(())
    }

    pub async fn start_background_tasks(&self) {
        if let Some(handle) = self.database.start_checkpoint_task(self.shutdown.subscribe()) {
            self.shutdown.register(handle).await;
        }

        tracing::debug!("Background tasks started");
    }
}
