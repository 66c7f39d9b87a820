//! Core application infrastructure

pub(crate) mod banner;
pub mod cli;
pub mod config;
pub mod constants;
pub mod shutdown;

pub use crate::app::CoreApp;
pub use cli::{CliConfig, Commands};
pub use config::{AppConfig, AuthConfig, ServerConfig, TransactionalBackend};

// Re-export the service enum from the data layer
pub use crate::data::TransactionalService;

pub use shutdown::ShutdownService;
