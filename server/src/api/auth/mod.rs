//! Authentication module

mod context;
mod extractors;
pub mod jwt;
mod keys;
mod manager;
pub mod middleware;

pub use context::AuthContext;
pub use extractors::Auth;
pub use manager::AuthManager;
pub use middleware::{AuthError, AuthState, require_auth};
