// =============================================================================
// Application Identity
// =============================================================================

/// Application name in title case (for display)
pub const APP_NAME: &str = "Playdeck";

/// Application name in lowercase (for paths and identifiers)
pub const APP_NAME_LOWER: &str = "playdeck";

/// Unix-style dotfile folder name
pub const APP_DOT_FOLDER: &str = ".playdeck";

// =============================================================================
// Configuration Files
// =============================================================================

/// Config file name
pub const CONFIG_FILE_NAME: &str = "playdeck.json";

/// Environment variable for config file path
pub const ENV_CONFIG: &str = "PLAYDECK_CONFIG";

// =============================================================================
// Environment Variables - Server
// =============================================================================

/// Environment variable for server host
pub const ENV_HOST: &str = "PLAYDECK_HOST";

/// Environment variable for server port
pub const ENV_PORT: &str = "PLAYDECK_PORT";

/// Environment variable for log level/filter
pub const ENV_LOG: &str = "PLAYDECK_LOG";

/// Environment variable to override data directory
pub const ENV_DATA_DIR: &str = "PLAYDECK_DATA_DIR";

// =============================================================================
// Environment Variables - Auth
// =============================================================================

/// Environment variable for the OIDC issuer URL
pub const ENV_AUTH_ISSUER: &str = "PLAYDECK_AUTH_ISSUER";

/// Environment variable for the expected token audience
pub const ENV_AUTH_AUDIENCE: &str = "PLAYDECK_AUTH_AUDIENCE";

/// Environment variable for the provider JWKS URL
pub const ENV_AUTH_JWKS_URL: &str = "PLAYDECK_AUTH_JWKS_URL";

// =============================================================================
// Environment Variables - Database
// =============================================================================

/// Environment variable for the transactional backend
pub const ENV_TRANSACTIONAL_BACKEND: &str = "PLAYDECK_TRANSACTIONAL_BACKEND";

// =============================================================================
// Server Defaults
// =============================================================================

/// Default server host
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Default server port
pub const DEFAULT_PORT: u16 = 5460;

// =============================================================================
// Local User (--no-auth mode)
// =============================================================================

/// User id for the default local account
pub const DEFAULT_USER_ID: &str = "local";

/// Email for the default local account
pub const DEFAULT_USER_EMAIL: &str = "local@playdeck.local";

/// Display name for the default local account
pub const DEFAULT_USER_NAME: &str = "Local User";

// =============================================================================
// SQLite Database
// =============================================================================

/// SQLite database filename
pub const SQLITE_DB_FILENAME: &str = "playdeck.db";

/// SQLite connection pool max connections
pub const SQLITE_MAX_CONNECTIONS: u32 = 5;

/// SQLite busy timeout in seconds
pub const SQLITE_BUSY_TIMEOUT_SECS: u64 = 30;

/// SQLite cache size (negative = KB, so -64000 = 64MB)
pub const SQLITE_CACHE_SIZE: &str = "-64000";

/// SQLite WAL auto-checkpoint threshold (pages, ~4MB at 1000)
pub const SQLITE_WAL_AUTOCHECKPOINT: &str = "1000";

/// WAL checkpoint interval in seconds (5 minutes)
pub const SQLITE_CHECKPOINT_INTERVAL_SECS: u64 = 300;

// =============================================================================
// Request Body Limits
// =============================================================================

/// Default body limit for API requests (1 MB)
pub const DEFAULT_BODY_LIMIT: usize = 1024 * 1024;

// =============================================================================
// Shutdown
// =============================================================================

/// Maximum time to wait for background tasks during shutdown
pub const SHUTDOWN_TIMEOUT_SECS: u64 = 10;
