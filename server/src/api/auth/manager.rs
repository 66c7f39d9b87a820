//! Authentication manager

use anyhow::Result;

use super::jwt::{IdentityClaims, JwtError, token_key_id, validate_access_token};
use super::keys::KeyStore;
use crate::core::config::AuthConfig;

/// Main authentication manager
pub struct AuthManager {
    enabled: bool,
    issuer: String,
    audience: String,
    keys: Option<KeyStore>,
}

impl AuthManager {
    /// Initialize the authentication manager
    pub fn init(config: &AuthConfig) -> Result<Self> {
        if !config.enabled {
            tracing::warn!("Authentication DISABLED - all requests use the local user");
            return Ok(Self {
                enabled: false,
                issuer: String::new(),
                audience: String::new(),
                keys: None,
            });
        }

        let issuer = config
            .issuer
            .clone()
            .ok_or_else(|| anyhow::anyhow!("auth.issuer is required when auth is enabled"))?;
        let audience = config
            .audience
            .clone()
            .ok_or_else(|| anyhow::anyhow!("auth.audience is required when auth is enabled"))?;
        let jwks_url = config
            .jwks_url
            .clone()
            .ok_or_else(|| anyhow::anyhow!("auth.jwks_url is required when auth is enabled"))?;

        tracing::debug!(issuer = %issuer, "Authentication enabled");
        Ok(Self {
            enabled: true,
            issuer,
            audience,
            keys: Some(KeyStore::new(jwks_url)),
        })
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Validate a bearer token and return its identity claims
    pub async fn authenticate(&self, token: &str) -> Result<IdentityClaims, JwtError> {
        let keys = self
            .keys
            .as_ref()
            .ok_or_else(|| JwtError::Invalid("authentication is disabled".to_string()))?;
        let kid = token_key_id(token)?;
        let key = keys.decoding_key(&kid).await?;
        validate_access_token(token, &key, &self.issuer, &self.audience)
    }
}
