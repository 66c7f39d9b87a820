//! Bearer token validation
//!
//! Access tokens are RS256-signed JWTs from the configured OpenID
//! Connect provider. The stable user id is the `oid` claim when
//! present, otherwise `sub`.

use std::fmt;

use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode, decode_header};
use serde::{Deserialize, Serialize};

/// JWT validation error
#[derive(Debug)]
pub enum JwtError {
    /// Token signature has expired
    Expired,
    /// Token signature is invalid
    InvalidSignature,
    /// Token header carries no key id
    MissingKeyId,
    /// No published signing key matches the token's key id
    UnknownKey(String),
    /// Signing keys could not be fetched from the provider
    KeyFetch(String),
    /// Other validation error
    Invalid(String),
}

impl fmt::Display for JwtError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Expired => write!(f, "Access token has expired"),
            Self::InvalidSignature => write!(f, "Invalid access token signature"),
            Self::MissingKeyId => write!(f, "Access token header has no key id"),
            Self::UnknownKey(kid) => write!(f, "No signing key matches kid: {}", kid),
            Self::KeyFetch(msg) => write!(f, "Failed to fetch signing keys: {}", msg),
            Self::Invalid(msg) => write!(f, "Invalid access token: {}", msg),
        }
    }
}

impl std::error::Error for JwtError {}

/// Claims carried by provider-issued access tokens
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdentityClaims {
    pub sub: String,
    /// Directory object id, preferred over `sub` when present
    #[serde(default)]
    pub oid: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub preferred_username: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    pub exp: i64,
}

impl IdentityClaims {
    /// Stable user identifier: `oid` when present, otherwise `sub`
    pub fn user_id(&self) -> &str {
        self.oid.as_deref().unwrap_or(&self.sub)
    }

    /// Email from the `email` claim, falling back to `preferred_username`
    pub fn email(&self) -> Option<&str> {
        self.email.as_deref().or(self.preferred_username.as_deref())
    }

    /// Human-readable name, falling back through the identity claims
    pub fn display_name(&self) -> &str {
        if let Some(name) = self.name.as_deref() {
            return name;
        }
        if let Some(username) = self.preferred_username.as_deref() {
            return username;
        }
        self.email
            .as_deref()
            .and_then(|e| e.split('@').next())
            .unwrap_or_else(|| self.user_id())
    }
}

/// Extract the `kid` from a token header without verifying it
pub fn token_key_id(token: &str) -> Result<String, JwtError> {
    let header = decode_header(token).map_err(|e| JwtError::Invalid(e.to_string()))?;
    header.kid.ok_or(JwtError::MissingKeyId)
}

/// Validate and decode a provider-issued access token
pub fn validate_access_token(
    token: &str,
    key: &DecodingKey,
    issuer: &str,
    audience: &str,
) -> Result<IdentityClaims, JwtError> {
    let mut validation = Validation::new(Algorithm::RS256);
    validation.validate_exp = true;
    validation.set_issuer(&[issuer]);
    validation.set_audience(&[audience]);

    let token_data = decode::<IdentityClaims>(token, key, &validation).map_err(|e| {
        match e.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => JwtError::Expired,
            jsonwebtoken::errors::ErrorKind::InvalidSignature => JwtError::InvalidSignature,
            _ => JwtError::Invalid(e.to_string()),
        }
    })?;

    Ok(token_data.claims)
}
