//! Authentication context

use crate::core::constants::{DEFAULT_USER_EMAIL, DEFAULT_USER_ID, DEFAULT_USER_NAME};

/// Identity of the authenticated caller, injected into request
/// extensions by the auth middleware.
#[derive(Debug, Clone)]
pub enum AuthContext {
    /// Bearer-token authenticated user
    Session {
        user_id: String,
        email: Option<String>,
        display_name: String,
    },
    /// Default local user (--no-auth mode)
    LocalDefault,
}

impl AuthContext {
    pub fn user_id(&self) -> &str {
        match self {
            Self::Session { user_id, .. } => user_id,
            Self::LocalDefault => DEFAULT_USER_ID,
        }
    }

    /// Email from the token, if it carried one
    pub fn email(&self) -> Option<&str> {
        match self {
            Self::Session { email, .. } => email.as_deref(),
            Self::LocalDefault => Some(DEFAULT_USER_EMAIL),
        }
    }

    pub fn display_name(&self) -> &str {
        match self {
            Self::Session { display_name, .. } => display_name,
            Self::LocalDefault => DEFAULT_USER_NAME,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_local_default_identity() {
        let ctx = AuthContext::LocalDefault;
        assert_eq!(ctx.user_id(), DEFAULT_USER_ID);
        assert_eq!(ctx.email(), Some(DEFAULT_USER_EMAIL));
        assert_eq!(ctx.display_name(), DEFAULT_USER_NAME);
    }

    #[test]
    fn test_session_identity() {
        let ctx = AuthContext::Session {
            user_id: "u1".to_string(),
            email: None,
            display_name: "Jo".to_string(),
        };
        assert_eq!(ctx.user_id(), "u1");
        assert_eq!(ctx.email(), None);
        assert_eq!(ctx.display_name(), "Jo");
    }
}
