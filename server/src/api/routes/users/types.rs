//! Users API types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::data::types::UserRow;

/// Request body for creating the caller's account.
///
/// Both fields default to the identity carried by the access token.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateUserRequest {
    #[validate(
        email(message = "Email must be a valid address"),
        length(max = 320, message = "Email must be at most 320 characters")
    )]
    pub email: Option<String>,

    #[validate(length(max = 128, message = "Display name must be at most 128 characters"))]
    pub display_name: Option<String>,
}

/// Query parameters for user search
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct SearchUsersQuery {
    #[validate(length(min = 1, max = 128, message = "q must be 1-128 characters"))]
    pub q: String,
}

/// A user profile
#[derive(Debug, Serialize, ToSchema)]
pub struct UserResponse {
    pub id: String,
    pub email: String,
    pub display_name: String,
    pub created_at: DateTime<Utc>,
}

impl From<UserRow> for UserResponse {
    fn from(row: UserRow) -> Self {
        Self {
            id: row.id,
            email: row.email,
            display_name: row.display_name,
            created_at: DateTime::from_timestamp(row.created_at, 0).unwrap_or_default(),
        }
    }
}

/// Response for user search
#[derive(Debug, Serialize, ToSchema)]
pub struct SearchUsersResponse {
    pub users: Vec<UserResponse>,
}

/// Response for listing a user's friends
#[derive(Debug, Serialize, ToSchema)]
pub struct FriendsResponse {
    pub friends: Vec<UserResponse>,
}
