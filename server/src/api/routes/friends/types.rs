//! Friends API types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::data::types::FriendRequestStatus;
use crate::domain::friends::RequestWithUser;

/// Request body for sending a friend request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct SendRequestBody {
    #[validate(length(min = 1, max = 256, message = "to_user_id must be 1-256 characters"))]
    pub to_user_id: String,
}

/// Request body for responding to a friend request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RespondRequestBody {
    pub accept: bool,
}

/// A friend request
#[derive(Debug, Serialize, ToSchema)]
pub struct FriendRequestResponse {
    pub id: String,
    pub from_user_id: String,
    pub to_user_id: String,
    /// Display name of the other party, absent when their account is gone
    #[serde(skip_serializing_if = "Option::is_none")]
    pub counterpart_name: Option<String>,
    pub status: FriendRequestStatus,
    pub created_at: DateTime<Utc>,
    pub responded_at: Option<DateTime<Utc>>,
}

impl FriendRequestResponse {
    pub fn from_row(row: crate::data::types::FriendRequestRow) -> Self {
        Self {
            id: row.id,
            from_user_id: row.from_user_id,
            to_user_id: row.to_user_id,
            counterpart_name: None,
            status: row.status,
            created_at: DateTime::from_timestamp(row.created_at, 0).unwrap_or_default(),
            responded_at: row
                .responded_at
                .and_then(|ts| DateTime::from_timestamp(ts, 0)),
        }
    }
}

impl From<RequestWithUser> for FriendRequestResponse {
    fn from(entry: RequestWithUser) -> Self {
        let mut response = Self::from_row(entry.request);
        response.counterpart_name = entry.counterpart_name;
        response
    }
}

/// Pending friend requests for the caller, split by direction
#[derive(Debug, Serialize, ToSchema)]
pub struct ListRequestsResponse {
    pub sent: Vec<FriendRequestResponse>,
    pub received: Vec<FriendRequestResponse>,
}
