//! Friend relationships
//!
//! Friendship is symmetric and established through a request/response
//! handshake. Pending requests block duplicates in both directions;
//! only the recipient may accept or decline.

use std::sync::Arc;

use crate::data::TransactionalService;
use crate::data::types::{FriendRequestRow, FriendRequestStatus, UserRow};
use crate::domain::error::DomainError;

/// A request joined with the counterpart's display name, which may be
/// missing when the account no longer exists.
pub struct RequestWithUser {
    pub request: FriendRequestRow,
    pub counterpart_name: Option<String>,
}

/// Pending requests involving one user, split by direction
pub struct RequestInbox {
    pub sent: Vec<RequestWithUser>,
    pub received: Vec<RequestWithUser>,
}

pub struct FriendService {
    database: Arc<TransactionalService>,
}

impl FriendService {
    pub fn new(database: Arc<TransactionalService>) -> Self {
        Self { database }
    }

    /// Send a friend request from `user_id` to `to_user_id`
    pub async fn send_request(
        &self,
        user_id: &str,
        to_user_id: &str,
    ) -> Result<FriendRequestRow, DomainError> {
        if user_id == to_user_id {
            return Err(DomainError::validation(
                "Cannot send a friend request to yourself",
            ));
        }

        let repo = self.database.repository();
        let sender = repo
            .get_user(user_id)
            .await?
            .ok_or_else(|| DomainError::not_found("User not found"))?;
        if repo.get_user(to_user_id).await?.is_none() {
            return Err(DomainError::not_found("Target user not found"));
        }

        if sender.friends.iter().any(|f| f == to_user_id) {
            return Err(DomainError::conflict("Users are already friends"));
        }
        if repo
            .find_pending_request_between(user_id, to_user_id)
            .await?
            .is_some()
        {
            return Err(DomainError::conflict(
                "A friend request between these users is already pending",
            ));
        }

        let request = repo.create_friend_request(user_id, to_user_id).await?;
        tracing::debug!(request_id = %request.id, to_user_id = %to_user_id, "Friend request sent");
        Ok(request)
    }

    /// Accept or decline a pending request. Recipient only; accepting
    /// links both users symmetrically.
    pub async fn respond(
        &self,
        user_id: &str,
        request_id: &str,
        accept: bool,
    ) -> Result<FriendRequestRow, DomainError> {
        let repo = self.database.repository();
        let mut request = repo
            .get_friend_request(request_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Friend request not found"))?;

        if request.to_user_id != user_id {
            return Err(DomainError::forbidden(
                "Only the recipient can respond to a friend request",
            ));
        }
        if request.status != FriendRequestStatus::Pending {
            return Err(DomainError::conflict(
                "Friend request has already been resolved",
            ));
        }

        let status = if accept {
            FriendRequestStatus::Accepted
        } else {
            FriendRequestStatus::Declined
        };
        let responded_at = chrono::Utc::now().timestamp();
        repo.update_friend_request_status(request_id, status, responded_at)
            .await?;

        if accept {
            repo.add_friend_pair(&request.from_user_id, &request.to_user_id)
                .await?;
        }

        request.status = status;
        request.responded_at = Some(responded_at);
        tracing::debug!(request_id = %request_id, status = %status, "Friend request resolved");
        Ok(request)
    }

    /// Unlink two friends. Fails when they are not currently friends.
    pub async fn remove_friend(
        &self,
        user_id: &str,
        friend_id: &str,
    ) -> Result<(), DomainError> {
        let repo = self.database.repository();
        let user = repo
            .get_user(user_id)
            .await?
            .ok_or_else(|| DomainError::not_found("User not found"))?;
        if repo.get_user(friend_id).await?.is_none() {
            return Err(DomainError::not_found("Friend not found"));
        }
        if !user.friends.iter().any(|f| f == friend_id) {
            return Err(DomainError::validation("Users are not friends"));
        }

        repo.remove_friend_pair(user_id, friend_id).await?;
        Ok(())
    }

    /// The user's friends as full records, skipping deleted accounts
    pub async fn list_friends(&self, user_id: &str) -> Result<Vec<UserRow>, DomainError> {
        let repo = self.database.repository();
        let user = repo
            .get_user(user_id)
            .await?
            .ok_or_else(|| DomainError::not_found("User not found"))?;
        Ok(repo.get_users_by_ids(&user.friends).await?)
    }

    /// Pending requests sent by and received by the user
    pub async fn list_requests(&self, user_id: &str) -> Result<RequestInbox, DomainError> {
        let repo = self.database.repository();
        let sent = repo.list_pending_requests_from(user_id).await?;
        let received = repo.list_pending_requests_to(user_id).await?;

        let mut counterpart_ids: Vec<String> = sent
            .iter()
            .map(|r| r.to_user_id.clone())
            .chain(received.iter().map(|r| r.from_user_id.clone()))
            .collect();
        counterpart_ids.dedup();
        let users = repo.get_users_by_ids(&counterpart_ids).await?;
        let name_of = |id: &str| {
            users
                .iter()
                .find(|u| u.id == id)
                .map(|u| u.display_name.clone())
        };

        Ok(RequestInbox {
            sent: sent
                .into_iter()
                .map(|r| RequestWithUser {
                    counterpart_name: name_of(&r.to_user_id),
                    request: r,
                })
                .collect(),
            received: received
                .into_iter()
                .map(|r| RequestWithUser {
                    counterpart_name: name_of(&r.from_user_id),
                    request: r,
                })
                .collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::TransactionalBackend;

    async fn make_service() -> (FriendService, Arc<TransactionalService>) {
        let database = Arc::new(
            TransactionalService::init(TransactionalBackend::Memory, std::path::Path::new(""))
                .await
                .unwrap(),
        );
        let repo = database.repository();
        repo.create_user("alice", "alice@example.com", "Alice")
            .await
            .unwrap();
        repo.create_user("bob", "bob@example.com", "Bob")
            .await
            .unwrap();
        repo.create_user("carol", "carol@example.com", "Carol")
            .await
            .unwrap();
        (FriendService::new(database.clone()), database)
    }

    #[tokio::test]
    async fn test_send_and_accept_links_both_users() {
        let (service, db) = make_service().await;
        let request = service.send_request("alice", "bob").await.unwrap();
        assert_eq!(request.status, FriendRequestStatus::Pending);

        let resolved = service.respond("bob", &request.id, true).await.unwrap();
        assert_eq!(resolved.status, FriendRequestStatus::Accepted);
        assert!(resolved.responded_at.is_some());

        let alice = db.repository().get_user("alice").await.unwrap().unwrap();
        let bob = db.repository().get_user("bob").await.unwrap().unwrap();
        assert!(alice.friends.contains(&"bob".to_string()));
        assert!(bob.friends.contains(&"alice".to_string()));
    }

    #[tokio::test]
    async fn test_decline_leaves_no_friendship() {
        let (service, db) = make_service().await;
        let request = service.send_request("alice", "bob").await.unwrap();
        let resolved = service.respond("bob", &request.id, false).await.unwrap();
        assert_eq!(resolved.status, FriendRequestStatus::Declined);

        let alice = db.repository().get_user("alice").await.unwrap().unwrap();
        assert!(alice.friends.is_empty());
    }

    #[tokio::test]
    async fn test_self_request_rejected() {
        let (service, _db) = make_service().await;
        let err = service.send_request("alice", "alice").await;
        assert!(matches!(err, Err(DomainError::Validation(_))));
    }

    #[tokio::test]
    async fn test_request_to_unknown_user() {
        let (service, _db) = make_service().await;
        let err = service.send_request("alice", "ghost").await;
        assert!(matches!(err, Err(DomainError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_pending_request_blocks_both_directions() {
        let (service, _db) = make_service().await;
        service.send_request("alice", "bob").await.unwrap();

        let err = service.send_request("alice", "bob").await;
        assert!(matches!(err, Err(DomainError::Conflict(_))));

        // Reverse direction is also blocked while pending
        let err = service.send_request("bob", "alice").await;
        assert!(matches!(err, Err(DomainError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_already_friends_conflicts() {
        let (service, _db) = make_service().await;
        let request = service.send_request("alice", "bob").await.unwrap();
        service.respond("bob", &request.id, true).await.unwrap();

        let err = service.send_request("alice", "bob").await;
        assert!(matches!(err, Err(DomainError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_only_recipient_can_respond() {
        let (service, _db) = make_service().await;
        let request = service.send_request("alice", "bob").await.unwrap();

        let err = service.respond("alice", &request.id, true).await;
        assert!(matches!(err, Err(DomainError::Forbidden(_))));
        let err = service.respond("carol", &request.id, true).await;
        assert!(matches!(err, Err(DomainError::Forbidden(_))));
    }

    #[tokio::test]
    async fn test_respond_twice_conflicts() {
        let (service, _db) = make_service().await;
        let request = service.send_request("alice", "bob").await.unwrap();
        service.respond("bob", &request.id, false).await.unwrap();

        let err = service.respond("bob", &request.id, true).await;
        assert!(matches!(err, Err(DomainError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_declined_request_allows_retry() {
        let (service, _db) = make_service().await;
        let request = service.send_request("alice", "bob").await.unwrap();
        service.respond("bob", &request.id, false).await.unwrap();

        // Resolved requests no longer block a new one
        assert!(service.send_request("alice", "bob").await.is_ok());
    }

    #[tokio::test]
    async fn test_remove_friend_symmetric() {
        let (service, db) = make_service().await;
        let request = service.send_request("alice", "bob").await.unwrap();
        service.respond("bob", &request.id, true).await.unwrap();

        service.remove_friend("bob", "alice").await.unwrap();

        let alice = db.repository().get_user("alice").await.unwrap().unwrap();
        let bob = db.repository().get_user("bob").await.unwrap().unwrap();
        assert!(alice.friends.is_empty());
        assert!(bob.friends.is_empty());
    }

    #[tokio::test]
    async fn test_remove_non_friend_rejected() {
        let (service, _db) = make_service().await;
        let err = service.remove_friend("alice", "bob").await;
        assert!(matches!(err, Err(DomainError::Validation(_))));
    }

    #[tokio::test]
    async fn test_list_friends_returns_records() {
        let (service, _db) = make_service().await;
        let request = service.send_request("alice", "bob").await.unwrap();
        service.respond("bob", &request.id, true).await.unwrap();

        let friends = service.list_friends("alice").await.unwrap();
        assert_eq!(friends.len(), 1);
        assert_eq!(friends[0].id, "bob");
    }

    #[tokio::test]
    async fn test_list_requests_inbox() {
        let (service, _db) = make_service().await;
        service.send_request("alice", "bob").await.unwrap();
        service.send_request("carol", "alice").await.unwrap();

        let inbox = service.list_requests("alice").await.unwrap();
        assert_eq!(inbox.sent.len(), 1);
        assert_eq!(inbox.received.len(), 1);
        assert_eq!(inbox.sent[0].counterpart_name.as_deref(), Some("Bob"));
        assert_eq!(inbox.received[0].counterpart_name.as_deref(), Some("Carol"));
    }
}
