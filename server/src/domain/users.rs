//! User accounts
//!
//! Accounts are provisioned lazily from the authenticated identity:
//! the first request creates the record, later requests return it.

use std::sync::Arc;

use crate::data::TransactionalService;
use crate::data::types::UserRow;
use crate::domain::error::DomainError;

pub struct UserService {
    database: Arc<TransactionalService>,
}

impl UserService {
    pub fn new(database: Arc<TransactionalService>) -> Self {
        Self { database }
    }

    /// Create the user record if it does not exist, otherwise return
    /// the existing one. A different account already holding the email
    /// is a conflict.
    pub async fn ensure_user(
        &self,
        user_id: &str,
        email: &str,
        display_name: &str,
    ) -> Result<UserRow, DomainError> {
        let email = email.trim();
        let display_name = display_name.trim();
        if email.is_empty() {
            return Err(DomainError::validation("Email is required"));
        }
        if display_name.is_empty() {
            return Err(DomainError::validation("Display name is required"));
        }

        let repo = self.database.repository();
        if let Some(existing) = repo.get_user(user_id).await? {
            return Ok(existing);
        }
        if let Some(holder) = repo.get_user_by_email(email).await?
            && holder.id != user_id
        {
            return Err(DomainError::conflict(
                "Email is already registered to another account",
            ));
        }

        let user = repo.create_user(user_id, email, display_name).await?;
        tracing::info!(user_id = %user.id, "User account created");
        Ok(user)
    }

    pub async fn get_profile(&self, user_id: &str) -> Result<UserRow, DomainError> {
        self.database
            .repository()
            .get_user(user_id)
            .await?
            .ok_or_else(|| DomainError::not_found("User not found"))
    }

    /// Substring search over email and display name, excluding the caller
    pub async fn search(
        &self,
        user_id: &str,
        query: &str,
    ) -> Result<Vec<UserRow>, DomainError> {
        let query = query.trim();
        if query.is_empty() {
            return Err(DomainError::validation("Search query is required"));
        }
        Ok(self
            .database
            .repository()
            .search_users(query, user_id)
            .await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::TransactionalBackend;

    async fn make_service() -> UserService {
        let database = Arc::new(
            TransactionalService::init(TransactionalBackend::Memory, std::path::Path::new(""))
                .await
                .unwrap(),
        );
        UserService::new(database)
    }

    #[tokio::test]
    async fn test_ensure_user_creates_then_returns_existing() {
        let service = make_service().await;
        let created = service
            .ensure_user("u1", "u1@example.com", "First")
            .await
            .unwrap();
        assert_eq!(created.display_name, "First");

        // Second call ignores the new profile values
        let again = service
            .ensure_user("u1", "other@example.com", "Renamed")
            .await
            .unwrap();
        assert_eq!(again.id, "u1");
        assert_eq!(again.email, "u1@example.com");
        assert_eq!(again.display_name, "First");
    }

    #[tokio::test]
    async fn test_ensure_user_email_conflict() {
        let service = make_service().await;
        service
            .ensure_user("u1", "shared@example.com", "First")
            .await
            .unwrap();
        let err = service
            .ensure_user("u2", "shared@example.com", "Second")
            .await;
        assert!(matches!(err, Err(DomainError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_ensure_user_rejects_blank_fields() {
        let service = make_service().await;
        let err = service.ensure_user("u1", "  ", "Name").await;
        assert!(matches!(err, Err(DomainError::Validation(_))));
        let err = service.ensure_user("u1", "a@example.com", "  ").await;
        assert!(matches!(err, Err(DomainError::Validation(_))));
    }

    #[tokio::test]
    async fn test_get_profile() {
        let service = make_service().await;
        service
            .ensure_user("u1", "u1@example.com", "First")
            .await
            .unwrap();
        assert!(service.get_profile("u1").await.is_ok());
        let err = service.get_profile("ghost").await;
        assert!(matches!(err, Err(DomainError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_search_excludes_caller() {
        let service = make_service().await;
        service
            .ensure_user("u1", "anna@example.com", "Anna")
            .await
            .unwrap();
        service
            .ensure_user("u2", "annabel@example.com", "Annabel")
            .await
            .unwrap();

        let found = service.search("u1", "anna").await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, "u2");
    }

    #[tokio::test]
    async fn test_search_blank_query_rejected() {
        let service = make_service().await;
        let err = service.search("u1", "   ").await;
        assert!(matches!(err, Err(DomainError::Validation(_))));
    }
}
