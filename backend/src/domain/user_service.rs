//! Student profiles.

use std::sync::Arc;

use chrono::Utc;
use shared::{NewUser, User, UserUpdate};
use tracing::info;

use crate::storage::{collections, QueryResult, Repository, RowStore};

#[derive(Clone)]
pub struct UserService {
    users: Repository<User>,
}

impl UserService {
    pub fn new(store: Arc<dyn RowStore>) -> Self {
        Self {
            users: Repository::new(store, collections::USERS),
        }
    }

    pub async fn create_user(&self, user: &NewUser) -> QueryResult<User> {
        info!("Creating user {}", user.email);
        QueryResult::logged("create user", self.users.create(user).await)
    }

    pub async fn get_user_by_id(&self, user_id: &str) -> QueryResult<User> {
        info!("Getting user {}", user_id);
        QueryResult::logged("get user", self.users.get(user_id).await)
    }

    pub async fn update_user(&self, user_id: &str, update: &UserUpdate) -> QueryResult<User> {
        info!("Updating user {}", user_id);
        let update = UserUpdate {
            updated_at: update.updated_at.or_else(|| Some(Utc::now())),
            ..update.clone()
        };
        QueryResult::logged("update user", self.users.update(user_id, &update).await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{MemoryStore, StoreError};

    fn new_user(id: Option<&str>) -> NewUser {
        NewUser {
            id: id.map(str::to_string),
            email: "casey@chapter.org".to_string(),
            full_name: "Casey Rivera".to_string(),
            chapter: Some("Lincoln FFA".to_string()),
            advisor_email: None,
            graduation_year: Some(2026),
        }
    }

    #[tokio::test]
    async fn test_create_with_and_without_id() {
        let service = UserService::new(Arc::new(MemoryStore::new()));

        let issued = service.create_user(&new_user(Some("auth-123"))).await.into_result().unwrap();
        assert_eq!(issued.id, "auth-123");

        let generated = service.create_user(&new_user(None)).await.into_result().unwrap();
        assert_ne!(generated.id, "auth-123");

        let duplicate = service.create_user(&new_user(Some("auth-123"))).await;
        assert!(matches!(duplicate.error, Some(StoreError::Server { status: 409, .. })));
    }

    #[tokio::test]
    async fn test_update_user() {
        let service = UserService::new(Arc::new(MemoryStore::new()));
        let user = service.create_user(&new_user(Some("u1"))).await.into_result().unwrap();

        let update = UserUpdate {
            chapter: Some("Jefferson FFA".to_string()),
            ..Default::default()
        };
        let updated = service.update_user("u1", &update).await.into_result().unwrap();
        assert_eq!(updated.chapter.as_deref(), Some("Jefferson FFA"));
        assert_eq!(updated.email, user.email);
        assert!(updated.updated_at >= user.updated_at);

        let fetched = service.get_user_by_id("u1").await.into_result().unwrap();
        assert_eq!(fetched, updated);

        assert!(service.update_user("ghost", &UserUpdate::default()).await.error.is_some());
    }
}
