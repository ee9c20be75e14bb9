//! In-memory user repository implementation

use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::user::{NewUser, User, UserId, UserRepository};
use crate::domain::DomainError;

#[derive(Debug, Default)]
struct UserTable {
    users: HashMap<i64, User>,
    /// Index for email -> user ID lookup
    email_index: HashMap<String, i64>,
    last_id: i64,
}

/// In-memory implementation of UserRepository
///
/// Both maps live behind one lock so the email uniqueness check and the
/// insert are a single atomic step.
#[derive(Debug, Default, Clone)]
pub struct InMemoryUserRepository {
    table: Arc<RwLock<UserTable>>,
}

impl InMemoryUserRepository {
    /// Create a new empty repository
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn get_by_email(&self, email: &str) -> Result<Option<User>, DomainError> {
        let table = self.table.read().await;

        Ok(table
            .email_index
            .get(email)
            .and_then(|id| table.users.get(id))
            .cloned())
    }

    async fn create(&self, user: NewUser) -> Result<User, DomainError> {
        let mut table = self.table.write().await;

        if table.email_index.contains_key(user.email()) {
            return Err(DomainError::conflict(format!(
                "Email '{}' is already registered",
                user.email()
            )));
        }

        let next_id = table.last_id + 1;
        let id = UserId::new(next_id).map_err(|e| DomainError::internal(e.to_string()))?;
        let user = user.into_user(id, Utc::now());

        table.last_id = next_id;
        table.email_index.insert(user.email().to_string(), next_id);
        table.users.insert(next_id, user.clone());

        Ok(user)
    }

    async fn count(&self) -> Result<usize, DomainError> {
        Ok(self.table.read().await.users.len())
    }
}
