use std::{collections::HashMap, error::Error};

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::{
    identity::UserStore,
    types::{normalize_email, User, UserID},
};

/// Users keyed by normalized email. Useful for demos and tests.
#[derive(Default)]
pub struct InMemoryUserStore {
    storage: RwLock<HashMap<String, User>>,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn create_user_if_not_exists(
        &self,
        user: &User,
    ) -> Result<UserID, Box<dyn Error + Send + Sync>> {
        let mut storage = self.storage.write().await;

        let existing = storage
            .entry(normalize_email(&user.email))
            .or_insert_with(|| user.clone());

        Ok(existing.id.clone())
    }

    async fn find_by_email(
        &self,
        email: &str,
    ) -> Result<Option<User>, Box<dyn Error + Send + Sync>> {
        Ok(self
            .storage
            .read()
            .await
            .get(&normalize_email(email))
            .cloned())
    }

    async fn find_by_id(&self, id: &UserID) -> Result<Option<User>, Box<dyn Error + Send + Sync>> {
        Ok(self
            .storage
            .read()
            .await
            .values()
            .find(|user| user.id == *id)
            .cloned())
    }
}
