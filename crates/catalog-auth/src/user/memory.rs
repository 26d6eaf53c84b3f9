use super::{User, UserStore};
use crate::errors::{self, AuthError};
use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::HashMap;

#[derive(Default)]
pub struct InMemoryUserStore {
    users: RwLock<HashMap<String, User>>,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.users.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.read().is_empty()
    }
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn save(&self, user: User) -> Result<(), AuthError> {
        let mut users = self.users.write();
        if users.contains_key(&user.username) {
            return Err(errors::user_exists(&user.username));
        }
        users.insert(user.username.clone(), user);
        Ok(())
    }

    async fn find(&self, username: &str) -> Result<Option<User>, AuthError> {
        Ok(self.users.read().get(username).cloned())
    }
}
