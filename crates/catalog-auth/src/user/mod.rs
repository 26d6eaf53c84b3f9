mod memory;

pub use memory::InMemoryUserStore;

use crate::errors::AuthError;
use crate::password::PasswordHasher;
use async_trait::async_trait;
use catalog_types::Role;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct User {
    pub username: String,
    pub hashed_password: String,
    pub role: Role,
}

impl User {
    pub fn new(
        username: impl Into<String>,
        password: &str,
        role: Role,
        hasher: &PasswordHasher,
    ) -> Result<Self, AuthError> {
        Ok(Self {
            username: username.into(),
            hashed_password: hasher.hash(password)?,
            role,
        })
    }

    pub fn is_correct_password(&self, candidate: &str) -> bool {
        PasswordHasher::verify(&self.hashed_password, candidate)
    }
}

#[async_trait]
pub trait UserStore: Send + Sync {
    /// Fails with `STORAGE.ALREADY_EXISTS` when the username is taken.
    async fn save(&self, user: User) -> Result<(), AuthError>;

    async fn find(&self, username: &str) -> Result<Option<User>, AuthError>;
}

/// An account registered at startup.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSeed {
    pub username: String,
    pub password: String,
    pub role: Role,
}

impl UserSeed {
    pub fn new(username: &str, password: &str, role: Role) -> Self {
        Self {
            username: username.to_string(),
            password: password.to_string(),
            role,
        }
    }

    pub fn defaults() -> Vec<UserSeed> {
        vec![
            UserSeed::new("admin1", "secret", Role::Admin),
            UserSeed::new("user1", "secret", Role::User),
        ]
    }
}

pub async fn seed_users(
    store: &dyn UserStore,
    seeds: &[UserSeed],
    hasher: &PasswordHasher,
) -> Result<(), AuthError> {
    for seed in seeds {
        let user = User::new(seed.username.clone(), &seed.password, seed.role, hasher)?;
        store.save(user).await?;
        tracing::debug!(username = %seed.username, role = %seed.role, "seeded user");
    }
    Ok(())
}
