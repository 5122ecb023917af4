use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, RwLock};

use thiserror::Error;
use tracing::debug;

use super::digest::password_digest;
use crate::config::AuthConfig;

/// The only identity namespace digest users are looked up in.
pub const ADMIN_DB: &str = "admin";

/// A user identity scoped to a namespace.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UserName {
    pub user: String,
    pub db: String,
}

impl UserName {
    pub fn new(user: impl Into<String>, db: impl Into<String>) -> Self {
        Self {
            user: user.into(),
            db: db.into(),
        }
    }

    pub fn admin(user: impl Into<String>) -> Self {
        Self::new(user, ADMIN_DB)
    }
}

impl fmt::Display for UserName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.user, self.db)
    }
}

#[derive(Debug, Clone)]
pub struct Credentials {
    /// HA1 digest; empty for external users.
    pub password_digest: String,
    /// Authenticated by an outside system; no local password to check.
    pub is_external: bool,
}

#[derive(Debug, Clone)]
pub struct User {
    pub name: UserName,
    pub credentials: Credentials,
}

#[derive(Debug, Error)]
pub enum CredentialError {
    #[error("could not find user {0}")]
    UserNotFound(UserName),

    #[error("credential store unavailable: {0}")]
    Unavailable(String),
}

/// Source of user password digests.
///
/// Every successful [`acquire_user`](CredentialStore::acquire_user) must be
/// paired with a [`release_user`](CredentialStore::release_user).
pub trait CredentialStore: Send + Sync {
    /// Whether any user exists in [`ADMIN_DB`].
    fn has_admin_users(&self) -> bool;

    fn acquire_user(&self, name: &UserName) -> Result<Arc<User>, CredentialError>;

    fn release_user(&self, user: Arc<User>);
}

/// Credential store held in memory, seeded from `[auth]` configuration.
#[derive(Debug, Default)]
pub struct InMemoryCredentialStore {
    users: RwLock<HashMap<UserName, Arc<User>>>,
    outstanding: AtomicUsize,
}

impl InMemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the store from configuration. Plain passwords are digested with
    /// the configured realm; every user lands in [`ADMIN_DB`].
    pub fn from_config(config: &AuthConfig) -> Self {
        let store = Self::new();

        for entry in &config.users {
            let digest = if entry.external {
                String::new()
            } else if let Some(digest) = &entry.password_digest {
                digest.to_ascii_lowercase()
            } else {
                entry
                    .password
                    .as_deref()
                    .map(|pwd| password_digest(&entry.name, &config.realm, pwd))
                    .unwrap_or_default()
            };

            store.insert(User {
                name: UserName::admin(entry.name.clone()),
                credentials: Credentials {
                    password_digest: digest,
                    is_external: entry.external,
                },
            });
        }

        store
    }

    pub fn insert(&self, user: User) {
        debug!(user = %user.name, external = user.credentials.is_external, "Provisioned user");
        self.write_users().insert(user.name.clone(), Arc::new(user));
    }

    /// Number of users acquired and not yet released.
    pub fn outstanding(&self) -> usize {
        self.outstanding.load(Ordering::SeqCst)
    }

    fn write_users(&self) -> std::sync::RwLockWriteGuard<'_, HashMap<UserName, Arc<User>>> {
        self.users.write().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn read_users(&self) -> std::sync::RwLockReadGuard<'_, HashMap<UserName, Arc<User>>> {
        self.users.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl CredentialStore for InMemoryCredentialStore {
    fn has_admin_users(&self) -> bool {
        self.read_users().keys().any(|name| name.db == ADMIN_DB)
    }

    fn acquire_user(&self, name: &UserName) -> Result<Arc<User>, CredentialError> {
        let user = self
            .read_users()
            .get(name)
            .cloned()
            .ok_or_else(|| CredentialError::UserNotFound(name.clone()))?;

        self.outstanding.fetch_add(1, Ordering::SeqCst);
        Ok(user)
    }

    fn release_user(&self, user: Arc<User>) {
        self.outstanding.fetch_sub(1, Ordering::SeqCst);
        drop(user);
    }
}
