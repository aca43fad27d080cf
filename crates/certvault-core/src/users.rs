//! User directory: identity records and credential checks.

use std::collections::HashMap;

use tracing::debug;

use crate::error::Result;
use crate::model::User;
use crate::password::{hash_password, verify_password};

/// Resolves caller-supplied credentials to a user.
pub trait Authenticator: Send + Sync {
    /// Returns the user only when both identifier and secret match.
    ///
    /// Unknown identifiers and wrong secrets are indistinguishable.
    fn authenticate(&self, id: &str, secret: &str) -> Option<User>;

    /// Whether a user with this identifier is known.
    fn exists(&self, id: &str) -> bool;
}

/// Identifier and secret as supplied by a caller.
#[derive(Clone)]
pub struct Credentials {
    pub id: String,
    pub secret: String,
}

impl Credentials {
    pub fn new(id: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            secret: secret.into(),
        }
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("id", &self.id)
            .field("secret", &"<redacted>")
            .finish()
    }
}

struct UserRecord {
    user: User,
    password_hash: String,
}

/// Static set of users, seeded at startup.
#[derive(Default)]
pub struct UserDirectory {
    users: HashMap<String, UserRecord>,
}

impl UserDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a directory from `(user, clear-text secret)` pairs, hashing each
    /// secret with argon2id. A later record with the same id replaces an
    /// earlier one.
    pub fn from_records<I>(records: I) -> Result<Self>
    where
        I: IntoIterator<Item = (User, String)>,
    {
        let mut users = HashMap::new();
        for (user, secret) in records {
            let password_hash = hash_password(&secret)?;
            users.insert(
                user.id.clone(),
                UserRecord {
                    user,
                    password_hash,
                },
            );
        }
        Ok(Self { users })
    }

    pub fn get(&self, id: &str) -> Option<&User> {
        self.users.get(id).map(|r| &r.user)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.users.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}

impl Authenticator for UserDirectory {
    fn authenticate(&self, id: &str, secret: &str) -> Option<User> {
        let record = self.users.get(id)?;
        if verify_password(secret, &record.password_hash) {
            Some(record.user.clone())
        } else {
            debug!(user_id = %id, "Credential check failed");
            None
        }
    }

    fn exists(&self, id: &str) -> bool {
        self.contains(id)
    }
}
