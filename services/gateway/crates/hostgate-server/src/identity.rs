//! In-memory user store with Argon2id password hashes.
//!
//! Plaintext passwords never leave `register` / `verify`. Hashes are kept
//! as PHC strings (`$argon2id$v=19$...`). Login failures do not reveal
//! whether the username exists.

use std::collections::HashMap;
use std::fmt;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use argon2::password_hash::{self, PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::{Algorithm, Argon2, Params, Version};
use chrono::{DateTime, Utc};
use hostgate_common::{Field, required};
use uuid::Uuid;

use crate::error::{AuthError, RegisterError};

#[derive(Clone)]
struct Credential {
    password_hash: String,
    registered_at: DateTime<Utc>,
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("password_hash", &"<redacted>")
            .field("registered_at", &self.registered_at)
            .finish()
    }
}

#[derive(Debug)]
pub struct IdentityStore {
    params: Params,
    users: RwLock<HashMap<String, Credential>>,
}

impl Default for IdentityStore {
    fn default() -> Self {
        Self::with_params(Params::default())
    }
}

impl IdentityStore {
    /// Store using the Argon2 default cost parameters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store with explicit Argon2 cost parameters for new hashes.
    pub fn with_params(params: Params) -> Self {
        Self {
            params,
            users: RwLock::default(),
        }
    }

    /// Store a new user. Fails if either field is empty or the username is taken.
    pub fn register(
        &self,
        username: Option<&str>,
        password: Option<&str>,
    ) -> Result<(), RegisterError> {
        let username = required(Field::Username, username)?;
        let password = required(Field::Password, password)?;

        // Hash outside the lock; only the map insert is exclusive.
        let credential = Credential {
            password_hash: self
                .hash(password)
                .map_err(|err| RegisterError::Hashing(err.to_string()))?,
            registered_at: Utc::now(),
        };

        {
            let mut users = self.write();
            if users.contains_key(username) {
                return Err(RegisterError::AlreadyExists);
            }
            users.insert(username.to_string(), credential);
        }

        tracing::info!(username = %username, "user registered");
        Ok(())
    }

    /// Check a username/password pair.
    pub fn verify(&self, username: Option<&str>, password: Option<&str>) -> Result<(), AuthError> {
        let username = required(Field::Username, username)?;
        let password = required(Field::Password, password)?;

        let stored = self.read().get(username).map(|c| c.password_hash.clone());
        let accepted = match stored {
            Some(encoded) => self.matches(&encoded, password),
            None => {
                // Spend the same hashing work as a real comparison.
                let _ = self.hash(password);
                false
            }
        };

        if accepted {
            tracing::info!(username = %username, "login succeeded");
            Ok(())
        } else {
            tracing::warn!(username = %username, "login rejected");
            Err(AuthError::InvalidCredentials)
        }
    }

    /// When `username` was registered, if it exists.
    pub fn registered_at(&self, username: &str) -> Option<DateTime<Utc>> {
        self.read().get(username).map(|c| c.registered_at)
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    fn hasher(&self) -> Argon2<'static> {
        Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone())
    }

    fn hash(&self, password: &str) -> password_hash::Result<String> {
        let salt = SaltString::encode_b64(Uuid::new_v4().as_bytes())?;
        let hash = self.hasher().hash_password(password.as_bytes(), &salt)?;
        Ok(hash.to_string())
    }

    fn matches(&self, encoded: &str, password: &str) -> bool {
        PasswordHash::new(encoded).is_ok_and(|parsed| {
            self.hasher()
                .verify_password(password.as_bytes(), &parsed)
                .is_ok()
        })
    }

    fn read(&self) -> RwLockReadGuard<'_, HashMap<String, Credential>> {
        self.users.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<String, Credential>> {
        self.users.write().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Low-cost parameters so hashing stays fast under test.
#[cfg(test)]
pub(crate) fn test_store() -> IdentityStore {
    IdentityStore::with_params(Params::new(256, 1, 1, None).unwrap())
}
