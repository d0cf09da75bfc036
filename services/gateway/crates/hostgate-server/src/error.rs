//! Typed domain error enums.
//!
//! Nothing here knows about HTTP; `routes` maps each variant to a status
//! code and body.

use hostgate_common::Field;
use thiserror::Error;

// ── Registry errors ───────────────────────────────────────────────────────────

/// Errors returned by [`crate::registry::ServerRegistry::add`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("{0} is required")]
    MissingField(Field),

    #[error("A server with address '{0}' is already registered")]
    AddressInUse(String),
}

// ── Identity errors ───────────────────────────────────────────────────────────

/// Errors returned by [`crate::identity::IdentityStore::register`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegisterError {
    #[error("{0} is required")]
    MissingField(Field),

    #[error("User already exists")]
    AlreadyExists,

    #[error("password hashing failed: {0}")]
    Hashing(String),
}

/// Errors returned by [`crate::identity::IdentityStore::verify`].
///
/// An unknown username and a wrong password both surface as
/// `InvalidCredentials`.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AuthError {
    #[error("{0} is required")]
    MissingField(Field),

    #[error("Invalid username or password")]
    InvalidCredentials,
}

// ── Operation errors ──────────────────────────────────────────────────────────

/// Errors returned by [`crate::dispatch::OperationDispatcher::invoke`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum OperationError {
    #[error("Server not found: {0}")]
    TargetNotFound(String),

    #[error("{0} is required")]
    MissingField(Field),
}

impl From<Field> for OperationError {
    fn from(field: Field) -> Self {
        OperationError::MissingField(field)
    }
}

impl From<Field> for RegistryError {
    fn from(field: Field) -> Self {
        RegistryError::MissingField(field)
    }
}

impl From<Field> for RegisterError {
    fn from(field: Field) -> Self {
        RegisterError::MissingField(field)
    }
}

impl From<Field> for AuthError {
    fn from(field: Field) -> Self {
        AuthError::MissingField(field)
    }
}
