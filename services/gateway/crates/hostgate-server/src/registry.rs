//! In-memory registry of managed servers.
//!
//! Targets are kept in insertion order. That order is what `list` returns
//! and what `resolve` scans, so with duplicate addresses the earliest
//! registration always wins.

use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use hostgate_common::{Field, Target, required};

use crate::error::RegistryError;

/// How `add` treats an address that is already registered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AddressPolicy {
    /// Accept the duplicate; lookups keep returning the first target.
    #[default]
    AllowDuplicates,
    /// Reject the duplicate with [`RegistryError::AddressInUse`].
    Unique,
}

#[derive(Debug, Default)]
pub struct ServerRegistry {
    policy: AddressPolicy,
    targets: RwLock<Vec<Target>>,
}

impl ServerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_policy(policy: AddressPolicy) -> Self {
        Self {
            policy,
            targets: RwLock::default(),
        }
    }

    pub fn policy(&self) -> AddressPolicy {
        self.policy
    }

    /// Register a target and return it.
    ///
    /// Both fields must be present and non-empty. The uniqueness check and
    /// the append happen under one write lock.
    pub fn add(&self, name: Option<&str>, address: Option<&str>) -> Result<Target, RegistryError> {
        let name = required(Field::Name, name)?;
        let address = required(Field::Address, address)?;

        let target = Target::new(name, address);
        {
            let mut targets = self.write();
            if self.policy == AddressPolicy::Unique
                && targets.iter().any(|t| t.address == target.address)
            {
                return Err(RegistryError::AddressInUse(target.address));
            }
            targets.push(target.clone());
        }

        tracing::info!(
            name = %target.name,
            address = %target.address,
            "server registered",
        );
        Ok(target)
    }

    /// Snapshot of every target, in insertion order.
    pub fn list(&self) -> Vec<Target> {
        self.read().clone()
    }

    /// First target registered under `address`.
    pub fn resolve(&self, address: &str) -> Option<Target> {
        self.read().iter().find(|t| t.address == address).cloned()
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    // Writers only ever push a fully built target, so a poisoned lock
    // still guards a consistent vector.
    fn read(&self) -> RwLockReadGuard<'_, Vec<Target>> {
        self.targets.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Vec<Target>> {
        self.targets.write().unwrap_or_else(PoisonError::into_inner)
    }
}
