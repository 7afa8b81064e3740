//! Package registry
//!
//! Maps package type ids to the schema used to check decoded payloads.
//! Registration happens once at start-up; after that the registry is only
//! read, so it can be shared behind an `Arc` without locking.

use std::collections::HashMap;
use std::sync::Arc;

use crate::error::{Error, Result};
use crate::schema::{Package, Schema};

/// Package id to schema table
#[derive(Debug, Clone, Default)]
pub struct Registry {
    schemas: HashMap<u8, Arc<Schema>>,
}

impl Registry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a schema under a package id
    pub fn register(&mut self, package_id: u8, schema: impl Into<Arc<Schema>>) -> Result<()> {
        if self.schemas.contains_key(&package_id) {
            tracing::error!(package_id, "package id registered twice");
            return Err(Error::DuplicatePackageRegistration(package_id));
        }

        let schema = schema.into();
        tracing::debug!(package_id, fields = schema.len(), "registered package");
        self.schemas.insert(package_id, schema);
        Ok(())
    }

    /// Register a typed package under its own id
    pub fn register_package<P: Package>(&mut self) -> Result<()> {
        self.register(P::PACKAGE_ID, P::describe())
    }

    /// Schema registered under `package_id`
    pub fn schema(&self, package_id: u8) -> Option<&Arc<Schema>> {
        self.schemas.get(&package_id)
    }

    /// Whether `package_id` has been registered
    pub fn contains(&self, package_id: u8) -> bool {
        self.schemas.contains_key(&package_id)
    }

    /// Number of registered packages
    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    /// Whether nothing has been registered
    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }
}
