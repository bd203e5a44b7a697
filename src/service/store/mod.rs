//! Key-value variable storage for plugin state.
//!
//! The host gives every plugin a set of string-valued variables that survive between
//! invocations. [`GenericVarStore`] is that contract; [`VarStore`] is the cloneable
//! handle the rest of the crate passes around.

pub mod memory;
pub mod surreal;

use std::{ops::Deref, sync::Arc};

use async_trait::async_trait;

use crate::base::{
    config::{Config, StoreBackend},
    types::{Res, Void},
};

// Traits.

/// Generic variable store trait that stores must implement.
///
/// Values are opaque strings. A key that was never set reads as `None`.
#[async_trait]
pub trait GenericVarStore: Send + Sync + 'static {
    /// Gets the value of a variable.
    async fn get(&self, key: &str) -> Res<Option<String>>;

    /// Sets the value of a variable, replacing any previous value.
    async fn set(&self, key: &str, value: &str) -> Void;
}

// Structs.

/// Variable store for the application.
///
/// This is trivially cloneable and can be passed around without the need for `Arc` or `Mutex`.
#[derive(Clone)]
pub struct VarStore {
    inner: Arc<dyn GenericVarStore>,
}

impl Deref for VarStore {
    type Target = dyn GenericVarStore;

    fn deref(&self) -> &Self::Target {
        &*self.inner
    }
}

impl VarStore {
    /// Wraps any store implementation.
    pub fn new(inner: Arc<dyn GenericVarStore>) -> Self {
        Self { inner }
    }

    /// Creates the store selected by `store_backend`.
    pub async fn from_config(config: &Config) -> Res<Self> {
        match config.store_backend {
            StoreBackend::Memory => Ok(Self::memory()),
            StoreBackend::Surreal => Self::surreal(config).await,
        }
    }
}
