//! In-memory variable store.

use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::{debug, instrument};

use crate::base::types::{Res, Void};

use super::{GenericVarStore, VarStore};

// Extra methods on `VarStore` applied by the memory implementation.

impl VarStore {
    /// Creates an empty in-memory store.
    pub fn memory() -> Self {
        Self::new(Arc::new(MemoryVarStore::default()))
    }

    /// Creates an in-memory store seeded with the given variables.
    pub fn memory_with<K, V>(vars: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self::new(Arc::new(MemoryVarStore::with_vars(vars)))
    }
}

/// Variables held in process memory.
#[derive(Debug, Default)]
pub struct MemoryVarStore {
    vars: RwLock<HashMap<String, String>>,
}

impl MemoryVarStore {
    /// Creates a store seeded with the given variables.
    pub fn with_vars<K, V>(vars: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        let vars = vars.into_iter().map(|(k, v)| (k.into(), v.into())).collect();

        Self { vars: RwLock::new(vars) }
    }
}

#[async_trait]
impl GenericVarStore for MemoryVarStore {
    #[instrument(skip(self))]
    async fn get(&self, key: &str) -> Res<Option<String>> {
        Ok(self.vars.read().await.get(key).cloned())
    }

    #[instrument(skip(self, value))]
    async fn set(&self, key: &str, value: &str) -> Void {
        debug!("Setting `{}` ({} bytes).", key, value.len());

        self.vars.write().await.insert(key.to_string(), value.to_string());

        Ok(())
    }
}
