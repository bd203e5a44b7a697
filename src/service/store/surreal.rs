//! SurrealDB implementation of the variable store.

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use surrealdb::{
    RecordId, Surreal,
    engine::any::{self, Any},
    opt::auth::Root,
};
use tracing::{debug, info, instrument};

use crate::base::{
    config::Config,
    types::{Res, Void},
};

use super::{GenericVarStore, VarStore};

/// Table holding one record per variable, keyed by variable name.
const VAR_TABLE: &str = "var";

// Extra methods on `VarStore` applied by the surreal implementation.

impl VarStore {
    /// Creates a SurrealDB-backed store from the database settings in `config`.
    pub async fn surreal(config: &Config) -> Res<Self> {
        let store = SurrealVarStore::new(config).await?;
        Ok(Self::new(Arc::new(store)))
    }

    /// Creates a SurrealDB-backed store on a fresh in-memory database.
    pub async fn surreal_memory() -> Res<Self> {
        Self::surreal(&Config::default()).await
    }
}

/// A variable record in the database.
#[derive(Debug, Serialize, Deserialize)]
struct VarRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    id: Option<RecordId>,
    value: String,
}

/// SurrealDB variable store.
///
/// This is trivially cloneable; the underlying client is shared.
#[derive(Clone)]
pub struct SurrealVarStore {
    db: Surreal<Any>,
}

impl SurrealVarStore {
    /// Connects to `db_endpoint`, signs in when credentials are set, and selects the
    /// configured namespace and database.
    #[instrument(skip_all, fields(endpoint = %config.db_endpoint))]
    pub async fn new(config: &Config) -> Res<Self> {
        let db = any::connect(config.db_endpoint.as_str()).await?;

        // Authenticate with the database using the provided username and password.
        if let (Some(username), Some(password)) = (&config.db_username, &config.db_password) {
            db.signin(Root { username, password }).await?;
        }

        db.use_ns(config.db_namespace.as_str()).use_db(config.db_database.as_str()).await?;

        // Define schemas.

        db.query(format!("DEFINE TABLE IF NOT EXISTS {VAR_TABLE} SCHEMALESS;")).await?.check()?;

        info!("Variable store initialized successfully.");

        Ok(Self { db })
    }
}

#[async_trait]
impl GenericVarStore for SurrealVarStore {
    #[instrument(skip(self))]
    async fn get(&self, key: &str) -> Res<Option<String>> {
        let record: Option<VarRecord> = self.db.select((VAR_TABLE, key)).await?;

        Ok(record.map(|r| r.value))
    }

    #[instrument(skip(self, value))]
    async fn set(&self, key: &str, value: &str) -> Void {
        debug!("Setting `{}` ({} bytes).", key, value.len());

        let record = VarRecord {
            id: None,
            value: value.to_string(),
        };

        let _: Option<VarRecord> = self.db.upsert((VAR_TABLE, key)).content(record).await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(flavor = "multi_thread")]
    async fn test_surreal_memory_get_and_set() {
        let store = VarStore::surreal_memory().await.unwrap();

        assert_eq!(store.get("ignore").await.unwrap(), None);

        store.set("ignore", "7:").await.unwrap();
        store.set("ignore", "7:9:").await.unwrap();

        assert_eq!(store.get("ignore").await.unwrap().as_deref(), Some("7:9:"));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_surreal_keys_are_independent() {
        let store = VarStore::surreal_memory().await.unwrap();

        store.set("ignore", "1:").await.unwrap();
        store.set("other", "x").await.unwrap();

        assert_eq!(store.get("ignore").await.unwrap().as_deref(), Some("1:"));
        assert_eq!(store.get("other").await.unwrap().as_deref(), Some("x"));
    }
}
