//! Load configuration via `config` crate with env-override support.

use std::{ops::Deref, sync::Arc};

use serde::Deserialize;

use crate::base::phrases;

use super::types::{Res, Void};

/// Default reply text.
fn default_reply_text() -> String {
    phrases::REPLY_TEXT.to_string()
}

/// Default shush emoji.
fn default_shush_emoji() -> String {
    phrases::SHUSH_EMOJI.to_string()
}

/// Default acknowledgement emoji.
fn default_ack_emoji() -> String {
    phrases::ACK_EMOJI.to_string()
}

/// Default ignore list variable.
fn default_ignore_key() -> String {
    phrases::IGNORE_KEY.to_string()
}

/// Default database endpoint (in-memory SurrealDB).
fn default_db_endpoint() -> String {
    "mem://".to_string()
}

fn default_db_namespace() -> String {
    "shush".to_string()
}

fn default_db_database() -> String {
    "bot".to_string()
}

/// How ignore list membership is decided.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum MatchMode {
    /// Exact match against the decoded ids.
    #[default]
    Exact,
    /// Substring search for `"<id>:"` in the raw stored value.
    ///
    /// This is the legacy behaviour: an id matches whenever its token appears inside
    /// another one (`"12:"` is found in `"112:"`).
    Substring,
}

/// Which variable store backs the plugin.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    /// Process-local memory; lost on exit.
    #[default]
    Memory,
    /// SurrealDB at `db_endpoint`.
    Surreal,
}

/// Configuration for the shush-bot plugin.
#[derive(Debug, Clone)]
pub struct Config {
    /// Shared configuration values.
    pub inner: Arc<ConfigInner>,
}

impl Deref for Config {
    type Target = ConfigInner;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl From<ConfigInner> for Config {
    fn from(inner: ConfigInner) -> Self {
        Self { inner: Arc::new(inner) }
    }
}

impl Default for Config {
    fn default() -> Self {
        ConfigInner::default().into()
    }
}

/// Configuration values.
#[derive(Debug, Deserialize, Clone)]
pub struct ConfigInner {
    /// Reply sent to referenced messages (`REPLY_TEXT`).
    #[serde(default = "default_reply_text")]
    pub reply_text: String,
    /// Reaction that shushes a message (`SHUSH_EMOJI`).
    #[serde(default = "default_shush_emoji")]
    pub shush_emoji: String,
    /// Reaction acknowledging a shush (`ACK_EMOJI`).
    #[serde(default = "default_ack_emoji")]
    pub ack_emoji: String,
    /// Variable holding the ignore list (`IGNORE_KEY`).
    #[serde(default = "default_ignore_key")]
    pub ignore_key: String,
    /// Ignore list membership mode (`IGNORE_MATCH`): `exact` or `substring`.
    #[serde(default)]
    pub ignore_match: MatchMode,
    /// Maximum number of ids kept in the ignore list (`IGNORE_CAPACITY`).
    /// Unbounded when unset.
    #[serde(default)]
    pub ignore_capacity: Option<usize>,
    /// Variable store backend (`STORE_BACKEND`): `memory` or `surreal`.
    #[serde(default)]
    pub store_backend: StoreBackend,
    /// Database endpoint URL (`DB_ENDPOINT`), e.g. `mem://` or `ws://localhost:8000`.
    #[serde(default = "default_db_endpoint")]
    pub db_endpoint: String,
    /// Database username (`DB_USERNAME`).
    #[serde(default)]
    pub db_username: Option<String>,
    /// Database password (`DB_PASSWORD`).
    #[serde(default)]
    pub db_password: Option<String>,
    /// Database namespace (`DB_NAMESPACE`).
    #[serde(default = "default_db_namespace")]
    pub db_namespace: String,
    /// Database name (`DB_DATABASE`).
    #[serde(default = "default_db_database")]
    pub db_database: String,
}

impl Default for ConfigInner {
    fn default() -> Self {
        Self {
            reply_text: default_reply_text(),
            shush_emoji: default_shush_emoji(),
            ack_emoji: default_ack_emoji(),
            ignore_key: default_ignore_key(),
            ignore_match: MatchMode::default(),
            ignore_capacity: None,
            store_backend: StoreBackend::default(),
            db_endpoint: default_db_endpoint(),
            db_username: None,
            db_password: None,
            db_namespace: default_db_namespace(),
            db_database: default_db_database(),
        }
    }
}

impl Config {
    /// Loads the configuration from the environment (`SHUSH_BOT_*`) and an optional file.
    ///
    /// Without an explicit path, `.hidden/config.toml` is used when it exists.
    pub fn load(explicit_path: Option<&std::path::Path>) -> Res<Self> {
        let mut cfg = config::Config::builder().add_source(config::Environment::default().prefix("SHUSH_BOT"));

        if let Some(p) = explicit_path {
            cfg = cfg.add_source(config::File::from(p.to_path_buf()));
        } else if std::path::Path::new(".hidden/config.toml").exists() {
            cfg = cfg.add_source(config::File::with_name(".hidden/config.toml"));
        }

        let result = Config {
            inner: Arc::new(cfg.build()?.try_deserialize()?),
        };

        result.validate()?;

        Ok(result)
    }

    /// Checks the values that have no sensible fallback.
    pub fn validate(&self) -> Void {
        if self.reply_text.is_empty() {
            return Err(anyhow::anyhow!("Reply text must not be empty."));
        }

        if self.shush_emoji.is_empty() || self.ack_emoji.is_empty() {
            return Err(anyhow::anyhow!("Shush and acknowledgement emoji must not be empty."));
        }

        if self.ignore_key.is_empty() || self.ignore_key == phrases::RESERVED_KEY {
            return Err(anyhow::anyhow!("Ignore key must be a non-empty name other than `{}`.", phrases::RESERVED_KEY));
        }

        if self.ignore_capacity == Some(0) {
            return Err(anyhow::anyhow!("Ignore capacity must be at least 1 when set."));
        }

        Ok(())
    }
}
