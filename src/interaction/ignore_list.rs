//! The ignore list: message ids the bot must not reply to.
//!
//! The list lives in a single store variable as a concatenation of `"<id>:"` tokens,
//! e.g. `"7:9:"`. An unset variable is an empty list.

use tracing::{debug, instrument};

use crate::{
    base::{
        config::{Config, MatchMode},
        error::{Dependency, DependencyExt, IgnoreListError},
        phrases,
        types::{Res, Void},
    },
    service::store::VarStore,
};

/// Token terminator in the stored value.
const DELIMITER: char = ':';

/// Settings for an [`IgnoreListFilter`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IgnoreListOptions {
    /// Store variable holding the list.
    pub key: String,
    /// How membership is decided.
    pub match_mode: MatchMode,
    /// Maximum number of ids kept; oldest are dropped first. `None` is unbounded.
    pub capacity: Option<usize>,
}

impl Default for IgnoreListOptions {
    fn default() -> Self {
        Self {
            key: phrases::IGNORE_KEY.to_string(),
            match_mode: MatchMode::default(),
            capacity: None,
        }
    }
}

impl From<&Config> for IgnoreListOptions {
    fn from(config: &Config) -> Self {
        Self {
            key: config.ignore_key.clone(),
            match_mode: config.ignore_match,
            capacity: config.ignore_capacity,
        }
    }
}

/// Decides whether a message is suppressed from auto-reply, and records new suppressions.
///
/// Every call reads the variable fresh from the store, so several filters over the
/// same store always agree.
#[derive(Clone)]
pub struct IgnoreListFilter {
    store: VarStore,
    options: IgnoreListOptions,
}

impl IgnoreListFilter {
    /// Creates a filter over `store`.
    pub fn new(store: VarStore, options: IgnoreListOptions) -> Self {
        Self { store, options }
    }

    /// The filter's settings.
    pub fn options(&self) -> &IgnoreListOptions {
        &self.options
    }

    /// Returns whether `id` is on the ignore list. Never writes to the store.
    ///
    /// Fails with [`IgnoreListError::InvalidId`] for ids that cannot be stored.
    #[instrument(skip(self))]
    pub async fn is_ignored(&self, id: &str) -> Res<bool> {
        validate_id(id)?;

        let raw = self.load().await?;

        let ignored = match self.options.match_mode {
            MatchMode::Exact => tokens(&raw).any(|t| t == id),
            MatchMode::Substring => raw.contains(&token(id)),
        };

        debug!("Message `{}` ignored: {}.", id, ignored);

        Ok(ignored)
    }

    /// Appends `id` to the ignore list and writes the whole list back.
    ///
    /// In exact mode an id that is already present is not appended again. When a
    /// capacity is set, the oldest ids are dropped to fit.
    ///
    /// Fails with [`IgnoreListError::InvalidId`] for ids that cannot be stored.
    #[instrument(skip(self))]
    pub async fn add_ignored(&self, id: &str) -> Void {
        validate_id(id)?;

        let raw = self.load().await?;

        if self.options.match_mode == MatchMode::Exact && tokens(&raw).any(|t| t == id) {
            debug!("Message `{}` is already ignored.", id);
            return Ok(());
        }

        let mut updated = raw;
        updated.push_str(&token(id));

        if let Some(capacity) = self.options.capacity {
            updated = truncate_oldest(&updated, capacity);
        }

        self.store.set(&self.options.key, &updated).await.dependency(Dependency::Store)?;

        debug!("Message `{}` added to the ignore list.", id);

        Ok(())
    }

    /// The ignored ids in the order they were added.
    pub async fn ignored(&self) -> Res<Vec<String>> {
        let raw = self.load().await?;

        Ok(tokens(&raw).map(str::to_string).collect())
    }

    async fn load(&self) -> Res<String> {
        let raw = self.store.get(&self.options.key).await.dependency(Dependency::Store)?;

        Ok(raw.unwrap_or_default())
    }
}

/// Rejects ids that would not decode back to themselves: empty ids and ids
/// containing [`DELIMITER`].
pub fn validate_id(id: &str) -> Result<(), IgnoreListError> {
    if id.is_empty() || id.contains(DELIMITER) {
        return Err(IgnoreListError::InvalidId { id: id.to_string() });
    }

    Ok(())
}

/// Encodes one id as a stored token.
fn token(id: &str) -> String {
    format!("{id}{DELIMITER}")
}

/// Decodes the stored value into ids.
fn tokens(raw: &str) -> impl Iterator<Item = &str> {
    raw.split(DELIMITER).filter(|t| !t.is_empty())
}

/// Keeps only the newest `capacity` tokens.
fn truncate_oldest(raw: &str, capacity: usize) -> String {
    let all: Vec<&str> = tokens(raw).collect();
    let skip = all.len().saturating_sub(capacity);

    all[skip..].iter().map(|t| token(t)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filter(store: &VarStore, match_mode: MatchMode, capacity: Option<usize>) -> IgnoreListFilter {
        IgnoreListFilter::new(
            store.clone(),
            IgnoreListOptions {
                match_mode,
                capacity,
                ..Default::default()
            },
        )
    }

    async fn stored(store: &VarStore) -> Option<String> {
        store.get("ignore").await.unwrap()
    }

    #[tokio::test]
    async fn test_empty_store_ignores_nothing() {
        let store = VarStore::memory();

        for mode in [MatchMode::Exact, MatchMode::Substring] {
            assert!(!filter(&store, mode, None).is_ignored("42").await.unwrap());
        }
    }

    #[tokio::test]
    async fn test_add_then_is_ignored() {
        for mode in [MatchMode::Exact, MatchMode::Substring] {
            let store = VarStore::memory();
            let filter = filter(&store, mode, None);

            filter.add_ignored("9").await.unwrap();

            assert!(filter.is_ignored("9").await.unwrap());
            assert_eq!(stored(&store).await.as_deref(), Some("9:"));
        }
    }

    #[tokio::test]
    async fn test_is_ignored_never_writes() {
        let store = VarStore::memory_with([("ignore", "7:")]);
        let filter = filter(&store, MatchMode::Exact, None);

        for id in ["7", "8", "7"] {
            filter.is_ignored(id).await.unwrap();
        }
        assert!(filter.is_ignored("").await.is_err());

        assert_eq!(stored(&store).await.as_deref(), Some("7:"));

        let empty = VarStore::memory();
        IgnoreListFilter::new(empty.clone(), IgnoreListOptions::default()).is_ignored("1").await.unwrap();
        assert_eq!(stored(&empty).await, None);
    }

    #[tokio::test]
    async fn test_substring_mode_keeps_the_legacy_collision() {
        let store = VarStore::memory();
        let filter = filter(&store, MatchMode::Substring, None);

        filter.add_ignored("112").await.unwrap();

        // "12:" occurs inside "112:", so an unrelated id reads as ignored.
        assert!(filter.is_ignored("12").await.unwrap());
        assert!(filter.is_ignored("2").await.unwrap());
        assert!(!filter.is_ignored("11").await.unwrap());
    }

    #[tokio::test]
    async fn test_exact_mode_has_no_collision() {
        let store = VarStore::memory();
        let filter = filter(&store, MatchMode::Exact, None);

        filter.add_ignored("112").await.unwrap();

        assert!(filter.is_ignored("112").await.unwrap());
        assert!(!filter.is_ignored("12").await.unwrap());
        assert!(!filter.is_ignored("2").await.unwrap());
    }

    #[tokio::test]
    async fn test_substring_mode_appends_duplicates() {
        let store = VarStore::memory();
        let filter = filter(&store, MatchMode::Substring, None);

        filter.add_ignored("5").await.unwrap();
        filter.add_ignored("5").await.unwrap();

        assert_eq!(stored(&store).await.as_deref(), Some("5:5:"));
    }

    #[tokio::test]
    async fn test_exact_mode_skips_duplicates() {
        let store = VarStore::memory();
        let filter = filter(&store, MatchMode::Exact, None);

        filter.add_ignored("5").await.unwrap();
        filter.add_ignored("6").await.unwrap();
        filter.add_ignored("5").await.unwrap();

        assert_eq!(stored(&store).await.as_deref(), Some("5:6:"));
        assert_eq!(filter.ignored().await.unwrap(), vec!["5", "6"]);
    }

    #[tokio::test]
    async fn test_unbounded_by_default() {
        let store = VarStore::memory();
        let filter = filter(&store, MatchMode::Exact, None);

        for id in 0..100 {
            filter.add_ignored(&id.to_string()).await.unwrap();
        }

        assert_eq!(filter.ignored().await.unwrap().len(), 100);
    }

    #[tokio::test]
    async fn test_capacity_drops_oldest() {
        let store = VarStore::memory_with([("ignore", "1:2:")]);
        let filter = filter(&store, MatchMode::Exact, Some(2));

        filter.add_ignored("3").await.unwrap();

        assert_eq!(stored(&store).await.as_deref(), Some("2:3:"));
        assert!(!filter.is_ignored("1").await.unwrap());
    }

    #[tokio::test]
    async fn test_reads_lists_written_by_the_legacy_format() {
        let store = VarStore::memory_with([("ignore", "1234:5678:")]);
        let filter = filter(&store, MatchMode::Exact, None);

        assert!(filter.is_ignored("5678").await.unwrap());
        assert_eq!(filter.ignored().await.unwrap(), vec!["1234", "5678"]);
    }

    #[tokio::test]
    async fn test_unstorable_ids_are_rejected_in_both_modes() {
        for mode in [MatchMode::Exact, MatchMode::Substring] {
            let store = VarStore::memory_with([("ignore", "a:b:")]);
            let filter = filter(&store, mode, None);

            for id in ["a:b", "", ":"] {
                let add = filter.add_ignored(id).await.unwrap_err();
                let check = filter.is_ignored(id).await.unwrap_err();

                let expected = IgnoreListError::InvalidId { id: id.to_string() };
                assert_eq!(add.downcast_ref::<IgnoreListError>(), Some(&expected));
                assert_eq!(check.downcast_ref::<IgnoreListError>(), Some(&expected));
            }

            assert_eq!(stored(&store).await.as_deref(), Some("a:b:"));
            assert!(filter.is_ignored("a").await.unwrap());
        }
    }

    #[tokio::test]
    async fn test_add_then_is_ignored_for_unusual_ids() {
        let store = VarStore::memory();
        let filter = filter(&store, MatchMode::Exact, None);

        for id in ["a-b", "1234567890123456789", "🤫", "x y"] {
            filter.add_ignored(id).await.unwrap();
            assert!(filter.is_ignored(id).await.unwrap());
        }
    }

    #[tokio::test]
    async fn test_custom_key() {
        let store = VarStore::memory();
        let filter = IgnoreListFilter::new(
            store.clone(),
            IgnoreListOptions {
                key: "shushed".to_string(),
                ..Default::default()
            },
        );

        filter.add_ignored("3").await.unwrap();

        assert_eq!(store.get("shushed").await.unwrap().as_deref(), Some("3:"));
        assert_eq!(stored(&store).await, None);
    }
}
