//! Record store abstraction.
//!
//! The [`FeedbackStore`] trait decouples the form and the listing from the
//! managed backend that actually holds the `feedbacks` table. Tests use
//! in-memory and scripted stores without any network.

use std::sync::Arc;

use anyhow::{Context, Result};
use async_trait::async_trait;
use tracing::info;

use crate::core::types::{FeedbackRecord, NewFeedback};
use crate::io::config::{StoreBackend, StoreConfig};
use crate::io::file_store::FileStore;
use crate::io::memory_store::MemoryStore;
use crate::io::rest_store::RestStore;

/// Name of the remote table holding submissions.
pub const TABLE: &str = "feedbacks";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderColumn {
    CreatedAt,
}

impl OrderColumn {
    pub fn as_str(self) -> &'static str {
        match self {
            OrderColumn::CreatedAt => "created_at",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

/// Ordering requested from [`FeedbackStore::list_all`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderSpec {
    pub column: OrderColumn,
    pub direction: SortDirection,
}

impl OrderSpec {
    /// Most recent submission first.
    pub fn newest_first() -> Self {
        Self {
            column: OrderColumn::CreatedAt,
            direction: SortDirection::Descending,
        }
    }

    pub fn oldest_first() -> Self {
        Self {
            column: OrderColumn::CreatedAt,
            direction: SortDirection::Ascending,
        }
    }

    /// Sort records in place. Stable, so equal timestamps keep store order.
    pub fn sort(self, records: &mut [FeedbackRecord]) {
        match (self.column, self.direction) {
            (OrderColumn::CreatedAt, SortDirection::Ascending) => {
                records.sort_by(|a, b| a.created_at.cmp(&b.created_at));
            }
            (OrderColumn::CreatedAt, SortDirection::Descending) => {
                records.sort_by(|a, b| b.created_at.cmp(&a.created_at));
            }
        }
    }
}

/// Capability interface over the managed record store.
#[async_trait]
pub trait FeedbackStore: Send + Sync {
    /// Short backend name for logs.
    fn backend_tag(&self) -> &'static str;

    /// Create exactly one record. The store assigns `id` and `created_at`.
    async fn create(&self, feedback: &NewFeedback) -> Result<FeedbackRecord>;

    /// Read every record in the requested order.
    async fn list_all(&self, order: OrderSpec) -> Result<Vec<FeedbackRecord>>;
}

/// Build the store selected by configuration.
pub fn open_store(cfg: &StoreConfig) -> Result<Arc<dyn FeedbackStore>> {
    let store: Arc<dyn FeedbackStore> = match cfg.backend {
        StoreBackend::Memory => Arc::new(MemoryStore::new()),
        StoreBackend::File => Arc::new(FileStore::new(cfg.path.clone())),
        StoreBackend::Rest => {
            let api_key = std::env::var(&cfg.api_key_env)
                .with_context(|| format!("read store api key from ${}", cfg.api_key_env))?;
            Arc::new(RestStore::new(&cfg.url, api_key, cfg.timeout_secs)?)
        }
    };
    info!(backend = store.backend_tag(), "store opened");
    Ok(store)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::record_at;

    #[test]
    fn newest_first_sorts_descending() {
        let mut records = vec![
            record_at("t1", "2026-01-01T00:00:01Z"),
            record_at("t3", "2026-01-01T00:00:03Z"),
            record_at("t2", "2026-01-01T00:00:02Z"),
        ];
        OrderSpec::newest_first().sort(&mut records);
        let ids: Vec<&str> = records.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["t3", "t2", "t1"]);

        OrderSpec::oldest_first().sort(&mut records);
        let ids: Vec<&str> = records.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["t1", "t2", "t3"]);
    }

    #[test]
    fn open_store_requires_api_key_for_rest() {
        let cfg = StoreConfig {
            backend: StoreBackend::Rest,
            url: "https://project.example.co".to_string(),
            api_key_env: "FEEDBACK_TEST_KEY_THAT_IS_NEVER_SET".to_string(),
            ..StoreConfig::default()
        };
        let err = open_store(&cfg).err().expect("missing key");
        assert!(format!("{err:#}").contains("FEEDBACK_TEST_KEY_THAT_IS_NEVER_SET"));
    }

    #[test]
    fn open_store_builds_memory_backend() {
        let cfg = StoreConfig {
            backend: StoreBackend::Memory,
            ..StoreConfig::default()
        };
        let store = open_store(&cfg).expect("open");
        assert_eq!(store.backend_tag(), "memory");
    }
}
