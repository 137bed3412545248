//! Process-local store.

use std::sync::{Mutex, MutexGuard, PoisonError};

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, TimeDelta, Utc};
use tracing::debug;
use uuid::Uuid;

use crate::core::types::{FeedbackRecord, NewFeedback};
use crate::io::store::{FeedbackStore, OrderSpec};

#[derive(Debug, Default)]
struct Table {
    records: Vec<FeedbackRecord>,
    last_created_at: Option<DateTime<Utc>>,
}

/// In-memory `feedbacks` table.
///
/// `created_at` is strictly increasing across creates, so listing order is
/// total even when two submissions land within the same clock tick.
#[derive(Debug, Default)]
pub struct MemoryStore {
    table: Mutex<Table>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with existing records (fixtures, imports).
    pub fn seeded(records: Vec<FeedbackRecord>) -> Self {
        let last_created_at = records.iter().map(|r| r.created_at).max();
        Self {
            table: Mutex::new(Table {
                records,
                last_created_at,
            }),
        }
    }

    /// Records in insertion order.
    pub fn records(&self) -> Vec<FeedbackRecord> {
        self.lock().records.clone()
    }

    pub fn len(&self) -> usize {
        self.lock().records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> MutexGuard<'_, Table> {
        self.table.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl FeedbackStore for MemoryStore {
    fn backend_tag(&self) -> &'static str {
        "memory"
    }

    async fn create(&self, feedback: &NewFeedback) -> Result<FeedbackRecord> {
        let mut table = self.lock();
        let mut created_at = Utc::now();
        if let Some(last) = table.last_created_at
            && created_at <= last
        {
            created_at = last + TimeDelta::microseconds(1);
        }
        table.last_created_at = Some(created_at);

        let record = FeedbackRecord::from_new(Uuid::new_v4().to_string(), created_at, feedback);
        table.records.push(record.clone());
        debug!(id = %record.id, total = table.records.len(), "memory record created");
        Ok(record)
    }

    async fn list_all(&self, order: OrderSpec) -> Result<Vec<FeedbackRecord>> {
        let mut records = self.records();
        order.sort(&mut records);
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{new_feedback, record_at};

    #[tokio::test]
    async fn create_assigns_identity_and_increasing_timestamps() {
        let store = MemoryStore::new();
        let first = store.create(&new_feedback("first")).await.expect("create");
        let second = store.create(&new_feedback("second")).await.expect("create");

        assert_ne!(first.id, second.id);
        assert!(second.created_at > first.created_at);
        assert_eq!(store.len(), 2);
    }

    #[tokio::test]
    async fn list_all_returns_newest_first() {
        let store = MemoryStore::seeded(vec![
            record_at("t2", "2026-03-01T10:00:00Z"),
            record_at("t1", "2026-02-01T10:00:00Z"),
            record_at("t3", "2026-04-01T10:00:00Z"),
        ]);
        let records = store
            .list_all(OrderSpec::newest_first())
            .await
            .expect("list");
        let ids: Vec<&str> = records.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["t3", "t2", "t1"]);
    }

    #[tokio::test]
    async fn create_after_future_seed_still_sorts_last() {
        let store = MemoryStore::seeded(vec![record_at("future", "2999-01-01T00:00:00Z")]);
        let created = store.create(&new_feedback("now")).await.expect("create");
        let records = store
            .list_all(OrderSpec::newest_first())
            .await
            .expect("list");
        assert_eq!(records[0].id, created.id);
    }
}
