//! Test-only builders and scripted stores.

use std::sync::atomic::{AtomicUsize, Ordering};

use anyhow::{Result, anyhow};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::Notify;

use crate::core::types::{FeedbackInput, FeedbackRecord, NewFeedback, Rating};
use crate::io::memory_store::MemoryStore;
use crate::io::store::{FeedbackStore, OrderSpec};

/// Input that passes validation.
pub fn valid_input() -> FeedbackInput {
    FeedbackInput {
        name: "Ada Lovelace".to_string(),
        email: "ada@example.com".to_string(),
        rating: Some(5),
        comments: None,
    }
}

/// Validated payload with the given name and no comments.
pub fn new_feedback(name: &str) -> NewFeedback {
    NewFeedback {
        name: name.to_string(),
        email: format!("{}@example.com", name.to_lowercase().replace(' ', ".")),
        rating: Rating::new(4).expect("rating in range"),
        comments: None,
    }
}

/// Stored record with a fixed RFC 3339 timestamp.
pub fn record_at(id: &str, created_at: &str) -> FeedbackRecord {
    let created_at = DateTime::parse_from_rfc3339(created_at)
        .expect("valid rfc3339 timestamp")
        .with_timezone(&Utc);
    FeedbackRecord::from_new(id.to_string(), created_at, &new_feedback(id))
}

/// Store whose every call fails, counting attempts.
#[derive(Debug, Default)]
pub struct FailingStore {
    creates: AtomicUsize,
    lists: AtomicUsize,
}

impl FailingStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create_calls(&self) -> usize {
        self.creates.load(Ordering::SeqCst)
    }

    pub fn list_calls(&self) -> usize {
        self.lists.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl FeedbackStore for FailingStore {
    fn backend_tag(&self) -> &'static str {
        "failing"
    }

    async fn create(&self, _feedback: &NewFeedback) -> Result<FeedbackRecord> {
        self.creates.fetch_add(1, Ordering::SeqCst);
        Err(anyhow!("store unavailable"))
    }

    async fn list_all(&self, _order: OrderSpec) -> Result<Vec<FeedbackRecord>> {
        self.lists.fetch_add(1, Ordering::SeqCst);
        Err(anyhow!("store unavailable"))
    }
}

/// Slow store: each create blocks until the test calls [`GatedStore::release`].
///
/// Await [`GatedStore::wait_for_create`] to know a create is in flight.
#[derive(Debug, Default)]
pub struct GatedStore {
    inner: MemoryStore,
    creates: AtomicUsize,
    entered: Notify,
    release: Notify,
}

impl GatedStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create_calls(&self) -> usize {
        self.creates.load(Ordering::SeqCst)
    }

    pub fn records(&self) -> Vec<FeedbackRecord> {
        self.inner.records()
    }

    /// Resolves once a create call has entered the store.
    pub async fn wait_for_create(&self) {
        self.entered.notified().await;
    }

    /// Let one pending (or the next) create complete.
    pub fn release(&self) {
        self.release.notify_one();
    }
}

#[async_trait]
impl FeedbackStore for GatedStore {
    fn backend_tag(&self) -> &'static str {
        "gated"
    }

    async fn create(&self, feedback: &NewFeedback) -> Result<FeedbackRecord> {
        self.creates.fetch_add(1, Ordering::SeqCst);
        self.entered.notify_one();
        self.release.notified().await;
        self.inner.create(feedback).await
    }

    async fn list_all(&self, order: OrderSpec) -> Result<Vec<FeedbackRecord>> {
        self.inner.list_all(order).await
    }
}
