//! JSON file store for local runs.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::{debug, instrument};
use uuid::Uuid;

use crate::core::types::{FeedbackRecord, NewFeedback};
use crate::io::config::write_atomic;
use crate::io::store::{FeedbackStore, OrderSpec, TABLE};

/// On-disk document: `{"feedbacks": [...]}` in insertion order.
#[derive(Debug, Default, Serialize, Deserialize)]
struct Document {
    #[serde(rename = "feedbacks", default)]
    records: Vec<FeedbackRecord>,
}

/// Store backed by a single JSON document.
///
/// Creates rewrite the whole document atomically (temp file + rename). A
/// missing file is an empty table.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl FileStore {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            write_lock: Mutex::new(()),
        }
    }
}

#[async_trait]
impl FeedbackStore for FileStore {
    fn backend_tag(&self) -> &'static str {
        "file"
    }

    #[instrument(skip_all, fields(path = %self.path.display()))]
    async fn create(&self, feedback: &NewFeedback) -> Result<FeedbackRecord> {
        let _guard = self.write_lock.lock().await;
        let mut doc = load_document(&self.path)?;

        let mut created_at = Utc::now();
        if let Some(last) = doc.records.iter().map(|r| r.created_at).max()
            && created_at <= last
        {
            created_at = last + TimeDelta::microseconds(1);
        }

        let record = FeedbackRecord::from_new(Uuid::new_v4().to_string(), created_at, feedback);
        doc.records.push(record.clone());
        write_document(&self.path, &doc)?;
        debug!(id = %record.id, total = doc.records.len(), "file record created");
        Ok(record)
    }

    async fn list_all(&self, order: OrderSpec) -> Result<Vec<FeedbackRecord>> {
        let mut records = load_document(&self.path)?.records;
        order.sort(&mut records);
        Ok(records)
    }
}

fn load_document(path: &Path) -> Result<Document> {
    if !path.exists() {
        return Ok(Document::default());
    }
    let contents = fs::read_to_string(path)
        .with_context(|| format!("read {TABLE} file {}", path.display()))?;
    serde_json::from_str(&contents)
        .with_context(|| format!("parse {TABLE} file {}", path.display()))
}

fn write_document(path: &Path, doc: &Document) -> Result<()> {
    let mut buf = serde_json::to_string_pretty(doc).context("serialize feedbacks")?;
    buf.push('\n');
    write_atomic(path, &buf)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::new_feedback;

    #[tokio::test]
    async fn missing_file_lists_empty() {
        let temp = tempfile::tempdir().expect("tempdir");
        let store = FileStore::new(temp.path().join("feedbacks.json"));
        let records = store
            .list_all(OrderSpec::newest_first())
            .await
            .expect("list");
        assert!(records.is_empty());
    }

    #[tokio::test]
    async fn created_records_survive_reopen() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join("data").join("feedbacks.json");

        let store = FileStore::new(path.clone());
        let first = store.create(&new_feedback("first")).await.expect("create");
        let second = store.create(&new_feedback("second")).await.expect("create");

        let reopened = FileStore::new(path.clone());
        let records = reopened
            .list_all(OrderSpec::newest_first())
            .await
            .expect("list");
        let ids: Vec<&str> = records.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec![second.id.as_str(), first.id.as_str()]);
        assert!(!path.with_file_name("feedbacks.json.tmp").exists());
    }

    #[tokio::test]
    async fn absent_comments_are_stored_as_null() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join("feedbacks.json");
        let store = FileStore::new(path.clone());
        store.create(&new_feedback("ada")).await.expect("create");

        let raw: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).expect("read")).expect("json");
        assert!(raw["feedbacks"][0]["comments"].is_null());
    }

    #[tokio::test]
    async fn corrupt_file_is_an_error() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join("feedbacks.json");
        fs::write(&path, "not json").expect("write");
        let store = FileStore::new(path);
        let err = store
            .list_all(OrderSpec::newest_first())
            .await
            .expect_err("corrupt");
        assert!(format!("{err:#}").contains("parse feedbacks file"));
    }
}
