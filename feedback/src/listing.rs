//! Listing reader for the submissions page.
//!
//! One read per page visit, newest first. No pagination, no retry: a failed
//! read leaves the page in the stalled state until the next visit.

use anyhow::Result;
use serde::Serialize;
use tracing::{debug, instrument, warn};

use crate::core::types::FeedbackRecord;
use crate::io::store::{FeedbackStore, OrderSpec};

/// Shown in place of an absent comment.
pub const NO_COMMENTS_PLACEHOLDER: &str = "No comments";
/// Display format for submission dates, e.g. `Oct 16, 2026`.
pub const DATE_FORMAT: &str = "%b %-d, %Y";

/// Read every submission, most recent first.
pub async fn fetch_all<S: FeedbackStore + ?Sized>(store: &S) -> Result<Vec<FeedbackRecord>> {
    store.list_all(OrderSpec::newest_first()).await
}

/// What the listing page shows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "rows", rename_all = "lowercase")]
pub enum ListingView {
    Loaded(Vec<ListingRow>),
    Empty,
    /// The read failed; rendered as a stalled load with no data.
    Unavailable,
}

impl ListingView {
    pub fn from_records(records: &[FeedbackRecord]) -> Self {
        if records.is_empty() {
            return ListingView::Empty;
        }
        ListingView::Loaded(records.iter().map(ListingRow::from_record).collect())
    }

    /// Card header: submission count once data is in, `Loading...` otherwise.
    pub fn summary(&self) -> String {
        match self {
            ListingView::Loaded(rows) => format!("{} total submissions", rows.len()),
            ListingView::Empty => "0 total submissions".to_string(),
            ListingView::Unavailable => "Loading...".to_string(),
        }
    }

    pub fn rows(&self) -> &[ListingRow] {
        match self {
            ListingView::Loaded(rows) => rows,
            ListingView::Empty | ListingView::Unavailable => &[],
        }
    }
}

/// One rendered table row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListingRow {
    pub id: String,
    pub date: String,
    pub name: String,
    pub email: String,
    pub rating: u8,
    pub comments: String,
    /// False when `comments` holds the placeholder.
    pub has_comments: bool,
}

impl ListingRow {
    pub fn from_record(record: &FeedbackRecord) -> Self {
        let (comments, has_comments) = match record.comments.as_deref() {
            Some(text) if !text.is_empty() => (text.to_string(), true),
            _ => (NO_COMMENTS_PLACEHOLDER.to_string(), false),
        };
        Self {
            id: record.id.clone(),
            date: record.created_at.format(DATE_FORMAT).to_string(),
            name: record.name.clone(),
            email: record.email.clone(),
            rating: record.rating.get(),
            comments,
            has_comments,
        }
    }
}

/// Fetch and shape the listing. Read errors become [`ListingView::Unavailable`].
#[instrument(skip_all, fields(backend = store.backend_tag()))]
pub async fn load_listing<S: FeedbackStore + ?Sized>(store: &S) -> ListingView {
    match fetch_all(store).await {
        Ok(records) => {
            debug!(count = records.len(), "listing loaded");
            ListingView::from_records(&records)
        }
        Err(err) => {
            warn!(error = %format!("{err:#}"), "listing read failed");
            ListingView::Unavailable
        }
    }
}
