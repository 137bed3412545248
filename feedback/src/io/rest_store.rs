//! Hosted table backend speaking the PostgREST subset used by managed
//! Postgres services (`/rest/v1/<table>`).

use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use tracing::{debug, instrument, warn};

use crate::core::types::{FeedbackRecord, NewFeedback};
use crate::io::store::{FeedbackStore, OrderSpec, SortDirection, TABLE};

const API_KEY_HEADER: &str = "apikey";
const PREFER_HEADER: &str = "prefer";

pub struct RestStore {
    client: reqwest::Client,
    table_url: String,
}

impl RestStore {
    /// `base_url` is the project URL, e.g. `https://abc.supabase.co`.
    pub fn new(base_url: &str, api_key: String, timeout_secs: u64) -> Result<Self> {
        let mut headers = HeaderMap::new();
        let key = HeaderValue::from_str(&api_key).context("store api key is not a valid header")?;
        let bearer = HeaderValue::from_str(&format!("Bearer {api_key}"))
            .context("store api key is not a valid header")?;
        headers.insert(API_KEY_HEADER, key);
        headers.insert(AUTHORIZATION, bearer);

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .context("build http client")?;

        Ok(Self {
            client,
            table_url: table_url(base_url),
        })
    }

    pub fn table_url(&self) -> &str {
        &self.table_url
    }
}

#[async_trait]
impl FeedbackStore for RestStore {
    fn backend_tag(&self) -> &'static str {
        "rest"
    }

    #[instrument(skip_all, fields(table = TABLE))]
    async fn create(&self, feedback: &NewFeedback) -> Result<FeedbackRecord> {
        let response = self
            .client
            .post(&self.table_url)
            .header(PREFER_HEADER, "return=representation")
            .json(&[feedback])
            .send()
            .await
            .with_context(|| format!("insert into {TABLE}"))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), "store rejected insert");
            return Err(anyhow!("insert into {TABLE} failed with {status}: {body}"));
        }

        let mut rows: Vec<FeedbackRecord> = response
            .json()
            .await
            .with_context(|| format!("decode {TABLE} insert response"))?;
        if rows.len() != 1 {
            return Err(anyhow!(
                "insert into {TABLE} returned {} rows, expected 1",
                rows.len()
            ));
        }
        let record = rows.remove(0);
        debug!(id = %record.id, "rest record created");
        Ok(record)
    }

    #[instrument(skip_all, fields(table = TABLE))]
    async fn list_all(&self, order: OrderSpec) -> Result<Vec<FeedbackRecord>> {
        let response = self
            .client
            .get(&self.table_url)
            .query(&[("select", "*".to_string()), ("order", order_param(order))])
            .send()
            .await
            .with_context(|| format!("select from {TABLE}"))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), "store rejected select");
            return Err(anyhow!("select from {TABLE} failed with {status}: {body}"));
        }

        let records: Vec<FeedbackRecord> = response
            .json()
            .await
            .with_context(|| format!("decode {TABLE} select response"))?;
        debug!(count = records.len(), "rest records listed");
        Ok(records)
    }
}

fn table_url(base_url: &str) -> String {
    format!("{}/rest/v1/{TABLE}", base_url.trim_end_matches('/'))
}

/// PostgREST `order` query value, e.g. `created_at.desc`.
fn order_param(order: OrderSpec) -> String {
    let direction = match order.direction {
        SortDirection::Ascending => "asc",
        SortDirection::Descending => "desc",
    };
    format!("{}.{direction}", order.column.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_url_tolerates_trailing_slash() {
        assert_eq!(
            table_url("https://abc.example.co/"),
            "https://abc.example.co/rest/v1/feedbacks"
        );
        assert_eq!(
            table_url("http://127.0.0.1:5000"),
            "http://127.0.0.1:5000/rest/v1/feedbacks"
        );
    }

    #[test]
    fn order_param_names_column_and_direction() {
        assert_eq!(order_param(OrderSpec::newest_first()), "created_at.desc");
        assert_eq!(order_param(OrderSpec::oldest_first()), "created_at.asc");
    }

    #[test]
    fn rejects_api_key_with_newline() {
        let err = RestStore::new("https://abc.example.co", "bad\nkey".to_string(), 5)
            .err()
            .expect("invalid header");
        assert!(err.to_string().contains("not a valid header"));
    }
}
