//! `RestStore` against a local server speaking the PostgREST subset.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::Router;
use axum::extract::{Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Json, Response};
use axum::routing::get;
use chrono::{TimeDelta, Utc};
use feedback::core::types::{FeedbackRecord, NewFeedback};
use feedback::io::rest_store::RestStore;
use feedback::io::store::{FeedbackStore, OrderSpec};
use feedback::listing::{ListingView, load_listing};
use feedback::test_support::new_feedback;
use serde_json::Value;

const API_KEY: &str = "test-anon-key";

#[derive(Clone, Default)]
struct FakeTable {
    rows: Arc<Mutex<Vec<FeedbackRecord>>>,
    bodies: Arc<Mutex<Vec<Value>>>,
    fail: bool,
}

fn authorized(headers: &HeaderMap) -> bool {
    headers.get("apikey").and_then(|v| v.to_str().ok()) == Some(API_KEY)
        && headers.get("authorization").and_then(|v| v.to_str().ok())
            == Some("Bearer test-anon-key")
}

async fn insert(
    State(table): State<FakeTable>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    if !authorized(&headers) {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    if table.fail {
        return (StatusCode::INTERNAL_SERVER_ERROR, "boom").into_response();
    }
    if headers.get("prefer").and_then(|v| v.to_str().ok()) != Some("return=representation") {
        return StatusCode::CREATED.into_response();
    }
    table.bodies.lock().expect("bodies").push(body.clone());
    let Ok(payload) = serde_json::from_value::<Vec<NewFeedback>>(body) else {
        return StatusCode::BAD_REQUEST.into_response();
    };
    let mut rows = table.rows.lock().expect("rows");
    let created: Vec<FeedbackRecord> = payload
        .iter()
        .map(|feedback| {
            let id = format!("row-{}", rows.len() + 1);
            let created_at = Utc::now() + TimeDelta::seconds(rows.len() as i64);
            let record = FeedbackRecord::from_new(id, created_at, feedback);
            rows.push(record.clone());
            record
        })
        .collect();
    (StatusCode::CREATED, Json(created)).into_response()
}

async fn select(
    State(table): State<FakeTable>,
    headers: HeaderMap,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    if !authorized(&headers) {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    if table.fail {
        return (StatusCode::SERVICE_UNAVAILABLE, "down").into_response();
    }
    assert_eq!(params.get("select").map(String::as_str), Some("*"));
    let mut rows = table.rows.lock().expect("rows").clone();
    match params.get("order").map(String::as_str) {
        Some("created_at.desc") => rows.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
        Some("created_at.asc") => rows.sort_by(|a, b| a.created_at.cmp(&b.created_at)),
        _ => return StatusCode::BAD_REQUEST.into_response(),
    }
    Json(rows).into_response()
}

async fn serve(table: FakeTable) -> String {
    let app = Router::new()
        .route("/rest/v1/feedbacks", get(select).post(insert))
        .with_state(table);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind");
    let addr = listener.local_addr().expect("addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("serve");
    });
    format!("http://{addr}/")
}

#[tokio::test]
async fn insert_then_select_newest_first() {
    let table = FakeTable::default();
    let base = serve(table.clone()).await;
    let store = RestStore::new(&base, API_KEY.to_string(), 5).expect("store");
    assert!(store.table_url().ends_with("/rest/v1/feedbacks"));

    let first = store.create(&new_feedback("Grace")).await.expect("create");
    let second = store.create(&new_feedback("Ada")).await.expect("create");
    assert_eq!(first.id, "row-1");
    assert_eq!(second.comments, None);

    let records = store
        .list_all(OrderSpec::newest_first())
        .await
        .expect("list");
    let ids: Vec<&str> = records.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, vec!["row-2", "row-1"]);
    assert_eq!(table.rows.lock().expect("rows").len(), 2);
}

#[tokio::test]
async fn payload_sends_null_comments() {
    let table = FakeTable::default();
    let base = serve(table.clone()).await;
    let store = RestStore::new(&base, API_KEY.to_string(), 5).expect("store");
    store.create(&new_feedback("Ada")).await.expect("create");

    let bodies = table.bodies.lock().expect("bodies").clone();
    assert_eq!(bodies.len(), 1);
    let row = &bodies[0][0];
    assert_eq!(row["name"], "Ada");
    assert_eq!(row["rating"], 4);
    assert!(row.get("comments").is_some_and(Value::is_null));
}

#[tokio::test]
async fn wrong_key_is_an_error() {
    let base = serve(FakeTable::default()).await;
    let store = RestStore::new(&base, "wrong".to_string(), 5).expect("store");
    let err = store
        .create(&new_feedback("Ada"))
        .await
        .expect_err("unauthorized");
    assert!(format!("{err:#}").contains("401"));
}

#[tokio::test]
async fn server_errors_surface_and_listing_becomes_unavailable() {
    let table = FakeTable {
        fail: true,
        ..FakeTable::default()
    };
    let base = serve(table).await;
    let store = RestStore::new(&base, API_KEY.to_string(), 5).expect("store");

    let err = store
        .create(&new_feedback("Ada"))
        .await
        .expect_err("server error");
    assert!(format!("{err:#}").contains("500"));
    assert_eq!(load_listing(&store).await, ListingView::Unavailable);
}
