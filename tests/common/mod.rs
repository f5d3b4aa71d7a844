//! A fake scraping service for integration tests.
//!
//! Serves `GET /`, `POST /scrape` and `GET /architectures` from an in-memory
//! list of JSON records, on an ephemeral port.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};

#[derive(Default)]
struct FakeState {
    records: Mutex<Vec<Value>>,
    list_failure: Mutex<Option<(StatusCode, String)>>,
    scrape_failure: Mutex<Option<(StatusCode, String)>>,
    scraped: Mutex<Vec<String>>,
    list_queries: Mutex<Vec<HashMap<String, String>>>,
}

pub struct FakeService {
    pub base_url: String,
    state: Arc<FakeState>,
}

impl FakeService {
    pub async fn start(records: Vec<Value>) -> Self {
        let state = Arc::new(FakeState {
            records: Mutex::new(records),
            ..Default::default()
        });

        let app = Router::new()
            .route("/", get(root))
            .route("/scrape", post(scrape))
            .route("/architectures", get(list_architectures))
            .with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url: format!("http://{}", addr),
            state,
        }
    }

    /// Fail every listing with `status` and the raw `body`.
    pub fn fail_list(&self, status: StatusCode, body: &str) {
        *self.state.list_failure.lock().unwrap() = Some((status, body.to_string()));
    }

    pub fn recover_list(&self) {
        *self.state.list_failure.lock().unwrap() = None;
    }

    pub fn fail_scrape(&self, status: StatusCode, body: &str) {
        *self.state.scrape_failure.lock().unwrap() = Some((status, body.to_string()));
    }

    pub fn scraped(&self) -> Vec<String> {
        self.state.scraped.lock().unwrap().clone()
    }

    pub fn list_queries(&self) -> Vec<HashMap<String, String>> {
        self.state.list_queries.lock().unwrap().clone()
    }
}

async fn root() -> Json<Value> {
    Json(json!({"message": "Welcome to the AWS Architecture Scraper API"}))
}

async fn scrape(
    State(state): State<Arc<FakeState>>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    if let Some((status, body)) = state.scrape_failure.lock().unwrap().clone() {
        return (status, body).into_response();
    }

    let url = params.get("url").cloned().unwrap_or_default();
    state.scraped.lock().unwrap().push(url.clone());
    state.records.lock().unwrap().insert(
        0,
        json!({
            "title": format!("Scraped {}", url),
            "timestamp": "2024-03-06T09:00:00",
            "source_type": "html",
            "source_url": url,
            "raw_content": "<html></html>",
            "parsed_content": {"summary": "A page", "detected_services": ["Lambda"]},
            "resources": [],
            "metadata": {}
        }),
    );
    Json(json!({"message": "Successfully scraped architecture"})).into_response()
}

async fn list_architectures(
    State(state): State<Arc<FakeState>>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    state.list_queries.lock().unwrap().push(params.clone());
    if let Some((status, body)) = state.list_failure.lock().unwrap().clone() {
        return (status, body).into_response();
    }

    let skip: usize = params.get("skip").and_then(|s| s.parse().ok()).unwrap_or(0);
    let limit: usize = params
        .get("limit")
        .and_then(|s| s.parse().ok())
        .unwrap_or(100);
    let records: Vec<Value> = state
        .records
        .lock()
        .unwrap()
        .iter()
        .skip(skip)
        .take(limit)
        .cloned()
        .collect();
    Json(Value::Array(records)).into_response()
}

/// A CloudFormation template record and a service summary record.
pub fn sample_records() -> Vec<Value> {
    vec![
        json!({
            "title": "Three-tier web app",
            "timestamp": "2024-03-05T14:30:00Z",
            "source_type": "json",
            "source_url": "https://example.com/stack.json",
            "description": "Web tier with static assets",
            "raw_content": "{\n  \"AWSTemplateFormatVersion\" : \"2010-09-09\"\n}\n",
            "parsed_content": {
                "AWSTemplateFormatVersion": "2010-09-09",
                "Resources": {
                    "WebServer": {"Type": "AWS::EC2::Instance"},
                    "Assets": {"Type": "AWS::S3::Bucket"}
                }
            },
            "resources": [],
            "metadata": {}
        }),
        json!({
            "title": null,
            "timestamp": "not a date",
            "source_type": "text",
            "source_url": "https://example.com/notes.txt",
            "raw_content": "EC2, S3, RDS and Lambda",
            "parsed_content": {
                "summary": "Notes on a serverless backend",
                "detected_services": ["EC2", "S3", "RDS"],
                "resources": ["Lambda"]
            }
        }),
    ]
}
