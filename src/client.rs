//! HTTP client for the scraping service.
//!
//! [`HttpBackend`] implements the core [`Backend`] trait over `reqwest`:
//!
//! | Method | Path | Used by |
//! |--------|------|---------|
//! | `POST` | `/scrape?url=<url>` | [`Backend::scrape`] |
//! | `GET`  | `/architectures?skip=&limit=` | [`Backend::list_architectures`] |
//! | `GET`  | `/` | [`HttpBackend::ping`] |
//!
//! Non-2xx responses become a [`BackendError`] carrying the status and, when
//! the body is a JSON object with a string `message` field, that message.
//! Requests are never retried; the configured timeout is the only limit.

use std::time::Duration;

use anyhow::{Context, Result};
use archscope_core::backend::{Backend, BackendError, ListQuery};
use archscope_core::models::ArchitectureRecord;
use archscope_core::workflow::Workflow;
use async_trait::async_trait;
use tracing::{debug, info};

use crate::config::{ApiConfig, Config};

pub struct HttpBackend {
    client: reqwest::Client,
    base_url: String,
}

impl HttpBackend {
    /// Create a client for the service at `base_url`.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn from_config(api: &ApiConfig) -> Result<Self> {
        Self::new(&api.url, Duration::from_secs(api.timeout_secs))
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    /// `GET /`: check the service is up and return its greeting.
    pub async fn ping(&self) -> Result<String, BackendError> {
        let url = self.endpoint("");
        let resp = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| transport_error("GET /", e))?;
        if !resp.status().is_success() {
            return Err(error_from_response("GET /", resp).await);
        }

        let body: serde_json::Value = resp
            .json()
            .await
            .map_err(|e| transport_error("GET /", e))?;
        Ok(body
            .get("message")
            .and_then(|m| m.as_str())
            .unwrap_or("ok")
            .to_string())
    }
}

/// A workflow over the configured service.
///
/// `skip`/`limit` override the listing window; `limit` defaults to
/// `api.page_size`.
pub fn open_workflow(
    config: &Config,
    skip: Option<u32>,
    limit: Option<u32>,
) -> Result<Workflow<HttpBackend>> {
    let backend = HttpBackend::from_config(&config.api)?;
    Ok(Workflow::new(backend).with_list_query(ListQuery {
        skip,
        limit: Some(limit.unwrap_or(config.api.page_size)),
    }))
}

#[async_trait]
impl Backend for HttpBackend {
    async fn scrape(&self, url: &str) -> Result<(), BackendError> {
        info!("requesting scrape of {}", url);
        let resp = self
            .client
            .post(self.endpoint("scrape"))
            .query(&[("url", url)])
            .send()
            .await
            .map_err(|e| transport_error("POST /scrape", e))?;

        if !resp.status().is_success() {
            return Err(error_from_response("POST /scrape", resp).await);
        }
        debug!("scrape accepted ({})", resp.status());
        Ok(())
    }

    async fn list_architectures(
        &self,
        query: ListQuery,
    ) -> Result<Vec<ArchitectureRecord>, BackendError> {
        let mut params: Vec<(&str, u32)> = Vec::new();
        if let Some(skip) = query.skip {
            params.push(("skip", skip));
        }
        if let Some(limit) = query.limit {
            params.push(("limit", limit));
        }

        debug!("listing architectures {:?}", query);
        let resp = self
            .client
            .get(self.endpoint("architectures"))
            .query(&params)
            .send()
            .await
            .map_err(|e| transport_error("GET /architectures", e))?;

        if !resp.status().is_success() {
            return Err(error_from_response("GET /architectures", resp).await);
        }

        let records: Vec<ArchitectureRecord> = resp
            .json()
            .await
            .map_err(|e| BackendError::new(format!("GET /architectures: invalid response: {}", e)))?;
        debug!("received {} architectures", records.len());
        Ok(records)
    }
}

fn transport_error(action: &str, err: reqwest::Error) -> BackendError {
    let mut backend_err = BackendError::new(format!("{} failed: {}", action, err));
    if let Some(status) = err.status() {
        backend_err = backend_err.with_status(status.as_u16());
    }
    backend_err
}

/// Build an error from a non-success response, keeping the body's
/// `message` field when there is one.
async fn error_from_response(action: &str, resp: reqwest::Response) -> BackendError {
    let status = resp.status();
    let body = resp.text().await.unwrap_or_default();
    let err = BackendError::new(format!("{} failed", action)).with_status(status.as_u16());

    match extract_message(&body) {
        Some(message) => err.with_message(message),
        None => err,
    }
}

/// The string `message` field of a JSON error body.
pub fn extract_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    value.get("message")?.as_str().map(str::to_string)
}
