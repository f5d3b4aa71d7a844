//! Backend abstraction for Archscope.
//!
//! The [`Backend`] trait is the only seam between the workflow and the
//! scraping service. The HTTP implementation lives in the `archscope` app
//! crate; [`memory::InMemoryBackend`] serves tests and offline use.
//!
//! Implementations must be `Send + Sync` to work with async runtimes.

pub mod memory;

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;

use crate::models::ArchitectureRecord;

/// Pagination for `GET /architectures`. `None` leaves the backend default.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ListQuery {
    pub skip: Option<u32>,
    pub limit: Option<u32>,
}

/// A failed backend call.
///
/// `message` is the human-readable `message` field of the error body, when
/// the backend sent one; it is what the workflow shows. `detail` describes
/// the failure for logs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendError {
    message: Option<String>,
    status: Option<u16>,
    detail: String,
}

impl BackendError {
    pub fn new(detail: impl Into<String>) -> Self {
        Self {
            message: None,
            status: None,
            detail: detail.into(),
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }

    /// Backend-provided message, if any.
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn status(&self) -> Option<u16> {
        self.status
    }

    pub fn detail(&self) -> &str {
        &self.detail
    }
}

impl fmt::Display for BackendError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.detail)?;
        if let Some(status) = self.status {
            write!(f, " (HTTP {})", status)?;
        }
        if let Some(message) = &self.message {
            write!(f, ": {}", message)?;
        }
        Ok(())
    }
}

impl std::error::Error for BackendError {}

/// The scraping service, as seen by the client.
///
/// | Method | Endpoint |
/// |--------|----------|
/// | [`scrape`](Backend::scrape) | `POST /scrape?url=...` |
/// | [`list_architectures`](Backend::list_architectures) | `GET /architectures` |
#[async_trait]
pub trait Backend: Send + Sync {
    /// Ask the backend to scrape and store `url`.
    async fn scrape(&self, url: &str) -> Result<(), BackendError>;

    /// Fetch the stored records, in the order the backend returns them.
    async fn list_architectures(
        &self,
        query: ListQuery,
    ) -> Result<Vec<ArchitectureRecord>, BackendError>;
}

#[async_trait]
impl<B: Backend + ?Sized> Backend for Arc<B> {
    async fn scrape(&self, url: &str) -> Result<(), BackendError> {
        (**self).scrape(url).await
    }

    async fn list_architectures(
        &self,
        query: ListQuery,
    ) -> Result<Vec<ArchitectureRecord>, BackendError> {
        (**self).list_architectures(query).await
    }
}
