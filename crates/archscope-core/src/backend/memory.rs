//! In-memory [`Backend`] implementation for testing and offline use.
//!
//! Holds records behind `std::sync::RwLock`. A scrape inserts a bare record
//! for the submitted URL at the front of the list (the service lists newest
//! first). Failures can be queued per endpoint, and every call is counted so
//! tests can assert that no request was made.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError, RwLock};

use async_trait::async_trait;
use chrono::Utc;

use crate::models::{ArchitectureRecord, SourceType};

use super::{Backend, BackendError, ListQuery};

#[derive(Default)]
pub struct InMemoryBackend {
    records: RwLock<Vec<ArchitectureRecord>>,
    scrape_failures: Mutex<VecDeque<BackendError>>,
    list_failures: Mutex<VecDeque<BackendError>>,
    scrape_calls: AtomicUsize,
    list_calls: AtomicUsize,
}

impl InMemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_records(records: Vec<ArchitectureRecord>) -> Self {
        Self {
            records: RwLock::new(records),
            ..Self::default()
        }
    }

    pub fn push_record(&self, record: ArchitectureRecord) {
        self.records
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(record);
    }

    pub fn records(&self) -> Vec<ArchitectureRecord> {
        self.records
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Make the next scrape call fail with `err`.
    pub fn fail_next_scrape(&self, err: BackendError) {
        self.scrape_failures
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push_back(err);
    }

    /// Make the next list call fail with `err`.
    pub fn fail_next_list(&self, err: BackendError) {
        self.list_failures
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push_back(err);
    }

    pub fn scrape_calls(&self) -> usize {
        self.scrape_calls.load(Ordering::SeqCst)
    }

    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }
}

fn take_failure(queue: &Mutex<VecDeque<BackendError>>) -> Option<BackendError> {
    queue
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .pop_front()
}

/// Rough stand-in for the service's content sniffing, by file extension.
fn guess_source_type(url: &str) -> SourceType {
    let path = url.split(['?', '#']).next().unwrap_or(url).to_lowercase();
    match path.rsplit_once('.').map(|(_, ext)| ext) {
        Some("png" | "jpg" | "jpeg" | "gif" | "webp") => SourceType::Image,
        Some("svg") => SourceType::Svg,
        Some("json") => SourceType::Json,
        Some("yaml" | "yml") => SourceType::Yaml,
        Some("tf" | "hcl") => SourceType::Hcl,
        Some("html" | "htm") => SourceType::Html,
        _ => SourceType::Text,
    }
}

#[async_trait]
impl Backend for InMemoryBackend {
    async fn scrape(&self, url: &str) -> Result<(), BackendError> {
        self.scrape_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(err) = take_failure(&self.scrape_failures) {
            return Err(err);
        }

        let record = ArchitectureRecord {
            timestamp: Some(Utc::now()),
            source_type: guess_source_type(url),
            source_url: url.to_string(),
            ..Default::default()
        };
        self.records
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(0, record);
        Ok(())
    }

    async fn list_architectures(
        &self,
        query: ListQuery,
    ) -> Result<Vec<ArchitectureRecord>, BackendError> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(err) = take_failure(&self.list_failures) {
            return Err(err);
        }

        let records = self.records.read().unwrap_or_else(PoisonError::into_inner);
        let skip = query.skip.unwrap_or(0) as usize;
        let limit = query.limit.map_or(usize::MAX, |l| l as usize);
        Ok(records.iter().skip(skip).take(limit).cloned().collect())
    }
}
