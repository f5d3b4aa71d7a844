//! Submission workflow: submit a URL, refresh the listing, show or hide it.
//!
//! The workflow is an explicit state machine over a [`Backend`]. Submitting
//! and fetching each have their own busy flag and never block each other;
//! one error message is held at a time and every submit or fetch that
//! begins clears it.
//!
//! # Transitions
//!
//! | Action | Effect |
//! |--------|--------|
//! | [`submit`](Workflow::submit) | blank URL → error, no request; else scrape, then fetch |
//! | [`fetch_all`](Workflow::fetch_all) | list; success replaces the collection and shows it |
//! | [`hide`](Workflow::hide) | `Visible` → `Hidden`, collection kept |
//!
//! Each async action is also available as a `begin_*`/`complete_*` pair so a
//! caller can keep several requests in flight and apply the responses as they
//! arrive. Fetch responses are sequenced: a response to a fetch older than
//! the most recently issued one is discarded.
//!
//! # Example
//!
//! ```rust
//! use archscope_core::backend::memory::InMemoryBackend;
//! use archscope_core::workflow::{Workflow, WorkflowState};
//!
//! # tokio_test_block(async {
//! let mut workflow = Workflow::new(InMemoryBackend::new());
//! workflow.submit("   ").await;
//! assert_eq!(workflow.state(), WorkflowState::Error("Please enter a URL".into()));
//!
//! workflow.submit("https://example.com/diagram.png").await;
//! assert_eq!(workflow.state(), WorkflowState::Visible);
//! assert_eq!(workflow.visible_records().len(), 1);
//! # });
//! # fn tokio_test_block(f: impl std::future::Future<Output = ()>) {
//! #     tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(f)
//! # }
//! ```

use serde::Serialize;
use tracing::{debug, warn};

use crate::backend::{Backend, BackendError, ListQuery};
use crate::models::ArchitectureRecord;

pub const EMPTY_URL_MESSAGE: &str = "Please enter a URL";
pub const SUBMIT_FAILED_MESSAGE: &str = "Failed to submit URL";
pub const FETCH_FAILED_MESSAGE: &str = "Failed to fetch architectures";

/// Observable state of the workflow.
///
/// Busy states take precedence over the error and visibility they overlap
/// with; [`Workflow::error`] and friends expose the individual flags.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "message", rename_all = "snake_case")]
pub enum WorkflowState {
    Idle,
    Submitting,
    Fetching,
    Visible,
    Hidden,
    Error(String),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
enum Visibility {
    #[default]
    Idle,
    Visible,
    Hidden,
}

/// An accepted submission waiting for its scrape response.
#[derive(Debug)]
#[must_use]
pub struct SubmitTicket {
    url: String,
}

impl SubmitTicket {
    pub fn url(&self) -> &str {
        &self.url
    }
}

/// An issued fetch waiting for its list response.
#[derive(Debug)]
#[must_use]
pub struct FetchTicket {
    seq: u64,
    from_submit: bool,
}

/// What happened when a fetch response was applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    /// The collection was replaced with this many records.
    Loaded(usize),
    /// The error state was set; the collection is unchanged.
    Failed,
    /// A newer fetch was issued meanwhile; the response was dropped.
    Stale,
}

pub struct Workflow<B> {
    backend: B,
    list_query: ListQuery,
    input: String,
    records: Vec<ArchitectureRecord>,
    visibility: Visibility,
    submitting: bool,
    fetching: bool,
    error: Option<String>,
    last_fetch_seq: u64,
}

impl<B: Backend> Workflow<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            list_query: ListQuery::default(),
            input: String::new(),
            records: Vec::new(),
            visibility: Visibility::Idle,
            submitting: false,
            fetching: false,
            error: None,
            last_fetch_seq: 0,
        }
    }

    /// Pagination used by every fetch.
    pub fn with_list_query(mut self, query: ListQuery) -> Self {
        self.list_query = query;
        self
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn list_query(&self) -> ListQuery {
        self.list_query
    }

    /// The pending URL input.
    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn set_input(&mut self, url: impl Into<String>) {
        self.input = url.into();
    }

    pub fn state(&self) -> WorkflowState {
        if self.submitting {
            WorkflowState::Submitting
        } else if self.fetching {
            WorkflowState::Fetching
        } else if let Some(message) = &self.error {
            WorkflowState::Error(message.clone())
        } else {
            match self.visibility {
                Visibility::Idle => WorkflowState::Idle,
                Visibility::Visible => WorkflowState::Visible,
                Visibility::Hidden => WorkflowState::Hidden,
            }
        }
    }

    /// The single current error message.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    pub fn is_fetching(&self) -> bool {
        self.fetching
    }

    pub fn is_visible(&self) -> bool {
        self.visibility == Visibility::Visible
    }

    /// The held collection, whether or not it is shown.
    pub fn records(&self) -> &[ArchitectureRecord] {
        &self.records
    }

    /// The collection as displayed: empty unless visible.
    pub fn visible_records(&self) -> &[ArchitectureRecord] {
        if self.is_visible() {
            &self.records
        } else {
            &[]
        }
    }

    /// Hide the listing without dropping it. Only a later successful fetch
    /// shows it again.
    pub fn hide(&mut self) {
        if self.visibility == Visibility::Visible {
            debug!("workflow: hiding {} records", self.records.len());
            self.visibility = Visibility::Hidden;
        }
    }

    /// Start submitting the current input.
    ///
    /// Returns `None` (and sets the error) when the input is blank; no
    /// request must be made in that case.
    pub fn begin_submit(&mut self) -> Option<SubmitTicket> {
        self.error = None;
        if self.input.trim().is_empty() {
            debug!("workflow: rejected blank submission");
            self.error = Some(EMPTY_URL_MESSAGE.to_string());
            return None;
        }
        self.submitting = true;
        debug!("workflow: submitting {}", self.input);
        Some(SubmitTicket {
            url: self.input.clone(),
        })
    }

    /// Apply a scrape response.
    ///
    /// On success the input is cleared and a follow-up fetch is issued; the
    /// returned ticket must be completed with [`complete_fetch`](Self::complete_fetch),
    /// which also ends the submission. On failure the submission ends here.
    pub fn complete_submit(
        &mut self,
        ticket: SubmitTicket,
        result: Result<(), BackendError>,
    ) -> Option<FetchTicket> {
        match result {
            Ok(()) => {
                debug!("workflow: scrape accepted for {}", ticket.url);
                self.input.clear();
                let mut fetch = self.begin_fetch();
                fetch.from_submit = true;
                Some(fetch)
            }
            Err(err) => {
                warn!("scrape failed for {}: {}", ticket.url, err);
                self.error = Some(error_message(&err, SUBMIT_FAILED_MESSAGE));
                self.submitting = false;
                None
            }
        }
    }

    /// Start a fetch. Supersedes any fetch still in flight.
    pub fn begin_fetch(&mut self) -> FetchTicket {
        self.error = None;
        self.fetching = true;
        self.last_fetch_seq += 1;
        debug!("workflow: fetch #{} started", self.last_fetch_seq);
        FetchTicket {
            seq: self.last_fetch_seq,
            from_submit: false,
        }
    }

    /// Apply a list response.
    pub fn complete_fetch(
        &mut self,
        ticket: FetchTicket,
        result: Result<Vec<ArchitectureRecord>, BackendError>,
    ) -> FetchOutcome {
        if ticket.from_submit {
            self.submitting = false;
        }

        if ticket.seq < self.last_fetch_seq {
            debug!(
                "workflow: dropping response to fetch #{} (latest is #{})",
                ticket.seq, self.last_fetch_seq
            );
            return FetchOutcome::Stale;
        }

        self.fetching = false;
        match result {
            Ok(records) => {
                let count = records.len();
                debug!("workflow: fetch #{} loaded {} records", ticket.seq, count);
                self.records = records;
                self.visibility = Visibility::Visible;
                FetchOutcome::Loaded(count)
            }
            Err(err) => {
                warn!("fetching architectures failed: {}", err);
                self.error = Some(error_message(&err, FETCH_FAILED_MESSAGE));
                FetchOutcome::Failed
            }
        }
    }

    /// Submit `url`: scrape it, then refresh the listing.
    pub async fn submit(&mut self, url: &str) {
        self.set_input(url);
        self.submit_input().await;
    }

    /// Submit whatever is currently in the input.
    pub async fn submit_input(&mut self) {
        let Some(ticket) = self.begin_submit() else {
            return;
        };
        let result = self.backend.scrape(ticket.url()).await;
        if let Some(fetch) = self.complete_submit(ticket, result) {
            let result = self.backend.list_architectures(self.list_query).await;
            self.complete_fetch(fetch, result);
        }
    }

    /// Replace the held collection with the backend's current listing.
    pub async fn fetch_all(&mut self) -> FetchOutcome {
        let ticket = self.begin_fetch();
        let result = self.backend.list_architectures(self.list_query).await;
        self.complete_fetch(ticket, result)
    }
}

/// Backend message if it sent one, else the per-action fallback.
fn error_message(err: &BackendError, fallback: &str) -> String {
    match err.message() {
        Some(message) if !message.is_empty() => message.to_string(),
        _ => fallback.to_string(),
    }
}
