//! # Archscope Core
//!
//! Pure logic for Archscope: the architecture record model, parsed-content
//! classification, variant renderers, card summaries, and the submission
//! workflow state machine.
//!
//! This crate contains no tokio runtime, HTTP client, or filesystem I/O.
//! The scraping service is reached through the [`backend::Backend`] trait,
//! implemented over HTTP by the `archscope` app crate.
//!
//! ## Pipeline
//!
//! ```text
//!  Backend ──▶ Workflow ──▶ records ──┬──▶ card::summarize_for_card   (list)
//!                                     └──▶ classify ──▶ render        (detail)
//! ```

pub mod backend;
pub mod card;
pub mod classify;
pub mod format;
pub mod models;
pub mod render;
pub mod workflow;
