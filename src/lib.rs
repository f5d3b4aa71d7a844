//! # archscope
//!
//! A terminal client for an AWS architecture scraping service.
//!
//! The service scrapes a URL (a CloudFormation template, a diagram, a
//! service page), stores what it found as an architecture record, and lists
//! the records it holds. `archscope` submits URLs, lists the records as
//! cards, and shows each one in a detail view with a parsed and a raw tab.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐   ┌───────────────────┐   ┌──────────────┐
//! │ HttpBackend  │──▶│ archscope-core    │──▶│   present    │
//! │ /scrape      │   │ workflow, classify│   │ cards, detail│
//! │ /architectures│  │ render, card      │   │ (text/JSON)  │
//! └──────────────┘   └───────────────────┘   └──────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```bash
//! archscope ping                                  # is the service up?
//! archscope submit https://example.com/stack.yaml # scrape, then list
//! archscope list                                  # cards
//! archscope show 1                                # detail view
//! archscope show 1 --raw                          # raw content, verbatim
//! archscope shell                                 # interactive session
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration parsing |
//! | [`client`] | HTTP backend for the scraping service |
//! | [`present`] | Plain-text cards and detail views |
//! | [`list`] | `list` and `show` commands |
//! | [`submit`] | `submit` and `ping` commands |
//! | [`shell`] | Interactive session |

pub mod client;
pub mod config;
pub mod list;
pub mod present;
pub mod shell;
pub mod submit;
