//! `archscope list` and `archscope show`.
//!
//! Both fetch the current listing through the workflow, so a failed fetch
//! reports the same message the interactive shell would show.

use std::io::Write;

use anyhow::{bail, Result};
use archscope_core::backend::Backend;
use archscope_core::card::{summarize_for_card, CardModel};
use archscope_core::format::TimestampFormat;
use archscope_core::models::ArchitectureRecord;
use archscope_core::render::{render_detail, ContentTab};
use archscope_core::workflow::Workflow;

use crate::client::open_workflow;
use crate::config::Config;
use crate::present::{write_cards, write_detail};

/// Cards for every visible record, in backend order.
pub fn cards_for<B: Backend>(workflow: &Workflow<B>, ts_format: &TimestampFormat) -> Vec<CardModel> {
    workflow
        .visible_records()
        .iter()
        .map(|record| summarize_for_card(record, ts_format))
        .collect()
}

/// Print cards as text or JSON.
pub fn print_cards(out: &mut impl Write, cards: &[CardModel], json: bool) -> Result<()> {
    if json {
        writeln!(out, "{}", serde_json::to_string_pretty(cards)?)?;
    } else if cards.is_empty() {
        writeln!(out, "No architectures found.")?;
    } else {
        write_cards(out, cards)?;
    }
    Ok(())
}

/// The record shown as card number `number` (1-based).
pub fn record_by_number(records: &[ArchitectureRecord], number: usize) -> Result<&ArchitectureRecord> {
    match number.checked_sub(1).and_then(|i| records.get(i)) {
        Some(record) => Ok(record),
        None => bail!(
            "no architecture #{} ({} listed)",
            number,
            records.len()
        ),
    }
}

pub async fn run_list(
    config: &Config,
    skip: Option<u32>,
    limit: Option<u32>,
    json: bool,
) -> Result<()> {
    let ts_format = config.timestamp_format()?;
    let mut workflow = open_workflow(config, skip, limit)?;

    workflow.fetch_all().await;
    if let Some(message) = workflow.error() {
        bail!("{}", message);
    }

    let cards = cards_for(&workflow, &ts_format);
    print_cards(&mut std::io::stdout().lock(), &cards, json)
}

pub async fn run_show(
    config: &Config,
    number: usize,
    raw: bool,
    json: bool,
    skip: Option<u32>,
) -> Result<()> {
    let ts_format = config.timestamp_format()?;
    let mut workflow = open_workflow(config, skip, None)?;

    workflow.fetch_all().await;
    if let Some(message) = workflow.error() {
        bail!("{}", message);
    }

    let record = record_by_number(workflow.visible_records(), number)?;
    let detail = render_detail(record, &ts_format);
    let tab = if raw { ContentTab::Raw } else { ContentTab::Parsed };

    let mut out = std::io::stdout().lock();
    if json {
        writeln!(out, "{}", serde_json::to_string_pretty(&detail)?)?;
    } else {
        write_detail(&mut out, &detail, tab)?;
    }
    out.flush()?;
    Ok(())
}
