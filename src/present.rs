//! Plain-text presentation of cards and detail views.
//!
//! Cards are numbered from 1; `archscope show <n>` and the shell's `show`
//! command take the same number.

use std::io::{self, Write};

use archscope_core::card::CardModel;
use archscope_core::render::{ContentTab, DetailView, DisplayModel, Section, TabContent};

pub fn write_cards(out: &mut impl Write, cards: &[CardModel]) -> io::Result<()> {
    for (i, card) in cards.iter().enumerate() {
        writeln!(out, "[{}] {}", i + 1, card.title)?;
        writeln!(out, "    {}", card.timestamp)?;
        let labels = card.tag_labels();
        if !labels.is_empty() {
            writeln!(out, "    {}", labels.join(" | "))?;
        }
    }
    Ok(())
}

/// Print a detail view with the given tab selected.
///
/// The raw tab is written byte for byte with nothing appended.
pub fn write_detail(out: &mut impl Write, detail: &DetailView, tab: ContentTab) -> io::Result<()> {
    if let TabContent::Raw(text) = detail.tab(tab) {
        return out.write_all(text.as_bytes());
    }

    writeln!(out, "--- {} ---", detail.title)?;
    writeln!(out, "{}", detail.timestamp)?;
    writeln!(out)?;

    writeln!(out, "--- Source Information ---")?;
    writeln!(out, "type: {}", detail.source_type)?;
    writeln!(out, "url:  {}", detail.source_url)?;
    writeln!(out)?;

    if let Some(description) = &detail.description {
        writeln!(out, "--- Description ---")?;
        writeln!(out, "{}", description)?;
        writeln!(out)?;
    }

    writeln!(out, "--- Parsed Content ---")?;
    write_display_model(out, &detail.parsed)
}

pub fn write_display_model(out: &mut impl Write, model: &DisplayModel) -> io::Result<()> {
    for section in &model.sections {
        match section {
            Section::Field { label, value } => writeln!(out, "{}: {}", label, value)?,
            Section::Summary { text } => writeln!(out, "{}", text)?,
            Section::Tags { label, tags } => writeln!(out, "{}: {}", label, tags.join(", "))?,
            Section::Grid { heading, cells } => {
                writeln!(out, "{}:", heading)?;
                let width = cells.iter().map(|c| c.key.chars().count()).max().unwrap_or(0);
                for cell in cells {
                    writeln!(out, "  {:<width$}  {}", cell.key, cell.value, width = width)?;
                }
            }
        }
    }
    Ok(())
}
