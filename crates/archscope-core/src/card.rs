//! Compact list-view summaries.
//!
//! A card shows the title, the formatted timestamp and up to
//! [`CARD_TAG_LIMIT`] service tags taken from `detected_services` followed by
//! `resources`. Cards do not consult the classifier: a CloudFormation record
//! gets tags only if it happens to carry those two fields.

use std::fmt;

use serde::Serialize;

use crate::classify::service_tags;
use crate::format::{display_title, TimestampFormat};
use crate::models::ArchitectureRecord;

/// Maximum number of tags shown on a card before the overflow indicator.
pub const CARD_TAG_LIMIT: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CardModel {
    pub title: String,
    pub timestamp: String,
    /// The first tags, verbatim and in order.
    pub tags: Vec<String>,
    /// Number of tags not shown, when there are more than [`CARD_TAG_LIMIT`].
    pub overflow: Option<usize>,
}

impl CardModel {
    /// Tags plus the `+N` indicator, as displayed.
    pub fn tag_labels(&self) -> Vec<String> {
        let mut labels = self.tags.clone();
        if let Some(more) = self.overflow {
            labels.push(format!("+{}", more));
        }
        labels
    }
}

impl fmt::Display for CardModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.title, self.timestamp)?;
        let labels = self.tag_labels();
        if !labels.is_empty() {
            write!(f, " [{}]", labels.join(", "))?;
        }
        Ok(())
    }
}

/// Summarize a record for the list view.
pub fn summarize_for_card(record: &ArchitectureRecord, ts_format: &TimestampFormat) -> CardModel {
    let mut tags = service_tags(record.parsed_content.as_ref());
    let total = tags.len();
    tags.truncate(CARD_TAG_LIMIT);

    CardModel {
        title: display_title(record.title.as_deref()).to_string(),
        timestamp: ts_format.format(record.timestamp),
        tags,
        overflow: (total > CARD_TAG_LIMIT).then(|| total - CARD_TAG_LIMIT),
    }
}
