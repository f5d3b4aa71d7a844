//! Shared display formatting: titles and timestamps.

use std::fmt::{Display, Write};

use anyhow::{bail, Result};
use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, FixedOffset, Local, TimeZone, Utc};

/// Shown in place of a missing or empty title.
pub const NO_TITLE: &str = "No Title";

/// Shown in place of a missing or unparseable timestamp.
pub const INVALID_DATE: &str = "Invalid Date";

/// e.g. `March 5, 2024, 14:30`.
pub const DEFAULT_TIMESTAMP_PATTERN: &str = "%B %-d, %Y, %H:%M";

/// Title to display for a record.
pub fn display_title(title: Option<&str>) -> &str {
    match title {
        Some(t) if !t.is_empty() => t,
        _ => NO_TITLE,
    }
}

/// Time zone timestamps are rendered in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DisplayZone {
    #[default]
    Utc,
    /// The system zone, with the offset in force at each instant.
    Local,
    Fixed(FixedOffset),
}

/// How timestamps are rendered: a `strftime` pattern and a [`DisplayZone`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimestampFormat {
    pattern: String,
    zone: DisplayZone,
}

impl TimestampFormat {
    /// Build a format, rejecting patterns chrono cannot render.
    pub fn new(pattern: impl Into<String>, zone: DisplayZone) -> Result<Self> {
        let pattern = pattern.into();
        if StrftimeItems::new(&pattern).any(|item| matches!(item, Item::Error)) {
            bail!("invalid timestamp format pattern: '{}'", pattern);
        }
        Ok(Self { pattern, zone })
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn zone(&self) -> DisplayZone {
        self.zone
    }

    /// Render `ts` in the configured zone, or [`INVALID_DATE`].
    pub fn format(&self, ts: Option<DateTime<Utc>>) -> String {
        let Some(ts) = ts else {
            return INVALID_DATE.to_string();
        };
        match self.zone {
            DisplayZone::Utc => self.render(ts),
            DisplayZone::Local => self.render(ts.with_timezone(&Local)),
            DisplayZone::Fixed(offset) => self.render(ts.with_timezone(&offset)),
        }
    }

    fn render<Tz: TimeZone>(&self, ts: DateTime<Tz>) -> String
    where
        Tz::Offset: Display,
    {
        let mut out = String::new();
        if write!(out, "{}", ts.format(&self.pattern)).is_err() {
            return ts.to_rfc3339();
        }
        out
    }
}

impl Default for TimestampFormat {
    fn default() -> Self {
        Self {
            pattern: DEFAULT_TIMESTAMP_PATTERN.to_string(),
            zone: DisplayZone::Utc,
        }
    }
}
