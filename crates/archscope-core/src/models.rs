//! Core data models used throughout Archscope.
//!
//! An [`ArchitectureRecord`] is produced by the scraping backend and consumed
//! read-only by the client. Deserialization is deliberately forgiving: every
//! optional field may be missing, and `null` is accepted wherever a default
//! exists, so a single odd record never fails a whole listing.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

/// How the backend interpreted the submitted resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SourceType {
    Html,
    Text,
    Svg,
    Yaml,
    Json,
    Hcl,
    Image,
    /// Missing or unrecognized tag.
    #[default]
    Unknown,
}

impl SourceType {
    /// Parse a backend tag. Matching is case-insensitive; anything
    /// unrecognized becomes [`SourceType::Unknown`].
    pub fn parse(tag: &str) -> Self {
        match tag.trim().to_lowercase().as_str() {
            "html" => Self::Html,
            "text" => Self::Text,
            "svg" => Self::Svg,
            "yaml" => Self::Yaml,
            "json" => Self::Json,
            "hcl" => Self::Hcl,
            "image" => Self::Image,
            _ => Self::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Html => "html",
            Self::Text => "text",
            Self::Svg => "svg",
            Self::Yaml => "yaml",
            Self::Json => "json",
            Self::Hcl => "hcl",
            Self::Image => "image",
            Self::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for SourceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for SourceType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for SourceType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Option::<Value>::deserialize(deserializer)?;
        Ok(match value {
            Some(Value::String(tag)) => Self::parse(&tag),
            _ => Self::Unknown,
        })
    }
}

/// A resource extracted by the backend alongside the parsed content.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Resource {
    #[serde(rename = "type", default, deserialize_with = "null_as_default")]
    pub resource_type: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub properties: Map<String, Value>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub connections: Vec<String>,
}

/// One scraped-and-parsed architecture description.
///
/// `raw_content` is kept verbatim and is never reformatted; it is the
/// fallback whenever `parsed_content` yields nothing useful.
/// `parsed_content` stays untyped until [`classify`](crate::classify::classify)
/// decides which variant it represents.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ArchitectureRecord {
    #[serde(default)]
    pub title: Option<String>,
    /// `None` when the backend sent no timestamp or one we could not parse.
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub timestamp: Option<DateTime<Utc>>,
    #[serde(default)]
    pub source_type: SourceType,
    #[serde(default, deserialize_with = "null_as_default")]
    pub source_url: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub raw_content: String,
    #[serde(default)]
    pub parsed_content: Option<Value>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub resources: Vec<Resource>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub metadata: Map<String, Value>,
}

impl ArchitectureRecord {
    /// Look up a top-level key of the parsed content, if it is an object.
    pub fn parsed_field(&self, key: &str) -> Option<&Value> {
        self.parsed_content.as_ref()?.as_object()?.get(key)
    }
}

/// Treat an explicit `null` the same as a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Accept RFC 3339 strings, naive ISO 8601 strings (read as UTC, which is
/// what the backend stores), and epoch milliseconds. Anything else is `None`.
fn lenient_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) => parse_timestamp(&s),
        Some(Value::Number(n)) => n.as_i64().and_then(DateTime::from_timestamp_millis),
        _ => None,
    })
}

/// Parse a timestamp string the way [`ArchitectureRecord`] deserialization does.
pub fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .map(|naive| naive.and_utc())
}
