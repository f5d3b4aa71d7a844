//! Parsed-content classification.
//!
//! The backend does not tag what kind of document it parsed, so the client
//! decides. There are exactly two variants:
//!
//! - **CloudFormation-like**: the payload is an object with a non-empty
//!   `AWSTemplateFormatVersion` field.
//! - **Service summary**: everything else, including a missing payload.
//!
//! Classification never fails. Recognized sub-mappings keep their values as
//! opaque [`serde_json::Value`]s; key order is the order received.
//!
//! # Example
//!
//! ```rust
//! use archscope_core::classify::{classify, Variant};
//! use serde_json::json;
//!
//! let payload = json!({"AWSTemplateFormatVersion": "2010-09-09"});
//! assert_eq!(classify(Some(&payload)).variant(), Variant::CloudFormationLike);
//! assert_eq!(classify(None).variant(), Variant::ServiceSummary);
//! ```

use serde::Serialize;
use serde_json::{Map, Value};

/// Field whose presence marks a CloudFormation template.
pub const TEMPLATE_VERSION_KEY: &str = "AWSTemplateFormatVersion";

/// Discriminant of [`ParsedContent`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Variant {
    CloudFormationLike,
    ServiceSummary,
}

/// Sub-structures recognized in a CloudFormation-like payload.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CloudFormationTemplate {
    pub template_version: Option<Value>,
    pub parameters: Option<Map<String, Value>>,
    pub resources: Option<Map<String, Value>>,
    pub outputs: Option<Map<String, Value>>,
}

/// Generic "what services were detected" payload.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ServiceSummary {
    pub summary: Option<String>,
    pub detected_services: Vec<String>,
    pub resources: Vec<String>,
}

impl ServiceSummary {
    /// `detected_services` followed by `resources`, as displayed.
    pub fn services(&self) -> impl Iterator<Item = &str> {
        self.detected_services
            .iter()
            .chain(self.resources.iter())
            .map(String::as_str)
    }
}

/// A classified payload.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "variant", rename_all = "snake_case")]
pub enum ParsedContent {
    CloudFormationLike(CloudFormationTemplate),
    ServiceSummary(ServiceSummary),
}

impl ParsedContent {
    pub fn variant(&self) -> Variant {
        match self {
            Self::CloudFormationLike(_) => Variant::CloudFormationLike,
            Self::ServiceSummary(_) => Variant::ServiceSummary,
        }
    }
}

/// Classify a record's parsed content.
pub fn classify(parsed: Option<&Value>) -> ParsedContent {
    let Some(object) = parsed.and_then(Value::as_object) else {
        return ParsedContent::ServiceSummary(ServiceSummary::default());
    };

    let version = object.get(TEMPLATE_VERSION_KEY).filter(|v| is_truthy(v));
    match version {
        Some(version) => ParsedContent::CloudFormationLike(CloudFormationTemplate {
            template_version: Some(version.clone()),
            parameters: mapping(object.get("Parameters")),
            resources: mapping(object.get("Resources")),
            outputs: mapping(object.get("Outputs")),
        }),
        None => ParsedContent::ServiceSummary(ServiceSummary {
            summary: object
                .get("summary")
                .and_then(scalar_text)
                .filter(|s| !s.is_empty()),
            detected_services: string_list(object.get("detected_services")),
            resources: string_list(object.get("resources")),
        }),
    }
}

/// `detected_services` then `resources` from a raw payload, whatever its
/// variant. Non-array fields count as empty.
pub fn service_tags(parsed: Option<&Value>) -> Vec<String> {
    let object = parsed.and_then(Value::as_object);
    let field = |key: &str| object.and_then(|o| o.get(key));
    let mut tags = string_list(field("detected_services"));
    tags.extend(string_list(field("resources")));
    tags
}

/// JSON truthiness: `null`, `false`, `0` and `""` are empty.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Objects map as-is; arrays map index → element.
fn mapping(value: Option<&Value>) -> Option<Map<String, Value>> {
    match value? {
        Value::Object(map) => Some(map.clone()),
        Value::Array(items) => Some(
            items
                .iter()
                .enumerate()
                .map(|(i, v)| (i.to_string(), v.clone()))
                .collect(),
        ),
        _ => None,
    }
}

fn string_list(value: Option<&Value>) -> Vec<String> {
    match value {
        Some(Value::Array(items)) => items.iter().filter_map(scalar_text).collect(),
        _ => Vec::new(),
    }
}

/// Text shown for a scalar; strings unquoted, structures as compact JSON.
/// `null` has no text.
pub(crate) fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}
