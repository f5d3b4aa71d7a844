//! Variant renderers and the record detail view.
//!
//! Each renderer is a pure function from a classified payload to a
//! [`DisplayModel`]: an ordered list of [`Section`]s that a front end (the
//! terminal printer, or anything consuming the JSON form) lays out however it
//! likes. A source field that is absent produces no section at all.
//!
//! | Variant | Sections |
//! |---------|----------|
//! | CloudFormation-like | Template Version, Parameters, Resources, Outputs |
//! | Service summary | summary line, Detected Services tags |
//!
//! Parameters and Outputs cells carry the full compact JSON of each value so
//! nested structures stay inspectable. Resources cells carry only the
//! resource's `Type`.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::classify::{
    classify, scalar_text, CloudFormationTemplate, ParsedContent, ServiceSummary, Variant,
};
use crate::format::{display_title, TimestampFormat};
use crate::models::{ArchitectureRecord, SourceType};

/// One name/value cell of a [`Section::Grid`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Cell {
    pub key: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Section {
    /// A single label/value pair.
    Field { label: String, value: String },
    /// Cells derived from a name → value mapping, in received order.
    Grid { heading: String, cells: Vec<Cell> },
    /// Free-text summary line.
    Summary { text: String },
    /// A labeled list of tags.
    Tags { label: String, tags: Vec<String> },
}

/// Renderer output for the parsed tab.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DisplayModel {
    pub sections: Vec<Section>,
}

impl DisplayModel {
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }
}

/// Render a CloudFormation-like template.
pub fn render_cloudformation(template: &CloudFormationTemplate) -> DisplayModel {
    let mut sections = Vec::new();

    if let Some(version) = template.template_version.as_ref().and_then(scalar_text) {
        sections.push(Section::Field {
            label: "Template Version".to_string(),
            value: version,
        });
    }
    if let Some(parameters) = &template.parameters {
        sections.push(grid("Parameters", parameters, |v| v.to_string()));
    }
    if let Some(resources) = &template.resources {
        sections.push(grid("Resources", resources, resource_type));
    }
    if let Some(outputs) = &template.outputs {
        sections.push(grid("Outputs", outputs, |v| v.to_string()));
    }

    DisplayModel { sections }
}

/// Render a generic service summary.
pub fn render_service_summary(summary: &ServiceSummary) -> DisplayModel {
    let mut sections = Vec::new();

    if let Some(text) = &summary.summary {
        sections.push(Section::Summary { text: text.clone() });
    }

    let tags: Vec<String> = summary.services().map(str::to_string).collect();
    if !tags.is_empty() {
        sections.push(Section::Tags {
            label: "Detected Services".to_string(),
            tags,
        });
    }

    DisplayModel { sections }
}

/// Dispatch to the renderer for `content`'s variant.
pub fn render_parsed(content: &ParsedContent) -> DisplayModel {
    match content {
        ParsedContent::CloudFormationLike(template) => render_cloudformation(template),
        ParsedContent::ServiceSummary(summary) => render_service_summary(summary),
    }
}

fn grid(heading: &str, map: &Map<String, Value>, cell_value: impl Fn(&Value) -> String) -> Section {
    Section::Grid {
        heading: heading.to_string(),
        cells: map
            .iter()
            .map(|(key, value)| Cell {
                key: key.clone(),
                value: cell_value(value),
            })
            .collect(),
    }
}

/// The `Type` of a resource entry; empty when it has none.
fn resource_type(resource: &Value) -> String {
    resource
        .get("Type")
        .and_then(scalar_text)
        .unwrap_or_default()
}

/// The raw tab: `raw_content` exactly as received.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RawView {
    pub text: String,
}

pub fn render_raw(record: &ArchitectureRecord) -> RawView {
    RawView {
        text: record.raw_content.clone(),
    }
}

/// Which content tab of the detail view is shown.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentTab {
    #[default]
    Parsed,
    Raw,
}

/// Everything the detail view of one record shows.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DetailView {
    pub title: String,
    pub timestamp: String,
    pub source_type: SourceType,
    pub source_url: String,
    pub description: Option<String>,
    pub variant: Variant,
    pub parsed: DisplayModel,
    pub raw: RawView,
}

impl DetailView {
    /// Sections of the parsed tab, or the raw text, depending on `tab`.
    pub fn tab(&self, tab: ContentTab) -> TabContent<'_> {
        match tab {
            ContentTab::Parsed => TabContent::Parsed(&self.parsed),
            ContentTab::Raw => TabContent::Raw(&self.raw.text),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TabContent<'a> {
    Parsed(&'a DisplayModel),
    Raw(&'a str),
}

/// Classify and render a record for its detail view.
pub fn render_detail(record: &ArchitectureRecord, ts_format: &TimestampFormat) -> DetailView {
    let content = classify(record.parsed_content.as_ref());
    DetailView {
        title: display_title(record.title.as_deref()).to_string(),
        timestamp: ts_format.format(record.timestamp),
        source_type: record.source_type,
        source_url: record.source_url.clone(),
        description: record.description.clone().filter(|d| !d.is_empty()),
        variant: content.variant(),
        parsed: render_parsed(&content),
        raw: render_raw(record),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record_with(parsed: Option<Value>, raw: &str) -> ArchitectureRecord {
        ArchitectureRecord {
            parsed_content: parsed,
            raw_content: raw.to_string(),
            ..Default::default()
        }
    }

    fn cf(payload: Value) -> CloudFormationTemplate {
        match classify(Some(&payload)) {
            ParsedContent::CloudFormationLike(t) => t,
            other => panic!("expected CloudFormation, got {:?}", other),
        }
    }

    #[test]
    fn test_bucket_template_resources_grid() {
        let payload = json!({
            "AWSTemplateFormatVersion": "2010-09-09",
            "Resources": {"MyBucket": {"Type": "AWS::S3::Bucket"}}
        });
        let model = render_cloudformation(&cf(payload));
        assert_eq!(
            model.sections,
            vec![
                Section::Field {
                    label: "Template Version".into(),
                    value: "2010-09-09".into()
                },
                Section::Grid {
                    heading: "Resources".into(),
                    cells: vec![Cell {
                        key: "MyBucket".into(),
                        value: "AWS::S3::Bucket".into()
                    }]
                },
            ]
        );
    }

    #[test]
    fn test_parameters_and_outputs_keep_full_structure() {
        let payload = json!({
            "AWSTemplateFormatVersion": "2010-09-09",
            "Parameters": {"Env": {"Type": "String", "Default": "dev"}},
            "Resources": {"Fn": {"Type": "AWS::Lambda::Function", "Properties": {"Runtime": "python3.12"}}},
            "Outputs": {"Arn": {"Value": {"Fn::GetAtt": ["Fn", "Arn"]}}}
        });
        let model = render_cloudformation(&cf(payload));
        let grids: Vec<_> = model
            .sections
            .iter()
            .filter_map(|s| match s {
                Section::Grid { heading, cells } => Some((heading.as_str(), cells)),
                _ => None,
            })
            .collect();

        assert_eq!(grids.len(), 3);
        assert_eq!(grids[0].0, "Parameters");
        assert_eq!(grids[0].1[0].value, r#"{"Type":"String","Default":"dev"}"#);
        assert_eq!(grids[1].0, "Resources");
        assert_eq!(grids[1].1[0].value, "AWS::Lambda::Function");
        assert_eq!(grids[2].0, "Outputs");
        assert_eq!(grids[2].1[0].value, r#"{"Value":{"Fn::GetAtt":["Fn","Arn"]}}"#);
    }

    #[test]
    fn test_resource_without_type_renders_empty() {
        let payload = json!({"AWSTemplateFormatVersion": "1", "Resources": {"X": {"Props": 1}, "Y": "str"}});
        let model = render_cloudformation(&cf(payload));
        let Section::Grid { cells, .. } = &model.sections[1] else {
            panic!("expected grid");
        };
        assert_eq!(cells[0].value, "");
        assert_eq!(cells[1].value, "");
    }

    #[test]
    fn test_cloudformation_renderer_is_idempotent() {
        let template = cf(json!({
            "AWSTemplateFormatVersion": "2010-09-09",
            "Parameters": {"A": 1, "B": [1, 2]},
            "Outputs": {"O": "x"}
        }));
        assert_eq!(render_cloudformation(&template), render_cloudformation(&template));
    }

    #[test]
    fn test_service_summary_sections() {
        let summary = ServiceSummary {
            summary: Some("A web app".into()),
            detected_services: vec!["EC2".into(), "S3".into()],
            resources: vec!["S3".into()],
        };
        let model = render_service_summary(&summary);
        assert_eq!(
            model.sections,
            vec![
                Section::Summary {
                    text: "A web app".into()
                },
                Section::Tags {
                    label: "Detected Services".into(),
                    tags: vec!["EC2".into(), "S3".into(), "S3".into()]
                },
            ]
        );
    }

    #[test]
    fn test_absent_parsed_content_renders_nothing() {
        let record = record_with(None, "<html>diagram</html>");
        let detail = render_detail(&record, &TimestampFormat::default());
        assert_eq!(detail.variant, Variant::ServiceSummary);
        assert!(detail.parsed.is_empty());
        assert_eq!(
            detail.tab(ContentTab::Raw),
            TabContent::Raw("<html>diagram</html>")
        );
    }

    #[test]
    fn test_raw_view_is_verbatim_for_every_variant() {
        let raw = "AWSTemplateFormatVersion: '2010-09-09'\n  Resources: {}\n\n";
        for parsed in [
            None,
            Some(json!({"AWSTemplateFormatVersion": "2010-09-09"})),
            Some(json!({"summary": "s"})),
        ] {
            let record = record_with(parsed, raw);
            assert_eq!(render_raw(&record).text, raw);
        }
        assert_eq!(render_raw(&record_with(None, "")).text, "");
    }

    #[test]
    fn test_detail_header_fields() {
        let record = ArchitectureRecord {
            title: None,
            source_type: SourceType::Image,
            source_url: "https://example.com/a.png".into(),
            description: Some("diagram".into()),
            ..Default::default()
        };
        let detail = render_detail(&record, &TimestampFormat::default());
        assert_eq!(detail.title, "No Title");
        assert_eq!(detail.timestamp, "Invalid Date");
        assert_eq!(detail.source_type, SourceType::Image);
        assert_eq!(detail.description.as_deref(), Some("diagram"));
        assert_eq!(ContentTab::default(), ContentTab::Parsed);
    }
}
