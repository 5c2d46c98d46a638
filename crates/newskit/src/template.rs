//! Export templates and their identifiers

use serde::{Deserialize, Serialize};

/// Unique identifier for a template
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TemplateId(pub String);

impl From<String> for TemplateId {
    fn from(s: String) -> Self {
        TemplateId(s)
    }
}

impl From<&str> for TemplateId {
    fn from(s: &str) -> Self {
        TemplateId(s.to_string())
    }
}

impl AsRef<str> for TemplateId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// A registered export template
///
/// Templates bind a content subtype to a layout definition. The layout
/// itself is opaque to the pipeline; it is stored and returned as raw
/// JSON and only interpreted by whatever renders the final product.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Template {
    /// Unique identifier
    pub id: TemplateId,

    /// Content subtype this template applies to ("article", "page", ...)
    pub node_type: String,

    /// Human-readable label shown in selection lists
    pub label: String,

    /// Opaque layout definition
    pub layout: serde_json::Value,

    /// Creation timestamp
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: time::OffsetDateTime,

    /// Last update timestamp
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: time::OffsetDateTime,
}

impl Template {
    /// Create a new template with an empty layout
    pub fn new(
        id: impl Into<TemplateId>,
        node_type: impl Into<String>,
        label: impl Into<String>,
    ) -> Self {
        let now = time::OffsetDateTime::now_utc();
        Template {
            id: id.into(),
            node_type: node_type.into(),
            label: label.into(),
            layout: serde_json::Value::Null,
            created_at: now,
            updated_at: now,
        }
    }

    /// Set the layout definition
    pub fn with_layout(mut self, layout: serde_json::Value) -> Self {
        self.layout = layout;
        self
    }

    /// Whether this template applies to the given content subtype
    pub fn matches_node_type(&self, node_type: &str) -> bool {
        self.node_type == node_type
    }
}
