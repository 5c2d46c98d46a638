//! API request and response models

use newskit::Template;
use serde::Serialize;
use time::OffsetDateTime;

/// Standard API response wrapper
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub data: T,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn new(data: T) -> Self {
        Self {
            data,
            message: None,
        }
    }

    pub fn with_message(data: T, message: &str) -> Self {
        Self {
            data,
            message: Some(message.to_string()),
        }
    }
}

/// Template listing entry, without the layout payload
#[derive(Debug, Serialize)]
pub struct TemplateSummary {
    pub id: String,
    pub node_type: String,
    pub label: String,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl From<Template> for TemplateSummary {
    fn from(template: Template) -> Self {
        Self {
            id: template.id.0,
            node_type: template.node_type,
            label: template.label,
            updated_at: template.updated_at,
        }
    }
}
