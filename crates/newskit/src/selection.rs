//! Template selection for content subtypes

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::Serialize;

use crate::error::Result;
use crate::storage::TemplateStorage;
use crate::template::{Template, TemplateId};

/// Render-agnostic description of a template picker: a title and the
/// id → label choices, sorted by id. Whatever UI consumes this decides
/// how to render it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TemplateSelect {
    pub title: String,
    pub options: BTreeMap<TemplateId, String>,
}

/// Looks up which templates apply to a content subtype
#[derive(Clone)]
pub struct TemplateSelection {
    storage: Arc<dyn TemplateStorage>,
}

impl TemplateSelection {
    pub fn new(storage: Arc<dyn TemplateStorage>) -> Self {
        Self { storage }
    }

    /// All templates registered for the given content subtype, keyed
    /// by id. Matching is an exact comparison on the template's
    /// `node_type`; a subtype with no templates yields an empty map.
    pub async fn templates_for_node_type(
        &self,
        node_type: &str,
    ) -> Result<BTreeMap<TemplateId, Template>> {
        let templates = self.storage.list_templates().await?;

        Ok(templates
            .into_iter()
            .filter(|t| t.matches_node_type(node_type))
            .map(|t| (t.id.clone(), t))
            .collect())
    }

    /// The selection element for the given content subtype. An empty
    /// template set produces an element with empty options, never an
    /// error.
    pub async fn selection_element(&self, node_type: &str) -> Result<TemplateSelect> {
        let templates = self.templates_for_node_type(node_type).await?;

        Ok(TemplateSelect {
            title: "Available templates".to_string(),
            options: templates
                .into_iter()
                .map(|(id, template)| (id, template.label))
                .collect(),
        })
    }
}
