//! Storage abstraction for templates and content entities

use async_trait::async_trait;

use crate::entity::{ContentEntity, EntityId};
use crate::error::Result;
use crate::template::{Template, TemplateId};

pub mod file;
pub mod memory;

pub use file::{FileContentSource, FileTemplateStorage};
pub use memory::{MemoryContentSource, MemoryTemplateStorage};

/// Persistence for export templates
#[async_trait]
pub trait TemplateStorage: Send + Sync {
    /// Store a template, replacing any previous version
    async fn save_template(&self, template: &Template) -> Result<()>;

    /// Retrieve a template by id
    async fn get_template(&self, id: &TemplateId) -> Result<Template>;

    /// List all registered templates
    async fn list_templates(&self) -> Result<Vec<Template>>;

    /// Delete a template; deleting an unknown id is a no-op
    async fn delete_template(&self, id: &TemplateId) -> Result<()>;
}

/// Read access to content entity snapshots
///
/// The export pipeline never talks to a CMS directly; it loads
/// revision-pinned snapshots through this seam.
#[async_trait]
pub trait ContentSource: Send + Sync {
    /// Load the snapshot of an entity at a specific revision
    async fn load_entity(
        &self,
        entity_type: &str,
        id: &EntityId,
        revision_id: &str,
    ) -> Result<ContentEntity>;
}
