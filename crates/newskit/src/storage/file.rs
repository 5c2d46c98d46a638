use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;

use crate::entity::{ContentEntity, EntityId};
use crate::error::{ExportError, Result};
use crate::storage::{ContentSource, TemplateStorage};
use crate::template::{Template, TemplateId};

fn path_segment(value: &str) -> Result<&str> {
    if value.is_empty()
        || value == "."
        || value == ".."
        || value.contains('/')
        || value.contains('\\')
    {
        return Err(ExportError::Storage(format!(
            "Not usable as a path component: {:?}",
            value
        )));
    }
    Ok(value)
}

/// File-based template storage
///
/// Directory structure:
/// ```text
/// base_path/
/// ├── breaking-news.json
/// ├── long-read.json
/// └── ...
/// ```
pub struct FileTemplateStorage {
    base_path: PathBuf,
}

impl FileTemplateStorage {
    /// Create a new file-backed template storage
    pub async fn new(base_path: impl AsRef<Path>) -> Result<Self> {
        let base_path = base_path.as_ref().to_path_buf();
        fs::create_dir_all(&base_path).await?;
        Ok(Self { base_path })
    }

    /// Get path to a template file
    fn template_file(&self, id: &TemplateId) -> PathBuf {
        self.base_path.join(format!("{}.json", id.0))
    }
}

#[async_trait]
impl TemplateStorage for FileTemplateStorage {
    async fn save_template(&self, template: &Template) -> Result<()> {
        let template_json = serde_json::to_string_pretty(template)?;
        fs::write(self.template_file(&template.id), template_json).await?;
        Ok(())
    }

    async fn get_template(&self, id: &TemplateId) -> Result<Template> {
        let template_file = self.template_file(id);
        if !template_file.exists() {
            return Err(ExportError::TemplateNotFound(id.as_ref().to_string()));
        }

        let content = fs::read_to_string(&template_file).await?;
        let template: Template = serde_json::from_str(&content)?;
        Ok(template)
    }

    async fn list_templates(&self) -> Result<Vec<Template>> {
        let mut templates = Vec::new();
        let mut entries = fs::read_dir(&self.base_path).await?;

        while let Some(entry) = entries.next_entry().await? {
            if entry.file_type().await?.is_file() {
                let content = fs::read_to_string(entry.path()).await?;
                if let Ok(template) = serde_json::from_str::<Template>(&content) {
                    templates.push(template);
                }
            }
        }

        Ok(templates)
    }

    async fn delete_template(&self, id: &TemplateId) -> Result<()> {
        let template_file = self.template_file(id);
        if template_file.exists() {
            fs::remove_file(&template_file).await?;
        }
        Ok(())
    }
}

/// File-based content source
///
/// Directory structure:
/// ```text
/// base_path/
/// └── node/
///     └── 42/
///         ├── 1.json
///         ├── 2.json
///         └── ...
/// ```
///
/// where each file is a [`ContentEntity`] snapshot at that revision.
pub struct FileContentSource {
    base_path: PathBuf,
}

impl FileContentSource {
    /// Create a new file-backed content source
    pub async fn new(base_path: impl AsRef<Path>) -> Result<Self> {
        let base_path = base_path.as_ref().to_path_buf();
        fs::create_dir_all(&base_path).await?;
        Ok(Self { base_path })
    }

    /// Get path to an entity's revisions directory
    fn entity_dir(&self, entity_type: &str, id: &EntityId) -> Result<PathBuf> {
        Ok(self
            .base_path
            .join(path_segment(entity_type)?)
            .join(id.as_path_component()?))
    }

    /// Get path to a specific revision file
    fn revision_file(&self, entity_type: &str, id: &EntityId, revision_id: &str) -> Result<PathBuf> {
        Ok(self
            .entity_dir(entity_type, id)?
            .join(format!("{}.json", path_segment(revision_id)?)))
    }

    /// Persist an entity snapshot under its revision; mostly useful
    /// for seeding demo and test content
    pub async fn save_entity(&self, entity: &ContentEntity) -> Result<()> {
        let revision_file =
            self.revision_file(&entity.entity_type, &entity.id, &entity.revision_id)?;
        if let Some(parent) = revision_file.parent() {
            fs::create_dir_all(parent).await?;
        }

        let entity_json = serde_json::to_string_pretty(entity)?;
        fs::write(&revision_file, entity_json).await?;
        Ok(())
    }
}

#[async_trait]
impl ContentSource for FileContentSource {
    async fn load_entity(
        &self,
        entity_type: &str,
        id: &EntityId,
        revision_id: &str,
    ) -> Result<ContentEntity> {
        let entity_dir = self.entity_dir(entity_type, id)?;
        if !entity_dir.exists() {
            return Err(ExportError::EntityNotFound {
                entity_type: entity_type.to_string(),
                entity_id: id.as_ref().to_string(),
            });
        }

        let revision_file = self.revision_file(entity_type, id, revision_id)?;
        if !revision_file.exists() {
            return Err(ExportError::RevisionNotFound {
                entity_type: entity_type.to_string(),
                entity_id: id.as_ref().to_string(),
                revision_id: revision_id.to_string(),
            });
        }

        let content = fs::read_to_string(&revision_file).await?;
        let entity: ContentEntity = serde_json::from_str(&content)?;
        Ok(entity)
    }
}
