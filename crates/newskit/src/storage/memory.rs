//! In-memory storage implementations for testing and embedding

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::entity::{ContentEntity, EntityId};
use crate::error::{ExportError, Result};
use crate::storage::{ContentSource, TemplateStorage};
use crate::template::{Template, TemplateId};

/// In-memory template storage
#[derive(Debug, Default)]
pub struct MemoryTemplateStorage {
    templates: Mutex<HashMap<TemplateId, Template>>,
}

impl MemoryTemplateStorage {
    pub fn new() -> Self {
        Self {
            templates: Mutex::new(HashMap::new()),
        }
    }

    /// Get number of stored templates
    pub fn len(&self) -> usize {
        self.templates.lock().unwrap().len()
    }

    /// Check if storage is empty
    pub fn is_empty(&self) -> bool {
        self.templates.lock().unwrap().is_empty()
    }
}

#[async_trait]
impl TemplateStorage for MemoryTemplateStorage {
    async fn save_template(&self, template: &Template) -> Result<()> {
        let mut templates = self
            .templates
            .lock()
            .map_err(|_| ExportError::Storage("Lock poisoned".into()))?;

        templates.insert(template.id.clone(), template.clone());
        Ok(())
    }

    async fn get_template(&self, id: &TemplateId) -> Result<Template> {
        let templates = self
            .templates
            .lock()
            .map_err(|_| ExportError::Storage("Lock poisoned".into()))?;

        templates
            .get(id)
            .cloned()
            .ok_or_else(|| ExportError::TemplateNotFound(id.as_ref().to_string()))
    }

    async fn list_templates(&self) -> Result<Vec<Template>> {
        let templates = self
            .templates
            .lock()
            .map_err(|_| ExportError::Storage("Lock poisoned".into()))?;

        Ok(templates.values().cloned().collect())
    }

    async fn delete_template(&self, id: &TemplateId) -> Result<()> {
        let mut templates = self
            .templates
            .lock()
            .map_err(|_| ExportError::Storage("Lock poisoned".into()))?;

        templates.remove(id);
        Ok(())
    }
}

/// In-memory content source, seeded by hand in tests
#[derive(Debug, Default)]
pub struct MemoryContentSource {
    entities: Mutex<Vec<ContentEntity>>,
}

impl MemoryContentSource {
    pub fn new() -> Self {
        Self {
            entities: Mutex::new(Vec::new()),
        }
    }

    /// Add an entity snapshot, replacing any existing snapshot with
    /// the same type, id and revision
    pub fn insert(&self, entity: ContentEntity) {
        let mut entities = self.entities.lock().unwrap();
        entities.retain(|e| {
            !(e.entity_type == entity.entity_type
                && e.id == entity.id
                && e.revision_id == entity.revision_id)
        });
        entities.push(entity);
    }

    /// Get number of stored snapshots
    pub fn len(&self) -> usize {
        self.entities.lock().unwrap().len()
    }

    /// Check if the source is empty
    pub fn is_empty(&self) -> bool {
        self.entities.lock().unwrap().is_empty()
    }
}

#[async_trait]
impl ContentSource for MemoryContentSource {
    async fn load_entity(
        &self,
        entity_type: &str,
        id: &EntityId,
        revision_id: &str,
    ) -> Result<ContentEntity> {
        let entities = self
            .entities
            .lock()
            .map_err(|_| ExportError::Storage("Lock poisoned".into()))?;

        let mut revisions = entities
            .iter()
            .filter(|e| e.entity_type == entity_type && &e.id == id)
            .peekable();

        if revisions.peek().is_none() {
            return Err(ExportError::EntityNotFound {
                entity_type: entity_type.to_string(),
                entity_id: id.as_ref().to_string(),
            });
        }

        revisions
            .find(|e| e.revision_id == revision_id)
            .cloned()
            .ok_or_else(|| ExportError::RevisionNotFound {
                entity_type: entity_type.to_string(),
                entity_id: id.as_ref().to_string(),
                revision_id: revision_id.to_string(),
            })
    }
}
