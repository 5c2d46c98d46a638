//! Content entity boundary types
//!
//! A [`ContentEntity`] is the CMS-agnostic snapshot of an editorial
//! record that the export pipeline consumes. Callers load one from a
//! [`ContentSource`](crate::storage::ContentSource) (or build one by
//! hand) and pass it to a normalizer; nothing downstream ever touches
//! the CMS again.

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// Unique identifier for a content entity
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntityId(pub String);

impl From<String> for EntityId {
    fn from(s: String) -> Self {
        EntityId(s)
    }
}

impl From<&str> for EntityId {
    fn from(s: &str) -> Self {
        EntityId(s.to_string())
    }
}

impl AsRef<str> for EntityId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl EntityId {
    /// The id as a single file-system path component. Ids that would
    /// escape a working directory are refused.
    pub fn as_path_component(&self) -> crate::error::Result<&str> {
        if self.0.is_empty()
            || self.0 == "."
            || self.0 == ".."
            || self.0.contains('/')
            || self.0.contains('\\')
        {
            return Err(crate::error::ExportError::InvalidEntityId(self.0.clone()));
        }
        Ok(&self.0)
    }
}

/// A lightweight pointer to an entity revision, used in notifications
/// where carrying the full record would be wasteful.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityRef {
    pub entity_type: String,
    pub entity_id: EntityId,
    pub revision_id: String,
}

/// A binary attachment of an entity (image, media file) referenced by
/// the exported document and staged next to it at archive time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityAsset {
    /// File name the asset takes inside the working directory and the
    /// archive (no path separators)
    pub name: String,

    /// Where the asset bytes currently live on disk
    pub source: PathBuf,

    /// Optional MIME type hint
    pub mime_type: Option<String>,
}

impl EntityAsset {
    pub fn new(name: impl Into<String>, source: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            source: source.into(),
            mime_type: None,
        }
    }

    pub fn with_mime_type(mut self, mime_type: impl Into<String>) -> Self {
        self.mime_type = Some(mime_type.into());
        self
    }
}

/// A content entity snapshot at a specific revision
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentEntity {
    /// Unique entity identifier
    pub id: EntityId,

    /// Entity type, e.g. "node"
    pub entity_type: String,

    /// Revision this snapshot was taken at
    pub revision_id: String,

    /// Content subtype ("article", "page", ...) used for template
    /// matching
    pub node_type: String,

    /// Display title
    pub title: String,

    /// Content language tag, if known
    pub language: Option<String>,

    /// Named field values; a sorted map so serialization and
    /// normalization stay deterministic
    pub fields: BTreeMap<String, serde_json::Value>,

    /// Attachments referenced by the content
    pub assets: Vec<EntityAsset>,

    /// When the entity was created
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,

    /// When this revision was saved
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl ContentEntity {
    /// Create a new entity snapshot at revision "1"
    pub fn new(
        entity_type: impl Into<String>,
        id: impl Into<EntityId>,
        node_type: impl Into<String>,
        title: impl Into<String>,
    ) -> Self {
        let now = OffsetDateTime::now_utc();
        Self {
            id: id.into(),
            entity_type: entity_type.into(),
            revision_id: "1".to_string(),
            node_type: node_type.into(),
            title: title.into(),
            language: None,
            fields: BTreeMap::new(),
            assets: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Pin the snapshot to a specific revision
    pub fn with_revision(mut self, revision_id: impl Into<String>) -> Self {
        self.revision_id = revision_id.into();
        self
    }

    /// Set the content language
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    /// Set a named field value
    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    /// Attach an asset
    pub fn with_asset(mut self, asset: EntityAsset) -> Self {
        self.assets.push(asset);
        self
    }

    /// Get a field as a string, if present and textual
    pub fn field_str(&self, name: &str) -> Option<&str> {
        self.fields.get(name).and_then(|v| v.as_str())
    }

    /// Pointer to this entity revision for notifications
    pub fn entity_ref(&self) -> EntityRef {
        EntityRef {
            entity_type: self.entity_type.clone(),
            entity_id: self.id.clone(),
            revision_id: self.revision_id.clone(),
        }
    }
}
