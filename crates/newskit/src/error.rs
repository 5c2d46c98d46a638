//! Error types for the newskit export pipeline

use thiserror::Error;

/// Export pipeline errors
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Template not found: {0}")]
    TemplateNotFound(String),

    #[error("Entity not found: {entity_type}/{entity_id}")]
    EntityNotFound {
        entity_type: String,
        entity_id: String,
    },

    #[error("Revision {revision_id} not found for entity {entity_type}/{entity_id}")]
    RevisionNotFound {
        entity_type: String,
        entity_id: String,
        revision_id: String,
    },

    #[error("Entity id not usable as a path component: {0}")]
    InvalidEntityId(String),

    #[error("Invalid machine name: {0}")]
    InvalidMachineName(String),

    #[error("Extension declares api version {declared}, supported version is {supported}")]
    UnsupportedApiVersion { declared: u32, supported: u32 },

    #[error("Already registered: {0}")]
    AlreadyRegistered(String),

    #[error("Export not defined: {0}")]
    ExportNotDefined(String),

    #[error("Normalization failed: {0}")]
    Normalize(String),

    #[error("Missing asset {name}: {}", .path.display())]
    MissingAsset {
        name: String,
        path: std::path::PathBuf,
    },

    #[error("Archive error: {0}")]
    Archive(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Zip error: {0}")]
    Zip(#[from] zip::result::ZipError),
}

/// Result type for export operations
pub type Result<T> = std::result::Result<T, ExportError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_missing_asset_display_and_source() {
        let err = ExportError::MissingAsset {
            name: "photo.jpg".to_string(),
            path: std::path::PathBuf::from("/srv/files/photo.jpg"),
        };

        assert_eq!(
            err.to_string(),
            "Missing asset photo.jpg: /srv/files/photo.jpg"
        );
        assert!(err.source().is_none());
    }

    #[test]
    fn test_io_errors_keep_their_source() {
        let err = ExportError::from(std::io::Error::other("disk full"));

        assert!(err.source().is_some());
        assert!(err.to_string().contains("disk full"));
    }
}
