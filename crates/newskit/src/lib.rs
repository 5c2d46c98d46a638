//! Newskit turns CMS content entities into Apple News-style document
//! bundles: pick a template for the content subtype, normalize the
//! entity into a typed document, package document and assets into a
//! ZIP archive and hand the bytes out for preview download.

pub mod document;
pub mod entity;
pub mod error;
pub mod events;
pub mod export;
pub mod normalize;
pub mod preview;
pub mod selection;
pub mod settings;
pub mod storage;
pub mod template;

// Re-export core types
pub use document::{AssetRef, Component, DocumentMetadata, PublishableDocument};
pub use entity::{ContentEntity, EntityAsset, EntityId, EntityRef};
pub use error::{ExportError, Result};
pub use events::{
    ArticleDeleted, ArticleEvent, PublishEvents, PublishObserver, PublishOp, SettingsPhase,
};
pub use export::{
    DestinationDefinition, EXTENSION_API_VERSION, ExportDefinition, ExtensionInfo,
    ExtensionRegistry, SourceDefinition, export_id,
};
pub use normalize::{FieldNormalizer, NormalizeContext, Normalizer};
pub use preview::{
    DOCUMENT_FILE, EntityPreview, PREVIEW_TEMPLATE_ID, PreviewArchive, PreviewBuilder,
    PreviewService, PreviewState,
};
pub use selection::{TemplateSelect, TemplateSelection};
pub use settings::{ChannelId, PublishSettings, SectionId};
pub use storage::{
    ContentSource, FileContentSource, FileTemplateStorage, MemoryContentSource,
    MemoryTemplateStorage, TemplateStorage,
};
pub use template::{Template, TemplateId};

/// Get the library version
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
