//! Preview archive construction and delivery
//!
//! The preview flow packages a normalized document into a downloadable
//! ZIP: write `article.json` into a per-entity working directory,
//! stage the document's assets next to it, bundle everything into
//! `<stem>.zip`, hand the bytes to the caller and remove all working
//! state again. [`PreviewBuilder`] owns the directory layout,
//! [`EntityPreview`] is the per-entity handle walking through the
//! packaging states, and [`PreviewService`] runs the whole flow for a
//! content entity.

use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, error, info, warn};
use uuid::Uuid;
use zip::{CompressionMethod, write::FileOptions};

use crate::document::PublishableDocument;
use crate::entity::{ContentEntity, EntityId};
use crate::error::{ExportError, Result};
use crate::normalize::{NormalizeContext, Normalizer};

/// Canonical document file name inside a working directory
pub const DOCUMENT_FILE: &str = "article.json";

/// Template id preview exports are normalized against
pub const PREVIEW_TEMPLATE_ID: &str = "article";

const DEFAULT_ARCHIVE_STEM: &str = "newskit-export";

fn safe_file_name(name: &str) -> Result<&str> {
    if name.is_empty()
        || name == "."
        || name == ".."
        || name.contains('/')
        || name.contains('\\')
    {
        return Err(ExportError::Archive(format!(
            "Not usable as a file name: {:?}",
            name
        )));
    }
    Ok(name)
}

/// Where a preview export currently stands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreviewState {
    /// Nothing written yet
    Idle,

    /// `article.json` exists in the working directory
    DocumentBuilt,

    /// The ZIP exists next to the working directory
    Archived,

    /// Archive bytes were handed to the caller
    Delivered,

    /// Working directory and archive are gone again
    CleanedUp,
}

/// Owns the preview base directory and its layout
///
/// ```text
/// base_dir/
/// ├── 42/              working directory for entity 42
/// │   ├── article.json
/// │   └── photo.jpg
/// └── 42.zip           the deliverable
/// ```
#[derive(Debug, Clone)]
pub struct PreviewBuilder {
    base_dir: PathBuf,
}

impl PreviewBuilder {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Working directory for an entity. Pure path computation, nothing
    /// is created.
    pub fn entity_dir(&self, entity_id: &EntityId) -> PathBuf {
        self.base_dir.join(entity_id.as_ref())
    }

    /// Archive stem for an entity-named archive; the deliverable lives
    /// at this path with `.zip` appended. Pure path computation.
    pub fn archive_file_path(&self, entity_id: &EntityId) -> PathBuf {
        self.base_dir.join(entity_id.as_ref())
    }

    /// Start a preview for one entity. With `entity_archive` the
    /// archive is named after the entity id and `filename` is ignored;
    /// otherwise `filename` (or a default) names the stem.
    pub fn set_entity(
        &self,
        entity_id: impl Into<EntityId>,
        filename: Option<String>,
        entity_archive: bool,
        document: PublishableDocument,
    ) -> EntityPreview {
        let entity_id = entity_id.into();
        let archive_stem = if entity_archive {
            entity_id.as_ref().to_string()
        } else {
            filename.unwrap_or_else(|| DEFAULT_ARCHIVE_STEM.to_string())
        };

        EntityPreview {
            base_dir: self.base_dir.clone(),
            entity_id,
            archive_stem,
            document,
            state: PreviewState::Idle,
        }
    }

    /// Delete an entity-named archive. Missing files are a no-op;
    /// unexpected failures are logged and swallowed so teardown never
    /// masks the flow's real outcome.
    pub fn entity_archive_delete(&self, entity_id: &EntityId) {
        if entity_id.as_path_component().is_err() {
            return;
        }

        let archive_path = self.base_dir.join(format!("{}.zip", entity_id.as_ref()));
        if archive_path.exists() {
            if let Err(err) = fs::remove_file(&archive_path) {
                warn!(
                    path = %archive_path.display(),
                    error = %err,
                    "could not delete preview archive"
                );
            }
        }
    }

    /// Delete the working directories of the given entities. Missing
    /// directories are a no-op; unexpected failures are logged and
    /// swallowed.
    pub fn remove_directories(&self, entity_ids: &[EntityId]) {
        for entity_id in entity_ids {
            if entity_id.as_path_component().is_err() {
                continue;
            }

            let dir = self.entity_dir(entity_id);
            if dir.exists() {
                if let Err(err) = fs::remove_dir_all(&dir) {
                    warn!(
                        path = %dir.display(),
                        error = %err,
                        "could not remove preview working directory"
                    );
                }
            }
        }
    }
}

/// Per-entity export handle walking Idle → DocumentBuilt → Archived →
/// Delivered → CleanedUp
pub struct EntityPreview {
    base_dir: PathBuf,
    entity_id: EntityId,
    archive_stem: String,
    document: PublishableDocument,
    state: PreviewState,
}

impl EntityPreview {
    pub fn state(&self) -> PreviewState {
        self.state
    }

    pub fn entity_id(&self) -> &EntityId {
        &self.entity_id
    }

    pub fn document(&self) -> &PublishableDocument {
        &self.document
    }

    /// Working directory of this entity
    pub fn entity_dir(&self) -> PathBuf {
        self.base_dir.join(self.entity_id.as_ref())
    }

    /// Path of the document file inside the working directory
    pub fn document_path(&self) -> PathBuf {
        self.entity_dir().join(DOCUMENT_FILE)
    }

    /// Path the deliverable ZIP lands at
    pub fn archive_path(&self) -> PathBuf {
        self.base_dir.join(format!("{}.zip", self.archive_stem))
    }

    /// Serialize the document into the working directory. Creates the
    /// directory and exactly one file, overwriting any previous
    /// document. Advances the state to [`PreviewState::DocumentBuilt`].
    pub fn to_file(&mut self) -> Result<PathBuf> {
        self.entity_id.as_path_component()?;

        let entity_dir = self.entity_dir();
        fs::create_dir_all(&entity_dir)?;

        let document_path = self.document_path();
        fs::write(&document_path, self.document.to_json()?)?;

        self.state = PreviewState::DocumentBuilt;
        Ok(document_path)
    }

    /// Stage this entity's assets and bundle the working directories
    /// of the given entities into the deliverable ZIP.
    ///
    /// A single entity produces a flat archive; several entities
    /// prefix each file with `<entity_id>/`. Every error (missing
    /// asset source, unreadable staged file, unwritable archive)
    /// propagates, and the caller decides whether to retry or tear
    /// down. Advances the state to [`PreviewState::Archived`].
    pub fn archive(&mut self, entity_ids: &[EntityId]) -> Result<PathBuf> {
        if self.state != PreviewState::DocumentBuilt {
            return Err(ExportError::Archive(format!(
                "No document file written for entity {}",
                self.entity_id.as_ref()
            )));
        }

        safe_file_name(&self.archive_stem)?;
        self.stage_assets()?;

        for entity_id in entity_ids {
            let dir = self.base_dir.join(entity_id.as_path_component()?);
            if !dir.is_dir() {
                return Err(ExportError::Archive(format!(
                    "No working directory for entity {}",
                    entity_id.as_ref()
                )));
            }
        }

        let archive_path = self.archive_path();
        let file = File::create(&archive_path)?;
        let mut zip = zip::ZipWriter::new(file);
        let options: FileOptions<'_, ()> =
            FileOptions::default().compression_method(CompressionMethod::Deflated);

        let prefixed = entity_ids.len() > 1;
        for entity_id in entity_ids {
            let dir = self.base_dir.join(entity_id.as_path_component()?);

            let mut names = Vec::new();
            for entry in fs::read_dir(&dir)? {
                let entry = entry?;
                if entry.file_type()?.is_file() {
                    names.push(entry.file_name().to_string_lossy().into_owned());
                }
            }
            names.sort_unstable();

            for name in names {
                let entry_name = if prefixed {
                    format!("{}/{}", entity_id.as_ref(), name)
                } else {
                    name.clone()
                };

                zip.start_file(&entry_name, options)?;
                let mut reader = File::open(dir.join(&name))?;
                let mut buffer = [0u8; 8192];
                loop {
                    let read = reader.read(&mut buffer)?;
                    if read == 0 {
                        break;
                    }
                    zip.write_all(&buffer[..read])?;
                }
            }
        }

        zip.finish()?;
        self.state = PreviewState::Archived;
        Ok(archive_path)
    }

    /// Copy the document's assets into the working directory
    fn stage_assets(&self) -> Result<()> {
        let entity_dir = self.entity_dir();

        for asset in &self.document.assets {
            let name = safe_file_name(&asset.name)?;
            if name == DOCUMENT_FILE {
                return Err(ExportError::Archive(format!(
                    "Asset name collides with the document file: {}",
                    name
                )));
            }
            if !asset.source.is_file() {
                return Err(ExportError::MissingAsset {
                    name: asset.name.clone(),
                    path: asset.source.clone(),
                });
            }

            fs::copy(&asset.source, entity_dir.join(name))?;
        }

        Ok(())
    }

    /// Record that the archive bytes were handed out. Expects the
    /// state to be [`PreviewState::Archived`].
    pub fn mark_delivered(&mut self) {
        self.state = PreviewState::Delivered;
    }

    /// Record that working directory and archive are gone. Expects the
    /// state to be [`PreviewState::Delivered`].
    pub fn mark_cleaned_up(&mut self) {
        self.state = PreviewState::CleanedUp;
    }
}

/// The bytes and download name of a finished preview export
#[derive(Debug, Clone)]
pub struct PreviewArchive {
    pub bytes: Vec<u8>,
    pub filename: String,
}

/// Runs the full preview flow for a content entity: normalize, write,
/// archive, read back, clean up
pub struct PreviewService {
    normalizer: Arc<dyn Normalizer>,
    builder: PreviewBuilder,
}

impl PreviewService {
    pub fn new(normalizer: Arc<dyn Normalizer>, builder: PreviewBuilder) -> Self {
        Self { normalizer, builder }
    }

    pub fn builder(&self) -> &PreviewBuilder {
        &self.builder
    }

    /// Produce the preview archive for an entity.
    ///
    /// On packaging failure this logs one error, removes any partial
    /// working state and returns the error; stale or partial archives
    /// are never handed out. On success all working state is removed
    /// before the bytes are returned.
    pub fn preview(&self, entity: &ContentEntity) -> Result<PreviewArchive> {
        let operation_id = Uuid::new_v4();
        let context = NormalizeContext::new(PREVIEW_TEMPLATE_ID);

        info!(
            %operation_id,
            entity_id = entity.id.as_ref(),
            entity_type = entity.entity_type,
            "starting preview export"
        );

        let document = self.normalizer.normalize(entity, &context)?;
        debug!(
            %operation_id,
            fingerprint = %document.fingerprint()?,
            "document normalized"
        );

        let mut preview = self
            .builder
            .set_entity(entity.id.clone(), None, true, document);
        let entity_ids = [entity.id.clone()];

        let bytes = match self.package(&mut preview, &entity_ids) {
            Ok(bytes) => bytes,
            Err(err) => {
                error!(%operation_id, error = %err, "Could not create archive");
                self.cleanup(&entity_ids);
                return Err(err);
            }
        };

        preview.mark_delivered();
        self.cleanup(&entity_ids);
        preview.mark_cleaned_up();

        let filename = format!("{}.zip", entity.id.as_ref());
        info!(
            %operation_id,
            bytes = bytes.len(),
            filename = %filename,
            "preview export complete"
        );

        Ok(PreviewArchive { bytes, filename })
    }

    fn package(&self, preview: &mut EntityPreview, entity_ids: &[EntityId]) -> Result<Vec<u8>> {
        preview.to_file()?;
        let archive_path = preview.archive(entity_ids)?;
        Ok(fs::read(&archive_path)?)
    }

    fn cleanup(&self, entity_ids: &[EntityId]) {
        for entity_id in entity_ids {
            self.builder.entity_archive_delete(entity_id);
        }
        self.builder.remove_directories(entity_ids);
    }
}
