//! Integration tests for the preview packaging pipeline

use std::fs;
use std::io::{Cursor, Read};
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use newskit::*;
use tempfile::tempdir;

fn sample_entity(asset_dir: &Path) -> ContentEntity {
    let photo_path = asset_dir.join("photo.jpg");
    fs::write(&photo_path, b"not really a jpeg").unwrap();

    ContentEntity::new("node", "42", "article", "Big story")
        .with_revision("7")
        .with_field("body", "It happened today.")
        .with_asset(EntityAsset::new("photo.jpg", &photo_path).with_mime_type("image/jpeg"))
}

fn preview_service(base_dir: &Path) -> PreviewService {
    PreviewService::new(
        Arc::new(FieldNormalizer::new()),
        PreviewBuilder::new(base_dir),
    )
}

#[test]
fn test_preview_flow_produces_zip_and_leaves_no_residue() {
    let temp_dir = tempdir().unwrap();
    let assets = temp_dir.path().join("assets");
    fs::create_dir_all(&assets).unwrap();
    let base = temp_dir.path().join("preview");

    let entity = sample_entity(&assets);
    let archive = preview_service(&base).preview(&entity).unwrap();

    assert_eq!(archive.filename, "42.zip");
    assert!(archive.bytes.starts_with(b"PK\x03\x04"));

    // The archive holds exactly the document file and the staged asset
    let mut zip = zip::ZipArchive::new(Cursor::new(&archive.bytes)).unwrap();
    assert_eq!(zip.len(), 2);

    let mut document_json = String::new();
    zip.by_name("article.json")
        .unwrap()
        .read_to_string(&mut document_json)
        .unwrap();

    let mut staged = Vec::new();
    zip.by_name("photo.jpg")
        .unwrap()
        .read_to_end(&mut staged)
        .unwrap();
    assert_eq!(staged, b"not really a jpeg");

    // The document round-trips to what the normalizer produced
    let parsed: PublishableDocument = serde_json::from_str(&document_json).unwrap();
    let expected = FieldNormalizer::new()
        .normalize(&entity, &NormalizeContext::new(PREVIEW_TEMPLATE_ID))
        .unwrap();
    assert_eq!(parsed, expected);

    // Working directory and archive are gone after delivery
    assert_eq!(fs::read_dir(&base).unwrap().count(), 0);
}

#[test]
fn test_dotted_entity_id_leaves_no_residue() {
    let temp_dir = tempdir().unwrap();
    let base = temp_dir.path().join("preview");

    // Dots in the id must survive into the archive name and its cleanup
    let entity = ContentEntity::new("node", "v1.2", "article", "Point release notes");
    let archive = preview_service(&base).preview(&entity).unwrap();

    assert_eq!(archive.filename, "v1.2.zip");
    assert!(archive.bytes.starts_with(b"PK\x03\x04"));
    assert_eq!(fs::read_dir(&base).unwrap().count(), 0);
}

#[test]
fn test_archive_failure_cleans_up_and_errors() {
    let temp_dir = tempdir().unwrap();
    let base = temp_dir.path().join("preview");

    let entity = ContentEntity::new("node", "42", "article", "Big story").with_asset(
        EntityAsset::new("gone.jpg", temp_dir.path().join("does-not-exist.jpg")),
    );

    let result = preview_service(&base).preview(&entity);
    assert!(matches!(result, Err(ExportError::MissingAsset { .. })));

    // No partial archive, no working directory left behind
    assert_eq!(fs::read_dir(&base).unwrap().count(), 0);
}

/// Counts ERROR events emitted on the current thread.
struct ErrorCount(Arc<AtomicUsize>);

impl tracing::Subscriber for ErrorCount {
    fn enabled(&self, _metadata: &tracing::Metadata<'_>) -> bool {
        true
    }

    fn new_span(&self, _attrs: &tracing::span::Attributes<'_>) -> tracing::span::Id {
        tracing::span::Id::from_u64(1)
    }

    fn record(&self, _span: &tracing::span::Id, _values: &tracing::span::Record<'_>) {}

    fn record_follows_from(&self, _span: &tracing::span::Id, _follows: &tracing::span::Id) {}

    fn event(&self, event: &tracing::Event<'_>) {
        if *event.metadata().level() == tracing::Level::ERROR {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn enter(&self, _span: &tracing::span::Id) {}

    fn exit(&self, _span: &tracing::span::Id) {}
}

#[test]
fn test_archive_failure_logs_exactly_one_error() {
    let temp_dir = tempdir().unwrap();
    let base = temp_dir.path().join("preview");

    let entity = ContentEntity::new("node", "42", "article", "Big story").with_asset(
        EntityAsset::new("gone.jpg", temp_dir.path().join("does-not-exist.jpg")),
    );

    let errors = Arc::new(AtomicUsize::new(0));
    let result = tracing::subscriber::with_default(ErrorCount(errors.clone()), || {
        preview_service(&base).preview(&entity)
    });

    assert!(result.is_err());
    assert_eq!(errors.load(Ordering::SeqCst), 1);
}

#[test]
fn test_handle_walks_through_all_states() {
    let temp_dir = tempdir().unwrap();
    let base = temp_dir.path().to_path_buf();
    let builder = PreviewBuilder::new(&base);
    let entity_id = EntityId::from("42");

    let document = PublishableDocument::new("42", "Hello").add_component(Component::Title {
        text: "Hello".to_string(),
    });
    let mut preview = builder.set_entity("42", None, true, document);
    assert_eq!(preview.state(), PreviewState::Idle);

    let document_path = preview.to_file().unwrap();
    assert_eq!(preview.state(), PreviewState::DocumentBuilt);
    assert_eq!(document_path, base.join("42").join("article.json"));
    assert!(document_path.is_file());

    let archive_path = preview.archive(std::slice::from_ref(&entity_id)).unwrap();
    assert_eq!(preview.state(), PreviewState::Archived);
    assert_eq!(archive_path, base.join("42.zip"));
    assert!(archive_path.is_file());

    preview.mark_delivered();
    assert_eq!(preview.state(), PreviewState::Delivered);

    builder.entity_archive_delete(&entity_id);
    builder.remove_directories(std::slice::from_ref(&entity_id));
    preview.mark_cleaned_up();
    assert_eq!(preview.state(), PreviewState::CleanedUp);

    assert!(!archive_path.exists());
    assert!(!base.join("42").exists());
}

#[test]
fn test_cleanup_is_idempotent() {
    let temp_dir = tempdir().unwrap();
    let builder = PreviewBuilder::new(temp_dir.path());
    let entity_id = EntityId::from("42");

    let mut preview = builder.set_entity("42", None, true, PublishableDocument::new("42", "T"));
    preview.to_file().unwrap();
    preview.archive(std::slice::from_ref(&entity_id)).unwrap();

    // Deleting twice must behave exactly like deleting once
    builder.entity_archive_delete(&entity_id);
    builder.entity_archive_delete(&entity_id);
    builder.remove_directories(std::slice::from_ref(&entity_id));
    builder.remove_directories(std::slice::from_ref(&entity_id));

    assert!(!temp_dir.path().join("42.zip").exists());
    assert!(!temp_dir.path().join("42").exists());
}

#[test]
fn test_multi_entity_archive_prefixes_entries() {
    let temp_dir = tempdir().unwrap();
    let builder = PreviewBuilder::new(temp_dir.path());
    let ids = [EntityId::from("1"), EntityId::from("2")];

    let mut first = builder.set_entity("1", None, true, PublishableDocument::new("1", "One"));
    first.to_file().unwrap();

    let mut second = builder.set_entity("2", None, true, PublishableDocument::new("2", "Two"));
    second.to_file().unwrap();

    let archive_path = second.archive(&ids).unwrap();
    assert_eq!(archive_path, temp_dir.path().join("2.zip"));

    let file = fs::File::open(&archive_path).unwrap();
    let mut zip = zip::ZipArchive::new(file).unwrap();
    assert_eq!(zip.len(), 2);
    assert!(zip.by_name("1/article.json").is_ok());
    assert!(zip.by_name("2/article.json").is_ok());
}

#[test]
fn test_archive_requires_working_directories() {
    let temp_dir = tempdir().unwrap();
    let builder = PreviewBuilder::new(temp_dir.path());

    let mut preview = builder.set_entity("1", None, true, PublishableDocument::new("1", "One"));
    preview.to_file().unwrap();

    let result = preview.archive(&[EntityId::from("1"), EntityId::from("99")]);
    assert!(matches!(result, Err(ExportError::Archive(_))));
}

#[test]
fn test_to_file_overwrites_and_writes_exactly_one_file() {
    let temp_dir = tempdir().unwrap();
    let builder = PreviewBuilder::new(temp_dir.path());

    let mut preview = builder.set_entity("42", None, true, PublishableDocument::new("42", "First"));
    preview.to_file().unwrap();

    let mut again = builder.set_entity("42", None, true, PublishableDocument::new("42", "Second"));
    again.to_file().unwrap();

    let entries: Vec<_> = fs::read_dir(temp_dir.path().join("42")).unwrap().collect();
    assert_eq!(entries.len(), 1);

    let written = fs::read_to_string(temp_dir.path().join("42").join("article.json")).unwrap();
    let parsed: PublishableDocument = serde_json::from_str(&written).unwrap();
    assert_eq!(parsed.title, "Second");
}

#[test]
fn test_asset_name_colliding_with_document_file_is_rejected() {
    let temp_dir = tempdir().unwrap();
    let builder = PreviewBuilder::new(temp_dir.path());

    let document = PublishableDocument::new("42", "T")
        .add_asset(AssetRef::new("article.json", temp_dir.path().join("x.json")));
    let mut preview = builder.set_entity("42", None, true, document);
    preview.to_file().unwrap();

    let result = preview.archive(&[EntityId::from("42")]);
    assert!(matches!(result, Err(ExportError::Archive(_))));
}

#[test]
fn test_traversal_entity_id_never_touches_disk() {
    let temp_dir = tempdir().unwrap();
    let base = temp_dir.path().join("preview");
    let builder = PreviewBuilder::new(&base);

    let mut preview = builder.set_entity("../evil", None, true, PublishableDocument::new("e", "T"));
    let result = preview.to_file();

    assert!(matches!(result, Err(ExportError::InvalidEntityId(_))));
    assert!(!base.exists());
    assert!(!temp_dir.path().join("evil").exists());
}
