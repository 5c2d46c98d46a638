//! Normalization of content entities into publishable documents
//!
//! Normalizers are the only code that understands CMS field layouts.
//! Everything downstream (packaging, delivery) works purely on
//! [`PublishableDocument`] values, so swapping the CMS means swapping
//! the [`Normalizer`] implementation and nothing else.

use tracing::debug;

use crate::document::{AssetRef, Component, DocumentMetadata, PublishableDocument};
use crate::entity::ContentEntity;
use crate::error::{ExportError, Result};
use crate::template::TemplateId;

/// Context a normalizer runs under
#[derive(Debug, Clone)]
pub struct NormalizeContext {
    /// Template the caller intends to publish with
    pub template_id: TemplateId,
}

impl NormalizeContext {
    pub fn new(template_id: impl Into<TemplateId>) -> Self {
        Self {
            template_id: template_id.into(),
        }
    }
}

/// Turns a content entity snapshot into a publishable document
///
/// Implementations must be deterministic: the same entity and context
/// always produce the same document (and therefore the same
/// fingerprint). The input entity is never mutated.
pub trait Normalizer: Send + Sync {
    fn normalize(&self, entity: &ContentEntity, context: &NormalizeContext)
    -> Result<PublishableDocument>;
}

/// Default normalizer mapping well-known fields onto document parts
///
/// The mapping is fixed: title → title component, the configured
/// subtitle and body fields → body components (subtitle first), the
/// excerpt/byline fields → metadata, image assets → photo components
/// with `bundle://` URLs. Every asset is carried as an [`AssetRef`]
/// whether or not it surfaces as a component.
#[derive(Debug, Clone)]
pub struct FieldNormalizer {
    /// Field holding the subtitle shown between title and body
    pub subtitle_field: String,

    /// Field holding the main body text
    pub body_field: String,

    /// Field holding the summary shown in document metadata
    pub excerpt_field: String,

    /// Field holding the byline; a string or an array of strings
    pub byline_field: String,
}

impl Default for FieldNormalizer {
    fn default() -> Self {
        Self {
            subtitle_field: "subtitle".to_string(),
            body_field: "body".to_string(),
            excerpt_field: "excerpt".to_string(),
            byline_field: "byline".to_string(),
        }
    }
}

impl FieldNormalizer {
    pub fn new() -> Self {
        Self::default()
    }

    fn authors(&self, entity: &ContentEntity) -> Vec<String> {
        match entity.fields.get(&self.byline_field) {
            Some(serde_json::Value::String(s)) => vec![s.clone()],
            Some(serde_json::Value::Array(values)) => values
                .iter()
                .filter_map(|v| v.as_str())
                .map(String::from)
                .collect(),
            _ => Vec::new(),
        }
    }
}

fn is_image(mime_type: Option<&str>) -> bool {
    mime_type.is_some_and(|m| m.starts_with("image/"))
}

impl Normalizer for FieldNormalizer {
    fn normalize(
        &self,
        entity: &ContentEntity,
        context: &NormalizeContext,
    ) -> Result<PublishableDocument> {
        if entity.title.trim().is_empty() {
            return Err(ExportError::Normalize(format!(
                "Entity {} has no title",
                entity.id.as_ref()
            )));
        }

        let mut document = PublishableDocument::new(entity.id.as_ref(), &entity.title);
        if let Some(language) = &entity.language {
            document = document.with_language(language.clone());
        }

        document = document.add_component(Component::Title {
            text: entity.title.clone(),
        });

        if let Some(subtitle) = entity.field_str(&self.subtitle_field) {
            document = document.add_component(Component::Body {
                text: subtitle.to_string(),
            });
        }

        if let Some(body) = entity.field_str(&self.body_field) {
            document = document.add_component(Component::Body {
                text: body.to_string(),
            });
        }

        let mut thumbnail_url = None;
        for asset in &entity.assets {
            let asset_ref = AssetRef::new(&asset.name, &asset.source);
            if is_image(asset.mime_type.as_deref()) {
                if thumbnail_url.is_none() {
                    thumbnail_url = Some(asset_ref.bundle_url());
                }
                document = document.add_component(Component::Photo {
                    url: asset_ref.bundle_url(),
                    caption: None,
                });
            }
            document = document.add_asset(asset_ref);
        }

        document = document.with_metadata(DocumentMetadata {
            excerpt: entity.field_str(&self.excerpt_field).map(String::from),
            authors: self.authors(entity),
            date_published: Some(entity.created_at),
            thumbnail_url,
        });

        debug!(
            entity_id = entity.id.as_ref(),
            template_id = context.template_id.as_ref(),
            components = document.components.len(),
            assets = document.assets.len(),
            "normalized entity"
        );

        Ok(document)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::EntityAsset;
    use serde_json::json;

    fn sample_entity() -> ContentEntity {
        ContentEntity::new("node", "42", "article", "Big story")
            .with_language("en-GB")
            .with_field("body", "It happened today.")
            .with_field("excerpt", "It happened.")
            .with_field("byline", json!(["Ana", "Ben"]))
            .with_asset(
                EntityAsset::new("photo.jpg", "/srv/files/photo.jpg")
                    .with_mime_type("image/jpeg"),
            )
            .with_asset(EntityAsset::new("chart.csv", "/srv/files/chart.csv"))
    }

    fn context() -> NormalizeContext {
        NormalizeContext::new("article")
    }

    #[test]
    fn test_field_mapping() {
        let document = FieldNormalizer::new()
            .normalize(&sample_entity(), &context())
            .unwrap();

        assert_eq!(document.identifier, "42");
        assert_eq!(document.title, "Big story");
        assert_eq!(document.language, "en-GB");

        assert_eq!(
            document.components[0],
            Component::Title {
                text: "Big story".to_string()
            }
        );
        assert_eq!(
            document.components[1],
            Component::Body {
                text: "It happened today.".to_string()
            }
        );
        assert_eq!(
            document.components[2],
            Component::Photo {
                url: "bundle://photo.jpg".to_string(),
                caption: None,
            }
        );

        assert_eq!(document.metadata.excerpt.as_deref(), Some("It happened."));
        assert_eq!(document.metadata.authors, vec!["Ana", "Ben"]);
        assert_eq!(
            document.metadata.thumbnail_url.as_deref(),
            Some("bundle://photo.jpg")
        );
    }

    #[test]
    fn test_all_assets_are_carried_but_only_images_become_photos() {
        let document = FieldNormalizer::new()
            .normalize(&sample_entity(), &context())
            .unwrap();

        assert_eq!(document.assets.len(), 2);
        let photos = document
            .components
            .iter()
            .filter(|c| matches!(c, Component::Photo { .. }))
            .count();
        assert_eq!(photos, 1);
    }

    #[test]
    fn test_missing_body_field_is_tolerated() {
        let entity = ContentEntity::new("node", "7", "article", "Short one");
        let document = FieldNormalizer::new().normalize(&entity, &context()).unwrap();

        assert_eq!(document.components.len(), 1);
        assert_eq!(document.language, "en");
    }

    #[test]
    fn test_untitled_entity_is_rejected() {
        let entity = ContentEntity::new("node", "7", "article", "  ");
        let result = FieldNormalizer::new().normalize(&entity, &context());

        assert!(matches!(result, Err(ExportError::Normalize(_))));
    }

    #[test]
    fn test_normalization_is_deterministic() {
        let entity = sample_entity();
        let normalizer = FieldNormalizer::new();

        let a = normalizer.normalize(&entity, &context()).unwrap();
        let b = normalizer.normalize(&entity, &context()).unwrap();

        assert_eq!(a, b);
        assert_eq!(a.fingerprint().unwrap(), b.fingerprint().unwrap());
    }

    #[test]
    fn test_subtitle_precedes_body() {
        let entity = ContentEntity::new("node", "1", "article", "T")
            .with_field("subtitle", "A closer look")
            .with_field("body", "Full text.");
        let document = FieldNormalizer::new().normalize(&entity, &context()).unwrap();

        assert_eq!(
            document.components[1],
            Component::Body {
                text: "A closer look".to_string()
            }
        );
        assert_eq!(
            document.components[2],
            Component::Body {
                text: "Full text.".to_string()
            }
        );
    }

    #[test]
    fn test_string_byline() {
        let entity = ContentEntity::new("node", "1", "article", "T").with_field("byline", "Solo");
        let document = FieldNormalizer::new().normalize(&entity, &context()).unwrap();

        assert_eq!(document.metadata.authors, vec!["Solo"]);
    }
}
