//! Normalized publishable documents
//!
//! [`PublishableDocument`] is the typed output of normalization: the
//! Apple News-flavored JSON body that gets written as `article.json`
//! plus the list of asset files the archive must carry. Producers and
//! consumers only ever exchange this record, never raw field maps.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use time::OffsetDateTime;

use crate::error::Result;

fn default_version() -> String {
    "1.7".to_string()
}

fn default_language() -> String {
    "en".to_string()
}

/// A single layout component of the document body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "role", rename_all = "lowercase")]
pub enum Component {
    Title {
        text: String,
    },
    Body {
        text: String,
    },
    Photo {
        /// `bundle://<name>` reference to a staged asset, or an
        /// absolute URL
        #[serde(rename = "URL")]
        url: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        caption: Option<String>,
    },
}

/// Document-level metadata (byline, publication date, preview image)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocumentMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub excerpt: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub authors: Vec<String>,

    #[serde(
        default,
        with = "time::serde::rfc3339::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub date_published: Option<OffsetDateTime>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail_url: Option<String>,
}

impl DocumentMetadata {
    pub fn is_empty(&self) -> bool {
        self.excerpt.is_none()
            && self.authors.is_empty()
            && self.date_published.is_none()
            && self.thumbnail_url.is_none()
    }
}

/// A file the document references and the archive must include
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetRef {
    /// File name inside the working directory and the archive
    pub name: String,

    /// Current location of the asset bytes
    pub source: PathBuf,
}

impl AssetRef {
    pub fn new(name: impl Into<String>, source: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            source: source.into(),
        }
    }

    /// The in-document reference for this asset
    pub fn bundle_url(&self) -> String {
        format!("bundle://{}", self.name)
    }
}

/// The normalized document handed to packaging
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PublishableDocument {
    /// Format version of the document body
    #[serde(default = "default_version")]
    pub version: String,

    /// Stable identifier, by convention the source entity id
    pub identifier: String,

    pub title: String,

    #[serde(default = "default_language")]
    pub language: String,

    pub components: Vec<Component>,

    #[serde(default, skip_serializing_if = "DocumentMetadata::is_empty")]
    pub metadata: DocumentMetadata,

    /// Assets to stage next to the document file
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub assets: Vec<AssetRef>,
}

impl PublishableDocument {
    pub fn new(identifier: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            version: default_version(),
            identifier: identifier.into(),
            title: title.into(),
            language: default_language(),
            components: Vec::new(),
            metadata: DocumentMetadata::default(),
            assets: Vec::new(),
        }
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    pub fn with_metadata(mut self, metadata: DocumentMetadata) -> Self {
        self.metadata = metadata;
        self
    }

    pub fn add_component(mut self, component: Component) -> Self {
        self.components.push(component);
        self
    }

    pub fn add_asset(mut self, asset: AssetRef) -> Self {
        self.assets.push(asset);
        self
    }

    /// Serialize to the canonical pretty-printed JSON written into the
    /// working directory
    pub fn to_json(&self) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec_pretty(self)?)
    }

    /// Content fingerprint over the canonical JSON form. Two documents
    /// with identical content always produce the same fingerprint.
    pub fn fingerprint(&self) -> Result<String> {
        let bytes = serde_json::to_vec(self)?;
        let digest = Sha256::digest(&bytes);
        Ok(format!("sha256:{:x}", digest))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_document() -> PublishableDocument {
        PublishableDocument::new("42", "Breaking story")
            .add_component(Component::Title {
                text: "Breaking story".to_string(),
            })
            .add_component(Component::Body {
                text: "It happened.".to_string(),
            })
            .add_asset(AssetRef::new("photo.jpg", "/tmp/photo.jpg"))
    }

    #[test]
    fn test_component_wire_format() {
        let photo = Component::Photo {
            url: "bundle://photo.jpg".to_string(),
            caption: None,
        };
        let json = serde_json::to_value(&photo).unwrap();

        assert_eq!(json["role"], "photo");
        assert_eq!(json["URL"], "bundle://photo.jpg");
        assert!(json.get("caption").is_none());

        let title = Component::Title {
            text: "Hi".to_string(),
        };
        assert_eq!(serde_json::to_value(&title).unwrap()["role"], "title");
    }

    #[test]
    fn test_document_round_trip() {
        let document = sample_document();
        let bytes = document.to_json().unwrap();
        let parsed: PublishableDocument = serde_json::from_slice(&bytes).unwrap();

        assert_eq!(parsed, document);
    }

    #[test]
    fn test_document_defaults_on_parse() {
        let parsed: PublishableDocument =
            serde_json::from_str(r#"{"identifier":"1","title":"T","components":[]}"#).unwrap();

        assert_eq!(parsed.version, "1.7");
        assert_eq!(parsed.language, "en");
        assert!(parsed.assets.is_empty());
        assert!(parsed.metadata.is_empty());
    }

    #[test]
    fn test_fingerprint_is_deterministic() {
        let a = sample_document();
        let b = sample_document();

        let fp_a = a.fingerprint().unwrap();
        assert_eq!(fp_a, b.fingerprint().unwrap());
        assert!(fp_a.starts_with("sha256:"));

        let changed = a.add_component(Component::Body {
            text: "More.".to_string(),
        });
        assert_ne!(fp_a, changed.fingerprint().unwrap());
    }

    #[test]
    fn test_bundle_url() {
        let asset = AssetRef::new("logo.png", "/srv/files/logo.png");
        assert_eq!(asset.bundle_url(), "bundle://logo.png");
    }
}
