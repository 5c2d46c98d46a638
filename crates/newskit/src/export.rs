//! Extension registration contract
//!
//! Extensions declare what they contribute to the pipeline (export
//! flows, content sources and publishing destinations) as an
//! [`ExtensionInfo`] record registered under their module name. The
//! [`ExtensionRegistry`] validates the declaration as a whole before
//! accepting any of it, so a bad declaration never leaves the registry
//! half-updated.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::{ExportError, Result};
use crate::normalize::Normalizer;

/// Registration API version this build supports
pub const EXTENSION_API_VERSION: u32 = 1;

/// Globally unique identifier of an export flow:
/// `<module>::<machine name>`
pub fn export_id(module: &str, machine_name: &str) -> String {
    format!("{}::{}", module, machine_name)
}

fn validate_machine_name(name: &str) -> Result<()> {
    let valid = !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
    if !valid {
        return Err(ExportError::InvalidMachineName(name.to_string()));
    }
    Ok(())
}

/// An export flow an extension contributes: a label, a description and
/// the normalizer that produces documents for it
#[derive(Clone)]
pub struct ExportDefinition {
    /// Human-readable label
    pub name: String,

    /// What this export is for
    pub description: String,

    /// Normalizer used by this flow
    pub normalizer: Arc<dyn Normalizer>,
}

impl ExportDefinition {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        normalizer: Arc<dyn Normalizer>,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            normalizer,
        }
    }
}

/// Descriptive record of a content source an extension can read from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceDefinition {
    pub name: String,
    pub description: String,
}

impl SourceDefinition {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
        }
    }
}

/// Descriptive record of a publishing destination an extension offers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DestinationDefinition {
    pub name: String,
    pub description: String,
}

impl DestinationDefinition {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
        }
    }
}

/// Everything one extension declares, keyed by machine name
pub struct ExtensionInfo {
    /// API version the extension was written against
    pub api: u32,

    pub exports: BTreeMap<String, ExportDefinition>,
    pub sources: BTreeMap<String, SourceDefinition>,
    pub destinations: BTreeMap<String, DestinationDefinition>,
}

impl ExtensionInfo {
    /// New declaration against the current API version
    pub fn new() -> Self {
        Self {
            api: EXTENSION_API_VERSION,
            exports: BTreeMap::new(),
            sources: BTreeMap::new(),
            destinations: BTreeMap::new(),
        }
    }

    pub fn with_export(mut self, machine_name: impl Into<String>, export: ExportDefinition) -> Self {
        self.exports.insert(machine_name.into(), export);
        self
    }

    pub fn with_source(mut self, machine_name: impl Into<String>, source: SourceDefinition) -> Self {
        self.sources.insert(machine_name.into(), source);
        self
    }

    pub fn with_destination(
        mut self,
        machine_name: impl Into<String>,
        destination: DestinationDefinition,
    ) -> Self {
        self.destinations.insert(machine_name.into(), destination);
        self
    }
}

impl Default for ExtensionInfo {
    fn default() -> Self {
        Self::new()
    }
}

/// Registry of everything all extensions declared, keyed by export id
#[derive(Default)]
pub struct ExtensionRegistry {
    exports: BTreeMap<String, ExportDefinition>,
    sources: BTreeMap<String, SourceDefinition>,
    destinations: BTreeMap<String, DestinationDefinition>,
}

impl ExtensionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an extension's declaration under its module name.
    ///
    /// The whole declaration is validated first (api version, machine
    /// names, collisions with already-registered ids) and rejected as
    /// one unit if anything is off.
    pub fn register(&mut self, module: &str, info: ExtensionInfo) -> Result<()> {
        if info.api != EXTENSION_API_VERSION {
            return Err(ExportError::UnsupportedApiVersion {
                declared: info.api,
                supported: EXTENSION_API_VERSION,
            });
        }

        validate_machine_name(module)?;
        for machine_name in info
            .exports
            .keys()
            .chain(info.sources.keys())
            .chain(info.destinations.keys())
        {
            validate_machine_name(machine_name)?;
        }

        for machine_name in info.exports.keys() {
            let id = export_id(module, machine_name);
            if self.exports.contains_key(&id) {
                return Err(ExportError::AlreadyRegistered(id));
            }
        }
        for machine_name in info.sources.keys() {
            let id = export_id(module, machine_name);
            if self.sources.contains_key(&id) {
                return Err(ExportError::AlreadyRegistered(id));
            }
        }
        for machine_name in info.destinations.keys() {
            let id = export_id(module, machine_name);
            if self.destinations.contains_key(&id) {
                return Err(ExportError::AlreadyRegistered(id));
            }
        }

        for (machine_name, export) in info.exports {
            self.exports.insert(export_id(module, &machine_name), export);
        }
        for (machine_name, source) in info.sources {
            self.sources.insert(export_id(module, &machine_name), source);
        }
        for (machine_name, destination) in info.destinations {
            self.destinations
                .insert(export_id(module, &machine_name), destination);
        }

        Ok(())
    }

    /// Look up an export flow by its export id
    pub fn export(&self, id: &str) -> Result<&ExportDefinition> {
        self.exports
            .get(id)
            .ok_or_else(|| ExportError::ExportNotDefined(id.to_string()))
    }

    /// All registered export flows, keyed by export id
    pub fn exports(&self) -> &BTreeMap<String, ExportDefinition> {
        &self.exports
    }

    /// All registered source descriptions, keyed by id
    pub fn sources(&self) -> &BTreeMap<String, SourceDefinition> {
        &self.sources
    }

    /// All registered destination descriptions, keyed by id
    pub fn destinations(&self) -> &BTreeMap<String, DestinationDefinition> {
        &self.destinations
    }
}
