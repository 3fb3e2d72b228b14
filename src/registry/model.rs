//! Deserializable representation of a resource model file.
//!
//! The types mirror `schema/resource_model.schema.json` so tests and the CLI
//! can describe a model without a live registry. Use [`RegistrationTree`] for
//! validation and address lookup; use these structs when the raw file surface
//! is needed.
//!
//! [`RegistrationTree`]: crate::registry::RegistrationTree

use crate::attribute::AttributeDefinition;
use crate::deprecation::DeprecationData;
use crate::registry::identity::{AccessConstraint, Capability};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Model file as stored on disk.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ModelFile {
    pub schema_version: String,
    pub resource: ModelResource,
}

/// One registered resource and, recursively, its child registrations.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ModelResource {
    /// Bundle key prefix for this resource's text.
    #[serde(default)]
    pub description_prefix: Option<String>,
    #[serde(default)]
    pub min_occurs: Option<u32>,
    #[serde(default)]
    pub max_occurs: Option<u32>,
    #[serde(default)]
    pub runtime_only: bool,
    #[serde(default)]
    pub capabilities: Vec<Capability>,
    #[serde(default)]
    pub access_constraints: Vec<AccessConstraint>,
    #[serde(default)]
    pub deprecated: Option<DeprecationData>,
    #[serde(default)]
    pub attributes: Vec<ModelAttribute>,
    #[serde(default)]
    pub children: Vec<ModelChild>,
}

/// Attribute entry: full metadata, or just a name when none is registered.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ModelAttribute {
    Defined(AttributeDefinition),
    Placeholder { name: String },
}

impl ModelAttribute {
    pub fn name(&self) -> &str {
        match self {
            ModelAttribute::Defined(def) => &def.name,
            ModelAttribute::Placeholder { name } => name,
        }
    }
}

/// Child registration under `key=value` (`value` may be `*`).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ModelChild {
    pub key: String,
    pub value: String,
    pub resource: ModelResource,
}

/// Read and parse a model file without additional validation.
pub fn load_model_from_path(path: &Path) -> Result<ModelFile> {
    let data =
        fs::read_to_string(path).with_context(|| format!("reading model {}", path.display()))?;
    let model: ModelFile = serde_json::from_str(&data)
        .with_context(|| format!("parsing model {}", path.display()))?;
    Ok(model)
}
