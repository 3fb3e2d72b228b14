//! JSON Schema loading and validation for model files and descriptions.
//!
//! Both schemas ship under `schema/` and are also compiled into the crate, so
//! validation works from any working directory. Callers that maintain their
//! own copy can load it from disk with [`JsonSchema::load`]; when the copy
//! pins a `schema_version` const the value must be in the allowed set.

use anyhow::{Context, Result, anyhow, bail};
use jsonschema::JSONSchema;
use serde_json::Value;
use std::collections::BTreeSet;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::sync::Arc;

/// Schema version every model file must declare.
pub const MODEL_SCHEMA_VERSION: &str = "resdesc_model_v1";

const MODEL_SCHEMA: &str = include_str!("../schema/resource_model.schema.json");
const DESCRIPTION_SCHEMA: &str = include_str!("../schema/resource_description.schema.json");
const SCHEMA_VERSION_POINTER: &str = "/properties/schema_version/const";

/// Compiled JSON Schema plus the document it was compiled from.
pub struct JsonSchema {
    origin: String,
    compiled: JSONSchema,
    raw: Arc<Value>,
}

impl JsonSchema {
    /// Load and compile a schema file.
    pub fn load(path: &Path) -> Result<Self> {
        let file = File::open(path).with_context(|| format!("opening schema {}", path.display()))?;
        let value: Value = serde_json::from_reader(BufReader::new(file))
            .with_context(|| format!("parsing schema {}", path.display()))?;
        let schema = Self::from_value(value, path.display().to_string())?;
        if let Some(version) = schema.schema_version() {
            let allowed = allowed_schema_versions();
            if !allowed.contains(version) {
                bail!(
                    "schema {} pins schema_version '{}' not in allowed set {:?}",
                    path.display(),
                    version,
                    allowed
                );
            }
        }
        Ok(schema)
    }

    /// Compile an in-memory schema; `origin` labels errors.
    pub fn from_value(value: Value, origin: impl Into<String>) -> Result<Self> {
        let origin = origin.into();
        let compiled = JSONSchema::compile(&value)
            .map_err(|err| anyhow!("compiling schema {origin}: {err}"))?;
        Ok(Self {
            origin,
            compiled,
            raw: Arc::new(value),
        })
    }

    /// Validate `instance`, reporting every violation in one error.
    pub fn validate(&self, instance: &Value) -> Result<()> {
        if let Err(errors) = self.compiled.validate(instance) {
            let details = errors
                .map(|err| format!("{}: {}", err.instance_path, err))
                .collect::<Vec<_>>()
                .join("\n");
            bail!("document failed validation against {}:\n{}", self.origin, details);
        }
        Ok(())
    }

    pub fn is_valid(&self, instance: &Value) -> bool {
        self.compiled.is_valid(instance)
    }

    /// The `schema_version` const pinned by the schema, if any.
    pub fn schema_version(&self) -> Option<&str> {
        self.raw.pointer(SCHEMA_VERSION_POINTER).and_then(Value::as_str)
    }
}

/// Schema for description documents, compiled from the bundled copy.
pub fn description_schema() -> Result<JsonSchema> {
    embedded(DESCRIPTION_SCHEMA, "schema/resource_description.schema.json")
}

/// Schema for model files, compiled from the bundled copy.
pub fn model_schema() -> Result<JsonSchema> {
    embedded(MODEL_SCHEMA, "schema/resource_model.schema.json")
}

fn embedded(text: &str, origin: &str) -> Result<JsonSchema> {
    let value: Value =
        serde_json::from_str(text).with_context(|| format!("parsing bundled schema {origin}"))?;
    JsonSchema::from_value(value, origin)
}

fn allowed_schema_versions() -> BTreeSet<String> {
    BTreeSet::from_iter([MODEL_SCHEMA_VERSION.to_string()])
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn bundled_model_schema_pins_current_version() {
        let schema = model_schema().unwrap();
        assert_eq!(schema.schema_version(), Some(MODEL_SCHEMA_VERSION));
    }

    #[test]
    fn description_schema_accepts_minimal_document() {
        let schema = description_schema().unwrap();
        let doc = json!({
            "description": "root",
            "maxOccurs": 1,
            "attributes": {},
            "operations": {},
            "notifications": {},
            "children": {}
        });
        schema.validate(&doc).unwrap();
    }

    #[test]
    fn description_schema_reports_every_violation() {
        let schema = description_schema().unwrap();
        let doc = json!({
            "description": 5,
            "storage": "persistent",
            "attributes": {},
            "operations": {},
            "notifications": {},
            "children": {}
        });
        let err = schema.validate(&doc).unwrap_err().to_string();
        assert!(err.contains("/description"), "{err}");
        assert!(err.contains("/storage"), "{err}");
    }

    #[test]
    fn load_rejects_unknown_pinned_version() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.schema.json");
        std::fs::write(
            &path,
            json!({"properties": {"schema_version": {"const": "other_v9"}}}).to_string(),
        )
        .unwrap();
        let err = JsonSchema::load(&path).err().expect("version should be rejected");
        assert!(err.to_string().contains("other_v9"));
    }
}
