//! Attribute metadata and its per-attribute description.
//!
//! An [`AttributeDefinition`] knows how to render itself into a description
//! sub-document; the resource assembly only decides where that sub-document
//! goes and in which order. [`AttributeSortKey`] carries the ordering.

use crate::config::GrouplessOrder;
use crate::deprecation::DeprecationData;
use crate::keys;
use crate::locale::Locale;
use crate::text::{DescriptionResolver, ResourceBundle};
use anyhow::Result;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};
use std::cmp::Ordering;

/// Value type of an attribute.
///
/// Known variants keep serialization consistent; `Other` carries types this
/// crate does not know about so models using them still load.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum AttributeType {
    String,
    Int,
    Long,
    Double,
    BigDecimal,
    Boolean,
    Bytes,
    List,
    Object,
    Property,
    Other(String),
}

impl AttributeType {
    pub fn as_str(&self) -> &str {
        match self {
            AttributeType::String => "STRING",
            AttributeType::Int => "INT",
            AttributeType::Long => "LONG",
            AttributeType::Double => "DOUBLE",
            AttributeType::BigDecimal => "BIG_DECIMAL",
            AttributeType::Boolean => "BOOLEAN",
            AttributeType::Bytes => "BYTES",
            AttributeType::List => "LIST",
            AttributeType::Object => "OBJECT",
            AttributeType::Property => "PROPERTY",
            AttributeType::Other(value) => value.as_str(),
        }
    }

    fn from_str(value: &str) -> Self {
        match value {
            "STRING" => AttributeType::String,
            "INT" => AttributeType::Int,
            "LONG" => AttributeType::Long,
            "DOUBLE" => AttributeType::Double,
            "BIG_DECIMAL" => AttributeType::BigDecimal,
            "BOOLEAN" => AttributeType::Boolean,
            "BYTES" => AttributeType::Bytes,
            "LIST" => AttributeType::List,
            "OBJECT" => AttributeType::Object,
            "PROPERTY" => AttributeType::Property,
            other => AttributeType::Other(other.to_string()),
        }
    }
}

impl Serialize for AttributeType {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for AttributeType {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        Ok(Self::from_str(&value))
    }
}

/// How clients may interact with an attribute.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AccessType {
    ReadOnly,
    #[default]
    ReadWrite,
    Metric,
}

/// Whether an attribute value is persisted with the configuration.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AttributeStorage {
    #[default]
    Configuration,
    Runtime,
}

/// What has to restart before a write to the attribute takes effect.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RestartLevel {
    #[default]
    NoServices,
    ResourceServices,
    AllServices,
    Jvm,
}

/// Full metadata for one attribute of a resource.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AttributeDefinition {
    pub name: String,
    #[serde(default)]
    pub group: Option<String>,
    #[serde(rename = "type")]
    pub value_type: AttributeType,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub expressions_allowed: bool,
    #[serde(default)]
    pub default: Option<Value>,
    #[serde(default)]
    pub min: Option<i64>,
    #[serde(default)]
    pub max: Option<i64>,
    #[serde(default)]
    pub allowed: Vec<Value>,
    #[serde(default)]
    pub unit: Option<String>,
    #[serde(default)]
    pub access_type: AccessType,
    #[serde(default)]
    pub storage: AttributeStorage,
    #[serde(default)]
    pub restart: RestartLevel,
    #[serde(default)]
    pub deprecated: Option<DeprecationData>,
}

impl AttributeDefinition {
    pub fn new(name: impl Into<String>, value_type: AttributeType) -> Self {
        Self {
            name: name.into(),
            group: None,
            value_type,
            required: false,
            expressions_allowed: false,
            default: None,
            min: None,
            max: None,
            allowed: Vec::new(),
            unit: None,
            access_type: AccessType::default(),
            storage: AttributeStorage::default(),
            restart: RestartLevel::default(),
            deprecated: None,
        }
    }

    pub fn with_group(mut self, group: impl Into<String>) -> Self {
        self.group = Some(group.into());
        self
    }

    pub fn with_required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    pub fn with_default(mut self, default: Value) -> Self {
        self.default = Some(default);
        self
    }

    pub fn with_deprecation(mut self, deprecated: DeprecationData) -> Self {
        self.deprecated = Some(deprecated);
        self
    }

    /// Write this attribute's description under `attributes/<name>` in
    /// `scratch`, creating the `attributes` object when needed.
    pub fn add_resource_attribute_description(
        &self,
        scratch: &mut Map<String, Value>,
        resolver: &dyn DescriptionResolver,
        locale: &Locale,
        bundle: Option<&ResourceBundle>,
    ) -> Result<()> {
        let description = self.describe(resolver, locale, bundle)?;
        let attributes = scratch
            .entry(keys::ATTRIBUTES)
            .or_insert_with(|| Value::Object(Map::new()));
        if !attributes.is_object() {
            *attributes = Value::Object(Map::new());
        }
        if let Value::Object(attributes) = attributes {
            attributes.insert(self.name.clone(), Value::Object(description));
        }
        Ok(())
    }

    fn describe(
        &self,
        resolver: &dyn DescriptionResolver,
        locale: &Locale,
        bundle: Option<&ResourceBundle>,
    ) -> Result<Map<String, Value>> {
        let mut desc = Map::new();
        desc.insert(keys::TYPE.into(), Value::from(self.value_type.as_str()));
        desc.insert(
            keys::DESCRIPTION.into(),
            Value::from(resolver.attribute_description(&self.name, locale, bundle)?),
        );
        desc.insert(
            keys::EXPRESSIONS_ALLOWED.into(),
            Value::from(self.expressions_allowed),
        );
        desc.insert(keys::REQUIRED.into(), Value::from(self.required));
        desc.insert(keys::NILLABLE.into(), Value::from(!self.required));
        if let Some(default) = &self.default {
            desc.insert(keys::DEFAULT.into(), default.clone());
        }
        if let Some(min) = self.min {
            desc.insert(keys::MIN.into(), Value::from(min));
        }
        if let Some(max) = self.max {
            desc.insert(keys::MAX.into(), Value::from(max));
        }
        if !self.allowed.is_empty() {
            desc.insert(keys::ALLOWED.into(), Value::Array(self.allowed.clone()));
        }
        if let Some(unit) = &self.unit {
            desc.insert(keys::UNIT.into(), Value::from(unit.as_str()));
        }
        if let Some(group) = &self.group {
            desc.insert(keys::ATTRIBUTE_GROUP.into(), Value::from(group.as_str()));
        }
        desc.insert(keys::ACCESS_TYPE.into(), serde_json::to_value(self.access_type)?);
        desc.insert(keys::STORAGE.into(), serde_json::to_value(self.storage)?);
        desc.insert(keys::RESTART_REQUIRED.into(), serde_json::to_value(self.restart)?);
        if let Some(deprecated) = &self.deprecated {
            let mut block = Map::new();
            block.insert(keys::SINCE.into(), Value::from(deprecated.since.to_string()));
            block.insert(
                keys::REASON.into(),
                Value::from(resolver.attribute_deprecated_description(&self.name, locale, bundle)?),
            );
            desc.insert(keys::DEPRECATED.into(), Value::Object(block));
        }
        Ok(desc)
    }
}

/// Ordering key for the `attributes` section: group first, then name.
///
/// The derived `Ord` treats a missing group as the minimal value, matching
/// [`GrouplessOrder::First`].
#[derive(Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct AttributeSortKey {
    pub group: Option<String>,
    pub name: String,
}

impl AttributeSortKey {
    /// Key for an attribute with no metadata.
    pub fn ungrouped(name: impl Into<String>) -> Self {
        Self {
            group: None,
            name: name.into(),
        }
    }

    pub fn compare(&self, other: &Self, groupless: GrouplessOrder) -> Ordering {
        let by_group = match (&self.group, &other.group, groupless) {
            (Some(a), Some(b), _) => a.cmp(b),
            (None, None, _) => Ordering::Equal,
            (None, Some(_), GrouplessOrder::First) | (Some(_), None, GrouplessOrder::Last) => {
                Ordering::Less
            }
            (None, Some(_), GrouplessOrder::Last) | (Some(_), None, GrouplessOrder::First) => {
                Ordering::Greater
            }
        };
        by_group.then_with(|| self.name.cmp(&other.name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deprecation::ModelVersion;
    use anyhow::anyhow;

    struct EchoResolver;

    impl DescriptionResolver for EchoResolver {
        fn resource_bundle(&self, _locale: &Locale) -> Result<Option<ResourceBundle>> {
            Ok(None)
        }
        fn resource_description(&self, _: &Locale, _: Option<&ResourceBundle>) -> Result<String> {
            Err(anyhow!("unused"))
        }
        fn resource_deprecated_description(
            &self,
            _: &Locale,
            _: Option<&ResourceBundle>,
        ) -> Result<String> {
            Err(anyhow!("unused"))
        }
        fn child_type_description(
            &self,
            _: &str,
            _: &Locale,
            _: Option<&ResourceBundle>,
        ) -> Result<String> {
            Err(anyhow!("unused"))
        }
        fn attribute_description(
            &self,
            attribute: &str,
            locale: &Locale,
            _: Option<&ResourceBundle>,
        ) -> Result<String> {
            Ok(format!("{attribute}@{locale}"))
        }
        fn attribute_deprecated_description(
            &self,
            attribute: &str,
            _: &Locale,
            _: Option<&ResourceBundle>,
        ) -> Result<String> {
            Ok(format!("{attribute} is going away"))
        }
    }

    #[test]
    fn groupless_sorts_first_by_default() {
        let mut keys = vec![
            AttributeSortKey {
                group: Some("g1".into()),
                name: "beta".into(),
            },
            AttributeSortKey::ungrouped("zeta"),
            AttributeSortKey::ungrouped("alpha"),
            AttributeSortKey {
                group: Some("a0".into()),
                name: "omega".into(),
            },
        ];
        keys.sort();
        let names: Vec<String> = keys.iter().map(|k| k.name.clone()).collect();
        assert_eq!(names, vec!["alpha", "zeta", "omega", "beta"]);

        keys.reverse();
        keys.sort_by(|a, b| a.compare(b, GrouplessOrder::First));
        let first: Vec<String> = keys.iter().map(|k| k.name.clone()).collect();
        assert_eq!(first, names);
    }

    #[test]
    fn groupless_last_moves_only_ungrouped_entries() {
        let mut keys = vec![
            AttributeSortKey::ungrouped("alpha"),
            AttributeSortKey {
                group: Some("g1".into()),
                name: "beta".into(),
            },
            AttributeSortKey {
                group: Some("g1".into()),
                name: "aardvark".into(),
            },
        ];
        keys.sort_by(|a, b| a.compare(b, GrouplessOrder::Last));
        let names: Vec<&str> = keys.iter().map(|k| k.name.as_str()).collect();
        assert_eq!(names, vec!["aardvark", "beta", "alpha"]);
    }

    #[test]
    fn writes_description_under_attributes_path() {
        let def = AttributeDefinition::new("port", AttributeType::Int)
            .with_group("socket")
            .with_required(true)
            .with_default(Value::from(8080))
            .with_deprecation(DeprecationData::new(ModelVersion::new(2, 1, 0)));
        let mut scratch = Map::new();
        def.add_resource_attribute_description(&mut scratch, &EchoResolver, &Locale::root(), None)
            .unwrap();

        let desc = &scratch["attributes"]["port"];
        assert_eq!(desc["type"], "INT");
        assert_eq!(desc["description"], "port@");
        assert_eq!(desc["required"], true);
        assert_eq!(desc["nillable"], false);
        assert_eq!(desc["default"], 8080);
        assert_eq!(desc["attributeGroup"], "socket");
        assert_eq!(desc["accessType"], "read-write");
        assert_eq!(desc["storage"], "configuration");
        assert_eq!(desc["restartRequired"], "no-services");
        assert_eq!(desc["deprecated"]["since"], "2.1.0");
        assert_eq!(desc["deprecated"]["reason"], "port is going away");
        assert!(desc.get("min").is_none());
    }

    #[test]
    fn attribute_type_keeps_unknown_names() {
        let parsed: AttributeType = serde_json::from_str("\"EXPRESSION\"").unwrap();
        assert_eq!(parsed, AttributeType::Other("EXPRESSION".into()));
        assert_eq!(serde_json::to_string(&parsed).unwrap(), "\"EXPRESSION\"");
    }
}
