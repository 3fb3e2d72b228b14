//! Validated, addressable view of a resource model file.
//!
//! Loading is strict: the file must pass the bundled model schema, declare the
//! supported schema version, and list each attribute name and child element
//! at most once per resource. The resulting nodes answer
//! [`ResourceRegistration`] queries for the description assembly.

use crate::address::{PathAddress, PathElement};
use crate::deprecation::DeprecationData;
use crate::description::ResourceTree;
use crate::registry::identity::{AccessConstraint, Capability};
use crate::registry::model::{ModelAttribute, ModelFile, ModelResource, load_model_from_path};
use crate::registry::{AttributeAccess, ResourceRegistration, default_max_occurs};
use crate::schema::{MODEL_SCHEMA_VERSION, model_schema};
use anyhow::{Context, Result, bail};
use serde_json::Value;
use std::collections::BTreeSet;
use std::fs;
use std::path::Path;
use tracing::debug;

/// Whole registration tree rooted at the empty address.
#[derive(Clone, Debug)]
pub struct RegistrationTree {
    root: ResourceNode,
}

impl RegistrationTree {
    /// Load, schema-check and index a model file.
    pub fn load(path: &Path) -> Result<Self> {
        let data =
            fs::read_to_string(path).with_context(|| format!("reading model {}", path.display()))?;
        let value: Value = serde_json::from_str(&data)
            .with_context(|| format!("parsing model {}", path.display()))?;
        model_schema()?
            .validate(&value)
            .with_context(|| format!("model {} failed schema validation", path.display()))?;

        let model = load_model_from_path(path)?;
        Self::from_model(model).with_context(|| format!("loading {}", path.display()))
    }

    /// Index an already-parsed model; performs every check except the schema.
    pub fn from_model(model: ModelFile) -> Result<Self> {
        validate_schema_version(&model.schema_version)?;
        let root = ResourceNode::build(PathAddress::empty(), model.resource)?;
        debug!(resources = root.count(), "indexed registration tree");
        Ok(Self { root })
    }

    pub fn root(&self) -> &ResourceNode {
        &self.root
    }

    /// Registration at `address`, matching every element exactly.
    pub fn find(&self, address: &PathAddress) -> Option<&ResourceNode> {
        self.root.descendant(address)
    }
}

fn validate_schema_version(schema_version: &str) -> Result<()> {
    if schema_version.is_empty() {
        bail!("schema_version must not be empty");
    }
    if schema_version != MODEL_SCHEMA_VERSION {
        bail!(
            "schema_version '{}' is not supported (expected {})",
            schema_version,
            MODEL_SCHEMA_VERSION
        );
    }
    Ok(())
}

/// One registered resource with its attributes and child registrations.
#[derive(Clone, Debug)]
pub struct ResourceNode {
    address: PathAddress,
    description_prefix: Option<String>,
    min_occurs: u32,
    max_occurs: u32,
    runtime_only: bool,
    capabilities: Vec<Capability>,
    access_constraints: Vec<AccessConstraint>,
    deprecation: Option<DeprecationData>,
    attributes: Vec<AttributeAccess>,
    children: Vec<(PathElement, ResourceNode)>,
}

impl ResourceNode {
    fn build(address: PathAddress, resource: ModelResource) -> Result<Self> {
        let mut seen_attributes = BTreeSet::new();
        let mut attributes = Vec::with_capacity(resource.attributes.len());
        for attribute in resource.attributes {
            if !seen_attributes.insert(attribute.name().to_string()) {
                bail!("{address} declares attribute '{}' more than once", attribute.name());
            }
            attributes.push(match attribute {
                ModelAttribute::Defined(def) => AttributeAccess::Defined(def),
                ModelAttribute::Placeholder { name } => AttributeAccess::Placeholder { name },
            });
        }

        let min_occurs = resource.min_occurs.unwrap_or(0);
        let max_occurs = resource
            .max_occurs
            .or_else(|| default_max_occurs(Some(&address)))
            .unwrap_or(1);
        if min_occurs > max_occurs {
            bail!("{address} has min_occurs {min_occurs} above max_occurs {max_occurs}");
        }

        let mut seen_children = BTreeSet::new();
        let mut children = Vec::with_capacity(resource.children.len());
        for child in resource.children {
            let element = PathElement::new(child.key, child.value);
            if !seen_children.insert(element.clone()) {
                bail!("{address} registers child {element} more than once");
            }
            let node = ResourceNode::build(address.append(element.clone()), child.resource)?;
            children.push((element, node));
        }

        Ok(Self {
            address,
            description_prefix: resource.description_prefix,
            min_occurs,
            max_occurs,
            runtime_only: resource.runtime_only,
            capabilities: resource.capabilities,
            access_constraints: resource.access_constraints,
            deprecation: resource.deprecated,
            attributes,
            children,
        })
    }

    pub fn address(&self) -> &PathAddress {
        &self.address
    }

    /// Bundle key prefix declared by the model, if any.
    pub fn description_prefix(&self) -> Option<&str> {
        self.description_prefix.as_deref()
    }

    pub fn deprecation(&self) -> Option<&DeprecationData> {
        self.deprecation.as_ref()
    }

    pub fn child(&self, element: &PathElement) -> Option<&ResourceNode> {
        self.children
            .iter()
            .find(|(candidate, _)| candidate == element)
            .map(|(_, node)| node)
    }

    pub fn descendant(&self, relative: &PathAddress) -> Option<&ResourceNode> {
        let mut node = self;
        for element in relative.elements() {
            node = node.child(element)?;
        }
        Some(node)
    }

    fn count(&self) -> usize {
        1 + self.children.iter().map(|(_, node)| node.count()).sum::<usize>()
    }
}

impl ResourceRegistration for ResourceNode {
    fn path_address(&self) -> Option<&PathAddress> {
        Some(&self.address)
    }

    fn min_occurs(&self) -> u32 {
        self.min_occurs
    }

    fn max_occurs(&self) -> u32 {
        self.max_occurs
    }

    fn capabilities(&self) -> Vec<Capability> {
        self.capabilities.clone()
    }

    fn access_constraints(&self) -> Vec<AccessConstraint> {
        self.access_constraints.clone()
    }

    fn is_runtime_only(&self) -> bool {
        self.runtime_only
    }

    fn attribute_names(&self, relative: &PathAddress) -> Vec<String> {
        self.descendant(relative)
            .map(|node| node.attributes.iter().map(|a| a.name().to_string()).collect())
            .unwrap_or_default()
    }

    fn attribute_access(&self, relative: &PathAddress, name: &str) -> Option<AttributeAccess> {
        self.descendant(relative)?
            .attributes
            .iter()
            .find(|a| a.name() == name)
            .cloned()
    }

    fn child_addresses(&self, relative: &PathAddress) -> Vec<PathElement> {
        self.descendant(relative)
            .map(|node| node.children.iter().map(|(element, _)| element.clone()).collect())
            .unwrap_or_default()
    }
}

impl ResourceTree for ResourceNode {
    fn child_resource(&self, element: &PathElement) -> Option<&Self> {
        self.child(element)
    }

    fn deprecation(&self) -> Option<&DeprecationData> {
        self.deprecation.as_ref()
    }

    fn description_prefix(&self) -> Option<&str> {
        self.description_prefix.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::UNBOUNDED;
    use serde_json::json;

    fn tree(resource: Value) -> Result<RegistrationTree> {
        let model: ModelFile = serde_json::from_value(json!({
            "schema_version": MODEL_SCHEMA_VERSION,
            "resource": resource,
        }))?;
        RegistrationTree::from_model(model)
    }

    #[test]
    fn computes_addresses_and_default_bounds() {
        let tree = tree(json!({
            "children": [
                {"key": "subsystem", "value": "web", "resource": {
                    "children": [{"key": "connector", "value": "*", "resource": {"min_occurs": 1}}]
                }}
            ]
        }))
        .unwrap();

        let root = tree.root();
        assert!(root.address().is_empty());
        assert_eq!(root.max_occurs(), 1);

        let connector = tree
            .find(&"/subsystem=web/connector=*".parse().unwrap())
            .expect("connector registered");
        assert_eq!(connector.address().to_string(), "/subsystem=web/connector=*");
        assert_eq!(connector.min_occurs(), 1);
        assert_eq!(connector.max_occurs(), UNBOUNDED);

        let web = tree.find(&"/subsystem=web".parse().unwrap()).unwrap();
        assert_eq!(web.min_occurs(), 0);
        assert_eq!(web.max_occurs(), 1);
    }

    #[test]
    fn relative_queries_walk_the_tree() {
        let tree = tree(json!({
            "attributes": [{"name": "root-attr", "type": "STRING"}],
            "children": [
                {"key": "subsystem", "value": "web", "resource": {
                    "attributes": [{"name": "port", "type": "INT"}, {"name": "legacy"}]
                }}
            ]
        }))
        .unwrap();
        let root = tree.root();
        let web: PathAddress = "/subsystem=web".parse().unwrap();

        assert_eq!(root.attribute_names(&PathAddress::empty()), vec!["root-attr"]);
        assert_eq!(root.attribute_names(&web), vec!["port", "legacy"]);
        assert!(matches!(
            root.attribute_access(&web, "legacy"),
            Some(AttributeAccess::Placeholder { .. })
        ));
        assert!(root.attribute_access(&web, "missing").is_none());
        assert!(root.attribute_names(&"/subsystem=nope".parse().unwrap()).is_empty());
        assert_eq!(
            root.child_addresses(&PathAddress::empty()),
            vec![PathElement::new("subsystem", "web")]
        );
    }

    #[test]
    fn rejects_duplicate_attribute_names() {
        let err = tree(json!({
            "attributes": [{"name": "port", "type": "INT"}, {"name": "port"}]
        }))
        .unwrap_err();
        assert!(err.to_string().contains("attribute 'port'"), "{err}");
    }

    #[test]
    fn rejects_duplicate_child_elements() {
        let err = tree(json!({
            "children": [
                {"key": "handler", "value": "*", "resource": {}},
                {"key": "handler", "value": "*", "resource": {}}
            ]
        }))
        .unwrap_err();
        assert!(err.to_string().contains("handler=*"), "{err}");
    }

    #[test]
    fn rejects_inverted_bounds_and_unknown_versions() {
        assert!(tree(json!({"min_occurs": 3, "max_occurs": 2})).is_err());

        let model: ModelFile = serde_json::from_value(json!({
            "schema_version": "resdesc_model_v0",
            "resource": {}
        }))
        .unwrap();
        assert!(RegistrationTree::from_model(model).is_err());
    }
}
