//! Locale-aware description documents for registered management resources.
//!
//! The crate reads a resource registration (attributes, child types,
//! capabilities, occurrence bounds, access constraints) and assembles the
//! structured document management clients use to render a resource without
//! hardcoding its schema. The assembly itself lives in [`description`]; the
//! registration and text lookups it depends on are traits so any registry can
//! plug in. [`registry::RegistrationTree`] and [`text::StandardResolver`] are
//! the JSON-backed implementations the `describe-resource` binary and the test
//! suite use.

use anyhow::{Result, anyhow};
use serde_json::Value;
use std::sync::Arc;

pub mod access;
pub mod address;
pub mod attribute;
pub mod config;
pub mod deprecation;
pub mod description;
pub mod keys;
pub mod locale;
pub mod registry;
pub mod schema;
pub mod text;

pub use address::{PathAddress, PathElement};
pub use attribute::{AttributeDefinition, AttributeSortKey, AttributeType};
pub use config::{DescribeOptions, GrouplessOrder};
pub use deprecation::{DeprecationData, ModelVersion};
pub use description::{
    ChildResolver, DescriptionProvider, Depth, ResourceDescriber, ResourceTree, describe_tree,
};
pub use locale::Locale;
pub use registry::{
    AccessConstraint, AttributeAccess, Capability, ConstraintKind, RegistrationTree, ResourceNode,
    ResourceRegistration, UNBOUNDED,
};
pub use schema::{JsonSchema, description_schema, model_schema};
pub use text::{
    BundleCatalog, DescriptionResolver, ResourceBundle, StandardResolver, TextResolutionError,
};

/// Build the resolver for the resource at `address`.
///
/// Starts at `root_prefix` (or the root's declared prefix) and walks the
/// address, switching to a resource's declared prefix wherever the model sets
/// one and appending the child type otherwise.
pub fn resolver_for_address(
    tree: &RegistrationTree,
    address: &PathAddress,
    catalog: Arc<BundleCatalog>,
    root_prefix: &str,
) -> Result<StandardResolver> {
    let mut node = tree.root();
    let mut resolver =
        StandardResolver::new(node.description_prefix().unwrap_or(root_prefix), catalog);
    for element in address.elements() {
        node = node
            .child(element)
            .ok_or_else(|| anyhow!("no resource registered at {address} (missing {element})"))?;
        resolver = resolver.resolver_for_child(&element.key, node.description_prefix());
    }
    Ok(resolver)
}

/// Describe the resource at `address`, descending `depth` levels.
///
/// `Depth::Limited(0)` yields exactly the single-resource document.
pub fn describe_address(
    tree: &RegistrationTree,
    address: &PathAddress,
    resolver: &StandardResolver,
    locale: &Locale,
    options: &DescribeOptions,
    depth: Depth,
) -> Result<Value> {
    let node = tree
        .find(address)
        .ok_or_else(|| anyhow!("no resource registered at {address}"))?;
    describe_tree(node, resolver, locale, options, depth)
}
