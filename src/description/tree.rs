//! Recursive descriptions: fill each child's `modelDescription`.
//!
//! The single-resource assembly leaves `children/<type>/modelDescription`
//! empty. [`describe_tree`] runs that assembly again for every registered
//! child element and stores the nested document under the element's value
//! (`*` for wildcard registrations, the instance name otherwise).

use crate::address::{PathAddress, PathElement};
use crate::config::DescribeOptions;
use crate::deprecation::DeprecationData;
use crate::description::{DescriptionProvider, ResourceDescriber};
use crate::keys;
use crate::locale::Locale;
use crate::registry::ResourceRegistration;
use crate::text::DescriptionResolver;
use anyhow::{Context, Result};
use serde_json::Value;
use tracing::debug;

/// Registration that can hand out its child registrations.
pub trait ResourceTree: ResourceRegistration {
    fn child_resource(&self, element: &PathElement) -> Option<&Self>;

    /// Deprecation declared by the resource definition, if any.
    fn deprecation(&self) -> Option<&DeprecationData>;

    /// Bundle key prefix declared for this resource, overriding the derived one.
    fn description_prefix(&self) -> Option<&str> {
        None
    }
}

/// Resolver that can derive the resolver for a child resource type.
pub trait ChildResolver: DescriptionResolver + Sized {
    /// Resolver for children of type `child_type`; `declared_prefix` is the
    /// child's own prefix when its definition declares one.
    fn resolver_for_child(&self, child_type: &str, declared_prefix: Option<&str>) -> Self;
}

/// How many levels of children to describe below the starting resource.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Depth {
    Unbounded,
    Limited(usize),
}

impl Depth {
    /// Depth left for the next level, or `None` when recursion stops here.
    fn descend(self) -> Option<Depth> {
        match self {
            Depth::Unbounded => Some(Depth::Unbounded),
            Depth::Limited(0) => None,
            Depth::Limited(n) => Some(Depth::Limited(n - 1)),
        }
    }
}

/// Describe `resource` and, up to `depth`, every child registration.
pub fn describe_tree<R, T>(
    resource: &R,
    resolver: &T,
    locale: &Locale,
    options: &DescribeOptions,
    depth: Depth,
) -> Result<Value>
where
    R: ResourceTree,
    T: ChildResolver,
{
    let mut describer = ResourceDescriber::new(resource, resolver).with_options(*options);
    if let Some(deprecation) = resource.deprecation() {
        describer = describer.with_deprecation(deprecation.clone());
    }
    let mut document = describer.model_description(locale)?;

    let Some(next) = depth.descend() else {
        return Ok(document);
    };
    let Some(children) = document.get_mut(keys::CHILDREN).and_then(Value::as_object_mut) else {
        return Ok(document);
    };

    for element in resource.child_addresses(&PathAddress::empty()) {
        let Some(child) = resource.child_resource(&element) else {
            debug!(child = %element, "child element has no registration to describe");
            continue;
        };
        let child_resolver = resolver.resolver_for_child(&element.key, child.description_prefix());
        let nested = describe_tree(child, &child_resolver, locale, options, next)
            .with_context(|| format!("describing child {element}"))?;
        if let Some(slot) = children
            .get_mut(&element.key)
            .and_then(|entry| entry.get_mut(keys::MODEL_DESCRIPTION))
            .and_then(Value::as_object_mut)
        {
            slot.insert(element.value.clone(), nested);
        }
    }
    Ok(document)
}
