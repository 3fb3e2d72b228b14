//! Read-only view of the resource registration tree.
//!
//! [`ResourceRegistration`] is the seam the description assembly queries; it
//! never mutates what it reads. The `model` and `tree` submodules provide a
//! JSON-backed implementation so models can be described without a running
//! management layer.

pub mod identity;
pub mod model;
pub mod tree;

pub use identity::{AccessConstraint, Capability, ConstraintKind};
pub use model::{ModelAttribute, ModelChild, ModelFile, ModelResource, load_model_from_path};
pub use tree::{RegistrationTree, ResourceNode};

use crate::address::{PathAddress, PathElement};
use crate::attribute::AttributeDefinition;

/// Occurrence bound meaning "any number of instances".
pub const UNBOUNDED: u32 = i32::MAX as u32;

/// Metadata lookup result for one attribute name.
#[derive(Clone, Debug, PartialEq)]
pub enum AttributeAccess {
    /// Full metadata is registered and can be described.
    Defined(AttributeDefinition),
    /// Only the name is known.
    Placeholder { name: String },
}

impl AttributeAccess {
    pub fn name(&self) -> &str {
        match self {
            AttributeAccess::Defined(def) => &def.name,
            AttributeAccess::Placeholder { name } => name,
        }
    }
}

/// Queries the description assembly issues against a registered resource.
///
/// Every relative-address query is answered for the resource found by walking
/// `relative` down from this one; the empty address means this resource.
/// Collections are returned in registration order. Empty collections mean "no
/// data", never an error.
pub trait ResourceRegistration {
    /// Absolute address of this resource; `None` or empty for the root.
    fn path_address(&self) -> Option<&PathAddress>;

    fn min_occurs(&self) -> u32;

    fn max_occurs(&self) -> u32;

    fn capabilities(&self) -> Vec<Capability>;

    fn access_constraints(&self) -> Vec<AccessConstraint>;

    fn is_runtime_only(&self) -> bool;

    fn attribute_names(&self, relative: &PathAddress) -> Vec<String>;

    fn attribute_access(&self, relative: &PathAddress, name: &str) -> Option<AttributeAccess>;

    fn child_addresses(&self, relative: &PathAddress) -> Vec<PathElement>;
}

/// Max-occurs a resource has when nothing overrides it.
///
/// Wildcard registrations may have any number of instances; a named
/// registration has exactly one slot. The root has no positional default.
pub fn default_max_occurs(address: Option<&PathAddress>) -> Option<u32> {
    let last = address?.last_element()?;
    Some(if last.is_wildcard() { UNBOUNDED } else { 1 })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_max_occurs_depends_on_position() {
        assert_eq!(default_max_occurs(None), None);
        assert_eq!(default_max_occurs(Some(&PathAddress::empty())), None);
        let wildcard: PathAddress = "/subsystem=web/connector=*".parse().unwrap();
        assert_eq!(default_max_occurs(Some(&wildcard)), Some(UNBOUNDED));
        let named: PathAddress = "/subsystem=web".parse().unwrap();
        assert_eq!(default_max_occurs(Some(&named)), Some(1));
    }

    #[test]
    fn attribute_access_exposes_name_for_both_variants() {
        let placeholder = AttributeAccess::Placeholder {
            name: "legacy".into(),
        };
        assert_eq!(placeholder.name(), "legacy");
        let defined = AttributeAccess::Defined(AttributeDefinition::new(
            "port",
            crate::attribute::AttributeType::Int,
        ));
        assert_eq!(defined.name(), "port");
    }
}
