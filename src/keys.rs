//! Field names used in description documents.
//!
//! Resource-level and attribute-level documents share these names; clients
//! key on them, so renaming one is a breaking change for every consumer.

pub const ACCESS_CONSTRAINTS: &str = "accessConstraints";
pub const ACCESS_TYPE: &str = "accessType";
pub const ALLOWED: &str = "allowed";
pub const ATTRIBUTE_GROUP: &str = "attributeGroup";
pub const ATTRIBUTES: &str = "attributes";
pub const CAPABILITIES: &str = "capabilities";
pub const CHILDREN: &str = "children";
pub const DEFAULT: &str = "default";
pub const DEPRECATED: &str = "deprecated";
pub const DESCRIPTION: &str = "description";
pub const DYNAMIC: &str = "dynamic";
pub const EXPRESSIONS_ALLOWED: &str = "expressionsAllowed";
pub const MAX: &str = "max";
pub const MAX_OCCURS: &str = "maxOccurs";
pub const MIN: &str = "min";
pub const MIN_OCCURS: &str = "minOccurs";
pub const MODEL_DESCRIPTION: &str = "modelDescription";
pub const NAME: &str = "name";
pub const NILLABLE: &str = "nillable";
pub const NOTIFICATIONS: &str = "notifications";
pub const OPERATIONS: &str = "operations";
pub const REASON: &str = "reason";
pub const REQUIRED: &str = "required";
pub const RESTART_REQUIRED: &str = "restartRequired";
pub const SINCE: &str = "since";
pub const STORAGE: &str = "storage";
pub const TYPE: &str = "type";
pub const UNIT: &str = "unit";

/// `storage` value for resources that are never persisted.
pub const RUNTIME_ONLY: &str = "runtime-only";
/// `type` value of a constraint defined by the core model.
pub const CORE: &str = "core";
