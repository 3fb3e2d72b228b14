//! Renders access constraints into a description document.

use crate::keys;
use crate::locale::Locale;
use crate::registry::AccessConstraint;
use serde_json::{Map, Value};

/// Write `accessConstraints/<kind>/<name> = {"type": ...}` into `document`.
///
/// `type` is `core` for constraints defined by the core model and the owning
/// subsystem's name otherwise. Constraints keep registration order within
/// their kind. An empty list leaves the document untouched. Constraint text is
/// not localized, so `locale` is currently unused.
pub fn add_access_constraints(
    document: &mut Map<String, Value>,
    constraints: &[AccessConstraint],
    _locale: &Locale,
) {
    if constraints.is_empty() {
        return;
    }
    let mut by_kind: Map<String, Value> = Map::new();
    for constraint in constraints {
        let origin = constraint.subsystem.as_deref().unwrap_or(keys::CORE);
        let mut descriptor = Map::new();
        descriptor.insert(keys::TYPE.into(), Value::from(origin));

        let kind = by_kind
            .entry(constraint.kind.as_str())
            .or_insert_with(|| Value::Object(Map::new()));
        if let Value::Object(kind) = kind {
            kind.insert(constraint.name.clone(), Value::Object(descriptor));
        }
    }
    document.insert(keys::ACCESS_CONSTRAINTS.into(), Value::Object(by_kind));
}
