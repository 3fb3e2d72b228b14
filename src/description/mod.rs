//! Description document assembly for a single registered resource.
//!
//! [`ResourceDescriber`] reads a [`ResourceRegistration`] and writes one
//! document per call: header fields, the sorted `attributes` section, empty
//! `operations`/`notifications` sections, and one `children` entry per child
//! type. Nothing is cached between calls; each locale gets a fresh document.
//!
//! Sections this module leaves empty (`operations`, `notifications`,
//! `children/*/modelDescription`) are filled by other assemblers; see
//! [`tree::describe_tree`] for the recursive child descriptions.

pub mod tree;

pub use tree::{ChildResolver, Depth, ResourceTree, describe_tree};

use crate::access::add_access_constraints;
use crate::address::PathAddress;
use crate::attribute::AttributeSortKey;
use crate::config::DescribeOptions;
use crate::deprecation::DeprecationData;
use crate::keys;
use crate::locale::Locale;
use crate::registry::{AttributeAccess, ResourceRegistration, default_max_occurs};
use crate::text::{DescriptionResolver, ResourceBundle};
use anyhow::Result;
use serde_json::{Map, Value};
use std::collections::BTreeSet;
use tracing::{debug, trace};

/// Anything that can describe a resource for a locale.
pub trait DescriptionProvider {
    fn model_description(&self, locale: &Locale) -> Result<Value>;
}

/// Builds the description of one resource from its registration metadata.
pub struct ResourceDescriber<'a> {
    registration: &'a dyn ResourceRegistration,
    resolver: &'a dyn DescriptionResolver,
    deprecation: Option<DeprecationData>,
    options: DescribeOptions,
}

impl<'a> ResourceDescriber<'a> {
    pub fn new(
        registration: &'a dyn ResourceRegistration,
        resolver: &'a dyn DescriptionResolver,
    ) -> Self {
        Self {
            registration,
            resolver,
            deprecation: None,
            options: DescribeOptions::default(),
        }
    }

    /// Mark the described resource deprecated.
    ///
    /// Deprecation belongs to the resource definition, not the registration,
    /// so it is only emitted when supplied here.
    pub fn with_deprecation(mut self, deprecation: DeprecationData) -> Self {
        self.deprecation = Some(deprecation);
        self
    }

    pub fn with_options(mut self, options: DescribeOptions) -> Self {
        self.options = options;
        self
    }

    fn add_header(
        &self,
        result: &mut Map<String, Value>,
        locale: &Locale,
        bundle: Option<&ResourceBundle>,
    ) -> Result<()> {
        let registration = self.registration;
        result.insert(
            keys::DESCRIPTION.into(),
            Value::from(self.resolver.resource_description(locale, bundle)?),
        );

        // Occurrence bounds are only written when they differ from the default.
        let min_occurs = registration.min_occurs();
        if min_occurs > 0 {
            result.insert(keys::MIN_OCCURS.into(), Value::from(min_occurs));
        }
        let max_occurs = registration.max_occurs();
        match default_max_occurs(registration.path_address()) {
            Some(default) if default == max_occurs => {}
            _ => {
                result.insert(keys::MAX_OCCURS.into(), Value::from(max_occurs));
            }
        }

        let capabilities = registration.capabilities();
        if !capabilities.is_empty() {
            let entries = capabilities
                .into_iter()
                .map(|capability| {
                    let mut entry = Map::new();
                    entry.insert(keys::NAME.into(), Value::from(capability.name));
                    entry.insert(keys::DYNAMIC.into(), Value::from(capability.dynamically_named));
                    Value::Object(entry)
                })
                .collect();
            result.insert(keys::CAPABILITIES.into(), Value::Array(entries));
        }

        if let Some(deprecation) = &self.deprecation {
            let mut deprecated = Map::new();
            deprecated.insert(keys::SINCE.into(), Value::from(deprecation.since.to_string()));
            deprecated.insert(
                keys::REASON.into(),
                Value::from(self.resolver.resource_deprecated_description(locale, bundle)?),
            );
            result.insert(keys::DEPRECATED.into(), Value::Object(deprecated));
        }

        if registration.is_runtime_only() {
            result.insert(keys::STORAGE.into(), Value::from(keys::RUNTIME_ONLY));
        }

        add_access_constraints(result, &registration.access_constraints(), locale);
        Ok(())
    }

    /// Entries are keyed by the registered attribute name, even when the
    /// definition behind it carries a different name.
    fn attribute_section(
        &self,
        locale: &Locale,
        bundle: Option<&ResourceBundle>,
    ) -> Result<Map<String, Value>> {
        let here = PathAddress::empty();
        let names = self.registration.attribute_names(&here);
        let mut sorted: Vec<(AttributeSortKey, Value)> = Vec::with_capacity(names.len());

        for name in names {
            let access = self
                .registration
                .attribute_access(&here, &name)
                .unwrap_or_else(|| AttributeAccess::Placeholder { name: name.clone() });
            match access {
                AttributeAccess::Defined(def) => {
                    let mut scratch = Map::new();
                    def.add_resource_attribute_description(
                        &mut scratch,
                        self.resolver,
                        locale,
                        bundle,
                    )?;
                    let description = scratch
                        .get_mut(keys::ATTRIBUTES)
                        .and_then(Value::as_object_mut)
                        .and_then(|attributes| attributes.remove(&def.name))
                        .unwrap_or_else(empty_object);
                    let key = AttributeSortKey {
                        group: def.group,
                        name,
                    };
                    sorted.push((key, description));
                }
                AttributeAccess::Placeholder { .. } => {
                    trace!(attribute = %name, "no definition registered; emitting placeholder");
                    sorted.push((AttributeSortKey::ungrouped(name), empty_object()));
                }
            }
        }

        let groupless = self.options.groupless;
        sorted.sort_by(|(a, _), (b, _)| a.compare(b, groupless));

        let mut attributes = Map::new();
        for (key, description) in sorted {
            attributes.insert(key.name, description);
        }
        Ok(attributes)
    }

    fn child_section(
        &self,
        locale: &Locale,
        bundle: Option<&ResourceBundle>,
    ) -> Result<Map<String, Value>> {
        let mut children = Map::new();
        let mut child_types = BTreeSet::new();
        for element in self.registration.child_addresses(&PathAddress::empty()) {
            if !child_types.insert(element.key.clone()) {
                trace!(child = %element, "child type already described");
                continue;
            }
            let mut child = Map::new();
            child.insert(
                keys::DESCRIPTION.into(),
                Value::from(
                    self.resolver
                        .child_type_description(&element.key, locale, bundle)?,
                ),
            );
            child.insert(keys::MODEL_DESCRIPTION.into(), empty_object());
            children.insert(element.key, Value::Object(child));
        }
        Ok(children)
    }
}

impl DescriptionProvider for ResourceDescriber<'_> {
    fn model_description(&self, locale: &Locale) -> Result<Value> {
        let address = self
            .registration
            .path_address()
            .map(ToString::to_string)
            .unwrap_or_else(|| "/".to_string());
        debug!(%address, %locale, "assembling resource description");

        let bundle = self.resolver.resource_bundle(locale)?;
        let bundle = bundle.as_ref();

        let mut result = Map::new();
        self.add_header(&mut result, locale, bundle)?;
        let attributes = self.attribute_section(locale, bundle)?;
        result.insert(keys::ATTRIBUTES.into(), Value::Object(attributes));
        result.insert(keys::OPERATIONS.into(), empty_object());
        result.insert(keys::NOTIFICATIONS.into(), empty_object());
        let children = self.child_section(locale, bundle)?;
        result.insert(keys::CHILDREN.into(), Value::Object(children));
        Ok(Value::Object(result))
    }
}

fn empty_object() -> Value {
    Value::Object(Map::new())
}
