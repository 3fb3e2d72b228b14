//! JSON-backed bundles and the key-prefix resolver built on them.
//!
//! Bundles live in one directory as flat string maps named after a base name
//! and an optional locale suffix: `messages.json` (root),
//! `messages_de.json`, `messages_de_DE.json`. A lookup for `de_DE` sees the
//! merge of all three, most specific entry winning.
//!
//! Keys follow the prefix scheme used by management resource bundles: the
//! resource itself is `<prefix>`, its deprecation reason
//! `<prefix>.deprecated`, an attribute or child type `<prefix>.<name>`, and an
//! attribute deprecation `<prefix>.<name>.deprecated`.

use crate::description::ChildResolver;
use crate::locale::Locale;
use crate::text::{DescriptionResolver, ResourceBundle, TextResolutionError};
use anyhow::{Result, bail};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, trace};

const DEPRECATED_SUFFIX: &str = "deprecated";

/// Every bundle file found for one base name, keyed by locale.
#[derive(Clone, Debug, Default)]
pub struct BundleCatalog {
    tables: BTreeMap<Locale, BTreeMap<String, String>>,
}

impl BundleCatalog {
    /// Load `<base_name>*.json` bundles from `dir`.
    ///
    /// Files whose suffix is not a locale tag are rejected rather than
    /// skipped so a typo in a file name cannot silently drop translations.
    pub fn load_dir(dir: &Path, base_name: &str) -> Result<Self> {
        if !dir.is_dir() {
            bail!("bundle directory not found: {}", dir.display());
        }
        let mut catalog = Self::default();
        let mut entries = fs::read_dir(dir)
            .map_err(|error| TextResolutionError::BundleRead {
                path: dir.to_path_buf(),
                error,
            })?
            .collect::<Result<Vec<_>, _>>()
            .map_err(|error| TextResolutionError::BundleRead {
                path: dir.to_path_buf(),
                error,
            })?;
        entries.sort_by_key(|entry| entry.file_name());

        for entry in entries {
            let path = entry.path();
            if !path.is_file() || path.extension().and_then(|ext| ext.to_str()) != Some("json") {
                continue;
            }
            let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            let locale = if stem == base_name {
                Locale::root()
            } else if let Some(tag) = stem
                .strip_prefix(base_name)
                .and_then(|rest| rest.strip_prefix('_'))
            {
                tag.parse()?
            } else {
                continue;
            };
            let table = read_table(&path)?;
            debug!(path = %path.display(), locale = %locale, keys = table.len(), "loaded bundle");
            catalog.insert(locale, table);
        }

        if catalog.tables.is_empty() {
            bail!(
                "no bundles named '{base_name}' found under {}",
                dir.display()
            );
        }
        Ok(catalog)
    }

    /// Register (or replace) the table for `locale`.
    pub fn insert(&mut self, locale: Locale, table: BTreeMap<String, String>) {
        self.tables.insert(locale, table);
    }

    /// Merge the fallback chain for `locale` into one bundle.
    ///
    /// Returns `None` when no table along the chain exists.
    pub fn bundle_for(&self, locale: &Locale) -> Option<ResourceBundle> {
        let mut merged: Option<BTreeMap<String, String>> = None;
        for candidate in locale.fallback_chain().iter().rev() {
            if let Some(table) = self.tables.get(candidate) {
                trace!(requested = %locale, layer = %candidate, "merging bundle layer");
                merged
                    .get_or_insert_with(BTreeMap::new)
                    .extend(table.iter().map(|(k, v)| (k.clone(), v.clone())));
            }
        }
        merged.map(|entries| ResourceBundle::new(locale.clone(), entries))
    }
}

fn read_table(path: &Path) -> Result<BTreeMap<String, String>> {
    let data = fs::read_to_string(path).map_err(|error| TextResolutionError::BundleRead {
        path: path.to_path_buf(),
        error,
    })?;
    let table = serde_json::from_str(&data).map_err(|error| TextResolutionError::BundleParse {
        path: path.to_path_buf(),
        error,
    })?;
    Ok(table)
}

/// Resolver that derives every key from a dotted prefix.
#[derive(Clone, Debug)]
pub struct StandardResolver {
    key_prefix: String,
    catalog: Arc<BundleCatalog>,
}

impl StandardResolver {
    pub fn new(key_prefix: impl Into<String>, catalog: Arc<BundleCatalog>) -> Self {
        Self {
            key_prefix: key_prefix.into(),
            catalog,
        }
    }

    pub fn key_prefix(&self) -> &str {
        &self.key_prefix
    }

    /// Resolver for resources of child type `child_type`, sharing bundles.
    pub fn child_resolver(&self, child_type: &str) -> Self {
        Self {
            key_prefix: self.key(&[child_type]),
            catalog: Arc::clone(&self.catalog),
        }
    }

    fn key(&self, parts: &[&str]) -> String {
        let mut key = self.key_prefix.clone();
        for part in parts {
            if !key.is_empty() {
                key.push('.');
            }
            key.push_str(part);
        }
        key
    }

    fn lookup(&self, key: &str, locale: &Locale, bundle: Option<&ResourceBundle>) -> Result<String> {
        let loaded;
        let bundle = match bundle {
            Some(bundle) => Some(bundle),
            None => {
                loaded = self.catalog.bundle_for(locale);
                loaded.as_ref()
            }
        };
        match bundle.and_then(|b| b.get(key)) {
            Some(text) => Ok(text.to_string()),
            None => Err(TextResolutionError::MissingKey {
                key: key.to_string(),
                locale: locale.clone(),
            }
            .into()),
        }
    }
}

impl DescriptionResolver for StandardResolver {
    fn resource_bundle(&self, locale: &Locale) -> Result<Option<ResourceBundle>> {
        Ok(self.catalog.bundle_for(locale))
    }

    fn resource_description(
        &self,
        locale: &Locale,
        bundle: Option<&ResourceBundle>,
    ) -> Result<String> {
        self.lookup(&self.key(&[]), locale, bundle)
    }

    fn resource_deprecated_description(
        &self,
        locale: &Locale,
        bundle: Option<&ResourceBundle>,
    ) -> Result<String> {
        self.lookup(&self.key(&[DEPRECATED_SUFFIX]), locale, bundle)
    }

    fn child_type_description(
        &self,
        child_type: &str,
        locale: &Locale,
        bundle: Option<&ResourceBundle>,
    ) -> Result<String> {
        self.lookup(&self.key(&[child_type]), locale, bundle)
    }

    fn attribute_description(
        &self,
        attribute: &str,
        locale: &Locale,
        bundle: Option<&ResourceBundle>,
    ) -> Result<String> {
        self.lookup(&self.key(&[attribute]), locale, bundle)
    }

    fn attribute_deprecated_description(
        &self,
        attribute: &str,
        locale: &Locale,
        bundle: Option<&ResourceBundle>,
    ) -> Result<String> {
        self.lookup(&self.key(&[attribute, DEPRECATED_SUFFIX]), locale, bundle)
    }
}

impl ChildResolver for StandardResolver {
    fn resolver_for_child(&self, child_type: &str, declared_prefix: Option<&str>) -> Self {
        match declared_prefix {
            Some(prefix) => Self::new(prefix, Arc::clone(&self.catalog)),
            None => self.child_resolver(child_type),
        }
    }
}
