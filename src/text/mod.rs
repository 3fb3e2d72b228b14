//! Locale-sensitive text resolution for description documents.
//!
//! The description assembly never looks up text itself; it asks a
//! [`DescriptionResolver`] for each string it needs. The bundle for the
//! requested locale is resolved once per assembly and handed back to every
//! lookup so a single document never mixes text from two bundle loads.

pub mod standard;

pub use standard::{BundleCatalog, StandardResolver};

use crate::locale::Locale;
use anyhow::Result;
use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

/// Flat key/value text table for one locale.
///
/// Bundles produced by [`BundleCatalog`] are already merged along the locale
/// fallback chain, so a lookup never needs to consult a parent bundle.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ResourceBundle {
    locale: Locale,
    entries: BTreeMap<String, String>,
}

impl ResourceBundle {
    pub fn new(locale: Locale, entries: BTreeMap<String, String>) -> Self {
        Self { locale, entries }
    }

    pub fn locale(&self) -> &Locale {
        &self.locale
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Source of every human-readable string in a description document.
///
/// `bundle` is the value previously returned by [`resource_bundle`] for the
/// same locale, or `None` when the caller has none; implementations may load
/// their own bundle in that case.
///
/// [`resource_bundle`]: DescriptionResolver::resource_bundle
pub trait DescriptionResolver {
    fn resource_bundle(&self, locale: &Locale) -> Result<Option<ResourceBundle>>;

    fn resource_description(&self, locale: &Locale, bundle: Option<&ResourceBundle>)
    -> Result<String>;

    fn resource_deprecated_description(
        &self,
        locale: &Locale,
        bundle: Option<&ResourceBundle>,
    ) -> Result<String>;

    fn child_type_description(
        &self,
        child_type: &str,
        locale: &Locale,
        bundle: Option<&ResourceBundle>,
    ) -> Result<String>;

    fn attribute_description(
        &self,
        attribute: &str,
        locale: &Locale,
        bundle: Option<&ResourceBundle>,
    ) -> Result<String>;

    fn attribute_deprecated_description(
        &self,
        attribute: &str,
        locale: &Locale,
        bundle: Option<&ResourceBundle>,
    ) -> Result<String>;
}

/// Failures raised while loading bundles or looking up text.
#[derive(Debug)]
pub enum TextResolutionError {
    MissingKey {
        key: String,
        locale: Locale,
    },
    BundleRead {
        path: PathBuf,
        error: std::io::Error,
    },
    BundleParse {
        path: PathBuf,
        error: serde_json::Error,
    },
}

impl fmt::Display for TextResolutionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TextResolutionError::MissingKey { key, locale } if locale.is_root() => {
                write!(f, "no text for key '{key}' in the root bundle")
            }
            TextResolutionError::MissingKey { key, locale } => {
                write!(f, "no text for key '{key}' in locale {locale} or its fallbacks")
            }
            TextResolutionError::BundleRead { path, error } => {
                write!(f, "failed to read bundle {}: {error}", path.display())
            }
            TextResolutionError::BundleParse { path, error } => {
                write!(f, "bundle {} is not a flat JSON string map ({error})", path.display())
            }
        }
    }
}

impl std::error::Error for TextResolutionError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TextResolutionError::MissingKey { .. } => None,
            TextResolutionError::BundleRead { error, .. } => Some(error),
            TextResolutionError::BundleParse { error, .. } => Some(error),
        }
    }
}
