//! Path addressing for registered resources.
//!
//! A resource lives at a `PathAddress`: an ordered list of `key=value`
//! elements walked from the root. The value `*` marks a wildcard element that
//! stands for every instance of a child type rather than one named instance.
//! Addresses render as `/key=value/key=*`; the root renders as `/`.

use anyhow::{Result, bail};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Value used by wildcard path elements.
pub const WILDCARD_VALUE: &str = "*";

/// One `key=value` segment of a resource address.
#[derive(Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
pub struct PathElement {
    pub key: String,
    pub value: String,
}

impl PathElement {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }

    /// Element matching every instance of `key`.
    pub fn wildcard(key: impl Into<String>) -> Self {
        Self::new(key, WILDCARD_VALUE)
    }

    pub fn is_wildcard(&self) -> bool {
        self.value == WILDCARD_VALUE
    }
}

impl fmt::Display for PathElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.key, self.value)
    }
}

impl FromStr for PathElement {
    type Err = anyhow::Error;

    fn from_str(raw: &str) -> Result<Self> {
        let Some((key, value)) = raw.split_once('=') else {
            bail!("path element '{raw}' must have the form key=value");
        };
        let key = key.trim();
        let value = value.trim();
        if key.is_empty() || value.is_empty() {
            bail!("path element '{raw}' must have a non-empty key and value");
        }
        Ok(Self::new(key, value))
    }
}

/// Ordered address of a resource, starting at the root.
///
/// The empty address is the root resource. Relative addresses use the same
/// type; the description assembly always queries with the empty address.
#[derive(Clone, Debug, Default, Eq, PartialEq, Hash)]
pub struct PathAddress(Vec<PathElement>);

impl PathAddress {
    pub fn empty() -> Self {
        Self(Vec::new())
    }

    /// New address with `element` appended; `self` is left untouched.
    pub fn append(&self, element: PathElement) -> Self {
        let mut elements = self.0.clone();
        elements.push(element);
        Self(elements)
    }

    pub fn last_element(&self) -> Option<&PathElement> {
        self.0.last()
    }

    pub fn elements(&self) -> &[PathElement] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

impl fmt::Display for PathAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return f.write_str("/");
        }
        for element in &self.0 {
            write!(f, "/{element}")?;
        }
        Ok(())
    }
}

impl FromStr for PathAddress {
    type Err = anyhow::Error;

    fn from_str(raw: &str) -> Result<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed == "/" {
            return Ok(Self::empty());
        }
        let Some(body) = trimmed.strip_prefix('/') else {
            bail!("address '{raw}' must start with '/'");
        };
        let elements = body
            .split('/')
            .map(PathElement::from_str)
            .collect::<Result<Vec<_>>>()?;
        Ok(Self(elements))
    }
}

impl Serialize for PathAddress {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for PathAddress {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        value.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_and_renders_addresses() {
        let address: PathAddress = "/subsystem=logging/handler=*".parse().unwrap();
        assert_eq!(address.len(), 2);
        assert_eq!(address.elements()[0], PathElement::new("subsystem", "logging"));
        assert!(address.last_element().unwrap().is_wildcard());
        assert_eq!(address.to_string(), "/subsystem=logging/handler=*");
    }

    #[test]
    fn root_forms_parse_to_empty_address() {
        for raw in ["", "/", "  /  "] {
            let address: PathAddress = raw.parse().unwrap();
            assert!(address.is_empty(), "{raw:?} should be the root");
            assert_eq!(address.to_string(), "/");
        }
    }

    #[test]
    fn rejects_malformed_segments() {
        assert!("subsystem=logging".parse::<PathAddress>().is_err());
        assert!("/subsystem".parse::<PathAddress>().is_err());
        assert!("/=logging".parse::<PathAddress>().is_err());
        assert!("/subsystem=".parse::<PathAddress>().is_err());
    }

    #[test]
    fn append_leaves_parent_untouched() {
        let parent = PathAddress::empty().append(PathElement::new("subsystem", "web"));
        let child = parent.append(PathElement::wildcard("connector"));
        assert_eq!(parent.len(), 1);
        assert_eq!(child.to_string(), "/subsystem=web/connector=*");
    }

    #[test]
    fn address_serializes_as_string() {
        let address: PathAddress = "/a=b".parse().unwrap();
        let json = serde_json::to_string(&address).unwrap();
        assert_eq!(json, "\"/a=b\"");
        let back: PathAddress = serde_json::from_str(&json).unwrap();
        assert_eq!(back, address);
    }
}
