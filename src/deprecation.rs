//! Deprecation metadata attached to resources and attributes.

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Management model version, `major.minor.micro`.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct ModelVersion {
    pub major: u32,
    pub minor: u32,
    pub micro: u32,
}

impl ModelVersion {
    pub const fn new(major: u32, minor: u32, micro: u32) -> Self {
        Self {
            major,
            minor,
            micro,
        }
    }
}

impl fmt::Display for ModelVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.micro)
    }
}

impl FromStr for ModelVersion {
    type Err = anyhow::Error;

    /// Accepts `1`, `1.2` or `1.2.3`; missing components are zero.
    fn from_str(raw: &str) -> Result<Self> {
        let parts: Vec<&str> = raw.trim().split('.').collect();
        if parts.is_empty() || parts.len() > 3 {
            bail!("model version '{raw}' must look like major.minor.micro");
        }
        let mut numbers = [0u32; 3];
        for (slot, part) in numbers.iter_mut().zip(&parts) {
            *slot = part
                .parse()
                .with_context(|| format!("model version '{raw}' has a non-numeric component"))?;
        }
        Ok(Self::new(numbers[0], numbers[1], numbers[2]))
    }
}

impl Serialize for ModelVersion {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ModelVersion {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        value.parse().map_err(serde::de::Error::custom)
    }
}

/// Marks a resource or attribute as deprecated since a model version.
///
/// The human-readable reason is not stored here; it is resolved per locale
/// when a description is assembled.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct DeprecationData {
    pub since: ModelVersion,
}

impl DeprecationData {
    pub fn new(since: ModelVersion) -> Self {
        Self { since }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_partial_versions() {
        assert_eq!("2".parse::<ModelVersion>().unwrap(), ModelVersion::new(2, 0, 0));
        assert_eq!("1.4".parse::<ModelVersion>().unwrap().to_string(), "1.4.0");
        assert_eq!("3.1.7".parse::<ModelVersion>().unwrap(), ModelVersion::new(3, 1, 7));
        assert!("1.x".parse::<ModelVersion>().is_err());
        assert!("1.2.3.4".parse::<ModelVersion>().is_err());
        assert!("".parse::<ModelVersion>().is_err());
    }

    #[test]
    fn deprecation_deserializes_from_version_text() {
        let data: DeprecationData = serde_json::from_str(r#"{"since": "1.2"}"#).unwrap();
        assert_eq!(data.since, ModelVersion::new(1, 2, 0));
        assert_eq!(serde_json::to_value(&data).unwrap()["since"], "1.2.0");
    }
}
