//! Locale tags used to select description text.

use anyhow::{Result, bail};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Language plus optional country, e.g. `en` or `de_DE`.
///
/// The root locale has an empty language and selects the base bundle only.
#[derive(Clone, Debug, Default, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct Locale {
    language: String,
    country: Option<String>,
}

impl Locale {
    pub fn root() -> Self {
        Self::default()
    }

    pub fn new(language: &str, country: Option<&str>) -> Self {
        Self {
            language: language.to_ascii_lowercase(),
            country: country
                .filter(|c| !c.is_empty())
                .map(str::to_ascii_uppercase),
        }
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    pub fn country(&self) -> Option<&str> {
        self.country.as_deref()
    }

    pub fn is_root(&self) -> bool {
        self.language.is_empty()
    }

    /// Locales to consult for a lookup, most specific first, ending at root.
    pub fn fallback_chain(&self) -> Vec<Locale> {
        let mut chain = Vec::with_capacity(3);
        if self.country.is_some() {
            chain.push(self.clone());
        }
        if !self.is_root() {
            chain.push(Locale::new(&self.language, None));
        }
        chain.push(Locale::root());
        chain
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.country {
            Some(country) => write!(f, "{}_{}", self.language, country),
            None => f.write_str(&self.language),
        }
    }
}

impl FromStr for Locale {
    type Err = anyhow::Error;

    fn from_str(raw: &str) -> Result<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("root") {
            return Ok(Self::root());
        }
        let mut parts = trimmed.split(['_', '-']);
        let language = parts.next().unwrap_or_default();
        let country = parts.next();
        if parts.next().is_some() {
            bail!("locale '{raw}' has too many segments (expected lang or lang_COUNTRY)");
        }
        let valid = |s: &str| !s.is_empty() && s.chars().all(|c| c.is_ascii_alphabetic());
        if !valid(language) || country.is_some_and(|c| !valid(c)) {
            bail!("locale '{raw}' must contain only ASCII letters");
        }
        Ok(Self::new(language, country))
    }
}

impl Serialize for Locale {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Locale {
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
    fn parses_common_tag_forms() {
        let underscore: Locale = "de_DE".parse().unwrap();
        let dash: Locale = "de-de".parse().unwrap();
        assert_eq!(underscore, dash);
        assert_eq!(underscore.language(), "de");
        assert_eq!(underscore.country(), Some("DE"));
        assert_eq!(underscore.to_string(), "de_DE");
    }

    #[test]
    fn fallback_chain_ends_at_root() {
        let locale: Locale = "fr_CA".parse().unwrap();
        let chain: Vec<String> = locale.fallback_chain().iter().map(|l| l.to_string()).collect();
        assert_eq!(chain, vec!["fr_CA", "fr", ""]);

        let language_only: Locale = "fr".parse().unwrap();
        assert_eq!(language_only.fallback_chain().len(), 2);
        assert_eq!(Locale::root().fallback_chain(), vec![Locale::root()]);
    }

    #[test]
    fn rejects_garbage_tags() {
        assert!("en_US_x".parse::<Locale>().is_err());
        assert!("e1".parse::<Locale>().is_err());
        assert!("en_".parse::<Locale>().is_err());
        assert!("root".parse::<Locale>().unwrap().is_root());
    }
}
