//! Assembly options and their environment overrides.
//!
//! Options default to the conventional ordering. `RESDESC_GROUPLESS_ORDER`
//! (`first` or `last`) overrides where attributes without a group land so
//! consumers that expect the opposite convention can opt in without code
//! changes.

use anyhow::{Result, bail};
use std::env;
use std::str::FromStr;

pub const GROUPLESS_ORDER_ENV: &str = "RESDESC_GROUPLESS_ORDER";

/// Placement of attributes that declare no group relative to grouped ones.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum GrouplessOrder {
    /// Missing group sorts as the minimal value.
    #[default]
    First,
    Last,
}

impl GrouplessOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            GrouplessOrder::First => "first",
            GrouplessOrder::Last => "last",
        }
    }
}

impl FromStr for GrouplessOrder {
    type Err = anyhow::Error;

    fn from_str(raw: &str) -> Result<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "first" => Ok(GrouplessOrder::First),
            "last" => Ok(GrouplessOrder::Last),
            other => bail!("unknown groupless order '{other}' (expected first|last)"),
        }
    }
}

/// Knobs for one description assembly.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct DescribeOptions {
    pub groupless: GrouplessOrder,
}

impl DescribeOptions {
    pub fn with_groupless(mut self, groupless: GrouplessOrder) -> Self {
        self.groupless = groupless;
        self
    }

    /// Defaults overlaid with process environment overrides.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Same as [`from_env`](Self::from_env) with an injectable lookup.
    ///
    /// Blank values are ignored so an exported-but-empty variable keeps the
    /// default.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut options = Self::default();
        if let Some(raw) = lookup(GROUPLESS_ORDER_ENV).filter(|v| !v.trim().is_empty()) {
            options.groupless = raw.parse()?;
        }
        Ok(options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_groupless_first() {
        let options = DescribeOptions::from_lookup(|_| None).unwrap();
        assert_eq!(options.groupless, GrouplessOrder::First);
    }

    #[test]
    fn lookup_overrides_and_blank_is_ignored() {
        let last = DescribeOptions::from_lookup(|name| {
            (name == GROUPLESS_ORDER_ENV).then(|| "LAST".to_string())
        })
        .unwrap();
        assert_eq!(last.groupless, GrouplessOrder::Last);

        let blank = DescribeOptions::from_lookup(|_| Some("  ".to_string())).unwrap();
        assert_eq!(blank.groupless, GrouplessOrder::First);
    }

    #[test]
    fn rejects_unknown_values() {
        let err = DescribeOptions::from_lookup(|_| Some("middle".to_string())).unwrap_err();
        assert!(err.to_string().contains("middle"));
    }
}
