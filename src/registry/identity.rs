use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Named contract a resource provides to other resources.
///
/// Dynamically named capabilities get one concrete name per resource
/// instance (the base name plus the instance's address value).
#[derive(Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct Capability {
    pub name: String,
    #[serde(rename = "dynamic", default)]
    pub dynamically_named: bool,
}

impl Capability {
    pub fn new(name: impl Into<String>, dynamically_named: bool) -> Self {
        Self {
            name: name.into(),
            dynamically_named,
        }
    }
}

/// Family of an access constraint.
///
/// Known variants keep serialization consistent; `Other` preserves kinds
/// introduced by newer models.
#[derive(Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum ConstraintKind {
    Sensitive,
    Application,
    Other(String),
}

impl ConstraintKind {
    pub fn as_str(&self) -> &str {
        match self {
            ConstraintKind::Sensitive => "sensitive",
            ConstraintKind::Application => "application",
            ConstraintKind::Other(value) => value.as_str(),
        }
    }

    fn from_str(value: &str) -> Self {
        match value {
            "sensitive" => ConstraintKind::Sensitive,
            "application" => ConstraintKind::Application,
            other => ConstraintKind::Other(other.to_string()),
        }
    }
}

impl Serialize for ConstraintKind {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ConstraintKind {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        Ok(Self::from_str(&value))
    }
}

/// Access-control constraint attached to a resource.
///
/// `subsystem` is `None` for constraints defined by the core model.
#[derive(Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct AccessConstraint {
    pub kind: ConstraintKind,
    pub name: String,
    #[serde(default)]
    pub subsystem: Option<String>,
}

impl AccessConstraint {
    pub fn core(kind: ConstraintKind, name: impl Into<String>) -> Self {
        Self {
            kind,
            name: name.into(),
            subsystem: None,
        }
    }

    pub fn subsystem(
        kind: ConstraintKind,
        name: impl Into<String>,
        subsystem: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            name: name.into(),
            subsystem: Some(subsystem.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constraint_kind_round_trips_known_and_unknown() {
        let known: ConstraintKind = serde_json::from_str("\"sensitive\"").unwrap();
        assert_eq!(known, ConstraintKind::Sensitive);

        let custom: ConstraintKind = serde_json::from_str("\"audit\"").unwrap();
        assert_eq!(custom, ConstraintKind::Other("audit".into()));
        assert_eq!(serde_json::to_string(&custom).unwrap(), "\"audit\"");
    }

    #[test]
    fn capability_uses_dynamic_field_name() {
        let cap: Capability =
            serde_json::from_str(r#"{"name": "org.web.connector", "dynamic": true}"#).unwrap();
        assert!(cap.dynamically_named);
        let plain: Capability = serde_json::from_str(r#"{"name": "org.web"}"#).unwrap();
        assert!(!plain.dynamically_named);
    }
}
