//! Update policy: which entity types may have pre-existing records mutated.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Resolved once per run and passed by reference to the registry and engine.
///
/// Accepted configuration shapes for `updatable_objects`:
/// - absent, `"none"` or `""` → [`UpdatePolicy::None`]
/// - `"all"` (any case) → [`UpdatePolicy::All`]
/// - a list of entity type names, or a comma-separated string of them
///   → [`UpdatePolicy::Only`], matched case-insensitively
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawPolicy", into = "RawPolicy")]
pub enum UpdatePolicy {
    /// Pre-existing records are never mutated. Missing custom field values may
    /// still be added.
    #[default]
    None,
    /// Every entity type may be updated.
    All,
    /// Only the listed entity types (stored lower-cased) may be updated.
    Only(BTreeSet<String>),
}

impl UpdatePolicy {
    /// Build an allow-list policy. An empty list collapses to `None`.
    pub fn only<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let names: BTreeSet<String> = names
            .into_iter()
            .map(|n| n.as_ref().trim().to_lowercase())
            .filter(|n| !n.is_empty())
            .collect();
        if names.is_empty() {
            Self::None
        } else {
            Self::Only(names)
        }
    }

    /// Parse the single-string form used by env vars and CLI flags.
    #[must_use]
    pub fn parse(value: &str) -> Self {
        let trimmed = value.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("none") {
            Self::None
        } else if trimmed.eq_ignore_ascii_case("all") {
            Self::All
        } else {
            Self::only(trimmed.split(','))
        }
    }

    /// Whether pre-existing entities of `entity_type` may be updated.
    #[must_use]
    pub fn allows(&self, entity_type: &str) -> bool {
        match self {
            Self::None => false,
            Self::All => true,
            Self::Only(names) => names.contains(&entity_type.trim().to_lowercase()),
        }
    }

    #[must_use]
    pub const fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }
}

impl fmt::Display for UpdatePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => f.write_str("none"),
            Self::All => f.write_str("all"),
            Self::Only(names) => {
                let joined = names.iter().map(String::as_str).collect::<Vec<_>>().join(",");
                f.write_str(&joined)
            }
        }
    }
}

#[derive(Deserialize, Serialize)]
#[serde(untagged)]
enum RawPolicy {
    Keyword(String),
    List(Vec<String>),
}

impl From<RawPolicy> for UpdatePolicy {
    fn from(raw: RawPolicy) -> Self {
        match raw {
            RawPolicy::Keyword(value) => Self::parse(&value),
            RawPolicy::List(names) => Self::only(names),
        }
    }
}

impl From<UpdatePolicy> for RawPolicy {
    fn from(policy: UpdatePolicy) -> Self {
        match policy {
            UpdatePolicy::None => Self::Keyword("none".into()),
            UpdatePolicy::All => Self::Keyword("all".into()),
            UpdatePolicy::Only(names) => Self::List(names.into_iter().collect()),
        }
    }
}

/// The `[updates]` configuration section.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct UpdatesConfig {
    #[serde(default)]
    pub updatable_objects: UpdatePolicy,
}
