//! Validator options.
//!
//! Values arrive as strings (config file, CLI, environment) and are converted here so that an
//! unknown value is a typed, fatal [`ConfigError`] rather than a silently ignored option.

use crate::issue::Severity;
use crate::refs::RefKind;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("invalid value '{value}' for {option}: expected one of {expected}")]
    InvalidValue {
        option: &'static str,
        value: String,
        expected: &'static str,
    },
}

/// How strictly a check is enforced.
///
/// Variant order is significant: `None < Warning < Error`.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum CheckLevel {
    None,
    Warning,
    #[default]
    Error,
}

impl CheckLevel {
    pub fn parse(option: &'static str, value: &str) -> Result<Self, ConfigError> {
        match value.trim().to_ascii_lowercase().as_str() {
            "error" => Ok(CheckLevel::Error),
            "warning" | "warn" => Ok(CheckLevel::Warning),
            "none" | "off" => Ok(CheckLevel::None),
            _ => Err(ConfigError::InvalidValue {
                option,
                value: value.to_string(),
                expected: "error, warning, none",
            }),
        }
    }

    pub fn is_enabled(self) -> bool {
        self != CheckLevel::None
    }

    /// Severity of issues raised under this level; `None` when the check is off.
    pub fn severity(self) -> Option<Severity> {
        match self {
            CheckLevel::Error => Some(Severity::Error),
            CheckLevel::Warning => Some(Severity::Warning),
            CheckLevel::None => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            CheckLevel::Error => "error",
            CheckLevel::Warning => "warning",
            CheckLevel::None => "none",
        }
    }
}

impl fmt::Display for CheckLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which ref kind floating versions (`vN`, `vN.M`, `latest`) are expected to use.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FloatingVersionsUse {
    #[default]
    Tags,
    Branches,
}

impl FloatingVersionsUse {
    pub fn parse(value: &str) -> Result<Self, ConfigError> {
        match value.trim().to_ascii_lowercase().as_str() {
            "tags" | "tag" => Ok(FloatingVersionsUse::Tags),
            "branches" | "branch" => Ok(FloatingVersionsUse::Branches),
            _ => Err(ConfigError::InvalidValue {
                option: "floating-versions-use",
                value: value.to_string(),
                expected: "tags, branches",
            }),
        }
    }

    pub fn ref_kind(self) -> RefKind {
        match self {
            FloatingVersionsUse::Tags => RefKind::Tag,
            FloatingVersionsUse::Branches => RefKind::Branch,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            FloatingVersionsUse::Tags => "tags",
            FloatingVersionsUse::Branches => "branches",
        }
    }
}

pub fn parse_bool(option: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "yes" | "1" => Ok(true),
        "false" | "no" | "0" => Ok(false),
        _ => Err(ConfigError::InvalidValue {
            option,
            value: value.to_string(),
            expected: "true, false",
        }),
    }
}

/// The enumerated option set consumed by the rule engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidatorConfig {
    pub check_minor_version: CheckLevel,
    pub check_releases: CheckLevel,
    pub check_release_immutability: CheckLevel,
    pub floating_versions_use: FloatingVersionsUse,
    pub ignore_preview_releases: bool,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub ignore_versions: Vec<String>,
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            check_minor_version: CheckLevel::Error,
            check_releases: CheckLevel::Error,
            check_release_immutability: CheckLevel::Error,
            floating_versions_use: FloatingVersionsUse::Tags,
            ignore_preview_releases: true,
            ignore_versions: Vec::new(),
        }
    }
}

impl ValidatorConfig {
    /// Preferred ref kind for a version: floating versions follow
    /// `floating-versions-use`, exact versions are always tags.
    pub fn preferred_kind(&self, floating: bool) -> RefKind {
        if floating {
            self.floating_versions_use.ref_kind()
        } else {
            RefKind::Tag
        }
    }

    /// Level for draft-release checks: the stricter of the two release options.
    pub fn draft_release_level(&self) -> CheckLevel {
        self.check_releases.max(self.check_release_immutability)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn check_level_parses_case_insensitively() {
        assert_eq!(CheckLevel::parse("x", "ERROR").unwrap(), CheckLevel::Error);
        assert_eq!(CheckLevel::parse("x", " warning ").unwrap(), CheckLevel::Warning);
        assert_eq!(CheckLevel::parse("x", "none").unwrap(), CheckLevel::None);
    }

    #[test]
    fn invalid_level_names_the_option() {
        let err = CheckLevel::parse("check-releases", "sometimes").unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("check-releases"), "{msg}");
        assert!(msg.contains("sometimes"), "{msg}");
    }

    #[test]
    fn floating_versions_use_rejects_unknown() {
        assert_eq!(
            FloatingVersionsUse::parse("branches").unwrap().ref_kind(),
            RefKind::Branch
        );
        assert!(matches!(
            FloatingVersionsUse::parse("commits"),
            Err(ConfigError::InvalidValue {
                option: "floating-versions-use",
                ..
            })
        ));
    }

    #[test]
    fn level_ordering_drives_draft_level() {
        let cfg = ValidatorConfig {
            check_releases: CheckLevel::Warning,
            check_release_immutability: CheckLevel::None,
            ..Default::default()
        };
        assert_eq!(cfg.draft_release_level(), CheckLevel::Warning);

        let cfg = ValidatorConfig {
            check_releases: CheckLevel::None,
            check_release_immutability: CheckLevel::Error,
            ..Default::default()
        };
        assert_eq!(cfg.draft_release_level(), CheckLevel::Error);
    }

    #[test]
    fn preferred_kind_for_exact_versions_is_tag() {
        let cfg = ValidatorConfig {
            floating_versions_use: FloatingVersionsUse::Branches,
            ..Default::default()
        };
        assert_eq!(cfg.preferred_kind(true), RefKind::Branch);
        assert_eq!(cfg.preferred_kind(false), RefKind::Tag);
    }

    #[test]
    fn parse_bool_accepts_common_spellings() {
        assert!(parse_bool("ignore-preview-releases", "TRUE").unwrap());
        assert!(!parse_bool("ignore-preview-releases", "no").unwrap());
        assert!(parse_bool("ignore-preview-releases", "maybe").is_err());
    }
}
