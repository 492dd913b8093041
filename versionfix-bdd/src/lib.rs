//! BDD harness (cucumber-rs).
//!
//! This crate keeps acceptance scenarios apart from the production crates. Scenarios drive
//! `versionfix-core` in process against an in-memory snapshot.

use versionfix_types::config::{
    CheckLevel, ConfigError, FloatingVersionsUse, ValidatorConfig, parse_bool,
};

/// Apply one `name = value` option the way the CLI does.
pub fn apply_option(
    config: &mut ValidatorConfig,
    name: &str,
    value: &str,
) -> Result<(), ConfigError> {
    match name {
        "check-minor-version" => {
            config.check_minor_version = CheckLevel::parse("check-minor-version", value)?
        }
        "check-releases" => config.check_releases = CheckLevel::parse("check-releases", value)?,
        "check-release-immutability" => {
            config.check_release_immutability =
                CheckLevel::parse("check-release-immutability", value)?
        }
        "floating-versions-use" => {
            config.floating_versions_use = FloatingVersionsUse::parse(value)?
        }
        "ignore-preview-releases" => {
            config.ignore_preview_releases = parse_bool("ignore-preview-releases", value)?
        }
        "ignore-versions" => config.ignore_versions.extend(
            value
                .split(',')
                .map(str::trim)
                .filter(|p| !p.is_empty())
                .map(str::to_string),
        ),
        other => {
            return Err(ConfigError::InvalidValue {
                option: "option",
                value: other.to_string(),
                expected: "a known option name",
            });
        }
    }
    Ok(())
}
