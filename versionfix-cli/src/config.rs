//! Configuration file loading for versionfix.
//!
//! Discovers and loads `versionfix.toml` from the working directory.
//! Merges config file settings with CLI arguments (CLI takes precedence).

use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use fs_err as fs;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;
use versionfix_core::RetryPolicy;
use versionfix_types::config::{
    CheckLevel, ConfigError, FloatingVersionsUse, ValidatorConfig, parse_bool,
};

/// The config file name to search for.
pub const CONFIG_FILE_NAME: &str = "versionfix.toml";

/// Top-level configuration from versionfix.toml.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct VersionfixConfig {
    /// Snapshot file to validate.
    pub snapshot: Option<Utf8PathBuf>,

    /// Output directory for report.json and summary.md.
    pub out_dir: Option<Utf8PathBuf>,

    /// Validator options, kept as raw strings until merged.
    pub checks: ChecksConfig,

    /// Retry budget for auto-fix.
    pub retry: RetryConfig,
}

/// `[checks]` section. Values are validated when merged so errors name the option.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct ChecksConfig {
    pub check_minor_version: Option<String>,
    pub check_releases: Option<String>,
    pub check_release_immutability: Option<String>,
    pub floating_versions_use: Option<String>,

    /// Accepts a TOML boolean or a string such as `"true"`.
    pub ignore_preview_releases: Option<toml::Value>,

    pub ignore_versions: Vec<String>,
}

/// `[retry]` section.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct RetryConfig {
    pub max_retries: Option<u32>,
    pub initial_delay_ms: Option<u64>,
}

/// Discover the versionfix.toml config file in `dir`.
pub fn discover_config(dir: &Utf8Path) -> Option<Utf8PathBuf> {
    let config_path = dir.join(CONFIG_FILE_NAME);
    if config_path.exists() {
        debug!("found config file at {}", config_path);
        Some(config_path)
    } else {
        debug!("no config file found at {}", config_path);
        None
    }
}

/// Load and parse a versionfix.toml config file.
pub fn load_config(path: &Utf8Path) -> anyhow::Result<VersionfixConfig> {
    let contents =
        fs::read_to_string(path).with_context(|| format!("read config file {}", path))?;
    parse_config(&contents).with_context(|| format!("parse config file {}", path))
}

/// Parse a config file from a string.
pub fn parse_config(contents: &str) -> anyhow::Result<VersionfixConfig> {
    let config: VersionfixConfig = toml::from_str(contents).context("invalid TOML")?;
    Ok(config)
}

/// Load config from `dir`, or return default if not found.
pub fn load_or_default(dir: &Utf8Path) -> anyhow::Result<VersionfixConfig> {
    match discover_config(dir) {
        Some(path) => load_config(&path),
        None => Ok(VersionfixConfig::default()),
    }
}

/// Option values supplied on the command line or through `VERSIONFIX_*` variables.
#[derive(Debug, Clone, Default)]
pub struct CheckOverrides {
    pub check_minor_version: Option<String>,
    pub check_releases: Option<String>,
    pub check_release_immutability: Option<String>,
    pub floating_versions_use: Option<String>,
    pub ignore_preview_releases: Option<String>,
    pub ignore_versions: Vec<String>,
    pub max_retries: Option<u32>,
    pub retry_delay_ms: Option<u64>,
}

/// Merged configuration combining config file and CLI arguments.
#[derive(Debug, Clone)]
pub struct MergedConfig {
    pub validator: ValidatorConfig,
    pub retry: RetryPolicy,
    pub snapshot: Option<Utf8PathBuf>,
    pub out_dir: Option<Utf8PathBuf>,
}

/// Builder for merging config file with CLI arguments.
pub struct ConfigMerger {
    config: VersionfixConfig,
}

impl ConfigMerger {
    pub fn new(config: VersionfixConfig) -> Self {
        Self { config }
    }

    /// Merge with check command arguments.
    ///
    /// Scalar options from the CLI replace file values; CLI `ignore_versions` extend the file
    /// list. Any unknown enum value is a [`ConfigError`].
    pub fn merge_check_args(self, cli: &CheckOverrides) -> Result<MergedConfig, ConfigError> {
        let checks = self.config.checks;
        let defaults = ValidatorConfig::default();

        let level = |option: &'static str,
                     cli_value: &Option<String>,
                     file_value: Option<String>,
                     default: CheckLevel|
         -> Result<CheckLevel, ConfigError> {
            match cli_value.clone().or(file_value) {
                Some(v) => CheckLevel::parse(option, &v),
                None => Ok(default),
            }
        };

        let check_minor_version = level(
            "check-minor-version",
            &cli.check_minor_version,
            checks.check_minor_version,
            defaults.check_minor_version,
        )?;
        let check_releases = level(
            "check-releases",
            &cli.check_releases,
            checks.check_releases,
            defaults.check_releases,
        )?;
        let check_release_immutability = level(
            "check-release-immutability",
            &cli.check_release_immutability,
            checks.check_release_immutability,
            defaults.check_release_immutability,
        )?;

        let floating_versions_use = match cli
            .floating_versions_use
            .clone()
            .or(checks.floating_versions_use)
        {
            Some(v) => FloatingVersionsUse::parse(&v)?,
            None => defaults.floating_versions_use,
        };

        let ignore_preview_releases = match (
            &cli.ignore_preview_releases,
            checks.ignore_preview_releases,
        ) {
            (Some(v), _) => parse_bool("ignore-preview-releases", v)?,
            (None, Some(toml::Value::Boolean(b))) => b,
            (None, Some(toml::Value::String(s))) => parse_bool("ignore-preview-releases", &s)?,
            (None, Some(other)) => {
                return Err(ConfigError::InvalidValue {
                    option: "ignore-preview-releases",
                    value: other.to_string(),
                    expected: "true, false",
                });
            }
            (None, None) => defaults.ignore_preview_releases,
        };

        let mut ignore_versions = checks.ignore_versions;
        for pattern in &cli.ignore_versions {
            let pattern = pattern.trim();
            if !pattern.is_empty() && !ignore_versions.iter().any(|p| p == pattern) {
                ignore_versions.push(pattern.to_string());
            }
        }

        let file_retry = self.config.retry;
        let default_retry = RetryPolicy::default();
        let retry = RetryPolicy {
            max_retries: cli
                .max_retries
                .or(file_retry.max_retries)
                .unwrap_or(default_retry.max_retries),
            initial_delay: cli
                .retry_delay_ms
                .or(file_retry.initial_delay_ms)
                .map(Duration::from_millis)
                .unwrap_or(default_retry.initial_delay),
        };

        Ok(MergedConfig {
            validator: ValidatorConfig {
                check_minor_version,
                check_releases,
                check_release_immutability,
                floating_versions_use,
                ignore_preview_releases,
                ignore_versions,
            },
            retry,
            snapshot: self.config.snapshot,
            out_dir: self.config.out_dir,
        })
    }
}
