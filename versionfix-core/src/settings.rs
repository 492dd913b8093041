//! Clap-free settings for the check pipeline.

use camino::Utf8PathBuf;
use versionfix_remediate::RetryPolicy;
use versionfix_types::config::ValidatorConfig;
use versionfix_types::summary::RunMode;

/// Settings for [`run_check`](crate::pipeline::run_check).
#[derive(Debug, Clone)]
pub struct CheckSettings {
    pub snapshot: Utf8PathBuf,
    pub out_dir: Utf8PathBuf,

    pub config: ValidatorConfig,
    pub mode: RunMode,
    pub retry: RetryPolicy,

    /// Where auto-fix writes the mutated snapshot. `None` means in place.
    pub write_snapshot: Option<Utf8PathBuf>,
}

impl Default for CheckSettings {
    fn default() -> Self {
        Self {
            snapshot: Utf8PathBuf::from("versionfix.snapshot.json"),
            out_dir: Utf8PathBuf::from("artifacts/versionfix"),
            config: ValidatorConfig::default(),
            mode: RunMode::default(),
            retry: RetryPolicy::default(),
            write_snapshot: None,
        }
    }
}

impl CheckSettings {
    pub fn snapshot_output(&self) -> &Utf8PathBuf {
        self.write_snapshot.as_ref().unwrap_or(&self.snapshot)
    }
}
