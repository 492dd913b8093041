use crate::refs::VersionSpec;
use serde::{Deserialize, Serialize};

/// A release published (or drafted) for a tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReleaseInfo {
    pub tag_name: String,
    pub id: u64,

    #[serde(default)]
    pub draft: bool,

    #[serde(default)]
    pub prerelease: bool,

    /// True when the platform guarantees the release (and its tag) can no longer change.
    #[serde(default)]
    pub immutable: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_sha: Option<String>,
}

impl ReleaseInfo {
    pub fn spec(&self) -> Option<VersionSpec> {
        VersionSpec::parse(&self.tag_name)
    }

    /// Published and not a draft.
    pub fn is_published(&self) -> bool {
        !self.draft
    }
}
