use crate::config::ValidatorConfig;
use crate::issue::ValidationIssue;
use crate::refs::{RefKind, VersionRef, VersionSpec};
use crate::release::ReleaseInfo;
use serde::{Deserialize, Serialize};

/// Aggregate root for one run.
///
/// Refs, releases and config are fixed once built. Issues only grow through
/// [`append_issues`](RepositoryState::append_issues).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RepositoryState {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repository: Option<String>,
    pub tags: Vec<VersionRef>,
    pub branches: Vec<VersionRef>,
    pub releases: Vec<ReleaseInfo>,
    pub config: ValidatorConfig,

    #[serde(default)]
    issues: Vec<ValidationIssue>,
}

impl RepositoryState {
    pub fn new(
        repository: Option<String>,
        tags: Vec<VersionRef>,
        branches: Vec<VersionRef>,
        releases: Vec<ReleaseInfo>,
        config: ValidatorConfig,
    ) -> Self {
        Self {
            repository,
            tags,
            branches,
            releases,
            config,
            issues: Vec::new(),
        }
    }

    pub fn refs(&self, kind: RefKind) -> &[VersionRef] {
        match kind {
            RefKind::Tag => &self.tags,
            RefKind::Branch => &self.branches,
        }
    }

    /// Tags first, then branches.
    pub fn all_refs(&self) -> impl Iterator<Item = &VersionRef> {
        self.tags.iter().chain(self.branches.iter())
    }

    /// Ref of `kind` whose parsed version equals `spec`.
    pub fn find_ref(&self, kind: RefKind, spec: &VersionSpec) -> Option<&VersionRef> {
        self.refs(kind).iter().find(|r| &r.spec == spec)
    }

    pub fn find_release(&self, tag: &str) -> Option<&ReleaseInfo> {
        self.releases.iter().find(|r| r.tag_name == tag)
    }

    /// Release whose tag parses to `spec`, so `V1.0.0` and `v1.0.0` resolve alike.
    pub fn find_release_for(&self, spec: &VersionSpec) -> Option<&ReleaseInfo> {
        self.releases
            .iter()
            .find(|r| r.spec().as_ref() == Some(spec))
    }

    pub fn issues(&self) -> &[ValidationIssue] {
        &self.issues
    }

    pub fn append_issues(&mut self, issues: impl IntoIterator<Item = ValidationIssue>) {
        self.issues.extend(issues);
    }

    pub fn into_issues(self) -> Vec<ValidationIssue> {
        self.issues
    }
}
