use crate::ignore::IgnoreSet;
use std::collections::HashSet;
use tracing::{debug, warn};
use versionfix_types::config::ValidatorConfig;
use versionfix_types::refs::{RefKind, VersionRef, VersionSpec};
use versionfix_types::release::ReleaseInfo;
use versionfix_types::state::RepositoryState;

/// Builds a [`RepositoryState`] from collected refs and releases.
///
/// Non-version ref names are dropped. Duplicate `(kind, version)` refs keep the first one seen.
#[derive(Debug, Default)]
pub struct StateBuilder {
    repository: Option<String>,
    tags: Vec<(String, String)>,
    branches: Vec<(String, String)>,
    releases: Vec<ReleaseInfo>,
    config: ValidatorConfig,
}

/// A built state plus the ignore entries that could not be used as patterns.
#[derive(Debug, Clone)]
pub struct BuiltState {
    pub state: RepositoryState,
    pub rejected_ignore_patterns: Vec<String>,
}

impl StateBuilder {
    pub fn new(config: ValidatorConfig) -> Self {
        Self {
            config,
            ..Default::default()
        }
    }

    pub fn repository(mut self, repository: Option<String>) -> Self {
        self.repository = repository;
        self
    }

    pub fn tag(mut self, name: impl Into<String>, sha: impl Into<String>) -> Self {
        self.tags.push((name.into(), sha.into()));
        self
    }

    pub fn branch(mut self, name: impl Into<String>, sha: impl Into<String>) -> Self {
        self.branches.push((name.into(), sha.into()));
        self
    }

    pub fn release(mut self, release: ReleaseInfo) -> Self {
        self.releases.push(release);
        self
    }

    pub fn releases(mut self, releases: impl IntoIterator<Item = ReleaseInfo>) -> Self {
        self.releases.extend(releases);
        self
    }

    pub fn build(self) -> BuiltState {
        let ignore = IgnoreSet::new(&self.config.ignore_versions);
        for pattern in ignore.rejected() {
            warn!(pattern = %pattern, "ignore-versions entry is not a valid glob; matching it literally");
        }

        let tags = collect_refs(self.tags, RefKind::Tag, &ignore);
        let branches = collect_refs(self.branches, RefKind::Branch, &ignore);
        debug!(
            tags = tags.len(),
            branches = branches.len(),
            releases = self.releases.len(),
            "repository state built"
        );

        BuiltState {
            rejected_ignore_patterns: ignore.rejected().to_vec(),
            state: RepositoryState::new(
                self.repository,
                tags,
                branches,
                self.releases,
                self.config,
            ),
        }
    }
}

fn collect_refs(raw: Vec<(String, String)>, kind: RefKind, ignore: &IgnoreSet) -> Vec<VersionRef> {
    let mut seen: HashSet<VersionSpec> = HashSet::new();
    let mut out = Vec::new();
    for (name, sha) in raw {
        let Some(mut r) = VersionRef::new(&name, sha, kind) else {
            debug!(kind = %kind, name = %name, "skipping non-version ref");
            continue;
        };
        if !seen.insert(r.spec) {
            warn!(kind = %kind, name = %name, "duplicate version ref; keeping the first");
            continue;
        }
        r.is_ignored = ignore.is_ref_ignored(&r.version, &r.spec);
        out.push(r);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drops_non_version_refs() {
        let built = StateBuilder::new(ValidatorConfig::default())
            .tag("v1.0.0", "a")
            .tag("nightly", "b")
            .branch("main", "c")
            .branch("v1", "a")
            .build();
        assert_eq!(built.state.tags.len(), 1);
        assert_eq!(built.state.branches.len(), 1);
    }

    #[test]
    fn keeps_first_of_duplicate_versions() {
        let built = StateBuilder::new(ValidatorConfig::default())
            .tag("v1.0.0", "first")
            .tag("V1.0.0", "second")
            .build();
        assert_eq!(built.state.tags.len(), 1);
        assert_eq!(built.state.tags[0].sha, "first");
    }

    #[test]
    fn marks_ignored_refs_and_reports_rejected_patterns() {
        let config = ValidatorConfig {
            ignore_versions: vec!["v0.*".into(), "v9.[".into()],
            ..Default::default()
        };
        let built = StateBuilder::new(config)
            .tag("v0.1.0", "a")
            .tag("v1.0.0", "b")
            .build();
        assert!(built.state.tags[0].is_ignored);
        assert!(!built.state.tags[1].is_ignored);
        assert_eq!(built.rejected_ignore_patterns, vec!["v9.[".to_string()]);
    }

    #[test]
    fn ignore_patterns_match_uppercase_ref_names() {
        let config = ValidatorConfig {
            ignore_versions: vec!["v1.1.*".into()],
            ..Default::default()
        };
        let built = StateBuilder::new(config)
            .tag("V1.1.0", "a")
            .tag("v1.0.0", "b")
            .build();
        assert!(built.state.tags[0].is_ignored);
        assert!(!built.state.tags[1].is_ignored);
    }
}
