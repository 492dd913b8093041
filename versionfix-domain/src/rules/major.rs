use super::alias::{
    MissingAlias, TrackedAlias, alias_exists, alias_matches, missing_aliases, missing_issue,
    tracked_aliases, tracking_issue,
};
use crate::engine::{Rule, RuleMeta};
use crate::version::PatchScope;
use versionfix_types::config::ValidatorConfig;
use versionfix_types::issue::{IssueType, Severity, ValidationIssue};
use versionfix_types::refs::VersionSpec;
use versionfix_types::state::RepositoryState;

fn major_scope(spec: &VersionSpec) -> Option<PatchScope> {
    match *spec {
        VersionSpec::Major { major } => Some(PatchScope::Major(major)),
        _ => None,
    }
}

/// `vN` is absent although `vN.M.P` versions exist.
pub struct MajorMissingRule;

impl Rule for MajorMissingRule {
    type Item = MissingAlias;

    fn meta(&self) -> RuleMeta {
        RuleMeta {
            id: "major_missing",
            issue_type: IssueType::MissingMajorVersion,
            priority: 30,
            title: "Major version alias is missing",
            description: "Every major line with at least one exact version needs a vN alias.",
        }
    }

    fn condition(
        &self,
        state: &RepositoryState,
        config: &ValidatorConfig,
    ) -> anyhow::Result<Vec<Self::Item>> {
        Ok(missing_aliases(state, config, |spec| {
            spec.triple()
                .map(|(major, _, _)| (VersionSpec::major(major), PatchScope::Major(major)))
        }))
    }

    fn check(
        &self,
        item: &Self::Item,
        state: &RepositoryState,
        _config: &ValidatorConfig,
    ) -> anyhow::Result<bool> {
        Ok(alias_exists(state, &item.spec))
    }

    fn create_issue(
        &self,
        item: &Self::Item,
        state: &RepositoryState,
        config: &ValidatorConfig,
    ) -> anyhow::Result<ValidationIssue> {
        Ok(missing_issue(
            IssueType::MissingMajorVersion,
            Severity::Error,
            state,
            config,
            item,
        ))
    }
}

/// `vN` exists but does not point at the highest `vN.M.P`.
pub struct MajorTracksHighestRule;

impl Rule for MajorTracksHighestRule {
    type Item = TrackedAlias;

    fn meta(&self) -> RuleMeta {
        RuleMeta {
            id: "major_tracks_highest",
            issue_type: IssueType::IncorrectVersion,
            priority: 40,
            title: "Major version alias is behind",
            description: "vN must point at the same commit as the highest vN.M.P.",
        }
    }

    fn condition(
        &self,
        state: &RepositoryState,
        config: &ValidatorConfig,
    ) -> anyhow::Result<Vec<Self::Item>> {
        Ok(tracked_aliases(state, config, major_scope))
    }

    fn check(
        &self,
        item: &Self::Item,
        state: &RepositoryState,
        config: &ValidatorConfig,
    ) -> anyhow::Result<bool> {
        Ok(alias_matches(state, config, item))
    }

    fn create_issue(
        &self,
        item: &Self::Item,
        _state: &RepositoryState,
        config: &ValidatorConfig,
    ) -> anyhow::Result<ValidationIssue> {
        Ok(tracking_issue(
            IssueType::IncorrectVersion,
            Severity::Error,
            config,
            item,
        ))
    }
}
