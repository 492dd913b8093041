use super::alias::{
    MissingAlias, TrackedAlias, alias_exists, alias_matches, missing_aliases, missing_issue,
    tracked_aliases, tracking_issue,
};
use crate::engine::{Rule, RuleMeta};
use crate::version::PatchScope;
use anyhow::Context;
use versionfix_types::config::ValidatorConfig;
use versionfix_types::issue::{IssueType, ValidationIssue};
use versionfix_types::refs::VersionSpec;
use versionfix_types::state::RepositoryState;

fn minor_scope(spec: &VersionSpec) -> Option<PatchScope> {
    match *spec {
        VersionSpec::Minor { major, minor } => Some(PatchScope::Minor(major, minor)),
        _ => None,
    }
}

/// `vN.M` is absent although `vN.M.P` versions exist. Gated by `check-minor-version`.
pub struct MinorMissingRule;

impl Rule for MinorMissingRule {
    type Item = MissingAlias;

    fn meta(&self) -> RuleMeta {
        RuleMeta {
            id: "minor_missing",
            issue_type: IssueType::MissingMinorVersion,
            priority: 50,
            title: "Minor version alias is missing",
            description: "Every minor line with at least one exact version needs a vN.M alias.",
        }
    }

    fn condition(
        &self,
        state: &RepositoryState,
        config: &ValidatorConfig,
    ) -> anyhow::Result<Vec<Self::Item>> {
        if !config.check_minor_version.is_enabled() {
            return Ok(vec![]);
        }
        Ok(missing_aliases(state, config, |spec| {
            spec.triple().map(|(major, minor, _)| {
                (
                    VersionSpec::minor(major, minor),
                    PatchScope::Minor(major, minor),
                )
            })
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
        let severity = config
            .check_minor_version
            .severity()
            .context("minor version check is disabled")?;
        Ok(missing_issue(
            IssueType::MissingMinorVersion,
            severity,
            state,
            config,
            item,
        ))
    }
}

/// `vN.M` exists but does not point at the highest `vN.M.P`. Gated by `check-minor-version`.
pub struct MinorTracksHighestRule;

impl Rule for MinorTracksHighestRule {
    type Item = TrackedAlias;

    fn meta(&self) -> RuleMeta {
        RuleMeta {
            id: "minor_tracks_highest",
            issue_type: IssueType::IncorrectMinorVersion,
            priority: 60,
            title: "Minor version alias is behind",
            description: "vN.M must point at the same commit as the highest vN.M.P.",
        }
    }

    fn condition(
        &self,
        state: &RepositoryState,
        config: &ValidatorConfig,
    ) -> anyhow::Result<Vec<Self::Item>> {
        if !config.check_minor_version.is_enabled() {
            return Ok(vec![]);
        }
        Ok(tracked_aliases(state, config, minor_scope))
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
        let severity = config
            .check_minor_version
            .severity()
            .context("minor version check is disabled")?;
        Ok(tracking_issue(
            IssueType::IncorrectMinorVersion,
            severity,
            config,
            item,
        ))
    }
}
