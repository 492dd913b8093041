use super::alias::{TrackedAlias, alias_matches, tracked_aliases, tracking_issue};
use crate::engine::{Rule, RuleMeta};
use crate::version::PatchScope;
use versionfix_types::config::ValidatorConfig;
use versionfix_types::issue::{IssueType, Severity, ValidationIssue};
use versionfix_types::state::RepositoryState;

/// `latest` exists but does not point at the highest exact version.
///
/// A missing `latest` is not an issue.
pub struct LatestTracksHighestRule;

impl Rule for LatestTracksHighestRule {
    type Item = TrackedAlias;

    fn meta(&self) -> RuleMeta {
        RuleMeta {
            id: "latest_tracks_highest",
            issue_type: IssueType::IncorrectLatest,
            priority: 70,
            title: "latest is behind",
            description: "When present, latest must point at the highest non-prerelease exact version.",
        }
    }

    fn condition(
        &self,
        state: &RepositoryState,
        config: &ValidatorConfig,
    ) -> anyhow::Result<Vec<Self::Item>> {
        Ok(tracked_aliases(state, config, |spec| {
            spec.is_latest().then_some(PatchScope::Global)
        }))
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
            IssueType::IncorrectLatest,
            Severity::Error,
            config,
            item,
        ))
    }
}
