use super::{ignore_set, tag_conversion_dependency};
use crate::engine::{Rule, RuleMeta};
use anyhow::Context;
use std::collections::HashSet;
use versionfix_types::action::RemediationAction;
use versionfix_types::config::{CheckLevel, ValidatorConfig};
use versionfix_types::issue::{IssueType, Severity, ValidationIssue};
use versionfix_types::refs::VersionRef;
use versionfix_types::release::ReleaseInfo;
use versionfix_types::state::RepositoryState;

fn severity_for(level: CheckLevel, option: &str) -> anyhow::Result<Severity> {
    level
        .severity()
        .with_context(|| format!("{option} is disabled"))
}

/// Releases whose tag parses as a version, is not ignored and matches `keep`.
/// The first release per tag wins.
fn releases_matching<'a>(
    state: &'a RepositoryState,
    config: &ValidatorConfig,
    keep: impl Fn(&ReleaseInfo) -> bool,
) -> Vec<&'a ReleaseInfo> {
    let ignore = ignore_set(config);
    let mut seen = HashSet::new();
    state
        .releases
        .iter()
        .filter(|r| {
            r.spec()
                .is_some_and(|spec| !ignore.is_ref_ignored(&r.tag_name, &spec))
        })
        .filter(|r| keep(r))
        .filter(|r| seen.insert(r.tag_name.clone()))
        .collect()
}

/// An exact version with no release at all. Drafts count as present.
pub struct ReleaseMissingRule;

impl Rule for ReleaseMissingRule {
    type Item = VersionRef;

    fn meta(&self) -> RuleMeta {
        RuleMeta {
            id: "release_missing",
            issue_type: IssueType::MissingRelease,
            priority: 80,
            title: "Exact version has no release",
            description: "Every vN.M.P needs a release so it can be made immutable.",
        }
    }

    fn condition(
        &self,
        state: &RepositoryState,
        config: &ValidatorConfig,
    ) -> anyhow::Result<Vec<Self::Item>> {
        if !config.check_releases.is_enabled() {
            return Ok(vec![]);
        }
        let mut seen = HashSet::new();
        Ok(state
            .all_refs()
            .filter(|r| r.is_patch() && !r.is_ignored)
            .filter(|r| seen.insert(r.spec))
            .filter(|r| state.find_release_for(&r.spec).is_none())
            .cloned()
            .collect())
    }

    fn check(
        &self,
        item: &Self::Item,
        state: &RepositoryState,
        _config: &ValidatorConfig,
    ) -> anyhow::Result<bool> {
        Ok(state.find_release_for(&item.spec).is_some())
    }

    fn create_issue(
        &self,
        item: &Self::Item,
        state: &RepositoryState,
        config: &ValidatorConfig,
    ) -> anyhow::Result<ValidationIssue> {
        let severity = severity_for(config.check_releases, "check-releases")?;
        // Immutable releases are drafted first, then published once complete.
        let publish = config.check_release_immutability.is_enabled();
        let issue = ValidationIssue::new(
            IssueType::MissingRelease,
            severity,
            item.version.clone(),
            format!("{} has no release", item.version),
        )
        .with_current_sha(item.sha.clone())
        .with_action(RemediationAction::CreateRelease {
            tag: item.version.clone(),
            draft: publish,
            publish,
        });

        Ok(match tag_conversion_dependency(state, item) {
            Some(dep) => issue.depends_on(dep),
            None => issue,
        })
    }
}

/// A draft release on an exact version.
pub struct ReleaseDraftRule;

impl Rule for ReleaseDraftRule {
    type Item = ReleaseInfo;

    fn meta(&self) -> RuleMeta {
        RuleMeta {
            id: "release_draft",
            issue_type: IssueType::DraftRelease,
            priority: 90,
            title: "Release is still a draft",
            description: "Draft releases are invisible to consumers and are never immutable.",
        }
    }

    fn condition(
        &self,
        state: &RepositoryState,
        config: &ValidatorConfig,
    ) -> anyhow::Result<Vec<Self::Item>> {
        if !config.draft_release_level().is_enabled() {
            return Ok(vec![]);
        }
        Ok(releases_matching(state, config, |r| {
            r.draft && r.spec().is_some_and(|s| s.is_patch())
        })
        .into_iter()
        .cloned()
        .collect())
    }

    fn check(
        &self,
        _item: &Self::Item,
        _state: &RepositoryState,
        _config: &ValidatorConfig,
    ) -> anyhow::Result<bool> {
        Ok(false)
    }

    fn create_issue(
        &self,
        item: &Self::Item,
        _state: &RepositoryState,
        config: &ValidatorConfig,
    ) -> anyhow::Result<ValidationIssue> {
        let severity = severity_for(
            config.draft_release_level(),
            "check-releases and check-release-immutability",
        )?;
        Ok(ValidationIssue::new(
            IssueType::DraftRelease,
            severity,
            item.tag_name.clone(),
            format!("release {} for {} is a draft", item.id, item.tag_name),
        )
        .with_action(RemediationAction::PublishRelease {
            tag: item.tag_name.clone(),
            release_id: item.id,
        }))
    }
}

/// A published release on an exact version that is not immutable.
pub struct ReleaseMutableRule;

impl Rule for ReleaseMutableRule {
    type Item = ReleaseInfo;

    fn meta(&self) -> RuleMeta {
        RuleMeta {
            id: "release_mutable",
            issue_type: IssueType::NonImmutableRelease,
            priority: 100,
            title: "Release is not immutable",
            description: "Published releases must be immutable so the tag and assets cannot be swapped.",
        }
    }

    fn condition(
        &self,
        state: &RepositoryState,
        config: &ValidatorConfig,
    ) -> anyhow::Result<Vec<Self::Item>> {
        if !config.check_release_immutability.is_enabled() {
            return Ok(vec![]);
        }
        Ok(releases_matching(state, config, |r| {
            r.is_published() && r.spec().is_some_and(|s| s.is_patch())
        })
        .into_iter()
        .cloned()
        .collect())
    }

    fn check(
        &self,
        item: &Self::Item,
        _state: &RepositoryState,
        _config: &ValidatorConfig,
    ) -> anyhow::Result<bool> {
        Ok(item.immutable)
    }

    fn create_issue(
        &self,
        item: &Self::Item,
        _state: &RepositoryState,
        config: &ValidatorConfig,
    ) -> anyhow::Result<ValidationIssue> {
        let severity = severity_for(
            config.check_release_immutability,
            "check-release-immutability",
        )?;
        Ok(ValidationIssue::new(
            IssueType::NonImmutableRelease,
            severity,
            item.tag_name.clone(),
            format!("release {} for {} is not immutable", item.id, item.tag_name),
        )
        .with_action(RemediationAction::RepublishRelease {
            tag: item.tag_name.clone(),
            release_id: item.id,
        }))
    }
}

/// A release attached to a floating version.
pub struct FloatingReleaseRule;

impl Rule for FloatingReleaseRule {
    type Item = ReleaseInfo;

    fn meta(&self) -> RuleMeta {
        RuleMeta {
            id: "floating_release",
            issue_type: IssueType::FloatingVersionRelease,
            priority: 110,
            title: "Release on a floating version",
            description: "Floating aliases move, so a release on vN, vN.M or latest pins an alias that must stay mutable.",
        }
    }

    fn condition(
        &self,
        state: &RepositoryState,
        config: &ValidatorConfig,
    ) -> anyhow::Result<Vec<Self::Item>> {
        if !config.check_releases.is_enabled() {
            return Ok(vec![]);
        }
        Ok(releases_matching(state, config, |r| {
            r.spec().is_some_and(|s| s.is_floating())
        })
        .into_iter()
        .cloned()
        .collect())
    }

    fn check(
        &self,
        _item: &Self::Item,
        _state: &RepositoryState,
        _config: &ValidatorConfig,
    ) -> anyhow::Result<bool> {
        Ok(false)
    }

    fn create_issue(
        &self,
        item: &Self::Item,
        _state: &RepositoryState,
        config: &ValidatorConfig,
    ) -> anyhow::Result<ValidationIssue> {
        let severity = severity_for(config.check_releases, "check-releases")?;
        Ok(ValidationIssue::new(
            IssueType::FloatingVersionRelease,
            severity,
            item.tag_name.clone(),
            format!(
                "{} is a floating version but has release {}",
                item.tag_name, item.id
            ),
        )
        .with_action(RemediationAction::DeleteRelease {
            tag: item.tag_name.clone(),
            release_id: item.id,
        }))
    }
}
