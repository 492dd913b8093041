use crate::engine::{Rule, RuleMeta};
use versionfix_types::action::RemediationAction;
use versionfix_types::config::ValidatorConfig;
use versionfix_types::issue::{IssueType, Severity, ValidationIssue};
use versionfix_types::refs::{RefKind, VersionRef};
use versionfix_types::state::RepositoryState;

/// A version that exists as both a tag and a branch.
pub struct AmbiguousRefRule;

impl Rule for AmbiguousRefRule {
    /// (tag, branch)
    type Item = (VersionRef, VersionRef);

    fn meta(&self) -> RuleMeta {
        RuleMeta {
            id: "ambiguous_ref",
            issue_type: IssueType::AmbiguousVersion,
            priority: 10,
            title: "Version exists as both tag and branch",
            description: "A version name resolves to two refs, so consumers get whichever their tooling picks first.",
        }
    }

    fn condition(
        &self,
        state: &RepositoryState,
        _config: &ValidatorConfig,
    ) -> anyhow::Result<Vec<Self::Item>> {
        Ok(state
            .tags
            .iter()
            .filter(|t| !t.is_ignored)
            .filter_map(|t| {
                state
                    .find_ref(RefKind::Branch, &t.spec)
                    .filter(|b| !b.is_ignored)
                    .map(|b| (t.clone(), b.clone()))
            })
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
        (tag, branch): &Self::Item,
        _state: &RepositoryState,
        config: &ValidatorConfig,
    ) -> anyhow::Result<ValidationIssue> {
        let preferred = config.preferred_kind(tag.spec.is_floating());
        let doomed = match preferred {
            RefKind::Tag => branch,
            RefKind::Branch => tag,
        };
        let kept = match preferred {
            RefKind::Tag => tag,
            RefKind::Branch => branch,
        };

        Ok(ValidationIssue::new(
            IssueType::AmbiguousVersion,
            Severity::Error,
            tag.version.clone(),
            format!(
                "{} exists as both a tag ({}) and a branch ({}); the {} will be removed",
                tag.version, tag.sha, branch.sha, doomed.kind
            ),
        )
        .with_current_sha(doomed.sha.clone())
        .with_expected_sha(kept.sha.clone())
        .with_action(RemediationAction::DeleteRef {
            kind: doomed.kind,
            name: doomed.version.clone(),
        }))
    }
}

/// A version that only exists as the kind it should not use.
pub struct WrongRefKindRule;

impl Rule for WrongRefKindRule {
    type Item = VersionRef;

    fn meta(&self) -> RuleMeta {
        RuleMeta {
            id: "wrong_ref_kind",
            issue_type: IssueType::WrongRefType,
            priority: 20,
            title: "Version uses the wrong ref kind",
            description: "Exact versions must be tags. Floating versions must use the kind selected by floating-versions-use.",
        }
    }

    fn condition(
        &self,
        state: &RepositoryState,
        config: &ValidatorConfig,
    ) -> anyhow::Result<Vec<Self::Item>> {
        Ok(state
            .all_refs()
            .filter(|r| !r.is_ignored)
            .filter(|r| {
                let preferred = config.preferred_kind(r.spec.is_floating());
                r.kind != preferred && state.find_ref(preferred, &r.spec).is_none()
            })
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
        let floating = item.spec.is_floating();
        let to = config.preferred_kind(floating);
        let severity = if floating {
            Severity::Warning
        } else {
            Severity::Error
        };

        Ok(ValidationIssue::new(
            IssueType::WrongRefType,
            severity,
            item.version.clone(),
            format!("{} is a {} but should be a {}", item.version, item.kind, to),
        )
        .with_current_sha(item.sha.clone())
        .with_expected_sha(item.sha.clone())
        .with_action(RemediationAction::ConvertRefKind {
            name: item.version.clone(),
            sha: item.sha.clone(),
            from: item.kind,
            to,
        }))
    }
}
