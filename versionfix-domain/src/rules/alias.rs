//! Shared logic for floating aliases (`vN`, `vN.M`, `latest`).

use super::{alias_conversion_dependency, ignore_set, tag_conversion_dependency, version_exists};
use crate::version::{PatchScope, effective_ref, highest_patch_for};
use std::collections::BTreeMap;
use versionfix_types::action::RemediationAction;
use versionfix_types::config::ValidatorConfig;
use versionfix_types::issue::{IssueType, Severity, ValidationIssue};
use versionfix_types::refs::{VersionRef, VersionSpec};
use versionfix_types::state::RepositoryState;

/// An alias that does not exist but has something to track.
#[derive(Debug, Clone)]
pub struct MissingAlias {
    pub spec: VersionSpec,
    pub highest: VersionRef,
}

/// An existing alias and the ref it should point at.
#[derive(Debug, Clone)]
pub struct TrackedAlias {
    pub alias: VersionRef,
    pub highest: VersionRef,
}

/// Aliases implied by exact versions (via `alias_of`) that have no ref of either kind.
pub(super) fn missing_aliases(
    state: &RepositoryState,
    config: &ValidatorConfig,
    alias_of: impl Fn(&VersionSpec) -> Option<(VersionSpec, PatchScope)>,
) -> Vec<MissingAlias> {
    let ignore = ignore_set(config);
    let scopes: BTreeMap<String, (VersionSpec, PatchScope)> = state
        .all_refs()
        .filter(|r| r.is_patch() && !r.is_ignored)
        .filter_map(|r| alias_of(&r.spec))
        .map(|(spec, scope)| (sort_key(&spec), (spec, scope)))
        .collect();

    scopes
        .into_values()
        .filter(|(spec, _)| !version_exists(state, spec) && !ignore.is_ignored(&spec.to_string()))
        .filter_map(|(spec, scope)| {
            highest_patch_for(state, scope).map(|highest| MissingAlias {
                spec,
                highest: highest.clone(),
            })
        })
        .collect()
}

/// Existing, non-ignored aliases of the shape selected by `scope_of`.
pub(super) fn tracked_aliases(
    state: &RepositoryState,
    config: &ValidatorConfig,
    scope_of: impl Fn(&VersionSpec) -> Option<PatchScope>,
) -> Vec<TrackedAlias> {
    let preferred = config.floating_versions_use.ref_kind();
    let specs: BTreeMap<String, VersionSpec> = state
        .all_refs()
        .filter(|r| scope_of(&r.spec).is_some())
        .map(|r| (sort_key(&r.spec), r.spec))
        .collect();

    let mut out = Vec::new();
    for spec in specs.into_values() {
        let Some(alias) = effective_ref(state, &spec, preferred) else {
            continue;
        };
        if alias.is_ignored {
            continue;
        }
        let Some(scope) = scope_of(&spec) else {
            continue;
        };
        if let Some(highest) = highest_patch_for(state, scope) {
            out.push(TrackedAlias {
                alias: alias.clone(),
                highest: highest.clone(),
            });
        }
    }
    out
}

/// Current state of the alias for `check`: does it exist now, and does it match?
pub(super) fn alias_exists(state: &RepositoryState, spec: &VersionSpec) -> bool {
    version_exists(state, spec)
}

pub(super) fn alias_matches(
    state: &RepositoryState,
    config: &ValidatorConfig,
    item: &TrackedAlias,
) -> bool {
    effective_ref(state, &item.alias.spec, config.floating_versions_use.ref_kind())
        .is_some_and(|r| r.sha == item.highest.sha)
}

pub(super) fn missing_issue(
    issue_type: IssueType,
    severity: Severity,
    state: &RepositoryState,
    config: &ValidatorConfig,
    item: &MissingAlias,
) -> ValidationIssue {
    let name = item.spec.to_string();
    let issue = ValidationIssue::new(
        issue_type,
        severity,
        name.clone(),
        format!(
            "{} does not exist; it should point at {} ({})",
            name, item.highest.version, item.highest.sha
        ),
    )
    .with_expected_sha(item.highest.sha.clone())
    .with_action(RemediationAction::CreateRef {
        kind: config.floating_versions_use.ref_kind(),
        name,
        sha: item.highest.sha.clone(),
    });

    match tag_conversion_dependency(state, &item.highest) {
        Some(dep) => issue.depends_on(dep),
        None => issue,
    }
}

pub(super) fn tracking_issue(
    issue_type: IssueType,
    severity: Severity,
    config: &ValidatorConfig,
    item: &TrackedAlias,
) -> ValidationIssue {
    let preferred = config.floating_versions_use.ref_kind();
    let issue = ValidationIssue::new(
        issue_type,
        severity,
        item.alias.version.clone(),
        format!(
            "{} points at {} but the highest version {} is at {}",
            item.alias.version, item.alias.sha, item.highest.version, item.highest.sha
        ),
    )
    .with_current_sha(item.alias.sha.clone())
    .with_expected_sha(item.highest.sha.clone())
    .with_action(RemediationAction::UpdateRef {
        kind: preferred,
        name: item.alias.version.clone(),
        sha: item.highest.sha.clone(),
        force: true,
    });

    match alias_conversion_dependency(&item.alias, preferred) {
        Some(dep) => issue.depends_on(dep),
        None => issue,
    }
}

// Numeric order for candidates: v2 before v10.
fn sort_key(spec: &VersionSpec) -> String {
    match *spec {
        VersionSpec::Major { major } => format!("{major:020}"),
        VersionSpec::Minor { major, minor } => format!("{major:020}.{minor:020}"),
        VersionSpec::Patch {
            major,
            minor,
            patch,
        } => format!("{major:020}.{minor:020}.{patch:020}"),
        VersionSpec::Latest => "latest".to_string(),
    }
}
