//! Built-in rules.
//!
//! "Missing" and "mistargeted" rules for the same alias have disjoint conditions: a missing rule
//! only considers versions with no ref of either kind, a tracking rule only considers versions
//! whose effective ref exists.

use crate::engine::{ErasedRule, RuleEngine, RuleMeta};
use crate::ignore::IgnoreSet;
use versionfix_types::config::ValidatorConfig;
use versionfix_types::issue::{IssueType, ValidationIssue};
use versionfix_types::refs::{RefKind, VersionRef, VersionSpec};
use versionfix_types::state::RepositoryState;

mod alias;
mod latest;
mod major;
mod minor;
mod ref_kind;
mod releases;

pub fn builtin_rules() -> Vec<Box<dyn ErasedRule>> {
    vec![
        Box::new(ref_kind::AmbiguousRefRule),
        Box::new(ref_kind::WrongRefKindRule),
        Box::new(major::MajorMissingRule),
        Box::new(major::MajorTracksHighestRule),
        Box::new(minor::MinorMissingRule),
        Box::new(minor::MinorTracksHighestRule),
        Box::new(latest::LatestTracksHighestRule),
        Box::new(releases::ReleaseMissingRule),
        Box::new(releases::ReleaseDraftRule),
        Box::new(releases::ReleaseMutableRule),
        Box::new(releases::FloatingReleaseRule),
    ]
}

/// Metadata for every built-in rule, in evaluation order.
pub fn builtin_rule_metas() -> Vec<RuleMeta> {
    RuleEngine::new().metas()
}

/// True if any ref of either kind names `spec`, ignored or not.
fn version_exists(state: &RepositoryState, spec: &VersionSpec) -> bool {
    state.all_refs().any(|r| &r.spec == spec)
}

/// An exact version that only exists as a branch is converted to a tag first. Issues that need
/// that tag depend on the conversion.
fn tag_conversion_dependency(state: &RepositoryState, target: &VersionRef) -> Option<String> {
    if !target.is_patch() || state.find_ref(RefKind::Tag, &target.spec).is_some() {
        return None;
    }
    Some(ValidationIssue::make_id(
        IssueType::WrongRefType,
        &target.version,
    ))
}

/// A floating alias that only exists as the non-preferred kind is converted first.
fn alias_conversion_dependency(r: &VersionRef, preferred: RefKind) -> Option<String> {
    (r.kind != preferred).then(|| ValidationIssue::make_id(IssueType::WrongRefType, &r.version))
}

fn ignore_set(config: &ValidatorConfig) -> IgnoreSet {
    IgnoreSet::new(&config.ignore_versions)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn rule_ids_and_issue_types_are_unique() {
        let metas = builtin_rule_metas();
        let ids: HashSet<_> = metas.iter().map(|m| m.id).collect();
        let types: HashSet<_> = metas.iter().map(|m| m.issue_type).collect();
        assert_eq!(ids.len(), metas.len());
        assert_eq!(types.len(), metas.len());
        assert_eq!(types.len(), IssueType::ALL.len());
    }

    #[test]
    fn metas_are_sorted_by_priority() {
        let metas = builtin_rule_metas();
        assert!(metas.windows(2).all(|w| w[0].priority < w[1].priority));
        assert_eq!(metas[0].id, "ambiguous_ref");
    }
}
