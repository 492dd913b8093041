//! Rule engine behaviour on small hand-built repositories.

use pretty_assertions::assert_eq;
use versionfix_domain::{RuleEngine, StateBuilder};
use versionfix_types::action::RemediationAction;
use versionfix_types::config::{CheckLevel, FloatingVersionsUse, ValidatorConfig};
use versionfix_types::issue::{IssueType, Severity, ValidationIssue};
use versionfix_types::refs::RefKind;
use versionfix_types::release::ReleaseInfo;
use versionfix_types::state::RepositoryState;

fn no_release_checks() -> ValidatorConfig {
    ValidatorConfig {
        check_releases: CheckLevel::None,
        check_release_immutability: CheckLevel::None,
        ..Default::default()
    }
}

fn release(tag: &str, id: u64) -> ReleaseInfo {
    ReleaseInfo {
        tag_name: tag.into(),
        id,
        draft: false,
        prerelease: false,
        immutable: true,
        url: None,
        target_sha: None,
    }
}

fn evaluate(state: &RepositoryState) -> Vec<ValidationIssue> {
    RuleEngine::new().evaluate(state).expect("evaluate")
}

fn ids(issues: &[ValidationIssue]) -> Vec<&str> {
    issues.iter().map(|i| i.id.as_str()).collect()
}

#[test]
fn single_exact_version_needs_major_and_minor_aliases() {
    let state = StateBuilder::new(ValidatorConfig {
        floating_versions_use: FloatingVersionsUse::Tags,
        check_minor_version: CheckLevel::Error,
        ..no_release_checks()
    })
    .tag("v1.0.0", "S")
    .build()
    .state;

    let issues = evaluate(&state);
    assert_eq!(
        ids(&issues),
        ["missing_major_version:v1", "missing_minor_version:v1.0"]
    );
    for issue in &issues {
        assert_eq!(issue.expected_sha.as_deref(), Some("S"));
        assert_eq!(issue.severity, Severity::Error);
        assert!(matches!(
            issue.remediation_action,
            Some(RemediationAction::CreateRef {
                kind: RefKind::Tag,
                ref sha,
                ..
            }) if sha == "S"
        ));
    }
}

#[test]
fn stale_major_alias_gets_forced_update() {
    let state = StateBuilder::new(ValidatorConfig {
        check_minor_version: CheckLevel::None,
        ..no_release_checks()
    })
    .tag("v1", "shaA")
    .tag("v1.0.0", "shaB")
    .build()
    .state;

    let issues = evaluate(&state);
    assert_eq!(issues.len(), 1);
    let issue = &issues[0];
    assert_eq!(issue.issue_type, IssueType::IncorrectVersion);
    assert_eq!(issue.version, "v1");
    assert_eq!(issue.current_sha.as_deref(), Some("shaA"));
    assert_eq!(issue.expected_sha.as_deref(), Some("shaB"));
    assert_eq!(
        issue.remediation_action,
        Some(RemediationAction::UpdateRef {
            kind: RefKind::Tag,
            name: "v1".into(),
            sha: "shaB".into(),
            force: true,
        })
    );
}

#[test]
fn draft_release_is_published() {
    let mut draft = release("v1.0.0", 11);
    draft.draft = true;
    draft.immutable = false;

    let state = StateBuilder::new(ValidatorConfig {
        check_releases: CheckLevel::None,
        check_release_immutability: CheckLevel::Error,
        ..Default::default()
    })
    .tag("v1.0.0", "S")
    .tag("v1.0", "S")
    .tag("v1", "S")
    .release(draft)
    .build()
    .state;

    let issues = evaluate(&state);
    assert_eq!(ids(&issues), ["draft_release:v1.0.0"]);
    assert_eq!(
        issues[0].remediation_action,
        Some(RemediationAction::PublishRelease {
            tag: "v1.0.0".into(),
            release_id: 11,
        })
    );
}

#[test]
fn minor_checks_follow_configured_severity() {
    let state = StateBuilder::new(ValidatorConfig {
        check_minor_version: CheckLevel::Warning,
        ..no_release_checks()
    })
    .tag("v3.2.1", "S")
    .tag("v3", "S")
    .build()
    .state;

    let issues = evaluate(&state);
    assert_eq!(ids(&issues), ["missing_minor_version:v3.2"]);
    assert_eq!(issues[0].severity, Severity::Warning);
}

#[test]
fn missing_latest_is_not_reported() {
    let state = StateBuilder::new(no_release_checks())
        .tag("v1.0.0", "S")
        .tag("v1.0", "S")
        .tag("v1", "S")
        .build()
        .state;
    assert!(evaluate(&state).is_empty());
}

#[test]
fn latest_skips_prereleases() {
    let mut preview = release("v2.0.0", 2);
    preview.prerelease = true;

    let state = StateBuilder::new(ValidatorConfig {
        check_minor_version: CheckLevel::None,
        ..no_release_checks()
    })
    .tag("v1.0.0", "one")
    .tag("v2.0.0", "two")
    .tag("v1", "one")
    .tag("v2", "two")
    .tag("latest", "one")
    .release(release("v1.0.0", 1))
    .release(preview)
    .build()
    .state;

    // v2 falls back to its prerelease; latest does not.
    assert!(evaluate(&state).is_empty());
}

#[test]
fn branch_only_alias_update_depends_on_conversion() {
    let state = StateBuilder::new(ValidatorConfig {
        check_minor_version: CheckLevel::None,
        ..no_release_checks()
    })
    .tag("v1.1.0", "new")
    .branch("v1", "old")
    .build()
    .state;

    let issues = evaluate(&state);
    assert_eq!(ids(&issues), ["wrong_ref_type:v1", "incorrect_version:v1"]);
    assert_eq!(issues[0].severity, Severity::Warning);
    assert_eq!(issues[1].dependencies, ["wrong_ref_type:v1".to_string()]);
}

#[test]
fn ambiguous_version_deletes_non_preferred_kind() {
    let state = StateBuilder::new(ValidatorConfig {
        floating_versions_use: FloatingVersionsUse::Branches,
        check_minor_version: CheckLevel::None,
        ..no_release_checks()
    })
    .tag("v1.0.0", "S")
    .tag("v1", "S")
    .branch("v1", "S")
    .build()
    .state;

    let issues = evaluate(&state);
    assert_eq!(ids(&issues), ["ambiguous_version:v1"]);
    assert_eq!(
        issues[0].remediation_action,
        Some(RemediationAction::DeleteRef {
            kind: RefKind::Tag,
            name: "v1".into(),
        })
    );
}

#[test]
fn ignored_versions_never_appear() {
    let state = StateBuilder::new(ValidatorConfig {
        ignore_versions: vec!["v9*".into()],
        ..Default::default()
    })
    .tag("v9.0.0", "S")
    .branch("v9", "X")
    .build()
    .state;

    assert!(evaluate(&state).is_empty());
}

#[test]
fn missing_and_mistargeted_rules_never_overlap() {
    let state = StateBuilder::new(ValidatorConfig {
        check_release_immutability: CheckLevel::Error,
        ..Default::default()
    })
    .tag("v1.0.0", "a")
    .tag("v1.0.1", "b")
    .tag("v1.1.0", "c")
    .tag("v1", "a")
    .branch("v1.0", "a")
    .tag("v2.0.0", "d")
    .tag("latest", "a")
    .release(release("v1.0.0", 1))
    .build()
    .state;

    let issues = evaluate(&state);
    let mut keys: Vec<(IssueType, String)> = issues
        .iter()
        .map(|i| (i.issue_type, i.version.clone()))
        .collect();
    let total = keys.len();
    keys.sort();
    keys.dedup();
    assert_eq!(keys.len(), total, "duplicate (type, version) pairs");

    for (missing, mistargeted) in [
        (IssueType::MissingMajorVersion, IssueType::IncorrectVersion),
        (
            IssueType::MissingMinorVersion,
            IssueType::IncorrectMinorVersion,
        ),
    ] {
        for issue in issues.iter().filter(|i| i.issue_type == missing) {
            assert!(
                !issues
                    .iter()
                    .any(|i| i.issue_type == mistargeted && i.version == issue.version),
                "{} reported as both missing and mistargeted",
                issue.version
            );
        }
    }
}

#[test]
fn evaluation_is_idempotent_and_read_only() {
    let state = StateBuilder::new(ValidatorConfig::default())
        .tag("v1.0.0", "a")
        .tag("v1.2.0", "b")
        .branch("v1", "a")
        .tag("v1.2", "a")
        .build()
        .state;
    let before = serde_json::to_value(&state).unwrap();

    let engine = RuleEngine::new();
    let first = engine.evaluate(&state).unwrap();
    let second = engine.evaluate(&state).unwrap();

    assert_eq!(first, second);
    assert_eq!(serde_json::to_value(&state).unwrap(), before);
    assert!(state.issues().is_empty());
}

fn mutable_release(tag: &str, id: u64) -> ReleaseInfo {
    ReleaseInfo {
        immutable: false,
        ..release(tag, id)
    }
}

fn with_mutable_release(config: ValidatorConfig) -> RepositoryState {
    StateBuilder::new(config)
        .tag("v1.0.0", "a")
        .tag("v1.0", "a")
        .tag("v1", "a")
        .release(mutable_release("v1.0.0", 7))
        .build()
        .state
}

#[test]
fn published_mutable_release_is_republished() {
    let issues = evaluate(&with_mutable_release(ValidatorConfig::default()));
    assert_eq!(ids(&issues), ["non_immutable_release:v1.0.0"]);
    assert_eq!(issues[0].severity, Severity::Error);
    assert_eq!(
        issues[0].remediation_action,
        Some(RemediationAction::RepublishRelease {
            tag: "v1.0.0".into(),
            release_id: 7,
        })
    );
}

#[test]
fn mutable_release_follows_immutability_level() {
    let disabled = evaluate(&with_mutable_release(ValidatorConfig {
        check_release_immutability: CheckLevel::None,
        ..Default::default()
    }));
    assert!(disabled.is_empty());

    let warning = evaluate(&with_mutable_release(ValidatorConfig {
        check_release_immutability: CheckLevel::Warning,
        ..Default::default()
    }));
    assert_eq!(ids(&warning), ["non_immutable_release:v1.0.0"]);
    assert_eq!(warning[0].severity, Severity::Warning);
}

#[test]
fn stale_minor_alias_gets_forced_update() {
    let state = StateBuilder::new(no_release_checks())
        .tag("v1.0.0", "a")
        .tag("v1.0.1", "b")
        .tag("v1.0", "a")
        .tag("v1", "b")
        .build()
        .state;

    let issues = evaluate(&state);
    assert_eq!(ids(&issues), ["incorrect_minor_version:v1.0"]);
    assert_eq!(issues[0].issue_type, IssueType::IncorrectMinorVersion);
    assert_eq!(issues[0].current_sha.as_deref(), Some("a"));
    assert_eq!(issues[0].expected_sha.as_deref(), Some("b"));
    assert_eq!(
        issues[0].remediation_action,
        Some(RemediationAction::UpdateRef {
            kind: RefKind::Tag,
            name: "v1.0".into(),
            sha: "b".into(),
            force: true,
        })
    );
}

#[test]
fn ignored_patch_with_uppercase_prefix_is_not_tracked() {
    let build = |ignore: Vec<String>| {
        StateBuilder::new(ValidatorConfig {
            check_minor_version: CheckLevel::None,
            ignore_versions: ignore,
            ..no_release_checks()
        })
        .tag("v1.0.0", "a")
        .tag("V1.1.0", "b")
        .tag("v1", "a")
        .build()
        .state
    };

    assert!(evaluate(&build(vec!["v1.1.*".into()])).is_empty());

    let issues = evaluate(&build(vec![]));
    assert_eq!(ids(&issues), ["incorrect_version:v1"]);
    assert_eq!(issues[0].expected_sha.as_deref(), Some("b"));
}
