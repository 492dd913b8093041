//! Issue explanations for the `versionfix explain` command.
//!
//! Each entry covers what the issue means, which option controls it, how auto-fix resolves it,
//! and what to do by hand when auto-fix cannot.

use versionfix_types::issue::IssueType;

/// Information about one issue type.
#[derive(Debug, Clone)]
pub struct IssueExplanation {
    pub issue_type: IssueType,
    /// Human-readable title.
    pub title: &'static str,
    /// Option that enables the check, if any.
    pub controlled_by: Option<&'static str>,
    pub description: &'static str,
    /// What auto-fix does.
    pub remediation: &'static str,
    /// Manual steps, with the command shape versionfix prints.
    pub manual: &'static str,
}

/// Registry of all issue explanations, in rule priority order.
pub static ISSUE_REGISTRY: &[IssueExplanation] = &[
    IssueExplanation {
        issue_type: IssueType::AmbiguousVersion,
        title: "Version exists as both tag and branch",
        controlled_by: None,
        description: r#"The same version name exists as a tag and as a branch.

Consumers referencing `uses: owner/action@v1` get whichever ref the platform resolves
first, which is not guaranteed to be the one you maintain."#,
        remediation: r#"Deletes the ref of the kind that should not be used: the branch for exact
versions, and for floating versions whichever kind `floating-versions-use` does not
select. Deletes are never retried."#,
        manual: r#"Delete the ref you do not want to keep:

    git push origin :refs/heads/v1"#,
    },
    IssueExplanation {
        issue_type: IssueType::WrongRefType,
        title: "Version uses the wrong ref kind",
        controlled_by: Some("floating-versions-use"),
        description: r#"Exact versions (vN.M.P) must be tags. Floating versions (vN, vN.M, latest)
must use the kind chosen by `floating-versions-use` (tags by default)."#,
        remediation: r#"Converts the ref: creates the expected kind at the same commit, then deletes
the old one. If the create succeeds but the delete fails, the issue is reported as
partially applied."#,
        manual: r#"    git push origin <sha>:refs/tags/v1.0.0
    git push origin :refs/heads/v1.0.0"#,
    },
    IssueExplanation {
        issue_type: IssueType::MissingMajorVersion,
        title: "Major version alias is missing",
        controlled_by: None,
        description: r#"An exact version vN.M.P exists but there is no vN alias, so consumers cannot
pin to the major version."#,
        remediation: "Creates vN at the highest patch of that major.",
        manual: "    git push origin <sha>:refs/tags/v1",
    },
    IssueExplanation {
        issue_type: IssueType::IncorrectVersion,
        title: "Major version alias is behind",
        controlled_by: None,
        description: r#"vN does not point at the commit of the highest vN.M.P. Prerelease versions
are skipped when `ignore-preview-releases` is true."#,
        remediation: "Force-moves vN to the highest patch.",
        manual: "    git push origin <sha>:refs/tags/v1 --force",
    },
    IssueExplanation {
        issue_type: IssueType::MissingMinorVersion,
        title: "Minor version alias is missing",
        controlled_by: Some("check-minor-version"),
        description: r#"An exact version vN.M.P exists but there is no vN.M alias."#,
        remediation: "Creates vN.M at the highest patch of that minor.",
        manual: "    git push origin <sha>:refs/tags/v1.0",
    },
    IssueExplanation {
        issue_type: IssueType::IncorrectMinorVersion,
        title: "Minor version alias is behind",
        controlled_by: Some("check-minor-version"),
        description: r#"vN.M does not point at the commit of the highest vN.M.P."#,
        remediation: "Force-moves vN.M to the highest patch.",
        manual: "    git push origin <sha>:refs/tags/v1.0 --force",
    },
    IssueExplanation {
        issue_type: IssueType::IncorrectLatest,
        title: "latest is behind",
        controlled_by: None,
        description: r#"A `latest` ref exists but does not point at the highest exact version across
all majors. Prereleases are never considered for `latest`."#,
        remediation: "Force-moves latest to the highest version.",
        manual: "    git push origin <sha>:refs/tags/latest --force",
    },
    IssueExplanation {
        issue_type: IssueType::MissingRelease,
        title: "Exact version has no release",
        controlled_by: Some("check-releases"),
        description: r#"Every vN.M.P tag should have a release. Without one the version cannot be
made immutable and does not show up in the marketplace."#,
        remediation: r#"Creates a release for the tag. When `check-release-immutability` is enabled
the release is created as a draft and then published, so the platform locks it."#,
        manual: r#"    gh release create v1.0.0 --draft --verify-tag --title v1.0.0 --notes ""
    gh release edit v1.0.0 --draft=false"#,
    },
    IssueExplanation {
        issue_type: IssueType::DraftRelease,
        title: "Release is still a draft",
        controlled_by: Some("check-releases, check-release-immutability"),
        description: r#"A draft release exists for an exact version. Drafts are invisible to
consumers and are never immutable."#,
        remediation: "Publishes the draft.",
        manual: "    gh release edit v1.0.0 --draft=false",
    },
    IssueExplanation {
        issue_type: IssueType::NonImmutableRelease,
        title: "Release is not immutable",
        controlled_by: Some("check-release-immutability"),
        description: r#"A published release for an exact version is not immutable, so its tag and
assets can still be replaced."#,
        remediation: r#"Republishes the release (draft, then publish) so the repository's
immutability setting is applied."#,
        manual: r#"    gh release edit v1.0.0 --draft=true
    gh release edit v1.0.0 --draft=false"#,
    },
    IssueExplanation {
        issue_type: IssueType::FloatingVersionRelease,
        title: "Release on a floating version",
        controlled_by: Some("check-releases"),
        description: r#"A release is attached to vN, vN.M or latest. Floating versions must keep
moving, and a release (especially an immutable one) pins them."#,
        remediation: r#"Deletes the release. Deletes are never retried. An immutable release cannot
be deleted and is reported as unfixable."#,
        manual: "    gh release delete v1 --yes",
    },
];

/// Look up an explanation by issue type name (`draft-release` or `draft_release`).
pub fn lookup_issue(query: &str) -> Option<&'static IssueExplanation> {
    let issue_type: IssueType = query.parse().ok()?;
    ISSUE_REGISTRY.iter().find(|e| e.issue_type == issue_type)
}

/// List all issue type keys.
pub fn list_issue_keys() -> Vec<&'static str> {
    ISSUE_REGISTRY.iter().map(|e| e.issue_type.as_str()).collect()
}
