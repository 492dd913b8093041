//! Version resolution helpers.

use versionfix_types::refs::{RefKind, VersionRef, VersionSpec};
use versionfix_types::state::RepositoryState;

/// Which exact versions a floating alias tracks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatchScope {
    /// `vN` tracks the highest `vN.*.*`.
    Major(u64),
    /// `vN.M` tracks the highest `vN.M.*`.
    Minor(u64, u64),
    /// `latest` tracks the highest exact version overall.
    Global,
}

impl PatchScope {
    fn contains(self, spec: &VersionSpec) -> bool {
        match (self, spec.triple()) {
            (_, None) => false,
            (PatchScope::Major(n), Some((major, _, _))) => major == n,
            (PatchScope::Minor(n, m), Some((major, minor, _))) => major == n && minor == m,
            (PatchScope::Global, Some(_)) => true,
        }
    }

    /// `latest` must never track a prerelease, so only major and minor fall back.
    fn falls_back_to_prereleases(self) -> bool {
        !matches!(self, PatchScope::Global)
    }
}

/// Highest exact-version ref in `scope`.
///
/// Ignored refs are excluded first. With `ignore-preview-releases`, refs whose release is a
/// prerelease are excluded too; if that leaves nothing, major and minor scopes fall back to the
/// unfiltered set. Returns `None` when there is nothing to track.
pub fn highest_patch_for(state: &RepositoryState, scope: PatchScope) -> Option<&VersionRef> {
    let is_prerelease = |r: &VersionRef| {
        state
            .find_release_for(&r.spec)
            .is_some_and(|release| release.prerelease)
    };
    highest_patch_in(
        state.all_refs(),
        scope,
        state.config.ignore_preview_releases,
        is_prerelease,
    )
}

/// [`highest_patch_for`] over an arbitrary ref set.
pub fn highest_patch_in<'a>(
    refs: impl IntoIterator<Item = &'a VersionRef>,
    scope: PatchScope,
    ignore_prereleases: bool,
    is_prerelease: impl Fn(&VersionRef) -> bool,
) -> Option<&'a VersionRef> {
    let candidates: Vec<&VersionRef> = refs
        .into_iter()
        .filter(|r| !r.is_ignored && scope.contains(&r.spec))
        .collect();

    if !ignore_prereleases {
        return max_version(candidates.iter().copied());
    }

    let stable = max_version(candidates.iter().copied().filter(|r| !is_prerelease(r)));
    if stable.is_some() || !scope.falls_back_to_prereleases() {
        return stable;
    }
    max_version(candidates.iter().copied())
}

// Numeric comparison only. When a version exists as both kinds, the tag wins.
fn max_version<'a>(refs: impl Iterator<Item = &'a VersionRef>) -> Option<&'a VersionRef> {
    refs.max_by_key(|r| (r.spec.triple(), r.kind == RefKind::Tag))
}

/// The ref a floating or exact version resolves to: the preferred kind if present,
/// otherwise the other kind.
pub fn effective_ref<'a>(
    state: &'a RepositoryState,
    spec: &VersionSpec,
    preferred: RefKind,
) -> Option<&'a VersionRef> {
    state
        .find_ref(preferred, spec)
        .or_else(|| state.find_ref(preferred.other(), spec))
}
