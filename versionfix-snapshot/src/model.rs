use serde::{Deserialize, Serialize};
use versionfix_types::refs::RefKind;
use versionfix_types::release::ReleaseInfo;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repository: Option<String>,

    #[serde(default)]
    pub tags: Vec<SnapshotRef>,

    #[serde(default)]
    pub branches: Vec<SnapshotRef>,

    #[serde(default)]
    pub releases: Vec<SnapshotRelease>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotRef {
    pub name: String,
    pub sha: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotRelease {
    pub tag_name: String,
    pub id: u64,

    #[serde(default)]
    pub draft: bool,

    #[serde(default)]
    pub prerelease: bool,

    #[serde(default)]
    pub immutable: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_commitish: Option<String>,
}

impl From<&SnapshotRelease> for ReleaseInfo {
    fn from(r: &SnapshotRelease) -> Self {
        ReleaseInfo {
            tag_name: r.tag_name.clone(),
            id: r.id,
            draft: r.draft,
            prerelease: r.prerelease,
            immutable: r.immutable,
            url: r.url.clone(),
            target_sha: r.target_commitish.clone(),
        }
    }
}

impl Snapshot {
    pub fn refs(&self, kind: RefKind) -> &[SnapshotRef] {
        match kind {
            RefKind::Tag => &self.tags,
            RefKind::Branch => &self.branches,
        }
    }

    fn refs_mut(&mut self, kind: RefKind) -> &mut Vec<SnapshotRef> {
        match kind {
            RefKind::Tag => &mut self.tags,
            RefKind::Branch => &mut self.branches,
        }
    }

    pub fn ref_sha(&self, kind: RefKind, name: &str) -> Option<&str> {
        self.refs(kind)
            .iter()
            .find(|r| r.name == name)
            .map(|r| r.sha.as_str())
    }

    /// Point `name` at `sha`, creating the ref if needed. Returns true when the ref was created.
    pub fn upsert_ref(&mut self, kind: RefKind, name: &str, sha: &str) -> bool {
        let refs = self.refs_mut(kind);
        match refs.iter_mut().find(|r| r.name == name) {
            Some(existing) => {
                existing.sha = sha.to_string();
                false
            }
            None => {
                refs.push(SnapshotRef {
                    name: name.to_string(),
                    sha: sha.to_string(),
                });
                true
            }
        }
    }

    /// Returns true when a ref was removed.
    pub fn remove_ref(&mut self, kind: RefKind, name: &str) -> bool {
        let refs = self.refs_mut(kind);
        let before = refs.len();
        refs.retain(|r| r.name != name);
        refs.len() != before
    }

    pub fn release(&self, tag: &str) -> Option<&SnapshotRelease> {
        self.releases.iter().find(|r| r.tag_name == tag)
    }

    pub fn release_by_id_mut(&mut self, id: u64) -> Option<&mut SnapshotRelease> {
        self.releases.iter_mut().find(|r| r.id == id)
    }

    /// Add a release with the next free id.
    pub fn add_release(&mut self, tag: &str, draft: bool) -> u64 {
        let id = self.releases.iter().map(|r| r.id).max().unwrap_or(0) + 1;
        let target = self.ref_sha(RefKind::Tag, tag).map(str::to_string);
        self.releases.push(SnapshotRelease {
            tag_name: tag.to_string(),
            id,
            draft,
            prerelease: false,
            immutable: false,
            url: None,
            target_commitish: target,
        });
        id
    }

    pub fn remove_release(&mut self, id: u64) -> bool {
        let before = self.releases.len();
        self.releases.retain(|r| r.id != id);
        self.releases.len() != before
    }

    pub fn release_infos(&self) -> Vec<ReleaseInfo> {
        self.releases.iter().map(ReleaseInfo::from).collect()
    }
}
