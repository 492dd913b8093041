//! Default port implementations: filesystem snapshots and an in-memory repository.

use crate::ports::{RepositoryPort, StateSource, WritePort};
use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use fs_err as fs;
use tracing::debug;
use versionfix_remediate::RepoError;
use versionfix_snapshot::Snapshot;
use versionfix_types::refs::RefKind;

/// Loads a snapshot file via `versionfix_snapshot::load_snapshot`.
#[derive(Debug, Clone)]
pub struct FsSnapshotSource {
    pub path: Utf8PathBuf,
}

impl FsSnapshotSource {
    pub fn new(path: Utf8PathBuf) -> Self {
        Self { path }
    }
}

impl StateSource for FsSnapshotSource {
    fn load_snapshot(&self) -> anyhow::Result<Snapshot> {
        versionfix_snapshot::load_snapshot(&self.path)
            .with_context(|| format!("load snapshot from {}", self.path))
    }
}

/// In-memory snapshot source for embedding and testing.
#[derive(Debug, Clone, Default)]
pub struct InMemorySnapshotSource {
    snapshot: Snapshot,
}

impl InMemorySnapshotSource {
    pub fn new(snapshot: Snapshot) -> Self {
        Self { snapshot }
    }
}

impl StateSource for InMemorySnapshotSource {
    fn load_snapshot(&self) -> anyhow::Result<Snapshot> {
        Ok(self.snapshot.clone())
    }
}

/// A repository simulated over a [`Snapshot`].
///
/// Mirrors the hosting platform's rules closely enough for offline auto-fix: tags owned by an
/// immutable release cannot move or be deleted, immutable releases cannot be changed, and
/// releases can only be created for existing tags.
#[derive(Debug, Clone)]
pub struct SnapshotRepository {
    snapshot: Snapshot,
}

impl SnapshotRepository {
    pub fn new(snapshot: Snapshot) -> Self {
        Self { snapshot }
    }

    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    pub fn into_snapshot(self) -> Snapshot {
        self.snapshot
    }

    fn ensure_tag_mutable(&self, kind: RefKind, name: &str) -> Result<(), RepoError> {
        if kind == RefKind::Tag
            && self
                .snapshot
                .release(name)
                .is_some_and(|r| r.immutable && !r.draft)
        {
            return Err(RepoError::Conflict {
                message: format!("tag {name} belongs to an immutable release"),
            });
        }
        Ok(())
    }

    fn not_found(what: String) -> RepoError {
        RepoError::Http {
            status: 404,
            message: format!("{what} not found"),
        }
    }

    fn release_mut(
        &mut self,
        release_id: u64,
    ) -> Result<&mut versionfix_snapshot::SnapshotRelease, RepoError> {
        self.snapshot
            .release_by_id_mut(release_id)
            .ok_or_else(|| Self::not_found(format!("release {release_id}")))
    }

    /// Publishing locks the release, as with repository-wide release immutability.
    fn publish(&mut self, release_id: u64) -> Result<(), RepoError> {
        let release = self.release_mut(release_id)?;
        release.draft = false;
        release.immutable = true;
        Ok(())
    }
}

impl RepositoryPort for SnapshotRepository {
    fn create_ref(&mut self, kind: RefKind, name: &str, sha: &str) -> Result<(), RepoError> {
        if self.snapshot.ref_sha(kind, name).is_some() {
            return Err(RepoError::Validation {
                message: format!("{kind} {name} already exists"),
            });
        }
        self.snapshot.upsert_ref(kind, name, sha);
        debug!(%kind, name, sha, "created ref");
        Ok(())
    }

    fn update_ref(
        &mut self,
        kind: RefKind,
        name: &str,
        sha: &str,
        _force: bool,
    ) -> Result<(), RepoError> {
        if self.snapshot.ref_sha(kind, name).is_none() {
            return Err(Self::not_found(format!("{kind} {name}")));
        }
        self.ensure_tag_mutable(kind, name)?;
        self.snapshot.upsert_ref(kind, name, sha);
        debug!(%kind, name, sha, "updated ref");
        Ok(())
    }

    fn delete_ref(&mut self, kind: RefKind, name: &str) -> Result<(), RepoError> {
        self.ensure_tag_mutable(kind, name)?;
        if !self.snapshot.remove_ref(kind, name) {
            return Err(Self::not_found(format!("{kind} {name}")));
        }
        debug!(%kind, name, "deleted ref");
        Ok(())
    }

    fn create_release(&mut self, tag: &str, draft: bool) -> Result<u64, RepoError> {
        if self.snapshot.ref_sha(RefKind::Tag, tag).is_none() {
            return Err(RepoError::Validation {
                message: format!("tag {tag} does not exist"),
            });
        }
        if self.snapshot.release(tag).is_some() {
            return Err(RepoError::Validation {
                message: format!("release for {tag} already exists"),
            });
        }
        let id = self.snapshot.add_release(tag, draft);
        if !draft {
            self.publish(id)?;
        }
        debug!(tag, id, draft, "created release");
        Ok(id)
    }

    fn publish_release(&mut self, release_id: u64) -> Result<(), RepoError> {
        let release = self.release_mut(release_id)?;
        if release.immutable && !release.draft {
            return Err(RepoError::Conflict {
                message: format!("release {release_id} is immutable"),
            });
        }
        self.publish(release_id)
    }

    fn republish_release(&mut self, release_id: u64) -> Result<(), RepoError> {
        let release = self.release_mut(release_id)?;
        if release.immutable {
            return Err(RepoError::Conflict {
                message: format!("release {release_id} is already immutable"),
            });
        }
        release.draft = true;
        self.publish(release_id)
    }

    fn delete_release(&mut self, release_id: u64) -> Result<(), RepoError> {
        let release = self.release_mut(release_id)?;
        if release.immutable && !release.draft {
            return Err(RepoError::Conflict {
                message: format!("release {release_id} is immutable"),
            });
        }
        self.snapshot.remove_release(release_id);
        debug!(release_id, "deleted release");
        Ok(())
    }
}

/// Filesystem write operations.
#[derive(Debug, Clone, Default)]
pub struct FsWritePort;

impl WritePort for FsWritePort {
    fn write_file(&self, path: &Utf8Path, contents: &[u8]) -> anyhow::Result<()> {
        if let Some(parent) = path.parent()
            && !parent.as_str().is_empty()
        {
            fs::create_dir_all(parent)
                .with_context(|| format!("create parent dir for {}", path))?;
        }
        fs::write(path, contents).with_context(|| format!("write {}", path))
    }

    fn create_dir_all(&self, path: &Utf8Path) -> anyhow::Result<()> {
        fs::create_dir_all(path).with_context(|| format!("create_dir_all {}", path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;
    use versionfix_snapshot::{SnapshotRef, SnapshotRelease};

    fn snapshot() -> Snapshot {
        Snapshot {
            tags: vec![
                SnapshotRef {
                    name: "v1.0.0".into(),
                    sha: "aaa".into(),
                },
                SnapshotRef {
                    name: "v1.1.0".into(),
                    sha: "bbb".into(),
                },
            ],
            releases: vec![SnapshotRelease {
                tag_name: "v1.0.0".into(),
                id: 4,
                draft: false,
                prerelease: false,
                immutable: true,
                url: None,
                target_commitish: Some("aaa".into()),
            }],
            ..Default::default()
        }
    }

    #[test]
    fn immutable_release_protects_its_tag() {
        let mut repo = SnapshotRepository::new(snapshot());
        let err = repo
            .update_ref(RefKind::Tag, "v1.0.0", "ccc", true)
            .unwrap_err();
        assert!(err.is_conflict());
        assert!(repo.delete_ref(RefKind::Tag, "v1.0.0").unwrap_err().is_conflict());
        assert_eq!(repo.snapshot().ref_sha(RefKind::Tag, "v1.0.0"), Some("aaa"));
    }

    #[test]
    fn create_ref_rejects_existing() {
        let mut repo = SnapshotRepository::new(snapshot());
        let err = repo.create_ref(RefKind::Tag, "v1.1.0", "ccc").unwrap_err();
        assert!(matches!(err, RepoError::Validation { .. }));
        repo.create_ref(RefKind::Branch, "v1", "bbb").unwrap();
        assert_eq!(repo.snapshot().ref_sha(RefKind::Branch, "v1"), Some("bbb"));
    }

    #[test]
    fn release_lifecycle() {
        let mut repo = SnapshotRepository::new(snapshot());
        let id = repo.create_release("v1.1.0", true).unwrap();
        assert_eq!(id, 5);
        assert!(repo.snapshot().release("v1.1.0").unwrap().draft);

        repo.publish_release(id).unwrap();
        let release = repo.snapshot().release("v1.1.0").unwrap();
        assert!(!release.draft);
        assert!(release.immutable);

        assert!(repo.delete_release(id).unwrap_err().is_conflict());
    }

    #[test]
    fn release_requires_existing_tag() {
        let mut repo = SnapshotRepository::new(snapshot());
        assert!(matches!(
            repo.create_release("v9.0.0", true),
            Err(RepoError::Validation { .. })
        ));
    }

    #[test]
    fn republish_applies_immutability() {
        let mut snap = snapshot();
        snap.releases[0].immutable = false;
        let mut repo = SnapshotRepository::new(snap);
        repo.republish_release(4).unwrap();
        assert!(repo.snapshot().release("v1.0.0").unwrap().immutable);
        assert!(repo.republish_release(4).unwrap_err().is_conflict());
    }

    #[test]
    fn unknown_release_is_not_found() {
        let mut repo = SnapshotRepository::new(snapshot());
        let err = repo.publish_release(99).unwrap_err();
        assert_eq!(
            err,
            RepoError::Http {
                status: 404,
                message: "release 99 not found".into()
            }
        );
    }

    #[test]
    fn fs_write_port_writes_and_creates_dirs() {
        let temp = TempDir::new().expect("temp dir");
        let root = Utf8PathBuf::from_path_buf(temp.path().to_path_buf()).expect("utf8");
        let target = root.join("nested").join("file.txt");

        let port = FsWritePort;
        port.write_file(&target, b"hello").expect("write");

        let contents = std::fs::read_to_string(&target).expect("read");
        assert_eq!(contents, "hello");

        let extra_dir = root.join("extra");
        port.create_dir_all(&extra_dir).expect("mkdir");
        assert!(extra_dir.exists());
    }

    #[test]
    fn fs_snapshot_source_reports_missing_file() {
        let source = FsSnapshotSource::new(Utf8PathBuf::from("does/not/exist.json"));
        let err = source.load_snapshot().unwrap_err();
        assert!(format!("{err:#}").contains("load snapshot from does/not/exist.json"));
    }
}
