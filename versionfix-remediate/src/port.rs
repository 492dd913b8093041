use crate::error::RepoError;
use versionfix_types::refs::RefKind;

/// Write access to the hosted repository's refs and releases.
///
/// Implementations classify their own failures: transient transport problems as retryable
/// [`RepoError`]s, targets that can never change as [`RepoError::Conflict`].
pub trait RepositoryPort {
    fn create_ref(&mut self, kind: RefKind, name: &str, sha: &str) -> Result<(), RepoError>;

    fn update_ref(
        &mut self,
        kind: RefKind,
        name: &str,
        sha: &str,
        force: bool,
    ) -> Result<(), RepoError>;

    fn delete_ref(&mut self, kind: RefKind, name: &str) -> Result<(), RepoError>;

    /// Returns the new release id.
    fn create_release(&mut self, tag: &str, draft: bool) -> Result<u64, RepoError>;

    fn publish_release(&mut self, release_id: u64) -> Result<(), RepoError>;

    /// Unpublish then publish again so the platform applies its immutability setting.
    fn republish_release(&mut self, release_id: u64) -> Result<(), RepoError>;

    fn delete_release(&mut self, release_id: u64) -> Result<(), RepoError>;
}
