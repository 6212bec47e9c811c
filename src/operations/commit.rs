use crate::areas::commit_builder::CommitBuilder;
use crate::areas::lock::RepositoryLock;
use crate::areas::repository::Repository;
use crate::artifacts::objects::commit::Author;
use crate::artifacts::objects::object_id::ObjectId;
use crate::errors::Result;

impl Repository {
    /// Record the staged snapshot as a new commit on the current branch.
    ///
    /// Fails with `EmptyCommit` when nothing is staged. On success the
    /// branch ref names the new commit and the staging index is gone;
    /// see [`CommitBuilder::commit`] for the transaction ordering.
    pub fn commit(&mut self, message: &str, author: Author) -> Result<ObjectId> {
        let marker_path = self.marker_path();
        let _lock = RepositoryLock::acquire(&marker_path)?;

        let (database, refs, _workspace, index) = self.services_mut();
        CommitBuilder::new(database, refs, index).commit(message, author)
    }
}
