//! Commit construction
//!
//! The commit builder turns the staged snapshot into history: it builds
//! the tree object from the index, resolves the current branch head for
//! parent linkage, writes the commit object, advances the ref, and clears
//! the index, in that order.
//!
//! Everything up to the ref advance only creates new, self-contained
//! immutable objects; a failure there leaves at worst orphaned objects in
//! the database and the operation safely retryable. The ref advance is
//! the single externally visible step, and the index is cleared only
//! after it.

use crate::areas::database::Database;
use crate::areas::index::Index;
use crate::areas::refs::Refs;
use crate::artifacts::objects::commit::{Author, Commit};
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::tree::Tree;
use crate::errors::{Error, Result};
use derive_new::new;

/// Builds the tree and commit objects for one commit transaction.
#[derive(new)]
pub struct CommitBuilder<'repo> {
    database: &'repo Database,
    refs: &'repo Refs,
    index: &'repo mut Index,
}

impl CommitBuilder<'_> {
    /// Serialize the staged snapshot as a tree object; returns its id.
    ///
    /// The referenced blobs were written at staging time, so the tree
    /// never points at an object missing from the database.
    pub fn build_tree(&self) -> Result<ObjectId> {
        let tree = Tree::build(self.index.entries())?;

        self.database.store(tree)
    }

    /// Record the staged snapshot as a new commit on the current branch.
    pub fn commit(&mut self, message: &str, author: Author) -> Result<ObjectId> {
        self.index.rehydrate()?;

        if self.index.is_empty() {
            // nothing staged: no object or ref is touched
            return Err(Error::EmptyCommit);
        }

        let tree_oid = self.build_tree()?;

        let branch = self.refs.current_branch()?;
        let parents = match self.refs.read_ref(&branch)? {
            Some(head) => vec![head],
            // unborn branch: the first commit has no parent
            None => Vec::new(),
        };

        let commit = Commit::new(parents, tree_oid, author, message.trim().to_string());
        let commit_oid = self.database.store(commit)?;

        // the single step that makes the commit visible
        self.refs.update_ref(&branch, &commit_oid)?;

        // cleared only once the commit is durably recorded
        self.index.clear()?;

        Ok(commit_oid)
    }
}
