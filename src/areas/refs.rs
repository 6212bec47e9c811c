//! References (branch heads and the symbolic HEAD)
//!
//! A ref is a named pointer from a branch to its latest commit, stored as
//! a plain text file under `refs/heads/<branch>` holding a 40-character
//! object id. HEAD is symbolic: it names the current branch as
//! `ref: refs/heads/<branch>`.
//!
//! A branch with no ref file is *unborn*: initialized but never
//! committed to. Ref updates go through an atomic file replace so a
//! reader never observes a truncated or half-written head.

use crate::artifacts::branch::branch_name::{BranchName, SymRefName};
use crate::artifacts::objects::object_id::ObjectId;
use crate::errors::{Error, Result};
use anyhow::Context;
use derive_new::new;
use fake::rand;
use std::path::Path;

/// Regex pattern for parsing symbolic references
const SYMREF_REGEX: &str = r"^ref: (.+)$";

/// Name of the HEAD reference
pub const HEAD_REF_NAME: &str = "HEAD";

/// Reference store rooted at the marker directory.
#[derive(Debug, new)]
pub struct Refs {
    /// Path to the marker directory (`.ark`)
    path: Box<Path>,
}

impl Refs {
    /// Resolve the symbolic HEAD to the current branch name.
    pub fn current_branch(&self) -> Result<BranchName> {
        let content = std::fs::read_to_string(self.head_path())?;
        let content = content.trim();

        let symref = regex::Regex::new(SYMREF_REGEX).context("invalid symref regex")?;
        let captures = symref
            .captures(content)
            .ok_or_else(|| anyhow::anyhow!("HEAD does not name a branch: {content}"))?;

        let sym_ref_name = SymRefName::new(captures[1].to_string());
        Ok(BranchName::try_parse_sym_ref_name(&sym_ref_name)?)
    }

    /// Head commit of a branch.
    ///
    /// Fails with `UnbornBranch` if the branch has never been committed
    /// to; use [`Refs::read_ref`] where unborn is a normal state.
    pub fn head_of(&self, branch: &BranchName) -> Result<ObjectId> {
        self.read_ref(branch)?
            .ok_or_else(|| Error::UnbornBranch(branch.clone()))
    }

    /// Head commit of a branch, or `None` while the branch is unborn.
    pub fn read_ref(&self, branch: &BranchName) -> Result<Option<ObjectId>> {
        let ref_path = self.heads_path().join(branch.as_ref());

        if !ref_path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(&ref_path)?;
        let oid = ObjectId::try_parse(content.trim().to_string())
            .with_context(|| format!("ref {branch} does not hold an object id"))?;

        Ok(Some(oid))
    }

    /// Advance a branch to a new head commit.
    ///
    /// The new id is written to a temp file and renamed over the ref, so
    /// the previous value stays intact until the replacement is complete.
    /// Callers must only pass ids of objects already in the database.
    pub fn update_ref(&self, branch: &BranchName, oid: &ObjectId) -> Result<()> {
        let heads_path = self.heads_path();
        std::fs::create_dir_all(&heads_path)?;

        Self::replace_ref_file(&heads_path.join(branch.as_ref()), oid.as_ref())
    }

    /// Point the symbolic HEAD at a branch.
    pub fn set_head(&self, branch: &BranchName) -> Result<()> {
        let content = format!("ref: {}", branch.as_sym_ref().as_ref_path());

        Self::replace_ref_file(&self.head_path(), &content)
    }

    fn replace_ref_file(path: &Path, content: &str) -> Result<()> {
        let parent = path
            .parent()
            .context("ref file has no parent directory")?;
        let temp_path = parent.join(Self::generate_temp_name());

        std::fs::write(&temp_path, content)?;
        std::fs::rename(&temp_path, path)?;

        Ok(())
    }

    fn generate_temp_name() -> String {
        format!("tmp-ref-{}", rand::random::<u32>())
    }

    pub fn head_path(&self) -> Box<Path> {
        self.path.join(HEAD_REF_NAME).into_boxed_path()
    }

    pub fn refs_path(&self) -> Box<Path> {
        self.path.join("refs").into_boxed_path()
    }

    pub fn heads_path(&self) -> Box<Path> {
        self.refs_path().join("heads").into_boxed_path()
    }
}

#[cfg(test)]
mod tests {
    use crate::artifacts::branch::branch_name::BranchName;
    use proptest::proptest;

    proptest! {
        #[test]
        fn branch_name_with_word_characters_is_valid(
            branch_name in "[a-zA-Z0-9_-]+"
        ) {
            assert!(BranchName::try_parse(branch_name).is_ok());
        }

        #[test]
        fn branch_name_with_slashes_is_valid(
            prefix in "[a-zA-Z0-9_-]+",
            suffix in "[a-zA-Z0-9_-]+"
        ) {
            let branch_name = format!("{}/{}", prefix, suffix);
            assert!(BranchName::try_parse(branch_name).is_ok());
        }

        #[test]
        fn branch_name_starting_with_dot_is_invalid(
            suffix in "[a-zA-Z0-9_-]+"
        ) {
            let branch_name = format!(".{}", suffix);
            assert!(BranchName::try_parse(branch_name).is_err());
        }

        #[test]
        fn branch_name_ending_with_lock_is_invalid(
            prefix in "[a-zA-Z0-9_-]+"
        ) {
            let branch_name = format!("{}.lock", prefix);
            assert!(BranchName::try_parse(branch_name).is_err());
        }

        #[test]
        fn branch_name_with_consecutive_dots_is_invalid(
            prefix in "[a-zA-Z0-9_-]+",
            suffix in "[a-zA-Z0-9_-]+"
        ) {
            let branch_name = format!("{}..{}", prefix, suffix);
            assert!(BranchName::try_parse(branch_name).is_err());
        }

        #[test]
        fn branch_name_with_control_characters_is_invalid(
            prefix in "[a-zA-Z0-9_-]+",
            suffix in "[a-zA-Z0-9_-]+"
        ) {
            let branch_name = format!("{}\x00{}", prefix, suffix);
            assert!(BranchName::try_parse(branch_name).is_err());
        }

        #[test]
        fn branch_name_with_ref_metacharacters_is_invalid(
            prefix in "[a-zA-Z0-9_-]+",
            suffix in "[a-zA-Z0-9_-]+",
            special_char in r"[\*:\?\[\\^~]"
        ) {
            let branch_name = format!("{}{}{}", prefix, special_char, suffix);
            assert!(BranchName::try_parse(branch_name).is_err());
        }
    }

    #[test]
    fn empty_branch_name_is_invalid() {
        assert!(BranchName::try_parse("".to_string()).is_err());
    }

    #[test]
    fn common_branch_names_are_valid() {
        assert!(BranchName::try_parse("master".to_string()).is_ok());
        assert!(BranchName::try_parse("feature/new-feature".to_string()).is_ok());
        assert!(BranchName::try_parse("bugfix/issue-123".to_string()).is_ok());
    }
}
