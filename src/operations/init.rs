use crate::areas::repository::{MARKER_DIR, Repository};
use crate::artifacts::branch::branch_name::BranchName;
use crate::errors::{Error, Result};
use anyhow::Context;
use std::fs;
use std::path::Path;

const DEFAULT_BRANCH: &str = "master";

impl Repository {
    /// Create a new repository rooted at `path`.
    ///
    /// Creates the marker directory with its object store and refs
    /// layout, and points HEAD at the (still unborn) default branch.
    /// Fails with `AlreadyInitialized` if the marker already exists.
    pub fn init(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        fs::create_dir_all(path)
            .with_context(|| format!("failed to create repository root {}", path.display()))?;
        let root = path.canonicalize()?;

        if root.join(MARKER_DIR).exists() {
            return Err(Error::AlreadyInitialized(root));
        }

        let repository = Self::open(root);

        fs::create_dir_all(repository.database().objects_path())
            .context("failed to create the objects directory")?;
        fs::create_dir_all(repository.refs().heads_path())
            .context("failed to create the refs directory")?;

        let default_branch = BranchName::try_parse(DEFAULT_BRANCH.to_string())?;
        repository.refs().set_head(&default_branch)?;

        Ok(repository)
    }
}
