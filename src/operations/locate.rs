use crate::areas::repository::{MARKER_DIR, Repository};
use crate::errors::{Error, Result};
use std::path::Path;

impl Repository {
    /// Discover the repository containing `start_dir`.
    ///
    /// Walks from `start_dir` up through its ancestors and opens the
    /// first directory containing the marker; fails with
    /// `NotARepository` when the filesystem root is reached without
    /// finding one.
    pub fn locate(start_dir: impl AsRef<Path>) -> Result<Self> {
        let start_dir = start_dir.as_ref();
        let start = start_dir
            .canonicalize()
            .map_err(|_| Error::NotARepository(start_dir.to_path_buf()))?;

        if let Some(root) = start
            .ancestors()
            .find(|candidate| candidate.join(MARKER_DIR).is_dir())
        {
            return Ok(Self::open(root.to_path_buf()));
        }

        Err(Error::NotARepository(start))
    }
}
