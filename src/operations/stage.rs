use crate::areas::lock::RepositoryLock;
use crate::areas::repository::Repository;
use crate::artifacts::index::index_entry::IndexEntry;
use crate::artifacts::objects::blob::Blob;
use crate::errors::Result;
use std::path::PathBuf;

impl Repository {
    /// Stage paths for the next commit.
    ///
    /// Each path (directories are expanded to the files beneath them) is
    /// read from the working tree, stored as a blob, and recorded in the
    /// index under its root-relative path; staging a path again simply
    /// overwrites its mapping with the latest content's id. The updated
    /// index is persisted once at the end, so a failure partway (such as
    /// a missing file) leaves the persisted index exactly as it was.
    pub fn stage(&mut self, paths: &[PathBuf]) -> Result<()> {
        let marker_path = self.marker_path();
        let _lock = RepositoryLock::acquire(&marker_path)?;

        let (database, _refs, workspace, index) = self.services_mut();
        index.rehydrate()?;

        // expand directory arguments up front so a nonexistent path
        // fails the whole call before anything is recorded
        let mut files: Vec<PathBuf> = Vec::new();
        for path in paths {
            files.extend(workspace.list_files(path)?);
        }

        for file in files {
            let data = workspace.read_file(&file)?;
            let blob_oid = database.store(Blob::new(data))?;
            index.add(IndexEntry::new(file, blob_oid));
        }

        index.write_updates()?;

        Ok(())
    }
}
