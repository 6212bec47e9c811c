use crate::errors::Result;
use file_guard::{FileGuard, Lock};
use std::fs::File;
use std::path::Path;

/// Name of the lock file inside the marker directory
pub const LOCK_FILE_NAME: &str = "lock";

/// Scoped exclusive lock over the repository's mutable state.
///
/// Held for the whole duration of a staging or commit operation,
/// serializing index and ref mutations across callers. The underlying OS
/// advisory lock is released when the guard drops, on every exit path
/// including errors. Object-database writes are content-keyed and
/// idempotent, so they need no lock of their own.
pub struct RepositoryLock {
    _guard: FileGuard<Box<File>>,
}

impl RepositoryLock {
    /// Block until the repository lock can be acquired.
    pub fn acquire(marker_path: &Path) -> Result<Self> {
        let lock_file = std::fs::OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .open(marker_path.join(LOCK_FILE_NAME))?;
        let guard = file_guard::lock(Box::new(lock_file), Lock::Exclusive, 0, 1)?;

        Ok(RepositoryLock { _guard: guard })
    }
}
