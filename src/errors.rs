use crate::artifacts::branch::branch_name::BranchName;
use crate::artifacts::objects::object_id::ObjectId;
use std::path::PathBuf;
use thiserror::Error;

/// Error conditions surfaced by repository operations.
///
/// Every public operation reports its outcome through one of these kinds;
/// nothing is retried internally and nothing is swallowed apart from the
/// documented non-error cases (an absent index on load, an already-stored
/// object on write).
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("object {0} not found in the object database")]
    ObjectNotFound(ObjectId),

    #[error("object {oid} is corrupt")]
    CorruptObject {
        oid: ObjectId,
        #[source]
        source: anyhow::Error,
    },

    #[error("corrupt index file")]
    CorruptIndex(#[source] anyhow::Error),

    #[error("branch {0} has no commits yet")]
    UnbornBranch(BranchName),

    #[error("nothing staged for commit")]
    EmptyCommit,

    #[error("not a repository (searched from {} up to the filesystem root)", .0.display())]
    NotARepository(PathBuf),

    #[error("repository already initialized at {}", .0.display())]
    AlreadyInitialized(PathBuf),

    #[error("file not found: {}", .0.display())]
    FileNotFound(PathBuf),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// A specialized `Result` type for repository operations.
pub type Result<T> = std::result::Result<T, Error>;
