//! Public repository operations
//!
//! Each operation is an `impl Repository` block in its own file:
//!
//! - `init`: create a fresh repository
//! - `locate`: discover the repository from any subdirectory
//! - `stage`: hash working-tree files into the staging index
//! - `commit`: record the staged snapshot on the current branch

mod commit;
mod init;
mod locate;
mod stage;
