//! Staging index file format
//!
//! The index records which paths (and which content, by blob id) go into
//! the next commit. It is a line-oriented text file with an integrity
//! checksum:
//!
//! ```text
//! ARKI 1 <entry-count>\n
//! <40-hex-oid> <path>\n        (one line per entry, path-sorted)
//! <40-hex SHA-1 of all preceding bytes>\n
//! ```
//!
//! An absent file is an empty index; anything that fails the signature,
//! version, count, entry, or checksum checks is corrupt.

pub mod index_entry;

/// Magic signature identifying index files
pub const SIGNATURE: &str = "ARKI";

/// Index file format version
pub const VERSION: u32 = 1;
