//! Immutable repository objects
//!
//! Everything recorded by the repository is a content-addressed object:
//!
//! - **Blob**: a staged file's raw content
//! - **Tree**: the path-sorted snapshot of staged entries at commit time
//! - **Commit**: a tree id, zero or one parent ids, author metadata, message
//!
//! All objects share the serialized framing `<type> <size>\0<content>`;
//! an object's identity is the SHA-1 digest of those framed bytes, so
//! identical content always yields the identical id.

pub mod blob;
pub mod commit;
pub mod object;
pub mod object_id;
pub mod object_type;
pub mod tree;

/// Length of an object id in hexadecimal form
pub const OBJECT_ID_LENGTH: usize = 40;
