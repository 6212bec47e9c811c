//! Repository data structures
//!
//! - `branch`: validated branch and symbolic ref names
//! - `index`: staging index file format and entries
//! - `objects`: immutable object types (blob, tree, commit)

pub mod branch;
pub mod index;
pub mod objects;
