//! Tree object
//!
//! A tree is the snapshot of the staging index at commit time: a flat,
//! path-sorted sequence of entries, each naming a path and the id of the
//! object stored for it. Sorting by path makes the serialization (and
//! therefore the tree id) a pure function of the staged content,
//! independent of the order in which paths were staged.
//!
//! On disk: `tree <size>\0<entries>`, each entry `<kind> <path>\0` followed
//! by the packed 20-byte object id.
//!
//! Entries are tagged `Blob` or `Tree` so readers match on kind
//! exhaustively. The commit builder emits only `Blob` entries; nested
//! trees are an extension point of the format, not produced here.
// TODO: build hierarchical trees per directory once nested snapshots are needed

use crate::artifacts::index::index_entry::IndexEntry;
use crate::artifacts::objects::object::Unpackable;
use crate::artifacts::objects::object::{Object, Packable};
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use anyhow::Context;
use bytes::Bytes;
use derive_new::new;
use std::collections::BTreeMap;
use std::io::{BufRead, Write};

/// What a tree entry's id refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    Blob,
    Tree,
}

impl EntryKind {
    pub fn as_str(&self) -> &str {
        match self {
            EntryKind::Blob => "blob",
            EntryKind::Tree => "tree",
        }
    }
}

impl TryFrom<&str> for EntryKind {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> anyhow::Result<Self> {
        match value {
            "blob" => Ok(EntryKind::Blob),
            "tree" => Ok(EntryKind::Tree),
            _ => Err(anyhow::anyhow!("invalid tree entry kind: {value}")),
        }
    }
}

/// One tree entry: the stored object id, tagged with its kind.
///
/// The entry's path is the key it is stored under in the tree.
#[derive(Debug, Clone, PartialEq, Eq, new)]
pub struct TreeEntry {
    pub oid: ObjectId,
    pub kind: EntryKind,
}

/// Path-sorted snapshot of staged entries.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tree {
    entries: BTreeMap<String, TreeEntry>,
}

impl Tree {
    /// Build a tree from staging-index entries.
    ///
    /// Every entry is tagged `Blob`; the `BTreeMap` keys keep the
    /// serialization path-sorted regardless of staging order.
    pub fn build<'e>(entries: impl Iterator<Item = &'e IndexEntry>) -> anyhow::Result<Self> {
        let mut tree = Self::default();

        for entry in entries {
            let path = entry
                .path
                .to_str()
                .with_context(|| format!("non UTF-8 path in index: {:?}", entry.path))?;
            tree.entries
                .insert(path.to_string(), TreeEntry::new(entry.oid.clone(), EntryKind::Blob));
        }

        Ok(tree)
    }

    pub fn entries(&self) -> impl Iterator<Item = (&String, &TreeEntry)> {
        self.entries.iter()
    }

    pub fn entry_by_path(&self, path: &str) -> Option<&TreeEntry> {
        self.entries.get(path)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Packable for Tree {
    fn serialize(&self) -> anyhow::Result<Bytes> {
        let mut content_bytes = Vec::new();

        for (path, entry) in &self.entries {
            let header = format!("{} {}", entry.kind.as_str(), path);
            content_bytes.write_all(header.as_bytes())?;
            content_bytes.push(0);
            entry.oid.write_packed_to(&mut content_bytes)?;
        }

        let mut tree_bytes = Vec::new();
        let header = format!("{} {}\0", self.object_type().as_str(), content_bytes.len());
        tree_bytes.write_all(header.as_bytes())?;
        tree_bytes.write_all(&content_bytes)?;

        Ok(Bytes::from(tree_bytes))
    }
}

impl Unpackable for Tree {
    fn deserialize(reader: impl BufRead) -> anyhow::Result<Self> {
        let mut entries = BTreeMap::new();
        let mut reader = reader;

        let mut kind_bytes = Vec::new();
        let mut path_bytes = Vec::new();

        loop {
            kind_bytes.clear();
            let n = reader.read_until(b' ', &mut kind_bytes)?;
            if n == 0 {
                break; // clean EOF: no more entries
            }
            if *kind_bytes.last().unwrap() != b' ' {
                return Err(anyhow::anyhow!("unexpected EOF in tree entry kind"));
            }
            kind_bytes.pop(); // drop the space

            let kind = EntryKind::try_from(std::str::from_utf8(&kind_bytes)?)?;

            path_bytes.clear();
            let n = reader.read_until(b'\0', &mut path_bytes)?;
            if n == 0 || *path_bytes.last().unwrap() != b'\0' {
                return Err(anyhow::anyhow!("unexpected EOF in tree entry path"));
            }
            path_bytes.pop(); // drop NUL
            let path = std::str::from_utf8(&path_bytes)?.to_owned();

            let oid = ObjectId::read_packed_from(&mut reader)
                .context("unexpected EOF in tree entry object id")?;

            entries.insert(path, TreeEntry::new(oid, kind));
        }

        Ok(Tree { entries })
    }
}

impl Object for Tree {
    fn object_type(&self) -> ObjectType {
        ObjectType::Tree
    }

    fn display(&self) -> String {
        self.entries
            .iter()
            .map(|(path, entry)| {
                format!("{} {}\t{}", entry.kind.as_str(), entry.oid.as_ref(), path)
            })
            .collect::<Vec<String>>()
            .join("\n")
    }
}
