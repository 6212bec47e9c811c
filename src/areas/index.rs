//! Staging index
//!
//! The index is the persisted mapping from repository-relative path to
//! blob id, representing what the next commit will contain. It survives
//! process restarts until a successful commit clears it.
//!
//! Loading takes a shared file lock; updates are serialized by the
//! repository lock and persisted by writing a fresh file aside and
//! renaming it into place, so the previous index survives any failure
//! partway through. Integrity is guarded by a trailing SHA-1 checksum
//! over the header and entry lines.

use crate::artifacts::index::index_entry::IndexEntry;
use crate::artifacts::index::{SIGNATURE, VERSION};
use crate::errors::{Error, Result};
use anyhow::Context;
use fake::rand;
use sha1::{Digest, Sha1};
use std::collections::BTreeMap;
use std::io::{Read, Write};
use std::ops::DerefMut;
use std::path::Path;

/// Staging area: staged entries mapped by path.
#[derive(Debug, Clone)]
pub struct Index {
    /// Path to the index file (`<marker>/index`)
    path: Box<Path>,
    /// Staged entries keyed by repository-relative path
    entries: BTreeMap<Box<Path>, IndexEntry>,
}

impl Index {
    pub fn new(path: Box<Path>) -> Self {
        Index {
            path,
            entries: BTreeMap::new(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn entry_by_path(&self, path: &Path) -> Option<&IndexEntry> {
        self.entries.get(path)
    }

    pub fn entries(&self) -> impl Iterator<Item = &IndexEntry> {
        self.entries.values()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Load the persisted index from disk.
    ///
    /// An absent (or empty) index file is an empty index, not an error;
    /// a file that fails parsing or checksum verification is
    /// `CorruptIndex`.
    pub fn rehydrate(&mut self) -> Result<()> {
        self.entries.clear();

        if !self.path.exists() {
            return Ok(());
        }

        let mut index_file = std::fs::OpenOptions::new().read(true).open(self.path())?;
        let mut lock = file_guard::lock(&mut index_file, file_guard::Lock::Shared, 0, 1)?;

        let mut content = Vec::new();
        lock.deref_mut().read_to_end(&mut content)?;

        if content.is_empty() {
            return Ok(());
        }

        self.parse(&content).map_err(Error::CorruptIndex)
    }

    /// Record a staged path; the latest entry for a path wins.
    pub fn add(&mut self, entry: IndexEntry) {
        self.entries
            .insert(entry.path.clone().into_boxed_path(), entry);
    }

    /// Persist the current entries.
    ///
    /// The whole file is written aside and renamed over the index path,
    /// so readers only ever observe a complete, checksummed index.
    pub fn write_updates(&mut self) -> Result<()> {
        let mut body = format!("{} {} {}\n", SIGNATURE, VERSION, self.entries.len());
        for entry in self.entries.values() {
            body.push_str(&entry.to_line());
            body.push('\n');
        }
        let checksum = Self::checksum(body.as_bytes());

        let parent = self
            .path
            .parent()
            .context("index file has no parent directory")?;
        let temp_path = parent.join(Self::generate_temp_name());

        let mut file = std::fs::OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&temp_path)?;
        file.write_all(body.as_bytes())?;
        file.write_all(checksum.as_bytes())?;
        file.write_all(b"\n")?;

        std::fs::rename(&temp_path, &self.path)?;

        Ok(())
    }

    /// Remove the persisted index; idempotent when none exists.
    pub fn clear(&mut self) -> Result<()> {
        self.entries.clear();

        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }

    fn parse(&mut self, content: &[u8]) -> anyhow::Result<()> {
        let text = std::str::from_utf8(content).context("index is not valid UTF-8")?;
        let body = Self::verify_checksum(text)?;

        let mut lines = body.lines();
        let header = lines.next().context("missing index header")?;
        let expected_entries = Self::parse_header(header)?;

        for line in lines {
            let entry = IndexEntry::parse_line(line)?;
            self.add(entry);
        }

        if self.entries.len() != expected_entries {
            anyhow::bail!(
                "index entry count mismatch: header says {}, found {}",
                expected_entries,
                self.entries.len()
            );
        }

        Ok(())
    }

    fn parse_header(header: &str) -> anyhow::Result<usize> {
        let mut fields = header.split(' ');

        let signature = fields.next().context("missing index signature")?;
        if signature != SIGNATURE {
            anyhow::bail!("invalid index signature: {signature}");
        }

        let version: u32 = fields
            .next()
            .context("missing index version")?
            .parse()
            .context("invalid index version")?;
        if version != VERSION {
            anyhow::bail!("unsupported index version: {version}");
        }

        fields
            .next()
            .context("missing index entry count")?
            .parse()
            .context("invalid index entry count")
    }

    /// Split off and verify the trailing checksum line; returns the body.
    fn verify_checksum(text: &str) -> anyhow::Result<&str> {
        let trimmed = text
            .strip_suffix('\n')
            .context("index is missing its trailing newline")?;

        let Some(cut) = trimmed.rfind('\n') else {
            anyhow::bail!("index is missing its checksum");
        };
        let (body, checksum) = (&text[..cut + 1], &trimmed[cut + 1..]);

        if Self::checksum(body.as_bytes()) != checksum {
            anyhow::bail!("index checksum mismatch");
        }

        Ok(body)
    }

    fn checksum(body: &[u8]) -> String {
        let mut hasher = Sha1::new();
        hasher.update(body);
        format!("{:x}", hasher.finalize())
    }

    fn generate_temp_name() -> String {
        format!("tmp-idx-{}", rand::random::<u32>())
    }
}
