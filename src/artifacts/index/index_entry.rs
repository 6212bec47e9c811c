use crate::artifacts::objects::object_id::ObjectId;
use anyhow::Context;
use derive_new::new;
use std::path::PathBuf;

/// One staged path and the blob recorded for it.
///
/// Paths are repository-root-relative. An entry line is
/// `<40-hex-oid> <path>`; the oid field is fixed-width, so paths may
/// contain spaces.
#[derive(Debug, Clone, PartialEq, Eq, new)]
pub struct IndexEntry {
    pub path: PathBuf,
    pub oid: ObjectId,
}

impl IndexEntry {
    pub fn to_line(&self) -> String {
        format!("{} {}", self.oid.as_ref(), self.path.display())
    }

    pub fn parse_line(line: &str) -> anyhow::Result<Self> {
        let (oid, path) = line
            .split_once(' ')
            .with_context(|| format!("malformed index entry: {line}"))?;

        if path.is_empty() {
            return Err(anyhow::anyhow!("index entry with empty path"));
        }

        Ok(Self::new(
            PathBuf::from(path),
            ObjectId::try_parse(oid.to_string())?,
        ))
    }
}
