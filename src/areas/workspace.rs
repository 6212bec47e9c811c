use crate::areas::repository::MARKER_DIR;
use crate::errors::{Error, Result};
use bytes::Bytes;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

const IGNORED_PATHS: [&str; 3] = [MARKER_DIR, ".", ".."];

/// Read access to the working tree on behalf of staging.
///
/// All returned paths are repository-root-relative, which is the form the
/// index records them in.
#[derive(Debug)]
pub struct Workspace {
    path: Box<Path>,
}

impl Workspace {
    pub fn new(path: Box<Path>) -> Self {
        Workspace { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Expand one staged path argument into root-relative file paths.
    ///
    /// A directory yields every file beneath it (the marker directory is
    /// skipped); a plain file yields itself. A path that does not exist
    /// fails with `FileNotFound`.
    pub fn list_files(&self, path: &Path) -> Result<Vec<PathBuf>> {
        let absolute = self.absolutize(path);

        if !absolute.exists() {
            return Err(Error::FileNotFound(path.to_path_buf()));
        }

        if absolute.is_dir() {
            Ok(WalkDir::new(&absolute)
                .into_iter()
                .filter_map(|entry| entry.ok())
                .filter_map(|entry| self.keep_tracked_file(entry.path()))
                .collect())
        } else {
            Ok(vec![self.relativize(&absolute)?])
        }
    }

    /// Current content of a working-tree file.
    pub fn read_file(&self, file_path: &Path) -> Result<Bytes> {
        let absolute = self.absolutize(file_path);

        let content = std::fs::read(&absolute).map_err(|err| match err.kind() {
            std::io::ErrorKind::NotFound => Error::FileNotFound(file_path.to_path_buf()),
            _ => Error::Io(err),
        })?;

        Ok(content.into())
    }

    fn absolutize(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.path.join(path)
        }
    }

    fn relativize(&self, absolute: &Path) -> Result<PathBuf> {
        absolute
            .strip_prefix(self.path.as_ref())
            .map(PathBuf::from)
            .map_err(|_| {
                Error::Other(anyhow::anyhow!(
                    "path {} is outside the repository",
                    absolute.display()
                ))
            })
    }

    fn is_ignored(relative: &Path) -> bool {
        relative.components().any(|component| {
            if let std::path::Component::Normal(name) = component {
                IGNORED_PATHS.contains(&name.to_string_lossy().as_ref())
            } else {
                false
            }
        })
    }

    fn keep_tracked_file(&self, path: &Path) -> Option<PathBuf> {
        if !path.is_file() {
            return None;
        }

        let relative = path.strip_prefix(self.path.as_ref()).ok()?;
        (!Self::is_ignored(relative)).then(|| relative.to_path_buf())
    }
}
