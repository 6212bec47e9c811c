use crate::areas::database::Database;
use crate::areas::index::Index;
use crate::areas::refs::Refs;
use crate::areas::workspace::Workspace;
use std::path::{Path, PathBuf};

/// Name of the marker directory identifying a repository root
pub const MARKER_DIR: &str = ".ark";

/// Thin facade composing the repository's areas.
///
/// Each area takes the repository root (or marker) path as explicit
/// configuration and is independently usable; the facade only wires them
/// together and hosts the public operations.
pub struct Repository {
    root: Box<Path>,
    database: Database,
    index: Index,
    workspace: Workspace,
    refs: Refs,
}

impl Repository {
    /// Compose the areas over a repository root.
    pub(crate) fn open(root: PathBuf) -> Self {
        let marker = root.join(MARKER_DIR);

        let database = Database::new(marker.join("objects").into_boxed_path());
        let index = Index::new(marker.join("index").into_boxed_path());
        let workspace = Workspace::new(root.clone().into_boxed_path());
        let refs = Refs::new(marker.into_boxed_path());

        Repository {
            root: root.into_boxed_path(),
            database,
            index,
            workspace,
            refs,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn marker_path(&self) -> Box<Path> {
        self.root.join(MARKER_DIR).into_boxed_path()
    }

    pub fn database(&self) -> &Database {
        &self.database
    }

    pub fn workspace(&self) -> &Workspace {
        &self.workspace
    }

    pub fn refs(&self) -> &Refs {
        &self.refs
    }

    pub fn index(&self) -> &Index {
        &self.index
    }

    pub fn index_mut(&mut self) -> &mut Index {
        &mut self.index
    }

    /// Split borrows for operations that read some areas while mutating
    /// the index.
    pub(crate) fn services_mut(&mut self) -> (&Database, &Refs, &Workspace, &mut Index) {
        (&self.database, &self.refs, &self.workspace, &mut self.index)
    }
}
