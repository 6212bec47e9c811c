use crate::artifacts::objects::blob::Blob;
use crate::artifacts::objects::commit::Commit;
use crate::artifacts::objects::object::{Object, ObjectBox, Unpackable};
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use crate::artifacts::objects::tree::Tree;
use crate::errors::{Error, Result};
use anyhow::Context;
use bytes::Bytes;
use fake::rand;
use std::io::{BufRead, Cursor, Read, Write};
use std::path::{Path, PathBuf};

/// Content-addressed object storage.
///
/// Objects live under `objects/<id[0..2]>/<id[2..]>`, zlib-compressed.
/// Writes are idempotent: identical content produces the identical id and
/// bytes, so an already-present object makes `store` a no-op.
#[derive(Debug)]
pub struct Database {
    path: Box<Path>,
}

impl Database {
    pub fn new(path: Box<Path>) -> Self {
        Database { path }
    }

    pub fn objects_path(&self) -> &Path {
        &self.path
    }

    /// Persist an object, returning its content-derived id.
    pub fn store(&self, object: impl Object) -> Result<ObjectId> {
        let object_id = object.object_id().context("unable to hash object")?;
        let object_path = self.path.join(object_id.to_path());

        if !object_path.exists() {
            let object_content = object.serialize().context("unable to serialize object")?;

            std::fs::create_dir_all(
                object_path
                    .parent()
                    .context(format!("invalid object path {}", object_path.display()))?,
            )?;

            self.write_object(object_path, object_content)?;
        }

        Ok(object_id)
    }

    /// Raw (decompressed) bytes of a stored object.
    pub fn load(&self, object_id: &ObjectId) -> Result<Bytes> {
        let object_path = self.path.join(object_id.to_path());

        self.read_object(object_id, object_path)
    }

    pub fn contains(&self, object_id: &ObjectId) -> bool {
        self.path.join(object_id.to_path()).exists()
    }

    /// Load and parse an object, dispatching on its recorded type.
    pub fn parse_object(&self, object_id: &ObjectId) -> Result<ObjectBox> {
        let (object_type, object_reader) = self.parse_object_as_bytes(object_id)?;

        let parsed = match object_type {
            ObjectType::Blob => Blob::deserialize(object_reader).map(|blob| ObjectBox::Blob(Box::new(blob))),
            ObjectType::Tree => Tree::deserialize(object_reader).map(|tree| ObjectBox::Tree(Box::new(tree))),
            ObjectType::Commit => {
                Commit::deserialize(object_reader).map(|commit| ObjectBox::Commit(Box::new(commit)))
            }
        };

        parsed.map_err(|source| Error::CorruptObject {
            oid: object_id.clone(),
            source,
        })
    }

    /// Typed read: `None` if the stored object is some other kind.
    pub fn parse_object_as_blob(&self, object_id: &ObjectId) -> Result<Option<Blob>> {
        let (object_type, object_reader) = self.parse_object_as_bytes(object_id)?;

        match object_type {
            ObjectType::Blob => Blob::deserialize(object_reader)
                .map(Some)
                .map_err(|source| Error::CorruptObject {
                    oid: object_id.clone(),
                    source,
                }),
            _ => Ok(None),
        }
    }

    pub fn parse_object_as_tree(&self, object_id: &ObjectId) -> Result<Option<Tree>> {
        let (object_type, object_reader) = self.parse_object_as_bytes(object_id)?;

        match object_type {
            ObjectType::Tree => Tree::deserialize(object_reader)
                .map(Some)
                .map_err(|source| Error::CorruptObject {
                    oid: object_id.clone(),
                    source,
                }),
            _ => Ok(None),
        }
    }

    pub fn parse_object_as_commit(&self, object_id: &ObjectId) -> Result<Option<Commit>> {
        let (object_type, object_reader) = self.parse_object_as_bytes(object_id)?;

        match object_type {
            ObjectType::Commit => Commit::deserialize(object_reader)
                .map(Some)
                .map_err(|source| Error::CorruptObject {
                    oid: object_id.clone(),
                    source,
                }),
            _ => Ok(None),
        }
    }

    fn parse_object_as_bytes(&self, object_id: &ObjectId) -> Result<(ObjectType, impl BufRead)> {
        let object_content = self.load(object_id)?;
        let mut object_reader = Cursor::new(object_content);

        let object_type =
            ObjectType::parse_header(&mut object_reader).map_err(|source| Error::CorruptObject {
                oid: object_id.clone(),
                source,
            })?;

        Ok((object_type, object_reader))
    }

    fn read_object(&self, object_id: &ObjectId, object_path: PathBuf) -> Result<Bytes> {
        let object_content = std::fs::read(&object_path).map_err(|err| match err.kind() {
            std::io::ErrorKind::NotFound => Error::ObjectNotFound(object_id.clone()),
            _ => Error::Io(err),
        })?;

        Self::decompress(object_content.into()).map_err(|source| Error::CorruptObject {
            oid: object_id.clone(),
            source,
        })
    }

    fn write_object(&self, object_path: PathBuf, object_content: Bytes) -> Result<()> {
        let object_dir = object_path
            .parent()
            .context(format!("invalid object path {}", object_path.display()))?;
        let temp_object_path = object_dir.join(Self::generate_temp_name());

        let object_content = Self::compress(object_content)?;

        let mut file = std::fs::OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&temp_object_path)
            .with_context(|| {
                format!("unable to open object file {}", temp_object_path.display())
            })?;

        file.write_all(&object_content).with_context(|| {
            format!("unable to write object file {}", temp_object_path.display())
        })?;

        // rename the temp file into place to make the write atomic
        std::fs::rename(&temp_object_path, &object_path).with_context(|| {
            format!("unable to rename object file to {}", object_path.display())
        })?;

        Ok(())
    }

    fn compress(data: Bytes) -> anyhow::Result<Bytes> {
        let mut encoder =
            flate2::write::ZlibEncoder::new(Vec::new(), flate2::Compression::default());
        encoder
            .write_all(&data)
            .context("unable to compress object content")?;

        encoder
            .finish()
            .map(|compressed| compressed.into())
            .context("unable to finish compressing object content")
    }

    fn decompress(data: Bytes) -> anyhow::Result<Bytes> {
        let mut decoder = flate2::read::ZlibDecoder::new(&*data);
        let mut decompressed = Vec::new();
        decoder
            .read_to_end(&mut decompressed)
            .context("unable to decompress object content")?;

        Ok(decompressed.into())
    }

    fn generate_temp_name() -> String {
        format!("tmp-obj-{}", rand::random::<u32>())
    }
}
