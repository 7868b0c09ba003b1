//! Object database
//!
//! Content-addressed storage for blobs and commits. Objects are written once,
//! zlib-compressed, to `objects/<first-2-chars>/<remaining-38-chars>` and are
//! never modified or removed afterwards.

use crate::artifacts::objects::blob::Blob;
use crate::artifacts::objects::commit::Commit;
use crate::artifacts::objects::object::{Object, Unpackable};
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use crate::errors::Error;
use anyhow::Context;
use bytes::Bytes;
use fake::rand;
use std::io::{BufRead, Cursor, Read, Write};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

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

    pub fn exists(&self, object_id: &ObjectId) -> bool {
        self.path.join(object_id.to_path()).exists()
    }

    /// Write an object unless an object with the same id is already stored.
    pub fn store(&self, object: &impl Object) -> anyhow::Result<ObjectId> {
        let object_id = object.object_id();
        let object_path = self.path.join(object.object_path());

        if self.exists(&object_id) {
            tracing::debug!(oid = %object_id, "object already stored");
            return Ok(object_id);
        }

        std::fs::create_dir_all(
            object_path
                .parent()
                .context(format!("Invalid object path {}", object_path.display()))?,
        )
        .context(format!(
            "Unable to create object directory {}",
            object_path.display()
        ))?;

        self.write_object(object_path, object.framed()?)?;
        tracing::debug!(oid = %object_id, kind = %object.object_type(), "stored object");

        Ok(object_id)
    }

    /// Store the content of `path` as a blob and return its id.
    pub fn put_blob(&self, path: &Path, content: Bytes) -> anyhow::Result<ObjectId> {
        self.store(&Blob::new(path.to_path_buf(), content))
    }

    pub fn load_blob(&self, object_id: &ObjectId) -> anyhow::Result<Bytes> {
        match self.parse_object_as_bytes(object_id)? {
            Some((ObjectType::Blob, reader)) => Ok(Blob::deserialize(reader)?.into_content()),
            _ => Err(Error::ObjectNotFound(object_id.to_string()).into()),
        }
    }

    pub fn load_commit(&self, object_id: &ObjectId) -> anyhow::Result<Commit> {
        match self.parse_object_as_bytes(object_id)? {
            Some((ObjectType::Commit, reader)) => Commit::deserialize(reader),
            _ => Err(Error::CommitNotFound(object_id.to_string()).into()),
        }
    }

    fn parse_object_as_bytes(
        &self,
        object_id: &ObjectId,
    ) -> anyhow::Result<Option<(ObjectType, impl BufRead)>> {
        let object_path = self.path.join(object_id.to_path());
        if !object_path.exists() {
            return Ok(None);
        }

        let object_content = self.read_object(object_path)?;
        let mut object_reader = Cursor::new(object_content);

        let object_type = ObjectType::parse_object_type(&mut object_reader)?;

        Ok(Some((object_type, object_reader)))
    }

    fn read_object(&self, object_path: PathBuf) -> anyhow::Result<Bytes> {
        let object_content = std::fs::read(&object_path).context(format!(
            "Unable to read object file {}",
            object_path.display()
        ))?;

        Self::decompress(object_content.into())
    }

    fn write_object(&self, object_path: PathBuf, object_content: Bytes) -> anyhow::Result<()> {
        let object_dir = object_path
            .parent()
            .context(format!("Invalid object path {}", object_path.display()))?;
        let temp_object_path = object_dir.join(Self::generate_temp_name());

        let object_content = Self::compress(object_content)?;

        let mut file = std::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&temp_object_path)
            .context(format!(
                "Unable to open object file {}",
                temp_object_path.display()
            ))?;

        file.write_all(&object_content).context(format!(
            "Unable to write object file {}",
            temp_object_path.display()
        ))?;

        // rename the temp file to the object file to make it atomic
        std::fs::rename(&temp_object_path, &object_path).context(format!(
            "Unable to rename object file to {}",
            object_path.display()
        ))?;

        Ok(())
    }

    fn compress(data: Bytes) -> anyhow::Result<Bytes> {
        let mut encoder =
            flate2::write::ZlibEncoder::new(Vec::new(), flate2::Compression::default());
        encoder
            .write_all(&data)
            .context("Unable to compress object content")?;

        encoder
            .finish()
            .map(|compressed_content| compressed_content.into())
            .context("Unable to finish compressing object content")
    }

    fn decompress(data: Bytes) -> anyhow::Result<Bytes> {
        let mut decoder = flate2::read::ZlibDecoder::new(&*data);
        let mut decompressed_content = Vec::new();
        decoder
            .read_to_end(&mut decompressed_content)
            .context("Unable to decompress object content")?;

        Ok(decompressed_content.into())
    }

    fn generate_temp_name() -> String {
        format!("tmp-obj-{}", rand::random::<u32>())
    }

    /// Every stored object id, in ascending order.
    fn object_ids(&self) -> impl Iterator<Item = ObjectId> + '_ {
        WalkDir::new(&self.path)
            .min_depth(2)
            .max_depth(2)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().is_file())
            .filter_map(|entry| {
                let dir_name = entry.path().parent()?.file_name()?.to_string_lossy();
                let file_name = entry.file_name().to_string_lossy();

                ObjectId::try_parse(format!("{dir_name}{file_name}")).ok()
            })
    }

    /// Find all objects whose OID starts with the given prefix.
    ///
    /// For prefixes of 2+ characters only the matching fan-out directory is
    /// read; shorter prefixes scan the whole store.
    pub fn find_objects_by_prefix(&self, prefix: &str) -> anyhow::Result<Vec<ObjectId>> {
        let prefix = prefix.to_ascii_lowercase();

        if prefix.len() < 2 {
            return Ok(self
                .object_ids()
                .filter(|oid| oid.starts_with(&prefix))
                .collect());
        }

        let (dir_name, file_prefix) = prefix.split_at(2);
        let dir_path = self.path.join(dir_name);
        let mut matches = Vec::new();

        if dir_path.is_dir() {
            for entry in std::fs::read_dir(&dir_path)? {
                let entry = entry?;
                let file_name = entry.file_name();
                let file_name_str = file_name.to_string_lossy();

                if file_name_str.starts_with(file_prefix)
                    && let Ok(oid) = ObjectId::try_parse(format!("{dir_name}{file_name_str}"))
                {
                    matches.push(oid);
                }
            }
        }

        matches.sort();
        Ok(matches)
    }

    /// Resolve a full or abbreviated commit id.
    ///
    /// Objects that are not commits never match. No match fails with
    /// `CommitNotFound`, more than one with `AmbiguousId`.
    pub fn resolve_commit_prefix(&self, prefix: &str) -> anyhow::Result<ObjectId> {
        if prefix.is_empty() || !prefix.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(Error::CommitNotFound(prefix.to_string()).into());
        }

        let mut matches = Vec::new();
        for oid in self.find_objects_by_prefix(prefix)? {
            if self.object_type(&oid)? == ObjectType::Commit {
                matches.push(oid);
            }
        }

        match matches.len() {
            0 => Err(Error::CommitNotFound(prefix.to_string()).into()),
            1 => Ok(matches.remove(0)),
            _ => Err(Error::AmbiguousId(prefix.to_string()).into()),
        }
    }

    pub fn object_type(&self, object_id: &ObjectId) -> anyhow::Result<ObjectType> {
        let (object_type, _) = self
            .parse_object_as_bytes(object_id)?
            .ok_or_else(|| Error::ObjectNotFound(object_id.to_string()))?;
        Ok(object_type)
    }

    /// Every stored commit, in storage (ascending id) order.
    ///
    /// The order says nothing about history; use the rev list for that.
    pub fn commits(&self) -> impl Iterator<Item = anyhow::Result<Commit>> + '_ {
        self.object_ids().filter_map(|oid| match self.object_type(&oid) {
            Ok(ObjectType::Commit) => Some(self.load_commit(&oid)),
            Ok(ObjectType::Blob) => None,
            Err(error) => Some(Err(error)),
        })
    }

    /// Ids of every commit whose message equals `message` exactly.
    pub fn find_by_message(&self, message: &str) -> anyhow::Result<Vec<ObjectId>> {
        let mut matches = Vec::new();
        for commit in self.commits() {
            let commit = commit?;
            if commit.message() == message {
                matches.push(commit.oid().clone());
            }
        }

        Ok(matches)
    }
}
