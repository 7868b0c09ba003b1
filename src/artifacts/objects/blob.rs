//! Blob object
//!
//! Blobs store the bytes of one tracked file. The blob id folds the file's
//! path into the hash, so the same content under two names produces two
//! distinct blobs.
//!
//! ## Format
//!
//! On disk: `blob <size>\0<content>`

use crate::artifacts::objects::object::{Object, Packable, Unpackable};
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use bytes::Bytes;
use derive_new::new;
use std::io::BufRead;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq, new)]
pub struct Blob {
    /// Path of the file the content was taken from, relative to the work tree
    path: PathBuf,
    content: Bytes,
}

impl Blob {
    /// Compute the id a file with this path and content would be stored under
    pub fn id_for(path: &Path, content: &[u8]) -> ObjectId {
        ObjectId::digest([path.as_os_str().as_encoded_bytes(), content])
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn content(&self) -> &Bytes {
        &self.content
    }

    pub fn into_content(self) -> Bytes {
        self.content
    }
}

impl Packable for Blob {
    fn serialize(&self) -> anyhow::Result<Bytes> {
        Ok(self.content.clone())
    }
}

impl Unpackable for Blob {
    /// The path is not part of the stored payload; deserialized blobs carry an
    /// empty one.
    fn deserialize(mut reader: impl BufRead) -> anyhow::Result<Self> {
        let mut content = Vec::new();
        reader.read_to_end(&mut content)?;

        Ok(Self::new(PathBuf::new(), content.into()))
    }
}

impl Object for Blob {
    fn object_type(&self) -> ObjectType {
        ObjectType::Blob
    }

    fn object_id(&self) -> ObjectId {
        Self::id_for(&self.path, &self.content)
    }
}
