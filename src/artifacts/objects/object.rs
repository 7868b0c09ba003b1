use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use anyhow::Result;
use bytes::Bytes;
use std::io::{BufRead, Write};
use std::path::PathBuf;

pub trait Packable {
    /// Encode the object payload, without the `<type> <size>\0` frame
    fn serialize(&self) -> Result<Bytes>;
}

pub trait Unpackable {
    /// Decode the object payload; the frame has already been consumed
    fn deserialize(reader: impl BufRead) -> Result<Self>
    where
        Self: Sized;
}

pub trait Object: Packable {
    fn object_type(&self) -> ObjectType;

    /// Identity of the object; each kind defines which fields are hashed
    fn object_id(&self) -> ObjectId;

    fn object_path(&self) -> PathBuf {
        self.object_id().to_path()
    }

    /// Payload wrapped in the `<type> <size>\0` frame stored on disk
    fn framed(&self) -> Result<Bytes> {
        let payload = self.serialize()?;

        let mut object_bytes = Vec::with_capacity(payload.len() + 16);
        let header = format!("{} {}\0", self.object_type().as_str(), payload.len());
        object_bytes.write_all(header.as_bytes())?;
        object_bytes.write_all(&payload)?;

        Ok(Bytes::from(object_bytes))
    }
}
