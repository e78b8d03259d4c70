//! File download chunks.

use crate::deserialize::{Buffer, Deserializable, Result};
use crate::registry::{Entity, Family, Record, Registry, VariantDescriptor};
use crate::serialize::Serializable;
use crate::Identifiable;

/// `fileChunk` constructor ID.
pub const ID_FILE_CHUNK: u32 = 0x096a18d5;

/// One chunk of a file download.
///
/// The payload is owned by the chunk and handed out exactly once through
/// [`FileChunk::into_bytes`]; there is no separate release step. Chunks can
/// be large, so avoid cloning them.
#[derive(Clone, Debug, PartialEq)]
pub struct FileChunk {
    /// Modification time of the file (unix seconds).
    pub mtime: i32,
    bytes: Vec<u8>,
}

impl FileChunk {
    /// Wrap an owned payload.
    pub fn new(mtime: i32, bytes: Vec<u8>) -> Self {
        Self { mtime, bytes }
    }

    /// Payload length in bytes.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Whether the payload is empty.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Borrow the payload for inspection.
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Consume the chunk, taking ownership of the payload.
    ///
    /// This is the single consumption path: the chunk is gone afterwards,
    /// so the payload cannot be handed out twice.
    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }
}

impl Identifiable for FileChunk {
    const CONSTRUCTOR_ID: u32 = ID_FILE_CHUNK;
}

impl Record for FileChunk {
    const FAMILY: Family = Family::FileChunk;

    fn from_entity(entity: Entity) -> Option<Self> {
        match entity {
            Entity::FileChunk(c) => Some(c),
            _ => None,
        }
    }

    fn into_entity(self) -> Entity {
        Entity::FileChunk(self)
    }
}

impl Serializable for FileChunk {
    fn serialize(&self, buf: &mut impl Extend<u8>) {
        ID_FILE_CHUNK.serialize(buf);
        self.mtime.serialize(buf);
        self.bytes.serialize(buf);
    }
}

pub(crate) fn descriptors() -> [VariantDescriptor; 1] {
    [VariantDescriptor {
        id: ID_FILE_CHUNK,
        family: Family::FileChunk,
        decode: decode_chunk,
        encode: encode_chunk,
    }]
}

fn decode_chunk(_registry: &Registry, buf: Buffer) -> Result<Entity> {
    let mtime = i32::deserialize(buf)?;
    let bytes = Vec::<u8>::deserialize(buf)?;
    Ok(Entity::FileChunk(FileChunk::new(mtime, bytes)))
}

fn encode_chunk(entity: &Entity, out: &mut Vec<u8>) -> Option<()> {
    let Entity::FileChunk(c) = entity else { return None };
    c.mtime.serialize(out);
    c.bytes.serialize(out);
    Some(())
}
