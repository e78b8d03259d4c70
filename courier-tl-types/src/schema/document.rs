//! Uploaded documents.

use crate::deserialize::{Buffer, Deserializable, Result};
use crate::flags::Flags;
use crate::registry::{Entity, Family, Record, Registry, VariantDescriptor};
use crate::serialize::Serializable;

/// `documentEmpty` constructor ID.
pub const ID_DOCUMENT_EMPTY: u32 = 0x36f8c871;
/// Pre-flags `document` layout with a 32-bit size.
pub const ID_DOCUMENT_V0: u32 = 0x87232bc7;
/// Current `document` layout.
pub const ID_DOCUMENT: u32 = 0x8fd4c4d8;

/// An uploaded document.
#[derive(Clone, Debug, PartialEq)]
pub enum Document {
    /// A document that is no longer available.
    Empty {
        /// The document's ID.
        id: i64,
    },
    /// A full document record.
    Document(DocumentInfo),
}

/// The canonical `document` record.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DocumentInfo {
    /// The document's ID.
    pub id: i64,
    /// Access hash proving this client may reference the document.
    pub access_hash: i64,
    /// Opaque reference the server expects back on download requests.
    /// Absent in payloads written before references existed.
    pub file_reference: Option<Vec<u8>>,
    /// Upload date (unix seconds).
    pub date: i32,
    /// MIME type.
    pub mime_type: String,
    /// Size in bytes. Old layouts carried this as 32 bits.
    pub size: i64,
    /// Widths of the available thumbnails.
    pub thumb_widths: Vec<i32>,
    /// Duration in seconds, if the document is a video.
    pub video_duration: Option<f64>,
    /// The datacenter hosting the file.
    pub dc_id: i32,
}

impl Document {
    pub(crate) fn constructor_id(&self) -> u32 {
        match self {
            Self::Empty { .. } => ID_DOCUMENT_EMPTY,
            Self::Document(_) => ID_DOCUMENT,
        }
    }
}

impl Record for Document {
    const FAMILY: Family = Family::Document;

    fn from_entity(entity: Entity) -> Option<Self> {
        match entity {
            Entity::Document(d) => Some(d),
            _ => None,
        }
    }

    fn into_entity(self) -> Entity {
        Entity::Document(self)
    }
}

impl Serializable for Document {
    fn serialize(&self, buf: &mut impl Extend<u8>) {
        self.constructor_id().serialize(buf);
        match self {
            Self::Empty { id } => id.serialize(buf),
            Self::Document(d) => write_document(d, buf),
        }
    }
}

pub(crate) fn descriptors() -> [VariantDescriptor; 3] {
    [
        VariantDescriptor {
            id: ID_DOCUMENT_EMPTY,
            family: Family::Document,
            decode: decode_empty,
            encode: encode_empty,
        },
        VariantDescriptor {
            id: ID_DOCUMENT_V0,
            family: Family::Document,
            decode: decode_v0,
            encode: encode_v0,
        },
        VariantDescriptor {
            id: ID_DOCUMENT,
            family: Family::Document,
            decode: decode_document,
            encode: encode_document,
        },
    ]
}

fn decode_empty(_registry: &Registry, buf: Buffer) -> Result<Entity> {
    Ok(Entity::Document(Document::Empty { id: i64::deserialize(buf)? }))
}

fn encode_empty(entity: &Entity, out: &mut Vec<u8>) -> Option<()> {
    let Entity::Document(Document::Empty { id }) = entity else { return None };
    id.serialize(out);
    Some(())
}

fn decode_v0(_registry: &Registry, buf: Buffer) -> Result<Entity> {
    let id = i64::deserialize(buf)?;
    let access_hash = i64::deserialize(buf)?;
    let date = i32::deserialize(buf)?;
    let mime_type = String::deserialize(buf)?;
    let size = i32::deserialize(buf)? as i64;
    let thumb_widths = Vec::<i32>::deserialize(buf)?;
    let dc_id = i32::deserialize(buf)?;
    Ok(Entity::Document(Document::Document(DocumentInfo {
        id,
        access_hash,
        date,
        mime_type,
        size,
        thumb_widths,
        dc_id,
        ..DocumentInfo::default()
    })))
}

fn encode_v0(entity: &Entity, out: &mut Vec<u8>) -> Option<()> {
    let Entity::Document(Document::Document(d)) = entity else { return None };
    d.id.serialize(out);
    d.access_hash.serialize(out);
    d.date.serialize(out);
    d.mime_type.serialize(out);
    (d.size as i32).serialize(out);
    d.thumb_widths.serialize(out);
    d.dc_id.serialize(out);
    Some(())
}

fn decode_document(_registry: &Registry, buf: Buffer) -> Result<Entity> {
    let flags = Flags::deserialize(buf)?;
    let id = i64::deserialize(buf)?;
    let access_hash = i64::deserialize(buf)?;
    let file_reference = Vec::<u8>::deserialize(buf)?;
    let date = i32::deserialize(buf)?;
    let mime_type = String::deserialize(buf)?;
    let size = i64::deserialize(buf)?;
    let thumb_widths = Vec::<i32>::deserialize(buf)?;
    let video_duration = flags.read_if::<f64>(0x1, buf)?;
    let dc_id = i32::deserialize(buf)?;
    Ok(Entity::Document(Document::Document(DocumentInfo {
        id,
        access_hash,
        file_reference: Some(file_reference),
        date,
        mime_type,
        size,
        thumb_widths,
        video_duration,
        dc_id,
    })))
}

fn encode_document(entity: &Entity, out: &mut Vec<u8>) -> Option<()> {
    let Entity::Document(Document::Document(d)) = entity else { return None };
    write_document(d, out);
    Some(())
}

fn write_document(d: &DocumentInfo, buf: &mut impl Extend<u8>) {
    let mut flags = Flags::EMPTY;
    flags.set(0x1, d.video_duration.is_some());
    flags.serialize(buf);
    d.id.serialize(buf);
    d.access_hash.serialize(buf);
    d.file_reference.as_deref().unwrap_or_default().serialize(buf);
    d.date.serialize(buf);
    d.mime_type.serialize(buf);
    d.size.serialize(buf);
    d.thumb_widths.serialize(buf);
    d.video_duration.serialize(buf);
    d.dc_id.serialize(buf);
}
