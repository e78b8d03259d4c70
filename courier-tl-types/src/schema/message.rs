//! Messages and the formatting entities inside them.
//!
//! `message` exercises the two polymorphic nesting shapes: a flag-gated
//! nested entity (`from_id`, any [`Peer`] constructor) and a vector whose
//! elements each carry their own constructor ID (`entities`).

use crate::deserialize::{Buffer, Deserializable, Result};
use crate::flags::Flags;
use crate::registry::{Entity, Family, Record, Registry, VariantDescriptor};
use crate::schema::Peer;
use crate::serialize::Serializable;

/// `messageEmpty` constructor ID.
pub const ID_MESSAGE_EMPTY: u32 = 0x83e5de54;
/// Flagless `message` layout: sender always present, no metadata.
pub const ID_MESSAGE_V0: u32 = 0x22eb6aba;
/// Current `message` layout.
pub const ID_MESSAGE: u32 = 0x94345242;

/// `messageEntityBold` constructor ID.
pub const ID_ENTITY_BOLD: u32 = 0xbd610bc9;
/// `messageEntityItalic` constructor ID.
pub const ID_ENTITY_ITALIC: u32 = 0x826f8b60;
/// `messageEntityUrl` constructor ID.
pub const ID_ENTITY_URL: u32 = 0x6ed02538;

/// A message in a dialog.
#[derive(Clone, Debug, PartialEq)]
pub enum Message {
    /// A hole in the history; only the ID survives.
    Empty {
        /// The message's ID.
        id: i32,
    },
    /// A full message record.
    Message(MessageInfo),
}

/// The canonical `message` record.
#[derive(Clone, Debug, PartialEq)]
pub struct MessageInfo {
    /// The message's ID, scoped to the dialog.
    pub id: i32,
    /// Whether the current account sent it. Flags word only.
    pub outgoing: bool,
    /// Sender; absent for anonymous channel posts.
    pub from_id: Option<Peer>,
    /// The dialog the message was sent to.
    pub peer_id: Peer,
    /// Send date (unix seconds).
    pub date: i32,
    /// Message text.
    pub message: String,
    /// Formatting entities over the text.
    pub entities: Option<Vec<MessageEntity>>,
    /// View counter, channels only.
    pub views: Option<i32>,
    /// Last edit date.
    pub edit_date: Option<i32>,
}

/// One formatting run over a span of message text.
#[derive(Clone, Debug, PartialEq)]
pub enum MessageEntity {
    /// Bold text.
    Bold {
        /// Offset of the run, in UTF-16 code units.
        offset: i32,
        /// Length of the run.
        length: i32,
    },
    /// Italic text.
    Italic {
        /// Offset of the run.
        offset: i32,
        /// Length of the run.
        length: i32,
    },
    /// A link whose target differs from the spanned text.
    Url {
        /// Offset of the run.
        offset: i32,
        /// Length of the run.
        length: i32,
        /// The link target.
        url: String,
    },
}

impl Message {
    pub(crate) fn constructor_id(&self) -> u32 {
        match self {
            Self::Empty { .. } => ID_MESSAGE_EMPTY,
            Self::Message(_) => ID_MESSAGE,
        }
    }
}

impl MessageEntity {
    pub(crate) fn constructor_id(&self) -> u32 {
        match self {
            Self::Bold { .. } => ID_ENTITY_BOLD,
            Self::Italic { .. } => ID_ENTITY_ITALIC,
            Self::Url { .. } => ID_ENTITY_URL,
        }
    }
}

impl Record for Message {
    const FAMILY: Family = Family::Message;

    fn from_entity(entity: Entity) -> Option<Self> {
        match entity {
            Entity::Message(m) => Some(m),
            _ => None,
        }
    }

    fn into_entity(self) -> Entity {
        Entity::Message(self)
    }
}

impl Record for MessageEntity {
    const FAMILY: Family = Family::MessageEntity;

    fn from_entity(entity: Entity) -> Option<Self> {
        match entity {
            Entity::MessageEntity(e) => Some(e),
            _ => None,
        }
    }

    fn into_entity(self) -> Entity {
        Entity::MessageEntity(self)
    }
}

impl Serializable for Message {
    fn serialize(&self, buf: &mut impl Extend<u8>) {
        self.constructor_id().serialize(buf);
        match self {
            Self::Empty { id } => id.serialize(buf),
            Self::Message(m) => write_message(m, buf),
        }
    }
}

impl Serializable for MessageEntity {
    fn serialize(&self, buf: &mut impl Extend<u8>) {
        self.constructor_id().serialize(buf);
        match self {
            Self::Bold { offset, length } | Self::Italic { offset, length } => {
                offset.serialize(buf);
                length.serialize(buf);
            }
            Self::Url { offset, length, url } => {
                offset.serialize(buf);
                length.serialize(buf);
                url.serialize(buf);
            }
        }
    }
}

pub(crate) fn descriptors() -> [VariantDescriptor; 6] {
    [
        VariantDescriptor {
            id: ID_MESSAGE_EMPTY,
            family: Family::Message,
            decode: decode_empty,
            encode: encode_empty,
        },
        VariantDescriptor {
            id: ID_MESSAGE_V0,
            family: Family::Message,
            decode: decode_v0,
            encode: encode_v0,
        },
        VariantDescriptor {
            id: ID_MESSAGE,
            family: Family::Message,
            decode: decode_message,
            encode: encode_message,
        },
        VariantDescriptor {
            id: ID_ENTITY_BOLD,
            family: Family::MessageEntity,
            decode: decode_bold,
            encode: encode_bold,
        },
        VariantDescriptor {
            id: ID_ENTITY_ITALIC,
            family: Family::MessageEntity,
            decode: decode_italic,
            encode: encode_italic,
        },
        VariantDescriptor {
            id: ID_ENTITY_URL,
            family: Family::MessageEntity,
            decode: decode_url,
            encode: encode_url,
        },
    ]
}

// ── message ───────────────────────────────────────────────────────────────────

fn decode_empty(_registry: &Registry, buf: Buffer) -> Result<Entity> {
    Ok(Entity::Message(Message::Empty { id: i32::deserialize(buf)? }))
}

fn encode_empty(entity: &Entity, out: &mut Vec<u8>) -> Option<()> {
    let Entity::Message(Message::Empty { id }) = entity else { return None };
    id.serialize(out);
    Some(())
}

fn decode_v0(registry: &Registry, buf: Buffer) -> Result<Entity> {
    let id = i32::deserialize(buf)?;
    let from_id = registry.decode_as::<Peer>(buf)?;
    let peer_id = registry.decode_as::<Peer>(buf)?;
    let date = i32::deserialize(buf)?;
    let message = String::deserialize(buf)?;
    Ok(Entity::Message(Message::Message(MessageInfo {
        id,
        outgoing: false,
        from_id: Some(from_id),
        peer_id,
        date,
        message,
        entities: None,
        views: None,
        edit_date: None,
    })))
}

fn encode_v0(entity: &Entity, out: &mut Vec<u8>) -> Option<()> {
    let Entity::Message(Message::Message(m)) = entity else { return None };
    // The sender slot predates anonymous posts; fall back to the dialog.
    let from_id = m.from_id.unwrap_or(m.peer_id);
    m.id.serialize(out);
    from_id.serialize(out);
    m.peer_id.serialize(out);
    m.date.serialize(out);
    m.message.serialize(out);
    Some(())
}

fn decode_message(registry: &Registry, buf: Buffer) -> Result<Entity> {
    let flags = Flags::deserialize(buf)?;
    let id = i32::deserialize(buf)?;
    let from_id = if flags.contains(0x1) {
        Some(registry.decode_as::<Peer>(buf)?)
    } else {
        None
    };
    let peer_id = registry.decode_as::<Peer>(buf)?;
    let date = i32::deserialize(buf)?;
    let message = String::deserialize(buf)?;
    let entities = if flags.contains(0x2) {
        Some(registry.decode_vec::<MessageEntity>(buf)?)
    } else {
        None
    };
    let views = flags.read_if::<i32>(0x4, buf)?;
    let edit_date = flags.read_if::<i32>(0x8, buf)?;
    Ok(Entity::Message(Message::Message(MessageInfo {
        id,
        outgoing: flags.contains(0x10),
        from_id,
        peer_id,
        date,
        message,
        entities,
        views,
        edit_date,
    })))
}

fn encode_message(entity: &Entity, out: &mut Vec<u8>) -> Option<()> {
    let Entity::Message(Message::Message(m)) = entity else { return None };
    write_message(m, out);
    Some(())
}

fn write_message(m: &MessageInfo, buf: &mut impl Extend<u8>) {
    let mut flags = Flags::EMPTY;
    flags.set(0x1, m.from_id.is_some());
    flags.set(0x2, m.entities.is_some());
    flags.set(0x4, m.views.is_some());
    flags.set(0x8, m.edit_date.is_some());
    flags.set(0x10, m.outgoing);
    flags.serialize(buf);
    m.id.serialize(buf);
    m.from_id.serialize(buf);
    m.peer_id.serialize(buf);
    m.date.serialize(buf);
    m.message.serialize(buf);
    m.entities.serialize(buf);
    m.views.serialize(buf);
    m.edit_date.serialize(buf);
}

// ── message entities ──────────────────────────────────────────────────────────

fn decode_bold(_registry: &Registry, buf: Buffer) -> Result<Entity> {
    Ok(Entity::MessageEntity(MessageEntity::Bold {
        offset: i32::deserialize(buf)?,
        length: i32::deserialize(buf)?,
    }))
}

fn encode_bold(entity: &Entity, out: &mut Vec<u8>) -> Option<()> {
    let Entity::MessageEntity(MessageEntity::Bold { offset, length }) = entity else {
        return None;
    };
    offset.serialize(out);
    length.serialize(out);
    Some(())
}

fn decode_italic(_registry: &Registry, buf: Buffer) -> Result<Entity> {
    Ok(Entity::MessageEntity(MessageEntity::Italic {
        offset: i32::deserialize(buf)?,
        length: i32::deserialize(buf)?,
    }))
}

fn encode_italic(entity: &Entity, out: &mut Vec<u8>) -> Option<()> {
    let Entity::MessageEntity(MessageEntity::Italic { offset, length }) = entity else {
        return None;
    };
    offset.serialize(out);
    length.serialize(out);
    Some(())
}

fn decode_url(_registry: &Registry, buf: Buffer) -> Result<Entity> {
    Ok(Entity::MessageEntity(MessageEntity::Url {
        offset: i32::deserialize(buf)?,
        length: i32::deserialize(buf)?,
        url: String::deserialize(buf)?,
    }))
}

fn encode_url(entity: &Entity, out: &mut Vec<u8>) -> Option<()> {
    let Entity::MessageEntity(MessageEntity::Url { offset, length, url }) = entity else {
        return None;
    };
    offset.serialize(out);
    length.serialize(out);
    url.serialize(out);
    Some(())
}
