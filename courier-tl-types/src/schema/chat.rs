//! Group chats and broadcast channels.
//!
//! `chat` kept its 32-bit IDs one layout longer than `user` did; the
//! flagless [`ID_CHAT_V0`] layout still circulates in archived payloads.

use crate::deserialize::{Buffer, Deserializable, Result};
use crate::flags::Flags;
use crate::registry::{Entity, Family, Record, Registry, VariantDescriptor};
use crate::serialize::Serializable;

/// `chatEmpty` constructor ID. Carries a 32-bit ID on the wire.
pub const ID_CHAT_EMPTY: u32 = 0x9ba2d800;
/// Flagless `chat` layout with 32-bit IDs.
pub const ID_CHAT_V0: u32 = 0x6e9c9bc7;
/// Current `chat` layout.
pub const ID_CHAT: u32 = 0x41cbf256;
/// `chatForbidden` constructor ID.
pub const ID_CHAT_FORBIDDEN: u32 = 0x6592a1a7;
/// `channel` constructor ID.
pub const ID_CHANNEL: u32 = 0xd31a961e;

/// A group, forbidden group, or broadcast channel.
#[derive(Clone, Debug, PartialEq)]
pub enum Chat {
    /// A group this client has no information about.
    Empty {
        /// The group's ID.
        id: i64,
    },
    /// A small group chat.
    Chat(ChatInfo),
    /// A group the current account was banned from.
    Forbidden {
        /// The group's ID.
        id: i64,
        /// Last known title.
        title: String,
    },
    /// A broadcast channel or supergroup.
    Channel(ChannelInfo),
}

/// The canonical `chat` record.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ChatInfo {
    /// The group's ID.
    pub id: i64,
    /// Title shown in the dialog list.
    pub title: String,
    /// ID of the group photo.
    pub photo_id: Option<i64>,
    /// Member count.
    pub participants_count: i32,
    /// Creation date (unix seconds).
    pub date: i32,
    /// Bumped whenever the participant list changes.
    pub version: i32,
    /// Whether the group was migrated away. Flags word only.
    pub deactivated: bool,
}

/// The canonical `channel` record.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ChannelInfo {
    /// The channel's ID.
    pub id: i64,
    /// Access hash proving this client may reference the channel.
    pub access_hash: Option<i64>,
    /// Title shown in the dialog list.
    pub title: String,
    /// Public username.
    pub username: Option<String>,
    /// Creation date (unix seconds).
    pub date: i32,
    /// Whether the channel is a supergroup. Flags word only.
    pub megagroup: bool,
    /// Whether the channel is verified. Flags word only.
    pub verified: bool,
}

impl Chat {
    pub(crate) fn constructor_id(&self) -> u32 {
        match self {
            Self::Empty { .. } => ID_CHAT_EMPTY,
            Self::Chat(_) => ID_CHAT,
            Self::Forbidden { .. } => ID_CHAT_FORBIDDEN,
            Self::Channel(_) => ID_CHANNEL,
        }
    }
}

impl Record for Chat {
    const FAMILY: Family = Family::Chat;

    fn from_entity(entity: Entity) -> Option<Self> {
        match entity {
            Entity::Chat(c) => Some(c),
            _ => None,
        }
    }

    fn into_entity(self) -> Entity {
        Entity::Chat(self)
    }
}

impl Serializable for Chat {
    fn serialize(&self, buf: &mut impl Extend<u8>) {
        self.constructor_id().serialize(buf);
        match self {
            Self::Empty { id } => (*id as i32).serialize(buf),
            Self::Chat(c) => write_chat(c, buf),
            Self::Forbidden { id, title } => {
                id.serialize(buf);
                title.serialize(buf);
            }
            Self::Channel(c) => write_channel(c, buf),
        }
    }
}

pub(crate) fn descriptors() -> [VariantDescriptor; 5] {
    [
        VariantDescriptor {
            id: ID_CHAT_EMPTY,
            family: Family::Chat,
            decode: decode_empty,
            encode: encode_empty,
        },
        VariantDescriptor {
            id: ID_CHAT_V0,
            family: Family::Chat,
            decode: decode_v0,
            encode: encode_v0,
        },
        VariantDescriptor {
            id: ID_CHAT,
            family: Family::Chat,
            decode: decode_chat,
            encode: encode_chat,
        },
        VariantDescriptor {
            id: ID_CHAT_FORBIDDEN,
            family: Family::Chat,
            decode: decode_forbidden,
            encode: encode_forbidden,
        },
        VariantDescriptor {
            id: ID_CHANNEL,
            family: Family::Chat,
            decode: decode_channel,
            encode: encode_channel,
        },
    ]
}

fn decode_empty(_registry: &Registry, buf: Buffer) -> Result<Entity> {
    Ok(Entity::Chat(Chat::Empty { id: i32::deserialize(buf)? as i64 }))
}

fn encode_empty(entity: &Entity, out: &mut Vec<u8>) -> Option<()> {
    let Entity::Chat(Chat::Empty { id }) = entity else { return None };
    (*id as i32).serialize(out);
    Some(())
}

fn decode_v0(_registry: &Registry, buf: Buffer) -> Result<Entity> {
    let id = i32::deserialize(buf)? as i64;
    let title = String::deserialize(buf)?;
    let participants_count = i32::deserialize(buf)?;
    let date = i32::deserialize(buf)?;
    let version = i32::deserialize(buf)?;
    Ok(Entity::Chat(Chat::Chat(ChatInfo {
        id,
        title,
        participants_count,
        date,
        version,
        ..ChatInfo::default()
    })))
}

fn encode_v0(entity: &Entity, out: &mut Vec<u8>) -> Option<()> {
    let Entity::Chat(Chat::Chat(c)) = entity else { return None };
    (c.id as i32).serialize(out);
    c.title.serialize(out);
    c.participants_count.serialize(out);
    c.date.serialize(out);
    c.version.serialize(out);
    Some(())
}

fn decode_chat(_registry: &Registry, buf: Buffer) -> Result<Entity> {
    let flags = Flags::deserialize(buf)?;
    let id = i64::deserialize(buf)?;
    let title = String::deserialize(buf)?;
    let photo_id = flags.read_if::<i64>(0x2, buf)?;
    let participants_count = i32::deserialize(buf)?;
    let date = i32::deserialize(buf)?;
    let version = i32::deserialize(buf)?;
    Ok(Entity::Chat(Chat::Chat(ChatInfo {
        id,
        title,
        photo_id,
        participants_count,
        date,
        version,
        deactivated: flags.contains(0x1),
    })))
}

fn encode_chat(entity: &Entity, out: &mut Vec<u8>) -> Option<()> {
    let Entity::Chat(Chat::Chat(c)) = entity else { return None };
    write_chat(c, out);
    Some(())
}

fn write_chat(c: &ChatInfo, buf: &mut impl Extend<u8>) {
    let mut flags = Flags::EMPTY;
    flags.set(0x1, c.deactivated);
    flags.set(0x2, c.photo_id.is_some());
    flags.serialize(buf);
    c.id.serialize(buf);
    c.title.serialize(buf);
    c.photo_id.serialize(buf);
    c.participants_count.serialize(buf);
    c.date.serialize(buf);
    c.version.serialize(buf);
}

fn decode_forbidden(_registry: &Registry, buf: Buffer) -> Result<Entity> {
    let id = i64::deserialize(buf)?;
    let title = String::deserialize(buf)?;
    Ok(Entity::Chat(Chat::Forbidden { id, title }))
}

fn encode_forbidden(entity: &Entity, out: &mut Vec<u8>) -> Option<()> {
    let Entity::Chat(Chat::Forbidden { id, title }) = entity else { return None };
    id.serialize(out);
    title.serialize(out);
    Some(())
}

fn decode_channel(_registry: &Registry, buf: Buffer) -> Result<Entity> {
    let flags = Flags::deserialize(buf)?;
    let id = i64::deserialize(buf)?;
    let access_hash = flags.read_if::<i64>(0x1, buf)?;
    let title = String::deserialize(buf)?;
    let username = flags.read_if::<String>(0x2, buf)?;
    let date = i32::deserialize(buf)?;
    Ok(Entity::Chat(Chat::Channel(ChannelInfo {
        id,
        access_hash,
        title,
        username,
        date,
        megagroup: flags.contains(0x4),
        verified: flags.contains(0x8),
    })))
}

fn encode_channel(entity: &Entity, out: &mut Vec<u8>) -> Option<()> {
    let Entity::Chat(Chat::Channel(c)) = entity else { return None };
    write_channel(c, out);
    Some(())
}

fn write_channel(c: &ChannelInfo, buf: &mut impl Extend<u8>) {
    let mut flags = Flags::EMPTY;
    flags.set(0x1, c.access_hash.is_some());
    flags.set(0x2, c.username.is_some());
    flags.set(0x4, c.megagroup);
    flags.set(0x8, c.verified);
    flags.serialize(buf);
    c.id.serialize(buf);
    c.access_hash.serialize(buf);
    c.title.serialize(buf);
    c.username.serialize(buf);
    c.date.serialize(buf);
}
