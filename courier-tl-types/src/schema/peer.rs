//! Dialog peer references.

use crate::deserialize::{Buffer, Deserializable, Result};
use crate::registry::{Entity, Family, Record, Registry, VariantDescriptor};
use crate::serialize::Serializable;

/// `peerUser` constructor ID.
pub const ID_PEER_USER: u32 = 0x9db1bc6d;
/// `peerChat` constructor ID.
pub const ID_PEER_CHAT: u32 = 0xbad0e5bb;
/// `peerChannel` constructor ID.
pub const ID_PEER_CHANNEL: u32 = 0xbddde532;

/// Identifies the other side of a dialog.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Peer {
    /// A private conversation with a user.
    User {
        /// The user's ID.
        user_id: i64,
    },
    /// A small group chat.
    Chat {
        /// The group's ID.
        chat_id: i64,
    },
    /// A broadcast channel or supergroup.
    Channel {
        /// The channel's ID.
        channel_id: i64,
    },
}

impl Peer {
    pub(crate) fn constructor_id(&self) -> u32 {
        match self {
            Self::User { .. } => ID_PEER_USER,
            Self::Chat { .. } => ID_PEER_CHAT,
            Self::Channel { .. } => ID_PEER_CHANNEL,
        }
    }
}

impl Record for Peer {
    const FAMILY: Family = Family::Peer;

    fn from_entity(entity: Entity) -> Option<Self> {
        match entity {
            Entity::Peer(p) => Some(p),
            _ => None,
        }
    }

    fn into_entity(self) -> Entity {
        Entity::Peer(self)
    }
}

impl Serializable for Peer {
    fn serialize(&self, buf: &mut impl Extend<u8>) {
        self.constructor_id().serialize(buf);
        match self {
            Self::User { user_id } => user_id.serialize(buf),
            Self::Chat { chat_id } => chat_id.serialize(buf),
            Self::Channel { channel_id } => channel_id.serialize(buf),
        }
    }
}

pub(crate) fn descriptors() -> [VariantDescriptor; 3] {
    [
        VariantDescriptor {
            id: ID_PEER_USER,
            family: Family::Peer,
            decode: decode_user,
            encode: encode_user,
        },
        VariantDescriptor {
            id: ID_PEER_CHAT,
            family: Family::Peer,
            decode: decode_chat,
            encode: encode_chat,
        },
        VariantDescriptor {
            id: ID_PEER_CHANNEL,
            family: Family::Peer,
            decode: decode_channel,
            encode: encode_channel,
        },
    ]
}

fn decode_user(_registry: &Registry, buf: Buffer) -> Result<Entity> {
    Ok(Entity::Peer(Peer::User { user_id: i64::deserialize(buf)? }))
}

fn decode_chat(_registry: &Registry, buf: Buffer) -> Result<Entity> {
    Ok(Entity::Peer(Peer::Chat { chat_id: i64::deserialize(buf)? }))
}

fn decode_channel(_registry: &Registry, buf: Buffer) -> Result<Entity> {
    Ok(Entity::Peer(Peer::Channel { channel_id: i64::deserialize(buf)? }))
}

fn encode_user(entity: &Entity, out: &mut Vec<u8>) -> Option<()> {
    let Entity::Peer(Peer::User { user_id }) = entity else { return None };
    user_id.serialize(out);
    Some(())
}

fn encode_chat(entity: &Entity, out: &mut Vec<u8>) -> Option<()> {
    let Entity::Peer(Peer::Chat { chat_id }) = entity else { return None };
    chat_id.serialize(out);
    Some(())
}

fn encode_channel(entity: &Entity, out: &mut Vec<u8>) -> Option<()> {
    let Entity::Peer(Peer::Channel { channel_id }) = entity else { return None };
    channel_id.serialize(out);
    Some(())
}
