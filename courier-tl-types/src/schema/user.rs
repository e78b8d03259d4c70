//! User accounts.
//!
//! `user` is the most re-laid-out constructor in the catalog: four layouts
//! plus `userEmpty`, spanning the protocol's move from 32-bit to 64-bit IDs
//! and the introduction of flag-gated optional fields. All of them decode
//! into [`UserInfo`]; layouts that predate a field leave it unset.
//!
//! Current layout bit map (`flags:#`):
//!
//! | bit     | fields                                          |
//! |---------|-------------------------------------------------|
//! | `0x1`   | `access_hash`                                   |
//! | `0x2`   | `first_name`                                    |
//! | `0x4`   | `last_name`                                     |
//! | `0x8`   | `username`                                      |
//! | `0x10`  | `phone`                                         |
//! | `0x20`  | `bot_info_version` **and** `bot_inline_placeholder` |
//! | `0x40`  | `restriction_platform` **and** `restriction_reason` |
//! | `0x80`  | `verified` (no wire payload)                    |
//! | `0x100` | `photo_id`                                      |
//!
//! Bits `0x20` and `0x40` each gate two wire fields; the record models each
//! pair as a single `Option` so presence stays a single decision.

use crate::deserialize::{Buffer, Deserializable, Result};
use crate::flags::Flags;
use crate::registry::{Entity, Family, Record, Registry, VariantDescriptor};
use crate::serialize::Serializable;

/// `userEmpty` constructor ID.
pub const ID_USER_EMPTY: u32 = 0xd3bc4b7a;
/// Original flagless `user` layout: 32-bit ID, names and phone mandatory.
pub const ID_USER_V0: u32 = 0x720535ec;
/// First flagged layout, still 32-bit IDs.
pub const ID_USER_V1: u32 = 0xd10d979a;
/// 64-bit IDs, adds `photo_id`.
pub const ID_USER_V2: u32 = 0x938458c1;
/// Current `user` layout.
pub const ID_USER: u32 = 0xabb5f120;

/// A user account.
#[derive(Clone, Debug, PartialEq)]
pub enum User {
    /// A deleted or otherwise inaccessible account; only the ID survives.
    Empty {
        /// The user's ID.
        id: i64,
    },
    /// A full account record.
    Full(UserInfo),
}

/// The canonical `user` record all historical layouts converge on.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct UserInfo {
    /// The user's ID.
    pub id: i64,
    /// Access hash proving this client may reference the user.
    pub access_hash: Option<i64>,
    /// First name.
    pub first_name: Option<String>,
    /// Last name.
    pub last_name: Option<String>,
    /// Public username.
    pub username: Option<String>,
    /// Phone number.
    pub phone: Option<String>,
    /// Bot metadata; present iff the account is a bot.
    pub bot: Option<BotInfo>,
    /// Why (and where) the account is restricted, if it is.
    pub restriction: Option<Restriction>,
    /// Whether the account is verified. Carried in the flags word only.
    pub verified: bool,
    /// ID of the current profile photo.
    pub photo_id: Option<i64>,
}

/// Bot fields gated together by one flag bit.
#[derive(Clone, Debug, PartialEq)]
pub struct BotInfo {
    /// Version of the bot's command/info description.
    pub version: i32,
    /// Placeholder shown in the inline-query input field.
    pub inline_placeholder: String,
}

/// Restriction fields gated together by one flag bit.
#[derive(Clone, Debug, PartialEq)]
pub struct Restriction {
    /// Platform the restriction applies to.
    pub platform: String,
    /// Human-readable reason.
    pub reason: String,
}

impl User {
    pub(crate) fn constructor_id(&self) -> u32 {
        match self {
            Self::Empty { .. } => ID_USER_EMPTY,
            Self::Full(_) => ID_USER,
        }
    }
}

impl Record for User {
    const FAMILY: Family = Family::User;

    fn from_entity(entity: Entity) -> Option<Self> {
        match entity {
            Entity::User(u) => Some(u),
            _ => None,
        }
    }

    fn into_entity(self) -> Entity {
        Entity::User(self)
    }
}

impl Serializable for User {
    fn serialize(&self, buf: &mut impl Extend<u8>) {
        self.constructor_id().serialize(buf);
        match self {
            Self::Empty { id } => id.serialize(buf),
            Self::Full(u) => write_user(u, buf),
        }
    }
}

pub(crate) fn descriptors() -> [VariantDescriptor; 5] {
    [
        VariantDescriptor {
            id: ID_USER_EMPTY,
            family: Family::User,
            decode: decode_empty,
            encode: encode_empty,
        },
        VariantDescriptor {
            id: ID_USER_V0,
            family: Family::User,
            decode: decode_v0,
            encode: encode_v0,
        },
        VariantDescriptor {
            id: ID_USER_V1,
            family: Family::User,
            decode: decode_v1,
            encode: encode_v1,
        },
        VariantDescriptor {
            id: ID_USER_V2,
            family: Family::User,
            decode: decode_v2,
            encode: encode_v2,
        },
        VariantDescriptor {
            id: ID_USER,
            family: Family::User,
            decode: decode_user,
            encode: encode_user,
        },
    ]
}

// ── Current layout ────────────────────────────────────────────────────────────

fn decode_user(_registry: &Registry, buf: Buffer) -> Result<Entity> {
    let flags = Flags::deserialize(buf)?;
    let id = i64::deserialize(buf)?;
    let access_hash = flags.read_if::<i64>(0x1, buf)?;
    let first_name = flags.read_if::<String>(0x2, buf)?;
    let last_name = flags.read_if::<String>(0x4, buf)?;
    let username = flags.read_if::<String>(0x8, buf)?;
    let phone = flags.read_if::<String>(0x10, buf)?;
    // One bit, two fields: read both or neither.
    let bot = if flags.contains(0x20) {
        Some(BotInfo {
            version: i32::deserialize(buf)?,
            inline_placeholder: String::deserialize(buf)?,
        })
    } else {
        None
    };
    let restriction = if flags.contains(0x40) {
        Some(Restriction {
            platform: String::deserialize(buf)?,
            reason: String::deserialize(buf)?,
        })
    } else {
        None
    };
    let photo_id = flags.read_if::<i64>(0x100, buf)?;
    Ok(Entity::User(User::Full(UserInfo {
        id,
        access_hash,
        first_name,
        last_name,
        username,
        phone,
        bot,
        restriction,
        verified: flags.contains(0x80),
        photo_id,
    })))
}

fn encode_user(entity: &Entity, out: &mut Vec<u8>) -> Option<()> {
    let Entity::User(User::Full(u)) = entity else { return None };
    write_user(u, out);
    Some(())
}

fn write_user(u: &UserInfo, buf: &mut impl Extend<u8>) {
    let mut flags = Flags::EMPTY;
    flags.set(0x1, u.access_hash.is_some());
    flags.set(0x2, u.first_name.is_some());
    flags.set(0x4, u.last_name.is_some());
    flags.set(0x8, u.username.is_some());
    flags.set(0x10, u.phone.is_some());
    flags.set(0x20, u.bot.is_some());
    flags.set(0x40, u.restriction.is_some());
    flags.set(0x80, u.verified);
    flags.set(0x100, u.photo_id.is_some());
    flags.serialize(buf);
    u.id.serialize(buf);
    u.access_hash.serialize(buf);
    u.first_name.serialize(buf);
    u.last_name.serialize(buf);
    u.username.serialize(buf);
    u.phone.serialize(buf);
    if let Some(bot) = &u.bot {
        bot.version.serialize(buf);
        bot.inline_placeholder.serialize(buf);
    }
    if let Some(r) = &u.restriction {
        r.platform.serialize(buf);
        r.reason.serialize(buf);
    }
    u.photo_id.serialize(buf);
}

// ── userEmpty ─────────────────────────────────────────────────────────────────

fn decode_empty(_registry: &Registry, buf: Buffer) -> Result<Entity> {
    Ok(Entity::User(User::Empty { id: i64::deserialize(buf)? }))
}

fn encode_empty(entity: &Entity, out: &mut Vec<u8>) -> Option<()> {
    let Entity::User(User::Empty { id }) = entity else { return None };
    id.serialize(out);
    Some(())
}

// ── Historical layouts ────────────────────────────────────────────────────────

fn decode_v0(_registry: &Registry, buf: Buffer) -> Result<Entity> {
    let id = i32::deserialize(buf)? as i64;
    let first_name = String::deserialize(buf)?;
    let last_name = String::deserialize(buf)?;
    let phone = String::deserialize(buf)?;
    Ok(Entity::User(User::Full(UserInfo {
        id,
        first_name: Some(first_name),
        last_name: Some(last_name),
        phone: Some(phone),
        ..UserInfo::default()
    })))
}

fn encode_v0(entity: &Entity, out: &mut Vec<u8>) -> Option<()> {
    let Entity::User(User::Full(u)) = entity else { return None };
    (u.id as i32).serialize(out);
    u.first_name.as_deref().unwrap_or("").serialize(out);
    u.last_name.as_deref().unwrap_or("").serialize(out);
    u.phone.as_deref().unwrap_or("").serialize(out);
    Some(())
}

fn decode_v1(_registry: &Registry, buf: Buffer) -> Result<Entity> {
    let flags = Flags::deserialize(buf)?;
    let id = i32::deserialize(buf)? as i64;
    let access_hash = flags.read_if::<i64>(0x1, buf)?;
    let first_name = flags.read_if::<String>(0x2, buf)?;
    let last_name = flags.read_if::<String>(0x4, buf)?;
    let username = flags.read_if::<String>(0x8, buf)?;
    let phone = flags.read_if::<String>(0x10, buf)?;
    Ok(Entity::User(User::Full(UserInfo {
        id,
        access_hash,
        first_name,
        last_name,
        username,
        phone,
        ..UserInfo::default()
    })))
}

fn encode_v1(entity: &Entity, out: &mut Vec<u8>) -> Option<()> {
    let Entity::User(User::Full(u)) = entity else { return None };
    let mut flags = Flags::EMPTY;
    flags.set(0x1, u.access_hash.is_some());
    flags.set(0x2, u.first_name.is_some());
    flags.set(0x4, u.last_name.is_some());
    flags.set(0x8, u.username.is_some());
    flags.set(0x10, u.phone.is_some());
    flags.serialize(out);
    (u.id as i32).serialize(out);
    u.access_hash.serialize(out);
    u.first_name.serialize(out);
    u.last_name.serialize(out);
    u.username.serialize(out);
    u.phone.serialize(out);
    Some(())
}

fn decode_v2(_registry: &Registry, buf: Buffer) -> Result<Entity> {
    let flags = Flags::deserialize(buf)?;
    let id = i64::deserialize(buf)?;
    let access_hash = flags.read_if::<i64>(0x1, buf)?;
    let first_name = flags.read_if::<String>(0x2, buf)?;
    let last_name = flags.read_if::<String>(0x4, buf)?;
    let username = flags.read_if::<String>(0x8, buf)?;
    let phone = flags.read_if::<String>(0x10, buf)?;
    let photo_id = flags.read_if::<i64>(0x100, buf)?;
    Ok(Entity::User(User::Full(UserInfo {
        id,
        access_hash,
        first_name,
        last_name,
        username,
        phone,
        photo_id,
        ..UserInfo::default()
    })))
}

fn encode_v2(entity: &Entity, out: &mut Vec<u8>) -> Option<()> {
    let Entity::User(User::Full(u)) = entity else { return None };
    let mut flags = Flags::EMPTY;
    flags.set(0x1, u.access_hash.is_some());
    flags.set(0x2, u.first_name.is_some());
    flags.set(0x4, u.last_name.is_some());
    flags.set(0x8, u.username.is_some());
    flags.set(0x10, u.phone.is_some());
    flags.set(0x100, u.photo_id.is_some());
    flags.serialize(out);
    u.id.serialize(out);
    u.access_hash.serialize(out);
    u.first_name.serialize(out);
    u.last_name.serialize(out);
    u.username.serialize(out);
    u.phone.serialize(out);
    u.photo_id.serialize(out);
    Some(())
}
