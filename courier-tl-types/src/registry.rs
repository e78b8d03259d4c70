//! The variant registry: discriminator → decode/encode dispatch.
//!
//! Every wire layout is identified by a 32-bit constructor ID, unique across
//! the whole registry. The registry is built once at startup from the schema
//! catalog and never mutated afterwards, so `&Registry` can be shared across
//! threads freely; there is no interior mutability anywhere in the codec.
//!
//! A logical entity accumulates constructor IDs over the protocol's history
//! as fields come and go. Each historical layout gets its own independent
//! decode and encode routine; all of them converge on one canonical record
//! (see the [`crate::schema`] modules). There is no layout-to-layout reuse.

use std::collections::HashMap;
use std::fmt;

use crate::deserialize::{Buffer, Deserializable, Error, Result};
use crate::schema::{Chat, Document, FileChunk, Message, MessageEntity, Peer, RpcError, User};
use crate::Identifiable;

// ─── Families ────────────────────────────────────────────────────────────────

/// The logical entity families known to the built-in catalog.
///
/// A *family* is the declared type of a field; open dispatch accepts any
/// registered constructor belonging to the field's family.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Family {
    /// A dialog peer reference.
    Peer,
    /// A user account.
    User,
    /// A group, forbidden group, or broadcast channel.
    Chat,
    /// A message.
    Message,
    /// A formatting entity inside message text.
    MessageEntity,
    /// An uploaded document.
    Document,
    /// One chunk of a file download.
    FileChunk,
    /// An RPC-level error response.
    RpcError,
}

impl fmt::Display for Family {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Peer => "Peer",
            Self::User => "User",
            Self::Chat => "Chat",
            Self::Message => "Message",
            Self::MessageEntity => "MessageEntity",
            Self::Document => "Document",
            Self::FileChunk => "FileChunk",
            Self::RpcError => "RpcError",
        };
        f.write_str(name)
    }
}

// ─── Entity ──────────────────────────────────────────────────────────────────

/// A decoded protocol entity: the tagged union over all families.
///
/// Values are created fresh by each decode call and owned by the caller.
#[derive(Clone, Debug, PartialEq)]
pub enum Entity {
    /// See [`Peer`].
    Peer(Peer),
    /// See [`User`].
    User(User),
    /// See [`Chat`].
    Chat(Chat),
    /// See [`Message`].
    Message(Message),
    /// See [`MessageEntity`].
    MessageEntity(MessageEntity),
    /// See [`Document`].
    Document(Document),
    /// See [`FileChunk`].
    FileChunk(FileChunk),
    /// See [`RpcError`].
    RpcError(RpcError),
}

impl Entity {
    /// The family this entity belongs to.
    pub fn family(&self) -> Family {
        match self {
            Self::Peer(_) => Family::Peer,
            Self::User(_) => Family::User,
            Self::Chat(_) => Family::Chat,
            Self::Message(_) => Family::Message,
            Self::MessageEntity(_) => Family::MessageEntity,
            Self::Document(_) => Family::Document,
            Self::FileChunk(_) => Family::FileChunk,
            Self::RpcError(_) => Family::RpcError,
        }
    }

    /// The constructor ID of the *current* layout for this entity.
    ///
    /// Historical layouts can still be emitted through
    /// [`Registry::encode_as`].
    pub fn constructor_id(&self) -> u32 {
        match self {
            Self::Peer(p) => p.constructor_id(),
            Self::User(u) => u.constructor_id(),
            Self::Chat(c) => c.constructor_id(),
            Self::Message(m) => m.constructor_id(),
            Self::MessageEntity(e) => e.constructor_id(),
            Self::Document(d) => d.constructor_id(),
            Self::FileChunk(_) => FileChunk::CONSTRUCTOR_ID,
            Self::RpcError(_) => RpcError::CONSTRUCTOR_ID,
        }
    }
}

/// A family record that can be extracted from (and wrapped back into) an
/// [`Entity`]. Implemented by every schema family type; lets callers decode
/// straight into the concrete type with [`Registry::decode_as`].
pub trait Record: Sized {
    /// The family all of this record's constructors belong to.
    const FAMILY: Family;

    /// Unwrap an entity of the right family; `None` on any other family.
    fn from_entity(entity: Entity) -> Option<Self>;

    /// Wrap the record back into the union.
    fn into_entity(self) -> Entity;
}

// ─── Descriptors ─────────────────────────────────────────────────────────────

/// Decode routine for one wire layout. Receives the registry so nested
/// polymorphic fields can be dispatched, and continues consuming the same
/// cursor the discriminator was read from.
pub type DecodeFn = fn(&Registry, Buffer<'_, '_>) -> Result<Entity>;

/// Encode routine for one wire layout. Writes the layout's fields (without
/// the leading constructor ID) and returns `None` if the entity is not the
/// semantic variant this layout encodes.
pub type EncodeFn = fn(&Entity, &mut Vec<u8>) -> Option<()>;

/// One registered wire layout. Immutable once registered.
#[derive(Clone, Copy)]
pub struct VariantDescriptor {
    /// The layout's constructor ID.
    pub id: u32,
    /// The family the layout decodes into.
    pub family: Family,
    /// Field-list decoder.
    pub decode: DecodeFn,
    /// Field-list encoder.
    pub encode: EncodeFn,
}

impl fmt::Debug for VariantDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VariantDescriptor")
            .field("id", &format_args!("{:#010x}", self.id))
            .field("family", &self.family)
            .finish()
    }
}

// ─── Dispatch parameters ─────────────────────────────────────────────────────

/// What the caller expects at the next wire position.
#[derive(Clone, Copy, Debug)]
pub enum Expected {
    /// Open dispatch: any registered constructor of this family.
    Any(Family),
    /// Closed check: exactly this constructor ID.
    Exactly(u32),
}

/// Failure policy for unresolvable or mismatched discriminators.
///
/// Truncation and vector-header corruption are hard errors in both modes;
/// a record is either fully decoded or not returned at all.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    /// Fail the decode call on the first unresolvable discriminator.
    Strict,
    /// Return an explicit `None` sentinel instead, letting the caller
    /// decide whether to abort the enclosing decode.
    Lenient,
}

// ─── Encode errors ───────────────────────────────────────────────────────────

/// Errors surfaced when encoding through the registry.
///
/// Both variants are contract violations on the caller's side; a
/// well-formed entity encoded with its own constructor cannot fail.
#[derive(Clone, Debug, PartialEq)]
pub enum EncodeError {
    /// The requested constructor ID is not registered.
    UnknownDiscriminator {
        /// The unresolvable constructor ID.
        id: u32,
    },
    /// The layout exists but does not encode this entity's variant.
    VariantMismatch {
        /// The requested constructor ID.
        id: u32,
        /// The family of the entity that was passed in.
        family: Family,
    },
}

impl fmt::Display for EncodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownDiscriminator { id } => {
                write!(f, "unknown constructor id: {id:#010x}")
            }
            Self::VariantMismatch { id, family } => {
                write!(f, "constructor {id:#010x} cannot encode a {family} entity")
            }
        }
    }
}

impl std::error::Error for EncodeError {}

// ─── Registry ────────────────────────────────────────────────────────────────

/// Maps constructor IDs to their decode/encode routines.
///
/// Build once at startup (see [`crate::schema::registry`] for the built-in
/// catalog), then share `&Registry` with every decode call.
pub struct Registry {
    variants: HashMap<u32, VariantDescriptor>,
}

impl Registry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self { variants: HashMap::new() }
    }

    /// Register one wire layout.
    ///
    /// Constructor IDs are unique registry-wide; on a collision the previous
    /// descriptor is displaced and returned so schema loaders can detect
    /// catalog mistakes.
    pub fn register(&mut self, descriptor: VariantDescriptor) -> Option<VariantDescriptor> {
        self.variants.insert(descriptor.id, descriptor)
    }

    /// Look up the descriptor for a constructor ID.
    pub fn resolve(&self, id: u32) -> Option<&VariantDescriptor> {
        self.variants.get(&id)
    }

    /// Number of registered layouts.
    pub fn len(&self) -> usize {
        self.variants.len()
    }

    /// Whether no layouts are registered.
    pub fn is_empty(&self) -> bool {
        self.variants.is_empty()
    }

    // ── Decoding ─────────────────────────────────────────────────────────────

    /// Decode one entity, failing hard on any unresolvable discriminator.
    ///
    /// Reads the 4-byte constructor ID, resolves it against `expected`, and
    /// runs the layout's field-list decoder on the same cursor. A registered
    /// ID belonging to a different family than an open dispatch expects is
    /// just as unknown as an unregistered one.
    pub fn decode_required(&self, buf: Buffer, expected: Expected) -> Result<Entity> {
        let id = u32::deserialize(buf)?;
        let descriptor = match expected {
            Expected::Exactly(want) => {
                if id != want {
                    return Err(Error::DiscriminatorMismatch { expected: want, found: id });
                }
                self.resolve(id).ok_or(Error::UnknownDiscriminator { id })?
            }
            Expected::Any(family) => match self.resolve(id) {
                Some(d) if d.family == family => d,
                _ => return Err(Error::UnknownDiscriminator { id }),
            },
        };
        (descriptor.decode)(self, buf)
    }

    /// Decode one entity under the given failure policy.
    ///
    /// In [`Mode::Lenient`], an unknown or mismatched discriminator
    /// (anywhere in the entity, including nested fields) yields `Ok(None)`:
    /// an explicit "could not resolve" sentinel, never a partially
    /// populated record. Truncation and vector-header corruption remain
    /// errors in both modes. The cursor position after a lenient `None` is
    /// unspecified.
    pub fn decode_entity(
        &self,
        buf: Buffer,
        expected: Expected,
        mode: Mode,
    ) -> Result<Option<Entity>> {
        match self.decode_required(buf, expected) {
            Ok(entity) => Ok(Some(entity)),
            Err(Error::UnknownDiscriminator { .. } | Error::DiscriminatorMismatch { .. })
                if mode == Mode::Lenient =>
            {
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    /// Open dispatch straight into a concrete family type.
    pub fn decode_as<T: Record>(&self, buf: Buffer) -> Result<T> {
        let id = u32::deserialize(buf)?;
        let entity = match self.resolve(id) {
            Some(d) if d.family == T::FAMILY => (d.decode)(self, buf)?,
            _ => return Err(Error::UnknownDiscriminator { id }),
        };
        T::from_entity(entity).ok_or(Error::UnknownDiscriminator { id })
    }

    /// Closed check for a single-constructor family type: the wire tag must
    /// equal `T::CONSTRUCTOR_ID`.
    pub fn decode_exactly<T: Record + Identifiable>(&self, buf: Buffer) -> Result<T> {
        let id = u32::deserialize(buf)?;
        if id != T::CONSTRUCTOR_ID {
            return Err(Error::DiscriminatorMismatch { expected: T::CONSTRUCTOR_ID, found: id });
        }
        let descriptor = self.resolve(id).ok_or(Error::UnknownDiscriminator { id })?;
        let entity = (descriptor.decode)(self, buf)?;
        T::from_entity(entity).ok_or(Error::UnknownDiscriminator { id })
    }

    /// Decode a `Vector` of polymorphic entities; each element carries its
    /// own constructor ID.
    pub fn decode_vec<T: Record>(&self, buf: Buffer) -> Result<Vec<T>> {
        let magic = u32::deserialize(buf)?;
        if magic != 0x1cb5c415 {
            return Err(Error::VectorMagic { found: magic });
        }
        let len = i32::deserialize(buf)?;
        if len < 0 || len as usize > buf.remaining() {
            return Err(Error::Truncated);
        }
        (0..len).map(|_| self.decode_as::<T>(buf)).collect()
    }

    // ── Encoding ─────────────────────────────────────────────────────────────

    /// Encode an entity in its current layout.
    pub fn encode(&self, entity: &Entity, out: &mut Vec<u8>) -> std::result::Result<(), EncodeError> {
        self.encode_as(entity.constructor_id(), entity, out)
    }

    /// Encode an entity in a specific (possibly historical) layout.
    ///
    /// Fields the layout predates are simply not written. Nothing is
    /// appended to `out` on error.
    pub fn encode_as(
        &self,
        id: u32,
        entity: &Entity,
        out: &mut Vec<u8>,
    ) -> std::result::Result<(), EncodeError> {
        let descriptor = self
            .resolve(id)
            .ok_or(EncodeError::UnknownDiscriminator { id })?;
        let mut body = Vec::new();
        (descriptor.encode)(entity, &mut body)
            .ok_or(EncodeError::VariantMismatch { id, family: entity.family() })?;
        out.extend_from_slice(&id.to_le_bytes());
        out.extend_from_slice(&body);
        Ok(())
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}
