//! TL binary codec: primitives, flag-gated fields, vectors, and the
//! polymorphic variant registry.
//!
//! Every protocol entity (requests, responses, updates) is identified on the
//! wire by a fixed 32-bit constructor ID and encoded as a flat sequence of
//! primitive and nested fields. This crate implements the generic rules:
//!
//! | Module          | Contents                                              |
//! |-----------------|-------------------------------------------------------|
//! | [`deserialize`] | [`Cursor`], [`Deserializable`], primitive decoders    |
//! | [`serialize`]   | [`Serializable`], primitive encoders                  |
//! | [`flags`]       | Optional fields gated by bits of a flags word         |
//! | [`registry`]    | Constructor-ID dispatch, strict/lenient policy        |
//! | [`schema`]      | The built-in entity catalog subset                    |
//!
//! # Decoding a polymorphic entity
//!
//! ```rust
//! use courier_tl_types::schema::{self, Peer};
//! use courier_tl_types::{Cursor, Serializable};
//!
//! let registry = schema::registry();
//!
//! let wire = Peer::User { user_id: 7 }.to_bytes();
//! let mut cursor = Cursor::from_slice(&wire);
//! let peer: Peer = registry.decode_as(&mut cursor).unwrap();
//! assert_eq!(peer, Peer::User { user_id: 7 });
//! ```
//!
//! The registry is built once at startup and is read-only afterwards; decode
//! calls on independent buffers may run concurrently against the same
//! `&Registry` without locking.

#![deny(unsafe_code)]

pub mod deserialize;
pub mod flags;
pub mod registry;
pub mod schema;
pub mod serialize;

pub use deserialize::{Cursor, Deserializable};
pub use flags::Flags;
pub use registry::{Entity, Expected, Family, Mode, Record, Registry, VariantDescriptor};
pub use serialize::Serializable;

/// A type with exactly one legal wire layout.
///
/// Implemented by single-constructor schema types; lets fields declared with
/// such a type be decoded as a closed check
/// ([`Registry::decode_exactly`]) instead of open dispatch.
pub trait Identifiable {
    /// The type's constructor ID.
    const CONSTRUCTOR_ID: u32;
}
