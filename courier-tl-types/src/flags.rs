//! Flag words gating optional fields.
//!
//! Many constructors start with a `flags:#` word: a plain int32 bitmask in
//! which each authored bit decides whether one or more optional fields
//! follow on the wire. Bits never reorder fields (declaration order is
//! wire order), they only include or exclude them. The word itself is
//! always present.
//!
//! A single bit may gate several fields. Constructors model such a group
//! as one `Option<Group>` record field, so presence is a single decision
//! for the whole group and the members cannot disagree.

use crate::deserialize::{Buffer, Deserializable, Result};
use crate::serialize::Serializable;

/// A 32-bit flags word.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Flags(u32);

impl Flags {
    /// A word with no bits set.
    pub const EMPTY: Flags = Flags(0);

    /// Whether every bit of `mask` is set.
    pub fn contains(self, mask: u32) -> bool {
        self.0 & mask == mask
    }

    /// Set or clear the bits of `mask`.
    pub fn set(&mut self, mask: u32, present: bool) {
        if present {
            self.0 |= mask;
        } else {
            self.0 &= !mask;
        }
    }

    /// The raw bitmask.
    pub fn bits(self) -> u32 {
        self.0
    }

    /// Read one flag-gated field: `Some` if `mask` is set, `None` otherwise.
    ///
    /// Call sites must appear in field-declaration order, since a set bit
    /// means the field's bytes are next on the wire.
    pub fn read_if<T: Deserializable>(self, mask: u32, buf: Buffer) -> Result<Option<T>> {
        if self.contains(mask) {
            T::deserialize(buf).map(Some)
        } else {
            Ok(None)
        }
    }
}

impl Deserializable for Flags {
    fn deserialize(buf: Buffer) -> Result<Self> {
        u32::deserialize(buf).map(Flags)
    }
}

impl Serializable for Flags {
    fn serialize(&self, buf: &mut impl Extend<u8>) {
        self.0.serialize(buf);
    }
}
