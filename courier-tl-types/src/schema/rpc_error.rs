//! RPC-level error responses.

use crate::deserialize::{Buffer, Deserializable, Result};
use crate::registry::{Entity, Family, Record, Registry, VariantDescriptor};
use crate::serialize::Serializable;
use crate::Identifiable;

/// `rpc_error` constructor ID.
pub const ID_RPC_ERROR: u32 = 0x2144ca19;

/// An error the server returned instead of a result body.
///
/// Decodes without request context, so the envelope layer can surface it
/// even when the paired request is unknown.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RpcError {
    /// HTTP-like status code.
    pub code: i32,
    /// Error name, e.g. `FLOOD_WAIT_30`.
    pub message: String,
}

impl Identifiable for RpcError {
    const CONSTRUCTOR_ID: u32 = ID_RPC_ERROR;
}

impl Record for RpcError {
    const FAMILY: Family = Family::RpcError;

    fn from_entity(entity: Entity) -> Option<Self> {
        match entity {
            Entity::RpcError(e) => Some(e),
            _ => None,
        }
    }

    fn into_entity(self) -> Entity {
        Entity::RpcError(self)
    }
}

impl Serializable for RpcError {
    fn serialize(&self, buf: &mut impl Extend<u8>) {
        ID_RPC_ERROR.serialize(buf);
        self.code.serialize(buf);
        self.message.serialize(buf);
    }
}

pub(crate) fn descriptors() -> [VariantDescriptor; 1] {
    [VariantDescriptor {
        id: ID_RPC_ERROR,
        family: Family::RpcError,
        decode: decode_error,
        encode: encode_error,
    }]
}

fn decode_error(_registry: &Registry, buf: Buffer) -> Result<Entity> {
    let code = i32::deserialize(buf)?;
    let message = String::deserialize(buf)?;
    Ok(Entity::RpcError(RpcError { code, message }))
}

fn encode_error(entity: &Entity, out: &mut Vec<u8>) -> Option<()> {
    let Entity::RpcError(e) = entity else { return None };
    e.code.serialize(out);
    e.message.serialize(out);
    Some(())
}
