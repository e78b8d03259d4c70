//! Sub-message records produced by the envelope decoder.

use courier_tl_types::Entity;
use courier_tl_types::schema::RpcError;

use crate::envelope::Error;

/// A 64-bit message identifier.
///
/// Assigned by the transport when a request is sent; responses carry the
/// identifier of the request they answer, which is how the envelope decoder
/// finds the expected response type.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct MsgId(pub i64);

/// One sub-message out of a decoded container.
#[derive(Clone, Debug, PartialEq)]
pub struct SubMessage {
    /// The sub-message's identifier.
    pub msg_id: MsgId,
    /// Session-scoped sequence number.
    pub seq_no: i32,
    /// The body, however far it got.
    pub body: Body,
}

/// The decoded body of one container sub-message.
///
/// Bodies fail independently: a sibling of an [`Body::Unresolved`] or
/// [`Body::Malformed`] entry is unaffected, because the decoder always
/// resynchronizes on the declared sub-message boundary.
#[derive(Clone, Debug, PartialEq)]
pub enum Body {
    /// A fully decoded entity of the expected family.
    Entity(Entity),
    /// The server answered the paired request with an error.
    Error(RpcError),
    /// No expected type is known for this message ID; the raw body bytes
    /// are kept so the transport can park or replay them.
    Unresolved {
        /// The body bytes, exactly as framed (still compressed if they
        /// arrived compressed).
        raw: Vec<u8>,
    },
    /// The body failed to decode against the expected family.
    Malformed {
        /// What went wrong.
        error: Error,
    },
}

/// A decoded `rpc_result` envelope.
#[derive(Clone, Debug, PartialEq)]
pub struct RpcResult {
    /// The request this result answers.
    pub req_msg_id: MsgId,
    /// The result body.
    pub body: ResultBody,
}

/// The body of an [`RpcResult`]: either the expected entity or an
/// RPC-level error, which decodes without request context.
#[derive(Clone, Debug, PartialEq)]
pub enum ResultBody {
    /// The expected response entity.
    Entity(Entity),
    /// The server answered with an error.
    Error(RpcError),
}
