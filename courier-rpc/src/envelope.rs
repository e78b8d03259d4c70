//! Container and `rpc_result` decoding.
//!
//! Servers batch independent messages into containers:
//!
//! ```text
//! count:int  count × (msg_id:long  seqno:int  bytes:int  body)
//! ```
//!
//! Each body's type depends on which request the message answers, so the
//! decoder takes a [`ResponseResolver`] (a read-only view of the
//! transport's pending-request table) injected per call. The codec itself
//! holds no connection state.
//!
//! Body decoding is fault-isolated: whatever happens inside a body, the
//! cursor is moved to the declared sub-message boundary before the next
//! entry is read, so one corrupt or unresolvable body never desynchronizes
//! its siblings.

use std::collections::HashMap;
use std::fmt;
use std::io::Read;

use courier_tl_types::deserialize::{self, Buffer, Cursor, Deserializable};
use courier_tl_types::schema::RpcError;
use courier_tl_types::{Expected, Family, Identifiable, Registry};

use crate::message::{Body, MsgId, ResultBody, RpcResult, SubMessage};

/// Constructor ID of a message container. The transport dispatches on this
/// tag and hands the rest of the buffer to [`decode_container`].
pub const ID_MSG_CONTAINER: u32 = 0x73f1f8dc;
/// Constructor ID of an `rpc_result` envelope; see [`decode_rpc_result`].
pub const ID_RPC_RESULT: u32 = 0xf35c6d01;
/// Constructor ID of a compressed body: a length-prefixed deflate stream
/// wrapping the real body. Unwrapped transparently.
pub const ID_GZIP_PACKED: u32 = 0x3072cfa1;

// ─── Error ────────────────────────────────────────────────────────────────────

/// Errors that can occur while decoding envelopes.
#[derive(Clone, Debug, PartialEq)]
pub enum Error {
    /// A codec-level failure (truncation, bad discriminator, …).
    Tl(deserialize::Error),
    /// An `rpc_result` answers a request this session knows nothing about,
    /// and without a declared length there is nothing to skip to.
    UnresolvedContext {
        /// The unknown request ID.
        msg_id: MsgId,
    },
    /// The envelope framing itself is malformed.
    Corrupt(&'static str),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Tl(e) => write!(f, "TL: {e}"),
            Self::UnresolvedContext { msg_id } => {
                write!(f, "no expected response type for message {}", msg_id.0)
            }
            Self::Corrupt(s) => write!(f, "corrupt envelope: {s}"),
        }
    }
}

impl std::error::Error for Error {}

impl From<deserialize::Error> for Error {
    fn from(e: deserialize::Error) -> Self {
        Self::Tl(e)
    }
}

// ─── ResponseResolver ────────────────────────────────────────────────────────

/// Read-only lookup from message ID to the entity family the paired
/// request expects back.
///
/// Owned by the transport layer; the codec only ever reads it. Lookups may
/// race with new requests being registered on other threads; a miss is
/// reported per sub-message, never cached.
pub trait ResponseResolver {
    /// The family expected for `msg_id`, or `None` if the request is
    /// unknown to this session.
    fn expected(&self, msg_id: MsgId) -> Option<Family>;
}

impl ResponseResolver for HashMap<MsgId, Family> {
    fn expected(&self, msg_id: MsgId) -> Option<Family> {
        self.get(&msg_id).copied()
    }
}

impl<F> ResponseResolver for F
where
    F: Fn(MsgId) -> Option<Family>,
{
    fn expected(&self, msg_id: MsgId) -> Option<Family> {
        self(msg_id)
    }
}

// ─── Container ───────────────────────────────────────────────────────────────

/// Decode a message container, one [`SubMessage`] per entry.
///
/// `buf` is positioned after the container's constructor ID, i.e. at the
/// count. Body outcomes are per entry (see [`Body`]); only corruption of
/// the container framing itself fails the whole call.
pub fn decode_container(
    buf: Buffer,
    registry: &Registry,
    resolver: &impl ResponseResolver,
) -> Result<Vec<SubMessage>, Error> {
    let count = i32::deserialize(buf)?;
    if count < 0 {
        return Err(Error::Corrupt("negative sub-message count"));
    }
    let mut messages = Vec::new();
    for _ in 0..count {
        let msg_id = MsgId(i64::deserialize(buf)?);
        let seq_no = i32::deserialize(buf)?;
        let declared_len = i32::deserialize(buf)?;
        if declared_len < 0 {
            return Err(Error::Corrupt("negative declared length"));
        }
        let declared_len = declared_len as usize;
        if declared_len > buf.remaining() {
            return Err(Error::Tl(deserialize::Error::Truncated));
        }
        let start = buf.pos();
        let body = decode_sub_body(buf, registry, resolver, msg_id, start, declared_len);
        // Resynchronize on the declared boundary no matter how the body
        // decode went.
        buf.seek(start + declared_len)?;
        messages.push(SubMessage { msg_id, seq_no, body });
    }
    Ok(messages)
}

fn decode_sub_body(
    buf: Buffer,
    registry: &Registry,
    resolver: &impl ResponseResolver,
    msg_id: MsgId,
    start: usize,
    declared_len: usize,
) -> Body {
    match decode_body(buf, registry, resolver.expected(msg_id), msg_id, 0) {
        Ok(ResultBody::Entity(entity)) => Body::Entity(entity),
        Ok(ResultBody::Error(error)) => Body::Error(error),
        Err(Error::UnresolvedContext { .. }) => {
            log::debug!(
                "no pending request for message {}; keeping {declared_len} raw body bytes",
                msg_id.0
            );
            let raw = if buf.seek(start).is_ok() {
                buf.read_raw(declared_len).map(<[u8]>::to_vec).unwrap_or_default()
            } else {
                Vec::new()
            };
            Body::Unresolved { raw }
        }
        Err(error) => {
            log::warn!("body of message {} failed to decode: {error}", msg_id.0);
            Body::Malformed { error }
        }
    }
}

// ─── rpc_result ──────────────────────────────────────────────────────────────

/// Decode a bare `rpc_result`: `req_msg_id:long` followed by the body.
///
/// The body type comes from the resolver, except for `rpc_error`, which
/// decodes without context. A result for an unknown request fails with
/// [`Error::UnresolvedContext`]: there is no declared length to skip to,
/// so only this result is lost, not the decode session.
pub fn decode_rpc_result(
    buf: Buffer,
    registry: &Registry,
    resolver: &impl ResponseResolver,
) -> Result<RpcResult, Error> {
    let req_msg_id = MsgId(i64::deserialize(buf)?);
    let body = decode_body(buf, registry, resolver.expected(req_msg_id), req_msg_id, 0)?;
    Ok(RpcResult { req_msg_id, body })
}

// ─── Body dispatch ───────────────────────────────────────────────────────────

fn decode_body(
    buf: Buffer,
    registry: &Registry,
    expected: Option<Family>,
    msg_id: MsgId,
    depth: u8,
) -> Result<ResultBody, Error> {
    let start = buf.pos();
    let id = u32::deserialize(buf)?;
    if id == ID_GZIP_PACKED {
        if depth > 0 {
            return Err(Error::Corrupt("nested gzip_packed"));
        }
        let packed = Vec::<u8>::deserialize(buf)?;
        let inflated = inflate(&packed)?;
        let mut inner = Cursor::from_slice(&inflated);
        return decode_body(&mut inner, registry, expected, msg_id, depth + 1);
    }
    buf.seek(start)?;
    if id == RpcError::CONSTRUCTOR_ID {
        let error = registry.decode_exactly::<RpcError>(buf)?;
        return Ok(ResultBody::Error(error));
    }
    let family = expected.ok_or(Error::UnresolvedContext { msg_id })?;
    let entity = registry.decode_required(buf, Expected::Any(family))?;
    Ok(ResultBody::Entity(entity))
}

fn inflate(data: &[u8]) -> Result<Vec<u8>, Error> {
    let mut out = Vec::new();
    if flate2::read::GzDecoder::new(data).read_to_end(&mut out).is_ok() && !out.is_empty() {
        return Ok(out);
    }
    out.clear();
    flate2::read::ZlibDecoder::new(data)
        .read_to_end(&mut out)
        .map_err(|_| Error::Corrupt("compressed body is neither gzip nor zlib"))?;
    Ok(out)
}
