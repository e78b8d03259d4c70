//! RPC envelope decoding on top of the TL codec.
//!
//! The transport hands this crate the decrypted body of an incoming
//! transmission. Three envelope shapes matter:
//!
//! * a **container** ([`ID_MSG_CONTAINER`]) batching independent
//!   sub-messages, each with its own ID, sequence number, and declared
//!   length: see [`decode_container`];
//! * a bare **`rpc_result`** ([`ID_RPC_RESULT`]) pairing a request ID with
//!   that request's response body: see [`decode_rpc_result`];
//! * a **compressed body** ([`ID_GZIP_PACKED`]), unwrapped transparently
//!   wherever a body may appear.
//!
//! Response bodies are polymorphic *and context-dependent*: the same bytes
//! mean different things depending on which request they answer. The
//! expected type is supplied by a [`ResponseResolver`] injected per call,
//! so the codec never touches connection state.
//!
//! ```rust
//! use std::collections::HashMap;
//! use courier_rpc::{MsgId, ResultBody, decode_rpc_result};
//! use courier_tl_types::schema::{self, User};
//! use courier_tl_types::{Cursor, Family, Serializable};
//!
//! let registry = schema::registry();
//! let pending = HashMap::from([(MsgId(101), Family::User)]);
//!
//! let mut wire = 101i64.to_bytes();
//! User::Empty { id: 9 }.serialize(&mut wire);
//!
//! let result = decode_rpc_result(&mut Cursor::from_slice(&wire), &registry, &pending).unwrap();
//! assert_eq!(result.req_msg_id, MsgId(101));
//! assert!(matches!(result.body, ResultBody::Entity(_)));
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod envelope;
pub mod message;

pub use envelope::{
    Error, ID_GZIP_PACKED, ID_MSG_CONTAINER, ID_RPC_RESULT, ResponseResolver, decode_container,
    decode_rpc_result,
};
pub use message::{Body, MsgId, ResultBody, RpcResult, SubMessage};
