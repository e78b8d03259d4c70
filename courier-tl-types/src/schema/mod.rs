//! The built-in entity catalog subset.
//!
//! The full catalog is hundreds of constructors and lives outside this
//! crate; it is loaded at startup by registering a [`VariantDescriptor`]
//! per wire layout. The families here are the ones every deployment needs
//! and together they exercise every codec mechanism: open dispatch
//! ([`Peer`]), historical layout convergence ([`User`], [`Chat`],
//! [`Document`]), nested polymorphism and polymorphic vectors
//! ([`Message`]), closed single-constructor checks ([`FileChunk`],
//! [`RpcError`]), and shared flag bits ([`User`]).
//!
//! Constructor IDs are unique across the whole registry, not per family.

use crate::registry::{Registry, VariantDescriptor};

mod chat;
mod document;
mod file;
mod message;
mod peer;
mod rpc_error;
mod user;

pub use chat::{
    ChannelInfo, Chat, ChatInfo, ID_CHANNEL, ID_CHAT, ID_CHAT_EMPTY, ID_CHAT_FORBIDDEN, ID_CHAT_V0,
};
pub use document::{Document, DocumentInfo, ID_DOCUMENT, ID_DOCUMENT_EMPTY, ID_DOCUMENT_V0};
pub use file::{FileChunk, ID_FILE_CHUNK};
pub use message::{
    ID_ENTITY_BOLD, ID_ENTITY_ITALIC, ID_ENTITY_URL, ID_MESSAGE, ID_MESSAGE_EMPTY, ID_MESSAGE_V0,
    Message, MessageEntity, MessageInfo,
};
pub use peer::{ID_PEER_CHANNEL, ID_PEER_CHAT, ID_PEER_USER, Peer};
pub use rpc_error::{ID_RPC_ERROR, RpcError};
pub use user::{
    BotInfo, ID_USER, ID_USER_EMPTY, ID_USER_V0, ID_USER_V1, ID_USER_V2, Restriction, User,
    UserInfo,
};

/// Build a registry loaded with the built-in catalog.
pub fn registry() -> Registry {
    let mut registry = Registry::new();
    install(&mut registry);
    registry
}

/// Register the built-in catalog into an existing registry.
///
/// Deployments that extend the catalog call this first and then register
/// their own descriptors.
pub fn install(registry: &mut Registry) {
    let descriptors = peer::descriptors()
        .into_iter()
        .chain(user::descriptors())
        .chain(chat::descriptors())
        .chain(message::descriptors())
        .chain(document::descriptors())
        .chain(file::descriptors())
        .chain(rpc_error::descriptors());
    for descriptor in descriptors {
        let displaced = registry.register(descriptor);
        debug_assert!(displaced.is_none(), "duplicate constructor id {:#010x}", descriptor.id);
    }
}
