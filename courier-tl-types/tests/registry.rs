use courier_tl_types::deserialize::Error;
use courier_tl_types::registry::EncodeError;
use courier_tl_types::schema::{
    self, BotInfo, Chat, ChatInfo, ChannelInfo, Document, DocumentInfo, FileChunk, Message,
    MessageEntity, MessageInfo, Peer, Restriction, RpcError, User, UserInfo,
};
use courier_tl_types::{Cursor, Entity, Expected, Family, Mode, Record, Registry, Serializable};

fn full_user() -> UserInfo {
    UserInfo {
        id: 7_777_777_777,
        access_hash: Some(-42),
        first_name: Some("Ada".into()),
        last_name: Some("Lovelace".into()),
        username: Some("ada".into()),
        phone: Some("+44000".into()),
        bot: Some(BotInfo { version: 3, inline_placeholder: "ask me".into() }),
        restriction: Some(Restriction { platform: "ios".into(), reason: "test".into() }),
        verified: true,
        photo_id: Some(900),
    }
}

fn decode_entity(registry: &Registry, bytes: &[u8], family: Family) -> Entity {
    let mut cursor = Cursor::from_slice(bytes);
    registry.decode_required(&mut cursor, Expected::Any(family)).unwrap()
}

// ── Registry basics ───────────────────────────────────────────────────────────

#[test]
fn builtin_catalog_resolves_known_constructors() {
    let registry = schema::registry();
    assert!(!registry.is_empty());
    let d = registry.resolve(schema::ID_USER).unwrap();
    assert_eq!(d.id, schema::ID_USER);
    assert_eq!(d.family, Family::User);
    assert!(registry.resolve(0x11111111).is_none());
}

#[test]
fn duplicate_registration_displaces_previous() {
    let mut registry = schema::registry();
    let before = registry.len();
    let descriptor = *registry.resolve(schema::ID_USER).unwrap();
    let displaced = registry.register(descriptor).unwrap();
    assert_eq!(displaced.id, schema::ID_USER);
    assert_eq!(registry.len(), before);
}

#[test]
fn registry_is_shareable_across_threads() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Registry>();
}

// ── Dispatch policies ─────────────────────────────────────────────────────────

#[test]
fn strict_unknown_discriminator_is_an_error() {
    let registry = schema::registry();
    let bytes = 0x12345678u32.to_le_bytes();
    let mut cursor = Cursor::from_slice(&bytes);
    assert_eq!(
        registry.decode_entity(&mut cursor, Expected::Any(Family::User), Mode::Strict),
        Err(Error::UnknownDiscriminator { id: 0x12345678 })
    );
}

#[test]
fn lenient_unknown_discriminator_is_an_explicit_none() {
    let registry = schema::registry();
    let bytes = 0x12345678u32.to_le_bytes();
    let mut cursor = Cursor::from_slice(&bytes);
    assert_eq!(
        registry.decode_entity(&mut cursor, Expected::Any(Family::User), Mode::Lenient),
        Ok(None)
    );
}

#[test]
fn known_constructor_of_wrong_family_is_unknown() {
    let registry = schema::registry();
    let bytes = Peer::User { user_id: 1 }.to_bytes();
    let mut cursor = Cursor::from_slice(&bytes);
    assert_eq!(
        registry.decode_entity(&mut cursor, Expected::Any(Family::User), Mode::Strict),
        Err(Error::UnknownDiscriminator { id: schema::ID_PEER_USER })
    );
}

#[test]
fn lenient_does_not_mask_truncation() {
    let registry = schema::registry();
    // Valid `user` tag, then nothing: the body is missing.
    let bytes = schema::ID_USER.to_le_bytes();
    let mut cursor = Cursor::from_slice(&bytes);
    assert_eq!(
        registry.decode_entity(&mut cursor, Expected::Any(Family::User), Mode::Lenient),
        Err(Error::Truncated)
    );
}

#[test]
fn closed_check_accepts_only_its_constructor() {
    let registry = schema::registry();

    let chunk = FileChunk::new(1700000000, vec![1, 2, 3]);
    let bytes = chunk.to_bytes();
    let mut cursor = Cursor::from_slice(&bytes);
    assert_eq!(registry.decode_exactly::<FileChunk>(&mut cursor).unwrap(), chunk);

    let wrong = RpcError { code: 400, message: "BAD_REQUEST".into() }.to_bytes();
    let mut cursor = Cursor::from_slice(&wrong);
    assert_eq!(
        registry.decode_exactly::<FileChunk>(&mut cursor),
        Err(Error::DiscriminatorMismatch {
            expected: schema::ID_FILE_CHUNK,
            found: schema::ID_RPC_ERROR,
        })
    );
}

// ── Round-trips, current layouts ──────────────────────────────────────────────

#[test]
fn roundtrip_peers() {
    let registry = schema::registry();
    for peer in [
        Peer::User { user_id: 1 },
        Peer::Chat { chat_id: -5 },
        Peer::Channel { channel_id: i64::MAX },
    ] {
        let bytes = peer.to_bytes();
        let mut cursor = Cursor::from_slice(&bytes);
        assert_eq!(registry.decode_as::<Peer>(&mut cursor).unwrap(), peer);
        assert_eq!(cursor.remaining(), 0);
    }
}

#[test]
fn roundtrip_full_user() {
    let registry = schema::registry();
    let user = User::Full(full_user());
    let entity = user.clone().into_entity();

    let mut via_registry = Vec::new();
    registry.encode(&entity, &mut via_registry).unwrap();
    assert_eq!(via_registry, user.to_bytes());

    let mut cursor = Cursor::from_slice(&via_registry);
    assert_eq!(registry.decode_as::<User>(&mut cursor).unwrap(), user);
}

#[test]
fn roundtrip_chats() {
    let registry = schema::registry();
    let chats = [
        Chat::Empty { id: 12 },
        Chat::Forbidden { id: 99, title: "gone".into() },
        Chat::Chat(ChatInfo {
            id: 4_400_000_000,
            title: "rustaceans".into(),
            photo_id: Some(17),
            participants_count: 120,
            date: 1_600_000_000,
            version: 7,
            deactivated: true,
        }),
        Chat::Channel(ChannelInfo {
            id: 1000,
            access_hash: Some(5),
            title: "news".into(),
            username: None,
            date: 1_500_000_000,
            megagroup: false,
            verified: true,
        }),
    ];
    for chat in chats {
        let bytes = chat.to_bytes();
        let mut cursor = Cursor::from_slice(&bytes);
        assert_eq!(registry.decode_as::<Chat>(&mut cursor).unwrap(), chat);
    }
}

#[test]
fn roundtrip_message_with_nested_polymorphism() {
    let registry = schema::registry();
    let message = Message::Message(MessageInfo {
        id: 33,
        outgoing: true,
        from_id: Some(Peer::User { user_id: 7 }),
        peer_id: Peer::Channel { channel_id: 1000 },
        date: 1_700_000_000,
        message: "bold and linked".into(),
        entities: Some(vec![
            MessageEntity::Bold { offset: 0, length: 4 },
            MessageEntity::Url { offset: 9, length: 6, url: "https://example.com".into() },
        ]),
        views: Some(12),
        edit_date: None,
    });
    let bytes = message.to_bytes();
    let mut cursor = Cursor::from_slice(&bytes);
    assert_eq!(registry.decode_as::<Message>(&mut cursor).unwrap(), message);
    assert_eq!(cursor.remaining(), 0);
}

#[test]
fn roundtrip_document_with_double() {
    let registry = schema::registry();
    let document = Document::Document(DocumentInfo {
        id: 1,
        access_hash: 2,
        file_reference: Some(vec![0xaa, 0xbb]),
        date: 3,
        mime_type: "video/mp4".into(),
        size: 1 << 40,
        thumb_widths: vec![90, 320],
        video_duration: Some(12.5),
        dc_id: 4,
    });
    let bytes = document.to_bytes();
    let mut cursor = Cursor::from_slice(&bytes);
    assert_eq!(registry.decode_as::<Document>(&mut cursor).unwrap(), document);
}

#[test]
fn roundtrip_rpc_error() {
    let registry = schema::registry();
    let error = RpcError { code: 420, message: "FLOOD_WAIT_30".into() };
    let bytes = error.to_bytes();
    let mut cursor = Cursor::from_slice(&bytes);
    assert_eq!(registry.decode_exactly::<RpcError>(&mut cursor).unwrap(), error);
}

#[test]
fn file_chunk_payload_is_consumed_once() {
    let registry = schema::registry();
    let bytes = FileChunk::new(5, vec![9; 1024]).to_bytes();
    let mut cursor = Cursor::from_slice(&bytes);
    let chunk = registry.decode_exactly::<FileChunk>(&mut cursor).unwrap();
    assert_eq!(chunk.len(), 1024);
    let payload = chunk.into_bytes();
    assert_eq!(payload, vec![9; 1024]);
}

// ── Historical layouts ────────────────────────────────────────────────────────

#[test]
fn historical_user_layouts_converge_on_one_record() {
    let registry = schema::registry();

    // Oldest layout: names and phone mandatory, nothing else.
    let v0 = User::Full(UserInfo {
        id: 123,
        first_name: Some("A".into()),
        last_name: Some("B".into()),
        phone: Some("+1".into()),
        ..UserInfo::default()
    });
    // First flagged layout adds hash and username, still 32-bit IDs.
    let v1 = User::Full(UserInfo {
        id: 123,
        access_hash: Some(4),
        first_name: Some("A".into()),
        last_name: None,
        username: Some("ab".into()),
        phone: None,
        ..UserInfo::default()
    });
    // 64-bit IDs and photo.
    let v2 = User::Full(UserInfo {
        id: 8_000_000_000,
        access_hash: Some(4),
        first_name: Some("A".into()),
        username: Some("ab".into()),
        photo_id: Some(77),
        ..UserInfo::default()
    });

    for (layout, user) in [(schema::ID_USER_V0, v0), (schema::ID_USER_V1, v1), (schema::ID_USER_V2, v2)] {
        let entity = user.clone().into_entity();
        let mut bytes = Vec::new();
        registry.encode_as(layout, &entity, &mut bytes).unwrap();

        let mut cursor = Cursor::from_slice(&bytes);
        let decoded = registry.decode_required(&mut cursor, Expected::Any(Family::User)).unwrap();
        assert_eq!(decoded, entity, "layout {layout:#010x}");
        assert_eq!(cursor.remaining(), 0);

        // Re-encoding the decoded record in the same layout is bit-exact.
        let mut again = Vec::new();
        registry.encode_as(layout, &decoded, &mut again).unwrap();
        assert_eq!(again, bytes);
    }
}

#[test]
fn old_layouts_leave_new_fields_unset() {
    let registry = schema::registry();
    let mut bytes = Vec::new();
    schema::ID_USER_V0.serialize(&mut bytes);
    42i32.serialize(&mut bytes);
    "Grace".serialize(&mut bytes);
    "Hopper".serialize(&mut bytes);
    "+1555".serialize(&mut bytes);

    let entity = decode_entity(&registry, &bytes, Family::User);
    let Entity::User(User::Full(u)) = entity else { panic!("expected a full user") };
    assert_eq!(u.id, 42);
    assert_eq!(u.first_name.as_deref(), Some("Grace"));
    assert_eq!(u.access_hash, None);
    assert_eq!(u.bot, None);
    assert_eq!(u.restriction, None);
    assert!(!u.verified);
    assert_eq!(u.photo_id, None);
}

#[test]
fn historical_chat_and_document_layouts_roundtrip() {
    let registry = schema::registry();

    let chat = Chat::Chat(ChatInfo {
        id: 77,
        title: "old group".into(),
        participants_count: 3,
        date: 1_400_000_000,
        version: 1,
        ..ChatInfo::default()
    });
    let mut bytes = Vec::new();
    registry.encode_as(schema::ID_CHAT_V0, &chat.clone().into_entity(), &mut bytes).unwrap();
    assert_eq!(decode_entity(&registry, &bytes, Family::Chat), chat.into_entity());

    let document = Document::Document(DocumentInfo {
        id: 10,
        access_hash: 11,
        date: 12,
        mime_type: "image/png".into(),
        size: 4096,
        thumb_widths: vec![160],
        dc_id: 2,
        ..DocumentInfo::default()
    });
    let mut bytes = Vec::new();
    registry.encode_as(schema::ID_DOCUMENT_V0, &document.clone().into_entity(), &mut bytes).unwrap();
    assert_eq!(decode_entity(&registry, &bytes, Family::Document), document.into_entity());
}

// ── Shared flag bits ──────────────────────────────────────────────────────────

#[test]
fn shared_bit_gates_both_fields_on_encode() {
    let with_bot = User::Full(UserInfo {
        id: 1,
        bot: Some(BotInfo { version: 9, inline_placeholder: "hi".into() }),
        ..UserInfo::default()
    });
    let without_bot = User::Full(UserInfo { id: 1, ..UserInfo::default() });

    let with_bytes = with_bot.to_bytes();
    let without_bytes = without_bot.to_bytes();
    // version (4) + "hi" as a padded TL string (4)
    assert_eq!(with_bytes.len(), without_bytes.len() + 8);

    let registry = schema::registry();
    let mut cursor = Cursor::from_slice(&without_bytes);
    let Entity::User(User::Full(u)) =
        registry.decode_required(&mut cursor, Expected::Any(Family::User)).unwrap()
    else {
        panic!("expected a full user");
    };
    assert_eq!(u.bot, None);
}

#[test]
fn shared_bit_reads_both_fields_in_declared_order() {
    let registry = schema::registry();

    // flags = 0x20 | 0x40: bot pair then restriction pair, nothing else.
    let mut bytes = Vec::new();
    schema::ID_USER.serialize(&mut bytes);
    0x60u32.serialize(&mut bytes);
    9i64.serialize(&mut bytes);
    5i32.serialize(&mut bytes); // bot_info_version
    "go".serialize(&mut bytes); // bot_inline_placeholder
    "android".serialize(&mut bytes); // restriction_platform
    "spam".serialize(&mut bytes); // restriction_reason

    let entity = decode_entity(&registry, &bytes, Family::User);
    let Entity::User(User::Full(u)) = entity else { panic!("expected a full user") };
    assert_eq!(u.bot, Some(BotInfo { version: 5, inline_placeholder: "go".into() }));
    assert_eq!(
        u.restriction,
        Some(Restriction { platform: "android".into(), reason: "spam".into() })
    );
    assert_eq!(u.access_hash, None);
}

// ── Polymorphic vectors ───────────────────────────────────────────────────────

#[test]
fn decode_vec_dispatches_each_element() {
    let registry = schema::registry();
    let entities = vec![
        MessageEntity::Bold { offset: 0, length: 1 },
        MessageEntity::Italic { offset: 2, length: 3 },
        MessageEntity::Url { offset: 4, length: 5, url: "u".into() },
    ];
    let bytes = entities.to_bytes();
    let mut cursor = Cursor::from_slice(&bytes);
    assert_eq!(registry.decode_vec::<MessageEntity>(&mut cursor).unwrap(), entities);
}

#[test]
fn decode_vec_fails_on_unknown_element() {
    let registry = schema::registry();
    let mut bytes = Vec::new();
    0x1cb5c415u32.serialize(&mut bytes);
    1i32.serialize(&mut bytes);
    0xfeedfaceu32.serialize(&mut bytes);
    let mut cursor = Cursor::from_slice(&bytes);
    assert_eq!(
        registry.decode_vec::<MessageEntity>(&mut cursor),
        Err(Error::UnknownDiscriminator { id: 0xfeedface })
    );
}

// ── Encoding errors ───────────────────────────────────────────────────────────

#[test]
fn encode_with_unregistered_constructor_fails() {
    let registry = schema::registry();
    let mut out = Vec::new();
    assert_eq!(
        registry.encode_as(0x31337, &Peer::User { user_id: 1 }.into_entity(), &mut out),
        Err(EncodeError::UnknownDiscriminator { id: 0x31337 })
    );
    assert!(out.is_empty());
}

#[test]
fn encode_with_mismatched_variant_fails_cleanly() {
    let registry = schema::registry();
    let mut out = Vec::new();
    // `user` cannot encode a Peer…
    assert_eq!(
        registry.encode_as(schema::ID_USER, &Peer::User { user_id: 1 }.into_entity(), &mut out),
        Err(EncodeError::VariantMismatch { id: schema::ID_USER, family: Family::Peer })
    );
    // …nor a `userEmpty`.
    assert_eq!(
        registry.encode_as(schema::ID_USER, &User::Empty { id: 2 }.into_entity(), &mut out),
        Err(EncodeError::VariantMismatch { id: schema::ID_USER, family: Family::User })
    );
    assert!(out.is_empty(), "nothing may be written on error");
}
