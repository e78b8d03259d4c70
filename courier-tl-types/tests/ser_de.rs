use courier_tl_types::deserialize::Error;
use courier_tl_types::{Cursor, Deserializable, Serializable};

// ── Primitive round-trips ─────────────────────────────────────────────────────

#[test]
fn roundtrip_i32() {
    for v in [0i32, -1, i32::MAX, i32::MIN, 42] {
        let bytes = v.to_bytes();
        assert_eq!(i32::from_bytes(&bytes).unwrap(), v);
    }
}

#[test]
fn roundtrip_i64() {
    for v in [0i64, -1, i64::MAX, i64::MIN, 1_234_567_890] {
        let bytes = v.to_bytes();
        assert_eq!(i64::from_bytes(&bytes).unwrap(), v);
    }
}

#[test]
fn roundtrip_f64() {
    for v in [0.0f64, -1.5, 1e300, 1e-300, f64::MAX] {
        let bytes = v.to_bytes();
        assert_eq!(f64::from_bytes(&bytes).unwrap(), v);
    }
}

#[test]
fn roundtrip_bool_true() {
    let bytes = true.to_bytes();
    assert_eq!(bytes, 0x997275b5u32.to_le_bytes());
    assert_eq!(bool::from_bytes(&bytes).unwrap(), true);
}

#[test]
fn roundtrip_bool_false() {
    let bytes = false.to_bytes();
    assert_eq!(bytes, 0xbc799737u32.to_le_bytes());
    assert_eq!(bool::from_bytes(&bytes).unwrap(), false);
}

#[test]
fn bool_rejects_other_constructors() {
    let bytes = 0x11223344u32.to_le_bytes();
    assert_eq!(
        bool::from_bytes(&bytes),
        Err(Error::UnknownDiscriminator { id: 0x11223344 })
    );
}

// ── String / bytes ────────────────────────────────────────────────────────────

#[test]
fn roundtrip_empty_string() {
    let s = String::new();
    let bytes = s.to_bytes();
    assert_eq!(bytes.len(), 4);
    assert_eq!(String::from_bytes(&bytes).unwrap(), s);
}

#[test]
fn roundtrip_short_string() {
    let s = "hello world".to_owned();
    let bytes = s.to_bytes();
    assert_eq!(bytes.len() % 4, 0, "must be 4-byte aligned");
    assert_eq!(String::from_bytes(&bytes).unwrap(), s);
}

#[test]
fn string_253_bytes_uses_short_header() {
    // 1 header byte + 253 data bytes + 2 padding = 256
    let s = "x".repeat(253);
    let bytes = s.clone().to_bytes();
    assert_eq!(bytes.len(), 256);
    assert_eq!(bytes[0], 253);
    assert_eq!(String::from_bytes(&bytes).unwrap(), s);
}

#[test]
fn string_254_bytes_uses_long_header() {
    // 4 header bytes + 254 data bytes + 2 padding = 260
    let s = "y".repeat(254);
    let bytes = s.clone().to_bytes();
    assert_eq!(bytes.len(), 260);
    assert_eq!(bytes[0], 0xfe);
    assert_eq!(&bytes[1..4], &[254, 0, 0]);
    assert_eq!(String::from_bytes(&bytes).unwrap(), s);
}

#[test]
fn roundtrip_long_string() {
    let s = "z".repeat(100_000);
    let bytes = s.clone().to_bytes();
    assert_eq!(bytes.len() % 4, 0);
    assert_eq!(String::from_bytes(&bytes).unwrap(), s);
}

#[test]
fn roundtrip_bytes_vec() {
    let v: Vec<u8> = (0u8..=255).collect();
    let bytes = v.clone().to_bytes();
    assert_eq!(Vec::<u8>::from_bytes(&bytes).unwrap(), v);
}

#[test]
fn truncated_string_payload_is_an_error() {
    // Header promises 10 bytes, only 3 present.
    let bytes = [10u8, 1, 2, 3];
    assert_eq!(Vec::<u8>::from_bytes(&bytes), Err(Error::Truncated));
}

// ── Vectors ───────────────────────────────────────────────────────────────────

#[test]
fn vec_i32_is_exactly_20_bytes() {
    let v: Vec<i32> = vec![1, 2, 3];
    let bytes = v.to_bytes();
    // 4 header + 4 count + 3 × 4 elements
    assert_eq!(bytes.len(), 20);
    assert_eq!(&bytes[..4], &0x1cb5c415u32.to_le_bytes());
    assert_eq!(Vec::<i32>::from_bytes(&bytes).unwrap(), vec![1, 2, 3]);
}

#[test]
fn roundtrip_empty_vec() {
    let v: Vec<i64> = vec![];
    let bytes = v.to_bytes();
    assert_eq!(Vec::<i64>::from_bytes(&bytes).unwrap(), Vec::<i64>::new());
}

#[test]
fn vector_header_mismatch_is_an_error() {
    let mut bytes = Vec::new();
    0xdeadbeefu32.serialize(&mut bytes);
    3i32.serialize(&mut bytes);
    assert_eq!(
        Vec::<i32>::from_bytes(&bytes),
        Err(Error::VectorMagic { found: 0xdeadbeef })
    );
}

#[test]
fn negative_vector_count_is_an_error() {
    let mut bytes = Vec::new();
    0x1cb5c415u32.serialize(&mut bytes);
    (-1i32).serialize(&mut bytes);
    assert_eq!(Vec::<i32>::from_bytes(&bytes), Err(Error::Truncated));
}

#[test]
fn overlong_vector_count_is_an_error() {
    let mut bytes = Vec::new();
    0x1cb5c415u32.serialize(&mut bytes);
    i32::MAX.serialize(&mut bytes);
    assert_eq!(Vec::<i32>::from_bytes(&bytes), Err(Error::Truncated));
}

// ── Fixed-size arrays ─────────────────────────────────────────────────────────

#[test]
fn roundtrip_int128() {
    let v: [u8; 16] = [1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15, 16];
    assert_eq!(<[u8; 16]>::from_bytes(&v.to_bytes()).unwrap(), v);
}

#[test]
fn roundtrip_int256() {
    let v: [u8; 32] = core::array::from_fn(|i| i as u8);
    assert_eq!(<[u8; 32]>::from_bytes(&v.to_bytes()).unwrap(), v);
}

// ── Cursor ────────────────────────────────────────────────────────────────────

#[test]
fn deserialize_truncated_returns_error() {
    let result = i32::from_bytes(&[0x01, 0x02]); // only 2 bytes, need 4
    assert_eq!(result, Err(Error::Truncated));
}

#[test]
fn cursor_skip_and_seek() {
    let data = [1u8, 2, 3, 4, 5, 6, 7, 8];
    let mut cur = Cursor::from_slice(&data);

    cur.skip(4).unwrap();
    assert_eq!(cur.pos(), 4);
    assert_eq!(cur.remaining(), 4);

    cur.seek(2).unwrap();
    assert_eq!(i32::deserialize(&mut cur).unwrap(), i32::from_le_bytes([3, 4, 5, 6]));

    assert_eq!(cur.skip(3), Err(Error::Truncated));
    assert_eq!(cur.seek(9), Err(Error::Truncated));
    // Failed moves leave the position untouched.
    assert_eq!(cur.pos(), 6);

    cur.seek(8).unwrap();
    assert_eq!(cur.remaining(), 0);
}

#[test]
fn cursor_read_raw_borrows_without_copying() {
    let data = [9u8, 8, 7, 6];
    let mut cur = Cursor::from_slice(&data);
    assert_eq!(cur.read_raw(2).unwrap(), &[9, 8]);
    assert_eq!(cur.read_raw(3), Err(Error::Truncated));
    assert_eq!(cur.read_raw(2).unwrap(), &[7, 6]);
}

// ── Option passthrough ────────────────────────────────────────────────────────

#[test]
fn option_none_writes_nothing() {
    let v: Option<i32> = None;
    assert_eq!(v.to_bytes(), b"");
}

#[test]
fn option_some_writes_inner() {
    let v: Option<i32> = Some(42);
    assert_eq!(v.to_bytes(), 42i32.to_bytes());
}
