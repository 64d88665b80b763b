//! Codec Tests
//!
//! Tests for command encoding and frame decoding.

use bytes::{Bytes, BytesMut};
use kvwire::protocol::{
    decode_frame, decode_frame_limited, encode_command, encode_fields, Arg, Command,
};
use kvwire::ClientError;

// =============================================================================
// Helper Functions
// =============================================================================

fn encoded(command: Command) -> Vec<u8> {
    encode_command(&command).unwrap().to_vec()
}

fn decode_all(bytes: &[u8]) -> (Vec<Vec<Bytes>>, BytesMut) {
    let mut buf = BytesMut::from(bytes);
    let mut frames = Vec::new();
    while let Some(frame) = decode_frame(&mut buf).unwrap() {
        frames.push(frame);
    }
    (frames, buf)
}

// =============================================================================
// Command Encoding Tests
// =============================================================================

#[test]
fn test_encode_set() {
    let bytes = encoded(Command::new("set").arg("key").arg("value"));
    assert_eq!(bytes, b"3\nset\n3\nkey\n5\nvalue\n\n");
}

#[test]
fn test_encode_verb_only() {
    assert_eq!(encoded(Command::new("ping")), b"4\nping\n\n");
}

#[test]
fn test_encode_integers() {
    let bytes = encoded(
        Command::new("x")
            .arg(42u8)
            .arg(-7i32)
            .arg(u64::MAX)
            .arg(i64::MIN)
            .arg(0usize),
    );
    assert_eq!(
        bytes,
        b"1\nx\n2\n42\n2\n-7\n20\n18446744073709551615\n20\n-9223372036854775808\n1\n0\n\n"
    );
}

#[test]
fn test_encode_float_fixed_point() {
    let bytes = encoded(Command::new("x").arg(1.5f64).arg(-0.25f32).arg(3.0f64));
    assert_eq!(bytes, b"1\nx\n8\n1.500000\n9\n-0.250000\n8\n3.000000\n\n");
}

#[test]
fn test_encode_bool_and_null() {
    let bytes = encoded(
        Command::new("x")
            .arg(true)
            .arg(false)
            .arg(())
            .arg(None::<&str>)
            .arg(Some("y")),
    );
    assert_eq!(bytes, b"1\nx\n1\n1\n1\n0\n0\n\n0\n\n1\ny\n\n");
}

#[test]
fn test_encode_text_list_expands_per_element() {
    let bytes = encoded(Command::new("multi_get").arg(vec!["k1", "key2"]));
    assert_eq!(bytes, b"9\nmulti_get\n2\nk1\n4\nkey2\n\n");
}

#[test]
fn test_encode_bytes_list_expands_per_element() {
    let items: Vec<Vec<u8>> = vec![b"a".to_vec(), vec![], b"ccc".to_vec()];
    let bytes = encoded(Command::new("multi_del").arg(items));
    assert_eq!(bytes, b"9\nmulti_del\n1\na\n0\n\n3\nccc\n\n");
}

#[test]
fn test_encode_empty_list_adds_no_fields() {
    let bytes = encoded(Command::new("multi_get").arg(Vec::<String>::new()));
    assert_eq!(bytes, b"9\nmulti_get\n\n");
}

#[test]
fn test_encode_binary_argument_unchanged() {
    let value: Vec<u8> = vec![0x00, b'\n', 0xFF, b'\r', b'\n'];
    let bytes = encoded(Command::new("set").arg("k").arg(value.clone()));

    let mut expected = b"3\nset\n1\nk\n5\n".to_vec();
    expected.extend_from_slice(&value);
    expected.extend_from_slice(b"\n\n");
    assert_eq!(bytes, expected);
}

#[test]
fn test_encode_length_counts_bytes_not_chars() {
    let bytes = encoded(Command::new("set").arg("k").arg("héllo"));
    assert_eq!(bytes, "3\nset\n1\nk\n6\nhéllo\n\n".as_bytes());
}

#[test]
fn test_encode_non_finite_float_fails() {
    for bad in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
        let result = encode_command(&Command::new("set").arg("k").arg(bad));
        assert!(matches!(result, Err(ClientError::Argument(_))));
    }
}

#[test]
fn test_encode_command_without_fields_fails() {
    let empty = [
        Command::default(),
        Command::from(Vec::new()),
        Command::from(vec![Arg::TextList(Vec::new())]),
    ];
    for command in empty {
        let result = encode_command(&command);
        assert!(matches!(result, Err(ClientError::Argument(_))), "{:?}", command);
    }
}

#[test]
fn test_command_from_arg_vec() {
    let command = Command::from(vec![Arg::from("get"), Arg::from("k")]);
    assert_eq!(command.verb(), Some("get"));
    assert_eq!(encoded(command), b"3\nget\n1\nk\n\n");
}

#[test]
fn test_command_with_args() {
    let command = Command::with_args("multi_set", ["a", "1", "b", "2"]);
    assert_eq!(command.args().len(), 5);
    assert_eq!(encoded(command), b"9\nmulti_set\n1\na\n1\n1\n1\nb\n1\n2\n\n");
}

// =============================================================================
// Frame Decoding Tests
// =============================================================================

#[test]
fn test_decode_single_frame() {
    let (frames, rest) = decode_all(b"2\nok\n1\nv\n\n");
    assert_eq!(frames, vec![vec![Bytes::from("ok"), Bytes::from("v")]]);
    assert!(rest.is_empty());
}

#[test]
fn test_decode_crlf_terminator() {
    let (frames, rest) = decode_all(b"2\nok\n1\nv\n\r\n");
    assert_eq!(frames.len(), 1);
    assert_eq!(frames[0][1], Bytes::from("v"));
    assert!(rest.is_empty());
}

#[test]
fn test_decode_zero_length_field() {
    let (frames, _) = decode_all(b"2\nok\n0\n\n1\nx\n\n");
    assert_eq!(
        frames[0],
        vec![Bytes::from("ok"), Bytes::new(), Bytes::from("x")]
    );
}

#[test]
fn test_decode_skips_leading_blank_lines() {
    let (frames, rest) = decode_all(b"\n\r\n\n2\nok\n\n");
    assert_eq!(frames, vec![vec![Bytes::from("ok")]]);
    assert!(rest.is_empty());
}

#[test]
fn test_decode_only_blank_lines_is_incomplete() {
    let mut buf = BytesMut::from(&b"\n\n\n"[..]);
    assert!(decode_frame(&mut buf).unwrap().is_none());
    assert!(buf.is_empty());
}

#[test]
fn test_decode_two_frames_one_at_a_time() {
    let first = b"2\nok\n1\na\n\n";
    let second = b"9\nnot_found\n\n";
    let mut buf = BytesMut::new();
    buf.extend_from_slice(first);
    buf.extend_from_slice(second);

    let frame = decode_frame(&mut buf).unwrap().unwrap();
    assert_eq!(frame, vec![Bytes::from("ok"), Bytes::from("a")]);
    assert_eq!(&buf[..], &second[..]);

    let frame = decode_frame(&mut buf).unwrap().unwrap();
    assert_eq!(frame, vec![Bytes::from("not_found")]);
    assert!(buf.is_empty());

    assert!(decode_frame(&mut buf).unwrap().is_none());
}

#[test]
fn test_decode_incomplete_keeps_bytes() {
    let partial: &[&[u8]] = &[
        b"2",
        b"2\n",
        b"2\no",
        b"2\nok",
        b"2\nok\n",
        b"2\nok\n5\nhel",
        b"2\nok\n5\nhello",
        b"2\nok\n5\nhello\n",
    ];
    for bytes in partial {
        let mut buf = BytesMut::from(*bytes);
        assert!(decode_frame(&mut buf).unwrap().is_none(), "{:?}", bytes);
        assert_eq!(&buf[..], *bytes);
    }
}

#[test]
fn test_decode_byte_at_a_time() {
    let wire = b"2\nok\n3\na\nb\n0\n\n4\n\r\n\r\n\n\n";
    let mut buf = BytesMut::new();

    for (i, byte) in wire.iter().enumerate() {
        buf.extend_from_slice(&[*byte]);
        let result = decode_frame(&mut buf).unwrap();
        if i + 1 < wire.len() {
            assert!(result.is_none(), "premature frame at byte {}", i);
        } else {
            let frame = result.unwrap();
            assert_eq!(
                frame,
                vec![
                    Bytes::from("ok"),
                    Bytes::from("a\nb"),
                    Bytes::new(),
                    Bytes::from("\r\n\r\n"),
                ]
            );
        }
    }
    assert!(buf.is_empty());
}

#[test]
fn test_decode_malformed_length_token() {
    for bad in [&b"abc\n"[..], b"-1\nx\n\n", b"+1\nx\n\n", b"1 \nx\n\n", b"2\r\nok\n\n"] {
        let mut buf = BytesMut::from(bad);
        let result = decode_frame(&mut buf);
        assert!(matches!(result, Err(ClientError::Protocol(_))), "{:?}", bad);
    }
}

#[test]
fn test_decode_malformed_after_valid_field() {
    let mut buf = BytesMut::from(&b"2\nok\nxyz\n"[..]);
    assert!(matches!(decode_frame(&mut buf), Err(ClientError::Protocol(_))));
}

#[test]
fn test_decode_missing_field_terminator() {
    let mut buf = BytesMut::from(&b"2\nokX\n"[..]);
    assert!(matches!(decode_frame(&mut buf), Err(ClientError::Protocol(_))));
}

#[test]
fn test_decode_field_larger_than_64_mib() {
    let value = vec![b'a'; 64 * 1024 * 1024 + 1];
    let wire = encode_fields([&b"ok"[..], &value[..]]);

    let mut buf = BytesMut::from(&wire[..wire.len() - 1]);
    assert!(decode_frame(&mut buf).unwrap().is_none());

    buf.extend_from_slice(b"\n");
    let frame = decode_frame(&mut buf).unwrap().unwrap();
    assert_eq!(frame[1].len(), value.len());
    assert!(buf.is_empty());
}

#[test]
fn test_decode_limited_rejects_oversized_field() {
    let mut buf = BytesMut::from(&b"2\nok\n5\nhello\n\n"[..]);
    let result = decode_frame_limited(&mut buf, Some(4));
    assert!(matches!(result, Err(ClientError::Protocol(_))));

    let mut buf = BytesMut::from(&b"2\nok\n5\nhello\n\n"[..]);
    let frame = decode_frame_limited(&mut buf, Some(5)).unwrap().unwrap();
    assert_eq!(frame[1], Bytes::from("hello"));
}

#[test]
fn test_decode_overflowing_length_token() {
    let token = format!("{}\n", usize::MAX);
    let mut buf = BytesMut::from(token.as_bytes());
    assert!(matches!(decode_frame(&mut buf), Err(ClientError::Protocol(_))));
}

// =============================================================================
// Round Trip Tests
// =============================================================================

#[test]
fn test_round_trip_binary_fields() {
    let fields: Vec<Vec<u8>> = vec![
        b"ok".to_vec(),
        (0..=255).collect(),
        Vec::new(),
        b"\n\n\n".to_vec(),
        b"\r\n".to_vec(),
        b"10\nfake\n".to_vec(),
    ];

    let (frames, rest) = decode_all(&encode_fields(&fields));
    assert!(rest.is_empty());
    assert_eq!(frames.len(), 1);

    let decoded: Vec<Vec<u8>> = frames[0].iter().map(|b| b.to_vec()).collect();
    assert_eq!(decoded, fields);
}

#[test]
fn test_round_trip_command_as_frame() {
    let command = Command::new("multi_set")
        .arg(vec!["k1".to_string(), "v1".to_string()])
        .arg(7i16)
        .arg(Bytes::from_static(b"\x00\n"));

    let (frames, _) = decode_all(&encoded(command));
    assert_eq!(
        frames[0],
        vec![
            Bytes::from("multi_set"),
            Bytes::from("k1"),
            Bytes::from("v1"),
            Bytes::from("7"),
            Bytes::from_static(b"\x00\n"),
        ]
    );
}
