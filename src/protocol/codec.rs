//! Protocol codec
//!
//! Encoding and decoding functions for the wire protocol.
//!
//! ## Wire Format
//!
//! Requests and responses share one framing: a sequence of fields, each
//! prefixed by its decimal byte length on its own line, closed by a blank
//! line.
//!
//! ```text
//! ┌──────────┬────┬───────────────┬────┐        ┌────┐
//! │ len (10) │ \n │  raw bytes    │ \n │  ...   │ \n │
//! └──────────┴────┴───────────────┴────┘        └────┘
//!  ─────────────── one field ──────────          end of frame
//! ```
//!
//! In a response the first field is the status code (`ok`, `not_found`,
//! `error`, ...) and the remaining fields are payload.

use bytes::{BufMut, Bytes, BytesMut};

use super::{Arg, Command};
use crate::error::{ClientError, Result};

/// Field and frame terminator
const LINE_END: u8 = b'\n';

// =============================================================================
// Encoding
// =============================================================================

/// Encode a command to bytes
///
/// Every argument is rendered before anything is returned, so an argument
/// that cannot be encoded fails the whole command. A command that renders
/// to no fields at all would be read by the server as a blank line and
/// never answered, so it is rejected as well.
pub fn encode_command(command: &Command) -> Result<BytesMut> {
    let mut buf = BytesMut::with_capacity(64);

    for arg in command.args() {
        encode_arg(&mut buf, arg)?;
    }
    if buf.is_empty() {
        return Err(ClientError::Argument("command has no fields".to_string()));
    }
    buf.put_u8(LINE_END);

    Ok(buf)
}

/// Encode arbitrary byte fields as one frame
///
/// Responses use the same framing as requests, so this is also how a
/// server would write a reply.
pub fn encode_fields<I, F>(fields: I) -> BytesMut
where
    I: IntoIterator<Item = F>,
    F: AsRef<[u8]>,
{
    let mut buf = BytesMut::new();
    for field in fields {
        put_field(&mut buf, field.as_ref());
    }
    buf.put_u8(LINE_END);
    buf
}

fn encode_arg(buf: &mut BytesMut, arg: &Arg) -> Result<()> {
    match arg {
        Arg::Bytes(b) => put_field(buf, b),
        Arg::Text(s) => put_field(buf, s.as_bytes()),
        Arg::Int(i) => put_field(buf, i.to_string().as_bytes()),
        Arg::Uint(u) => put_field(buf, u.to_string().as_bytes()),
        Arg::Float(f) => {
            if !f.is_finite() {
                return Err(ClientError::Argument(format!(
                    "float {} has no fixed-point form",
                    f
                )));
            }
            put_field(buf, format!("{:.6}", f).as_bytes())
        }
        Arg::Bool(b) => put_field(buf, if *b { b"1" } else { b"0" }),
        Arg::Null => put_field(buf, b""),
        Arg::TextList(items) => {
            for s in items {
                put_field(buf, s.as_bytes());
            }
        }
        Arg::BytesList(items) => {
            for b in items {
                put_field(buf, b);
            }
        }
    }
    Ok(())
}

fn put_field(buf: &mut BytesMut, value: &[u8]) {
    buf.reserve(value.len() + 12);
    buf.put_slice(value.len().to_string().as_bytes());
    buf.put_u8(LINE_END);
    buf.put_slice(value);
    buf.put_u8(LINE_END);
}

// =============================================================================
// Decoding
// =============================================================================

/// Decode one frame from the front of `buf`
///
/// Returns:
/// - `Ok(Some(fields))`: a complete frame; its bytes are removed from `buf`
/// - `Ok(None)`: the frame is still pending; `buf` keeps every byte of it
/// - `Err(ClientError::Protocol)`: a length token is not a valid size
///
/// Leading blank lines before the first field are discarded. Field sizes
/// are not capped; see [`decode_frame_limited`].
pub fn decode_frame(buf: &mut BytesMut) -> Result<Option<Vec<Bytes>>> {
    decode_frame_limited(buf, None)
}

/// Decode one frame, rejecting any field announced larger than `max_field_size`
pub fn decode_frame_limited(
    buf: &mut BytesMut,
    max_field_size: Option<usize>,
) -> Result<Option<Vec<Bytes>>> {
    // Scan position; only committed once the whole frame is buffered
    let mut offset = 0;
    let mut fields: Vec<(usize, usize)> = Vec::new();

    loop {
        let idx = match buf[offset..].iter().position(|&b| b == LINE_END) {
            Some(idx) => idx,
            None => return Ok(None),
        };

        let token = &buf[offset..offset + idx];
        let next = offset + idx + 1;

        if token.is_empty() || token == b"\r" {
            if fields.is_empty() {
                // Leading blank line, nothing pending yet
                let _ = buf.split_to(next);
                offset = 0;
                continue;
            }

            let frame = buf.split_to(next).freeze();
            return Ok(Some(
                fields
                    .into_iter()
                    .map(|(start, end)| frame.slice(start..end))
                    .collect(),
            ));
        }

        let size = parse_size(token)?;
        if let Some(max) = max_field_size {
            if size > max {
                return Err(ClientError::Protocol(format!(
                    "field too large: {} bytes (max {})",
                    size, max
                )));
            }
        }

        // Payload plus its terminator must be buffered
        let end = next.checked_add(size).ok_or_else(|| {
            ClientError::Protocol(format!("field size {} overflows the buffer", size))
        })?;
        if end >= buf.len() {
            return Ok(None);
        }

        if buf[end] != LINE_END {
            return Err(ClientError::Protocol(format!(
                "field of {} bytes not followed by a line terminator",
                size
            )));
        }

        fields.push((next, end));
        offset = end + 1;
    }
}

fn parse_size(token: &[u8]) -> Result<usize> {
    std::str::from_utf8(token)
        .ok()
        .filter(|s| s.bytes().all(|b| b.is_ascii_digit()))
        .and_then(|s| s.parse::<usize>().ok())
        .ok_or_else(|| {
            ClientError::Protocol(format!(
                "invalid length token {:?}",
                String::from_utf8_lossy(token)
            ))
        })
}
