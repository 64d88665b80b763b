//! Protocol Module
//!
//! Defines the wire protocol spoken with the key-value server.
//!
//! ## Protocol Format
//!
//! ### Request
//! ```text
//! 3\nset\n3\nkey\n5\nvalue\n\n
//! ```
//!
//! ### Response
//! ```text
//! 2\nok\n1\n1\n\n
//! ```
//!
//! Every field is `<decimal length>\n<raw bytes>\n`; a blank line (`\n`
//! or `\r\n`) closes the frame. Payloads are binary safe. There are no
//! request identifiers, so only one request may be outstanding per
//! connection.
//!
//! ### Status Codes
//! - `ok`
//! - `not_found`
//! - `error` / `fail` (see [`Reply::is_error`])
//! - `client_error` (produced locally when the round trip fails)

mod command;
mod reply;
mod buffer;
mod codec;

pub use command::{Arg, Command};
pub use reply::{status, KeyValue, Reply};
pub use buffer::RecvBuffer;
pub use codec::{decode_frame, decode_frame_limited, encode_command, encode_fields};
