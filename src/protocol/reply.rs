//! Reply definitions
//!
//! A reply is the decoded response to one command: the status code plus
//! the payload fields that followed it.

use std::str::FromStr;

use bytes::Bytes;
use serde::de::DeserializeOwned;

use crate::error::{ClientError, Result};

/// Status codes used by the server and by the client itself
pub mod status {
    /// Command succeeded
    pub const OK: &str = "ok";

    /// Key does not exist
    pub const NOT_FOUND: &str = "not_found";

    /// Server-side failure
    pub const ERROR: &str = "error";

    /// Server rejected the command arguments
    pub const FAIL: &str = "fail";

    /// The client could not complete the round trip
    pub const CLIENT_ERROR: &str = "client_error";
}

/// The decoded result of one command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    /// Status code (first field of the frame)
    pub status: String,

    /// Payload fields (the rest of the frame)
    pub data: Vec<Bytes>,
}

/// One pair from a key/value shaped reply (`scan`, `multi_get`, ...)
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct KeyValue {
    pub key: String,
    pub value: String,
}

impl Reply {
    /// Build a reply from a decoded frame
    pub fn from_fields(mut fields: Vec<Bytes>) -> Self {
        if fields.is_empty() {
            return Self::client_error();
        }
        let status = String::from_utf8_lossy(&fields.remove(0)).into_owned();
        Self {
            status,
            data: fields,
        }
    }

    /// The reply returned when every attempt failed
    pub fn client_error() -> Self {
        Self {
            status: status::CLIENT_ERROR.to_string(),
            data: Vec::new(),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.status == status::OK
    }

    pub fn is_not_found(&self) -> bool {
        self.status == status::NOT_FOUND
    }

    /// Server-side failure (`error` or `fail`)
    pub fn is_error(&self) -> bool {
        self.status == status::ERROR || self.status == status::FAIL
    }

    pub fn is_client_error(&self) -> bool {
        self.status == status::CLIENT_ERROR
    }

    /// First payload field, if any
    pub fn first(&self) -> Option<&Bytes> {
        self.data.first()
    }

    // -------------------------------------------------------------------------
    // Projections over the first field
    // -------------------------------------------------------------------------

    /// First field as text (lossy), empty when missing
    pub fn string(&self) -> String {
        self.first()
            .map(|b| String::from_utf8_lossy(b).into_owned())
            .unwrap_or_default()
    }

    /// First field as raw bytes, empty when missing
    pub fn bytes(&self) -> Bytes {
        self.first().cloned().unwrap_or_default()
    }

    /// First field parsed as a number; zero when missing or unparsable
    pub fn int<T: FromStr + Default>(&self) -> T {
        self.parse_first().unwrap_or_default()
    }

    pub fn i32(&self) -> i32 {
        self.int()
    }

    pub fn i64(&self) -> i64 {
        self.int()
    }

    pub fn u64(&self) -> u64 {
        self.int()
    }

    pub fn f64(&self) -> f64 {
        self.parse_first().unwrap_or_default()
    }

    /// First field as a boolean; false when missing or unrecognized
    pub fn bool(&self) -> bool {
        matches!(
            self.first().map(|b| &b[..]),
            Some(b"1" | b"t" | b"T" | b"TRUE" | b"true" | b"True")
        )
    }

    /// First field decoded as JSON
    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        let raw = self.first().ok_or(ClientError::PayloadMissing)?;
        Ok(serde_json::from_slice(raw)?)
    }

    fn parse_first<T: FromStr>(&self) -> Option<T> {
        let raw = self.first()?;
        std::str::from_utf8(raw).ok()?.parse().ok()
    }

    // -------------------------------------------------------------------------
    // Projections over all fields
    // -------------------------------------------------------------------------

    /// Every payload field as text
    pub fn list(&self) -> Vec<String> {
        self.data
            .iter()
            .map(|b| String::from_utf8_lossy(b).into_owned())
            .collect()
    }

    /// Consecutive fields paired as key/value; a trailing odd field is dropped
    pub fn hash(&self) -> Vec<KeyValue> {
        self.data
            .chunks_exact(2)
            .map(|pair| KeyValue {
                key: String::from_utf8_lossy(&pair[0]).into_owned(),
                value: String::from_utf8_lossy(&pair[1]).into_owned(),
            })
            .collect()
    }
}

impl KeyValue {
    /// Value decoded as JSON; a pair without a key counts as missing
    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        if self.key.is_empty() {
            return Err(ClientError::PayloadMissing);
        }
        Ok(serde_json::from_str(&self.value)?)
    }
}
