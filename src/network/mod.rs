//! Network Module
//!
//! TCP connection handling and the command executor.
//!
//! ## Architecture
//! - One `Connection` (one socket) per `Client`
//! - A single gate serializes commands: one request in flight at a time
//! - Failed exchanges drop the socket; the retry policy re-dials

mod connection;
mod client;

pub use connection::Connection;
pub use client::{Client, MAX_ATTEMPTS};
