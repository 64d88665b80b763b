//! # kvwire
//!
//! A blocking client for key-value stores that speak a length-prefixed,
//! text-framed request/response protocol:
//! - Typed command arguments with a closed set of encodings
//! - Incremental frame parsing over a growing receive buffer
//! - One persistent TCP connection per client, one command in flight
//! - Automatic reconnect-and-retry on I/O failure
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                  Callers (any number of threads)             │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │ execute(Command)
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                 Client (gate + retry policy)                 │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//!          ┌────────────┴────────────┐
//!          │                         │
//!          ▼                         ▼
//!   ┌─────────────┐          ┌─────────────┐
//!   │    Codec    │          │ Connection  │
//!   │  (encode)   │          │ (TcpStream) │
//!   └─────────────┘          └──────┬──────┘
//!                                   │ read
//!                                   ▼
//!                           ┌─────────────┐
//!                           │ RecvBuffer  │
//!                           │  (decode)   │
//!                           └─────────────┘
//! ```
//!
//! ## Example
//!
//! ```no_run
//! use kvwire::{Client, Command, Config};
//!
//! let client = Client::connect(Config::builder().host("127.0.0.1").port(8888).build())?;
//! client.execute(&Command::new("set").arg("k").arg("v"))?;
//! let reply = client.get("k")?;
//! assert_eq!(reply.string(), "v");
//! # Ok::<(), kvwire::ClientError>(())
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod protocol;
pub mod network;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{ClientError, Result};
pub use config::Config;
pub use network::Client;
pub use protocol::{status, Arg, Command, KeyValue, Reply};

// =============================================================================
// Version Info
// =============================================================================

/// Current version of kvwire
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
