//! Client
//!
//! The command executor: the public entry point for talking to the server.

use std::net::{Shutdown, TcpStream};
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;

use bytes::Bytes;
use parking_lot::Mutex;

use crate::config::Config;
use crate::error::{ClientError, Result};
use crate::protocol::{encode_command, Arg, Command, RecvBuffer, Reply};

use super::Connection;

/// Attempts per command before giving up with `client_error`
pub const MAX_ATTEMPTS: u32 = 3;

/// Size of one socket read
const READ_CHUNK: usize = 8 * 1024;

/// Client for a single server connection
///
/// ## Concurrency
///
/// The protocol has no request identifiers, so replies are matched to
/// requests purely by arrival order. `session` is the gate: a caller holds
/// it from writing a command until that command's frame has been read, so
/// exactly one command is in flight per client. `Client` is `Send + Sync`
/// and may be shared across threads; callers are served in the order they
/// acquire the gate.
///
/// `close()` does not wait for the gate. It shuts the socket down through
/// `abort_handle`, which makes an in-flight command fail its read or write.
pub struct Client {
    config: Config,

    /// Connection and receive buffer; only touched while locked
    session: Mutex<Session>,

    /// Clone of the live socket, for `close()` to abort an in-flight command
    abort_handle: Mutex<Option<TcpStream>>,

    /// Set once by `close()`; a closed client never re-dials
    closed: AtomicBool,
}

/// State owned by the gate
struct Session {
    conn: Option<Connection>,
    recv: RecvBuffer,
}

impl Client {
    /// Connect to the configured server
    ///
    /// Authenticates right away when the config carries a secret; a
    /// non-`ok` answer fails construction.
    pub fn connect(config: Config) -> Result<Self> {
        config.validate()?;

        let conn = Connection::dial(&config.address(), config.effective_timeout())?;
        let client = Self {
            abort_handle: Mutex::new(conn.shutdown_handle()),
            session: Mutex::new(Session {
                conn: Some(conn),
                recv: RecvBuffer::new().with_max_field_size(config.max_field_size),
            }),
            config,
            closed: AtomicBool::new(false),
        };

        if let Some(secret) = client.config.auth.clone() {
            let reply = client.execute(&Command::new("auth").arg(secret))?;
            if !reply.is_ok() {
                client.close();
                return Err(ClientError::Auth(reply.status));
            }
        }

        tracing::debug!("Client ready for {}", client.config.address());
        Ok(client)
    }

    /// Execute one command
    ///
    /// Only an argument that cannot be encoded is returned as `Err`, and
    /// that happens before any I/O. Network trouble is retried; when every
    /// attempt fails the reply status is `client_error`.
    pub fn execute(&self, command: &Command) -> Result<Reply> {
        let payload = encode_command(command)?;
        Ok(self.round_trip(&payload, command.verb().unwrap_or("?")))
    }

    fn round_trip(&self, payload: &[u8], verb: &str) -> Reply {
        let mut session = self.session.lock();

        for attempt in 1..=MAX_ATTEMPTS {
            if self.closed.load(Ordering::Acquire) {
                tracing::debug!("Client closed, not sending {}", verb);
                break;
            }

            // Last attempt always starts from a fresh socket
            if attempt == MAX_ATTEMPTS || session.conn.is_none() {
                if let Err(e) = self.reconnect(&mut session) {
                    tracing::warn!("Reconnect for {} (attempt {}) failed: {}", verb, attempt, e);
                    self.backoff(attempt);
                    continue;
                }
            }

            tracing::trace!("Sending {} (attempt {})", verb, attempt);
            match session.exchange(payload) {
                Ok(fields) => return Reply::from_fields(fields),
                Err(e) => {
                    tracing::warn!("Command {} attempt {} failed: {}", verb, attempt, e);
                    // The stream position is unknown now; start over next time
                    self.drop_connection(&mut session);
                    self.backoff(attempt);
                }
            }
        }

        tracing::warn!("Command {} gave up after {} attempts", verb, MAX_ATTEMPTS);
        Reply::client_error()
    }

    /// Replace the session's socket with a freshly dialed one
    fn reconnect(&self, session: &mut Session) -> Result<()> {
        self.drop_connection(session);

        let address = self.config.address();
        tracing::debug!("Reconnecting to {}", address);
        let conn = Connection::dial(&address, self.config.effective_timeout())?;
        *self.abort_handle.lock() = conn.shutdown_handle();
        session.conn = Some(conn);

        if let Some(secret) = &self.config.auth {
            let auth = encode_command(&Command::new("auth").arg(secret))?;
            let reply = match session.exchange(&auth) {
                Ok(fields) => Reply::from_fields(fields),
                Err(e) => {
                    self.drop_connection(session);
                    return Err(e);
                }
            };
            if !reply.is_ok() {
                self.drop_connection(session);
                return Err(ClientError::Auth(reply.status));
            }
        }

        // close() may have run while we were dialing
        if self.closed.load(Ordering::Acquire) {
            self.drop_connection(session);
            return Err(ClientError::Closed);
        }

        Ok(())
    }

    /// Close the session's socket and forget its abort handle
    fn drop_connection(&self, session: &mut Session) {
        session.disconnect();
        *self.abort_handle.lock() = None;
    }

    fn backoff(&self, attempt: u32) {
        if attempt < MAX_ATTEMPTS {
            thread::sleep(self.config.retry_backoff * attempt);
        }
    }

    /// Close the connection
    ///
    /// Safe to call more than once, from any thread, at any time. A command
    /// in flight fails its read or write and returns `client_error`.
    pub fn close(&self) {
        if self.closed.swap(true, Ordering::AcqRel) {
            return;
        }

        if let Some(stream) = self.abort_handle.lock().take() {
            let _ = stream.shutdown(Shutdown::Both);
        }

        self.drop_connection(&mut self.session.lock());
        tracing::debug!("Client for {} closed", self.config.address());
    }

    /// Whether a socket is currently open
    ///
    /// Waits for any in-flight command to finish.
    pub fn is_connected(&self) -> bool {
        self.session.lock().conn.is_some()
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    // =========================================================================
    // Convenience commands
    // =========================================================================

    /// `get key`
    pub fn get(&self, key: impl Into<Arg>) -> Result<Reply> {
        self.execute(&Command::new("get").arg(key))
    }

    /// `set key value`
    pub fn set(&self, key: impl Into<Arg>, value: impl Into<Arg>) -> Result<Reply> {
        self.execute(&Command::new("set").arg(key).arg(value))
    }

    /// `del key`
    pub fn del(&self, key: impl Into<Arg>) -> Result<Reply> {
        self.execute(&Command::new("del").arg(key))
    }

    /// `multi_set k1 v1 k2 v2 ...`
    pub fn multi_set(&self, pairs: impl Into<Arg>) -> Result<Reply> {
        self.execute(&Command::new("multi_set").arg(pairs))
    }

    /// `multi_get k1 k2 ...`
    pub fn multi_get(&self, keys: impl Into<Arg>) -> Result<Reply> {
        self.execute(&Command::new("multi_get").arg(keys))
    }

    /// `multi_del k1 k2 ...`
    pub fn multi_del(&self, keys: impl Into<Arg>) -> Result<Reply> {
        self.execute(&Command::new("multi_del").arg(keys))
    }

    /// `scan start end limit`
    pub fn scan(
        &self,
        start: impl Into<Arg>,
        end: impl Into<Arg>,
        limit: u64,
    ) -> Result<Reply> {
        self.execute(&Command::new("scan").arg(start).arg(end).arg(limit))
    }
}

impl Session {
    /// Write one request and read back exactly one frame
    fn exchange(&mut self, payload: &[u8]) -> Result<Vec<Bytes>> {
        let conn = self.conn.as_mut().ok_or(ClientError::Closed)?;
        conn.write(payload)?;

        let mut chunk = [0u8; READ_CHUNK];
        loop {
            if let Some(frame) = self.recv.next_frame()? {
                tracing::trace!("Received frame of {} fields", frame.len());
                return Ok(frame);
            }

            let n = conn.read(&mut chunk)?;
            self.recv.extend(&chunk[..n]);
        }
    }

    fn disconnect(&mut self) {
        if let Some(mut conn) = self.conn.take() {
            conn.close();
        }
        self.recv.clear();
    }
}

impl Drop for Client {
    fn drop(&mut self) {
        self.close();
    }
}

impl std::fmt::Debug for Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client")
            .field("address", &self.config.address())
            .field("closed", &self.is_closed())
            .finish_non_exhaustive()
    }
}
