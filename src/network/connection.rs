//! Connection
//!
//! Owns the TCP socket to the server.

use std::io::{ErrorKind, Read, Write};
use std::net::{Shutdown, TcpStream, ToSocketAddrs};
use std::time::Duration;

use crate::error::{ClientError, Result};

/// A single TCP connection with per-call deadlines
///
/// `stream` is `None` once the connection is closed.
#[derive(Debug)]
pub struct Connection {
    stream: Option<TcpStream>,

    /// Deadline applied to every write and read
    timeout: Duration,

    /// Peer address for logging
    peer_addr: String,
}

impl Connection {
    /// Connect to `address`, trying each resolved address in turn
    pub fn dial(address: &str, timeout: Duration) -> Result<Self> {
        let addrs = address
            .to_socket_addrs()
            .map_err(|e| ClientError::Connection(format!("resolve {}: {}", address, e)))?;

        let mut last_err = None;
        for addr in addrs {
            match TcpStream::connect_timeout(&addr, timeout) {
                Ok(stream) => {
                    // Disable Nagle's algorithm for low latency
                    stream.set_nodelay(true)?;
                    tracing::debug!("Connected to {}", addr);
                    return Ok(Self {
                        stream: Some(stream),
                        timeout,
                        peer_addr: addr.to_string(),
                    });
                }
                Err(e) => {
                    tracing::debug!("Dial {} failed: {}", addr, e);
                    last_err = Some(e);
                }
            }
        }

        Err(ClientError::Connection(match last_err {
            Some(e) => format!("connect {}: {}", address, e),
            None => format!("resolve {}: no addresses", address),
        }))
    }

    /// Write all of `bytes` under a fresh write deadline
    pub fn write(&mut self, bytes: &[u8]) -> Result<()> {
        let stream = self.stream.as_mut().ok_or(ClientError::Closed)?;
        stream.set_write_timeout(Some(self.timeout))?;
        stream.write_all(bytes)?;
        stream.flush()?;
        Ok(())
    }

    /// Perform one read under a fresh read deadline
    ///
    /// End of stream is reported as `ClientError::Closed`.
    pub fn read(&mut self, buf: &mut [u8]) -> Result<usize> {
        let stream = self.stream.as_mut().ok_or(ClientError::Closed)?;
        stream.set_read_timeout(Some(self.timeout))?;
        loop {
            match stream.read(buf) {
                Ok(0) => return Err(ClientError::Closed),
                Ok(n) => return Ok(n),
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            }
        }
    }

    /// A second handle on the socket, able to shut it down from another thread
    pub fn shutdown_handle(&self) -> Option<TcpStream> {
        self.stream.as_ref().and_then(|s| s.try_clone().ok())
    }

    /// Close the socket; calling it again is a no-op
    pub fn close(&mut self) {
        if let Some(stream) = self.stream.take() {
            let _ = stream.shutdown(Shutdown::Both);
            tracing::debug!("Closed connection to {}", self.peer_addr);
        }
    }

    pub fn is_open(&self) -> bool {
        self.stream.is_some()
    }

    /// Get the peer address string
    pub fn peer_addr(&self) -> &str {
        &self.peer_addr
    }
}

impl Drop for Connection {
    fn drop(&mut self) {
        self.close();
    }
}
