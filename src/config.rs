//! Configuration for kvwire
//!
//! Centralized client configuration with sensible defaults.

use std::time::Duration;

use crate::error::{ClientError, Result};

/// Timeout applied when none (or zero) is configured
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(3);

/// Base delay between retry attempts; scaled by the attempt number
pub const DEFAULT_RETRY_BACKOFF: Duration = Duration::from_millis(100);

/// Client configuration
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Server Address
    // -------------------------------------------------------------------------
    /// Server host name or IP address
    pub host: String,

    /// Server TCP port
    pub port: u16,

    // -------------------------------------------------------------------------
    // Authentication
    // -------------------------------------------------------------------------
    /// Shared secret sent with `auth` right after connecting
    pub auth: Option<String>,

    // -------------------------------------------------------------------------
    // Timing
    // -------------------------------------------------------------------------
    /// Deadline for each dial, write and read
    pub timeout: Duration,

    /// Backoff unit between failed attempts (attempt N sleeps N units)
    pub retry_backoff: Duration,

    // -------------------------------------------------------------------------
    // Limits
    // -------------------------------------------------------------------------
    /// Largest reply field accepted; `None` accepts any size
    pub max_field_size: Option<usize>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8888,
            auth: None,
            timeout: DEFAULT_TIMEOUT,
            retry_backoff: DEFAULT_RETRY_BACKOFF,
            max_field_size: None,
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// `host:port` form used for dialing
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Effective per-operation timeout; zero falls back to the default
    pub fn effective_timeout(&self) -> Duration {
        if self.timeout.is_zero() {
            DEFAULT_TIMEOUT
        } else {
            self.timeout
        }
    }

    /// Reject configurations that can never connect
    pub fn validate(&self) -> Result<()> {
        if self.host.trim().is_empty() {
            return Err(ClientError::Config("host must not be empty".to_string()));
        }
        if self.port == 0 {
            return Err(ClientError::Config("port must not be 0".to_string()));
        }
        if self.max_field_size == Some(0) {
            return Err(ClientError::Config(
                "max_field_size must not be 0".to_string(),
            ));
        }
        Ok(())
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the server host
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.config.host = host.into();
        self
    }

    /// Set the server port
    pub fn port(mut self, port: u16) -> Self {
        self.config.port = port;
        self
    }

    /// Set the shared secret; an empty secret disables authentication
    pub fn auth(mut self, secret: impl Into<String>) -> Self {
        let secret = secret.into();
        self.config.auth = if secret.is_empty() { None } else { Some(secret) };
        self
    }

    /// Set the per-operation timeout in whole seconds (0 = default)
    pub fn timeout_secs(mut self, secs: u64) -> Self {
        self.config.timeout = Duration::from_secs(secs);
        self
    }

    /// Set the per-operation timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Set the retry backoff unit (in milliseconds)
    pub fn retry_backoff_ms(mut self, ms: u64) -> Self {
        self.config.retry_backoff = Duration::from_millis(ms);
        self
    }

    /// Cap the size of a single reply field
    pub fn max_field_size(mut self, bytes: usize) -> Self {
        self.config.max_field_size = Some(bytes);
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
