//! Error types

use crate::protocol::{ProtocolVersion, ServerVersion};
use std::io;
use std::time::Duration;
use thiserror::Error;

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by client construction, drivers and pools
#[derive(Debug, Error)]
pub enum Error {
    /// Malformed, missing or contradictory configuration
    #[error("configuration error: {0}")]
    Configuration(String),

    /// A protocol version was requested that the configuration does not allow
    #[error("invalid version: attempting to use {requested} driver when actual version is [{server_version}]{}", negotiation_hint(.negotiated))]
    InvalidVersion {
        /// Protocol the caller asked for
        requested: ProtocolVersion,
        /// Server version identifier known to the client
        server_version: ServerVersion,
        /// Whether version negotiation was enabled or performed
        negotiated: bool,
    },

    /// Pool construction or checkout failure
    #[error("pool error: {0}")]
    Pool(String),

    /// Could not establish a connection
    #[error("connection error: {0}")]
    Connection(String),

    /// Unexpected bytes from the server
    #[error("protocol error: {0}")]
    Protocol(String),

    /// TLS setup or handshake failure
    #[error("TLS error: {0}")]
    Tls(String),

    /// Connect or handshake exceeded the configured timeout
    #[error("timed out after {0:?}")]
    Timeout(Duration),

    /// Driver, pool or connection already closed
    #[error("connection closed")]
    ConnectionClosed,

    /// Write access requested from a read-only driver
    #[error("driver is read-only, write access is not allowed")]
    ReadOnly,

    /// Operation attempted in the wrong connection state
    #[error("invalid state: expected {expected}, got {actual}")]
    InvalidState {
        /// Expected state description
        expected: String,
        /// Actual state description
        actual: String,
    },

    /// I/O error from the transport
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

fn negotiation_hint(negotiated: &bool) -> &'static str {
    if *negotiated {
        ""
    } else {
        " (version negotiation was not enabled)"
    }
}

impl Error {
    /// Whether this is a configuration error
    pub fn is_configuration(&self) -> bool {
        matches!(self, Error::Configuration(_))
    }

    /// Whether this is a version-gating error
    pub fn is_invalid_version(&self) -> bool {
        matches!(self, Error::InvalidVersion { .. })
    }

    /// Short, stable label for metrics
    pub fn category(&self) -> &'static str {
        match self {
            Error::Configuration(_) => "configuration",
            Error::InvalidVersion { .. } => "invalid_version",
            Error::Pool(_) => "pool",
            Error::Connection(_) => "connection",
            Error::Protocol(_) => "protocol",
            Error::Tls(_) => "tls",
            Error::Timeout(_) => "timeout",
            Error::ConnectionClosed => "closed",
            Error::ReadOnly => "read_only",
            Error::InvalidState { .. } => "invalid_state",
            Error::Io(_) => "io",
        }
    }

    /// Build a configuration error
    pub(crate) fn config(msg: impl Into<String>) -> Self {
        Error::Configuration(msg.into())
    }
}
