//! Bolt connection lifecycle

use crate::{Error, Result};
use std::fmt;

/// Where a connection is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    /// Socket open, preamble not sent
    Initial,

    /// Version proposals sent, waiting for the server's choice
    Handshaking,

    /// Version agreed; the session layer may take over
    Ready,

    /// Shut down, terminal
    Closed,
}

impl ConnectionState {
    /// Lower-case name used in logs and errors
    pub fn as_str(self) -> &'static str {
        match self {
            ConnectionState::Initial => "initial",
            ConnectionState::Handshaking => "handshaking",
            ConnectionState::Ready => "ready",
            ConnectionState::Closed => "closed",
        }
    }

    /// Whether `next` may follow `self`. Closing is allowed from anywhere
    /// except an already closed connection.
    pub fn can_transition_to(self, next: ConnectionState) -> bool {
        use ConnectionState::*;

        match (self, next) {
            (Closed, _) => false,
            (_, Closed) => true,
            (Initial, Handshaking) | (Handshaking, Ready) => true,
            _ => false,
        }
    }

    /// Move to `next`, or fail with [`Error::InvalidState`] leaving `self` unchanged
    pub fn transition(&mut self, next: ConnectionState) -> Result<()> {
        if !self.can_transition_to(next) {
            return Err(Error::InvalidState {
                expected: format!("a state reachable from {}", self),
                actual: next.to_string(),
            });
        }
        tracing::trace!(from = self.as_str(), to = next.as_str(), "connection state");
        *self = next;
        Ok(())
    }
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
