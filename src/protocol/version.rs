//! Server version identifiers

use super::constants::PROPOSAL_COUNT;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Four-byte server version identifier in handshake layout.
///
/// Bytes are `[0, 0, minor, major]`, the same big-endian word the server
/// returns when it agrees on a version. All zeros means "unknown", which
/// the client treats as the oldest protocol.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ServerVersion([u8; 4]);

impl ServerVersion {
    /// Unknown version (all zero bytes)
    pub const UNKNOWN: ServerVersion = ServerVersion([0; 4]);

    /// Build from major and minor numbers
    pub const fn new(major: u8, minor: u8) -> Self {
        ServerVersion([0, 0, minor, major])
    }

    /// Wrap raw handshake bytes
    pub const fn from_bytes(bytes: [u8; 4]) -> Self {
        ServerVersion(bytes)
    }

    /// Raw handshake bytes
    pub const fn to_bytes(self) -> [u8; 4] {
        self.0
    }

    /// Major version
    pub fn major(&self) -> u8 {
        self.0[3]
    }

    /// Minor version
    pub fn minor(&self) -> u8 {
        self.0[2]
    }

    /// Whether no version is known
    pub fn is_unknown(&self) -> bool {
        self.0 == [0; 4]
    }

    /// Parse `"4"`, `"4.1"` or `"4.1.0"` (patch is ignored)
    pub fn parse(s: &str) -> Result<Self> {
        let s = s.trim();
        let mut parts = s.split('.');

        let major = parts
            .next()
            .filter(|p| !p.is_empty())
            .ok_or_else(|| Error::config("server version can not be empty"))?;
        let major: u8 = major
            .parse()
            .map_err(|_| Error::config(format!("invalid server version [{}]", s)))?;

        let minor: u8 = match parts.next() {
            Some(m) => m
                .parse()
                .map_err(|_| Error::config(format!("invalid server version [{}]", s)))?,
            None => 0,
        };

        if let Some(patch) = parts.next() {
            if patch.parse::<u32>().is_err() || parts.next().is_some() {
                return Err(Error::config(format!("invalid server version [{}]", s)));
            }
        }

        Ok(ServerVersion::new(major, minor))
    }
}

impl fmt::Display for ServerVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major(), self.minor())
    }
}

impl std::str::FromStr for ServerVersion {
    type Err = Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        ServerVersion::parse(s)
    }
}

/// Protocol generation a driver speaks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProtocolVersion {
    /// Baseline protocol
    V3,
    /// Multi-database selection and explicit transaction semantics
    V4,
}

impl ProtocolVersion {
    /// Whether drivers of this version need confirmed server support
    pub fn requires_confirmed_support(self) -> bool {
        matches!(self, ProtocolVersion::V4)
    }

    /// Whether an agreed server version is usable by this protocol
    pub fn accepts(self, agreed: ServerVersion) -> bool {
        match self {
            ProtocolVersion::V3 => agreed.major() >= 1,
            ProtocolVersion::V4 => agreed.major() >= 4,
        }
    }

    /// Metric/log label
    pub fn as_str(self) -> &'static str {
        match self {
            ProtocolVersion::V3 => "v3",
            ProtocolVersion::V4 => "v4",
        }
    }
}

impl fmt::Display for ProtocolVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Version proposals sent after the handshake preamble, most preferred first.
///
/// v4 drivers lead with the configured server version when it is a 4.x
/// identifier and keep 3.0 as a fallback so an older server answers with a
/// version the driver can report instead of closing the socket.
pub fn handshake_proposals(
    protocol: ProtocolVersion,
    configured: ServerVersion,
) -> [ServerVersion; PROPOSAL_COUNT] {
    match protocol {
        ProtocolVersion::V3 => [
            ServerVersion::new(3, 0),
            ServerVersion::new(2, 0),
            ServerVersion::new(1, 0),
            ServerVersion::UNKNOWN,
        ],
        ProtocolVersion::V4 => {
            let preferred = if configured.major() >= 4 {
                configured
            } else {
                ServerVersion::new(4, 0)
            };
            [
                preferred,
                ServerVersion::new(4, 0),
                ServerVersion::new(3, 0),
                ServerVersion::UNKNOWN,
            ]
        }
    }
}
