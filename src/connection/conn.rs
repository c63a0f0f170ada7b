//! Core connection type

use super::state::ConnectionState;
use super::transport::Transport;
use crate::protocol::constants::{BOLT_MAGIC, HANDSHAKE_LEN};
use crate::protocol::{handshake_proposals, ProtocolVersion, ServerVersion};
use crate::{Error, Result};
use bytes::{BufMut, BytesMut};
use std::fmt;

/// Access mode a connection is opened with
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum AccessMode {
    /// Read-only work; may be served by any cluster member
    Read,
    /// Writes; must reach a leader
    #[default]
    Write,
}

impl AccessMode {
    /// Metric/log label
    pub fn as_str(self) -> &'static str {
        match self {
            AccessMode::Read => "read",
            AccessMode::Write => "write",
        }
    }
}

impl fmt::Display for AccessMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A connection to a Bolt server that completed the version handshake
pub struct BoltConnection {
    transport: Transport,
    state: ConnectionState,
    agreed_version: ServerVersion,
    access_mode: AccessMode,
    chunk_size: u16,
    database: Option<String>,
    create_if_not_exists: bool,
}

impl BoltConnection {
    /// Wrap a freshly connected transport
    pub fn new(transport: Transport, chunk_size: u16) -> Self {
        Self {
            transport,
            state: ConnectionState::Initial,
            agreed_version: ServerVersion::UNKNOWN,
            access_mode: AccessMode::default(),
            chunk_size,
            database: None,
            create_if_not_exists: false,
        }
    }

    /// Send the preamble and version proposals, then read the agreed version.
    ///
    /// A v4 connection fails with [`Error::InvalidVersion`] when the server
    /// only agrees on an older protocol.
    pub async fn handshake(
        &mut self,
        protocol: ProtocolVersion,
        configured: ServerVersion,
    ) -> Result<ServerVersion> {
        self.state.transition(ConnectionState::Handshaking)?;

        let mut buf = BytesMut::with_capacity(HANDSHAKE_LEN);
        buf.put_slice(&BOLT_MAGIC);
        for proposal in handshake_proposals(protocol, configured) {
            buf.put_slice(&proposal.to_bytes());
        }
        self.transport.write_all(&buf).await?;
        self.transport.flush().await?;

        let mut reply = [0u8; 4];
        self.transport.read_exact(&mut reply).await?;

        if &reply == b"HTTP" {
            return Err(Error::Protocol(
                "server answered with HTTP, check that the port is the Bolt port".into(),
            ));
        }
        if reply[0] != 0 {
            return Err(Error::Protocol(format!(
                "unexpected handshake response: {:02X?}",
                reply
            )));
        }

        let agreed = ServerVersion::from_bytes(reply);
        if agreed.is_unknown() {
            return Err(Error::Protocol(
                "server rejected all proposed protocol versions".into(),
            ));
        }
        if !protocol.accepts(agreed) {
            return Err(Error::InvalidVersion {
                requested: protocol,
                server_version: agreed,
                negotiated: true,
            });
        }

        self.agreed_version = agreed;
        self.state.transition(ConnectionState::Ready)?;
        tracing::debug!(version = %agreed, "bolt handshake complete");
        Ok(agreed)
    }

    /// Version agreed during the handshake
    pub fn agreed_version(&self) -> ServerVersion {
        self.agreed_version
    }

    /// Access mode the connection was handed out with
    pub fn access_mode(&self) -> AccessMode {
        self.access_mode
    }

    /// Framing chunk size
    pub fn chunk_size(&self) -> u16 {
        self.chunk_size
    }

    /// Selected database, if any
    pub fn database(&self) -> Option<&str> {
        self.database.as_deref()
    }

    /// Whether selecting a missing database creates it
    pub fn creates_missing_database(&self) -> bool {
        self.create_if_not_exists
    }

    /// Current state
    pub fn state(&self) -> ConnectionState {
        self.state
    }

    /// Whether the connection is usable
    pub fn is_open(&self) -> bool {
        self.state == ConnectionState::Ready
    }

    /// Whether the transport is TLS-encrypted
    pub fn is_encrypted(&self) -> bool {
        self.transport.is_tls()
    }

    pub(crate) fn set_access_mode(&mut self, mode: AccessMode) {
        self.access_mode = mode;
    }

    pub(crate) fn select_database(&mut self, database: Option<String>, create_if_not_exists: bool) {
        self.database = database;
        self.create_if_not_exists = create_if_not_exists;
    }

    /// Close the connection. Closing twice is a no-op.
    pub async fn close(&mut self) -> Result<()> {
        if self.state == ConnectionState::Closed {
            return Ok(());
        }
        self.state.transition(ConnectionState::Closed)?;
        self.transport.shutdown().await
    }
}

impl fmt::Debug for BoltConnection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BoltConnection")
            .field("state", &self.state)
            .field("agreed_version", &self.agreed_version)
            .field("access_mode", &self.access_mode)
            .field("database", &self.database)
            .field("encrypted", &self.transport.is_tls())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connection::testing::FakeServer;

    async fn connect(server: &FakeServer) -> BoltConnection {
        let transport = Transport::connect_tcp("127.0.0.1", server.port())
            .await
            .unwrap();
        BoltConnection::new(transport, 1024)
    }

    #[tokio::test]
    async fn test_handshake_v3() {
        let server = FakeServer::start(ServerVersion::new(3, 0)).await;
        let mut conn = connect(&server).await;

        let agreed = conn
            .handshake(ProtocolVersion::V3, ServerVersion::UNKNOWN)
            .await
            .unwrap();
        assert_eq!(agreed, ServerVersion::new(3, 0));
        assert!(conn.is_open());
        assert_eq!(conn.chunk_size(), 1024);

        let request = server.next_handshake().await;
        assert_eq!(&request[..4], &BOLT_MAGIC);
        assert_eq!(&request[4..8], &[0, 0, 0, 3]);
    }

    #[tokio::test]
    async fn test_handshake_v4_rejects_older_server() {
        let server = FakeServer::start(ServerVersion::new(3, 0)).await;
        let mut conn = connect(&server).await;

        let err = conn
            .handshake(ProtocolVersion::V4, ServerVersion::new(4, 1))
            .await
            .unwrap_err();
        match err {
            Error::InvalidVersion {
                server_version,
                negotiated,
                ..
            } => {
                assert_eq!(server_version, ServerVersion::new(3, 0));
                assert!(negotiated);
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(!conn.is_open());

        let request = server.next_handshake().await;
        assert_eq!(&request[4..8], &[0, 0, 1, 4]);
    }

    #[tokio::test]
    async fn test_handshake_no_agreement() {
        let server = FakeServer::start(ServerVersion::UNKNOWN).await;
        let mut conn = connect(&server).await;

        let err = conn
            .handshake(ProtocolVersion::V3, ServerVersion::UNKNOWN)
            .await
            .unwrap_err();
        assert_eq!(err.category(), "protocol");
    }

    #[tokio::test]
    async fn test_handshake_http_response() {
        let server = FakeServer::start(ServerVersion::from_bytes(*b"HTTP")).await;
        let mut conn = connect(&server).await;

        let err = conn
            .handshake(ProtocolVersion::V3, ServerVersion::UNKNOWN)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("HTTP"));
    }

    #[tokio::test]
    async fn test_close_is_idempotent() {
        let server = FakeServer::start(ServerVersion::new(4, 0)).await;
        let mut conn = connect(&server).await;
        conn.handshake(ProtocolVersion::V4, ServerVersion::UNKNOWN)
            .await
            .unwrap();

        conn.close().await.unwrap();
        assert_eq!(conn.state(), ConnectionState::Closed);
        conn.close().await.unwrap();
    }

    #[tokio::test]
    async fn test_handshake_twice_is_invalid() {
        let server = FakeServer::start(ServerVersion::new(3, 0)).await;
        let mut conn = connect(&server).await;
        conn.handshake(ProtocolVersion::V3, ServerVersion::UNKNOWN)
            .await
            .unwrap();

        let err = conn
            .handshake(ProtocolVersion::V3, ServerVersion::UNKNOWN)
            .await
            .unwrap_err();
        assert_eq!(err.category(), "invalid_state");
    }

    #[test]
    fn test_access_mode_default_is_write() {
        assert_eq!(AccessMode::default(), AccessMode::Write);
        assert_eq!(AccessMode::Read.to_string(), "read");
    }
}
