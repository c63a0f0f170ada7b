//! Connection factory handed to drivers and pools

use super::conn::BoltConnection;
use super::transport::Transport;
use crate::client::{ConnectionDescriptor, ConnectionInfo};
use crate::protocol::{ProtocolVersion, ServerVersion};
use crate::{Error, Result};
use std::time::{Duration, Instant};
use tracing::Instrument;

/// Opens handshaken connections for one descriptor
///
/// Holds the values the client resolved at construction time. The
/// descriptor is parsed on every connect, so explicit connection strings are
/// only checked once a connection is actually opened.
#[derive(Debug, Clone)]
pub struct ConnectionFactory {
    timeout: Duration,
    chunk_size: u16,
    server_version: ServerVersion,
    descriptor: ConnectionDescriptor,
}

impl ConnectionFactory {
    /// Create a factory
    pub fn new(
        timeout: Duration,
        chunk_size: u16,
        server_version: ServerVersion,
        descriptor: ConnectionDescriptor,
    ) -> Self {
        Self {
            timeout,
            chunk_size,
            server_version,
            descriptor,
        }
    }

    /// Timeout applied to connect + handshake
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Framing chunk size
    pub fn chunk_size(&self) -> u16 {
        self.chunk_size
    }

    /// Configured server version
    pub fn server_version(&self) -> ServerVersion {
        self.server_version
    }

    /// Descriptor connections are opened against
    pub fn descriptor(&self) -> &ConnectionDescriptor {
        &self.descriptor
    }

    /// Open a connection and complete the handshake for `protocol`
    pub async fn connect(&self, protocol: ProtocolVersion) -> Result<BoltConnection> {
        let info = ConnectionInfo::parse(self.descriptor.as_str())?;
        let start = Instant::now();

        let span = tracing::info_span!(
            "connect",
            host = %info.host,
            port = info.port,
            protocol = %protocol,
            tls = info.tls.is_some()
        );

        let result = tokio::time::timeout(self.timeout, self.establish(&info, protocol))
            .instrument(span)
            .await
            .unwrap_or_else(|_| Err(Error::Timeout(self.timeout)));

        match &result {
            Ok(conn) => {
                crate::metrics::counters::connection_opened(protocol);
                crate::metrics::histograms::connect_duration(protocol, start.elapsed());
                tracing::debug!(version = %conn.agreed_version(), "connection established");
            }
            Err(e) => {
                crate::metrics::counters::connection_failed(protocol, e.category());
                tracing::warn!(error = %e, descriptor = %self.descriptor.redacted(), "connection failed");
            }
        }

        result
    }

    async fn establish(
        &self,
        info: &ConnectionInfo,
        protocol: ProtocolVersion,
    ) -> Result<BoltConnection> {
        let mut transport = Transport::connect_tcp(&info.host, info.port).await?;

        if let Some(tls) = info.to_tls_config()? {
            tracing::debug!("upgrading connection to TLS");
            transport = transport.upgrade_to_tls(&tls, &info.host).await?;
            tracing::info!("TLS connection established");
        }

        let mut conn = BoltConnection::new(transport, self.chunk_size);
        conn.handshake(protocol, self.server_version).await?;
        Ok(conn)
    }
}
