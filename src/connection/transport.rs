//! Transport abstraction (TCP with optional TLS)

use super::tls::{parse_server_name, TlsConfig};
use crate::{Error, Result};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;

/// Byte stream to a Bolt server: plain or TLS-encrypted TCP
#[allow(clippy::large_enum_variant)]
pub enum Transport {
    /// Plain TCP connection
    Plain(TcpStream),
    /// TLS-encrypted TCP connection
    Tls(tokio_rustls::client::TlsStream<TcpStream>),
}

impl std::fmt::Debug for Transport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Transport::Plain(_) => f.write_str("Transport::Plain(TcpStream)"),
            Transport::Tls(_) => f.write_str("Transport::Tls(TlsStream)"),
        }
    }
}

impl Transport {
    /// Connect via plain TCP
    pub async fn connect_tcp(host: &str, port: u16) -> Result<Self> {
        let stream = TcpStream::connect((host, port))
            .await
            .map_err(|e| Error::Connection(format!("{}:{}: {}", host, port, e)))?;
        stream.set_nodelay(true)?;
        Ok(Transport::Plain(stream))
    }

    /// Upgrade a plain TCP transport to TLS.
    ///
    /// Consumes `self` and returns a new `Transport` with a TLS-encrypted stream.
    pub async fn upgrade_to_tls(self, tls_config: &TlsConfig, hostname: &str) -> Result<Self> {
        match self {
            Transport::Plain(tcp_stream) => {
                let server_name = parse_server_name(hostname)?;
                let connector = tokio_rustls::TlsConnector::from(tls_config.client_config());
                let tls_stream = connector
                    .connect(server_name, tcp_stream)
                    .await
                    .map_err(|e| Error::Tls(format!("TLS handshake failed: {}", e)))?;
                Ok(Transport::Tls(tls_stream))
            }
            Transport::Tls(_) => Err(Error::Tls("transport is already TLS-encrypted".into())),
        }
    }

    /// Whether the stream is encrypted
    pub fn is_tls(&self) -> bool {
        matches!(self, Transport::Tls(_))
    }

    /// Write all bytes to the stream
    pub async fn write_all(&mut self, buf: &[u8]) -> Result<()> {
        match self {
            Transport::Plain(stream) => stream.write_all(buf).await?,
            Transport::Tls(stream) => stream.write_all(buf).await?,
        }
        Ok(())
    }

    /// Flush the stream
    pub async fn flush(&mut self) -> Result<()> {
        match self {
            Transport::Plain(stream) => stream.flush().await?,
            Transport::Tls(stream) => stream.flush().await?,
        }
        Ok(())
    }

    /// Fill `buf` completely
    pub async fn read_exact(&mut self, buf: &mut [u8]) -> Result<()> {
        let result = match self {
            Transport::Plain(stream) => stream.read_exact(buf).await,
            Transport::Tls(stream) => stream.read_exact(buf).await,
        };
        match result {
            Ok(_) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::UnexpectedEof => {
                Err(Error::ConnectionClosed)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Shutdown the stream
    pub async fn shutdown(&mut self) -> Result<()> {
        match self {
            Transport::Plain(stream) => stream.shutdown().await?,
            Transport::Tls(stream) => stream.shutdown().await?,
        }
        Ok(())
    }
}
