//! rustls client configuration built from descriptor TLS parameters

use crate::{Error, Result};
use rustls::client::danger::{HandshakeSignatureValid, ServerCertVerified, ServerCertVerifier};
use rustls::crypto::CryptoProvider;
use rustls::{ClientConfig, DigitallySignedStruct, RootCertStore, SignatureScheme};
use rustls_pemfile::Item;
use rustls_pki_types::{CertificateDer, PrivateKeyDer, ServerName, UnixTime};
use std::io::Cursor;
use std::sync::Arc;

/// Where trusted server roots come from
#[derive(Debug, Clone, PartialEq, Eq)]
enum Trust {
    /// Operating system store
    Native,
    /// PEM bundle at a path
    CaFile(String),
    /// Nothing is verified
    AcceptAny,
}

/// Compiled TLS settings for Bolt connections
///
/// ```ignore
/// use bolt_client::connection::TlsConfig;
///
/// let tls = TlsConfig::builder()
///     .ca_cert_path("/etc/bolt/ca.pem")
///     .client_cert_path("/etc/bolt/client.pem")
///     .client_key_path("/etc/bolt/client.key")
///     .build()?;
/// ```
#[derive(Clone)]
pub struct TlsConfig {
    trust: Trust,
    client_auth: bool,
    rustls: Arc<ClientConfig>,
}

impl TlsConfig {
    pub fn builder() -> TlsConfigBuilder {
        TlsConfigBuilder::default()
    }

    /// Shared rustls configuration handed to the connector
    pub fn client_config(&self) -> Arc<ClientConfig> {
        Arc::clone(&self.rustls)
    }

    /// Whether server certificates go unchecked
    pub fn danger_accept_invalid_certs(&self) -> bool {
        self.trust == Trust::AcceptAny
    }

    /// Whether a client certificate is presented (mTLS)
    pub fn has_client_auth(&self) -> bool {
        self.client_auth
    }
}

impl std::fmt::Debug for TlsConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TlsConfig")
            .field("trust", &self.trust)
            .field("client_auth", &self.client_auth)
            .finish_non_exhaustive()
    }
}

/// Builder for [`TlsConfig`]
#[derive(Debug, Default)]
pub struct TlsConfigBuilder {
    ca_cert_path: Option<String>,
    client_cert_path: Option<String>,
    client_key_path: Option<String>,
    accept_invalid_certs: bool,
}

impl TlsConfigBuilder {
    /// Trust the certificates in this PEM file instead of the system store
    pub fn ca_cert_path(mut self, path: impl Into<String>) -> Self {
        self.ca_cert_path = Some(path.into());
        self
    }

    /// Client certificate chain (PEM)
    pub fn client_cert_path(mut self, path: impl Into<String>) -> Self {
        self.client_cert_path = Some(path.into());
        self
    }

    /// Client private key (PEM)
    pub fn client_key_path(mut self, path: impl Into<String>) -> Self {
        self.client_key_path = Some(path.into());
        self
    }

    /// Skip server certificate verification. Takes precedence over a CA path.
    pub fn danger_accept_invalid_certs(mut self, accept: bool) -> Self {
        self.accept_invalid_certs = accept;
        self
    }

    /// Load certificate material and compile the rustls configuration
    ///
    /// Fails with [`Error::Tls`] on unreadable or empty PEM files, when only
    /// one of client certificate and key is set, or when no system roots load.
    pub fn build(self) -> Result<TlsConfig> {
        let trust = match (self.accept_invalid_certs, self.ca_cert_path) {
            (true, _) => Trust::AcceptAny,
            (false, Some(path)) => Trust::CaFile(path),
            (false, None) => Trust::Native,
        };

        let wants_client_cert = match &trust {
            Trust::AcceptAny => {
                let provider = CryptoProvider::get_default()
                    .cloned()
                    .unwrap_or_else(|| Arc::new(rustls::crypto::aws_lc_rs::default_provider()));
                ClientConfig::builder()
                    .dangerous()
                    .with_custom_certificate_verifier(Arc::new(AcceptAnyServerCert { provider }))
            }
            Trust::CaFile(path) => ClientConfig::builder().with_root_certificates(ca_roots(path)?),
            Trust::Native => ClientConfig::builder().with_root_certificates(native_roots()?),
        };

        let (rustls, client_auth) = match (self.client_cert_path, self.client_key_path) {
            (None, None) => (wants_client_cert.with_no_client_auth(), false),
            (Some(cert), Some(key)) => {
                let config = wants_client_cert
                    .with_client_auth_cert(read_certs(&cert)?, read_key(&key)?)
                    .map_err(|e| Error::Tls(format!("client certificate rejected: {}", e)))?;
                (config, true)
            }
            _ => {
                return Err(Error::Tls(
                    "client certificate and key must be configured together".into(),
                ))
            }
        };

        Ok(TlsConfig {
            trust,
            client_auth,
            rustls: Arc::new(rustls),
        })
    }
}

fn native_roots() -> Result<RootCertStore> {
    let loaded = rustls_native_certs::load_native_certs();
    let mut roots = RootCertStore::empty();
    roots.add_parsable_certificates(loaded.certs);

    if roots.is_empty() {
        let reason = loaded
            .errors
            .first()
            .map(|e| e.to_string())
            .unwrap_or_else(|| "store is empty".into());
        return Err(Error::Tls(format!("no system root certificates: {}", reason)));
    }
    Ok(roots)
}

fn ca_roots(path: &str) -> Result<RootCertStore> {
    let mut roots = RootCertStore::empty();
    let (added, _) = roots.add_parsable_certificates(read_certs(path)?);
    if added == 0 {
        return Err(Error::Tls(format!("no usable CA certificate in '{}'", path)));
    }
    Ok(roots)
}

fn read_file(path: &str) -> Result<Vec<u8>> {
    std::fs::read(path).map_err(|e| Error::Tls(format!("cannot read '{}': {}", path, e)))
}

fn read_certs(path: &str) -> Result<Vec<CertificateDer<'static>>> {
    let pem = read_file(path)?;
    let mut certs = Vec::new();
    for item in rustls_pemfile::read_all(&mut Cursor::new(pem)) {
        match item {
            Ok(Item::X509Certificate(cert)) => certs.push(cert),
            Ok(_) => {}
            Err(e) => return Err(Error::Tls(format!("malformed PEM in '{}': {}", path, e))),
        }
    }

    if certs.is_empty() {
        return Err(Error::Tls(format!("no certificate found in '{}'", path)));
    }
    Ok(certs)
}

fn read_key(path: &str) -> Result<PrivateKeyDer<'static>> {
    let pem = read_file(path)?;
    rustls_pemfile::private_key(&mut Cursor::new(pem))
        .map_err(|e| Error::Tls(format!("malformed PEM in '{}': {}", path, e)))?
        .ok_or_else(|| Error::Tls(format!("no private key found in '{}'", path)))
}

/// Verifier installed for `tls_no_verify=true`
#[derive(Debug)]
struct AcceptAnyServerCert {
    provider: Arc<CryptoProvider>,
}

impl ServerCertVerifier for AcceptAnyServerCert {
    fn verify_server_cert(
        &self,
        _end_entity: &CertificateDer<'_>,
        _intermediates: &[CertificateDer<'_>],
        _server_name: &ServerName<'_>,
        _ocsp_response: &[u8],
        _now: UnixTime,
    ) -> std::result::Result<ServerCertVerified, rustls::Error> {
        Ok(ServerCertVerified::assertion())
    }

    fn verify_tls12_signature(
        &self,
        _message: &[u8],
        _cert: &CertificateDer<'_>,
        _dss: &DigitallySignedStruct,
    ) -> std::result::Result<HandshakeSignatureValid, rustls::Error> {
        Ok(HandshakeSignatureValid::assertion())
    }

    fn verify_tls13_signature(
        &self,
        _message: &[u8],
        _cert: &CertificateDer<'_>,
        _dss: &DigitallySignedStruct,
    ) -> std::result::Result<HandshakeSignatureValid, rustls::Error> {
        Ok(HandshakeSignatureValid::assertion())
    }

    fn supported_verify_schemes(&self) -> Vec<SignatureScheme> {
        self.provider
            .signature_verification_algorithms
            .supported_schemes()
    }
}

/// SNI name for `host`; a trailing dot is ignored
pub fn parse_server_name(host: &str) -> Result<ServerName<'static>> {
    let host = host.strip_suffix('.').unwrap_or(host);
    if host.is_empty() {
        return Err(Error::Tls("empty host name".into()));
    }
    ServerName::try_from(host.to_owned())
        .map_err(|_| Error::Tls(format!("'{}' is not a valid TLS server name", host)))
}
