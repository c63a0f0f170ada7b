//! Declarative client settings
//!
//! [`ClientSettings`] is the serializable form of a client configuration, for
//! applications that keep connection details in a config file. It converts to
//! the same [`Opt`] list the functional API builds, so validation is shared.

use super::options::{self, Opt};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Serializable client configuration
///
/// Every field is optional; omitted fields produce no option.
///
/// ```
/// use bolt_client::{Client, ClientSettings};
///
/// let settings = ClientSettings::from_json(r#"{
///     "host": "localhost",
///     "port": 7687,
///     "user": "neo4j",
///     "password": "pw",
///     "pool_size": 10
/// }"#)?;
///
/// let client = Client::from_settings(settings)?;
/// assert!(client.is_pooled());
/// # Ok::<(), bolt_client::Error>(())
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ClientSettings {
    /// Explicit connection string; host, port and credentials are ignored when set
    pub connection_string: Option<String>,
    /// Server host
    pub host: Option<String>,
    /// Server port
    pub port: Option<i32>,
    /// Username
    pub user: Option<String>,
    /// Password
    pub password: Option<String>,
    /// Use the routing scheme
    pub routing: bool,
    /// Maximum pool size; enables pooling
    pub pool_size: Option<usize>,
    /// Known server version (`"major[.minor]"`), enables negotiation
    pub version: Option<String>,
    /// Explicit v4 capability, overriding the version-derived flag
    pub supports_v4: Option<bool>,
    /// Timeout in milliseconds
    pub timeout_ms: Option<u64>,
    /// Maximum framing chunk size
    pub chunk_size: Option<u16>,
    /// TLS material; presence enables TLS
    pub tls: Option<TlsSettings>,
    /// Only hand out read connections
    pub read_only: bool,
    /// Create a selected database when missing
    pub create_db_if_not_exists: bool,
}

/// TLS section of [`ClientSettings`]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TlsSettings {
    /// Client certificate path
    pub cert_file: String,
    /// Client private key path
    pub key_file: String,
    /// CA certificate path
    pub ca_cert_file: String,
    /// Skip server certificate verification
    pub no_verify: bool,
}

impl ClientSettings {
    /// Parse settings from JSON
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| Error::config(format!("invalid settings: {}", e)))
    }

    /// Serialize settings to pretty-printed JSON
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| Error::config(format!("invalid settings: {}", e)))
    }

    /// Convert into options, in a fixed order
    pub fn into_options(self) -> Vec<Opt> {
        let mut opts = Vec::new();

        if let Some(connection_string) = self.connection_string {
            opts.push(options::with_connection_string(connection_string));
        }
        if self.host.is_some() || self.port.is_some() {
            opts.push(options::with_host_port(
                self.host.unwrap_or_default(),
                self.port.unwrap_or_default(),
            ));
        }
        if self.user.is_some() || self.password.is_some() {
            opts.push(options::with_basic_auth(
                self.user.unwrap_or_default(),
                self.password.unwrap_or_default(),
            ));
        }
        if self.routing {
            opts.push(options::with_routing());
        }
        if let Some(size) = self.pool_size {
            opts.push(options::with_pooling(size));
        }
        if let Some(version) = self.version {
            opts.push(options::with_version(version));
        }
        if let Some(supported) = self.supports_v4 {
            opts.push(options::with_v4_support(supported));
        }
        if let Some(ms) = self.timeout_ms {
            opts.push(options::with_timeout(Duration::from_millis(ms)));
        }
        if let Some(chunk_size) = self.chunk_size {
            opts.push(options::with_chunk_size(chunk_size));
        }
        if let Some(tls) = self.tls {
            opts.push(options::with_tls(
                tls.cert_file,
                tls.key_file,
                tls.ca_cert_file,
                tls.no_verify,
            ));
        }
        if self.read_only {
            opts.push(options::with_read_only());
        }
        if self.create_db_if_not_exists {
            opts.push(options::with_create_db_if_not_exists());
        }

        opts
    }
}
