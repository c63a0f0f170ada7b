//! Bolt protocol constants

use std::time::Duration;

/// Handshake preamble sent before the version proposals
pub const BOLT_MAGIC: [u8; 4] = [0x60, 0x60, 0xB0, 0x17];

/// Number of version proposals in a handshake
pub const PROPOSAL_COUNT: usize = 4;

/// Size of the handshake request (magic + proposals)
pub const HANDSHAKE_LEN: usize = BOLT_MAGIC.len() + PROPOSAL_COUNT * 4;

/// Default server port
pub const DEFAULT_PORT: u16 = 7687;

/// Largest chunk the framing layer can express in its 16-bit size header
pub const MAX_CHUNK_SIZE: u16 = u16::MAX;

/// Request timeout applied when none is configured
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// URI schemes
pub mod schemes {
    /// Direct connection to a single server
    pub const BOLT: &str = "bolt";

    /// Cluster-aware connection
    pub const BOLT_ROUTING: &str = "bolt+routing";
}

/// Descriptor query parameters carrying TLS material
pub mod tls_params {
    /// Client certificate path
    pub const CERT_FILE: &str = "tls_cert_file";

    /// Client private key path
    pub const KEY_FILE: &str = "tls_key_file";

    /// CA certificate path
    pub const CA_CERT_FILE: &str = "tls_ca_cert_file";

    /// Skip server certificate verification
    pub const NO_VERIFY: &str = "tls_no_verify";
}
