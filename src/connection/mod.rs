//! Connection management
//!
//! This module handles:
//! * Transport abstraction (plain TCP vs TLS)
//! * Bolt version handshake
//! * State machine enforcement
//! * TLS configuration and support
//! * The connection factory drivers and pools open connections through

mod conn;
mod factory;
mod state;
#[cfg(test)]
pub(crate) mod testing;
mod tls;
mod transport;

pub use conn::{AccessMode, BoltConnection};
pub use factory::ConnectionFactory;
pub use state::ConnectionState;
pub use tls::{parse_server_name, TlsConfig, TlsConfigBuilder};
pub use transport::Transport;
