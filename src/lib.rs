//! Client configuration and driver factory for the Bolt graph protocol
//!
//! A [`Client`] is built from a list of composable options. It validates the
//! configuration once, derives a canonical connection descriptor and then
//! hands out drivers and driver pools for protocol v3 or v4:
//!
//! ```no_run
//! use bolt_client::{AccessMode, Client, with_basic_auth, with_host_port, with_version};
//!
//! # async fn run() -> bolt_client::Result<()> {
//! let client = Client::new([
//!     with_basic_auth("neo4j", "secret"),
//!     with_host_port("localhost", 7687),
//!     with_version("4.0"),
//! ])?;
//!
//! let pool = client.new_driver_pool_v4(10)?;
//! let conn = pool.open_database(AccessMode::Read, "movies").await?;
//! println!("connected with protocol {}", conn.agreed_version());
//! pool.reclaim(conn)?;
//! # Ok(())
//! # }
//! ```
//!
//! v4 drivers require the client to be marked v4-capable, either through
//! [`with_version`] or [`with_v4_support`]; otherwise the v4 factories fail
//! with [`Error::InvalidVersion`].

#![warn(missing_debug_implementations)]

pub mod client;
pub mod connection;
pub mod driver;
mod error;
pub mod metrics;
pub mod protocol;

pub use client::{
    with_basic_auth, with_chunk_size, with_connection_string, with_create_db_if_not_exists,
    with_host_port, with_pooling, with_read_only, with_routing, with_timeout, with_tls,
    with_v4_support, with_version, Client, ClientConfig, ClientSettings, ConnectionDescriptor,
    Opt,
};
pub use connection::{AccessMode, BoltConnection};
pub use driver::{Driver, DriverPool, DriverPoolV4, DriverV4, PooledConnection, V3, V4};
pub use error::{Error, Result};
pub use protocol::{ProtocolVersion, ServerVersion};
