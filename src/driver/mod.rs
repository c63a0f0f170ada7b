//! Drivers and driver pools
//!
//! Drivers are parameterized by a protocol marker ([`V3`] or [`V4`]); the v4
//! variants add multi-database selection. [`Client`](crate::Client) is the only
//! place that creates them, after its version gate passed.

mod pool;
mod single;

pub use pool::{ConnectionPool, DriverPool, PooledConnection};
pub use single::Driver;

pub use crate::connection::AccessMode;
pub use crate::protocol::ProtocolVersion;

mod sealed {
    pub trait Sealed {}
}

/// Protocol generation marker
pub trait Protocol: sealed::Sealed + Send + Sync + 'static {
    /// Version tag used for gating, handshakes and metrics
    const VERSION: ProtocolVersion;
}

/// Baseline protocol marker
#[derive(Debug, Clone, Copy)]
pub enum V3 {}

/// Protocol v4 marker
#[derive(Debug, Clone, Copy)]
pub enum V4 {}

impl sealed::Sealed for V3 {}
impl sealed::Sealed for V4 {}

impl Protocol for V3 {
    const VERSION: ProtocolVersion = ProtocolVersion::V3;
}

impl Protocol for V4 {
    const VERSION: ProtocolVersion = ProtocolVersion::V4;
}

/// v4 single-connection driver
pub type DriverV4 = Driver<V4>;

/// v4 driver pool
pub type DriverPoolV4 = DriverPool<V4>;

/// Per-driver behaviour copied from the client
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct DriverOptions {
    pub(crate) read_only: bool,
    pub(crate) create_if_not_exists: bool,
}

impl DriverOptions {
    pub(crate) fn check_mode(&self, mode: AccessMode) -> crate::Result<()> {
        if self.read_only && mode == AccessMode::Write {
            return Err(crate::Error::ReadOnly);
        }
        Ok(())
    }
}
