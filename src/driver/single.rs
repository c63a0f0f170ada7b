//! Single-connection driver

use super::{DriverOptions, Protocol, V4};
use crate::connection::{AccessMode, BoltConnection, ConnectionFactory};
use crate::protocol::ProtocolVersion;
use crate::{Error, Result};
use std::fmt;
use std::marker::PhantomData;
use std::sync::atomic::{AtomicBool, Ordering};

/// Opens a new connection per call
pub struct Driver<P: Protocol = super::V3> {
    factory: ConnectionFactory,
    options: DriverOptions,
    closed: AtomicBool,
    _protocol: PhantomData<P>,
}

impl<P: Protocol> Driver<P> {
    pub(crate) fn new(factory: ConnectionFactory, options: DriverOptions) -> Self {
        Self {
            factory,
            options,
            closed: AtomicBool::new(false),
            _protocol: PhantomData,
        }
    }

    /// Open a connection in the given access mode
    ///
    /// # Errors
    ///
    /// - [`Error::ReadOnly`] for write access on a read-only driver
    /// - [`Error::ConnectionClosed`] after [`close`](Self::close)
    /// - connection and handshake errors from the connection layer
    pub async fn open(&self, mode: AccessMode) -> Result<BoltConnection> {
        self.open_with(mode, None).await
    }

    async fn open_with(&self, mode: AccessMode, database: Option<String>) -> Result<BoltConnection> {
        if self.closed.load(Ordering::Acquire) {
            return Err(Error::ConnectionClosed);
        }
        self.options.check_mode(mode)?;

        let mut conn = self.factory.connect(P::VERSION).await?;
        conn.set_access_mode(mode);
        conn.select_database(database, self.options.create_if_not_exists);
        Ok(conn)
    }

    /// Close the driver; later opens fail
    ///
    /// Connections already handed out stay open and are closed by their owners.
    pub async fn close(&self) -> Result<()> {
        if !self.closed.swap(true, Ordering::AcqRel) {
            tracing::debug!(protocol = %P::VERSION, "driver closed");
        }
        Ok(())
    }

    /// Whether [`close`](Self::close) was called
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    /// Protocol generation of this driver
    pub fn protocol(&self) -> ProtocolVersion {
        P::VERSION
    }

    /// Factory connections are opened through
    pub fn connection_factory(&self) -> &ConnectionFactory {
        &self.factory
    }

    /// Whether write access is refused
    pub fn is_read_only(&self) -> bool {
        self.options.read_only
    }

    /// Whether selecting a missing database creates it
    pub fn creates_missing_databases(&self) -> bool {
        self.options.create_if_not_exists
    }
}

impl Driver<V4> {
    /// Open a connection bound to `database`
    pub async fn open_database(
        &self,
        mode: AccessMode,
        database: impl Into<String>,
    ) -> Result<BoltConnection> {
        let database = database.into();
        if database.is_empty() {
            return Err(Error::config("database name can not be empty"));
        }
        self.open_with(mode, Some(database)).await
    }
}

impl<P: Protocol> fmt::Debug for Driver<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Driver")
            .field("protocol", &P::VERSION)
            .field("factory", &self.factory)
            .field("options", &self.options)
            .field("closed", &self.is_closed())
            .finish()
    }
}
