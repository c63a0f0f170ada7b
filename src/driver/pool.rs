//! Connection pool and pooled drivers

use super::{DriverOptions, Protocol, V4};
use crate::connection::{AccessMode, BoltConnection, ConnectionFactory};
use crate::metrics::labels;
use crate::protocol::ProtocolVersion;
use crate::{Error, Result};
use std::collections::VecDeque;
use std::fmt;
use std::marker::PhantomData;
use std::ops::{Deref, DerefMut};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::sync::{OwnedSemaphorePermit, Semaphore};

/// Bounded set of handshaken connections for one descriptor
///
/// At most `size` connections are checked out at a time. Returned
/// connections are kept idle and handed out again.
pub struct ConnectionPool {
    factory: ConnectionFactory,
    protocol: ProtocolVersion,
    size: usize,
    permits: Arc<Semaphore>,
    idle: Mutex<VecDeque<BoltConnection>>,
    closed: AtomicBool,
}

impl ConnectionPool {
    /// Create a pool of `size` connections
    ///
    /// No connection is opened until the first checkout.
    pub fn new(
        factory: ConnectionFactory,
        protocol: ProtocolVersion,
        size: usize,
    ) -> Result<Arc<Self>> {
        if size == 0 {
            return Err(Error::Pool("pool size must be at least 1".into()));
        }
        if size > Semaphore::MAX_PERMITS {
            return Err(Error::Pool(format!("pool size [{}] is too large", size)));
        }

        Ok(Arc::new(Self {
            factory,
            protocol,
            size,
            permits: Arc::new(Semaphore::new(size)),
            idle: Mutex::new(VecDeque::with_capacity(size)),
            closed: AtomicBool::new(false),
        }))
    }

    /// Check out a connection, waiting up to the factory timeout for a free slot
    pub async fn checkout(self: &Arc<Self>) -> Result<PooledConnection> {
        if self.is_closed() {
            return Err(Error::ConnectionClosed);
        }

        let timeout = self.factory.timeout();
        let permit = tokio::time::timeout(timeout, self.permits.clone().acquire_owned())
            .await
            .map_err(|_| {
                Error::Pool(format!(
                    "timed out after {:?} waiting for one of {} connections",
                    timeout, self.size
                ))
            })?
            .map_err(|_| Error::ConnectionClosed)?;

        let conn = match self.take_idle() {
            Some(conn) => {
                crate::metrics::counters::pool_checkout(labels::SOURCE_IDLE);
                tracing::trace!("reusing idle connection");
                conn
            }
            None => {
                let conn = self.factory.connect(self.protocol).await?;
                crate::metrics::counters::pool_checkout(labels::SOURCE_NEW);
                conn
            }
        };

        Ok(PooledConnection {
            conn: Some(conn),
            pool: Arc::clone(self),
            _permit: permit,
        })
    }

    fn take_idle(&self) -> Option<BoltConnection> {
        let mut idle = self.lock_idle();
        let conn = std::iter::from_fn(|| idle.pop_front()).find(|c| c.is_open());
        crate::metrics::gauges::pool_idle(idle.len());
        conn
    }

    fn checkin(&self, conn: BoltConnection) {
        if self.is_closed() || !conn.is_open() {
            return;
        }
        let mut idle = self.lock_idle();
        idle.push_back(conn);
        crate::metrics::gauges::pool_idle(idle.len());
    }

    fn lock_idle(&self) -> MutexGuard<'_, VecDeque<BoltConnection>> {
        self.idle.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Close the pool: idle connections are closed, pending and later
    /// checkouts fail. Checked-out connections are dropped when returned.
    pub async fn close(&self) -> Result<()> {
        if self.closed.swap(true, Ordering::AcqRel) {
            return Ok(());
        }
        self.permits.close();

        let drained: Vec<BoltConnection> = self.lock_idle().drain(..).collect();
        crate::metrics::gauges::pool_idle(0);
        tracing::debug!(idle = drained.len(), "closing connection pool");

        for mut conn in drained {
            if let Err(e) = conn.close().await {
                tracing::debug!(error = %e, "error closing idle connection");
            }
        }
        Ok(())
    }

    /// Maximum number of connections
    pub fn size(&self) -> usize {
        self.size
    }

    /// Idle connections ready for reuse
    pub fn idle_count(&self) -> usize {
        self.lock_idle().len()
    }

    /// Free checkout slots
    pub fn available(&self) -> usize {
        self.permits.available_permits()
    }

    /// Whether the pool was closed
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    /// Protocol pooled connections were handshaken with
    pub fn protocol(&self) -> ProtocolVersion {
        self.protocol
    }
}

impl fmt::Debug for ConnectionPool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionPool")
            .field("protocol", &self.protocol)
            .field("size", &self.size)
            .field("available", &self.available())
            .field("idle", &self.idle_count())
            .field("closed", &self.is_closed())
            .finish()
    }
}

/// A checked-out connection; returns to its pool on drop
pub struct PooledConnection {
    conn: Option<BoltConnection>,
    pool: Arc<ConnectionPool>,
    _permit: OwnedSemaphorePermit,
}

impl PooledConnection {
    fn belongs_to(&self, pool: &Arc<ConnectionPool>) -> bool {
        Arc::ptr_eq(&self.pool, pool)
    }
}

impl Deref for PooledConnection {
    type Target = BoltConnection;

    fn deref(&self) -> &BoltConnection {
        self.conn.as_ref().expect("connection present until drop")
    }
}

impl DerefMut for PooledConnection {
    fn deref_mut(&mut self) -> &mut BoltConnection {
        self.conn.as_mut().expect("connection present until drop")
    }
}

impl Drop for PooledConnection {
    fn drop(&mut self) {
        if let Some(conn) = self.conn.take() {
            self.pool.checkin(conn);
        }
    }
}

impl fmt::Debug for PooledConnection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("PooledConnection").field(&self.conn).finish()
    }
}

/// Driver handing out pooled connections
pub struct DriverPool<P: Protocol = super::V3> {
    pool: Arc<ConnectionPool>,
    options: DriverOptions,
    _protocol: PhantomData<P>,
}

impl<P: Protocol> DriverPool<P> {
    pub(crate) fn new(pool: Arc<ConnectionPool>, options: DriverOptions) -> Self {
        Self {
            pool,
            options,
            _protocol: PhantomData,
        }
    }

    /// Check out a connection in the given access mode
    pub async fn open(&self, mode: AccessMode) -> Result<PooledConnection> {
        self.open_with(mode, None).await
    }

    async fn open_with(
        &self,
        mode: AccessMode,
        database: Option<String>,
    ) -> Result<PooledConnection> {
        self.options.check_mode(mode)?;
        let mut conn = self.pool.checkout().await?;
        conn.set_access_mode(mode);
        conn.select_database(database, self.options.create_if_not_exists);
        Ok(conn)
    }

    /// Return a connection to the pool
    ///
    /// Dropping a [`PooledConnection`] has the same effect; this form reports
    /// connections that came from another pool.
    pub fn reclaim(&self, conn: PooledConnection) -> Result<()> {
        if !conn.belongs_to(&self.pool) {
            return Err(Error::Pool(
                "connection does not belong to this pool".into(),
            ));
        }
        drop(conn);
        Ok(())
    }

    /// Close the pool
    pub async fn close(&self) -> Result<()> {
        self.pool.close().await
    }

    /// Protocol generation of this pool
    pub fn protocol(&self) -> ProtocolVersion {
        P::VERSION
    }

    /// Underlying connection pool
    pub fn pool(&self) -> &Arc<ConnectionPool> {
        &self.pool
    }

    /// Whether write access is refused
    pub fn is_read_only(&self) -> bool {
        self.options.read_only
    }
}

impl DriverPool<V4> {
    /// Check out a connection bound to `database`
    pub async fn open_database(
        &self,
        mode: AccessMode,
        database: impl Into<String>,
    ) -> Result<PooledConnection> {
        let database = database.into();
        if database.is_empty() {
            return Err(Error::config("database name can not be empty"));
        }
        self.open_with(mode, Some(database)).await
    }
}

impl<P: Protocol> fmt::Debug for DriverPool<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DriverPool")
            .field("protocol", &P::VERSION)
            .field("pool", &self.pool)
            .field("options", &self.options)
            .finish()
    }
}
