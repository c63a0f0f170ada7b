//! Metrics emitted through the `metrics` facade
//!
//! Nothing is recorded unless the application installs a recorder.

/// Metric names
pub mod names {
    /// Clients constructed successfully
    pub const CLIENTS_CREATED: &str = "bolt_client_clients_created_total";
    /// Drivers and pools handed out
    pub const DRIVERS_CREATED: &str = "bolt_client_drivers_created_total";
    /// Connections that completed the handshake
    pub const CONNECTIONS_OPENED: &str = "bolt_client_connections_opened_total";
    /// Connections that failed to open
    pub const CONNECTIONS_FAILED: &str = "bolt_client_connections_failed_total";
    /// Pool checkouts
    pub const POOL_CHECKOUTS: &str = "bolt_client_pool_checkouts_total";
    /// Connect + handshake duration
    pub const CONNECT_DURATION: &str = "bolt_client_connect_duration_seconds";
    /// Idle pooled connections
    pub const POOL_IDLE: &str = "bolt_client_pool_idle_connections";
}

/// Label values
pub mod labels {
    /// Single-connection driver
    pub const TOPOLOGY_SINGLE: &str = "single";
    /// Pooled driver
    pub const TOPOLOGY_POOLED: &str = "pooled";
    /// Checkout served from the idle list
    pub const SOURCE_IDLE: &str = "idle";
    /// Checkout that opened a new connection
    pub const SOURCE_NEW: &str = "new";
}

/// Counters
pub mod counters {
    use super::names;
    use crate::protocol::ProtocolVersion;

    /// Record a successfully constructed client
    pub fn client_created() {
        metrics::counter!(names::CLIENTS_CREATED).increment(1);
    }

    /// Record a driver or pool handed to a caller
    pub fn driver_created(protocol: ProtocolVersion, topology: &'static str) {
        metrics::counter!(
            names::DRIVERS_CREATED,
            "protocol" => protocol.as_str(),
            "topology" => topology
        )
        .increment(1);
    }

    /// Record an opened connection
    pub fn connection_opened(protocol: ProtocolVersion) {
        metrics::counter!(names::CONNECTIONS_OPENED, "protocol" => protocol.as_str())
            .increment(1);
    }

    /// Record a failed connection attempt
    pub fn connection_failed(protocol: ProtocolVersion, category: &'static str) {
        metrics::counter!(
            names::CONNECTIONS_FAILED,
            "protocol" => protocol.as_str(),
            "error" => category
        )
        .increment(1);
    }

    /// Record a pool checkout
    pub fn pool_checkout(source: &'static str) {
        metrics::counter!(names::POOL_CHECKOUTS, "source" => source).increment(1);
    }
}

/// Histograms
pub mod histograms {
    use super::names;
    use crate::protocol::ProtocolVersion;
    use std::time::Duration;

    /// Record connect + handshake duration
    pub fn connect_duration(protocol: ProtocolVersion, elapsed: Duration) {
        metrics::histogram!(names::CONNECT_DURATION, "protocol" => protocol.as_str())
            .record(elapsed.as_secs_f64());
    }
}

/// Gauges
pub mod gauges {
    use super::names;

    /// Set the number of idle pooled connections
    pub fn pool_idle(count: usize) {
        metrics::gauge!(names::POOL_IDLE).set(count as f64);
    }
}
