//! Client configuration, descriptor derivation and driver factories

mod bolt_client;
mod connection_string;
mod descriptor;
mod options;
mod settings;

pub use bolt_client::Client;
pub use connection_string::{ConnectionInfo, TlsParams};
pub use descriptor::ConnectionDescriptor;
pub use options::{
    with_basic_auth, with_chunk_size, with_connection_string, with_create_db_if_not_exists,
    with_host_port, with_pooling, with_read_only, with_routing, with_timeout, with_tls,
    with_v4_support, with_version, ClientConfig, Opt,
};
pub use settings::{ClientSettings, TlsSettings};
