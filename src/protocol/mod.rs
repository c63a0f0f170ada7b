//! Bolt protocol primitives
//!
//! Only the pieces the client needs before a session starts:
//! * Handshake constants
//! * Server version identifiers and version proposals

pub mod constants;
mod version;

pub use version::{handshake_proposals, ProtocolVersion, ServerVersion};
