//! miIO Transport - Blocking UDP connection to a device
//!
//! This crate provides:
//! - `Connection`: handshake, encryption and framing behind `write`/`read`
//! - `ConnectionConfig`: receive buffer size and handshake reuse
//! - Absolute read/write deadlines on top of socket timeouts
//!
//! JSON-RPC message building is left to the caller; payloads here are
//! opaque bytes.

mod config;
mod connection;
mod deadline;
mod error;

pub use config::*;
pub use connection::*;
pub use error::*;

pub use miio_crypto::Token;
pub use miio_protocol::HandshakeResult;
