//! miIO Protocol - Frame codec and handshake
//!
//! This crate defines the wire format spoken by miIO devices over UDP:
//! - `Header`: the fixed 32-byte frame header
//! - `encode_frame`/`validate_frame`: checksummed frames keyed by the device token
//! - `Handshake`: the hello probe/response exchange as an I/O-free state machine
//! - `HandshakeCache`: optional reuse of handshake results
//!
//! Nothing here touches a socket; see `miio-transport` for that.

mod cache;
mod error;
mod frame;
mod handshake;
mod header;
mod validation;

pub use cache::*;
pub use error::*;
pub use frame::*;
pub use handshake::*;
pub use header::*;
pub use validation::*;
