//! miIO Crypto - Token, key derivation, payload encryption and checksums
//!
//! This crate provides:
//! - `Token`: the 16-byte secret shared with a device
//! - `DeviceKeys`: AES key/IV derived from the token with MD5
//! - AES-128-CBC encryption/decryption with PKCS#7 padding
//! - MD5 frame checksums with constant-time comparison

mod checksum;
mod cipher;
mod keys;
mod token;

pub use checksum::*;
pub use cipher::*;
pub use keys::*;
pub use token::*;
