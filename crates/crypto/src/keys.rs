//! Key/IV derivation from the device token
//!
//! key = MD5(token), iv = MD5(key || token). The digest is a protocol
//! constant; devices only understand this scheme.

use crate::checksum::digest;
use crate::cipher::{self, CipherError};
use crate::token::{KeyError, Token};
use std::fmt;

/// Symmetric key and IV derived from a [`Token`]
#[derive(Clone, PartialEq, Eq)]
pub struct DeviceKeys {
    key: [u8; 16],
    iv: [u8; 16],
}

impl DeviceKeys {
    /// Derive the key pair for a token
    pub fn derive(token: &Token) -> Self {
        let token = token.as_bytes();
        let key = digest(&[token]);
        let iv = digest(&[&key, token]);
        Self { key, iv }
    }

    /// AES key
    pub fn key(&self) -> &[u8; 16] {
        &self.key
    }

    /// CBC initialization vector
    pub fn iv(&self) -> &[u8; 16] {
        &self.iv
    }

    /// Encrypt a request body
    pub fn encrypt(&self, plaintext: &[u8]) -> Vec<u8> {
        cipher::encrypt(&self.key, &self.iv, plaintext)
    }

    /// Decrypt a response body
    pub fn decrypt(&self, ciphertext: &[u8]) -> Result<Vec<u8>, CipherError> {
        cipher::decrypt(&self.key, &self.iv, ciphertext)
    }
}

impl fmt::Debug for DeviceKeys {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("DeviceKeys(<redacted>)")
    }
}

/// Derive keys from raw token bytes, enforcing the 16-byte length
pub fn derive_keys(token: &[u8]) -> Result<DeviceKeys, KeyError> {
    let token = Token::try_from(token)?;
    Ok(DeviceKeys::derive(&token))
}
