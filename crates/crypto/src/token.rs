//! Device token: the 16-byte secret shared with the device

use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Token length in raw bytes
pub const TOKEN_LEN: usize = 16;

/// Token length in hex characters
pub const TOKEN_HEX_LEN: usize = TOKEN_LEN * 2;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum KeyError {
    #[error("Invalid token length: expected 32 hex characters, got {0}")]
    InvalidHexLength(usize),

    #[error("Invalid token encoding: {0}")]
    InvalidHex(#[from] hex::FromHexError),

    #[error("Invalid token length: expected 16 bytes, got {0}")]
    InvalidLength(usize),
}

/// Shared secret provisioned out-of-band (e.g. extracted from the vendor cloud)
///
/// Immutable once parsed. `Debug` never prints the secret.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Token([u8; TOKEN_LEN]);

impl Token {
    /// Create from raw bytes
    pub fn from_bytes(bytes: [u8; TOKEN_LEN]) -> Self {
        Self(bytes)
    }

    /// Parse from exactly 32 hex characters
    pub fn from_hex(s: &str) -> Result<Self, KeyError> {
        if s.len() != TOKEN_HEX_LEN {
            return Err(KeyError::InvalidHexLength(s.len()));
        }

        let mut bytes = [0u8; TOKEN_LEN];
        hex::decode_to_slice(s, &mut bytes)?;
        Ok(Self(bytes))
    }

    /// Raw token bytes
    pub fn as_bytes(&self) -> &[u8; TOKEN_LEN] {
        &self.0
    }
}

impl FromStr for Token {
    type Err = KeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl TryFrom<&[u8]> for Token {
    type Error = KeyError;

    fn try_from(bytes: &[u8]) -> Result<Self, Self::Error> {
        let bytes: [u8; TOKEN_LEN] = bytes
            .try_into()
            .map_err(|_| KeyError::InvalidLength(bytes.len()))?;
        Ok(Self(bytes))
    }
}

impl AsRef<[u8]> for Token {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Token(<redacted>)")
    }
}
