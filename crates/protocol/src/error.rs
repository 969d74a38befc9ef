//! Protocol errors

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProtocolError {
    #[error("frame too short: {0} bytes, header is 32")]
    FrameTooShort(usize),

    #[error("malformed handshake response: expected 32 bytes, got {0}")]
    MalformedHandshake(usize),

    #[error("invalid frame magic: expected 0x2131, got {0:#06x}")]
    InvalidMagic(u16),

    #[error("frame length mismatch: header declares {declared} bytes, received {actual}")]
    LengthMismatch { declared: usize, actual: usize },

    #[error("frame checksum mismatch")]
    ChecksumMismatch,

    #[error("frame body too large: {size} bytes (max: {max})")]
    BodyTooLarge { size: usize, max: usize },

    #[error("handshake cannot {action} while {state}")]
    UnexpectedHandshakeState {
        state: &'static str,
        action: &'static str,
    },
}
