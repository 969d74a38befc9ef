//! Connection errors

use miio_crypto::{CipherError, KeyError};
use miio_protocol::ProtocolError;
use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConnectionError {
    #[error("Invalid token: {0}")]
    InvalidToken(#[from] KeyError),

    #[error("Transport error: {0}")]
    Transport(#[source] io::Error),

    #[error("Protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    #[error("Decryption failed: {0}")]
    Decryption(#[from] CipherError),

    #[error("Deadline exceeded")]
    DeadlineExceeded,

    #[error("Connection closed")]
    Closed,

    #[error("Buffer too small: payload is {needed} bytes, buffer holds {capacity}")]
    BufferTooSmall { needed: usize, capacity: usize },
}

impl ConnectionError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, ConnectionError::DeadlineExceeded)
    }
}

impl From<io::Error> for ConnectionError {
    fn from(err: io::Error) -> Self {
        // Socket timeouts surface as WouldBlock on Unix and TimedOut on Windows
        match err.kind() {
            io::ErrorKind::WouldBlock | io::ErrorKind::TimedOut => ConnectionError::DeadlineExceeded,
            _ => ConnectionError::Transport(err),
        }
    }
}

impl From<ConnectionError> for io::Error {
    fn from(err: ConnectionError) -> Self {
        let kind = match &err {
            ConnectionError::Transport(e) => e.kind(),
            ConnectionError::DeadlineExceeded => io::ErrorKind::TimedOut,
            ConnectionError::Closed => io::ErrorKind::NotConnected,
            ConnectionError::InvalidToken(_) | ConnectionError::BufferTooSmall { .. } => {
                io::ErrorKind::InvalidInput
            }
            ConnectionError::Protocol(_) | ConnectionError::Decryption(_) => {
                io::ErrorKind::InvalidData
            }
        };

        match err {
            ConnectionError::Transport(e) => e,
            other => io::Error::new(kind, other),
        }
    }
}
