//! Inbound frame validation

use crate::error::ProtocolError;
use crate::frame::Frame;
use crate::header::{CHECKSUM_OFFSET, HEADER_SIZE, MAGIC};
use miio_crypto::{Token, constant_time_eq, frame_checksum};

/// Validate a received data frame and return it split into header and body
///
/// Checks, in order: minimum size, magic, declared length against the
/// datagram length, and the token checksum. The body is never handed out
/// unless all four pass.
pub fn validate_frame<'a>(token: &Token, datagram: &'a [u8]) -> Result<Frame<'a>, ProtocolError> {
    let frame = Frame::split(datagram)?;

    if frame.header.magic != MAGIC {
        return Err(ProtocolError::InvalidMagic(frame.header.magic));
    }

    let declared = frame.header.length as usize;
    if declared != datagram.len() {
        return Err(ProtocolError::LengthMismatch {
            declared,
            actual: datagram.len(),
        });
    }

    let computed = frame_checksum(&datagram[..CHECKSUM_OFFSET], token.as_bytes(), frame.body);
    if !constant_time_eq(&computed, &frame.header.checksum) {
        return Err(ProtocolError::ChecksumMismatch);
    }

    debug_assert_eq!(frame.body.len(), declared - HEADER_SIZE);
    Ok(frame)
}
