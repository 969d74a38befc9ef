//! 32-byte frame header
//!
//! ```text
//!  0      2      4          8          12         16                32
//!  +------+------+----------+----------+----------+-----------------+
//!  |magic |length| reserved | deviceID |  stamp   |    checksum     |
//!  +------+------+----------+----------+----------+-----------------+
//! ```
//!
//! All integers are big-endian. `length` counts the header plus body.

use crate::error::ProtocolError;
use bytes::{Buf, BufMut};

/// Magic number opening every frame
pub const MAGIC: u16 = 0x2131;

/// Header size in bytes
pub const HEADER_SIZE: usize = 32;

/// Largest frame the 16-bit length field can describe
pub const MAX_FRAME_SIZE: usize = u16::MAX as usize;

/// Offset of the checksum field
pub const CHECKSUM_OFFSET: usize = 16;

/// Decoded frame header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {
    pub magic: u16,
    /// Total frame length (header + body)
    pub length: u16,
    pub reserved: u32,
    pub device_id: u32,
    pub stamp: u32,
    pub checksum: [u8; 16],
}

impl Header {
    /// Header for an outgoing frame, checksum still zeroed
    pub fn new(device_id: u32, stamp: u32, body_len: usize) -> Result<Self, ProtocolError> {
        let total = HEADER_SIZE + body_len;
        if total > MAX_FRAME_SIZE {
            return Err(ProtocolError::BodyTooLarge {
                size: body_len,
                max: MAX_FRAME_SIZE - HEADER_SIZE,
            });
        }

        Ok(Self {
            magic: MAGIC,
            length: total as u16,
            reserved: 0,
            device_id,
            stamp,
            checksum: [0; 16],
        })
    }

    /// Parse the first 32 bytes of `frame`
    ///
    /// Only the size is checked here; magic, length and checksum are
    /// validated separately (see [`crate::validate_frame`]).
    pub fn parse(frame: &[u8]) -> Result<Self, ProtocolError> {
        if frame.len() < HEADER_SIZE {
            return Err(ProtocolError::FrameTooShort(frame.len()));
        }

        let mut buf = &frame[..HEADER_SIZE];
        let magic = buf.get_u16();
        let length = buf.get_u16();
        let reserved = buf.get_u32();
        let device_id = buf.get_u32();
        let stamp = buf.get_u32();
        let mut checksum = [0u8; 16];
        buf.copy_to_slice(&mut checksum);

        Ok(Self {
            magic,
            length,
            reserved,
            device_id,
            stamp,
            checksum,
        })
    }

    /// Append the 32 header bytes to `dst`
    pub fn write_to<B: BufMut>(&self, dst: &mut B) {
        dst.put_u16(self.magic);
        dst.put_u16(self.length);
        dst.put_u32(self.reserved);
        dst.put_u32(self.device_id);
        dst.put_u32(self.stamp);
        dst.put_slice(&self.checksum);
    }

    /// Serialize into a fixed array
    pub fn to_bytes(&self) -> [u8; HEADER_SIZE] {
        let mut out = [0u8; HEADER_SIZE];
        self.write_to(&mut out.as_mut_slice());
        out
    }

    /// Body length implied by the length field
    pub fn body_len(&self) -> usize {
        (self.length as usize).saturating_sub(HEADER_SIZE)
    }
}

/// Decode the header of a received frame
pub fn decode_header(frame: &[u8]) -> Result<Header, ProtocolError> {
    Header::parse(frame)
}
