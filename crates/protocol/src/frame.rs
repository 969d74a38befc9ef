//! Frame encoding: header || body, checksummed with the token

use crate::error::ProtocolError;
use crate::header::{CHECKSUM_OFFSET, HEADER_SIZE, Header};
use bytes::{BufMut, BytesMut};
use miio_crypto::{Token, frame_checksum};

/// A received frame, header decoded and body borrowed from the datagram
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Frame<'a> {
    pub header: Header,
    pub body: &'a [u8],
}

impl<'a> Frame<'a> {
    /// Split a datagram into header and body without validating it
    pub fn split(datagram: &'a [u8]) -> Result<Self, ProtocolError> {
        let header = Header::parse(datagram)?;
        Ok(Self {
            header,
            body: &datagram[HEADER_SIZE..],
        })
    }
}

/// Build a complete frame for `body`
///
/// The checksum is computed over the header with a zeroed checksum field,
/// then the token, then the body. The result is exactly
/// `32 + body.len()` bytes.
pub fn encode_frame(
    token: &Token,
    device_id: u32,
    stamp: u32,
    body: &[u8],
) -> Result<Vec<u8>, ProtocolError> {
    let header = Header::new(device_id, stamp, body.len())?;

    let mut buf = BytesMut::with_capacity(HEADER_SIZE + body.len());
    header.write_to(&mut buf);

    let checksum = frame_checksum(&buf[..CHECKSUM_OFFSET], token.as_bytes(), body);
    buf[CHECKSUM_OFFSET..HEADER_SIZE].copy_from_slice(&checksum);
    buf.put_slice(body);

    Ok(buf.to_vec())
}
