//! Handshake: learn the device ID and current stamp
//!
//! The client sends a fixed 32-byte probe ("hello") and the device answers
//! with a bare 32-byte header carrying its ID at offset 8 and its stamp at
//! offset 12. Both values must be echoed in every request header.
//!
//! [`Handshake`] is a one-shot, I/O-free state machine; the transport
//! drives it and owns the socket.

use crate::error::ProtocolError;
use crate::header::HEADER_SIZE;
use bytes::Buf;
use std::time::Duration;
use tracing::trace;

/// Hello probe: magic, length 0x0020, then 28 bytes of 0xFF
pub const HANDSHAKE_PROBE: [u8; HEADER_SIZE] = [
    0x21, 0x31, 0x00, 0x20, 0xff, 0xff, 0xff, 0xff, //
    0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, //
    0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, //
    0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, //
];

/// Values learned from a handshake response
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HandshakeResult {
    pub device_id: u32,
    pub stamp: u32,
}

impl HandshakeResult {
    /// The device stamp counts seconds; project it forward by `elapsed`
    pub fn advanced_by(&self, elapsed: Duration) -> Self {
        Self {
            device_id: self.device_id,
            stamp: self.stamp.wrapping_add(elapsed.as_secs() as u32),
        }
    }
}

/// Parse a handshake response; it must be exactly one bare header
pub fn parse_handshake_response(frame: &[u8]) -> Result<HandshakeResult, ProtocolError> {
    if frame.len() != HEADER_SIZE {
        return Err(ProtocolError::MalformedHandshake(frame.len()));
    }

    let mut buf = &frame[8..16];
    let device_id = buf.get_u32();
    let stamp = buf.get_u32();

    Ok(HandshakeResult { device_id, stamp })
}

/// Handshake progress
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandshakeState {
    Idle,
    ProbeSent,
    Complete(HandshakeResult),
    Failed,
}

impl HandshakeState {
    fn name(&self) -> &'static str {
        match self {
            HandshakeState::Idle => "idle",
            HandshakeState::ProbeSent => "awaiting response",
            HandshakeState::Complete(_) => "complete",
            HandshakeState::Failed => "failed",
        }
    }
}

/// One handshake exchange. Terminal once complete or failed; run a new
/// instance for the next exchange.
#[derive(Debug)]
pub struct Handshake {
    state: HandshakeState,
}

impl Default for Handshake {
    fn default() -> Self {
        Self::new()
    }
}

impl Handshake {
    pub fn new() -> Self {
        Self {
            state: HandshakeState::Idle,
        }
    }

    pub fn state(&self) -> HandshakeState {
        self.state
    }

    /// Idle -> ProbeSent. Returns the datagram to send.
    pub fn start(&mut self) -> Result<&'static [u8; HEADER_SIZE], ProtocolError> {
        self.transition(HandshakeState::Idle, "send probe")?;
        self.state = HandshakeState::ProbeSent;
        trace!("Handshake probe ready");
        Ok(&HANDSHAKE_PROBE)
    }

    /// ProbeSent -> Complete | Failed, from the received datagram
    pub fn receive(&mut self, datagram: &[u8]) -> Result<HandshakeResult, ProtocolError> {
        self.transition(HandshakeState::ProbeSent, "accept response")?;

        match parse_handshake_response(datagram) {
            Ok(result) => {
                trace!(
                    "Handshake complete: device_id={:#010x} stamp={}",
                    result.device_id,
                    result.stamp
                );
                self.state = HandshakeState::Complete(result);
                Ok(result)
            }
            Err(e) => {
                self.state = HandshakeState::Failed;
                Err(e)
            }
        }
    }

    /// Mark the exchange failed (e.g. the socket errored or timed out)
    pub fn fail(&mut self) {
        if !self.is_terminal() {
            self.state = HandshakeState::Failed;
        }
    }

    pub fn result(&self) -> Option<HandshakeResult> {
        match self.state {
            HandshakeState::Complete(result) => Some(result),
            _ => None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self.state,
            HandshakeState::Complete(_) | HandshakeState::Failed
        )
    }

    fn transition(
        &self,
        expected: HandshakeState,
        action: &'static str,
    ) -> Result<(), ProtocolError> {
        if self.state == expected {
            Ok(())
        } else {
            Err(ProtocolError::UnexpectedHandshakeState {
                state: self.state.name(),
                action,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::RngCore;

    fn response(device_id: u32, stamp: u32) -> Vec<u8> {
        let mut bytes = vec![0x21, 0x31, 0x00, 0x20, 0, 0, 0, 0];
        bytes.extend_from_slice(&device_id.to_be_bytes());
        bytes.extend_from_slice(&stamp.to_be_bytes());
        bytes.extend_from_slice(&[0xff; 16]);
        bytes
    }

    #[test]
    fn test_probe_bytes() {
        assert_eq!(&HANDSHAKE_PROBE[..4], &[0x21, 0x31, 0x00, 0x20]);
        assert!(HANDSHAKE_PROBE[4..].iter().all(|&b| b == 0xff));
    }

    #[test]
    fn test_parse_captured_response() {
        let bytes = hex::decode(
            "213100200000000004e1f2a300001a2bffffffffffffffffffffffffffffffff",
        )
        .unwrap();

        let result = parse_handshake_response(&bytes).unwrap();
        assert_eq!(result.device_id, 0x04e1f2a3);
        assert_eq!(result.stamp, 0x1a2b);
    }

    #[test]
    fn test_reject_wrong_lengths() {
        let mut rng = rand::thread_rng();

        for len in (0..=64).filter(|&l| l != HEADER_SIZE) {
            let mut bytes = vec![0u8; len];
            rng.fill_bytes(&mut bytes);
            assert_eq!(
                parse_handshake_response(&bytes),
                Err(ProtocolError::MalformedHandshake(len))
            );
        }
    }

    #[test]
    fn test_state_machine_success() {
        let mut handshake = Handshake::new();
        assert_eq!(handshake.state(), HandshakeState::Idle);

        let probe = handshake.start().unwrap();
        assert_eq!(probe, &HANDSHAKE_PROBE);
        assert_eq!(handshake.state(), HandshakeState::ProbeSent);

        let result = handshake.receive(&response(42, 1000)).unwrap();
        assert_eq!(result, HandshakeResult { device_id: 42, stamp: 1000 });
        assert_eq!(handshake.result(), Some(result));
        assert!(handshake.is_terminal());
    }

    #[test]
    fn test_state_machine_malformed_response() {
        let mut handshake = Handshake::new();
        handshake.start().unwrap();

        let err = handshake.receive(&[0u8; 48]).unwrap_err();
        assert_eq!(err, ProtocolError::MalformedHandshake(48));
        assert_eq!(handshake.state(), HandshakeState::Failed);
        assert_eq!(handshake.result(), None);
    }

    #[test]
    fn test_state_machine_not_reusable() {
        let mut handshake = Handshake::new();

        // Response before probe
        assert!(matches!(
            handshake.receive(&response(1, 1)),
            Err(ProtocolError::UnexpectedHandshakeState { .. })
        ));

        handshake.start().unwrap();
        assert!(handshake.start().is_err());

        handshake.receive(&response(1, 1)).unwrap();
        assert!(handshake.start().is_err());
        assert!(handshake.receive(&response(2, 2)).is_err());

        // Completed state survives a late failure
        handshake.fail();
        assert_eq!(handshake.result(), Some(HandshakeResult { device_id: 1, stamp: 1 }));
    }

    #[test]
    fn test_fail_after_probe() {
        let mut handshake = Handshake::new();
        handshake.start().unwrap();
        handshake.fail();

        assert_eq!(handshake.state(), HandshakeState::Failed);
        assert!(handshake.receive(&response(1, 1)).is_err());
    }

    #[test]
    fn test_advanced_stamp() {
        let result = HandshakeResult { device_id: 7, stamp: u32::MAX - 1 };

        assert_eq!(result.advanced_by(Duration::from_millis(999)).stamp, u32::MAX - 1);
        assert_eq!(result.advanced_by(Duration::from_secs(1)).stamp, u32::MAX);
        assert_eq!(result.advanced_by(Duration::from_secs(3)).stamp, 1);
        assert_eq!(result.advanced_by(Duration::from_secs(3)).device_id, 7);
    }
}
