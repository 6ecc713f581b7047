//! Termination block: orderly session close with a reason code.
//!
//! Wire format:
//!
//! ```text
//! +--------------+--------+-----------------+
//! | valid frames | reason | additional data |
//! | BE64         | 1 byte | variable        |
//! +--------------+--------+-----------------+
//! ```

use crate::core::{BlockError, MAX_TERMINATION_ADD_DATA_SIZE, TERMINATION_HEADER_SIZE};
use crate::wire::{BytesReader, BytesWriter};

use super::{overflow, truncated};

/// Reason codes for session termination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum TerminationReason {
    /// Unspecified orderly close.
    NormalClose = 0,
    /// Received a termination block from the peer.
    TerminationReceived = 1,
    /// Session idle too long.
    IdleTimeout = 2,
    /// Local router is shutting down.
    RouterShutdown = 3,
    /// AEAD failure during the data phase.
    DataPhaseAeadFailure = 4,
    /// Peer options could not be negotiated.
    IncompatibleOptions = 5,
    /// Unsupported signature type.
    IncompatibleSignatureType = 6,
    /// Peer clock too far from ours.
    ClockSkew = 7,
    /// Peer violated the padding rules.
    PaddingViolation = 8,
    /// AEAD framing error during the handshake.
    AeadFramingError = 9,
    /// Malformed payload.
    PayloadFormatError = 10,
    /// Handshake message 1 error.
    SessionRequestError = 11,
    /// Handshake message 2 error.
    SessionCreatedError = 12,
    /// Handshake message 3 error.
    SessionConfirmedError = 13,
    /// Socket read timed out.
    ReadTimeout = 14,
    /// Router-info signature verification failed.
    SignatureVerificationFailure = 15,
    /// Invalid static key in the handshake.
    InvalidS = 16,
    /// Peer is banned.
    Banned = 17,
}

impl TerminationReason {
    /// Parse a reason from its wire byte.
    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            0 => Some(Self::NormalClose),
            1 => Some(Self::TerminationReceived),
            2 => Some(Self::IdleTimeout),
            3 => Some(Self::RouterShutdown),
            4 => Some(Self::DataPhaseAeadFailure),
            5 => Some(Self::IncompatibleOptions),
            6 => Some(Self::IncompatibleSignatureType),
            7 => Some(Self::ClockSkew),
            8 => Some(Self::PaddingViolation),
            9 => Some(Self::AeadFramingError),
            10 => Some(Self::PayloadFormatError),
            11 => Some(Self::SessionRequestError),
            12 => Some(Self::SessionCreatedError),
            13 => Some(Self::SessionConfirmedError),
            14 => Some(Self::ReadTimeout),
            15 => Some(Self::SignatureVerificationFailure),
            16 => Some(Self::InvalidS),
            17 => Some(Self::Banned),
            _ => None,
        }
    }

    /// Wire byte for this reason.
    pub fn as_byte(self) -> u8 {
        self as u8
    }
}

/// Orderly close notice. After sending or receiving one, a peer is expected
/// to cease traffic on the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TerminationBlock {
    valid_frames: u64,
    reason: TerminationReason,
    add_data: Vec<u8>,
}

impl TerminationBlock {
    /// Create a termination block with no additional data.
    pub fn new(reason: TerminationReason) -> Self {
        Self {
            valid_frames: 0,
            reason,
            add_data: Vec::new(),
        }
    }

    /// Create a termination block with an explicit valid-frames counter and
    /// additional data.
    pub fn with_data(
        reason: TerminationReason,
        valid_frames: u64,
        add_data: Vec<u8>,
    ) -> Result<Self, BlockError> {
        if add_data.len() > MAX_TERMINATION_ADD_DATA_SIZE {
            return Err(BlockError::BadSize {
                size: TERMINATION_HEADER_SIZE + add_data.len(),
                context: "termination additional data exceeds limit",
            });
        }

        Ok(Self {
            valid_frames,
            reason,
            add_data,
        })
    }

    /// Count of frames successfully received before termination.
    pub fn valid_frames(&self) -> u64 {
        self.valid_frames
    }

    /// The termination reason.
    pub fn reason(&self) -> TerminationReason {
        self.reason
    }

    /// Opaque additional data.
    pub fn add_data(&self) -> &[u8] {
        &self.add_data
    }

    /// Body length in bytes.
    pub fn payload_len(&self) -> usize {
        TERMINATION_HEADER_SIZE + self.add_data.len()
    }

    pub(super) fn write_body(&self, w: &mut BytesWriter<'_>) -> Result<(), BlockError> {
        w.write_u64_be(self.valid_frames).map_err(overflow)?;
        w.write_u8(self.reason.as_byte()).map_err(overflow)?;
        w.write_data(&self.add_data).map_err(overflow)
    }

    pub(super) fn parse_body(body: &[u8]) -> Result<Self, BlockError> {
        if body.len() < TERMINATION_HEADER_SIZE {
            return Err(BlockError::BadSize {
                size: body.len(),
                context: "termination body below header size",
            });
        }

        let mut r = BytesReader::new(body);
        let valid_frames = r.read_u64_be().map_err(truncated)?;
        let reason_byte = r.read_u8().map_err(truncated)?;
        let reason = TerminationReason::from_byte(reason_byte)
            .ok_or(BlockError::BadBody("invalid termination reason"))?;
        let add_data = r.read_data(r.gcount()).map_err(truncated)?.to_vec();

        Ok(Self {
            valid_frames,
            reason,
            add_data,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blocks::Block;

    #[test]
    fn test_roundtrip() {
        let block = Block::Termination(
            TerminationBlock::with_data(TerminationReason::IdleTimeout, 42, vec![0xaa, 0xbb])
                .unwrap(),
        );
        let mut buf = vec![0u8; block.size()];
        block.encode_into(&mut buf).unwrap();

        let (parsed, consumed) = Block::parse(&buf).unwrap();
        assert_eq!(consumed, 3 + 9 + 2);
        match parsed {
            Block::Termination(t) => {
                assert_eq!(t.valid_frames(), 42);
                assert_eq!(t.reason(), TerminationReason::IdleTimeout);
                assert_eq!(t.add_data(), &[0xaa, 0xbb]);
            }
            other => panic!("wrong block variant: {other:?}"),
        }
    }

    #[test]
    fn test_minimal_block() {
        let block = Block::Termination(TerminationBlock::new(TerminationReason::NormalClose));
        assert_eq!(block.payload_len(), TERMINATION_HEADER_SIZE);

        let mut buf = vec![0u8; block.size()];
        block.encode_into(&mut buf).unwrap();
        let (parsed, _) = Block::parse(&buf).unwrap();
        assert_eq!(parsed, block);
    }

    #[test]
    fn test_parse_rejects_invalid_reason() {
        let block = Block::Termination(TerminationBlock::new(TerminationReason::Banned));
        let mut buf = vec![0u8; block.size()];
        block.encode_into(&mut buf).unwrap();
        buf[11] = 200;

        assert!(matches!(
            Block::parse(&buf),
            Err(BlockError::BadBody("invalid termination reason"))
        ));
    }

    #[test]
    fn test_parse_rejects_short_body() {
        let mut buf = vec![0u8; 3 + 8];
        buf[0] = 243;
        buf[2] = 8;
        assert!(matches!(Block::parse(&buf), Err(BlockError::BadSize { size: 8, .. })));
    }

    #[test]
    fn test_rejects_oversized_add_data() {
        assert!(matches!(
            TerminationBlock::with_data(
                TerminationReason::NormalClose,
                0,
                vec![0u8; MAX_TERMINATION_ADD_DATA_SIZE + 1]
            ),
            Err(BlockError::BadSize { .. })
        ));
    }
}
