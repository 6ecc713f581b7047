//! DateTime block: a 4-byte big-endian Unix-seconds clock sample.

use crate::core::{BlockError, DATE_TIME_SIZE};
use crate::wire::BytesWriter;

use super::{overflow, unix_now};

/// Peer clock sample carried at session start and for keep-alive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateTimeBlock {
    timestamp: u32,
}

impl DateTimeBlock {
    /// Create a block carrying the given Unix-seconds timestamp.
    pub fn new(timestamp: u32) -> Self {
        Self { timestamp }
    }

    /// Create a block carrying the current time.
    pub fn now() -> Self {
        Self {
            timestamp: unix_now(),
        }
    }

    /// The carried timestamp in Unix seconds.
    pub fn timestamp(&self) -> u32 {
        self.timestamp
    }

    /// Body length in bytes.
    pub fn payload_len(&self) -> usize {
        DATE_TIME_SIZE
    }

    pub(super) fn write_body(&self, w: &mut BytesWriter<'_>) -> Result<(), BlockError> {
        w.write_u32_be(self.timestamp).map_err(overflow)
    }

    pub(super) fn parse_body(body: &[u8]) -> Result<Self, BlockError> {
        if body.len() != DATE_TIME_SIZE {
            return Err(BlockError::BadSize {
                size: body.len(),
                context: "date-time body must be exactly 4 bytes",
            });
        }

        Ok(Self {
            timestamp: u32::from_be_bytes([body[0], body[1], body[2], body[3]]),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blocks::Block;

    #[test]
    fn test_roundtrip() {
        let block = Block::DateTime(DateTimeBlock::new(1_571_000_000));
        let mut buf = vec![0u8; block.size()];
        assert_eq!(block.encode_into(&mut buf).unwrap(), 7);
        assert_eq!(buf, [0x00, 0x00, 0x04, 0x5d, 0xa3, 0x8e, 0xc0]);

        let (parsed, consumed) = Block::parse(&buf).unwrap();
        assert_eq!(consumed, 7);
        match parsed {
            Block::DateTime(dt) => assert_eq!(dt.timestamp(), 1_571_000_000),
            other => panic!("wrong block variant: {other:?}"),
        }
    }

    #[test]
    fn test_rejects_wrong_body_size() {
        // size field says 5, body is 5 bytes: wrong for a date-time
        let buf = [0x00, 0x00, 0x05, 0x01, 0x02, 0x03, 0x04, 0x05];
        assert!(matches!(
            Block::parse(&buf),
            Err(BlockError::BadSize { size: 5, .. })
        ));
    }

    #[test]
    fn test_now_is_nonzero() {
        assert!(DateTimeBlock::now().timestamp() > 1_571_000_000);
    }
}
