//! Padding block: random filler, always the last block of a frame.

use rand::{rngs::OsRng, RngCore};

use crate::core::{BlockError, MAX_PADDING_SIZE};
use crate::wire::BytesWriter;

use super::overflow;

/// Random padding of a caller-chosen length.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaddingBlock {
    padding: Vec<u8>,
}

impl PaddingBlock {
    /// Create a padding block of the given body length, filled with random
    /// bytes.
    pub fn new(len: u16) -> Result<Self, BlockError> {
        if len as usize > MAX_PADDING_SIZE {
            return Err(BlockError::BadSize {
                size: len as usize,
                context: "padding exceeds size limit",
            });
        }

        let mut padding = vec![0u8; len as usize];
        OsRng.fill_bytes(&mut padding);

        Ok(Self { padding })
    }

    /// The padding bytes.
    pub fn padding(&self) -> &[u8] {
        &self.padding
    }

    /// Body length in bytes.
    pub fn payload_len(&self) -> usize {
        self.padding.len()
    }

    pub(super) fn write_body(&self, w: &mut BytesWriter<'_>) -> Result<(), BlockError> {
        w.write_data(&self.padding).map_err(overflow)
    }

    pub(super) fn parse_body(body: &[u8]) -> Result<Self, BlockError> {
        if body.len() > MAX_PADDING_SIZE {
            return Err(BlockError::BadSize {
                size: body.len(),
                context: "padding exceeds size limit",
            });
        }

        Ok(Self {
            padding: body.to_vec(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blocks::{Block, BlockType};

    #[test]
    fn test_roundtrip() {
        let block = Block::Padding(PaddingBlock::new(17).unwrap());
        assert_eq!(block.payload_len(), 17);

        let mut buf = vec![0u8; block.size()];
        block.encode_into(&mut buf).unwrap();
        assert_eq!(buf[0], BlockType::Padding.as_byte());

        let (parsed, consumed) = Block::parse(&buf).unwrap();
        assert_eq!(consumed, 20);
        assert_eq!(parsed, block);
    }

    #[test]
    fn test_zero_length_padding() {
        let block = Block::Padding(PaddingBlock::new(0).unwrap());
        let mut buf = vec![0u8; block.size()];
        assert_eq!(block.encode_into(&mut buf).unwrap(), 3);

        let (parsed, _) = Block::parse(&buf).unwrap();
        assert_eq!(parsed.payload_len(), 0);
    }

    #[test]
    fn test_rejects_oversized_padding() {
        assert!(matches!(
            PaddingBlock::new((MAX_PADDING_SIZE + 1) as u16),
            Err(BlockError::BadSize { .. })
        ));
    }

    #[test]
    fn test_padding_is_randomized() {
        // 32 random bytes colliding is not a thing to worry about
        let a = PaddingBlock::new(32).unwrap();
        let b = PaddingBlock::new(32).unwrap();
        assert_ne!(a.padding(), b.padding());
    }
}
