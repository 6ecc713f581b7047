//! Data-phase message container.

use crate::blocks::Block;

/// One logical frame: an ordered block list plus its wire form.
///
/// At most one representation is authoritative at a time. A write fills
/// `buffer` from `blocks`; a read replaces `blocks` from `buffer`. The
/// caller owns the container and must not alias it during a call.
#[derive(Debug, Default)]
pub struct DataPhaseMessage {
    /// Ordered blocks, the semantic form of the frame.
    pub blocks: Vec<Block>,
    /// Wire form: obfuscated length, ciphertext, tag.
    pub buffer: Vec<u8>,
}

impl DataPhaseMessage {
    /// Create an empty message.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a message carrying the given blocks.
    pub fn with_blocks(blocks: Vec<Block>) -> Self {
        Self {
            blocks,
            buffer: Vec::new(),
        }
    }

    /// Total serialized length of all blocks.
    pub fn payload_len(&self) -> usize {
        self.blocks.iter().map(Block::size).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blocks::{DateTimeBlock, PaddingBlock};

    #[test]
    fn test_payload_len_sums_block_sizes() {
        let message = DataPhaseMessage::with_blocks(vec![
            Block::DateTime(DateTimeBlock::new(0)),
            Block::Padding(PaddingBlock::new(10).unwrap()),
        ]);

        // (3 + 4) + (3 + 10)
        assert_eq!(message.payload_len(), 20);
    }

    #[test]
    fn test_empty_message() {
        let message = DataPhaseMessage::new();
        assert_eq!(message.payload_len(), 0);
        assert!(message.buffer.is_empty());
    }
}
