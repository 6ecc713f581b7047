//! RouterInfo block: a flood-request flag followed by a serialized
//! router-info record.
//!
//! The router-info bytes are opaque at this layer; only the on-wire length
//! and the flag byte are validated here.

use crate::core::{BlockError, FLOOD_FLAG_SIZE, MAX_BLOCK_SIZE, MIN_ROUTER_INFO_LEN};
use crate::wire::BytesWriter;

use super::overflow;

/// Mask of defined flag bits; the rest are reserved and must be zero.
const FLOOD_FLAG_MASK: u8 = 0x01;

/// A serialized router-info with its flood-request flag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouterInfoBlock {
    flood: bool,
    info: Vec<u8>,
}

impl RouterInfoBlock {
    /// Create a block from a serialized router-info.
    ///
    /// `info` must be at least the minimum router-info length (439 bytes)
    /// and leave room for the flag byte within the block size limit.
    pub fn new(flood: bool, info: Vec<u8>) -> Result<Self, BlockError> {
        if info.len() < MIN_ROUTER_INFO_LEN || info.len() > MAX_BLOCK_SIZE - FLOOD_FLAG_SIZE {
            return Err(BlockError::BadSize {
                size: info.len(),
                context: "router-info length out of range",
            });
        }

        Ok(Self { flood, info })
    }

    /// Whether the sender requests flood-fill distribution.
    pub fn flood(&self) -> bool {
        self.flood
    }

    /// The serialized router-info bytes.
    pub fn info(&self) -> &[u8] {
        &self.info
    }

    /// Consume the block, returning the router-info bytes.
    pub fn into_info(self) -> Vec<u8> {
        self.info
    }

    /// Body length in bytes.
    pub fn payload_len(&self) -> usize {
        FLOOD_FLAG_SIZE + self.info.len()
    }

    pub(super) fn write_body(&self, w: &mut BytesWriter<'_>) -> Result<(), BlockError> {
        w.write_u8(self.flood as u8).map_err(overflow)?;
        w.write_data(&self.info).map_err(overflow)
    }

    pub(super) fn parse_body(body: &[u8]) -> Result<Self, BlockError> {
        if body.len() < FLOOD_FLAG_SIZE + MIN_ROUTER_INFO_LEN {
            return Err(BlockError::BadSize {
                size: body.len(),
                context: "router-info body below minimum",
            });
        }

        let flag = body[0];
        if flag & !FLOOD_FLAG_MASK != 0 {
            return Err(BlockError::BadBody("reserved flood flag bits set"));
        }

        Ok(Self {
            flood: flag & FLOOD_FLAG_MASK != 0,
            info: body[FLOOD_FLAG_SIZE..].to_vec(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blocks::{Block, BlockType};
    use crate::core::BLOCK_HEADER_SIZE;

    fn dummy_info(len: usize) -> Vec<u8> {
        (0..len).map(|i| (i % 251) as u8).collect()
    }

    #[test]
    fn test_roundtrip() {
        let info = dummy_info(MIN_ROUTER_INFO_LEN);
        let block = Block::RouterInfo(RouterInfoBlock::new(true, info.clone()).unwrap());
        let mut buf = vec![0u8; block.size()];
        block.encode_into(&mut buf).unwrap();
        assert_eq!(buf.len(), BLOCK_HEADER_SIZE + 1 + info.len());
        assert_eq!(buf[3], 0x01);

        let (parsed, _) = Block::parse(&buf).unwrap();
        match parsed {
            Block::RouterInfo(ri) => {
                assert!(ri.flood());
                assert_eq!(ri.info(), &info[..]);
            }
            other => panic!("wrong block variant: {other:?}"),
        }
    }

    #[test]
    fn test_rejects_undersized_info() {
        assert!(matches!(
            RouterInfoBlock::new(false, dummy_info(MIN_ROUTER_INFO_LEN - 1)),
            Err(BlockError::BadSize { .. })
        ));
    }

    #[test]
    fn test_parse_rejects_reserved_flag_bits() {
        let block =
            Block::RouterInfo(RouterInfoBlock::new(false, dummy_info(MIN_ROUTER_INFO_LEN)).unwrap());
        let mut buf = vec![0u8; block.size()];
        block.encode_into(&mut buf).unwrap();
        buf[3] = 0x82;

        assert!(matches!(Block::parse(&buf), Err(BlockError::BadBody(_))));
    }

    #[test]
    fn test_parse_rejects_short_body() {
        let mut buf = vec![0u8; BLOCK_HEADER_SIZE + 10];
        buf[0] = BlockType::RouterInfo.as_byte();
        buf[2] = 10;
        assert!(matches!(Block::parse(&buf), Err(BlockError::BadSize { .. })));
    }
}
