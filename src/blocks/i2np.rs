//! I2NP block: a single I2NP message with its short header.
//!
//! Wire format:
//!
//! ```text
//! +----------+------------+--------------+-----------------+
//! | msg type | message id | expiration   | message payload |
//! | 1 byte   | BE32       | BE32 seconds | variable        |
//! +----------+------------+--------------+-----------------+
//! ```

use rand::{rngs::OsRng, RngCore};

use crate::core::{BlockError, DEFAULT_I2NP_EXPIRATION, I2NP_HEADER_SIZE, MAX_BLOCK_SIZE};
use crate::wire::{BytesReader, BytesWriter};

use super::{overflow, truncated, unix_now};

/// I2NP message type identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum I2npMessageType {
    /// Store a key/value pair in the network database.
    DatabaseStore = 1,
    /// Look up a network database entry.
    DatabaseLookup = 2,
    /// Reply to a failed lookup with closer peers.
    DatabaseSearchReply = 3,
    /// Delivery acknowledgment.
    DeliveryStatus = 10,
    /// Garlic-wrapped message.
    Garlic = 11,
    /// Tunnel data message.
    TunnelData = 18,
    /// Tunnel gateway message.
    TunnelGateway = 19,
    /// Opaque data message.
    Data = 20,
    /// Fixed-size tunnel build request.
    TunnelBuild = 21,
    /// Fixed-size tunnel build reply.
    TunnelBuildReply = 22,
    /// Variable-size tunnel build request.
    VariableTunnelBuild = 23,
    /// Variable-size tunnel build reply.
    VariableTunnelBuildReply = 24,
}

impl I2npMessageType {
    /// Parse a message type from its wire byte.
    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            1 => Some(Self::DatabaseStore),
            2 => Some(Self::DatabaseLookup),
            3 => Some(Self::DatabaseSearchReply),
            10 => Some(Self::DeliveryStatus),
            11 => Some(Self::Garlic),
            18 => Some(Self::TunnelData),
            19 => Some(Self::TunnelGateway),
            20 => Some(Self::Data),
            21 => Some(Self::TunnelBuild),
            22 => Some(Self::TunnelBuildReply),
            23 => Some(Self::VariableTunnelBuild),
            24 => Some(Self::VariableTunnelBuildReply),
            _ => None,
        }
    }

    /// Wire byte for this message type.
    pub fn as_byte(self) -> u8 {
        self as u8
    }
}

/// One I2NP message inside a data-phase frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct I2npBlock {
    msg_type: I2npMessageType,
    msg_id: u32,
    expiration: u32,
    payload: Vec<u8>,
}

impl I2npBlock {
    /// Create a block with a random message id and the default expiration
    /// horizon.
    pub fn new(msg_type: I2npMessageType, payload: Vec<u8>) -> Result<Self, BlockError> {
        Self::with_parts(
            msg_type,
            OsRng.next_u32(),
            unix_now() + DEFAULT_I2NP_EXPIRATION,
            payload,
        )
    }

    /// Create a block from explicit header fields.
    pub fn with_parts(
        msg_type: I2npMessageType,
        msg_id: u32,
        expiration: u32,
        payload: Vec<u8>,
    ) -> Result<Self, BlockError> {
        if payload.len() > MAX_BLOCK_SIZE - I2NP_HEADER_SIZE {
            return Err(BlockError::BadSize {
                size: I2NP_HEADER_SIZE + payload.len(),
                context: "i2np payload exceeds block size limit",
            });
        }

        Ok(Self {
            msg_type,
            msg_id,
            expiration,
            payload,
        })
    }

    /// The I2NP message type.
    pub fn msg_type(&self) -> I2npMessageType {
        self.msg_type
    }

    /// The I2NP message id.
    pub fn msg_id(&self) -> u32 {
        self.msg_id
    }

    /// Message expiration in Unix seconds. Enforcement is left to the
    /// message consumer, not the codec.
    pub fn expiration(&self) -> u32 {
        self.expiration
    }

    /// The message payload.
    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    /// Body length in bytes.
    pub fn payload_len(&self) -> usize {
        I2NP_HEADER_SIZE + self.payload.len()
    }

    pub(super) fn write_body(&self, w: &mut BytesWriter<'_>) -> Result<(), BlockError> {
        w.write_u8(self.msg_type.as_byte()).map_err(overflow)?;
        w.write_u32_be(self.msg_id).map_err(overflow)?;
        w.write_u32_be(self.expiration).map_err(overflow)?;
        w.write_data(&self.payload).map_err(overflow)
    }

    pub(super) fn parse_body(body: &[u8]) -> Result<Self, BlockError> {
        if body.len() < I2NP_HEADER_SIZE {
            return Err(BlockError::BadSize {
                size: body.len(),
                context: "i2np body below header size",
            });
        }

        let mut r = BytesReader::new(body);
        let type_byte = r.read_u8().map_err(truncated)?;
        let msg_type = I2npMessageType::from_byte(type_byte)
            .ok_or(BlockError::BadBody("invalid I2NP message type"))?;
        let msg_id = r.read_u32_be().map_err(truncated)?;
        let expiration = r.read_u32_be().map_err(truncated)?;
        let payload = r.read_data(r.gcount()).map_err(truncated)?.to_vec();

        Ok(Self {
            msg_type,
            msg_id,
            expiration,
            payload,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blocks::Block;

    #[test]
    fn test_roundtrip() {
        let block = Block::I2np(
            I2npBlock::with_parts(
                I2npMessageType::Data,
                0xDEAD_BEEF,
                1_571_000_120,
                vec![0x11, 0x22, 0x33],
            )
            .unwrap(),
        );
        let mut buf = vec![0u8; block.size()];
        block.encode_into(&mut buf).unwrap();

        let (parsed, consumed) = Block::parse(&buf).unwrap();
        assert_eq!(consumed, 3 + 9 + 3);
        assert_eq!(parsed, block);
    }

    #[test]
    fn test_header_only_message() {
        let block = Block::I2np(I2npBlock::new(I2npMessageType::DeliveryStatus, vec![]).unwrap());
        assert_eq!(block.payload_len(), I2NP_HEADER_SIZE);

        let mut buf = vec![0u8; block.size()];
        block.encode_into(&mut buf).unwrap();
        let (parsed, _) = Block::parse(&buf).unwrap();
        assert_eq!(parsed, block);
    }

    #[test]
    fn test_parse_rejects_invalid_message_type() {
        let block = Block::I2np(I2npBlock::new(I2npMessageType::Data, vec![1, 2]).unwrap());
        let mut buf = vec![0u8; block.size()];
        block.encode_into(&mut buf).unwrap();
        buf[3] = 0; // reserved type

        assert!(matches!(
            Block::parse(&buf),
            Err(BlockError::BadBody("invalid I2NP message type"))
        ));
    }

    #[test]
    fn test_parse_rejects_short_body() {
        let buf = [0x03, 0x00, 0x04, 20, 0x00, 0x00, 0x01];
        assert!(matches!(Block::parse(&buf), Err(BlockError::BadSize { size: 4, .. })));
    }

    #[test]
    fn test_message_type_roundtrip() {
        for t in [
            I2npMessageType::DatabaseStore,
            I2npMessageType::DatabaseLookup,
            I2npMessageType::DatabaseSearchReply,
            I2npMessageType::DeliveryStatus,
            I2npMessageType::Garlic,
            I2npMessageType::TunnelData,
            I2npMessageType::TunnelGateway,
            I2npMessageType::Data,
            I2npMessageType::TunnelBuild,
            I2npMessageType::TunnelBuildReply,
            I2npMessageType::VariableTunnelBuild,
            I2npMessageType::VariableTunnelBuildReply,
        ] {
            assert_eq!(I2npMessageType::from_byte(t.as_byte()), Some(t));
        }
        assert_eq!(I2npMessageType::from_byte(0), None);
        assert_eq!(I2npMessageType::from_byte(255), None);
    }
}
