//! Data-phase block taxonomy.
//!
//! Every frame payload is a concatenation of typed, length-delimited blocks:
//!
//! ```text
//! +--------+----------------+----------------+
//! | Type   | Size           | Body           |
//! | 1 byte | 2 bytes (BE16) | `size` bytes   |
//! +--------+----------------+----------------+
//! ```
//!
//! Ordering rules inside a frame are enforced by the data-phase engine:
//! at most one Padding block, always last; a Termination block may only be
//! followed by a single Padding block.

mod date_time;
mod i2np;
mod options;
mod padding;
mod router_info;
mod termination;

pub use date_time::*;
pub use i2np::*;
pub use options::*;
pub use padding::*;
pub use router_info::*;
pub use termination::*;

use std::time::{SystemTime, UNIX_EPOCH};

use crate::core::{BlockError, WireError, BLOCK_HEADER_SIZE};
use crate::wire::{BytesReader, BytesWriter};

/// Block type identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum BlockType {
    /// Peer clock sample (4-byte Unix seconds).
    DateTime = 0,
    /// Padding negotiation options.
    Options = 1,
    /// Flood flag + serialized router-info.
    RouterInfo = 2,
    /// An I2NP message.
    I2np = 3,
    /// Arbitrary padding, always the last block.
    Padding = 242,
    /// Session termination notice.
    Termination = 243,
}

impl BlockType {
    /// Parse a block type from its wire byte.
    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            0 => Some(Self::DateTime),
            1 => Some(Self::Options),
            2 => Some(Self::RouterInfo),
            3 => Some(Self::I2np),
            242 => Some(Self::Padding),
            243 => Some(Self::Termination),
            _ => None,
        }
    }

    /// Wire byte for this block type.
    pub fn as_byte(self) -> u8 {
        self as u8
    }
}

/// A typed data-phase block.
#[derive(Debug, Clone, PartialEq)]
pub enum Block {
    /// Peer clock sample.
    DateTime(DateTimeBlock),
    /// Padding negotiation options.
    Options(OptionsBlock),
    /// Flood flag + serialized router-info.
    RouterInfo(RouterInfoBlock),
    /// An I2NP message.
    I2np(I2npBlock),
    /// Arbitrary padding.
    Padding(PaddingBlock),
    /// Session termination notice.
    Termination(TerminationBlock),
}

impl Block {
    /// The type tag of this block.
    pub fn block_type(&self) -> BlockType {
        match self {
            Self::DateTime(_) => BlockType::DateTime,
            Self::Options(_) => BlockType::Options,
            Self::RouterInfo(_) => BlockType::RouterInfo,
            Self::I2np(_) => BlockType::I2np,
            Self::Padding(_) => BlockType::Padding,
            Self::Termination(_) => BlockType::Termination,
        }
    }

    /// Body length in bytes (excluding the 3-byte header).
    pub fn payload_len(&self) -> usize {
        match self {
            Self::DateTime(b) => b.payload_len(),
            Self::Options(b) => b.payload_len(),
            Self::RouterInfo(b) => b.payload_len(),
            Self::I2np(b) => b.payload_len(),
            Self::Padding(b) => b.payload_len(),
            Self::Termination(b) => b.payload_len(),
        }
    }

    /// Total serialized length (header + body).
    pub fn size(&self) -> usize {
        BLOCK_HEADER_SIZE + self.payload_len()
    }

    /// Serialize `type | size | body` into the front of `out`.
    ///
    /// Returns the number of bytes written.
    pub fn encode_into(&self, out: &mut [u8]) -> Result<usize, BlockError> {
        let total = self.size();
        if out.len() < total {
            return Err(BlockError::BadSize {
                size: total,
                context: "output buffer too small",
            });
        }

        let mut w = BytesWriter::new(&mut out[..total]);
        w.write_u8(self.block_type().as_byte()).map_err(overflow)?;
        w.write_u16_be(self.payload_len() as u16).map_err(overflow)?;
        match self {
            Self::DateTime(b) => b.write_body(&mut w)?,
            Self::Options(b) => b.write_body(&mut w)?,
            Self::RouterInfo(b) => b.write_body(&mut w)?,
            Self::I2np(b) => b.write_body(&mut w)?,
            Self::Padding(b) => b.write_body(&mut w)?,
            Self::Termination(b) => b.write_body(&mut w)?,
        }

        Ok(total)
    }

    /// Parse one block from the front of `buf`.
    ///
    /// Returns the block and the number of bytes consumed. The advertised
    /// size field must be fully backed by `buf`; a short body is a size
    /// error, not a truncation the caller can retry.
    pub fn parse(buf: &[u8]) -> Result<(Self, usize), BlockError> {
        let mut r = BytesReader::new(buf);
        let type_byte = r.read_u8().map_err(truncated)?;
        let size = r.read_u16_be().map_err(truncated)? as usize;
        let body = r.read_data(size).map_err(truncated)?;

        let block = match BlockType::from_byte(type_byte)
            .ok_or(BlockError::UnknownType(type_byte))?
        {
            BlockType::DateTime => Self::DateTime(DateTimeBlock::parse_body(body)?),
            BlockType::Options => Self::Options(OptionsBlock::parse_body(body)?),
            BlockType::RouterInfo => Self::RouterInfo(RouterInfoBlock::parse_body(body)?),
            BlockType::I2np => Self::I2np(I2npBlock::parse_body(body)?),
            BlockType::Padding => Self::Padding(PaddingBlock::parse_body(body)?),
            BlockType::Termination => Self::Termination(TerminationBlock::parse_body(body)?),
        };

        Ok((block, BLOCK_HEADER_SIZE + size))
    }
}

/// Map a cursor overrun during block decode to the block-size error.
pub(crate) fn truncated(err: WireError) -> BlockError {
    let WireError::Truncated { needed, .. } = err;
    BlockError::BadSize {
        size: needed,
        context: "block extends past end of payload",
    }
}

/// Map a cursor overrun during block encode to the block-size error.
pub(crate) fn overflow(err: WireError) -> BlockError {
    let WireError::Truncated { needed, .. } = err;
    BlockError::BadSize {
        size: needed,
        context: "block body exceeds advertised size",
    }
}

/// Current Unix time in seconds, saturating to u32.
pub(crate) fn unix_now() -> u32 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs().min(u32::MAX as u64) as u32)
        .unwrap_or_default()
}
