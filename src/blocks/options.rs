//! Options block: padding-negotiation parameters.
//!
//! Wire format (12 bytes):
//!
//! ```text
//! +------+------+------+------+--------+--------+--------+--------+
//! | tmin | tmax | rmin | rmax | tdummy | rdummy | tdelay | rdelay |
//! | 1B   | 1B   | 1B   | 1B   | BE16   | BE16   | BE16   | BE16   |
//! +------+------+------+------+--------+--------+--------+--------+
//! ```
//!
//! The four ratio bytes carry fixed-point values with a 1/16 step, so the
//! representable range is 0 to 15.9375.

use crate::core::{
    BlockError, MAX_PADDING_RATIO, MIN_PADDING_RATIO, OPTIONS_CAST_RATIO, OPTIONS_SIZE,
};
use crate::wire::{BytesReader, BytesWriter};

use super::{overflow, truncated};

/// Padding negotiation options.
// the fixed-point cast makes getters pointless, leave the params public
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct OptionsBlock {
    /// Minimum send padding ratio.
    pub tmin: f32,
    /// Maximum send padding ratio.
    pub tmax: f32,
    /// Minimum receive padding ratio.
    pub rmin: f32,
    /// Maximum receive padding ratio.
    pub rmax: f32,
    /// Requested send dummy traffic, bytes per period.
    pub tdummy: u16,
    /// Requested receive dummy traffic, bytes per period.
    pub rdummy: u16,
    /// Requested send delay in milliseconds.
    pub tdelay: u16,
    /// Requested receive delay in milliseconds.
    pub rdelay: u16,
}

impl OptionsBlock {
    /// Body length in bytes.
    pub fn payload_len(&self) -> usize {
        OPTIONS_SIZE
    }

    pub(super) fn write_body(&self, w: &mut BytesWriter<'_>) -> Result<(), BlockError> {
        self.check_ratios()?;

        w.write_u8((self.tmin * OPTIONS_CAST_RATIO) as u8).map_err(overflow)?;
        w.write_u8((self.tmax * OPTIONS_CAST_RATIO) as u8).map_err(overflow)?;
        w.write_u8((self.rmin * OPTIONS_CAST_RATIO) as u8).map_err(overflow)?;
        w.write_u8((self.rmax * OPTIONS_CAST_RATIO) as u8).map_err(overflow)?;
        w.write_u16_be(self.tdummy).map_err(overflow)?;
        w.write_u16_be(self.rdummy).map_err(overflow)?;
        w.write_u16_be(self.tdelay).map_err(overflow)?;
        w.write_u16_be(self.rdelay).map_err(overflow)
    }

    pub(super) fn parse_body(body: &[u8]) -> Result<Self, BlockError> {
        if body.len() != OPTIONS_SIZE {
            return Err(BlockError::BadSize {
                size: body.len(),
                context: "options body must be exactly 12 bytes",
            });
        }

        let mut r = BytesReader::new(body);
        let block = Self {
            tmin: f32::from(r.read_u8().map_err(truncated)?) / OPTIONS_CAST_RATIO,
            tmax: f32::from(r.read_u8().map_err(truncated)?) / OPTIONS_CAST_RATIO,
            rmin: f32::from(r.read_u8().map_err(truncated)?) / OPTIONS_CAST_RATIO,
            rmax: f32::from(r.read_u8().map_err(truncated)?) / OPTIONS_CAST_RATIO,
            tdummy: r.read_u16_be().map_err(truncated)?,
            rdummy: r.read_u16_be().map_err(truncated)?,
            tdelay: r.read_u16_be().map_err(truncated)?,
            rdelay: r.read_u16_be().map_err(truncated)?,
        };
        block.check_ratios()?;

        Ok(block)
    }

    fn check_ratios(&self) -> Result<(), BlockError> {
        for ratio in [self.tmin, self.tmax, self.rmin, self.rmax] {
            if !(MIN_PADDING_RATIO..=MAX_PADDING_RATIO).contains(&ratio) {
                return Err(BlockError::BadBody("padding ratio out of range"));
            }
        }
        Ok(())
    }
}
