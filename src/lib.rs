//! # WEFT
//!
//! **W**ire-**E**ncrypted **F**ramed **T**ransport
//!
//! WEFT is the cryptographic transport core of an I2P NTCP2 endpoint: the
//! post-handshake data phase together with the key derivation that seeds
//! it. Given a completed Noise_XK handshake it provides:
//!
//! - **Framing**: length-obfuscated, AEAD-sealed frames of typed blocks
//! - **Obfuscation**: per-frame SipHash masking of the length field
//! - **Ordering**: strict block-ordering rules enforced on both paths
//! - **Determinism**: no I/O, no background tasks, no internal retries
//!
//! Sockets, handshake transcripts, router-info parsing, and session
//! management live in higher layers; this crate only ever touches the
//! caller's buffers.
//!
//! ## Example
//!
//! ```no_run
//! use weft::prelude::*;
//!
//! # fn run(alice: XkHandshake, bob: XkHandshake) -> Result<(), DataPhaseError> {
//! // both handshakes are finalized Noise_XK states
//! let mut sender = DataPhase::new(alice)?;
//! let mut receiver = DataPhase::new(bob)?;
//!
//! let mut message = DataPhaseMessage::with_blocks(vec![
//!     Block::DateTime(DateTimeBlock::now()),
//!     Block::Padding(PaddingBlock::new(17)?),
//! ]);
//! sender.write_message(&mut message)?;
//!
//! // message.buffer crosses the network; the receiver parses it back
//! receiver.read_message(&mut message)?;
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod blocks;
pub mod core;
pub mod crypto;
pub mod session;
pub mod wire;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::blocks::*;
    pub use crate::core::*;
    pub use crate::crypto::*;
    pub use crate::session::*;
    pub use crate::wire::{BytesReader, BytesWriter};
}

// Re-export the main entry points at the crate root
pub use crate::blocks::{Block, BlockType};
pub use crate::core::{BlockError, DataPhaseError, KdfError, WireError};
pub use crate::crypto::{DataPhaseKdf, Role, XkHandshake};
pub use crate::session::{DataPhase, DataPhaseMessage};
