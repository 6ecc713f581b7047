//! WEFT - Session layer.
//!
//! Implements the post-handshake data phase:
//! - `DataPhaseMessage`: a block list and its wire-frame buffer
//! - `DataPhase`: the per-session framing engine (write/read, ordering
//!   rules, termination state)

mod data_phase;
mod message;

pub use data_phase::*;
pub use message::*;
