//! WEFT - Core constants and error types.
//!
//! This module has no dependencies on the rest of the crate and defines the
//! values and error taxonomy shared by every layer.

mod constants;
mod error;

pub use constants::*;
pub use error::*;
