//! WEFT - Security layer.
//!
//! Implements the cryptographic machinery of the transport:
//! - Noise_XK handshake wrapper via `snow`
//! - ChaCha20-Poly1305 directional cipher states
//! - SipHash-2-4 frame-length obfuscation
//! - Data-phase key derivation
//! - X25519 static keypairs
//! - Base32/Base64 destination codecs

mod cipher;
mod kdf;
mod noise;
pub mod radix;
mod siphash;
mod x25519;

pub use cipher::*;
pub use kdf::*;
pub use noise::*;
pub use siphash::*;
pub use x25519::*;
