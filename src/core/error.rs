//! Error types for the WEFT transport core.

use thiserror::Error;

/// Errors from the big-endian wire codec.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum WireError {
    /// Cursor ran past the end of the buffer.
    #[error("truncated read/write: needed {needed} bytes, {available} available")]
    Truncated {
        /// Bytes the operation required.
        needed: usize,
        /// Bytes remaining at the cursor.
        available: usize,
    },
}

/// Errors from block serialization and parsing.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BlockError {
    /// Block type id is not part of the taxonomy.
    #[error("unknown block type: 0x{0:02x}")]
    UnknownType(u8),

    /// Advertised size is out of bounds or disagrees with the body.
    #[error("bad block size: {size} ({context})")]
    BadSize {
        /// Offending size.
        size: usize,
        /// What the size was checked against.
        context: &'static str,
    },

    /// Body bytes violate a block invariant.
    #[error("bad block body: {0}")]
    BadBody(&'static str),
}

/// Errors in the crypto layer.
#[derive(Debug, Error)]
pub enum CryptoError {
    /// Noise handshake failed.
    #[error("handshake failed: {0}")]
    HandshakeFailed(String),

    /// AEAD encryption failed.
    #[error("AEAD encryption failed")]
    EncryptionFailed,

    /// AEAD decryption failed (invalid tag or corrupted).
    #[error("AEAD decryption failed (invalid tag or corrupted)")]
    DecryptionFailed,

    /// Nonce counter exhausted, session must terminate.
    #[error("nonce counter exhausted - session must terminate")]
    CounterExhaustion,
}

/// Errors constructing the data-phase KDF from a handshake.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum KdfError {
    /// Handshake still has messages outstanding.
    #[error("handshake not finalized")]
    NotFinalized,

    /// Handshake state was already consumed or poisoned.
    #[error("null handshake state")]
    NullState,
}

/// Errors from the data-phase engine.
#[derive(Debug, Error)]
pub enum DataPhaseError {
    /// Write called with no blocks.
    #[error("empty message")]
    EmptyMessage,

    /// Plaintext would exceed the frame limit.
    #[error("oversize message: {size} bytes, max {max}")]
    Oversize {
        /// Plaintext length the message would need.
        size: usize,
        /// Maximum plaintext length per frame.
        max: usize,
    },

    /// Incoming frame length out of range.
    #[error("bad frame size: {size}")]
    BadSize {
        /// Offending frame or plaintext length.
        size: usize,
    },

    /// Block ordering invariant violated.
    #[error("bad block order: {0}")]
    BadOrder(&'static str),

    /// Block failed to parse or serialize.
    #[error("bad block: {0}")]
    BadBlock(#[from] BlockError),

    /// Poly1305 tag mismatch. Fatal to the session.
    #[error("AEAD authentication failed")]
    AeadAuth,

    /// Engine already terminated.
    #[error("session terminated")]
    Terminated,

    /// Internal cipher failure.
    #[error("crypto failure")]
    Crypto,

    /// KDF construction failed.
    #[error("kdf error: {0}")]
    Kdf(#[from] KdfError),
}
