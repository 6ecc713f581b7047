//! Protocol constants for the NTCP2 data phase.
//!
//! These values are fixed by the wire format and MUST NOT be changed.

// =============================================================================
// FRAME LAYOUT
// =============================================================================

/// Obfuscated length field size.
pub const LENGTH_SIZE: usize = 2;

/// Poly1305 authentication tag size.
pub const AEAD_TAG_SIZE: usize = 16;

/// ChaCha20-Poly1305 nonce size.
pub const AEAD_NONCE_SIZE: usize = 12;

/// Minimum on-wire frame size (length field + tag, zero payload).
pub const MIN_FRAME_SIZE: usize = LENGTH_SIZE + AEAD_TAG_SIZE;

/// Maximum on-wire frame size (length field + maximum u16 ciphertext).
pub const MAX_FRAME_SIZE: usize = LENGTH_SIZE + u16::MAX as usize;

/// Maximum plaintext length per frame (block payload + tag).
pub const MAX_PLAINTEXT_SIZE: usize = 65519;

/// Maximum block payload per frame.
pub const MAX_PAYLOAD_SIZE: usize = MAX_PLAINTEXT_SIZE - AEAD_TAG_SIZE;

// =============================================================================
// BLOCK LAYOUT
// =============================================================================

/// Block header size (type + size).
pub const BLOCK_HEADER_SIZE: usize = 3;

/// Maximum block body size.
pub const MAX_BLOCK_SIZE: usize = 65516;

/// DateTime block body size (exact).
pub const DATE_TIME_SIZE: usize = 4;

/// Options block body size (exact).
pub const OPTIONS_SIZE: usize = 12;

/// Wire cast ratio for Options padding-ratio floats.
pub const OPTIONS_CAST_RATIO: f32 = 16.0;

/// Minimum Options padding ratio.
pub const MIN_PADDING_RATIO: f32 = 0.0;

/// Maximum Options padding ratio (255 / 16).
pub const MAX_PADDING_RATIO: f32 = 15.9375;

/// Flood-request flag size in a RouterInfo block body.
pub const FLOOD_FLAG_SIZE: usize = 1;

/// Minimum RouterInfo block body (flood flag + minimum serialized router-info).
pub const MIN_ROUTER_INFO_SIZE: usize = 440;

/// Minimum serialized router-info length.
pub const MIN_ROUTER_INFO_LEN: usize = MIN_ROUTER_INFO_SIZE - FLOOD_FLAG_SIZE;

/// I2NP block header size (message type + message id + expiration).
pub const I2NP_HEADER_SIZE: usize = 9;

/// Default I2NP message expiration horizon in seconds.
pub const DEFAULT_I2NP_EXPIRATION: u32 = 120;

/// Maximum padding block body size.
pub const MAX_PADDING_SIZE: usize = MAX_BLOCK_SIZE - MIN_ROUTER_INFO_SIZE;

/// Termination block header size (valid-frames counter + reason).
pub const TERMINATION_HEADER_SIZE: usize = 9;

/// Maximum Termination additional data size.
pub const MAX_TERMINATION_ADD_DATA_SIZE: usize = MAX_BLOCK_SIZE - TERMINATION_HEADER_SIZE;

// =============================================================================
// KEY MATERIAL
// =============================================================================

/// Session key size (ChaCha20-Poly1305).
pub const SESSION_KEY_SIZE: usize = 32;

/// X25519 public key size.
pub const PUBLIC_KEY_SIZE: usize = 32;

/// X25519 private key size.
pub const PRIVATE_KEY_SIZE: usize = 32;

/// SHA-256 output size (handshake binding value, HMAC output).
pub const HASH_SIZE: usize = 32;

/// SipHash key-plus-iv material consumed per direction (k1 + k2 + iv).
pub const SIP_MATERIAL_SIZE: usize = 24;
