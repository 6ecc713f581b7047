//! Data-phase framing engine.
//!
//! Frame layout on the wire:
//!
//! ```text
//! +---------------------+--------------------------------+-----------+
//! | obfuscated length   | ciphertext                     | tag       |
//! | 2 bytes (BE16)      | plain_len - 16 bytes           | 16 bytes  |
//! +---------------------+--------------------------------+-----------+
//! ```
//!
//! The length field is the plaintext length (payload + tag) XORed with the
//! direction's SipHash mask; the payload is the concatenation of serialized
//! blocks, sealed in place with ChaCha20-Poly1305.
//!
//! Frames in a direction must be written and read in order. Validation
//! failures before any cipher state is touched leave the session usable;
//! an authentication failure, a malformed payload discovered after
//! decryption, or counter exhaustion terminates the session for good.

use tracing::{debug, warn};

use crate::blocks::{Block, BlockType};
use crate::core::{
    CryptoError, DataPhaseError, AEAD_TAG_SIZE, LENGTH_SIZE, MAX_FRAME_SIZE, MAX_PLAINTEXT_SIZE,
    MIN_FRAME_SIZE,
};
use crate::crypto::{DataPhaseKdf, Direction, Role, XkHandshake};

use super::message::DataPhaseMessage;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SessionState {
    Active,
    Terminated,
}

/// Per-session framing engine for one endpoint.
///
/// The role fixes which direction is "send"; the two directions are
/// otherwise independent. The engine owns the KDF and with it all mutable
/// per-direction state; it holds no buffers beyond the caller's message.
pub struct DataPhase {
    role: Role,
    kdf: DataPhaseKdf,
    state: SessionState,
}

impl DataPhase {
    /// Consume a finalized handshake into a data-phase engine.
    pub fn new(handshake: XkHandshake) -> Result<Self, DataPhaseError> {
        let role = handshake.role();
        let kdf = DataPhaseKdf::from_handshake(handshake)?;
        Ok(Self::from_kdf(role, kdf))
    }

    /// Build an engine from an already-derived KDF.
    pub fn from_kdf(role: Role, kdf: DataPhaseKdf) -> Self {
        Self {
            role,
            kdf,
            state: SessionState::Active,
        }
    }

    /// The endpoint's role.
    pub fn role(&self) -> Role {
        self.role
    }

    /// Whether the session has been terminated. A terminated engine fails
    /// every further call.
    pub fn is_terminated(&self) -> bool {
        self.state == SessionState::Terminated
    }

    fn send_direction(&self) -> Direction {
        match self.role {
            Role::Initiator => Direction::InitiatorToResponder,
            Role::Responder => Direction::ResponderToInitiator,
        }
    }

    fn recv_direction(&self) -> Direction {
        self.send_direction().opposite()
    }

    /// Serialize, length-obfuscate, and seal `message.blocks` into
    /// `message.buffer`.
    ///
    /// On error the buffer contents are unspecified and nothing must be
    /// emitted; the keystream and counter are only advanced once the
    /// message has passed validation, so the session stays usable after a
    /// rejected write.
    pub fn write_message(&mut self, message: &mut DataPhaseMessage) -> Result<(), DataPhaseError> {
        self.check_active()?;

        let payload_len = message.payload_len();
        if payload_len == 0 {
            return Err(DataPhaseError::EmptyMessage);
        }

        let plain_len = payload_len + AEAD_TAG_SIZE;
        if plain_len > MAX_PLAINTEXT_SIZE {
            return Err(DataPhaseError::Oversize {
                size: plain_len,
                max: MAX_PLAINTEXT_SIZE,
            });
        }

        check_block_order(&message.blocks)?;

        message.buffer.clear();
        message.buffer.resize(LENGTH_SIZE + plain_len, 0);

        let obf_len = self
            .kdf
            .process_length(self.send_direction(), plain_len as u16);
        message.buffer[..LENGTH_SIZE].copy_from_slice(&obf_len.to_be_bytes());

        let mut offset = LENGTH_SIZE;
        for block in &message.blocks {
            offset += block.encode_into(&mut message.buffer[offset..])?;
            if let Block::Termination(term) = block {
                debug!(reason = ?term.reason(), "termination block sent");
            }
        }
        debug_assert_eq!(offset, LENGTH_SIZE + payload_len);

        let (body, tag) = message.buffer[LENGTH_SIZE..].split_at_mut(payload_len);
        match self
            .kdf
            .cipher_state(self.send_direction())
            .seal_in_place(body, tag)
        {
            Ok(()) => Ok(()),
            Err(CryptoError::CounterExhaustion) => {
                self.terminate("send counter exhausted");
                Err(DataPhaseError::Terminated)
            }
            Err(_) => Err(DataPhaseError::Crypto),
        }
    }

    /// Deobfuscate, open, and parse `message.buffer`, replacing
    /// `message.blocks` with the parsed list.
    pub fn read_message(&mut self, message: &mut DataPhaseMessage) -> Result<(), DataPhaseError> {
        self.read_message_with(message, true)
    }

    /// [`read_message`](Self::read_message) with explicit control over
    /// length deobfuscation, for callers that already unmasked the length
    /// while draining a stream.
    pub fn read_message_with(
        &mut self,
        message: &mut DataPhaseMessage,
        deobfuscate_length: bool,
    ) -> Result<(), DataPhaseError> {
        self.check_active()?;

        let frame_len = message.buffer.len();
        if !(MIN_FRAME_SIZE..=MAX_FRAME_SIZE).contains(&frame_len) {
            return Err(DataPhaseError::BadSize { size: frame_len });
        }

        let obf_len = u16::from_be_bytes([message.buffer[0], message.buffer[1]]);
        let plain_len = if deobfuscate_length {
            self.kdf.process_length(self.recv_direction(), obf_len)
        } else {
            obf_len
        } as usize;

        // a frame carrying nothing but the tag is a valid keep-alive
        if plain_len <= AEAD_TAG_SIZE {
            message.blocks.clear();
            return Ok(());
        }

        if LENGTH_SIZE + plain_len > frame_len || plain_len > MAX_PLAINTEXT_SIZE {
            return Err(DataPhaseError::BadSize { size: plain_len });
        }

        let ciphertext = &mut message.buffer[LENGTH_SIZE..LENGTH_SIZE + plain_len];
        match self
            .kdf
            .cipher_state(self.recv_direction())
            .open_in_place(ciphertext)
        {
            Ok(()) => {}
            Err(CryptoError::CounterExhaustion) => {
                self.terminate("receive counter exhausted");
                return Err(DataPhaseError::Terminated);
            }
            Err(_) => {
                self.terminate("AEAD authentication failed");
                return Err(DataPhaseError::AeadAuth);
            }
        }

        let body = &message.buffer[LENGTH_SIZE..LENGTH_SIZE + plain_len - AEAD_TAG_SIZE];
        match parse_blocks(body) {
            Ok(blocks) => {
                message.blocks = blocks;
                Ok(())
            }
            Err(err) => {
                // the frame authenticated but its content is malformed;
                // the peer is faulty and the session cannot continue
                self.terminate("malformed decrypted payload");
                Err(err)
            }
        }
    }

    fn check_active(&self) -> Result<(), DataPhaseError> {
        match self.state {
            SessionState::Active => Ok(()),
            SessionState::Terminated => Err(DataPhaseError::Terminated),
        }
    }

    fn terminate(&mut self, why: &'static str) {
        warn!(role = ?self.role, why, "session terminated");
        self.state = SessionState::Terminated;
    }
}

/// Enforce the frame-ordering rules: at most one Padding block, always
/// last; after a Termination block only a single Padding block may follow.
fn check_block_order(blocks: &[Block]) -> Result<(), DataPhaseError> {
    let mut saw_padding = false;
    let mut saw_termination = false;

    for block in blocks {
        if saw_padding {
            return Err(DataPhaseError::BadOrder("padding must be the last block"));
        }
        if saw_termination && block.block_type() != BlockType::Padding {
            return Err(DataPhaseError::BadOrder(
                "termination followed by non-padding block",
            ));
        }

        match block.block_type() {
            BlockType::Padding => saw_padding = true,
            BlockType::Termination => saw_termination = true,
            _ => {}
        }
    }

    Ok(())
}

/// Parse concatenated blocks from a decrypted frame body, enforcing the
/// same ordering rules as the write path.
fn parse_blocks(body: &[u8]) -> Result<Vec<Block>, DataPhaseError> {
    let mut blocks = Vec::new();
    let mut offset = 0;
    let mut saw_padding = false;
    let mut saw_termination = false;

    while offset < body.len() {
        if saw_padding {
            return Err(DataPhaseError::BadOrder("padding must be the last block"));
        }

        let (block, consumed) = Block::parse(&body[offset..])?;
        if saw_termination && block.block_type() != BlockType::Padding {
            return Err(DataPhaseError::BadOrder(
                "termination followed by non-padding block",
            ));
        }

        match &block {
            Block::Padding(_) => saw_padding = true,
            Block::Termination(term) => {
                saw_termination = true;
                debug!(reason = ?term.reason(), valid_frames = term.valid_frames(), "termination block received");
            }
            _ => {}
        }

        blocks.push(block);
        offset += consumed;
    }

    Ok(blocks)
}
