//! Data-phase key derivation.
//!
//! A finalized handshake is consumed into two directional AEAD cipher
//! states and two SipHash length keystreams. For a given direction the
//! keystream material is `HMAC-SHA256(ck, key_of_opposite_direction || 0x01)`,
//! split as k1 (bytes 0..8), k2 (8..16), and initial iv (16..24), each
//! little-endian. Both peers derive identical per-direction values because
//! one side's send key is the other side's receive key.

use hmac::{Hmac, Mac};
use sha2::Sha256;
use zeroize::Zeroize;

use crate::core::{KdfError, HASH_SIZE, SESSION_KEY_SIZE, SIP_MATERIAL_SIZE};

use super::cipher::CipherState;
use super::noise::{Role, SplitKeys, XkHandshake};
use super::siphash::LengthKeystream;

type HmacSha256 = Hmac<Sha256>;

/// Direction of traffic inside a session, independent of which role this
/// endpoint plays.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    /// Initiator to responder (Alice to Bob).
    InitiatorToResponder,
    /// Responder to initiator (Bob to Alice).
    ResponderToInitiator,
}

impl Direction {
    /// Get the opposite direction.
    pub fn opposite(self) -> Self {
        match self {
            Direction::InitiatorToResponder => Direction::ResponderToInitiator,
            Direction::ResponderToInitiator => Direction::InitiatorToResponder,
        }
    }
}

/// Directional cipher and length-obfuscation state for one session.
///
/// Owns all mutable per-direction state: two AEAD frame counters and two
/// SipHash ivs. Frames in a direction must be processed in send order or
/// both the keystream and the counter desynchronize.
pub struct DataPhaseKdf {
    cipher_ab: CipherState,
    cipher_ba: CipherState,
    sip_ab: LengthKeystream,
    sip_ba: LengthKeystream,
}

impl DataPhaseKdf {
    /// Consume a handshake and derive the session's directional state.
    pub fn from_handshake(handshake: XkHandshake) -> Result<Self, KdfError> {
        let role = handshake.role();
        let keys = handshake.split()?;
        Ok(Self::from_split_keys(role, keys))
    }

    /// Derive the directional state from already-split keys.
    ///
    /// `role` orients the relative send/recv keys onto the absolute
    /// initiator-to-responder and responder-to-initiator directions.
    pub fn from_split_keys(role: Role, keys: SplitKeys) -> Self {
        let (key_ab, key_ba) = match role {
            Role::Initiator => (keys.send_key().clone(), keys.recv_key().clone()),
            Role::Responder => (keys.recv_key().clone(), keys.send_key().clone()),
        };

        let sip_ab = derive_keystream(keys.chaining_key(), key_ba.as_bytes());
        let sip_ba = derive_keystream(keys.chaining_key(), key_ab.as_bytes());

        Self {
            cipher_ab: CipherState::new(key_ab),
            cipher_ba: CipherState::new(key_ba),
            sip_ab,
            sip_ba,
        }
    }

    /// Obfuscate or deobfuscate a frame length, advancing the direction's
    /// keystream. The XOR is symmetric: applying it twice with peers in
    /// lockstep returns the original length.
    pub fn process_length(&mut self, direction: Direction, length: u16) -> u16 {
        length ^ self.keystream(direction).next_mask()
    }

    /// The AEAD cipher state for a direction.
    pub fn cipher_state(&mut self, direction: Direction) -> &mut CipherState {
        match direction {
            Direction::InitiatorToResponder => &mut self.cipher_ab,
            Direction::ResponderToInitiator => &mut self.cipher_ba,
        }
    }

    fn keystream(&mut self, direction: Direction) -> &mut LengthKeystream {
        match direction {
            Direction::InitiatorToResponder => &mut self.sip_ab,
            Direction::ResponderToInitiator => &mut self.sip_ba,
        }
    }
}

fn derive_keystream(
    chaining_key: &[u8; HASH_SIZE],
    direction_key: &[u8; SESSION_KEY_SIZE],
) -> LengthKeystream {
    let mut mac = HmacSha256::new_from_slice(chaining_key).expect("HMAC accepts any key length");

    let mut input = [0u8; SESSION_KEY_SIZE + 1];
    input[..SESSION_KEY_SIZE].copy_from_slice(direction_key);
    input[SESSION_KEY_SIZE] = 0x01;
    mac.update(&input);
    input.zeroize();

    let digest = mac.finalize().into_bytes();
    let mut material = [0u8; SIP_MATERIAL_SIZE];
    material.copy_from_slice(&digest[..SIP_MATERIAL_SIZE]);

    LengthKeystream::from_material(&material)
}
