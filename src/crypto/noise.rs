//! Noise_XK handshake wrapper.
//!
//! The data phase only consumes the handshake's output: once the final
//! handshake message has been processed, [`XkHandshake::split`] yields the
//! two directional session keys plus a 32-byte binding value, and the
//! handshake state is gone. A handshake that errors mid-exchange poisons
//! itself and can never be split.

use snow::{Builder, HandshakeState};
use zeroize::Zeroize;

use crate::core::{CryptoError, KdfError, HASH_SIZE, PRIVATE_KEY_SIZE, PUBLIC_KEY_SIZE};

use super::cipher::SessionKey;

/// Noise protocol pattern for the transport.
const NOISE_PATTERN: &str = "Noise_XK_25519_ChaChaPoly_SHA256";

/// Session role, fixed at handshake construction.
///
/// The role decides which keystream direction is "send" for the rest of
/// the session.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Role {
    /// Opened the connection (Alice).
    Initiator,
    /// Accepted the connection (Bob).
    Responder,
}

/// Output of a finalized handshake: directional keys plus the binding value
/// feeding the length-obfuscation KDF.
///
/// `send_key`/`recv_key` are relative to the role that ran the handshake.
pub struct SplitKeys {
    send_key: SessionKey,
    recv_key: SessionKey,
    chaining_key: [u8; HASH_SIZE],
}

impl SplitKeys {
    /// Assemble split keys from raw parts.
    pub fn new(send_key: SessionKey, recv_key: SessionKey, chaining_key: [u8; HASH_SIZE]) -> Self {
        Self {
            send_key,
            recv_key,
            chaining_key,
        }
    }

    /// Key for the role's sending direction.
    pub fn send_key(&self) -> &SessionKey {
        &self.send_key
    }

    /// Key for the role's receiving direction.
    pub fn recv_key(&self) -> &SessionKey {
        &self.recv_key
    }

    /// The 32-byte binding value from the handshake transcript.
    pub fn chaining_key(&self) -> &[u8; HASH_SIZE] {
        &self.chaining_key
    }
}

impl Drop for SplitKeys {
    fn drop(&mut self) {
        self.chaining_key.zeroize();
    }
}

enum XkState {
    Handshaking(Box<HandshakeState>),
    /// A failed or consumed exchange. Unusable by construction.
    Poisoned,
}

/// A Noise_XK handshake in progress.
///
/// The responder's static key is known to the initiator up front; three
/// messages complete the exchange. Message payloads are passed through
/// opaquely for the caller's option negotiation.
pub struct XkHandshake {
    state: XkState,
    role: Role,
}

impl XkHandshake {
    /// Create the initiator side. `remote_public` is the responder's known
    /// static key.
    pub fn initiator(
        local_private: &[u8; PRIVATE_KEY_SIZE],
        remote_public: &[u8; PUBLIC_KEY_SIZE],
    ) -> Result<Self, CryptoError> {
        let builder = Builder::new(NOISE_PATTERN.parse().unwrap());
        let state = builder
            .local_private_key(local_private)
            .remote_public_key(remote_public)
            .build_initiator()
            .map_err(|e| CryptoError::HandshakeFailed(e.to_string()))?;

        Ok(Self {
            state: XkState::Handshaking(Box::new(state)),
            role: Role::Initiator,
        })
    }

    /// Create the responder side.
    pub fn responder(local_private: &[u8; PRIVATE_KEY_SIZE]) -> Result<Self, CryptoError> {
        let builder = Builder::new(NOISE_PATTERN.parse().unwrap());
        let state = builder
            .local_private_key(local_private)
            .build_responder()
            .map_err(|e| CryptoError::HandshakeFailed(e.to_string()))?;

        Ok(Self {
            state: XkState::Handshaking(Box::new(state)),
            role: Role::Responder,
        })
    }

    /// The role this side was constructed with.
    pub fn role(&self) -> Role {
        self.role
    }

    /// Whether the message exchange is complete and the handshake can be
    /// split.
    pub fn is_finalized(&self) -> bool {
        match &self.state {
            XkState::Handshaking(hs) => hs.is_handshake_finished(),
            XkState::Poisoned => false,
        }
    }

    /// Produce the next handshake message carrying `payload`.
    pub fn write_message(&mut self, payload: &[u8]) -> Result<Vec<u8>, CryptoError> {
        let XkState::Handshaking(mut hs) = std::mem::replace(&mut self.state, XkState::Poisoned)
        else {
            return Err(CryptoError::HandshakeFailed("state poisoned".into()));
        };

        let mut buf = vec![0u8; 65535];
        match hs.write_message(payload, &mut buf) {
            Ok(len) => {
                buf.truncate(len);
                self.state = XkState::Handshaking(hs);
                Ok(buf)
            }
            Err(e) => Err(CryptoError::HandshakeFailed(e.to_string())),
        }
    }

    /// Process a handshake message from the peer, returning its payload.
    pub fn read_message(&mut self, message: &[u8]) -> Result<Vec<u8>, CryptoError> {
        let XkState::Handshaking(mut hs) = std::mem::replace(&mut self.state, XkState::Poisoned)
        else {
            return Err(CryptoError::HandshakeFailed("state poisoned".into()));
        };

        let mut payload = vec![0u8; 65535];
        match hs.read_message(message, &mut payload) {
            Ok(len) => {
                payload.truncate(len);
                self.state = XkState::Handshaking(hs);
                Ok(payload)
            }
            Err(e) => Err(CryptoError::HandshakeFailed(e.to_string())),
        }
    }

    /// Consume the finalized handshake, yielding the directional session
    /// keys and the binding value.
    ///
    /// Fails with [`KdfError::NotFinalized`] while messages are outstanding
    /// and [`KdfError::NullState`] if the state was poisoned by an earlier
    /// error.
    pub fn split(self) -> Result<SplitKeys, KdfError> {
        let XkState::Handshaking(mut hs) = self.state else {
            return Err(KdfError::NullState);
        };

        if !hs.is_handshake_finished() {
            return Err(KdfError::NotFinalized);
        }

        let mut chaining_key = [0u8; HASH_SIZE];
        chaining_key.copy_from_slice(hs.get_handshake_hash());

        let (initiator_key, responder_key) = hs.dangerously_get_raw_split();
        let (send, recv) = match self.role {
            Role::Initiator => (initiator_key, responder_key),
            Role::Responder => (responder_key, initiator_key),
        };

        Ok(SplitKeys::new(
            SessionKey::from_bytes(send),
            SessionKey::from_bytes(recv),
            chaining_key,
        ))
    }
}
