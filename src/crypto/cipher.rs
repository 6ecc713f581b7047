//! ChaCha20-Poly1305 AEAD cipher state for one direction of a session.
//!
//! Each direction owns a `(key, counter)` pair. The 12-byte nonce is the
//! counter in the cipher's native little-endian form followed by four zero
//! bytes; frame lengths and block fields elsewhere in the crate stay
//! big-endian.

use chacha20poly1305::{
    aead::{AeadInPlace, KeyInit},
    ChaCha20Poly1305, Nonce, Tag,
};
use zeroize::Zeroize;

use crate::core::{CryptoError, AEAD_NONCE_SIZE, AEAD_TAG_SIZE, SESSION_KEY_SIZE};

/// A directional session key.
///
/// Zeroized on drop.
#[derive(Clone)]
pub struct SessionKey {
    key: [u8; SESSION_KEY_SIZE],
}

impl SessionKey {
    /// Create a session key from raw bytes.
    pub fn from_bytes(key: [u8; SESSION_KEY_SIZE]) -> Self {
        Self { key }
    }

    /// Get the raw key bytes.
    ///
    /// # Security
    /// Handle with care - this exposes sensitive key material.
    pub fn as_bytes(&self) -> &[u8; SESSION_KEY_SIZE] {
        &self.key
    }
}

impl Drop for SessionKey {
    fn drop(&mut self) {
        self.key.zeroize();
    }
}

/// Construct the 12-byte nonce for a frame counter.
fn construct_nonce(counter: u64) -> [u8; AEAD_NONCE_SIZE] {
    let mut nonce = [0u8; AEAD_NONCE_SIZE];
    nonce[..8].copy_from_slice(&counter.to_le_bytes());
    nonce
}

/// AEAD state for one direction: key plus monotonically increasing frame
/// counter. The counter advances by exactly one per successful seal or open
/// and is never reused.
pub struct CipherState {
    key: SessionKey,
    nonce: u64,
}

impl CipherState {
    /// Create a cipher state with the counter at zero.
    pub fn new(key: SessionKey) -> Self {
        Self { key, nonce: 0 }
    }

    /// The counter the next seal or open will use.
    pub fn nonce(&self) -> u64 {
        self.nonce
    }

    /// Encrypt `buffer` in place and write the 16-byte tag to `tag_out`.
    pub fn seal_in_place(&mut self, buffer: &mut [u8], tag_out: &mut [u8]) -> Result<(), CryptoError> {
        if tag_out.len() != AEAD_TAG_SIZE {
            return Err(CryptoError::EncryptionFailed);
        }

        let nonce = construct_nonce(self.checked_nonce()?);
        let cipher = ChaCha20Poly1305::new(self.key.as_bytes().into());
        let tag = cipher
            .encrypt_in_place_detached(Nonce::from_slice(&nonce), b"", buffer)
            .map_err(|_| CryptoError::EncryptionFailed)?;

        tag_out.copy_from_slice(&tag);
        self.nonce += 1;
        Ok(())
    }

    /// Decrypt `buffer` (ciphertext followed by its 16-byte tag) in place.
    ///
    /// On success the plaintext occupies `buffer[..len - 16]`; the tag bytes
    /// are left untouched.
    pub fn open_in_place(&mut self, buffer: &mut [u8]) -> Result<(), CryptoError> {
        if buffer.len() < AEAD_TAG_SIZE {
            return Err(CryptoError::DecryptionFailed);
        }

        let nonce = construct_nonce(self.checked_nonce()?);
        let (ciphertext, tag) = buffer.split_at_mut(buffer.len() - AEAD_TAG_SIZE);
        let cipher = ChaCha20Poly1305::new(self.key.as_bytes().into());
        cipher
            .decrypt_in_place_detached(
                Nonce::from_slice(&nonce),
                b"",
                ciphertext,
                Tag::from_slice(tag),
            )
            .map_err(|_| CryptoError::DecryptionFailed)?;

        self.nonce += 1;
        Ok(())
    }

    fn checked_nonce(&self) -> Result<u64, CryptoError> {
        if self.nonce == u64::MAX {
            return Err(CryptoError::CounterExhaustion);
        }
        Ok(self.nonce)
    }

    #[cfg(test)]
    pub(crate) fn set_nonce(&mut self, nonce: u64) {
        self.nonce = nonce;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pair() -> (CipherState, CipherState) {
        let key = SessionKey::from_bytes([0x42; SESSION_KEY_SIZE]);
        (CipherState::new(key.clone()), CipherState::new(key))
    }

    #[test]
    fn test_seal_open_roundtrip() {
        let (mut sealer, mut opener) = pair();

        let mut buffer = *b"seventeen bytes!!";
        let mut tag = [0u8; AEAD_TAG_SIZE];
        sealer.seal_in_place(&mut buffer, &mut tag).unwrap();
        assert_ne!(&buffer, b"seventeen bytes!!");

        let mut framed = buffer.to_vec();
        framed.extend_from_slice(&tag);
        opener.open_in_place(&mut framed).unwrap();
        assert_eq!(&framed[..17], b"seventeen bytes!!");

        assert_eq!(sealer.nonce(), 1);
        assert_eq!(opener.nonce(), 1);
    }

    #[test]
    fn test_counters_advance_in_lockstep() {
        let (mut sealer, mut opener) = pair();

        for i in 0..4u8 {
            let mut buffer = vec![i; 8];
            let mut tag = [0u8; AEAD_TAG_SIZE];
            sealer.seal_in_place(&mut buffer, &mut tag).unwrap();
            buffer.extend_from_slice(&tag);
            opener.open_in_place(&mut buffer).unwrap();
            assert_eq!(&buffer[..8], &[i; 8]);
        }

        assert_eq!(sealer.nonce(), 4);
        assert_eq!(opener.nonce(), 4);
    }

    #[test]
    fn test_open_fails_on_tampered_ciphertext() {
        let (mut sealer, mut opener) = pair();

        let mut buffer = vec![0u8; 24];
        let mut tag = [0u8; AEAD_TAG_SIZE];
        sealer.seal_in_place(&mut buffer, &mut tag).unwrap();
        buffer.extend_from_slice(&tag);
        buffer[0] ^= 0xff;

        assert!(matches!(
            opener.open_in_place(&mut buffer),
            Err(CryptoError::DecryptionFailed)
        ));
        // failed open does not consume a counter value
        assert_eq!(opener.nonce(), 0);
    }

    #[test]
    fn test_open_fails_on_skipped_counter() {
        let (mut sealer, mut opener) = pair();

        let mut first = vec![1u8; 4];
        let mut tag = [0u8; AEAD_TAG_SIZE];
        sealer.seal_in_place(&mut first, &mut tag).unwrap();

        let mut second = vec![2u8; 4];
        sealer.seal_in_place(&mut second, &mut tag).unwrap();
        second.extend_from_slice(&tag);

        // opener is still at counter 0, the frame was sealed at 1
        assert!(opener.open_in_place(&mut second).is_err());
    }

    #[test]
    fn test_counter_exhaustion() {
        let (mut sealer, _) = pair();
        sealer.set_nonce(u64::MAX);

        let mut buffer = vec![0u8; 4];
        let mut tag = [0u8; AEAD_TAG_SIZE];
        assert!(matches!(
            sealer.seal_in_place(&mut buffer, &mut tag),
            Err(CryptoError::CounterExhaustion)
        ));
    }
}
