//! Message encryption using ChaCha20-Poly1305
//!
//! A [`Secret`] is the symmetric key derived for exactly one message by the
//! key exchange in [`super::exchange`]. The nonce is owned by the message
//! and the serialized message headers are bound in as associated data, so
//! tampering with either the ciphertext, the nonce or the headers makes
//! decryption fail.

use chacha20poly1305::aead::{Aead, KeyInit, Payload};
use chacha20poly1305::{ChaCha20Poly1305, Key, Nonce as AeadNonce};
use zeroize::{Zeroize, ZeroizeOnDrop};

use super::nonce::Nonce;

/// Size of ChaCha20-Poly1305 key in bytes (256 bits)
pub const SECRET_SIZE: usize = 32;
/// Size of the Poly1305 authentication tag appended to every ciphertext
pub const TAG_SIZE: usize = 16;

/// Errors that can occur during encryption/decryption
#[derive(Debug, thiserror::Error)]
pub enum SecretError {
    #[error("secret error: {0}")]
    Default(#[from] anyhow::Error),
    /// The tag did not verify: wrong key, wrong nonce, wrong associated
    /// data or corrupted ciphertext.
    #[error("message authentication failed")]
    Authentication,
}

/// A 256-bit symmetric key for a single message
#[derive(PartialEq, Clone, Zeroize, ZeroizeOnDrop)]
pub struct Secret([u8; SECRET_SIZE]);

impl std::fmt::Debug for Secret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Secret(..)")
    }
}

impl From<[u8; SECRET_SIZE]> for Secret {
    fn from(bytes: [u8; SECRET_SIZE]) -> Self {
        Secret(bytes)
    }
}

impl Secret {
    /// Create a secret from a byte slice
    ///
    /// # Errors
    ///
    /// Returns an error if the slice length is not exactly `SECRET_SIZE` bytes.
    pub fn from_slice(data: &[u8]) -> Result<Self, SecretError> {
        if data.len() != SECRET_SIZE {
            return Err(anyhow::anyhow!(
                "invalid secret size, expected {}, got {}",
                SECRET_SIZE,
                data.len()
            )
            .into());
        }
        let mut buff = [0; SECRET_SIZE];
        buff.copy_from_slice(data);
        Ok(buff.into())
    }

    /// Get a reference to the secret key bytes
    pub fn bytes(&self) -> &[u8] {
        self.0.as_ref()
    }

    fn cipher(&self) -> ChaCha20Poly1305 {
        ChaCha20Poly1305::new(Key::from_slice(self.bytes()))
    }

    /// Seal `plaintext` under this secret.
    ///
    /// The output is `ciphertext || tag (16 bytes)`; the nonce is not
    /// included and must travel with the message.
    pub fn encrypt(&self, nonce: &Nonce, plaintext: &[u8], aad: &[u8]) -> Result<Vec<u8>, SecretError> {
        let payload = Payload {
            msg: plaintext,
            aad,
        };
        self.cipher()
            .encrypt(AeadNonce::from_slice(nonce.as_bytes()), payload)
            .map_err(|_| anyhow::anyhow!("encrypt error").into())
    }

    /// Open `ciphertext` under this secret.
    ///
    /// Fails closed: any authentication failure returns
    /// [`SecretError::Authentication`] and no plaintext.
    pub fn decrypt(&self, nonce: &Nonce, ciphertext: &[u8], aad: &[u8]) -> Result<Vec<u8>, SecretError> {
        let payload = Payload {
            msg: ciphertext,
            aad,
        };
        self.cipher()
            .decrypt(AeadNonce::from_slice(nonce.as_bytes()), payload)
            .map_err(|_| SecretError::Authentication)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::crypto::nonce::NONCE_SIZE;

    fn nonce(byte: u8) -> Nonce {
        Nonce::from([byte; NONCE_SIZE])
    }

    #[test]
    fn test_secret_encrypt_decrypt() {
        let secret = Secret::from([7u8; SECRET_SIZE]);
        let data = b"hello world, this is a test message for encryption";

        let encrypted = secret.encrypt(&nonce(1), data, b"aad").unwrap();
        assert_eq!(encrypted.len(), data.len() + TAG_SIZE);
        assert_ne!(&encrypted[..data.len()], data.as_slice());

        let decrypted = secret.decrypt(&nonce(1), &encrypted, b"aad").unwrap();
        assert_eq!(data.as_slice(), decrypted.as_slice());
    }

    #[test]
    fn test_tamper_detection() {
        let secret = Secret::from([9u8; SECRET_SIZE]);
        let encrypted = secret.encrypt(&nonce(2), b"attack at dawn", b"foo\nbar").unwrap();

        for i in 0..encrypted.len() {
            let mut flipped = encrypted.clone();
            flipped[i] ^= 0x01;
            assert!(matches!(
                secret.decrypt(&nonce(2), &flipped, b"foo\nbar"),
                Err(SecretError::Authentication)
            ));
        }

        assert!(secret.decrypt(&nonce(3), &encrypted, b"foo\nbar").is_err());
        assert!(secret.decrypt(&nonce(2), &encrypted, b"foo\nbaz").is_err());
        assert!(Secret::from([8u8; SECRET_SIZE])
            .decrypt(&nonce(2), &encrypted, b"foo\nbar")
            .is_err());
    }

    #[test]
    fn test_truncated_ciphertext() {
        let secret = Secret::from([1u8; SECRET_SIZE]);
        assert!(secret.decrypt(&nonce(1), &[0u8; TAG_SIZE - 1], b"").is_err());
        assert!(secret.decrypt(&nonce(1), &[], b"").is_err());
    }

    #[test]
    fn test_empty_plaintext() {
        let secret = Secret::from([3u8; SECRET_SIZE]);
        let encrypted = secret.encrypt(&nonce(4), b"", b"").unwrap();
        assert_eq!(encrypted.len(), TAG_SIZE);
        assert!(secret.decrypt(&nonce(4), &encrypted, b"").unwrap().is_empty());
    }

    #[test]
    fn test_secret_size_validation() {
        assert!(Secret::from_slice(&[1u8; 16]).is_err());
        assert!(Secret::from_slice(&[1u8; 64]).is_err());
        assert!(Secret::from_slice(&[1u8; SECRET_SIZE]).is_ok());
    }
}
