use std::fmt;

use rand_core::{CryptoRngCore, RngCore};
use serde::{Deserialize, Serialize};

use super::keys::KeyError;

/// Size of ChaCha20-Poly1305 nonce in bytes
pub const NONCE_SIZE: usize = 12;

/// A per-message AEAD nonce. All-zero bytes mean "not yet assigned".
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Nonce([u8; NONCE_SIZE]);

impl fmt::Debug for Nonce {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Nonce({})", hex::encode(self.0))
    }
}

impl From<[u8; NONCE_SIZE]> for Nonce {
    fn from(bytes: [u8; NONCE_SIZE]) -> Self {
        Nonce(bytes)
    }
}

impl Nonce {
    /// Draw a fresh nonce from the given randomness source
    pub fn generate<R: CryptoRngCore + ?Sized>(rng: &mut R) -> Result<Self, KeyError> {
        let mut buff = [0; NONCE_SIZE];
        rng.try_fill_bytes(&mut buff)?;
        Ok(Nonce(buff))
    }

    pub fn from_slice(bytes: &[u8]) -> Result<Self, KeyError> {
        if bytes.len() != NONCE_SIZE {
            return Err(KeyError::WrongLength {
                expected: NONCE_SIZE,
                got: bytes.len(),
            });
        }
        let mut buff = [0; NONCE_SIZE];
        buff.copy_from_slice(bytes);
        Ok(Nonce(buff))
    }

    pub fn is_zero(&self) -> bool {
        self.0.iter().all(|b| *b == 0)
    }

    pub fn as_bytes(&self) -> &[u8; NONCE_SIZE] {
        &self.0
    }
}

#[cfg(test)]
mod test {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;

    #[test]
    fn test_nonce_is_zero() {
        let zero = Nonce::default();
        assert!(zero.is_zero());

        let mut bytes = [0u8; NONCE_SIZE];
        bytes[0] = 1;
        assert!(!Nonce::from(bytes).is_zero());
    }

    #[test]
    fn test_nonce_generate() {
        let mut rng = StdRng::seed_from_u64(11);
        let a = Nonce::generate(&mut rng).unwrap();
        let b = Nonce::generate(&mut rng).unwrap();
        assert!(!a.is_zero());
        assert_ne!(a, b);
    }

    #[test]
    fn test_nonce_from_slice() {
        assert!(Nonce::from_slice(&[1u8; NONCE_SIZE]).is_ok());
        assert!(Nonce::from_slice(&[1u8; NONCE_SIZE + 1]).is_err());
        assert!(Nonce::from_slice(&[]).is_err());
    }
}
