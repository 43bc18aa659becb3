//! Per-message key agreement using X25519 + HKDF-SHA256
//!
//! # Protocol Overview
//!
//! To derive a message key for a recipient:
//! 1. **Generate ephemeral keypair**: 32 random bytes as an X25519 scalar
//! 2. **Perform ECDH**: ephemeral private key x recipient public encryption key
//! 3. **Derive**: HKDF-SHA256 over the ECDH output with
//!    `salt = ephemeral_pubkey || recipient_pubkey` and `info = "oracle/v1"`
//! 4. **Transmit**: the ephemeral public key travels with the message
//!
//! The recipient recovers the same key by:
//! 1. **Perform ECDH**: own private encryption key x ephemeral public key
//! 2. **Derive**: HKDF-SHA256 with the same salt ordering
//!    (`ephemeral_pubkey || own_pubkey`)
//!
//! # Security Properties
//!
//! - **Per-message keys**: the ephemeral key is never stored by the sender
//! - **Binding**: the derived key depends on both public values via the salt

use hkdf::Hkdf;
use rand_core::CryptoRngCore;
use sha2::Sha256;
use x25519_dalek::{PublicKey as X25519PublicKey, SharedSecret, StaticSecret};

use super::keys::{KeyError, SubKey, SUBKEY_SIZE};
use super::secret::{Secret, SECRET_SIZE};

/// HKDF `info` input shared by every derivation in this protocol
pub const HKDF_INFO: &[u8] = b"oracle/v1";

/// Errors that can occur during key agreement
#[derive(Debug, thiserror::Error)]
pub enum ExchangeError {
    #[error("key error: {0}")]
    Key(#[from] KeyError),
    /// The X25519 output was all zeroes (low-order public key).
    #[error("key agreement produced a non-contributory shared secret")]
    NonContributory,
    #[error("key derivation failed: {0}")]
    Kdf(String),
}

fn derive(shared: &SharedSecret, ephemeral: &SubKey, counterparty: &SubKey) -> Result<Secret, ExchangeError> {
    if !shared.was_contributory() {
        return Err(ExchangeError::NonContributory);
    }

    let mut salt = [0u8; 2 * SUBKEY_SIZE];
    salt[..SUBKEY_SIZE].copy_from_slice(ephemeral.as_bytes());
    salt[SUBKEY_SIZE..].copy_from_slice(counterparty.as_bytes());

    let hk = Hkdf::<Sha256>::new(Some(&salt[..]), shared.as_bytes());
    let mut okm = [0u8; SECRET_SIZE];
    hk.expand(HKDF_INFO, &mut okm)
        .map_err(|e| ExchangeError::Kdf(e.to_string()))?;
    Ok(Secret::from(okm))
}

/// Generate an ephemeral X25519 keypair and derive a message key against
/// the counterparty's public encryption key.
///
/// Returns the derived key, which never leaves this process, and the
/// ephemeral public key, which is sent alongside the ciphertext.
pub fn generate_shared_secret<R: CryptoRngCore + ?Sized>(
    counterparty: &SubKey,
    rng: &mut R,
) -> Result<(Secret, SubKey), ExchangeError> {
    let ephemeral_private = StaticSecret::from(*SubKey::generate(rng)?.as_bytes());
    let ephemeral_public = SubKey::from(X25519PublicKey::from(&ephemeral_private).to_bytes());

    let shared = ephemeral_private.diffie_hellman(&X25519PublicKey::from(*counterparty.as_bytes()));
    let secret = derive(&shared, &ephemeral_public, counterparty)?;

    Ok((secret, ephemeral_public))
}

/// Recover the message key from the recipient's side.
///
/// `own_public` must be the public half of `own_private`; it is only used
/// as salt input, mirroring the order used by [`generate_shared_secret`].
pub fn extract_shared_secret(
    ephemeral: &SubKey,
    own_private: &SubKey,
    own_public: &SubKey,
) -> Result<Secret, ExchangeError> {
    let private = StaticSecret::from(*own_private.as_bytes());
    let shared = private.diffie_hellman(&X25519PublicKey::from(*ephemeral.as_bytes()));
    derive(&shared, ephemeral, own_public)
}

#[cfg(test)]
mod test {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;
    use crate::crypto::keys::KeyChain;

    #[test]
    fn test_both_sides_agree() {
        let mut rng = StdRng::seed_from_u64(21);
        let bob = KeyChain::generate(&mut rng).unwrap();

        let (sent, ephemeral) =
            generate_shared_secret(bob.public().encryption(), &mut rng).unwrap();
        let received = extract_shared_secret(
            &ephemeral,
            bob.private().encryption(),
            bob.public().encryption(),
        )
        .unwrap();

        assert_eq!(sent, received);
        assert_ne!(&ephemeral, bob.public().encryption());
    }

    #[test]
    fn test_wrong_recipient_disagrees() {
        let mut rng = StdRng::seed_from_u64(22);
        let bob = KeyChain::generate(&mut rng).unwrap();
        let carol = KeyChain::generate(&mut rng).unwrap();

        let (sent, ephemeral) =
            generate_shared_secret(bob.public().encryption(), &mut rng).unwrap();
        let received = extract_shared_secret(
            &ephemeral,
            carol.private().encryption(),
            carol.public().encryption(),
        )
        .unwrap();

        assert_ne!(sent, received);
    }

    #[test]
    fn test_salt_binds_public_key() {
        let mut rng = StdRng::seed_from_u64(23);
        let bob = KeyChain::generate(&mut rng).unwrap();
        let carol = KeyChain::generate(&mut rng).unwrap();

        let (sent, ephemeral) =
            generate_shared_secret(bob.public().encryption(), &mut rng).unwrap();
        // right private key, wrong public key in the salt
        let received = extract_shared_secret(
            &ephemeral,
            bob.private().encryption(),
            carol.public().encryption(),
        )
        .unwrap();

        assert_ne!(sent, received);
    }

    #[test]
    fn test_fresh_ephemeral_per_call() {
        let mut rng = StdRng::seed_from_u64(24);
        let bob = KeyChain::generate(&mut rng).unwrap();

        let (first, eph_a) = generate_shared_secret(bob.public().encryption(), &mut rng).unwrap();
        let (second, eph_b) = generate_shared_secret(bob.public().encryption(), &mut rng).unwrap();

        assert_ne!(eph_a, eph_b);
        assert_ne!(first, second);
    }

    #[test]
    fn test_low_order_point_rejected() {
        let mut rng = StdRng::seed_from_u64(25);
        let zero = SubKey::default();
        assert!(matches!(
            generate_shared_secret(&zero, &mut rng),
            Err(ExchangeError::NonContributory)
        ));
    }
}
