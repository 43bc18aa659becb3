//! The capabilities a message needs from whoever holds keys.
//!
//! [`Message`](crate::message::Message) never touches private key material
//! directly. Signing and decryption go through these traits so that a key
//! can live anywhere that can implement them.

use ed25519_dalek::{Signature, VerifyingKey};
use rand_core::CryptoRngCore;

use crate::crypto::Key;
use crate::message::{Message, MessageError};

/// Produces signatures over message digests
pub trait Signer {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Public key a verifier should check signatures against
    fn public(&self) -> Key;

    fn sign<R: CryptoRngCore + ?Sized>(
        &self,
        rng: &mut R,
        digest: &[u8],
    ) -> Result<Vec<u8>, Self::Error>;
}

/// Checks signatures against a public key
pub trait Verifier {
    fn verify(&self, public: &Key, digest: &[u8], signature: &[u8]) -> bool;
}

/// Encrypts a message to a recipient in place
pub trait Encrypter {
    fn encrypt<R: CryptoRngCore + ?Sized>(
        &self,
        rng: &mut R,
        message: &mut Message,
        recipient: &Key,
    ) -> Result<(), MessageError>;
}

/// Decrypts a message addressed to the implementor in place
pub trait Decrypter {
    fn decrypt(&self, message: &mut Message) -> Result<(), MessageError>;
}

/// Ed25519 verification against the signing half of `public`.
///
/// Malformed keys and signatures simply fail to verify.
pub(crate) fn verify_ed25519(public: &Key, digest: &[u8], signature: &[u8]) -> bool {
    let Ok(signature) = Signature::from_slice(signature) else {
        return false;
    };
    let Ok(verifying_key) = VerifyingKey::from_bytes(public.signing().as_bytes()) else {
        return false;
    };
    verifying_key.verify_strict(digest, &signature).is_ok()
}
