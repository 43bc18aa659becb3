use std::fmt;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use ed25519_dalek::SigningKey;
use rand_core::{CryptoRngCore, RngCore};
use serde::{Deserialize, Serialize};
use x25519_dalek::{PublicKey as X25519PublicKey, StaticSecret};
use zeroize::Zeroize;

/// Size of a single encryption or signing key half in bytes
pub const SUBKEY_SIZE: usize = 32;
/// Size of a [`Key`] (encryption subkey || signing subkey) in bytes
pub const KEY_SIZE: usize = 2 * SUBKEY_SIZE;
/// Size of a [`KeyChain`] (public key || private key) in bytes
pub const KEYCHAIN_SIZE: usize = 2 * KEY_SIZE;

/// Errors that can occur while building or parsing key material
#[derive(Debug, thiserror::Error)]
pub enum KeyError {
    #[error("invalid key size, expected {expected}, got {got}")]
    WrongLength { expected: usize, got: usize },
    #[error("key hex decode error: {0}")]
    Hex(#[from] hex::FromHexError),
    #[error("key base64 decode error: {0}")]
    Base64(#[from] base64::DecodeError),
    #[error("failed to read randomness: {0}")]
    Randomness(#[from] rand_core::Error),
    #[error("key error: {0}")]
    Default(#[from] anyhow::Error),
}

fn check_len(bytes: &[u8], expected: usize) -> Result<(), KeyError> {
    if bytes.len() != expected {
        return Err(KeyError::WrongLength {
            expected,
            got: bytes.len(),
        });
    }
    Ok(())
}

/// One half of an identity's key material.
///
/// Depending on where it sits in a [`Key`] this is a public or private
/// X25519 encryption key, or a public Ed25519 verifying key / private
/// Ed25519 seed. All-zero bytes mean "absent".
#[derive(
    Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Zeroize,
)]
pub struct SubKey([u8; SUBKEY_SIZE]);

impl fmt::Debug for SubKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SubKey({})", hex::encode(self.0))
    }
}

impl From<[u8; SUBKEY_SIZE]> for SubKey {
    fn from(bytes: [u8; SUBKEY_SIZE]) -> Self {
        SubKey(bytes)
    }
}

impl From<SubKey> for [u8; SUBKEY_SIZE] {
    fn from(key: SubKey) -> Self {
        key.0
    }
}

impl TryFrom<&[u8]> for SubKey {
    type Error = KeyError;
    fn try_from(bytes: &[u8]) -> Result<Self, Self::Error> {
        Self::from_slice(bytes)
    }
}

impl SubKey {
    /// Create a subkey from a byte slice of exactly [`SUBKEY_SIZE`] bytes
    pub fn from_slice(bytes: &[u8]) -> Result<Self, KeyError> {
        check_len(bytes, SUBKEY_SIZE)?;
        let mut buff = [0; SUBKEY_SIZE];
        buff.copy_from_slice(bytes);
        Ok(SubKey(buff))
    }

    /// Fill a subkey from the given randomness source
    pub fn generate<R: CryptoRngCore + ?Sized>(rng: &mut R) -> Result<Self, KeyError> {
        let mut buff = [0; SUBKEY_SIZE];
        rng.try_fill_bytes(&mut buff)?;
        Ok(SubKey(buff))
    }

    pub fn is_zero(&self) -> bool {
        self.0.iter().all(|b| *b == 0)
    }

    pub fn as_bytes(&self) -> &[u8; SUBKEY_SIZE] {
        &self.0
    }
}

/// A combined encryption + signing key half for one identity.
///
/// Layout: `encryption (32) || signing (32)`. A `Key` is either entirely
/// public or entirely private; which one is decided by its slot in a
/// [`KeyChain`].
#[derive(
    Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Zeroize,
)]
pub struct Key([SubKey; 2]);

impl fmt::Debug for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Key({})", self.to_hex())
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl From<[u8; KEY_SIZE]> for Key {
    fn from(bytes: [u8; KEY_SIZE]) -> Self {
        let mut encryption = [0; SUBKEY_SIZE];
        let mut signing = [0; SUBKEY_SIZE];
        encryption.copy_from_slice(&bytes[..SUBKEY_SIZE]);
        signing.copy_from_slice(&bytes[SUBKEY_SIZE..]);
        Key::new(encryption.into(), signing.into())
    }
}

impl TryFrom<&[u8]> for Key {
    type Error = KeyError;
    fn try_from(bytes: &[u8]) -> Result<Self, Self::Error> {
        Self::from_slice(bytes)
    }
}

impl Key {
    pub fn new(encryption: SubKey, signing: SubKey) -> Self {
        Key([encryption, signing])
    }

    /// Create a key from exactly [`KEY_SIZE`] bytes
    pub fn from_slice(bytes: &[u8]) -> Result<Self, KeyError> {
        check_len(bytes, KEY_SIZE)?;
        let mut buff = [0; KEY_SIZE];
        buff.copy_from_slice(bytes);
        Ok(buff.into())
    }

    /// Parse a key from a hexadecimal string
    ///
    /// Accepts both plain hex and "0x"-prefixed hex strings.
    pub fn from_hex(hex: &str) -> Result<Self, KeyError> {
        let hex = hex.trim();
        let hex = hex.strip_prefix("0x").unwrap_or(hex);
        let mut buff = [0; KEY_SIZE];
        hex::decode_to_slice(hex, &mut buff)?;
        Ok(buff.into())
    }

    /// Parse a key from standard, padded base64
    pub fn from_base64(b64: &str) -> Result<Self, KeyError> {
        let bytes = BASE64.decode(b64.trim())?;
        Self::from_slice(&bytes)
    }

    pub fn encryption(&self) -> &SubKey {
        &self.0[0]
    }

    pub fn signing(&self) -> &SubKey {
        &self.0[1]
    }

    pub fn is_zero(&self) -> bool {
        self.0[0].is_zero() && self.0[1].is_zero()
    }

    pub fn to_bytes(&self) -> [u8; KEY_SIZE] {
        let mut out = [0; KEY_SIZE];
        out[..SUBKEY_SIZE].copy_from_slice(self.0[0].as_bytes());
        out[SUBKEY_SIZE..].copy_from_slice(self.0[1].as_bytes());
        out
    }

    /// Lowercase hex of [`Key::to_bytes`]
    pub fn to_hex(&self) -> String {
        hex::encode(self.to_bytes())
    }

    /// Standard base64 of [`Key::to_bytes`]
    pub fn to_base64(&self) -> String {
        BASE64.encode(self.to_bytes())
    }

    /// Human-friendly display name for this key
    pub fn nickname(&self) -> String {
        crate::nickname::nickname(&self.to_bytes())
    }
}

/// The full key material for one identity.
///
/// Layout (canonical wire and storage format, 128 bytes):
///
/// ```text
/// [ public encryption: 32 ][ public signing: 32 ][ private encryption: 32 ][ private signing: 32 ]
/// ```
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize, Zeroize)]
pub struct KeyChain([Key; 2]);

impl fmt::Debug for KeyChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyChain")
            .field("public", &self.0[0])
            .finish_non_exhaustive()
    }
}

impl TryFrom<&[u8]> for KeyChain {
    type Error = KeyError;
    fn try_from(bytes: &[u8]) -> Result<Self, Self::Error> {
        Self::from_slice(bytes)
    }
}

impl KeyChain {
    pub fn new(public: Key, private: Key) -> Self {
        KeyChain([public, private])
    }

    /// Generate fresh key material from the given randomness source.
    ///
    /// The private encryption subkey is 32 random bytes used as an X25519
    /// scalar; the private signing subkey is 32 random bytes used as an
    /// Ed25519 seed. Public halves are derived from them.
    pub fn generate<R: CryptoRngCore + ?Sized>(rng: &mut R) -> Result<Self, KeyError> {
        let private_encryption = SubKey::generate(rng)?;
        let private_signing = SubKey::generate(rng)?;

        let x_secret = StaticSecret::from(*private_encryption.as_bytes());
        let public_encryption = SubKey::from(X25519PublicKey::from(&x_secret).to_bytes());

        let signing_key = SigningKey::from_bytes(private_signing.as_bytes());
        let public_signing = SubKey::from(signing_key.verifying_key().to_bytes());

        Ok(KeyChain::new(
            Key::new(public_encryption, public_signing),
            Key::new(private_encryption, private_signing),
        ))
    }

    /// Rebuild a key chain from its canonical [`KEYCHAIN_SIZE`]-byte layout
    pub fn from_slice(bytes: &[u8]) -> Result<Self, KeyError> {
        check_len(bytes, KEYCHAIN_SIZE)?;
        let public = Key::from_slice(&bytes[..KEY_SIZE])?;
        let private = Key::from_slice(&bytes[KEY_SIZE..])?;
        Ok(KeyChain::new(public, private))
    }

    pub fn public(&self) -> &Key {
        &self.0[0]
    }

    pub fn private(&self) -> &Key {
        &self.0[1]
    }

    pub fn is_zero(&self) -> bool {
        self.0[0].is_zero() && self.0[1].is_zero()
    }

    pub fn to_bytes(&self) -> [u8; KEYCHAIN_SIZE] {
        let mut out = [0; KEYCHAIN_SIZE];
        out[..KEY_SIZE].copy_from_slice(&self.0[0].to_bytes());
        out[KEY_SIZE..].copy_from_slice(&self.0[1].to_bytes());
        out
    }
}
