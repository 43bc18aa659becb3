//! Cryptographic primitives for delphi
//!
//! This module provides the cryptographic foundation for delphi's message protocol:
//!
//! - **Key material**: fixed-size [`SubKey`]s composed into a [`Key`]
//!   (encryption || signing) and a [`KeyChain`] (public || private)
//! - **Key agreement**: ephemeral X25519 + HKDF-SHA256 per message
//! - **Encryption**: ChaCha20-Poly1305 with the message headers as
//!   associated data
//!
//! # Security Model
//!
//! ## Identity
//! Each principal holds two independent keypairs: an X25519 keypair for
//! encryption and an Ed25519 keypair for signatures. Both public halves
//! together form the principal's public [`Key`].
//!
//! ## Message Encryption
//! Every encrypted message gets its own [`Secret`], derived from a fresh
//! ephemeral X25519 key and the recipient's public encryption key. Only
//! the ephemeral public key travels with the message.
//!
//! ## Randomness
//! Nothing in this module reads a process-global RNG. Every function that
//! needs randomness takes it as an argument, which keeps all operations
//! deterministic for a given input.

mod exchange;
mod keys;
mod nonce;
mod secret;

pub use ed25519_dalek::Signature;
pub use exchange::{extract_shared_secret, generate_shared_secret, ExchangeError, HKDF_INFO};
pub use keys::{Key, KeyChain, KeyError, SubKey, KEYCHAIN_SIZE, KEY_SIZE, SUBKEY_SIZE};
pub use nonce::{Nonce, NONCE_SIZE};
pub use secret::{Secret, SecretError, SECRET_SIZE, TAG_SIZE};
