//! The delphi message envelope
//!
//! A [`Message`] carries either plain text or cipher text, never both,
//! together with the keys, nonce, ephemeral key and signature needed to
//! open and check it. Messages are freestanding values: a
//! [`Principal`](crate::principal::Principal) operates on them by mutable
//! reference but never owns them.
//!
//! # Lifecycle
//!
//! ```text
//! compose ──> PlainMessage ──encrypt──> EncryptedMessage
//!                  ^                          │
//!                  └─────────decrypt──────────┘
//! ```
//!
//! Either state may be signed. Signing covers the sender key, the nonce,
//! the current body and the headers, but not the recipient.
//!
//! # Text form
//!
//! Messages travel as armored [`Block`]s. Protocol fields ride along as
//! reserved headers (`to`, `from`, `eph`, `nonce`, `sig`, `delphi/version`),
//! everything else is user metadata.

mod headers;
mod subject;

use std::fmt;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use rand_core::CryptoRngCore;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::armor::{ArmorError, Block};
use crate::capability::{verify_ed25519, Decrypter, Encrypter, Signer};
use crate::crypto::{Key, KeyError, Nonce, SubKey};

pub use headers::{HeaderError, Headers, KEYSPACE, RESERVED_HEADERS, VERSION_HEADER};
pub use subject::{Subject, UnknownSubject};

use headers::{EPH_HEADER, FROM_HEADER, NONCE_HEADER, SIG_HEADER, TO_HEADER};

/// Value of the version header written on every armored message
pub const PROTOCOL_VERSION: &str = "v1";
/// Size of a message digest in bytes
pub const DIGEST_SIZE: usize = 32;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, thiserror::Error)]
pub enum MessageError {
    #[error("invalid message: exactly one of plain text or cipher text must be set")]
    InvalidMessage,
    #[error("invalid message: nonce is not set")]
    ZeroNonce,
    #[error("invalid message: sender key is not set")]
    ZeroSender,
    #[error("message is already encrypted")]
    AlreadyEncrypted,
    #[error("only plain messages can be encrypted, not {0}")]
    NotEncryptable(Subject),
    #[error("message has no plain text to encrypt")]
    NothingToEncrypt,
    #[error("message is not encrypted")]
    NotEncrypted,
    #[error("message has no ephemeral key")]
    NoEphemeralKey,
    #[error("bad key: {0}")]
    BadKey(String),
    #[error("invalid {field} header: {reason}")]
    InvalidHeaderValue { field: &'static str, reason: String },
    #[error("failed to read randomness: {0}")]
    Randomness(#[source] KeyError),
    #[error("encryption failed: {0}")]
    EncryptionFailed(#[source] BoxError),
    #[error("decryption failed: {0}")]
    DecryptionFailed(#[source] BoxError),
    #[error("signing failed: {0}")]
    SignFailed(#[source] BoxError),
    #[error(transparent)]
    UnknownSubject(#[from] UnknownSubject),
    #[error("unsupported protocol version {0:?}")]
    UnsupportedVersion(String),
    #[error("header error: {0}")]
    Header(#[from] HeaderError),
    #[error("armor error: {0}")]
    Armor(#[from] ArmorError),
    #[error("binary codec error: {0}")]
    Codec(#[from] bincode::Error),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub subject: Subject,
    pub recipient_key: Key,
    pub sender_key: Key,
    /// User metadata, bound into both the AEAD tag and the digest.
    /// Treat as frozen once a nonce has been assigned.
    pub headers: Headers,
    pub ephemeral_key: Option<SubKey>,
    pub nonce: Nonce,
    pub cipher_text: Vec<u8>,
    pub plain_text: Vec<u8>,
    pub signature: Vec<u8>,
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_pem())
    }
}

impl Message {
    /// A message with the given subject and plain text and no nonce yet
    pub fn new(subject: Subject, plain_text: impl Into<Vec<u8>>) -> Self {
        Message {
            subject,
            plain_text: plain_text.into(),
            ..Default::default()
        }
    }

    /// Like [`Message::new`], but assigns a nonce right away
    pub fn compose<R: CryptoRngCore + ?Sized>(
        rng: &mut R,
        subject: Subject,
        plain_text: impl Into<Vec<u8>>,
    ) -> Result<Self, MessageError> {
        let mut message = Message::new(subject, plain_text);
        message.ensure_nonce(rng)?;
        Ok(message)
    }

    /// Return the current nonce, drawing one first if none is set.
    ///
    /// A non-zero nonce is never replaced.
    pub fn ensure_nonce<R: CryptoRngCore + ?Sized>(
        &mut self,
        rng: &mut R,
    ) -> Result<Nonce, MessageError> {
        if self.nonce.is_zero() {
            self.nonce = Nonce::generate(rng).map_err(MessageError::Randomness)?;
        }
        Ok(self.nonce)
    }

    pub fn is_plain(&self) -> bool {
        !self.plain_text.is_empty() && self.cipher_text.is_empty()
    }

    pub fn is_encrypted(&self) -> bool {
        !self.cipher_text.is_empty() && self.plain_text.is_empty()
    }

    /// Exactly one of plain text and cipher text is set
    pub fn is_valid(&self) -> bool {
        self.is_plain() || self.is_encrypted()
    }

    /// The bytes that travel as the block body: cipher text when encrypted,
    /// plain text otherwise
    pub fn body(&self) -> &[u8] {
        if self.is_encrypted() {
            &self.cipher_text
        } else {
            &self.plain_text
        }
    }

    /// SHA-256 over `sender || nonce || body || key value ...` with headers
    /// in lexical order. The recipient is not part of the digest.
    pub fn digest(&self) -> Result<[u8; DIGEST_SIZE], MessageError> {
        if !self.is_valid() {
            return Err(MessageError::InvalidMessage);
        }
        if self.nonce.is_zero() {
            return Err(MessageError::ZeroNonce);
        }
        if self.sender_key.is_zero() {
            return Err(MessageError::ZeroSender);
        }

        let body = self.body();
        let mut seed = Vec::with_capacity(self.sender_key.to_bytes().len() + body.len() + 64);
        seed.extend_from_slice(&self.sender_key.to_bytes());
        seed.extend_from_slice(self.nonce.as_bytes());
        seed.extend_from_slice(body);
        for (key, value) in self.headers.iter() {
            seed.extend_from_slice(key.as_bytes());
            seed.extend_from_slice(value.as_bytes());
        }
        tracing::trace!(seed_len = seed.len(), headers = self.headers.len(), "message digest");

        let mut digest = [0u8; DIGEST_SIZE];
        digest.copy_from_slice(&Sha256::digest(&seed));
        Ok(digest)
    }

    /// Sign the message digest, assigning a nonce first if needed.
    ///
    /// The sender key must already be set; see
    /// [`Principal::sign_message`](crate::principal::Principal::sign_message)
    /// for the variant that fills it in.
    pub fn sign<R, S>(&mut self, rng: &mut R, signer: &S) -> Result<(), MessageError>
    where
        R: CryptoRngCore + ?Sized,
        S: Signer,
    {
        self.ensure_nonce(rng)
            .map_err(|e| MessageError::SignFailed(Box::new(e)))?;
        let digest = self.digest()?;
        let signature = signer
            .sign(rng, &digest)
            .map_err(|e| MessageError::SignFailed(Box::new(e)))?;
        self.signature = signature;
        tracing::debug!(subject = %self.subject, "signed message");
        Ok(())
    }

    /// Check the signature against the sender's signing key.
    ///
    /// A message that cannot be digested is an error. A missing or
    /// malformed signature, or one that does not match, is `Ok(false)`.
    pub fn verify(&self) -> Result<bool, MessageError> {
        let digest = self.digest()?;
        if self.signature.is_empty() {
            tracing::debug!(subject = %self.subject, "message carries no signature");
            return Ok(false);
        }
        let valid = verify_ed25519(&self.sender_key, &digest, &self.signature);
        tracing::debug!(subject = %self.subject, valid, "verified message");
        Ok(valid)
    }

    /// Encrypt in place to `recipient`, with `encrypter` as the sender
    pub fn encrypt<R, E>(
        &mut self,
        rng: &mut R,
        encrypter: &E,
        recipient: &Key,
    ) -> Result<(), MessageError>
    where
        R: CryptoRngCore + ?Sized,
        E: Encrypter,
    {
        encrypter.encrypt(rng, self, recipient)
    }

    /// Decrypt in place with the recipient's `decrypter`
    pub fn decrypt<D: Decrypter>(&mut self, decrypter: &D) -> Result<(), MessageError> {
        decrypter.decrypt(self)
    }

    /// Armor this message. Protocol fields that are unset are left out.
    pub fn to_block(&self) -> Block {
        let mut block = Block::new(self.subject.label(), self.body());
        for (key, value) in self.headers.iter() {
            block.set_header_unchecked(key, value.to_string());
        }
        block.set_header_unchecked(VERSION_HEADER, PROTOCOL_VERSION.to_string());
        if !self.recipient_key.is_zero() {
            block.set_header_unchecked(TO_HEADER, self.recipient_key.to_base64());
        }
        if !self.sender_key.is_zero() {
            block.set_header_unchecked(FROM_HEADER, self.sender_key.to_base64());
        }
        if let Some(ephemeral) = &self.ephemeral_key {
            block.set_header_unchecked(EPH_HEADER, BASE64.encode(ephemeral.as_bytes()));
        }
        if !self.nonce.is_zero() {
            block.set_header_unchecked(NONCE_HEADER, BASE64.encode(self.nonce.as_bytes()));
        }
        if !self.signature.is_empty() {
            block.set_header_unchecked(SIG_HEADER, BASE64.encode(&self.signature));
        }
        block
    }

    /// Rebuild a message from an armored block.
    ///
    /// Reserved headers are moved back into their fields; the rest become
    /// user headers. The body is cipher text for encrypted blocks and plain
    /// text for every other subject.
    pub fn from_block(block: &Block) -> Result<Self, MessageError> {
        let subject: Subject = block.label().parse()?;
        let mut message = Message {
            subject,
            ..Default::default()
        };

        for (key, value) in block.headers() {
            match key.as_str() {
                VERSION_HEADER => {
                    if value != PROTOCOL_VERSION {
                        return Err(MessageError::UnsupportedVersion(value.clone()));
                    }
                }
                TO_HEADER => {
                    message.recipient_key = Key::from_base64(value)
                        .map_err(|e| MessageError::BadKey(format!("recipient: {}", e)))?;
                }
                FROM_HEADER => {
                    message.sender_key = Key::from_base64(value)
                        .map_err(|e| MessageError::BadKey(format!("sender: {}", e)))?;
                }
                EPH_HEADER => {
                    let bytes = decode_field(EPH_HEADER, value)?;
                    let ephemeral = SubKey::from_slice(&bytes)
                        .map_err(|e| MessageError::BadKey(format!("ephemeral: {}", e)))?;
                    message.ephemeral_key = Some(ephemeral);
                }
                NONCE_HEADER => {
                    let bytes = decode_field(NONCE_HEADER, value)?;
                    message.nonce =
                        Nonce::from_slice(&bytes).map_err(|e| MessageError::InvalidHeaderValue {
                            field: NONCE_HEADER,
                            reason: e.to_string(),
                        })?;
                }
                SIG_HEADER => {
                    message.signature = decode_field(SIG_HEADER, value)?;
                }
                _ => {
                    message.headers.insert(key.as_str(), value.as_str())?;
                }
            }
        }

        if subject == Subject::EncryptedMessage {
            message.cipher_text = block.body().to_vec();
        } else {
            message.plain_text = block.body().to_vec();
        }
        Ok(message)
    }

    pub fn to_pem(&self) -> String {
        self.to_block().encode()
    }

    /// Parse the first armored block in `text`
    pub fn from_pem(text: &str) -> Result<Self, MessageError> {
        Self::from_block(&Block::decode(text)?)
    }

    /// Compact binary form
    pub fn to_bytes(&self) -> Result<Vec<u8>, MessageError> {
        Ok(bincode::serialize(self)?)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, MessageError> {
        Ok(bincode::deserialize(bytes)?)
    }
}

fn decode_field(field: &'static str, value: &str) -> Result<Vec<u8>, MessageError> {
    BASE64
        .decode(value)
        .map_err(|e| MessageError::InvalidHeaderValue {
            field,
            reason: e.to_string(),
        })
}
