/**
 * PEM-style text armor for keys and messages.
 */
pub mod armor;
/**
 * Small capability traits (sign, verify, encrypt,
 *  decrypt) that messages use to reach whoever
 *  holds the keys.
 */
pub mod capability;
/**
 * Cryptographic types and operations.
 *  - Key material layout and generation
 *  - Ephemeral X25519 + HKDF key agreement
 *  - ChaCha20-Poly1305 message sealing
 */
pub mod crypto;
/**
 * The message envelope: headers, subjects,
 *  digests, signatures and the armored form.
 */
pub mod message;
/**
 * Human-readable display names for public keys.
 */
pub mod nickname;
/**
 * Identities holding a full key chain.
 */
pub mod principal;
/**
 * Helper for setting build version information
 *  at compile time.
 */
pub mod version;

pub mod prelude {
    pub use crate::armor::{ArmorError, Block};
    pub use crate::capability::{Decrypter, Encrypter, Signer, Verifier};
    pub use crate::crypto::{Key, KeyChain, KeyError, Nonce, SubKey};
    pub use crate::message::{Headers, Message, MessageError, Subject};
    pub use crate::principal::{Principal, PrincipalError};
    pub use crate::version::BuildInfo;
}
