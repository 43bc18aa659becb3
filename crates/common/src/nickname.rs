//! Deterministic display names for public keys.
//!
//! A nickname is a lossy `adjective-noun` label picked from the SHA-256 of
//! the key bytes. It is for humans reading terminal output, never for
//! identifying a key.

use sha2::{Digest, Sha256};

const ADJECTIVES: [&str; 64] = [
    "amber", "ancient", "autumn", "billowing", "bitter", "black", "blue", "bold", "broad", "broken",
    "calm", "cold", "cool", "crimson", "curly", "damp", "dark", "dawn", "delicate", "divine", "dry",
    "empty", "falling", "fancy", "flat", "floral", "fragrant", "frosty", "gentle", "green",
    "hidden", "holy", "icy", "jolly", "late", "lingering", "little", "lively", "long", "lucky",
    "misty", "morning", "muddy", "mute", "nameless", "noisy", "odd", "old", "orange", "patient",
    "plain", "polished", "proud", "purple", "quiet", "rapid", "raspy", "red", "restless", "rough",
    "round", "royal", "shiny", "silent",
];

const NOUNS: [&str; 64] = [
    "art", "band", "bar", "base", "bird", "block", "boat", "bonus", "bread", "breeze", "brook",
    "bush", "butterfly", "cake", "cell", "cherry", "cloud", "credit", "darkness", "dawn", "dew",
    "disk", "dream", "dust", "feather", "field", "fire", "firefly", "flower", "fog", "forest",
    "frog", "frost", "glade", "glitter", "grass", "hall", "hat", "haze", "heart", "hill", "king",
    "lab", "lake", "leaf", "limit", "math", "meadow", "mode", "moon", "morning", "mountain",
    "mouse", "mud", "night", "paper", "pine", "poetry", "pond", "queen", "rain", "recipe",
    "resonance", "river",
];

/// Derive the nickname for the given public key bytes
pub fn nickname(public_key: &[u8]) -> String {
    let digest = Sha256::digest(public_key);
    let adjective = ADJECTIVES[usize::from(digest[0]) % ADJECTIVES.len()];
    let noun = NOUNS[usize::from(digest[1]) % NOUNS.len()];
    format!("{}-{}", adjective, noun)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_nickname_is_stable() {
        let key = [42u8; 64];
        assert_eq!(nickname(&key), nickname(&key));
        assert!(nickname(&key).contains('-'));
    }

    #[test]
    fn test_nickname_words_come_from_lists() {
        let nick = nickname(b"some public key");
        let (adjective, noun) = nick.split_once('-').unwrap();
        assert!(ADJECTIVES.contains(&adjective));
        assert!(NOUNS.contains(&noun));
    }
}
