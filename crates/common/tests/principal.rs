//! Integration tests for principal key material and its armored forms

mod common;

use ::common::armor::{decode_all, Block};
use ::common::crypto::{KeyChain, KEYCHAIN_SIZE};
use ::common::principal::{Principal, PrincipalError, NICK_HEADER};

#[test]
fn test_seeded_principal_is_128_bytes() {
    let principal = Principal::generate(&mut common::rng(42)).unwrap();
    let bytes = principal.to_bytes();
    assert_eq!(bytes.len(), KEYCHAIN_SIZE);
    assert!(!principal.key_chain().is_zero());

    let again = Principal::generate(&mut common::rng(42)).unwrap();
    assert_eq!(again.to_bytes(), bytes);

    let other = Principal::generate(&mut common::rng(43)).unwrap();
    assert_ne!(other.to_bytes(), bytes);
}

#[test]
fn test_other_lengths_rejected() {
    let principal = Principal::generate(&mut common::rng(44)).unwrap();
    let bytes = principal.to_bytes();

    for len in [0, 1, 64, 127, 129, 256] {
        let mut input = bytes.to_vec();
        input.resize(len, 0);
        assert!(
            matches!(Principal::from_bytes(&input), Err(PrincipalError::Key(_))),
            "length {} should be rejected",
            len
        );
    }
    assert_eq!(Principal::from_bytes(&bytes).unwrap(), principal);
}

#[test]
fn test_generation_needs_randomness() {
    assert!(Principal::generate(&mut common::FailingRng).is_err());
}

#[test]
fn test_zero_principal() {
    let principal = Principal::from(KeyChain::default());
    assert!(principal.key_chain().is_zero());
    assert!(principal.public_key().is_zero());
}

#[test]
fn test_key_file_round_trip() {
    let (alice, _) = common::alice_and_bob();
    let text = alice.to_pem();
    assert_eq!(Principal::from_pem(&text).unwrap(), alice);
    assert_eq!(Principal::from_pem(&text).unwrap().to_pem(), text);
}

#[test]
fn test_public_block_for_peers() {
    let (alice, bob) = common::alice_and_bob();
    let text = format!("{}{}", alice.public_block(), bob.public_block());

    let (blocks, rest) = decode_all(&text).unwrap();
    assert!(rest.is_empty());
    assert_eq!(blocks.len(), 2);

    let alice_key = Principal::public_key_from_block(&blocks[0]).unwrap();
    let bob_key = Principal::public_key_from_block(&blocks[1]).unwrap();
    assert_eq!(alice_key, *alice.public_key());
    assert_eq!(bob_key, *bob.public_key());
    assert_eq!(blocks[1].header(NICK_HEADER), Some(bob.nickname().as_str()));
    assert!(bob.is_identified_by(&bob_key));
    assert!(!bob.is_identified_by(&alice_key));
}

#[test]
fn test_wrong_block_kinds() {
    let (alice, _) = common::alice_and_bob();
    let message = Block::new("DELPHI PLAIN MESSAGE", b"x".to_vec());

    assert!(matches!(
        Principal::from_block(&message),
        Err(PrincipalError::WrongBlock { .. })
    ));
    assert!(matches!(
        Principal::public_key_from_block(&alice.to_block()),
        Err(PrincipalError::WrongBlock { .. })
    ));

    let short = Block::new("DELPHI PRIVATE KEY", vec![1; 100]);
    assert!(matches!(
        Principal::from_block(&short),
        Err(PrincipalError::Key(_))
    ));
}

#[test]
fn test_nickname_is_stable() {
    let (alice, bob) = common::alice_and_bob();
    assert_eq!(alice.nickname(), alice.public_key().nickname());
    assert_eq!(alice.nickname(), Principal::from_bytes(&alice.to_bytes()).unwrap().nickname());
    assert!(bob.nickname().contains('-'));
}
