//! Shared test utilities for protocol integration tests
#![allow(dead_code)]

use ::common::message::{Message, Subject};
use ::common::principal::Principal;
use rand::rngs::StdRng;
use rand::{CryptoRng, RngCore, SeedableRng};

/// A deterministic, seeded randomness source
pub fn rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

/// Alice and Bob, generated from fixed seeds
pub fn alice_and_bob() -> (Principal, Principal) {
    let alice = Principal::generate(&mut rng(0xa11ce)).unwrap();
    let bob = Principal::generate(&mut rng(0xb0b)).unwrap();
    (alice, bob)
}

/// "hello world" with headers {foo: bar, bing: bat}
pub fn hello_world(rng: &mut StdRng) -> Message {
    let mut message = Message::compose(rng, Subject::PlainMessage, "hello world").unwrap();
    message.headers.insert("foo", "bar").unwrap();
    message.headers.insert("bing", "bat").unwrap();
    message
}

/// Route `tracing` output through the test harness. Safe to call from
/// every test.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// A randomness source that always fails
pub struct FailingRng;

impl RngCore for FailingRng {
    fn next_u32(&mut self) -> u32 {
        0
    }

    fn next_u64(&mut self) -> u64 {
        0
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        dest.fill(0)
    }

    fn try_fill_bytes(&mut self, _dest: &mut [u8]) -> Result<(), rand::Error> {
        Err(rand::Error::new("randomness source failed"))
    }
}

impl CryptoRng for FailingRng {}

/// A seeded source that fails once `budget` bytes have been handed out
pub struct ExhaustingRng {
    inner: StdRng,
    budget: usize,
}

impl ExhaustingRng {
    pub fn new(seed: u64, budget: usize) -> Self {
        ExhaustingRng {
            inner: rng(seed),
            budget,
        }
    }
}

impl RngCore for ExhaustingRng {
    fn next_u32(&mut self) -> u32 {
        self.inner.next_u32()
    }

    fn next_u64(&mut self) -> u64 {
        self.inner.next_u64()
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        self.inner.fill_bytes(dest)
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        if dest.len() > self.budget {
            return Err(rand::Error::new("randomness source exhausted"));
        }
        self.budget -= dest.len();
        self.inner.try_fill_bytes(dest)
    }
}

impl CryptoRng for ExhaustingRng {}
