//! Staging area for armored blocks read from stdin.
//!
//! Commands are meant to be piped together, so the input to one command is
//! often a mix of blocks: a message, a recipient's public key, maybe a
//! private key. The bag sorts them by subject, preserving arrival order
//! within each subject.

use std::collections::BTreeMap;

use common::armor::{decode_all, ArmorError, Block};
use common::message::Subject;

#[derive(Debug, thiserror::Error)]
pub enum BagError {
    #[error("could not read armored input: {0}")]
    Armor(#[from] ArmorError),
    #[error("unknown block {0:?} in input")]
    UnknownBlock(String),
}

#[derive(Debug, Clone, Default)]
pub struct PemBag {
    blocks: BTreeMap<Subject, Vec<Block>>,
}

impl PemBag {
    /// Stage every block in `input`. Returns the bag and all text found
    /// before, between and after the blocks, in order.
    pub fn parse(input: &str) -> Result<(Self, String), BagError> {
        let mut bag = PemBag::default();
        let (blocks, raw) = decode_all(input)?;
        for block in blocks {
            bag.push(block)?;
        }
        Ok((bag, raw))
    }

    pub fn push(&mut self, block: Block) -> Result<(), BagError> {
        let subject: Subject = block
            .label()
            .parse()
            .map_err(|_| BagError::UnknownBlock(block.label().to_string()))?;
        self.blocks.entry(subject).or_default().push(block);
        Ok(())
    }

    pub fn get(&self, subject: Subject) -> &[Block] {
        self.blocks.get(&subject).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn first(&self, subject: Subject) -> Option<&Block> {
        self.get(subject).first()
    }

    /// First staged block carrying a message of any kind
    pub fn first_message(&self) -> Option<&Block> {
        [
            Subject::EncryptedMessage,
            Subject::PlainMessage,
            Subject::Assertion,
        ]
        .into_iter()
        .find_map(|subject| self.first(subject))
    }

    /// Every staged block, grouped by subject
    pub fn iter(&self) -> impl Iterator<Item = (Subject, &Block)> {
        self.blocks
            .iter()
            .flat_map(|(subject, blocks)| blocks.iter().map(move |block| (*subject, block)))
    }

    pub fn len(&self) -> usize {
        self.blocks.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
