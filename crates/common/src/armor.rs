//! PEM-style text armor
//!
//! A [`Block`] is a labeled chunk of bytes with optional `key: value`
//! headers, written as a PEM block:
//!
//! ```text
//! -----BEGIN DELPHI PLAIN MESSAGE-----
//! foo: bar
//! nonce: AAECAwQFBgcICQoL
//!
//! aGVsbG8gd29ybGQ=
//! -----END DELPHI PLAIN MESSAGE-----
//! ```
//!
//! Encoding and parsing of a single block is done by the `pem` crate. This
//! module adds header validation, deterministic header order, and locating
//! blocks inside larger text.

use std::collections::BTreeMap;
use std::fmt;

use pem::{EncodeConfig, LineEnding, Pem};

const BEGIN: &str = "-----BEGIN ";
const END: &str = "-----END ";
const DASHES: &str = "-----";

/// Errors that can occur while reading or building armored text
#[derive(Debug, thiserror::Error)]
pub enum ArmorError {
    #[error("no armored block found")]
    NoBlock,
    #[error("missing END line for {0:?}")]
    MissingEnd(String),
    #[error("invalid header {0:?}")]
    InvalidHeader(String),
    #[error("pem error: {0}")]
    Pem(#[from] pem::PemError),
}

/// A labeled, optionally headered, binary body
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Block {
    label: String,
    headers: BTreeMap<String, String>,
    body: Vec<u8>,
}

impl Block {
    pub fn new(label: impl Into<String>, body: impl Into<Vec<u8>>) -> Self {
        Block {
            label: label.into(),
            headers: BTreeMap::new(),
            body: body.into(),
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }

    pub fn into_body(self) -> Vec<u8> {
        self.body
    }

    pub fn headers(&self) -> &BTreeMap<String, String> {
        &self.headers
    }

    pub fn header(&self, key: &str) -> Option<&str> {
        self.headers.get(key).map(String::as_str)
    }

    /// Add or replace a header.
    ///
    /// See [`valid_header_key`] and [`valid_header_value`] for what is
    /// accepted.
    pub fn insert_header(
        &mut self,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Result<(), ArmorError> {
        let key = key.into();
        let value = value.into();
        if !valid_header_key(&key) {
            return Err(ArmorError::InvalidHeader(key));
        }
        if !valid_header_value(&value) {
            return Err(ArmorError::InvalidHeader(value));
        }
        self.headers.insert(key, value);
        Ok(())
    }

    /// For callers that already hold validated keys and values
    pub(crate) fn set_header_unchecked(&mut self, key: &str, value: String) {
        debug_assert!(valid_header_key(key) && valid_header_value(&value));
        self.headers.insert(key.to_string(), value);
    }

    pub fn remove_header(&mut self, key: &str) -> Option<String> {
        self.headers.remove(key)
    }

    fn to_pem(&self) -> Pem {
        let mut pem = Pem::new(self.label.clone(), self.body.clone());
        for (key, value) in &self.headers {
            // validated on the way in, so this cannot be refused
            let _ = pem.headers_mut().add(key, value);
        }
        pem
    }

    fn from_pem(pem: Pem) -> Self {
        let headers = pem
            .headers()
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        Block {
            label: pem.tag().to_string(),
            headers,
            body: pem.into_contents(),
        }
    }

    /// Render this block as armored text with `\n` line endings, headers in
    /// lexical key order.
    pub fn encode(&self) -> String {
        let config = EncodeConfig::new().set_line_ending(LineEnding::LF);
        pem::encode_config(&self.to_pem(), config)
    }

    /// Parse exactly the first block found in `input`
    pub fn decode(input: &str) -> Result<Self, ArmorError> {
        match decode_next(input)? {
            Some((_, block, _)) => Ok(block),
            None => Err(ArmorError::NoBlock),
        }
    }
}

impl fmt::Display for Block {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encode())
    }
}

/// Keys are non-empty, carry no surrounding whitespace, and contain no `:`,
/// line breaks or `-----`.
pub(crate) fn valid_header_key(key: &str) -> bool {
    !key.is_empty() && key.trim() == key && plain_header_text(key)
}

/// Values may be empty but otherwise follow the same rules as keys.
pub(crate) fn valid_header_value(value: &str) -> bool {
    value.trim() == value && plain_header_text(value)
}

fn plain_header_text(text: &str) -> bool {
    !text.contains(':') && !text.contains('\n') && !text.contains('\r') && !text.contains(DASHES)
}

/// Lines of `input` together with their byte offset, line endings kept
fn lines_with_offsets(input: &str) -> impl Iterator<Item = (usize, &str)> {
    input.split_inclusive('\n').scan(0, |offset, line| {
        let at = *offset;
        *offset += line.len();
        Some((at, line))
    })
}

fn begin_label(line: &str) -> Option<&str> {
    line.trim_end()
        .strip_prefix(BEGIN)?
        .strip_suffix(DASHES)
        .filter(|label| !label.is_empty())
}

/// Find and parse the next block in `input`.
///
/// BEGIN and END markers are only recognized at the start of a line.
/// Returns the text before the block, the block, and the text after its END
/// line, or `None` when `input` holds no further BEGIN line.
pub fn decode_next(input: &str) -> Result<Option<(&str, Block, &str)>, ArmorError> {
    let mut lines = lines_with_offsets(input);
    let Some((start, label)) = lines
        .by_ref()
        .find_map(|(at, line)| begin_label(line).map(|label| (at, label)))
    else {
        return Ok(None);
    };

    let end_marker = format!("{}{}{}", END, label, DASHES);
    let (end_at, end_line) = lines
        .find(|(_, line)| line.trim_end() == end_marker)
        .ok_or_else(|| ArmorError::MissingEnd(label.to_string()))?;
    let end = end_at + end_line.len();

    let pem = pem::parse(&input[start..end])?;
    Ok(Some((&input[..start], Block::from_pem(pem), &input[end..])))
}

/// Parse every block in `input`, returning them in order together with all
/// text found outside of them.
pub fn decode_all(input: &str) -> Result<(Vec<Block>, String), ArmorError> {
    let mut blocks = Vec::new();
    let mut outside = String::new();
    let mut rest = input;
    while let Some((before, block, remaining)) = decode_next(rest)? {
        outside.push_str(before);
        blocks.push(block);
        rest = remaining;
    }
    outside.push_str(rest);
    Ok((blocks, outside))
}
