use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::armor::{valid_header_key, valid_header_value};

/// Namespace prefix for protocol-owned header keys
pub const KEYSPACE: &str = "delphi";
/// Header carrying the protocol version of an armored message
pub const VERSION_HEADER: &str = "delphi/version";

pub(crate) const TO_HEADER: &str = "to";
pub(crate) const FROM_HEADER: &str = "from";
pub(crate) const EPH_HEADER: &str = "eph";
pub(crate) const NONCE_HEADER: &str = "nonce";
pub(crate) const SIG_HEADER: &str = "sig";

/// Header keys owned by the protocol. They are filled in from message
/// fields when armoring and can never be set as user headers.
pub const RESERVED_HEADERS: [&str; 6] = [
    TO_HEADER,
    FROM_HEADER,
    EPH_HEADER,
    NONCE_HEADER,
    SIG_HEADER,
    VERSION_HEADER,
];

#[derive(Debug, thiserror::Error)]
pub enum HeaderError {
    #[error("invalid header key {0:?}")]
    InvalidKey(String),
    #[error("invalid value for header {0:?}")]
    InvalidValue(String),
    #[error("header {0:?} is reserved by the protocol")]
    Reserved(String),
    #[error("malformed serialized headers")]
    Malformed,
}

/// User metadata carried by a message.
///
/// Iteration is always in lexical key order. The same ordering is used to
/// serialize headers as AEAD associated data and as digest input, so the
/// headers are covered by both the encryption tag and the signature.
///
/// Headers must not change between encrypt and decrypt, or between sign
/// and verify: a changed header reads as a corrupted message.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    try_from = "BTreeMap<String, String>",
    into = "BTreeMap<String, String>"
)]
pub struct Headers(BTreeMap<String, String>);

impl TryFrom<BTreeMap<String, String>> for Headers {
    type Error = HeaderError;
    fn try_from(map: BTreeMap<String, String>) -> Result<Self, Self::Error> {
        let mut headers = Headers::default();
        for (key, value) in map {
            headers.insert(key, value)?;
        }
        Ok(headers)
    }
}

impl From<Headers> for BTreeMap<String, String> {
    fn from(headers: Headers) -> Self {
        headers.0
    }
}

impl<'a> IntoIterator for &'a Headers {
    type Item = (&'a str, &'a str);
    type IntoIter = Box<dyn Iterator<Item = (&'a str, &'a str)> + 'a>;

    fn into_iter(self) -> Self::IntoIter {
        Box::new(self.iter())
    }
}

impl Headers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a header, returning the previous value if there was one
    pub fn insert(
        &mut self,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Result<Option<String>, HeaderError> {
        let key = key.into();
        let value = value.into();
        if !valid_header_key(&key) {
            return Err(HeaderError::InvalidKey(key));
        }
        if RESERVED_HEADERS.contains(&key.as_str()) {
            return Err(HeaderError::Reserved(key));
        }
        if !valid_header_value(&value) {
            return Err(HeaderError::InvalidValue(key));
        }
        Ok(self.0.insert(key, value))
    }

    /// Set `keyspace/key`
    pub fn set_in(
        &mut self,
        keyspace: &str,
        key: &str,
        value: impl Into<String>,
    ) -> Result<Option<String>, HeaderError> {
        self.insert(format!("{}/{}", keyspace, key), value)
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    /// Get `keyspace/key`
    pub fn get_in(&self, keyspace: &str, key: &str) -> Option<&str> {
        self.get(&format!("{}/{}", keyspace, key))
    }

    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.0.remove(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate in lexical key order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Serialize as `key\nvalue\nkey\nvalue...` in lexical key order.
    ///
    /// This is the exact associated data bound into every encrypted message.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut lines = Vec::with_capacity(2 * self.0.len());
        for (key, value) in self.iter() {
            lines.push(key);
            lines.push(value);
        }
        lines.join("\n").into_bytes()
    }

    /// Inverse of [`Headers::to_bytes`]
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, HeaderError> {
        let mut headers = Headers::default();
        if bytes.is_empty() {
            return Ok(headers);
        }
        let text = std::str::from_utf8(bytes).map_err(|_| HeaderError::Malformed)?;
        let lines: Vec<&str> = text.split('\n').collect();
        if lines.len() % 2 != 0 {
            return Err(HeaderError::Malformed);
        }
        for pair in lines.chunks(2) {
            headers.insert(pair[0], pair[1])?;
        }
        Ok(headers)
    }
}
