use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// What an armored block contains. The label doubles as the
/// BEGIN/END line of the block.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Subject {
    #[default]
    PlainMessage,
    EncryptedMessage,
    Assertion,
    PublicKey,
    PrivateKey,
}

#[derive(Debug, thiserror::Error)]
#[error("unknown subject {0:?}")]
pub struct UnknownSubject(pub String);

impl Subject {
    pub const ALL: [Subject; 5] = [
        Subject::PlainMessage,
        Subject::EncryptedMessage,
        Subject::Assertion,
        Subject::PublicKey,
        Subject::PrivateKey,
    ];

    pub const fn label(&self) -> &'static str {
        match self {
            Subject::PlainMessage => "DELPHI PLAIN MESSAGE",
            Subject::EncryptedMessage => "DELPHI ENCRYPTED MESSAGE",
            Subject::Assertion => "DELPHI ASSERTION",
            Subject::PublicKey => "DELPHI PUBLIC KEY",
            Subject::PrivateKey => "DELPHI PRIVATE KEY",
        }
    }

    /// Whether blocks with this subject carry a message (as opposed to key
    /// material)
    pub const fn is_message(&self) -> bool {
        matches!(
            self,
            Subject::PlainMessage | Subject::EncryptedMessage | Subject::Assertion
        )
    }
}

impl fmt::Display for Subject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Subject {
    type Err = UnknownSubject;

    /// Labels are matched case-insensitively
    fn from_str(label: &str) -> Result<Self, Self::Err> {
        let label = label.trim();
        Subject::ALL
            .into_iter()
            .find(|subject| subject.label().eq_ignore_ascii_case(label))
            .ok_or_else(|| UnknownSubject(label.to_string()))
    }
}
