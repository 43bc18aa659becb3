use clap::Args;
use common::crypto::{Key, KeyError};
use common::message::{Message, MessageError, Subject};
use common::prelude::Encrypter;
use common::principal::{Principal, PrincipalError};
use rand::rngs::OsRng;

use crate::ops::wrap::{wrap_raw, WrapError};
use crate::state::StateError;

/// Encrypt a plain message to a recipient.
///
/// The message is the first plain message block on stdin, or the raw stdin
/// text if there is none. The recipient is `--to`, or the first public key
/// block on stdin.
#[derive(Args, Debug, Clone)]
pub struct Encrypt {
    /// Recipient public key as hex
    #[arg(long)]
    pub to: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum EncryptError {
    #[error("no recipient: pass --to or pipe in a public key block")]
    NoRecipient,
    #[error("invalid recipient key: {0}")]
    RecipientKey(#[from] KeyError),
    #[error("invalid recipient block: {0}")]
    RecipientBlock(#[from] PrincipalError),
    #[error("could not load principal: {0}")]
    Principal(#[from] StateError),
    #[error(transparent)]
    Wrap(#[from] WrapError),
    #[error("encryption failed: {0}")]
    Message(#[from] MessageError),
}

impl Encrypt {
    fn recipient(&self, ctx: &crate::op::OpContext) -> Result<Key, EncryptError> {
        if let Some(hex) = &self.to {
            return Ok(Key::from_hex(hex)?);
        }
        let block = ctx
            .bag
            .first(Subject::PublicKey)
            .ok_or(EncryptError::NoRecipient)?;
        Ok(Principal::public_key_from_block(block)?)
    }
}

#[async_trait::async_trait]
impl crate::op::Op for Encrypt {
    type Error = EncryptError;
    type Output = String;

    async fn execute(&self, ctx: &crate::op::OpContext) -> Result<Self::Output, Self::Error> {
        let principal = ctx.principal()?;
        let recipient = self.recipient(ctx)?;

        let mut message = match ctx.bag.first(Subject::PlainMessage) {
            Some(block) => Message::from_block(block)?,
            None => wrap_raw(&ctx.raw_input, &[], principal.public_key())?,
        };

        principal.encrypt(&mut OsRng, &mut message, &recipient)?;
        tracing::info!(to = %recipient.nickname(), "encrypted message");
        Ok(message.to_pem())
    }
}
