use clap::Args;
use common::message::{Message, MessageError, Subject};
use common::prelude::Decrypter;

use crate::state::StateError;

/// Decrypt the first encrypted message on stdin
#[derive(Args, Debug, Clone)]
pub struct Decrypt {
    /// Print only the recovered plain text
    #[arg(long)]
    pub raw: bool,
}

#[derive(Debug, thiserror::Error)]
pub enum DecryptError {
    #[error("no encrypted message on stdin")]
    NoMessage,
    #[error("could not load principal: {0}")]
    Principal(#[from] StateError),
    #[error("decryption failed: {0}")]
    Message(#[from] MessageError),
}

#[async_trait::async_trait]
impl crate::op::Op for Decrypt {
    type Error = DecryptError;
    type Output = String;

    async fn execute(&self, ctx: &crate::op::OpContext) -> Result<Self::Output, Self::Error> {
        let block = ctx
            .bag
            .first(Subject::EncryptedMessage)
            .ok_or(DecryptError::NoMessage)?;
        let principal = ctx.principal()?;

        let mut message = Message::from_block(block)?;
        if !message.recipient_key.is_zero() && !principal.is_identified_by(&message.recipient_key) {
            tracing::warn!(
                to = %message.recipient_key.nickname(),
                "message is addressed to someone else"
            );
        }
        principal.decrypt(&mut message)?;

        if self.raw {
            return Ok(String::from_utf8_lossy(&message.plain_text).into_owned());
        }
        Ok(message.to_pem())
    }
}
