use clap::Args;
use common::message::{Message, MessageError};

/// Verify the signature on the first message on stdin
#[derive(Args, Debug, Clone)]
pub struct Verify;

#[derive(Debug, thiserror::Error)]
pub enum VerifyError {
    #[error("no message on stdin")]
    NoMessage,
    #[error("no valid signature")]
    NoValidSignature,
    #[error("could not verify: {0}")]
    Message(#[from] MessageError),
}

#[async_trait::async_trait]
impl crate::op::Op for Verify {
    type Error = VerifyError;
    type Output = String;

    async fn execute(&self, ctx: &crate::op::OpContext) -> Result<Self::Output, Self::Error> {
        let block = ctx.bag.first_message().ok_or(VerifyError::NoMessage)?;
        let message = Message::from_block(block)?;

        if !message.verify()? {
            return Err(VerifyError::NoValidSignature);
        }
        tracing::info!(from = %message.sender_key.nickname(), "signature verified");
        Ok("ok".to_string())
    }
}
