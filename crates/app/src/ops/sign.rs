use clap::Args;
use common::message::{Message, MessageError};
use rand::rngs::OsRng;

use crate::state::StateError;

/// Sign the first message on stdin as ourselves
#[derive(Args, Debug, Clone)]
pub struct Sign;

#[derive(Debug, thiserror::Error)]
pub enum SignError {
    #[error("no message on stdin")]
    NoMessage,
    #[error("could not load principal: {0}")]
    Principal(#[from] StateError),
    #[error("signing failed: {0}")]
    Message(#[from] MessageError),
}

#[async_trait::async_trait]
impl crate::op::Op for Sign {
    type Error = SignError;
    type Output = String;

    async fn execute(&self, ctx: &crate::op::OpContext) -> Result<Self::Output, Self::Error> {
        let block = ctx.bag.first_message().ok_or(SignError::NoMessage)?;
        let principal = ctx.principal()?;

        let mut message = Message::from_block(block)?;
        principal.sign_message(&mut OsRng, &mut message)?;
        Ok(message.to_pem())
    }
}
