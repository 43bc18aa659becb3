use clap::Args;
use common::message::MessageError;
use rand::rngs::OsRng;

use crate::state::StateError;

/// Print a self-signed assertion of identity
#[derive(Args, Debug, Clone)]
pub struct Assert;

#[derive(Debug, thiserror::Error)]
pub enum AssertError {
    #[error("could not load principal: {0}")]
    Principal(#[from] StateError),
    #[error("could not build assertion: {0}")]
    Message(#[from] MessageError),
}

#[async_trait::async_trait]
impl crate::op::Op for Assert {
    type Error = AssertError;
    type Output = String;

    async fn execute(&self, ctx: &crate::op::OpContext) -> Result<Self::Output, Self::Error> {
        let principal = ctx.principal()?;
        Ok(principal.assert(&mut OsRng)?.to_pem())
    }
}
