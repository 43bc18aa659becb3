use clap::Args;

use crate::state::StateError;

/// Print our public key as an armored block
#[derive(Args, Debug, Clone)]
pub struct Pub {
    /// Print the key as hex instead of an armored block
    #[arg(long)]
    pub hex: bool,
}

#[derive(Debug, thiserror::Error)]
pub enum PubError {
    #[error("could not load principal: {0}")]
    Principal(#[from] StateError),
}

#[async_trait::async_trait]
impl crate::op::Op for Pub {
    type Error = PubError;
    type Output = String;

    async fn execute(&self, ctx: &crate::op::OpContext) -> Result<Self::Output, Self::Error> {
        let principal = ctx.principal()?;
        if self.hex {
            return Ok(principal.public_key().to_hex());
        }
        Ok(principal.public_block().encode())
    }
}
