use clap::Args;

use crate::state::StateError;

/// Print our nickname
#[derive(Args, Debug, Clone)]
pub struct Nick;

#[derive(Debug, thiserror::Error)]
pub enum NickError {
    #[error("could not load principal: {0}")]
    Principal(#[from] StateError),
}

#[async_trait::async_trait]
impl crate::op::Op for Nick {
    type Error = NickError;
    type Output = String;

    async fn execute(&self, ctx: &crate::op::OpContext) -> Result<Self::Output, Self::Error> {
        Ok(ctx.principal()?.nickname())
    }
}
