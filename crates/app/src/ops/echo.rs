use clap::Args;

/// Print the body of every staged block, or stdin as-is when it holds none
#[derive(Args, Debug, Clone)]
pub struct Echo;

#[derive(Debug, thiserror::Error)]
pub enum EchoError {
    #[error("Echo operation failed: {0}")]
    Failed(String),
}

#[async_trait::async_trait]
impl crate::op::Op for Echo {
    type Error = EchoError;
    type Output = String;

    async fn execute(&self, ctx: &crate::op::OpContext) -> Result<Self::Output, Self::Error> {
        if ctx.bag.is_empty() {
            return Ok(ctx.raw_input.clone());
        }
        let bodies: Vec<String> = ctx
            .bag
            .iter()
            .map(|(_, block)| String::from_utf8_lossy(block.body()).into_owned())
            .collect();
        Ok(bodies.join("\n"))
    }
}
