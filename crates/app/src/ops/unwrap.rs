use clap::Args;

/// Print each staged block's body under its subject
#[derive(Args, Debug, Clone)]
pub struct Unwrap;

#[derive(Debug, thiserror::Error)]
pub enum UnwrapError {
    #[error("no armored blocks on stdin")]
    NoBlocks,
}

#[async_trait::async_trait]
impl crate::op::Op for Unwrap {
    type Error = UnwrapError;
    type Output = String;

    async fn execute(&self, ctx: &crate::op::OpContext) -> Result<Self::Output, Self::Error> {
        if ctx.bag.is_empty() {
            return Err(UnwrapError::NoBlocks);
        }

        let mut lines = Vec::new();
        let mut current = None;
        for (subject, block) in ctx.bag.iter() {
            if current != Some(subject) {
                lines.push(subject.label().to_string());
                current = Some(subject);
            }
            lines.push(String::from_utf8_lossy(block.body()).into_owned());
        }
        Ok(lines.join("\n"))
    }
}
