use clap::Args;
use common::armor::Block;
use common::message::{Message, Subject};
use common::principal::{Principal, NICK_HEADER};
use serde::Serialize;

/// List the blocks staged from stdin
#[derive(Args, Debug, Clone)]
pub struct Enumerate {
    /// Print as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, thiserror::Error)]
pub enum EnumerateError {
    #[error("could not render JSON: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Serialize)]
pub struct Entry {
    pub subject: String,
    pub nick: Option<String>,
    pub bytes: usize,
    pub headers: usize,
}

impl Entry {
    fn new(subject: Subject, block: &Block) -> Self {
        Entry {
            subject: subject.label().to_string(),
            nick: describe(subject, block),
            bytes: block.body().len(),
            headers: block.headers().len(),
        }
    }
}

/// Best-effort nickname for whoever a block belongs to
fn describe(subject: Subject, block: &Block) -> Option<String> {
    match subject {
        Subject::PublicKey => block
            .header(NICK_HEADER)
            .map(str::to_string)
            .or_else(|| Principal::public_key_from_block(block).ok().map(|k| k.nickname())),
        Subject::PrivateKey => Principal::from_block(block).ok().map(|p| p.nickname()),
        _ => Message::from_block(block)
            .ok()
            .filter(|m| !m.sender_key.is_zero())
            .map(|m| m.sender_key.nickname()),
    }
}

#[async_trait::async_trait]
impl crate::op::Op for Enumerate {
    type Error = EnumerateError;
    type Output = String;

    async fn execute(&self, ctx: &crate::op::OpContext) -> Result<Self::Output, Self::Error> {
        let entries: Vec<Entry> = ctx
            .bag
            .iter()
            .map(|(subject, block)| Entry::new(subject, block))
            .collect();

        if self.json {
            return Ok(serde_json::to_string_pretty(&entries)?);
        }

        let lines: Vec<String> = entries
            .iter()
            .map(|entry| {
                format!(
                    "{}\t{}\t{} bytes\t{} headers",
                    entry.subject,
                    entry.nick.as_deref().unwrap_or("-"),
                    entry.bytes,
                    entry.headers
                )
            })
            .collect();
        Ok(lines.join("\n"))
    }
}
