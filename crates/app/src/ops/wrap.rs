use clap::Args;
use common::message::{HeaderError, Message, MessageError, Subject};
use rand::rngs::OsRng;

use crate::state::StateError;

/// Wrap raw stdin text into a plain message from us
#[derive(Args, Debug, Clone)]
pub struct Wrap {
    /// Header to attach, as key=value (repeatable)
    #[arg(long = "header", short = 'H', value_parser = parse_header)]
    pub headers: Vec<(String, String)>,
}

pub(crate) fn parse_header(s: &str) -> Result<(String, String), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("invalid header {:?}: expected key=value", s))?;
    Ok((key.to_string(), value.to_string()))
}

#[derive(Debug, thiserror::Error)]
pub enum WrapError {
    #[error("nothing to wrap: stdin held no raw text")]
    NoInput,
    #[error("could not load principal: {0}")]
    Principal(#[from] StateError),
    #[error("invalid header: {0}")]
    Header(#[from] HeaderError),
    #[error("could not build message: {0}")]
    Message(#[from] MessageError),
}

/// Build a plain message from raw text, sent by `sender`
pub(crate) fn wrap_raw(
    raw: &str,
    headers: &[(String, String)],
    sender: &common::crypto::Key,
) -> Result<Message, WrapError> {
    if raw.is_empty() {
        return Err(WrapError::NoInput);
    }
    let mut message = Message::compose(&mut OsRng, Subject::PlainMessage, raw)?;
    message.sender_key = *sender;
    for (key, value) in headers {
        message.headers.insert(key.as_str(), value.as_str())?;
    }
    Ok(message)
}

#[async_trait::async_trait]
impl crate::op::Op for Wrap {
    type Error = WrapError;
    type Output = String;

    async fn execute(&self, ctx: &crate::op::OpContext) -> Result<Self::Output, Self::Error> {
        let principal = ctx.principal()?;
        let message = wrap_raw(&ctx.raw_input, &self.headers, principal.public_key())?;
        Ok(message.to_pem())
    }
}
