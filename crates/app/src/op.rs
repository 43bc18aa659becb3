use std::error::Error;
use std::path::PathBuf;

use common::message::Subject;
use common::principal::Principal;

use crate::bag::{BagError, PemBag};
use crate::state::{AppState, StateError};

#[derive(Debug, Clone, Default)]
pub struct OpContext {
    /// Optional custom config path (defaults to ~/.delphi)
    pub config_path: Option<PathBuf>,
    /// Armored blocks staged from stdin
    pub bag: PemBag,
    /// Whatever part of stdin was not armored
    pub raw_input: String,
}

impl OpContext {
    /// Create context from an optional config path and the text read from stdin
    pub fn new(config_path: Option<PathBuf>, input: &str) -> Result<Self, BagError> {
        let (bag, raw_input) = PemBag::parse(input)?;
        tracing::debug!(blocks = bag.len(), raw = raw_input.len(), "staged input");
        Ok(Self {
            config_path,
            bag,
            raw_input,
        })
    }

    /// The acting principal: a private key piped in on stdin wins over the
    /// one in the state directory.
    pub fn principal(&self) -> Result<Principal, StateError> {
        if let Some(block) = self.bag.first(Subject::PrivateKey) {
            tracing::debug!("using private key from input");
            return Principal::from_block(block).map_err(|e| StateError::InvalidKey(e.to_string()));
        }
        AppState::load(self.config_path.clone())?.load_key()
    }
}

#[async_trait::async_trait]
pub trait Op: Send + Sync {
    type Error: Error + Send + Sync + 'static;
    type Output;

    async fn execute(&self, ctx: &OpContext) -> Result<Self::Output, Self::Error>;
}

#[macro_export]
macro_rules! command_enum {
    ($(($variant:ident, $type:ty)),* $(,)?) => {
        #[derive(Subcommand, Debug, Clone)]
        pub enum Command {
            $($variant($type),)*
        }

        #[derive(Debug)]
        pub enum OpOutput {
            $($variant(<$type as $crate::op::Op>::Output),)*
        }

        #[derive(Debug, thiserror::Error)]
        pub enum OpError {
            $(
                #[error(transparent)]
                $variant(<$type as $crate::op::Op>::Error),
            )*
        }

        #[async_trait::async_trait]
        impl $crate::op::Op for Command {
            type Output = OpOutput;
            type Error = OpError;

            async fn execute(&self, ctx: &$crate::op::OpContext) -> Result<Self::Output, Self::Error> {
                match self {
                    $(
                        Command::$variant(op) => {
                            op.execute(ctx).await
                                .map(OpOutput::$variant)
                                .map_err(OpError::$variant)
                        },
                    )*
                }
            }
        }

        impl std::fmt::Display for OpOutput {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                match self {
                    $(
                        OpOutput::$variant(output) => write!(f, "{}", output),
                    )*
                }
            }
        }
    };
}
