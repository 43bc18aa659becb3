use clap::Args;

use crate::state::{AppConfig, AppState};

#[derive(Args, Debug, Clone)]
pub struct Init {
    /// Default log level written to the config file
    #[arg(long, default_value = "warn")]
    pub default_log_level: String,
}

#[derive(Debug, thiserror::Error)]
pub enum InitError {
    #[error("init failed: {0}")]
    StateFailed(#[from] crate::state::StateError),
}

#[async_trait::async_trait]
impl crate::op::Op for Init {
    type Error = InitError;
    type Output = String;

    async fn execute(&self, ctx: &crate::op::OpContext) -> Result<Self::Output, Self::Error> {
        let config = AppConfig {
            log_level: self.default_log_level.clone(),
        };

        let state = AppState::init(ctx.config_path.clone(), Some(config))?;
        let principal = state.load_key()?;

        let output = format!(
            "Initialized delphi directory at: {}\n\
             - Key: {}\n\
             - Config: {}\n\
             - Log level: {}\n\
             - Nickname: {}",
            state.delphi_dir.display(),
            state.key_path.display(),
            state.config_path.display(),
            state.config.log_level,
            principal.nickname()
        );

        Ok(output)
    }
}
