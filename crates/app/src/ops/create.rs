use clap::Args;
use common::principal::{Principal, PrincipalError};
use rand::rngs::OsRng;

/// Print a fresh private key without touching the state directory
#[derive(Args, Debug, Clone)]
pub struct Create;

#[derive(Debug, thiserror::Error)]
pub enum CreateError {
    #[error("could not generate key: {0}")]
    Generate(#[from] PrincipalError),
}

#[async_trait::async_trait]
impl crate::op::Op for Create {
    type Error = CreateError;
    type Output = String;

    async fn execute(&self, _ctx: &crate::op::OpContext) -> Result<Self::Output, Self::Error> {
        let principal = Principal::generate(&mut OsRng)?;
        Ok(principal.to_pem())
    }
}
