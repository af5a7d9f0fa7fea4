//! Type definitions used throughout the deploy script

use std::{path::PathBuf, process::ExitCode};

use alloy::primitives::Address;

use crate::errors::ScriptError;

/// A contract whose deployment transaction has been confirmed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeployedContract {
    /// The name of the deployed contract
    pub name: String,
    /// The address at which the contract was created
    pub address: Address,
}

/// The parameters of a single deployment run
#[derive(Debug, Clone)]
pub struct DeployArgs {
    /// The name of the contract artifact to deploy
    pub contract: String,
    /// The `deployments.json` file to record the deployed address in, if any
    pub deployments_path: Option<PathBuf>,
}

/// The result of a deployment run, consumed by the entrypoint
#[derive(Debug)]
pub enum DeploymentOutcome {
    /// The contract was deployed and its address logged
    Deployed(DeployedContract),
    /// Some step of the deployment failed
    Failed(ScriptError),
}

impl DeploymentOutcome {
    /// The process exit status for this outcome
    pub fn status(&self) -> u8 {
        match self {
            DeploymentOutcome::Deployed(_) => 0,
            DeploymentOutcome::Failed(_) => 1,
        }
    }

    /// The process exit code for this outcome
    pub fn exit_code(&self) -> ExitCode {
        ExitCode::from(self.status())
    }
}

impl From<Result<DeployedContract, ScriptError>> for DeploymentOutcome {
    fn from(res: Result<DeployedContract, ScriptError>) -> Self {
        match res {
            Ok(contract) => DeploymentOutcome::Deployed(contract),
            Err(e) => DeploymentOutcome::Failed(e),
        }
    }
}
