//! Implementation of the deploy script

use std::io::Write;

use tracing::{error, info};

use crate::{
    environment::{ContractFactory, DeployEnvironment, DeploySigner, PendingDeployment},
    errors::ScriptError,
    types::{DeployArgs, DeployedContract, DeploymentOutcome},
    utils::{format_ether, write_deployed_address},
};

/// Write a single line to the console
macro_rules! console {
    ($out:expr, $($arg:tt)*) => {
        writeln!($out, $($arg)*).map_err(|e| ScriptError::Output(e.to_string()))
    };
}

/// Deploys the named contract from the environment's default signer.
///
/// Logs the deployer account, its balance, and the deployed address to `out`,
/// in that order. Nothing after a failing step runs.
pub async fn deploy_contract<E: DeployEnvironment>(
    env: &E,
    contract: &str,
    out: &mut impl Write,
) -> Result<DeployedContract, ScriptError> {
    let deployer = env
        .signers()
        .await?
        .into_iter()
        .next()
        .ok_or_else(|| ScriptError::Provider("no signers configured".to_string()))?;
    console!(out, "Deploying contract with the account: {}", deployer.address())?;

    let balance = deployer.balance().await?;
    console!(out, "Account balance: {}", format_ether(balance))?;

    let factory = env.contract_factory(contract).await?;
    let pending = factory.deploy().await?;

    info!("Waiting for deployment...");
    let deployed = pending.deployed().await?;

    console!(out, "{} contract deployed at: {}", deployed.name, deployed.address)?;
    Ok(deployed)
}

/// Runs a full deployment, recording the deployed address if requested.
///
/// Any failure is written to `err` and returned as a failed outcome; mapping
/// the outcome to an exit code is left to the caller.
pub async fn run_deployment<E: DeployEnvironment>(
    env: &E,
    args: &DeployArgs,
    out: &mut impl Write,
    err: &mut impl Write,
) -> DeploymentOutcome {
    let res = deploy_contract(env, &args.contract, out).await.and_then(|deployed| {
        if let Some(path) = &args.deployments_path {
            write_deployed_address(path, &deployed.name, deployed.address)?;
            info!("recorded {} in {}", deployed.name, path.display());
        }
        Ok(deployed)
    });

    report_outcome(res.into(), err)
}

/// Logs a failed outcome to `err`, passing the outcome through
pub fn report_outcome(outcome: DeploymentOutcome, err: &mut impl Write) -> DeploymentOutcome {
    if let DeploymentOutcome::Failed(e) = &outcome {
        error!("deployment failed: {e}");
        // Nothing left to report to if stderr itself is gone
        let _ = writeln!(err, "Error: {e}");
    }

    outcome
}
