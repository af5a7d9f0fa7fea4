//! Definitions of CLI arguments for the deploy script

use std::{io::Write, path::PathBuf};

use clap::Parser;

use crate::{
    artifacts::ArtifactStore,
    commands::{report_outcome, run_deployment},
    constants::{
        DEFAULT_ARTIFACTS_PATH, DEFAULT_CONTRACT_NAME, DEFAULT_RPC_URL, NUM_DEPLOY_CONFIRMATIONS,
    },
    provider::AlloyEnvironment,
    types::{DeployArgs, DeploymentOutcome},
};

/// Deploy a compiled contract with no constructor arguments
#[derive(Parser)]
pub struct Cli {
    /// Private keys of the available signers, the deployer first
    // TODO: Support keystore files instead of raw keys
    #[arg(
        short,
        long = "priv-key",
        env = "DEPLOYER_PRIVATE_KEYS",
        value_delimiter = ',',
        hide_env_values = true
    )]
    pub priv_keys: Vec<String>,

    /// Network RPC URL
    #[arg(short, long, env = "RPC_URL", default_value = DEFAULT_RPC_URL)]
    pub rpc_url: String,

    /// Name of the contract to deploy, bare (`Foo`) or fully qualified
    /// (`contracts/Foo.sol:Foo`)
    #[arg(short, long, env = "DEPLOY_CONTRACT", default_value = DEFAULT_CONTRACT_NAME)]
    pub contract: String,

    /// Root of the compiled artifacts tree
    #[arg(short, long, env = "ARTIFACTS_PATH", default_value = DEFAULT_ARTIFACTS_PATH)]
    pub artifacts_path: PathBuf,

    /// Number of block confirmations to wait for the deployment
    #[arg(long, env = "DEPLOY_CONFIRMATIONS", default_value_t = NUM_DEPLOY_CONFIRMATIONS)]
    pub confirmations: u64,

    /// Path to a `deployments.json` file in which to record the deployed
    /// address
    #[arg(short, long, env = "DEPLOYMENTS_PATH")]
    pub deployments_path: Option<PathBuf>,
}

impl Cli {
    /// Connects to the configured network and runs the deployment
    pub async fn run(self, out: &mut impl Write, err: &mut impl Write) -> DeploymentOutcome {
        let artifacts = ArtifactStore::new(self.artifacts_path);
        let env = match AlloyEnvironment::new(
            &self.rpc_url,
            &self.priv_keys,
            artifacts,
            self.confirmations,
        ) {
            Ok(env) => env,
            Err(e) => return report_outcome(DeploymentOutcome::Failed(e), err),
        };

        let args = DeployArgs {
            contract: self.contract,
            deployments_path: self.deployments_path,
        };
        run_deployment(&env, &args, out, err).await
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_explicit_args() {
        let cli = Cli::try_parse_from([
            "deploy",
            "--priv-key",
            "0x01,0x02",
            "-p",
            "0x03",
            "--rpc-url",
            "http://localhost:9545",
            "--contract",
            "contracts/Token.sol:Token",
            "--artifacts-path",
            "out",
            "--confirmations",
            "3",
            "--deployments-path",
            "deployments.json",
        ])
        .unwrap();

        assert_eq!(cli.priv_keys, vec!["0x01", "0x02", "0x03"]);
        assert_eq!(cli.rpc_url, "http://localhost:9545");
        assert_eq!(cli.contract, "contracts/Token.sol:Token");
        assert_eq!(cli.artifacts_path, PathBuf::from("out"));
        assert_eq!(cli.confirmations, 3);
        assert_eq!(cli.deployments_path, Some(PathBuf::from("deployments.json")));
    }

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["deploy", "-p", "0x01"]).unwrap();

        assert_eq!(cli.rpc_url, DEFAULT_RPC_URL);
        assert_eq!(cli.contract, DEFAULT_CONTRACT_NAME);
        assert_eq!(cli.artifacts_path, PathBuf::from(DEFAULT_ARTIFACTS_PATH));
        assert_eq!(cli.confirmations, NUM_DEPLOY_CONFIRMATIONS);
        assert!(cli.deployments_path.is_none());
    }

    #[test]
    fn test_keys_from_env() {
        std::env::set_var("DEPLOYER_PRIVATE_KEYS", "0x0a,0x0b");
        let cli = Cli::try_parse_from(["deploy"]);
        std::env::remove_var("DEPLOYER_PRIVATE_KEYS");

        assert_eq!(cli.unwrap().priv_keys, vec!["0x0a", "0x0b"]);
    }

    #[tokio::test]
    async fn test_bad_config_fails_run() {
        let cli = Cli::try_parse_from(["deploy", "-p", "not-a-key", "-r", "http://127.0.0.1:8545"])
            .unwrap();

        let mut out = Vec::new();
        let mut err = Vec::new();
        let outcome = cli.run(&mut out, &mut err).await;

        assert_eq!(outcome.status(), 1);
        assert!(out.is_empty());
        assert!(String::from_utf8(err)
            .unwrap()
            .starts_with("Error: error initializing client"));
    }
}
