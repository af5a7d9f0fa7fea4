//! Constants used in the deploy script

/// The contract deployed when none is specified
pub const DEFAULT_CONTRACT_NAME: &str = "CustomBetting";

/// The default RPC URL, a local Hardhat or Anvil node
pub const DEFAULT_RPC_URL: &str = "http://127.0.0.1:8545";

/// The default root of the compiled artifacts tree
pub const DEFAULT_ARTIFACTS_PATH: &str = "artifacts";

/// The number of confirmations to wait for the contract deployment transaction
pub const NUM_DEPLOY_CONFIRMATIONS: u64 = 1;

/// The number of decimals in one ether
pub const ETHER_DECIMALS: usize = 18;

/// The deployments key in the `deployments.json` file
pub const DEPLOYMENTS_KEY: &str = "deployments";

/// The extension of a compiled artifact file
pub const ARTIFACT_EXTENSION: &str = "json";

/// The directory in which Hardhat and Foundry store raw compiler input/output,
/// which never holds a contract artifact
pub const BUILD_INFO_DIR: &str = "build-info";

/// The separator between the source path and the contract name in a fully
/// qualified contract name, e.g. `contracts/Foo.sol:Foo`
pub const FULLY_QUALIFIED_NAME_SEPARATOR: char = ':';
