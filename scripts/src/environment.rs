//! The capabilities a deployment needs from its surrounding environment.
//!
//! The orchestrator in [`crate::commands`] only talks to these traits, so the
//! network-backed implementation in [`crate::provider`] can be swapped for an
//! in-memory one in tests.

use alloy::primitives::{Address, U256};
use async_trait::async_trait;

use crate::{errors::ScriptError, types::DeployedContract};

/// A source of signers and contract factories, i.e. a configured network
#[async_trait]
pub trait DeployEnvironment: Send + Sync {
    /// The signer type handed out by this environment
    type Signer: DeploySigner;
    /// The contract factory type handed out by this environment
    type Factory: ContractFactory;

    /// All signers configured for this environment, the default signer first
    async fn signers(&self) -> Result<Vec<Self::Signer>, ScriptError>;

    /// Resolve a contract artifact by name into a factory that deploys it
    /// from the default signer
    async fn contract_factory(&self, name: &str) -> Result<Self::Factory, ScriptError>;
}

/// An identity able to sign and submit transactions
#[async_trait]
pub trait DeploySigner: Send + Sync {
    /// The signer's account address
    fn address(&self) -> Address;

    /// The signer's current balance, in wei
    async fn balance(&self) -> Result<U256, ScriptError>;
}

/// A deployable contract template
#[async_trait]
pub trait ContractFactory: Send {
    /// The handle to a submitted, unconfirmed deployment
    type Pending: PendingDeployment;

    /// Submit the deployment transaction, with no constructor arguments
    async fn deploy(self) -> Result<Self::Pending, ScriptError>;
}

/// A deployment transaction that has been submitted but not yet confirmed
#[async_trait]
pub trait PendingDeployment: Send {
    /// Wait for the deployment transaction to be confirmed
    async fn deployed(self) -> Result<DeployedContract, ScriptError>;
}
