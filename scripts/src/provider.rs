//! An RPC-backed deployment environment, built on alloy

use std::str::FromStr;

use alloy::{
    network::{Ethereum, EthereumWallet, TransactionBuilder},
    primitives::{Address, U256},
    providers::{DynProvider, PendingTransactionBuilder, Provider, ProviderBuilder},
    rpc::types::TransactionRequest,
    signers::local::PrivateKeySigner,
    transports::http::reqwest::Url,
};
use async_trait::async_trait;
use tracing::{debug, info};

use crate::{
    artifacts::{ArtifactStore, ContractArtifact},
    environment::{ContractFactory, DeployEnvironment, DeploySigner, PendingDeployment},
    errors::ScriptError,
    types::DeployedContract,
};

/// A deployment environment talking to a JSON-RPC node over HTTP
pub struct AlloyEnvironment {
    /// The provider, with the configured signers attached as its wallet
    provider: DynProvider,
    /// The addresses of the configured signers, the default signer first
    signers: Vec<Address>,
    /// The compiled artifacts to deploy from
    artifacts: ArtifactStore,
    /// The number of confirmations to wait for a deployment
    confirmations: u64,
}

impl AlloyEnvironment {
    /// Sets up the provider and signers for the given RPC URL and private keys.
    ///
    /// The first key becomes the default sender. With no keys the provider is
    /// read-only and the environment has no signers.
    pub fn new(
        rpc_url: &str,
        priv_keys: &[String],
        artifacts: ArtifactStore,
        confirmations: u64,
    ) -> Result<Self, ScriptError> {
        let url =
            Url::parse(rpc_url).map_err(|e| ScriptError::ClientInitialization(e.to_string()))?;

        let keys = priv_keys
            .iter()
            .map(|key| {
                PrivateKeySigner::from_str(key)
                    .map_err(|e| ScriptError::ClientInitialization(e.to_string()))
            })
            .collect::<Result<Vec<_>, _>>()?;
        let signers = keys.iter().map(PrivateKeySigner::address).collect();

        let mut keys = keys.into_iter();
        let provider = match keys.next() {
            Some(default_signer) => {
                let mut wallet = EthereumWallet::new(default_signer);
                for signer in keys {
                    wallet.register_signer(signer);
                }
                ProviderBuilder::new().wallet(wallet).on_http(url).erased()
            }
            None => ProviderBuilder::new().on_http(url).erased(),
        };

        debug!(
            "connected to {rpc_url}, reading artifacts from {}",
            artifacts.root().display()
        );
        Ok(Self {
            provider,
            signers,
            artifacts,
            confirmations,
        })
    }
}

#[async_trait]
impl DeployEnvironment for AlloyEnvironment {
    type Signer = AlloySigner;
    type Factory = AlloyFactory;

    async fn signers(&self) -> Result<Vec<AlloySigner>, ScriptError> {
        Ok(self
            .signers
            .iter()
            .map(|&address| AlloySigner {
                address,
                provider: self.provider.clone(),
            })
            .collect())
    }

    async fn contract_factory(&self, name: &str) -> Result<AlloyFactory, ScriptError> {
        let artifact = self.artifacts.resolve(name)?;

        Ok(AlloyFactory {
            provider: self.provider.clone(),
            deployer: self.signers.first().copied(),
            artifact,
            confirmations: self.confirmations,
        })
    }
}

/// A signer registered in the provider's wallet
pub struct AlloySigner {
    /// The signer's address
    address: Address,
    /// The provider used to query the signer's account
    provider: DynProvider,
}

#[async_trait]
impl DeploySigner for AlloySigner {
    fn address(&self) -> Address {
        self.address
    }

    async fn balance(&self) -> Result<U256, ScriptError> {
        self.provider
            .get_balance(self.address)
            .await
            .map_err(|e| ScriptError::Provider(e.to_string()))
    }
}

/// A contract artifact bound to the default signer
pub struct AlloyFactory {
    /// The provider through which to send the deployment
    provider: DynProvider,
    /// The account sending the deployment
    deployer: Option<Address>,
    /// The contract to deploy
    artifact: ContractArtifact,
    /// The number of confirmations to wait for
    confirmations: u64,
}

#[async_trait]
impl ContractFactory for AlloyFactory {
    type Pending = AlloyPendingDeployment;

    async fn deploy(self) -> Result<AlloyPendingDeployment, ScriptError> {
        let mut tx = TransactionRequest::default().with_deploy_code(self.artifact.bytecode);
        if let Some(deployer) = self.deployer {
            tx = tx.with_from(deployer);
        }

        let pending = self
            .provider
            .send_transaction(tx)
            .await
            .map_err(|e| ScriptError::ContractDeployment(e.to_string()))?;

        Ok(AlloyPendingDeployment {
            name: self.artifact.contract_name,
            pending: pending.with_required_confirmations(self.confirmations),
        })
    }
}

/// A submitted deployment transaction
pub struct AlloyPendingDeployment {
    /// The name of the contract being deployed
    name: String,
    /// The in-flight deployment transaction
    pending: PendingTransactionBuilder<Ethereum>,
}

#[async_trait]
impl PendingDeployment for AlloyPendingDeployment {
    async fn deployed(self) -> Result<DeployedContract, ScriptError> {
        let receipt = self
            .pending
            .get_receipt()
            .await
            .map_err(|e| ScriptError::ContractDeployment(e.to_string()))?;

        if !receipt.status() {
            return Err(ScriptError::ContractDeployment(format!(
                "deployment transaction {} reverted",
                receipt.transaction_hash
            )));
        }

        let address = receipt.contract_address.ok_or_else(|| {
            ScriptError::ContractDeployment(format!(
                "receipt for {} has no contract address",
                receipt.transaction_hash
            ))
        })?;

        info!(
            block = ?receipt.block_number,
            gas_used = ?receipt.gas_used,
            "deployment of {} confirmed",
            self.name
        );
        Ok(DeployedContract {
            name: self.name,
            address,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// The first default account of a Hardhat / Anvil node
    const DEFAULT_PKEY: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

    #[tokio::test]
    async fn test_signers_from_keys() {
        let env = AlloyEnvironment::new(
            "http://127.0.0.1:8545",
            &[DEFAULT_PKEY.to_string()],
            ArtifactStore::new("artifacts"),
            1,
        )
        .unwrap();

        let signers = env.signers().await.unwrap();
        assert_eq!(signers.len(), 1);
        assert_eq!(
            signers[0].address(),
            Address::from_str("0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266").unwrap()
        );
    }

    #[tokio::test]
    async fn test_no_keys_no_signers() {
        let env =
            AlloyEnvironment::new("http://127.0.0.1:8545", &[], ArtifactStore::new("artifacts"), 1)
                .unwrap();
        assert!(env.signers().await.unwrap().is_empty());
    }

    #[test]
    fn test_invalid_client_config() {
        let bad_url = AlloyEnvironment::new("not a url", &[], ArtifactStore::new("artifacts"), 1);
        assert!(matches!(bad_url, Err(ScriptError::ClientInitialization(_))));

        let bad_key = AlloyEnvironment::new(
            "http://127.0.0.1:8545",
            &["0x1234".to_string()],
            ArtifactStore::new("artifacts"),
            1,
        );
        assert!(matches!(bad_key, Err(ScriptError::ClientInitialization(_))));
    }
}
