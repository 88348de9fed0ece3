//! Chain client backed by Alloy
//!
//! One provider carrying the relay wallet serves both reads and writes for the
//! lifetime of the process.

use alloy::{
    network::EthereumWallet,
    primitives::{Address, TxHash, B256, U256},
    providers::{PendingTransactionBuilder, Provider, ProviderBuilder},
    signers::local::PrivateKeySigner,
    sol,
    transports::http::{Client, Http},
};
use anyhow::{Context, Result};

use crate::config::Config;
use crate::services::blockchain::{ChainClient, ChainError};
use crate::services::prover::CallArgs;

// Generate contract bindings
sol! {
    #[sol(rpc)]
    interface ZkLogin {
        function register(bytes32 login, uint256 passwordHash) external;
        function transfer(
            bytes32 login,
            uint256[2] a,
            uint256[2][2] b,
            uint256[2] c,
            uint256[2] input,
            address recepient,
            uint256 amount
        ) external;
        function isUserRegistered(bytes32 login) external view returns (bool);
    }
}

pub struct AlloyChain<P> {
    provider: P,
    contract: Address,
}

/// Build the wallet-backed provider described by `config`.
pub fn connect(config: &Config) -> Result<AlloyChain<impl Provider<Http<Client>>>> {
    let signer: PrivateKeySigner = config
        .private_key
        .parse()
        .context("Invalid private key (PK)")?;

    tracing::info!(wallet = %signer.address(), "Loaded relay wallet");

    let provider = ProviderBuilder::new()
        .with_recommended_fillers()
        .wallet(EthereumWallet::from(signer))
        .on_http(config.rpc_url.parse().context("Invalid RPC URL")?);

    Ok(AlloyChain::new(provider, config.contract_address))
}

impl<P> AlloyChain<P>
where
    P: Provider<Http<Client>> + 'static,
{
    pub fn new(provider: P, contract: Address) -> Self {
        Self { provider, contract }
    }
}

fn rpc_error(e: impl std::fmt::Display) -> ChainError {
    ChainError::Rpc(e.to_string())
}

impl<P> ChainClient for AlloyChain<P>
where
    P: Provider<Http<Client>> + 'static,
{
    async fn block_number(&self) -> Result<u64, ChainError> {
        self.provider.get_block_number().await.map_err(rpc_error)
    }

    async fn is_user_registered(&self, login: B256) -> Result<bool, ChainError> {
        let contract = ZkLogin::new(self.contract, &self.provider);
        let registered = contract
            .isUserRegistered(login)
            .call()
            .await
            .map_err(rpc_error)?
            ._0;
        Ok(registered)
    }

    async fn send_register(&self, login: B256, password_hash: U256) -> Result<TxHash, ChainError> {
        let contract = ZkLogin::new(self.contract, &self.provider);
        let call = contract.register(login, password_hash);
        let pending = call
            .send()
            .await
            .map_err(rpc_error)?;

        tracing::info!(tx = %pending.tx_hash(), login = %login, "register submitted");
        Ok(*pending.tx_hash())
    }

    async fn send_transfer(
        &self,
        login: B256,
        args: &CallArgs,
        recipient: Address,
        amount: U256,
    ) -> Result<TxHash, ChainError> {
        let input: [U256; 2] = args.input.as_slice().try_into().map_err(|_| {
            ChainError::InvalidArguments(format!(
                "transfer takes 2 public inputs, got {}",
                args.input.len()
            ))
        })?;

        let contract = ZkLogin::new(self.contract, &self.provider);
        let call = contract.transfer(login, args.a, args.b, args.c, input, recipient, amount);
        let pending = call
            .send()
            .await
            .map_err(rpc_error)?;

        tracing::info!(
            tx = %pending.tx_hash(),
            login = %login,
            recipient = %recipient,
            "transfer submitted"
        );
        Ok(*pending.tx_hash())
    }

    async fn wait_for_receipt(&self, tx_hash: TxHash) -> Result<(), ChainError> {
        let receipt = PendingTransactionBuilder::new(self.provider.root(), tx_hash)
            .get_receipt()
            .await
            .map_err(rpc_error)?;

        if !receipt.status() {
            return Err(ChainError::Reverted(tx_hash));
        }

        tracing::info!(
            tx = %tx_hash,
            block = ?receipt.block_number,
            gas_used = ?receipt.gas_used,
            "transaction confirmed"
        );
        Ok(())
    }
}
