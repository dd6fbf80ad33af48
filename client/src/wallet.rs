use anyhow::{format_err, Result};
use async_trait::async_trait;
use solana_client::{nonblocking::rpc_client::RpcClient, rpc_config::RpcSendTransactionConfig};
use solana_sdk::{
    commitment_config::CommitmentLevel,
    pubkey::Pubkey,
    signature::{Keypair, Signature, Signer},
    transaction::Transaction,
};
use std::sync::Arc;
use tracing::debug;

/// Submission options forwarded to the RPC node.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SendOptions {
    pub skip_preflight: bool,
    pub preflight_commitment: CommitmentLevel,
    pub max_retries: usize,
}

impl Default for SendOptions {
    fn default() -> Self {
        Self {
            skip_preflight: false,
            preflight_commitment: CommitmentLevel::Confirmed,
            max_retries: 5,
        }
    }
}

/// Supplies the connected identity and signs-and-sends on its behalf.
#[async_trait]
pub trait WalletConnector: Send + Sync {
    async fn connect(&self) -> Result<Pubkey>;

    /// Signs `transaction` (fee payer already set) and broadcasts it.
    async fn send_transaction(
        &self,
        transaction: Transaction,
        options: &SendOptions,
    ) -> Result<Signature>;
}

/// Wallet backed by a local keypair file.
pub struct KeypairWallet {
    keypair: Keypair,
    client: Arc<RpcClient>,
}

impl KeypairWallet {
    pub fn new(keypair: Keypair, client: Arc<RpcClient>) -> Self {
        Self { keypair, client }
    }

    pub fn from_file(path: &str, client: Arc<RpcClient>) -> Result<Self> {
        Ok(Self::new(read_keypair_file(path)?, client))
    }
}

pub fn read_keypair_file(s: &str) -> Result<Keypair> {
    solana_sdk::signature::read_keypair_file(s)
        .map_err(|_| format_err!("failed to read keypair from {}", s))
}

#[async_trait]
impl WalletConnector for KeypairWallet {
    async fn connect(&self) -> Result<Pubkey> {
        Ok(self.keypair.pubkey())
    }

    async fn send_transaction(
        &self,
        mut transaction: Transaction,
        options: &SendOptions,
    ) -> Result<Signature> {
        let recent_hash = self.client.get_latest_blockhash().await?;
        transaction.try_sign(&[&self.keypair], recent_hash)?;
        debug!(
            "sending {} instructions, skip_preflight={} max_retries={}",
            transaction.message.instructions.len(),
            options.skip_preflight,
            options.max_retries
        );
        Ok(self
            .client
            .send_transaction_with_config(
                &transaction,
                RpcSendTransactionConfig {
                    skip_preflight: options.skip_preflight,
                    preflight_commitment: Some(options.preflight_commitment),
                    max_retries: Some(options.max_retries),
                    ..RpcSendTransactionConfig::default()
                },
            )
            .await?)
    }
}
