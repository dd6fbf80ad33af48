use anyhow::{format_err, Result};
use async_trait::async_trait;
use solana_client::{
    nonblocking::rpc_client::RpcClient, rpc_config::RpcTransactionConfig,
    rpc_request::TokenAccountsFilter,
};
use solana_sdk::{
    commitment_config::CommitmentConfig, pubkey::Pubkey, signature::Signature,
    transaction::TransactionError,
};
use solana_transaction_status::UiTransactionEncoding;
use std::{
    sync::Arc,
    time::{Duration, Instant},
};
use tracing::debug;

use super::utils::parse_token_account;
use crate::ledger::{BalanceChanges, LedgerClient, RawTokenAccount};

const CONFIRM_POLL_INTERVAL: Duration = Duration::from_millis(500);

/// `LedgerClient` over the cluster JSON-RPC endpoint.
pub struct RpcLedger {
    client: Arc<RpcClient>,
    confirm_timeout: Duration,
}

impl RpcLedger {
    pub fn new(client: Arc<RpcClient>, confirm_timeout: Duration) -> Self {
        Self {
            client,
            confirm_timeout,
        }
    }
}

#[async_trait]
impl LedgerClient for RpcLedger {
    async fn get_token_accounts_by_owner(
        &self,
        owner: &Pubkey,
        token_program: &Pubkey,
    ) -> Result<Vec<RawTokenAccount>> {
        let all_tokens = self
            .client
            .get_token_accounts_by_owner(owner, TokenAccountsFilter::ProgramId(*token_program))
            .await?;
        debug!(
            "{} token accounts owned by {} under {}",
            all_tokens.len(),
            owner,
            token_program
        );
        Ok(all_tokens
            .iter()
            .filter_map(|keyed_account| parse_token_account(keyed_account, token_program))
            .collect())
    }

    async fn confirm_transaction(
        &self,
        signature: &Signature,
        commitment: CommitmentConfig,
    ) -> Result<Option<TransactionError>> {
        let started = Instant::now();
        loop {
            let status = self
                .client
                .get_signature_status_with_commitment(signature, commitment)
                .await?;
            if let Some(result) = status {
                debug!("{} reached {:?}", signature, commitment.commitment);
                return Ok(result.err());
            }
            if started.elapsed() >= self.confirm_timeout {
                return Err(format_err!(
                    "Transaction {} was not confirmed within {} seconds",
                    signature,
                    self.confirm_timeout.as_secs()
                ));
            }
            tokio::time::sleep(CONFIRM_POLL_INTERVAL).await;
        }
    }

    async fn get_balance_changes(
        &self,
        signature: &Signature,
        commitment: CommitmentConfig,
    ) -> Result<Option<BalanceChanges>> {
        let tx = self
            .client
            .get_transaction_with_config(
                signature,
                RpcTransactionConfig {
                    encoding: Some(UiTransactionEncoding::Json),
                    commitment: Some(commitment),
                    max_supported_transaction_version: Some(0),
                },
            )
            .await?;
        Ok(tx.transaction.meta.map(|meta| BalanceChanges {
            pre_balances: meta.pre_balances,
            post_balances: meta.post_balances,
        }))
    }
}
