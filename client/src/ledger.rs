use anyhow::Result;
use async_trait::async_trait;
use solana_sdk::{
    commitment_config::CommitmentConfig, pubkey::Pubkey, signature::Signature,
    transaction::TransactionError,
};

/// A token account as reported by the ledger. `None` fields could not be parsed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RawTokenAccount {
    pub address: Pubkey,
    pub token_program: Pubkey,
    pub mint: Option<Pubkey>,
    pub amount: Option<u64>,
}

/// Lamport balances of every account touched by a transaction, fee payer first.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BalanceChanges {
    pub pre_balances: Vec<u64>,
    pub post_balances: Vec<u64>,
}

impl BalanceChanges {
    /// Net lamport change of the fee payer, `None` if the meta has no balances.
    pub fn fee_payer_delta(&self) -> Option<i128> {
        let pre = *self.pre_balances.first()?;
        let post = *self.post_balances.first()?;
        Some(post as i128 - pre as i128)
    }
}

/// Read and confirmation access to the cluster.
#[async_trait]
pub trait LedgerClient: Send + Sync {
    async fn get_token_accounts_by_owner(
        &self,
        owner: &Pubkey,
        token_program: &Pubkey,
    ) -> Result<Vec<RawTokenAccount>>;

    /// Waits until `signature` reaches `commitment`. Returns the execution error
    /// if the transaction landed but failed.
    async fn confirm_transaction(
        &self,
        signature: &Signature,
        commitment: CommitmentConfig,
    ) -> Result<Option<TransactionError>>;

    async fn get_balance_changes(
        &self,
        signature: &Signature,
        commitment: CommitmentConfig,
    ) -> Result<Option<BalanceChanges>>;
}
