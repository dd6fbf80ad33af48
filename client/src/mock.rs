//! Recording collaborators for unit tests.
use anyhow::{anyhow, Result};
use async_trait::async_trait;
use solana_sdk::{
    commitment_config::CommitmentConfig,
    pubkey::Pubkey,
    signature::Signature,
    transaction::{Transaction, TransactionError},
};
use std::sync::Mutex;

use crate::{
    ledger::{BalanceChanges, LedgerClient, RawTokenAccount},
    wallet::{SendOptions, WalletConnector},
};

#[derive(Default)]
pub struct MockLedger {
    pub accounts: Mutex<Vec<RawTokenAccount>>,
    pub scan_failure: Mutex<Option<String>>,
    pub confirm_error: Mutex<Option<TransactionError>>,
    pub balances: Mutex<Option<BalanceChanges>>,
    pub lookup_failure: Mutex<Option<String>>,
    pub scans: Mutex<Vec<(Pubkey, Pubkey)>>,
    pub confirms: Mutex<Vec<Signature>>,
    pub lookups: Mutex<Vec<Signature>>,
}

impl MockLedger {
    pub fn with_accounts(accounts: Vec<RawTokenAccount>) -> Self {
        let ledger = MockLedger::default();
        *ledger.accounts.lock().unwrap() = accounts;
        ledger
    }

    pub fn set_accounts(&self, accounts: Vec<RawTokenAccount>) {
        *self.accounts.lock().unwrap() = accounts;
    }

    pub fn fail_scans(&self, message: &str) {
        *self.scan_failure.lock().unwrap() = Some(message.to_string());
    }

    pub fn set_confirm_error(&self, err: TransactionError) {
        *self.confirm_error.lock().unwrap() = Some(err);
    }

    pub fn set_balances(&self, pre: u64, post: u64) {
        *self.balances.lock().unwrap() = Some(BalanceChanges {
            pre_balances: vec![pre, 0],
            post_balances: vec![post, 0],
        });
    }

    pub fn fail_lookups(&self, message: &str) {
        *self.lookup_failure.lock().unwrap() = Some(message.to_string());
    }

    pub fn scan_calls(&self) -> usize {
        self.scans.lock().unwrap().len()
    }

    pub fn total_calls(&self) -> usize {
        self.scan_calls() + self.confirms.lock().unwrap().len() + self.lookups.lock().unwrap().len()
    }
}

#[async_trait]
impl LedgerClient for MockLedger {
    async fn get_token_accounts_by_owner(
        &self,
        owner: &Pubkey,
        token_program: &Pubkey,
    ) -> Result<Vec<RawTokenAccount>> {
        self.scans.lock().unwrap().push((*owner, *token_program));
        if let Some(message) = self.scan_failure.lock().unwrap().clone() {
            return Err(anyhow!(message));
        }
        Ok(self
            .accounts
            .lock()
            .unwrap()
            .iter()
            .filter(|account| account.token_program == *token_program)
            .cloned()
            .collect())
    }

    async fn confirm_transaction(
        &self,
        signature: &Signature,
        _commitment: CommitmentConfig,
    ) -> Result<Option<TransactionError>> {
        self.confirms.lock().unwrap().push(*signature);
        Ok(self.confirm_error.lock().unwrap().clone())
    }

    async fn get_balance_changes(
        &self,
        signature: &Signature,
        _commitment: CommitmentConfig,
    ) -> Result<Option<BalanceChanges>> {
        self.lookups.lock().unwrap().push(*signature);
        if let Some(message) = self.lookup_failure.lock().unwrap().clone() {
            return Err(anyhow!(message));
        }
        Ok(self.balances.lock().unwrap().clone())
    }
}

pub struct MockWallet {
    pub identity: Pubkey,
    pub failure: Mutex<Option<String>>,
    pub connect_failure: Mutex<Option<String>>,
    pub sent: Mutex<Vec<(Transaction, SendOptions)>>,
}

impl Default for MockWallet {
    fn default() -> Self {
        Self {
            identity: Pubkey::new_unique(),
            failure: Mutex::new(None),
            connect_failure: Mutex::new(None),
            sent: Mutex::new(Vec::new()),
        }
    }
}

impl MockWallet {
    pub fn identity(&self) -> Pubkey {
        self.identity
    }

    pub fn fail_with(&self, message: &str) {
        *self.failure.lock().unwrap() = Some(message.to_string());
    }

    pub fn fail_connect(&self, message: &str) {
        *self.connect_failure.lock().unwrap() = Some(message.to_string());
    }

    pub fn sent(&self) -> Vec<(Transaction, SendOptions)> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl WalletConnector for MockWallet {
    async fn connect(&self) -> Result<Pubkey> {
        if let Some(message) = self.connect_failure.lock().unwrap().clone() {
            return Err(anyhow!(message));
        }
        Ok(self.identity)
    }

    async fn send_transaction(
        &self,
        transaction: Transaction,
        options: &SendOptions,
    ) -> Result<Signature> {
        if let Some(message) = self.failure.lock().unwrap().clone() {
            return Err(anyhow!(message));
        }
        self.sent.lock().unwrap().push((transaction, *options));
        Ok(Signature::new_unique())
    }
}
