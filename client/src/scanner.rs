use solana_sdk::pubkey::Pubkey;
use tracing::debug;

use crate::{
    error::ReclaimError,
    ledger::{LedgerClient, RawTokenAccount},
};

/// A token account holding no tokens, only its rent deposit.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EmptyAccount {
    pub address: Pubkey,
    pub mint: Pubkey,
    pub token_program: Pubkey,
}

impl EmptyAccount {
    pub fn from_raw(raw: &RawTokenAccount) -> Option<Self> {
        match (raw.amount, raw.mint) {
            (Some(0), Some(mint)) => Some(EmptyAccount {
                address: raw.address,
                mint,
                token_program: raw.token_program,
            }),
            _ => None,
        }
    }
}

/// Lists the empty token accounts owned by `identity` under each of
/// `token_programs`, in ledger order.
pub async fn scan<L: LedgerClient + ?Sized>(
    ledger: &L,
    identity: Option<&Pubkey>,
    token_programs: &[Pubkey],
) -> Result<Vec<EmptyAccount>, ReclaimError> {
    let owner = identity.ok_or(ReclaimError::NotConnected)?;
    let mut empty_accounts = Vec::new();
    for token_program in token_programs {
        let raw_accounts = ledger
            .get_token_accounts_by_owner(owner, token_program)
            .await
            .map_err(|e| ReclaimError::NetworkError(format!("{:#}", e)))?;
        let before = empty_accounts.len();
        empty_accounts.extend(raw_accounts.iter().filter_map(EmptyAccount::from_raw));
        debug!(
            "{} of {} accounts under {} are empty",
            empty_accounts.len() - before,
            raw_accounts.len(),
            token_program
        );
    }
    Ok(empty_accounts)
}
