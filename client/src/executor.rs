use rust_decimal::Decimal;
use solana_sdk::{
    packet::PACKET_DATA_SIZE, pubkey::Pubkey, signature::Signature, transaction::Transaction,
};
use tracing::{debug, info, warn};

use crate::{
    config::ReclaimSettings,
    error::ReclaimError,
    instructions::{token_instructions::build_close_transaction, utils::lamports_to_sol},
    ledger::LedgerClient,
    scanner::EmptyAccount,
    wallet::WalletConnector,
};

/// Outcome of one confirmed close transaction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClosureResult {
    pub signature: Signature,
    pub accounts_closed: usize,
    /// Fee payer balance change in SOL.
    pub reclaimed: Decimal,
}

impl ClosureResult {
    pub fn summary(&self) -> String {
        format!(
            "Successfully closed {} accounts! Reclaimed approximately {:.6} SOL",
            self.accounts_closed,
            self.reclaimed.round_dp(6)
        )
    }
}

/// Serialized size of `transaction` when it is above the packet limit.
pub fn oversized(transaction: &Transaction) -> bincode::Result<Option<usize>> {
    let size = bincode::serialized_size(transaction)? as usize;
    Ok((size > PACKET_DATA_SIZE).then_some(size))
}

/// Closes `accounts` in a single transaction and reports the rent returned to `identity`.
///
/// Every selected account goes into the same transaction, so either all of
/// them close or none do.
pub async fn close<L, W>(
    ledger: &L,
    wallet: &W,
    identity: Option<&Pubkey>,
    accounts: &[EmptyAccount],
    settings: &ReclaimSettings,
) -> Result<ClosureResult, ReclaimError>
where
    L: LedgerClient + ?Sized,
    W: WalletConnector + ?Sized,
{
    let owner = match identity {
        Some(owner) if !accounts.is_empty() => owner,
        _ => return Err(ReclaimError::select_accounts_first()),
    };

    let transaction = build_close_transaction(owner, accounts)?;
    match oversized(&transaction) {
        Ok(Some(size)) => warn!(
            "close transaction for {} accounts is {} bytes, above the {} byte packet limit",
            accounts.len(),
            size,
            PACKET_DATA_SIZE
        ),
        Ok(None) => {}
        Err(err) => warn!("skipping size check, cannot serialize close transaction: {}", err),
    }

    let signature = wallet
        .send_transaction(transaction, &settings.send_options)
        .await?;
    info!("submitted close of {} accounts: {}", accounts.len(), signature);

    if let Some(err) = ledger
        .confirm_transaction(&signature, settings.commitment)
        .await?
    {
        return Err(ReclaimError::OnChainFailure(err));
    }

    // the accounts are closed once confirmed, a failed lookup only loses the figure
    let changes = match ledger
        .get_balance_changes(&signature, settings.commitment)
        .await
    {
        Ok(changes) => changes,
        Err(err) => {
            warn!("balance lookup for {} failed: {:#}", signature, err);
            None
        }
    };
    let reclaimed = changes
        .and_then(|changes| changes.fee_payer_delta())
        .map(lamports_to_sol)
        .unwrap_or_default();
    debug!("{} reclaimed {} SOL", signature, reclaimed);

    Ok(ClosureResult {
        signature,
        accounts_closed: accounts.len(),
        reclaimed,
    })
}
