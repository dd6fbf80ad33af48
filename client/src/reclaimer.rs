use solana_sdk::pubkey::Pubkey;
use std::sync::Arc;
use tracing::{info, warn};

use crate::{
    config::ReclaimSettings,
    error::ReclaimError,
    executor::{self, ClosureResult},
    ledger::LedgerClient,
    scanner,
    session::Session,
    wallet::WalletConnector,
};

/// Drives a [`Session`] through connect, scan, select and close against the
/// wallet and ledger collaborators.
pub struct Reclaimer<L: ?Sized, W: ?Sized> {
    ledger: Arc<L>,
    wallet: Arc<W>,
    settings: ReclaimSettings,
}

impl<L, W> Reclaimer<L, W>
where
    L: LedgerClient + ?Sized,
    W: WalletConnector + ?Sized,
{
    pub fn new(ledger: Arc<L>, wallet: Arc<W>, settings: ReclaimSettings) -> Self {
        Self {
            ledger,
            wallet,
            settings,
        }
    }

    pub fn settings(&self) -> &ReclaimSettings {
        &self.settings
    }

    /// Connects the wallet and runs the first scan.
    pub async fn connect(&self, session: &mut Session) -> Result<Pubkey, ReclaimError> {
        let identity = match self.wallet.connect().await {
            Ok(identity) => identity,
            Err(err) => {
                let err = ReclaimError::from_connect(err);
                session.report_error(&err);
                return Err(err);
            }
        };
        info!("connected {}", identity);
        session.connect(identity);
        self.refresh(session).await?;
        Ok(identity)
    }

    /// Rescans the connected identity. Returns the number of empty accounts in
    /// the session snapshot afterwards.
    pub async fn refresh(&self, session: &mut Session) -> Result<usize, ReclaimError> {
        let ticket = session.begin_scan()?;
        let result = scanner::scan(
            self.ledger.as_ref(),
            Some(ticket.identity()),
            &self.settings.token_programs,
        )
        .await;
        let failure = result.as_ref().err().cloned();
        if !session.finish_scan(ticket, result) {
            warn!("discarding stale scan for {}", ticket.identity());
            return Ok(session.accounts().len());
        }
        match failure {
            Some(err) => Err(err),
            None => {
                info!("{} empty token accounts", session.accounts().len());
                Ok(session.accounts().len())
            }
        }
    }

    pub fn toggle(&self, session: &mut Session, address: Pubkey) -> Result<bool, ReclaimError> {
        session.toggle(address)
    }

    /// Closes the current selection, then rescans.
    pub async fn close_selected(
        &self,
        session: &mut Session,
    ) -> Result<ClosureResult, ReclaimError> {
        let request = session.begin_close()?;
        let result = executor::close(
            self.ledger.as_ref(),
            self.wallet.as_ref(),
            Some(&request.identity),
            &request.accounts,
            &self.settings,
        )
        .await;
        session.finish_close(&result);
        match &result {
            Ok(closed) => {
                info!("{}", closed.summary());
                if let Err(err) = self.refresh(session).await {
                    warn!("rescan after close failed: {}", err);
                }
            }
            Err(err) => warn!("close failed: {:?}", err),
        }
        result
    }
}
