use solana_sdk::pubkey::Pubkey;

use crate::{
    error::{ReclaimError, CLOSE_IN_FLIGHT},
    executor::ClosureResult,
    scanner::EmptyAccount,
    selection::Selection,
};

/// Handed out by [`Session::begin_scan`]; only the most recent ticket's
/// result is applied.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScanTicket {
    seq: u64,
    identity: Pubkey,
}

impl ScanTicket {
    pub fn identity(&self) -> &Pubkey {
        &self.identity
    }
}

/// Everything a close needs, captured when the close starts.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CloseRequest {
    pub identity: Pubkey,
    pub accounts: Vec<EmptyAccount>,
}

/// In-memory state of one user session: who is connected, the latest scan
/// snapshot, what is selected, and the messages the front end renders.
#[derive(Clone, Debug, Default)]
pub struct Session {
    identity: Option<Pubkey>,
    accounts: Vec<EmptyAccount>,
    selection: Selection,
    error_message: Option<String>,
    success_message: Option<String>,
    scan_seq: u64,
    pending_scans: usize,
    close_in_flight: bool,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn identity(&self) -> Option<&Pubkey> {
        self.identity.as_ref()
    }

    pub fn accounts(&self) -> &[EmptyAccount] {
        &self.accounts
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn is_loading(&self) -> bool {
        self.pending_scans > 0 || self.close_in_flight
    }

    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    pub fn success_message(&self) -> Option<&str> {
        self.success_message.as_deref()
    }

    pub fn connect(&mut self, identity: Pubkey) {
        if self.identity != Some(identity) {
            self.accounts.clear();
            self.selection.clear();
        }
        self.identity = Some(identity);
    }

    pub fn disconnect(&mut self) {
        self.identity = None;
        self.accounts.clear();
        self.selection.clear();
        // outstanding scans can no longer apply
        self.scan_seq += 1;
    }

    pub fn begin_scan(&mut self) -> Result<ScanTicket, ReclaimError> {
        let identity = self.identity.ok_or(ReclaimError::NotConnected)?;
        self.scan_seq += 1;
        self.pending_scans += 1;
        self.error_message = None;
        Ok(ScanTicket {
            seq: self.scan_seq,
            identity,
        })
    }

    /// Applies a scan result if `ticket` is still the latest. Returns whether it was applied.
    pub fn finish_scan(
        &mut self,
        ticket: ScanTicket,
        result: Result<Vec<EmptyAccount>, ReclaimError>,
    ) -> bool {
        self.pending_scans = self.pending_scans.saturating_sub(1);
        if ticket.seq != self.scan_seq || self.identity != Some(ticket.identity) {
            return false;
        }
        match result {
            Ok(accounts) => {
                self.selection.retain(&accounts);
                self.accounts = accounts;
            }
            Err(err) => self.error_message = Some(err.to_string()),
        }
        true
    }

    /// Selects or deselects an account from the current snapshot.
    pub fn toggle(&mut self, address: Pubkey) -> Result<bool, ReclaimError> {
        if !self.accounts.iter().any(|account| account.address == address) {
            return Err(ReclaimError::InvalidRequest(format!(
                "Account {} is not in the latest scan",
                address
            )));
        }
        Ok(self.selection.toggle(address))
    }

    pub fn begin_close(&mut self) -> Result<CloseRequest, ReclaimError> {
        if self.close_in_flight {
            let err = ReclaimError::InvalidRequest(CLOSE_IN_FLIGHT.to_string());
            self.error_message = Some(err.to_string());
            return Err(err);
        }
        let identity = match self.identity {
            Some(identity) if !self.selection.is_empty() => identity,
            _ => {
                let err = ReclaimError::select_accounts_first();
                self.error_message = Some(err.to_string());
                return Err(err);
            }
        };
        let accounts = self
            .selection
            .iter()
            .filter_map(|address| {
                self.accounts
                    .iter()
                    .find(|account| account.address == *address)
                    .cloned()
            })
            .collect();
        self.close_in_flight = true;
        self.error_message = None;
        self.success_message = None;
        Ok(CloseRequest { identity, accounts })
    }

    pub fn finish_close(&mut self, result: &Result<ClosureResult, ReclaimError>) {
        self.close_in_flight = false;
        match result {
            Ok(closed) => {
                self.success_message = Some(closed.summary());
                self.selection.clear();
            }
            Err(err) => self.error_message = Some(err.to_string()),
        }
    }

    /// Records a failure that happened outside a scan or close.
    pub fn report_error(&mut self, err: &ReclaimError) {
        self.error_message = Some(err.to_string());
    }

    pub fn dismiss_error(&mut self) {
        self.error_message = None;
    }

    pub fn dismiss_success(&mut self) {
        self.success_message = None;
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::error::SELECT_ACCOUNTS_FIRST;
    use crate::instructions::utils::lamports_to_sol;
    use solana_sdk::signature::Signature;

    fn empty_account() -> EmptyAccount {
        EmptyAccount {
            address: Pubkey::new_unique(),
            mint: Pubkey::new_unique(),
            token_program: spl_token::id(),
        }
    }

    fn scanned_session(accounts: &[EmptyAccount]) -> Session {
        let mut session = Session::new();
        session.connect(Pubkey::new_unique());
        let ticket = session.begin_scan().unwrap();
        assert!(session.finish_scan(ticket, Ok(accounts.to_vec())));
        session
    }

    #[test]
    fn scan_requires_identity() {
        let mut session = Session::new();
        assert_eq!(session.begin_scan(), Err(ReclaimError::NotConnected));
        assert!(!session.is_loading());
    }

    #[test]
    fn latest_scan_wins() {
        let mut session = Session::new();
        session.connect(Pubkey::new_unique());
        let first = session.begin_scan().unwrap();
        let second = session.begin_scan().unwrap();
        assert!(session.is_loading());

        let fresh = vec![empty_account()];
        assert!(session.finish_scan(second, Ok(fresh.clone())));
        assert!(!session.finish_scan(first, Ok(vec![empty_account(), empty_account()])));
        assert_eq!(session.accounts(), &fresh[..]);
        assert!(!session.is_loading());
    }

    #[test]
    fn disconnect_discards_in_flight_scan() {
        let mut session = Session::new();
        session.connect(Pubkey::new_unique());
        let ticket = session.begin_scan().unwrap();
        session.disconnect();
        assert!(!session.finish_scan(ticket, Ok(vec![empty_account()])));
        assert!(session.accounts().is_empty());
        assert!(session.identity().is_none());
    }

    #[test]
    fn failed_scan_keeps_snapshot() {
        let accounts = vec![empty_account()];
        let mut session = scanned_session(&accounts);
        let ticket = session.begin_scan().unwrap();
        session.finish_scan(ticket, Err(ReclaimError::NetworkError("503".to_string())));
        assert_eq!(session.accounts(), &accounts[..]);
        assert_eq!(session.error_message(), Some("Failed to fetch accounts: 503"));
        session.dismiss_error();
        assert_eq!(session.error_message(), None);
    }

    #[test]
    fn refresh_prunes_selection() {
        let accounts = vec![empty_account(), empty_account()];
        let mut session = scanned_session(&accounts);
        session.toggle(accounts[0].address).unwrap();
        session.toggle(accounts[1].address).unwrap();

        let ticket = session.begin_scan().unwrap();
        session.finish_scan(ticket, Ok(vec![accounts[1].clone()]));
        assert_eq!(session.selection().len(), 1);
        assert!(session.selection().contains(&accounts[1].address));
    }

    #[test]
    fn toggle_rejects_unknown_account() {
        let mut session = scanned_session(&[empty_account()]);
        let err = session.toggle(Pubkey::new_unique()).unwrap_err();
        assert!(matches!(err, ReclaimError::InvalidRequest(_)));
        assert!(session.selection().is_empty());
    }

    #[test]
    fn close_requires_selection() {
        let mut session = scanned_session(&[empty_account()]);
        assert_eq!(
            session.begin_close(),
            Err(ReclaimError::select_accounts_first())
        );
        assert_eq!(session.error_message(), Some(SELECT_ACCOUNTS_FIRST));
        assert!(!session.is_loading());
    }

    #[test]
    fn second_close_rejected_while_in_flight() {
        let accounts = vec![empty_account(), empty_account()];
        let mut session = scanned_session(&accounts);
        session.toggle(accounts[1].address).unwrap();
        session.toggle(accounts[0].address).unwrap();

        let request = session.begin_close().unwrap();
        assert_eq!(request.accounts, vec![accounts[1].clone(), accounts[0].clone()]);
        assert!(session.is_loading());
        assert_eq!(
            session.begin_close(),
            Err(ReclaimError::InvalidRequest(CLOSE_IN_FLIGHT.to_string()))
        );
        assert_eq!(session.error_message(), Some(CLOSE_IN_FLIGHT));

        session.finish_close(&Err(ReclaimError::UserRejected));
        assert!(!session.is_loading());
        assert_eq!(session.selection().len(), 2);
        assert_eq!(
            session.error_message(),
            Some("Transaction was rejected in your wallet. Please try again.")
        );
    }

    #[test]
    fn reported_error_is_shown() {
        let mut session = Session::new();
        session.report_error(&ReclaimError::ConnectFailed("wallet locked".to_string()));
        assert_eq!(
            session.error_message(),
            Some("Failed to connect wallet: wallet locked")
        );
    }

    #[test]
    fn successful_close_clears_selection() {
        let accounts = vec![empty_account()];
        let mut session = scanned_session(&accounts);
        session.toggle(accounts[0].address).unwrap();
        session.begin_close().unwrap();

        session.finish_close(&Ok(ClosureResult {
            signature: Signature::default(),
            accounts_closed: 1,
            reclaimed: lamports_to_sol(2_039_280),
        }));
        assert!(session.selection().is_empty());
        assert_eq!(
            session.success_message(),
            Some("Successfully closed 1 accounts! Reclaimed approximately 0.002039 SOL")
        );
        session.dismiss_success();
        assert_eq!(session.success_message(), None);
    }
}
