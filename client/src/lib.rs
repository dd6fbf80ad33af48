//! Finds empty SPL token accounts owned by a wallet and closes them in one
//! transaction to reclaim their rent.
pub mod config;
pub mod error;
pub mod executor;
pub mod instructions;
pub mod ledger;
pub mod reclaimer;
pub mod scanner;
pub mod selection;
pub mod session;
pub mod wallet;

#[cfg(test)]
pub(crate) mod mock;

pub use config::{load_cfg, ClientConfig, ReclaimSettings};
pub use error::ReclaimError;
pub use executor::ClosureResult;
pub use ledger::{BalanceChanges, LedgerClient, RawTokenAccount};
pub use reclaimer::Reclaimer;
pub use scanner::EmptyAccount;
pub use selection::Selection;
pub use session::Session;
pub use wallet::{KeypairWallet, SendOptions, WalletConnector};
