use solana_sdk::transaction::TransactionError;
use thiserror::Error;

/// Failures surfaced by the reclaim workflow.
///
/// The display text of every variant is what the front end shows to the user.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReclaimError {
    #[error("Connect a wallet first")]
    NotConnected,

    #[error("Failed to fetch accounts: {0}")]
    NetworkError(String),

    #[error("{0}")]
    InvalidRequest(String),

    #[error("Transaction was rejected in your wallet. Please try again.")]
    UserRejected,

    #[error("Wallet connection timed out. Please keep your wallet app open during the transaction.")]
    WalletTimeout,

    #[error("Transaction failed on blockchain: {0}")]
    OnChainFailure(TransactionError),

    #[error("Failed to close accounts: {0}. Please try again.")]
    SubmissionFailed(String),

    #[error("Failed to connect wallet: {0}")]
    ConnectFailed(String),
}

pub const SELECT_ACCOUNTS_FIRST: &str = "Please select accounts to close";
pub const CLOSE_IN_FLIGHT: &str = "A close transaction is already in progress";

impl ReclaimError {
    pub fn select_accounts_first() -> Self {
        ReclaimError::InvalidRequest(SELECT_ACCOUNTS_FIRST.to_string())
    }

    /// Maps a wallet or ledger failure message onto the user-facing taxonomy.
    pub fn classify(message: &str) -> Self {
        if message.contains("User rejected") {
            ReclaimError::UserRejected
        } else if message.contains("timeout") {
            ReclaimError::WalletTimeout
        } else {
            ReclaimError::SubmissionFailed(message.to_string())
        }
    }
}

impl ReclaimError {
    /// Classifies a wallet connect failure. Rejections and timeouts keep their
    /// own messages, anything else is a connect failure rather than a close failure.
    pub fn from_connect(err: anyhow::Error) -> Self {
        match ReclaimError::from(err) {
            ReclaimError::SubmissionFailed(message) => ReclaimError::ConnectFailed(message),
            other => other,
        }
    }
}

impl From<anyhow::Error> for ReclaimError {
    fn from(err: anyhow::Error) -> Self {
        ReclaimError::classify(&format!("{:#}", err))
    }
}
