use serde::Deserialize;
use thiserror::Error;

/// EIP-1193 code for "the user rejected the request".
pub const USER_REJECTED_CODE: i64 = 4001;

/// Error object returned by an EIP-1193 provider.
#[derive(Clone, Debug, PartialEq, Eq, Error, Deserialize)]
#[error("provider error {code}: {message}")]
pub struct ProviderError {
    pub code: i64,
    pub message: String,
}

impl ProviderError {
    pub fn new(code: i64, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn user_rejected() -> Self {
        Self::new(USER_REJECTED_CODE, "User rejected the request.")
    }
}

/// Why an amount typed by the user cannot be submitted.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum AmountError {
    #[error("no amount entered")]
    Empty,
    #[error("{0:?} is not a decimal number")]
    NotANumber(String),
    #[error("amount must be greater than zero")]
    NotPositive,
    #[error("more than {max} decimal places")]
    TooManyDecimals { max: usize },
    #[error("wei amounts must be whole numbers")]
    FractionalWei,
    #[error("amount does not fit in 256 bits")]
    Overflow,
    #[error("unknown unit {0:?}")]
    UnknownUnit(String),
}

/// Failures of the wallet session and contract calls.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum WalletError {
    /// No injected wallet in this browser.
    #[error("no injected wallet provider is available")]
    ProviderUnavailable,
    #[error("request rejected by user: {0}")]
    UserRejected(String),
    #[error("rpc failure: {0}")]
    RpcFailure(String),
    #[error("invalid amount: {0}")]
    InvalidInput(#[from] AmountError),
    #[error("malformed response: {0}")]
    Decode(String),
    #[error("transaction {0} reverted")]
    Reverted(String),
}

impl From<ProviderError> for WalletError {
    fn from(err: ProviderError) -> Self {
        if err.code == USER_REJECTED_CODE {
            WalletError::UserRejected(err.message)
        } else {
            WalletError::RpcFailure(err.to_string())
        }
    }
}

/// Invalid compile-time or query-string configuration.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("invalid contract address {0:?}")]
    InvalidContractAddress(String),
    #[error("unknown session policy {0:?}")]
    UnknownSessionPolicy(String),
    #[error("unknown locale {0:?}")]
    UnknownLocale(String),
    #[error("invalid poll interval {0:?}")]
    InvalidPollInterval(String),
}
