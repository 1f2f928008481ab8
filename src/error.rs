use crate::domain::account::{AccountId, TaxId};
use rust_decimal::Decimal;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, LedgerError>;

/// Every way a ledger operation can fail.
///
/// All variants are fatal to the operation that raised them but never to the
/// process: the caller gets a typed failure and may retry.
#[derive(Error, Debug)]
pub enum LedgerError {
    #[error("validation error: {0}")]
    Validation(String),
    #[error("account {0} not found")]
    NotFound(AccountId),
    #[error("tax id {0} is already registered")]
    DuplicateTaxId(TaxId),
    #[error("amount must be positive, got {0}")]
    InvalidAmount(Decimal),
    #[error("amount {amount} exceeds the per-transaction maximum of {max}")]
    AmountTooLarge { amount: Decimal, max: Decimal },
    #[error("deposit would raise the balance above {max} (current balance {balance})")]
    OverflowLimit { balance: Decimal, max: Decimal },
    #[error("insufficient funds: requested {requested}, available {available}")]
    InsufficientFunds {
        requested: Decimal,
        available: Decimal,
    },
    #[error("data file is corrupted: {0}")]
    Corrupted(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}
