use crate::domain::account::Amount;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Unique identifier of a transaction, assigned at the moment the operation
/// is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TransactionId(Uuid);

impl TransactionId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for TransactionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Deposit,
    Withdraw,
}

/// An immutable record of one deposit or withdrawal.
///
/// Insertion order into an account's log is chronological and authoritative
/// for statements; timestamps are non-decreasing within one account but not
/// globally across accounts.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: TransactionId,
    pub kind: TransactionKind,
    pub amount: Amount,
    pub timestamp: DateTime<Utc>,
}

impl Transaction {
    pub fn new(kind: TransactionKind, amount: Amount, timestamp: DateTime<Utc>) -> Self {
        Self {
            id: TransactionId::generate(),
            kind,
            amount,
            timestamp,
        }
    }
}
