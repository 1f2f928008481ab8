use crate::config::Limits;
use crate::domain::account::{Account, AccountId, TaxId};
use crate::error::{LedgerError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// The entire durable account collection at one instant.
///
/// This is the unit of atomic persistence: stores read and replace whole
/// snapshots, never individual accounts.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Snapshot {
    pub accounts: Vec<Account>,
}

impl Snapshot {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn account(&self, id: AccountId) -> Option<&Account> {
        self.accounts.iter().find(|a| a.id == id)
    }

    pub fn account_mut(&mut self, id: AccountId) -> Option<&mut Account> {
        self.accounts.iter_mut().find(|a| a.id == id)
    }

    pub fn tax_id_exists(&self, tax_id: &TaxId) -> bool {
        self.accounts.iter().any(|a| &a.tax_id == tax_id)
    }

    pub fn push(&mut self, account: Account) {
        self.accounts.push(account);
    }

    /// Structural and semantic validation of the whole collection.
    ///
    /// Field-level formats (name length, tax id pattern, balance sign, amount
    /// positivity) are already enforced by the typed constructors and their
    /// serde impls; this checks the cross-record invariants: unique account
    /// ids, unique tax ids, transaction amounts within the configured cap,
    /// and non-decreasing timestamps within each account's log.
    pub fn validate(&self, limits: &Limits) -> Result<()> {
        let mut ids = HashSet::new();
        let mut tax_ids = HashSet::new();
        for account in &self.accounts {
            if !ids.insert(account.id) {
                return Err(LedgerError::Validation(format!(
                    "duplicate account id: {}",
                    account.id
                )));
            }
            if !tax_ids.insert(&account.tax_id) {
                return Err(LedgerError::Validation(format!(
                    "duplicate tax id: {}",
                    account.tax_id
                )));
            }
            for pair in account.transactions.windows(2) {
                if pair[0].timestamp > pair[1].timestamp {
                    return Err(LedgerError::Validation(format!(
                        "account {} has out-of-order transaction timestamps",
                        account.id
                    )));
                }
            }
            for tx in &account.transactions {
                if tx.amount.value() > limits.max_amount {
                    return Err(LedgerError::Validation(format!(
                        "transaction {} exceeds the maximum amount of {}",
                        tx.id, limits.max_amount
                    )));
                }
            }
        }
        Ok(())
    }
}
