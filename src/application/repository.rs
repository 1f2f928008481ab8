use crate::domain::account::{Account, AccountId};
use crate::domain::ports::SnapshotStore;
use crate::domain::transaction::Transaction;
use crate::error::{LedgerError, Result};
use std::sync::Arc;

/// Gate-free read path over the snapshot store.
///
/// Reads call [`SnapshotStore::load`] directly and never serialize against
/// writers: the store's atomic replace guarantees every load observes a
/// fully-written snapshot. The result may be stale by the time the caller
/// acts on it; this service offers no read-then-write atomicity across calls.
pub struct AccountRepository<S: SnapshotStore> {
    store: Arc<S>,
}

impl<S: SnapshotStore> AccountRepository<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Looks up a single account; `None` if no such account exists.
    pub async fn get_account(&self, id: AccountId) -> Result<Option<Account>> {
        let snapshot = self.store.load().await?;
        Ok(snapshot.account(id).cloned())
    }

    /// Returns the account's transactions in stored (chronological) order.
    pub async fn get_statement(&self, id: AccountId) -> Result<Vec<Transaction>> {
        let snapshot = self.store.load().await?;
        let account = snapshot.account(id).ok_or(LedgerError::NotFound(id))?;
        Ok(account.transactions.clone())
    }
}
