use crate::application::repository::AccountRepository;
use crate::config::Limits;
use crate::domain::account::{Account, AccountId, AccountName, Balance, TaxId};
use crate::domain::ports::SnapshotStore;
use crate::domain::transaction::Transaction;
use crate::error::{LedgerError, Result};
use rust_decimal::Decimal;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::info;

/// The account-mutation engine.
///
/// Every mutating operation runs one load-mutate-save cycle against the
/// snapshot store while holding the gate, a process-wide mutex covering the
/// whole store. tokio's mutex queues waiters in FIFO order, so concurrent
/// operations compose into some total order and none starves. The gate spans
/// exactly the load-mutate-save sequence; amount validation happens before
/// acquiring it, and read-only operations bypass it entirely.
///
/// The gate deliberately covers the whole store rather than one account: the
/// durable layer replaces the full snapshot on every save, so per-account
/// locking would not be safe without a store that supports partial atomic
/// updates.
pub struct LedgerEngine<S: SnapshotStore> {
    store: Arc<S>,
    reads: AccountRepository<S>,
    limits: Limits,
    gate: Mutex<()>,
}

impl<S: SnapshotStore> LedgerEngine<S> {
    pub fn new(store: S, limits: Limits) -> Self {
        let store = Arc::new(store);
        Self {
            reads: AccountRepository::new(Arc::clone(&store)),
            store,
            limits,
            gate: Mutex::new(()),
        }
    }

    /// Opens a new account. `initial_balance` defaults to zero and must be
    /// non-negative. Rejects `DuplicateTaxId` if the tax id is already
    /// registered, leaving the store untouched.
    pub async fn create_account(
        &self,
        name: AccountName,
        tax_id: TaxId,
        initial_balance: Option<Decimal>,
    ) -> Result<Account> {
        let initial_balance = Balance::new(initial_balance.unwrap_or(Decimal::ZERO))?;

        let _gate = self.gate.lock().await;
        let mut snapshot = self.store.load().await?;
        if snapshot.tax_id_exists(&tax_id) {
            return Err(LedgerError::DuplicateTaxId(tax_id));
        }
        let account = Account::open(name, tax_id, initial_balance);
        snapshot.push(account.clone());
        self.store.save(&snapshot).await?;

        info!(account = %account.id, "account created");
        Ok(account)
    }

    /// Adds `amount` to the account's balance and records the transaction.
    /// Rejects `InvalidAmount` / `AmountTooLarge` before touching the store,
    /// `NotFound` for an unknown account, and `OverflowLimit` when the
    /// resulting balance would exceed the configured maximum.
    pub async fn deposit(&self, id: AccountId, amount: Decimal) -> Result<Account> {
        let amount = self.limits.check_amount(amount)?;

        let _gate = self.gate.lock().await;
        let mut snapshot = self.store.load().await?;
        let account = snapshot.account_mut(id).ok_or(LedgerError::NotFound(id))?;
        // checked_add: the stored balance may sit near Decimal::MAX, and the
        // guard must reject with a typed failure rather than panic there.
        match account.balance.value().checked_add(amount.value()) {
            Some(balance) if balance <= self.limits.max_balance => {}
            _ => {
                return Err(LedgerError::OverflowLimit {
                    balance: account.balance.value(),
                    max: self.limits.max_balance,
                });
            }
        }
        account.deposit(amount);
        let updated = account.clone();
        self.store.save(&snapshot).await?;

        info!(account = %id, amount = %amount.value(), "deposit applied");
        Ok(updated)
    }

    /// Subtracts `amount` from the account's balance and records the
    /// transaction. Rejects `InvalidAmount` / `AmountTooLarge` before
    /// touching the store, `NotFound` for an unknown account, and
    /// `InsufficientFunds` when the balance cannot cover the amount.
    pub async fn withdraw(&self, id: AccountId, amount: Decimal) -> Result<Account> {
        let amount = self.limits.check_amount(amount)?;

        let _gate = self.gate.lock().await;
        let mut snapshot = self.store.load().await?;
        let account = snapshot.account_mut(id).ok_or(LedgerError::NotFound(id))?;
        account.withdraw(amount)?;
        let updated = account.clone();
        self.store.save(&snapshot).await?;

        info!(account = %id, amount = %amount.value(), "withdrawal applied");
        Ok(updated)
    }

    /// Gate-free single-account lookup; see [`AccountRepository`].
    pub async fn get_account(&self, id: AccountId) -> Result<Option<Account>> {
        self.reads.get_account(id).await
    }

    /// Gate-free statement read; rejects `NotFound` for an unknown account.
    pub async fn get_statement(&self, id: AccountId) -> Result<Vec<Transaction>> {
        self.reads.get_statement(id).await
    }
}
