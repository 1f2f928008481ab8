use crate::domain::transaction::{Transaction, TransactionKind};
use crate::error::{LedgerError, Result};
use chrono::Utc;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::AddAssign;
use std::str::FromStr;
use uuid::Uuid;

/// Opaque unique identifier of an account, assigned at creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AccountId(Uuid);

impl AccountId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for AccountId {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self> {
        let id = Uuid::parse_str(s)
            .map_err(|_| LedgerError::Validation(format!("invalid account id: {s}")))?;
        Ok(Self(id))
    }
}

/// Human label for an account, 3 to 100 characters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AccountName(String);

impl AccountName {
    pub fn new(name: impl Into<String>) -> Result<Self> {
        let name = name.into();
        let len = name.chars().count();
        if !(3..=100).contains(&len) {
            return Err(LedgerError::Validation(
                "name must be between 3 and 100 characters long".to_string(),
            ));
        }
        Ok(Self(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for AccountName {
    type Error = LedgerError;

    fn try_from(value: String) -> Result<Self> {
        Self::new(value)
    }
}

impl From<AccountName> for String {
    fn from(name: AccountName) -> Self {
        name.0
    }
}

/// Externally-formatted identity string, `000.000.000-00`, unique across the
/// whole account collection.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TaxId(String);

impl TaxId {
    pub fn new(value: impl Into<String>) -> Result<Self> {
        let value = value.into();
        if !Self::is_well_formed(&value) {
            return Err(LedgerError::Validation(format!(
                "invalid tax id format: {value} (expected 000.000.000-00)"
            )));
        }
        Ok(Self(value))
    }

    fn is_well_formed(s: &str) -> bool {
        let bytes = s.as_bytes();
        bytes.len() == 14
            && bytes.iter().enumerate().all(|(i, b)| match i {
                3 | 7 => *b == b'.',
                11 => *b == b'-',
                _ => b.is_ascii_digit(),
            })
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for TaxId {
    type Error = LedgerError;

    fn try_from(value: String) -> Result<Self> {
        Self::new(value)
    }
}

impl From<TaxId> for String {
    fn from(tax_id: TaxId) -> Self {
        tax_id.0
    }
}

impl fmt::Display for TaxId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// A strictly positive monetary amount for a single transaction.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct Amount(Decimal);

impl Amount {
    pub fn new(value: Decimal) -> Result<Self> {
        if value > Decimal::ZERO {
            Ok(Self(value))
        } else {
            Err(LedgerError::InvalidAmount(value))
        }
    }

    pub fn value(&self) -> Decimal {
        self.0
    }
}

impl TryFrom<Decimal> for Amount {
    type Error = LedgerError;

    fn try_from(value: Decimal) -> Result<Self> {
        Self::new(value)
    }
}

impl From<Amount> for Decimal {
    fn from(amount: Amount) -> Self {
        amount.0
    }
}

/// A non-negative account balance.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct Balance(Decimal);

impl Balance {
    pub const ZERO: Self = Self(Decimal::ZERO);

    pub fn new(value: Decimal) -> Result<Self> {
        if value < Decimal::ZERO {
            return Err(LedgerError::Validation(
                "balance cannot be negative".to_string(),
            ));
        }
        Ok(Self(value))
    }

    pub fn value(&self) -> Decimal {
        self.0
    }
}

impl TryFrom<Decimal> for Balance {
    type Error = LedgerError;

    fn try_from(value: Decimal) -> Result<Self> {
        Self::new(value)
    }
}

impl From<Balance> for Decimal {
    fn from(balance: Balance) -> Self {
        balance.0
    }
}

impl AddAssign<Amount> for Balance {
    fn add_assign(&mut self, rhs: Amount) {
        self.0 += rhs.value();
    }
}

/// A holder of balance and transaction history.
///
/// Mutation goes through [`Account::deposit`] and [`Account::withdraw`] only,
/// which keep `balance` consistent with the transaction log and keep
/// timestamps non-decreasing within the log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    pub id: AccountId,
    pub name: AccountName,
    pub tax_id: TaxId,
    pub balance: Balance,
    pub transactions: Vec<Transaction>,
}

impl Account {
    /// Creates a new account with a fresh id and an empty transaction log.
    pub fn open(name: AccountName, tax_id: TaxId, initial_balance: Balance) -> Self {
        Self {
            id: AccountId::generate(),
            name,
            tax_id,
            balance: initial_balance,
            transactions: Vec::new(),
        }
    }

    /// Adds `amount` to the balance and appends a deposit transaction.
    ///
    /// Bound checks (per-transaction cap, balance overflow) are the engine's
    /// responsibility and must happen before calling this.
    pub fn deposit(&mut self, amount: Amount) {
        self.balance += amount;
        self.record(TransactionKind::Deposit, amount);
    }

    /// Subtracts `amount` from the balance if covered, appending a withdraw
    /// transaction. A balance below `amount` rejects with `InsufficientFunds`
    /// and leaves the account untouched.
    pub fn withdraw(&mut self, amount: Amount) -> Result<()> {
        if amount.value() > self.balance.value() {
            return Err(LedgerError::InsufficientFunds {
                requested: amount.value(),
                available: self.balance.value(),
            });
        }
        self.balance = Balance(self.balance.value() - amount.value());
        self.record(TransactionKind::Withdraw, amount);
        Ok(())
    }

    fn record(&mut self, kind: TransactionKind, amount: Amount) {
        let now = Utc::now();
        // Clamp against the previous entry so a wall-clock step backwards
        // cannot break the per-account timestamp ordering.
        let timestamp = match self.transactions.last() {
            Some(prev) if prev.timestamp > now => prev.timestamp,
            _ => now,
        };
        self.transactions.push(Transaction::new(kind, amount, timestamp));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn test_account() -> Account {
        Account::open(
            AccountName::new("Alice Doe").unwrap(),
            TaxId::new("123.456.789-00").unwrap(),
            Balance::new(dec!(100)).unwrap(),
        )
    }

    #[test]
    fn test_name_length_bounds() {
        assert!(AccountName::new("ab").is_err());
        assert!(AccountName::new("abc").is_ok());
        assert!(AccountName::new("x".repeat(100)).is_ok());
        assert!(AccountName::new("x".repeat(101)).is_err());
    }

    #[test]
    fn test_tax_id_format() {
        assert!(TaxId::new("123.456.789-00").is_ok());
        assert!(TaxId::new("12345678900").is_err());
        assert!(TaxId::new("123.456.789-0a").is_err());
        assert!(TaxId::new("123-456-789.00").is_err());
        assert!(TaxId::new("123.456.789-000").is_err());
    }

    #[test]
    fn test_amount_must_be_positive() {
        assert!(Amount::new(dec!(0.01)).is_ok());
        assert!(matches!(
            Amount::new(dec!(0)),
            Err(LedgerError::InvalidAmount(_))
        ));
        assert!(matches!(
            Amount::new(dec!(-1)),
            Err(LedgerError::InvalidAmount(_))
        ));
    }

    #[test]
    fn test_balance_rejects_negative() {
        assert!(Balance::new(dec!(0)).is_ok());
        assert!(Balance::new(dec!(-0.01)).is_err());
    }

    #[test]
    fn test_deposit_updates_balance_and_log() {
        let mut account = test_account();
        account.deposit(Amount::new(dec!(50)).unwrap());
        assert_eq!(account.balance.value(), dec!(150));
        assert_eq!(account.transactions.len(), 1);
        assert_eq!(account.transactions[0].kind, TransactionKind::Deposit);
        assert_eq!(account.transactions[0].amount.value(), dec!(50));
    }

    #[test]
    fn test_withdraw_insufficient_funds() {
        let mut account = test_account();
        let err = account.withdraw(Amount::new(dec!(100.01)).unwrap());
        assert!(matches!(err, Err(LedgerError::InsufficientFunds { .. })));
        assert_eq!(account.balance.value(), dec!(100));
        assert!(account.transactions.is_empty());
    }

    #[test]
    fn test_withdraw_exact_balance() {
        let mut account = test_account();
        account.withdraw(Amount::new(dec!(100)).unwrap()).unwrap();
        assert_eq!(account.balance, Balance::ZERO);
        assert_eq!(account.transactions.len(), 1);
    }

    #[test]
    fn test_timestamps_non_decreasing() {
        let mut account = test_account();
        account.deposit(Amount::new(dec!(1)).unwrap());
        account.deposit(Amount::new(dec!(2)).unwrap());
        account.withdraw(Amount::new(dec!(1)).unwrap()).unwrap();
        let stamps: Vec<_> = account.transactions.iter().map(|t| t.timestamp).collect();
        assert!(stamps.windows(2).all(|w| w[0] <= w[1]));
    }
}
