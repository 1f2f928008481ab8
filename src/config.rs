use crate::domain::account::Amount;
use crate::error::{LedgerError, Result};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Monetary bounds applied by the engine and the store.
///
/// Both bounds are explicit configuration rather than constants scattered
/// through the operations: `max_amount` caps every single transaction, and
/// `max_balance` caps the balance a deposit may produce.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Limits {
    pub max_amount: Decimal,
    pub max_balance: Decimal,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_amount: dec!(1_000_000),
            max_balance: dec!(1_000_000_000_000),
        }
    }
}

impl Limits {
    /// Validates a raw transaction amount against positivity and the
    /// per-transaction cap, returning the typed `Amount` on success.
    pub fn check_amount(&self, amount: Decimal) -> Result<Amount> {
        let amount = Amount::new(amount)?;
        if amount.value() > self.max_amount {
            return Err(LedgerError::AmountTooLarge {
                amount: amount.value(),
                max: self.max_amount,
            });
        }
        Ok(amount)
    }
}
