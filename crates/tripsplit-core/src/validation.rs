//! # Validation Module
//!
//! Shared checks used by the split calculator and at the input boundary.
//!
//! ## Validation Order
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Expense Validation                                 │
//! │                                                                         │
//! │  validate_expense()                                                    │
//! │  ├── id / trip_id / paid_by present      → Required                    │
//! │  ├── amount > 0                          → NonPositiveTotal            │
//! │  ├── currency is 3 ASCII letters         → InvalidCurrency             │
//! │  └── ensure_unique_expenses() (per set)  → DuplicateExpense            │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Split directive checks (before any arithmetic)                        │
//! │  ├── ensure_non_empty()                  → EmptySplitSet               │
//! │  ├── ensure_unique_participants()        → DuplicateParticipant        │
//! │  └── ensure_non_negative()               → NegativeAmount              │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Sum checks (split.rs)                                                 │
//! │  ├── within_tolerance()                  → SplitSumMismatch            │
//! │  └── within_tolerance()                  → PercentageSumInvalid        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::collections::BTreeSet;

use crate::error::{SplitError, SplitResult, ValidationError};
use crate::money::Money;
use crate::types::{Currency, Expense, ParticipantId};

/// Result type for field validation.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Expense Field Validators
// =============================================================================

/// Validates the fields of an expense that the engine depends on.
///
/// The split directive is checked separately by the calculator.
pub fn validate_expense(expense: &Expense) -> ValidationResult<()> {
    require("id", &expense.id)?;
    require("tripId", &expense.trip_id)?;
    require("paidBy", expense.paid_by.as_str())?;
    validate_total(expense.amount)?;
    validate_currency(&expense.currency)?;
    Ok(())
}

/// Validates an expense total.
///
/// ## Example
/// ```rust
/// use tripsplit_core::money::Money;
/// use tripsplit_core::validation::validate_total;
///
/// assert!(validate_total(Money::from_minor(1)).is_ok());
/// assert!(validate_total(Money::zero()).is_err());
/// ```
pub fn validate_total(amount: Money) -> ValidationResult<()> {
    if !amount.is_positive() {
        return Err(ValidationError::NonPositiveTotal { amount });
    }
    Ok(())
}

/// Validates a currency code: exactly three uppercase ASCII letters.
///
/// ## Example
/// ```rust
/// use tripsplit_core::types::Currency;
/// use tripsplit_core::validation::validate_currency;
///
/// assert!(validate_currency(&Currency::new("usd")).is_ok());
/// assert!(validate_currency(&Currency::new("US")).is_err());
/// ```
pub fn validate_currency(currency: &Currency) -> ValidationResult<()> {
    let code = currency.code();
    if code.len() != 3 || !code.chars().all(|c| c.is_ascii_uppercase()) {
        return Err(ValidationError::InvalidCurrency {
            code: code.to_string(),
        });
    }
    Ok(())
}

fn require(field: &str, value: &str) -> ValidationResult<()> {
    if value.trim().is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }
    Ok(())
}

/// Fails on the first expense id seen twice.
///
/// Splits are matched to expenses by id, so a repeated id would hand one
/// expense's shares to the other.
pub fn ensure_unique_expenses(expenses: &[Expense]) -> ValidationResult<()> {
    let mut seen = BTreeSet::new();
    for expense in expenses {
        if !seen.insert(expense.id.as_str()) {
            return Err(ValidationError::DuplicateExpense {
                expense_id: expense.id.clone(),
            });
        }
    }
    Ok(())
}

// =============================================================================
// Split Directive Checks
// =============================================================================

/// Fails with `EmptySplitSet` when a directive names nobody.
pub fn ensure_non_empty<T>(entries: &[T]) -> SplitResult<()> {
    if entries.is_empty() {
        return Err(SplitError::EmptySplitSet);
    }
    Ok(())
}

/// Fails on the first participant listed twice.
pub fn ensure_unique_participants<'a, I>(participants: I) -> SplitResult<()>
where
    I: IntoIterator<Item = &'a ParticipantId>,
{
    let mut seen = BTreeSet::new();
    for participant in participants {
        if !seen.insert(participant) {
            return Err(SplitError::DuplicateParticipant {
                participant: participant.clone(),
            });
        }
    }
    Ok(())
}

/// Fails with `NegativeAmount` when `amount` is below zero.
pub fn ensure_non_negative(participant: &ParticipantId, amount: Money) -> SplitResult<()> {
    if amount.is_negative() {
        return Err(SplitError::NegativeAmount {
            participant: participant.clone(),
        });
    }
    Ok(())
}

// =============================================================================
// Rounding Helpers
// =============================================================================

/// `|actual - expected| <= tolerance`, on i128 so extreme inputs can't wrap.
#[inline]
pub fn within_tolerance(actual: i128, expected: i128, tolerance: i128) -> bool {
    (actual - expected).abs() <= tolerance
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SplitDirective;

    fn expense() -> Expense {
        Expense {
            id: "exp-1".to_string(),
            trip_id: "trip-1".to_string(),
            amount: Money::from_minor(1000),
            currency: Currency::new("USD"),
            paid_by: "u1".into(),
            split: SplitDirective::None,
            description: None,
            category: Default::default(),
            incurred_at: None,
            deleted: false,
        }
    }

    #[test]
    fn test_validate_expense() {
        assert!(validate_expense(&expense()).is_ok());

        let mut missing_payer = expense();
        missing_payer.paid_by = "  ".into();
        assert_eq!(
            validate_expense(&missing_payer),
            Err(ValidationError::Required {
                field: "paidBy".to_string()
            })
        );

        let mut free = expense();
        free.amount = Money::zero();
        assert!(matches!(
            validate_expense(&free),
            Err(ValidationError::NonPositiveTotal { .. })
        ));
    }

    #[test]
    fn test_validate_currency() {
        assert!(validate_currency(&Currency::new("EUR")).is_ok());
        assert!(validate_currency(&Currency::new("eur")).is_ok());
        assert!(validate_currency(&Currency::new("EURO")).is_err());
        assert!(validate_currency(&Currency::new("E1R")).is_err());
        assert!(validate_currency(&Currency::new("")).is_err());
    }

    #[test]
    fn test_ensure_unique_expenses() {
        let mut second = expense();
        second.id = "exp-2".to_string();
        assert!(ensure_unique_expenses(&[expense(), second]).is_ok());

        assert_eq!(
            ensure_unique_expenses(&[expense(), expense()]),
            Err(ValidationError::DuplicateExpense {
                expense_id: "exp-1".to_string()
            })
        );
    }

    #[test]
    fn test_ensure_unique_participants() {
        let ids: Vec<ParticipantId> = vec!["a".into(), "b".into(), "a".into()];
        assert_eq!(
            ensure_unique_participants(&ids),
            Err(SplitError::DuplicateParticipant {
                participant: "a".into()
            })
        );
        assert!(ensure_unique_participants(&ids[..2]).is_ok());
    }

    #[test]
    fn test_ensure_non_negative() {
        let p: ParticipantId = "u1".into();
        assert!(ensure_non_negative(&p, Money::zero()).is_ok());
        assert!(ensure_non_negative(&p, Money::from_minor(-1)).is_err());
    }

    #[test]
    fn test_within_tolerance() {
        assert!(within_tolerance(10_001, 10_000, 1));
        assert!(within_tolerance(9_999, 10_000, 1));
        assert!(!within_tolerance(9_998, 10_000, 1));
        assert!(within_tolerance(5, 5, 0));
        assert!(!within_tolerance(4, 5, 0));
    }
}
