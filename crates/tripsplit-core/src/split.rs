//! # Split Calculator
//!
//! Turns one expense total plus a [`SplitDirective`] into concrete
//! per-participant amounts.
//!
//! ## Policies
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Directive          Share per participant         Remainder              │
//! │  ─────────────────  ────────────────────────────  ─────────────────────  │
//! │  NONE               (no shares)                   payer bears all        │
//! │  EQUAL(n)           floor(total / n)              total mod n → payer    │
//! │  CUSTOM_AMOUNT      as given                      must match total       │
//! │  CUSTOM_PERCENTAGE  floor(total × pct / 100)      leftover → payer       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Remainders are never handed out to a participant. The aggregator books
//! whatever the shares don't cover back to the payer, so a 1000 split three
//! ways charges 333 each and the payer quietly absorbs the extra cent.
//!
//! ## Example
//! ```rust
//! use tripsplit_core::money::Money;
//! use tripsplit_core::split::resolve;
//! use tripsplit_core::types::SplitDirective;
//!
//! let directive = SplitDirective::Equal(vec!["a".into(), "b".into(), "c".into()]);
//! let shares = resolve(Money::from_minor(1000), &directive).unwrap();
//! let amounts: Vec<i64> = shares.iter().map(|s| s.amount.minor()).collect();
//! assert_eq!(amounts, vec![333, 333, 333]);
//! ```

use tracing::debug;

use crate::error::{CoreError, CoreResult, SplitError, SplitResult, ValidationError};
use crate::money::Money;
use crate::types::{
    AmountShare, Expense, ParticipantId, Percentage, PercentageShare, ResolvedSplit, Share,
    SplitDirective,
};
use crate::validation::{
    ensure_non_empty, ensure_non_negative, ensure_unique_expenses, ensure_unique_participants,
    validate_expense, within_tolerance,
};
use crate::{DEFAULT_AMOUNT_TOLERANCE, DEFAULT_PERCENT_TOLERANCE_BPS};

// =============================================================================
// Calculator
// =============================================================================

/// Resolves split directives into amounts.
///
/// Holds only the sum-check tolerances, so one instance can be shared
/// freely across threads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SplitCalculator {
    /// Allowed `|sum(amounts) - total|` for custom amount splits.
    amount_tolerance: Money,
    /// Allowed `|sum(percentages) - 100%|` in basis points.
    percent_tolerance_bps: u32,
}

impl Default for SplitCalculator {
    fn default() -> Self {
        SplitCalculator {
            amount_tolerance: DEFAULT_AMOUNT_TOLERANCE,
            percent_tolerance_bps: DEFAULT_PERCENT_TOLERANCE_BPS,
        }
    }
}

impl SplitCalculator {
    pub fn new(amount_tolerance: Money, percent_tolerance_bps: u32) -> Self {
        SplitCalculator {
            amount_tolerance: amount_tolerance.abs(),
            percent_tolerance_bps,
        }
    }

    pub fn amount_tolerance(&self) -> Money {
        self.amount_tolerance
    }

    pub fn percent_tolerance_bps(&self) -> u32 {
        self.percent_tolerance_bps
    }

    /// Resolves `directive` against `total`.
    ///
    /// Shares come back in directive order. Structural checks (empty set,
    /// duplicates, negative entries) run before any arithmetic.
    pub fn resolve(&self, total: Money, directive: &SplitDirective) -> SplitResult<Vec<Share>> {
        match directive {
            SplitDirective::None => Ok(Vec::new()),
            SplitDirective::Equal(participants) => self.resolve_equal(total, participants),
            SplitDirective::CustomAmount(shares) => self.resolve_amounts(total, shares),
            SplitDirective::CustomPercentage(shares) => self.resolve_percentages(total, shares),
        }
    }

    /// Validates `expense` and resolves its directive into [`ResolvedSplit`]s.
    ///
    /// Errors carry the expense id so callers can point at the offending
    /// record.
    pub fn resolve_expense(&self, expense: &Expense) -> CoreResult<Vec<ResolvedSplit>> {
        validate_expense(expense).map_err(|source| CoreError::InvalidExpense {
            expense_id: expense.id.clone(),
            source,
        })?;

        let shares =
            self.resolve(expense.amount, &expense.split)
                .map_err(|source| CoreError::InvalidSplit {
                    expense_id: expense.id.clone(),
                    source,
                })?;

        debug!(
            expense_id = %expense.id,
            kind = expense.split.kind_name(),
            shares = shares.len(),
            "Resolved expense split"
        );

        Ok(shares
            .into_iter()
            .map(|share| ResolvedSplit {
                expense_id: expense.id.clone(),
                participant_id: share.participant_id,
                amount: share.amount,
            })
            .collect())
    }

    fn resolve_equal(&self, total: Money, participants: &[ParticipantId]) -> SplitResult<Vec<Share>> {
        ensure_non_empty(participants)?;
        ensure_unique_participants(participants)?;

        let (share, _remainder) = total.split_evenly(participants.len());
        Ok(participants
            .iter()
            .map(|participant| Share {
                participant_id: participant.clone(),
                amount: share,
            })
            .collect())
    }

    fn resolve_amounts(&self, total: Money, shares: &[AmountShare]) -> SplitResult<Vec<Share>> {
        ensure_non_empty(shares)?;
        ensure_unique_participants(shares.iter().map(|s| &s.participant_id))?;
        for share in shares {
            ensure_non_negative(&share.participant_id, share.amount)?;
        }

        let sum: i128 = shares.iter().map(|s| s.amount.minor() as i128).sum();
        let expected = total.minor() as i128;
        if !within_tolerance(sum, expected, self.amount_tolerance.minor() as i128) {
            return Err(SplitError::SplitSumMismatch {
                difference: Money::from_minor((expected - sum) as i64),
            });
        }

        Ok(shares
            .iter()
            .map(|s| Share {
                participant_id: s.participant_id.clone(),
                amount: s.amount,
            })
            .collect())
    }

    fn resolve_percentages(
        &self,
        total: Money,
        shares: &[PercentageShare],
    ) -> SplitResult<Vec<Share>> {
        ensure_non_empty(shares)?;
        ensure_unique_participants(shares.iter().map(|s| &s.participant_id))?;

        let sum: i128 = shares.iter().map(|s| s.percentage.bps() as i128).sum();
        let expected = Percentage::HUNDRED.bps() as i128;
        if !within_tolerance(sum, expected, self.percent_tolerance_bps as i128) {
            let actual = Percentage::from_bps(sum.min(u32::MAX as i128) as u32);
            return Err(SplitError::PercentageSumInvalid { actual });
        }

        Ok(shares
            .iter()
            .map(|s| Share {
                participant_id: s.participant_id.clone(),
                amount: total.percentage_of(s.percentage),
            })
            .collect())
    }
}

// =============================================================================
// Free Functions
// =============================================================================

/// Resolves `directive` against `total` with the default tolerances.
pub fn resolve(total: Money, directive: &SplitDirective) -> SplitResult<Vec<Share>> {
    SplitCalculator::default().resolve(total, directive)
}

/// Validates and resolves one expense with the default tolerances.
pub fn resolve_expense(expense: &Expense) -> CoreResult<Vec<ResolvedSplit>> {
    SplitCalculator::default().resolve_expense(expense)
}

/// Resolves every expense, stopping at the first failure.
///
/// Expense ids must be unique across `expenses`: the aggregator matches
/// splits back to expenses by id.
pub fn resolve_all(
    calculator: &SplitCalculator,
    expenses: &[Expense],
) -> CoreResult<Vec<ResolvedSplit>> {
    ensure_unique_expenses(expenses).map_err(|source| {
        let expense_id = match &source {
            ValidationError::DuplicateExpense { expense_id } => expense_id.clone(),
            _ => String::new(),
        };
        CoreError::InvalidExpense { expense_id, source }
    })?;

    let mut resolved = Vec::new();
    for expense in expenses {
        resolved.extend(calculator.resolve_expense(expense)?);
    }
    Ok(resolved)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Currency;
    use rstest::rstest;

    fn ids(names: &[&str]) -> Vec<ParticipantId> {
        names.iter().map(|n| ParticipantId::from(*n)).collect()
    }

    fn amounts(entries: &[(&str, i64)]) -> SplitDirective {
        SplitDirective::CustomAmount(
            entries
                .iter()
                .map(|(p, a)| AmountShare {
                    participant_id: (*p).into(),
                    amount: Money::from_minor(*a),
                })
                .collect(),
        )
    }

    fn percentages(entries: &[(&str, u32)]) -> SplitDirective {
        SplitDirective::CustomPercentage(
            entries
                .iter()
                .map(|(p, bps)| PercentageShare {
                    participant_id: (*p).into(),
                    percentage: Percentage::from_bps(*bps),
                })
                .collect(),
        )
    }

    fn minor(shares: &[Share]) -> Vec<i64> {
        shares.iter().map(|s| s.amount.minor()).collect()
    }

    #[test]
    fn test_none_produces_no_shares() {
        let shares = resolve(Money::from_minor(5000), &SplitDirective::None).unwrap();
        assert!(shares.is_empty());
    }

    #[rstest]
    #[case::even(3000, 3, vec![1000, 1000, 1000])]
    #[case::one_cent_left(1000, 3, vec![333, 333, 333])]
    #[case::single(999, 1, vec![999])]
    #[case::less_than_one_each(2, 3, vec![0, 0, 0])]
    fn test_equal_split(#[case] total: i64, #[case] n: usize, #[case] expected: Vec<i64>) {
        let names: Vec<String> = (0..n).map(|i| format!("u{}", i)).collect();
        let directive = SplitDirective::Equal(names.into_iter().map(ParticipantId::from).collect());
        let shares = resolve(Money::from_minor(total), &directive).unwrap();
        assert_eq!(minor(&shares), expected);
    }

    #[test]
    fn test_equal_split_keeps_directive_order() {
        let directive = SplitDirective::Equal(ids(&["zed", "amy"]));
        let shares = resolve(Money::from_minor(100), &directive).unwrap();
        assert_eq!(shares[0].participant_id.as_str(), "zed");
        assert_eq!(shares[1].participant_id.as_str(), "amy");
    }

    #[test]
    fn test_equal_split_rejects_empty_and_duplicates() {
        assert_eq!(
            resolve(Money::from_minor(100), &SplitDirective::Equal(vec![])),
            Err(SplitError::EmptySplitSet)
        );
        assert_eq!(
            resolve(Money::from_minor(100), &SplitDirective::Equal(ids(&["a", "a"]))),
            Err(SplitError::DuplicateParticipant {
                participant: "a".into()
            })
        );
    }

    #[test]
    fn test_custom_amount_exact_match() {
        let shares = resolve(Money::from_minor(1000), &amounts(&[("u1", 600), ("u2", 400)])).unwrap();
        assert_eq!(minor(&shares), vec![600, 400]);
    }

    #[test]
    fn test_custom_amount_off_by_one_cent_is_rejected() {
        let err = resolve(Money::from_minor(1000), &amounts(&[("u1", 500), ("u2", 499)])).unwrap_err();
        assert_eq!(
            err,
            SplitError::SplitSumMismatch {
                difference: Money::from_minor(1)
            }
        );
    }

    #[test]
    fn test_custom_amount_difference_is_signed() {
        let err = resolve(Money::from_minor(1000), &amounts(&[("u1", 700), ("u2", 400)])).unwrap_err();
        assert_eq!(
            err,
            SplitError::SplitSumMismatch {
                difference: Money::from_minor(-100)
            }
        );
    }

    #[test]
    fn test_custom_amount_tolerance_is_configurable() {
        let lenient = SplitCalculator::new(Money::from_minor(1), DEFAULT_PERCENT_TOLERANCE_BPS);
        let shares = lenient
            .resolve(Money::from_minor(1000), &amounts(&[("u1", 500), ("u2", 499)]))
            .unwrap();
        assert_eq!(minor(&shares), vec![500, 499]);

        assert!(lenient
            .resolve(Money::from_minor(1000), &amounts(&[("u1", 500), ("u2", 498)]))
            .is_err());
    }

    #[test]
    fn test_custom_amount_negative_entry() {
        let err = resolve(Money::from_minor(1000), &amounts(&[("u1", 1100), ("u2", -100)])).unwrap_err();
        assert_eq!(
            err,
            SplitError::NegativeAmount {
                participant: "u2".into()
            }
        );
    }

    #[test]
    fn test_custom_amount_empty() {
        assert_eq!(
            resolve(Money::from_minor(1000), &SplitDirective::CustomAmount(vec![])),
            Err(SplitError::EmptySplitSet)
        );
    }

    #[test]
    fn test_custom_percentage_floors_each_share() {
        let directive = percentages(&[("a", 3333), ("b", 3333), ("c", 3334)]);
        let shares = resolve(Money::from_minor(1000), &directive).unwrap();
        assert_eq!(minor(&shares), vec![333, 333, 333]);
    }

    #[test]
    fn test_custom_percentage_within_one_basis_point() {
        let directive = percentages(&[("a", 3333), ("b", 3333), ("c", 3333)]);
        let shares = resolve(Money::from_minor(9000), &directive).unwrap();
        assert_eq!(minor(&shares), vec![2999, 2999, 2999]);
    }

    #[test]
    fn test_custom_percentage_sum_invalid() {
        let directive = percentages(&[("a", 5000), ("b", 4000)]);
        assert_eq!(
            resolve(Money::from_minor(1000), &directive),
            Err(SplitError::PercentageSumInvalid {
                actual: Percentage::from_bps(9000)
            })
        );
    }

    #[test]
    fn test_custom_percentage_duplicate() {
        let directive = percentages(&[("a", 5000), ("a", 5000)]);
        assert!(matches!(
            resolve(Money::from_minor(1000), &directive),
            Err(SplitError::DuplicateParticipant { .. })
        ));
    }

    #[test]
    fn test_resolve_expense_attaches_ids() {
        let expense = Expense {
            id: "exp-1".to_string(),
            trip_id: "trip-1".to_string(),
            amount: Money::from_minor(3000),
            currency: Currency::new("USD"),
            paid_by: "a".into(),
            split: SplitDirective::Equal(ids(&["a", "b", "c"])),
            description: Some("Dinner".to_string()),
            category: Default::default(),
            incurred_at: None,
            deleted: false,
        };

        let resolved = resolve_expense(&expense).unwrap();
        assert_eq!(resolved.len(), 3);
        assert!(resolved.iter().all(|r| r.expense_id == "exp-1"));
        assert!(resolved.iter().all(|r| r.amount == Money::from_minor(1000)));
    }

    #[test]
    fn test_resolve_expense_wraps_errors() {
        let expense = Expense {
            id: "exp-2".to_string(),
            trip_id: "trip-1".to_string(),
            amount: Money::from_minor(1000),
            currency: Currency::new("USD"),
            paid_by: "a".into(),
            split: amounts(&[("u1", 500), ("u2", 499)]),
            description: None,
            category: Default::default(),
            incurred_at: None,
            deleted: false,
        };

        match resolve_expense(&expense) {
            Err(CoreError::InvalidSplit { expense_id, source }) => {
                assert_eq!(expense_id, "exp-2");
                assert_eq!(source.code(), "SPLIT_SUM_MISMATCH");
            }
            other => panic!("unexpected result: {:?}", other),
        }

        let mut negative_total = expense;
        negative_total.amount = Money::from_minor(-1);
        assert_eq!(
            resolve_expense(&negative_total).unwrap_err().code(),
            "NON_POSITIVE_TOTAL"
        );
    }
}
