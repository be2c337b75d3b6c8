//! # Error Types
//!
//! Domain-specific error types for tripsplit-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  tripsplit-core errors (this file)                                     │
//! │  ├── SplitError       - Split directive / ledger failures              │
//! │  ├── ValidationError  - Malformed expense fields                       │
//! │  └── CoreError        - Either of the above, with expense context      │
//! │                                                                         │
//! │  tripsplit-service errors (separate crate)                             │
//! │  ├── RepositoryError  - Expense source failures                        │
//! │  └── ApiError         - What callers see (code + message)              │
//! │                                                                         │
//! │  Flow: SplitError → CoreError → ApiError → JSON                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every error here is returned as a value. None of them are retryable:
//! the same input always fails the same way.

use thiserror::Error;

use crate::money::Money;
use crate::types::{ParticipantId, Percentage};

// =============================================================================
// Split Error
// =============================================================================

/// Failures raised by the split calculator and the settlement planner.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SplitError {
    /// Custom amounts don't add up to the expense total.
    ///
    /// `difference` is `total - sum(amounts)`: positive when the entries
    /// fall short, negative when they overshoot.
    #[error("Split amounts do not match the expense total (difference {difference})")]
    SplitSumMismatch { difference: Money },

    /// Custom percentages don't add up to 100%.
    #[error("Split percentages sum to {actual}, expected 100.00%")]
    PercentageSumInvalid { actual: Percentage },

    /// Amount and percentage entries combined in one directive.
    #[error("A split cannot mix amount and percentage entries")]
    MixedSplitTypes,

    /// An equal or custom split names nobody.
    #[error("Split has no participants")]
    EmptySplitSet,

    /// A split entry is negative.
    #[error("Split entry for {participant} is negative")]
    NegativeAmount { participant: ParticipantId },

    /// The same participant appears twice in one directive.
    #[error("Participant {participant} appears more than once in the split")]
    DuplicateParticipant { participant: ParticipantId },

    /// Credits and debts don't cancel out.
    ///
    /// ## When This Occurs
    /// Never for balances built by the aggregator from validated splits.
    /// Seeing this means something upstream bypassed the split calculator
    /// or hand-built a balance map. It is a defect, not bad user input.
    #[error("Ledger is unbalanced: credits {credit} vs debts {debit}")]
    UnbalancedLedger { credit: Money, debit: Money },

    /// A settlement plan moves a different amount for `participant` than
    /// their balance. Reported as `UNBALANCED_LEDGER`; also a defect.
    #[error("Settlements move {planned} for {participant}, balance is {expected}")]
    PlanDrift {
        participant: ParticipantId,
        planned: Money,
        expected: Money,
    },
}

impl SplitError {
    /// Stable machine-readable code for this error kind.
    pub fn code(&self) -> &'static str {
        match self {
            SplitError::SplitSumMismatch { .. } => "SPLIT_SUM_MISMATCH",
            SplitError::PercentageSumInvalid { .. } => "PERCENTAGE_SUM_INVALID",
            SplitError::MixedSplitTypes => "MIXED_SPLIT_TYPES",
            SplitError::EmptySplitSet => "EMPTY_SPLIT_SET",
            SplitError::NegativeAmount { .. } => "NEGATIVE_AMOUNT",
            SplitError::DuplicateParticipant { .. } => "DUPLICATE_PARTICIPANT",
            SplitError::UnbalancedLedger { .. } | SplitError::PlanDrift { .. } => {
                "UNBALANCED_LEDGER"
            }
        }
    }

    /// True when the error signals a bug in the pipeline rather than bad
    /// input.
    pub fn is_defect(&self) -> bool {
        matches!(
            self,
            SplitError::UnbalancedLedger { .. } | SplitError::PlanDrift { .. }
        )
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// Expense field validation errors.
///
/// Checked before any split arithmetic runs.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Expense total is zero or negative.
    #[error("Expense total must be positive, got {amount}")]
    NonPositiveTotal { amount: Money },

    /// Currency code is not three ASCII letters.
    #[error("Invalid currency code '{code}'")]
    InvalidCurrency { code: String },

    /// Two expenses in one set share an id.
    #[error("Duplicate expense id {expense_id}")]
    DuplicateExpense { expense_id: String },
}

impl ValidationError {
    /// Stable machine-readable code for this error kind.
    pub fn code(&self) -> &'static str {
        match self {
            ValidationError::Required { .. } => "REQUIRED_FIELD",
            ValidationError::NonPositiveTotal { .. } => "NON_POSITIVE_TOTAL",
            ValidationError::InvalidCurrency { .. } => "INVALID_CURRENCY",
            ValidationError::DuplicateExpense { .. } => "DUPLICATE_EXPENSE",
        }
    }
}

// =============================================================================
// Core Error
// =============================================================================

/// Errors from resolving a whole expense or planning a trip.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    /// An expense's split directive failed validation.
    #[error("Expense {expense_id}: {source}")]
    InvalidSplit {
        expense_id: String,
        #[source]
        source: SplitError,
    },

    /// An expense field failed validation.
    #[error("Expense {expense_id}: {source}")]
    InvalidExpense {
        expense_id: String,
        #[source]
        source: ValidationError,
    },

    /// Split or planner error without expense context.
    #[error(transparent)]
    Split(#[from] SplitError),

    /// Validation error without expense context.
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

impl CoreError {
    /// Stable machine-readable code of the underlying failure.
    pub fn code(&self) -> &'static str {
        match self {
            CoreError::InvalidSplit { source, .. } | CoreError::Split(source) => source.code(),
            CoreError::InvalidExpense { source, .. } | CoreError::Validation(source) => {
                source.code()
            }
        }
    }

    /// True when the error signals a bug in the pipeline rather than bad
    /// input.
    pub fn is_defect(&self) -> bool {
        match self {
            CoreError::InvalidSplit { source, .. } | CoreError::Split(source) => {
                source.is_defect()
            }
            CoreError::InvalidExpense { .. } | CoreError::Validation(_) => false,
        }
    }
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Convenience type alias for Results with SplitError.
pub type SplitResult<T> = Result<T, SplitError>;

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
