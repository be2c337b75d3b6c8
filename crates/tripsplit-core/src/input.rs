//! # Input Boundary
//!
//! Loosely-typed expense records as they arrive from a form or an HTTP
//! body, and their conversion into the strict [`SplitDirective`].
//!
//! ## Why a Separate Shape?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Incoming split entry (JSON):                                           │
//! │    { "participantId": "u1", "amount": 500 }                            │
//! │    { "participantId": "u2", "percentage": 50 }     ← mixed!            │
//! │                                                                         │
//! │  SplitInput ──TryFrom──► SplitDirective                                │
//! │                  │                                                      │
//! │                  └── MixedSplitTypes / EmptySplitSet / NegativeAmount   │
//! │                                                                         │
//! │  Past this point a mixed directive cannot be expressed at all.         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult, SplitError};
use crate::money::Money;
use crate::types::{
    AmountShare, Currency, Expense, ExpenseCategory, ParticipantId, Percentage, PercentageShare,
    SplitDirective,
};

// =============================================================================
// Input Types
// =============================================================================

/// Declared split kind. Optional on input; inferred from entries when absent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[ts(export)]
pub enum SplitKind {
    None,
    Equal,
    CustomAmount,
    CustomPercentage,
}

/// One loosely-typed split entry.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct SplitEntryInput {
    pub participant_id: String,
    /// Minor units.
    #[serde(default)]
    pub amount: Option<i64>,
    /// Decimal percentage, e.g. `33.33`.
    #[serde(default)]
    pub percentage: Option<f64>,
}

/// A loosely-typed split: an optional kind plus entries.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct SplitInput {
    #[serde(default, rename = "type")]
    pub kind: Option<SplitKind>,
    #[serde(default)]
    pub entries: Vec<SplitEntryInput>,
}

/// An expense record as received from the outside world.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ExpenseInput {
    pub id: String,
    pub trip_id: String,
    /// Total in minor units.
    pub amount: i64,
    pub currency: String,
    pub paid_by: String,
    #[serde(default)]
    pub split: SplitInput,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub category: ExpenseCategory,
    #[serde(default)]
    #[ts(as = "Option<String>")]
    pub incurred_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub deleted: bool,
}

// =============================================================================
// Conversion
// =============================================================================

/// What a single entry carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EntryShape {
    Bare,
    Amount,
    Percentage,
    Both,
}

fn shape(entry: &SplitEntryInput) -> EntryShape {
    match (entry.amount.is_some(), entry.percentage.is_some()) {
        (false, false) => EntryShape::Bare,
        (true, false) => EntryShape::Amount,
        (false, true) => EntryShape::Percentage,
        (true, true) => EntryShape::Both,
    }
}

/// Works out the kind from the entries when none was declared.
fn infer_kind(entries: &[SplitEntryInput]) -> Result<SplitKind, SplitError> {
    let Some(first) = entries.first() else {
        return Ok(SplitKind::None);
    };

    let first_shape = shape(first);
    if entries.iter().any(|e| shape(e) != first_shape) {
        return Err(SplitError::MixedSplitTypes);
    }

    match first_shape {
        EntryShape::Bare => Ok(SplitKind::Equal),
        EntryShape::Amount => Ok(SplitKind::CustomAmount),
        EntryShape::Percentage => Ok(SplitKind::CustomPercentage),
        EntryShape::Both => Err(SplitError::MixedSplitTypes),
    }
}

/// Every entry must have exactly `expected` shape.
fn require_shape(entries: &[SplitEntryInput], expected: EntryShape) -> Result<(), SplitError> {
    if entries.iter().all(|e| shape(e) == expected) {
        Ok(())
    } else {
        Err(SplitError::MixedSplitTypes)
    }
}

impl TryFrom<SplitInput> for SplitDirective {
    type Error = SplitError;

    /// ## Rules
    /// - no kind and no entries → `NONE`
    /// - no kind → inferred (bare ids → `EQUAL`, amounts → `CUSTOM_AMOUNT`,
    ///   percentages → `CUSTOM_PERCENTAGE`)
    /// - entries whose fields don't match the kind, or mix fields →
    ///   `MixedSplitTypes`
    /// - an explicit non-`NONE` kind with no entries → `EmptySplitSet`
    /// - negative amounts or percentages → `NegativeAmount`
    fn try_from(input: SplitInput) -> Result<Self, Self::Error> {
        let kind = match input.kind {
            Some(kind) => kind,
            None => infer_kind(&input.entries)?,
        };

        if kind != SplitKind::None && input.entries.is_empty() {
            return Err(SplitError::EmptySplitSet);
        }

        match kind {
            SplitKind::None => {
                if !input.entries.is_empty() {
                    return Err(SplitError::MixedSplitTypes);
                }
                Ok(SplitDirective::None)
            }
            SplitKind::Equal => {
                require_shape(&input.entries, EntryShape::Bare)?;
                Ok(SplitDirective::Equal(
                    input
                        .entries
                        .into_iter()
                        .map(|e| ParticipantId::new(e.participant_id))
                        .collect(),
                ))
            }
            SplitKind::CustomAmount => {
                require_shape(&input.entries, EntryShape::Amount)?;
                let shares = input
                    .entries
                    .into_iter()
                    .map(|e| {
                        let amount = Money::from_minor(e.amount.unwrap_or_default());
                        AmountShare {
                            participant_id: ParticipantId::new(e.participant_id),
                            amount,
                        }
                    })
                    .collect();
                Ok(SplitDirective::CustomAmount(shares))
            }
            SplitKind::CustomPercentage => {
                require_shape(&input.entries, EntryShape::Percentage)?;
                let mut shares = Vec::with_capacity(input.entries.len());
                for entry in input.entries {
                    let participant_id = ParticipantId::new(entry.participant_id);
                    let pct = entry.percentage.unwrap_or_default();
                    let percentage = match Percentage::from_percent(pct) {
                        Some(percentage) => percentage,
                        None if pct < 0.0 => {
                            return Err(SplitError::NegativeAmount {
                                participant: participant_id,
                            })
                        }
                        // Not representable in basis points.
                        None => {
                            return Err(SplitError::PercentageSumInvalid {
                                actual: Percentage::from_bps(u32::MAX),
                            })
                        }
                    };
                    shares.push(PercentageShare {
                        participant_id,
                        percentage,
                    });
                }
                Ok(SplitDirective::CustomPercentage(shares))
            }
        }
    }
}

impl ExpenseInput {
    /// Converts this record into a typed [`Expense`].
    ///
    /// Only the split shape is checked here; totals, currency format and
    /// split sums are checked by the calculator.
    pub fn into_expense(self) -> CoreResult<Expense> {
        let split =
            SplitDirective::try_from(self.split).map_err(|source| CoreError::InvalidSplit {
                expense_id: self.id.clone(),
                source,
            })?;

        Ok(Expense {
            id: self.id,
            trip_id: self.trip_id,
            amount: Money::from_minor(self.amount),
            currency: Currency::new(self.currency),
            paid_by: ParticipantId::new(self.paid_by),
            split,
            description: self.description,
            category: self.category,
            incurred_at: self.incurred_at,
            deleted: self.deleted,
        })
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
