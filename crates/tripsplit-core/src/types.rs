//! # Domain Types
//!
//! Core domain types used throughout TripSplit.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌──────────────────┐   ┌─────────────────┐      │
//! │  │    Expense      │   │  SplitDirective  │   │  ResolvedSplit  │      │
//! │  │  ─────────────  │   │  ──────────────  │   │  ─────────────  │      │
//! │  │  id, trip_id    │──►│  None            │──►│  expense_id     │      │
//! │  │  amount         │   │  Equal           │   │  participant    │      │
//! │  │  currency       │   │  CustomAmount    │   │  amount         │      │
//! │  │  paid_by        │   │  CustomPercentage│   └────────┬────────┘      │
//! │  └─────────────────┘   └──────────────────┘            │               │
//! │                                                         ▼               │
//! │  ┌─────────────────┐                          ┌─────────────────┐      │
//! │  │   Settlement    │ ◄─── planner ──────────  │   NetBalance    │      │
//! │  │  from → to      │                          │  paid - owed    │      │
//! │  │  amount         │                          └─────────────────┘      │
//! │  └─────────────────┘                                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! None of the derived types (ResolvedSplit, NetBalance, Settlement) are
//! ever stored. They are recomputed from the full expense set on demand.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use ts_rs::TS;

use crate::money::Money;

// =============================================================================
// Identifiers
// =============================================================================

/// Opaque participant identifier (a user id from the identity collaborator).
///
/// Ordered so it can serve as the deterministic tie-break key in the
/// settlement planner.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(transparent)]
#[ts(export)]
pub struct ParticipantId(String);

impl ParticipantId {
    pub fn new(id: impl Into<String>) -> Self {
        ParticipantId(id.into())
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ParticipantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ParticipantId {
    fn from(id: &str) -> Self {
        ParticipantId(id.to_string())
    }
}

impl From<String> for ParticipantId {
    fn from(id: String) -> Self {
        ParticipantId(id)
    }
}

/// ISO 4217 style currency code ("USD", "EUR").
///
/// Format is checked by [`crate::validation::validate_currency`]; the
/// constructor only normalises case.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(transparent)]
#[ts(export)]
pub struct Currency(String);

impl Currency {
    pub fn new(code: impl AsRef<str>) -> Self {
        Currency(code.as_ref().trim().to_ascii_uppercase())
    }

    #[inline]
    pub fn code(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Currency {
    fn from(code: &str) -> Self {
        Currency::new(code)
    }
}

// =============================================================================
// Percentage
// =============================================================================

/// A percentage held in basis points (bps).
///
/// ## Why Basis Points?
/// 1 basis point = 0.01% = 1/10000, which is exactly the precision the
/// percentage-sum check needs. 3333 bps = 33.33%.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Percentage(u32);

impl Percentage {
    /// 100% = 10_000 bps.
    pub const HUNDRED: Percentage = Percentage(10_000);

    /// Creates a percentage from basis points.
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        Percentage(bps)
    }

    /// Creates a percentage from a decimal value (33.33 → 3333 bps),
    /// rounding to the nearest basis point.
    ///
    /// Returns `None` for negative or non-finite input.
    pub fn from_percent(pct: f64) -> Option<Self> {
        if !pct.is_finite() || pct < 0.0 {
            return None;
        }
        let bps = (pct * 100.0).round();
        if bps > u32::MAX as f64 {
            return None;
        }
        Some(Percentage(bps as u32))
    }

    /// Returns the percentage in basis points.
    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// Returns the percentage as a decimal (for display only).
    #[inline]
    pub fn as_percent(&self) -> f64 {
        self.0 as f64 / 100.0
    }
}

impl fmt::Display for Percentage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:02}%", self.0 / 100, self.0 % 100)
    }
}

// =============================================================================
// Split Directive
// =============================================================================

/// One participant's fixed share of an expense.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct AmountShare {
    pub participant_id: ParticipantId,
    pub amount: Money,
}

/// One participant's percentage share of an expense.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct PercentageShare {
    pub participant_id: ParticipantId,
    pub percentage: Percentage,
}

/// How an expense is divided among participants.
///
/// Exactly one representation is active per expense. Amount and percentage
/// entries cannot coexist in one directive; the loose input shape that
/// could express that is rejected in [`crate::input`].
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[serde(tag = "type", content = "entries", rename_all = "SCREAMING_SNAKE_CASE")]
#[ts(export)]
pub enum SplitDirective {
    /// No splitting: the payer bears 100%.
    #[default]
    None,
    /// Participants share equally; the remainder stays with the payer.
    Equal(Vec<ParticipantId>),
    /// Explicit minor-unit amounts per participant.
    CustomAmount(Vec<AmountShare>),
    /// Explicit percentages per participant.
    CustomPercentage(Vec<PercentageShare>),
}

impl SplitDirective {
    /// Participants named by this directive, in directive order.
    pub fn participants(&self) -> Vec<&ParticipantId> {
        match self {
            SplitDirective::None => Vec::new(),
            SplitDirective::Equal(ids) => ids.iter().collect(),
            SplitDirective::CustomAmount(shares) => {
                shares.iter().map(|s| &s.participant_id).collect()
            }
            SplitDirective::CustomPercentage(shares) => {
                shares.iter().map(|s| &s.participant_id).collect()
            }
        }
    }

    /// The wire name of the active variant.
    pub fn kind_name(&self) -> &'static str {
        match self {
            SplitDirective::None => "NONE",
            SplitDirective::Equal(_) => "EQUAL",
            SplitDirective::CustomAmount(_) => "CUSTOM_AMOUNT",
            SplitDirective::CustomPercentage(_) => "CUSTOM_PERCENTAGE",
        }
    }
}

// =============================================================================
// Expense
// =============================================================================

/// What an expense was for. Display-only; the engine ignores it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum ExpenseCategory {
    Accommodation,
    Transport,
    Food,
    Activities,
    Shopping,
    #[default]
    Other,
}

/// A shared trip expense paid by one participant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Expense {
    pub id: String,
    pub trip_id: String,
    /// Total in minor units. Must be positive.
    pub amount: Money,
    pub currency: Currency,
    pub paid_by: ParticipantId,
    #[serde(default)]
    pub split: SplitDirective,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub category: ExpenseCategory,
    #[serde(default)]
    #[ts(as = "Option<String>")]
    pub incurred_at: Option<DateTime<Utc>>,
    /// Soft-delete marker; deleted expenses never reach the engine.
    #[serde(default)]
    pub deleted: bool,
}

// =============================================================================
// Calculator Output
// =============================================================================

/// A participant's resolved share before it is tied to an expense id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Share {
    pub participant_id: ParticipantId,
    pub amount: Money,
}

/// A concrete contribution of one participant to one expense, in the
/// expense's currency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ResolvedSplit {
    pub expense_id: String,
    pub participant_id: ParticipantId,
    pub amount: Money,
}

// =============================================================================
// Balances and Settlements
// =============================================================================

/// Running totals for one participant in one currency.
///
/// Positive [`NetBalance::net`] means others owe this participant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct NetBalance {
    pub paid: Money,
    pub owed: Money,
}

impl NetBalance {
    /// Builds a balance that nets to `net` (handy for tests and callers
    /// that only have net figures).
    pub fn from_net(net: Money) -> Self {
        if net.is_negative() {
            NetBalance {
                paid: Money::zero(),
                owed: net.abs(),
            }
        } else {
            NetBalance {
                paid: net,
                owed: Money::zero(),
            }
        }
    }

    /// `paid - owed`.
    #[inline]
    pub fn net(&self) -> Money {
        self.paid - self.owed
    }

    pub fn is_creditor(&self) -> bool {
        self.net().is_positive()
    }

    pub fn is_debtor(&self) -> bool {
        self.net().is_negative()
    }
}

/// A suggested payment from a net debtor to a net creditor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Settlement {
    pub from: ParticipantId,
    pub to: ParticipantId,
    pub amount: Money,
    pub currency: Currency,
}

impl Settlement {
    /// Whether `participant` pays or receives in this settlement.
    pub fn involves(&self, participant: &ParticipantId) -> bool {
        &self.from == participant || &self.to == participant
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
