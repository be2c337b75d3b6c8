//! # tripsplit-core: Expense Split & Settlement Engine
//!
//! This crate is the **heart** of TripSplit. It turns a trip's shared
//! expenses into per-person contributions, net balances, and a short list
//! of suggested payments. Everything here is a pure function with zero I/O.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        TripSplit Architecture                           │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │              tripsplit-service (calling layer)                  │   │
//! │  │   fetch expenses ──► engine ──► enrich names ──► JSON          │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │             ★ tripsplit-core (THIS CRATE) ★                     │   │
//! │  │                                                                 │   │
//! │  │   Expense + SplitDirective                                      │   │
//! │  │        │                                                        │   │
//! │  │        ▼                                                        │   │
//! │  │   ┌───────────┐    ┌───────────┐    ┌──────────────┐           │   │
//! │  │   │   split   │───►│  balance  │───►│  settlement  │           │   │
//! │  │   │ resolve() │    │aggregate()│    │    plan()    │           │   │
//! │  │   └───────────┘    └───────────┘    └──────────────┘           │   │
//! │  │   ResolvedSplit[]   BalanceSheet      Settlement[]              │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Expense, SplitDirective, Settlement, etc.)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`input`] - Loosely-typed input records and their conversion
//! - [`validation`] - Shared field and directive checks
//! - [`split`] - Split calculator
//! - [`balance`] - Balance aggregator
//! - [`settlement`] - Settlement planner
//! - [`error`] - Domain error types
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: same input = same output, same order
//! 2. **No I/O**: expenses come in as values, settlements go out as values
//! 3. **Integer Money**: all amounts are minor units (i64)
//! 4. **Explicit Errors**: every failure is a typed value, never a panic
//!
//! ## Example Usage
//!
//! ```rust
//! use tripsplit_core::balance::aggregate;
//! use tripsplit_core::settlement::plan;
//! use tripsplit_core::split::resolve_all;
//! use tripsplit_core::{Currency, Expense, Money, SplitCalculator, SplitDirective};
//!
//! let dinner = Expense {
//!     id: "e1".into(),
//!     trip_id: "lisbon".into(),
//!     amount: Money::from_minor(9000),
//!     currency: Currency::new("EUR"),
//!     paid_by: "ana".into(),
//!     split: SplitDirective::Equal(vec!["ana".into(), "ben".into(), "cy".into()]),
//!     description: Some("Dinner".into()),
//!     category: Default::default(),
//!     incurred_at: None,
//!     deleted: false,
//! };
//!
//! let expenses = vec![dinner];
//! let resolved = resolve_all(&SplitCalculator::default(), &expenses).unwrap();
//! let sheet = aggregate(&expenses, &resolved);
//! let settlements = plan(sheet.group(&Currency::new("EUR")).unwrap()).unwrap();
//!
//! assert_eq!(settlements.len(), 2);
//! assert!(settlements.iter().all(|s| s.to.as_str() == "ana" && s.amount.minor() == 3000));
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod balance;
pub mod error;
pub mod input;
pub mod money;
pub mod settlement;
pub mod split;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use balance::{aggregate, BalanceMap, BalanceSheet};
pub use error::{CoreError, CoreResult, SplitError, SplitResult, ValidationError};
pub use input::{ExpenseInput, SplitEntryInput, SplitInput, SplitKind};
pub use money::Money;
pub use settlement::SettlementPlanner;
pub use split::SplitCalculator;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Default allowed `|sum(custom amounts) - total|`.
///
/// Zero: with integer minor units there is no float noise to absorb, so a
/// one-cent gap (500 + 499 against 1000) is a real mismatch.
pub const DEFAULT_AMOUNT_TOLERANCE: Money = Money::from_minor(0);

/// Default allowed `|sum(percentages) - 100%|` in basis points (0.01%).
pub const DEFAULT_PERCENT_TOLERANCE_BPS: u32 = 1;

/// Default allowed credit/debit mismatch in the planner, in minor units.
/// Leftovers up to this size are dropped instead of paid out.
pub const DEFAULT_SETTLEMENT_TOLERANCE: Money = Money::from_minor(1);
