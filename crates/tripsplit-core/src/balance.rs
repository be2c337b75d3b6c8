//! # Balance Aggregator
//!
//! Folds a trip's expenses and resolved splits into one signed net balance
//! per participant, grouped by currency.
//!
//! ## Bookkeeping
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  For each expense (currency C, payer P, total T):                      │
//! │                                                                         │
//! │    paid[P, C]  += T                                                    │
//! │    owed[X, C]  += split amount        for every resolved split of X    │
//! │    owed[P, C]  += T - Σ splits        unallocated remainder → payer    │
//! │                                                                         │
//! │  net[X, C] = paid[X, C] - owed[X, C]                                   │
//! │                                                                         │
//! │  Σ net over any currency is exactly 0: every minor unit paid is owed   │
//! │  by someone, the payer included.                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Only integers are summed here, so aggregation adds no rounding error of
//! its own. Ordered maps keep iteration deterministic.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::money::Money;
use crate::types::{Currency, Expense, NetBalance, ParticipantId, ResolvedSplit};

// =============================================================================
// Balance Map
// =============================================================================

/// Net balances for one currency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceMap {
    currency: Currency,
    entries: BTreeMap<ParticipantId, NetBalance>,
}

impl BalanceMap {
    pub fn new(currency: Currency) -> Self {
        BalanceMap {
            currency,
            entries: BTreeMap::new(),
        }
    }

    /// Builds a map straight from net figures.
    ///
    /// ## Example
    /// ```rust
    /// use tripsplit_core::balance::BalanceMap;
    /// use tripsplit_core::types::Currency;
    ///
    /// let map = BalanceMap::from_nets(Currency::new("USD"), [("a", 500), ("b", -500)]);
    /// assert_eq!(map.net_of(&"b".into()).minor(), -500);
    /// ```
    pub fn from_nets<I, P>(currency: Currency, nets: I) -> Self
    where
        I: IntoIterator<Item = (P, i64)>,
        P: Into<ParticipantId>,
    {
        let mut map = BalanceMap::new(currency);
        for (participant, net) in nets {
            let entry = map.entry(participant.into());
            let combined = entry.net() + Money::from_minor(net);
            *entry = NetBalance::from_net(combined);
        }
        map
    }

    pub fn currency(&self) -> &Currency {
        &self.currency
    }

    /// Balance of `participant`, if they appear in this currency at all.
    pub fn get(&self, participant: &ParticipantId) -> Option<&NetBalance> {
        self.entries.get(participant)
    }

    /// Net of `participant`, zero when absent.
    pub fn net_of(&self, participant: &ParticipantId) -> Money {
        self.entries
            .get(participant)
            .map(NetBalance::net)
            .unwrap_or_default()
    }

    /// Iterates balances in participant id order.
    pub fn iter(&self) -> impl Iterator<Item = (&ParticipantId, &NetBalance)> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Σ net over all participants. Zero for anything the aggregator built.
    pub fn total_net(&self) -> Money {
        self.entries.values().map(NetBalance::net).sum()
    }

    fn entry(&mut self, participant: ParticipantId) -> &mut NetBalance {
        self.entries.entry(participant).or_default()
    }
}

// =============================================================================
// Balance Sheet
// =============================================================================

/// Net balances for a whole trip, one [`BalanceMap`] per currency.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceSheet {
    by_currency: BTreeMap<Currency, BalanceMap>,
}

impl BalanceSheet {
    /// Currencies present, in code order.
    pub fn currencies(&self) -> impl Iterator<Item = &Currency> {
        self.by_currency.keys()
    }

    /// Balance maps, in currency code order.
    pub fn groups(&self) -> impl Iterator<Item = &BalanceMap> {
        self.by_currency.values()
    }

    pub fn group(&self, currency: &Currency) -> Option<&BalanceMap> {
        self.by_currency.get(currency)
    }

    /// `participant`'s balance in `currency`, if any.
    pub fn balance_of(&self, participant: &ParticipantId, currency: &Currency) -> Option<&NetBalance> {
        self.by_currency.get(currency)?.get(participant)
    }

    /// Every participant seen in any currency, in id order.
    pub fn participants(&self) -> BTreeSet<&ParticipantId> {
        self.by_currency
            .values()
            .flat_map(|map| map.entries.keys())
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.by_currency.is_empty()
    }

    fn group_mut(&mut self, currency: &Currency) -> &mut BalanceMap {
        self.by_currency
            .entry(currency.clone())
            .or_insert_with(|| BalanceMap::new(currency.clone()))
    }
}

// =============================================================================
// Aggregation
// =============================================================================

/// Folds `expenses` and their `resolved` splits into a [`BalanceSheet`].
///
/// Splits are matched to expenses by id, so ids must be unique within
/// `expenses` ([`crate::split::resolve_all`] enforces this). A split whose
/// expense is not in `expenses` is skipped with a warning so it can't skew
/// anyone's balance.
pub fn aggregate(expenses: &[Expense], resolved: &[ResolvedSplit]) -> BalanceSheet {
    let mut splits_by_expense: BTreeMap<&str, Vec<&ResolvedSplit>> = BTreeMap::new();
    for split in resolved {
        splits_by_expense
            .entry(split.expense_id.as_str())
            .or_default()
            .push(split);
    }

    let mut sheet = BalanceSheet::default();
    for expense in expenses {
        let splits = splits_by_expense
            .remove(expense.id.as_str())
            .unwrap_or_default();
        let group = sheet.group_mut(&expense.currency);

        group.entry(expense.paid_by.clone()).paid += expense.amount;

        let mut allocated = Money::zero();
        for split in splits {
            group.entry(split.participant_id.clone()).owed += split.amount;
            allocated += split.amount;
        }

        let unallocated = expense.amount - allocated;
        group.entry(expense.paid_by.clone()).owed += unallocated;

        debug!(
            expense_id = %expense.id,
            currency = %expense.currency,
            allocated = allocated.minor(),
            unallocated = unallocated.minor(),
            "Aggregated expense"
        );
    }

    for (expense_id, orphans) in splits_by_expense {
        warn!(
            expense_id,
            splits = orphans.len(),
            "Skipping resolved splits for an expense that is not in the set"
        );
    }

    sheet
}

// =============================================================================
// Unit Tests
// =============================================================================
