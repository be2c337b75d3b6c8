//! # Response DTOs
//!
//! The JSON shape returned for a settled trip.
//!
//! ```json
//! {
//!   "tripId": "lisbon",
//!   "settlements": [
//!     { "from": "cy", "fromName": "Cy", "to": "ana", "toName": "Ana",
//!       "amount": 3000, "currency": "EUR" }
//!   ],
//!   "balances": [
//!     { "currency": "EUR", "participants": [
//!       { "participantId": "ana", "name": "Ana", "paid": 6000, "owed": 3000, "net": 3000 }
//!     ] }
//!   ],
//!   "summary": { "totalExpenses": 2, "totalAmount": 9000, "participantCount": 3,
//!                "totalsByCurrency": [ { "currency": "EUR", "amount": 9000, "expenseCount": 2 } ] }
//! }
//! ```
//!
//! Amounts are minor units. Names fall back to the raw participant id when
//! the directory has no profile.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use tripsplit_core::{BalanceMap, Currency, Expense, Money, ParticipantId, ResolvedSplit, Settlement};

use crate::repository::{ParticipantDirectory, ParticipantProfile};

// =============================================================================
// Top-Level Response
// =============================================================================

/// Result of settling one trip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct SettlementResponse {
    pub trip_id: String,
    pub settlements: Vec<SettlementView>,
    /// Present unless balances were switched off in the engine config
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub balances: Option<Vec<CurrencyBalances>>,
    pub summary: TripSummary,
}

// =============================================================================
// Settlements
// =============================================================================

/// A suggested payment with display names attached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct SettlementView {
    pub from: ParticipantId,
    pub from_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from_avatar_url: Option<String>,
    pub to: ParticipantId,
    pub to_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to_avatar_url: Option<String>,
    pub amount: Money,
    pub currency: Currency,
}

impl SettlementView {
    pub fn enrich<D: ParticipantDirectory + ?Sized>(settlement: Settlement, directory: &D) -> Self {
        let (from_name, from_avatar_url) = display(directory, &settlement.from);
        let (to_name, to_avatar_url) = display(directory, &settlement.to);
        SettlementView {
            from: settlement.from,
            from_name,
            from_avatar_url,
            to: settlement.to,
            to_name,
            to_avatar_url,
            amount: settlement.amount,
            currency: settlement.currency,
        }
    }
}

// =============================================================================
// Balances
// =============================================================================

/// One currency's balance breakdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CurrencyBalances {
    pub currency: Currency,
    pub participants: Vec<ParticipantBalanceView>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ParticipantBalanceView {
    pub participant_id: ParticipantId,
    pub name: String,
    pub paid: Money,
    pub owed: Money,
    /// `paid - owed`; positive means others owe this participant
    pub net: Money,
}

impl CurrencyBalances {
    /// Breakdown of `group`, ordered by participant id.
    pub fn from_group<D: ParticipantDirectory + ?Sized>(group: &BalanceMap, directory: &D) -> Self {
        let participants = group
            .iter()
            .map(|(id, balance)| ParticipantBalanceView {
                participant_id: id.clone(),
                name: display(directory, id).0,
                paid: balance.paid,
                owed: balance.owed,
                net: balance.net(),
            })
            .collect();

        CurrencyBalances {
            currency: group.currency().clone(),
            participants,
        }
    }
}

// =============================================================================
// Summary
// =============================================================================

/// Headline figures for the trip.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct TripSummary {
    pub total_expenses: usize,
    /// Sum of every expense total across currencies. Only meaningful for
    /// single-currency trips; see `totals_by_currency` otherwise.
    pub total_amount: Money,
    /// Distinct payers and split participants
    pub participant_count: usize,
    pub totals_by_currency: Vec<CurrencyTotal>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CurrencyTotal {
    pub currency: Currency,
    pub amount: Money,
    pub expense_count: usize,
}

impl TripSummary {
    pub fn build(expenses: &[Expense], resolved: &[ResolvedSplit]) -> Self {
        let mut by_currency: BTreeMap<&Currency, (Money, usize)> = BTreeMap::new();
        let mut participants: BTreeSet<&ParticipantId> = BTreeSet::new();

        for expense in expenses {
            let entry = by_currency.entry(&expense.currency).or_default();
            entry.0 += expense.amount;
            entry.1 += 1;
            participants.insert(&expense.paid_by);
        }
        participants.extend(resolved.iter().map(|r| &r.participant_id));

        TripSummary {
            total_expenses: expenses.len(),
            total_amount: expenses.iter().map(|e| e.amount).sum(),
            participant_count: participants.len(),
            totals_by_currency: by_currency
                .into_iter()
                .map(|(currency, (amount, expense_count))| CurrencyTotal {
                    currency: currency.clone(),
                    amount,
                    expense_count,
                })
                .collect(),
        }
    }
}

fn display<D: ParticipantDirectory + ?Sized>(
    directory: &D,
    participant: &ParticipantId,
) -> (String, Option<String>) {
    match directory.display_info(participant) {
        Some(ParticipantProfile { name, avatar_url, .. }) => (name, avatar_url),
        None => (participant.to_string(), None),
    }
}
