//! # Settlement Planner
//!
//! Turns net balances into a short list of "who pays whom how much".
//!
//! ## Greedy Debt Simplification
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  1. Split into creditors (net > 0) and debtors (net < 0); drop zeros.  │
//! │  2. Sort both by magnitude, largest first; ties by participant id.     │
//! │  3. Pair the current creditor c with the current debtor d:             │
//! │                                                                         │
//! │        amount = min(c.remaining, |d.remaining|)                        │
//! │        emit  d ──amount──► c                                           │
//! │                                                                         │
//! │  4. Step past whoever reached zero; repeat until a side runs out.      │
//! │  5. Leftovers within tolerance are dropped, never paid out.            │
//! │                                                                         │
//! │  Example:  a +5000   b -2000   c -3000                                 │
//! │            creditors [a 5000]   debtors [c 3000, b 2000]               │
//! │            c → a 3000, b → a 2000                                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every step zeroes at least one party, so `n` non-zero balances produce at
//! most `n - 1` settlements. The result is not guaranteed to be the global
//! minimum (that is NP-hard) but it is deterministic: the same balances
//! always give the same list in the same order.

use tracing::{debug, error};

use crate::balance::{BalanceMap, BalanceSheet};
use crate::error::{SplitError, SplitResult};
use crate::money::Money;
use crate::types::{ParticipantId, Settlement};
use crate::DEFAULT_SETTLEMENT_TOLERANCE;

/// One side of the ledger while the planner walks it.
#[derive(Debug)]
struct Party<'a> {
    participant: &'a ParticipantId,
    /// Magnitude still to pay or receive. Always >= 0.
    remaining: Money,
}

/// Plans settlements for balance maps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SettlementPlanner {
    /// Largest credit/debit mismatch accepted, and the largest leftover
    /// dropped at the end.
    tolerance: Money,
}

impl Default for SettlementPlanner {
    fn default() -> Self {
        SettlementPlanner {
            tolerance: DEFAULT_SETTLEMENT_TOLERANCE,
        }
    }
}

impl SettlementPlanner {
    pub fn new(tolerance: Money) -> Self {
        SettlementPlanner {
            tolerance: tolerance.abs(),
        }
    }

    pub fn tolerance(&self) -> Money {
        self.tolerance
    }

    /// Plans the settlements that zero every balance in `balances`.
    ///
    /// Fails with `UnbalancedLedger` when total credit and total debt differ
    /// by more than the tolerance.
    pub fn plan(&self, balances: &BalanceMap) -> SplitResult<Vec<Settlement>> {
        let currency = balances.currency();

        let mut creditors = Vec::new();
        let mut debtors = Vec::new();
        for (participant, balance) in balances.iter() {
            let net = balance.net();
            if net.is_positive() {
                creditors.push(Party {
                    participant,
                    remaining: net,
                });
            } else if net.is_negative() {
                debtors.push(Party {
                    participant,
                    remaining: net.abs(),
                });
            }
        }

        let credit: Money = creditors.iter().map(|p| p.remaining).sum();
        let debit: Money = debtors.iter().map(|p| p.remaining).sum();
        if (credit - debit).abs() > self.tolerance {
            error!(
                currency = %currency,
                credit = credit.minor(),
                debit = debit.minor(),
                "Refusing to plan settlements for an unbalanced ledger"
            );
            return Err(SplitError::UnbalancedLedger { credit, debit });
        }

        sort_parties(&mut creditors);
        sort_parties(&mut debtors);

        let mut settlements = Vec::with_capacity(creditors.len() + debtors.len());
        let (mut ci, mut di) = (0, 0);
        while ci < creditors.len() && di < debtors.len() {
            let amount = creditors[ci].remaining.min(debtors[di].remaining);

            settlements.push(Settlement {
                from: debtors[di].participant.clone(),
                to: creditors[ci].participant.clone(),
                amount,
                currency: currency.clone(),
            });

            creditors[ci].remaining -= amount;
            debtors[di].remaining -= amount;

            if creditors[ci].remaining.is_zero() {
                ci += 1;
            }
            if debtors[di].remaining.is_zero() {
                di += 1;
            }
        }

        let leftover: Money = creditors[ci..]
            .iter()
            .chain(debtors[di..].iter())
            .map(|p| p.remaining)
            .sum();
        debug!(
            currency = %currency,
            settlements = settlements.len(),
            dropped = leftover.minor(),
            "Planned settlements"
        );

        Ok(settlements)
    }

    /// Checks that `settlements` move each participant's balance in
    /// `balances` to within the tolerance. Anyone paying or receiving
    /// without a balance counts as expecting zero.
    pub fn verify(&self, balances: &BalanceMap, settlements: &[Settlement]) -> SplitResult<()> {
        let named = settlements.iter().flat_map(|s| [&s.from, &s.to]);
        for participant in balances.iter().map(|(p, _)| p).chain(named) {
            let planned = net_flow(settlements, participant);
            let expected = balances.net_of(participant);
            if (planned - expected).abs() > self.tolerance {
                error!(
                    participant = %participant,
                    currency = %balances.currency(),
                    planned = planned.minor(),
                    expected = expected.minor(),
                    "Settlement plan does not reproduce the balance"
                );
                return Err(SplitError::PlanDrift {
                    participant: participant.clone(),
                    planned,
                    expected,
                });
            }
        }
        Ok(())
    }

    /// Plans every currency group of `sheet`, in currency code order.
    ///
    /// Stops at the first unbalanced group.
    pub fn plan_sheet(&self, sheet: &BalanceSheet) -> SplitResult<Vec<Settlement>> {
        let mut all = Vec::new();
        for group in sheet.groups() {
            all.extend(self.plan(group)?);
        }
        Ok(all)
    }
}

/// Largest magnitude first; equal magnitudes by participant id ascending.
fn sort_parties(parties: &mut [Party<'_>]) {
    parties.sort_by(|a, b| {
        b.remaining
            .cmp(&a.remaining)
            .then_with(|| a.participant.cmp(b.participant))
    });
}

/// Plans `balances` with the default tolerance.
pub fn plan(balances: &BalanceMap) -> SplitResult<Vec<Settlement>> {
    SettlementPlanner::default().plan(balances)
}

/// What `participant` receives minus what they pay across `settlements`.
///
/// For a plan built from balances `B` this equals `B[participant]` (up to
/// the dropped leftover).
pub fn net_flow(settlements: &[Settlement], participant: &ParticipantId) -> Money {
    settlements.iter().fold(Money::zero(), |acc, s| {
        let mut acc = acc;
        if &s.to == participant {
            acc += s.amount;
        }
        if &s.from == participant {
            acc -= s.amount;
        }
        acc
    })
}

// =============================================================================
// Unit Tests
// =============================================================================
