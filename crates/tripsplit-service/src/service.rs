//! # Settlement Service
//!
//! Settles one trip end to end.
//!
//! ## Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    settle_trip("lisbon")                                │
//! │                                                                         │
//! │  1. ExpenseRepository ──► Vec<ExpenseInput> (non-deleted)              │
//! │  2. into_expense()    ──► Vec<Expense>       (MIXED_SPLIT_TYPES ...)   │
//! │  3. resolve_all()     ──► Vec<ResolvedSplit> (first error wins)        │
//! │  4. aggregate()       ──► BalanceSheet       (one map per currency)    │
//! │  5. plan() + verify() ──► Vec<Settlement>    (UNBALANCED_LEDGER → 500) │
//! │  6. directory         ──► names, avatars, summary                      │
//! │                                                                         │
//! │  Any failure stops the run: no partial settlement list is returned.    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Each run gets a fresh computation id on its tracing span so concurrent
//! runs can be told apart in the logs. Runs share nothing mutable.

use tracing::{debug, info, info_span, warn};
use uuid::Uuid;

use tripsplit_core::split::resolve_all;
use tripsplit_core::{aggregate, BalanceSheet, CoreError, Expense, Settlement};

use crate::config::EngineConfig;
use crate::error::{ApiError, ServiceResult};
use crate::repository::{ExpenseRepository, ParticipantDirectory};
use crate::response::{CurrencyBalances, SettlementResponse, SettlementView, TripSummary};

/// Orchestrates collaborators and the engine for one trip at a time.
pub struct SettlementService<R, D> {
    expenses: R,
    directory: D,
    config: EngineConfig,
}

impl<R, D> SettlementService<R, D>
where
    R: ExpenseRepository,
    D: ParticipantDirectory,
{
    pub fn new(expenses: R, directory: D, config: EngineConfig) -> Self {
        SettlementService {
            expenses,
            directory,
            config,
        }
    }

    /// Settles `trip_id` and returns the response DTO, or the API error a
    /// transport layer should send back.
    pub fn settle_trip(&self, trip_id: &str) -> Result<SettlementResponse, ApiError> {
        let computation_id = Uuid::new_v4();
        let span = info_span!("settle_trip", trip_id, %computation_id);
        let _guard = span.enter();

        match self.compute(trip_id) {
            Ok(response) => {
                info!(
                    expenses = response.summary.total_expenses,
                    settlements = response.settlements.len(),
                    "Trip settled"
                );
                Ok(response)
            }
            Err(err) => {
                let api = ApiError::from(err);
                if api.code.is_client_error() {
                    warn!(code = ?api.code, "Trip not settled: {}", api.message);
                }
                Err(api)
            }
        }
    }

    fn compute(&self, trip_id: &str) -> ServiceResult<SettlementResponse> {
        let expenses = self
            .expenses
            .expenses_for_trip(trip_id)?
            .into_iter()
            .filter(|input| !input.deleted)
            .map(|input| input.into_expense())
            .collect::<Result<Vec<Expense>, CoreError>>()?;
        debug!(expenses = expenses.len(), "Loaded expenses");

        let resolved = resolve_all(&self.config.calculator(), &expenses)?;
        let sheet = aggregate(&expenses, &resolved);
        let settlements = self.plan(&sheet)?;

        let balances = self.config.include_balances.then(|| {
            sheet
                .groups()
                .map(|group| CurrencyBalances::from_group(group, &self.directory))
                .collect()
        });

        Ok(SettlementResponse {
            trip_id: trip_id.to_string(),
            settlements: settlements
                .into_iter()
                .map(|s| SettlementView::enrich(s, &self.directory))
                .collect(),
            balances,
            summary: TripSummary::build(&expenses, &resolved),
        })
    }

    /// Plans every currency group and checks each plan reproduces its
    /// balances. A plan that doesn't is a defect and fails the run.
    fn plan(&self, sheet: &BalanceSheet) -> ServiceResult<Vec<Settlement>> {
        let planner = self.config.planner();
        let mut all = Vec::new();

        for group in sheet.groups() {
            let settlements = planner.plan(group).map_err(CoreError::from)?;
            planner.verify(group, &settlements).map_err(CoreError::from)?;
            all.extend(settlements);
        }

        Ok(all)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use crate::repository::{InMemoryDirectory, InMemoryExpenseRepository};
    use tripsplit_core::{ExpenseInput, SplitEntryInput, SplitInput, SplitKind};

    fn equal_split(names: &[&str]) -> SplitInput {
        SplitInput {
            kind: Some(SplitKind::Equal),
            entries: names
                .iter()
                .map(|n| SplitEntryInput {
                    participant_id: n.to_string(),
                    ..Default::default()
                })
                .collect(),
        }
    }

    fn input(id: &str, amount: i64, payer: &str, split: SplitInput) -> ExpenseInput {
        ExpenseInput {
            id: id.to_string(),
            trip_id: "t1".to_string(),
            amount,
            currency: "usd".to_string(),
            paid_by: payer.to_string(),
            split,
            description: None,
            category: Default::default(),
            incurred_at: None,
            deleted: false,
        }
    }

    fn service(
        expenses: Vec<ExpenseInput>,
        config: EngineConfig,
    ) -> SettlementService<InMemoryExpenseRepository, InMemoryDirectory> {
        let repo = InMemoryExpenseRepository::new();
        repo.create_trip("t1").unwrap();
        for expense in expenses {
            repo.insert(expense).unwrap();
        }
        SettlementService::new(repo, InMemoryDirectory::new(), config)
    }

    #[test]
    fn test_empty_trip_settles_to_nothing() {
        let response = service(vec![], EngineConfig::default()).settle_trip("t1").unwrap();
        assert!(response.settlements.is_empty());
        assert_eq!(response.summary, TripSummary::default());
        assert_eq!(response.balances, Some(vec![]));
    }

    #[test]
    fn test_balances_can_be_switched_off() {
        let config = EngineConfig {
            include_balances: false,
            ..Default::default()
        };
        let response = service(vec![input("e1", 3000, "A", equal_split(&["A", "B"]))], config)
            .settle_trip("t1")
            .unwrap();
        assert!(response.balances.is_none());
        assert_eq!(response.settlements.len(), 1);
    }

    #[test]
    fn test_amount_tolerance_comes_from_config() {
        let split = SplitInput {
            kind: None,
            entries: vec![
                SplitEntryInput {
                    participant_id: "A".to_string(),
                    amount: Some(500),
                    percentage: None,
                },
                SplitEntryInput {
                    participant_id: "B".to_string(),
                    amount: Some(499),
                    percentage: None,
                },
            ],
        };

        let strict = service(vec![input("e1", 1000, "A", split.clone())], EngineConfig::default());
        assert_eq!(strict.settle_trip("t1").unwrap_err().code, ErrorCode::SplitSumMismatch);

        let lenient = service(
            vec![input("e1", 1000, "A", split)],
            EngineConfig {
                amount_tolerance: tripsplit_core::Money::from_minor(1),
                ..Default::default()
            },
        );
        let response = lenient.settle_trip("t1").unwrap();
        assert_eq!(response.settlements.len(), 1);
        assert_eq!(response.settlements[0].amount.minor(), 499);
    }
}
