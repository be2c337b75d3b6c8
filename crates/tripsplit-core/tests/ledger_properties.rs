use proptest::prelude::*;
use tripsplit_core::settlement::{net_flow, plan};
use tripsplit_core::split::resolve_all;
use tripsplit_core::{
    aggregate, AmountShare, BalanceMap, Currency, Expense, Money, ParticipantId, Percentage,
    PercentageShare, SplitCalculator, SplitDirective,
};

const NAMES: [&str; 6] = ["ana", "ben", "cy", "dee", "eli", "fay"];

fn participant(idx: usize) -> ParticipantId {
    ParticipantId::from(NAMES[idx % NAMES.len()])
}

/// Picks a non-empty, duplicate-free subset of the first `member_count` names.
fn subset(member_count: usize, mask: usize) -> Vec<ParticipantId> {
    let mut picked: Vec<ParticipantId> = (0..member_count)
        .filter(|idx| mask & (1 << idx) != 0)
        .map(participant)
        .collect();
    if picked.is_empty() {
        picked.push(participant(0));
    }
    picked
}

/// Splits `total` into custom amounts that add up exactly.
fn exact_amounts(total: i64, members: &[ParticipantId]) -> SplitDirective {
    let n = members.len() as i64;
    let share = total / n;
    let shares = members
        .iter()
        .enumerate()
        .map(|(idx, p)| {
            let extra = if idx == 0 { total - share * n } else { 0 };
            AmountShare {
                participant_id: p.clone(),
                amount: Money::from_minor(share + extra),
            }
        })
        .collect();
    SplitDirective::CustomAmount(shares)
}

/// Splits 100% into basis points that add up exactly.
fn exact_percentages(members: &[ParticipantId]) -> SplitDirective {
    let n = members.len() as u32;
    let share = Percentage::HUNDRED.bps() / n;
    let shares = members
        .iter()
        .enumerate()
        .map(|(idx, p)| {
            let extra = if idx == 0 { Percentage::HUNDRED.bps() - share * n } else { 0 };
            PercentageShare {
                participant_id: p.clone(),
                percentage: Percentage::from_bps(share + extra),
            }
        })
        .collect();
    SplitDirective::CustomPercentage(shares)
}

fn trip_strategy() -> impl Strategy<Value = Vec<Expense>> {
    (1usize..=6, prop::collection::vec((1i64..=50_000, 0usize..6, 0usize..64, 0u8..4, any::<bool>()), 0..=25))
        .prop_map(|(member_count, rows)| {
            rows.into_iter()
                .enumerate()
                .map(|(idx, (amount, payer, mask, kind, euro))| {
                    let members = subset(member_count, mask);
                    let split = match kind {
                        0 => SplitDirective::None,
                        1 => SplitDirective::Equal(members),
                        2 => exact_amounts(amount, &members),
                        _ => exact_percentages(&members),
                    };
                    Expense {
                        id: format!("e{}", idx),
                        trip_id: "trip".to_string(),
                        amount: Money::from_minor(amount),
                        currency: Currency::new(if euro { "EUR" } else { "USD" }),
                        paid_by: participant(payer % member_count),
                        split,
                        description: None,
                        category: Default::default(),
                        incurred_at: None,
                        deleted: false,
                    }
                })
                .collect()
        })
}

fn balances_strategy() -> impl Strategy<Value = BalanceMap> {
    prop::collection::vec(-100_000i64..=100_000, 1..=8).prop_map(|mut nets| {
        let correction: i64 = nets.iter().sum();
        nets.push(-correction);
        let entries = nets
            .into_iter()
            .enumerate()
            .map(|(idx, net)| (format!("p{:02}", idx), net));
        BalanceMap::from_nets(Currency::new("USD"), entries)
    })
}

proptest! {
    #[test]
    fn custom_splits_sum_to_total(expenses in trip_strategy()) {
        let calculator = SplitCalculator::default();
        for expense in &expenses {
            let resolved = calculator.resolve_expense(expense).unwrap();
            let sum: i64 = resolved.iter().map(|r| r.amount.minor()).sum();
            match expense.split {
                SplitDirective::CustomAmount(_) => {
                    prop_assert!((sum - expense.amount.minor()).abs() <= 1);
                }
                SplitDirective::CustomPercentage(ref shares) => {
                    prop_assert!(sum <= expense.amount.minor());
                    prop_assert!(expense.amount.minor() - sum < shares.len() as i64);
                }
                SplitDirective::Equal(ref members) => {
                    prop_assert!(expense.amount.minor() - sum < members.len() as i64);
                }
                SplitDirective::None => prop_assert_eq!(sum, 0),
            }
        }
    }

    #[test]
    fn balances_sum_to_zero_per_currency(expenses in trip_strategy()) {
        let resolved = resolve_all(&SplitCalculator::default(), &expenses).unwrap();
        let sheet = aggregate(&expenses, &resolved);
        for group in sheet.groups() {
            prop_assert_eq!(group.total_net(), Money::zero());
        }
    }

    #[test]
    fn plans_reproduce_every_balance(expenses in trip_strategy()) {
        let resolved = resolve_all(&SplitCalculator::default(), &expenses).unwrap();
        let sheet = aggregate(&expenses, &resolved);
        for group in sheet.groups() {
            let settlements = plan(group).unwrap();
            for (participant, balance) in group.iter() {
                prop_assert_eq!(net_flow(&settlements, participant), balance.net());
            }
            for settlement in &settlements {
                prop_assert!(settlement.amount.is_positive());
                prop_assert!(group.net_of(&settlement.from).is_negative());
                prop_assert!(group.net_of(&settlement.to).is_positive());
                prop_assert_eq!(&settlement.currency, group.currency());
            }
        }
    }

    #[test]
    fn plan_is_idempotent(balances in balances_strategy()) {
        let first = plan(&balances).unwrap();
        let second = plan(&balances).unwrap();
        prop_assert_eq!(first, second);
    }

    #[test]
    fn plan_uses_at_most_n_minus_one_payments(balances in balances_strategy()) {
        let nonzero = balances.iter().filter(|(_, b)| !b.net().is_zero()).count();
        let settlements = plan(&balances).unwrap();
        prop_assert!(settlements.len() <= nonzero.saturating_sub(1));
    }
}
