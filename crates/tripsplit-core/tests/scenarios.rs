//! End-to-end trips through split → aggregate → plan.

use rstest::rstest;
use tripsplit_core::settlement::{net_flow, plan};
use tripsplit_core::split::{resolve, resolve_all};
use tripsplit_core::{
    aggregate, AmountShare, Currency, Expense, Money, ParticipantId, SplitCalculator,
    SplitDirective, SplitError,
};

fn equal(names: &[&str]) -> SplitDirective {
    SplitDirective::Equal(names.iter().map(|n| ParticipantId::from(*n)).collect())
}

fn expense(id: &str, amount: i64, payer: &str, split: SplitDirective) -> Expense {
    Expense {
        id: id.to_string(),
        trip_id: "trip-1".to_string(),
        amount: Money::from_minor(amount),
        currency: Currency::new("USD"),
        paid_by: payer.into(),
        split,
        description: None,
        category: Default::default(),
        incurred_at: None,
        deleted: false,
    }
}

#[rstest]
#[case::scenario_a(3000, vec![1000, 1000, 1000], 0)]
#[case::scenario_b(1000, vec![333, 333, 333], 1)]
fn equal_split_among_three(#[case] total: i64, #[case] expected: Vec<i64>, #[case] unallocated: i64) {
    let shares = resolve(Money::from_minor(total), &equal(&["u1", "u2", "u3"])).unwrap();
    let amounts: Vec<i64> = shares.iter().map(|s| s.amount.minor()).collect();
    assert_eq!(amounts, expected);
    assert_eq!(total - amounts.iter().sum::<i64>(), unallocated);
}

#[test]
fn scenario_c_two_payers_three_travellers() {
    let expenses = vec![
        expense("e1", 6000, "A", equal(&["A", "B", "C"])),
        expense("e2", 3000, "B", equal(&["A", "B", "C"])),
    ];
    let resolved = resolve_all(&SplitCalculator::default(), &expenses).unwrap();
    let sheet = aggregate(&expenses, &resolved);
    let usd = sheet.group(&Currency::new("USD")).unwrap();

    assert_eq!(usd.net_of(&"A".into()).minor(), 3000);
    assert_eq!(usd.net_of(&"B".into()).minor(), 0);
    assert_eq!(usd.net_of(&"C".into()).minor(), -3000);
    assert!(usd.total_net().is_zero());

    let settlements = plan(usd).unwrap();
    for (participant, balance) in usd.iter() {
        assert_eq!(net_flow(&settlements, participant), balance.net());
    }
    assert!(settlements.iter().all(|s| s.amount.is_positive()));
}

#[test]
fn scenario_d_custom_amounts_one_cent_short() {
    let directive = SplitDirective::CustomAmount(vec![
        AmountShare {
            participant_id: "u1".into(),
            amount: Money::from_minor(500),
        },
        AmountShare {
            participant_id: "u2".into(),
            amount: Money::from_minor(499),
        },
    ]);
    assert_eq!(
        resolve(Money::from_minor(1000), &directive),
        Err(SplitError::SplitSumMismatch {
            difference: Money::from_minor(1)
        })
    );
}

#[test]
fn sole_payer_and_sole_participant_settles_nothing() {
    let expenses = vec![expense("e1", 4200, "solo", equal(&["solo"]))];
    let resolved = resolve_all(&SplitCalculator::default(), &expenses).unwrap();
    let sheet = aggregate(&expenses, &resolved);

    let settlements = plan(sheet.group(&Currency::new("USD")).unwrap()).unwrap();
    assert!(settlements.is_empty());
}

#[test]
fn payer_absorbs_remainder_and_ledger_still_balances() {
    let expenses = vec![
        expense("e1", 1000, "A", equal(&["A", "B", "C"])),
        expense("e2", 1001, "B", equal(&["A", "B", "C"])),
        expense("e3", 10, "C", equal(&["A", "B", "C"])),
    ];
    let resolved = resolve_all(&SplitCalculator::default(), &expenses).unwrap();
    let sheet = aggregate(&expenses, &resolved);
    let usd = sheet.group(&Currency::new("USD")).unwrap();
    assert!(usd.total_net().is_zero());

    let settlements = plan(usd).unwrap();
    for (participant, balance) in usd.iter() {
        assert_eq!(net_flow(&settlements, participant), balance.net());
    }
}

#[test]
fn first_invalid_expense_stops_resolution() {
    let expenses = vec![
        expense("ok", 1000, "A", equal(&["A", "B"])),
        expense("bad", 1000, "A", SplitDirective::Equal(vec![])),
    ];
    let err = resolve_all(&SplitCalculator::default(), &expenses).unwrap_err();
    assert_eq!(err.code(), "EMPTY_SPLIT_SET");
    assert!(err.to_string().contains("bad"));
}

#[test]
fn repeated_expense_id_is_rejected_before_aggregation() {
    let expenses = vec![
        expense("e1", 3000, "A", equal(&["A", "B", "C"])),
        expense("e1", 3000, "B", equal(&["A", "B", "C"])),
    ];
    let err = resolve_all(&SplitCalculator::default(), &expenses).unwrap_err();
    assert_eq!(err.code(), "DUPLICATE_EXPENSE");
    assert!(!err.is_defect());

    let renamed = vec![
        expenses[0].clone(),
        Expense {
            id: "e2".to_string(),
            ..expenses[1].clone()
        },
    ];
    let resolved = resolve_all(&SplitCalculator::default(), &renamed).unwrap();
    let usd = aggregate(&renamed, &resolved);
    let usd = usd.group(&Currency::new("USD")).unwrap();
    assert_eq!(usd.net_of(&"A".into()).minor(), 1000);
    assert_eq!(usd.net_of(&"B".into()).minor(), 1000);
    assert_eq!(usd.net_of(&"C".into()).minor(), -2000);
}
