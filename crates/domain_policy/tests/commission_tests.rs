//! Commission Report Property Tests

use chrono::NaiveDate;
use core_kernel::{InsuredId, PolicyCode, VehicleId};
use domain_policy::{CommissionReport, Insurer, Policy, ReportPeriod};
use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use test_utils::{
    assert_policy_codes, assert_total_commission, commission_percentage_strategy,
    date_in_period_strategy, insurer_strategy, policy_code_strategy, premium_strategy,
    report_period_strategy,
};

fn policy(code: &str, effective_date: NaiveDate, premium: Decimal, percentage: u32, insurer: Insurer) -> Policy {
    Policy {
        code: PolicyCode::from(code),
        insured_id: InsuredId::new(1),
        vehicle_id: VehicleId::new(1),
        insurer,
        effective_date,
        net_premium: premium,
        commission_percentage: percentage,
    }
}

#[test]
fn test_reference_month() {
    let day = NaiveDate::from_ymd_opt(2022, 5, 1).unwrap();
    let report = CommissionReport::build(
        ReportPeriod::new(2022, 5),
        vec![
            policy("TesteCodigo", day, dec!(2000.00), 10, Insurer::Mapfre),
            policy("TesteBusca", day, dec!(1000.00), 15, Insurer::Mapfre),
        ],
    );
    assert_total_commission(&report, Some(dec!(350.00)));
    assert_policy_codes(&report.policies, &["TesteBusca", "TesteCodigo"]);
}

proptest! {
    #[test]
    fn total_is_exact_sum(
        (period, entries) in report_period_strategy().prop_flat_map(|period| {
            let entry = (
                date_in_period_strategy(period),
                premium_strategy(),
                commission_percentage_strategy(),
                insurer_strategy(),
            );
            (Just(period), prop::collection::vec(entry, 1..20))
        })
    ) {
        let policies: Vec<Policy> = entries
            .iter()
            .enumerate()
            .map(|(i, (date, premium, pct, insurer))| {
                policy(&format!("P{:03}", i), *date, *premium, *pct, *insurer)
            })
            .collect();

        let expected: Decimal = entries
            .iter()
            .map(|(_, premium, pct, _)| *premium * Decimal::from(*pct))
            .sum::<Decimal>()
            / dec!(100);
        let report = CommissionReport::build(period, policies);

        prop_assert!(report.policies.iter().all(|p| period.contains(p.effective_date)));
        prop_assert_eq!(report.total_commission, Some(expected));
    }

    #[test]
    fn policies_sorted_by_date_then_code(
        (period, entries) in report_period_strategy().prop_flat_map(|period| {
            let entry = (date_in_period_strategy(period), policy_code_strategy());
            (Just(period), prop::collection::vec(entry, 0..20))
        })
    ) {
        let policies: Vec<Policy> = entries
            .iter()
            .map(|(date, code)| policy(code, *date, dec!(1.00), 10, Insurer::Bradesco))
            .collect();
        let report = CommissionReport::build(period, policies);

        for pair in report.policies.windows(2) {
            let key = |p: &Policy| (p.effective_date, p.code.clone());
            prop_assert!(key(&pair[0]) <= key(&pair[1]));
        }
        prop_assert_eq!(report.total_commission.is_none(), entries.is_empty());
    }
}
