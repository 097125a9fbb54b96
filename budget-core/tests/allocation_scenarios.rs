//! End-to-end allocation scenarios and invariants across many date layouts.

use budget_core::{
    AllocationWorksheet, Goal, PayCycle, PayFrequency, RawGoal, allocate_raw,
};
use chrono::{Days, NaiveDate};
use pretty_assertions::assert_eq;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn rent(saved_so_far: Decimal) -> Goal {
    Goal {
        name: "Rent".to_string(),
        target: dec!(1200),
        created: date(2024, 1, 1),
        deadline: date(2024, 1, 29),
        saved_so_far,
    }
}

fn biweekly(pay_date: NaiveDate, amount: Decimal) -> PayCycle {
    PayCycle::new(PayFrequency::Biweekly, pay_date, amount)
}

#[test]
fn scenario_a_first_paycheck_of_plan() {
    let cycle = biweekly(date(2024, 1, 1), dec!(1000));

    let result = AllocationWorksheet::new(&cycle).calculate(&[rent(dec!(0))]);
    let a = &result.goals[0];

    assert_eq!(a.total_paychecks, 2);
    assert_eq!(a.paychecks_left, 2);
    assert_eq!(a.paychecks_elapsed, 0);
    assert_eq!(a.planned_per_paycheck, dec!(600));
    assert_eq!(a.auto_saved, dec!(0));
    assert_eq!(a.effective_saved, dec!(0));
    assert_eq!(a.remaining, dec!(1200));
    assert_eq!(a.per_paycheck, dec!(600));
    assert_eq!(result.leftover, dec!(400));
}

#[test]
fn scenario_b_second_paycheck_infers_savings() {
    let cycle = biweekly(date(2024, 1, 15), dec!(1000));

    let result = AllocationWorksheet::new(&cycle).calculate(&[rent(dec!(0))]);
    let a = &result.goals[0];

    assert_eq!(a.days_until_deadline, 14);
    assert_eq!(a.paychecks_left, 1);
    assert_eq!(a.paychecks_elapsed, 1);
    assert_eq!(a.auto_saved, dec!(600));
    assert_eq!(a.effective_saved, dec!(600));
    assert_eq!(a.remaining, dec!(600));
    assert_eq!(a.per_paycheck, dec!(600));
}

#[test]
fn scenario_c_overshoot_needs_nothing() {
    let cycle = biweekly(date(2024, 1, 1), dec!(1000));

    let result = AllocationWorksheet::new(&cycle).calculate(&[rent(dec!(1500))]);
    let a = &result.goals[0];

    assert_eq!(a.effective_saved, dec!(1500));
    assert_eq!(a.remaining, dec!(0));
    assert_eq!(a.per_paycheck, dec!(0));
    assert_eq!(a.progress_percent(), 100);
    assert_eq!(result.leftover, dec!(1000));
}

#[test]
fn scenario_d_overdue_goal_gets_final_lump() {
    let cycle = biweekly(date(2024, 3, 1), dec!(1000));
    let goal = Goal {
        saved_so_far: dec!(200),
        ..rent(dec!(0))
    };

    let result = AllocationWorksheet::new(&cycle).calculate(&[goal]);
    let a = &result.goals[0];

    assert!(a.days_until_deadline < 0);
    assert_eq!(a.paychecks_left, 1);
    assert_eq!(a.remaining, dec!(1000));
    assert_eq!(a.per_paycheck, dec!(1000));
}

#[test]
fn underfunded_paycheck_reports_shortfall_and_zero_leftover() {
    let cycle = biweekly(date(2024, 1, 15), dec!(250));

    let result = AllocationWorksheet::new(&cycle).calculate(&[rent(dec!(0))]);

    assert_eq!(result.total_allocations, dec!(600));
    assert_eq!(result.leftover, dec!(0));
    assert_eq!(result.shortfall, dec!(350));
    assert!(result.is_underfunded());
}

#[test]
fn invariants_hold_across_date_layouts() {
    let anchor = date(2024, 1, 1);
    let offsets = [0u64, 1, 6, 7, 13, 14, 15, 29, 30, 31, 90, 365];
    let frequencies = [PayFrequency::Weekly, PayFrequency::Biweekly, PayFrequency::Monthly];
    let saved_amounts = [dec!(0), dec!(50), dec!(5000)];

    for frequency in frequencies {
        for created_offset in offsets {
            for deadline_offset in offsets {
                for pay_offset in offsets {
                    for saved in saved_amounts {
                        let goal = Goal {
                            name: "Goal".to_string(),
                            target: dec!(1000),
                            created: anchor + Days::new(created_offset),
                            deadline: anchor + Days::new(deadline_offset),
                            saved_so_far: saved,
                        };
                        let cycle =
                            PayCycle::new(frequency, anchor + Days::new(pay_offset), dec!(100));

                        let result = AllocationWorksheet::new(&cycle).calculate(&[goal]);
                        let a = &result.goals[0];

                        assert!(a.paychecks_left >= 1);
                        assert!(a.total_paychecks >= 1);
                        assert!(a.paychecks_elapsed >= 0);
                        assert!(a.remaining >= Decimal::ZERO);
                        assert!(a.per_paycheck >= Decimal::ZERO);
                        assert!(result.leftover >= Decimal::ZERO);
                        if saved > Decimal::ZERO {
                            assert_eq!(a.effective_saved, saved);
                        } else if a.paychecks_elapsed == 0 {
                            assert_eq!(a.effective_saved, Decimal::ZERO);
                        }
                    }
                }
            }
        }
    }
}

#[test]
fn repeated_runs_are_identical() {
    let today = date(2024, 1, 15);
    let cycle = biweekly(today, dec!(1000));
    let raws = vec![
        RawGoal {
            name: Some("Rent".to_string()),
            target: Some("1200".to_string()),
            created: Some("2024-01-01".to_string()),
            deadline: Some("2024-01-29".to_string()),
            saved_so_far: None,
        },
        RawGoal {
            name: None,
            target: Some("oops".to_string()),
            created: None,
            deadline: Some("not a date".to_string()),
            saved_so_far: Some("0".to_string()),
        },
    ];

    let first = allocate_raw(&raws, &cycle, today);
    let second = allocate_raw(&raws, &cycle, today);

    assert_eq!(first, second);
}

#[test]
fn malformed_record_still_produces_an_allocation() {
    let today = date(2024, 1, 15);
    let cycle = biweekly(today, dec!(1000));
    let raws = vec![RawGoal {
        name: None,
        target: Some("300".to_string()),
        created: Some("yesterday".to_string()),
        deadline: Some("??".to_string()),
        saved_so_far: Some("abc".to_string()),
    }];

    let (normalized, result) = allocate_raw(&raws, &cycle, today);

    assert!(normalized[0].has_lossy_defaults());
    let a = &result.goals[0];
    assert_eq!(a.name, "Unnamed Goal");
    assert_eq!(a.paychecks_left, 1);
    assert_eq!(a.total_paychecks, 1);
    assert_eq!(a.per_paycheck, dec!(300));
    assert_eq!(result.leftover, dec!(700));
}

#[test]
fn write_back_persists_inferred_savings() {
    let cycle = biweekly(date(2024, 1, 15), dec!(1000));
    let goals = vec![rent(dec!(0))];

    let result = AllocationWorksheet::new(&cycle).calculate(&goals);
    let persisted = result.persisted_goals(&goals);

    assert_eq!(persisted[0].saved_so_far, dec!(600));
    assert_eq!(persisted[0].deadline, goals[0].deadline);
}

#[test]
fn oversized_targets_saturate_instead_of_panicking() {
    let today = date(2024, 1, 15);
    let cycle = biweekly(today, dec!(2000)).with_additional_income(Decimal::MAX);
    let huge = RawGoal {
        name: Some("Mansion".to_string()),
        target: Some("79228162514264337593543950335".to_string()),
        created: Some("2024-01-15".to_string()),
        deadline: Some("2024-01-15".to_string()),
        saved_so_far: None,
    };

    let (_, result) = allocate_raw(&[huge.clone(), huge], &cycle, today);

    assert_eq!(cycle.paycheck_amount, Decimal::MAX);
    assert_eq!(result.goals[0].per_paycheck, Decimal::MAX);
    assert_eq!(result.total_allocations, Decimal::MAX);
    assert_eq!(result.leftover, Decimal::ZERO);
    assert_eq!(result.shortfall, Decimal::ZERO);
    assert_eq!(result.allocation_shares().len(), 2);
}

#[test]
fn oversized_targets_against_a_normal_paycheck_report_a_shortfall() {
    let today = date(2024, 1, 15);
    let cycle = biweekly(today, dec!(2000));
    let huge = RawGoal {
        target: Some("79228162514264337593543950335".to_string()),
        created: Some("2024-01-15".to_string()),
        deadline: Some("2024-01-15".to_string()),
        ..RawGoal::default()
    };

    let (_, result) = allocate_raw(&[huge.clone(), huge], &cycle, today);

    assert_eq!(result.total_allocations, Decimal::MAX);
    assert_eq!(result.leftover, Decimal::ZERO);
    assert_eq!(result.shortfall, Decimal::MAX - dec!(2000));
    assert!(result.is_underfunded());
}
