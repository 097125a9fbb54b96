use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};

use super::Goal;

/// Label used for the unallocated remainder in [`AllocationResult::allocation_shares`].
pub const LEFTOVER_LABEL: &str = "Leftover";

/// How one goal is funded from the current paycheck.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GoalAllocation {
    pub name: String,
    pub target: Decimal,

    // Schedule
    /// Signed days from the pay date to the deadline.
    pub days_until_deadline: i64,
    /// Paychecks left including the current one. Always at least 1.
    pub paychecks_left: i64,
    /// Paychecks between creation and deadline. Always at least 1.
    pub total_paychecks: i64,
    pub paychecks_elapsed: i64,

    // Savings inference
    pub planned_per_paycheck: Decimal,
    pub auto_saved: Decimal,
    pub effective_saved: Decimal,

    // Contribution
    pub remaining: Decimal,
    pub per_paycheck: Decimal,

    /// Fraction of the target already saved, clipped to `[0, 1]`.
    pub progress: Decimal,
}

impl GoalAllocation {
    /// Progress as a whole percentage, truncated toward zero.
    pub fn progress_percent(&self) -> u32 {
        (self.progress * Decimal::ONE_HUNDRED)
            .trunc()
            .to_u32()
            .unwrap_or(0)
    }
}

/// Output of one allocation run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllocationResult {
    /// One entry per input goal, in input order.
    pub goals: Vec<GoalAllocation>,
    pub total_allocations: Decimal,
    /// Paycheck left after all contributions; never negative.
    pub leftover: Decimal,
    /// Amount by which contributions exceed the paycheck; zero when covered.
    pub shortfall: Decimal,
}

impl AllocationResult {
    pub fn is_underfunded(&self) -> bool {
        self.shortfall > Decimal::ZERO
    }

    /// Non-zero slices of the paycheck, goals first and the leftover last.
    pub fn allocation_shares(&self) -> Vec<(String, Decimal)> {
        let mut shares: Vec<(String, Decimal)> = self
            .goals
            .iter()
            .filter(|g| g.per_paycheck > Decimal::ZERO)
            .map(|g| (g.name.clone(), g.per_paycheck))
            .collect();

        if self.leftover > Decimal::ZERO {
            shares.push((LEFTOVER_LABEL.to_string(), self.leftover));
        }
        shares
    }

    /// Copies of `goals` with `saved_so_far` replaced by the effective amount.
    ///
    /// `goals` must be the slice this result was calculated from.
    pub fn persisted_goals(&self, goals: &[Goal]) -> Vec<Goal> {
        goals
            .iter()
            .zip(&self.goals)
            .map(|(goal, allocation)| Goal {
                saved_so_far: allocation.effective_saved,
                ..goal.clone()
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    fn allocation(name: &str, per_paycheck: Decimal, effective_saved: Decimal) -> GoalAllocation {
        GoalAllocation {
            name: name.to_string(),
            target: dec!(1000),
            days_until_deadline: 28,
            paychecks_left: 2,
            total_paychecks: 2,
            paychecks_elapsed: 0,
            planned_per_paycheck: dec!(500),
            auto_saved: dec!(0),
            effective_saved,
            remaining: dec!(1000) - effective_saved,
            per_paycheck,
            progress: effective_saved / dec!(1000),
        }
    }

    fn result(goals: Vec<GoalAllocation>, leftover: Decimal) -> AllocationResult {
        let total_allocations = goals.iter().map(|g| g.per_paycheck).sum();
        AllocationResult {
            goals,
            total_allocations,
            leftover,
            shortfall: Decimal::ZERO,
        }
    }

    #[test]
    fn progress_percent_truncates() {
        let a = allocation("Rent", dec!(500), dec!(336.6));

        assert_eq!(a.progress_percent(), 33);
    }

    #[test]
    fn progress_percent_full() {
        let a = allocation("Rent", dec!(0), dec!(1000));

        assert_eq!(a.progress_percent(), 100);
    }

    #[test]
    fn shares_skip_zero_goals_and_append_leftover() {
        let r = result(
            vec![
                allocation("Rent", dec!(500), dec!(0)),
                allocation("Done", dec!(0), dec!(1000)),
            ],
            dec!(250),
        );

        assert_eq!(
            r.allocation_shares(),
            vec![
                ("Rent".to_string(), dec!(500)),
                (LEFTOVER_LABEL.to_string(), dec!(250)),
            ]
        );
    }

    #[test]
    fn shares_omit_zero_leftover() {
        let r = result(vec![allocation("Rent", dec!(500), dec!(0))], dec!(0));

        assert_eq!(r.allocation_shares(), vec![("Rent".to_string(), dec!(500))]);
    }

    #[test]
    fn underfunded_follows_shortfall() {
        let mut r = result(vec![], dec!(0));
        assert!(!r.is_underfunded());

        r.shortfall = dec!(0.01);
        assert!(r.is_underfunded());
    }

    #[test]
    fn persisted_goals_write_back_effective_saved() {
        let day = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let goal = Goal {
            name: "Rent".to_string(),
            target: dec!(1000),
            created: day,
            deadline: day,
            saved_so_far: dec!(0),
        };
        let r = result(vec![allocation("Rent", dec!(400), dec!(200))], dec!(0));

        let persisted = r.persisted_goals(std::slice::from_ref(&goal));

        assert_eq!(
            persisted,
            vec![Goal {
                saved_so_far: dec!(200),
                ..goal
            }]
        );
    }
}
