//! Splits a paycheck across savings goals.
//!
//! For every goal the worksheet derives three things, in order:
//!
//! | Step      | Values |
//! |-----------|--------|
//! | Schedule  | `days_until_deadline`, `paychecks_left`, `total_paychecks`, `paychecks_elapsed` |
//! | Savings   | `planned_per_paycheck`, `auto_saved`, `effective_saved` |
//! | Allocation| `remaining`, `per_paycheck` |
//!
//! and then totals the contributions against the paycheck amount.
//!
//! Nothing here fails. Overdue goals still get one paycheck (a final lump
//! contribution), goals created after their deadline have a one-paycheck
//! plan, and a zero `saved_so_far` means "not tracked" and is replaced by
//! the amount a linear plan would have accumulated by now.
//!
//! # Example
//!
//! ```
//! use chrono::NaiveDate;
//! use rust_decimal_macros::dec;
//! use budget_core::{AllocationWorksheet, Goal, PayCycle, PayFrequency};
//!
//! let day = |d| NaiveDate::from_ymd_opt(2024, 1, d).unwrap();
//! let goals = vec![Goal {
//!     name: "Rent".to_string(),
//!     target: dec!(1200),
//!     created: day(1),
//!     deadline: day(29),
//!     saved_so_far: dec!(0),
//! }];
//! let cycle = PayCycle::new(PayFrequency::Biweekly, day(15), dec!(2000));
//!
//! let result = AllocationWorksheet::new(&cycle).calculate(&goals);
//!
//! assert_eq!(result.goals[0].paychecks_left, 1);
//! assert_eq!(result.goals[0].effective_saved, dec!(600));
//! assert_eq!(result.goals[0].per_paycheck, dec!(600));
//! assert_eq!(result.leftover, dec!(1400));
//! ```

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::calculations::common::{ceil_div, non_negative, saturating_sum};
use crate::models::{AllocationResult, Goal, GoalAllocation, PayCycle, RawGoal};
use crate::normalize::{NormalizedGoal, normalize_goals};

/// How a goal's timeline lines up with the paycheck cadence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GoalSchedule {
    pub days_until_deadline: i64,
    pub paychecks_left: i64,
    pub total_paychecks: i64,
    pub paychecks_elapsed: i64,
}

/// What the goal should already hold, and what the engine will assume it holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavingsEstimate {
    pub planned_per_paycheck: Decimal,
    pub auto_saved: Decimal,
    pub effective_saved: Decimal,
}

/// Allocation calculator bound to one pay cycle.
#[derive(Debug, Clone)]
pub struct AllocationWorksheet<'a> {
    cycle: &'a PayCycle,
}

impl<'a> AllocationWorksheet<'a> {
    pub fn new(cycle: &'a PayCycle) -> Self {
        Self { cycle }
    }

    /// Allocates the paycheck across `goals`, preserving their order.
    pub fn calculate(
        &self,
        goals: &[Goal],
    ) -> AllocationResult {
        let allocations: Vec<GoalAllocation> =
            goals.iter().map(|goal| self.allocate_goal(goal)).collect();

        let total_allocations = saturating_sum(allocations.iter().map(|a| a.per_paycheck));
        let leftover = self.leftover(total_allocations);
        let shortfall = self.shortfall(total_allocations);

        if shortfall > Decimal::ZERO {
            warn!(
                paycheck = %self.cycle.paycheck_amount,
                %total_allocations,
                %shortfall,
                "goal contributions exceed paycheck"
            );
        }
        debug!(
            goals = allocations.len(),
            %total_allocations,
            %leftover,
            "allocation complete"
        );

        AllocationResult {
            goals: allocations,
            total_allocations,
            leftover,
            shortfall,
        }
    }

    /// Derives the full allocation record for a single goal.
    pub fn allocate_goal(
        &self,
        goal: &Goal,
    ) -> GoalAllocation {
        let schedule = self.schedule(goal);
        let savings = self.estimate_savings(goal, &schedule);
        let remaining = self.remaining(goal.target, savings.effective_saved);
        let per_paycheck = self.per_paycheck(remaining, schedule.paychecks_left);

        debug!(
            goal = %goal.name,
            paychecks_left = schedule.paychecks_left,
            total_paychecks = schedule.total_paychecks,
            effective_saved = %savings.effective_saved,
            %per_paycheck,
            "allocated goal"
        );

        GoalAllocation {
            name: goal.name.clone(),
            target: goal.target,
            days_until_deadline: schedule.days_until_deadline,
            paychecks_left: schedule.paychecks_left,
            total_paychecks: schedule.total_paychecks,
            paychecks_elapsed: schedule.paychecks_elapsed,
            planned_per_paycheck: savings.planned_per_paycheck,
            auto_saved: savings.auto_saved,
            effective_saved: savings.effective_saved,
            remaining,
            per_paycheck,
            progress: self.progress(goal.target, savings.effective_saved),
        }
    }

    /// Places the goal on the paycheck timeline.
    pub fn schedule(
        &self,
        goal: &Goal,
    ) -> GoalSchedule {
        let days_until_deadline = (goal.deadline - self.cycle.pay_date).num_days();
        let paychecks_left = self.paychecks_left(days_until_deadline);
        let total_paychecks = self.total_paychecks(goal.created, goal.deadline);

        GoalSchedule {
            days_until_deadline,
            paychecks_left,
            total_paychecks,
            paychecks_elapsed: self.paychecks_elapsed(total_paychecks, paychecks_left),
        }
    }

    /// Paychecks left before the deadline, counting the current one.
    fn paychecks_left(
        &self,
        days_until_deadline: i64,
    ) -> i64 {
        ceil_div(days_until_deadline, self.cycle.days_between_paychecks()).max(1)
    }

    /// Paychecks in the whole plan; a deadline before creation counts as zero days.
    fn total_paychecks(
        &self,
        created: NaiveDate,
        deadline: NaiveDate,
    ) -> i64 {
        let plan_days = (deadline - created).num_days().max(0);
        ceil_div(plan_days, self.cycle.days_between_paychecks()).max(1)
    }

    /// Never negative, even when the pay date is before the goal was created.
    fn paychecks_elapsed(
        &self,
        total_paychecks: i64,
        paychecks_left: i64,
    ) -> i64 {
        (total_paychecks - paychecks_left).max(0)
    }

    fn estimate_savings(
        &self,
        goal: &Goal,
        schedule: &GoalSchedule,
    ) -> SavingsEstimate {
        let planned_per_paycheck = self.planned_per_paycheck(goal.target, schedule.total_paychecks);
        let auto_saved = planned_per_paycheck * Decimal::from(schedule.paychecks_elapsed);

        SavingsEstimate {
            planned_per_paycheck,
            auto_saved,
            effective_saved: self.effective_saved(goal.saved_so_far, auto_saved),
        }
    }

    fn planned_per_paycheck(
        &self,
        target: Decimal,
        total_paychecks: i64,
    ) -> Decimal {
        if total_paychecks > 0 {
            target / Decimal::from(total_paychecks)
        } else {
            Decimal::ZERO
        }
    }

    /// A user-entered amount always wins; zero means "not tracked".
    fn effective_saved(
        &self,
        saved_so_far: Decimal,
        auto_saved: Decimal,
    ) -> Decimal {
        if saved_so_far > Decimal::ZERO {
            saved_so_far
        } else {
            auto_saved
        }
    }

    fn remaining(
        &self,
        target: Decimal,
        effective_saved: Decimal,
    ) -> Decimal {
        non_negative(target - effective_saved)
    }

    fn per_paycheck(
        &self,
        remaining: Decimal,
        paychecks_left: i64,
    ) -> Decimal {
        if paychecks_left > 0 {
            remaining / Decimal::from(paychecks_left)
        } else {
            remaining
        }
    }

    fn progress(
        &self,
        target: Decimal,
        effective_saved: Decimal,
    ) -> Decimal {
        if target > Decimal::ZERO {
            // A tiny target against a huge saved amount overflows the ratio.
            effective_saved
                .checked_div(target)
                .unwrap_or(Decimal::ONE)
                .clamp(Decimal::ZERO, Decimal::ONE)
        } else {
            Decimal::ZERO
        }
    }

    fn leftover(
        &self,
        total_allocations: Decimal,
    ) -> Decimal {
        non_negative(self.cycle.paycheck_amount - total_allocations)
    }

    fn shortfall(
        &self,
        total_allocations: Decimal,
    ) -> Decimal {
        non_negative(total_allocations - self.cycle.paycheck_amount)
    }
}

/// Normalizes raw records against `today` and allocates the paycheck.
///
/// The normalized goals are returned alongside the result so the caller can
/// report defaulted fields and persist the cleaned records.
pub fn allocate_raw(
    raws: &[RawGoal],
    cycle: &PayCycle,
    today: NaiveDate,
) -> (Vec<NormalizedGoal>, AllocationResult) {
    let normalized = normalize_goals(raws, today);
    let goals: Vec<Goal> = normalized.iter().map(|n| n.goal.clone()).collect();
    let result = AllocationWorksheet::new(cycle).calculate(&goals);
    (normalized, result)
}
