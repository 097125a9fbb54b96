//! Plain-text rendering of goals and allocation results.

use std::fmt;

use budget_core::calculations::common::{round_half_up, saturating_sum};
use budget_core::{AllocationResult, Goal, PayCycle};
use rust_decimal::Decimal;

/// Formats an amount as dollars and cents with thousands separators,
/// e.g. `$1,234.57`.
pub fn format_money(amount: Decimal) -> String {
    let rounded = round_half_up(amount);
    let text = format!("{:.2}", rounded.abs());
    let (whole, cents) = text.split_once('.').unwrap_or((text.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if rounded < Decimal::ZERO { "-" } else { "" };
    format!("{sign}${grouped}.{cents}")
}

/// Numbered listing of a user's goals.
pub struct GoalTable<'a>(pub &'a [Goal]);

impl fmt::Display for GoalTable<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return writeln!(f, "No goals.");
        }

        let width = name_width(self.0.iter().map(|g| g.name.as_str()));
        writeln!(
            f,
            "{:>3}  {:<width$}  {:>12}  {:>10}  {:>10}  {:>12}",
            "#", "Goal", "Target", "Created", "Deadline", "Saved"
        )?;
        for (i, goal) in self.0.iter().enumerate() {
            writeln!(
                f,
                "{:>3}  {:<width$}  {:>12}  {:>10}  {:>10}  {:>12}",
                i + 1,
                goal.name,
                format_money(goal.target),
                goal.created.format("%Y-%m-%d").to_string(),
                goal.deadline.format("%Y-%m-%d").to_string(),
                format_money(goal.saved_so_far),
            )?;
        }
        Ok(())
    }
}

/// Full allocation report: per-goal table, totals, and paycheck shares.
pub struct AllocationReport<'a> {
    pub cycle: &'a PayCycle,
    pub result: &'a AllocationResult,
}

impl fmt::Display for AllocationReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let result = self.result;
        writeln!(
            f,
            "Paycheck {} on {} ({})",
            format_money(self.cycle.paycheck_amount),
            self.cycle.pay_date.format("%Y-%m-%d"),
            self.cycle.frequency,
        )?;
        writeln!(f)?;

        let width = name_width(result.goals.iter().map(|g| g.name.as_str()));
        writeln!(
            f,
            "{:<width$}  {:>12}  {:>12}  {:>12}  {:>5}  {:>12}  {:>8}",
            "Goal", "Target", "Saved", "Remaining", "Left", "Per paycheck", "Progress"
        )?;
        for goal in &result.goals {
            writeln!(
                f,
                "{:<width$}  {:>12}  {:>12}  {:>12}  {:>5}  {:>12}  {:>7}%",
                goal.name,
                format_money(goal.target),
                format_money(goal.effective_saved),
                format_money(goal.remaining),
                goal.paychecks_left,
                format_money(goal.per_paycheck),
                goal.progress_percent(),
            )?;
        }
        writeln!(f)?;

        writeln!(f, "Total allocations: {}", format_money(result.total_allocations))?;
        writeln!(f, "Leftover:          {}", format_money(result.leftover))?;
        if result.is_underfunded() {
            writeln!(
                f,
                "Warning: goal contributions exceed this paycheck by {}",
                format_money(result.shortfall)
            )?;
        }

        let shares = result.allocation_shares();
        if !shares.is_empty() {
            let total = saturating_sum(shares.iter().map(|(_, amount)| *amount));
            writeln!(f)?;
            writeln!(f, "Paycheck shares:")?;
            let width = name_width(shares.iter().map(|(name, _)| name.as_str()));
            for (name, amount) in &shares {
                let percent = (*amount / total * Decimal::ONE_HUNDRED).round_dp(1);
                writeln!(
                    f,
                    "  {:<width$}  {:>12}  {:>5.1}%",
                    name,
                    format_money(*amount),
                    percent
                )?;
            }
        }
        Ok(())
    }
}

fn name_width<'a>(names: impl Iterator<Item = &'a str>) -> usize {
    names.map(|n| n.chars().count()).max().unwrap_or(0).max(4)
}
