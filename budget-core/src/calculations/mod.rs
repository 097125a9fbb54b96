//! Paycheck allocation calculations.
//!
//! The engine is split the same way the numbers are derived: a schedule
//! (how many paychecks a goal has left), an inferred savings amount, and the
//! contribution taken from the current paycheck.

pub mod allocation;
pub mod common;

pub use allocation::{AllocationWorksheet, GoalSchedule, SavingsEstimate, allocate_raw};
