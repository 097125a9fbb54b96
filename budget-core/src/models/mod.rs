mod allocation;
mod goal;
mod pay_cycle;

pub use allocation::{AllocationResult, GoalAllocation, LEFTOVER_LABEL};
pub use goal::{Goal, PLACEHOLDER_GOAL_NAME, RawGoal};
pub use pay_cycle::{ParseFrequencyError, PayCycle, PayFrequency};
