use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// How often the paycheck arrives.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PayFrequency {
    Weekly,
    #[default]
    Biweekly,
    Monthly,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown pay frequency '{0}'; expected weekly, biweekly or monthly")]
pub struct ParseFrequencyError(pub String);

impl PayFrequency {
    /// Days between two consecutive paychecks.
    pub fn days(&self) -> i64 {
        match self {
            Self::Weekly => 7,
            Self::Biweekly => 14,
            Self::Monthly => 30,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Weekly => "weekly",
            Self::Biweekly => "biweekly",
            Self::Monthly => "monthly",
        }
    }

    pub fn from_days(days: i64) -> Option<Self> {
        match days {
            7 => Some(Self::Weekly),
            14 => Some(Self::Biweekly),
            30 => Some(Self::Monthly),
            _ => None,
        }
    }
}

impl FromStr for PayFrequency {
    type Err = ParseFrequencyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "weekly" | "7" => Ok(Self::Weekly),
            "biweekly" | "bi-weekly" | "14" => Ok(Self::Biweekly),
            "monthly" | "30" => Ok(Self::Monthly),
            _ => Err(ParseFrequencyError(s.to_string())),
        }
    }
}

impl fmt::Display for PayFrequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The paycheck currently being split across goals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayCycle {
    pub frequency: PayFrequency,
    pub pay_date: NaiveDate,
    pub paycheck_amount: Decimal,
}

impl PayCycle {
    pub fn new(frequency: PayFrequency, pay_date: NaiveDate, paycheck_amount: Decimal) -> Self {
        Self {
            frequency,
            pay_date,
            paycheck_amount,
        }
    }

    /// Folds side income into the amount available this cycle. The total is
    /// pinned at [`Decimal::MAX`].
    pub fn with_additional_income(mut self, additional: Decimal) -> Self {
        self.paycheck_amount = self.paycheck_amount.saturating_add(additional);
        self
    }

    pub fn days_between_paychecks(&self) -> i64 {
        self.frequency.days()
    }
}
