//! Turns loosely typed goal records into fully populated [`Goal`]s.
//!
//! Normalization never fails. A field that is missing or cannot be read is
//! replaced by a safe default and the substitution is reported through
//! [`NormalizedGoal::defaulted`], so the calling layer can tell the user that
//! e.g. a mistyped deadline silently became "today".
//!
//! | Field          | Default when missing or unreadable |
//! |----------------|------------------------------------|
//! | `name`         | [`PLACEHOLDER_GOAL_NAME`]          |
//! | `target`       | `0`                                |
//! | `created`      | `today`                            |
//! | `deadline`     | `today`                            |
//! | `saved_so_far` | `0`                                |
//!
//! Negative amounts are clamped to zero.

use std::fmt;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::models::{Goal, PLACEHOLDER_GOAL_NAME, RawGoal};

/// Accepted date layout at the normalization boundary.
const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GoalField {
    Name,
    Target,
    Created,
    Deadline,
    SavedSoFar,
}

impl GoalField {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Target => "target",
            Self::Created => "created",
            Self::Deadline => "deadline",
            Self::SavedSoFar => "saved_so_far",
        }
    }
}

impl fmt::Display for GoalField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why a field fell back to its default.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DefaultReason {
    Missing,
    Unparsable(String),
    Negative(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DefaultedField {
    pub field: GoalField,
    pub reason: DefaultReason,
}

impl fmt::Display for DefaultedField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.reason {
            DefaultReason::Missing => write!(f, "{} was missing", self.field),
            DefaultReason::Unparsable(text) => {
                write!(f, "{} '{}' could not be read", self.field, text)
            }
            DefaultReason::Negative(text) => {
                write!(f, "{} '{}' was negative", self.field, text)
            }
        }
    }
}

/// A goal together with the defaults that were applied to build it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedGoal {
    pub goal: Goal,
    pub defaulted: Vec<DefaultedField>,
}

impl NormalizedGoal {
    /// True when at least one field was unreadable or negative.
    ///
    /// Missing fields alone do not count; they are the normal shape of a
    /// freshly added goal.
    pub fn has_lossy_defaults(&self) -> bool {
        self.defaulted
            .iter()
            .any(|d| !matches!(d.reason, DefaultReason::Missing))
    }
}

/// Builds a [`Goal`] from `raw`, substituting defaults for anything unusable.
///
/// `today` stands in for unreadable dates; pass it explicitly so results are
/// reproducible.
pub fn normalize_goal(
    raw: &RawGoal,
    today: NaiveDate,
) -> NormalizedGoal {
    let mut defaulted = Vec::new();

    let name = match non_blank(&raw.name) {
        Some(name) => name.to_string(),
        None => {
            note(&mut defaulted, GoalField::Name, DefaultReason::Missing);
            PLACEHOLDER_GOAL_NAME.to_string()
        }
    };

    let target = normalize_amount(&raw.target, GoalField::Target, &mut defaulted);
    let created = normalize_date(&raw.created, today, GoalField::Created, &mut defaulted);
    let deadline = normalize_date(&raw.deadline, today, GoalField::Deadline, &mut defaulted);
    let saved_so_far = normalize_amount(&raw.saved_so_far, GoalField::SavedSoFar, &mut defaulted);

    NormalizedGoal {
        goal: Goal {
            name,
            target,
            created,
            deadline,
            saved_so_far,
        },
        defaulted,
    }
}

/// Normalizes every record, preserving order.
pub fn normalize_goals(
    raws: &[RawGoal],
    today: NaiveDate,
) -> Vec<NormalizedGoal> {
    raws.iter().map(|raw| normalize_goal(raw, today)).collect()
}

/// Reads a monetary amount such as `"1,250.50"`, `"$80"` or `"1e3"`.
pub fn parse_amount(text: &str) -> Option<Decimal> {
    let cleaned = text.trim().trim_start_matches('$').replace(',', "");
    if cleaned.is_empty() {
        return None;
    }
    cleaned
        .parse::<Decimal>()
        .or_else(|_| Decimal::from_scientific(&cleaned))
        .ok()
}

/// Reads an ISO-8601 calendar date (`YYYY-MM-DD`).
pub fn parse_date(text: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(text.trim(), DATE_FORMAT).ok()
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

fn normalize_amount(
    value: &Option<String>,
    field: GoalField,
    defaulted: &mut Vec<DefaultedField>,
) -> Decimal {
    let Some(text) = non_blank(value) else {
        note(defaulted, field, DefaultReason::Missing);
        return Decimal::ZERO;
    };

    match parse_amount(text) {
        Some(amount) if amount < Decimal::ZERO => {
            note(defaulted, field, DefaultReason::Negative(text.to_string()));
            Decimal::ZERO
        }
        Some(amount) => amount,
        None => {
            note(defaulted, field, DefaultReason::Unparsable(text.to_string()));
            Decimal::ZERO
        }
    }
}

fn normalize_date(
    value: &Option<String>,
    today: NaiveDate,
    field: GoalField,
    defaulted: &mut Vec<DefaultedField>,
) -> NaiveDate {
    let Some(text) = non_blank(value) else {
        note(defaulted, field, DefaultReason::Missing);
        return today;
    };

    parse_date(text).unwrap_or_else(|| {
        note(defaulted, field, DefaultReason::Unparsable(text.to_string()));
        today
    })
}

fn note(
    defaulted: &mut Vec<DefaultedField>,
    field: GoalField,
    reason: DefaultReason,
) {
    match &reason {
        DefaultReason::Missing => debug!(%field, "goal field missing, using default"),
        DefaultReason::Unparsable(input) | DefaultReason::Negative(input) => {
            warn!(%field, input = %input, "goal field unusable, using default")
        }
    }
    defaulted.push(DefaultedField { field, reason });
}
