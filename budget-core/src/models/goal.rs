use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};

/// Name given to goals that arrive without one.
pub const PLACEHOLDER_GOAL_NAME: &str = "Unnamed Goal";

/// A fully populated savings goal.
///
/// `saved_so_far == 0` means the user has not tracked savings for this goal
/// yet; the allocation engine then infers an amount from elapsed paychecks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Goal {
    pub name: String,
    pub target: Decimal,
    pub created: NaiveDate,
    pub deadline: NaiveDate,
    pub saved_so_far: Decimal,
}

/// A goal record as it arrives from a form, a CSV file or storage.
///
/// Every field is optional text. Amount fields also accept JSON numbers so
/// records written by other tools deserialize without a schema change.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawGoal {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(
        default,
        deserialize_with = "deserialize_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub target: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deadline: Option<String>,
    #[serde(
        default,
        deserialize_with = "deserialize_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub saved_so_far: Option<String>,
}

impl From<&Goal> for RawGoal {
    fn from(goal: &Goal) -> Self {
        Self {
            name: Some(goal.name.clone()),
            target: Some(goal.target.normalize().to_string()),
            created: Some(goal.created.format("%Y-%m-%d").to_string()),
            deadline: Some(goal.deadline.format("%Y-%m-%d").to_string()),
            saved_so_far: Some(goal.saved_so_far.normalize().to_string()),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum TextOrNumber {
    Text(String),
    Integer(i64),
    Float(f64),
}

fn deserialize_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<TextOrNumber> = Option::deserialize(deserializer)?;
    Ok(value.map(|v| match v {
        TextOrNumber::Text(s) => s,
        TextOrNumber::Integer(i) => i.to_string(),
        TextOrNumber::Float(f) => f.to_string(),
    }))
}
