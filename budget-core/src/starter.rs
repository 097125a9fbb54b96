//! Goals offered to a user who has none yet.

use chrono::{Datelike, Months, NaiveDate};
use rust_decimal::Decimal;

use crate::models::Goal;

/// Day of the month recurring bills are assumed to be due.
const BILL_DUE_DAY: u32 = 28;

/// Rent, utilities and auto insurance, dated relative to `today`.
///
/// The monthly bills are due on the 28th (this month, or next month once the
/// 28th has passed) and are back-dated two months so a plan is already in
/// progress. Auto insurance starts today and is due in six months.
pub fn starter_goals(today: NaiveDate) -> Vec<Goal> {
    let bill_due = next_bill_due(today);
    let bills_created = today.checked_sub_months(Months::new(2)).unwrap_or(today);
    let insurance_due = today.checked_add_months(Months::new(6)).unwrap_or(today);

    vec![
        Goal {
            name: "Rent".to_string(),
            target: Decimal::new(1200, 0),
            created: bills_created,
            deadline: bill_due,
            saved_so_far: Decimal::ZERO,
        },
        Goal {
            name: "Utilities".to_string(),
            target: Decimal::new(125, 0),
            created: bills_created,
            deadline: bill_due,
            saved_so_far: Decimal::ZERO,
        },
        Goal {
            name: "Auto Insurance".to_string(),
            target: Decimal::new(500, 0),
            created: today,
            deadline: insurance_due,
            saved_so_far: Decimal::ZERO,
        },
    ]
}

/// Blank goal template used when the user adds a goal without details.
pub fn new_goal(today: NaiveDate) -> Goal {
    Goal {
        name: "New Goal".to_string(),
        target: Decimal::ZERO,
        created: today,
        deadline: today,
        saved_so_far: Decimal::ZERO,
    }
}

fn next_bill_due(today: NaiveDate) -> NaiveDate {
    let month = if today.day() <= BILL_DUE_DAY {
        Some(today)
    } else {
        today.checked_add_months(Months::new(1))
    };

    month
        .and_then(|d| d.with_day(BILL_DUE_DAY))
        .unwrap_or(today)
}
