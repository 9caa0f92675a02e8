use chrono::{Days, NaiveDate};

use crate::structs::intake_record::IntakeRecord;

/// Total intake logged for one calendar day.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DayTotal {
    pub date: NaiveDate,
    pub amount: f64,
}

pub fn day_total(history: &[IntakeRecord], day: NaiveDate) -> f64 {
    history
        .iter()
        .filter(|record| record.date == day)
        .fold(0.0, |total, record| total + record.amount)
}

pub fn today_total(history: &[IntakeRecord], today: NaiveDate) -> f64 {
    day_total(history, today)
}

/// Totals for the seven days ending `today`, oldest first. Days without drinks are 0.
pub fn weekly_totals(history: &[IntakeRecord], today: NaiveDate) -> Vec<DayTotal> {
    (0..7u64)
        .rev()
        .filter_map(|days_ago| today.checked_sub_days(Days::new(days_ago)))
        .map(|date| DayTotal {
            date,
            amount: day_total(history, date),
        })
        .collect()
}
