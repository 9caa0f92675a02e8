use {
    chrono::{DateTime, Local, NaiveDate, Utc},
    serde::{Deserialize, Serialize},
};

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct IntakeRecord {
    /// Epoch milliseconds at creation, unique within a log
    pub id: i64,

    /// Amount of water drank in milliliters
    pub amount: f64,

    /// Local calendar day the drink counts towards
    pub date: NaiveDate,

    /// When the drink was recorded
    pub timestamp: DateTime<Utc>,
}

impl IntakeRecord {
    pub fn at(id: i64, amount: f64, when: DateTime<Local>) -> Self {
        Self {
            id,
            amount,
            date: when.date_naive(),
            timestamp: when.with_timezone(&Utc),
        }
    }
}
