use serde::{Deserialize, Serialize};

use super::unit::{convert, Unit};
use crate::error::{AppError, AppResult};

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    /// Target intake per calendar day, in milliliters
    pub daily_goal: f64,

    /// Unit used when showing or entering amounts
    pub unit: Unit,

    /// Minutes between reminders. 0 turns reminders off
    pub reminder_interval: u32,

    /// Amount logged by a plain `drink`, in milliliters
    pub glass_size: f64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            daily_goal: 2000.0,
            unit: Unit::Ml,
            reminder_interval: 60,
            glass_size: 250.0,
        }
    }
}

impl Settings {
    /// Converts a stored milliliter amount into the display unit.
    pub fn display(&self, amount_ml: f64) -> f64 {
        convert(amount_ml, Unit::Ml, self.unit)
    }

    /// Goal and glass size must be finite and not negative, or they cannot be stored.
    pub fn validate(&self) -> AppResult<()> {
        for (what, value) in [("daily goal", self.daily_goal), ("glass size", self.glass_size)] {
            if !value.is_finite() || value < 0.0 {
                return Err(AppError::InvalidAmount { what, value });
            }
        }
        Ok(())
    }

    /// Progress towards the daily goal in percent, unclamped. 0 when there is no goal.
    pub fn progress(&self, intake_ml: f64) -> f64 {
        if self.daily_goal > 0.0 {
            intake_ml / self.daily_goal * 100.0
        } else {
            0.0
        }
    }
}

/// Turns a number typed in `unit` into whole milliliters, the way the settings form stores it.
pub fn entered_to_ml(value: f64, unit: Unit) -> f64 {
    convert(value, unit, Unit::Ml).round()
}
