use chrono::{DateTime, Local, NaiveDate};
use tracing::{info, instrument};

use crate::{
    aggregate::{today_total, weekly_totals, DayTotal},
    backup::Backup,
    error::{AppError, AppResult},
    milestone::crossed_milestones,
    storage::Storage,
    structs::{intake_record::IntakeRecord, settings::Settings},
};

/// Result of logging a drink.
#[derive(Debug, Clone, PartialEq)]
pub struct IntakeOutcome {
    pub record: IntakeRecord,
    pub before: f64,
    pub after: f64,
    /// Milestones crossed by this drink, ascending
    pub milestones: Vec<u8>,
}

/// Settings, drink log and last-reset date, written through to [`Storage`] on every change.
#[derive(Debug)]
pub struct AppState {
    storage: Storage,
    settings: Settings,
    history: Vec<IntakeRecord>,
    last_reset_date: Option<NaiveDate>,
    current_intake: f64,
}

impl AppState {
    pub fn load(storage: Storage) -> Self {
        let settings = storage.load_settings();
        let history = storage.load_history();
        let last_reset_date = storage.load_last_reset();

        Self {
            storage,
            settings,
            history,
            last_reset_date,
            current_intake: 0.0,
        }
    }

    /// Re-reads everything from storage, picking up changes made by another process.
    pub fn reload(&mut self, today: NaiveDate) -> AppResult<()> {
        self.settings = self.storage.load_settings();
        self.history = self.storage.load_history();
        self.last_reset_date = self.storage.load_last_reset();
        self.refresh_day(today)?;
        Ok(())
    }

    pub fn storage(&self) -> &Storage {
        &self.storage
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn history(&self) -> &[IntakeRecord] {
        &self.history
    }

    pub fn last_reset_date(&self) -> Option<NaiveDate> {
        self.last_reset_date
    }

    /// Intake counted towards the current day, in milliliters.
    pub fn current_intake(&self) -> f64 {
        self.current_intake
    }

    pub fn progress(&self) -> f64 {
        self.settings.progress(self.current_intake)
    }

    pub fn weekly_totals(&self, today: NaiveDate) -> Vec<DayTotal> {
        weekly_totals(&self.history, today)
    }

    /// Day-boundary check. Starts a fresh day when the stored reset date is not `today`,
    /// then recomputes the current intake from the log. Returns whether a new day started.
    #[instrument(skip(self))]
    pub fn refresh_day(&mut self, today: NaiveDate) -> AppResult<bool> {
        let rolled_over = self.last_reset_date != Some(today);
        if rolled_over {
            info!("New day, resetting current intake");
            self.last_reset_date = Some(today);
            self.storage.save_last_reset(self.last_reset_date)?;
        }

        self.current_intake = today_total(&self.history, today);
        Ok(rolled_over)
    }

    /// Appends a drink of `amount_ml` recorded at `now` and reports the milestones it crossed.
    #[instrument(skip(self))]
    pub fn add_intake(&mut self, amount_ml: f64, now: DateTime<Local>) -> AppResult<IntakeOutcome> {
        if !amount_ml.is_finite() || amount_ml <= 0.0 {
            return Err(AppError::InvalidAmount {
                what: "drink amount",
                value: amount_ml,
            });
        }

        self.refresh_day(now.date_naive())?;

        let before = self.current_intake;
        let after = before + amount_ml;
        let milestones = crossed_milestones(before, after, self.settings.daily_goal);

        let record = IntakeRecord::at(self.next_id(now), amount_ml, now);
        self.history.push(record);
        self.storage.save_history(&self.history)?;
        self.current_intake = after;

        info!(id = record.id, after, "Logged drink");

        Ok(IntakeOutcome {
            record,
            before,
            after,
            milestones,
        })
    }

    // Millisecond timestamps, bumped past the last id if the clock has not moved on
    fn next_id(&self, now: DateTime<Local>) -> i64 {
        let candidate = now.timestamp_millis();
        match self.history.iter().map(|r| r.id).max() {
            Some(last) if last >= candidate => last + 1,
            _ => candidate,
        }
    }

    pub fn save_settings(&mut self, settings: Settings) -> AppResult<()> {
        settings.validate()?;
        self.storage.save_settings(&settings)?;
        self.settings = settings;
        Ok(())
    }

    /// Snapshot for export. A state that never ran the day check reports `today`.
    pub fn to_backup(&self, today: NaiveDate) -> Backup {
        Backup {
            settings: self.settings,
            history: self.history.clone(),
            last_reset_date: self.last_reset_date.unwrap_or(today),
        }
    }

    /// Replaces everything with the backup's contents and recomputes today's intake.
    /// On error neither memory nor disk is changed.
    #[instrument(skip(self, backup))]
    pub fn replace_with(&mut self, backup: Backup, today: NaiveDate) -> AppResult<()> {
        backup.settings.validate()?;
        if let Some(bad) = backup
            .history
            .iter()
            .find(|record| !record.amount.is_finite() || record.amount < 0.0)
        {
            return Err(AppError::InvalidAmount {
                what: "drink amount",
                value: bad.amount,
            });
        }

        self.storage.replace_all(
            &backup.settings,
            &backup.history,
            Some(backup.last_reset_date),
        )?;

        self.settings = backup.settings;
        self.history = backup.history;
        self.last_reset_date = Some(backup.last_reset_date);
        self.current_intake = today_total(&self.history, today);

        info!(records = self.history.len(), "Replaced state from backup");
        Ok(())
    }
}
