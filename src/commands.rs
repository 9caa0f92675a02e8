use std::{future::Future, path::Path, sync::Arc, time::Duration};

use chrono::{DateTime, Local, NaiveDate};
use tokio::{select, time};
use tracing::{info, instrument, warn};

use crate::{
    backup::{export_backup, import_backup},
    cli::{Preset, SettingsUpdate},
    error::AppResult,
    milestone::{milestone_message, MILESTONE_TITLE},
    notification::Notifier,
    state::AppState,
    structs::{
        settings::{entered_to_ml, Settings},
        unit::{convert, Unit},
    },
    tasks::reminder::ReminderScheduler,
};

const PROGRESS_BAR_WIDTH: usize = 20;
const HISTORY_BAR_WIDTH: usize = 30;

/// How a drink's size was given on the command line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DrinkAmount {
    Glass,
    Preset(Preset),
    Entered { value: f64, unit: Option<Unit> },
}

impl DrinkAmount {
    pub fn to_ml(self, settings: &Settings) -> f64 {
        match self {
            DrinkAmount::Glass => settings.glass_size,
            DrinkAmount::Preset(preset) => preset.ml(),
            DrinkAmount::Entered { value, unit } => {
                convert(value, unit.unwrap_or(settings.unit), Unit::Ml)
            }
        }
    }
}

// Adding 0.0 turns -0.0 into 0.0 so empty days never print as "-0"
fn rounded(amount_ml: f64, unit: Unit) -> String {
    format!("{:.0}", convert(amount_ml, Unit::Ml, unit) + 0.0)
}

fn precise(amount_ml: f64, unit: Unit) -> String {
    match unit {
        Unit::Ml => rounded(amount_ml, unit),
        _ => format!("{:.1}", convert(amount_ml, Unit::Ml, unit)),
    }
}

fn bar(filled: usize, width: usize, fill: char, empty: char) -> String {
    let filled = filled.min(width);
    let mut bar = String::with_capacity(width * 3);
    bar.extend(std::iter::repeat(fill).take(filled));
    bar.extend(std::iter::repeat(empty).take(width - filled));
    bar
}

pub fn status(state: &AppState) -> String {
    let settings = state.settings();
    let progress = state.progress();
    let clamped = progress.clamp(0.0, 100.0);
    let filled = (clamped / 100.0 * PROGRESS_BAR_WIDTH as f64).round() as usize;

    format!(
        "Today's intake: {} / {} {} ({:.0}%)\n[{}]",
        rounded(state.current_intake(), settings.unit),
        rounded(settings.daily_goal, settings.unit),
        settings.unit,
        progress + 0.0,
        bar(filled, PROGRESS_BAR_WIDTH, '#', '-'),
    )
}

/// Logs a drink and sends one notification per milestone it crossed.
#[instrument(skip(state, notifier))]
pub fn drink(
    state: &mut AppState,
    notifier: &dyn Notifier,
    amount: DrinkAmount,
    now: DateTime<Local>,
) -> AppResult<String> {
    let amount_ml = amount.to_ml(state.settings());
    let outcome = state.add_intake(amount_ml, now)?;

    for milestone in &outcome.milestones {
        info!("Milestone {milestone}% reached");
        notifier.send(MILESTONE_TITLE, &milestone_message(*milestone));
    }

    let settings = state.settings();
    Ok(format!(
        "Logged {} {} ({} / {} {} today)",
        precise(amount_ml, settings.unit),
        settings.unit,
        rounded(outcome.after, settings.unit),
        rounded(settings.daily_goal, settings.unit),
        settings.unit,
    ))
}

pub fn history(state: &AppState, today: NaiveDate) -> String {
    let unit = state.settings().unit;
    let week = state.weekly_totals(today);
    let scale = week
        .iter()
        .map(|day| day.amount)
        .fold(state.settings().daily_goal, f64::max);

    week.iter()
        .map(|day| {
            let filled = if scale > 0.0 {
                (day.amount / scale * HISTORY_BAR_WIDTH as f64).round() as usize
            } else {
                0
            };
            format!(
                "{} {} {} {} {}",
                day.date.format("%a"),
                day.date.format("%m-%d"),
                bar(filled, HISTORY_BAR_WIDTH, '█', ' '),
                rounded(day.amount, unit),
                unit,
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn show_settings(settings: &Settings) -> String {
    let reminders = match settings.reminder_interval {
        0 => "off".to_string(),
        minutes => format!("every {minutes} minutes"),
    };

    format!(
        "Daily goal:   {} {unit}\nGlass size:   {} {unit}\nDisplay unit: {unit}\nReminders:    {reminders}",
        rounded(settings.daily_goal, settings.unit),
        rounded(settings.glass_size, settings.unit),
        unit = settings.unit,
    )
}

/// Applies `update` on top of the current settings and saves the whole object.
pub fn update_settings(state: &mut AppState, update: &SettingsUpdate) -> AppResult<String> {
    let current = *state.settings();
    let unit = update.unit.unwrap_or(current.unit);

    let settings = Settings {
        daily_goal: update
            .goal
            .map_or(current.daily_goal, |goal| entered_to_ml(goal, unit)),
        unit,
        reminder_interval: update.interval.unwrap_or(current.reminder_interval),
        glass_size: update
            .glass
            .map_or(current.glass_size, |glass| entered_to_ml(glass, unit)),
    };

    state.save_settings(settings)?;
    info!("Saved settings: {settings:?}");

    Ok(show_settings(&settings))
}

pub fn export(state: &AppState, output: Option<&Path>, today: NaiveDate) -> AppResult<String> {
    let path = export_backup(state, output.unwrap_or(Path::new(".")), today)?;
    Ok(format!("Data exported to {}", path.display()))
}

pub fn import(state: &mut AppState, file: &Path, today: NaiveDate) -> AppResult<String> {
    import_backup(state, file, today)?;
    Ok(format!(
        "Data imported successfully! {} records, {} {} today",
        state.history().len(),
        rounded(state.current_intake(), state.settings().unit),
        state.settings().unit,
    ))
}

/// Sends reminders until `shutdown` resolves. Settings are re-read every `poll_every`
/// so a changed interval made by another command re-arms the reminder.
#[instrument(skip_all)]
pub async fn watch(
    mut state: AppState,
    notifier: Arc<dyn Notifier>,
    poll_every: Duration,
    shutdown: impl Future<Output = ()>,
) -> AppResult<()> {
    let mut scheduler = ReminderScheduler::new(notifier);
    let mut interval = state.settings().reminder_interval;
    scheduler.arm(interval);
    info!("Watching, reminder interval {interval} minutes");

    let mut poll = time::interval_at(time::Instant::now() + poll_every, poll_every);
    tokio::pin!(shutdown);

    loop {
        select! {
            () = &mut shutdown => {
                info!("Shutting down");
                break;
            },
            _ = poll.tick() => {
                if let Err(e) = state.reload(Local::now().date_naive()) {
                    warn!("Unable to reload state: {e}");
                    continue;
                }

                let latest = state.settings().reminder_interval;
                if latest != interval {
                    info!("Reminder interval changed from {interval} to {latest} minutes");
                    interval = latest;
                    scheduler.arm(interval);
                }
            },
        };
    }

    scheduler.shutdown().await;
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use chrono::TimeZone;
    use tokio::sync::oneshot;

    use super::*;
    use crate::{
        notification::Permission, storage::Storage, tasks::reminder::REMINDER_TITLE,
    };

    #[derive(Default)]
    struct Recorder {
        sent: Mutex<Vec<(String, String)>>,
    }

    impl Recorder {
        fn titles(&self) -> Vec<String> {
            self.sent
                .lock()
                .unwrap()
                .iter()
                .map(|(title, _)| title.clone())
                .collect()
        }
    }

    impl Notifier for Recorder {
        fn request_permission(&self) -> Permission {
            Permission::Granted
        }

        fn permission(&self) -> Permission {
            Permission::Granted
        }

        fn deliver(&self, title: &str, body: &str) {
            self.sent
                .lock()
                .unwrap()
                .push((title.to_string(), body.to_string()));
        }
    }

    fn noon() -> DateTime<Local> {
        Local.with_ymd_and_hms(2024, 4, 10, 12, 0, 0).unwrap()
    }

    fn state_in(dir: &Path) -> AppState {
        let mut state = AppState::load(Storage::open(dir).unwrap());
        state.refresh_day(noon().date_naive()).unwrap();
        state
    }

    #[test]
    fn drink_fires_quarter_milestone_once() {
        let dir = tempfile::tempdir().unwrap();
        let mut state = state_in(dir.path());
        let recorder = Recorder::default();

        let out = drink(
            &mut state,
            &recorder,
            DrinkAmount::Entered { value: 500.0, unit: None },
            noon(),
        )
        .unwrap();

        assert_eq!(out, "Logged 500 ml (500 / 2000 ml today)");
        assert_eq!(
            *recorder.sent.lock().unwrap(),
            vec![(
                MILESTONE_TITLE.to_string(),
                "You've reached 25% of your daily goal. Keep it up!".to_string()
            )]
        );

        drink(&mut state, &recorder, DrinkAmount::Glass, noon()).unwrap();
        assert_eq!(recorder.titles().len(), 1);
    }

    #[test]
    fn drink_amounts_are_stored_in_ml() {
        let settings = Settings {
            unit: Unit::Cups,
            ..Settings::default()
        };

        assert_eq!(DrinkAmount::Glass.to_ml(&settings), 250.0);
        assert_eq!(DrinkAmount::Preset(Preset::Large).to_ml(&settings), 500.0);
        assert_eq!(
            DrinkAmount::Entered { value: 1.0, unit: None }.to_ml(&settings),
            236.588
        );
        assert_eq!(
            DrinkAmount::Entered { value: 2.0, unit: Some(Unit::Oz) }.to_ml(&settings),
            59.147
        );
    }

    #[test]
    fn empty_day_shows_plain_zero() {
        let dir = tempfile::tempdir().unwrap();
        let state = state_in(dir.path());

        assert!(status(&state).starts_with("Today's intake: 0 / 2000 ml (0%)"));
        let out = history(&state, noon().date_naive());
        assert!(out.lines().all(|line| line.ends_with(" 0 ml")));
    }

    #[test]
    fn status_clamps_the_bar() {
        let dir = tempfile::tempdir().unwrap();
        let mut state = state_in(dir.path());
        let recorder = Recorder::default();
        drink(&mut state, &recorder, DrinkAmount::Entered { value: 3000.0, unit: None }, noon())
            .unwrap();

        let out = status(&state);
        assert!(out.starts_with("Today's intake: 3000 / 2000 ml (150%)"));
        assert!(out.ends_with(&format!("[{}]", "#".repeat(PROGRESS_BAR_WIDTH))));
        assert_eq!(recorder.titles().len(), 4);
    }

    #[test]
    fn history_lists_seven_days() {
        let dir = tempfile::tempdir().unwrap();
        let mut state = state_in(dir.path());
        let recorder = Recorder::default();
        drink(&mut state, &recorder, DrinkAmount::Preset(Preset::Medium), noon()).unwrap();

        let out = history(&state, noon().date_naive());
        let lines: Vec<_> = out.lines().collect();
        assert_eq!(lines.len(), 7);
        assert!(lines[6].starts_with("Wed 04-10"));
        assert!(lines[6].ends_with("250 ml"));
        assert!(lines[0].ends_with("0 ml"));
    }

    #[test]
    fn settings_are_entered_in_the_new_unit() {
        let dir = tempfile::tempdir().unwrap();
        let mut state = state_in(dir.path());

        let update = SettingsUpdate {
            goal: Some(64.0),
            unit: Some(Unit::Oz),
            interval: Some(0),
            glass: None,
        };
        let out = update_settings(&mut state, &update).unwrap();

        assert_eq!(state.settings().daily_goal, 1893.0);
        assert_eq!(state.settings().glass_size, 250.0);
        assert_eq!(state.settings().reminder_interval, 0);
        assert!(out.contains("Reminders:    off"));
        assert_eq!(state_in(dir.path()).settings().unit, Unit::Oz);
    }

    #[tokio::test(start_paused = true)]
    async fn watch_rearms_when_interval_changes() {
        let dir = tempfile::tempdir().unwrap();
        let storage = Storage::open(dir.path()).unwrap();
        storage
            .save_settings(&Settings {
                reminder_interval: 0,
                ..Settings::default()
            })
            .unwrap();

        let recorder = Arc::new(Recorder::default());
        let (stop, stopped) = oneshot::channel::<()>();
        let watcher = tokio::spawn(watch(
            AppState::load(storage.clone()),
            recorder.clone(),
            Duration::from_secs(30),
            async move {
                stopped.await.ok();
            },
        ));

        time::sleep(Duration::from_secs(10 * 60)).await;
        assert!(recorder.titles().is_empty());

        // Picked up at the next poll, first reminder one minute later
        storage
            .save_settings(&Settings {
                reminder_interval: 1,
                ..Settings::default()
            })
            .unwrap();
        time::sleep(Duration::from_secs(95)).await;
        assert_eq!(recorder.titles(), vec![REMINDER_TITLE.to_string()]);

        stop.send(()).unwrap();
        watcher.await.unwrap().unwrap();
    }
}
