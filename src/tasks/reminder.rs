use std::{sync::Arc, time::Duration};

use tokio::{
    select,
    sync::Notify,
    task::JoinHandle,
    time::{self, Instant, MissedTickBehavior},
};
use tracing::{debug, instrument, trace};

use crate::notification::Notifier;

pub const REMINDER_TITLE: &str = "💧 Time to Hydrate!";
pub const REMINDER_BODY: &str = "Don't forget to drink some water.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReminderState {
    Idle,
    Armed(u32),
}

struct ArmedTimer {
    interval_minutes: u32,
    cancel: Arc<Notify>,
    handle: JoinHandle<()>,
}

/// Sends the reminder notification every N minutes until disarmed or dropped.
///
/// Arming always starts a fresh timer, so the first reminder comes one full interval after
/// the last call to [`ReminderScheduler::arm`]. Must be used from within a tokio runtime.
pub struct ReminderScheduler {
    notifier: Arc<dyn Notifier>,
    armed: Option<ArmedTimer>,
}

impl ReminderScheduler {
    pub fn new(notifier: Arc<dyn Notifier>) -> Self {
        Self {
            notifier,
            armed: None,
        }
    }

    pub fn state(&self) -> ReminderState {
        match &self.armed {
            Some(timer) => ReminderState::Armed(timer.interval_minutes),
            None => ReminderState::Idle,
        }
    }

    /// Cancels any running timer, then starts one firing every `interval_minutes`. 0 only cancels.
    pub fn arm(&mut self, interval_minutes: u32) {
        self.disarm();
        if interval_minutes == 0 {
            return;
        }

        let period = Duration::from_secs(u64::from(interval_minutes) * 60);
        let cancel = Arc::new(Notify::new());
        let handle = tokio::spawn(reminder_task(
            Instant::now() + period,
            period,
            self.notifier.clone(),
            cancel.clone(),
        ));

        debug!("Reminder armed every {interval_minutes} minutes");
        self.armed = Some(ArmedTimer {
            interval_minutes,
            cancel,
            handle,
        });
    }

    pub fn disarm(&mut self) {
        if let Some(timer) = self.armed.take() {
            debug!("Reminder disarmed");
            timer.cancel.notify_one();
        }
    }

    /// Disarms and waits for the timer task to finish.
    pub async fn shutdown(mut self) {
        if let Some(timer) = self.armed.take() {
            timer.cancel.notify_one();
            timer.handle.await.ok();
        }
    }
}

impl Drop for ReminderScheduler {
    fn drop(&mut self) {
        self.disarm();
    }
}

#[instrument(skip(notifier, cancel))]
async fn reminder_task(
    start: Instant,
    period: Duration,
    notifier: Arc<dyn Notifier>,
    cancel: Arc<Notify>,
) {
    let mut ticker = time::interval_at(start, period);
    // A suspended machine should get one reminder on wake, not a burst
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        select! {
            biased;

            () = cancel.notified() => {
                trace!("Reminder task cancelled");
                break;
            },
            _ = ticker.tick() => {
                trace!("Reminder due, notifying");
                notifier.send(REMINDER_TITLE, REMINDER_BODY);
            },
        };
    }
}
