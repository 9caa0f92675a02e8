/// Percentages of the daily goal that trigger a notification when crossed.
pub const MILESTONES: [u8; 4] = [25, 50, 75, 100];

pub const MILESTONE_TITLE: &str = "Milestone Reached! 🎉";

pub fn milestone_message(milestone: u8) -> String {
    format!("You've reached {milestone}% of your daily goal. Keep it up!")
}

/// Milestones crossed when the day's intake goes from `before_ml` to `after_ml`, in ascending order.
///
/// A milestone counts as crossed when the old progress was below it and the new progress is at
/// or above it, so each one fires at most once per addition. A goal of 0 never crosses anything.
pub fn crossed_milestones(before_ml: f64, after_ml: f64, goal_ml: f64) -> Vec<u8> {
    if goal_ml <= 0.0 {
        return Vec::new();
    }

    let old_progress = before_ml / goal_ml * 100.0;
    let new_progress = after_ml / goal_ml * 100.0;

    MILESTONES
        .into_iter()
        .filter(|&milestone| {
            let threshold = f64::from(milestone);
            old_progress < threshold && threshold <= new_progress
        })
        .collect()
}
