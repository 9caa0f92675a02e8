use std::{
    fs,
    path::{Path, PathBuf},
};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::{
    error::{AppError, AppResult},
    state::AppState,
    structs::{intake_record::IntakeRecord, settings::Settings},
};

/// Everything the app persists, in one JSON document.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Backup {
    pub settings: Settings,
    pub history: Vec<IntakeRecord>,
    pub last_reset_date: NaiveDate,
}

pub fn backup_file_name(today: NaiveDate) -> String {
    format!("hydromate_backup_{}.json", today.format("%Y-%m-%d"))
}

/// Writes a backup of `state`. A directory `target` gets a dated file inside it.
pub fn export_backup(state: &AppState, target: &Path, today: NaiveDate) -> AppResult<PathBuf> {
    let path = if target.is_dir() {
        target.join(backup_file_name(today))
    } else {
        target.to_path_buf()
    };

    let json = serde_json::to_string_pretty(&state.to_backup(today))?;
    fs::write(&path, json)?;

    info!("Exported {} records to {:?}", state.history().len(), path);
    Ok(path)
}

/// Parses a backup file. Any missing or ill-typed field rejects the whole file.
pub fn read_backup(path: &Path) -> AppResult<Backup> {
    let raw = fs::read_to_string(path)?;

    serde_json::from_str(&raw).map_err(|e| {
        warn!("Rejected backup {:?}: {e}", path);
        AppError::InvalidBackup {
            path: path.to_path_buf(),
            reason: e.to_string(),
        }
    })
}

/// Replaces all state with the backup at `path`. On error nothing is changed.
pub fn import_backup(state: &mut AppState, path: &Path, today: NaiveDate) -> AppResult<()> {
    let backup = read_backup(path)?;
    state.replace_with(backup, today)
}
