use std::{
    fs,
    path::{Path, PathBuf},
};

use chrono::NaiveDate;
use directories::ProjectDirs;
use serde::{de::DeserializeOwned, Serialize};
use tracing::warn;

use crate::{
    error::{AppError, AppResult},
    structs::{intake_record::IntakeRecord, settings::Settings},
};

pub const SETTINGS_KEY: &str = "settings";
pub const HISTORY_KEY: &str = "history";
pub const LAST_RESET_KEY: &str = "last_reset";

/// Platform data directory, e.g. `~/.local/share/hydromate` on Linux.
pub fn default_data_dir() -> AppResult<PathBuf> {
    ProjectDirs::from("app", "HydroMate", "hydromate")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .ok_or(AppError::NoDataDir)
}

/// Key-value store backed by one JSON file per key.
#[derive(Debug, Clone)]
pub struct Storage {
    data_dir: PathBuf,
}

impl Storage {
    pub fn open(data_dir: impl Into<PathBuf>) -> AppResult<Self> {
        let data_dir = data_dir.into();

        if !data_dir.try_exists()? {
            fs::create_dir_all(&data_dir)?;
        }

        Ok(Self { data_dir })
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.data_dir.join(format!("{key}.json"))
    }

    /// Reads `key`, or `None` when it was never written.
    pub fn read<T: DeserializeOwned>(&self, key: &str) -> AppResult<Option<T>> {
        let path = self.path_for(key);
        if !path.try_exists()? {
            return Ok(None);
        }

        let raw = fs::read_to_string(path)?;
        Ok(Some(serde_json::from_str(&raw)?))
    }

    /// Reads `key`, falling back to `T::default()` when it is missing or unreadable.
    pub fn read_or_default<T: DeserializeOwned + Default>(&self, key: &str) -> T {
        match self.read(key) {
            Ok(Some(value)) => value,
            Ok(None) => T::default(),
            Err(e) => {
                warn!("Unable to read stored {key}, using defaults: {e}");
                T::default()
            }
        }
    }

    pub fn write<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> AppResult<()> {
        self.write_batch(&[(key, serde_json::to_string_pretty(value)?)])
    }

    /// Writes every entry or none of them. When a write fails, entries already written get
    /// their previous contents back (or are removed if they did not exist).
    pub fn write_batch(&self, entries: &[(&str, String)]) -> AppResult<()> {
        let mut previous = Vec::with_capacity(entries.len());
        for (key, _) in entries {
            let path = self.path_for(key);
            let old = if path.try_exists()? {
                Some(fs::read_to_string(&path)?)
            } else {
                None
            };
            previous.push((path, old));
        }

        for (index, (_, data)) in entries.iter().enumerate() {
            if let Err(e) = fs::write(&previous[index].0, data) {
                warn!("Write to {:?} failed, rolling back: {e}", previous[index].0);
                for (path, old) in &previous[..=index] {
                    let restored = match old {
                        Some(raw) => fs::write(path, raw),
                        None if path.is_file() => fs::remove_file(path),
                        None => Ok(()),
                    };
                    if let Err(e) = restored {
                        warn!("Unable to restore {:?}: {e}", path);
                    }
                }
                return Err(e.into());
            }
        }

        Ok(())
    }

    /// Replaces settings, history and last reset date together.
    pub fn replace_all(
        &self,
        settings: &Settings,
        history: &[IntakeRecord],
        last_reset: Option<NaiveDate>,
    ) -> AppResult<()> {
        self.write_batch(&[
            (SETTINGS_KEY, serde_json::to_string_pretty(settings)?),
            (HISTORY_KEY, serde_json::to_string_pretty(history)?),
            (LAST_RESET_KEY, serde_json::to_string(&encode_date(last_reset))?),
        ])
    }

    pub fn load_settings(&self) -> Settings {
        self.read_or_default(SETTINGS_KEY)
    }

    pub fn save_settings(&self, settings: &Settings) -> AppResult<()> {
        self.write(SETTINGS_KEY, settings)
    }

    pub fn load_history(&self) -> Vec<IntakeRecord> {
        self.read_or_default(HISTORY_KEY)
    }

    pub fn save_history(&self, history: &[IntakeRecord]) -> AppResult<()> {
        self.write(HISTORY_KEY, history)
    }

    pub fn load_last_reset(&self) -> Option<NaiveDate> {
        let raw: String = self.read_or_default(LAST_RESET_KEY);
        if raw.is_empty() {
            return None;
        }

        match NaiveDate::parse_from_str(&raw, "%Y-%m-%d") {
            Ok(date) => Some(date),
            Err(e) => {
                warn!("Ignoring malformed last reset date {raw:?}: {e}");
                None
            }
        }
    }

    pub fn save_last_reset(&self, date: Option<NaiveDate>) -> AppResult<()> {
        self.write(LAST_RESET_KEY, &encode_date(date))
    }
}

fn encode_date(date: Option<NaiveDate>) -> String {
    date.map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}
