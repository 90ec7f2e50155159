//! Persisted user settings (lives in the OS config directory).

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::PersistError;
use crate::model::history::DEFAULT_HISTORY_DEPTH;
use crate::model::timeline::{Granularity, Timeline};
use crate::schedule::ConstraintPolicy;

const APP_NAME: &str = "ProJED";
const SETTINGS_FILE: &str = "settings.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Date at the left edge of the timeline.
    pub epoch: NaiveDate,
    pub granularity: Granularity,
    /// Length of the range given to newly created tasks.
    pub default_duration_days: i64,
    pub history_depth: usize,
    pub constraint_policy: ConstraintPolicy,
    /// Pointer travel (px) before a press becomes a drag.
    pub drag_threshold_px: f32,
    /// Distance (px) at which a dragged edge snaps to another bar's edge.
    pub snap_threshold_px: f32,
    pub log_level: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            epoch: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap_or_default(),
            granularity: Granularity::Month,
            default_duration_days: 7,
            history_depth: DEFAULT_HISTORY_DEPTH,
            constraint_policy: ConstraintPolicy::Sequential,
            drag_threshold_px: 4.0,
            snap_threshold_px: 10.0,
            log_level: "info".into(),
        }
    }
}

impl Settings {
    pub fn timeline(&self) -> Timeline {
        Timeline::new(self.epoch, self.granularity)
    }

    /// OS config directory for the app, if the platform has one.
    pub fn config_dir() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", APP_NAME).map(|d| d.config_dir().to_path_buf())
    }

    fn settings_path() -> PathBuf {
        Self::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(SETTINGS_FILE)
    }

    /// Load from the config directory, falling back to defaults.
    pub fn load() -> Self {
        Self::load_from(&Self::settings_path())
    }

    /// Missing or unreadable files yield defaults.
    pub fn load_from(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(contents) => serde_json::from_str(&contents).unwrap_or_else(|err| {
                tracing::warn!(path = %path.display(), %err, "ignoring malformed settings file");
                Self::default()
            }),
            Err(_) => Self::default(),
        }
    }

    pub fn save(&self) -> Result<(), PersistError> {
        self.save_to(&Self::settings_path())
    }

    pub fn save_to(&self, path: &Path) -> Result<(), PersistError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        tracing::debug!(path = %path.display(), "settings saved");
        Ok(())
    }
}
