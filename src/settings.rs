//! Persisted settings document (`settings.json`).
//!
//! Loaded once at startup and rewritten as a whole document whenever the
//! resolver discovers or creates the destination spreadsheet, so a crash
//! mid-run still leaves the cached id correct for the next run.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use crate::sheet_sync::sheet_title;
use crate::synchronise::ALL_SHEET;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read settings file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("settings file {path} is not valid JSON: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("failed to write settings file {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to serialise settings: {0}")]
    Serialise(serde_json::Error),

    #[error("no teams configured")]
    NoTeams,

    #[error("team '{team}' collides with the reserved combined sheet title '{title}'")]
    ReservedSheetTitle { team: String, title: String },

    #[error("teams '{first}' and '{second}' both truncate to sheet title '{title}'")]
    SheetTitleCollision {
        first: String,
        second: String,
        title: String,
    },
}

/// One tracked team: the BasketPlan id its export is fetched under.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeamSettings {
    pub id: String,
}

/// Destination section of the settings document.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SheetsSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spreadsheet_id: Option<String>,
    #[serde(default = "default_spreadsheet_name")]
    pub spreadsheet_name: String,
    #[serde(default)]
    pub write_privilege: Vec<String>,
}

impl Default for SheetsSettings {
    fn default() -> Self {
        Self {
            spreadsheet_id: None,
            spreadsheet_name: default_spreadsheet_name(),
            write_privilege: Vec::new(),
        }
    }
}

fn default_spreadsheet_name() -> String {
    "BasketPlan Games".to_string()
}

/// The whole settings document. Team order is the declared order in the
/// file and drives processing order.
#[derive(Debug, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub teams: IndexMap<String, TeamSettings>,
    #[serde(rename = "googleSheets", default)]
    pub google_sheets: SheetsSettings,
    #[serde(skip)]
    path: PathBuf,
}

impl Settings {
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        let content = fs::read_to_string(path).map_err(|source| SettingsError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let mut settings: Settings =
            serde_json::from_str(&content).map_err(|source| SettingsError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        settings.path = path.to_path_buf();
        info!(
            path = %path.display(),
            teams = settings.teams.len(),
            "loaded settings"
        );
        debug!(?settings, "settings (full debug)");
        Ok(settings)
    }

    /// Whole-document overwrite with stable 2-space indentation.
    pub fn save(&self) -> Result<(), SettingsError> {
        let json = serde_json::to_string_pretty(self).map_err(SettingsError::Serialise)?;
        fs::write(&self.path, json).map_err(|source| SettingsError::Write {
            path: self.path.clone(),
            source,
        })?;
        info!(path = %self.path.display(), "settings saved");
        Ok(())
    }

    /// Validates the document before any remote call is made.
    ///
    /// Truncating team names to the destination's sheet-title limit can make
    /// two teams (or a team and the combined view) claim the same sheet;
    /// that is rejected here rather than silently disambiguated.
    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.teams.is_empty() {
            return Err(SettingsError::NoTeams);
        }
        let mut seen: HashMap<String, String> = HashMap::new();
        for team in self.teams.keys() {
            let title = sheet_title(team);
            if title == ALL_SHEET {
                return Err(SettingsError::ReservedSheetTitle {
                    team: team.clone(),
                    title,
                });
            }
            if let Some(first) = seen.insert(title.clone(), team.clone()) {
                return Err(SettingsError::SheetTitleCollision {
                    first,
                    second: team.clone(),
                    title,
                });
            }
        }
        Ok(())
    }
}
