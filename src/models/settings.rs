use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
    System,
}

impl Theme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
            Theme::System => "system",
        }
    }
}

impl FromStr for Theme {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            "system" => Ok(Theme::System),
            _ => Err(anyhow::anyhow!("Unknown theme: {}", s)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    pub theme: Theme,
    pub notifications_enabled: bool,
    pub reminder_time: String,
    pub sync_data: bool,
    pub last_sync_date: Option<NaiveDateTime>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            theme: Theme::Light,
            notifications_enabled: false,
            reminder_time: "08:00".to_string(),
            sync_data: true,
            last_sync_date: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SettingsPatch {
    pub theme: Option<Theme>,
    pub notifications_enabled: Option<bool>,
    pub reminder_time: Option<String>,
    pub sync_data: Option<bool>,
}

impl SettingsPatch {
    /// Merge over `current`, stamping the sync date on every update.
    pub fn merge(&self, current: &Settings, now: NaiveDateTime) -> Settings {
        Settings {
            theme: self.theme.unwrap_or(current.theme),
            notifications_enabled: self
                .notifications_enabled
                .unwrap_or(current.notifications_enabled),
            reminder_time: self
                .reminder_time
                .clone()
                .unwrap_or_else(|| current.reminder_time.clone()),
            sync_data: self.sync_data.unwrap_or(current.sync_data),
            last_sync_date: Some(now),
        }
    }
}
