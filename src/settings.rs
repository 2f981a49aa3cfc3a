//! Editor settings: the singleton record, partial updates, and theme policy.

use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::InkError;

/// Color theme preference stored in settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    Dark,
    /// Follow the environment's color-scheme preference
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

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Theme {
    type Err = InkError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            "system" => Ok(Theme::System),
            other => Err(InkError::CorruptedData {
                message: format!("unknown theme '{}'", other),
            }),
        }
    }
}

/// A theme after resolving the "system" preference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolvedTheme {
    Light,
    Dark,
}

/// Resolves a stored theme against the environment's color-scheme
/// preference at the moment of application. The resolved value is never
/// stored back — "system" stays "system" in the settings record.
pub fn resolve_theme(theme: Theme, system_prefers_dark: bool) -> ResolvedTheme {
    match theme {
        Theme::Light => ResolvedTheme::Light,
        Theme::Dark => ResolvedTheme::Dark,
        Theme::System => {
            if system_prefers_dark {
                ResolvedTheme::Dark
            } else {
                ResolvedTheme::Light
            }
        }
    }
}

/// The singleton editor settings record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    /// Fixed row key; always 1
    pub id: i64,
    pub theme: Theme,
    pub font_family: String,
    pub font_size: u32,
    pub line_height: f64,
    pub show_line_numbers: bool,
    pub auto_save: bool,
    /// Auto-save interval in seconds
    pub save_interval: u32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Default values applied when seeding and resetting settings.
pub mod defaults {
    use super::Theme;

    pub const THEME: Theme = Theme::System;
    pub const FONT_FAMILY: &str = "Inter";
    pub const FONT_SIZE: u32 = 16;
    pub const LINE_HEIGHT: f64 = 1.5;
    pub const SHOW_LINE_NUMBERS: bool = true;
    pub const AUTO_SAVE: bool = true;
    pub const SAVE_INTERVAL: u32 = 30;
}

/// A partial settings change. Unset fields are left untouched; an update
/// with every field unset is a no-op.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsUpdate {
    pub theme: Option<Theme>,
    pub font_family: Option<String>,
    pub font_size: Option<u32>,
    pub line_height: Option<f64>,
    pub show_line_numbers: Option<bool>,
    pub auto_save: Option<bool>,
    pub save_interval: Option<u32>,
}

impl SettingsUpdate {
    pub fn is_empty(&self) -> bool {
        self.theme.is_none()
            && self.font_family.is_none()
            && self.font_size.is_none()
            && self.line_height.is_none()
            && self.show_line_numbers.is_none()
            && self.auto_save.is_none()
            && self.save_interval.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_theme_handles_all_combinations() {
        assert_eq!(resolve_theme(Theme::Light, true), ResolvedTheme::Light);
        assert_eq!(resolve_theme(Theme::Light, false), ResolvedTheme::Light);
        assert_eq!(resolve_theme(Theme::Dark, true), ResolvedTheme::Dark);
        assert_eq!(resolve_theme(Theme::Dark, false), ResolvedTheme::Dark);
        assert_eq!(resolve_theme(Theme::System, true), ResolvedTheme::Dark);
        assert_eq!(resolve_theme(Theme::System, false), ResolvedTheme::Light);
    }

    #[test]
    fn empty_update_detection() {
        assert!(SettingsUpdate::default().is_empty());

        let update = SettingsUpdate {
            font_size: Some(18),
            ..Default::default()
        };
        assert!(!update.is_empty());
    }
}
