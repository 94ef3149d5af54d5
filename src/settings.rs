//! Game settings and preferences
//!
//! One flat record shared with the frontend. Stored as JSON under
//! [`Settings::STORAGE_KEY`]; loading merges whatever was saved over the
//! defaults so records written by older builds pick up new fields.

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to parse settings: {0}")]
    Parse(#[source] serde_json::Error),
    #[error("failed to encode settings: {0}")]
    Encode(#[source] serde_json::Error),
}

/// UI language
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    Ja,
    En,
}

impl Language {
    pub fn as_str(&self) -> &'static str {
        match self {
            Language::Ja => "ja",
            Language::En => "en",
        }
    }
}

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Settings {
    pub language: Language,

    /// Horizontal field of view (degrees)
    pub fov: f32,
    /// Session length (seconds), ignored by Marathon
    pub duration: u32,
    pub sensitivity: f32,
    /// Master volume (0.0 - 1.0)
    pub volume: f32,
    /// Target scale multiplier (0.5 - 2.0)
    pub target_size: f32,

    // === Mode specifics ===
    /// Tracking targets may jump
    pub tracking_jump: bool,

    // === Environment ===
    pub sky_color: String,
    pub grid_color: String,
    pub ground_color: String,
    /// Sphere targets and their explosions
    pub target_color: String,
    /// Humanoid outline and teleport trails
    pub enemy_outline_color: String,

    // === Crosshair ===
    pub crosshair_color: String,
    pub crosshair_outline: bool,
    pub crosshair_outline_thickness: f32,
    pub crosshair_outline_opacity: f32,

    pub crosshair_dot: bool,
    pub crosshair_dot_size: f32,
    pub crosshair_dot_opacity: f32,

    pub crosshair_inner_show: bool,
    pub crosshair_inner_opacity: f32,
    pub crosshair_inner_length: f32,
    pub crosshair_inner_thickness: f32,
    /// Gap from the center
    pub crosshair_inner_offset: f32,

    pub crosshair_outer_show: bool,
    pub crosshair_outer_opacity: f32,
    pub crosshair_outer_length: f32,
    pub crosshair_outer_thickness: f32,
    pub crosshair_outer_offset: f32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            language: Language::Ja,
            fov: 103.0,
            duration: 60,
            sensitivity: 1.0,
            volume: 0.5,
            target_size: 1.0,

            tracking_jump: true,

            // Day palette
            sky_color: "#e0f2fe".to_string(),
            grid_color: "#06b6d4".to_string(),
            ground_color: "#f1f5f9".to_string(),
            target_color: "#06b6d4".to_string(),
            enemy_outline_color: "#ffff00".to_string(),

            // Cyan cross
            crosshair_color: "#00ffff".to_string(),
            crosshair_outline: true,
            crosshair_outline_thickness: 1.0,
            crosshair_outline_opacity: 0.5,

            crosshair_dot: false,
            crosshair_dot_size: 2.0,
            crosshair_dot_opacity: 1.0,

            crosshair_inner_show: true,
            crosshair_inner_opacity: 1.0,
            crosshair_inner_length: 6.0,
            crosshair_inner_thickness: 2.0,
            crosshair_inner_offset: 3.0,

            crosshair_outer_show: false,
            crosshair_outer_opacity: 0.5,
            crosshair_outer_length: 2.0,
            crosshair_outer_thickness: 2.0,
            crosshair_outer_offset: 10.0,
        }
    }
}

impl Settings {
    /// Storage key for the saved record
    pub const STORAGE_KEY: &'static str = "liteaim_settings_v7";

    /// Parse a saved record; missing fields take their defaults
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        serde_json::from_str(json).map_err(SettingsError::Parse)
    }

    /// Load a saved record, falling back to defaults when there is none or
    /// it does not parse
    pub fn load_or_default(saved: Option<&str>) -> Self {
        let Some(json) = saved else {
            log::info!("Using default settings");
            return Self::default();
        };
        match Self::from_json(json) {
            Ok(settings) => {
                log::info!("Loaded settings");
                settings
            }
            Err(e) => {
                log::warn!("{}, using defaults", e);
                Self::default()
            }
        }
    }

    pub fn to_json(&self) -> Result<String, SettingsError> {
        serde_json::to_string(self).map_err(SettingsError::Encode)
    }

    /// Copy with numeric fields clamped to the ranges the UI allows
    pub fn sanitized(&self) -> Self {
        let mut s = self.clone();
        s.target_size = s.target_size.clamp(0.5, 2.0);
        s.volume = s.volume.clamp(0.0, 1.0);
        s.duration = s.duration.max(1);
        s
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let s = Settings::default();
        assert_eq!(s.language, Language::Ja);
        assert_eq!(s.fov, 103.0);
        assert_eq!(s.duration, 60);
        assert_eq!(s.volume, 0.5);
        assert!(s.tracking_jump);
        assert_eq!(s.enemy_outline_color, "#ffff00");
    }

    #[test]
    fn test_partial_json_merges_over_defaults() {
        let s = Settings::from_json(r#"{"targetSize":1.5,"language":"en","trackingJump":false}"#)
            .unwrap();
        assert_eq!(s.target_size, 1.5);
        assert_eq!(s.language, Language::En);
        assert!(!s.tracking_jump);
        assert_eq!(s.duration, 60);
        assert_eq!(s.crosshair_color, "#00ffff");
    }

    #[test]
    fn test_json_uses_frontend_field_names() {
        let json = Settings::default().to_json().unwrap();
        assert!(json.contains("\"enemyOutlineColor\":\"#ffff00\""));
        assert!(json.contains("\"crosshairInnerOffset\":3.0"));
        assert_eq!(Settings::from_json(&json).unwrap(), Settings::default());
    }

    #[test]
    fn test_bad_json_is_an_error() {
        assert!(matches!(
            Settings::from_json("{not json"),
            Err(SettingsError::Parse(_))
        ));
        assert_eq!(Settings::load_or_default(Some("42")), Settings::default());
        assert_eq!(Settings::load_or_default(None), Settings::default());
    }

    #[test]
    fn test_sanitized_clamps() {
        let s = Settings {
            target_size: 9.0,
            volume: -2.0,
            duration: 0,
            ..Settings::default()
        }
        .sanitized();
        assert_eq!(s.target_size, 2.0);
        assert_eq!(s.volume, 0.0);
        assert_eq!(s.duration, 1);
    }
}
