//! Settings persistence using TOML
//!
//! Stores settings in ~/.config/blocktris/settings.toml (or platform equivalent)

use crate::board::{DEFAULT_HEIGHT, DEFAULT_WIDTH};
use crate::difficulty::{Difficulty, GravityCurve};
use crate::error::SettingsError;
use crate::game::GameConfig;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;
use std::time::Duration;

/// Smallest board edge that still fits every piece in both orientations
const MIN_BOARD_EDGE: usize = 4;

/// Largest board edge; keeps the drawn board well inside terminal coordinates
const MAX_BOARD_EDGE: usize = 512;

/// Game settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Keybindings
    pub keys: KeyBindings,
    /// Gameplay settings
    pub gameplay: GameplaySettings,
    /// Visual settings
    pub visual: VisualSettings,
}

/// Key bindings (stored as strings for easy editing)
/// Each action can have one or more keys bound to it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyBindings {
    #[serde(deserialize_with = "deserialize_keys", serialize_with = "serialize_keys")]
    pub move_left: Vec<String>,
    #[serde(deserialize_with = "deserialize_keys", serialize_with = "serialize_keys")]
    pub move_right: Vec<String>,
    #[serde(deserialize_with = "deserialize_keys", serialize_with = "serialize_keys")]
    pub move_down: Vec<String>,
    #[serde(deserialize_with = "deserialize_keys", serialize_with = "serialize_keys")]
    pub rotate: Vec<String>,
    #[serde(deserialize_with = "deserialize_keys", serialize_with = "serialize_keys")]
    pub change: Vec<String>,
    #[serde(deserialize_with = "deserialize_keys", serialize_with = "serialize_keys")]
    pub pause: Vec<String>,
    #[serde(deserialize_with = "deserialize_keys", serialize_with = "serialize_keys")]
    pub quit: Vec<String>,
}

/// Deserialize keys as either a single string or array of strings
fn deserialize_keys<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de::{self, Visitor};

    struct KeysVisitor;

    impl<'de> Visitor<'de> for KeysVisitor {
        type Value = Vec<String>;

        fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
            formatter.write_str("a string or array of strings")
        }

        fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(vec![v.to_string()])
        }

        fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
        where
            A: de::SeqAccess<'de>,
        {
            let mut keys = Vec::new();
            while let Some(key) = seq.next_element::<String>()? {
                keys.push(key);
            }
            Ok(keys)
        }
    }

    deserializer.deserialize_any(KeysVisitor)
}

/// Serialize keys: single key as string, multiple as array
fn serialize_keys<S>(keys: &[String], serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    use serde::ser::SerializeSeq;

    if let [key] = keys {
        serializer.serialize_str(key)
    } else {
        let mut seq = serializer.serialize_seq(Some(keys.len()))?;
        for key in keys {
            seq.serialize_element(key)?;
        }
        seq.end()
    }
}

/// Gameplay settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameplaySettings {
    pub difficulty: Difficulty,
    pub board_width: usize,
    pub board_height: usize,
    /// Gravity speed-up per 10 cleared lines, in milliseconds
    pub gravity_step_ms: u64,
    /// Fastest gravity delay, in milliseconds
    pub min_gravity_ms: u64,
    /// Terminal cells of mouse drag per swipe step
    pub swipe_step: u16,
    /// Fixed piece order when set
    pub seed: Option<u64>,
}

/// Visual settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VisualSettings {
    /// Block style: "bracket", "solid", "round"
    pub block_style: String,
    /// Redraws per second while playing
    pub frame_rate: u32,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            move_left: vec!["Left".to_string()],
            move_right: vec!["Right".to_string()],
            move_down: vec!["Down".to_string()],
            rotate: vec!["Up".to_string(), "Space".to_string()],
            change: vec!["c".to_string()],
            pause: vec!["p".to_string(), "Esc".to_string()],
            quit: vec!["q".to_string()],
        }
    }
}

impl Default for GameplaySettings {
    fn default() -> Self {
        let curve = GravityCurve::default();
        Self {
            difficulty: Difficulty::default(),
            board_width: DEFAULT_WIDTH,
            board_height: DEFAULT_HEIGHT,
            gravity_step_ms: curve.step.as_millis() as u64,
            min_gravity_ms: curve.floor.as_millis() as u64,
            swipe_step: 2,
            seed: None,
        }
    }
}

impl Default for VisualSettings {
    fn default() -> Self {
        Self {
            block_style: "bracket".to_string(),
            frame_rate: 60,
        }
    }
}

impl Settings {
    /// Get the config directory path
    fn config_dir() -> Option<PathBuf> {
        ProjectDirs::from("com", "blocktris", "blocktris")
            .map(|dirs| dirs.config_dir().to_path_buf())
    }

    /// Get the settings file path
    fn settings_path() -> Option<PathBuf> {
        Self::config_dir().map(|dir| dir.join("settings.toml"))
    }

    /// Load settings from file, falling back to defaults on any problem
    pub fn load() -> Self {
        match Self::try_load() {
            Ok(Some(settings)) => settings,
            Ok(None) => Self::default(),
            Err(e) => {
                tracing::warn!("Using default settings: {}", e);
                Self::default()
            }
        }
    }

    /// Load settings from file. `Ok(None)` when there is no file yet.
    pub fn try_load() -> Result<Option<Self>, SettingsError> {
        let path = Self::settings_path().ok_or(SettingsError::NoConfigDir)?;
        let contents = match fs::read_to_string(&path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(source) => return Err(SettingsError::Read { path, source }),
        };
        Self::from_toml(&contents).map(Some)
    }

    /// Parse and validate settings
    pub fn from_toml(contents: &str) -> Result<Self, SettingsError> {
        let settings: Settings = toml::from_str(contents)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Save settings to file
    pub fn save(&self) -> Result<(), SettingsError> {
        let dir = Self::config_dir().ok_or(SettingsError::NoConfigDir)?;
        let path = dir.join("settings.toml");

        // Create directory if needed
        fs::create_dir_all(&dir).map_err(|source| SettingsError::Write {
            path: dir.clone(),
            source,
        })?;

        let contents = toml::to_string_pretty(self)?;
        fs::write(&path, contents).map_err(|source| SettingsError::Write { path, source })?;
        Ok(())
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        let gameplay = &self.gameplay;
        let edges = [
            ("gameplay.board_width", gameplay.board_width),
            ("gameplay.board_height", gameplay.board_height),
        ];
        for (key, edge) in edges {
            if !(MIN_BOARD_EDGE..=MAX_BOARD_EDGE).contains(&edge) {
                return Err(SettingsError::Invalid {
                    key,
                    reason: format!("must be between {MIN_BOARD_EDGE} and {MAX_BOARD_EDGE}"),
                });
            }
        }
        if gameplay.min_gravity_ms == 0 {
            return Err(SettingsError::Invalid {
                key: "gameplay.min_gravity_ms",
                reason: "must be positive".to_string(),
            });
        }
        if gameplay.swipe_step == 0 {
            return Err(SettingsError::Invalid {
                key: "gameplay.swipe_step",
                reason: "must be positive".to_string(),
            });
        }
        if self.visual.frame_rate == 0 {
            return Err(SettingsError::Invalid {
                key: "visual.frame_rate",
                reason: "must be positive".to_string(),
            });
        }
        Ok(())
    }

    /// Engine parameters derived from these settings
    pub fn game_config(&self) -> GameConfig {
        GameConfig {
            width: self.gameplay.board_width,
            height: self.gameplay.board_height,
            difficulty: self.gameplay.difficulty,
            curve: GravityCurve {
                step: Duration::from_millis(self.gameplay.gravity_step_ms),
                floor: Duration::from_millis(self.gameplay.min_gravity_ms),
            },
            seed: self.gameplay.seed,
        }
    }

    pub fn frame_interval(&self) -> Duration {
        Duration::from_secs(1) / self.visual.frame_rate.max(1)
    }
}

impl VisualSettings {
    /// Get the characters drawn for one occupied cell
    pub fn block_chars(&self) -> &'static str {
        match self.block_style.as_str() {
            "solid" => "██",
            "round" => "()",
            _ => "[]", // "bracket" or default
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_file_is_default() {
        assert_eq!(Settings::from_toml("").unwrap(), Settings::default());
    }

    #[test]
    fn test_partial_file() {
        let settings = Settings::from_toml(
            r#"
            [keys]
            rotate = "w"
            move_left = ["a", "Left"]

            [gameplay]
            difficulty = "hard"
            seed = 12
            "#,
        )
        .unwrap();

        assert_eq!(settings.keys.rotate, vec!["w"]);
        assert_eq!(settings.keys.move_left, vec!["a", "Left"]);
        assert_eq!(settings.keys.quit, vec!["q"]);
        assert_eq!(settings.gameplay.difficulty, Difficulty::Hard);
        assert_eq!(settings.gameplay.board_width, DEFAULT_WIDTH);

        let config = settings.game_config();
        assert_eq!(config.seed, Some(12));
        assert_eq!(config.difficulty, Difficulty::Hard);
    }

    #[test]
    fn test_round_trip() {
        let mut settings = Settings::default();
        settings.gameplay.difficulty = Difficulty::Easy;
        let text = toml::to_string_pretty(&settings).unwrap();
        assert_eq!(Settings::from_toml(&text).unwrap(), settings);
    }

    #[test]
    fn test_rejects_tiny_board() {
        let err = Settings::from_toml("[gameplay]\nboard_width = 2\n").unwrap_err();
        assert!(matches!(
            err,
            SettingsError::Invalid { key: "gameplay.board_width", .. }
        ));
    }

    #[test]
    fn test_rejects_oversized_board() {
        let err = Settings::from_toml("[gameplay]\nboard_width = 33000\n").unwrap_err();
        assert!(matches!(
            err,
            SettingsError::Invalid { key: "gameplay.board_width", .. }
        ));

        let err = Settings::from_toml("[gameplay]\nboard_height = 100000\n").unwrap_err();
        assert!(matches!(
            err,
            SettingsError::Invalid { key: "gameplay.board_height", .. }
        ));

        assert!(Settings::from_toml("[gameplay]\nboard_width = 512\n").is_ok());
    }

    #[test]
    fn test_rejects_zero_gravity_floor() {
        let err = Settings::from_toml("[gameplay]\nmin_gravity_ms = 0\ngravity_step_ms = 600\n")
            .unwrap_err();
        assert!(matches!(
            err,
            SettingsError::Invalid { key: "gameplay.min_gravity_ms", .. }
        ));
    }

    #[test]
    fn test_rejects_zero_frame_rate() {
        let err = Settings::from_toml("[visual]\nframe_rate = 0\n").unwrap_err();
        assert!(matches!(err, SettingsError::Invalid { key: "visual.frame_rate", .. }));
    }

    #[test]
    fn test_parse_error() {
        let err = Settings::from_toml("[gameplay]\ndifficulty = \"insane\"\n").unwrap_err();
        assert!(matches!(err, SettingsError::Parse(_)));
    }

    #[test]
    fn test_frame_interval() {
        let settings = Settings::default();
        assert_eq!(settings.frame_interval(), Duration::from_secs(1) / 60);
    }
}
