//! Persistent JSON configuration with XDG Base Directory compliance.
//!
//! This module provides the configuration service shared by the vocabulary
//! manager and the display shell. Both hold a handle to one explicitly
//! constructed `ConfigStore`; there is no process-global singleton. The
//! backing file is shared with the shell (styling sections, window
//! geometry), so unknown keys are preserved verbatim across load/save.

use std::{
    env::var,
    fs::{create_dir_all, read_to_string, write},
    io::Error as StdError,
    path::PathBuf,
};

use {
    parking_lot::{RwLock, RwLockReadGuard},
    serde::{Deserialize, Deserializer, Serialize, Serializer},
    serde_json::{Error as SerdeJsonError, Map, Value, from_str, to_string_pretty},
    thiserror::Error,
    tracing::debug,
};

/// Error type for configuration operations.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read or write the configuration file.
    #[error("IO error: {0}")]
    IoError(#[from] StdError),
    /// Failed to serialize or deserialize the configuration.
    #[error("Serialization error: {0}")]
    SerializationError(#[from] SerdeJsonError),
}

/// Policy governing how `advance()` moves across entries and files.
///
/// Serialized as one of exactly three labels; any other persisted string
/// falls back to `LoopWithinFile` rather than being rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScrollMode {
    /// Freeze on the last entry of the aggregated vocabulary.
    StopAtEnd,
    /// Wrap to the first entry after the last one.
    ///
    /// Despite the name, the wrap spans the aggregate of ALL loaded files;
    /// this matches the original observable behavior.
    #[default]
    LoopWithinFile,
    /// Roll over to the next file, narrowing the working set to it.
    AdvanceToNextFile,
}

impl ScrollMode {
    /// The persisted label for this mode.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::StopAtEnd => "播完停止",
            Self::LoopWithinFile => "文件内循环",
            Self::AdvanceToNextFile => "下一文件",
        }
    }

    /// Parses a persisted label, falling back to `LoopWithinFile` for
    /// anything outside the closed three-label enumeration.
    #[must_use]
    pub fn from_label(label: &str) -> Self {
        match label {
            "播完停止" => Self::StopAtEnd,
            "下一文件" => Self::AdvanceToNextFile,
            _ => Self::LoopWithinFile,
        }
    }
}

impl Serialize for ScrollMode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

impl<'de> Deserialize<'de> for ScrollMode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let label = String::deserialize(deserializer)?;
        Ok(Self::from_label(&label))
    }
}

fn default_interval() -> f64 {
    2.5
}

/// The `app` section of the configuration document.
///
/// Carries the persisted progress triple plus the scroll-mode and interval
/// preferences. Keys owned by the shell (font size, window geometry, ...)
/// land in `extra` and survive round-trips untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppSettings {
    /// Index of the current entry in the active vocabulary.
    #[serde(default)]
    pub current_index: usize,
    /// Index of the current file in the registry.
    #[serde(default)]
    pub current_file_index: usize,
    /// Size of the active vocabulary when progress was last saved.
    #[serde(default)]
    pub total_words: usize,
    /// Advance policy; see [`ScrollMode`].
    #[serde(default)]
    pub default_scroll_mode: ScrollMode,
    /// Seconds between advances; consumed by the display shell only.
    #[serde(default = "default_interval")]
    pub default_interval: f64,
    /// Unrecognized keys inside the `app` section, preserved verbatim.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            current_index: 0,
            current_file_index: 0,
            total_words: 0,
            default_scroll_mode: ScrollMode::default(),
            default_interval: default_interval(),
            extra: Map::new(),
        }
    }
}

/// The full configuration document.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct UserConfig {
    /// The section owned by the vocabulary core.
    #[serde(default)]
    pub app: AppSettings,
    /// Foreign top-level sections (shell styling, ...), preserved verbatim.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Handles loading, saving, and in-process sharing of the configuration.
///
/// Read-after-write consistent within one process; concurrent multi-process
/// access is out of scope.
#[derive(Debug)]
pub struct ConfigStore {
    /// Thread-safe configuration storage.
    config: RwLock<UserConfig>,
    /// Path to the configuration file on disk.
    config_path: PathBuf,
}

impl Clone for ConfigStore {
    fn clone(&self) -> Self {
        Self {
            config: RwLock::new(self.config.read().clone()),
            config_path: self.config_path.clone(),
        }
    }
}

impl ConfigStore {
    /// Creates a configuration store at the default XDG config path.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if an existing file cannot be read or parsed.
    pub fn new() -> Result<Self, ConfigError> {
        Self::with_config_path(get_config_path())
    }

    /// Creates a configuration store with a custom file path (for testing
    /// and embedding).
    ///
    /// A missing file yields defaults; it is created on the first save.
    ///
    /// # Arguments
    ///
    /// * `config_path` - Custom path for the configuration file.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if an existing file cannot be read or parsed.
    pub fn with_config_path(config_path: PathBuf) -> Result<Self, ConfigError> {
        if let Some(parent) = config_path.parent() {
            create_dir_all(parent)?;
        }

        let config = if config_path.exists() {
            debug!("Loading configuration from existing file: {:?}", config_path);
            let contents = read_to_string(&config_path)?;
            from_str(&contents)?
        } else {
            debug!("Starting with default configuration: {:?}", config_path);
            UserConfig::default()
        };

        Ok(ConfigStore {
            config: RwLock::new(config),
            config_path,
        })
    }

    /// Gets the current configuration.
    pub fn get_config(&self) -> RwLockReadGuard<'_, UserConfig> {
        self.config.read()
    }

    /// Gets the configuration file path.
    pub fn get_config_path(&self) -> &PathBuf {
        &self.config_path
    }

    /// Gets the configured scroll mode.
    #[must_use]
    pub fn scroll_mode(&self) -> ScrollMode {
        self.config.read().app.default_scroll_mode
    }

    /// Sets the scroll mode and saves the configuration to disk.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the configuration cannot be saved.
    pub fn set_scroll_mode(&self, mode: ScrollMode) -> Result<(), ConfigError> {
        self.update_app(|app| app.default_scroll_mode = mode)
    }

    /// Mutates the `app` section and saves the configuration to disk.
    ///
    /// # Arguments
    ///
    /// * `mutate` - Closure applied to the `app` section under the write lock.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the configuration cannot be saved.
    pub fn update_app<F>(&self, mutate: F) -> Result<(), ConfigError>
    where
        F: FnOnce(&mut AppSettings),
    {
        let mut config_write = self.config.write();
        mutate(&mut config_write.app);
        drop(config_write);
        self.save_config()
    }

    /// Saves the current configuration to disk.
    fn save_config(&self) -> Result<(), ConfigError> {
        debug!("Saving configuration to file: {:?}", self.config_path);
        let contents = to_string_pretty(&*self.config.read())?;
        write(&self.config_path, contents)?;
        Ok(())
    }
}

/// Returns the default configuration file path.
#[must_use]
pub fn get_config_path() -> PathBuf {
    let mut config_dir = get_xdg_config_home();
    config_dir.push("wordscroll");
    config_dir.push("config.json");
    config_dir
}

/// Gets the XDG config home directory following the XDG Base Directory
/// specification.
///
/// Uses `XDG_CONFIG_HOME` if set, otherwise defaults to $HOME/.config
fn get_xdg_config_home() -> PathBuf {
    if let Ok(config_home) = var("XDG_CONFIG_HOME")
        && !config_home.is_empty()
    {
        return PathBuf::from(config_home);
    }

    if let Ok(home) = var("HOME") {
        let mut path = PathBuf::from(home);
        path.push(".config");
        return path;
    }

    // Fallback to current directory if HOME is not set (shouldn't happen on Unix)
    PathBuf::from(".")
}

#[cfg(test)]
mod tests {
    use std::fs::{read_to_string, write};

    use {
        serde_json::{Value, from_str, json},
        tempfile::TempDir,
    };

    use crate::config::store::{AppSettings, ConfigStore, ScrollMode, UserConfig};

    #[test]
    fn test_app_settings_default() {
        let app = AppSettings::default();
        assert_eq!(app.current_index, 0);
        assert_eq!(app.current_file_index, 0);
        assert_eq!(app.total_words, 0);
        assert_eq!(app.default_scroll_mode, ScrollMode::LoopWithinFile);
        assert_eq!(app.default_interval, 2.5);
    }

    #[test]
    fn test_scroll_mode_labels_round_trip() {
        for mode in [
            ScrollMode::StopAtEnd,
            ScrollMode::LoopWithinFile,
            ScrollMode::AdvanceToNextFile,
        ] {
            assert_eq!(ScrollMode::from_label(mode.label()), mode);
        }
    }

    #[test]
    fn test_scroll_mode_unrecognized_label_falls_back() {
        assert_eq!(
            ScrollMode::from_label("random-order"),
            ScrollMode::LoopWithinFile
        );

        let config: UserConfig =
            from_str(r#"{ "app": { "default_scroll_mode": "乱序" } }"#).unwrap();
        assert_eq!(
            config.app.default_scroll_mode,
            ScrollMode::LoopWithinFile
        );
    }

    #[test]
    fn test_missing_keys_fall_back_to_defaults() {
        let config: UserConfig = from_str(r#"{ "app": { "current_index": 7 } }"#).unwrap();
        assert_eq!(config.app.current_index, 7);
        assert_eq!(config.app.total_words, 0);
        assert_eq!(config.app.default_interval, 2.5);
        assert_eq!(config.app.default_scroll_mode, ScrollMode::LoopWithinFile);
    }

    #[test]
    fn test_unknown_keys_preserved_across_save() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.json");
        let document = json!({
            "app": {
                "current_index": 3,
                "current_file_index": 0,
                "total_words": 26,
                "default_scroll_mode": "下一文件",
                "default_font_size": 22
            },
            "main_window": { "background_color": "black", "text_color": "white" }
        });
        write(&config_path, document.to_string()).unwrap();

        let store = ConfigStore::with_config_path(config_path.clone()).unwrap();
        assert_eq!(store.scroll_mode(), ScrollMode::AdvanceToNextFile);
        store.update_app(|app| app.current_index = 4).unwrap();

        let reread: Value = from_str(&read_to_string(&config_path).unwrap()).unwrap();
        assert_eq!(reread["app"]["current_index"], 4);
        assert_eq!(reread["app"]["default_font_size"], 22);
        assert_eq!(reread["main_window"]["background_color"], "black");
        assert_eq!(reread["app"]["default_scroll_mode"], "下一文件");
    }

    #[test]
    fn test_persistence_across_instances() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.json");

        let store = ConfigStore::with_config_path(config_path.clone()).unwrap();
        store
            .update_app(|app| {
                app.current_index = 9;
                app.total_words = 12;
                app.default_scroll_mode = ScrollMode::StopAtEnd;
            })
            .unwrap();
        drop(store);

        let reloaded = ConfigStore::with_config_path(config_path).unwrap();
        let config = reloaded.get_config();
        assert_eq!(config.app.current_index, 9);
        assert_eq!(config.app.total_words, 12);
        assert_eq!(config.app.default_scroll_mode, ScrollMode::StopAtEnd);
    }

    #[test]
    fn test_missing_file_yields_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let store = ConfigStore::with_config_path(temp_dir.path().join("config.json")).unwrap();
        let config = store.get_config();
        assert_eq!(*config, UserConfig::default());
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.json");
        write(&config_path, "{ not json").unwrap();

        assert!(ConfigStore::with_config_path(config_path).is_err());
    }
}
