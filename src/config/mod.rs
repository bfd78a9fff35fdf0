//! User preferences and persistent progress state.
//!
//! This module provides the JSON configuration service with XDG Base
//! Directory compliance, shared by the vocabulary manager and the shell.

pub mod store;

pub use store::{AppSettings, ConfigError, ConfigStore, ScrollMode, UserConfig, get_config_path};
