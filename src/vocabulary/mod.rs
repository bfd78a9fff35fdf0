//! Vocabulary loading and position state machine.
//!
//! This module provides the foundation for cycling through word/definition
//! pairs: file parsing and discovery in `store`, and the current-position
//! state machine with persistence in `manager`.

pub mod manager;
pub mod store;

pub use manager::{FileChangedCallback, LoadError, SwitchError, VocabularyManager};
pub use store::{Entry, StoreError, discover_files, load_file, parse_line};
