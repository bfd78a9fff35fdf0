//! Wordscroll - timed vocabulary scroller core.
//!
//! Cycles through word/definition pairs loaded from plain-text files,
//! advancing on a timer with configurable looping behavior and a persisted
//! resume position. This crate is the vocabulary state machine only; window
//! chrome, animation, and dialogs belong to an external display shell that
//! calls into it and renders whatever it returns.

pub mod config;
pub mod vocabulary;

// Re-export key types for convenience
pub use {
    config::{AppSettings, ConfigError, ConfigStore, ScrollMode, UserConfig},
    vocabulary::{Entry, LoadError, StoreError, SwitchError, VocabularyManager},
};
