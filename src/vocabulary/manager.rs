//! Vocabulary position state machine with progress persistence.
//!
//! The `VocabularyManager` owns the current position, the file registry, the
//! scroll-mode advance policy, and the file-change notification. It is
//! driven from a single control thread (the display/timer loop); no internal
//! locking is needed.

use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use {
    thiserror::Error,
    tracing::{debug, info, warn},
};

use crate::{
    config::{ConfigStore, ScrollMode},
    vocabulary::store::{Entry, StoreError, discover_files, load_file},
};

/// Error type for a full vocabulary load.
#[derive(Error, Debug)]
pub enum LoadError {
    /// The resource directory does not exist or cannot be listed.
    #[error("Resources directory not found: {0}")]
    NoDirectory(PathBuf),
    /// The directory exists but contains no vocabulary files.
    #[error("No .txt files found in {0}")]
    NoFiles(PathBuf),
    /// No usable entries remained across all discovered files.
    #[error("No words found in any files")]
    NoWords,
}

/// Error type for an explicit file switch.
#[derive(Error, Debug)]
pub enum SwitchError {
    /// The requested file name is absent from the registry.
    #[error("File not in registry: {0}")]
    NotFound(String),
}

/// Observer invoked when the active vocabulary file changes.
pub type FileChangedCallback = Box<dyn FnMut()>;

/// State machine over the loaded vocabulary.
///
/// Which vocabulary is "active" depends on the scroll mode: `StopAtEnd` and
/// `LoopWithinFile` operate over the aggregate of all loaded files, while an
/// `AdvanceToNextFile` rollover narrows the working set to one file at a
/// time. This asymmetry is existing observable behavior and is preserved
/// deliberately.
pub struct VocabularyManager {
    /// The active working vocabulary (aggregate or single-file view).
    vocabulary: Vec<Entry>,
    /// Registry of discovered vocabulary files, in sorted order.
    files: Vec<PathBuf>,
    /// Index of the current entry in `vocabulary`.
    current_index: usize,
    /// Index of the current file in `files`.
    current_file_index: usize,
    /// True only after at least one non-empty vocabulary was built.
    loaded: bool,
    /// Configuration service handle for scroll mode and progress persistence.
    config: Arc<ConfigStore>,
    /// Registered file-change observer, at most one.
    on_file_changed: Option<FileChangedCallback>,
}

impl VocabularyManager {
    /// Creates an empty manager bound to a configuration store.
    #[must_use]
    pub fn new(config: Arc<ConfigStore>) -> Self {
        Self {
            vocabulary: Vec::new(),
            files: Vec::new(),
            current_index: 0,
            current_file_index: 0,
            loaded: false,
            config,
            on_file_changed: None,
        }
    }

    /// Loads every vocabulary file in a resource directory.
    ///
    /// Discovers `.txt` files, restores the persisted position, and builds
    /// the aggregated working vocabulary in registry order. A single file's
    /// read failure is logged and that file skipped; the load fails only if
    /// nothing usable remains. Idempotent: calling it again fully rebuilds
    /// state from disk.
    ///
    /// Fires the file-change notification on success (the initial load
    /// counts as a change of active file).
    ///
    /// # Arguments
    ///
    /// * `resources_dir` - Directory containing the vocabulary files.
    ///
    /// # Errors
    ///
    /// Returns `LoadError::NoDirectory` if the directory is missing,
    /// `LoadError::NoFiles` if it holds no `.txt` files, or
    /// `LoadError::NoWords` if no entries could be read from any file.
    pub fn load_all(&mut self, resources_dir: &Path) -> Result<(), LoadError> {
        self.vocabulary.clear();
        self.current_index = 0;
        self.current_file_index = 0;
        self.loaded = false;

        self.files = match discover_files(resources_dir) {
            Ok(files) => files,
            Err(StoreError::NotFound(path)) => return Err(LoadError::NoDirectory(path)),
            Err(StoreError::Io { path, source }) => {
                warn!("Failed to list resources directory {:?}: {source}", path);
                return Err(LoadError::NoDirectory(path));
            }
        };
        if self.files.is_empty() {
            return Err(LoadError::NoFiles(resources_dir.to_path_buf()));
        }

        self.restore_progress();

        let mut aggregate = Vec::new();
        for path in &self.files {
            match load_file(path) {
                Ok(entries) => aggregate.extend(entries),
                Err(e) => warn!("Skipping vocabulary file: {e}"),
            }
        }
        if aggregate.is_empty() {
            return Err(LoadError::NoWords);
        }

        // The persisted total can be stale when files shrank since the last
        // run; clamp against the vocabulary that actually loaded.
        self.current_index = self.current_index.min(aggregate.len() - 1);
        self.vocabulary = aggregate;
        self.loaded = true;
        info!(
            "Loaded {} words from {} files",
            self.vocabulary.len(),
            self.files.len()
        );

        self.notify_file_changed();
        Ok(())
    }

    /// Returns the entry at the current position.
    ///
    /// Returns the sentinel "No words loaded" entry when nothing is loaded
    /// or the active vocabulary is empty; the display layer renders it
    /// rather than crashing.
    #[must_use]
    pub fn get_current(&self) -> Entry {
        if !self.loaded || self.vocabulary.is_empty() {
            return Entry::placeholder();
        }
        self.vocabulary[self.current_index].clone()
    }

    /// Advances the current position according to the configured scroll mode.
    ///
    /// - `StopAtEnd`: freeze on the last entry of the aggregate.
    /// - `LoopWithinFile`: wrap to index 0 after the last aggregate entry.
    /// - `AdvanceToNextFile`: past the end, move to the next file (modulo
    ///   the registry), reset to index 0, and reload that single file as the
    ///   working set.
    ///
    /// The pre-advance position is persisted before any mutation, so a crash
    /// mid-advance loses at most one step forward. The file-change observer
    /// fires iff the current file index changed during this call.
    pub fn advance(&mut self) {
        if !self.loaded || self.vocabulary.is_empty() {
            return;
        }

        self.save_progress();
        let previous_file_index = self.current_file_index;

        match self.config.scroll_mode() {
            ScrollMode::StopAtEnd => {
                if self.current_index + 1 < self.vocabulary.len() {
                    self.current_index += 1;
                }
            }
            ScrollMode::LoopWithinFile => {
                self.current_index = (self.current_index + 1) % self.vocabulary.len();
            }
            ScrollMode::AdvanceToNextFile => {
                self.current_index += 1;
                if self.current_index >= self.vocabulary.len() {
                    self.current_file_index = (self.current_file_index + 1) % self.files.len();
                    self.current_index = 0;
                    self.reload_current_file();
                }
            }
        }

        if self.current_file_index != previous_file_index {
            self.notify_file_changed();
        }
    }

    /// Switches the working set to the named file.
    ///
    /// Looks the file up by base name within the registry. On success the
    /// entry index resets to 0, that file reloads as the working set, the
    /// progress is persisted, and the file-change observer fires
    /// unconditionally.
    ///
    /// # Arguments
    ///
    /// * `filename` - Base name of the target file, e.g. `"words.txt"`.
    ///
    /// # Errors
    ///
    /// Returns `SwitchError::NotFound` if the name is absent from the
    /// registry; the manager state is left unchanged.
    pub fn switch_to_file(&mut self, filename: &str) -> Result<(), SwitchError> {
        let index = self
            .files
            .iter()
            .position(|path| path.file_name().and_then(|name| name.to_str()) == Some(filename))
            .ok_or_else(|| SwitchError::NotFound(filename.to_string()))?;

        self.current_file_index = index;
        self.current_index = 0;
        self.reload_current_file();
        self.save_progress();
        self.notify_file_changed();
        Ok(())
    }

    /// Persists the progress triple (entry index, file index, total words).
    ///
    /// No-op until a non-empty vocabulary is loaded. A configuration write
    /// failure is logged, never propagated into the advance path.
    pub fn save_progress(&self) {
        if !self.loaded || self.vocabulary.is_empty() {
            return;
        }

        let current_index = self.current_index;
        let current_file_index = self.current_file_index;
        let total_words = self.vocabulary.len();
        if let Err(e) = self.config.update_app(|app| {
            app.current_index = current_index;
            app.current_file_index = current_file_index;
            app.total_words = total_words;
        }) {
            warn!("Failed to persist progress: {e}");
        }
    }

    /// Restores the persisted position, clamped against the persisted total
    /// and the current file registry.
    ///
    /// Called by `load_all` after discovery. First run (no saved total)
    /// leaves both indices at 0.
    pub fn restore_progress(&mut self) {
        let (saved_index, saved_file_index, saved_total) = {
            let config = self.config.get_config();
            (
                config.app.current_index,
                config.app.current_file_index,
                config.app.total_words,
            )
        };
        if saved_total == 0 {
            return;
        }

        self.current_index = saved_index.min(saved_total - 1);
        self.current_file_index = if self.files.is_empty() {
            0
        } else {
            saved_file_index.min(self.files.len() - 1)
        };
        info!(
            "Restored progress: word {}/{saved_total}",
            self.current_index + 1
        );
    }

    /// Registers the file-change observer, replacing any previous one.
    ///
    /// Invoked synchronously, on whatever thread calls `advance` or
    /// `switch_to_file`, whenever the active file changes (initial load,
    /// rollover, or explicit switch).
    pub fn set_file_changed_callback<F>(&mut self, callback: F)
    where
        F: FnMut() + 'static,
    {
        self.on_file_changed = Some(Box::new(callback));
    }

    /// True once at least one non-empty vocabulary set has been built.
    #[must_use]
    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    /// Number of entries in the active working vocabulary.
    #[must_use]
    pub fn vocabulary_size(&self) -> usize {
        self.vocabulary.len()
    }

    /// Index of the current entry in the active vocabulary.
    #[must_use]
    pub fn current_index(&self) -> usize {
        self.current_index
    }

    /// Index of the current file in the registry.
    #[must_use]
    pub fn current_file_index(&self) -> usize {
        self.current_file_index
    }

    /// Number of files in the registry.
    #[must_use]
    pub fn file_count(&self) -> usize {
        self.files.len()
    }

    /// Display name (base name) of the current file, or `"Unknown"` when
    /// the registry is empty.
    #[must_use]
    pub fn current_file_name(&self) -> String {
        self.files
            .get(self.current_file_index)
            .and_then(|path| path.file_name())
            .and_then(|name| name.to_str())
            .map_or_else(|| "Unknown".to_string(), str::to_string)
    }

    /// Rebuilds the working set from the current file alone.
    ///
    /// A read failure is recovered locally: logged, working set left empty,
    /// `get_current` degrades to the sentinel.
    fn reload_current_file(&mut self) {
        let Some(path) = self.files.get(self.current_file_index) else {
            return;
        };

        match load_file(path) {
            Ok(entries) => {
                debug!(
                    "Loaded file {} ({} words)",
                    self.current_file_name(),
                    entries.len()
                );
                self.vocabulary = entries;
            }
            Err(e) => {
                warn!("Failed to load current file: {e}");
                self.vocabulary.clear();
            }
        }
    }

    /// Invokes the registered file-change observer, if any.
    fn notify_file_changed(&mut self) {
        if let Some(callback) = self.on_file_changed.as_mut() {
            callback();
        }
    }
}
