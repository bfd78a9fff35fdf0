//! Vocabulary file parsing and discovery.
//!
//! This module reads plain-text vocabulary files (one `TERM POS.DEFINITION`
//! entry per line) and discovers them inside a resource directory. It owns
//! no notion of a current position; that lives in the manager.

use std::{
    fs::{read_dir, read_to_string},
    io::Error as StdError,
    path::{Path, PathBuf},
};

use {thiserror::Error, tracing::debug};

/// File extension recognized as a vocabulary file.
pub const VOCABULARY_EXTENSION: &str = "txt";

/// Error type for vocabulary file operations.
#[derive(Error, Debug)]
pub enum StoreError {
    /// The requested directory does not exist.
    #[error("Directory not found: {0}")]
    NotFound(PathBuf),
    /// An existing path could not be read (permissions, bad encoding, ...).
    #[error("Failed to read {path}: {source}")]
    Io {
        /// Path that failed to read.
        path: PathBuf,
        /// Underlying IO error.
        source: StdError,
    },
}

/// One word/definition pair. Immutable once parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    /// The term being learned.
    pub term: String,
    /// Its definition; may be empty for lines without the expected shape.
    pub definition: String,
}

impl Entry {
    /// Creates a new entry from trimmed parts.
    #[must_use]
    pub fn new(term: impl Into<String>, definition: impl Into<String>) -> Self {
        Self {
            term: term.into(),
            definition: definition.into(),
        }
    }

    /// Sentinel entry shown when no vocabulary is loaded.
    ///
    /// The display layer renders this instead of crashing on an empty state.
    #[must_use]
    pub fn placeholder() -> Self {
        Self::new("No words loaded", "")
    }
}

/// Splits one vocabulary line into a term and a definition.
///
/// The boundary is the nearest space before the first `.` in the line, so
/// `"Hello n.你好；"` parses as `("Hello", "n.你好；")` with the part-of-speech
/// marker kept on the definition side. Lines without a period, or without a
/// space before it, degrade to a term-only entry.
///
/// # Arguments
///
/// * `line` - One non-blank line of a vocabulary file.
///
/// # Returns
///
/// The parsed `Entry`. Never fails; malformed lines become term-only entries.
#[must_use]
pub fn parse_line(line: &str) -> Entry {
    let Some(dot_index) = line.find('.') else {
        return Entry::new(line.trim(), "");
    };
    let Some(space_index) = line[..dot_index].rfind(' ') else {
        return Entry::new(line.trim(), "");
    };

    Entry::new(line[..space_index].trim(), line[space_index + 1..].trim())
}

/// Loads one vocabulary file into an ordered set of entries.
///
/// Reads the file as UTF-8 text and produces one entry per non-blank line,
/// in file order. Blank lines (after trimming) are skipped.
///
/// # Arguments
///
/// * `path` - Path to the vocabulary file.
///
/// # Returns
///
/// A `Result` containing the entries, or a `StoreError`.
///
/// # Errors
///
/// Returns `StoreError::Io` if the file cannot be opened, read, or decoded
/// as UTF-8.
pub fn load_file(path: &Path) -> Result<Vec<Entry>, StoreError> {
    let contents = read_to_string(path).map_err(|source| StoreError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let entries: Vec<Entry> = contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(parse_line)
        .collect();

    debug!("Loaded {} entries from {:?}", entries.len(), path);
    Ok(entries)
}

/// Discovers vocabulary files in a resource directory.
///
/// Lists directory entries whose name ends in `.txt`. Paths are sorted so
/// the registry order is deterministic across platforms.
///
/// # Arguments
///
/// * `dir` - The resource directory to scan.
///
/// # Returns
///
/// A `Result` containing the sorted file paths. An existing directory with
/// no matching files yields an empty registry, not an error.
///
/// # Errors
///
/// Returns `StoreError::NotFound` if the directory does not exist, or
/// `StoreError::Io` if it cannot be listed.
pub fn discover_files(dir: &Path) -> Result<Vec<PathBuf>, StoreError> {
    if !dir.is_dir() {
        return Err(StoreError::NotFound(dir.to_path_buf()));
    }

    let entries = read_dir(dir).map_err(|source| StoreError::Io {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut files = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|source| StoreError::Io {
            path: dir.to_path_buf(),
            source,
        })?;
        let path = entry.path();

        if path.is_file()
            && path.extension().and_then(|ext| ext.to_str()) == Some(VOCABULARY_EXTENSION)
        {
            files.push(path);
        }
    }

    files.sort();
    debug!("Discovered {} vocabulary files in {:?}", files.len(), dir);
    Ok(files)
}

#[cfg(test)]
mod tests {
    use std::{fs::write, path::Path};

    use tempfile::TempDir;

    use crate::vocabulary::store::{
        Entry, StoreError, discover_files, load_file, parse_line,
    };

    #[test]
    fn test_parse_line_with_pos_marker() {
        let entry = parse_line("Hello n.你好；");
        assert_eq!(entry, Entry::new("Hello", "n.你好；"));
    }

    #[test]
    fn test_parse_line_definition_keeps_period() {
        let entry = parse_line("Scroll v.滚动；n.卷轴；");
        assert_eq!(entry.term, "Scroll");
        assert_eq!(entry.definition, "v.滚动；n.卷轴；");
    }

    #[test]
    fn test_parse_line_without_period_is_term_only() {
        let entry = parse_line("Hello");
        assert_eq!(entry, Entry::new("Hello", ""));
    }

    #[test]
    fn test_parse_line_without_space_before_period_is_term_only() {
        // Period present, but no space precedes it anywhere.
        let entry = parse_line("3.14");
        assert_eq!(entry, Entry::new("3.14", ""));
    }

    #[test]
    fn test_parse_line_splits_at_space_nearest_the_period() {
        // Multi-word term: the boundary is the last space before the period,
        // so everything before it stays in the term.
        let entry = parse_line("give up v.放弃；");
        assert_eq!(entry.term, "give up");
        assert_eq!(entry.definition, "v.放弃；");
    }

    #[test]
    fn test_parse_line_trims_both_sides() {
        let entry = parse_line("Hello  n.你好；");
        assert_eq!(entry.term, "Hello");
        assert_eq!(entry.definition, "n.你好；");
    }

    #[test]
    fn test_placeholder_entry() {
        let entry = Entry::placeholder();
        assert_eq!(entry.term, "No words loaded");
        assert!(entry.definition.is_empty());
    }

    #[test]
    fn test_load_file_skips_blank_lines() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("words.txt");
        write(&path, "Hello n.你好；\n\n   \nWorld n.世界；\n").unwrap();

        let entries = load_file(&path).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].term, "Hello");
        assert_eq!(entries[1].term, "World");
    }

    #[test]
    fn test_load_file_preserves_file_order() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("words.txt");
        write(&path, "Bravo n.好\nAlpha n.首\nCharlie n.查理\n").unwrap();

        let entries = load_file(&path).unwrap();
        let terms: Vec<&str> = entries.iter().map(|e| e.term.as_str()).collect();
        assert_eq!(terms, ["Bravo", "Alpha", "Charlie"]);
    }

    #[test]
    fn test_load_file_missing_is_io_error() {
        let result = load_file(Path::new("/nonexistent/words.txt"));
        assert!(matches!(result, Err(StoreError::Io { .. })));
    }

    #[test]
    fn test_load_file_invalid_utf8_is_io_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("corrupt.txt");
        write(&path, [0xff, 0xfe, 0xfd]).unwrap();

        let result = load_file(&path);
        assert!(matches!(result, Err(StoreError::Io { .. })));
    }

    #[test]
    fn test_discover_files_sorted_and_filtered() {
        let temp_dir = TempDir::new().unwrap();
        write(temp_dir.path().join("b.txt"), "x n.y\n").unwrap();
        write(temp_dir.path().join("a.txt"), "x n.y\n").unwrap();
        write(temp_dir.path().join("notes.md"), "ignored\n").unwrap();

        let files = discover_files(temp_dir.path()).unwrap();
        let names: Vec<&str> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_str().unwrap())
            .collect();
        assert_eq!(names, ["a.txt", "b.txt"]);
    }

    #[test]
    fn test_discover_files_empty_directory_is_not_an_error() {
        let temp_dir = TempDir::new().unwrap();
        let files = discover_files(temp_dir.path()).unwrap();
        assert!(files.is_empty());
    }

    #[test]
    fn test_discover_files_missing_directory() {
        let result = discover_files(Path::new("/nonexistent/resources"));
        assert!(matches!(result, Err(StoreError::NotFound(_))));
    }
}
