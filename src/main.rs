//! Wordscroll - timed vocabulary scroller.
//!
//! This is the headless entry point: it wires the configuration store and
//! the vocabulary manager together and prints the current entry on a timer.
//! A graphical shell would drive the same surface.

use std::{env::args, path::PathBuf, sync::Arc, thread::sleep, time::Duration};

use {anyhow::Context, tracing::info, tracing_subscriber::EnvFilter};

use wordscroll::{ConfigStore, VocabularyManager};

/// Main entry point for the wordscroll shell.
///
/// Takes the resource directory as the first argument, defaulting to
/// `resources` in the working directory.
fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let resources_dir = args()
        .nth(1)
        .map_or_else(|| PathBuf::from("resources"), PathBuf::from);

    let config = Arc::new(ConfigStore::new().context("loading configuration")?);
    // Timer period is a shell concern; the core never sleeps.
    let interval = config.get_config().app.default_interval.max(0.1);

    let mut manager = VocabularyManager::new(config);
    manager.set_file_changed_callback(|| info!("Active vocabulary file changed"));
    manager
        .load_all(&resources_dir)
        .with_context(|| format!("loading vocabulary from {}", resources_dir.display()))?;

    info!(
        "{} words loaded, starting at file {}",
        manager.vocabulary_size(),
        manager.current_file_name()
    );

    loop {
        let entry = manager.get_current();
        println!("{}  {}", entry.term, entry.definition);
        sleep(Duration::from_secs_f64(interval));
        manager.advance();
    }
}
