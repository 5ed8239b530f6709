use std::path::Path;
use std::sync::mpsc::{Receiver, channel};
use std::time::Duration;

use anyhow::Result;
use notify_debouncer_mini::notify::{RecommendedWatcher, RecursiveMode};
use notify_debouncer_mini::{DebounceEventResult, Debouncer, new_debouncer};

const DEBOUNCE: Duration = Duration::from_millis(250);

/// Watches the deck manifest and reports debounced changes. The notify
/// thread only posts into the channel; the UI thread polls `changed` each
/// frame and performs the reload itself.
pub struct DeckWatcher {
    _debouncer: Debouncer<RecommendedWatcher>,
    rx: Receiver<DebounceEventResult>,
}

impl DeckWatcher {
    pub fn new(deck_file: &Path) -> Result<Self> {
        let (tx, rx) = channel();
        let mut debouncer = new_debouncer(DEBOUNCE, tx)?;
        debouncer
            .watcher()
            .watch(deck_file, RecursiveMode::NonRecursive)?;
        Ok(Self {
            _debouncer: debouncer,
            rx,
        })
    }

    /// Drain pending events; true when the deck file changed since last poll.
    pub fn changed(&self) -> bool {
        self.rx
            .try_iter()
            .any(|result| result.is_ok_and(|events| !events.is_empty()))
    }
}
