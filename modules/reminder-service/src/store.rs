//! Flat-file persistence for reminders.
//!
//! The whole list lives in one JSON file. Every load reads the whole file and
//! every save rewrites it from scratch. There is no locking around a
//! load-modify-save sequence, so two concurrent updates can lose one write.

use parking_lot::Mutex;
use reminder_types::Reminder;
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub struct Store {
    path: PathBuf,
    /// Last list successfully loaded or handed to `save`.
    cached: Mutex<Vec<Reminder>>,
}

impl Store {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            cached: Mutex::new(Vec::new()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read and parse the data file, replacing the cached list.
    pub fn load(&self) -> Result<Vec<Reminder>, StoreError> {
        let bytes = std::fs::read(&self.path)?;
        // A literal `null` file is an empty list.
        let reminders: Vec<Reminder> =
            serde_json::from_slice::<Option<Vec<Reminder>>>(&bytes)?.unwrap_or_default();
        *self.cached.lock() = reminders.clone();
        Ok(reminders)
    }

    /// Like [`Store::load`], but on failure logs and falls back to the cached
    /// list (empty before the first successful load).
    pub fn load_or_cached(&self) -> Vec<Reminder> {
        match self.load() {
            Ok(reminders) => reminders,
            Err(e) => {
                log::warn!(
                    "Failed to load reminders from {}: {} (serving last loaded list)",
                    self.path.display(),
                    e
                );
                self.cached()
            }
        }
    }

    pub fn cached(&self) -> Vec<Reminder> {
        self.cached.lock().clone()
    }

    /// Overwrite the data file with `reminders`, 2-space indented.
    ///
    /// The cached list is replaced before the write, so a failed write leaves
    /// the cache ahead of the file until the next successful save or load.
    pub fn save(&self, reminders: Vec<Reminder>) -> Result<(), StoreError> {
        let bytes = serde_json::to_vec_pretty(&reminders)?;
        *self.cached.lock() = reminders;
        std::fs::write(&self.path, bytes)?;
        Ok(())
    }
}

/// First reminder whose id, printed as a decimal integer, equals `id`.
pub fn find_by_id<'a>(reminders: &'a [Reminder], id: &str) -> Option<&'a Reminder> {
    reminders.iter().find(|r| r.id.to_string() == id)
}

/// Set the checked flag on the first reminder with `id`. Returns false when no
/// reminder matched.
pub fn set_checked(reminders: &mut [Reminder], id: i64, is_checked: bool) -> bool {
    match reminders.iter_mut().find(|r| r.id == id) {
        Some(reminder) => {
            reminder.is_checked = is_checked;
            true
        }
        None => false,
    }
}
