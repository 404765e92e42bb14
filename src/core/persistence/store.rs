//=========================================================================
// Persistence Store
//=========================================================================
//
// Writes and reads the progress blob at a fixed path.
//
// Save: create parent dirs → serialize → create/truncate → write → flush
// Load: missing file → no-op; otherwise tag check → version check →
//       decode → copy fields into the caller's record
//
// I/O is synchronous on the calling thread. The payload is a few bytes
// and saves are rare.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use log::{debug, error, info, warn};
use serde::{Deserialize, Serialize};

//=== Internal Dependencies ===============================================

use super::PlayerProgress;
use crate::core::error::PersistenceError;

/// Leading bytes of every blob. Anything else is not a progress save.
pub const SAVE_MAGIC: [u8; 4] = *b"PGPS";

/// Format version written into every blob. Bump on layout changes.
pub const SAVE_FORMAT_VERSION: u32 = 1;

/// File name used when the store is pointed at a directory.
pub const DEFAULT_SAVE_FILE: &str = "PlayerInfo.dat";

//=== CorruptSavePolicy ===================================================

/// What [`PersistenceStore::load`] does with a blob it cannot decode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CorruptSavePolicy {
    /// Return the error to the caller.
    #[default]
    Propagate,

    /// Log a warning and leave the caller's record untouched.
    KeepCurrent,
}

//=== LoadOutcome =========================================================

/// Result of a successful [`PersistenceStore::load`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// No blob exists; the record was left as is.
    NoSave,

    /// The record now holds the stored values.
    Restored,

    /// The blob was unreadable and ignored under
    /// [`CorruptSavePolicy::KeepCurrent`].
    Discarded,
}

//=== SaveFile ============================================================

#[derive(Debug, Serialize, Deserialize)]
struct SaveFile {
    magic: [u8; 4],
    version: u32,
    progress: PlayerProgress,
}

//=== PersistenceStore ====================================================

/// Fixed-path store for the player's progress.
#[derive(Debug, Clone)]
pub struct PersistenceStore {
    path: PathBuf,
    corrupt_policy: CorruptSavePolicy,
}

impl PersistenceStore {
    //--- Construction -----------------------------------------------------

    /// Creates a store writing to exactly `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            corrupt_policy: CorruptSavePolicy::default(),
        }
    }

    /// Creates a store writing [`DEFAULT_SAVE_FILE`] inside `dir`.
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        Self::new(dir.as_ref().join(DEFAULT_SAVE_FILE))
    }

    pub fn with_corrupt_policy(mut self, policy: CorruptSavePolicy) -> Self {
        self.corrupt_policy = policy;
        self
    }

    //--- Queries ----------------------------------------------------------

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn corrupt_policy(&self) -> CorruptSavePolicy {
        self.corrupt_policy
    }

    /// Returns true if a blob exists at the store path.
    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    //--- Save -------------------------------------------------------------

    /// Writes `progress`, replacing any existing blob.
    ///
    /// # Errors
    ///
    /// Returns [`PersistenceError::Io`] if the directory or file cannot be
    /// written, [`PersistenceError::Serialization`] if encoding fails.
    pub fn save(&self, progress: &PlayerProgress) -> Result<(), PersistenceError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| self.io_error(e))?;
        }

        let blob = SaveFile {
            magic: SAVE_MAGIC,
            version: SAVE_FORMAT_VERSION,
            progress: *progress,
        };
        let bytes = bincode::serialize(&blob)
            .map_err(|e| PersistenceError::Serialization(e.to_string()))?;

        let mut file = File::create(&self.path).map_err(|e| self.io_error(e))?;
        file.write_all(&bytes).map_err(|e| self.io_error(e))?;
        file.flush().map_err(|e| self.io_error(e))?;

        info!(
            "Saved player progress to {} (level {}, {} bytes)",
            self.path.display(),
            progress.level,
            bytes.len()
        );
        Ok(())
    }

    //--- Load -------------------------------------------------------------

    /// Copies the stored progress into `into`, field by field.
    ///
    /// A missing blob is not an error: `into` is left untouched and
    /// [`LoadOutcome::NoSave`] is returned.
    ///
    /// # Errors
    ///
    /// Returns [`PersistenceError::Io`] if the blob exists but cannot be
    /// read. Under [`CorruptSavePolicy::Propagate`], also returns
    /// [`PersistenceError::Deserialization`] or
    /// [`PersistenceError::UnsupportedVersion`] for a bad blob.
    pub fn load(&self, into: &mut PlayerProgress) -> Result<LoadOutcome, PersistenceError> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!("No save at {}, keeping current progress", self.path.display());
                return Ok(LoadOutcome::NoSave);
            }
            Err(e) => return Err(self.io_error(e)),
        };

        match self.decode(&bytes) {
            Ok(stored) => {
                into.overwrite_from(&stored);
                info!(
                    "Loaded player progress from {} (level {})",
                    self.path.display(),
                    into.level
                );
                Ok(LoadOutcome::Restored)
            }
            Err(e) => match self.corrupt_policy {
                CorruptSavePolicy::Propagate => {
                    error!("Failed to load player progress: {}", e);
                    Err(e)
                }
                CorruptSavePolicy::KeepCurrent => {
                    warn!("Ignoring unreadable save, keeping current progress: {}", e);
                    Ok(LoadOutcome::Discarded)
                }
            },
        }
    }

    //--- Internal Helpers -------------------------------------------------

    fn decode(&self, bytes: &[u8]) -> Result<PlayerProgress, PersistenceError> {
        // Header first, so a newer layout is reported as such.
        let (magic, version): ([u8; 4], u32) =
            bincode::deserialize(bytes).map_err(|e| self.deserialization_error(e))?;
        if magic != SAVE_MAGIC {
            return Err(self.deserialization_error(format!(
                "missing save tag (found {:02x?})",
                magic
            )));
        }
        if version != SAVE_FORMAT_VERSION {
            return Err(PersistenceError::UnsupportedVersion {
                found: version,
                expected: SAVE_FORMAT_VERSION,
            });
        }

        let blob: SaveFile =
            bincode::deserialize(bytes).map_err(|e| self.deserialization_error(e))?;
        Ok(blob.progress)
    }

    fn io_error(&self, source: io::Error) -> PersistenceError {
        PersistenceError::Io {
            path: self.path.clone(),
            source,
        }
    }

    fn deserialization_error(&self, reason: impl ToString) -> PersistenceError {
        PersistenceError::Deserialization {
            path: self.path.clone(),
            reason: reason.to_string(),
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn save_then_load_round_trips() {
        let dir = tempdir().unwrap();
        let store = PersistenceStore::in_dir(dir.path());

        store.save(&PlayerProgress::new(3, 120.5, 99.0)).unwrap();

        // Fresh store stands in for a process restart.
        let restarted = PersistenceStore::in_dir(dir.path());
        let mut progress = PlayerProgress::default();
        let outcome = restarted.load(&mut progress).unwrap();

        assert_eq!(outcome, LoadOutcome::Restored);
        assert_eq!(progress, PlayerProgress::new(3, 120.5, 99.0));
    }

    #[test]
    fn load_without_save_leaves_record_untouched() {
        let dir = tempdir().unwrap();
        let store = PersistenceStore::in_dir(dir.path());
        let mut progress = PlayerProgress::new(7, 1.5, 2.5);

        let outcome = store.load(&mut progress).unwrap();

        assert_eq!(outcome, LoadOutcome::NoSave);
        assert_eq!(progress, PlayerProgress::new(7, 1.5, 2.5));
        assert!(!store.exists());
    }

    #[test]
    fn save_overwrites_previous_blob() {
        let dir = tempdir().unwrap();
        let store = PersistenceStore::in_dir(dir.path());

        store.save(&PlayerProgress::new(9, 900.0, 9000.0)).unwrap();
        store.save(&PlayerProgress::new(1, 2.0, 3.0)).unwrap();

        let mut progress = PlayerProgress::default();
        store.load(&mut progress).unwrap();
        assert_eq!(progress, PlayerProgress::new(1, 2.0, 3.0));
    }

    #[test]
    fn save_creates_missing_directories() {
        let dir = tempdir().unwrap();
        let store = PersistenceStore::new(dir.path().join("profiles/slot-1/progress.dat"));

        store.save(&PlayerProgress::new(2, 0.0, 0.0)).unwrap();

        assert!(store.exists());
    }

    #[test]
    fn corrupt_blob_propagates_by_default() {
        let dir = tempdir().unwrap();
        let store = PersistenceStore::in_dir(dir.path());
        fs::write(store.path(), [0xFF, 0x01]).unwrap();
        let mut progress = PlayerProgress::new(4, 4.0, 4.0);

        let err = store.load(&mut progress).unwrap_err();

        assert!(matches!(err, PersistenceError::Deserialization { .. }));
        assert_eq!(progress, PlayerProgress::new(4, 4.0, 4.0));
    }

    #[test]
    fn garbage_blob_is_a_deserialization_error() {
        let dir = tempdir().unwrap();
        let store = PersistenceStore::in_dir(dir.path());
        fs::write(store.path(), b"garbage").unwrap();
        let mut progress = PlayerProgress::new(4, 4.0, 4.0);

        let err = store.load(&mut progress).unwrap_err();

        assert!(matches!(err, PersistenceError::Deserialization { .. }));
        assert_eq!(progress, PlayerProgress::new(4, 4.0, 4.0));
    }

    #[test]
    fn untagged_blob_with_valid_layout_is_rejected() {
        let dir = tempdir().unwrap();
        let store = PersistenceStore::in_dir(dir.path());
        let foreign = SaveFile {
            magic: *b"XXXX",
            version: SAVE_FORMAT_VERSION,
            progress: PlayerProgress::new(5, 5.0, 5.0),
        };
        fs::write(store.path(), bincode::serialize(&foreign).unwrap()).unwrap();

        let err = store.load(&mut PlayerProgress::default()).unwrap_err();

        assert!(matches!(err, PersistenceError::Deserialization { .. }));
    }

    #[test]
    fn corrupt_blob_is_discarded_under_keep_current() {
        let dir = tempdir().unwrap();
        let store = PersistenceStore::in_dir(dir.path())
            .with_corrupt_policy(CorruptSavePolicy::KeepCurrent);
        fs::write(store.path(), b"garbage").unwrap();
        let mut progress = PlayerProgress::new(4, 4.0, 4.0);

        let outcome = store.load(&mut progress).unwrap();

        assert_eq!(outcome, LoadOutcome::Discarded);
        assert_eq!(progress, PlayerProgress::new(4, 4.0, 4.0));
    }

    #[test]
    fn unknown_version_is_rejected() {
        let dir = tempdir().unwrap();
        let store = PersistenceStore::in_dir(dir.path());
        let future = SaveFile {
            magic: SAVE_MAGIC,
            version: SAVE_FORMAT_VERSION + 1,
            progress: PlayerProgress::new(5, 5.0, 5.0),
        };
        fs::write(store.path(), bincode::serialize(&future).unwrap()).unwrap();

        let err = store.load(&mut PlayerProgress::default()).unwrap_err();

        assert!(matches!(
            err,
            PersistenceError::UnsupportedVersion { found, expected }
                if found == SAVE_FORMAT_VERSION + 1 && expected == SAVE_FORMAT_VERSION
        ));
    }

    #[test]
    fn truncated_blob_is_a_deserialization_error() {
        let dir = tempdir().unwrap();
        let store = PersistenceStore::in_dir(dir.path());
        store.save(&PlayerProgress::new(3, 3.0, 3.0)).unwrap();

        let bytes = fs::read(store.path()).unwrap();
        fs::write(store.path(), &bytes[..bytes.len() - 2]).unwrap();

        let err = store.load(&mut PlayerProgress::default()).unwrap_err();
        assert!(matches!(err, PersistenceError::Deserialization { .. }));
    }
}
