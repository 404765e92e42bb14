//=========================================================================
// Persistence
//=========================================================================
//
// Saves and restores the player's progress record across sessions.
//
// Blob layout (bincode):
//   SaveFile { version: u32, progress: PlayerProgress }
//
// Loading copies the stored fields into the caller's record; the record
// itself is never replaced, since other systems hold it by reference.
//
//=========================================================================

//=== Module Declarations =================================================

mod progress;
mod store;

//=== Public API ==========================================================

pub use progress::PlayerProgress;
pub use store::{
    CorruptSavePolicy, LoadOutcome, PersistenceStore, DEFAULT_SAVE_FILE, SAVE_FORMAT_VERSION,
    SAVE_MAGIC,
};
