//=========================================================================
// Player Progress
//=========================================================================

//=== External Dependencies ===============================================

use serde::{Deserialize, Serialize};

//=== PlayerProgress ======================================================

/// The player's persistent progress.
///
/// One instance lives for the whole process, owned by the service context
/// and shared with every reader.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PlayerProgress {
    pub level: u32,
    pub experience: f32,
    pub score: f32,
}

impl PlayerProgress {
    pub fn new(level: u32, experience: f32, score: f32) -> Self {
        Self {
            level,
            experience,
            score,
        }
    }

    /// Copies every field from `other` into `self`, keeping `self` in place.
    pub fn overwrite_from(&mut self, other: &PlayerProgress) {
        self.level = other.level;
        self.experience = other.experience;
        self.score = other.score;
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
