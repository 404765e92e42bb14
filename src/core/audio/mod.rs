//=========================================================================
// Audio System
//=========================================================================
//
// Routes sounds to independent playback channels and picks background
// music without immediate repeats.
//
// Architecture:
//   TrackSelector ──pick──▶ AudioRouter ──play/stop──▶ AudioOutput
//                               │
//                               ├─ background (music mute)
//                               ├─ effects    (effects mute)
//                               └─ ui         (effects mute, shared)
//
// Clip decoding and loading happen outside this crate; clips arrive here
// as opaque handles keyed by `SoundId`.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

//=== Module Declarations =================================================

mod router;
mod track_selector;

//=== Public API ==========================================================

pub use router::{AudioRouter, DEFAULT_CHANNEL_VOLUME};
pub use track_selector::{TrackPool, TrackSelector};

//=== Channel =============================================================

/// Playback channel a sound is routed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Channel {
    /// Music. Gated by the music mute flag; a new track stops the old one.
    Background,

    /// Sound effects. Gated by the effects mute flag; sounds overlap.
    Effects,

    /// Interface sounds. Gated by the effects mute flag; sounds overlap.
    Ui,

    /// Any other routing. Uses the effects output but stops it first.
    Default,
}

//=== SoundId =============================================================

/// Identifier of a playable clip.
///
/// Background tracks are addressed by their index, so a track pool range
/// maps directly onto sound ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SoundId(pub u32);

impl SoundId {
    pub fn index(self) -> u32 {
        self.0
    }
}

impl From<u32> for SoundId {
    fn from(index: u32) -> Self {
        Self(index)
    }
}

//=== AudioOutput Trait ===================================================

/// Output device bound to a channel, provided by the host audio runtime.
pub trait AudioOutput {
    /// Opaque playable clip handle.
    type Clip;

    /// Plays `clip` once at `volume`, on top of anything already playing.
    fn play_one_shot(&mut self, clip: &Self::Clip, volume: f32);

    /// Halts everything currently playing on this output.
    fn stop(&mut self);

    /// Sets the output's persistent volume property.
    fn set_volume(&mut self, volume: f32);
}

//=== ClipLibrary =========================================================

/// Resolved clips keyed by sound id.
#[derive(Debug, Clone)]
pub struct ClipLibrary<C> {
    clips: HashMap<SoundId, C>,
}

impl<C> ClipLibrary<C> {
    pub fn new() -> Self {
        Self {
            clips: HashMap::new(),
        }
    }

    /// Inserts a clip, returning the clip previously stored under `id`.
    pub fn insert(&mut self, id: SoundId, clip: C) -> Option<C> {
        self.clips.insert(id, clip)
    }

    pub fn remove(&mut self, id: SoundId) -> Option<C> {
        self.clips.remove(&id)
    }

    pub fn get(&self, id: SoundId) -> Option<&C> {
        self.clips.get(&id)
    }

    pub fn contains(&self, id: SoundId) -> bool {
        self.clips.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.clips.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clips.is_empty()
    }
}

impl<C> Default for ClipLibrary<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> FromIterator<(SoundId, C)> for ClipLibrary<C> {
    fn from_iter<T: IntoIterator<Item = (SoundId, C)>>(iter: T) -> Self {
        Self {
            clips: iter.into_iter().collect(),
        }
    }
}

//=========================================================================
// Test Doubles
//=========================================================================

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;

    /// Output stand-in that tracks what is audible.
    #[derive(Debug, Default)]
    pub struct MockOutput {
        pub playing: Vec<&'static str>,
        pub last_play_volume: Option<f32>,
        pub volume: f32,
        pub stop_calls: usize,
    }

    impl AudioOutput for MockOutput {
        type Clip = &'static str;

        fn play_one_shot(&mut self, clip: &Self::Clip, volume: f32) {
            self.playing.push(*clip);
            self.last_play_volume = Some(volume);
        }

        fn stop(&mut self) {
            self.playing.clear();
            self.stop_calls += 1;
        }

        fn set_volume(&mut self, volume: f32) {
            self.volume = volume;
        }
    }

    pub const SFX_0: SoundId = SoundId(100);
    pub const SFX_1: SoundId = SoundId(101);

    /// Library with nine background tracks and two effects.
    pub fn library() -> ClipLibrary<&'static str> {
        let mut clips: ClipLibrary<&'static str> = [
            "menu-1", "menu-2", "menu-3", "menu-4", "menu-5", "game-1", "game-2", "game-3",
            "game-4",
        ]
        .into_iter()
        .enumerate()
        .map(|(index, clip)| (SoundId(index as u32), clip))
        .collect();
        clips.insert(SFX_0, "sfx-0");
        clips.insert(SFX_1, "sfx-1");
        clips
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
