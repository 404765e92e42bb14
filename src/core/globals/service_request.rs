//=========================================================================
// Service Requests
//=========================================================================
//
// Commands external collaborators (menus, HUD, host loop) send to the
// service context. Applied in arrival order on the service thread.
//
//=========================================================================

//=== Internal Dependencies ===============================================

use crate::core::audio::{Channel, SoundId};

//=== ServiceRequest ======================================================

/// A single operation on the service context.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ServiceRequest {
    /// Pause (`true`) or resume (`false`) every registered entity.
    SetPaused(bool),

    /// Play a sound on a channel.
    Play(Channel, SoundId),

    /// Halt current playback on a channel.
    Stop(Channel),

    /// Pick and play a menu track.
    PlayBackgroundMusic,

    /// Pick and play an in-game track.
    PlayInGameBackgroundMusic,

    SetMusicMuted(bool),

    /// Mutes effects and UI sounds together.
    SetEffectsMuted(bool),

    SetVolume(Channel, f32),

    /// Write the live progress record to disk.
    Save,

    /// Overwrite the live progress record from disk.
    Load,
}
