//=========================================================================
// Audio Router
//=========================================================================
//
// Gates and routes playback requests onto the bound channel outputs.
//
// Play rules:
//   Background  music mute    stop, then play
//   Effects     effects mute  play (overlaps)
//   Ui          effects mute  play (overlaps)
//   Default     effects mute  stop effects output, then play on it
//
// An unbound or muted channel swallows the request before the clip is
// looked up. Stop halts current playback regardless of mute state.
//
//=========================================================================

//=== External Dependencies ===============================================

use log::{debug, warn};

//=== Internal Dependencies ===============================================

use super::{AudioOutput, Channel, ClipLibrary, SoundId};
use crate::core::error::AudioError;

/// Volume every channel starts at.
pub const DEFAULT_CHANNEL_VOLUME: f32 = 0.5;

//=== ChannelSlot =========================================================

struct ChannelSlot<O> {
    output: Option<O>,
    volume: f32,
}

impl<O> ChannelSlot<O> {
    fn new(volume: f32) -> Self {
        Self {
            output: None,
            volume,
        }
    }
}

//=== AudioRouter =========================================================

/// Routes sounds onto the background, effects and UI outputs.
///
/// Mute flags are plain switches owned by whatever UI toggles them; the
/// router only reads them when a sound is requested.
pub struct AudioRouter<O: AudioOutput> {
    clips: ClipLibrary<O::Clip>,
    background: ChannelSlot<O>,
    effects: ChannelSlot<O>,
    ui: ChannelSlot<O>,
    music_muted: bool,
    effects_muted: bool,
}

impl<O: AudioOutput> AudioRouter<O> {
    //--- Construction -----------------------------------------------------

    /// Creates a router with no bound outputs and default volumes.
    pub fn new(clips: ClipLibrary<O::Clip>) -> Self {
        Self {
            clips,
            background: ChannelSlot::new(DEFAULT_CHANNEL_VOLUME),
            effects: ChannelSlot::new(DEFAULT_CHANNEL_VOLUME),
            ui: ChannelSlot::new(DEFAULT_CHANNEL_VOLUME),
            music_muted: false,
            effects_muted: false,
        }
    }

    //--- Output Binding ---------------------------------------------------

    /// Binds an output device to a channel, returning the previous one.
    ///
    /// `Channel::Default` shares the effects output.
    pub fn bind(&mut self, channel: Channel, output: O) -> Option<O> {
        debug!("Binding output to {:?} channel", channel);
        self.slot_mut(channel).output.replace(output)
    }

    /// Detaches and returns the output bound to a channel.
    pub fn unbind(&mut self, channel: Channel) -> Option<O> {
        self.slot_mut(channel).output.take()
    }

    pub fn is_bound(&self, channel: Channel) -> bool {
        self.slot(channel).output.is_some()
    }

    pub fn output(&self, channel: Channel) -> Option<&O> {
        self.slot(channel).output.as_ref()
    }

    pub fn output_mut(&mut self, channel: Channel) -> Option<&mut O> {
        self.slot_mut(channel).output.as_mut()
    }

    //--- Clips ------------------------------------------------------------

    pub fn clips(&self) -> &ClipLibrary<O::Clip> {
        &self.clips
    }

    pub fn clips_mut(&mut self) -> &mut ClipLibrary<O::Clip> {
        &mut self.clips
    }

    //--- Playback ---------------------------------------------------------

    /// Plays `sound` on `channel` if the channel is bound and not muted.
    ///
    /// # Errors
    ///
    /// Returns [`AudioError::UnknownSound`] when the gate is open but the
    /// clip library has no entry for `sound`. Nothing is stopped in that
    /// case.
    pub fn play(&mut self, channel: Channel, sound: SoundId) -> Result<(), AudioError> {
        let (muted, stop_first) = match channel {
            Channel::Background => (self.music_muted, true),
            Channel::Effects | Channel::Ui => (self.effects_muted, false),
            Channel::Default => (self.effects_muted, true),
        };

        let slot = match channel {
            Channel::Background => &mut self.background,
            Channel::Effects | Channel::Default => &mut self.effects,
            Channel::Ui => &mut self.ui,
        };

        let Some(output) = slot.output.as_mut() else {
            debug!("{:?} channel has no output, dropping {:?}", channel, sound);
            return Ok(());
        };

        if muted {
            debug!("{:?} channel is muted, dropping {:?}", channel, sound);
            return Ok(());
        }

        let Some(clip) = self.clips.get(sound) else {
            warn!("Sound {:?} requested on {:?} channel has no clip", sound, channel);
            return Err(AudioError::UnknownSound { channel, sound });
        };

        if stop_first {
            output.stop();
        }
        output.play_one_shot(clip, slot.volume);
        output.set_volume(slot.volume);

        Ok(())
    }

    /// Halts whatever is playing on `channel`.
    ///
    /// Mute flags and volumes are left untouched. An unbound channel is
    /// ignored.
    pub fn stop(&mut self, channel: Channel) {
        match self.slot_mut(channel).output.as_mut() {
            Some(output) => output.stop(),
            None => debug!("{:?} channel has no output to stop", channel),
        }
    }

    //--- Volume -----------------------------------------------------------

    /// Sets a channel's volume, clamped to `[0, 1]`.
    ///
    /// Takes effect on the next play request.
    pub fn set_volume(&mut self, channel: Channel, volume: f32) {
        let clamped = if volume.is_nan() { 0.0 } else { volume.clamp(0.0, 1.0) };
        if clamped != volume {
            warn!("Volume {} for {:?} channel clamped to {}", volume, channel, clamped);
        }
        self.slot_mut(channel).volume = clamped;
    }

    pub fn volume(&self, channel: Channel) -> f32 {
        self.slot(channel).volume
    }

    //--- Mute Flags -------------------------------------------------------

    pub fn set_music_muted(&mut self, muted: bool) {
        self.music_muted = muted;
    }

    pub fn is_music_muted(&self) -> bool {
        self.music_muted
    }

    /// Mutes effects, UI and default-routed sounds together.
    pub fn set_effects_muted(&mut self, muted: bool) {
        self.effects_muted = muted;
    }

    pub fn are_effects_muted(&self) -> bool {
        self.effects_muted
    }

    //--- Update Loop ------------------------------------------------------

    /// Per-frame hook. Routing has no per-frame work.
    pub fn tick(&mut self) {}

    //--- Internal Helpers -------------------------------------------------

    fn slot(&self, channel: Channel) -> &ChannelSlot<O> {
        match channel {
            Channel::Background => &self.background,
            Channel::Effects | Channel::Default => &self.effects,
            Channel::Ui => &self.ui,
        }
    }

    fn slot_mut(&mut self, channel: Channel) -> &mut ChannelSlot<O> {
        match channel {
            Channel::Background => &mut self.background,
            Channel::Effects | Channel::Default => &mut self.effects,
            Channel::Ui => &mut self.ui,
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
