//=========================================================================
// Service Context
//=========================================================================
//
// The one instance of every coordinator, built at startup and handed to
// whoever needs pause, audio or persistence access.
//
// Contents:
// - pause:    PauseCoordinator + entity registry
// - audio:    AudioRouter (channels, mute flags, volumes)
// - tracks:   TrackSelector (shared last-track history)
// - store:    PersistenceStore (fixed save path)
// - progress: the shared PlayerProgress record
//
//=========================================================================

//=== External Dependencies ===============================================

use std::cell::RefCell;
use std::rc::Rc;

use log::{debug, info};
use rand::rngs::StdRng;
use rand::Rng;

//=== Internal Dependencies ===============================================

use super::ServiceRequest;
use crate::core::audio::{AudioOutput, AudioRouter, Channel, ClipLibrary, SoundId, TrackSelector};
use crate::core::config::RuntimeConfig;
use crate::core::error::{AudioError, PersistenceError, ServiceError};
use crate::core::pause::PauseCoordinator;
use crate::core::persistence::{LoadOutcome, PersistenceStore, PlayerProgress};

//=== ServiceContext ======================================================

/// Owner of the pause, audio and persistence coordinators.
///
/// Constructed once per process. Systems receive `&mut ServiceContext`
/// (or the individual coordinator they need) instead of reaching for a
/// global.
pub struct ServiceContext<O: AudioOutput, R: Rng = StdRng> {
    /// Global pause flag and the entities it freezes.
    pub pause: PauseCoordinator,

    /// Channel routing, mute flags and volumes.
    pub audio: AudioRouter<O>,

    /// Background music picker.
    pub tracks: TrackSelector<R>,

    /// Fixed-path progress store.
    pub store: PersistenceStore,

    progress: Rc<RefCell<PlayerProgress>>,
}

impl<O: AudioOutput, R: Rng> ServiceContext<O, R> {
    //--- Construction -----------------------------------------------------

    /// Builds every coordinator from `config`.
    ///
    /// Outputs start unbound; bind them through `audio` once the host has
    /// created its devices. Progress starts zeroed.
    pub fn new(config: &RuntimeConfig, clips: ClipLibrary<O::Clip>, rng: R) -> Self {
        let mut audio = AudioRouter::new(clips);
        audio.set_volume(Channel::Background, config.volumes.background);
        audio.set_volume(Channel::Effects, config.volumes.effects);
        audio.set_volume(Channel::Ui, config.volumes.ui);

        let store = PersistenceStore::new(config.save_path.clone())
            .with_corrupt_policy(config.corrupt_save);

        debug!(
            "Service context created (save path: {})",
            store.path().display()
        );

        Self {
            pause: PauseCoordinator::new(),
            audio,
            tracks: TrackSelector::with_pools(rng, config.tracks.menu, config.tracks.in_game),
            store,
            progress: Rc::new(RefCell::new(PlayerProgress::default())),
        }
    }

    //--- Progress ---------------------------------------------------------

    /// Shared handle to the live progress record.
    ///
    /// Loading overwrites this record in place, so handles taken before a
    /// load observe the restored values.
    pub fn progress(&self) -> Rc<RefCell<PlayerProgress>> {
        Rc::clone(&self.progress)
    }

    /// Saves the live progress record.
    ///
    /// # Errors
    ///
    /// Propagates [`PersistenceError`] from the store. Returns
    /// [`PersistenceError::ProgressBusy`] if another holder is mutating
    /// the record.
    pub fn save_progress(&self) -> Result<(), PersistenceError> {
        let progress = *self
            .progress
            .try_borrow()
            .map_err(|_| PersistenceError::ProgressBusy("saved"))?;
        self.store.save(&progress)
    }

    /// Loads the stored progress into the live record.
    ///
    /// # Errors
    ///
    /// Propagates [`PersistenceError`] from the store; the record is left
    /// untouched on error. Returns [`PersistenceError::ProgressBusy`] if
    /// another holder has the record borrowed.
    pub fn load_progress(&self) -> Result<LoadOutcome, PersistenceError> {
        let mut progress = self
            .progress
            .try_borrow_mut()
            .map_err(|_| PersistenceError::ProgressBusy("loaded"))?;
        self.store.load(&mut progress)
    }

    //--- Music ------------------------------------------------------------

    /// Picks and plays a menu track different from the last one.
    ///
    /// # Errors
    ///
    /// Propagates [`AudioError::UnknownSound`].
    pub fn play_background_music(&mut self) -> Result<SoundId, AudioError> {
        self.tracks.pick_background_track(&mut self.audio)
    }

    /// Picks and plays an in-game track different from the last one.
    ///
    /// # Errors
    ///
    /// Propagates [`AudioError::UnknownSound`].
    pub fn play_in_game_background_music(&mut self) -> Result<SoundId, AudioError> {
        self.tracks.pick_in_game_background_track(&mut self.audio)
    }

    //--- Requests ---------------------------------------------------------

    /// Applies a single request from a host or UI collaborator.
    ///
    /// # Errors
    ///
    /// Returns the audio or persistence error raised by the request. The
    /// context stays usable afterwards.
    pub fn handle(&mut self, request: ServiceRequest) -> Result<(), ServiceError> {
        debug!("Handling {:?}", request);

        match request {
            ServiceRequest::SetPaused(paused) => self.pause.set_paused(paused),
            ServiceRequest::Play(channel, sound) => self.audio.play(channel, sound)?,
            ServiceRequest::Stop(channel) => self.audio.stop(channel),
            ServiceRequest::PlayBackgroundMusic => {
                self.play_background_music()?;
            }
            ServiceRequest::PlayInGameBackgroundMusic => {
                self.play_in_game_background_music()?;
            }
            ServiceRequest::SetMusicMuted(muted) => self.audio.set_music_muted(muted),
            ServiceRequest::SetEffectsMuted(muted) => self.audio.set_effects_muted(muted),
            ServiceRequest::SetVolume(channel, volume) => self.audio.set_volume(channel, volume),
            ServiceRequest::Save => self.save_progress()?,
            ServiceRequest::Load => {
                let outcome = self.load_progress()?;
                info!("Load request finished: {:?}", outcome);
            }
        }

        Ok(())
    }

    //--- Update Loop ------------------------------------------------------

    /// Ticks every coordinator once. Called once per frame.
    pub fn tick(&mut self) {
        self.pause.tick();
        self.audio.tick();
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use tempfile::{tempdir, TempDir};

    use super::*;
    use crate::core::audio::test_support::{library, MockOutput, SFX_0};
    use crate::core::pause::test_support::Body;
    use crate::core::pause::{MotionState, PausableEntity};

    fn context() -> (ServiceContext<MockOutput>, TempDir) {
        let dir = tempdir().unwrap();
        let config = RuntimeConfig {
            save_path: dir.path().join("PlayerInfo.dat"),
            ..RuntimeConfig::default()
        };
        let mut ctx = ServiceContext::new(&config, library(), StdRng::seed_from_u64(9));
        ctx.audio.bind(Channel::Background, MockOutput::default());
        ctx.audio.bind(Channel::Effects, MockOutput::default());
        (ctx, dir)
    }

    #[test]
    fn progress_starts_zeroed() {
        let (ctx, _dir) = context();
        assert_eq!(*ctx.progress().borrow(), PlayerProgress::default());
    }

    #[test]
    fn config_volumes_are_applied() {
        let config = RuntimeConfig {
            volumes: crate::core::config::ChannelVolumes {
                background: 0.1,
                effects: 0.2,
                ui: 0.3,
            },
            ..RuntimeConfig::default()
        };
        let ctx: ServiceContext<MockOutput> =
            ServiceContext::new(&config, library(), StdRng::seed_from_u64(0));

        assert_eq!(ctx.audio.volume(Channel::Background), 0.1);
        assert_eq!(ctx.audio.volume(Channel::Effects), 0.2);
        assert_eq!(ctx.audio.volume(Channel::Ui), 0.3);
    }

    #[test]
    fn load_preserves_record_identity() {
        let (ctx, _dir) = context();
        let holder = ctx.progress();

        *holder.borrow_mut() = PlayerProgress::new(3, 120.5, 99.0);
        ctx.save_progress().unwrap();
        *holder.borrow_mut() = PlayerProgress::default();

        assert_eq!(ctx.load_progress().unwrap(), LoadOutcome::Restored);

        assert!(Rc::ptr_eq(&holder, &ctx.progress()));
        assert_eq!(*holder.borrow(), PlayerProgress::new(3, 120.5, 99.0));
    }

    #[test]
    fn cold_start_load_is_a_no_op() {
        let (ctx, _dir) = context();
        assert_eq!(ctx.load_progress().unwrap(), LoadOutcome::NoSave);
        assert_eq!(*ctx.progress().borrow(), PlayerProgress::default());
    }

    #[test]
    fn requests_drive_coordinators() {
        let (mut ctx, _dir) = context();
        let entity = ctx.pause.register(PausableEntity::new().with_motion(Body::moving(1.0, 1.0)));

        ctx.handle(ServiceRequest::SetPaused(true)).unwrap();
        assert!(ctx.pause.is_paused());
        assert!(!entity.borrow().motion().unwrap().is_simulated());

        ctx.handle(ServiceRequest::SetEffectsMuted(true)).unwrap();
        ctx.handle(ServiceRequest::Play(Channel::Effects, SFX_0)).unwrap();
        assert!(ctx.audio.output(Channel::Effects).unwrap().playing.is_empty());

        ctx.handle(ServiceRequest::SetVolume(Channel::Background, 0.7)).unwrap();
        ctx.handle(ServiceRequest::PlayBackgroundMusic).unwrap();
        let background = ctx.audio.output(Channel::Background).unwrap();
        assert_eq!(background.playing.len(), 1);
        assert_eq!(background.volume, 0.7);

        ctx.handle(ServiceRequest::Stop(Channel::Background)).unwrap();
        assert!(ctx.audio.output(Channel::Background).unwrap().playing.is_empty());
    }

    #[test]
    fn failed_request_leaves_context_usable() {
        let (mut ctx, _dir) = context();

        let err = ctx
            .handle(ServiceRequest::Play(Channel::Effects, SoundId(404)))
            .unwrap_err();
        assert!(matches!(err, ServiceError::Audio(AudioError::UnknownSound { .. })));

        ctx.handle(ServiceRequest::Play(Channel::Effects, SFX_0)).unwrap();
        assert_eq!(ctx.audio.output(Channel::Effects).unwrap().playing, vec!["sfx-0"]);
    }

    #[test]
    fn save_and_load_requests_round_trip() {
        let (mut ctx, _dir) = context();
        ctx.progress().borrow_mut().level = 12;

        ctx.handle(ServiceRequest::Save).unwrap();
        ctx.progress().borrow_mut().level = 0;
        ctx.handle(ServiceRequest::Load).unwrap();

        assert_eq!(ctx.progress().borrow().level, 12);
    }

    #[test]
    fn save_while_record_is_mutably_borrowed_reports_busy() {
        let (ctx, _dir) = context();
        let holder = ctx.progress();
        let _guard = holder.borrow_mut();

        let err = ctx.save_progress().unwrap_err();

        assert!(matches!(err, PersistenceError::ProgressBusy(_)));
        assert!(!ctx.store.exists());
    }

    #[test]
    fn load_while_record_is_borrowed_reports_busy_and_recovers() {
        let (mut ctx, _dir) = context();
        ctx.progress().borrow_mut().level = 6;
        ctx.save_progress().unwrap();

        let holder = ctx.progress();
        {
            let _reader = holder.borrow();
            let err = ctx.handle(ServiceRequest::Load).unwrap_err();
            assert!(matches!(
                err,
                ServiceError::Persistence(PersistenceError::ProgressBusy(_))
            ));
        }

        holder.borrow_mut().level = 0;
        assert_eq!(ctx.load_progress().unwrap(), LoadOutcome::Restored);
        assert_eq!(holder.borrow().level, 6);
    }

    #[test]
    fn in_game_music_follows_menu_music_without_repeat() {
        let (mut ctx, _dir) = context();

        let menu = ctx.play_background_music().unwrap();
        let game = ctx.play_in_game_background_music().unwrap();

        assert_ne!(menu, game);
        assert_eq!(ctx.tracks.last_track(), game.index());
    }
}
