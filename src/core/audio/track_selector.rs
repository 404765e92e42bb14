//=========================================================================
// Track Selector
//=========================================================================
//
// Picks background music at random without playing the same track twice
// in a row.
//
// Both pools (menu and in-game) share one "last track" value, so the
// history carries across pool switches. Picks use rejection sampling:
// redraw while the draw equals the last track.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::ops::Range;

use log::debug;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

//=== Internal Dependencies ===============================================

use super::{AudioOutput, AudioRouter, Channel, SoundId};
use crate::core::error::{AudioError, TrackError};

//=== TrackPool ===========================================================

/// Half-open range of background track indices.
///
/// Always holds at least two tracks, otherwise a non-repeating pick could
/// never terminate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "[u32; 2]", into = "[u32; 2]")]
pub struct TrackPool {
    start: u32,
    end: u32,
}

impl TrackPool {
    /// Menu music, tracks `0..5`.
    pub const MENU: TrackPool = TrackPool { start: 0, end: 5 };

    /// In-game music, tracks `5..9`.
    pub const IN_GAME: TrackPool = TrackPool { start: 5, end: 9 };

    /// Creates a pool covering `start..end`.
    ///
    /// # Errors
    ///
    /// Returns [`TrackError::PoolTooSmall`] if the range holds fewer than
    /// two tracks.
    pub fn new(start: u32, end: u32) -> Result<Self, TrackError> {
        if end <= start || end - start < 2 {
            return Err(TrackError::PoolTooSmall { start, end });
        }
        Ok(Self { start, end })
    }

    pub fn range(&self) -> Range<u32> {
        self.start..self.end
    }

    pub fn contains(&self, index: u32) -> bool {
        self.range().contains(&index)
    }

    pub fn len(&self) -> u32 {
        self.end - self.start
    }
}

impl TryFrom<[u32; 2]> for TrackPool {
    type Error = TrackError;

    fn try_from([start, end]: [u32; 2]) -> Result<Self, Self::Error> {
        Self::new(start, end)
    }
}

impl From<TrackPool> for [u32; 2] {
    fn from(pool: TrackPool) -> Self {
        [pool.start, pool.end]
    }
}

//=== TrackSelector =======================================================

/// Random, non-repeating background track picker.
///
/// The last-played value starts at track `0`, so the very first menu pick
/// never selects track `0`.
pub struct TrackSelector<R: Rng = StdRng> {
    rng: R,
    menu: TrackPool,
    in_game: TrackPool,
    last_track: u32,
}

impl TrackSelector<StdRng> {
    /// Creates a selector with the default pools, seeded from the OS.
    pub fn from_entropy() -> Self {
        Self::new(StdRng::from_entropy())
    }

    /// Creates a selector with the default pools and a fixed seed.
    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> TrackSelector<R> {
    //--- Construction -----------------------------------------------------

    /// Creates a selector with the default menu and in-game pools.
    pub fn new(rng: R) -> Self {
        Self::with_pools(rng, TrackPool::MENU, TrackPool::IN_GAME)
    }

    pub fn with_pools(rng: R, menu: TrackPool, in_game: TrackPool) -> Self {
        Self {
            rng,
            menu,
            in_game,
            last_track: 0,
        }
    }

    //--- Queries ----------------------------------------------------------

    /// Index of the last picked track, shared by both pools.
    pub fn last_track(&self) -> u32 {
        self.last_track
    }

    pub fn menu_pool(&self) -> TrackPool {
        self.menu
    }

    pub fn in_game_pool(&self) -> TrackPool {
        self.in_game
    }

    //--- Picking ----------------------------------------------------------

    /// Picks a menu track different from the last one and plays it on the
    /// background channel.
    ///
    /// The pick is recorded even if playback then fails.
    ///
    /// # Errors
    ///
    /// Propagates [`AudioError::UnknownSound`] from the router.
    pub fn pick_background_track<O>(
        &mut self,
        router: &mut AudioRouter<O>,
    ) -> Result<SoundId, AudioError>
    where
        O: AudioOutput,
    {
        let track = self.next_track(self.menu);
        router.play(Channel::Background, track)?;
        Ok(track)
    }

    /// Picks an in-game track different from the last one and plays it on
    /// the background channel.
    ///
    /// # Errors
    ///
    /// Propagates [`AudioError::UnknownSound`] from the router.
    pub fn pick_in_game_background_track<O>(
        &mut self,
        router: &mut AudioRouter<O>,
    ) -> Result<SoundId, AudioError>
    where
        O: AudioOutput,
    {
        let track = self.next_track(self.in_game);
        router.play(Channel::Background, track)?;
        Ok(track)
    }

    /// Draws from `pool` until the draw differs from the last track, then
    /// records it.
    pub fn next_track(&mut self, pool: TrackPool) -> SoundId {
        let mut draw = self.rng.gen_range(pool.range());
        let mut redraws = 0u32;
        while draw == self.last_track {
            draw = self.rng.gen_range(pool.range());
            redraws += 1;
        }

        debug!(
            "Picked background track {} from {:?} ({} redraws)",
            draw,
            pool.range(),
            redraws
        );
        self.last_track = draw;
        SoundId(draw)
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
