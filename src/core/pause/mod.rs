//=========================================================================
// Pause System
//=========================================================================
//
// Freezes and resumes every registered entity when the game pauses.
//
// Architecture:
//   PauseCoordinator
//     ├─ state: Running | Paused
//     └─ registry: EntityRegistry (Weak<RefCell<PausableEntity>>)
//
// Flow:
//   set_paused(true)  → registry.live() → PausableEntity::freeze()
//   set_paused(false) → registry.live() → PausableEntity::resume()
//
// Entities expose the capabilities the physics/animation runtime gives
// them. An entity with no capability is legal and pauses as a no-op.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use glam::Vec2;

//=== Module Declarations =================================================

mod coordinator;
mod registry;

//=== Public API ==========================================================

pub use coordinator::{PauseCoordinator, PauseState};
pub use registry::EntityRegistry;

/// Shared handle to a registered entity.
///
/// The registry only keeps a weak reference, so the entity leaves pause
/// coordination as soon as the last `EntityRef` is dropped.
pub type EntityRef = Rc<RefCell<PausableEntity>>;

//=== Capability Traits ===================================================

/// Motion facet of an entity, backed by the physics runtime.
pub trait MotionState {
    /// Current linear velocity.
    fn velocity(&self) -> Vec2;

    fn set_velocity(&mut self, velocity: Vec2);

    /// Whether the physics runtime integrates this body.
    fn is_simulated(&self) -> bool;

    fn set_simulated(&mut self, simulated: bool);
}

/// Animation facet of an entity, backed by the animation runtime.
pub trait AnimationState {
    /// Playback speed multiplier (1.0 = full speed).
    fn speed(&self) -> f32;

    fn set_speed(&mut self, speed: f32);
}

//=== PausableEntity ======================================================

/// An entity taking part in pause coordination.
///
/// Holds whichever capabilities the host attached plus a private
/// snapshot of the motion state. The snapshot is only meaningful between
/// a [`freeze`](Self::freeze) and its matching [`resume`](Self::resume);
/// resuming an entity that was never frozen restores a zero velocity and
/// a disabled simulation flag.
pub struct PausableEntity {
    motion: Option<Box<dyn MotionState>>,
    animation: Option<Box<dyn AnimationState>>,

    //--- Snapshot (valid only while frozen) ------------------------------
    stored_velocity: Vec2,
    stored_simulated: bool,
}

impl PausableEntity {
    //--- Construction -----------------------------------------------------

    /// Creates an entity with no capabilities.
    pub fn new() -> Self {
        Self {
            motion: None,
            animation: None,
            stored_velocity: Vec2::ZERO,
            stored_simulated: false,
        }
    }

    /// Attaches a motion capability.
    pub fn with_motion<M>(mut self, motion: M) -> Self
    where
        M: MotionState + 'static,
    {
        self.motion = Some(Box::new(motion));
        self
    }

    /// Attaches an animation capability.
    pub fn with_animation<A>(mut self, animation: A) -> Self
    where
        A: AnimationState + 'static,
    {
        self.animation = Some(Box::new(animation));
        self
    }

    //--- Capability Access ------------------------------------------------

    pub fn has_motion(&self) -> bool {
        self.motion.is_some()
    }

    pub fn has_animation(&self) -> bool {
        self.animation.is_some()
    }

    pub fn motion(&self) -> Option<&dyn MotionState> {
        self.motion.as_deref()
    }

    pub fn motion_mut(&mut self) -> Option<&mut (dyn MotionState + 'static)> {
        self.motion.as_deref_mut()
    }

    pub fn animation(&self) -> Option<&dyn AnimationState> {
        self.animation.as_deref()
    }

    pub fn animation_mut(&mut self) -> Option<&mut (dyn AnimationState + 'static)> {
        self.animation.as_deref_mut()
    }

    //--- Freeze / Resume --------------------------------------------------

    /// Snapshots and zeroes motion, stops animation playback.
    ///
    /// Freezing an already frozen entity snapshots the frozen state, so the
    /// original velocity is lost.
    pub fn freeze(&mut self) {
        if let Some(motion) = self.motion.as_deref_mut() {
            self.stored_velocity = motion.velocity();
            self.stored_simulated = motion.is_simulated();

            motion.set_velocity(Vec2::ZERO);
            motion.set_simulated(false);
        }

        if let Some(animation) = self.animation.as_deref_mut() {
            animation.set_speed(0.0);
        }
    }

    /// Restores motion from the snapshot and resets animation to full speed.
    ///
    /// Animation is not restored to its pre-freeze speed.
    pub fn resume(&mut self) {
        if let Some(motion) = self.motion.as_deref_mut() {
            motion.set_simulated(self.stored_simulated);
            motion.set_velocity(self.stored_velocity);
        }

        if let Some(animation) = self.animation.as_deref_mut() {
            animation.set_speed(1.0);
        }
    }
}

impl Default for PausableEntity {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for PausableEntity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PausableEntity")
            .field("has_motion", &self.has_motion())
            .field("has_animation", &self.has_animation())
            .field("stored_velocity", &self.stored_velocity)
            .field("stored_simulated", &self.stored_simulated)
            .finish()
    }
}

//=========================================================================
// Test Doubles
//=========================================================================


//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::test_support::{Animator, Body};
    use super::*;

    #[test]
    fn freeze_then_resume_restores_motion() {
        let mut entity = PausableEntity::new().with_motion(Body::moving(3.0, -1.5));

        entity.freeze();
        let motion = entity.motion().unwrap();
        assert_eq!(motion.velocity(), Vec2::ZERO);
        assert!(!motion.is_simulated());

        entity.resume();
        let motion = entity.motion().unwrap();
        assert_eq!(motion.velocity(), Vec2::new(3.0, -1.5));
        assert!(motion.is_simulated());
    }

    #[test]
    fn resume_restores_disabled_simulation_flag() {
        let body = Body {
            velocity: Vec2::new(0.5, 0.5),
            simulated: false,
        };
        let mut entity = PausableEntity::new().with_motion(body);

        entity.freeze();
        entity.resume();

        assert!(!entity.motion().unwrap().is_simulated());
        assert_eq!(entity.motion().unwrap().velocity(), Vec2::new(0.5, 0.5));
    }

    #[test]
    fn animation_resumes_at_full_speed_not_previous_speed() {
        let mut entity = PausableEntity::new().with_animation(Animator { speed: 0.25 });

        entity.freeze();
        assert_eq!(entity.animation().unwrap().speed(), 0.0);

        entity.resume();
        assert_eq!(entity.animation().unwrap().speed(), 1.0);
    }

    #[test]
    fn entity_without_capabilities_is_a_no_op() {
        let mut entity = PausableEntity::new();
        entity.freeze();
        entity.resume();

        assert!(!entity.has_motion());
        assert!(!entity.has_animation());
    }

    #[test]
    fn resume_without_freeze_restores_zeroed_snapshot() {
        let mut entity = PausableEntity::new().with_motion(Body::moving(2.0, 2.0));

        entity.resume();

        assert_eq!(entity.motion().unwrap().velocity(), Vec2::ZERO);
        assert!(!entity.motion().unwrap().is_simulated());
    }

    #[test]
    fn double_freeze_overwrites_snapshot_with_frozen_state() {
        let mut entity = PausableEntity::new().with_motion(Body::moving(4.0, 0.0));

        entity.freeze();
        entity.freeze();
        entity.resume();

        assert_eq!(entity.motion().unwrap().velocity(), Vec2::ZERO);
        assert!(!entity.motion().unwrap().is_simulated());
    }
}
