//=========================================================================
// Pause Coordinator
//=========================================================================
//
// Owns the global pause flag and drives freeze/resume passes over the
// entity registry.
//
// State machine:
//   Running ──set_paused(true)──▶ Paused    (freeze pass)
//   Paused  ──set_paused(true)──▶ Paused    (no-op)
//   *       ──set_paused(false)─▶ Running   (resume pass, always)
//
//=========================================================================

//=== External Dependencies ===============================================

use std::cell::RefCell;
use std::rc::Rc;

use log::{debug, warn};

//=== Internal Dependencies ===============================================

use super::{EntityRef, EntityRegistry, PausableEntity};

//=== PauseState ==========================================================

/// Global pause state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PauseState {
    #[default]
    Running,
    Paused,
}

//=== PauseCoordinator ====================================================

/// Single pause authority for the process.
///
/// Entities join through [`register`](Self::register) (or
/// [`add_entity`](Self::add_entity) for an existing handle) and leave
/// through [`remove_entity`](Self::remove_entity) or by being dropped.
#[derive(Debug, Default)]
pub struct PauseCoordinator {
    registry: EntityRegistry,
    state: PauseState,
}

impl PauseCoordinator {
    //--- Construction -----------------------------------------------------

    /// Creates a coordinator in the `Running` state with no entities.
    pub fn new() -> Self {
        Self {
            registry: EntityRegistry::new(),
            state: PauseState::Running,
        }
    }

    //--- Registration -----------------------------------------------------

    /// Wraps an entity in a shared handle and registers it.
    ///
    /// Registration lasts until the returned handle (and every clone of
    /// it) is dropped, or until [`remove_entity`](Self::remove_entity).
    pub fn register(&mut self, entity: PausableEntity) -> EntityRef {
        let entity = Rc::new(RefCell::new(entity));
        self.add_entity(&entity);
        entity
    }

    /// Adds an existing entity handle. Adding twice registers twice.
    pub fn add_entity(&mut self, entity: &EntityRef) {
        self.registry.add(entity);
    }

    /// Removes the first registration of `entity`, if any.
    pub fn remove_entity(&mut self, entity: &EntityRef) -> bool {
        self.registry.remove(entity)
    }

    pub fn registry(&self) -> &EntityRegistry {
        &self.registry
    }

    //--- Pause State ------------------------------------------------------

    pub fn state(&self) -> PauseState {
        self.state
    }

    pub fn is_paused(&self) -> bool {
        self.state == PauseState::Paused
    }

    /// Pauses or resumes the game.
    ///
    /// Pausing while already paused does nothing. Resuming always runs a
    /// resume pass, even when already running.
    pub fn set_paused(&mut self, paused: bool) {
        if paused && self.is_paused() {
            debug!("Already paused, skipping freeze pass");
            return;
        }

        self.state = if paused {
            PauseState::Paused
        } else {
            PauseState::Running
        };

        let entities = self.registry.live();
        debug!(
            "{} {} entities",
            if paused { "Freezing" } else { "Resuming" },
            entities.len()
        );

        for entity in &entities {
            if paused {
                Self::freeze(entity);
            } else {
                Self::resume(entity);
            }
        }
    }

    //--- Per-Entity Operations --------------------------------------------

    /// Freezes a single entity.
    ///
    /// An entity currently borrowed elsewhere is skipped with a warning.
    pub fn freeze(entity: &EntityRef) {
        match entity.try_borrow_mut() {
            Ok(mut entity) => entity.freeze(),
            Err(_) => warn!("Entity is borrowed during freeze pass, skipping"),
        }
    }

    /// Resumes a single entity.
    ///
    /// An entity currently borrowed elsewhere is skipped with a warning.
    pub fn resume(entity: &EntityRef) {
        match entity.try_borrow_mut() {
            Ok(mut entity) => entity.resume(),
            Err(_) => warn!("Entity is borrowed during resume pass, skipping"),
        }
    }

    //--- Update Loop ------------------------------------------------------

    /// Per-frame hook. Pause has no per-frame work.
    pub fn tick(&mut self) {}
}

//=========================================================================
// Unit Tests
//=========================================================================
