//=========================================================================
// Entity Registry
//=========================================================================
//
// Ordered list of entities taking part in pause coordination.
//
// Entries are weak: the registry tracks entity lifetime, it never extends
// it. Duplicate registrations are kept as separate entries.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::cell::RefCell;
use std::ptr;
use std::rc::{Rc, Weak};

use log::debug;

//=== Internal Dependencies ===============================================

use super::{EntityRef, PausableEntity};

//=== EntityRegistry ======================================================

/// Insertion-ordered collection of pausable entities.
#[derive(Debug, Default)]
pub struct EntityRegistry {
    entries: Vec<Weak<RefCell<PausableEntity>>>,
}

impl EntityRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Appends an entity. No uniqueness check is made.
    pub fn add(&mut self, entity: &EntityRef) {
        self.entries.push(Rc::downgrade(entity));
    }

    /// Removes the first entry referring to `entity`.
    ///
    /// Returns `false` if the entity was not registered.
    pub fn remove(&mut self, entity: &EntityRef) -> bool {
        let target = Rc::as_ptr(entity);
        match self.entries.iter().position(|e| ptr::eq(e.as_ptr(), target)) {
            Some(pos) => {
                self.entries.remove(pos);
                true
            }
            None => false,
        }
    }

    /// Returns true if at least one entry refers to `entity`.
    pub fn contains(&self, entity: &EntityRef) -> bool {
        let target = Rc::as_ptr(entity);
        self.entries.iter().any(|e| ptr::eq(e.as_ptr(), target))
    }

    /// Number of entries, duplicates and not-yet-pruned dead entries included.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drops entries whose entity no longer exists and returns the live
    /// ones in insertion order.
    pub(crate) fn live(&mut self) -> Vec<EntityRef> {
        let before = self.entries.len();
        self.entries.retain(|e| e.strong_count() > 0);

        let pruned = before - self.entries.len();
        if pruned > 0 {
            debug!("Pruned {} dropped entities from pause registry", pruned);
        }

        self.entries.iter().filter_map(Weak::upgrade).collect()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
