//=========================================================================
// Prelude
//=========================================================================
//
// Convenience module that re-exports commonly used types and traits.
//
// Usage:
//   use game_services::prelude::*;
//
//=========================================================================

//=== Public API ==========================================================

// Runtime facade
pub use crate::runtime::{HostEvent, Runtime, RuntimeBuilder};

// Service context
pub use crate::core::config::RuntimeConfig;
pub use crate::core::globals::{ServiceContext, ServiceRequest};

// Pause
pub use crate::core::pause::{
    AnimationState, EntityRef, MotionState, PausableEntity, PauseCoordinator,
};

// Audio
pub use crate::core::audio::{
    AudioOutput, AudioRouter, Channel, ClipLibrary, SoundId, TrackSelector,
};

// Persistence
pub use crate::core::persistence::{PersistenceStore, PlayerProgress};
