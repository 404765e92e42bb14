//=========================================================================
// Core Services
//
// The coordinators behind the runtime facade, one module per concern.
//
// Responsibilities:
// - Freeze and resume registered entities on pause (`pause`)
// - Route sounds onto gated channels and pick background music (`audio`)
// - Save and restore player progress (`persistence`)
// - Hold the single instance of each coordinator (`globals`)
// - Startup configuration and error types (`config`, `error`)
//
// Notes:
// Everything here runs on the thread that owns the simulation. Other
// threads reach it only through `HostEvent`s sent to the runtime.
//
//=========================================================================

//=== Module Declarations =================================================

pub mod audio;
pub mod config;
pub mod error;
pub mod globals;
pub mod pause;
pub mod persistence;

//=== Public API ==========================================================

pub use audio::{AudioOutput, AudioRouter, Channel, ClipLibrary, SoundId, TrackPool, TrackSelector};
pub use config::RuntimeConfig;
pub use error::{AudioError, ConfigError, PersistenceError, ServiceError, TrackError};
pub use globals::{ServiceContext, ServiceRequest};
pub use pause::{AnimationState, EntityRef, MotionState, PausableEntity, PauseCoordinator};
pub use persistence::{PersistenceStore, PlayerProgress};
