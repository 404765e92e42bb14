//=========================================================================
// Service Errors
//=========================================================================
//
// Failure taxonomy for the service layer.
//
//   AudioError        requested sound absent from the clip library
//   TrackError        track pool cannot guarantee a non-repeating pick
//   PersistenceError  save blob unreadable or unwritable, record in use
//   ConfigError       configuration file unreadable or out of range
//
// Missing capabilities (unbound outputs, entities without motion or
// animation) are not errors. They are skipped where they are found.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::io;
use std::path::PathBuf;

use thiserror::Error;

//=== Internal Dependencies ===============================================

use crate::core::audio::{Channel, SoundId};

//=== AudioError ==========================================================

/// Errors raised while routing a sound to a channel.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AudioError {
    /// The sound id has no clip in the library.
    #[error("sound {sound:?} requested on {channel:?} channel is not in the clip library")]
    UnknownSound { channel: Channel, sound: SoundId },
}

//=== TrackError ==========================================================

/// Errors raised while building a track pool.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TrackError {
    /// Rejection sampling needs at least two candidates to terminate.
    #[error("track pool {start}..{end} holds fewer than two tracks")]
    PoolTooSmall { start: u32, end: u32 },
}

//=== PersistenceError ====================================================

/// Errors raised while writing or reading the progress blob.
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to serialize player progress: {0}")]
    Serialization(String),

    #[error("save file {path} is unreadable: {reason}")]
    Deserialization { path: PathBuf, reason: String },

    #[error("save file format version {found} is not supported (expected {expected})")]
    UnsupportedVersion { found: u32, expected: u32 },

    /// Another holder has the live progress record borrowed.
    #[error("player progress is in use and cannot be {0}")]
    ProgressBusy(&'static str),
}

//=== ConfigError =========================================================

/// Errors raised while loading a [`crate::core::config::RuntimeConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

//=== ServiceError ========================================================

/// Any failure surfaced by a request handled through the runtime.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Audio(#[from] AudioError),

    #[error(transparent)]
    Persistence(#[from] PersistenceError),
}
