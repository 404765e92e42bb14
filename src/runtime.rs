//=========================================================================
// Service Runtime
//
// Frame scheduler and entry point for the service layer.
//
// Architecture:
// ```text
//     RuntimeBuilder  ──build()──>  Runtime  ──run()──>  [Frame Loop]
//         │                           │
//         ├─ with_config()            ├─ HostEvent::Frame    → tick()
//         ├─ with_channel_capacity()  ├─ HostEvent::Request  → handle()
//         ├─ with_save_path()         └─ HostEvent::Shutdown → exit
//         └─ with_rng_seed()
// ```
//
// The runtime lives on the thread that owns the simulation. Hosts and UI
// threads talk to it only through the bounded event channel.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::path::PathBuf;

use crossbeam_channel::{bounded, Receiver, Sender};
use log::{debug, error, info};
use rand::rngs::StdRng;
use rand::SeedableRng;

//=== Internal Dependencies ===============================================

use crate::core::audio::{AudioOutput, ClipLibrary};
use crate::core::config::RuntimeConfig;
use crate::core::error::ConfigError;
use crate::core::globals::{ServiceContext, ServiceRequest};

//=== HostEvent ===========================================================

/// Message from the host runtime to the service runtime.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HostEvent {
    /// One simulation frame has elapsed.
    Frame,

    /// Apply a request to the service context.
    Request(ServiceRequest),

    /// Stop the frame loop.
    Shutdown,
}

//=== TickControl =========================================================
//
// Whether the frame loop keeps going after an event.
//
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickControl {
    Continue,
    Exit,
}

//=== RuntimeBuilder ======================================================

/// Builder for configuring and constructing a [`Runtime`].
///
/// # Default Values
///
/// - **Config**: [`RuntimeConfig::default`]
/// - **RNG**: seeded from the OS
///
/// # Examples
///
/// ```no_run
/// use game_services::prelude::*;
///
/// struct Speaker;
///
/// impl AudioOutput for Speaker {
///     type Clip = String;
///     fn play_one_shot(&mut self, _clip: &String, _volume: f32) {}
///     fn stop(&mut self) {}
///     fn set_volume(&mut self, _volume: f32) {}
/// }
///
/// let mut runtime = RuntimeBuilder::<Speaker>::new()
///     .with_save_path("saves/PlayerInfo.dat")
///     .build(ClipLibrary::new())?
///     .init(|ctx| {
///         ctx.audio.bind(Channel::Background, Speaker);
///         ctx.audio.bind(Channel::Effects, Speaker);
///         ctx.audio.bind(Channel::Ui, Speaker);
///     });
///
/// let (sender, receiver) = runtime.channel();
/// sender.send(HostEvent::Request(ServiceRequest::Load)).unwrap();
/// sender.send(HostEvent::Shutdown).unwrap();
/// runtime.run(&receiver);
/// # Ok::<(), game_services::core::ConfigError>(())
/// ```
pub struct RuntimeBuilder<O: AudioOutput> {
    config: RuntimeConfig,
    rng_seed: Option<u64>,
    _phantom: std::marker::PhantomData<O>,
}

impl<O: AudioOutput> RuntimeBuilder<O> {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self {
            config: RuntimeConfig::default(),
            rng_seed: None,
            _phantom: std::marker::PhantomData,
        }
    }

    /// Replaces the whole configuration.
    pub fn with_config(mut self, config: RuntimeConfig) -> Self {
        self.config = config;
        self
    }

    /// Sets the capacity of the host event channel.
    ///
    /// Default: 128
    ///
    /// # Panics
    ///
    /// Panics if `capacity == 0`.
    pub fn with_channel_capacity(mut self, capacity: usize) -> Self {
        assert!(capacity > 0, "Channel capacity must be positive");
        self.config.channel_capacity = capacity;
        self
    }

    /// Sets the path of the progress blob.
    pub fn with_save_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.save_path = path.into();
        self
    }

    /// Seeds track selection for reproducible runs.
    pub fn with_rng_seed(mut self, seed: u64) -> Self {
        self.rng_seed = Some(seed);
        self
    }

    /// Builds the runtime and its service context.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] if the accumulated configuration
    /// fails [`RuntimeConfig::validate`].
    pub fn build(self, clips: ClipLibrary<O::Clip>) -> Result<Runtime<O>, ConfigError> {
        self.config.validate()?;

        info!(
            "Building service runtime (channel: {}, save: {}, clips: {})",
            self.config.channel_capacity,
            self.config.save_path.display(),
            clips.len()
        );

        let rng = match self.rng_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        Ok(Runtime {
            context: ServiceContext::new(&self.config, clips, rng),
            channel_capacity: self.config.channel_capacity,
            frames: 0,
        })
    }
}

impl<O: AudioOutput> Default for RuntimeBuilder<O> {
    fn default() -> Self {
        Self::new()
    }
}

//=== Runtime =============================================================

/// Service runtime: owns the [`ServiceContext`] and drives it per frame.
pub struct Runtime<O: AudioOutput> {
    context: ServiceContext<O>,
    channel_capacity: usize,
    frames: u64,
}

impl<O: AudioOutput> Runtime<O> {
    //--- Initialization ---------------------------------------------------

    /// Gives mutable access to the context before the loop starts
    /// (binding outputs, registering entities).
    pub fn init<F>(mut self, init_fn: F) -> Self
    where
        F: FnOnce(&mut ServiceContext<O>),
    {
        info!("Initializing service context");
        init_fn(&mut self.context);
        self
    }

    //--- Access -----------------------------------------------------------

    pub fn context(&self) -> &ServiceContext<O> {
        &self.context
    }

    pub fn context_mut(&mut self) -> &mut ServiceContext<O> {
        &mut self.context
    }

    /// Number of frames ticked so far.
    pub fn frame_count(&self) -> u64 {
        self.frames
    }

    /// Creates a bounded host → runtime channel at the configured capacity.
    pub fn channel(&self) -> (Sender<HostEvent>, Receiver<HostEvent>) {
        bounded(self.channel_capacity)
    }

    //--- Frame Processing -------------------------------------------------

    /// Runs one frame: ticks every coordinator once.
    pub fn tick(&mut self) {
        self.frames += 1;
        self.context.tick();
    }

    /// Applies one host event.
    ///
    /// Request failures are logged and do not stop the runtime.
    pub fn handle_event(&mut self, event: HostEvent) -> TickControl {
        match event {
            HostEvent::Frame => self.tick(),
            HostEvent::Request(request) => {
                if let Err(e) = self.context.handle(request) {
                    error!("Request {:?} failed: {}", request, e);
                }
            }
            HostEvent::Shutdown => return TickControl::Exit,
        }
        TickControl::Continue
    }

    //--- Execution --------------------------------------------------------

    /// Processes host events on the calling thread until shutdown.
    ///
    /// Returns when a [`HostEvent::Shutdown`] arrives or every sender has
    /// been dropped.
    pub fn run(&mut self, receiver: &Receiver<HostEvent>) {
        info!("Service runtime running");

        loop {
            let Ok(event) = receiver.recv() else {
                debug!("Host channel disconnected");
                break;
            };

            if let TickControl::Exit = self.handle_event(event) {
                break;
            }
        }

        info!("Service runtime stopped after {} frames", self.frames);
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
