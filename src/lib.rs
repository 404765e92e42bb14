//=========================================================================
// Game Services: Library Root
//
// This crate coordinates the cross-cutting runtime services of a game:
// pausing simulated entities, routing audio, and persisting progress.
//
// Responsibilities:
// - Expose the runtime facade (`RuntimeBuilder`, `Runtime`)
// - Expose the coordinators for direct use (`core`)
// - Keep the physics, animation and audio runtimes behind capability
//   traits the host implements
//
// Typical usage:
// ```no_run
// use game_services::prelude::*;
//
// # struct Speaker;
// # impl AudioOutput for Speaker {
// #     type Clip = ();
// #     fn play_one_shot(&mut self, _: &(), _: f32) {}
// #     fn stop(&mut self) {}
// #     fn set_volume(&mut self, _: f32) {}
// # }
// let mut runtime = RuntimeBuilder::<Speaker>::new().build(ClipLibrary::new())?;
// let (sender, receiver) = runtime.channel();
// sender.send(HostEvent::Shutdown).unwrap();
// runtime.run(&receiver);
// # Ok::<(), game_services::core::ConfigError>(())
// ```
//
//=========================================================================

//--- Public Modules ------------------------------------------------------
//
// `core` contains the coordinators (pause, audio, persistence) and the
// service context that owns them. Most applications use it through the
// runtime facade and the prelude.
//
pub mod core;
pub mod prelude;

//--- Internal Modules ----------------------------------------------------
//
// `runtime` defines the builder, the frame loop and the host event type.
//
mod runtime;

//--- Public Exports ------------------------------------------------------

pub use runtime::{HostEvent, Runtime, RuntimeBuilder, TickControl};
