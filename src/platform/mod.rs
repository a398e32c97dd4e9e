//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Time (monotonic milliseconds)
//! - Randomness (uniform unit samples)
//! - Web bindings (wasm32 only)
//!
//! The simulation only ever sees the [`Clock`] and [`RandomSource`] traits, so
//! tests can drive it with [`ManualClock`] and [`ScriptedRandom`].

pub mod random;
pub mod time;
#[cfg(target_arch = "wasm32")]
pub mod web;

pub use random::{PcgRandom, RandomSource, ScriptedRandom};
pub use time::{Clock, ManualClock, SystemClock};
