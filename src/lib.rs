//! # Particle Life
//!
//! Headless driver and re-export facade over the particle-life engine.
//!
//! - [`model`] re-exports the engine crates under stable paths.
//! - [`app`] runs an engine for a number of ticks or until Ctrl-C, with
//!   optional real-time pacing, metrics and a final JSON snapshot.

pub mod app;
pub mod model;
