//! Plain data types shared by the particle-life engine, its driver and any
//! rendering front-end.

pub mod data;

pub use data::boundary::BoundaryMode;
pub use data::particle::{Particle, RunState, Vec2};
pub use data::shape::PlacementShape;
