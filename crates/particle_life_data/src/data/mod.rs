//! Core data structures for the particle-life simulation.

pub mod boundary;
pub mod particle;
pub mod shape;
