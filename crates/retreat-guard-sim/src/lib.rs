//! Headless host simulation for retreat-guard.
//!
//! Owns the hecs ECS world, runs the frame pipeline, and plays the host side
//! of every collaborator trait so the arbiter can be driven end to end.

pub mod catalog;
pub mod engine;
pub mod scenario;
pub mod systems;
pub mod world_setup;

pub use engine::CombatEngine;
pub use retreat_guard_core as core;
