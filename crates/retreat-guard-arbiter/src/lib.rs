//! Eject/retreat arbitration for retreat-guard.
//!
//! Decides whether a unit will be inside a retreat zone when its queued
//! action resolves, validates eject and retreat against that, and swaps a
//! queued action of the wrong kind for its legal counterpart.
//! No ECS dependency. The host is reached only through the traits in `host`.

pub mod host;
pub mod position;
pub mod substitution;
pub mod validation;
pub mod zone;

pub use retreat_guard_core as core;

#[cfg(test)]
mod tests;
