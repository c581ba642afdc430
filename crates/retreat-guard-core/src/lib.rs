//! Core types and definitions for retreat-guard.
//!
//! This crate defines the vocabulary shared across all other crates:
//! components, commands, settings, snapshots, events, and constants.
//! It has no dependency on the ECS or on the decision logic.

pub mod commands;
pub mod components;
pub mod constants;
pub mod enums;
pub mod events;
pub mod settings;
pub mod state;
pub mod types;
