//! ECS systems run by the combat engine each frame.
//!
//! Systems take `&mut World` (or `&World` for read-only) and own no state.
//! `execution` is the exception: on-creation functions talk to the whole host.

pub mod cleanup;
pub mod execution;
pub mod path_linker;
pub mod playback;
pub mod snapshot;
