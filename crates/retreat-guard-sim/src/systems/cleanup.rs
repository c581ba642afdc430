//! Cleanup system: removes disposed and destroyed actions.

use hecs::{Entity, World};

use retreat_guard_core::components::PendingAction;

/// Uses a pre-allocated buffer to avoid per-frame allocation.
pub fn run(world: &mut World, despawn_buffer: &mut Vec<Entity>) {
    despawn_buffer.clear();

    for (entity, action) in world.query_mut::<&PendingAction>() {
        if action.lifecycle.disposed || action.lifecycle.destroyed {
            despawn_buffer.push(entity);
        }
    }

    for entity in despawn_buffer.drain(..) {
        let _ = world.despawn(entity);
    }
}
