//! Playback system: completes actions whose end time has passed.
//!
//! A completed path action commits the end of its trajectory as the unit's
//! position. A completed eject or retreat withdraws the unit.

use hecs::World;

use retreat_guard_core::components::*;
use retreat_guard_core::events::HostEvent;

use crate::world_setup;

pub fn run(world: &mut World, now: f32, events: &mut Vec<HostEvent>) {
    let mut finished: Vec<(hecs::Entity, PendingAction)> = world
        .query_mut::<&mut PendingAction>()
        .into_iter()
        .filter(|(_, action)| action.lifecycle.is_live() && action.end_time() <= now)
        .map(|(entity, action)| {
            action.lifecycle.completed = true;
            (entity, action.clone())
        })
        .collect();
    finished.sort_by(|(_, a), (_, b)| a.end_time().total_cmp(&b.end_time()).then(a.id.cmp(&b.id)));

    for (entity, action) in finished {
        let Some(unit) = world_setup::find_unit(world, action.owner) else {
            continue;
        };

        let end = world
            .get::<&MovementPath>(entity)
            .ok()
            .and_then(|path| path.processed.as_ref().and_then(|p| p.end_position()));
        if let Some(end) = end {
            if let Ok(mut position) = world.get::<&mut Position>(unit) {
                position.0 = end;
            }
        }

        if action.key.is_eject_or_retreat() {
            let _ = world.insert_one(unit, Withdrawn { via: action.key });
        }

        events.push(HostEvent::ActionCompleted {
            unit: action.owner,
            action: action.id,
        });
    }
}
