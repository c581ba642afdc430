//! Entity spawn factories and lookups for the combat world.
//!
//! Units carry `Combatant` + `Position`, plus `PlayerControllable` and
//! `ScenarioTags` when applicable. Actions are separate entities carrying
//! `PendingAction`, and `MovementPath` once a path is painted.

use hecs::{Entity, World};

use retreat_guard_core::components::*;
use retreat_guard_core::types::{ActionId, CombatantInfo, UnitId};

use crate::scenario::UnitSpawn;

/// Spawn a unit from its scenario description.
pub fn spawn_unit(world: &mut World, spawn: &UnitSpawn) -> Entity {
    let entity = world.spawn((Combatant { id: spawn.id }, Position(spawn.position)));
    if spawn.player_controllable {
        let _ = world.insert_one(entity, PlayerControllable);
    }
    if let Some(tags) = &spawn.tags {
        let _ = world.insert_one(entity, ScenarioTags { tags: tags.clone() });
    }
    entity
}

/// Spawn a freshly created action. Its on-creation functions run later in the frame.
pub fn spawn_action(world: &mut World, action: PendingAction) -> Entity {
    world.spawn((action, AwaitingExecution))
}

pub fn find_unit(world: &World, unit: UnitId) -> Option<Entity> {
    world
        .query::<&Combatant>()
        .iter()
        .find(|(_, combatant)| combatant.id == unit)
        .map(|(entity, _)| entity)
}

pub fn find_action(world: &World, action: ActionId) -> Option<Entity> {
    world
        .query::<&PendingAction>()
        .iter()
        .find(|(_, pending)| pending.id == action)
        .map(|(entity, _)| entity)
}

/// Read-only view of a unit for the arbiter.
pub fn combatant_info(world: &World, unit: UnitId) -> Option<CombatantInfo> {
    let entity = find_unit(world, unit)?;
    let position = world.get::<&Position>(entity).ok()?.0;
    let player_controllable = world.get::<&PlayerControllable>(entity).is_ok();
    let tags = world
        .get::<&ScenarioTags>(entity)
        .ok()
        .map(|tags| tags.tags.clone());
    Some(CombatantInfo {
        id: unit,
        position,
        player_controllable,
        tags,
    })
}

pub fn is_withdrawn(world: &World, unit: UnitId) -> bool {
    find_unit(world, unit).is_some_and(|entity| world.get::<&Withdrawn>(entity).is_ok())
}
