//! Snapshot system: queries the ECS world and builds a complete CombatSnapshot.
//!
//! This system is read-only. It never modifies the world.

use hecs::World;

use retreat_guard_core::components::*;
use retreat_guard_core::enums::UiMode;
use retreat_guard_core::events::HostEvent;
use retreat_guard_core::state::*;
use retreat_guard_core::types::{OfferedAction, SimTime, UnitId};

pub fn build_snapshot(
    world: &World,
    time: &SimTime,
    scenario_key: &str,
    selected_unit: Option<UnitId>,
    ui_mode: UiMode,
    offered_actions: &[OfferedAction],
    events: Vec<HostEvent>,
) -> CombatSnapshot {
    CombatSnapshot {
        time: *time,
        scenario_key: scenario_key.to_string(),
        selected_unit,
        ui_mode,
        offered_actions: offered_actions.to_vec(),
        units: build_units(world),
        actions: build_actions(world),
        events,
    }
}

/// Units sorted by id.
fn build_units(world: &World) -> Vec<UnitView> {
    let mut units: Vec<UnitView> = world
        .query::<(
            &Combatant,
            &Position,
            Option<&PlayerControllable>,
            Option<&ScenarioTags>,
            Option<&Withdrawn>,
        )>()
        .iter()
        .map(|(_, (combatant, position, controllable, tags, withdrawn))| UnitView {
            id: combatant.id,
            position: position.0,
            player_controllable: controllable.is_some(),
            tags: tags
                .map(|tags| tags.tags.iter().cloned().collect())
                .unwrap_or_default(),
            withdrawn: withdrawn.map(|w| w.via),
        })
        .collect();
    units.sort_by_key(|unit| unit.id);
    units
}

/// Actions sorted by start time, then id.
fn build_actions(world: &World) -> Vec<ActionView> {
    let mut actions: Vec<ActionView> = world
        .query::<(&PendingAction, Option<&MovementPath>)>()
        .iter()
        .map(|(_, (action, path))| ActionView {
            id: action.id,
            owner: action.owner,
            key: action.key,
            start_time: action.start_time,
            duration: action.duration,
            completed: action.lifecycle.completed,
            disposed: action.lifecycle.disposed,
            destroyed: action.lifecycle.destroyed,
            path: path.map(|path| path.revision),
        })
        .collect();
    actions.sort_by(|a, b| a.start_time.total_cmp(&b.start_time).then(a.id.cmp(&b.id)));
    actions
}
