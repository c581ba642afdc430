//! Execution system: runs on-creation execution functions of new actions.
//!
//! Actions created during the frame carry `AwaitingExecution`. Each pass takes
//! the marker off every such action and runs its definition's functions. An
//! action created by one of those functions is picked up by the next pass,
//! after the function that created it has returned.

use hecs::Entity;

use retreat_guard_arbiter::substitution::ActionExecution;
use retreat_guard_core::components::{AwaitingExecution, PendingAction};
use retreat_guard_core::events::HostEvent;
use retreat_guard_core::types::{ActionId, UnitId};

use crate::engine::CombatEngine;
use crate::world_setup;

/// A substitution creates at most one action, which is then already correct.
const MAX_PASSES: usize = 4;

pub fn run(engine: &mut CombatEngine) {
    for _ in 0..MAX_PASSES {
        let mut awaiting: Vec<(Entity, ActionId, UnitId)> = engine
            .world
            .query_mut::<(&PendingAction, &AwaitingExecution)>()
            .into_iter()
            .map(|(entity, (action, _))| (entity, action.id, action.owner))
            .collect();
        if awaiting.is_empty() {
            return;
        }
        awaiting.sort_by_key(|(_, id, _)| *id);

        for (entity, id, owner) in awaiting {
            let _ = engine.world.remove_one::<AwaitingExecution>(entity);
            execute(engine, id, owner);
        }
    }

    tracing::warn!(target: "retreat_guard::host", passes = MAX_PASSES, "execution.pass_limit");
}

fn execute(engine: &mut CombatEngine, id: ActionId, owner: UnitId) {
    let Some(summary) = engine.action_summary(id) else {
        return;
    };
    let functions = engine
        .catalog
        .get(summary.key)
        .map(|definition| definition.on_creation.clone())
        .unwrap_or_default();

    for function in functions {
        // Re-read both views: an earlier function may have changed them.
        let Some(unit) = world_setup::combatant_info(&engine.world, owner) else {
            return;
        };
        let Some(action) = engine.action_summary(id) else {
            return;
        };
        let settings = engine.settings.clone();
        let outcome = function.run(&settings, &mut *engine, &unit, &action);
        engine.events.push(HostEvent::SubstitutionEvaluated {
            unit: owner,
            action: id,
            outcome,
        });
    }
}
