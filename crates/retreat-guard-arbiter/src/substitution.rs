//! Eject/retreat substitution.
//!
//! Runs when an eject or retreat action is created. If the queued key does
//! not match where the unit will be, the legal counterpart is created at the
//! same start time and the original is retired. If the unit already has a
//! live action with the legal key, the original is only retired, so a unit
//! never ends up with two live exits. Every unmet precondition is a no-op:
//! the player keeps the action they queued.

use retreat_guard_core::enums::{ActionKey, ExecutionKind, SubstitutionOutcome};
use retreat_guard_core::settings::Settings;
use retreat_guard_core::types::{ActionId, ActionSummary, CombatantInfo};

use crate::host::{ActionDirectory, Host, OfferedActions};
use crate::validation::is_in_retreat_zone;

/// An execution function run on action creation.
pub trait ActionExecution {
    fn run<H>(
        &self,
        settings: &Settings,
        host: &mut H,
        unit: &CombatantInfo,
        action: &ActionSummary,
    ) -> SubstitutionOutcome
    where
        H: Host + ?Sized;
}

/// Swap a queued eject for retreat inside a zone, and retreat for eject outside.
#[derive(Debug, Clone, Copy, Default)]
pub struct EjectOrRetreat;

impl ActionExecution for EjectOrRetreat {
    fn run<H>(
        &self,
        settings: &Settings,
        host: &mut H,
        unit: &CombatantInfo,
        action: &ActionSummary,
    ) -> SubstitutionOutcome
    where
        H: Host + ?Sized,
    {
        let outcome = run_substitution(settings, host, unit, action);
        if settings.log_diagnostics {
            tracing::debug!(
                target: "retreat_guard::substitution",
                unit = %unit.id,
                action = %action.id,
                key = %action.key,
                start_time = action.start_time,
                outcome = ?outcome,
                "substitution"
            );
        }
        outcome
    }
}

impl ActionExecution for ExecutionKind {
    fn run<H>(
        &self,
        settings: &Settings,
        host: &mut H,
        unit: &CombatantInfo,
        action: &ActionSummary,
    ) -> SubstitutionOutcome
    where
        H: Host + ?Sized,
    {
        match self {
            ExecutionKind::EjectOrRetreat => EjectOrRetreat.run(settings, host, unit, action),
        }
    }
}

/// One substitution pass for `action`, owned by `unit`.
pub fn run_substitution<H>(
    settings: &Settings,
    host: &mut H,
    unit: &CombatantInfo,
    action: &ActionSummary,
) -> SubstitutionOutcome
where
    H: Host + ?Sized,
{
    if !settings.use_action_swap {
        return SubstitutionOutcome::SwapDisabled;
    }
    if host.selected_unit() != Some(unit.id) {
        return SubstitutionOutcome::NotSelected;
    }
    if !unit.player_controllable {
        return SubstitutionOutcome::NotPlayerControlled;
    }
    if !action.key.is_eject_or_retreat() {
        return SubstitutionOutcome::NotEjectOrRetreat;
    }
    if !action.is_live() {
        return SubstitutionOutcome::ActionNotLive;
    }

    let in_retreat = is_in_retreat_zone(settings, host, unit);
    if action.key.matches_zone(in_retreat) {
        return SubstitutionOutcome::AlreadyCorrect;
    }

    let key = ActionKey::exit_for_zone(in_retreat);
    if let Some(existing) = live_action_with_key(&*host, unit, key, action) {
        host.retire_action(action.id);
        return SubstitutionOutcome::RetiredAsDuplicate { key, existing };
    }
    if !is_action_available(host, unit, key) {
        return SubstitutionOutcome::ReplacementUnavailable { key };
    }

    let Some(replacement) = host.create_action(unit.id, key, action.start_time, false) else {
        return SubstitutionOutcome::CreationFailed { key };
    };
    host.retire_action(action.id);

    SubstitutionOutcome::Substituted { key, replacement }
}

/// A live action of `unit` keyed `key`, other than `action`.
fn live_action_with_key<H>(
    host: &H,
    unit: &CombatantInfo,
    key: ActionKey,
    action: &ActionSummary,
) -> Option<ActionId>
where
    H: ActionDirectory + ?Sized,
{
    host.actions_of(unit.id)
        .into_iter()
        .find(|other| other.id != action.id && other.key == key && other.is_live())
        .map(|other| other.id)
}

/// Whether `key` is offered and available in a freshly refreshed menu.
fn is_action_available<H>(host: &mut H, unit: &CombatantInfo, key: ActionKey) -> bool
where
    H: OfferedActions + ?Sized,
{
    host.refresh_offered_actions(unit.id)
        .iter()
        .find(|offered| offered.key == key)
        .is_some_and(|offered| offered.available)
}
