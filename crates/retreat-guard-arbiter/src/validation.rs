//! Zone validators for eject and retreat.
//!
//! Only the selected, player-controlled unit in unit-selection mode is
//! constrained. Every other unit passes, so AI turns are never blocked.

use retreat_guard_core::enums::{UiMode, ValidationKind, ZoneRequirement};
use retreat_guard_core::settings::Settings;
use retreat_guard_core::types::{ground_point, CombatantInfo};

use crate::host::{Host, SelectionState};
use crate::position::resolve_position;
use crate::zone::{has_forced_zone_tag, is_inside_zone};

/// A validation function attached to an action definition.
pub trait ActionValidation {
    fn is_valid<H>(&self, settings: &Settings, host: &mut H, unit: &CombatantInfo) -> bool
    where
        H: Host + ?Sized;
}

/// Legal only inside a retreat zone.
#[derive(Debug, Clone, Copy, Default)]
pub struct InRetreatZone;

/// Legal only outside every retreat zone.
#[derive(Debug, Clone, Copy, Default)]
pub struct NotInRetreatZone;

impl ActionValidation for InRetreatZone {
    fn is_valid<H>(&self, settings: &Settings, host: &mut H, unit: &CombatantInfo) -> bool
    where
        H: Host + ?Sized,
    {
        check_requirement(ZoneRequirement::Inside, settings, host, unit)
    }
}

impl ActionValidation for NotInRetreatZone {
    fn is_valid<H>(&self, settings: &Settings, host: &mut H, unit: &CombatantInfo) -> bool
    where
        H: Host + ?Sized,
    {
        check_requirement(ZoneRequirement::Outside, settings, host, unit)
    }
}

impl ActionValidation for ValidationKind {
    fn is_valid<H>(&self, settings: &Settings, host: &mut H, unit: &CombatantInfo) -> bool
    where
        H: Host + ?Sized,
    {
        match self {
            ValidationKind::InRetreatZone => InRetreatZone.is_valid(settings, host, unit),
            ValidationKind::NotInRetreatZone => NotInRetreatZone.is_valid(settings, host, unit),
        }
    }
}

fn check_requirement<H>(
    requirement: ZoneRequirement,
    settings: &Settings,
    host: &mut H,
    unit: &CombatantInfo,
) -> bool
where
    H: Host + ?Sized,
{
    if !is_selected_and_player_controlled(&*host, unit) {
        return true;
    }
    let in_zone = is_in_retreat_zone(settings, host, unit);
    match requirement {
        ZoneRequirement::Inside => in_zone,
        ZoneRequirement::Outside => !in_zone,
    }
}

/// The unit is selected, player controllable, and the UI is in unit-selection mode.
pub fn is_selected_and_player_controlled<S>(selection: &S, unit: &CombatantInfo) -> bool
where
    S: SelectionState + ?Sized,
{
    selection.selected_unit() == Some(unit.id)
        && unit.player_controllable
        && selection.ui_mode() == UiMode::UnitSelection
}

/// Whether the unit will be inside a retreat zone when its last action starts.
///
/// A forced zone tag wins over geometry.
pub fn is_in_retreat_zone<H>(settings: &Settings, host: &mut H, unit: &CombatantInfo) -> bool
where
    H: Host + ?Sized,
{
    if settings.log_diagnostics {
        let tags = unit
            .tags
            .as_ref()
            .map(|tags| tags.iter().cloned().collect::<Vec<_>>().join(", "))
            .unwrap_or_else(|| "null".to_string());
        tracing::debug!(
            target: "retreat_guard::zone",
            unit = %unit.id,
            ui_mode = ?host.ui_mode(),
            tags = %tags,
            "zone.check"
        );
    }

    if has_forced_zone_tag(settings, &*host, unit) {
        if settings.log_diagnostics {
            tracing::debug!(target: "retreat_guard::zone", unit = %unit.id, "zone.forced_tag");
        }
        return true;
    }

    let resolved = resolve_position(settings, host, unit);
    let position = resolved.effective_position();
    let in_zone = is_inside_zone(&*host, ground_point(position));

    if settings.log_diagnostics {
        let scenario = host.active_scenario_key();
        tracing::debug!(
            target: "retreat_guard::zone",
            unit = %unit.id,
            scenario = %scenario,
            zones = ?host.zone_rectangles(scenario),
            trust = ?resolved.trust,
            moved = resolved.effectively_moved(),
            position = ?position,
            in_zone,
            "zone.result"
        );
    }

    in_zone
}
