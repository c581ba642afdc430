//! Retreat-zone classification.
//!
//! Pure queries against scenario geometry and unit tags.

use glam::Vec2;

use retreat_guard_core::constants::IN_STATE_TAG_PREFIX;
use retreat_guard_core::settings::Settings;
use retreat_guard_core::types::CombatantInfo;

use crate::host::ScenarioGeometry;

/// Zone state key of the active scenario.
pub fn retreat_zone_state_key<'a, G>(settings: &'a Settings, geometry: &G) -> &'a str
where
    G: ScenarioGeometry + ?Sized,
{
    settings.retreat_zone_state_key(geometry.active_scenario_key())
}

/// The tag that scripts a unit into the active scenario's retreat zone.
pub fn forced_zone_tag<G>(settings: &Settings, geometry: &G) -> String
where
    G: ScenarioGeometry + ?Sized,
{
    format!(
        "{IN_STATE_TAG_PREFIX}{}",
        retreat_zone_state_key(settings, geometry)
    )
}

/// Whether the unit carries the forced zone tag for the active scenario.
pub fn has_forced_zone_tag<G>(settings: &Settings, geometry: &G, unit: &CombatantInfo) -> bool
where
    G: ScenarioGeometry + ?Sized,
{
    if unit.tags.is_none() {
        return false;
    }
    unit.has_tag(&forced_zone_tag(settings, geometry))
}

/// Whether a ground-plane point lies in any retreat rectangle of the active scenario.
pub fn is_inside_zone<G>(geometry: &G, point: Vec2) -> bool
where
    G: ScenarioGeometry + ?Sized,
{
    geometry
        .zone_rectangles(geometry.active_scenario_key())
        .iter()
        .any(|rect| rect.contains(point))
}
