//! Capabilities the decision logic needs from the host simulation.
//!
//! Each trait is a narrow seam so a test double only has to fake what it uses.
//! `Host` bundles them for the entry points that need everything.

use glam::Vec3;

use retreat_guard_core::enums::{ActionKey, UiMode};
use retreat_guard_core::types::{ActionId, ActionSummary, OfferedAction, Rect, UnitId};

/// Scenario data: which scenario is active and where its retreat zones are.
pub trait ScenarioGeometry {
    fn active_scenario_key(&self) -> &str;

    /// Retreat-zone rectangles of a scenario. Empty if it has none.
    fn zone_rectangles(&self, scenario_key: &str) -> &[Rect];
}

/// Combat UI selection.
pub trait SelectionState {
    fn selected_unit(&self) -> Option<UnitId>;
    fn ui_mode(&self) -> UiMode;
}

/// Path resolution.
pub trait PathSubsystem {
    /// Whether a path processor is available. Absence is a normal state.
    fn can_process_paths(&self) -> bool;

    /// Rebuild the trajectories of the unit's queued paths now.
    /// Returns false when no processor is available.
    fn process_path(&mut self, unit: UnitId) -> bool;

    /// Position along the unit's processed trajectory at `time`.
    /// `None` when the host does not know the unit.
    fn processed_position(&self, unit: UnitId, time: f32) -> Option<Vec3>;
}

/// The unit's action timeline.
pub trait ActionTimeline {
    /// Start time of the unit's most recently scheduled action.
    fn last_action_start_time(&self, unit: UnitId) -> f32;
}

/// Enumeration and the two mutations the arbiter is allowed to make.
pub trait ActionDirectory {
    /// Every action owned by the unit, including dead ones.
    fn actions_of(&self, unit: UnitId) -> Vec<ActionSummary>;

    /// `Changed -> Consumed` on the action's movement path.
    /// Returns whether a transition happened.
    fn consume_path_change(&mut self, action: ActionId) -> bool;

    /// Mark an action completed and disposed.
    fn retire_action(&mut self, action: ActionId);
}

/// Action instantiation.
pub trait ActionFactory {
    /// Create an action on the timeline. `None` if the host refused.
    fn create_action(
        &mut self,
        unit: UnitId,
        key: ActionKey,
        start_time: f32,
        refresh_scenario_state: bool,
    ) -> Option<ActionId>;
}

/// The action menu of the selected unit.
pub trait OfferedActions {
    /// Rebuild the menu for `unit` and return a snapshot of it.
    fn refresh_offered_actions(&mut self, unit: UnitId) -> Vec<OfferedAction>;
}

/// Everything the arbiter talks to.
pub trait Host:
    ScenarioGeometry
    + SelectionState
    + PathSubsystem
    + ActionTimeline
    + ActionDirectory
    + ActionFactory
    + OfferedActions
{
}

impl<T> Host for T where
    T: ScenarioGeometry
        + SelectionState
        + PathSubsystem
        + ActionTimeline
        + ActionDirectory
        + ActionFactory
        + OfferedActions
        + ?Sized
{
}
