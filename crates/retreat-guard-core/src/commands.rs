//! Commands sent to the host simulation by the player UI and the console.
//!
//! Commands are queued and processed at the next frame boundary.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::enums::*;
use crate::types::{ActionId, UnitId};

/// All host-level inputs.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum HostCommand {
    // --- Selection ---
    /// Select a unit in the combat UI.
    SelectUnit { unit: UnitId },
    /// Deselect whatever is selected.
    ClearSelection,
    /// Switch the combat UI interaction mode.
    SetUiMode { mode: UiMode },

    // --- Planning ---
    /// Paint (or repaint) the movement path of a unit's move action.
    /// Creates the move action at `start_time` if the unit has none.
    PaintPath {
        unit: UnitId,
        start_time: f32,
        waypoints: Vec<Vec3>,
    },
    /// Queue an action through the action menu.
    QueueAction {
        unit: UnitId,
        key: ActionKey,
        start_time: f32,
    },
    /// Remove a queued action from the timeline.
    CancelAction { action: ActionId },

    // --- Time ---
    /// Move the clock forward without waiting for execution frames.
    AdvanceTime { seconds: f32 },

    // --- Console ---
    /// Flip decision-trace logging.
    ToggleDiagnostics,
    /// Flip the host's action-creation logging.
    TogglePathActionLogging,
}
