//! Combat state snapshot: the visible host state after each frame.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::enums::*;
use crate::events::HostEvent;
use crate::types::{ActionId, OfferedAction, SimTime, UnitId};

/// Complete host state after one frame.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CombatSnapshot {
    pub time: SimTime,
    pub scenario_key: String,
    pub selected_unit: Option<UnitId>,
    pub ui_mode: UiMode,
    /// Menu of the selected unit as last refreshed.
    pub offered_actions: Vec<OfferedAction>,
    pub units: Vec<UnitView>,
    pub actions: Vec<ActionView>,
    pub events: Vec<HostEvent>,
}

impl CombatSnapshot {
    /// Live actions owned by `unit`, in start-time order.
    pub fn live_actions_of(&self, unit: UnitId) -> impl Iterator<Item = &ActionView> {
        self.actions
            .iter()
            .filter(move |a| a.owner == unit && a.is_live())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnitView {
    pub id: UnitId,
    pub position: Vec3,
    pub player_controllable: bool,
    pub tags: Vec<String>,
    /// Set once the unit has ejected or retreated.
    pub withdrawn: Option<ActionKey>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionView {
    pub id: ActionId,
    pub owner: UnitId,
    pub key: ActionKey,
    pub start_time: f32,
    pub duration: f32,
    pub completed: bool,
    pub disposed: bool,
    pub destroyed: bool,
    pub path: Option<PathRevision>,
}

impl ActionView {
    pub fn is_live(&self) -> bool {
        !self.completed && !self.disposed && !self.destroyed
    }
}
