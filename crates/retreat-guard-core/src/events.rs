//! Events emitted by the host simulation for UI feedback and replay output.

use serde::{Deserialize, Serialize};

use crate::enums::*;
use crate::types::{ActionId, UnitId};

/// Host events, drained into each snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum HostEvent {
    /// An action was created on the timeline.
    ActionCreated {
        unit: UnitId,
        action: ActionId,
        key: ActionKey,
        start_time: f32,
    },
    /// The substitution ran on a queued eject/retreat action.
    SubstitutionEvaluated {
        unit: UnitId,
        action: ActionId,
        outcome: SubstitutionOutcome,
    },
    /// A painted path was turned into a trajectory.
    PathProcessed { unit: UnitId, action: ActionId },
    /// An action finished playback.
    ActionCompleted { unit: UnitId, action: ActionId },
    /// Text for the console.
    ConsoleOutput { message: String },
}
