//! ECS components for hecs entities.
//!
//! Components are plain data. The one exception is `MovementPath`, whose
//! revision transition is spelled out as a method so it cannot be skipped.

use std::collections::BTreeSet;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::enums::*;
use crate::types::{ActionId, UnitId};

/// A combat unit.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Combatant {
    pub id: UnitId,
}

/// Last confirmed world position of a unit (y is up).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position(pub Vec3);

/// Marks a unit the player may issue actions to.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PlayerControllable;

/// Tags assigned to a unit by scenario scripting.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScenarioTags {
    pub tags: BTreeSet<String>,
}

/// A unit that has left the battlefield through an eject or retreat.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Withdrawn {
    pub via: ActionKey,
}

/// A queued action on the timeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PendingAction {
    pub id: ActionId,
    pub owner: UnitId,
    pub key: ActionKey,
    pub start_time: f32,
    pub duration: f32,
    pub lifecycle: ActionLifecycle,
}

impl PendingAction {
    pub fn end_time(&self) -> f32 {
        self.start_time + self.duration
    }
}

/// Independent lifecycle markers of a pending action.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionLifecycle {
    pub completed: bool,
    pub disposed: bool,
    pub destroyed: bool,
}

impl ActionLifecycle {
    pub fn is_live(&self) -> bool {
        !self.destroyed && !self.disposed && !self.completed
    }

    /// Superseded by another action: completed and disposed together.
    pub fn retire(&mut self) {
        self.completed = true;
        self.disposed = true;
    }
}

/// Marks an action whose on-creation execution functions have not run yet.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct AwaitingExecution;

/// Painted movement attached to an action.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MovementPath {
    /// Raw waypoints as painted. The trajectory origin is not included.
    pub waypoints: Vec<Vec3>,
    pub revision: PathRevision,
    /// Time-indexed trajectory derived from the waypoints.
    /// Stale while `revision` is `Changed` and the path linker has not run.
    pub processed: Option<ProcessedPath>,
}

impl MovementPath {
    pub fn painted(waypoints: Vec<Vec3>) -> Self {
        Self {
            waypoints,
            revision: PathRevision::Changed,
            processed: None,
        }
    }

    pub fn is_changed(&self) -> bool {
        self.revision == PathRevision::Changed
    }

    /// `Changed -> Consumed`. Returns whether a transition happened.
    pub fn consume_change(&mut self) -> bool {
        if self.revision == PathRevision::Changed {
            self.revision = PathRevision::Consumed;
            true
        } else {
            false
        }
    }

    /// Replace the waypoints; the processed trajectory is kept but is now stale.
    pub fn repaint(&mut self, waypoints: Vec<Vec3>) {
        self.waypoints = waypoints;
        self.revision = PathRevision::Changed;
    }
}

/// A processed, time-indexed trajectory.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProcessedPath {
    /// Samples in ascending time order.
    pub samples: Vec<PathSample>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PathSample {
    pub time: f32,
    pub position: Vec3,
}

impl ProcessedPath {
    /// Position at `time`, clamped to the first and last sample.
    pub fn position_at(&self, time: f32) -> Option<Vec3> {
        let first = self.samples.first()?;
        if time <= first.time {
            return Some(first.position);
        }
        for pair in self.samples.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            if time <= b.time {
                let span = b.time - a.time;
                if span <= f32::EPSILON {
                    return Some(b.position);
                }
                let t = (time - a.time) / span;
                return Some(a.position.lerp(b.position, t));
            }
        }
        self.samples.last().map(|s| s.position)
    }

    pub fn end_position(&self) -> Option<Vec3> {
        self.samples.last().map(|s| s.position)
    }
}
