//! Fundamental identifiers, geometry, and plain-data views.

use std::collections::BTreeSet;
use std::fmt;

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

use crate::enums::{ActionKey, PathRevision};

/// Stable identity of a combat unit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UnitId(pub u32);

/// Stable identity of a queued action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ActionId(pub u32);

impl fmt::Display for UnitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "U{}", self.0)
    }
}

impl fmt::Display for ActionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "A{}", self.0)
    }
}

/// Axis-aligned rectangle on the ground plane.
///
/// `left`/`right` bound the world x axis, `bottom`/`top` bound the world z axis.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub left: f32,
    pub bottom: f32,
    pub right: f32,
    pub top: f32,
}

impl Rect {
    pub fn new(left: f32, bottom: f32, right: f32, top: f32) -> Self {
        Self {
            left,
            bottom,
            right,
            top,
        }
    }

    /// Inclusive containment test. Edges count as inside.
    pub fn contains(&self, point: Vec2) -> bool {
        let (min_x, max_x) = min_max(self.left, self.right);
        let (min_y, max_y) = min_max(self.bottom, self.top);
        point.x >= min_x && point.x <= max_x && point.y >= min_y && point.y <= max_y
    }
}

fn min_max(a: f32, b: f32) -> (f32, f32) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

/// Project a world position onto the ground plane used by retreat zones.
/// y is up, so the plane is spanned by x and z.
pub fn ground_point(position: Vec3) -> Vec2 {
    Vec2::new(position.x, position.z)
}

/// Simulation time tracking.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SimTime {
    /// Frame counter (increments by 1 each tick).
    pub frame: u64,
    /// Elapsed simulation time in seconds.
    pub elapsed_secs: f32,
}

impl SimTime {
    /// Seconds per frame at the fixed tick rate.
    pub fn dt(&self) -> f32 {
        crate::constants::DT
    }

    /// Advance by one frame.
    pub fn advance(&mut self) {
        self.frame += 1;
        self.elapsed_secs += self.dt();
    }
}

/// Read-only view of a combat unit, as handed to the decision logic.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CombatantInfo {
    pub id: UnitId,
    /// Last confirmed position (not the end of a queued path).
    pub position: Vec3,
    pub player_controllable: bool,
    /// Scenario tags, if the unit carries any.
    pub tags: Option<BTreeSet<String>>,
}

impl CombatantInfo {
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.as_ref().is_some_and(|tags| tags.contains(tag))
    }
}

/// Read-only view of one queued action owned by a unit.
#[derive(Debug, Clone, PartialEq)]
pub struct ActionSummary {
    pub id: ActionId,
    pub key: ActionKey,
    pub start_time: f32,
    pub duration: f32,
    pub completed: bool,
    pub disposed: bool,
    pub destroyed: bool,
    /// Revision state of the attached movement path, `None` if the action has no path.
    pub path: Option<PathRevision>,
}

impl ActionSummary {
    /// Neither destroyed, disposed, nor completed.
    pub fn is_live(&self) -> bool {
        !self.destroyed && !self.disposed && !self.completed
    }

    pub fn has_path(&self) -> bool {
        self.path.is_some()
    }

    pub fn path_changed(&self) -> bool {
        self.path == Some(PathRevision::Changed)
    }
}

/// An entry in the offered-actions registry for the selected unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OfferedAction {
    pub key: ActionKey,
    pub available: bool,
}
