//! Enumeration types used throughout the patch and the host simulation.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::types::ActionId;

/// Semantic key of a queued action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKey {
    /// Painted movement along a path.
    Move,
    /// Short burst movement.
    Dash,
    /// Hold position.
    Wait,
    /// Pilot leaves the unit. Only legal outside a retreat zone.
    Eject,
    /// Unit leaves the battlefield. Only legal inside a retreat zone.
    Retreat,
}

impl ActionKey {
    pub fn as_str(self) -> &'static str {
        match self {
            ActionKey::Move => "move",
            ActionKey::Dash => "dash",
            ActionKey::Wait => "wait",
            ActionKey::Eject => "eject",
            ActionKey::Retreat => "retreat",
        }
    }

    pub fn is_eject_or_retreat(self) -> bool {
        matches!(self, ActionKey::Eject | ActionKey::Retreat)
    }

    /// The key that is legal for the given zone membership.
    pub fn exit_for_zone(in_retreat_zone: bool) -> ActionKey {
        if in_retreat_zone {
            ActionKey::Retreat
        } else {
            ActionKey::Eject
        }
    }

    /// Whether this key already agrees with the zone membership.
    /// Always false for keys other than eject and retreat.
    pub fn matches_zone(self, in_retreat_zone: bool) -> bool {
        match self {
            ActionKey::Retreat => in_retreat_zone,
            ActionKey::Eject => !in_retreat_zone,
            _ => false,
        }
    }
}

impl fmt::Display for ActionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Combat UI interaction mode of the host.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum UiMode {
    /// A unit is selected and its action menu is live.
    #[default]
    UnitSelection,
    /// A movement path is being painted.
    PathPainting,
    /// An action is being dragged on the timeline.
    TimelinePlacement,
    /// Turn is executing; no planning input.
    Execution,
}

/// Zone membership a validator requires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ZoneRequirement {
    Inside,
    Outside,
}

/// Revision state of a movement path.
///
/// Editing a path sets `Changed`. Resolving it moves it to `Consumed` exactly once.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PathRevision {
    #[default]
    Changed,
    Consumed,
}

/// Whether a unit's queued movement can be used for position lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PathTrust {
    /// No live action carries a path; the stored position is authoritative.
    Absent,
    /// A path changed and nothing can reprocess it right now.
    StaleUnprocessable,
    /// The path is processed, or can be reprocessed before lookup.
    Resolved,
}

/// Validation functions the host can attach to an action definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ValidationKind {
    InRetreatZone,
    NotInRetreatZone,
}

/// Execution functions run when an action is created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExecutionKind {
    EjectOrRetreat,
}

/// Result of one pass of the eject/retreat substitution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum SubstitutionOutcome {
    /// `use_action_swap` is off.
    SwapDisabled,
    /// No unit is selected, or a different one is.
    NotSelected,
    /// The owner is not player controllable.
    NotPlayerControlled,
    /// The action key is neither eject nor retreat.
    NotEjectOrRetreat,
    /// The action is already completed, disposed, or destroyed.
    ActionNotLive,
    /// The queued key already agrees with the zone membership.
    AlreadyCorrect,
    /// The corrected key is not offered or not available.
    ReplacementUnavailable { key: ActionKey },
    /// The host refused to create the corrected action.
    CreationFailed { key: ActionKey },
    /// The original was retired and replaced.
    Substituted { key: ActionKey, replacement: ActionId },
    /// A live action with the corrected key already existed; the original was retired.
    RetiredAsDuplicate { key: ActionKey, existing: ActionId },
}

impl SubstitutionOutcome {
    pub fn is_substituted(&self) -> bool {
        matches!(self, SubstitutionOutcome::Substituted { .. })
    }
}
