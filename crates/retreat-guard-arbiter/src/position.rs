//! Position resolution for a unit at the time its last queued action starts.
//!
//! The unit's stored position is where it stands now. If it has a queued
//! movement path, the relevant position is along that path at the start of
//! its most recent action. A path that changed since it was last resolved has
//! to be reprocessed before it can be sampled; if nothing can reprocess it,
//! the sampled position would be stale, so the start position is used instead.

use glam::Vec3;

use retreat_guard_core::constants::MIN_EFFECTIVE_DISPLACEMENT;
use retreat_guard_core::enums::PathTrust;
use retreat_guard_core::settings::Settings;
use retreat_guard_core::types::{CombatantInfo, UnitId};

use crate::host::{ActionDirectory, ActionTimeline, PathSubsystem};

/// Movement flags gathered from the unit's live actions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MovementScan {
    /// Some live action carries a movement path.
    pub moved: bool,
    /// Some live action's path changed since it was last resolved.
    pub changed: bool,
}

/// Scan live (not destroyed, disposed, or completed) actions of a unit.
pub fn scan_movement<H>(host: &H, unit: UnitId) -> MovementScan
where
    H: ActionDirectory + ?Sized,
{
    host.actions_of(unit)
        .iter()
        .filter(|action| action.is_live())
        .fold(MovementScan::default(), |scan, action| MovementScan {
            moved: scan.moved || action.has_path(),
            changed: scan.changed || action.path_changed(),
        })
}

/// Classify a scan against the availability of a path processor.
pub fn trust_for(scan: MovementScan, can_process: bool) -> PathTrust {
    if !scan.moved {
        PathTrust::Absent
    } else if scan.changed && !can_process {
        PathTrust::StaleUnprocessable
    } else {
        PathTrust::Resolved
    }
}

/// Whether the unit's queued path can be used for position lookup.
pub fn should_trust_path<H>(host: &H, unit: UnitId) -> PathTrust
where
    H: ActionDirectory + PathSubsystem + ?Sized,
{
    trust_for(scan_movement(host, unit), host.can_process_paths())
}

/// Start and end of a unit's queued movement.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolvedPosition {
    /// Stored position of the unit.
    pub start: Vec3,
    /// Position at `at_time`. Equal to `start` unless `trust` is `Resolved`.
    pub end: Vec3,
    pub trust: PathTrust,
    /// Lookup time, set only when the path was sampled.
    pub at_time: Option<f32>,
    /// A changed path was reprocessed during this resolution.
    pub reprocessed: bool,
}

impl ResolvedPosition {
    fn unmoved(start: Vec3, trust: PathTrust) -> Self {
        Self {
            start,
            end: start,
            trust,
            at_time: None,
            reprocessed: false,
        }
    }

    pub fn displacement(&self) -> f32 {
        self.start.distance(self.end)
    }

    /// Whether the net displacement is large enough to count as movement.
    pub fn effectively_moved(&self) -> bool {
        self.displacement() >= MIN_EFFECTIVE_DISPLACEMENT
    }

    /// The position zone membership should be tested at.
    /// Negligible displacement is path noise, so the start position is used.
    pub fn effective_position(&self) -> Vec3 {
        if self.effectively_moved() {
            self.end
        } else {
            self.start
        }
    }
}

/// Resolve where the unit will be when its most recent action starts.
///
/// When a changed path is reprocessed, the change is consumed on every live
/// action of the unit so later queries do not reprocess it again. If the
/// reprocessing call fails, nothing is consumed and the start position is used.
pub fn resolve_position<H>(settings: &Settings, host: &mut H, unit: &CombatantInfo) -> ResolvedPosition
where
    H: ActionDirectory + ActionTimeline + PathSubsystem + ?Sized,
{
    let start = unit.position;
    let scan = scan_movement(&*host, unit.id);
    let trust = trust_for(scan, host.can_process_paths());

    match trust {
        PathTrust::Absent => {
            if settings.log_diagnostics {
                tracing::debug!(
                    target: "retreat_guard::position",
                    unit = %unit.id,
                    start = ?start,
                    "resolve.no_movement"
                );
            }
            return ResolvedPosition::unmoved(start, trust);
        }
        PathTrust::StaleUnprocessable => {
            // The trajectory still reflects the previous painting until the
            // host reprocesses it; sampling it now gives a wrong end point.
            if settings.log_diagnostics {
                tracing::debug!(
                    target: "retreat_guard::position",
                    unit = %unit.id,
                    start = ?start,
                    "resolve.stale_path_no_processor"
                );
            }
            return ResolvedPosition::unmoved(start, trust);
        }
        PathTrust::Resolved => {}
    }

    let at_time = host.last_action_start_time(unit.id);
    let reprocessed = scan.changed;
    if scan.changed {
        if !host.process_path(unit.id) {
            // Flags stay set so a later frame retries.
            if settings.log_diagnostics {
                tracing::debug!(
                    target: "retreat_guard::position",
                    unit = %unit.id,
                    start = ?start,
                    "resolve.process_failed"
                );
            }
            return ResolvedPosition::unmoved(start, PathTrust::StaleUnprocessable);
        }
        consume_path_changes(host, unit.id);
    }
    let end = host.processed_position(unit.id, at_time).unwrap_or(start);

    let resolved = ResolvedPosition {
        start,
        end,
        trust,
        at_time: Some(at_time),
        reprocessed,
    };

    if settings.log_diagnostics {
        tracing::debug!(
            target: "retreat_guard::position",
            unit = %unit.id,
            time = at_time,
            processed = reprocessed,
            start = ?start,
            end = ?end,
            distance = resolved.displacement(),
            "resolve.path"
        );
    }

    resolved
}

/// Consume the path change on every live action of the unit.
fn consume_path_changes<H>(host: &mut H, unit: UnitId)
where
    H: ActionDirectory + ?Sized,
{
    let changed: Vec<_> = host
        .actions_of(unit)
        .into_iter()
        .filter(|action| action.is_live() && action.path_changed())
        .map(|action| action.id)
        .collect();
    for action in changed {
        host.consume_path_change(action);
    }
}
