//! Path linker system: turns painted waypoints into time-indexed trajectories.
//!
//! A unit's path actions are chained in start-time order. The first starts at
//! the unit's stored position, each later one at the end of the previous.
//! Samples are spaced by arc length over the action's duration.

use glam::Vec3;
use hecs::{Entity, World};

use retreat_guard_core::components::*;
use retreat_guard_core::events::HostEvent;
use retreat_guard_core::types::{ActionId, UnitId};

use crate::world_setup;

/// On-demand access to path processing, for callers outside the frame pipeline.
#[derive(Debug, Clone, Copy)]
pub struct PathProcessor;

impl PathProcessor {
    /// Look up the processor once at startup. `None` when it is not exposed.
    pub fn discover(exposed: bool) -> Option<Self> {
        exposed.then_some(Self)
    }

    /// Rebuild the unit's trajectories now. Revisions are left for the caller.
    pub fn process(&self, world: &mut World, unit: UnitId) -> bool {
        if world_setup::find_unit(world, unit).is_none() {
            return false;
        }
        process_unit(world, unit);
        true
    }
}

/// Process every unit that has a changed path on a live action, then consume the change.
pub fn run(world: &mut World, events: &mut Vec<HostEvent>) {
    let mut units: Vec<UnitId> = world
        .query_mut::<(&PendingAction, &MovementPath)>()
        .into_iter()
        .filter(|(_, (action, path))| action.lifecycle.is_live() && path.is_changed())
        .map(|(_, (action, _))| action.owner)
        .collect();
    units.sort();
    units.dedup();

    for unit in units {
        let changed = process_unit(world, unit);
        for (entity, action) in changed {
            if let Ok(mut path) = world.get::<&mut MovementPath>(entity) {
                path.consume_change();
            }
            events.push(HostEvent::PathProcessed { unit, action });
        }
    }
}

/// Rebuild the trajectories of all live path actions of `unit`.
/// Returns the actions whose path was in the `Changed` state. Revisions are left alone.
pub fn process_unit(world: &mut World, unit: UnitId) -> Vec<(Entity, ActionId)> {
    let Some(origin) = unit_position(world, unit) else {
        return Vec::new();
    };

    let mut legs: Vec<(Entity, ActionId, f32, f32, bool)> = world
        .query_mut::<(&PendingAction, &MovementPath)>()
        .into_iter()
        .filter(|(_, (action, _))| action.owner == unit && action.lifecycle.is_live())
        .map(|(entity, (action, path))| {
            (
                entity,
                action.id,
                action.start_time,
                action.duration,
                path.is_changed(),
            )
        })
        .collect();
    legs.sort_by(|a, b| a.2.total_cmp(&b.2).then(a.1.cmp(&b.1)));

    let mut changed = Vec::new();
    let mut from = origin;
    for (entity, id, start_time, duration, was_changed) in legs {
        let Ok(mut path) = world.get::<&mut MovementPath>(entity) else {
            continue;
        };
        let processed = build_trajectory(from, &path.waypoints, start_time, duration);
        from = processed.end_position().unwrap_or(from);
        path.processed = Some(processed);
        if was_changed {
            changed.push((entity, id));
        }
    }
    changed
}

/// Sample `points` (origin first) by arc length over `[start_time, start_time + duration]`.
pub fn build_trajectory(origin: Vec3, waypoints: &[Vec3], start_time: f32, duration: f32) -> ProcessedPath {
    let points: Vec<Vec3> = std::iter::once(origin).chain(waypoints.iter().copied()).collect();

    let mut cumulative = Vec::with_capacity(points.len());
    let mut length = 0.0;
    cumulative.push(0.0);
    for pair in points.windows(2) {
        length += pair[0].distance(pair[1]);
        cumulative.push(length);
    }

    let samples = points
        .iter()
        .zip(&cumulative)
        .map(|(&position, &travelled)| {
            let fraction = if length > f32::EPSILON {
                travelled / length
            } else {
                0.0
            };
            PathSample {
                time: start_time + duration * fraction,
                position,
            }
        })
        .collect();

    ProcessedPath { samples }
}

/// Position of `unit` at `time` along its processed trajectories.
///
/// Uses the latest live path action that has started by `time` and has a
/// processed trajectory. A trajectory is used as is, even if stale.
/// Falls back to the stored position.
pub fn sample_position(world: &World, unit: UnitId, time: f32) -> Option<Vec3> {
    let stored = unit_position(world, unit)?;

    let mut query = world.query::<(&PendingAction, &MovementPath)>();
    let latest = query
        .iter()
        .filter(|(_, (action, _))| {
            action.owner == unit && action.lifecycle.is_live() && action.start_time <= time
        })
        .max_by(|(_, (a, _)), (_, (b, _))| {
            a.start_time.total_cmp(&b.start_time).then(a.id.cmp(&b.id))
        })
        .map(|(_, (_, path))| path.processed.as_ref().and_then(|p| p.position_at(time)));

    Some(latest.flatten().unwrap_or(stored))
}

fn unit_position(world: &World, unit: UnitId) -> Option<Vec3> {
    let entity = world_setup::find_unit(world, unit)?;
    world.get::<&Position>(entity).ok().map(|position| position.0)
}
