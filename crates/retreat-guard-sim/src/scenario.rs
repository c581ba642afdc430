//! Scenario data and scripted replays.
//!
//! A scenario is the active key plus the retreat-zone rectangles of every
//! scenario the host knows about. A replay script adds the units to spawn
//! and the commands to feed in, one batch per frame.

use std::collections::{BTreeSet, HashMap};
use std::fs;
use std::path::{Path, PathBuf};

use glam::Vec3;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use retreat_guard_core::commands::HostCommand;
use retreat_guard_core::types::{Rect, UnitId};

/// Retreat zones keyed by scenario, plus the scenario being fought.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ScenarioData {
    pub key: String,
    pub retreat_zones: HashMap<String, Vec<Rect>>,
}

impl ScenarioData {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            retreat_zones: HashMap::new(),
        }
    }

    /// Builder-style zone registration.
    pub fn with_zone(mut self, scenario_key: impl Into<String>, zone: Rect) -> Self {
        self.retreat_zones
            .entry(scenario_key.into())
            .or_default()
            .push(zone);
        self
    }

    pub fn zones(&self, scenario_key: &str) -> &[Rect] {
        self.retreat_zones
            .get(scenario_key)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

/// A unit placed on the battlefield when a scenario starts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnitSpawn {
    pub id: UnitId,
    pub position: Vec3,
    #[serde(default)]
    pub player_controllable: bool,
    /// `None` for units scripting never tagged.
    #[serde(default)]
    pub tags: Option<BTreeSet<String>>,
}

/// A scripted run of the host simulation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReplayScript {
    pub scenario: ScenarioData,
    pub units: Vec<UnitSpawn>,
    /// Whether the host exposes its path processor to the arbiter.
    #[serde(default = "default_expose_path_processor")]
    pub expose_path_processor: bool,
    /// Commands per frame. Frame `i` receives `frames[i]`.
    #[serde(default)]
    pub frames: Vec<Vec<HostCommand>>,
}

fn default_expose_path_processor() -> bool {
    true
}

#[derive(Debug, Error)]
pub enum ScriptError {
    #[error("failed to read script from {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse script: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("unit {0} is spawned more than once")]
    DuplicateUnit(UnitId),
    #[error("command in frame {frame} references unknown unit {unit}")]
    UnknownUnit { frame: usize, unit: UnitId },
}

impl ReplayScript {
    pub fn from_json_str(json: &str) -> Result<Self, ScriptError> {
        let script: Self = serde_json::from_str(json)?;
        script.check_units()?;
        Ok(script)
    }

    pub fn from_file(path: &Path) -> Result<Self, ScriptError> {
        let contents = fs::read_to_string(path).map_err(|source| ScriptError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&contents)
    }

    /// Every unit id is spawned once and every command names a spawned unit.
    fn check_units(&self) -> Result<(), ScriptError> {
        let mut known = BTreeSet::new();
        for spawn in &self.units {
            if !known.insert(spawn.id) {
                return Err(ScriptError::DuplicateUnit(spawn.id));
            }
        }
        for (frame, commands) in self.frames.iter().enumerate() {
            for command in commands {
                if let Some(unit) = command_unit(command) {
                    if !known.contains(&unit) {
                        return Err(ScriptError::UnknownUnit { frame, unit });
                    }
                }
            }
        }
        Ok(())
    }
}

fn command_unit(command: &HostCommand) -> Option<UnitId> {
    match command {
        HostCommand::SelectUnit { unit }
        | HostCommand::PaintPath { unit, .. }
        | HostCommand::QueueAction { unit, .. } => Some(*unit),
        _ => None,
    }
}
