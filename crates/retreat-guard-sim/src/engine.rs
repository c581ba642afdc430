//! Combat engine: the headless host simulation.
//!
//! `CombatEngine` owns the hecs ECS world, processes host commands, runs the
//! frame pipeline, and produces `CombatSnapshot`s. It also implements every
//! collaborator trait the arbiter talks to, so eject/retreat decisions run
//! against real world state.

use std::collections::VecDeque;

use glam::Vec3;
use hecs::{Entity, World};

use retreat_guard_arbiter::host::*;
use retreat_guard_arbiter::validation::ActionValidation;
use retreat_guard_core::commands::HostCommand;
use retreat_guard_core::components::*;
use retreat_guard_core::enums::{ActionKey, UiMode, ValidationKind};
use retreat_guard_core::events::HostEvent;
use retreat_guard_core::settings::Settings;
use retreat_guard_core::state::CombatSnapshot;
use retreat_guard_core::types::{ActionId, ActionSummary, OfferedAction, Rect, SimTime, UnitId};

use crate::catalog::ActionCatalog;
use crate::scenario::{ReplayScript, ScenarioData, UnitSpawn};
use crate::systems;
use crate::systems::path_linker::PathProcessor;
use crate::world_setup;

/// Configuration for starting a new engine.
pub struct SimConfig {
    /// Whether the path processor is exposed to on-demand callers.
    /// The end-of-frame path linker runs either way.
    pub expose_path_processor: bool,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            expose_path_processor: true,
        }
    }
}

/// The host simulation. Owns the ECS world and all combat state.
pub struct CombatEngine {
    pub(crate) world: World,
    pub(crate) settings: Settings,
    pub(crate) catalog: ActionCatalog,
    pub(crate) events: Vec<HostEvent>,
    time: SimTime,
    scenario: ScenarioData,
    selected: Option<UnitId>,
    ui_mode: UiMode,
    path_processor: Option<PathProcessor>,
    log_path_actions: bool,
    next_action_id: u32,
    scenario_refreshes: u32,
    offered: Vec<OfferedAction>,
    command_queue: VecDeque<HostCommand>,
    despawn_buffer: Vec<Entity>,
}

impl CombatEngine {
    pub fn new(settings: Settings, scenario: ScenarioData, config: SimConfig) -> Self {
        let path_processor = PathProcessor::discover(config.expose_path_processor);
        if settings.log_diagnostics {
            tracing::debug!(
                target: "retreat_guard::host",
                found = path_processor.is_some(),
                "path_processor.discovery"
            );
        }

        Self {
            world: World::new(),
            catalog: ActionCatalog::standard(&settings),
            settings,
            events: Vec::new(),
            time: SimTime::default(),
            scenario,
            selected: None,
            ui_mode: UiMode::default(),
            path_processor,
            log_path_actions: false,
            next_action_id: 1,
            scenario_refreshes: 0,
            offered: Vec::new(),
            command_queue: VecDeque::new(),
            despawn_buffer: Vec::new(),
        }
    }

    /// Build an engine with the script's scenario and units in place.
    pub fn from_script(settings: Settings, script: &ReplayScript) -> Self {
        let mut engine = Self::new(
            settings,
            script.scenario.clone(),
            SimConfig {
                expose_path_processor: script.expose_path_processor,
            },
        );
        for spawn in &script.units {
            engine.spawn_unit(spawn);
        }
        engine
    }

    /// Run a script frame by frame and return the snapshot of every frame.
    pub fn replay(settings: Settings, script: &ReplayScript) -> Vec<CombatSnapshot> {
        let mut engine = Self::from_script(settings, script);
        if script.frames.is_empty() {
            return vec![engine.tick()];
        }
        script
            .frames
            .iter()
            .map(|commands| {
                engine.queue_commands(commands.iter().cloned());
                engine.tick()
            })
            .collect()
    }

    pub fn spawn_unit(&mut self, spawn: &UnitSpawn) -> Entity {
        world_setup::spawn_unit(&mut self.world, spawn)
    }

    /// Queue a command for processing at the next frame boundary.
    pub fn queue_command(&mut self, command: HostCommand) {
        self.command_queue.push_back(command);
    }

    pub fn queue_commands(&mut self, commands: impl IntoIterator<Item = HostCommand>) {
        self.command_queue.extend(commands);
    }

    /// Run one frame and return the resulting snapshot.
    pub fn tick(&mut self) -> CombatSnapshot {
        // 1. Commands
        self.process_commands();
        // 2. On-creation execution functions (substitution)
        systems::execution::run(self);
        // 3. End-of-frame path processing
        systems::path_linker::run(&mut self.world, &mut self.events);
        // 4. Playback, with the clock moving only while the turn executes
        if self.ui_mode == UiMode::Execution {
            self.time.advance();
        } else {
            self.time.frame += 1;
        }
        systems::playback::run(&mut self.world, self.time.elapsed_secs, &mut self.events);
        // 5. Cleanup
        systems::cleanup::run(&mut self.world, &mut self.despawn_buffer);
        // 6. Snapshot
        match self.selected {
            Some(unit) => {
                self.refresh_offered_actions(unit);
            }
            None => self.offered.clear(),
        }

        let events = std::mem::take(&mut self.events);
        systems::snapshot::build_snapshot(
            &self.world,
            &self.time,
            &self.scenario.key,
            self.selected,
            self.ui_mode,
            &self.offered,
            events,
        )
    }

    pub fn time(&self) -> SimTime {
        self.time
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    /// Number of scenario-state refreshes requested by action creation.
    pub fn scenario_refreshes(&self) -> u32 {
        self.scenario_refreshes
    }

    pub fn logs_path_actions(&self) -> bool {
        self.log_path_actions
    }

    pub(crate) fn action_summary(&self, action: ActionId) -> Option<ActionSummary> {
        let entity = world_setup::find_action(&self.world, action)?;
        let pending = self.world.get::<&PendingAction>(entity).ok()?;
        let path = self.world.get::<&MovementPath>(entity).ok();
        Some(summarize(&pending, path.as_deref()))
    }

    fn process_commands(&mut self) {
        while let Some(command) = self.command_queue.pop_front() {
            self.handle_command(command);
        }
    }

    fn handle_command(&mut self, command: HostCommand) {
        match command {
            HostCommand::SelectUnit { unit } => {
                if world_setup::find_unit(&self.world, unit).is_some()
                    && !world_setup::is_withdrawn(&self.world, unit)
                {
                    self.selected = Some(unit);
                } else {
                    tracing::warn!(target: "retreat_guard::host", unit = %unit, "select.unknown_unit");
                }
            }
            HostCommand::ClearSelection => {
                self.selected = None;
            }
            HostCommand::SetUiMode { mode } => {
                self.ui_mode = mode;
            }
            HostCommand::PaintPath {
                unit,
                start_time,
                waypoints,
            } => self.paint_path(unit, start_time, waypoints),
            HostCommand::QueueAction {
                unit,
                key,
                start_time,
            } => {
                if self.selected == Some(unit) && !self.is_offered_and_available(unit, key) {
                    tracing::info!(
                        target: "retreat_guard::host",
                        unit = %unit,
                        key = %key,
                        "queue.rejected_unavailable"
                    );
                    return;
                }
                if key.is_eject_or_retreat() && self.has_live_exit(unit) {
                    tracing::info!(
                        target: "retreat_guard::host",
                        unit = %unit,
                        key = %key,
                        "queue.rejected_duplicate_exit"
                    );
                    return;
                }
                if self.instantiate(unit, key, start_time, true).is_none() {
                    tracing::warn!(
                        target: "retreat_guard::host",
                        unit = %unit,
                        key = %key,
                        "queue.refused"
                    );
                }
            }
            HostCommand::CancelAction { action } => {
                if let Some(entity) = world_setup::find_action(&self.world, action) {
                    if let Ok(mut pending) = self.world.get::<&mut PendingAction>(entity) {
                        pending.lifecycle.destroyed = true;
                    }
                }
            }
            HostCommand::AdvanceTime { seconds } => {
                if seconds > 0.0 {
                    self.time.elapsed_secs += seconds;
                }
            }
            HostCommand::ToggleDiagnostics => {
                if self.accepts_console("ToggleDiagnostics") {
                    self.settings.log_diagnostics = !self.settings.log_diagnostics;
                    self.console(format!(
                        "Diagnostics logging: {}",
                        on_off(self.settings.log_diagnostics)
                    ));
                }
            }
            HostCommand::TogglePathActionLogging => {
                if self.accepts_console("TogglePathActionLogging") {
                    self.log_path_actions = !self.log_path_actions;
                    self.console(format!(
                        "Path action logging: {}",
                        on_off(self.log_path_actions)
                    ));
                }
            }
        }
    }

    /// Whether `unit` already has a live eject or retreat queued.
    fn has_live_exit(&self, unit: UnitId) -> bool {
        self.world.query::<&PendingAction>().iter().any(|(_, action)| {
            action.owner == unit && action.key.is_eject_or_retreat() && action.lifecycle.is_live()
        })
    }

    /// Repaint the unit's latest live path-carrying action, or create a move
    /// at `start_time` when it has none.
    fn paint_path(&mut self, unit: UnitId, start_time: f32, waypoints: Vec<Vec3>) {
        if waypoints.is_empty() {
            tracing::warn!(target: "retreat_guard::host", unit = %unit, "paint.empty_path");
            return;
        }

        let catalog = &self.catalog;
        let existing = self
            .world
            .query::<&PendingAction>()
            .iter()
            .filter(|(_, action)| {
                action.owner == unit
                    && action.lifecycle.is_live()
                    && catalog.get(action.key).is_some_and(|def| def.has_path)
            })
            .max_by(|(_, a), (_, b)| a.start_time.total_cmp(&b.start_time).then(a.id.cmp(&b.id)))
            .map(|(entity, _)| entity);

        if let Some(entity) = existing {
            if let Ok(mut path) = self.world.get::<&mut MovementPath>(entity) {
                path.repaint(waypoints);
                return;
            }
            let _ = self.world.insert_one(entity, MovementPath::painted(waypoints));
            return;
        }

        let Some(action) = self.instantiate(unit, ActionKey::Move, start_time, true) else {
            tracing::warn!(target: "retreat_guard::host", unit = %unit, "paint.refused");
            return;
        };
        if let Some(entity) = world_setup::find_action(&self.world, action) {
            let _ = self.world.insert_one(entity, MovementPath::painted(waypoints));
        }
    }

    /// Create an action on the timeline. Its on-creation functions run in
    /// the execution step of the current frame, never from inside this call.
    fn instantiate(
        &mut self,
        unit: UnitId,
        key: ActionKey,
        start_time: f32,
        refresh_scenario_state: bool,
    ) -> Option<ActionId> {
        if world_setup::find_unit(&self.world, unit).is_none()
            || world_setup::is_withdrawn(&self.world, unit)
        {
            return None;
        }
        let duration = self.catalog.get(key)?.duration;

        let id = ActionId(self.next_action_id);
        self.next_action_id += 1;
        world_setup::spawn_action(
            &mut self.world,
            PendingAction {
                id,
                owner: unit,
                key,
                start_time,
                duration,
                lifecycle: ActionLifecycle::default(),
            },
        );

        if refresh_scenario_state {
            self.scenario_refreshes += 1;
        }
        if self.log_path_actions {
            tracing::info!(
                target: "retreat_guard::host",
                unit = %unit,
                action = %id,
                key = %key,
                start_time,
                refresh_scenario_state,
                "action.created"
            );
        }
        self.events.push(HostEvent::ActionCreated {
            unit,
            action: id,
            key,
            start_time,
        });
        Some(id)
    }

    fn is_offered_and_available(&mut self, unit: UnitId, key: ActionKey) -> bool {
        self.refresh_offered_actions(unit)
            .iter()
            .find(|offered| offered.key == key)
            .is_some_and(|offered| offered.available)
    }

    fn accepts_console(&self, command: &str) -> bool {
        if !self.settings.register_commands {
            tracing::warn!(target: "retreat_guard::console", command, "console.disabled");
        }
        self.settings.register_commands
    }

    fn console(&mut self, message: String) {
        tracing::info!(target: "retreat_guard::console", "{message}");
        self.events.push(HostEvent::ConsoleOutput { message });
    }
}

fn on_off(flag: bool) -> &'static str {
    if flag {
        "on"
    } else {
        "off"
    }
}

fn summarize(action: &PendingAction, path: Option<&MovementPath>) -> ActionSummary {
    ActionSummary {
        id: action.id,
        key: action.key,
        start_time: action.start_time,
        duration: action.duration,
        completed: action.lifecycle.completed,
        disposed: action.lifecycle.disposed,
        destroyed: action.lifecycle.destroyed,
        path: path.map(|path| path.revision),
    }
}

// ---- Collaborator traits ----

impl ScenarioGeometry for CombatEngine {
    fn active_scenario_key(&self) -> &str {
        &self.scenario.key
    }

    fn zone_rectangles(&self, scenario_key: &str) -> &[Rect] {
        self.scenario.zones(scenario_key)
    }
}

impl SelectionState for CombatEngine {
    fn selected_unit(&self) -> Option<UnitId> {
        self.selected
    }

    fn ui_mode(&self) -> UiMode {
        self.ui_mode
    }
}

impl PathSubsystem for CombatEngine {
    fn can_process_paths(&self) -> bool {
        self.path_processor.is_some()
    }

    fn process_path(&mut self, unit: UnitId) -> bool {
        match self.path_processor {
            Some(processor) => processor.process(&mut self.world, unit),
            None => false,
        }
    }

    fn processed_position(&self, unit: UnitId, time: f32) -> Option<Vec3> {
        systems::path_linker::sample_position(&self.world, unit, time)
    }
}

impl ActionTimeline for CombatEngine {
    fn last_action_start_time(&self, unit: UnitId) -> f32 {
        self.world
            .query::<&PendingAction>()
            .iter()
            .filter(|(_, action)| action.owner == unit && action.lifecycle.is_live())
            .map(|(_, action)| action.start_time)
            .reduce(f32::max)
            .unwrap_or(self.time.elapsed_secs)
    }
}

impl ActionDirectory for CombatEngine {
    fn actions_of(&self, unit: UnitId) -> Vec<ActionSummary> {
        let mut actions: Vec<ActionSummary> = self
            .world
            .query::<(&PendingAction, Option<&MovementPath>)>()
            .iter()
            .filter(|(_, (action, _))| action.owner == unit)
            .map(|(_, (action, path))| summarize(action, path))
            .collect();
        actions.sort_by(|a, b| a.start_time.total_cmp(&b.start_time).then(a.id.cmp(&b.id)));
        actions
    }

    fn consume_path_change(&mut self, action: ActionId) -> bool {
        let Some(entity) = world_setup::find_action(&self.world, action) else {
            return false;
        };
        match self.world.get::<&mut MovementPath>(entity) {
            Ok(mut path) => path.consume_change(),
            Err(_) => false,
        }
    }

    fn retire_action(&mut self, action: ActionId) {
        if let Some(entity) = world_setup::find_action(&self.world, action) {
            if let Ok(mut pending) = self.world.get::<&mut PendingAction>(entity) {
                pending.lifecycle.retire();
            }
        }
    }
}

impl ActionFactory for CombatEngine {
    fn create_action(
        &mut self,
        unit: UnitId,
        key: ActionKey,
        start_time: f32,
        refresh_scenario_state: bool,
    ) -> Option<ActionId> {
        self.instantiate(unit, key, start_time, refresh_scenario_state)
    }
}

impl OfferedActions for CombatEngine {
    /// Run each definition's validators against the unit's current state.
    fn refresh_offered_actions(&mut self, unit: UnitId) -> Vec<OfferedAction> {
        let Some(info) = world_setup::combatant_info(&self.world, unit) else {
            return Vec::new();
        };
        let withdrawn = world_setup::is_withdrawn(&self.world, unit);
        let settings = self.settings.clone();
        let definitions: Vec<(ActionKey, Vec<ValidationKind>)> = self
            .catalog
            .iter()
            .map(|definition| (definition.key, definition.validators.clone()))
            .collect();

        let mut offered = Vec::with_capacity(definitions.len());
        for (key, validators) in definitions {
            let mut available = !withdrawn;
            for validator in &validators {
                if !available {
                    break;
                }
                available = validator.is_valid(&settings, &mut *self, &info);
            }
            offered.push(OfferedAction { key, available });
        }

        if self.selected == Some(unit) {
            self.offered = offered.clone();
        }
        offered
    }
}
