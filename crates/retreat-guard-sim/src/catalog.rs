//! Action definitions known to the host.
//!
//! Each definition carries the validation functions that gate it in the
//! action menu and the execution functions run when it is created.

use std::collections::BTreeMap;

use retreat_guard_core::constants::*;
use retreat_guard_core::enums::{ActionKey, ExecutionKind, ValidationKind};
use retreat_guard_core::settings::Settings;

#[derive(Debug, Clone)]
pub struct ActionDefinition {
    pub key: ActionKey,
    pub duration: f32,
    /// Carries a painted movement path.
    pub has_path: bool,
    pub validators: Vec<ValidationKind>,
    pub on_creation: Vec<ExecutionKind>,
}

impl ActionDefinition {
    fn new(key: ActionKey, duration: f32) -> Self {
        Self {
            key,
            duration,
            has_path: false,
            validators: Vec::new(),
            on_creation: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ActionCatalog {
    definitions: BTreeMap<ActionKey, ActionDefinition>,
}

impl ActionCatalog {
    /// The stock catalog, with the zone validators installed when `use_patch` is set.
    pub fn standard(settings: &Settings) -> Self {
        let mut movement = ActionDefinition::new(ActionKey::Move, MOVE_DURATION_SECS);
        movement.has_path = true;
        let mut dash = ActionDefinition::new(ActionKey::Dash, DASH_DURATION_SECS);
        dash.has_path = true;

        let mut eject = ActionDefinition::new(ActionKey::Eject, EXIT_DURATION_SECS);
        let mut retreat = ActionDefinition::new(ActionKey::Retreat, EXIT_DURATION_SECS);
        if settings.use_patch {
            eject.validators.push(ValidationKind::NotInRetreatZone);
            retreat.validators.push(ValidationKind::InRetreatZone);
        }
        eject.on_creation.push(ExecutionKind::EjectOrRetreat);
        retreat.on_creation.push(ExecutionKind::EjectOrRetreat);

        let mut catalog = Self::default();
        for definition in [
            movement,
            dash,
            ActionDefinition::new(ActionKey::Wait, WAIT_DURATION_SECS),
            eject,
            retreat,
        ] {
            catalog.insert(definition);
        }
        catalog
    }

    pub fn insert(&mut self, definition: ActionDefinition) {
        self.definitions.insert(definition.key, definition);
    }

    pub fn get(&self, key: ActionKey) -> Option<&ActionDefinition> {
        self.definitions.get(&key)
    }

    /// Definitions in key order.
    pub fn iter(&self) -> impl Iterator<Item = &ActionDefinition> {
        self.definitions.values()
    }
}
