//! Constants and tuning parameters.

/// Host frame rate (Hz).
pub const TICK_RATE: u32 = 30;

/// Seconds per frame.
pub const DT: f32 = 1.0 / TICK_RATE as f32;

// --- Retreat zones ---

/// Prefix of the scenario tag that forces retreat-zone membership.
/// The full tag is this prefix followed by the resolved zone state key.
pub const IN_STATE_TAG_PREFIX: &str = "in_state_";

/// Zone state key used when a scenario has no explicit mapping.
pub const DEFAULT_RETREAT_ZONE_STATE_KEY: &str = "retreat_default";

/// Net displacement (world units) below which a queued path counts as no movement.
pub const MIN_EFFECTIVE_DISPLACEMENT: f32 = 1.0;

// --- Action catalog ---

/// Duration of a painted move (one planning turn).
pub const MOVE_DURATION_SECS: f32 = 5.0;

/// Duration of a dash.
pub const DASH_DURATION_SECS: f32 = 1.5;

/// Duration of a wait.
pub const WAIT_DURATION_SECS: f32 = 1.0;

/// Duration of eject and retreat.
pub const EXIT_DURATION_SECS: f32 = 1.0;

// --- Settings ---

/// Settings file name looked up next to the host binary.
pub const SETTINGS_FILE_NAME: &str = "settings.json";

/// Environment variable that overrides the settings path.
pub const SETTINGS_PATH_ENV: &str = "RETREAT_GUARD_SETTINGS";
