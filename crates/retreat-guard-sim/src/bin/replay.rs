//! Replay a scripted combat and print the final snapshot as JSON.
//!
//! Usage: `replay <settings> <script.json>`, where `<settings>` is a settings
//! file or a directory holding `settings.json`. Settings that fail to load
//! fall back to the defaults; a script that fails to load is fatal.

use std::path::PathBuf;
use std::process::ExitCode;

use retreat_guard_core::settings::Settings;
use retreat_guard_sim::scenario::ReplayScript;
use retreat_guard_sim::CombatEngine;

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let mut args = std::env::args().skip(1);
    let (Some(settings_path), Some(script_path)) = (args.next(), args.next()) else {
        eprintln!("usage: replay <settings> <script.json>");
        return ExitCode::FAILURE;
    };

    let settings_path = PathBuf::from(settings_path);
    let settings_path = if settings_path.is_dir() {
        Settings::resolve_path(&settings_path)
    } else {
        settings_path
    };
    let settings = Settings::load_or_default(&settings_path);
    let script = match ReplayScript::from_file(&PathBuf::from(&script_path)) {
        Ok(script) => script,
        Err(err) => {
            tracing::error!(target: "retreat_guard::replay", path = %script_path, error = %err, "script.load_failed");
            return ExitCode::FAILURE;
        }
    };

    let snapshots = CombatEngine::replay(settings, &script);
    for snapshot in &snapshots {
        for event in &snapshot.events {
            tracing::info!(target: "retreat_guard::replay", frame = snapshot.time.frame, event = ?event, "event");
        }
    }

    let Some(last) = snapshots.last() else {
        return ExitCode::FAILURE;
    };
    match serde_json::to_string_pretty(last) {
        Ok(json) => {
            println!("{json}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            tracing::error!(target: "retreat_guard::replay", error = %err, "snapshot.serialize_failed");
            ExitCode::FAILURE
        }
    }
}
