//! The `orrery` binary.

use std::process::ExitCode;

use clap::Parser;
use orrery_app::{AppContext, PlatformDirs, default_catalog, run};
use orrery_config::{CliArgs, Config, PersistedSettings};
use orrery_input::KeyBindings;
use tracing::{error, info};

fn main() -> ExitCode {
    let args = CliArgs::parse();

    let dirs = match PlatformDirs::resolve_and_create() {
        Ok(dirs) => dirs,
        Err(e) => {
            eprintln!("Failed to initialize platform directories: {e}");
            return ExitCode::FAILURE;
        }
    };
    let config_dir = args.config.clone().unwrap_or_else(|| dirs.config_dir.clone());

    let mut config = match Config::load_or_create(&config_dir) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load config, using defaults: {e}");
            Config::default()
        }
    };
    config.apply_cli_overrides(&args);

    orrery_log::init_logging(Some(&dirs.log_dir), cfg!(debug_assertions), Some(&config));
    info!("Orrery starting, config dir {}", config_dir.display());

    let settings_path = args
        .settings
        .clone()
        .unwrap_or_else(|| dirs.data_dir.join(&config.debug.settings_file));
    let settings = PersistedSettings::load(&settings_path);
    let bindings = KeyBindings::load_or_default(&config_dir.join(KeyBindings::FILE_NAME));

    let scene = match default_catalog() {
        Ok(scene) => scene,
        Err(e) => {
            error!("Invalid scene catalog: {e}");
            return ExitCode::FAILURE;
        }
    };
    let ctx = AppContext::new(&config, settings, scene);

    match run(config, ctx, bindings, settings_path) {
        Ok(()) => {
            info!("Orrery exited cleanly");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("Orrery failed: {e}");
            ExitCode::FAILURE
        }
    }
}
