//! Engine binary for the Pixelscript sprite simulation.
//!
//! Loads configuration and a project file, shows the static preview, then
//! runs one session to completion, printing every frame. Ctrl-C stops the
//! session before its next tick.
//!
//! # Startup Sequence
//!
//! 1. Load configuration from `pixelscript-config.yaml`
//! 2. Initialize structured logging (tracing)
//! 3. Load the project JSON named by `engine.project_path`
//! 4. Print the static preview
//! 5. Start the session and wire Ctrl-C to its stop handle
//! 6. Run the session loop
//! 7. Log the result

mod error;
mod presenter;

use std::path::Path;
use std::sync::Arc;

use pixelscript_core::compose;
use pixelscript_core::config::SimulationConfig;
use pixelscript_core::runner;
use pixelscript_core::session;
use pixelscript_types::Project;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::error::EngineError;
use crate::presenter::TerminalPresenter;

/// Application entry point for the engine.
///
/// # Errors
///
/// Returns an error if configuration or the project cannot be loaded, or
/// the session fails.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. Load configuration. Logging is not up yet, so report the fallback
    //    after init.
    let (config, config_found) = load_config()?;

    // 2. Initialize structured logging.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.logging.level)),
        )
        .with_target(true)
        .init();

    info!("pixelscript-engine starting");
    if !config_found {
        info!("Config file not found, using defaults");
    }
    info!(
        project_path = config.engine.project_path,
        max_ticks = config.simulation.max_ticks,
        stop_poll_ms = config.simulation.stop_poll_ms,
        max_entities = config.simulation.max_entities,
        wait_policy = ?config.scripting.wait_policy,
        "Configuration loaded"
    );

    // 3. Load the project.
    let project = Arc::new(load_project(Path::new(&config.engine.project_path))?);
    info!(
        project = project.name,
        placements = project.placements.len(),
        "Project loaded"
    );

    // 4. Static preview.
    let mut presenter = TerminalPresenter::new(std::io::stdout(), config.engine.print_frames);
    presenter.write_preview(&project.name, &compose::preview(&project));

    // 5. Start the session.
    let mut session = session::start(Arc::clone(&project), &config);
    let stop = session.stop_handle();
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                info!("Ctrl-C received, stopping session");
                stop.stop();
            }
            Err(e) => warn!(error = %e, "Failed to listen for Ctrl-C"),
        }
    });

    // 6. Run the session.
    let result = runner::run_session(&mut session, &mut presenter)
        .await
        .map_err(EngineError::from)?;

    // 7. Log results.
    runner::log_session_end(&result);

    info!(
        session_id = %session.id(),
        end_reason = ?result.end_reason,
        frames = result.frames_emitted,
        "pixelscript-engine shutdown complete"
    );

    Ok(())
}

/// Load configuration from `pixelscript-config.yaml` in the working
/// directory, falling back to defaults when the file is absent.
///
/// The second element reports whether the file was found.
fn load_config() -> Result<(SimulationConfig, bool), EngineError> {
    let config_path = Path::new("pixelscript-config.yaml");
    if config_path.exists() {
        let config = SimulationConfig::from_file(config_path)?;
        Ok((config, true))
    } else {
        let mut config = SimulationConfig::default();
        config.engine.apply_env_overrides();
        Ok((config, false))
    }
}

/// Read and parse a project JSON file.
fn load_project(path: &Path) -> Result<Project, EngineError> {
    let contents = std::fs::read_to_string(path).map_err(|source| EngineError::ProjectLoad {
        path: path.display().to_string(),
        source,
    })?;
    Ok(Project::from_json(&contents)?)
}
