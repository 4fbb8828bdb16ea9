//! Command-line runner for the Hegemon simulation.
//!
//! Loads configuration, builds the chosen starting world, attaches the
//! built-in observers, and drives the tick pipeline for a fixed number of
//! ticks. The final state and per-tick metrics can be written to disk.
//!
//! # Startup Sequence
//!
//! 1. Load configuration from `HEGEMON_CONFIG` or `hegemon-config.yaml`
//! 2. Initialize structured logging (tracing)
//! 3. Resolve the starting scenario
//! 4. Build the simulation and attach observers
//! 5. Run the tick pipeline
//! 6. Write the final state and metrics
//! 7. Log the run summary

mod error;

use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use hegemon_core::{
    CausalChainObserver, HegemonConfig, LoggingConfig, MetricsCollector, Simulation,
    TopologyMonitor, scenarios,
};
use hegemon_types::{EventKind, WorldState};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::error::AppError;

/// Config file read when `HEGEMON_CONFIG` is unset.
const DEFAULT_CONFIG_PATH: &str = "hegemon-config.yaml";

/// Application entry point.
///
/// # Errors
///
/// Returns an error if configuration is invalid, the scenario is unknown,
/// a tick fails, or an output file cannot be written.
fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. Load configuration. Logging is not up yet, so the fallback notice
    //    is deferred until it is.
    let (config, config_source) = load_config()?;

    // 2. Initialize structured logging.
    init_tracing(&config.logging);
    info!("hegemon-engine starting");
    match &config_source {
        Some(path) => info!(path = %path.display(), "Configuration loaded"),
        None => info!("Config file not found, using defaults"),
    }
    info!(
        scenario = config.run.scenario,
        max_ticks = config.run.max_ticks,
        retain_history = config.run.retain_history,
        "Run configured"
    );

    // 3. Resolve the starting scenario.
    let initial = scenarios::by_name(&config.run.scenario).ok_or_else(|| {
        AppError::UnknownScenario {
            name: config.run.scenario.clone(),
            available: scenarios::SCENARIOS.to_vec(),
        }
    })?;
    info!(
        entities = initial.entities.len(),
        territories = initial.territories.len(),
        relationships = initial.relationships.len(),
        "Scenario built"
    );

    // 4. Build the simulation and attach observers.
    let metrics = Rc::new(RefCell::new(MetricsCollector::new()));
    let topology = Rc::new(RefCell::new(TopologyMonitor::new()));
    let causal = Rc::new(RefCell::new(CausalChainObserver::new()));

    let mut simulation = Simulation::new(initial, config.simulation, config.defines);
    if config.run.retain_history {
        simulation = simulation.with_history();
    }
    simulation.add_observer(Rc::clone(&metrics));
    simulation.add_observer(Rc::clone(&topology));
    simulation.add_observer(Rc::clone(&causal));
    subscribe_milestones(&mut simulation);

    // 5. Run the tick pipeline.
    simulation.run(config.run.max_ticks).map_err(AppError::from)?;
    let final_state = simulation.end().clone();

    // 6. Write the final state and metrics.
    if let Some(path) = &config.run.output_path {
        let json = hegemon_graph::dump_state(&final_state).map_err(AppError::from)?;
        write_output(path, &json)?;
        info!(path = %path.display(), "Final state written");
    }
    if let Some(path) = &config.run.metrics_path {
        let json = metrics.borrow().to_json().map_err(AppError::from)?;
        write_output(path, &json)?;
        info!(path = %path.display(), "Metrics written");
    }

    // 7. Log the run summary.
    log_summary(&simulation, &final_state, &topology.borrow(), &causal.borrow())?;

    Ok(())
}

/// Load configuration from `HEGEMON_CONFIG`, or `hegemon-config.yaml` in
/// the working directory.
///
/// Falls back to defaults when the file does not exist. Environment
/// overrides apply either way. Returns the path that was read, if any.
fn load_config() -> Result<(HegemonConfig, Option<PathBuf>), AppError> {
    let config_path = std::env::var_os("HEGEMON_CONFIG")
        .map_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH), PathBuf::from);
    if config_path.exists() {
        let config = HegemonConfig::from_file(&config_path)?;
        Ok((config, Some(config_path)))
    } else {
        let mut config = HegemonConfig::default();
        config.run.apply_env_overrides();
        Ok((config, None))
    }
}

/// Install the global tracing subscriber.
///
/// `RUST_LOG` wins over the configured level when set.
fn init_tracing(logging: &LoggingConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.level));
    let builder = tracing_subscriber::fmt().with_env_filter(filter).with_target(true);
    if logging.format == "json" {
        builder.json().init();
    } else {
        builder.init();
    }
}

/// Log the crisis events as they are published, tick by tick.
fn subscribe_milestones(simulation: &mut Simulation) {
    let bus = simulation.event_bus_mut();
    for kind in [
        EventKind::EconomicCrisis,
        EventKind::ClassDecomposition,
        EventKind::ControlRatioCrisis,
        EventKind::TerminalDecision,
    ] {
        bus.subscribe(kind, |event| {
            info!(tick = event.tick(), event = %event, "Milestone reached");
            Ok(())
        });
    }
}

/// Write `contents` to `path`, creating parent directories as needed.
fn write_output(path: &Path, contents: &str) -> Result<(), AppError> {
    let to_error = |source| AppError::Output {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(to_error)?;
    }
    std::fs::write(path, contents).map_err(to_error)
}

/// Summarize the finished run at info level.
fn log_summary(
    simulation: &Simulation,
    final_state: &WorldState,
    topology: &TopologyMonitor,
    causal: &CausalChainObserver,
) -> Result<(), AppError> {
    info!(
        final_tick = final_state.tick,
        events = final_state.events.len(),
        active_entities = final_state.active_entities().count(),
        total_wealth = final_state.total_wealth(),
        rent_pool = final_state.economy.imperial_rent_pool,
        wage_rate = final_state.economy.current_super_wage_rate,
        "Simulation complete"
    );

    match simulation.context().terminal_outcome() {
        Some(outcome) => info!(outcome = ?outcome, "Terminal decision reached"),
        None => info!("No terminal decision within the run"),
    }

    info!(
        phase = ?topology.current_phase(),
        transitions = topology.transitions().len(),
        "Solidarity network"
    );
    for transition in topology.transitions() {
        info!(transition = %transition, "Phase transition");
    }

    if let Some(graph) = causal.graph() {
        info!(
            pattern = graph.pattern,
            ticks = ?graph.ticks,
            graph = graph.to_json()?,
            "Causal chain detected"
        );
    }
    Ok(())
}
