//! Tick orchestration, observers, and the run facade for the Hegemon
//! simulation.
//!
//! [`step`] is the sole way a [`WorldState`] advances: it projects the
//! snapshot into a working graph, runs the ten domain systems in causal
//! order, appends the tick's events to the log, and freezes the result at
//! `tick + 1`. [`Simulation`] wraps it for multi-tick runs with observers.
//!
//! # Modules
//!
//! - [`causal`] -- Shock-doctrine chain detection.
//! - [`config`] -- Loading `hegemon-config.yaml` into [`HegemonConfig`].
//! - [`engine`] -- [`SimulationEngine`] and the [`step`] entry points.
//! - [`error`] -- [`EngineError`] and [`ObserverError`].
//! - [`metrics`] -- Per-tick aggregates.
//! - [`observer`] -- The [`SimulationObserver`] trait.
//! - [`scenarios`] -- Starting worlds.
//! - [`simulation`] -- The [`Simulation`] facade.
//! - [`topology`] -- Solidarity-network percolation.
//!
//! [`WorldState`]: hegemon_types::WorldState

pub mod causal;
pub mod config;
pub mod engine;
pub mod error;
pub mod metrics;
pub mod observer;
pub mod scenarios;
pub mod simulation;
pub mod topology;

pub use causal::{CausalChainObserver, CausalEdge, CausalGraph, CausalNode, CausalSnapshot};
pub use config::{ConfigError, HegemonConfig, LoggingConfig, RunConfig};
pub use engine::{SimulationEngine, step, step_with_bus};
pub use error::{EngineError, ObserverError};
pub use metrics::{MetricsCollector, TickMetrics};
pub use observer::{SimulationObserver, tick_events};
pub use simulation::Simulation;
pub use topology::{TopologyMonitor, TopologyReading};
