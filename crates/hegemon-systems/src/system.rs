//! The [`System`] trait every domain system implements.

use hegemon_graph::WorkingGraph;

use crate::bus::EventBus;
use crate::config::{GameDefines, SimulationConfig};
use crate::context::CrossTickContext;
use crate::error::SystemError;

/// Everything a system may read or write besides the graph.
#[derive(Debug)]
pub struct StepContext<'a> {
    /// Tick of the snapshot being advanced; stamped on every event.
    pub tick: u64,
    /// Imperial-circuit coefficients.
    pub config: &'a SimulationConfig,
    /// Per-system tunables.
    pub defines: &'a GameDefines,
    /// Memory carried between ticks.
    pub cross_tick: &'a mut CrossTickContext,
    /// Event channel for this tick.
    pub bus: &'a mut EventBus,
}

/// One stage of the tick pipeline.
///
/// Systems run once per tick in a fixed order. They mutate the working graph
/// and publish events; they perform no I/O.
pub trait System {
    /// Stable name used in logs and errors.
    fn name(&self) -> &'static str;

    /// Advance this system's slice of the world by one tick.
    fn step(&self, graph: &mut WorkingGraph, ctx: &mut StepContext<'_>) -> Result<(), SystemError>;
}
