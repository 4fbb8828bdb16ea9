//! Tick orchestration: the only way a [`WorldState`] advances.
//!
//! Each call to [`SimulationEngine::step`] runs the same sequence:
//!
//! 1. **Project** -- build a fresh [`WorkingGraph`] from the snapshot.
//! 2. **Systems** -- run every registered [`System`] once, in order.
//! 3. **Drain** -- collect the events published on the bus this tick.
//! 4. **Log** -- append them to the typed event list and the text log.
//! 5. **Reconstruct** -- freeze the graph into a new snapshot at `tick + 1`.
//!
//! A failing system aborts the tick. The working graph is dropped, pending
//! events are discarded, and the cross-tick context is restored to what it
//! was on entry, so the caller is left exactly where it started.
//!
//! [`WorkingGraph`]: hegemon_graph::WorkingGraph

use hegemon_graph::{into_state, project};
use hegemon_systems::{
    ConsciousnessSystem, ContradictionSystem, ControlRatioSystem, CrossTickContext,
    DecompositionSystem, EconomicCircuit, EventBus, GameDefines, SimulationConfig,
    SolidaritySystem, StepContext, StruggleSystem, SurvivalSystem, System, TerritorySystem,
    VitalitySystem,
};
use hegemon_types::WorldState;
use tracing::{debug, info, warn};

use crate::error::EngineError;

/// An ordered pipeline of systems.
pub struct SimulationEngine {
    systems: Vec<Box<dyn System>>,
}

impl core::fmt::Debug for SimulationEngine {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("SimulationEngine")
            .field("systems", &self.system_names())
            .finish()
    }
}

impl Default for SimulationEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl SimulationEngine {
    /// The standard pipeline, in causal order.
    pub fn new() -> Self {
        Self::with_systems(Self::default_systems())
    }

    /// An engine running exactly `systems`, in the given order.
    pub fn with_systems(systems: Vec<Box<dyn System>>) -> Self {
        Self { systems }
    }

    /// The ten domain systems in the order they must run.
    ///
    /// Extraction must happen before consciousness reads wealth changes,
    /// survival before struggle reads probabilities, and decomposition
    /// before the control ratio counts prisoners.
    pub fn default_systems() -> Vec<Box<dyn System>> {
        vec![
            Box::new(EconomicCircuit),
            Box::new(SolidaritySystem),
            Box::new(ConsciousnessSystem),
            Box::new(SurvivalSystem),
            Box::new(StruggleSystem),
            Box::new(ContradictionSystem),
            Box::new(TerritorySystem),
            Box::new(VitalitySystem),
            Box::new(DecompositionSystem),
            Box::new(ControlRatioSystem),
        ]
    }

    /// Names of the registered systems, in run order.
    pub fn system_names(&self) -> Vec<&'static str> {
        self.systems.iter().map(|s| s.name()).collect()
    }

    /// Advance `state` by one tick with a throwaway event bus.
    pub fn step(
        &self,
        state: &WorldState,
        config: &SimulationConfig,
        context: &mut CrossTickContext,
        defines: &GameDefines,
    ) -> Result<WorldState, EngineError> {
        let mut bus = EventBus::new();
        self.step_with_bus(state, config, context, defines, &mut bus)
    }

    /// Advance `state` by one tick, publishing on a caller-owned bus.
    ///
    /// Subscriptions registered on `bus` persist across calls. The bus is
    /// always left with no pending events.
    pub fn step_with_bus(
        &self,
        state: &WorldState,
        config: &SimulationConfig,
        context: &mut CrossTickContext,
        defines: &GameDefines,
        bus: &mut EventBus,
    ) -> Result<WorldState, EngineError> {
        let tick = state.tick;
        info!(tick, entities = state.entities.len(), "tick started");

        let checkpoint = context.clone();
        let mut graph = project(state);
        for system in &self.systems {
            debug!(tick, system = system.name(), "running system");
            let mut ctx = StepContext {
                tick,
                config,
                defines,
                cross_tick: &mut *context,
                bus: &mut *bus,
            };
            if let Err(source) = system.step(&mut graph, &mut ctx) {
                warn!(tick, system = system.name(), error = %source, "tick aborted");
                let _ = bus.drain();
                *context = checkpoint;
                return Err(EngineError::System {
                    system: system.name(),
                    tick,
                    source,
                });
            }
        }

        let new_events = bus.drain();
        let metadata = graph.metadata_mut();
        let mut event_log = std::mem::take(&mut metadata.event_log);
        let mut events = std::mem::take(&mut metadata.events);
        event_log.reserve(new_events.len());
        events.reserve(new_events.len());
        for event in &new_events {
            event_log.push(event.to_string());
        }
        let emitted = new_events.len();
        events.extend(new_events);

        let next = into_state(graph, tick.saturating_add(1), Some(event_log), Some(events));
        info!(tick = next.tick, events = emitted, "tick completed");
        Ok(next)
    }
}

/// Advance `state` by one tick through the standard pipeline.
pub fn step(
    state: &WorldState,
    config: &SimulationConfig,
    context: &mut CrossTickContext,
    defines: &GameDefines,
) -> Result<WorldState, EngineError> {
    SimulationEngine::new().step(state, config, context, defines)
}

/// [`step`] on a caller-owned bus.
pub fn step_with_bus(
    state: &WorldState,
    config: &SimulationConfig,
    context: &mut CrossTickContext,
    defines: &GameDefines,
    bus: &mut EventBus,
) -> Result<WorldState, EngineError> {
    SimulationEngine::new().step_with_bus(state, config, context, defines, bus)
}
