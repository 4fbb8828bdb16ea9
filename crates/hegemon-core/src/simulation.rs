//! Multi-tick facade over the engine.
//!
//! [`Simulation`] owns everything a run needs between ticks: the current
//! snapshot, the tunables, the [`CrossTickContext`], a persistent
//! [`EventBus`], and the registered observers. Observer hooks are the only
//! place errors are swallowed: a failing or panicking observer is logged
//! with `warn!` and the run carries on.

use std::panic::{AssertUnwindSafe, catch_unwind};

use hegemon_systems::{CrossTickContext, EventBus, GameDefines, SimulationConfig};
use hegemon_types::WorldState;
use tracing::{info, warn};

use crate::engine::SimulationEngine;
use crate::error::{EngineError, ObserverError};
use crate::observer::SimulationObserver;

/// A running simulation.
pub struct Simulation {
    state: WorldState,
    config: SimulationConfig,
    defines: GameDefines,
    context: CrossTickContext,
    engine: SimulationEngine,
    bus: EventBus,
    observers: Vec<Box<dyn SimulationObserver>>,
    history: Option<Vec<WorldState>>,
    started: bool,
    ended: bool,
}

impl core::fmt::Debug for Simulation {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let observers: Vec<&str> = self.observers.iter().map(|o| o.name()).collect();
        f.debug_struct("Simulation")
            .field("tick", &self.state.tick)
            .field("engine", &self.engine)
            .field("observers", &observers)
            .field("started", &self.started)
            .field("ended", &self.ended)
            .finish_non_exhaustive()
    }
}

impl Simulation {
    /// A simulation starting from `initial` with the standard pipeline.
    pub fn new(initial: WorldState, config: SimulationConfig, defines: GameDefines) -> Self {
        Self {
            state: initial,
            config,
            defines,
            context: CrossTickContext::new(),
            engine: SimulationEngine::new(),
            bus: EventBus::new(),
            observers: Vec::new(),
            history: None,
            started: false,
            ended: false,
        }
    }

    /// Replace the system pipeline.
    #[must_use]
    pub fn with_engine(mut self, engine: SimulationEngine) -> Self {
        self.engine = engine;
        self
    }

    /// Keep a copy of every snapshot, starting with the current one.
    #[must_use]
    pub fn with_history(mut self) -> Self {
        self.history = Some(vec![self.state.clone()]);
        self
    }

    /// Register an observer. Observers are notified in registration order.
    pub fn add_observer<O: SimulationObserver + 'static>(&mut self, observer: O) {
        info!(observer = observer.name(), "observer registered");
        self.observers.push(Box::new(observer));
    }

    /// Number of registered observers.
    pub fn observer_count(&self) -> usize {
        self.observers.len()
    }

    /// The bus systems publish on; subscriptions persist across ticks.
    pub const fn event_bus_mut(&mut self) -> &mut EventBus {
        &mut self.bus
    }

    /// The snapshot the next tick will advance.
    pub const fn current_state(&self) -> &WorldState {
        &self.state
    }

    /// Retained snapshots, oldest first. Empty unless history was enabled.
    pub fn history(&self) -> &[WorldState] {
        self.history.as_deref().unwrap_or_default()
    }

    /// Cross-tick memory.
    pub const fn context(&self) -> &CrossTickContext {
        &self.context
    }

    /// Mutable cross-tick memory, for forcing crises in experiments.
    pub const fn context_mut(&mut self) -> &mut CrossTickContext {
        &mut self.context
    }

    /// Imperial-circuit coefficients of this run.
    pub const fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Per-system tunables of this run.
    pub const fn defines(&self) -> &GameDefines {
        &self.defines
    }

    /// Whether [`end`](Self::end) has been called.
    pub const fn is_ended(&self) -> bool {
        self.ended
    }

    /// Advance one tick and notify observers.
    ///
    /// The first call notifies `on_simulation_start` before advancing. On
    /// error the current snapshot is unchanged and observers are not told.
    pub fn step(&mut self) -> Result<&WorldState, EngineError> {
        self.start();
        let next = self.engine.step_with_bus(
            &self.state,
            &self.config,
            &mut self.context,
            &self.defines,
            &mut self.bus,
        )?;
        let previous = std::mem::replace(&mut self.state, next);
        if let Some(history) = &mut self.history {
            history.push(self.state.clone());
        }
        let current = &self.state;
        notify(&mut self.observers, "on_tick", |observer| {
            observer.on_tick(&previous, current)
        });
        Ok(&self.state)
    }

    /// Advance `ticks` ticks, stopping at the first error.
    pub fn run(&mut self, ticks: u64) -> Result<&WorldState, EngineError> {
        for _ in 0..ticks {
            self.step()?;
        }
        Ok(&self.state)
    }

    /// Notify `on_simulation_end`. Later calls do nothing.
    pub fn end(&mut self) -> &WorldState {
        if !self.ended {
            self.start();
            self.ended = true;
            info!(tick = self.state.tick, "simulation ended");
            let current = &self.state;
            notify(&mut self.observers, "on_simulation_end", |observer| {
                observer.on_simulation_end(current)
            });
        }
        &self.state
    }

    fn start(&mut self) {
        if self.started {
            return;
        }
        self.started = true;
        info!(tick = self.state.tick, observers = self.observers.len(), "simulation started");
        let (current, config) = (&self.state, &self.config);
        notify(&mut self.observers, "on_simulation_start", |observer| {
            observer.on_simulation_start(current, config)
        });
    }
}

/// Run one hook on every observer, logging failures and panics.
fn notify<F>(observers: &mut [Box<dyn SimulationObserver>], hook: &'static str, mut call: F)
where
    F: FnMut(&mut dyn SimulationObserver) -> Result<(), ObserverError>,
{
    for observer in observers.iter_mut() {
        let name = observer.name();
        match catch_unwind(AssertUnwindSafe(|| call(observer.as_mut()))) {
            Ok(Ok(())) => {}
            Ok(Err(err)) => warn!(observer = name, hook, error = %err, "observer failed"),
            Err(_) => warn!(observer = name, hook, "observer panicked"),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use hegemon_types::{EdgeType, EventKind, Relationship, SocialClass, SocialRole};

    fn two_classes() -> WorldState {
        WorldState::new()
            .with_entity(
                SocialClass::new("C001", "Workers", SocialRole::PeripheryProletariat)
                    .with_wealth(100.0),
            )
            .with_entity(SocialClass::new("C002", "Owners", SocialRole::Comprador))
            .with_relationship(Relationship::new("C001", "C002", EdgeType::Exploitation))
    }

    fn simulation() -> Simulation {
        Simulation::new(two_classes(), SimulationConfig::default(), GameDefines::default())
    }

    #[derive(Debug, Default)]
    struct Lifecycle {
        starts: u32,
        ticks: Vec<(u64, u64)>,
        ends: u32,
    }

    impl SimulationObserver for Lifecycle {
        fn name(&self) -> &'static str {
            "lifecycle"
        }

        fn on_simulation_start(
            &mut self,
            _initial: &WorldState,
            _config: &SimulationConfig,
        ) -> Result<(), ObserverError> {
            self.starts = self.starts.saturating_add(1);
            Ok(())
        }

        fn on_tick(&mut self, previous: &WorldState, current: &WorldState) -> Result<(), ObserverError> {
            self.ticks.push((previous.tick, current.tick));
            Ok(())
        }

        fn on_simulation_end(&mut self, _final_state: &WorldState) -> Result<(), ObserverError> {
            self.ends = self.ends.saturating_add(1);
            Ok(())
        }
    }

    #[test]
    fn lifecycle_hooks_fire_in_order() {
        let lifecycle = Rc::new(RefCell::new(Lifecycle::default()));
        let mut sim = simulation();
        sim.add_observer(Rc::clone(&lifecycle));
        assert!(sim.run(3).is_ok());
        sim.end();
        sim.end();

        let seen = lifecycle.borrow();
        assert_eq!(seen.starts, 1);
        assert_eq!(seen.ticks, vec![(0, 1), (1, 2), (2, 3)]);
        assert_eq!(seen.ends, 1);
        assert!(sim.is_ended());
    }

    #[test]
    fn history_is_opt_in() {
        let mut sim = simulation();
        assert!(sim.run(2).is_ok());
        assert!(sim.history().is_empty());

        let mut sim = simulation().with_history();
        assert!(sim.run(2).is_ok());
        let ticks: Vec<u64> = sim.history().iter().map(|s| s.tick).collect();
        assert_eq!(ticks, vec![0, 1, 2]);
    }

    #[test]
    fn bus_subscriptions_persist_across_ticks() {
        let seen = Rc::new(RefCell::new(0_u32));
        let mut sim = simulation();
        let counter = Rc::clone(&seen);
        sim.event_bus_mut().subscribe(EventKind::Extraction, move |_| {
            *counter.borrow_mut() += 1;
            Ok(())
        });
        assert!(sim.run(3).is_ok());
        assert_eq!(*seen.borrow(), 3);
    }

    #[test]
    fn end_without_steps_still_starts() {
        let lifecycle = Rc::new(RefCell::new(Lifecycle::default()));
        let mut sim = simulation();
        sim.add_observer(Rc::clone(&lifecycle));
        let final_tick = sim.end().tick;
        assert_eq!(final_tick, 0);
        assert_eq!(lifecycle.borrow().starts, 1);
        assert_eq!(lifecycle.borrow().ends, 1);
    }
}
