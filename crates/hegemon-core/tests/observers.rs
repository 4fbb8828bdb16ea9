//! Observer lifecycle and failure isolation through the facade.

#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::panic,
    clippy::arithmetic_side_effects
)]

use std::cell::RefCell;
use std::rc::Rc;

use hegemon_core::{
    CausalChainObserver, MetricsCollector, ObserverError, Simulation, SimulationObserver,
    TopologyMonitor, causal, scenarios,
};
use hegemon_systems::{GameDefines, SimulationConfig};
use hegemon_types::{EventKind, NetworkPhase, WorldState};

fn imperial() -> Simulation {
    Simulation::new(
        scenarios::imperial_circuit_scenario(),
        SimulationConfig::default(),
        GameDefines::default(),
    )
}

/// Fails every hook.
struct Broken;

impl SimulationObserver for Broken {
    fn name(&self) -> &'static str {
        "broken"
    }

    fn on_simulation_start(
        &mut self,
        _initial: &WorldState,
        _config: &SimulationConfig,
    ) -> Result<(), ObserverError> {
        Err(ObserverError::Failed {
            observer: "broken".to_owned(),
            message: "narrative backend offline".to_owned(),
        })
    }

    fn on_tick(&mut self, _previous: &WorldState, _current: &WorldState) -> Result<(), ObserverError> {
        Err(ObserverError::Failed {
            observer: "broken".to_owned(),
            message: "narrative backend offline".to_owned(),
        })
    }
}

/// Panics on every tick.
struct Panicky;

impl SimulationObserver for Panicky {
    fn name(&self) -> &'static str {
        "panicky"
    }

    fn on_tick(&mut self, _previous: &WorldState, _current: &WorldState) -> Result<(), ObserverError> {
        panic!("observer bug");
    }
}

/// Counts ticks it was shown.
#[derive(Default)]
struct Counter {
    ticks: u64,
}

impl SimulationObserver for Counter {
    fn name(&self) -> &'static str {
        "counter"
    }

    fn on_tick(&mut self, _previous: &WorldState, _current: &WorldState) -> Result<(), ObserverError> {
        self.ticks += 1;
        Ok(())
    }
}

#[test]
fn failing_and_panicking_observers_do_not_stop_the_run() {
    let counter = Rc::new(RefCell::new(Counter::default()));
    let mut sim = imperial();
    sim.add_observer(Broken);
    sim.add_observer(Panicky);
    sim.add_observer(Rc::clone(&counter));

    let final_tick = sim.run(10).unwrap().tick;
    sim.end();

    assert_eq!(final_tick, 10);
    // observers after the faulty ones still see every tick
    assert_eq!(counter.borrow().ticks, 10);
}

#[test]
fn faulty_observers_leave_the_trajectory_untouched() {
    let mut plain = imperial();
    plain.run(8).unwrap();

    let mut noisy = imperial();
    noisy.add_observer(Broken);
    noisy.add_observer(Panicky);
    noisy.run(8).unwrap();

    assert_eq!(plain.current_state(), noisy.current_state());
}

#[test]
fn failing_bus_subscribers_are_isolated() {
    let mut sim = imperial();
    sim.event_bus_mut()
        .subscribe(EventKind::Extraction, |_| Err(anyhow::anyhow!("subscriber down")));
    sim.event_bus_mut().subscribe_all(|_| panic!("subscriber bug"));
    let state = sim.run(3).unwrap();
    assert_eq!(state.tick, 3);
    assert!(state.events.iter().any(|e| e.kind() == EventKind::Extraction));
}

#[test]
fn builtin_observers_follow_a_full_run() {
    let metrics = Rc::new(RefCell::new(MetricsCollector::new()));
    let topology = Rc::new(RefCell::new(TopologyMonitor::new()));
    let chain = Rc::new(RefCell::new(CausalChainObserver::new()));

    let mut sim = imperial();
    sim.add_observer(Rc::clone(&metrics));
    sim.add_observer(Rc::clone(&topology));
    sim.add_observer(Rc::clone(&chain));
    sim.run(12).unwrap();
    sim.end();

    let metrics = metrics.borrow();
    assert_eq!(metrics.history().len(), 13);
    assert_eq!(metrics.latest().map(|m| m.tick), Some(12));
    let emitted: usize = metrics.history().iter().map(|m| m.events_this_tick).sum();
    assert_eq!(emitted, sim.current_state().events.len());
    assert!(metrics.to_json().is_ok());

    let topology = topology.borrow();
    assert_eq!(topology.history().len(), 13);
    // C007 -> C001 is the only live bond among five active classes
    assert_eq!(topology.history()[0].largest_component, 2);
    assert_eq!(topology.history()[0].phase, NetworkPhase::Transitional);

    assert!(chain.borrow().window().len() <= causal::WINDOW_SIZE);
}
