//! Read-only hooks into a simulation run.
//!
//! A [`SimulationObserver`] is notified once when a run starts, after every
//! committed tick, and once when the run ends. Observers never mutate the
//! world; anything they learn they keep to themselves. The
//! [`Simulation`](crate::Simulation) facade isolates their failures.
//!
//! Observers are owned by the facade. To read results back after the run,
//! register an `Rc<RefCell<T>>` and keep a clone of the handle.

use std::cell::RefCell;
use std::rc::Rc;

use hegemon_systems::SimulationConfig;
use hegemon_types::{SimulationEvent, WorldState};

use crate::error::ObserverError;

/// Lifecycle hooks for a simulation run.
///
/// Every hook defaults to a no-op.
pub trait SimulationObserver {
    /// Stable name used in logs.
    fn name(&self) -> &'static str;

    /// Called before the first tick is advanced.
    fn on_simulation_start(
        &mut self,
        _initial: &WorldState,
        _config: &SimulationConfig,
    ) -> Result<(), ObserverError> {
        Ok(())
    }

    /// Called after each committed tick with the snapshots on both sides.
    fn on_tick(&mut self, _previous: &WorldState, _current: &WorldState) -> Result<(), ObserverError> {
        Ok(())
    }

    /// Called once when the run is ended.
    fn on_simulation_end(&mut self, _final_state: &WorldState) -> Result<(), ObserverError> {
        Ok(())
    }
}

impl<T: SimulationObserver> SimulationObserver for Rc<RefCell<T>> {
    fn name(&self) -> &'static str {
        self.try_borrow().map_or("shared observer", |inner| inner.name())
    }

    fn on_simulation_start(
        &mut self,
        initial: &WorldState,
        config: &SimulationConfig,
    ) -> Result<(), ObserverError> {
        borrow(self)?.on_simulation_start(initial, config)
    }

    fn on_tick(&mut self, previous: &WorldState, current: &WorldState) -> Result<(), ObserverError> {
        borrow(self)?.on_tick(previous, current)
    }

    fn on_simulation_end(&mut self, final_state: &WorldState) -> Result<(), ObserverError> {
        borrow(self)?.on_simulation_end(final_state)
    }
}

fn borrow<T: SimulationObserver>(
    shared: &Rc<RefCell<T>>,
) -> Result<std::cell::RefMut<'_, T>, ObserverError> {
    shared.try_borrow_mut().map_err(|_| ObserverError::Busy {
        observer: shared.name().to_owned(),
    })
}

/// Events appended between two consecutive snapshots.
pub fn tick_events<'a>(previous: &WorldState, current: &'a WorldState) -> &'a [SimulationEvent] {
    current
        .events
        .get(previous.events.len()..)
        .unwrap_or_default()
}
