//! Percolation of the solidarity network.
//!
//! The monitor measures how much of the living population is joined into
//! one solidarity component and classifies the network:
//!
//! | Percolation ratio | Phase |
//! |-------------------|-------|
//! | `< 0.1` | [`NetworkPhase::Gaseous`] |
//! | `< 0.5` | [`NetworkPhase::Transitional`] |
//! | otherwise | [`NetworkPhase::Liquid`] |
//!
//! Phase changes are recorded as [`SimulationEvent::PhaseTransition`] values
//! held by the monitor. They never enter the world state; the event log
//! stays a record of what the systems did.

use std::collections::{BTreeMap, BTreeSet};

use hegemon_systems::SimulationConfig;
use hegemon_types::{EdgeType, EntityId, NetworkPhase, SimulationEvent, WorldState};
use tracing::info;

use crate::error::ObserverError;
use crate::observer::SimulationObserver;

/// Ratio below which the network is gaseous.
pub const GASEOUS_THRESHOLD: f64 = 0.1;

/// Ratio below which the network is transitional.
pub const LIQUID_THRESHOLD: f64 = 0.5;

/// One percolation reading.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TopologyReading {
    /// Snapshot tick.
    pub tick: u64,
    /// Largest component size over active population, in `[0, 1]`.
    pub percolation_ratio: f64,
    /// Size of the largest solidarity component.
    pub largest_component: usize,
    /// Classification of the ratio.
    pub phase: NetworkPhase,
}

/// Tracks the percolation phase of the solidarity network.
#[derive(Debug, Clone, Default)]
pub struct TopologyMonitor {
    history: Vec<TopologyReading>,
    transitions: Vec<SimulationEvent>,
}

impl TopologyMonitor {
    /// A monitor with no readings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Every reading taken, oldest first.
    pub fn history(&self) -> &[TopologyReading] {
        &self.history
    }

    /// Recorded phase changes.
    pub fn transitions(&self) -> &[SimulationEvent] {
        &self.transitions
    }

    /// Phase of the most recent reading.
    pub fn current_phase(&self) -> Option<NetworkPhase> {
        self.history.last().map(|r| r.phase)
    }

    /// Take a reading of `state`. A phase change against the previous
    /// reading is recorded as a transition stamped with `event_tick`.
    pub fn observe(&mut self, state: &WorldState, event_tick: u64) -> TopologyReading {
        let (largest_component, active) = largest_solidarity_component(state);
        #[allow(clippy::cast_precision_loss)]
        let percolation_ratio = if active == 0 {
            0.0
        } else {
            largest_component as f64 / active as f64
        };
        let reading = TopologyReading {
            tick: state.tick,
            percolation_ratio,
            largest_component,
            phase: classify(percolation_ratio),
        };

        if let Some(previous_phase) = self.current_phase().filter(|p| *p != reading.phase) {
            info!(
                tick = event_tick,
                %previous_phase,
                new_phase = %reading.phase,
                percolation_ratio,
                "solidarity network changed phase"
            );
            self.transitions.push(SimulationEvent::PhaseTransition {
                tick: event_tick,
                previous_phase,
                new_phase: reading.phase,
                percolation_ratio,
            });
        }
        self.history.push(reading);
        reading
    }
}

impl SimulationObserver for TopologyMonitor {
    fn name(&self) -> &'static str {
        "topology"
    }

    fn on_simulation_start(
        &mut self,
        initial: &WorldState,
        _config: &SimulationConfig,
    ) -> Result<(), ObserverError> {
        self.observe(initial, initial.tick);
        Ok(())
    }

    fn on_tick(&mut self, previous: &WorldState, current: &WorldState) -> Result<(), ObserverError> {
        self.observe(current, previous.tick);
        Ok(())
    }
}

/// Map a percolation ratio to its phase.
pub fn classify(ratio: f64) -> NetworkPhase {
    if ratio < GASEOUS_THRESHOLD {
        NetworkPhase::Gaseous
    } else if ratio < LIQUID_THRESHOLD {
        NetworkPhase::Transitional
    } else {
        NetworkPhase::Liquid
    }
}

/// Size of the largest component joined by live solidarity edges, and the
/// number of active classes.
fn largest_solidarity_component(state: &WorldState) -> (usize, usize) {
    let active: BTreeSet<&EntityId> = state.active_entities().map(|e| &e.id).collect();

    let mut adjacency: BTreeMap<&EntityId, Vec<&EntityId>> = BTreeMap::new();
    for edge in &state.relationships {
        if edge.edge_type != EdgeType::Solidarity || edge.solidarity_strength <= 0.0 {
            continue;
        }
        if !active.contains(&edge.source_id) || !active.contains(&edge.target_id) {
            continue;
        }
        adjacency.entry(&edge.source_id).or_default().push(&edge.target_id);
        adjacency.entry(&edge.target_id).or_default().push(&edge.source_id);
    }

    let mut visited: BTreeSet<&EntityId> = BTreeSet::new();
    let mut largest = 0;
    for &start in &active {
        if !visited.insert(start) {
            continue;
        }
        let mut size = 0_usize;
        let mut stack = vec![start];
        while let Some(node) = stack.pop() {
            size = size.saturating_add(1);
            for &next in adjacency.get(node).into_iter().flatten() {
                if visited.insert(next) {
                    stack.push(next);
                }
            }
        }
        largest = largest.max(size);
    }
    (largest, active.len())
}
