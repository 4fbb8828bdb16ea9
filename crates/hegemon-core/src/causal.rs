//! Shock-doctrine pattern detection.
//!
//! [`CausalChainObserver`] keeps a rolling window of the last
//! [`WINDOW_SIZE`] ticks and looks for the three-step chain
//!
//! ```text
//! rent pool drops >= 20%  ->  super-wage rate falls  ->  revolution risk rises
//! ```
//!
//! across any three consecutive snapshots in the window. The first match is
//! frozen into a [`CausalGraph`] for the narrative layer; after that the
//! observer stays silent until [`reset`](CausalChainObserver::reset).

use std::collections::VecDeque;

use hegemon_types::WorldState;
use serde::Serialize;
use tracing::info;

use crate::error::ObserverError;
use crate::observer::SimulationObserver;

/// Number of snapshots retained.
pub const WINDOW_SIZE: usize = 5;

/// Minimum relative rent-pool drop that counts as a shock.
pub const SHOCK_THRESHOLD: f64 = 0.2;

/// Pattern label attached to every detected graph.
pub const SHOCK_DOCTRINE: &str = "shock_doctrine";

/// The economy readings the detector tracks for one tick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CausalSnapshot {
    /// Snapshot tick.
    pub tick: u64,
    /// Imperial rent pool.
    pub rent_pool: f64,
    /// Super-wage rate.
    pub wage_rate: f64,
    /// Highest revolution probability among living classes.
    pub max_p_revolution: f64,
}

impl CausalSnapshot {
    /// Read the tracked values off a snapshot.
    pub fn of(state: &WorldState) -> Self {
        Self {
            tick: state.tick,
            rent_pool: state.economy.imperial_rent_pool,
            wage_rate: state.economy.current_super_wage_rate,
            max_p_revolution: state.max_p_revolution(),
        }
    }
}

/// One link in a detected chain.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CausalNode {
    /// Node identifier within the graph.
    pub id: String,
    /// What happened.
    pub label: String,
    /// Tick the change was observed at.
    pub tick: u64,
    /// Value before the change.
    pub before: f64,
    /// Value after the change.
    pub after: f64,
}

/// A directed cause-effect relation between two nodes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CausalEdge {
    /// Cause node id.
    pub source: String,
    /// Effect node id.
    pub target: String,
    /// Relation label.
    pub relation: String,
}

/// Structured payload describing a detected causal chain.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CausalGraph {
    /// Pattern name.
    pub pattern: String,
    /// Chain links in causal order.
    pub nodes: Vec<CausalNode>,
    /// Relations between consecutive links.
    pub edges: Vec<CausalEdge>,
    /// Ticks of the three snapshots the chain spans.
    pub ticks: Vec<u64>,
}

impl CausalGraph {
    /// Serialize the graph for the narrative layer.
    pub fn to_json(&self) -> Result<String, ObserverError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Detects one shock-doctrine chain per armed lifetime.
#[derive(Debug, Clone, Default)]
pub struct CausalChainObserver {
    window: VecDeque<CausalSnapshot>,
    detected: Option<CausalGraph>,
}

impl CausalChainObserver {
    /// An armed observer with an empty window.
    pub fn new() -> Self {
        Self::default()
    }

    /// The detected chain, if any.
    pub const fn graph(&self) -> Option<&CausalGraph> {
        self.detected.as_ref()
    }

    /// Whether a chain has been detected.
    pub const fn has_fired(&self) -> bool {
        self.detected.is_some()
    }

    /// The current rolling window, oldest first.
    pub const fn window(&self) -> &VecDeque<CausalSnapshot> {
        &self.window
    }

    /// Forget the window and any detected chain, re-arming the detector.
    pub fn reset(&mut self) {
        self.window.clear();
        self.detected = None;
    }

    /// Push a snapshot and scan the window. Returns the graph on first match.
    pub fn record(&mut self, snapshot: CausalSnapshot) -> Option<&CausalGraph> {
        if self.detected.is_some() {
            return None;
        }
        if self.window.len() == WINDOW_SIZE {
            self.window.pop_front();
        }
        self.window.push_back(snapshot);

        let window: Vec<CausalSnapshot> = self.window.iter().copied().collect();
        let found = window.windows(3).find_map(|triple| match triple {
            [a, b, c] => detect(a, b, c),
            _ => None,
        });
        if let Some(graph) = found {
            info!(ticks = ?graph.ticks, pattern = %graph.pattern, "causal chain detected");
            self.detected = Some(graph);
            return self.detected.as_ref();
        }
        None
    }
}

impl SimulationObserver for CausalChainObserver {
    fn name(&self) -> &'static str {
        "causal_chain"
    }

    fn on_simulation_start(
        &mut self,
        initial: &WorldState,
        _config: &hegemon_systems::SimulationConfig,
    ) -> Result<(), ObserverError> {
        self.record(CausalSnapshot::of(initial));
        Ok(())
    }

    fn on_tick(&mut self, _previous: &WorldState, current: &WorldState) -> Result<(), ObserverError> {
        self.record(CausalSnapshot::of(current));
        Ok(())
    }
}

/// Match the chain across three consecutive snapshots.
fn detect(a: &CausalSnapshot, b: &CausalSnapshot, c: &CausalSnapshot) -> Option<CausalGraph> {
    if a.rent_pool <= 0.0 {
        return None;
    }
    let drop = (a.rent_pool - b.rent_pool) / a.rent_pool;
    if drop < SHOCK_THRESHOLD || c.wage_rate >= b.wage_rate || c.max_p_revolution <= b.max_p_revolution
    {
        return None;
    }

    let nodes = vec![
        CausalNode {
            id: "rent_shock".to_owned(),
            label: format!("imperial rent pool fell {:.0}%", drop * 100.0),
            tick: b.tick,
            before: a.rent_pool,
            after: b.rent_pool,
        },
        CausalNode {
            id: "wage_cut".to_owned(),
            label: "super-wages cut".to_owned(),
            tick: c.tick,
            before: b.wage_rate,
            after: c.wage_rate,
        },
        CausalNode {
            id: "revolutionary_pressure".to_owned(),
            label: "revolution probability rose".to_owned(),
            tick: c.tick,
            before: b.max_p_revolution,
            after: c.max_p_revolution,
        },
    ];
    let edges = vec![
        CausalEdge {
            source: "rent_shock".to_owned(),
            target: "wage_cut".to_owned(),
            relation: "forces".to_owned(),
        },
        CausalEdge {
            source: "wage_cut".to_owned(),
            target: "revolutionary_pressure".to_owned(),
            relation: "radicalizes".to_owned(),
        },
    ];
    Some(CausalGraph {
        pattern: SHOCK_DOCTRINE.to_owned(),
        nodes,
        edges,
        ticks: vec![a.tick, b.tick, c.tick],
    })
}
