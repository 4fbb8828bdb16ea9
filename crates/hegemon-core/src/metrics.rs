//! Per-tick aggregate metrics for analysis and dashboards.

use std::collections::BTreeMap;

use hegemon_systems::SimulationConfig;
use hegemon_types::{SocialRole, WorldState};
use serde::Serialize;

use crate::error::ObserverError;
use crate::observer::{SimulationObserver, tick_events};

/// Aggregates read off one snapshot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TickMetrics {
    /// Snapshot tick.
    pub tick: u64,
    /// Number of living classes.
    pub active_entities: usize,
    /// Wealth held by living classes.
    pub total_wealth: f64,
    /// Wealth of living classes grouped by role.
    pub wealth_by_role: BTreeMap<SocialRole, f64>,
    /// Mean class consciousness of living classes.
    pub mean_consciousness: f64,
    /// Mean national identity of living classes.
    pub mean_national_identity: f64,
    /// Imperial rent pool.
    pub rent_pool: f64,
    /// Super-wage rate.
    pub wage_rate: f64,
    /// Events emitted by the tick that produced this snapshot.
    pub events_this_tick: usize,
}

impl TickMetrics {
    /// Compute metrics for `state`, counting `events_this_tick` new events.
    pub fn from_state(state: &WorldState, events_this_tick: usize) -> Self {
        let mut wealth_by_role: BTreeMap<SocialRole, f64> = BTreeMap::new();
        let mut active_entities = 0_usize;
        let mut consciousness = 0.0;
        let mut national_identity = 0.0;
        for entity in state.active_entities() {
            active_entities = active_entities.saturating_add(1);
            *wealth_by_role.entry(entity.role).or_default() += entity.wealth;
            consciousness += entity.ideology.class_consciousness;
            national_identity += entity.ideology.national_identity;
        }
        #[allow(clippy::cast_precision_loss)]
        let count = active_entities.max(1) as f64;

        Self {
            tick: state.tick,
            active_entities,
            total_wealth: state.total_wealth(),
            wealth_by_role,
            mean_consciousness: consciousness / count,
            mean_national_identity: national_identity / count,
            rent_pool: state.economy.imperial_rent_pool,
            wage_rate: state.economy.current_super_wage_rate,
            events_this_tick,
        }
    }
}

/// Collects [`TickMetrics`] for every snapshot of a run.
#[derive(Debug, Clone, Default)]
pub struct MetricsCollector {
    history: Vec<TickMetrics>,
}

impl MetricsCollector {
    /// An empty collector.
    pub fn new() -> Self {
        Self::default()
    }

    /// Every row collected, oldest first.
    pub fn history(&self) -> &[TickMetrics] {
        &self.history
    }

    /// The most recent row.
    pub fn latest(&self) -> Option<&TickMetrics> {
        self.history.last()
    }

    /// Append a row.
    pub fn record(&mut self, metrics: TickMetrics) {
        self.history.push(metrics);
    }

    /// The whole history as a pretty-printed JSON array.
    pub fn to_json(&self) -> Result<String, ObserverError> {
        Ok(serde_json::to_string_pretty(&self.history)?)
    }
}

impl SimulationObserver for MetricsCollector {
    fn name(&self) -> &'static str {
        "metrics"
    }

    fn on_simulation_start(
        &mut self,
        initial: &WorldState,
        _config: &SimulationConfig,
    ) -> Result<(), ObserverError> {
        self.record(TickMetrics::from_state(initial, 0));
        Ok(())
    }

    fn on_tick(&mut self, previous: &WorldState, current: &WorldState) -> Result<(), ObserverError> {
        let emitted = tick_events(previous, current).len();
        self.record(TickMetrics::from_state(current, emitted));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hegemon_types::SocialClass;

    fn society() -> WorldState {
        WorldState::new()
            .with_entity(
                SocialClass::new("C001", "Workers", SocialRole::PeripheryProletariat)
                    .with_wealth(10.0)
                    .with_consciousness(0.8),
            )
            .with_entity(
                SocialClass::new("C002", "Aristocracy", SocialRole::LaborAristocracy)
                    .with_wealth(30.0)
                    .with_national_identity(0.6),
            )
            .with_entity(
                SocialClass::new("C003", "Dormant", SocialRole::InternalProletariat)
                    .with_wealth(500.0)
                    .dormant(),
            )
    }

    #[test]
    fn aggregates_living_classes_only() {
        let metrics = TickMetrics::from_state(&society(), 3);
        assert_eq!(metrics.active_entities, 2);
        assert!((metrics.total_wealth - 40.0).abs() < 1e-9);
        assert!((metrics.mean_consciousness - 0.4).abs() < 1e-9);
        assert!((metrics.mean_national_identity - 0.3).abs() < 1e-9);
        assert_eq!(metrics.wealth_by_role.get(&SocialRole::InternalProletariat), None);
        assert_eq!(metrics.events_this_tick, 3);
    }

    #[test]
    fn empty_world_has_zero_means() {
        let metrics = TickMetrics::from_state(&WorldState::new(), 0);
        assert_eq!(metrics.active_entities, 0);
        assert!(metrics.mean_consciousness.abs() < f64::EPSILON);
    }

    #[test]
    fn json_export_is_an_array() {
        let mut collector = MetricsCollector::new();
        let state = society();
        assert!(collector.on_simulation_start(&state, &SimulationConfig::default()).is_ok());
        assert!(collector.on_tick(&state, &state).is_ok());
        assert_eq!(collector.history().len(), 2);
        let json = collector.to_json();
        assert!(json.is_ok_and(|j| j.trim_start().starts_with('[') && j.contains("wealth_by_role")));
    }
}
