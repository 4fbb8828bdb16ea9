//! Tension accumulation on exploitation edges.
//!
//! Every tick an exploitation edge gains tension proportional to the wealth
//! gap between its endpoints. The first time tension reaches 1.0 the edge
//! ruptures; the latch holds forever after, so a saturated edge never
//! reports a second rupture.

use hegemon_graph::WorkingGraph;
use hegemon_types::{EdgeType, SimulationEvent};
use tracing::info;

use crate::error::SystemError;
use crate::system::{StepContext, System};
use crate::util::unit;

/// Accumulates tension and fires one-shot ruptures.
#[derive(Debug, Clone, Copy, Default)]
pub struct ContradictionSystem;

impl System for ContradictionSystem {
    fn name(&self) -> &'static str {
        "contradiction"
    }

    fn step(&self, graph: &mut WorkingGraph, ctx: &mut StepContext<'_>) -> Result<(), SystemError> {
        let rate = ctx.defines.contradiction.tension_accumulation_rate;

        for index in graph.edge_indices(EdgeType::Exploitation) {
            let Some(edge) = graph.edge(index) else {
                continue;
            };
            let source_wealth = graph
                .require_entity(&edge.source_id)
                .map_err(|e| SystemError::graph(self.name(), e))?
                .wealth;
            let target_wealth = graph
                .require_entity(&edge.target_id)
                .map_err(|e| SystemError::graph(self.name(), e))?
                .wealth;
            let gap = (source_wealth - target_wealth).abs();

            let Some(edge) = graph.edge_mut(index) else {
                continue;
            };
            edge.tension = unit(edge.tension + gap * rate);
            if edge.tension >= 1.0 && edge.rupture.trigger(ctx.tick) {
                info!(
                    tick = ctx.tick,
                    source = %edge.source_id,
                    target = %edge.target_id,
                    "exploitation edge ruptured"
                );
                ctx.bus.publish(SimulationEvent::Rupture {
                    tick: ctx.tick,
                    source_id: edge.source_id.clone(),
                    target_id: edge.target_id.clone(),
                    tension: edge.tension,
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::Harness;
    use hegemon_graph::project;
    use hegemon_types::{EventKind, Relationship, SocialClass, SocialRole, WorldState};

    fn exploited(gap: f64, tension: f64) -> WorldState {
        WorldState::new()
            .with_entity(
                SocialClass::new("C001", "Workers", SocialRole::PeripheryProletariat)
                    .with_wealth(gap),
            )
            .with_entity(SocialClass::new("C002", "Owners", SocialRole::Comprador))
            .with_relationship(
                Relationship::new("C001", "C002", EdgeType::Exploitation).with_tension(tension),
            )
    }

    fn tension(graph: &WorkingGraph) -> f64 {
        graph.edges().first().map_or(f64::NAN, |e| e.tension)
    }

    #[test]
    fn tension_grows_with_the_wealth_gap() {
        let mut graph = project(&exploited(10.0, 0.0));
        let mut harness = Harness::new();
        assert!(harness.run(&ContradictionSystem, &mut graph, 0).is_ok());
        assert!((tension(&graph) - 0.1).abs() < 1e-9);
        assert!(harness.bus.pending().is_empty());
    }

    #[test]
    fn rupture_fires_exactly_once() {
        let mut graph = project(&exploited(100.0, 0.5));
        let mut harness = Harness::new();
        for tick in 0..5 {
            assert!(harness.run(&ContradictionSystem, &mut graph, tick).is_ok());
            assert!(tension(&graph) <= 1.0);
        }
        assert_eq!(harness.count(EventKind::Rupture), 1);
        let latch = graph.edges().first().map(|e| e.rupture.fired_at());
        assert_eq!(latch, Some(Some(0)));
    }

    #[test]
    fn tension_never_decreases() {
        let mut graph = project(&exploited(0.0, 0.4));
        let mut harness = Harness::new();
        assert!(harness.run(&ContradictionSystem, &mut graph, 0).is_ok());
        assert!(tension(&graph) >= 0.4);
    }
}
