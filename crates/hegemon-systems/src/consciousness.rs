//! Consciousness bifurcation under economic crisis.
//!
//! A class that loses a large enough share of its wealth between ticks
//! becomes agitated. Where does that agitation go? If solidarity edges bring
//! class-conscious influence in, agitation becomes class consciousness;
//! otherwise it becomes national identity, amplified by loss aversion.
//!
//! ```text
//! loss_ratio = (previous - wealth) / previous
//! pressure   = sum(incoming solidarity strength * source consciousness)
//! pressure > 0  => consciousness += agitation * routing_rate * min(pressure, 1)
//! pressure == 0 => national_identity += agitation * routing_rate * loss_aversion
//! ```

use hegemon_graph::WorkingGraph;
use hegemon_types::EdgeType;
use tracing::debug;

use crate::error::SystemError;
use crate::system::{StepContext, System};
use crate::util::unit;

/// Routes crisis agitation into class consciousness or national identity.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsciousnessSystem;

impl System for ConsciousnessSystem {
    fn name(&self) -> &'static str {
        "consciousness"
    }

    fn step(&self, graph: &mut WorkingGraph, ctx: &mut StepContext<'_>) -> Result<(), SystemError> {
        let defines = ctx.defines.consciousness;

        for id in graph.entity_ids() {
            let Some(entity) = graph.entity(&id) else {
                continue;
            };
            if !entity.active {
                continue;
            }
            let wealth = entity.wealth;

            let loss_ratio = ctx
                .cross_tick
                .previous_wealth
                .get(&id)
                .copied()
                .filter(|&previous| previous > 0.0 && wealth < previous)
                .map(|previous| (previous - wealth) / previous);
            let crisis = loss_ratio.filter(|&ratio| ratio >= defines.crisis_threshold);

            let pressure: f64 = graph
                .incoming(&id, EdgeType::Solidarity)
                .filter_map(|edge| {
                    graph
                        .entity(&edge.source_id)
                        .filter(|source| source.active)
                        .map(|source| edge.solidarity_strength * source.ideology.class_consciousness)
                })
                .sum();

            let entity = graph
                .require_entity_mut(&id)
                .map_err(|e| SystemError::graph(self.name(), e))?;
            let ideology = &mut entity.ideology;

            if let Some(ratio) = crisis {
                ideology.agitation = unit(ideology.agitation + ratio * defines.agitation_gain);
                if pressure > 0.0 {
                    ideology.class_consciousness +=
                        ideology.agitation * defines.routing_rate * pressure.min(1.0);
                } else {
                    ideology.national_identity +=
                        ideology.agitation * defines.routing_rate * defines.loss_aversion;
                }
                debug!(
                    tick = ctx.tick,
                    entity = %id,
                    loss_ratio = ratio,
                    pressure,
                    "crisis agitation routed"
                );
            } else {
                ideology.agitation *= 1.0 - defines.agitation_decay;
            }

            ideology.class_consciousness -= defines.baseline_drift;
            ideology.national_identity -= defines.baseline_drift;
            ideology.clamp();

            ctx.cross_tick.previous_wealth.insert(id, wealth);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::Harness;
    use hegemon_graph::project;
    use hegemon_types::{NodeId, Relationship, SocialClass, SocialRole, WorldState};

    fn two_workers() -> WorldState {
        WorldState::new()
            .with_entity(
                SocialClass::new("C001", "Organizer", SocialRole::PeripheryProletariat)
                    .with_wealth(10.0)
                    .with_consciousness(0.9),
            )
            .with_entity(
                SocialClass::new("C002", "Connected", SocialRole::PeripheryProletariat)
                    .with_wealth(50.0)
                    .with_consciousness(0.2),
            )
            .with_entity(
                SocialClass::new("C003", "Isolated", SocialRole::PeripheryProletariat)
                    .with_wealth(50.0)
                    .with_consciousness(0.2),
            )
            .with_relationship(
                Relationship::new("C001", "C002", EdgeType::Solidarity).with_strength(0.9),
            )
    }

    fn seed_previous(harness: &mut Harness) {
        for id in ["C001", "C002", "C003"] {
            harness.cross_tick.previous_wealth.insert(NodeId::from(id), 100.0);
        }
    }

    #[test]
    fn first_observation_is_never_a_crisis() {
        let mut graph = project(&two_workers());
        let mut harness = Harness::new();
        assert!(harness.run(&ConsciousnessSystem, &mut graph, 0).is_ok());
        let isolated = graph.entity(&NodeId::from("C003"));
        assert!(isolated.is_some_and(|e| e.ideology.agitation < 1e-12));
        assert_eq!(harness.cross_tick.previous_wealth.len(), 3);
    }

    #[test]
    fn solidarity_routes_crisis_into_class_consciousness() {
        let mut graph = project(&two_workers());
        let mut harness = Harness::new();
        seed_previous(&mut harness);
        assert!(harness.run(&ConsciousnessSystem, &mut graph, 1).is_ok());

        let connected = graph.entity(&NodeId::from("C002")).map(|e| e.ideology);
        let isolated = graph.entity(&NodeId::from("C003")).map(|e| e.ideology);
        let (Some(connected), Some(isolated)) = (connected, isolated) else {
            return;
        };
        assert!(connected.class_consciousness > isolated.class_consciousness);
        assert!(isolated.national_identity > connected.national_identity);
        assert!(connected.agitation > 0.0);
    }

    #[test]
    fn calm_ticks_decay_agitation() {
        let mut state = two_workers();
        if let Some(worker) = state.entities.get_mut(&NodeId::from("C003")) {
            worker.ideology.agitation = 0.5;
        }
        let mut graph = project(&state);
        let mut harness = Harness::new();
        harness.cross_tick.previous_wealth.insert(NodeId::from("C003"), 50.0);
        assert!(harness.run(&ConsciousnessSystem, &mut graph, 1).is_ok());
        let agitation = graph.entity(&NodeId::from("C003")).map(|e| e.ideology.agitation);
        assert!(agitation.is_some_and(|a| (a - 0.45).abs() < 1e-9));
    }
}
