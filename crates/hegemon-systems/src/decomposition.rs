//! Labor-aristocracy decomposition after the wage crisis.
//!
//! Once super-wages hit their floor, the labor aristocracy can no longer be
//! bought off. Each one splits: a share becomes carceral enforcers, the rest
//! falls into the internal proletariat. The decomposing class is deactivated
//! and its `decomposition` latch fires so it never splits twice.

use hegemon_graph::WorkingGraph;
use hegemon_types::{EntityId, SimulationEvent, SocialRole};
use tracing::info;

use crate::error::SystemError;
use crate::system::{StepContext, System};
use crate::util::portion;

/// Splits labor aristocracies into enforcers and internal proletariat.
#[derive(Debug, Clone, Copy, Default)]
pub struct DecompositionSystem;

impl System for DecompositionSystem {
    fn name(&self) -> &'static str {
        "decomposition"
    }

    fn step(&self, graph: &mut WorkingGraph, ctx: &mut StepContext<'_>) -> Result<(), SystemError> {
        if ctx.cross_tick.wage_crisis.is_none() {
            return Ok(());
        }
        let fraction = ctx.defines.decomposition.enforcer_fraction;
        let enforcer_id = first_of_role(graph, SocialRole::CarceralEnforcer);
        let proletariat_id = first_of_role(graph, SocialRole::InternalProletariat);

        let candidates: Vec<EntityId> = graph
            .entities()
            .filter(|e| {
                e.role == SocialRole::LaborAristocracy && e.active && e.decomposition.is_dormant()
            })
            .map(|e| e.id.clone())
            .collect();

        for id in candidates {
            let class = graph
                .require_entity_mut(&id)
                .map_err(|e| SystemError::graph(self.name(), e))?;
            let population = class.population;
            let wealth = class.wealth;
            class.population = 0;
            class.wealth = 0.0;
            class.active = false;
            class.decomposition.trigger(ctx.tick);

            let enforcer_population = portion(population, fraction);
            let proletariat_population = population.saturating_sub(enforcer_population);
            let enforcer_wealth = wealth * fraction;
            let proletariat_wealth = wealth - enforcer_wealth;

            let mut wealth_transferred = 0.0;
            if let Some(target) = &enforcer_id {
                wealth_transferred += self.receive(graph, target, enforcer_population, enforcer_wealth)?;
            }
            if let Some(target) = &proletariat_id {
                wealth_transferred +=
                    self.receive(graph, target, proletariat_population, proletariat_wealth)?;
            }

            info!(
                tick = ctx.tick,
                entity = %id,
                enforcer_population,
                proletariat_population,
                "labor aristocracy decomposed"
            );
            ctx.bus.publish(SimulationEvent::ClassDecomposition {
                tick: ctx.tick,
                source_id: id,
                enforcer_id: enforcer_id.clone(),
                proletariat_id: proletariat_id.clone(),
                enforcer_population,
                proletariat_population,
                wealth_transferred,
            });
            if ctx.cross_tick.decomposition_tick.is_none() {
                ctx.cross_tick.decomposition_tick = Some(ctx.tick);
            }
        }
        Ok(())
    }
}

impl DecompositionSystem {
    /// Add population and wealth to a target class, activating it.
    ///
    /// Returns the wealth received.
    fn receive(
        &self,
        graph: &mut WorkingGraph,
        target: &EntityId,
        population: u64,
        wealth: f64,
    ) -> Result<f64, SystemError> {
        let class = graph
            .require_entity_mut(target)
            .map_err(|e| SystemError::graph(self.name(), e))?;
        class.population = class.population.saturating_add(population);
        class.wealth += wealth;
        class.active = true;
        Ok(wealth)
    }
}

/// The lowest-id class with `role`, living or dormant.
fn first_of_role(graph: &WorkingGraph, role: SocialRole) -> Option<EntityId> {
    graph.entities().find(|e| e.role == role).map(|e| e.id.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::Harness;
    use hegemon_graph::project;
    use hegemon_types::{EventKind, NodeId, SocialClass, WorldState};

    fn core_society(with_enforcers: bool) -> WorldState {
        let mut state = WorldState::new()
            .with_entity(
                SocialClass::new("C004", "Labor aristocracy", SocialRole::LaborAristocracy)
                    .with_wealth(100.0)
                    .with_population(1_000),
            )
            .with_entity(
                SocialClass::new("C006", "Internal proletariat", SocialRole::InternalProletariat)
                    .with_population(0)
                    .dormant(),
            );
        if with_enforcers {
            state = state.with_entity(
                SocialClass::new("C005", "Carceral enforcers", SocialRole::CarceralEnforcer)
                    .with_population(0)
                    .dormant(),
            );
        }
        state
    }

    #[test]
    fn nothing_happens_before_the_wage_crisis() {
        let mut graph = project(&core_society(true));
        let mut harness = Harness::new();
        assert!(harness.run(&DecompositionSystem, &mut graph, 0).is_ok());
        assert!(harness.bus.pending().is_empty());
        assert!(harness.cross_tick.decomposition_tick.is_none());
    }

    #[test]
    fn split_follows_enforcer_fraction() {
        let mut graph = project(&core_society(true));
        let mut harness = Harness::new();
        harness.cross_tick.wage_crisis = Some(4);
        assert!(harness.run(&DecompositionSystem, &mut graph, 5).is_ok());

        let enforcers = graph.entity(&NodeId::from("C005"));
        let prisoners = graph.entity(&NodeId::from("C006"));
        assert!(enforcers.is_some_and(|e| e.active && e.population == 300));
        assert!(prisoners.is_some_and(|e| e.active && e.population == 700));
        assert!(prisoners.is_some_and(|e| (e.wealth - 70.0).abs() < 1e-9));
        let aristocracy = graph.entity(&NodeId::from("C004"));
        assert!(aristocracy.is_some_and(|e| !e.active && e.decomposition.fired_at() == Some(5)));
        assert_eq!(harness.cross_tick.decomposition_tick, Some(5));

        assert!(harness.run(&DecompositionSystem, &mut graph, 6).is_ok());
        assert_eq!(harness.count(EventKind::ClassDecomposition), 1);
    }

    #[test]
    fn missing_enforcer_class_forfeits_its_share() {
        let mut graph = project(&core_society(false));
        let mut harness = Harness::new();
        harness.cross_tick.wage_crisis = Some(0);
        assert!(harness.run(&DecompositionSystem, &mut graph, 0).is_ok());
        let transferred = harness.bus.pending().iter().find_map(|event| match event {
            SimulationEvent::ClassDecomposition {
                wealth_transferred,
                enforcer_id,
                ..
            } => Some((*wealth_transferred, enforcer_id.is_none())),
            _ => None,
        });
        assert!(transferred.is_some_and(|(w, missing)| missing && (w - 70.0).abs() < 1e-9));
    }
}
