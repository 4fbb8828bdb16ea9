//! Survival calculus: how a class expects to survive.
//!
//! ```text
//! p_acquiescence = sigmoid(steepness * (wealth - subsistence_threshold))
//! p_revolution   = organization / (1 + repression_faced)
//! ```
//!
//! Both probabilities feed the client-state subsidy trigger and the
//! struggle system on the following phases.

use hegemon_graph::WorkingGraph;

use crate::error::SystemError;
use crate::system::{StepContext, System};
use crate::util::{sigmoid, unit};

/// Recomputes survival probabilities for every living class.
#[derive(Debug, Clone, Copy, Default)]
pub struct SurvivalSystem;

impl System for SurvivalSystem {
    fn name(&self) -> &'static str {
        "survival"
    }

    fn step(&self, graph: &mut WorkingGraph, ctx: &mut StepContext<'_>) -> Result<(), SystemError> {
        let steepness = ctx.defines.survival.steepness;
        for id in graph.entity_ids() {
            let entity = graph
                .require_entity_mut(&id)
                .map_err(|e| SystemError::graph(self.name(), e))?;
            if !entity.active {
                continue;
            }
            entity.p_acquiescence =
                sigmoid(steepness * (entity.wealth - entity.subsistence_threshold));
            entity.p_revolution = unit(entity.organization / (1.0 + entity.repression_faced));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::Harness;
    use hegemon_graph::project;
    use hegemon_types::{NodeId, SocialClass, SocialRole, WorldState};

    #[test]
    fn wealth_at_threshold_is_a_coin_flip() {
        let state = WorldState::new().with_entity(
            SocialClass::new("C001", "Workers", SocialRole::PeripheryProletariat)
                .with_wealth(0.3)
                .with_organization(0.6)
                .with_repression(0.5),
        );
        let mut graph = project(&state);
        let mut harness = Harness::new();
        assert!(harness.run(&SurvivalSystem, &mut graph, 0).is_ok());
        let worker = graph.entity(&NodeId::from("C001"));
        assert!(worker.is_some_and(|w| (w.p_acquiescence - 0.5).abs() < 1e-9));
        assert!(worker.is_some_and(|w| (w.p_revolution - 0.4).abs() < 1e-9));
    }

    #[test]
    fn dead_classes_keep_their_last_values() {
        let mut dead = SocialClass::new("C001", "Gone", SocialRole::Lumpenproletariat);
        dead.active = false;
        dead.p_revolution = 0.7;
        let mut graph = project(&WorldState::new().with_entity(dead));
        let mut harness = Harness::new();
        assert!(harness.run(&SurvivalSystem, &mut graph, 0).is_ok());
        let entity = graph.entity(&NodeId::from("C001"));
        assert!(entity.is_some_and(|e| (e.p_revolution - 0.7).abs() < 1e-12));
    }
}
