//! Sparks, uprisings, and the solidarity they forge.
//!
//! An exploited class facing heavy repression while agitated produces a
//! spark. If revolt now looks like a better survival bet than acquiescence,
//! the spark becomes an uprising: organization rises, some wealth is
//! destroyed in the fighting, and every solidarity bond touching the class
//! strengthens.

use hegemon_graph::WorkingGraph;
use hegemon_types::{EdgeType, SimulationEvent, SocialRole};
use tracing::info;

use crate::error::SystemError;
use crate::system::{StepContext, System};
use crate::util::unit;

/// Detects sparks and escalates them into uprisings.
#[derive(Debug, Clone, Copy, Default)]
pub struct StruggleSystem;

impl System for StruggleSystem {
    fn name(&self) -> &'static str {
        "struggle"
    }

    fn step(&self, graph: &mut WorkingGraph, ctx: &mut StepContext<'_>) -> Result<(), SystemError> {
        let defines = ctx.defines.struggle;

        for id in graph.entity_ids() {
            let entity = graph
                .require_entity_mut(&id)
                .map_err(|e| SystemError::graph(self.name(), e))?;
            let exploited = matches!(
                entity.role,
                SocialRole::PeripheryProletariat | SocialRole::InternalProletariat
            );
            if !entity.active || !exploited {
                continue;
            }
            let repression = entity.repression_faced;
            let agitation = entity.ideology.agitation;
            if repression < defines.spark_repression_threshold
                || agitation < defines.spark_agitation_threshold
            {
                continue;
            }

            ctx.bus.publish(SimulationEvent::Spark {
                tick: ctx.tick,
                entity_id: id.clone(),
                repression,
                agitation,
            });

            if entity.p_revolution <= entity.p_acquiescence {
                continue;
            }
            entity.organization = unit(entity.organization + defines.uprising_organization_boost);
            entity.wealth = (entity.wealth * (1.0 - defines.uprising_wealth_loss)).max(0.0);
            let (p_revolution, p_acquiescence) = (entity.p_revolution, entity.p_acquiescence);

            info!(tick = ctx.tick, entity = %id, p_revolution, p_acquiescence, "uprising");
            ctx.bus.publish(SimulationEvent::Uprising {
                tick: ctx.tick,
                entity_id: id.clone(),
                p_revolution,
                p_acquiescence,
            });

            let mut edges_strengthened: u32 = 0;
            let mut total_gain = 0.0;
            for index in graph.edge_indices(EdgeType::Solidarity) {
                let Some(edge) = graph.edge_mut(index) else {
                    continue;
                };
                if edge.source_id != id && edge.target_id != id {
                    continue;
                }
                let before = edge.solidarity_strength;
                edge.solidarity_strength = unit(before + defines.solidarity_gain);
                total_gain += edge.solidarity_strength - before;
                edges_strengthened = edges_strengthened.saturating_add(1);
            }
            if edges_strengthened > 0 {
                ctx.bus.publish(SimulationEvent::SolidaritySpike {
                    tick: ctx.tick,
                    entity_id: id,
                    edges_strengthened,
                    total_gain,
                });
            }
        }
        Ok(())
    }
}
