//! Consciousness transmission along solidarity edges.
//!
//! Consciousness flows from the more conscious end of a solidarity edge to
//! the less conscious end, proportional to edge strength and the gap. All
//! deltas are computed from the start-of-phase values and applied together,
//! so edge order never changes the result.

use std::collections::BTreeMap;

use hegemon_graph::WorkingGraph;
use hegemon_types::{EdgeType, EntityId, SimulationEvent};
use tracing::info;

use crate::error::SystemError;
use crate::system::{StepContext, System};
use crate::util::unit;

/// Spreads class consciousness across solidarity bonds.
#[derive(Debug, Clone, Copy, Default)]
pub struct SolidaritySystem;

impl System for SolidaritySystem {
    fn name(&self) -> &'static str {
        "solidarity_transmission"
    }

    fn step(&self, graph: &mut WorkingGraph, ctx: &mut StepContext<'_>) -> Result<(), SystemError> {
        let defines = ctx.defines.solidarity;
        let mut gains: BTreeMap<EntityId, f64> = BTreeMap::new();
        let mut transmissions = Vec::new();

        for index in graph.edge_indices(EdgeType::Solidarity) {
            let Some(edge) = graph.edge(index) else {
                continue;
            };
            let strength = edge.solidarity_strength;
            if strength <= 0.0 {
                continue;
            }
            let (Some(source), Some(target)) =
                (graph.entity(&edge.source_id), graph.entity(&edge.target_id))
            else {
                continue;
            };
            if !source.active || !target.active {
                continue;
            }
            let gap = source.ideology.class_consciousness - target.ideology.class_consciousness;
            if gap <= 0.0 {
                continue;
            }

            let delta = defines.transmission_rate * strength * gap;
            let gain = gains.entry(target.id.clone()).or_insert(0.0);
            *gain += delta;
            if delta >= defines.min_transmission {
                transmissions.push((index, source.id.clone(), target.id.clone(), delta));
            }
        }

        for (index, source_id, target_id, delta) in transmissions {
            if let Some(edge) = graph.edge_mut(index) {
                edge.value_flow = delta;
            }
            ctx.bus.publish(SimulationEvent::ConsciousnessTransmission {
                tick: ctx.tick,
                source_id,
                target_id,
                delta,
            });
        }

        for (id, gain) in gains {
            let entity = graph
                .require_entity_mut(&id)
                .map_err(|e| SystemError::graph(self.name(), e))?;
            let before = entity.ideology.class_consciousness;
            let after = unit(before + gain);
            entity.ideology.class_consciousness = after;

            let threshold = defines.mass_awakening_threshold;
            if before < threshold && after >= threshold {
                info!(tick = ctx.tick, entity = %id, consciousness = after, "mass awakening");
                ctx.bus.publish(SimulationEvent::MassAwakening {
                    tick: ctx.tick,
                    entity_id: id,
                    class_consciousness: after,
                });
            }
        }
        Ok(())
    }
}
