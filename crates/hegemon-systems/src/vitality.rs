//! Subsistence burn and death.
//!
//! Every living class consumes a fixed amount of wealth per tick, scaled by
//! its subsistence multiplier. A class whose remaining wealth is strictly
//! below its consumption needs (`s_bio + s_class`) dies: it is deactivated,
//! never removed.

use hegemon_graph::WorkingGraph;
use hegemon_types::SimulationEvent;
use tracing::info;

use crate::error::SystemError;
use crate::system::{StepContext, System};

/// Burns subsistence and deactivates classes that cannot meet their needs.
#[derive(Debug, Clone, Copy, Default)]
pub struct VitalitySystem;

impl System for VitalitySystem {
    fn name(&self) -> &'static str {
        "vitality"
    }

    fn step(&self, graph: &mut WorkingGraph, ctx: &mut StepContext<'_>) -> Result<(), SystemError> {
        let base = ctx.defines.vitality.base_subsistence;
        for id in graph.entity_ids() {
            let entity = graph
                .require_entity_mut(&id)
                .map_err(|e| SystemError::graph(self.name(), e))?;
            if !entity.active {
                continue;
            }
            entity.wealth = (entity.wealth - base * entity.subsistence_multiplier).max(0.0);

            let needs = entity.consumption_needs();
            if entity.wealth < needs {
                entity.active = false;
                info!(tick = ctx.tick, entity = %id, wealth = entity.wealth, needs, "class died");
                ctx.bus.publish(SimulationEvent::EntityDeath {
                    tick: ctx.tick,
                    entity_id: id,
                    wealth: entity.wealth,
                    consumption_needs: needs,
                });
            }
        }
        Ok(())
    }
}
