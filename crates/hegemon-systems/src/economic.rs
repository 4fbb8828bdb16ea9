//! The imperial circuit: extraction, tribute, wages, and client-state subsidy.
//!
//! Wealth flows in four tiers each tick:
//!
//! ```text
//! periphery worker --exploitation--> comprador --tribute--> core bourgeoisie
//!                                                             |        |
//!                                        labor aristocracy <--wages    client_state--> comprador
//! ```
//!
//! The first three phases only move wealth and are audited for conservation.
//! The subsidy phase burns core wealth into comprador repression capacity.
//! Afterwards the economy record is updated and the dynamic wage rate reacts
//! to whether the rent pool grew or shrank.

use hegemon_graph::WorkingGraph;
use hegemon_types::{EdgeType, EntityId, SimulationEvent, SocialRole};
use tracing::{debug, info, warn};

use crate::conservation::{ConservationResult, total_wealth, verify_conservation};
use crate::error::SystemError;
use crate::system::{StepContext, System};
use crate::util::unit;

/// Wage rates within this distance of the floor count as at the floor.
const FLOOR_EPSILON: f64 = 1e-9;

/// Runs the four-tier value flow and updates the economy record.
#[derive(Debug, Clone, Copy, Default)]
pub struct EconomicCircuit;

impl System for EconomicCircuit {
    fn name(&self) -> &'static str {
        "economic_circuit"
    }

    fn step(&self, graph: &mut WorkingGraph, ctx: &mut StepContext<'_>) -> Result<(), SystemError> {
        let before = total_wealth(graph);

        let rent_pool = self.extract(graph, ctx)?;
        self.collect_tribute(graph, ctx)?;
        self.pay_wages(graph, ctx)?;

        let after = total_wealth(graph);
        let tolerance = ctx.defines.economy.conservation_tolerance;
        if let ConservationResult::Violated { before, after } =
            verify_conservation(before, after, tolerance)
        {
            return Err(SystemError::ConservationViolated {
                tick: ctx.tick,
                before,
                after,
            });
        }

        self.subsidize(graph, ctx)?;
        update_economy(graph, ctx, rent_pool);
        Ok(())
    }
}

impl EconomicCircuit {
    /// Phase 1: move imperial rent along exploitation edges.
    ///
    /// Returns the total rent extracted this tick.
    fn extract(&self, graph: &mut WorkingGraph, ctx: &mut StepContext<'_>) -> Result<f64, SystemError> {
        let mut pool = 0.0;
        for index in graph.edge_indices(EdgeType::Exploitation) {
            let Some((source_id, target_id)) = endpoints(graph, index) else {
                continue;
            };
            let source = graph
                .require_entity(&source_id)
                .map_err(|e| SystemError::graph(self.name(), e))?;
            let target_active = graph
                .require_entity(&target_id)
                .map_err(|e| SystemError::graph(self.name(), e))?
                .active;
            if !source.active || !target_active {
                continue;
            }

            let adjusted =
                unit(source.ideology.class_consciousness * ctx.config.consciousness_resistance);
            let rent = (ctx.config.extraction_efficiency * source.wealth * (1.0 - adjusted))
                .min(source.wealth)
                .max(0.0);

            self.transfer(graph, &source_id, &target_id, rent)?;
            if let Some(edge) = graph.edge_mut(index) {
                edge.value_flow = rent;
            }
            pool += rent;

            ctx.bus.publish(SimulationEvent::Extraction {
                tick: ctx.tick,
                source_id,
                target_id,
                amount: rent,
            });
        }
        Ok(pool)
    }

    /// Phase 2: compradors keep their cut and forward the rest to the core.
    fn collect_tribute(
        &self,
        graph: &mut WorkingGraph,
        ctx: &mut StepContext<'_>,
    ) -> Result<(), SystemError> {
        for index in graph.edge_indices(EdgeType::Tribute) {
            let Some((source_id, target_id)) = endpoints(graph, index) else {
                continue;
            };
            let source = graph
                .require_entity(&source_id)
                .map_err(|e| SystemError::graph(self.name(), e))?;
            if !source.active {
                continue;
            }
            let retained = source.wealth * ctx.config.comprador_cut;
            let amount = source.wealth - retained;
            if amount <= 0.0 {
                continue;
            }

            self.transfer(graph, &source_id, &target_id, amount)?;
            if let Some(edge) = graph.edge_mut(index) {
                edge.value_flow = amount;
            }

            ctx.bus.publish(SimulationEvent::Tribute {
                tick: ctx.tick,
                source_id,
                target_id,
                amount,
                retained,
            });
        }
        Ok(())
    }

    /// Phase 3: each core class pays super-wages to its labor aristocracy.
    ///
    /// The wage bill is split evenly across the payer's eligible wage edges.
    /// Edges targeting any other role never receive wages.
    fn pay_wages(&self, graph: &mut WorkingGraph, ctx: &mut StepContext<'_>) -> Result<(), SystemError> {
        let rate = graph.economy().current_super_wage_rate;
        let wage_edges = graph.edge_indices(EdgeType::Wages);

        let mut payers: Vec<EntityId> = Vec::new();
        for &index in &wage_edges {
            if let Some((source_id, _)) = endpoints(graph, index) {
                if !payers.contains(&source_id) {
                    payers.push(source_id);
                }
            }
        }

        for payer_id in payers {
            let payer = graph
                .require_entity(&payer_id)
                .map_err(|e| SystemError::graph(self.name(), e))?;
            if !payer.active {
                continue;
            }
            let wage_bill = rate * payer.wealth;

            let mut eligible = Vec::new();
            for &index in &wage_edges {
                let Some((source_id, target_id)) = endpoints(graph, index) else {
                    continue;
                };
                if source_id != payer_id {
                    continue;
                }
                let target = graph
                    .require_entity(&target_id)
                    .map_err(|e| SystemError::graph(self.name(), e))?;
                if target.role != SocialRole::LaborAristocracy {
                    warn!(
                        tick = ctx.tick,
                        source = %payer_id,
                        target = %target_id,
                        role = %target.role,
                        "wage edge does not target a labor aristocracy; skipping"
                    );
                    continue;
                }
                if target.active {
                    eligible.push((index, target_id));
                }
            }

            let Some(share) = split(wage_bill, eligible.len()) else {
                continue;
            };
            for (index, target_id) in eligible {
                self.transfer(graph, &payer_id, &target_id, share)?;
                if let Some(edge) = graph.edge_mut(index) {
                    edge.value_flow = share;
                }
                ctx.bus.publish(SimulationEvent::Wages {
                    tick: ctx.tick,
                    source_id: payer_id.clone(),
                    target_id,
                    amount: share,
                });
            }
        }
        Ok(())
    }

    /// Phase 4: the core props up client regimes facing revolt.
    fn subsidize(&self, graph: &mut WorkingGraph, ctx: &mut StepContext<'_>) -> Result<(), SystemError> {
        for index in graph.edge_indices(EdgeType::ClientState) {
            let Some((source_id, target_id)) = endpoints(graph, index) else {
                continue;
            };
            let cap = graph.edge(index).map_or(0.0, |e| e.subsidy_cap);
            let client = graph
                .require_entity(&target_id)
                .map_err(|e| SystemError::graph(self.name(), e))?;
            if !client.active {
                continue;
            }
            let threatened = client.p_revolution
                > ctx.config.subsidy_trigger_threshold * client.p_acquiescence;
            if !threatened {
                continue;
            }

            let patron = graph
                .require_entity_mut(&source_id)
                .map_err(|e| SystemError::graph(self.name(), e))?;
            if !patron.active {
                continue;
            }
            let amount = cap.min(patron.wealth).max(0.0);
            if amount <= 0.0 {
                continue;
            }
            patron.wealth -= amount;

            let repression_boost = amount * ctx.config.subsidy_conversion_rate;
            let client = graph
                .require_entity_mut(&target_id)
                .map_err(|e| SystemError::graph(self.name(), e))?;
            client.repression_faced = unit(client.repression_faced + repression_boost);
            if let Some(edge) = graph.edge_mut(index) {
                edge.value_flow = amount;
            }

            debug!(tick = ctx.tick, patron = %source_id, client = %target_id, amount, "subsidy paid");
            ctx.bus.publish(SimulationEvent::Subsidy {
                tick: ctx.tick,
                source_id,
                target_id,
                amount,
                repression_boost,
            });
        }
        Ok(())
    }

    /// Move wealth between two classes.
    fn transfer(
        &self,
        graph: &mut WorkingGraph,
        from: &EntityId,
        to: &EntityId,
        amount: f64,
    ) -> Result<(), SystemError> {
        let source = graph
            .require_entity_mut(from)
            .map_err(|e| SystemError::graph(self.name(), e))?;
        source.wealth -= amount;
        let target = graph
            .require_entity_mut(to)
            .map_err(|e| SystemError::graph(self.name(), e))?;
        target.wealth += amount;
        Ok(())
    }
}

/// Record the rent pool and move the dynamic wage rate.
///
/// A shrinking pool cuts wages by one step down to the floor; otherwise
/// wages recover one step toward the baseline. Hitting the floor while the
/// pool shrinks raises the wage-crisis signal once.
fn update_economy(graph: &mut WorkingGraph, ctx: &mut StepContext<'_>, rent_pool: f64) {
    let config = ctx.config;
    let previous_pool = ctx.cross_tick.previous_rent_pool;
    let economy = graph.economy_mut();
    let rate = economy.current_super_wage_rate;

    let contracting = previous_pool.is_some_and(|previous| rent_pool < previous);
    let new_rate = if contracting {
        (rate - config.wage_cut_step).max(config.min_wage_rate)
    } else {
        (rate + config.wage_cut_step).min(config.super_wage_rate)
    };

    economy.imperial_rent_pool = rent_pool;
    economy.total_extracted += rent_pool;
    economy.current_super_wage_rate = new_rate;
    ctx.cross_tick.previous_rent_pool = Some(rent_pool);

    let at_floor = new_rate <= config.min_wage_rate + FLOOR_EPSILON;
    if contracting && at_floor && ctx.cross_tick.wage_crisis.is_none() {
        ctx.cross_tick.wage_crisis = Some(ctx.tick);
        info!(
            tick = ctx.tick,
            rent_pool,
            wage_rate = new_rate,
            "wage floor reached during rent contraction"
        );
        ctx.bus.publish(SimulationEvent::EconomicCrisis {
            tick: ctx.tick,
            rent_pool,
            previous_rent_pool: previous_pool.unwrap_or(rent_pool),
            wage_rate: new_rate,
        });
    }
}

/// Source and target of the edge at `index`.
fn endpoints(graph: &WorkingGraph, index: usize) -> Option<(EntityId, EntityId)> {
    graph
        .edge(index)
        .map(|edge| (edge.source_id.clone(), edge.target_id.clone()))
}

/// Divide `total` evenly across `parts`, or `None` when there is nothing to split.
fn split(total: f64, parts: usize) -> Option<f64> {
    let count = u32::try_from(parts).ok().filter(|&n| n > 0)?;
    Some(total / f64::from(count))
}
