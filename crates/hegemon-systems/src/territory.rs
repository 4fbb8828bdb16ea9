//! Territorial dynamics: heat, eviction, displacement, spillover, and the
//! necropolitical effect of sink territories.
//!
//! Phases run in order each tick:
//!
//! 1. **Heat** -- high-profile territories heat up, low-profile ones cool.
//! 2. **Eviction** -- heat at or above the threshold latches eviction. While
//!    latched, rent compounds and a share of the population is displaced to
//!    the highest-priority adjacent sink.
//! 3. **Spillover** -- heat bleeds across adjacency from hotter to cooler.
//! 4. **Necropolitics** -- camps shrink their population; penal colonies
//!    strip the organization of the classes housed in them.
//!
//! Displacements and spillover are accumulated and applied at the end of
//! their phase so the result does not depend on iteration order.

use std::collections::BTreeMap;

use hegemon_graph::WorkingGraph;
use hegemon_types::{
    EdgeType, OperationalProfile, SimulationEvent, TerritoryId, TerritoryType,
};
use tracing::{debug, info};

use crate::error::SystemError;
use crate::system::{StepContext, System};
use crate::util::{portion, unit};

/// Runs the four territorial phases.
#[derive(Debug, Clone, Copy, Default)]
pub struct TerritorySystem;

impl System for TerritorySystem {
    fn name(&self) -> &'static str {
        "territory"
    }

    fn step(&self, graph: &mut WorkingGraph, ctx: &mut StepContext<'_>) -> Result<(), SystemError> {
        let ids = graph.territory_ids();
        update_heat(graph, ctx, &ids);
        evict_and_displace(graph, ctx, &ids);
        spill_heat(graph, ctx);
        self.apply_necropolitics(graph, ctx, &ids)
    }
}

impl TerritorySystem {
    /// Phase 4: camps eliminate, penal colonies atomize, reservations hold.
    fn apply_necropolitics(
        &self,
        graph: &mut WorkingGraph,
        ctx: &StepContext<'_>,
        ids: &[TerritoryId],
    ) -> Result<(), SystemError> {
        let elimination_rate = ctx.defines.territory.elimination_rate;
        for id in ids {
            let Some(kind) = graph.territory(id).map(|t| t.territory_type) else {
                continue;
            };
            match kind {
                TerritoryType::ConcentrationCamp => {
                    let Some(camp) = graph.territory_mut(id) else {
                        continue;
                    };
                    let survivors = portion(camp.population, 1.0 - elimination_rate);
                    let eliminated = camp.population.saturating_sub(survivors);
                    camp.population = survivors;
                    if eliminated > 0 {
                        debug!(tick = ctx.tick, territory = %id, eliminated, "camp population reduced");
                    }
                }
                TerritoryType::PenalColony => {
                    let tenants: Vec<_> = graph
                        .neighbors(id, EdgeType::Tenancy)
                        .into_iter()
                        .filter(|tenant| graph.entity(tenant).is_some())
                        .collect();
                    for tenant in tenants {
                        let entity = graph
                            .require_entity_mut(&tenant)
                            .map_err(|e| SystemError::graph(self.name(), e))?;
                        entity.organization = 0.0;
                    }
                }
                TerritoryType::Reservation | TerritoryType::Core | TerritoryType::Periphery => {}
            }
        }
        Ok(())
    }
}

/// Phase 1: profile-driven heat change.
fn update_heat(graph: &mut WorkingGraph, ctx: &StepContext<'_>, ids: &[TerritoryId]) {
    let defines = ctx.defines.territory;
    for id in ids {
        if let Some(territory) = graph.territory_mut(id) {
            territory.heat = match territory.profile {
                OperationalProfile::HighProfile => unit(territory.heat + defines.heat_increment),
                OperationalProfile::LowProfile => unit(territory.heat * (1.0 - defines.heat_decay)),
            };
        }
    }
}

/// Phase 2: latch eviction, spike rent, and route displaced population.
fn evict_and_displace(graph: &mut WorkingGraph, ctx: &mut StepContext<'_>, ids: &[TerritoryId]) {
    let defines = ctx.defines.territory;
    let mut arrivals: BTreeMap<TerritoryId, u64> = BTreeMap::new();

    for id in ids {
        let sink = best_sink(graph, id);
        let Some(territory) = graph.territory_mut(id) else {
            continue;
        };

        if territory.heat >= defines.eviction_threshold && territory.eviction.trigger(ctx.tick) {
            info!(tick = ctx.tick, territory = %id, heat = territory.heat, "eviction latched");
            ctx.bus.publish(SimulationEvent::Eviction {
                tick: ctx.tick,
                territory_id: id.clone(),
                heat: territory.heat,
            });
        }
        if !territory.is_under_eviction() {
            continue;
        }

        territory.rent_level *= defines.rent_spike_multiplier;
        let displaced = portion(territory.population, defines.displacement_rate);
        if displaced == 0 {
            continue;
        }
        territory.population = territory.population.saturating_sub(displaced);

        match &sink {
            Some(sink_id) => {
                let slot = arrivals.entry(sink_id.clone()).or_insert(0);
                *slot = slot.saturating_add(displaced);
            }
            None => {
                debug!(tick = ctx.tick, territory = %id, displaced, "no adjacent sink; population discarded");
            }
        }
        ctx.bus.publish(SimulationEvent::Displacement {
            tick: ctx.tick,
            territory_id: id.clone(),
            sink_id: sink,
            displaced,
        });
    }

    for (sink_id, count) in arrivals {
        if let Some(sink) = graph.territory_mut(&sink_id) {
            sink.population = sink.population.saturating_add(count);
        }
    }
}

/// Highest-priority sink adjacent to `id` in either direction.
///
/// Ties go to the lowest id.
fn best_sink(graph: &WorkingGraph, id: &TerritoryId) -> Option<TerritoryId> {
    let mut best: Option<(u8, TerritoryId)> = None;
    for neighbor in graph.neighbors(id, EdgeType::Adjacency) {
        let Some(priority) = graph
            .territory(&neighbor)
            .and_then(|t| t.territory_type.sink_priority())
        else {
            continue;
        };
        let better = best.as_ref().is_none_or(|(current, _)| priority > *current);
        if better {
            best = Some((priority, neighbor));
        }
    }
    best.map(|(_, sink)| sink)
}

/// Phase 3: heat flows down positive gradients across adjacency.
fn spill_heat(graph: &mut WorkingGraph, ctx: &StepContext<'_>) {
    let rate = ctx.defines.territory.spillover_rate;
    let mut gains: BTreeMap<TerritoryId, f64> = BTreeMap::new();

    for edge in graph.edges().iter().filter(|e| e.edge_type == EdgeType::Adjacency) {
        let (Some(a), Some(b)) = (graph.territory(&edge.source_id), graph.territory(&edge.target_id))
        else {
            continue;
        };
        let (cold, gradient) = if a.heat > b.heat {
            (b, a.heat - b.heat)
        } else {
            (a, b.heat - a.heat)
        };
        if gradient <= 0.0 {
            continue;
        }
        let gain = gains.entry(cold.id.clone()).or_insert(0.0);
        *gain += rate * gradient;
    }

    for (id, gain) in gains {
        if let Some(territory) = graph.territory_mut(&id) {
            territory.heat = unit(territory.heat + gain);
        }
    }
}
