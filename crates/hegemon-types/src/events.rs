//! The closed set of typed simulation events.
//!
//! Systems publish [`SimulationEvent`] values on the event bus during a tick;
//! the engine drains them into [`WorldState::events`](crate::WorldState) and
//! writes one plain-text line per event into the state's event log. The
//! event list is append-only: nothing ever truncates or reorders it.
//!
//! Every variant carries the tick it fired on plus kind-specific fields.
//! Subscriptions are keyed by [`EventKind`].

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::enums::{NetworkPhase, TerminalOutcome};
use crate::ids::{EntityId, NodeId, TerritoryId};

/// Discriminant of a [`SimulationEvent`], used for subscriptions and counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum EventKind {
    /// See [`SimulationEvent::Extraction`].
    Extraction,
    /// See [`SimulationEvent::Tribute`].
    Tribute,
    /// See [`SimulationEvent::Wages`].
    Wages,
    /// See [`SimulationEvent::Subsidy`].
    Subsidy,
    /// See [`SimulationEvent::EconomicCrisis`].
    EconomicCrisis,
    /// See [`SimulationEvent::ConsciousnessTransmission`].
    ConsciousnessTransmission,
    /// See [`SimulationEvent::MassAwakening`].
    MassAwakening,
    /// See [`SimulationEvent::Spark`].
    Spark,
    /// See [`SimulationEvent::Uprising`].
    Uprising,
    /// See [`SimulationEvent::SolidaritySpike`].
    SolidaritySpike,
    /// See [`SimulationEvent::Rupture`].
    Rupture,
    /// See [`SimulationEvent::PhaseTransition`].
    PhaseTransition,
    /// See [`SimulationEvent::ClassDecomposition`].
    ClassDecomposition,
    /// See [`SimulationEvent::ControlRatioCrisis`].
    ControlRatioCrisis,
    /// See [`SimulationEvent::TerminalDecision`].
    TerminalDecision,
    /// See [`SimulationEvent::EntityDeath`].
    EntityDeath,
    /// See [`SimulationEvent::Eviction`].
    Eviction,
    /// See [`SimulationEvent::Displacement`].
    Displacement,
}

/// A typed fact produced by the simulation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(tag = "event_type", rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum SimulationEvent {
    /// Imperial rent moved along an exploitation edge.
    Extraction {
        /// Tick of occurrence.
        tick: u64,
        /// Exploited class.
        source_id: EntityId,
        /// Extracting class.
        target_id: EntityId,
        /// Rent moved.
        amount: f64,
    },
    /// A comprador forwarded tribute to the core.
    Tribute {
        /// Tick of occurrence.
        tick: u64,
        /// Paying comprador.
        source_id: EntityId,
        /// Receiving core class.
        target_id: EntityId,
        /// Amount forwarded.
        amount: f64,
        /// Amount the comprador kept.
        retained: f64,
    },
    /// Super-wages paid to the labor aristocracy.
    Wages {
        /// Tick of occurrence.
        tick: u64,
        /// Paying core class.
        source_id: EntityId,
        /// Receiving labor aristocracy.
        target_id: EntityId,
        /// Amount paid.
        amount: f64,
    },
    /// The core subsidised a client regime's repression capacity.
    Subsidy {
        /// Tick of occurrence.
        tick: u64,
        /// Paying core class.
        source_id: EntityId,
        /// Receiving comprador.
        target_id: EntityId,
        /// Wealth spent by the core.
        amount: f64,
        /// Repression added to the comprador.
        repression_boost: f64,
    },
    /// Imperial rent contracted while wages sat at their floor.
    EconomicCrisis {
        /// Tick of occurrence.
        tick: u64,
        /// Rent pool this tick.
        rent_pool: f64,
        /// Rent pool on the previous tick.
        previous_rent_pool: f64,
        /// Super-wage rate after adjustment.
        wage_rate: f64,
    },
    /// Consciousness flowed along a solidarity edge.
    ConsciousnessTransmission {
        /// Tick of occurrence.
        tick: u64,
        /// Transmitting class.
        source_id: EntityId,
        /// Receiving class.
        target_id: EntityId,
        /// Consciousness gained by the target.
        delta: f64,
    },
    /// A class crossed the mass-awakening consciousness threshold.
    MassAwakening {
        /// Tick of occurrence.
        tick: u64,
        /// Awakened class.
        entity_id: EntityId,
        /// Consciousness after the crossing.
        class_consciousness: f64,
    },
    /// Repression met agitation and produced a spark.
    Spark {
        /// Tick of occurrence.
        tick: u64,
        /// Sparking class.
        entity_id: EntityId,
        /// Repression faced.
        repression: f64,
        /// Agitation at the time.
        agitation: f64,
    },
    /// A spark escalated into an uprising.
    Uprising {
        /// Tick of occurrence.
        tick: u64,
        /// Rising class.
        entity_id: EntityId,
        /// Survival probability through revolt.
        p_revolution: f64,
        /// Survival probability through acquiescence.
        p_acquiescence: f64,
    },
    /// Solidarity bonds around an uprising strengthened.
    SolidaritySpike {
        /// Tick of occurrence.
        tick: u64,
        /// Class at the centre of the spike.
        entity_id: EntityId,
        /// Number of solidarity edges strengthened.
        edges_strengthened: u32,
        /// Total strength added across those edges.
        total_gain: f64,
    },
    /// An exploitation edge's tension reached 1.0 for the first time.
    Rupture {
        /// Tick of occurrence.
        tick: u64,
        /// Edge source.
        source_id: NodeId,
        /// Edge target.
        target_id: NodeId,
        /// Tension at rupture.
        tension: f64,
    },
    /// The solidarity network changed percolation phase.
    PhaseTransition {
        /// Tick of occurrence.
        tick: u64,
        /// Phase before the change.
        previous_phase: NetworkPhase,
        /// Phase after the change.
        new_phase: NetworkPhase,
        /// Largest-component share of the active population.
        percolation_ratio: f64,
    },
    /// A labor aristocracy split into enforcers and internal proletariat.
    ClassDecomposition {
        /// Tick of occurrence.
        tick: u64,
        /// Decomposed class.
        source_id: EntityId,
        /// Enforcer class that received a share, if present.
        enforcer_id: Option<EntityId>,
        /// Internal proletariat that received a share, if present.
        proletariat_id: Option<EntityId>,
        /// Population moved to the enforcers.
        enforcer_population: u64,
        /// Population moved to the internal proletariat.
        proletariat_population: u64,
        /// Wealth moved to surviving targets.
        wealth_transferred: f64,
    },
    /// Prisoners outnumbered what the enforcers can hold.
    ControlRatioCrisis {
        /// Tick of occurrence.
        tick: u64,
        /// Internal proletariat population.
        prisoner_population: u64,
        /// Carceral enforcer population.
        enforcer_population: u64,
        /// Prisoners one enforcer can control.
        capacity_per_guard: u64,
    },
    /// The terminal bifurcation resolved.
    TerminalDecision {
        /// Tick of occurrence.
        tick: u64,
        /// Which branch the system took.
        outcome: TerminalOutcome,
        /// Population-weighted organization of the prisoner class.
        average_organization: f64,
    },
    /// A class could not meet its consumption needs and died.
    EntityDeath {
        /// Tick of occurrence.
        tick: u64,
        /// Deceased class.
        entity_id: EntityId,
        /// Wealth at death.
        wealth: f64,
        /// Consumption it could not meet.
        consumption_needs: f64,
    },
    /// A territory's heat latched the eviction pipeline.
    Eviction {
        /// Tick of occurrence.
        tick: u64,
        /// Territory under eviction.
        territory_id: TerritoryId,
        /// Heat at latch time.
        heat: f64,
    },
    /// Population displaced from an evicting territory.
    Displacement {
        /// Tick of occurrence.
        tick: u64,
        /// Territory people were displaced from.
        territory_id: TerritoryId,
        /// Sink that received them; `None` when no sink was adjacent.
        sink_id: Option<TerritoryId>,
        /// Number of people displaced.
        displaced: u64,
    },
}

impl SimulationEvent {
    /// The event's discriminant.
    pub const fn kind(&self) -> EventKind {
        match self {
            Self::Extraction { .. } => EventKind::Extraction,
            Self::Tribute { .. } => EventKind::Tribute,
            Self::Wages { .. } => EventKind::Wages,
            Self::Subsidy { .. } => EventKind::Subsidy,
            Self::EconomicCrisis { .. } => EventKind::EconomicCrisis,
            Self::ConsciousnessTransmission { .. } => EventKind::ConsciousnessTransmission,
            Self::MassAwakening { .. } => EventKind::MassAwakening,
            Self::Spark { .. } => EventKind::Spark,
            Self::Uprising { .. } => EventKind::Uprising,
            Self::SolidaritySpike { .. } => EventKind::SolidaritySpike,
            Self::Rupture { .. } => EventKind::Rupture,
            Self::PhaseTransition { .. } => EventKind::PhaseTransition,
            Self::ClassDecomposition { .. } => EventKind::ClassDecomposition,
            Self::ControlRatioCrisis { .. } => EventKind::ControlRatioCrisis,
            Self::TerminalDecision { .. } => EventKind::TerminalDecision,
            Self::EntityDeath { .. } => EventKind::EntityDeath,
            Self::Eviction { .. } => EventKind::Eviction,
            Self::Displacement { .. } => EventKind::Displacement,
        }
    }

    /// The tick the event fired on.
    pub const fn tick(&self) -> u64 {
        match self {
            Self::Extraction { tick, .. }
            | Self::Tribute { tick, .. }
            | Self::Wages { tick, .. }
            | Self::Subsidy { tick, .. }
            | Self::EconomicCrisis { tick, .. }
            | Self::ConsciousnessTransmission { tick, .. }
            | Self::MassAwakening { tick, .. }
            | Self::Spark { tick, .. }
            | Self::Uprising { tick, .. }
            | Self::SolidaritySpike { tick, .. }
            | Self::Rupture { tick, .. }
            | Self::PhaseTransition { tick, .. }
            | Self::ClassDecomposition { tick, .. }
            | Self::ControlRatioCrisis { tick, .. }
            | Self::TerminalDecision { tick, .. }
            | Self::EntityDeath { tick, .. }
            | Self::Eviction { tick, .. }
            | Self::Displacement { tick, .. } => *tick,
        }
    }
}

impl core::fmt::Display for SimulationEvent {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Extraction { tick, source_id, target_id, amount } => write!(
                f,
                "Tick {tick}: {target_id} extracted {amount:.2} in imperial rent from {source_id}"
            ),
            Self::Tribute { tick, source_id, target_id, amount, retained } => write!(
                f,
                "Tick {tick}: {source_id} paid {amount:.2} tribute to {target_id}, keeping {retained:.2}"
            ),
            Self::Wages { tick, source_id, target_id, amount } => write!(
                f,
                "Tick {tick}: {source_id} paid {amount:.2} in super-wages to {target_id}"
            ),
            Self::Subsidy { tick, source_id, target_id, amount, repression_boost } => write!(
                f,
                "Tick {tick}: {source_id} subsidised {target_id} with {amount:.2} \
                 (+{repression_boost:.3} repression)"
            ),
            Self::EconomicCrisis { tick, rent_pool, previous_rent_pool, wage_rate } => write!(
                f,
                "Tick {tick}: ECONOMIC CRISIS - rent pool fell from {previous_rent_pool:.2} \
                 to {rent_pool:.2}, wages at floor {wage_rate:.3}"
            ),
            Self::ConsciousnessTransmission { tick, source_id, target_id, delta } => write!(
                f,
                "Tick {tick}: consciousness flowed {source_id} -> {target_id} (+{delta:.4})"
            ),
            Self::MassAwakening { tick, entity_id, class_consciousness } => write!(
                f,
                "Tick {tick}: MASS AWAKENING in {entity_id} (consciousness {class_consciousness:.3})"
            ),
            Self::Spark { tick, entity_id, repression, agitation } => write!(
                f,
                "Tick {tick}: spark in {entity_id} (repression {repression:.2}, agitation {agitation:.2})"
            ),
            Self::Uprising { tick, entity_id, p_revolution, p_acquiescence } => write!(
                f,
                "Tick {tick}: UPRISING in {entity_id} (P(S|R) {p_revolution:.2} > P(S|A) {p_acquiescence:.2})"
            ),
            Self::SolidaritySpike { tick, entity_id, edges_strengthened, total_gain } => write!(
                f,
                "Tick {tick}: solidarity spike around {entity_id} \
                 ({edges_strengthened} bonds, +{total_gain:.3})"
            ),
            Self::Rupture { tick, source_id, target_id, tension } => write!(
                f,
                "Tick {tick}: RUPTURE on {source_id} -> {target_id} (tension {tension:.2})"
            ),
            Self::PhaseTransition { tick, previous_phase, new_phase, percolation_ratio } => write!(
                f,
                "Tick {tick}: solidarity network {previous_phase} -> {new_phase} \
                 (percolation {percolation_ratio:.2})"
            ),
            Self::ClassDecomposition {
                tick,
                source_id,
                enforcer_population,
                proletariat_population,
                ..
            } => write!(
                f,
                "Tick {tick}: CLASS DECOMPOSITION of {source_id} \
                 ({enforcer_population} enforcers, {proletariat_population} internal proletariat)"
            ),
            Self::ControlRatioCrisis {
                tick,
                prisoner_population,
                enforcer_population,
                capacity_per_guard,
            } => write!(
                f,
                "Tick {tick}: CONTROL RATIO CRISIS - {prisoner_population} prisoners, \
                 {enforcer_population} enforcers at {capacity_per_guard} per guard"
            ),
            Self::TerminalDecision { tick, outcome, average_organization } => write!(
                f,
                "Tick {tick}: TERMINAL DECISION - {outcome} (organization {average_organization:.2})"
            ),
            Self::EntityDeath { tick, entity_id, wealth, consumption_needs } => write!(
                f,
                "Tick {tick}: {entity_id} died (wealth {wealth:.2} < needs {consumption_needs:.2})"
            ),
            Self::Eviction { tick, territory_id, heat } => write!(
                f,
                "Tick {tick}: eviction began in {territory_id} (heat {heat:.2})"
            ),
            Self::Displacement { tick, territory_id, sink_id, displaced } => match sink_id {
                Some(sink) => write!(
                    f,
                    "Tick {tick}: {displaced} displaced from {territory_id} into {sink}"
                ),
                None => write!(
                    f,
                    "Tick {tick}: {displaced} displaced from {territory_id} with no sink"
                ),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn events_serialize_with_type_tag() {
        let event = SimulationEvent::Rupture {
            tick: 7,
            source_id: NodeId::from("C001"),
            target_id: NodeId::from("C002"),
            tension: 1.0,
        };
        let value = serde_json::to_value(&event).unwrap_or_default();
        assert_eq!(value["event_type"], "rupture");
        assert_eq!(value["tick"], 7);
    }

    #[test]
    fn kind_and_tick_match_variant() {
        let event = SimulationEvent::TerminalDecision {
            tick: 42,
            outcome: TerminalOutcome::Genocide,
            average_organization: 0.2,
        };
        assert_eq!(event.kind(), EventKind::TerminalDecision);
        assert_eq!(event.tick(), 42);
        assert!(event.to_string().contains("genocide"));
    }

    #[test]
    fn displacement_without_sink_says_so() {
        let event = SimulationEvent::Displacement {
            tick: 3,
            territory_id: NodeId::from("T001"),
            sink_id: None,
            displaced: 10,
        };
        assert!(event.to_string().contains("no sink"));
    }
}
