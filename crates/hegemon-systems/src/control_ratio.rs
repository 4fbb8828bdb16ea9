//! Control ratio and the terminal bifurcation.
//!
//! After decomposition the carceral state must hold the internal
//! proletariat with the enforcers it has. Once `crisis_delay` ticks have
//! passed, prisoners are compared against enforcer capacity; if they exceed
//! it the control-ratio crisis fires once. `decision_delay` ticks later the
//! system resolves: an organized prisoner class makes revolution, an
//! atomized one is exterminated.
//!
//! The progression lives in [`ControlRatioPhase`] on the cross-tick context
//! and only moves forward.

use hegemon_graph::WorkingGraph;
use hegemon_types::{SimulationEvent, SocialRole, TerminalOutcome};
use tracing::info;

use crate::context::ControlRatioPhase;
use crate::error::SystemError;
use crate::system::{StepContext, System};
use crate::util::as_real;

/// Drives the `Dormant -> CrisisDetected -> Decided` state machine.
#[derive(Debug, Clone, Copy, Default)]
pub struct ControlRatioSystem;

impl System for ControlRatioSystem {
    fn name(&self) -> &'static str {
        "control_ratio"
    }

    fn step(&self, graph: &mut WorkingGraph, ctx: &mut StepContext<'_>) -> Result<(), SystemError> {
        let defines = ctx.defines.control_ratio;
        match ctx.cross_tick.control_ratio {
            ControlRatioPhase::Decided { .. } => {}
            ControlRatioPhase::Dormant => {
                let Some(decomposed_at) = ctx.cross_tick.decomposition_tick else {
                    return Ok(());
                };
                if ctx.tick.saturating_sub(decomposed_at) < defines.crisis_delay {
                    return Ok(());
                }
                let prisoners = population_of(graph, SocialRole::InternalProletariat);
                let enforcers = population_of(graph, SocialRole::CarceralEnforcer);
                let capacity = enforcers.saturating_mul(defines.capacity_per_guard);
                if prisoners > capacity {
                    info!(tick = ctx.tick, prisoners, enforcers, capacity, "control ratio exceeded");
                    ctx.cross_tick.control_ratio = ControlRatioPhase::CrisisDetected { tick: ctx.tick };
                    ctx.bus.publish(SimulationEvent::ControlRatioCrisis {
                        tick: ctx.tick,
                        prisoner_population: prisoners,
                        enforcer_population: enforcers,
                        capacity_per_guard: defines.capacity_per_guard,
                    });
                }
            }
            ControlRatioPhase::CrisisDetected { tick: crisis_tick } => {
                if ctx.tick.saturating_sub(crisis_tick) < defines.decision_delay {
                    return Ok(());
                }
                let average_organization = weighted_organization(graph);
                let outcome = if average_organization >= defines.revolution_threshold {
                    TerminalOutcome::Revolution
                } else {
                    TerminalOutcome::Genocide
                };
                self.resolve_decompositions(graph, ctx.tick)?;

                info!(tick = ctx.tick, %outcome, average_organization, "terminal decision");
                ctx.cross_tick.control_ratio = ControlRatioPhase::Decided {
                    tick: ctx.tick,
                    outcome,
                };
                ctx.bus.publish(SimulationEvent::TerminalDecision {
                    tick: ctx.tick,
                    outcome,
                    average_organization,
                });
            }
        }
        Ok(())
    }
}

impl ControlRatioSystem {
    /// Close the decomposition latches of every aristocracy that split.
    fn resolve_decompositions(&self, graph: &mut WorkingGraph, tick: u64) -> Result<(), SystemError> {
        let decomposed: Vec<_> = graph
            .entities()
            .filter(|e| e.role == SocialRole::LaborAristocracy && e.decomposition.has_fired())
            .map(|e| e.id.clone())
            .collect();
        for id in decomposed {
            let class = graph
                .require_entity_mut(&id)
                .map_err(|e| SystemError::graph(self.name(), e))?;
            class.decomposition.resolve(tick);
        }
        Ok(())
    }
}

/// Total population of living classes with `role`.
fn population_of(graph: &WorkingGraph, role: SocialRole) -> u64 {
    graph
        .entities()
        .filter(|e| e.active && e.role == role)
        .fold(0_u64, |total, e| total.saturating_add(e.population))
}

/// Population-weighted organization of the living internal proletariat.
fn weighted_organization(graph: &WorkingGraph) -> f64 {
    let (weighted, population) = graph
        .entities()
        .filter(|e| e.active && e.role == SocialRole::InternalProletariat)
        .fold((0.0, 0_u64), |(weighted, population), e| {
            (
                weighted + e.organization * as_real(e.population),
                population.saturating_add(e.population),
            )
        });
    if population == 0 {
        0.0
    } else {
        weighted / as_real(population)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::Harness;
    use hegemon_graph::project;
    use hegemon_types::{EventKind, SocialClass, WorldState};

    fn carceral(prisoners: u64, enforcers: u64, organization: f64) -> WorldState {
        WorldState::new()
            .with_entity(
                SocialClass::new("C005", "Enforcers", SocialRole::CarceralEnforcer)
                    .with_population(enforcers),
            )
            .with_entity(
                SocialClass::new("C006", "Prisoners", SocialRole::InternalProletariat)
                    .with_population(prisoners)
                    .with_organization(organization),
            )
    }

    fn run_ticks(harness: &mut Harness, graph: &mut WorkingGraph, ticks: std::ops::Range<u64>) {
        for tick in ticks {
            assert!(harness.run(&ControlRatioSystem, graph, tick).is_ok());
        }
    }

    #[test]
    fn dormant_without_decomposition() {
        let mut graph = project(&carceral(1_000, 1, 0.9));
        let mut harness = Harness::new();
        run_ticks(&mut harness, &mut graph, 0..20);
        assert!(harness.bus.pending().is_empty());
    }

    #[test]
    fn organized_prisoners_make_revolution() {
        let mut graph = project(&carceral(700, 100, 0.6));
        let mut harness = Harness::new();
        harness.cross_tick.decomposition_tick = Some(0);
        run_ticks(&mut harness, &mut graph, 0..20);

        assert_eq!(harness.count(EventKind::ControlRatioCrisis), 1);
        assert_eq!(harness.count(EventKind::TerminalDecision), 1);
        assert_eq!(harness.cross_tick.terminal_outcome(), Some(TerminalOutcome::Revolution));
        // crisis at crisis_delay (2), decision decision_delay (3) later
        assert_eq!(
            harness.cross_tick.control_ratio,
            ControlRatioPhase::Decided {
                tick: 5,
                outcome: TerminalOutcome::Revolution
            }
        );
    }

    #[test]
    fn atomized_prisoners_face_genocide() {
        let mut graph = project(&carceral(700, 100, 0.2));
        let mut harness = Harness::new();
        harness.cross_tick.decomposition_tick = Some(0);
        run_ticks(&mut harness, &mut graph, 0..20);
        assert_eq!(harness.cross_tick.terminal_outcome(), Some(TerminalOutcome::Genocide));
    }

    #[test]
    fn threshold_organization_is_enough_for_revolution() {
        let mut graph = project(&carceral(700, 100, 0.5));
        let mut harness = Harness::new();
        harness.cross_tick.decomposition_tick = Some(0);
        run_ticks(&mut harness, &mut graph, 0..20);
        assert_eq!(harness.cross_tick.terminal_outcome(), Some(TerminalOutcome::Revolution));
    }

    #[test]
    fn contained_prisoners_trigger_nothing() {
        let mut graph = project(&carceral(400, 100, 0.9));
        let mut harness = Harness::new();
        harness.cross_tick.decomposition_tick = Some(0);
        run_ticks(&mut harness, &mut graph, 0..20);
        assert_eq!(harness.count(EventKind::ControlRatioCrisis), 0);
        assert_eq!(harness.cross_tick.control_ratio, ControlRatioPhase::Dormant);
    }
}
