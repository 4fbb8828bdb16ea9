//! End-to-end behavior of the domain systems through the full pipeline.

#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::arithmetic_side_effects
)]

use hegemon_core::{Simulation, scenarios, step};
use hegemon_systems::{CrossTickContext, GameDefines, SimulationConfig};
use hegemon_types::{
    EdgeType, EventKind, NodeId, OperationalProfile, Relationship, SectorType, SimulationEvent,
    SocialClass, SocialRole, TerminalOutcome, Territory, TerritoryType, WorldState,
};

fn advance(state: &WorldState, ticks: u64) -> WorldState {
    let mut sim = Simulation::new(state.clone(), SimulationConfig::default(), GameDefines::default());
    sim.run(ticks).unwrap().clone()
}

fn class(state: &WorldState, id: &str) -> SocialClass {
    state.entity(&NodeId::from(id)).cloned().unwrap()
}

fn first_tick_of(state: &WorldState, kind: EventKind) -> Option<u64> {
    state.events.iter().find(|e| e.kind() == kind).map(SimulationEvent::tick)
}

// ---------------------------------------------------------------------------
// Imperial circuit
// ---------------------------------------------------------------------------

fn four_node_circuit() -> WorldState {
    WorldState::new()
        .with_entity(
            SocialClass::new("C001", "Periphery workers", SocialRole::PeripheryProletariat)
                .with_wealth(100.0)
                .with_consciousness(0.5),
        )
        .with_entity(SocialClass::new("C002", "Comprador", SocialRole::Comprador))
        .with_entity(
            SocialClass::new("C003", "Core bourgeoisie", SocialRole::CoreBourgeoisie)
                .with_wealth(50.0),
        )
        .with_entity(SocialClass::new("C004", "Labor aristocracy", SocialRole::LaborAristocracy))
        .with_relationship(Relationship::new("C001", "C002", EdgeType::Exploitation))
        .with_relationship(Relationship::new("C002", "C003", EdgeType::Tribute))
        .with_relationship(Relationship::new("C003", "C004", EdgeType::Wages))
        // a misrouted wage edge must never pay the periphery
        .with_relationship(Relationship::new("C003", "C001", EdgeType::Wages))
}

#[test]
fn four_node_circuit_moves_value_up_and_wages_sideways() {
    let mut defines = GameDefines::default();
    defines.vitality.base_subsistence = 0.0;
    let mut context = CrossTickContext::new();
    let next = step(&four_node_circuit(), &SimulationConfig::default(), &mut context, &defines)
        .unwrap();

    // rent = 0.8 * 100 * (1 - 0.5)
    assert!((class(&next, "C001").wealth - 60.0).abs() < 1e-9);
    // comprador keeps 15% of 40
    assert!((class(&next, "C002").wealth - 6.0).abs() < 1e-9);
    // core: 50 + 34 tribute, then 20% wages out
    assert!((class(&next, "C003").wealth - 67.2).abs() < 1e-9);
    assert!((class(&next, "C004").wealth - 16.8).abs() < 1e-9);
    assert!((next.economy.imperial_rent_pool - 40.0).abs() < 1e-9);

    let wage_targets: Vec<&NodeId> = next
        .events
        .iter()
        .filter_map(|e| match e {
            SimulationEvent::Wages { target_id, .. } => Some(target_id),
            _ => None,
        })
        .collect();
    assert_eq!(wage_targets, vec![&NodeId::from("C004")]);
}

#[test]
fn circuit_conserves_wealth_without_subsidy() {
    let mut defines = GameDefines::default();
    defines.vitality.base_subsistence = 0.0;
    let state = four_node_circuit();
    let mut context = CrossTickContext::new();
    let next = step(&state, &SimulationConfig::default(), &mut context, &defines).unwrap();
    assert!((next.total_wealth() - state.total_wealth()).abs() < 1e-9);
}

// ---------------------------------------------------------------------------
// Bifurcation
// ---------------------------------------------------------------------------

/// A worker squeezed by a comprador, optionally tied to an organizer.
fn squeezed_worker(with_solidarity: bool) -> WorldState {
    let mut state = WorldState::new()
        .with_entity(
            SocialClass::new("C001", "Workers", SocialRole::PeripheryProletariat)
                .with_wealth(100.0)
                .with_consciousness(0.3),
        )
        .with_entity(SocialClass::new("C002", "Comprador", SocialRole::Comprador))
        .with_entity(
            SocialClass::new("C003", "Organizers", SocialRole::PeripheryProletariat)
                .with_wealth(10.0)
                .with_consciousness(0.9),
        )
        .with_relationship(Relationship::new("C001", "C002", EdgeType::Exploitation));
    if with_solidarity {
        state = state.with_relationship(
            Relationship::new("C003", "C001", EdgeType::Solidarity).with_strength(0.8),
        );
    }
    state
}

#[test]
fn same_crisis_opposite_politics() {
    let connected = class(&advance(&squeezed_worker(true), 6), "C001");
    let isolated = class(&advance(&squeezed_worker(false), 6), "C001");

    assert!(connected.ideology.class_consciousness > isolated.ideology.class_consciousness);
    assert!(isolated.ideology.national_identity > connected.ideology.national_identity);
    assert!(isolated.ideology.national_identity > 0.0);
}

// ---------------------------------------------------------------------------
// Territory
// ---------------------------------------------------------------------------

fn hot_core(with_sinks: bool) -> WorldState {
    let mut state = WorldState::new().with_territory(
        Territory::new("T001", "Downtown", SectorType::Residential, TerritoryType::Core)
            .with_profile(OperationalProfile::HighProfile)
            .with_heat(0.9)
            .with_population(1_000),
    );
    if with_sinks {
        state = state
            .with_territory(Territory::new(
                "T002",
                "Reservation",
                SectorType::Residential,
                TerritoryType::Reservation,
            ))
            .with_territory(Territory::new(
                "T003",
                "Camp",
                SectorType::Government,
                TerritoryType::ConcentrationCamp,
            ))
            .with_relationship(Relationship::new("T001", "T002", EdgeType::Adjacency))
            .with_relationship(Relationship::new("T003", "T001", EdgeType::Adjacency));
    }
    state
}

#[test]
fn eviction_displaces_to_the_highest_priority_sink() {
    let next = advance(&hot_core(true), 1);
    let core = next.territory(&NodeId::from("T001")).unwrap();
    let camp = next.territory(&NodeId::from("T003")).unwrap();
    let reservation = next.territory(&NodeId::from("T002")).unwrap();

    assert!(core.is_under_eviction());
    assert_eq!(core.population, 900);
    assert!(core.rent_level > 1.0);
    assert_eq!(reservation.population, 0);
    // arrivals, minus the camp's elimination on the same tick
    assert!(camp.population > 0 && camp.population < 100);

    let sink = next.events.iter().find_map(|e| match e {
        SimulationEvent::Displacement { sink_id, displaced, .. } => Some((sink_id.clone(), *displaced)),
        _ => None,
    });
    assert_eq!(sink, Some((Some(NodeId::from("T003")), 100)));
}

#[test]
fn eviction_latches_once_and_keeps_displacing() {
    let state = advance(&hot_core(true), 5);
    let evictions = state.events.iter().filter(|e| e.kind() == EventKind::Eviction).count();
    let displacements = state.events.iter().filter(|e| e.kind() == EventKind::Displacement).count();
    assert_eq!(evictions, 1);
    assert_eq!(displacements, 5);
}

#[test]
fn displacement_without_a_sink_is_discarded() {
    let next = advance(&hot_core(false), 1);
    assert_eq!(next.territory(&NodeId::from("T001")).unwrap().population, 900);
    assert!(next.events.iter().any(|e| matches!(
        e,
        SimulationEvent::Displacement { sink_id: None, displaced: 100, .. }
    )));
}

// ---------------------------------------------------------------------------
// Decomposition and the control ratio
// ---------------------------------------------------------------------------

#[test]
fn wage_crisis_leads_to_a_terminal_decision() {
    let state = advance(&scenarios::imperial_circuit_scenario(), 20);

    let crisis = first_tick_of(&state, EventKind::EconomicCrisis).unwrap();
    let decomposed = first_tick_of(&state, EventKind::ClassDecomposition).unwrap();
    let control = first_tick_of(&state, EventKind::ControlRatioCrisis).unwrap();
    let decision = first_tick_of(&state, EventKind::TerminalDecision).unwrap();

    assert!(crisis <= decomposed);
    assert!(control >= decomposed + 2);
    assert!(decision >= control + 3);

    let aristocracy = class(&state, "C004");
    assert!(!aristocracy.active);
    assert!(aristocracy.decomposition.is_resolved());
    assert!(class(&state, "C005").active);
    assert!(class(&state, "C006").active);
}

#[test]
fn penal_colony_prisoners_are_too_atomized_to_win() {
    let state = advance(&scenarios::imperial_circuit_scenario(), 20);
    let outcome = state.events.iter().find_map(|e| match e {
        SimulationEvent::TerminalDecision { outcome, .. } => Some(*outcome),
        _ => None,
    });
    assert_eq!(outcome, Some(TerminalOutcome::Genocide));
}

#[test]
fn facade_context_tracks_the_terminal_outcome() {
    let mut sim = Simulation::new(
        scenarios::imperial_circuit_scenario(),
        SimulationConfig::default(),
        GameDefines::default(),
    );
    sim.run(20).unwrap();
    assert_eq!(sim.context().terminal_outcome(), Some(TerminalOutcome::Genocide));
    assert!(sim.context().decomposition_tick.is_some());
}
