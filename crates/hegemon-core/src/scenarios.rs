//! Starting worlds.
//!
//! Each builder returns a tick-zero [`WorldState`]. [`by_name`] resolves the
//! `run.scenario` key of `hegemon-config.yaml`.

use hegemon_types::{
    EdgeType, OperationalProfile, Relationship, SectorType, SocialClass, SocialRole,
    SovereignId, StateFinance, Territory, TerritoryType, WorldState,
};

/// Names accepted by [`by_name`].
pub const SCENARIOS: [&str; 2] = ["two_node", "imperial_circuit"];

/// Resolve a scenario by name.
pub fn by_name(name: &str) -> Option<WorldState> {
    match name {
        "two_node" => Some(two_node_scenario()),
        "imperial_circuit" => Some(imperial_circuit_scenario()),
        _ => None,
    }
}

/// A worker and an owner joined by one exploitation edge.
pub fn two_node_scenario() -> WorldState {
    WorldState::new()
        .with_entity(
            SocialClass::new("C001", "Periphery workers", SocialRole::PeripheryProletariat)
                .with_wealth(100.0)
                .with_consciousness(0.5)
                .with_population(1_000),
        )
        .with_entity(
            SocialClass::new("C002", "Owners", SocialRole::CoreBourgeoisie)
                .with_wealth(100.0)
                .with_population(10),
        )
        .with_relationship(Relationship::new("C001", "C002", EdgeType::Exploitation))
}

/// The full imperial circuit with its carceral reserve and territories.
///
/// ```text
/// C007 organized periphery --solidarity--> C001 periphery workers
/// C001 --exploitation--> C002 comprador --tribute--> C003 core bourgeoisie
/// C003 --wages--> C004 labor aristocracy
/// C003 --client_state--> C002
/// C005 carceral enforcers, C006 internal proletariat: dormant until decomposition
/// ```
///
/// Territories: a hot core (T001) next to a penal colony (T003) and a
/// reservation (T004), and a periphery (T002) next to the reservation.
pub fn imperial_circuit_scenario() -> WorldState {
    let classes = [
        SocialClass::new("C001", "Periphery workers", SocialRole::PeripheryProletariat)
            .with_wealth(100.0)
            .with_consciousness(0.5)
            .with_population(100_000)
            .with_consumption(0.1, 0.05),
        SocialClass::new("C002", "Comprador bourgeoisie", SocialRole::Comprador)
            .with_population(500),
        SocialClass::new("C003", "Core bourgeoisie", SocialRole::CoreBourgeoisie)
            .with_wealth(50.0)
            .with_population(100)
            .with_repression(0.1),
        SocialClass::new("C004", "Labor aristocracy", SocialRole::LaborAristocracy)
            .with_wealth(10.0)
            .with_national_identity(0.6)
            .with_population(1_000)
            .with_repression(0.2),
        SocialClass::new("C005", "Carceral enforcers", SocialRole::CarceralEnforcer)
            .with_population(0)
            .dormant(),
        SocialClass::new("C006", "Internal proletariat", SocialRole::InternalProletariat)
            .with_population(2_000)
            .with_organization(0.4)
            .with_repression(0.8)
            .dormant(),
        SocialClass::new("C007", "Organized periphery", SocialRole::PeripheryProletariat)
            .with_wealth(20.0)
            .with_consciousness(0.8)
            .with_organization(0.5)
            .with_population(10_000),
    ];

    let relationships = [
        Relationship::new("C001", "C002", EdgeType::Exploitation),
        Relationship::new("C002", "C003", EdgeType::Tribute),
        Relationship::new("C003", "C004", EdgeType::Wages),
        Relationship::new("C003", "C002", EdgeType::ClientState).with_subsidy_cap(5.0),
        Relationship::new("C007", "C001", EdgeType::Solidarity).with_strength(0.5),
        Relationship::new("T001", "T003", EdgeType::Adjacency),
        Relationship::new("T001", "T004", EdgeType::Adjacency),
        Relationship::new("T002", "T004", EdgeType::Adjacency),
        Relationship::new("C004", "T001", EdgeType::Tenancy),
        Relationship::new("C001", "T002", EdgeType::Tenancy),
        Relationship::new("C006", "T003", EdgeType::Tenancy),
    ];

    let territories = [
        Territory::new("T001", "Core metropole", SectorType::Residential, TerritoryType::Core)
            .with_profile(OperationalProfile::HighProfile)
            .with_heat(0.5)
            .with_population(5_000),
        Territory::new("T002", "Export zone", SectorType::Industrial, TerritoryType::Periphery)
            .with_population(20_000),
        Territory::new("T003", "Penal colony", SectorType::Government, TerritoryType::PenalColony),
        Territory::new("T004", "Reservation", SectorType::Residential, TerritoryType::Reservation)
            .with_population(1_000),
    ];

    let mut state = WorldState::new().with_state_finance(
        SovereignId::from("USA"),
        StateFinance {
            treasury: 1_000.0,
            burden_ratio: 0.1,
            police_budget: 100.0,
            social_reproduction_budget: 200.0,
        },
    );
    for class in classes {
        state = state.with_entity(class);
    }
    for territory in territories {
        state = state.with_territory(territory);
    }
    for relationship in relationships {
        state = state.with_relationship(relationship);
    }
    state
}
