//! Lossless conversion between [`WorldState`] and [`WorkingGraph`].

use std::collections::BTreeMap;

use hegemon_types::{SimulationEvent, WorldState};

use crate::graph::{GraphMetadata, Node, WorkingGraph};

/// Project a snapshot into a fresh working graph.
///
/// Entities and territories become nodes carrying their full field sets,
/// relationships become edges in order, and the economy, finances, and event
/// history move into graph metadata.
pub fn project(state: &WorldState) -> WorkingGraph {
    let mut graph = WorkingGraph::with_metadata(GraphMetadata {
        tick: state.tick,
        economy: state.economy,
        state_finances: state.state_finances.clone(),
        event_log: state.event_log.clone(),
        events: state.events.clone(),
    });
    for entity in state.entities.values() {
        graph.insert_entity(entity.clone());
    }
    for territory in state.territories.values() {
        graph.insert_territory(territory.clone());
    }
    for relationship in &state.relationships {
        graph.push_edge(relationship.clone());
    }
    graph
}

/// Rebuild a snapshot from a working graph.
///
/// `event_log` and `events`, when given, replace the history stored in the
/// graph metadata.
pub fn reconstruct(
    graph: &WorkingGraph,
    tick: u64,
    event_log: Option<Vec<String>>,
    events: Option<Vec<SimulationEvent>>,
) -> WorldState {
    into_state(graph.clone(), tick, event_log, events)
}

/// Consuming form of [`reconstruct`], used by the engine at the end of a tick.
pub fn into_state(
    graph: WorkingGraph,
    tick: u64,
    event_log: Option<Vec<String>>,
    events: Option<Vec<SimulationEvent>>,
) -> WorldState {
    let (nodes, edges, metadata) = graph.into_parts();
    let mut entities = BTreeMap::new();
    let mut territories = BTreeMap::new();
    for (id, node) in nodes {
        match node {
            Node::Entity(entity) => {
                entities.insert(id, entity);
            }
            Node::Territory(territory) => {
                territories.insert(id, territory);
            }
        }
    }
    WorldState {
        tick,
        entities,
        territories,
        relationships: edges,
        economy: metadata.economy,
        state_finances: metadata.state_finances,
        event_log: event_log.unwrap_or(metadata.event_log),
        events: events.unwrap_or(metadata.events),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hegemon_types::{
        EdgeType, NodeId, OperationalProfile, Relationship, SectorType, SocialClass, SocialRole,
        SovereignId, StateFinance, Territory, TerritoryType,
    };

    fn populated() -> WorldState {
        let mut state = WorldState::new()
            .with_entity(
                SocialClass::new("C001", "Workers", SocialRole::PeripheryProletariat)
                    .with_wealth(100.0)
                    .with_consciousness(0.4)
                    .with_consumption(0.5, 0.25),
            )
            .with_entity(SocialClass::new("C002", "Owners", SocialRole::CoreBourgeoisie))
            .with_territory(
                Territory::new("T001", "Docks", SectorType::Docks, TerritoryType::Core)
                    .with_profile(OperationalProfile::HighProfile)
                    .with_heat(0.3),
            )
            .with_relationship(
                Relationship::new("C001", "C002", EdgeType::Exploitation).with_tension(0.2),
            )
            .with_state_finance(
                SovereignId::from("USA"),
                StateFinance {
                    treasury: 10.0,
                    ..StateFinance::default()
                },
            );
        state.tick = 9;
        state.event_log.push("Tick 8: something happened".to_owned());
        state
    }

    #[test]
    fn unmodified_round_trip_is_lossless() {
        let state = populated();
        let graph = project(&state);
        let back = reconstruct(&graph, state.tick, None, None);
        assert_eq!(back, state);
        let original = serde_json::to_value(&state).unwrap_or_default();
        let rebuilt = serde_json::to_value(&back).unwrap_or_default();
        assert_eq!(original, rebuilt);
    }

    #[test]
    fn explicit_history_overrides_metadata() {
        let state = populated();
        let graph = project(&state);
        let back = reconstruct(&graph, 10, Some(vec!["replaced".to_owned()]), Some(Vec::new()));
        assert_eq!(back.tick, 10);
        assert_eq!(back.event_log, vec!["replaced".to_owned()]);
    }

    #[test]
    fn graph_mutations_flow_back_into_state() {
        let state = populated();
        let mut graph = project(&state);
        if let Some(worker) = graph.entity_mut(&NodeId::from("C001")) {
            worker.wealth = 1.0;
        }
        let back = reconstruct(&graph, state.tick, None, None);
        let wealth = back.entity(&NodeId::from("C001")).map(|e| e.wealth);
        assert_eq!(wealth, Some(1.0));
    }
}
