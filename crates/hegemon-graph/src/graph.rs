//! The mutable working graph a tick operates on.
//!
//! Nodes are social classes and territories in one id namespace, tagged by a
//! `node_type` discriminator. Edges are [`Relationship`]s kept in insertion
//! order so every system walks them deterministically. Graph-level metadata
//! carries the economy record, sovereign finances, and event history.

use std::collections::{BTreeMap, BTreeSet};

use hegemon_types::{
    EdgeType, EntityId, GlobalEconomy, NodeId, Relationship, SimulationEvent, SocialClass,
    SovereignId, StateFinance, Territory, TerritoryId,
};
use serde::{Deserialize, Serialize};

use crate::error::GraphError;

/// A node in the working graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "node_type", rename_all = "snake_case")]
pub enum Node {
    /// A social class.
    Entity(SocialClass),
    /// A territory.
    Territory(Territory),
}

/// Graph-level attributes.
///
/// Every key defaults when absent so graphs written before a field existed
/// still load.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphMetadata {
    /// Tick of the snapshot this graph was projected from.
    pub tick: u64,
    /// Global economy record.
    pub economy: GlobalEconomy,
    /// Fiscal records per sovereign.
    pub state_finances: BTreeMap<SovereignId, StateFinance>,
    /// Plain-text event log carried through the tick.
    pub event_log: Vec<String>,
    /// Typed event history carried through the tick.
    pub events: Vec<SimulationEvent>,
}

/// Mutable graph representation of a world snapshot.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WorkingGraph {
    /// All nodes indexed by id.
    nodes: BTreeMap<NodeId, Node>,
    /// Directed edges in insertion order.
    edges: Vec<Relationship>,
    /// Graph-level attributes.
    #[serde(default)]
    metadata: GraphMetadata,
}

impl WorkingGraph {
    /// Create an empty graph with the given metadata.
    pub const fn with_metadata(metadata: GraphMetadata) -> Self {
        Self {
            nodes: BTreeMap::new(),
            edges: Vec::new(),
            metadata,
        }
    }

    // -------------------------------------------------------------------
    // Construction
    // -------------------------------------------------------------------

    /// Insert a social-class node, replacing any node with the same id.
    pub fn insert_entity(&mut self, entity: SocialClass) {
        let id = entity.id.clone();
        if let Some(previous) = self.nodes.insert(id.clone(), Node::Entity(entity)) {
            if matches!(previous, Node::Territory(_)) {
                tracing::warn!(node_id = %id, "entity replaced a territory with the same id");
            }
        }
    }

    /// Insert a territory node, replacing any node with the same id.
    pub fn insert_territory(&mut self, territory: Territory) {
        let id = territory.id.clone();
        if let Some(previous) = self.nodes.insert(id.clone(), Node::Territory(territory)) {
            if matches!(previous, Node::Entity(_)) {
                tracing::warn!(node_id = %id, "territory replaced an entity with the same id");
            }
        }
    }

    /// Append an edge.
    pub fn push_edge(&mut self, edge: Relationship) {
        self.edges.push(edge);
    }

    // -------------------------------------------------------------------
    // Metadata
    // -------------------------------------------------------------------

    /// Graph-level attributes.
    pub const fn metadata(&self) -> &GraphMetadata {
        &self.metadata
    }

    /// Mutable graph-level attributes.
    pub const fn metadata_mut(&mut self) -> &mut GraphMetadata {
        &mut self.metadata
    }

    /// Tick of the snapshot this graph came from.
    pub const fn tick(&self) -> u64 {
        self.metadata.tick
    }

    /// Global economy record.
    pub const fn economy(&self) -> &GlobalEconomy {
        &self.metadata.economy
    }

    /// Mutable global economy record.
    pub const fn economy_mut(&mut self) -> &mut GlobalEconomy {
        &mut self.metadata.economy
    }

    // -------------------------------------------------------------------
    // Nodes
    // -------------------------------------------------------------------

    /// All nodes in id order.
    pub fn nodes(&self) -> impl Iterator<Item = (&NodeId, &Node)> {
        self.nodes.iter()
    }

    /// Look up a social class.
    pub fn entity(&self, id: &EntityId) -> Option<&SocialClass> {
        match self.nodes.get(id) {
            Some(Node::Entity(entity)) => Some(entity),
            _ => None,
        }
    }

    /// Look up a social class mutably.
    pub fn entity_mut(&mut self, id: &EntityId) -> Option<&mut SocialClass> {
        match self.nodes.get_mut(id) {
            Some(Node::Entity(entity)) => Some(entity),
            _ => None,
        }
    }

    /// Look up a social class that must exist.
    pub fn require_entity(&self, id: &EntityId) -> Result<&SocialClass, GraphError> {
        self.entity(id)
            .ok_or_else(|| GraphError::EntityNotFound(id.clone()))
    }

    /// Look up a social class that must exist, mutably.
    pub fn require_entity_mut(&mut self, id: &EntityId) -> Result<&mut SocialClass, GraphError> {
        match self.nodes.get_mut(id) {
            Some(Node::Entity(entity)) => Ok(entity),
            _ => Err(GraphError::EntityNotFound(id.clone())),
        }
    }

    /// Look up a territory.
    pub fn territory(&self, id: &TerritoryId) -> Option<&Territory> {
        match self.nodes.get(id) {
            Some(Node::Territory(territory)) => Some(territory),
            _ => None,
        }
    }

    /// Look up a territory mutably.
    pub fn territory_mut(&mut self, id: &TerritoryId) -> Option<&mut Territory> {
        match self.nodes.get_mut(id) {
            Some(Node::Territory(territory)) => Some(territory),
            _ => None,
        }
    }

    /// Look up a territory that must exist.
    pub fn require_territory(&self, id: &TerritoryId) -> Result<&Territory, GraphError> {
        self.territory(id)
            .ok_or_else(|| GraphError::TerritoryNotFound(id.clone()))
    }

    /// Iterate over all social classes in id order.
    pub fn entities(&self) -> impl Iterator<Item = &SocialClass> {
        self.nodes.values().filter_map(|node| match node {
            Node::Entity(entity) => Some(entity),
            Node::Territory(_) => None,
        })
    }

    /// Iterate over all territories in id order.
    pub fn territories(&self) -> impl Iterator<Item = &Territory> {
        self.nodes.values().filter_map(|node| match node {
            Node::Territory(territory) => Some(territory),
            Node::Entity(_) => None,
        })
    }

    /// Ids of all social classes, sorted.
    pub fn entity_ids(&self) -> Vec<EntityId> {
        self.entities().map(|e| e.id.clone()).collect()
    }

    /// Ids of all territories, sorted.
    pub fn territory_ids(&self) -> Vec<TerritoryId> {
        self.territories().map(|t| t.id.clone()).collect()
    }

    // -------------------------------------------------------------------
    // Edges
    // -------------------------------------------------------------------

    /// All edges in insertion order.
    pub fn edges(&self) -> &[Relationship] {
        &self.edges
    }

    /// All edges, mutably.
    pub fn edges_mut(&mut self) -> &mut [Relationship] {
        &mut self.edges
    }

    /// The edge at `index`.
    pub fn edge(&self, index: usize) -> Option<&Relationship> {
        self.edges.get(index)
    }

    /// The edge at `index`, mutably.
    pub fn edge_mut(&mut self, index: usize) -> Option<&mut Relationship> {
        self.edges.get_mut(index)
    }

    /// Positions of every edge of one type, in insertion order.
    pub fn edge_indices(&self, edge_type: EdgeType) -> Vec<usize> {
        self.edges
            .iter()
            .enumerate()
            .filter(|(_, edge)| edge.edge_type == edge_type)
            .map(|(index, _)| index)
            .collect()
    }

    /// Edges of one type arriving at `id`.
    pub fn incoming<'a>(
        &'a self,
        id: &'a NodeId,
        edge_type: EdgeType,
    ) -> impl Iterator<Item = &'a Relationship> {
        self.edges
            .iter()
            .filter(move |edge| edge.edge_type == edge_type && &edge.target_id == id)
    }

    /// Edges of one type leaving `id`.
    pub fn outgoing<'a>(
        &'a self,
        id: &'a NodeId,
        edge_type: EdgeType,
    ) -> impl Iterator<Item = &'a Relationship> {
        self.edges
            .iter()
            .filter(move |edge| edge.edge_type == edge_type && &edge.source_id == id)
    }

    /// Nodes joined to `id` by an edge of one type in either direction,
    /// sorted and deduplicated.
    pub fn neighbors(&self, id: &NodeId, edge_type: EdgeType) -> Vec<NodeId> {
        let mut found = BTreeSet::new();
        for edge in self.edges.iter().filter(|e| e.edge_type == edge_type) {
            if &edge.source_id == id {
                found.insert(edge.target_id.clone());
            } else if &edge.target_id == id {
                found.insert(edge.source_id.clone());
            }
        }
        found.into_iter().collect()
    }

    /// Consume the graph into its parts.
    pub(crate) fn into_parts(self) -> (BTreeMap<NodeId, Node>, Vec<Relationship>, GraphMetadata) {
        (self.nodes, self.edges, self.metadata)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hegemon_types::{SectorType, SocialRole, TerritoryType};

    fn sample() -> WorkingGraph {
        let mut graph = WorkingGraph::default();
        graph.insert_entity(SocialClass::new("C001", "Workers", SocialRole::PeripheryProletariat));
        graph.insert_entity(SocialClass::new("C002", "Compradors", SocialRole::Comprador));
        graph.insert_territory(Territory::new(
            "T001",
            "Barrio",
            SectorType::Residential,
            TerritoryType::Periphery,
        ));
        graph.insert_territory(Territory::new(
            "T002",
            "Camp",
            SectorType::Government,
            TerritoryType::ConcentrationCamp,
        ));
        graph.push_edge(Relationship::new("C001", "C002", EdgeType::Exploitation));
        graph.push_edge(Relationship::new("T002", "T001", EdgeType::Adjacency));
        graph.push_edge(Relationship::new("C002", "C001", EdgeType::Solidarity));
        graph
    }

    #[test]
    fn entity_and_territory_lookups_respect_node_kind() {
        let graph = sample();
        assert!(graph.entity(&NodeId::from("C001")).is_some());
        assert!(graph.entity(&NodeId::from("T001")).is_none());
        assert!(graph.territory(&NodeId::from("T001")).is_some());
        assert_eq!(graph.entity_ids().len(), 2);
        assert_eq!(graph.territory_ids().len(), 2);
    }

    #[test]
    fn missing_required_entity_is_an_error() {
        let mut graph = sample();
        let result = graph.require_entity_mut(&NodeId::from("C999"));
        assert!(matches!(result, Err(GraphError::EntityNotFound(_))));
    }

    #[test]
    fn neighbors_are_undirected() {
        let graph = sample();
        let from_target = graph.neighbors(&NodeId::from("T001"), EdgeType::Adjacency);
        assert_eq!(from_target, vec![NodeId::from("T002")]);
        let from_source = graph.neighbors(&NodeId::from("T002"), EdgeType::Adjacency);
        assert_eq!(from_source, vec![NodeId::from("T001")]);
    }

    #[test]
    fn typed_edge_queries() {
        let graph = sample();
        assert_eq!(graph.edge_indices(EdgeType::Solidarity), vec![2]);
        let id = NodeId::from("C001");
        assert_eq!(graph.incoming(&id, EdgeType::Solidarity).count(), 1);
        assert_eq!(graph.outgoing(&id, EdgeType::Exploitation).count(), 1);
        assert_eq!(graph.outgoing(&id, EdgeType::Solidarity).count(), 0);
    }
}
