//! The immutable world snapshot.
//!
//! A [`WorldState`] is a plain value. The engine never mutates one in place:
//! each tick projects the snapshot into a working graph, runs the systems,
//! and reconstructs a fresh snapshot with `tick + 1`.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::events::SimulationEvent;
use crate::ids::{EntityId, SovereignId, TerritoryId};
use crate::structs::{GlobalEconomy, Relationship, SocialClass, StateFinance, Territory};

/// Complete simulation state at one tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct WorldState {
    /// Tick this snapshot describes.
    pub tick: u64,
    /// Social classes keyed by id.
    pub entities: BTreeMap<EntityId, SocialClass>,
    /// Territories keyed by id.
    pub territories: BTreeMap<TerritoryId, Territory>,
    /// Directed edges, in insertion order.
    pub relationships: Vec<Relationship>,
    /// Global economic aggregates.
    pub economy: GlobalEconomy,
    /// Fiscal records per sovereign.
    #[serde(default)]
    pub state_finances: BTreeMap<SovereignId, StateFinance>,
    /// Plain-text narrative log, one line per event.
    #[serde(default)]
    pub event_log: Vec<String>,
    /// Typed event history, append-only.
    #[serde(default)]
    pub events: Vec<SimulationEvent>,
}

impl Default for WorldState {
    fn default() -> Self {
        Self::new()
    }
}

impl WorldState {
    /// An empty world at tick zero.
    pub fn new() -> Self {
        Self {
            tick: 0,
            entities: BTreeMap::new(),
            territories: BTreeMap::new(),
            relationships: Vec::new(),
            economy: GlobalEconomy::default(),
            state_finances: BTreeMap::new(),
            event_log: Vec::new(),
            events: Vec::new(),
        }
    }

    /// Add (or replace) a social class.
    #[must_use]
    pub fn with_entity(mut self, entity: SocialClass) -> Self {
        self.entities.insert(entity.id.clone(), entity);
        self
    }

    /// Add (or replace) a territory.
    #[must_use]
    pub fn with_territory(mut self, territory: Territory) -> Self {
        self.territories.insert(territory.id.clone(), territory);
        self
    }

    /// Append a relationship.
    #[must_use]
    pub fn with_relationship(mut self, relationship: Relationship) -> Self {
        self.relationships.push(relationship);
        self
    }

    /// Replace the economy record.
    #[must_use]
    pub fn with_economy(mut self, economy: GlobalEconomy) -> Self {
        self.economy = economy;
        self
    }

    /// Add (or replace) a sovereign's finance record.
    #[must_use]
    pub fn with_state_finance(mut self, sovereign: SovereignId, finance: StateFinance) -> Self {
        self.state_finances.insert(sovereign, finance);
        self
    }

    /// Look up a social class.
    pub fn entity(&self, id: &EntityId) -> Option<&SocialClass> {
        self.entities.get(id)
    }

    /// Look up a territory.
    pub fn territory(&self, id: &TerritoryId) -> Option<&Territory> {
        self.territories.get(id)
    }

    /// Iterate over living classes in id order.
    pub fn active_entities(&self) -> impl Iterator<Item = &SocialClass> {
        self.entities.values().filter(|e| e.active)
    }

    /// Sum of wealth held by living classes.
    pub fn total_wealth(&self) -> f64 {
        self.active_entities().map(|e| e.wealth).sum()
    }

    /// Highest survival-through-revolt probability among living classes.
    pub fn max_p_revolution(&self) -> f64 {
        self.active_entities()
            .map(|e| e.p_revolution)
            .fold(0.0, f64::max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enums::SocialRole;

    #[test]
    fn builders_key_by_id() {
        let state = WorldState::new()
            .with_entity(SocialClass::new("C001", "Workers", SocialRole::PeripheryProletariat))
            .with_entity(
                SocialClass::new("C002", "Owners", SocialRole::CoreBourgeoisie).with_wealth(5.0),
            );
        assert_eq!(state.entities.len(), 2);
        let owner = state.entity(&EntityId::from("C002"));
        assert!(owner.is_some_and(|e| e.role == SocialRole::CoreBourgeoisie));
    }

    #[test]
    fn inactive_entities_are_excluded_from_totals() {
        let mut dead = SocialClass::new("C002", "Gone", SocialRole::Lumpenproletariat);
        dead.wealth = 50.0;
        dead.active = false;
        let state = WorldState::new()
            .with_entity(SocialClass::new("C001", "Alive", SocialRole::Comprador).with_wealth(10.0))
            .with_entity(dead);
        assert_eq!(state.active_entities().count(), 1);
        assert!((state.total_wealth() - 10.0).abs() < 1e-9);
    }

    #[test]
    fn missing_history_fields_default_to_empty() {
        let json = r#"{
            "tick": 3,
            "entities": {},
            "territories": {},
            "relationships": [],
            "economy": {
                "imperial_rent_pool": 0.0,
                "current_super_wage_rate": 0.2,
                "current_repression_level": 0.5
            }
        }"#;
        let state: Result<WorldState, _> = serde_json::from_str(json);
        assert!(state.is_ok_and(|s| s.tick == 3 && s.events.is_empty() && s.event_log.is_empty()));
    }
}
