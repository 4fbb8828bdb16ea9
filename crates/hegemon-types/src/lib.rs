//! Shared type definitions for the Hegemon simulation.
//!
//! This crate is the state model every other crate in the workspace builds
//! on. Types defined here flow downstream to `TypeScript` via `ts-rs` for
//! the dashboard.
//!
//! # Modules
//!
//! - [`ids`] -- String-backed identifier newtypes
//! - [`enums`] -- Roles, edge kinds, territory classifications, outcomes
//! - [`structs`] -- Classes, territories, relationships, economy records
//! - [`events`] -- The closed typed event union
//! - [`state`] -- The immutable [`WorldState`] snapshot

pub mod enums;
pub mod events;
pub mod ids;
pub mod state;
pub mod structs;

// Re-export all public types at crate root for convenience.
pub use enums::{
    EdgeType, NetworkPhase, OperationalProfile, SectorType, SocialRole, TerminalOutcome,
    TerritoryType,
};
pub use events::{EventKind, SimulationEvent};
pub use ids::{EntityId, NodeId, SovereignId, TerritoryId};
pub use state::WorldState;
pub use structs::{
    GlobalEconomy, IdeologicalProfile, Relationship, SocialClass, StateFinance, Territory,
    Transition,
};
