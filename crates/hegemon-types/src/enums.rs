//! Enumeration types for the Hegemon simulation.
//!
//! Social roles, edge kinds, territory classifications, and the outcome
//! enums carried by terminal events.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

// ---------------------------------------------------------------------------
// Social roles
// ---------------------------------------------------------------------------

/// The position a social class occupies in the world system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum SocialRole {
    /// Workers in the periphery whose surplus is extracted.
    PeripheryProletariat,
    /// Local intermediaries who collect rent and forward tribute.
    Comprador,
    /// Owners of capital at the imperial core.
    CoreBourgeoisie,
    /// Core workers paid super-wages out of imperial rent.
    LaborAristocracy,
    /// Guards and police produced by labor-aristocracy decomposition.
    CarceralEnforcer,
    /// Core workers pushed out of the labor aristocracy into precarity.
    InternalProletariat,
    /// Small proprietors.
    PettyBourgeoisie,
    /// Declassed population outside formal production.
    Lumpenproletariat,
}

impl SocialRole {
    /// Whether this role belongs to the exploited strata that can spark.
    pub const fn is_proletarian(self) -> bool {
        matches!(
            self,
            Self::PeripheryProletariat | Self::InternalProletariat | Self::Lumpenproletariat
        )
    }
}

impl core::fmt::Display for SocialRole {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let name = match self {
            Self::PeripheryProletariat => "periphery_proletariat",
            Self::Comprador => "comprador",
            Self::CoreBourgeoisie => "core_bourgeoisie",
            Self::LaborAristocracy => "labor_aristocracy",
            Self::CarceralEnforcer => "carceral_enforcer",
            Self::InternalProletariat => "internal_proletariat",
            Self::PettyBourgeoisie => "petty_bourgeoisie",
            Self::Lumpenproletariat => "lumpenproletariat",
        };
        f.write_str(name)
    }
}

// ---------------------------------------------------------------------------
// Edge kinds
// ---------------------------------------------------------------------------

/// The kind of a directed relationship between two nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum EdgeType {
    /// Surplus extraction from worker to comprador.
    Exploitation,
    /// Comprador forwarding rent to the core.
    Tribute,
    /// Core paying super-wages to the labor aristocracy.
    Wages,
    /// Core subsidising a comprador regime's repression capacity.
    ClientState,
    /// Consciousness-carrying bond between classes.
    Solidarity,
    /// Spatial adjacency between territories.
    Adjacency,
    /// A class residing in a territory.
    Tenancy,
    /// Coercive pressure applied by one class to another.
    Repression,
}

impl core::fmt::Display for EdgeType {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let name = match self {
            Self::Exploitation => "exploitation",
            Self::Tribute => "tribute",
            Self::Wages => "wages",
            Self::ClientState => "client_state",
            Self::Solidarity => "solidarity",
            Self::Adjacency => "adjacency",
            Self::Tenancy => "tenancy",
            Self::Repression => "repression",
        };
        f.write_str(name)
    }
}

// ---------------------------------------------------------------------------
// Territory classification
// ---------------------------------------------------------------------------

/// The economic sector a territory hosts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum SectorType {
    /// Factories and warehouses.
    Industrial,
    /// Housing.
    Residential,
    /// Shops and offices.
    Commercial,
    /// Campuses.
    University,
    /// Ports and logistics.
    Docks,
    /// State buildings.
    Government,
}

/// How visible organizing activity in a territory is to the state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum OperationalProfile {
    /// Public organizing: recruits faster, accumulates heat.
    HighProfile,
    /// Clandestine organizing: heat decays.
    LowProfile,
}

/// Territory classification, including the sink kinds that receive
/// displaced population.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum TerritoryType {
    /// Imperial core territory.
    Core,
    /// Peripheral territory.
    Periphery,
    /// Containment sink with no necropolitical effect.
    Reservation,
    /// Sink that atomizes the organization of its tenants.
    PenalColony,
    /// Sink that eliminates its population.
    ConcentrationCamp,
}

impl TerritoryType {
    /// Routing priority for displaced population (higher wins).
    ///
    /// Returns `None` for territories that are not sinks.
    pub const fn sink_priority(self) -> Option<u8> {
        match self {
            Self::ConcentrationCamp => Some(3),
            Self::PenalColony => Some(2),
            Self::Reservation => Some(1),
            Self::Core | Self::Periphery => None,
        }
    }

    /// Whether displaced population can be routed into this territory.
    pub const fn is_sink(self) -> bool {
        self.sink_priority().is_some()
    }
}

// ---------------------------------------------------------------------------
// Outcomes
// ---------------------------------------------------------------------------

/// The terminal bifurcation reached once the carceral state loses control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum TerminalOutcome {
    /// The organized prisoner population overthrows the carceral order.
    Revolution,
    /// The carceral order resolves the surplus population by elimination.
    Genocide,
}

impl core::fmt::Display for TerminalOutcome {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Revolution => f.write_str("revolution"),
            Self::Genocide => f.write_str("genocide"),
        }
    }
}

/// Percolation phase of the solidarity network.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum NetworkPhase {
    /// Isolated cells; no connected movement.
    Gaseous,
    /// Clusters forming but no spanning component.
    Transitional,
    /// A giant component spans most of the active population.
    Liquid,
}

impl core::fmt::Display for NetworkPhase {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Gaseous => f.write_str("gaseous"),
            Self::Transitional => f.write_str("transitional"),
            Self::Liquid => f.write_str("liquid"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sink_priority_orders_camp_over_colony_over_reservation() {
        let camp = TerritoryType::ConcentrationCamp.sink_priority();
        let colony = TerritoryType::PenalColony.sink_priority();
        let reservation = TerritoryType::Reservation.sink_priority();
        assert!(camp > colony);
        assert!(colony > reservation);
        assert!(reservation.is_some());
        assert!(!TerritoryType::Core.is_sink());
        assert!(!TerritoryType::Periphery.is_sink());
    }

    #[test]
    fn roles_serialize_snake_case() {
        let json = serde_json::to_string(&SocialRole::LaborAristocracy).unwrap_or_default();
        assert_eq!(json, "\"labor_aristocracy\"");
        assert_eq!(SocialRole::LaborAristocracy.to_string(), "labor_aristocracy");
    }
}
