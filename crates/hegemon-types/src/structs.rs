//! Core node, edge, and aggregate record structs.
//!
//! Every struct here is a plain value: systems mutate copies held in the
//! working graph, and the engine freezes them back into a new
//! [`WorldState`](crate::WorldState) at the end of each tick.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::enums::{EdgeType, OperationalProfile, SectorType, SocialRole, TerritoryType};
use crate::ids::{EntityId, NodeId, TerritoryId};

// ---------------------------------------------------------------------------
// Fire-once transitions
// ---------------------------------------------------------------------------

/// A one-way `Dormant -> Triggered -> Resolved` latch stored on its subject.
///
/// Every fire-once transition in the simulation (edge rupture, eviction,
/// class decomposition) is recorded with one of these so that the firing
/// condition is never re-derived from attribute values.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(tag = "state", rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum Transition {
    /// The transition has not happened.
    #[default]
    Dormant,
    /// The transition fired at `tick`.
    Triggered {
        /// Tick at which the latch fired.
        tick: u64,
    },
    /// The transition fired and its consequences have been resolved.
    Resolved {
        /// Tick at which the latch was resolved.
        tick: u64,
    },
}

impl Transition {
    /// Whether the latch has never fired.
    pub const fn is_dormant(self) -> bool {
        matches!(self, Self::Dormant)
    }

    /// Whether the latch has fired (triggered or resolved).
    pub const fn has_fired(self) -> bool {
        !self.is_dormant()
    }

    /// Whether the latch has been resolved.
    pub const fn is_resolved(self) -> bool {
        matches!(self, Self::Resolved { .. })
    }

    /// Tick at which the latch last changed state, if it has fired.
    pub const fn fired_at(self) -> Option<u64> {
        match self {
            Self::Dormant => None,
            Self::Triggered { tick } | Self::Resolved { tick } => Some(tick),
        }
    }

    /// Fire the latch. Returns `true` only on the `Dormant -> Triggered` edge.
    pub const fn trigger(&mut self, tick: u64) -> bool {
        if self.is_dormant() {
            *self = Self::Triggered { tick };
            true
        } else {
            false
        }
    }

    /// Resolve a triggered latch. Returns `true` only on the
    /// `Triggered -> Resolved` edge.
    pub const fn resolve(&mut self, tick: u64) -> bool {
        if matches!(self, Self::Triggered { .. }) {
            *self = Self::Resolved { tick };
            true
        } else {
            false
        }
    }
}

// ---------------------------------------------------------------------------
// Social classes
// ---------------------------------------------------------------------------

/// Ideological coordinates of a social class. All axes live in `[0, 1]`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct IdeologicalProfile {
    /// Revolutionary class consciousness.
    pub class_consciousness: f64,
    /// Reactionary national identification.
    pub national_identity: f64,
    /// Undirected political energy produced by material crisis.
    pub agitation: f64,
}

impl IdeologicalProfile {
    /// Clamp every axis back into `[0, 1]`.
    pub fn clamp(&mut self) {
        self.class_consciousness = self.class_consciousness.clamp(0.0, 1.0);
        self.national_identity = self.national_identity.clamp(0.0, 1.0);
        self.agitation = self.agitation.clamp(0.0, 1.0);
    }
}

/// An aggregate social-class node.
///
/// Classes are created at scenario setup and never removed: death and
/// decomposition set `active = false` so their history stays addressable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct SocialClass {
    /// Node identifier.
    pub id: EntityId,
    /// Display name.
    pub name: String,
    /// Position in the world system.
    pub role: SocialRole,
    /// Accumulated wealth (never negative).
    pub wealth: f64,
    /// Ideological coordinates.
    pub ideology: IdeologicalProfile,
    /// Capacity for collective action in `[0, 1]`.
    pub organization: f64,
    /// Coercion experienced in `[0, 1]`.
    pub repression_faced: f64,
    /// Wealth level below which acquiescence stops guaranteeing survival.
    pub subsistence_threshold: f64,
    /// Per-class multiplier applied to the base subsistence burn.
    pub subsistence_multiplier: f64,
    /// Number of people the class represents.
    pub population: u64,
    /// Whether the class still participates in the simulation.
    pub active: bool,
    /// Biological consumption minimum.
    #[serde(default)]
    pub s_bio: f64,
    /// Social-reproduction consumption minimum.
    #[serde(default)]
    pub s_class: f64,
    /// Probability of survival by acquiescing to the current order.
    #[serde(default)]
    pub p_acquiescence: f64,
    /// Probability of survival through revolt.
    #[serde(default)]
    pub p_revolution: f64,
    /// Decomposition latch (labor aristocracy only).
    #[serde(default)]
    pub decomposition: Transition,
}

impl SocialClass {
    /// Create an active class with neutral defaults.
    pub fn new(id: impl Into<EntityId>, name: impl Into<String>, role: SocialRole) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            role,
            wealth: 0.0,
            ideology: IdeologicalProfile::default(),
            organization: 0.1,
            repression_faced: 0.5,
            subsistence_threshold: 0.3,
            subsistence_multiplier: 1.0,
            population: 1,
            active: true,
            s_bio: 0.0,
            s_class: 0.0,
            p_acquiescence: 0.0,
            p_revolution: 0.0,
            decomposition: Transition::Dormant,
        }
    }

    /// Set starting wealth.
    #[must_use]
    pub fn with_wealth(mut self, wealth: f64) -> Self {
        self.wealth = wealth;
        self
    }

    /// Set starting class consciousness.
    #[must_use]
    pub fn with_consciousness(mut self, class_consciousness: f64) -> Self {
        self.ideology.class_consciousness = class_consciousness;
        self
    }

    /// Set starting national identity.
    #[must_use]
    pub fn with_national_identity(mut self, national_identity: f64) -> Self {
        self.ideology.national_identity = national_identity;
        self
    }

    /// Set starting organization.
    #[must_use]
    pub fn with_organization(mut self, organization: f64) -> Self {
        self.organization = organization;
        self
    }

    /// Set starting repression.
    #[must_use]
    pub fn with_repression(mut self, repression_faced: f64) -> Self {
        self.repression_faced = repression_faced;
        self
    }

    /// Set population.
    #[must_use]
    pub fn with_population(mut self, population: u64) -> Self {
        self.population = population;
        self
    }

    /// Set biological and social-reproduction consumption minimums.
    #[must_use]
    pub fn with_consumption(mut self, s_bio: f64, s_class: f64) -> Self {
        self.s_bio = s_bio;
        self.s_class = s_class;
        self
    }

    /// Set the subsistence burn multiplier.
    #[must_use]
    pub fn with_subsistence_multiplier(mut self, multiplier: f64) -> Self {
        self.subsistence_multiplier = multiplier;
        self
    }

    /// Mark the class as dormant (inactive until it receives population).
    #[must_use]
    pub fn dormant(mut self) -> Self {
        self.active = false;
        self
    }

    /// Total consumption needed to stay alive this tick.
    pub fn consumption_needs(&self) -> f64 {
        self.s_bio + self.s_class
    }
}

// ---------------------------------------------------------------------------
// Territories
// ---------------------------------------------------------------------------

/// A spatial node carrying heat, population, and eviction state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Territory {
    /// Node identifier.
    pub id: TerritoryId,
    /// Display name.
    pub name: String,
    /// Dominant economic sector.
    pub sector_type: SectorType,
    /// Visibility of organizing activity.
    pub profile: OperationalProfile,
    /// State attention in `[0, 1]`.
    pub heat: f64,
    /// Territory classification (ordinary or sink).
    pub territory_type: TerritoryType,
    /// Resident population.
    pub population: u64,
    /// Current rent level.
    pub rent_level: f64,
    /// Eviction latch; once triggered it never clears.
    #[serde(default)]
    pub eviction: Transition,
    /// Ecological carrying capacity.
    #[serde(default)]
    pub biocapacity: f64,
}

impl Territory {
    /// Create a low-profile territory with zero heat and population.
    pub fn new(
        id: impl Into<TerritoryId>,
        name: impl Into<String>,
        sector_type: SectorType,
        territory_type: TerritoryType,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            sector_type,
            profile: OperationalProfile::LowProfile,
            heat: 0.0,
            territory_type,
            population: 0,
            rent_level: 1.0,
            eviction: Transition::Dormant,
            biocapacity: 100.0,
        }
    }

    /// Set the operational profile.
    #[must_use]
    pub fn with_profile(mut self, profile: OperationalProfile) -> Self {
        self.profile = profile;
        self
    }

    /// Set starting heat.
    #[must_use]
    pub fn with_heat(mut self, heat: f64) -> Self {
        self.heat = heat;
        self
    }

    /// Set starting population.
    #[must_use]
    pub fn with_population(mut self, population: u64) -> Self {
        self.population = population;
        self
    }

    /// Whether the eviction pipeline is running for this territory.
    pub const fn is_under_eviction(&self) -> bool {
        self.eviction.has_fired()
    }
}

// ---------------------------------------------------------------------------
// Relationships
// ---------------------------------------------------------------------------

/// A directed, typed edge between two nodes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Relationship {
    /// Origin node.
    pub source_id: NodeId,
    /// Destination node.
    pub target_id: NodeId,
    /// Kind of relationship.
    pub edge_type: EdgeType,
    /// Value moved along the edge during the most recent tick.
    #[serde(default)]
    pub value_flow: f64,
    /// Accumulated contradiction in `[0, 1]`.
    #[serde(default)]
    pub tension: f64,
    /// Strength of a solidarity bond in `[0, 1]`.
    #[serde(default)]
    pub solidarity_strength: f64,
    /// Maximum subsidy per tick on a client-state edge.
    #[serde(default)]
    pub subsidy_cap: f64,
    /// Rupture latch; fires once when tension reaches 1.0.
    #[serde(default)]
    pub rupture: Transition,
}

impl Relationship {
    /// Create an edge with zeroed flow, tension, and strength.
    pub fn new(
        source_id: impl Into<NodeId>,
        target_id: impl Into<NodeId>,
        edge_type: EdgeType,
    ) -> Self {
        Self {
            source_id: source_id.into(),
            target_id: target_id.into(),
            edge_type,
            value_flow: 0.0,
            tension: 0.0,
            solidarity_strength: 0.0,
            subsidy_cap: 0.0,
            rupture: Transition::Dormant,
        }
    }

    /// Set solidarity strength.
    #[must_use]
    pub fn with_strength(mut self, strength: f64) -> Self {
        self.solidarity_strength = strength;
        self
    }

    /// Set starting tension.
    #[must_use]
    pub fn with_tension(mut self, tension: f64) -> Self {
        self.tension = tension;
        self
    }

    /// Set the subsidy cap.
    #[must_use]
    pub fn with_subsidy_cap(mut self, cap: f64) -> Self {
        self.subsidy_cap = cap;
        self
    }
}

// ---------------------------------------------------------------------------
// Aggregates
// ---------------------------------------------------------------------------

/// World-level economic aggregates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct GlobalEconomy {
    /// Imperial rent extracted during the most recent tick.
    pub imperial_rent_pool: f64,
    /// Fraction of core wealth currently paid out as super-wages.
    pub current_super_wage_rate: f64,
    /// Aggregate repression level.
    pub current_repression_level: f64,
    /// Cumulative rent extracted since the start of the run.
    #[serde(default)]
    pub total_extracted: f64,
}

impl Default for GlobalEconomy {
    fn default() -> Self {
        Self {
            imperial_rent_pool: 0.0,
            current_super_wage_rate: 0.2,
            current_repression_level: 0.5,
            total_extracted: 0.0,
        }
    }
}

/// Fiscal record for one sovereign.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct StateFinance {
    /// Cash reserves.
    pub treasury: f64,
    /// Debt service as a fraction of revenue.
    pub burden_ratio: f64,
    /// Spending on policing.
    pub police_budget: f64,
    /// Spending on social reproduction.
    pub social_reproduction_budget: f64,
}
