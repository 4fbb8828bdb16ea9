//! Typed tunables for the simulation systems.
//!
//! [`SimulationConfig`] holds the imperial-circuit coefficients; [`GameDefines`]
//! groups the per-system parameters. Both deserialize from the `simulation`
//! and `defines` sections of `hegemon-config.yaml`, and every field falls back
//! to a named default when absent.

use serde::{Deserialize, Serialize};

/// Imperial-circuit coefficients.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Fraction of a worker's wealth extracted per tick before resistance.
    #[serde(default = "default_extraction_efficiency")]
    pub extraction_efficiency: f64,

    /// Scales how strongly class consciousness resists extraction.
    #[serde(default = "default_consciousness_resistance")]
    pub consciousness_resistance: f64,

    /// Fraction of its wealth a comprador keeps when paying tribute.
    #[serde(default = "default_comprador_cut")]
    pub comprador_cut: f64,

    /// Baseline fraction of core wealth paid out as super-wages.
    #[serde(default = "default_super_wage_rate")]
    pub super_wage_rate: f64,

    /// Floor the dynamic wage rate cannot fall below.
    #[serde(default = "default_min_wage_rate")]
    pub min_wage_rate: f64,

    /// How far the wage rate moves per tick when rent contracts or recovers.
    #[serde(default = "default_wage_cut_step")]
    pub wage_cut_step: f64,

    /// Repression gained by a comprador per unit of subsidy.
    #[serde(default = "default_subsidy_conversion_rate")]
    pub subsidy_conversion_rate: f64,

    /// Ratio of `p_revolution` to `p_acquiescence` that triggers a subsidy.
    #[serde(default = "default_subsidy_trigger_threshold")]
    pub subsidy_trigger_threshold: f64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            extraction_efficiency: default_extraction_efficiency(),
            consciousness_resistance: default_consciousness_resistance(),
            comprador_cut: default_comprador_cut(),
            super_wage_rate: default_super_wage_rate(),
            min_wage_rate: default_min_wage_rate(),
            wage_cut_step: default_wage_cut_step(),
            subsidy_conversion_rate: default_subsidy_conversion_rate(),
            subsidy_trigger_threshold: default_subsidy_trigger_threshold(),
        }
    }
}

/// Per-system tunables.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct GameDefines {
    /// Economic-circuit accounting.
    #[serde(default)]
    pub economy: EconomyDefines,

    /// Consciousness bifurcation.
    #[serde(default)]
    pub consciousness: ConsciousnessDefines,

    /// Solidarity transmission.
    #[serde(default)]
    pub solidarity: SolidarityDefines,

    /// Survival calculus.
    #[serde(default)]
    pub survival: SurvivalDefines,

    /// Sparks and uprisings.
    #[serde(default)]
    pub struggle: StruggleDefines,

    /// Tension accumulation.
    #[serde(default)]
    pub contradiction: ContradictionDefines,

    /// Heat, eviction, and displacement.
    #[serde(default)]
    pub territory: TerritoryDefines,

    /// Subsistence burn.
    #[serde(default)]
    pub vitality: VitalityDefines,

    /// Labor-aristocracy decomposition.
    #[serde(default)]
    pub decomposition: DecompositionDefines,

    /// Control ratio and terminal decision.
    #[serde(default)]
    pub control_ratio: ControlRatioDefines,
}

/// Economic-circuit accounting tunables.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EconomyDefines {
    /// Absolute wealth drift tolerated by the conservation audit.
    #[serde(default = "default_conservation_tolerance")]
    pub conservation_tolerance: f64,
}

impl Default for EconomyDefines {
    fn default() -> Self {
        Self {
            conservation_tolerance: default_conservation_tolerance(),
        }
    }
}

/// Consciousness bifurcation tunables.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConsciousnessDefines {
    /// Relative wealth loss that counts as a crisis.
    #[serde(default = "default_crisis_threshold")]
    pub crisis_threshold: f64,

    /// Agitation gained per unit of relative loss.
    #[serde(default = "default_agitation_gain")]
    pub agitation_gain: f64,

    /// Fraction of agitation routed into an ideological pole per tick.
    #[serde(default = "default_routing_rate")]
    pub routing_rate: f64,

    /// Multiplier on agitation routed into national identity.
    #[serde(default = "default_loss_aversion")]
    pub loss_aversion: f64,

    /// Fractional agitation decay on ticks without crisis.
    #[serde(default = "default_agitation_decay")]
    pub agitation_decay: f64,

    /// Absolute drift of both ideological poles toward zero per tick.
    #[serde(default = "default_baseline_drift")]
    pub baseline_drift: f64,
}

impl Default for ConsciousnessDefines {
    fn default() -> Self {
        Self {
            crisis_threshold: default_crisis_threshold(),
            agitation_gain: default_agitation_gain(),
            routing_rate: default_routing_rate(),
            loss_aversion: default_loss_aversion(),
            agitation_decay: default_agitation_decay(),
            baseline_drift: default_baseline_drift(),
        }
    }
}

/// Solidarity transmission tunables.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SolidarityDefines {
    /// Fraction of the consciousness gap transmitted per unit of strength.
    #[serde(default = "default_transmission_rate")]
    pub transmission_rate: f64,

    /// Smallest transmission that is reported as an event.
    #[serde(default = "default_min_transmission")]
    pub min_transmission: f64,

    /// Consciousness level whose crossing is a mass awakening.
    #[serde(default = "default_mass_awakening_threshold")]
    pub mass_awakening_threshold: f64,
}

impl Default for SolidarityDefines {
    fn default() -> Self {
        Self {
            transmission_rate: default_transmission_rate(),
            min_transmission: default_min_transmission(),
            mass_awakening_threshold: default_mass_awakening_threshold(),
        }
    }
}

/// Survival calculus tunables.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SurvivalDefines {
    /// Sigmoid steepness of survival through acquiescence.
    #[serde(default = "default_steepness")]
    pub steepness: f64,
}

impl Default for SurvivalDefines {
    fn default() -> Self {
        Self {
            steepness: default_steepness(),
        }
    }
}

/// Spark and uprising tunables.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StruggleDefines {
    /// Repression at or above which a spark is possible.
    #[serde(default = "default_spark_repression_threshold")]
    pub spark_repression_threshold: f64,

    /// Agitation at or above which a spark is possible.
    #[serde(default = "default_spark_agitation_threshold")]
    pub spark_agitation_threshold: f64,

    /// Organization gained by a class that rises up.
    #[serde(default = "default_uprising_organization_boost")]
    pub uprising_organization_boost: f64,

    /// Fraction of wealth destroyed by an uprising.
    #[serde(default = "default_uprising_wealth_loss")]
    pub uprising_wealth_loss: f64,

    /// Strength added to each solidarity edge touching a rising class.
    #[serde(default = "default_solidarity_gain")]
    pub solidarity_gain: f64,
}

impl Default for StruggleDefines {
    fn default() -> Self {
        Self {
            spark_repression_threshold: default_spark_repression_threshold(),
            spark_agitation_threshold: default_spark_agitation_threshold(),
            uprising_organization_boost: default_uprising_organization_boost(),
            uprising_wealth_loss: default_uprising_wealth_loss(),
            solidarity_gain: default_solidarity_gain(),
        }
    }
}

/// Tension accumulation tunables.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ContradictionDefines {
    /// Tension gained per unit of wealth gap across an exploitation edge.
    #[serde(default = "default_tension_accumulation_rate")]
    pub tension_accumulation_rate: f64,
}

impl Default for ContradictionDefines {
    fn default() -> Self {
        Self {
            tension_accumulation_rate: default_tension_accumulation_rate(),
        }
    }
}

/// Territory dynamics tunables.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TerritoryDefines {
    /// Heat gained per tick by high-profile territories.
    #[serde(default = "default_heat_increment")]
    pub heat_increment: f64,

    /// Fractional heat lost per tick by low-profile territories.
    #[serde(default = "default_heat_decay")]
    pub heat_decay: f64,

    /// Heat at or above which eviction latches.
    #[serde(default = "default_eviction_threshold")]
    pub eviction_threshold: f64,

    /// Rent multiplier applied each tick under eviction.
    #[serde(default = "default_rent_spike_multiplier")]
    pub rent_spike_multiplier: f64,

    /// Fraction of population displaced each tick under eviction.
    #[serde(default = "default_displacement_rate")]
    pub displacement_rate: f64,

    /// Fraction of a heat gradient that spills across adjacency.
    #[serde(default = "default_spillover_rate")]
    pub spillover_rate: f64,

    /// Fraction of a concentration camp's population eliminated per tick.
    #[serde(default = "default_elimination_rate")]
    pub elimination_rate: f64,
}

impl Default for TerritoryDefines {
    fn default() -> Self {
        Self {
            heat_increment: default_heat_increment(),
            heat_decay: default_heat_decay(),
            eviction_threshold: default_eviction_threshold(),
            rent_spike_multiplier: default_rent_spike_multiplier(),
            displacement_rate: default_displacement_rate(),
            spillover_rate: default_spillover_rate(),
            elimination_rate: default_elimination_rate(),
        }
    }
}

/// Subsistence burn tunables.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VitalityDefines {
    /// Wealth every living class consumes per tick, before its multiplier.
    #[serde(default = "default_base_subsistence")]
    pub base_subsistence: f64,
}

impl Default for VitalityDefines {
    fn default() -> Self {
        Self {
            base_subsistence: default_base_subsistence(),
        }
    }
}

/// Labor-aristocracy decomposition tunables.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DecompositionDefines {
    /// Share of a decomposing class that becomes carceral enforcers.
    #[serde(default = "default_enforcer_fraction")]
    pub enforcer_fraction: f64,
}

impl Default for DecompositionDefines {
    fn default() -> Self {
        Self {
            enforcer_fraction: default_enforcer_fraction(),
        }
    }
}

/// Control-ratio and terminal-decision tunables.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ControlRatioDefines {
    /// Prisoners one enforcer can hold.
    #[serde(default = "default_capacity_per_guard")]
    pub capacity_per_guard: u64,

    /// Ticks after decomposition before the control ratio is checked.
    #[serde(default = "default_crisis_delay")]
    pub crisis_delay: u64,

    /// Ticks after the crisis before the terminal decision.
    #[serde(default = "default_decision_delay")]
    pub decision_delay: u64,

    /// Prisoner organization at or above which the outcome is revolution.
    #[serde(default = "default_revolution_threshold")]
    pub revolution_threshold: f64,
}

impl Default for ControlRatioDefines {
    fn default() -> Self {
        Self {
            capacity_per_guard: default_capacity_per_guard(),
            crisis_delay: default_crisis_delay(),
            decision_delay: default_decision_delay(),
            revolution_threshold: default_revolution_threshold(),
        }
    }
}

// ---------------------------------------------------------------------------
// Default value functions
// ---------------------------------------------------------------------------

const fn default_extraction_efficiency() -> f64 {
    0.8
}

const fn default_consciousness_resistance() -> f64 {
    1.0
}

const fn default_comprador_cut() -> f64 {
    0.15
}

const fn default_super_wage_rate() -> f64 {
    0.2
}

const fn default_min_wage_rate() -> f64 {
    0.05
}

const fn default_wage_cut_step() -> f64 {
    0.05
}

const fn default_subsidy_conversion_rate() -> f64 {
    0.1
}

const fn default_subsidy_trigger_threshold() -> f64 {
    1.5
}

const fn default_conservation_tolerance() -> f64 {
    1e-6
}

const fn default_crisis_threshold() -> f64 {
    0.1
}

const fn default_agitation_gain() -> f64 {
    1.0
}

const fn default_routing_rate() -> f64 {
    0.5
}

const fn default_loss_aversion() -> f64 {
    2.25
}

const fn default_agitation_decay() -> f64 {
    0.1
}

const fn default_baseline_drift() -> f64 {
    0.001
}

const fn default_transmission_rate() -> f64 {
    0.1
}

const fn default_min_transmission() -> f64 {
    0.001
}

const fn default_mass_awakening_threshold() -> f64 {
    0.6
}

const fn default_steepness() -> f64 {
    10.0
}

const fn default_spark_repression_threshold() -> f64 {
    0.5
}

const fn default_spark_agitation_threshold() -> f64 {
    0.3
}

const fn default_uprising_organization_boost() -> f64 {
    0.1
}

const fn default_uprising_wealth_loss() -> f64 {
    0.1
}

const fn default_solidarity_gain() -> f64 {
    0.1
}

const fn default_tension_accumulation_rate() -> f64 {
    0.01
}

const fn default_heat_increment() -> f64 {
    0.1
}

const fn default_heat_decay() -> f64 {
    0.1
}

const fn default_eviction_threshold() -> f64 {
    0.8
}

const fn default_rent_spike_multiplier() -> f64 {
    1.5
}

const fn default_displacement_rate() -> f64 {
    0.1
}

const fn default_spillover_rate() -> f64 {
    0.05
}

const fn default_elimination_rate() -> f64 {
    0.1
}

const fn default_base_subsistence() -> f64 {
    0.01
}

const fn default_enforcer_fraction() -> f64 {
    0.3
}

const fn default_capacity_per_guard() -> u64 {
    4
}

const fn default_crisis_delay() -> u64 {
    2
}

const fn default_decision_delay() -> u64 {
    3
}

const fn default_revolution_threshold() -> f64 {
    0.5
}
