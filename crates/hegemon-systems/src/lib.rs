//! Domain systems for the Hegemon simulation.
//!
//! Each system implements [`System`] and mutates the working graph for one
//! slice of the world: the imperial economic circuit, consciousness and
//! solidarity, survival and struggle, contradiction, territory, vitality,
//! decomposition, and the control ratio. Systems communicate through the
//! [`EventBus`] and the orchestrator-owned [`CrossTickContext`].
//!
//! # Modules
//!
//! - [`bus`] -- Publish/subscribe event channel with isolated handlers.
//! - [`config`] -- [`SimulationConfig`] and [`GameDefines`] tunables.
//! - [`conservation`] -- Wealth conservation audit for the circuit.
//! - [`context`] -- [`CrossTickContext`] and the control-ratio phase.
//! - [`error`] -- [`SystemError`].
//! - [`system`] -- The [`System`] trait and [`StepContext`].
//! - One module per system.

pub mod bus;
pub mod config;
pub mod conservation;
pub mod consciousness;
pub mod context;
pub mod contradiction;
pub mod control_ratio;
pub mod decomposition;
pub mod economic;
pub mod error;
pub mod solidarity;
pub mod struggle;
pub mod survival;
pub mod system;
pub mod territory;
pub mod vitality;

mod util;

pub use bus::{EventBus, EventHandler};
pub use config::{
    ConsciousnessDefines, ContradictionDefines, ControlRatioDefines, DecompositionDefines,
    EconomyDefines, GameDefines, SimulationConfig, SolidarityDefines, StruggleDefines,
    SurvivalDefines, TerritoryDefines, VitalityDefines,
};
pub use consciousness::ConsciousnessSystem;
pub use context::{ControlRatioPhase, CrossTickContext};
pub use contradiction::ContradictionSystem;
pub use control_ratio::ControlRatioSystem;
pub use decomposition::DecompositionSystem;
pub use economic::EconomicCircuit;
pub use error::SystemError;
pub use solidarity::SolidaritySystem;
pub use struggle::StruggleSystem;
pub use survival::SurvivalSystem;
pub use system::{StepContext, System};
pub use territory::TerritorySystem;
pub use vitality::VitalitySystem;
