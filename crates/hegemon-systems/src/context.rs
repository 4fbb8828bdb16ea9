//! State carried between ticks that is not part of the snapshot.
//!
//! The caller owns one [`CrossTickContext`] for the lifetime of a run and
//! passes it to every `step`. It is never persisted: reloading a dumped
//! state starts with a fresh context.

use std::collections::BTreeMap;

use hegemon_types::{EntityId, TerminalOutcome};

/// Progress of the control-ratio state machine.
///
/// Moves forward only: `Dormant -> CrisisDetected -> Decided`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ControlRatioPhase {
    /// No crisis observed yet.
    #[default]
    Dormant,
    /// Prisoners outnumbered enforcer capacity at `tick`.
    CrisisDetected {
        /// Tick the crisis fired.
        tick: u64,
    },
    /// The terminal decision was taken.
    Decided {
        /// Tick the decision fired.
        tick: u64,
        /// The branch taken.
        outcome: TerminalOutcome,
    },
}

/// Orchestrator-owned memory between ticks.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CrossTickContext {
    /// Wealth each class held at the end of the previous consciousness pass.
    pub previous_wealth: BTreeMap<EntityId, f64>,
    /// Tick at which wages hit their floor during a rent contraction.
    ///
    /// Set by the economic circuit; may also be set by the caller to force
    /// decomposition.
    pub wage_crisis: Option<u64>,
    /// Tick of the first labor-aristocracy decomposition.
    pub decomposition_tick: Option<u64>,
    /// Control-ratio state machine.
    pub control_ratio: ControlRatioPhase,
    /// Imperial rent pool of the previous tick.
    pub previous_rent_pool: Option<f64>,
}

impl CrossTickContext {
    /// A context for the start of a run.
    pub fn new() -> Self {
        Self::default()
    }

    /// The terminal outcome, once decided.
    pub const fn terminal_outcome(&self) -> Option<TerminalOutcome> {
        match self.control_ratio {
            ControlRatioPhase::Decided { outcome, .. } => Some(outcome),
            ControlRatioPhase::Dormant | ControlRatioPhase::CrisisDetected { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_context_is_dormant() {
        let context = CrossTickContext::new();
        assert_eq!(context.control_ratio, ControlRatioPhase::Dormant);
        assert!(context.wage_crisis.is_none());
        assert!(context.terminal_outcome().is_none());
    }

    #[test]
    fn decided_phase_exposes_outcome() {
        let context = CrossTickContext {
            control_ratio: ControlRatioPhase::Decided {
                tick: 9,
                outcome: TerminalOutcome::Revolution,
            },
            ..CrossTickContext::default()
        };
        assert_eq!(context.terminal_outcome(), Some(TerminalOutcome::Revolution));
    }
}
