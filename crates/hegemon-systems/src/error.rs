//! Error types for the `hegemon-systems` crate.
//!
//! Domain outcomes (deaths, ruptures, crises) are events, never errors. A
//! [`SystemError`] means the graph is malformed or an accounting invariant
//! broke, and aborts the tick.

use hegemon_graph::GraphError;

/// Errors a system can raise while mutating the working graph.
#[derive(Debug, thiserror::Error)]
pub enum SystemError {
    /// A node or edge lookup failed.
    #[error("graph error in {system}: {source}")]
    Graph {
        /// Name of the failing system.
        system: &'static str,
        /// The underlying graph error.
        source: GraphError,
    },

    /// Wealth was created or destroyed by flows that must conserve it.
    #[error("conservation violated at tick {tick}: {before} before, {after} after")]
    ConservationViolated {
        /// Tick being processed.
        tick: u64,
        /// Total wealth before the audited flows.
        before: f64,
        /// Total wealth after the audited flows.
        after: f64,
    },
}

impl SystemError {
    /// Wrap a graph error with the name of the system that hit it.
    pub const fn graph(system: &'static str, source: GraphError) -> Self {
        Self::Graph { system, source }
    }
}
