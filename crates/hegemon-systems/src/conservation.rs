//! Wealth conservation audit for the economic circuit.
//!
//! Extraction, tribute, and wages only move wealth between classes, so the
//! total held by all classes must be identical before and after them. The
//! subsidy phase converts wealth into repression and is excluded.
//!
//! ```text
//! |total_after - total_before| <= tolerance
//! ```

use hegemon_graph::WorkingGraph;

/// The result of a conservation check.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ConservationResult {
    /// Totals match within tolerance.
    Balanced,
    /// Wealth appeared or vanished.
    Violated {
        /// Total before the audited flows.
        before: f64,
        /// Total after the audited flows.
        after: f64,
    },
}

/// Sum of wealth across every class node, living or not.
pub fn total_wealth(graph: &WorkingGraph) -> f64 {
    graph.entities().map(|e| e.wealth).sum()
}

/// Compare two totals against an absolute tolerance.
pub fn verify_conservation(before: f64, after: f64, tolerance: f64) -> ConservationResult {
    if (after - before).abs() <= tolerance {
        ConservationResult::Balanced
    } else {
        ConservationResult::Violated { before, after }
    }
}
