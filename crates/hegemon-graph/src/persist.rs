//! JSON persistence through the graph form.
//!
//! A dumped state is its projected [`WorkingGraph`] encoded as JSON. This is
//! the only file format the engine defines.

use hegemon_types::WorldState;

use crate::error::GraphError;
use crate::graph::WorkingGraph;
use crate::projection::{into_state, project};

impl WorkingGraph {
    /// Encode the graph as pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, GraphError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Decode a graph from JSON.
    pub fn from_json(json: &str) -> Result<Self, GraphError> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Serialize a snapshot to JSON via its graph projection.
pub fn dump_state(state: &WorldState) -> Result<String, GraphError> {
    project(state).to_json()
}

/// Reload a snapshot previously written by [`dump_state`].
pub fn load_state(json: &str) -> Result<WorldState, GraphError> {
    let graph = WorkingGraph::from_json(json)?;
    let tick = graph.tick();
    Ok(into_state(graph, tick, None, None))
}
