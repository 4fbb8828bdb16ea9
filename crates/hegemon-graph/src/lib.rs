//! Graph projection layer for the Hegemon simulation.
//!
//! Each tick the engine projects the immutable [`WorldState`] into a mutable
//! [`WorkingGraph`], lets the systems mutate it, and reconstructs a fresh
//! snapshot. The projection is lossless: an unmodified graph reconstructs to
//! a state equal to the one it came from.
//!
//! # Modules
//!
//! - [`error`] -- Error types for graph lookups and persistence.
//! - [`graph`] -- The [`WorkingGraph`] and its query/mutation API.
//! - [`projection`] -- [`project`] and [`reconstruct`].
//! - [`persist`] -- JSON dump and reload of states through the graph form.
//!
//! [`WorldState`]: hegemon_types::WorldState

pub mod error;
pub mod graph;
pub mod persist;
pub mod projection;

pub use error::GraphError;
pub use graph::{GraphMetadata, Node, WorkingGraph};
pub use persist::{dump_state, load_state};
pub use projection::{into_state, project, reconstruct};
