//! Error types for tick orchestration and observers.

use hegemon_systems::SystemError;

/// A tick that could not be committed.
///
/// The working graph of the failed tick is dropped; the caller still holds
/// the snapshot it passed in.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// A system returned an error while advancing the tick.
    #[error("system {system} failed at tick {tick}: {source}")]
    System {
        /// Name of the failing system.
        system: &'static str,
        /// Tick being advanced.
        tick: u64,
        /// The underlying system error.
        source: SystemError,
    },
}

/// Failure reported by a [`SimulationObserver`](crate::SimulationObserver).
///
/// The facade logs these and carries on; they never abort a tick.
#[derive(Debug, thiserror::Error)]
pub enum ObserverError {
    /// The observer was already borrowed elsewhere when notified.
    #[error("observer {observer} is busy")]
    Busy {
        /// Name of the observer.
        observer: String,
    },

    /// Serializing an observer payload failed.
    #[error("observer payload serialization failed: {source}")]
    Json {
        /// The underlying JSON error.
        #[from]
        source: serde_json::Error,
    },

    /// Any other observer-specific failure.
    #[error("observer {observer} failed: {message}")]
    Failed {
        /// Name of the observer.
        observer: String,
        /// What went wrong.
        message: String,
    },
}
