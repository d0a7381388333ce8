//! Error types for Flight-RL

use thiserror::Error;

/// Result type for Flight-RL operations
pub type Result<T> = std::result::Result<T, FlightRlError>;

/// Flight-RL error types
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FlightRlError {
    /// A state snapshot is missing a property a component needs.
    ///
    /// Never substituted with a default: a silently defaulted flight-dynamics
    /// property could mask a simulator bug. Aborts the run.
    #[error("property '{name}' missing from state snapshot")]
    PropertyLookup {
        /// Name of the unresolved property
        name: String,
    },

    /// Assessor or component configuration rejected at construction
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Action rejected by a task, e.g. wrong dimensionality
    #[error("invalid action: {0}")]
    InvalidAction(String),

    /// The external simulator reported a failure
    #[error("simulation error: {0}")]
    Simulation(String),
}

impl FlightRlError {
    /// Lookup error for a named property
    pub fn lookup(name: impl Into<String>) -> Self {
        FlightRlError::PropertyLookup { name: name.into() }
    }
}
