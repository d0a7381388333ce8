//! State snapshots and the simulator boundary

use std::collections::HashMap;

use crate::error::{FlightRlError, Result};
use crate::property::Property;

/// Immutable view of simulator state at a single instant.
///
/// Built by the task layer from a [`PropertySource`] before each assessment.
/// Lookup of a property not present in the snapshot is a fatal error rather
/// than a default: a silently substituted flight-dynamics value could mask a
/// simulator bug.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StateSnapshot {
    values: HashMap<&'static str, f64>,
}

impl StateSnapshot {
    /// Empty snapshot
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the current value of a property
    pub fn insert(&mut self, prop: &Property, value: f64) {
        self.values.insert(prop.name, value);
    }

    /// Resolve a property to its recorded value
    pub fn lookup(&self, prop: &Property) -> Result<f64> {
        self.values
            .get(prop.name)
            .copied()
            .ok_or_else(|| FlightRlError::lookup(prop.name))
    }

    /// Whether the snapshot holds a value for the property
    pub fn contains(&self, prop: &Property) -> bool {
        self.values.contains_key(prop.name)
    }

    /// Number of recorded properties
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the snapshot is empty
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Narrow interface to the external flight-dynamics simulator.
///
/// The engine only ever reads and writes named properties and asks the
/// simulator to advance; running the simulator process itself lives outside
/// this crate.
pub trait PropertySource {
    /// Current value of a property
    fn get(&self, prop: &Property) -> Result<f64>;

    /// Set a property, e.g. a flight control command
    fn set(&mut self, prop: &Property, value: f64);

    /// Advance the simulation by one increment
    fn run_step(&mut self) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::property;

    #[test]
    fn lookup_returns_inserted_value() {
        let mut state = StateSnapshot::new();
        state.insert(&property::ALTITUDE_SL_FT, 5000.0);

        assert_eq!(state.lookup(&property::ALTITUDE_SL_FT).unwrap(), 5000.0);
    }

    #[test]
    fn missing_property_is_lookup_error() {
        let state = StateSnapshot::new();

        let err = state.lookup(&property::HEADING_DEG).unwrap_err();
        assert_eq!(
            err,
            FlightRlError::PropertyLookup {
                name: "attitude/psi-deg".into()
            }
        );
    }

    #[test]
    fn insert_overwrites() {
        let mut state = StateSnapshot::new();
        state.insert(&property::SIM_TIME_S, 1.0);
        state.insert(&property::SIM_TIME_S, 2.0);

        assert_eq!(state.lookup(&property::SIM_TIME_S).unwrap(), 2.0);
        assert_eq!(state.len(), 1);
    }
}
