//! The task boundary between the simulator and an RL training loop

use std::collections::HashMap;

use flight_rl_core::{Property, PropertySource, Result, Reward};

/// Continuous bounds for an observation or action vector, one entry per
/// property in declaration order
#[derive(Debug, Clone, PartialEq)]
pub struct BoxSpace {
    pub low: Vec<f64>,
    pub high: Vec<f64>,
}

impl BoxSpace {
    /// Bounds taken from the properties' valid ranges
    pub fn from_properties(props: &[Property]) -> Self {
        BoxSpace {
            low: props.iter().map(|p| p.min).collect(),
            high: props.iter().map(|p| p.max).collect(),
        }
    }

    /// Dimensionality of the space
    pub fn len(&self) -> usize {
        self.low.len()
    }

    pub fn is_empty(&self) -> bool {
        self.low.is_empty()
    }
}

/// Outcome of one task step, handed back to the training loop.
///
/// `reward` is the scalar the learner optimizes; `assessment` is the full
/// per-component decomposition kept as a diagnostics side channel.
#[derive(Debug, Clone)]
pub struct StepResult {
    /// Observation vector, one value per task state variable
    pub observation: Vec<f64>,
    /// Scalar reward for the learner
    pub reward: f64,
    /// Whether the episode ended at this step
    pub done: bool,
    /// Full reward decomposition for logging and analysis
    pub assessment: Reward,
}

/// A reinforcement-learning task over an external flight simulator.
///
/// The training loop owns the simulator; the task owns the observation,
/// reward, and termination logic. Call [`Task::observe_first_state`] once per
/// episode before stepping.
pub trait Task {
    /// Apply an action, advance the simulator `sim_steps` increments, and
    /// score the resulting state
    fn task_step(
        &mut self,
        sim: &mut dyn PropertySource,
        action: &[f64],
        sim_steps: u32,
    ) -> Result<StepResult>;

    /// Initialise a new episode from the simulator's current state and
    /// return the first observation
    fn observe_first_state(&mut self, sim: &mut dyn PropertySource) -> Result<Vec<f64>>;

    /// Property values the simulator must be initialised with for this task
    fn initial_conditions(&self) -> HashMap<Property, f64>;

    /// Properties making up the observation vector, in order
    fn state_variables(&self) -> &[Property];

    /// Properties the action vector writes, in order
    fn action_variables(&self) -> &[Property];

    /// Bounds of the observation vector
    fn state_space(&self) -> BoxSpace {
        BoxSpace::from_properties(self.state_variables())
    }

    /// Bounds of the action vector
    fn action_space(&self) -> BoxSpace {
        BoxSpace::from_properties(self.action_variables())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flight_rl_core::property;

    #[test]
    fn box_space_mirrors_property_bounds() {
        let props = [property::AILERON_CMD, property::THROTTLE_CMD];
        let space = BoxSpace::from_properties(&props);

        assert_eq!(space.len(), 2);
        assert_eq!(space.low, [-1.0, 0.0]);
        assert_eq!(space.high, [1.0, 1.0]);
    }
}
