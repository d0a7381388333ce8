//! Heading-control tasks
//!
//! [`HeadingControlTask`]: fly a fixed target heading while holding the
//! initial altitude for the length of the episode. Reward comes from distance
//! covered parallel to the target heading (scored at the terminal step) and
//! from altitude keeping, optionally densified by potential-difference
//! shaping. [`TurnHeadingControlTask`] randomises the target heading each
//! episode and exposes it in the observation.

use std::collections::HashMap;

use flight_rl_core::{
    Assessor, ErrorMap, FlightRlError, Potential, Property, PropertySource, Result,
    RewardComponent, ShapingMode, StateSnapshot, Target, property, reduce_reflex_angle_deg,
};
use rand::{Rng, RngCore, SeedableRng, rngs::StdRng};
use tracing::{debug, info};

use crate::aircraft::{Aircraft, CESSNA_172P};
use crate::task::{StepResult, Task};

/// Heading the aircraft starts on, and the fixed target heading
pub const INITIAL_HEADING_DEG: f64 = 270.0;

const INITIAL_ALTITUDE_FT: f64 = 5000.0;
const INITIAL_TERRAIN_ALTITUDE_FT: f64 = 0.00000001;
const INITIAL_LATITUDE_GEOD_DEG: f64 = 51.3781;
const INITIAL_LONGITUDE_GEOC_DEG: f64 = -2.3273;

const ALTITUDE_SCALING_FT: f64 = 150.0;
const ROLL_SCALING_RAD: f64 = 0.5;
const THROTTLE_CMD_SETTING: f64 = 0.8;
const MIXTURE_CMD_SETTING: f64 = 0.8;

/// The wings-level shaping term only pays out while the distance shaping
/// sibling scores above this
const WINGS_LEVEL_TRIGGER_THRESHOLD: f64 = 0.5;

const STATE_VARIABLES: [Property; 7] = [
    property::ALTITUDE_SL_FT,
    property::ALTITUDE_RATE_FPS,
    property::ROLL_RAD,
    property::PHI_DOT_RADPS,
    property::HEADING_DEG,
    property::PSI_DOT_RADPS,
    property::THETA_DOT_RADPS,
];

const ACTION_VARIABLES: [Property; 3] = [
    property::AILERON_CMD,
    property::ELEVATOR_CMD,
    property::RUDDER_CMD,
];

/// Configuration shared by the heading tasks
#[derive(Debug, Clone, Copy)]
pub struct HeadingTaskConfig {
    /// Shaping mode selecting this task's shaping components
    pub shaping: ShapingMode,
    /// Episode length [s]; the episode terminates once simulation time
    /// reaches this
    pub episode_time_s: f64,
    /// Agent interaction frequency [Hz], used to report episode length in
    /// steps
    pub step_frequency_hz: f64,
    /// Aircraft flown, deciding cruise performance
    pub aircraft: Aircraft,
}

impl Default for HeadingTaskConfig {
    fn default() -> Self {
        HeadingTaskConfig {
            shaping: ShapingMode::Off,
            episode_time_s: 60.0,
            step_frequency_hz: 5.0,
            aircraft: CESSNA_172P,
        }
    }
}

/// Per-episode bookkeeping, reset by `observe_first_state`
#[derive(Debug)]
struct EpisodeState {
    start_lat_deg: f64,
    start_lng_deg: f64,
    last_state: StateSnapshot,
}

/// Fly a fixed target heading at the initial altitude
#[derive(Debug)]
pub struct HeadingControlTask {
    config: HeadingTaskConfig,
    assessor: Assessor,
    state_variables: Vec<Property>,
    /// Task-derived property: distance travelled parallel to the target
    /// heading, bounded by the aircraft's maximum for the episode
    distance_parallel: Property,
    target_heading_deg: f64,
    episode: Option<EpisodeState>,
}

impl HeadingControlTask {
    pub fn new(config: HeadingTaskConfig) -> Result<Self> {
        Self::build(config, false)
    }

    /// Variant whose observation vector includes the target heading
    pub(crate) fn with_target_observed(config: HeadingTaskConfig) -> Result<Self> {
        Self::build(config, true)
    }

    fn build(config: HeadingTaskConfig, observe_target: bool) -> Result<Self> {
        let max_distance_m = config.aircraft.max_distance_m(config.episode_time_s);
        let distance_parallel = Property::bounded(
            property::DIST_TRAVEL_PARALLEL_HDG_M_NAME,
            "distance travelled parallel to the target heading [m]",
            0.0,
            max_distance_m,
        );
        let assessor = Self::select_assessor(config.shaping, distance_parallel, max_distance_m)?;

        let mut state_variables = STATE_VARIABLES.to_vec();
        if observe_target {
            state_variables.push(property::TARGET_HEADING_DEG);
        }

        Ok(HeadingControlTask {
            config,
            assessor,
            state_variables,
            distance_parallel,
            target_heading_deg: INITIAL_HEADING_DEG,
            episode: None,
        })
    }

    fn select_assessor(
        mode: ShapingMode,
        distance_parallel: Property,
        max_distance_m: f64,
    ) -> Result<Assessor> {
        let base = vec![
            RewardComponent::sparse("distance_travel", distance_parallel, max_distance_m),
            RewardComponent::dense("altitude_keeping", Self::altitude_potential()),
        ];

        let distance_potential = Potential::new(
            distance_parallel,
            Target::Constant(max_distance_m),
            max_distance_m,
            ErrorMap::Linear,
        );
        let shaping = match mode {
            ShapingMode::Off => vec![],
            ShapingMode::Basic => vec![RewardComponent::shaping(
                "distance_shaping",
                distance_potential,
            )],
            ShapingMode::Additive => vec![
                RewardComponent::shaping("distance_shaping", distance_potential),
                RewardComponent::shaping("altitude_shaping", Self::altitude_potential()),
                RewardComponent::gated(
                    "wings_level_shaping",
                    "distance_shaping",
                    WINGS_LEVEL_TRIGGER_THRESHOLD,
                    RewardComponent::shaping(
                        "roll_shaping",
                        Potential::new(
                            property::ROLL_RAD,
                            Target::Constant(0.0),
                            ROLL_SCALING_RAD,
                            ErrorMap::Linear,
                        ),
                    ),
                ),
            ],
        };

        Assessor::new(base, shaping, mode)
    }

    fn altitude_potential() -> Potential {
        Potential::new(
            property::ALTITUDE_SL_FT,
            Target::Constant(INITIAL_ALTITUDE_FT),
            ALTITUDE_SCALING_FT,
            ErrorMap::Linear,
        )
    }

    /// The task's reward configuration
    pub fn assessor(&self) -> &Assessor {
        &self.assessor
    }

    /// Target heading for the current episode [deg]
    pub fn target_heading_deg(&self) -> f64 {
        self.target_heading_deg
    }

    pub(crate) fn set_target_heading_deg(&mut self, heading_deg: f64) {
        self.target_heading_deg = heading_deg.rem_euclid(360.0);
    }

    /// Simulation time at which the episode terminates [s]
    pub fn max_time_s(&self) -> f64 {
        self.config.episode_time_s
    }

    /// The derived parallel-distance property, including its episode bound
    pub fn distance_parallel(&self) -> &Property {
        &self.distance_parallel
    }

    /// Recompute task-derived properties from the simulator's raw state
    fn update_derived_properties(
        &self,
        sim: &mut dyn PropertySource,
        episode: &EpisodeState,
    ) -> Result<()> {
        let distance_m = sim.get(&property::DIST_TRAVEL_M)?;
        let lat = sim.get(&property::LAT_GEOD_DEG)?;
        let lng = sim.get(&property::LNG_GEOC_DEG)?;
        let parallel = parallel_distance_m(
            distance_m,
            (episode.start_lat_deg, episode.start_lng_deg),
            (lat, lng),
            self.target_heading_deg,
        );
        sim.set(&self.distance_parallel, parallel.max(0.0));
        Ok(())
    }

    /// Snapshot every property the observation and the assessor read
    fn snapshot(&self, sim: &dyn PropertySource) -> Result<StateSnapshot> {
        let mut state = StateSnapshot::new();
        for prop in &self.state_variables {
            state.insert(prop, sim.get(prop)?);
        }
        state.insert(&self.distance_parallel, sim.get(&self.distance_parallel)?);
        Ok(state)
    }

    fn observation(&self, state: &StateSnapshot) -> Result<Vec<f64>> {
        self.state_variables
            .iter()
            .map(|prop| state.lookup(prop))
            .collect()
    }
}

impl Task for HeadingControlTask {
    fn observe_first_state(&mut self, sim: &mut dyn PropertySource) -> Result<Vec<f64>> {
        sim.set(&property::THROTTLE_CMD, THROTTLE_CMD_SETTING);
        sim.set(&property::MIXTURE_CMD, MIXTURE_CMD_SETTING);
        sim.set(&property::TARGET_HEADING_DEG, self.target_heading_deg);
        sim.set(&self.distance_parallel, 0.0);

        let start_lat_deg = sim.get(&property::LAT_GEOD_DEG)?;
        let start_lng_deg = sim.get(&property::LNG_GEOC_DEG)?;

        let state = self.snapshot(&*sim)?;
        let observation = self.observation(&state)?;

        info!(
            target_heading_deg = self.target_heading_deg,
            episode_time_s = self.config.episode_time_s,
            episode_steps = (self.config.episode_time_s * self.config.step_frequency_hz) as u64,
            "starting new episode"
        );

        self.episode = Some(EpisodeState {
            start_lat_deg,
            start_lng_deg,
            last_state: state,
        });
        Ok(observation)
    }

    fn task_step(
        &mut self,
        sim: &mut dyn PropertySource,
        action: &[f64],
        sim_steps: u32,
    ) -> Result<StepResult> {
        if action.len() != ACTION_VARIABLES.len() {
            return Err(FlightRlError::InvalidAction(format!(
                "expected {} action values, got {}",
                ACTION_VARIABLES.len(),
                action.len()
            )));
        }
        let mut episode = self.episode.take().ok_or_else(|| {
            FlightRlError::InvalidConfig(
                "observe_first_state must be called before task_step".into(),
            )
        })?;

        for (prop, value) in ACTION_VARIABLES.iter().zip(action) {
            sim.set(prop, *value);
        }
        for _ in 0..sim_steps {
            sim.run_step()?;
        }

        self.update_derived_properties(sim, &episode)?;
        let current = self.snapshot(&*sim)?;
        let is_terminal = sim.get(&property::SIM_TIME_S)? >= self.max_time_s();

        let assessment = self.assessor.assess(&current, &episode.last_state, is_terminal)?;
        let reward = assessment.agent_reward();
        debug!(
            reward,
            non_shaping = assessment.non_shaping_reward(),
            terminal = is_terminal,
            "assessed step"
        );
        if is_terminal {
            info!(reward, "episode ended");
        }

        let observation = self.observation(&current)?;
        episode.last_state = current;
        self.episode = Some(episode);

        Ok(StepResult {
            observation,
            reward,
            done: is_terminal,
            assessment,
        })
    }

    fn initial_conditions(&self) -> HashMap<Property, f64> {
        HashMap::from([
            (property::INITIAL_ALTITUDE_FT, INITIAL_ALTITUDE_FT),
            (
                property::INITIAL_TERRAIN_ALTITUDE_FT,
                INITIAL_TERRAIN_ALTITUDE_FT,
            ),
            (
                property::INITIAL_LATITUDE_GEOD_DEG,
                INITIAL_LATITUDE_GEOD_DEG,
            ),
            (
                property::INITIAL_LONGITUDE_GEOC_DEG,
                INITIAL_LONGITUDE_GEOC_DEG,
            ),
            // steady level flight on the initial heading
            (property::INITIAL_U_FPS, self.config.aircraft.cruise_speed_fps()),
            (property::INITIAL_V_FPS, 0.0),
            (property::INITIAL_W_FPS, 0.0),
            (property::INITIAL_P_RADPS, 0.0),
            (property::INITIAL_Q_RADPS, 0.0),
            (property::INITIAL_R_RADPS, 0.0),
            (property::INITIAL_ROC_FPM, 0.0),
            (property::INITIAL_HEADING_DEG, INITIAL_HEADING_DEG),
        ])
    }

    fn state_variables(&self) -> &[Property] {
        &self.state_variables
    }

    fn action_variables(&self) -> &[Property] {
        &ACTION_VARIABLES
    }
}

/// Distance travelled projected onto the target heading.
///
/// The track is a flat-earth bearing from the episode's start position;
/// episodes are short enough that curvature is negligible at this scale.
fn parallel_distance_m(
    total_distance_m: f64,
    start: (f64, f64),
    here: (f64, f64),
    target_heading_deg: f64,
) -> f64 {
    let dlat = here.0 - start.0;
    let dlng = here.1 - start.1;
    if dlat == 0.0 && dlng == 0.0 {
        return 0.0;
    }
    let track_deg = dlng.atan2(dlat).to_degrees();
    let off_track_deg = reduce_reflex_angle_deg(track_deg - target_heading_deg);
    total_distance_m * off_track_deg.to_radians().cos()
}

/// Heading task whose target heading is randomised each episode.
///
/// The target is exposed as the last element of the observation vector via
/// the `target/heading-deg` property.
pub struct TurnHeadingControlTask {
    inner: HeadingControlTask,
    rng: Box<dyn RngCore + Send>,
}

impl TurnHeadingControlTask {
    pub fn new(config: HeadingTaskConfig) -> Result<Self> {
        Self::with_rng(config, Box::new(StdRng::from_entropy()))
    }

    /// Construct with a caller-supplied RNG, e.g. a seeded one for
    /// reproducible episodes
    pub fn with_rng(config: HeadingTaskConfig, rng: Box<dyn RngCore + Send>) -> Result<Self> {
        Ok(TurnHeadingControlTask {
            inner: HeadingControlTask::with_target_observed(config)?,
            rng,
        })
    }

    pub fn assessor(&self) -> &Assessor {
        self.inner.assessor()
    }

    /// Target heading drawn for the current episode [deg]
    pub fn target_heading_deg(&self) -> f64 {
        self.inner.target_heading_deg()
    }
}

impl Task for TurnHeadingControlTask {
    fn observe_first_state(&mut self, sim: &mut dyn PropertySource) -> Result<Vec<f64>> {
        let target = self.rng.gen_range(0.0..360.0);
        self.inner.set_target_heading_deg(target);
        self.inner.observe_first_state(sim)
    }

    fn task_step(
        &mut self,
        sim: &mut dyn PropertySource,
        action: &[f64],
        sim_steps: u32,
    ) -> Result<StepResult> {
        self.inner.task_step(sim, action, sim_steps)
    }

    fn initial_conditions(&self) -> HashMap<Property, f64> {
        self.inner.initial_conditions()
    }

    fn state_variables(&self) -> &[Property] {
        self.inner.state_variables()
    }

    fn action_variables(&self) -> &[Property] {
        self.inner.action_variables()
    }
}
