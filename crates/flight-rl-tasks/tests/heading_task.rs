//! Heading-control task behaviour against a stubbed simulator

use std::collections::HashMap;

use flight_rl_core::{FlightRlError, Property, PropertySource, Result, ShapingMode, property};
use flight_rl_tasks::{
    CESSNA_172P, HeadingControlTask, HeadingTaskConfig, Task, TurnHeadingControlTask,
    heading::INITIAL_HEADING_DEG,
};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Property-map simulator stub. `run_step` leaves state unchanged; tests
/// script state changes directly or via [`TransitioningSimStub`].
#[derive(Debug, Clone, Default)]
struct SimStub {
    values: HashMap<&'static str, f64>,
}

impl SimStub {
    /// Stub with every task state variable set to a value within its valid
    /// range, plus the raw position/clock properties the heading tasks read
    fn valid_for(task: &dyn Task) -> Self {
        let mut stub = SimStub::default();
        for prop in task.state_variables() {
            stub.values.insert(prop.name, midpoint(prop));
        }
        stub.values.insert(property::SIM_TIME_S.name, 0.0);
        stub.values.insert(property::DIST_TRAVEL_M.name, 0.0);
        stub.values.insert(property::LAT_GEOD_DEG.name, 51.3781);
        stub.values.insert(property::LNG_GEOC_DEG.name, -2.3273);
        stub
    }

    fn set_prop(&mut self, prop: &Property, value: f64) {
        self.values.insert(prop.name, value);
    }

    fn get_prop(&self, prop: &Property) -> f64 {
        self.values[prop.name]
    }
}

fn midpoint(prop: &Property) -> f64 {
    let mid = (prop.min + prop.max) / 2.0;
    if mid.is_finite() { mid } else { 0.0 }
}

impl PropertySource for SimStub {
    fn get(&self, prop: &Property) -> Result<f64> {
        self.values
            .get(prop.name)
            .copied()
            .ok_or_else(|| FlightRlError::lookup(prop.name))
    }

    fn set(&mut self, prop: &Property, value: f64) {
        self.values.insert(prop.name, value);
    }

    fn run_step(&mut self) -> Result<()> {
        Ok(())
    }
}

/// Presents one state until `run_step`, then switches to the next
#[derive(Debug, Clone)]
struct TransitioningSimStub {
    current: SimStub,
    next: Option<SimStub>,
}

impl TransitioningSimStub {
    fn new(initial: SimStub, next: SimStub) -> Self {
        TransitioningSimStub {
            current: initial,
            next: Some(next),
        }
    }
}

impl PropertySource for TransitioningSimStub {
    fn get(&self, prop: &Property) -> Result<f64> {
        self.current.get(prop)
    }

    fn set(&mut self, prop: &Property, value: f64) {
        self.current.set(prop, value);
    }

    fn run_step(&mut self) -> Result<()> {
        if let Some(next) = self.next.take() {
            self.current = next;
        }
        Ok(())
    }
}

fn make_task(shaping: ShapingMode) -> HeadingControlTask {
    HeadingControlTask::new(HeadingTaskConfig {
        shaping,
        episode_time_s: 1.0,
        step_frequency_hz: 1.0,
        aircraft: CESSNA_172P,
    })
    .unwrap()
}

const NO_ACTION: [f64; 3] = [0.0; 3];

/// Stub in a plausible episode-start state
fn initial_state_sim(task: &HeadingControlTask) -> SimStub {
    let mut sim = SimStub::valid_for(task);
    sim.set_prop(&property::SIM_TIME_S, 0.0);
    sim.set_prop(&property::DIST_TRAVEL_M, 0.0);
    sim.set_prop(&property::HEADING_DEG, INITIAL_HEADING_DEG);
    sim.set_prop(&property::ALTITUDE_SL_FT, 5000.0);
    sim.set_prop(&property::ROLL_RAD, 0.0);
    sim
}

/// Stub after an episode flown perfectly: maximum distance covered on the
/// target heading at the target altitude
fn perfect_state_sim(task: &HeadingControlTask, terminal: bool) -> SimStub {
    let mut sim = initial_state_sim(task);
    let time = if terminal {
        task.max_time_s() + 1.0
    } else {
        task.max_time_s() - 0.5
    };
    sim.set_prop(&property::SIM_TIME_S, time);
    sim.set_prop(&property::DIST_TRAVEL_M, task.distance_parallel().max);

    // move the position along the target heading
    let heading_rad = INITIAL_HEADING_DEG.to_radians();
    let lat = sim.get_prop(&property::LAT_GEOD_DEG) + heading_rad.cos();
    let lng = sim.get_prop(&property::LNG_GEOC_DEG) + heading_rad.sin();
    sim.set_prop(&property::LAT_GEOD_DEG, lat);
    sim.set_prop(&property::LNG_GEOC_DEG, lng);
    sim
}

#[test]
fn first_observation_covers_state_variables() {
    let mut task = make_task(ShapingMode::Off);
    let mut sim = SimStub::valid_for(&task);

    let observation = task.observe_first_state(&mut sim).unwrap();

    assert_eq!(observation.len(), task.state_variables().len());
}

#[test]
fn first_observation_sets_throttle_and_mixture() {
    let mut task = make_task(ShapingMode::Off);
    let mut sim = SimStub::valid_for(&task);

    task.observe_first_state(&mut sim).unwrap();

    assert_eq!(sim.get_prop(&property::THROTTLE_CMD), 0.8);
    assert_eq!(sim.get_prop(&property::MIXTURE_CMD), 0.8);
}

#[test]
fn step_before_first_observation_is_an_error() {
    let mut task = make_task(ShapingMode::Off);
    let mut sim = SimStub::valid_for(&task);

    let err = task.task_step(&mut sim, &NO_ACTION, 1).unwrap_err();
    assert!(matches!(err, FlightRlError::InvalidConfig(_)));
}

#[test]
fn wrong_action_arity_is_rejected() {
    let mut task = make_task(ShapingMode::Off);
    let mut sim = SimStub::valid_for(&task);
    task.observe_first_state(&mut sim).unwrap();

    let err = task.task_step(&mut sim, &[0.0, 0.0], 1).unwrap_err();
    assert!(matches!(err, FlightRlError::InvalidAction(_)));
}

#[test]
fn step_scalar_matches_assessment() {
    let mut task = make_task(ShapingMode::Off);
    let mut sim = SimStub::valid_for(&task);
    task.observe_first_state(&mut sim).unwrap();

    let step = task.task_step(&mut sim, &NO_ACTION, 1).unwrap();

    assert_eq!(step.observation.len(), task.state_variables().len());
    assert_eq!(step.reward, step.assessment.agent_reward());
}

#[test]
fn non_terminal_while_time_below_max() {
    let mut task = make_task(ShapingMode::Off);
    let mut sim = SimStub::valid_for(&task);
    task.observe_first_state(&mut sim).unwrap();
    sim.set_prop(&property::SIM_TIME_S, task.max_time_s() - 0.5);

    let step = task.task_step(&mut sim, &NO_ACTION, 1).unwrap();
    assert!(!step.done);
}

#[test]
fn terminal_when_time_reaches_max() {
    for overshoot in [0.0, 1.0] {
        let mut task = make_task(ShapingMode::Off);
        let mut sim = SimStub::valid_for(&task);
        task.observe_first_state(&mut sim).unwrap();
        sim.set_prop(&property::SIM_TIME_S, task.max_time_s() + overshoot);

        let step = task.task_step(&mut sim, &NO_ACTION, 1).unwrap();
        assert!(step.done);
    }
}

#[test]
fn perfect_terminal_flight_scores_one_without_shaping() {
    let mut task = make_task(ShapingMode::Off);
    let mut initial = initial_state_sim(&task);
    task.observe_first_state(&mut initial).unwrap();
    let final_state = perfect_state_sim(&task, true);
    let mut sim = TransitioningSimStub::new(initial, final_state);

    let step = task.task_step(&mut sim, &NO_ACTION, 1).unwrap();

    // maximum distance on the correct heading at the target altitude
    assert!((step.reward - 1.0).abs() < 1e-7);
    assert!(step.done);
}

#[test]
fn perfect_non_terminal_flight_scores_half_without_shaping() {
    let mut task = make_task(ShapingMode::Off);
    let mut initial = initial_state_sim(&task);
    task.observe_first_state(&mut initial).unwrap();
    let final_state = perfect_state_sim(&task, false);
    let mut sim = TransitioningSimStub::new(initial, final_state);

    let step = task.task_step(&mut sim, &NO_ACTION, 1).unwrap();

    // altitude keeping scores 1.0 but the terminal distance component is
    // still 0.0, so the base mean is 0.5
    assert!((step.reward - 0.5).abs() < 1e-7);
    assert!(!step.done);
}

#[test]
fn non_shaping_reward_is_one_for_perfect_flight_in_every_mode() {
    for shaping in [ShapingMode::Off, ShapingMode::Basic, ShapingMode::Additive] {
        let mut task = make_task(shaping);
        let mut initial = initial_state_sim(&task);
        task.observe_first_state(&mut initial).unwrap();
        let final_state = perfect_state_sim(&task, true);
        let mut sim = TransitioningSimStub::new(initial, final_state);

        let step = task.task_step(&mut sim, &NO_ACTION, 1).unwrap();

        assert!(
            (step.assessment.non_shaping_reward() - 1.0).abs() < 1e-7,
            "mode {shaping:?}"
        );
    }
}

#[test]
fn additive_mode_mixes_shaping_into_scalar() {
    let mut task = make_task(ShapingMode::Additive);
    let mut initial = initial_state_sim(&task);
    task.observe_first_state(&mut initial).unwrap();
    let final_state = perfect_state_sim(&task, true);
    let mut sim = TransitioningSimStub::new(initial, final_state);

    let step = task.task_step(&mut sim, &NO_ACTION, 1).unwrap();

    assert_eq!(step.assessment.base_scores().len(), 2);
    assert_eq!(step.assessment.shaping_scores().len(), 3);
    // perfect steady flight: every component at its ceiling, so the mixed
    // mean still comes to 1.0
    assert!((step.reward - 1.0).abs() < 1e-7);
}

#[test]
fn initial_conditions_describe_steady_level_flight() {
    let task = make_task(ShapingMode::Off);
    let ics = task.initial_conditions();

    assert_eq!(ics[&property::INITIAL_HEADING_DEG], INITIAL_HEADING_DEG);
    assert_eq!(ics[&property::INITIAL_ALTITUDE_FT], 5000.0);
    for prop in [
        property::INITIAL_U_FPS,
        property::INITIAL_V_FPS,
        property::INITIAL_W_FPS,
        property::INITIAL_P_RADPS,
        property::INITIAL_Q_RADPS,
        property::INITIAL_R_RADPS,
        property::INITIAL_ROC_FPM,
        property::INITIAL_TERRAIN_ALTITUDE_FT,
        property::INITIAL_LATITUDE_GEOD_DEG,
        property::INITIAL_LONGITUDE_GEOC_DEG,
    ] {
        assert!(ics.contains_key(&prop), "missing initial condition {prop}");
    }
    assert_eq!(ics[&property::INITIAL_U_FPS], CESSNA_172P.cruise_speed_fps());
}

#[test]
fn spaces_follow_property_bounds() {
    let task = make_task(ShapingMode::Off);

    let action_space = task.action_space();
    assert_eq!(action_space.len(), 3);
    assert!(action_space.low.iter().all(|&low| low == -1.0));
    assert!(action_space.high.iter().all(|&high| high == 1.0));

    let state_space = task.state_space();
    assert_eq!(state_space.len(), task.state_variables().len());
}

fn make_turn_task(seed: u64) -> TurnHeadingControlTask {
    TurnHeadingControlTask::with_rng(
        HeadingTaskConfig {
            shaping: ShapingMode::Off,
            episode_time_s: 1.0,
            step_frequency_hz: 1.0,
            aircraft: CESSNA_172P,
        },
        Box::new(ChaCha8Rng::seed_from_u64(seed)),
    )
    .unwrap()
}

#[test]
fn turn_task_observes_target_heading_last() {
    let mut task = make_turn_task(7);
    let mut sim = SimStub::valid_for(&task);

    let observation = task.observe_first_state(&mut sim).unwrap();

    assert_eq!(
        task.state_variables().last().unwrap(),
        &property::TARGET_HEADING_DEG
    );
    let target = *observation.last().unwrap();
    assert!((0.0..360.0).contains(&target));
    assert_eq!(target, task.target_heading_deg());
}

#[test]
fn turn_task_redraws_target_each_episode() {
    let mut task = make_turn_task(7);
    let mut sim = SimStub::valid_for(&task);

    let first = *task.observe_first_state(&mut sim).unwrap().last().unwrap();
    let second = *task.observe_first_state(&mut sim).unwrap().last().unwrap();

    assert_ne!(first, second);
}

#[test]
fn turn_task_seeded_rng_reproduces_targets() {
    let mut task_a = make_turn_task(42);
    let mut task_b = make_turn_task(42);
    let mut sim_a = SimStub::valid_for(&task_a);
    let mut sim_b = SimStub::valid_for(&task_b);

    task_a.observe_first_state(&mut sim_a).unwrap();
    task_b.observe_first_state(&mut sim_b).unwrap();

    assert_eq!(task_a.target_heading_deg(), task_b.target_heading_deg());
}
