//! # flight-rl-tasks
//!
//! Flight tasks built on the Flight-RL reward assessment engine.
//!
//! A task owns an [`Assessor`](flight_rl_core::Assessor), converts raw
//! simulator state into observation vectors, and decides when an episode
//! ends. The simulator itself stays behind the
//! [`PropertySource`](flight_rl_core::PropertySource) boundary; the RL
//! training loop calling [`Task::task_step`] lives outside this crate.

pub mod aircraft;
pub mod heading;
pub mod task;

pub use aircraft::{Aircraft, CESSNA_172P};
pub use heading::{HeadingControlTask, HeadingTaskConfig, TurnHeadingControlTask};
pub use task::{BoxSpace, StepResult, Task};
