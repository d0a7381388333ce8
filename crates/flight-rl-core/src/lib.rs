//! # flight-rl-core
//!
//! Reward assessment engine for Flight-RL tasks.
//!
//! This crate provides the types a flight task needs to turn simulator state
//! into a scored reward signal:
//! - Property references and the JSBSim property catalog
//! - State snapshots and the narrow simulator boundary
//! - Pluggable reward components (sparse, potential, shaping, gated)
//! - The assessor that aggregates components into a `Reward` per step

pub mod assessor;
pub mod component;
pub mod error;
pub mod property;
pub mod reward;
pub mod state;

pub use assessor::Assessor;
pub use component::{
    ErrorMap, EvalContext, Potential, RewardComponent, Target, reduce_reflex_angle_deg,
};
pub use error::{FlightRlError, Result};
pub use property::Property;
pub use reward::{Reward, ShapingMode};
pub use state::{PropertySource, StateSnapshot};
