//! Reward components
//!
//! A [`RewardComponent`] maps simulator state to a score in `[0, 1]`. The set
//! of variants is closed: the assessor iterates components without caring
//! which variant it holds, and a `match` in [`RewardComponent::evaluate`]
//! replaces per-variant dispatch.
//!
//! Components clip rather than fail on out-of-range inputs. The only errors
//! they surface are property lookups against a snapshot that lacks the
//! property, which indicate a misconfigured task and abort the run.

use std::collections::HashMap;

use crate::error::{FlightRlError, Result};
use crate::property::Property;
use crate::state::StateSnapshot;

/// Normalizing scales at or below this are treated as degenerate and recover
/// to a neutral score instead of dividing.
const SCALE_EPSILON: f64 = 1e-12;

/// Target value a potential measures error against
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Target {
    /// Fixed target known at configuration time
    Constant(f64),
    /// Target read from another property, e.g. `target/heading-deg`
    Property(Property),
}

impl Target {
    fn resolve(&self, state: &StateSnapshot) -> Result<f64> {
        match self {
            Target::Constant(value) => Ok(*value),
            Target::Property(prop) => state.lookup(prop),
        }
    }
}

/// How a raw error maps to the unit interval
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorMap {
    /// `1 - clip(|err| / scale, 0, 1)`; zero beyond one scale of error
    Linear,
    /// `1 - r / (r + 1)` with `r = |err| / scale`; approaches zero asymptotically
    Asymptotic,
    /// Error reduced into [-180, 180] degrees, then linear
    AngularLinear,
}

/// Bounded potential function over one property: 1 at the target, falling
/// toward 0 as error grows.
#[derive(Debug, Clone, PartialEq)]
pub struct Potential {
    prop: Property,
    target: Target,
    scale: f64,
    map: ErrorMap,
}

impl Potential {
    pub fn new(prop: Property, target: Target, scale: f64, map: ErrorMap) -> Self {
        Potential {
            prop,
            target,
            scale,
            map,
        }
    }

    /// Evaluate the potential against a state snapshot.
    ///
    /// A degenerate scale yields the neutral 1.0: any error is within a
    /// vacuous tolerance, and dividing by it would poison the score.
    pub fn value(&self, state: &StateSnapshot) -> Result<f64> {
        let current = state.lookup(&self.prop)?;
        let target = self.target.resolve(state)?;

        if self.scale.abs() <= SCALE_EPSILON {
            return Ok(1.0);
        }

        let error = match self.map {
            ErrorMap::AngularLinear => reduce_reflex_angle_deg(current - target),
            _ => current - target,
        };
        let ratio = error.abs() / self.scale.abs();

        let value = match self.map {
            ErrorMap::Linear | ErrorMap::AngularLinear => 1.0 - ratio.clamp(0.0, 1.0),
            ErrorMap::Asymptotic => 1.0 - ratio / (ratio + 1.0),
        };
        Ok(value)
    }
}

/// Reduce an angle in degrees to the equivalent value in [-180, 180]
pub fn reduce_reflex_angle_deg(angle_deg: f64) -> f64 {
    let reduced = angle_deg.rem_euclid(360.0);
    if reduced > 180.0 { reduced - 360.0 } else { reduced }
}

/// Inputs to one component evaluation within an assessment pass
pub struct EvalContext<'a> {
    /// State at the current step
    pub current: &'a StateSnapshot,
    /// State at the previous step; on the first step of an episode the task
    /// layer passes the first observation here
    pub previous: &'a StateSnapshot,
    /// Whether the episode ends at this step
    pub is_terminal: bool,
    /// Scores of components already evaluated in this pass, by name
    pub pass_scores: &'a HashMap<String, f64>,
}

/// One scoring function contributing to the per-step reward
#[derive(Debug, Clone, PartialEq)]
pub enum RewardComponent {
    /// Zero until the terminal step, then progress toward a goal normalised
    /// by the maximum achievable progress
    Sparse {
        name: String,
        prop: Property,
        max_progress: f64,
    },
    /// Instantaneous potential against a target
    DensePotential { name: String, potential: Potential },
    /// Potential-difference shaping: `clip(Φ(cur) - Φ(prev) + 1, 0, 1)`.
    /// Neutral (1.0) when the two states agree or no previous state exists.
    Shaping { name: String, potential: Potential },
    /// Wraps another component; scores 0 unless the named trigger component's
    /// score from the same pass exceeds the threshold
    Gated {
        name: String,
        trigger: String,
        threshold: f64,
        inner: Box<RewardComponent>,
    },
}

impl RewardComponent {
    pub fn sparse(name: impl Into<String>, prop: Property, max_progress: f64) -> Self {
        RewardComponent::Sparse {
            name: name.into(),
            prop,
            max_progress,
        }
    }

    pub fn dense(name: impl Into<String>, potential: Potential) -> Self {
        RewardComponent::DensePotential {
            name: name.into(),
            potential,
        }
    }

    pub fn shaping(name: impl Into<String>, potential: Potential) -> Self {
        RewardComponent::Shaping {
            name: name.into(),
            potential,
        }
    }

    pub fn gated(
        name: impl Into<String>,
        trigger: impl Into<String>,
        threshold: f64,
        inner: RewardComponent,
    ) -> Self {
        RewardComponent::Gated {
            name: name.into(),
            trigger: trigger.into(),
            threshold,
            inner: Box::new(inner),
        }
    }

    /// Component name as reported on the `Reward`
    pub fn name(&self) -> &str {
        match self {
            RewardComponent::Sparse { name, .. }
            | RewardComponent::DensePotential { name, .. }
            | RewardComponent::Shaping { name, .. }
            | RewardComponent::Gated { name, .. } => name,
        }
    }

    /// Name of the sibling component gating this one, if any
    pub fn trigger(&self) -> Option<&str> {
        match self {
            RewardComponent::Gated { trigger, .. } => Some(trigger),
            _ => None,
        }
    }

    /// Score the component for one step. Always in `[0, 1]`.
    pub fn evaluate(&self, ctx: &EvalContext<'_>) -> Result<f64> {
        match self {
            RewardComponent::Sparse {
                prop, max_progress, ..
            } => {
                if !ctx.is_terminal {
                    return Ok(0.0);
                }
                let progress = ctx.current.lookup(prop)?;
                if max_progress.abs() <= SCALE_EPSILON {
                    // a zero-length goal is trivially met
                    return Ok(1.0);
                }
                Ok((progress / max_progress).clamp(0.0, 1.0))
            }
            RewardComponent::DensePotential { potential, .. } => potential.value(ctx.current),
            RewardComponent::Shaping { potential, .. } => {
                if ctx.previous.is_empty() {
                    return Ok(1.0);
                }
                let change = potential.value(ctx.current)? - potential.value(ctx.previous)?;
                Ok((change + 1.0).clamp(0.0, 1.0))
            }
            RewardComponent::Gated {
                name,
                trigger,
                threshold,
                inner,
            } => {
                let trigger_score = ctx.pass_scores.get(trigger).ok_or_else(|| {
                    FlightRlError::InvalidConfig(format!(
                        "gated component '{name}' evaluated before its trigger '{trigger}'"
                    ))
                })?;
                if *trigger_score > *threshold {
                    inner.evaluate(ctx)
                } else {
                    Ok(0.0)
                }
            }
        }
    }
}
