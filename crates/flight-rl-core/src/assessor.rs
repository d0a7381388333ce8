//! Aggregation of reward components into a per-step `Reward`

use std::collections::{HashMap, HashSet};

use crate::component::{EvalContext, RewardComponent};
use crate::error::{FlightRlError, Result};
use crate::reward::{Reward, ShapingMode};
use crate::state::StateSnapshot;

/// Immutable scoring configuration for a task.
///
/// Holds the base components always contributing to the training signal and
/// any shaping components, plus the [`ShapingMode`] deciding how the two mix.
/// Built once per task instantiation and reused across all steps and episodes;
/// `assess` carries no state between calls, so identical inputs always produce
/// identical rewards.
#[derive(Debug, Clone)]
pub struct Assessor {
    base: Vec<RewardComponent>,
    shaping: Vec<RewardComponent>,
    mode: ShapingMode,
}

impl Assessor {
    /// Build an assessor, rejecting inconsistent configurations.
    ///
    /// Fails when base is empty, when shaping components are supplied with
    /// mode [`ShapingMode::Off`], when two components share a name, or when a
    /// gated component names a trigger that is not declared before it in
    /// evaluation order (base first, then shaping).
    pub fn new(
        base: Vec<RewardComponent>,
        shaping: Vec<RewardComponent>,
        mode: ShapingMode,
    ) -> Result<Self> {
        if base.is_empty() {
            return Err(FlightRlError::InvalidConfig(
                "assessor requires at least one base component".into(),
            ));
        }
        if mode == ShapingMode::Off && !shaping.is_empty() {
            return Err(FlightRlError::InvalidConfig(format!(
                "{} shaping component(s) configured but shaping mode is off",
                shaping.len()
            )));
        }

        let mut declared: HashSet<&str> = HashSet::new();
        for component in base.iter().chain(shaping.iter()) {
            if let Some(trigger) = component.trigger() {
                if !declared.contains(trigger) {
                    return Err(FlightRlError::InvalidConfig(format!(
                        "gated component '{}' requires trigger '{}' to be declared before it",
                        component.name(),
                        trigger
                    )));
                }
            }
            if !declared.insert(component.name()) {
                return Err(FlightRlError::InvalidConfig(format!(
                    "duplicate component name '{}'",
                    component.name()
                )));
            }
        }

        Ok(Assessor {
            base,
            shaping,
            mode,
        })
    }

    /// Base components in evaluation order
    pub fn base_components(&self) -> &[RewardComponent] {
        &self.base
    }

    /// Shaping components in evaluation order
    pub fn shaping_components(&self) -> &[RewardComponent] {
        &self.shaping
    }

    /// The configured combination mode
    pub fn mode(&self) -> ShapingMode {
        self.mode
    }

    /// Score every component for one step and return the assembled [`Reward`].
    ///
    /// Evaluation is strictly sequential: base components in declared order,
    /// then shaping components. Each component sees the scores of everything
    /// evaluated earlier in the same pass, which is what gated components
    /// read their trigger from.
    pub fn assess(
        &self,
        current: &StateSnapshot,
        previous: &StateSnapshot,
        is_terminal: bool,
    ) -> Result<Reward> {
        let mut pass_scores = HashMap::with_capacity(self.base.len() + self.shaping.len());

        let base = evaluate_group(&self.base, current, previous, is_terminal, &mut pass_scores)?;
        let shaping = evaluate_group(
            &self.shaping,
            current,
            previous,
            is_terminal,
            &mut pass_scores,
        )?;

        Ok(Reward::new(base, shaping, self.mode))
    }
}

fn evaluate_group(
    components: &[RewardComponent],
    current: &StateSnapshot,
    previous: &StateSnapshot,
    is_terminal: bool,
    pass_scores: &mut HashMap<String, f64>,
) -> Result<Vec<(String, f64)>> {
    let mut scored = Vec::with_capacity(components.len());
    for component in components {
        let score = component.evaluate(&EvalContext {
            current,
            previous,
            is_terminal,
            pass_scores: &*pass_scores,
        })?;
        debug_assert!(
            (0.0..=1.0).contains(&score),
            "component '{}' scored {score} outside [0, 1]",
            component.name()
        );
        pass_scores.insert(component.name().to_string(), score);
        scored.push((component.name().to_string(), score));
    }
    Ok(scored)
}
