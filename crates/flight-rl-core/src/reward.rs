//! The per-step reward value object

use serde::Serialize;

/// How shaping component scores combine with base scores.
///
/// Selected once at assessor construction and captured on every [`Reward`] the
/// assessor produces, so the combination arithmetic is a pure function of the
/// reward's own data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ShapingMode {
    /// No shaping components exist
    Off,
    /// Shaping scores are recorded for analysis but excluded from the
    /// learner-facing scalar
    Basic,
    /// Shaping scores are averaged into the learner-facing scalar
    Additive,
}

/// Scores of every reward component for one step, partitioned into base and
/// shaping groups.
///
/// Constructed only by an [`Assessor`](crate::Assessor); immutable afterwards.
/// Every score is in `[0, 1]` and serializes as a plain number, so a telemetry
/// consumer can log the full decomposition.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Reward {
    base: Vec<(String, f64)>,
    shaping: Vec<(String, f64)>,
    mode: ShapingMode,
}

impl Reward {
    pub(crate) fn new(
        base: Vec<(String, f64)>,
        shaping: Vec<(String, f64)>,
        mode: ShapingMode,
    ) -> Self {
        debug_assert!(!base.is_empty());
        debug_assert!(
            base.iter()
                .chain(shaping.iter())
                .all(|(_, s)| (0.0..=1.0).contains(s)),
            "component score outside [0, 1]"
        );
        Reward {
            base,
            shaping,
            mode,
        }
    }

    /// The scalar handed to the learner.
    ///
    /// Additive mode averages base and shaping scores together; Off and Basic
    /// average base scores only.
    pub fn reward(&self) -> f64 {
        match self.mode {
            ShapingMode::Additive => {
                mean(self.base.iter().chain(self.shaping.iter()).map(|(_, s)| *s))
            }
            ShapingMode::Off | ShapingMode::Basic => self.non_shaping_reward(),
        }
    }

    /// Alias for [`reward`](Self::reward), named for the task loop's caller
    pub fn agent_reward(&self) -> f64 {
        self.reward()
    }

    /// Mean of base scores only, regardless of mode.
    ///
    /// Lets shaped and unshaped runs of the same task be compared on an equal
    /// footing.
    pub fn non_shaping_reward(&self) -> f64 {
        mean(self.base.iter().map(|(_, s)| *s))
    }

    /// Base component `(name, score)` pairs in evaluation order
    pub fn base_scores(&self) -> &[(String, f64)] {
        &self.base
    }

    /// Shaping component `(name, score)` pairs in evaluation order
    pub fn shaping_scores(&self) -> &[(String, f64)] {
        &self.shaping
    }

    /// Whether any shaping components contributed
    pub fn is_shaping(&self) -> bool {
        !self.shaping.is_empty()
    }

    /// The combination mode captured at construction
    pub fn mode(&self) -> ShapingMode {
        self.mode
    }
}

fn mean(scores: impl Iterator<Item = f64>) -> f64 {
    let (sum, count) = scores.fold((0.0, 0usize), |(sum, count), s| (sum + s, count + 1));
    sum / count as f64
}
