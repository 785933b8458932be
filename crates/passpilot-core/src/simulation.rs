//! Monte Carlo pass-probability simulation.
//!
//! Each trial decides, per non-studied topic, whether the student masters it.
//! The mastery probability grows linearly with how often the topic is
//! examined:
//!
//! ```text
//! p = floor + (ceiling - floor) * frequency / max_frequency
//! ```
//!
//! with `max_frequency` over all topics in the corpus. A mastered topic
//! contributes its average marks; studied topics always contribute theirs.
//! The fraction of trials whose total reaches the target is the pass
//! probability.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg64;
use serde::{Deserialize, Serialize};

use crate::error::AnalyzerError;
use crate::model::TopicRecord;
use crate::planner::{match_studied, topic_key, validate_target};

/// Default number of trials per simulation.
pub const DEFAULT_TRIALS: u32 = 10_000;

/// Maps topic frequency to the probability of mastering the topic.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MasteryCurve {
    /// Probability for the least frequently examined topic.
    pub floor: f64,
    /// Probability for the most frequently examined topic.
    pub ceiling: f64,
}

impl Default for MasteryCurve {
    fn default() -> Self {
        Self {
            floor: 0.35,
            ceiling: 0.85,
        }
    }
}

impl MasteryCurve {
    fn validate(&self) -> Result<(), AnalyzerError> {
        let in_unit = |p: f64| (0.0..=1.0).contains(&p);
        if !in_unit(self.floor) || !in_unit(self.ceiling) || self.floor > self.ceiling {
            return Err(AnalyzerError::invalid(format!(
                "mastery curve must satisfy 0 <= floor <= ceiling <= 1, got {}..{}",
                self.floor, self.ceiling
            )));
        }
        Ok(())
    }

    /// Mastery probability for a topic seen `frequency` times.
    pub fn probability(&self, frequency: usize, max_frequency: usize) -> f64 {
        let share = frequency as f64 / max_frequency.max(1) as f64;
        (self.floor + (self.ceiling - self.floor) * share).clamp(0.0, 1.0)
    }
}

/// Simulation parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Number of random trials.
    pub trials: u32,
    /// RNG seed. `None` draws one from OS entropy; the seed used is always
    /// reported in the result.
    pub seed: Option<u64>,
    /// Frequency → mastery probability mapping.
    pub curve: MasteryCurve,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            trials: DEFAULT_TRIALS,
            seed: None,
            curve: MasteryCurve::default(),
        }
    }
}

/// Per-topic input to the simulation, reported for transparency.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopicMastery {
    pub topic: String,
    pub average_marks: f64,
    /// Probability the topic contributes in a trial (1.0 when studied).
    pub probability: f64,
    pub studied: bool,
}

/// Selected percentiles of the simulated score distribution.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScorePercentiles {
    pub p10: f64,
    pub p50: f64,
    pub p90: f64,
}

/// Outcome of [`simulate`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationResult {
    /// Fraction of trials with a total at or above the target.
    pub pass_probability: f64,
    pub mean_score: f64,
    pub std_dev: f64,
    pub min_score: f64,
    pub max_score: f64,
    pub percentiles: ScorePercentiles,
    pub trials: u32,
    /// Seed the trials were drawn with.
    pub seed: u64,
    pub target_marks: f64,
    pub topics: Vec<TopicMastery>,
    /// Studied topics that match no topic in the corpus.
    pub unmatched_studied_topics: Vec<String>,
}

/// Estimate the probability of reaching `target` external marks.
///
/// The RNG is created per call, so concurrent simulations never share state.
/// The same seed, inputs and trial count always give the same result.
pub fn simulate(
    records: &[TopicRecord],
    studied: &[String],
    target: f64,
    config: &SimulationConfig,
) -> Result<SimulationResult, AnalyzerError> {
    validate_target(target)?;
    if config.trials == 0 {
        return Err(AnalyzerError::invalid("trial count must be at least 1"));
    }
    config.curve.validate()?;

    let (studied_keys, unmatched) = match_studied(records, studied);
    let max_frequency = records.iter().map(|r| r.frequency).max().unwrap_or(1);
    let topics: Vec<TopicMastery> = records
        .iter()
        .map(|r| {
            let studied = studied_keys.contains(&topic_key(&r.topic));
            TopicMastery {
                topic: r.topic.clone(),
                average_marks: r.average_marks,
                probability: if studied {
                    1.0
                } else {
                    config.curve.probability(r.frequency, max_frequency)
                },
                studied,
            }
        })
        .collect();

    let base: f64 = topics.iter().filter(|t| t.studied).map(|t| t.average_marks).sum();
    let uncertain: Vec<&TopicMastery> = topics.iter().filter(|t| !t.studied).collect();

    let seed = config.seed.unwrap_or_else(|| rand::rng().random());
    let mut rng = Pcg64::seed_from_u64(seed);

    let mut scores: Vec<f64> = (0..config.trials)
        .map(|_| {
            base + uncertain
                .iter()
                .filter(|t| rng.random_bool(t.probability))
                .map(|t| t.average_marks)
                .sum::<f64>()
        })
        .collect();

    let n = scores.len() as f64;
    let passed = scores.iter().filter(|&&s| s >= target).count();
    let mean = scores.iter().sum::<f64>() / n;
    let variance = scores.iter().map(|s| (s - mean).powi(2)).sum::<f64>() / n;

    scores.sort_by(f64::total_cmp);
    let percentiles = ScorePercentiles {
        p10: compute_percentile(&scores, 10.0),
        p50: compute_percentile(&scores, 50.0),
        p90: compute_percentile(&scores, 90.0),
    };

    tracing::debug!(
        "simulated {} trial(s) with seed {seed}: {passed} reached {target}",
        config.trials
    );

    Ok(SimulationResult {
        pass_probability: passed as f64 / n,
        mean_score: mean,
        std_dev: variance.sqrt(),
        min_score: scores[0],
        max_score: scores[scores.len() - 1],
        percentiles,
        trials: config.trials,
        seed,
        target_marks: target,
        topics,
        unmatched_studied_topics: unmatched,
    })
}

/// Nearest-rank percentile of ascending-sorted, non-empty data: the value at
/// rank `ceil(n * p / 100)`, 1-based.
fn compute_percentile(sorted_values: &[f64], percentile: f64) -> f64 {
    let rank = ((sorted_values.len() as f64 * percentile) / 100.0).ceil() as usize;
    sorted_values[rank.saturating_sub(1).min(sorted_values.len() - 1)]
}
