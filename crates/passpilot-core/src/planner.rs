//! Pass-strategy planner.
//!
//! Given the topics a student has already studied and an external-marks
//! target, greedily picks the topics that carry the most exam weight until
//! the projected marks reach the target.
//!
//! Ranking weight: `average_marks * (1 + frequency / max_frequency)`, with
//! `max_frequency` taken over the candidate topics. Average marks dominate;
//! a topic's frequency can at most double its weight. Ties break by
//! frequency (higher first), then topic name.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::AnalyzerError;
use crate::model::TopicRecord;

/// One recommended topic, in study order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlannedTopic {
    pub topic: String,
    pub frequency: usize,
    pub average_marks: f64,
    /// Ranking weight used to order candidates.
    pub weight: f64,
    /// Projected marks after adding this topic.
    pub cumulative_marks: f64,
}

/// Outcome of [`plan`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategyResult {
    /// Topics to study, in order.
    pub recommended_topics: Vec<PlannedTopic>,
    /// Sum of the recommended topics' average marks.
    pub projected_marks: f64,
    /// The target the plan was built for.
    pub target_marks: f64,
    /// Whether `projected_marks` reaches `target_marks`.
    pub feasible: bool,
    /// `projected_marks - target_marks`; negative when infeasible.
    pub margin: f64,
    /// Average marks of the studied topics, reported separately from the plan.
    pub studied_marks: f64,
    /// Studied topics that match no topic in the corpus.
    pub unmatched_studied_topics: Vec<String>,
}

impl StrategyResult {
    pub fn topic_names(&self) -> Vec<&str> {
        self.recommended_topics.iter().map(|t| t.topic.as_str()).collect()
    }
}

/// Normalize a topic label for studied-topic matching.
pub(crate) fn topic_key(topic: &str) -> String {
    topic.trim().to_lowercase()
}

pub(crate) fn validate_target(target: f64) -> Result<(), AnalyzerError> {
    if !target.is_finite() {
        return Err(AnalyzerError::invalid("target marks must be a finite number"));
    }
    if target < 0.0 {
        return Err(AnalyzerError::invalid(format!(
            "target marks must be non-negative, got {target}"
        )));
    }
    Ok(())
}

/// Split studied topic names into the matching corpus keys and the names
/// that match nothing.
pub(crate) fn match_studied(
    records: &[TopicRecord],
    studied: &[String],
) -> (HashSet<String>, Vec<String>) {
    let known: HashSet<String> = records.iter().map(|r| topic_key(&r.topic)).collect();
    let mut matched = HashSet::new();
    let mut unmatched = Vec::new();
    for name in studied {
        let key = topic_key(name);
        if key.is_empty() {
            continue;
        }
        if known.contains(&key) {
            matched.insert(key);
        } else if !unmatched.contains(name) {
            unmatched.push(name.clone());
        }
    }
    (matched, unmatched)
}

/// Build a study plan that reaches `target` external marks.
///
/// Studied topics are excluded from the candidate pool and do not count
/// toward the running total. An unreachable target is reported through
/// `feasible = false`, not as an error.
pub fn plan(
    records: &[TopicRecord],
    studied: &[String],
    target: f64,
) -> Result<StrategyResult, AnalyzerError> {
    validate_target(target)?;
    let (studied_keys, unmatched) = match_studied(records, studied);

    let (studied_records, candidates): (Vec<&TopicRecord>, Vec<&TopicRecord>) = records
        .iter()
        .partition(|r| studied_keys.contains(&topic_key(&r.topic)));
    let studied_marks: f64 = studied_records.iter().map(|r| r.average_marks).sum();

    let max_frequency = candidates.iter().map(|r| r.frequency).max().unwrap_or(1).max(1);
    let mut ranked: Vec<(&TopicRecord, f64)> = candidates
        .into_iter()
        .map(|r| {
            let weight = r.average_marks * (1.0 + r.frequency as f64 / max_frequency as f64);
            (r, weight)
        })
        .collect();
    ranked.sort_by(|(a, wa), (b, wb)| {
        wb.total_cmp(wa)
            .then_with(|| b.frequency.cmp(&a.frequency))
            .then_with(|| a.topic.cmp(&b.topic))
    });

    let mut recommended = Vec::new();
    let mut projected = 0.0;
    for (record, weight) in ranked {
        if projected >= target {
            break;
        }
        projected += record.average_marks;
        recommended.push(PlannedTopic {
            topic: record.topic.clone(),
            frequency: record.frequency,
            average_marks: record.average_marks,
            weight,
            cumulative_marks: projected,
        });
    }

    let feasible = projected >= target;
    if !feasible {
        tracing::debug!("target {target} unreachable: topic pool sums to {projected}");
    }

    Ok(StrategyResult {
        recommended_topics: recommended,
        projected_marks: projected,
        target_marks: target,
        feasible,
        margin: projected - target,
        studied_marks,
        unmatched_studied_topics: unmatched,
    })
}
