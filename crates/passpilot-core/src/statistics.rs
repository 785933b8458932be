//! Corpus statistics: module, marks and topic distributions.
//!
//! Every function takes any sequence of questions, so the same code serves
//! the whole corpus and a search result subset.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use serde::{Deserialize, Serialize};

use crate::model::{Corpus, Question, TopicRecord};

/// Counts per key, plus an explicit bucket for items with no usable key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Distribution<K: Ord> {
    /// Count per key, in key order.
    pub buckets: BTreeMap<K, usize>,
    /// Items whose key was missing or invalid.
    pub unknown: usize,
}

impl<K: Ord> Default for Distribution<K> {
    fn default() -> Self {
        Self {
            buckets: BTreeMap::new(),
            unknown: 0,
        }
    }
}

impl<K: Ord> Distribution<K> {
    fn add(&mut self, key: Option<K>) {
        match key {
            Some(k) => *self.buckets.entry(k).or_default() += 1,
            None => self.unknown += 1,
        }
    }

    /// Total items counted, including `unknown`.
    pub fn total(&self) -> usize {
        self.buckets.values().sum::<usize>() + self.unknown
    }

    /// Count for one key.
    pub fn get(&self, key: &K) -> usize {
        self.buckets.get(key).copied().unwrap_or(0)
    }
}

/// Count questions per module. Blank module ids go to `unknown`.
pub fn module_distribution<'a>(
    questions: impl IntoIterator<Item = &'a Question>,
) -> Distribution<String> {
    let mut dist = Distribution::default();
    for q in questions {
        let module = q.module.trim();
        dist.add((!module.is_empty()).then(|| module.to_string()));
    }
    dist
}

/// Count questions per marks value. A zero marks value goes to `unknown`.
pub fn marks_distribution<'a>(
    questions: impl IntoIterator<Item = &'a Question>,
) -> Distribution<u32> {
    let mut dist = Distribution::default();
    for q in questions {
        dist.add((q.marks > 0).then_some(q.marks));
    }
    dist
}

/// Build a record for every topic label, sorted by frequency (highest
/// first) and then by topic name. Untagged questions are ignored.
pub fn topic_records<'a>(questions: impl IntoIterator<Item = &'a Question>) -> Vec<TopicRecord> {
    let mut grouped: HashMap<&str, (usize, BTreeSet<String>, u64)> = HashMap::new();
    for q in questions {
        let Some(topic) = q.topic.as_deref().map(str::trim).filter(|t| !t.is_empty()) else {
            continue;
        };
        let entry = grouped.entry(topic).or_default();
        entry.0 += 1;
        entry.1.insert(q.module.clone());
        entry.2 += u64::from(q.marks);
    }

    let mut records: Vec<TopicRecord> = grouped
        .into_iter()
        .map(|(topic, (frequency, modules, total_marks))| TopicRecord {
            topic: topic.to_string(),
            frequency,
            modules,
            total_marks,
            average_marks: total_marks as f64 / frequency as f64,
        })
        .collect();
    records.sort_by(|a, b| b.frequency.cmp(&a.frequency).then_with(|| a.topic.cmp(&b.topic)));
    records
}

/// Topic records with `frequency >= min_frequency`, in [`topic_records`] order.
pub fn topic_analysis(records: &[TopicRecord], min_frequency: usize) -> Vec<TopicRecord> {
    records
        .iter()
        .filter(|r| r.frequency >= min_frequency)
        .cloned()
        .collect()
}

/// Corpus-wide summary, independent of any query.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorpusStats {
    /// Questions in the corpus.
    pub total_questions: usize,
    /// Records rejected during load.
    pub rejected_records: usize,
    /// Questions with an embedding.
    pub indexed_questions: usize,
    /// Questions per module.
    pub modules: Distribution<String>,
    /// Questions per marks value.
    pub marks: Distribution<u32>,
    /// Questions per source year/term.
    pub years: Distribution<String>,
    /// Number of distinct topic labels.
    pub total_topics: usize,
    /// Questions without a topic label.
    pub untagged_questions: usize,
}

/// Compute corpus-wide statistics.
pub fn corpus_stats(corpus: &Corpus) -> CorpusStats {
    let questions = corpus.questions();
    let mut years = Distribution::default();
    for q in questions {
        years.add(q.year.clone());
    }
    let topics: BTreeSet<&str> = questions
        .iter()
        .filter_map(|q| q.topic.as_deref().map(str::trim))
        .filter(|t| !t.is_empty())
        .collect();

    CorpusStats {
        total_questions: questions.len(),
        rejected_records: corpus.rejected(),
        indexed_questions: questions.iter().filter(|q| q.is_embedded()).count(),
        modules: module_distribution(questions),
        marks: marks_distribution(questions),
        years,
        total_topics: topics.len(),
        untagged_questions: questions
            .iter()
            .filter(|q| q.topic.as_deref().map_or(true, |t| t.trim().is_empty()))
            .count(),
    }
}
