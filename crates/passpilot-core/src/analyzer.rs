//! The exam analyzer application context.
//!
//! [`ExamAnalyzer::initialize`] loads the corpus, fits the embedder and
//! builds the index in one synchronous step. The returned analyzer is either
//! ready or carries the reason it is not; every analytical operation checks
//! this first and fails with [`AnalyzerError::NotReady`].
//!
//! After construction nothing mutates the analyzer, so it can be shared
//! between threads (e.g. behind an `Arc`) and queried concurrently.

use std::path::Path;
use std::sync::Arc;

use serde::Serialize;

use crate::config::PassPilotConfig;
use crate::embedding::{Embedder, HashedTfIdf};
use crate::error::AnalyzerError;
use crate::index::{BuildReport, EmbeddingIndex, SearchHit};
use crate::loader::load_corpus;
use crate::model::{Corpus, TopicRecord};
use crate::planner::{self, StrategyResult};
use crate::simulation::{self, SimulationConfig, SimulationResult};
use crate::statistics::{self, CorpusStats, Distribution};

enum AnalyzerState {
    Ready {
        index: EmbeddingIndex,
        topics: Vec<TopicRecord>,
        build: BuildReport,
    },
    NotReady {
        reason: String,
    },
}

/// Search hits together with the distributions of the matched questions.
#[derive(Debug, Clone, Serialize)]
pub struct QueryResponse<'a> {
    pub query: String,
    pub total_matches: usize,
    pub results: Vec<SearchHit<'a>>,
    pub module_distribution: Distribution<String>,
    pub marks_distribution: Distribution<u32>,
}

/// Readiness summary.
#[derive(Debug, Clone, Serialize)]
pub struct HealthStatus {
    pub ready: bool,
    /// Why the analyzer is not ready, if it is not.
    pub reason: Option<String>,
    pub questions: usize,
    pub rejected_records: usize,
    pub indexed_questions: usize,
    pub embedding_warnings: usize,
}

/// Owns the corpus, the embedding index and the cached topic records.
pub struct ExamAnalyzer {
    corpus: Corpus,
    state: AnalyzerState,
}

impl std::fmt::Debug for ExamAnalyzer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExamAnalyzer")
            .field("questions", &self.corpus.len())
            .field("fitted", &self.is_fitted())
            .finish()
    }
}

impl ExamAnalyzer {
    /// Load questions from the configured data directory and build the index.
    pub fn initialize(config: &PassPilotConfig) -> Self {
        Self::initialize_from(&config.data_dir, config.embedding.dimension)
    }

    /// Load questions from `data_dir` and build a hashed TF-IDF index with
    /// `dimension` buckets.
    pub fn initialize_from(data_dir: &Path, dimension: usize) -> Self {
        tracing::info!("initializing exam analyzer from {}", data_dir.display());
        if !data_dir.is_dir() {
            tracing::warn!(
                "data folder {} not found, analyzer will have no data",
                data_dir.display()
            );
            return Self::not_ready(
                Corpus::default(),
                format!("data directory {} not found", data_dir.display()),
            );
        }

        let corpus = load_corpus(data_dir);
        let embedder = HashedTfIdf::fit(dimension, corpus.questions().iter().map(|q| q.text.as_str()));
        Self::from_corpus(corpus, Arc::new(embedder))
    }

    /// Build an analyzer over an already-loaded corpus.
    pub fn from_corpus(mut corpus: Corpus, embedder: Arc<dyn Embedder>) -> Self {
        if corpus.is_empty() {
            let reason = AnalyzerError::BuildFailure(format!(
                "no usable question records ({} rejected)",
                corpus.rejected()
            ))
            .to_string();
            tracing::error!("{reason}");
            return Self::not_ready(corpus, reason);
        }

        match EmbeddingIndex::build(&mut corpus, embedder) {
            Ok((index, build)) => {
                let topics = statistics::topic_records(corpus.questions());
                tracing::info!(
                    "exam analyzer ready: {} question(s), {} topic(s)",
                    corpus.len(),
                    topics.len()
                );
                Self {
                    corpus,
                    state: AnalyzerState::Ready {
                        index,
                        topics,
                        build,
                    },
                }
            }
            Err(e) => {
                tracing::error!("failed to initialize exam analyzer: {e}");
                Self::not_ready(corpus, e.to_string())
            }
        }
    }

    fn not_ready(corpus: Corpus, reason: String) -> Self {
        Self {
            corpus,
            state: AnalyzerState::NotReady { reason },
        }
    }

    /// Whether loading and index build both succeeded.
    pub fn is_fitted(&self) -> bool {
        matches!(self.state, AnalyzerState::Ready { .. })
    }

    /// The loaded corpus, available even when the build failed.
    pub fn corpus(&self) -> &Corpus {
        &self.corpus
    }

    /// Readiness, corpus size and build warnings.
    pub fn health(&self) -> HealthStatus {
        let (reason, indexed, warnings) = match &self.state {
            AnalyzerState::Ready { index, build, .. } => (None, index.len(), build.warnings.len()),
            AnalyzerState::NotReady { reason } => (Some(reason.clone()), 0, 0),
        };
        HealthStatus {
            ready: self.is_fitted(),
            reason,
            questions: self.corpus.len(),
            rejected_records: self.corpus.rejected(),
            indexed_questions: indexed,
            embedding_warnings: warnings,
        }
    }

    fn ready(&self) -> Result<(&EmbeddingIndex, &[TopicRecord], &BuildReport), AnalyzerError> {
        match &self.state {
            AnalyzerState::Ready {
                index,
                topics,
                build,
            } => Ok((index, topics, build)),
            AnalyzerState::NotReady { reason } => Err(AnalyzerError::NotReady(reason.clone())),
        }
    }

    /// Questions excluded from the index during the build.
    pub fn build_report(&self) -> Result<&BuildReport, AnalyzerError> {
        self.ready().map(|(_, _, build)| build)
    }

    /// Questions similar to `query`, most similar first.
    pub fn semantic_search(
        &self,
        query: &str,
        threshold: f32,
        top_k: i64,
    ) -> Result<Vec<SearchHit<'_>>, AnalyzerError> {
        let (index, _, _) = self.ready()?;
        index.search(&self.corpus, query, threshold, top_k)
    }

    /// Search plus the module and marks distributions of the hits.
    pub fn query(
        &self,
        query: &str,
        threshold: f32,
        top_k: i64,
    ) -> Result<QueryResponse<'_>, AnalyzerError> {
        let results = self.semantic_search(query, threshold, top_k)?;
        Ok(QueryResponse {
            query: query.trim().to_string(),
            total_matches: results.len(),
            module_distribution: statistics::module_distribution(results.iter().map(|h| h.question)),
            marks_distribution: statistics::marks_distribution(results.iter().map(|h| h.question)),
            results,
        })
    }

    /// Topics seen at least `min_frequency` times, most frequent first.
    pub fn topic_analysis(&self, min_frequency: usize) -> Result<Vec<TopicRecord>, AnalyzerError> {
        let (_, topics, _) = self.ready()?;
        Ok(statistics::topic_analysis(topics, min_frequency))
    }

    /// Corpus-wide counts.
    pub fn stats(&self) -> Result<CorpusStats, AnalyzerError> {
        self.ready()?;
        Ok(statistics::corpus_stats(&self.corpus))
    }

    /// Plan which topics to study to reach `target` external marks.
    pub fn pass_strategy(
        &self,
        studied_topics: &[String],
        target: f64,
    ) -> Result<StrategyResult, AnalyzerError> {
        let (_, topics, _) = self.ready()?;
        planner::plan(topics, studied_topics, target)
    }

    /// Estimate the probability of reaching `target` external marks.
    pub fn pass_simulation(
        &self,
        studied_topics: &[String],
        target: f64,
        config: &SimulationConfig,
    ) -> Result<SimulationResult, AnalyzerError> {
        let (_, topics, _) = self.ready()?;
        simulation::simulate(topics, studied_topics, target, config)
    }
}
