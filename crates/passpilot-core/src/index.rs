//! Embedding index over the question corpus.
//!
//! Built once after the corpus is loaded. Search is read-only, so a built
//! index can be shared between threads without locking.

use std::sync::Arc;

use serde::Serialize;

use crate::embedding::{cosine_similarity, Embedder};
use crate::error::{AnalyzerError, EmbeddingError};
use crate::model::{Corpus, Question};

/// A question that could not be embedded during the build.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmbeddingWarning {
    /// Id of the excluded question.
    pub question_id: String,
    /// Why embedding failed.
    pub message: String,
}

/// Outcome of [`EmbeddingIndex::build`].
#[derive(Debug, Clone, Default, Serialize)]
pub struct BuildReport {
    /// Questions that received an embedding.
    pub embedded: usize,
    /// Questions excluded from the index.
    pub warnings: Vec<EmbeddingWarning>,
}

/// A search match: a corpus question and its similarity to the query.
#[derive(Debug, Clone, Serialize)]
pub struct SearchHit<'a> {
    #[serde(flatten)]
    pub question: &'a Question,
    /// Cosine similarity in `[0, 1]`.
    pub similarity: f32,
}

/// Nearest-neighbour index over question embeddings.
pub struct EmbeddingIndex {
    embedder: Arc<dyn Embedder>,
    /// Corpus positions of embedded questions, in load order.
    entries: Vec<usize>,
}

impl std::fmt::Debug for EmbeddingIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EmbeddingIndex")
            .field("embedder", &self.embedder.name())
            .field("dimension", &self.embedder.dimension())
            .field("entries", &self.entries.len())
            .finish()
    }
}

impl EmbeddingIndex {
    /// Embed every question in the corpus.
    ///
    /// A question that fails to embed is left without an embedding and listed
    /// in the report. Producing no embeddings at all is a `BuildFailure`.
    pub fn build(
        corpus: &mut Corpus,
        embedder: Arc<dyn Embedder>,
    ) -> Result<(Self, BuildReport), AnalyzerError> {
        let dimension = embedder.dimension();
        let mut entries = Vec::with_capacity(corpus.len());
        let mut report = BuildReport::default();

        for (pos, question) in corpus.questions_mut().iter_mut().enumerate() {
            let embedded = embedder.embed(&question.text).and_then(|v| {
                if v.len() == dimension {
                    Ok(v)
                } else {
                    Err(EmbeddingError::DimensionMismatch {
                        expected: dimension,
                        actual: v.len(),
                    })
                }
            });

            match embedded {
                Ok(vector) => {
                    question.embedding = Some(vector);
                    entries.push(pos);
                }
                Err(e) => {
                    tracing::warn!("question {} excluded from index: {e}", question.id);
                    question.embedding = None;
                    report.warnings.push(EmbeddingWarning {
                        question_id: question.id.clone(),
                        message: e.to_string(),
                    });
                }
            }
        }

        report.embedded = entries.len();
        if entries.is_empty() {
            return Err(AnalyzerError::BuildFailure(format!(
                "no embeddings produced for {} question(s)",
                corpus.len()
            )));
        }

        tracing::info!(
            "embedding index built with {} ({} dims): {} indexed, {} excluded",
            embedder.name(),
            dimension,
            report.embedded,
            report.warnings.len()
        );

        Ok((Self { embedder, entries }, report))
    }

    /// Number of indexed questions.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Find questions similar to `query`.
    ///
    /// `threshold` is clamped into `[0, 1]`. Results are sorted by similarity,
    /// highest first, with ties kept in corpus order. A `top_k` of zero or
    /// less returns no results.
    pub fn search<'a>(
        &self,
        corpus: &'a Corpus,
        query: &str,
        threshold: f32,
        top_k: i64,
    ) -> Result<Vec<SearchHit<'a>>, AnalyzerError> {
        let query = query.trim();
        if query.is_empty() {
            return Err(AnalyzerError::invalid("query cannot be empty"));
        }
        if threshold.is_nan() {
            return Err(AnalyzerError::invalid("similarity threshold must be a number"));
        }
        if top_k <= 0 {
            return Ok(Vec::new());
        }
        let threshold = threshold.clamp(0.0, 1.0);

        let query_vec = match self.embedder.embed(query) {
            Ok(v) => v,
            // A query made only of stopwords or punctuation matches nothing.
            Err(EmbeddingError::EmptyText) => return Ok(Vec::new()),
            Err(e) => return Err(AnalyzerError::invalid(format!("cannot embed query: {e}"))),
        };
        if query_vec.len() != self.embedder.dimension() {
            return Err(AnalyzerError::invalid(format!(
                "query embedding has {} dims, index has {}",
                query_vec.len(),
                self.embedder.dimension()
            )));
        }

        let questions = corpus.questions();
        let mut hits: Vec<SearchHit<'a>> = self
            .entries
            .iter()
            .filter_map(|&pos| {
                let question = questions.get(pos)?;
                let similarity = cosine_similarity(&query_vec, question.embedding.as_deref()?);
                (similarity >= threshold).then_some(SearchHit {
                    question,
                    similarity,
                })
            })
            .collect();

        // Stable sort keeps insertion order for equal scores.
        hits.sort_by(|a, b| b.similarity.total_cmp(&a.similarity));
        hits.truncate(usize::try_from(top_k).unwrap_or(usize::MAX));

        tracing::debug!("search {query:?}: {} hit(s) at threshold {threshold}", hits.len());
        Ok(hits)
    }
}
