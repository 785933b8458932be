//! Core data model types for passpilot.
//!
//! These are the types shared by the loader, the index and the analytical
//! engines to represent historical exam questions and the corpus they form.

use std::collections::BTreeSet;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// A single historical exam question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    /// Unique identifier within the corpus.
    pub id: String,
    /// Module / course the question belongs to (e.g. "CST206").
    pub module: String,
    /// Free-text question body.
    pub text: String,
    /// Assigned topic label, if the question was tagged.
    #[serde(default)]
    pub topic: Option<String>,
    /// Marks awarded for the question.
    pub marks: u32,
    /// Source year or term (e.g. "2022" or "May 2023").
    #[serde(default)]
    pub year: Option<String>,
    /// Embedding of `text`, assigned once by the index build.
    #[serde(skip)]
    pub embedding: Option<Vec<f32>>,
}

impl Question {
    /// Create a question with no embedding.
    pub fn new(
        id: impl Into<String>,
        module: impl Into<String>,
        text: impl Into<String>,
        topic: Option<&str>,
        marks: u32,
    ) -> Self {
        Self {
            id: id.into(),
            module: module.into(),
            text: text.into(),
            topic: topic.map(str::to_string),
            marks,
            year: None,
            embedding: None,
        }
    }

    /// Returns `true` once the index build has assigned an embedding.
    pub fn is_embedded(&self) -> bool {
        self.embedding.is_some()
    }
}

/// A non-fatal problem found while loading the corpus.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoadWarning {
    /// File the problem was found in.
    pub path: PathBuf,
    /// Zero-based record position within the file, if the problem is per record.
    pub record: Option<usize>,
    /// Warning message.
    pub message: String,
}

/// The ordered collection of all loaded questions.
#[derive(Debug, Clone, Default)]
pub struct Corpus {
    questions: Vec<Question>,
    rejected: usize,
    warnings: Vec<LoadWarning>,
}

impl Corpus {
    pub fn new(questions: Vec<Question>) -> Self {
        Self {
            questions,
            rejected: 0,
            warnings: Vec::new(),
        }
    }

    pub(crate) fn from_parts(
        questions: Vec<Question>,
        rejected: usize,
        warnings: Vec<LoadWarning>,
    ) -> Self {
        Self {
            questions,
            rejected,
            warnings,
        }
    }

    /// Questions in load order.
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub(crate) fn questions_mut(&mut self) -> &mut [Question] {
        &mut self.questions
    }

    /// Number of records rejected during load.
    pub fn rejected(&self) -> usize {
        self.rejected
    }

    /// Problems recorded during load.
    pub fn warnings(&self) -> &[LoadWarning] {
        &self.warnings
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }
}

/// Aggregate over all questions sharing a topic label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopicRecord {
    /// Topic label.
    pub topic: String,
    /// Number of questions carrying this label.
    pub frequency: usize,
    /// Modules in which the topic appears.
    pub modules: BTreeSet<String>,
    /// Sum of marks over the topic's questions.
    pub total_marks: u64,
    /// `total_marks / frequency`.
    pub average_marks: f64,
}
