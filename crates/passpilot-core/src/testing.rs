//! Shared fixtures for unit tests.

use std::collections::HashMap;

use crate::embedding::Embedder;
use crate::error::EmbeddingError;
use crate::model::{Corpus, Question};

/// An embedder that returns preset vectors keyed by exact text.
pub struct FixedEmbedder {
    dimension: usize,
    vectors: HashMap<String, Vec<f32>>,
}

impl FixedEmbedder {
    pub fn new(dimension: usize) -> Self {
        Self {
            dimension,
            vectors: HashMap::new(),
        }
    }

    pub fn with_vector(mut self, text: &str, vector: Vec<f32>) -> Self {
        self.vectors.insert(text.to_string(), vector);
        self
    }
}

impl Embedder for FixedEmbedder {
    fn name(&self) -> &str {
        "fixed"
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        self.vectors
            .get(text)
            .cloned()
            .ok_or(EmbeddingError::EmptyText)
    }
}

/// The four-question corpus: Arrays x2 (10 marks), Sorting (5), Graphs (15).
pub fn scenario_corpus() -> Corpus {
    Corpus::new(vec![
        Question::new("a1", "A", "Find the maximum element of an array.", Some("Arrays"), 10),
        Question::new("a2", "A", "Rotate an array by k positions.", Some("Arrays"), 10),
        Question::new("a3", "A", "Trace insertion sort on a small list.", Some("Sorting"), 5),
        Question::new("b1", "B", "Explain Dijkstra's shortest path algorithm.", Some("Graphs"), 15),
    ])
}

/// A slightly larger corpus with distinct vocabularies per topic.
pub fn algorithms_corpus() -> Corpus {
    let mut questions = vec![
        Question::new("q1", "CS201", "Explain merge sort and derive its time complexity.", Some("Sorting"), 10),
        Question::new("q2", "CS201", "Compare quick sort with merge sort for large inputs.", Some("Sorting"), 10),
        Question::new("q3", "CS201", "Write a program to reverse an array in place.", Some("Arrays"), 5),
        Question::new("q4", "CS201", "Describe breadth first search on a graph with an example.", Some("Graphs"), 15),
        Question::new("q5", "CS202", "Explain depth first search and detect cycles in a directed graph.", Some("Graphs"), 15),
        Question::new("q6", "CS202", "What is dynamic programming? Solve the knapsack problem.", Some("Dynamic Programming"), 10),
        Question::new("q7", "CS202", "Define a hash table and explain collision resolution.", None, 5),
    ];
    questions[0].year = Some("2021".into());
    questions[3].year = Some("2022".into());
    Corpus::new(questions)
}
