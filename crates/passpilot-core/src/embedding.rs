//! Text embedding.
//!
//! The [`Embedder`] trait is the seam between the index and whatever turns
//! text into vectors. The default implementation, [`HashedTfIdf`], is a
//! deterministic feature-hashing TF-IDF model fitted on the corpus, so the
//! analyzer needs no model files and no network access.

use std::collections::HashMap;

use crate::error::EmbeddingError;

/// Default number of hash buckets.
pub const DEFAULT_DIMENSION: usize = 512;

/// Turns text into fixed-size vectors.
///
/// Every vector produced by one embedder has length [`Embedder::dimension`];
/// the index relies on this to compare query and question vectors.
pub trait Embedder: Send + Sync {
    /// Human-readable embedder name.
    fn name(&self) -> &str;

    /// Length of every vector this embedder produces.
    fn dimension(&self) -> usize;

    /// Embed a single text.
    fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError>;
}

/// Feature-hashing TF-IDF embedder.
///
/// Unigrams and adjacent-word bigrams are hashed into `dimension` buckets.
/// Each bucket is weighted `(1 + ln tf) * idf`, where the smoothed IDF
/// `ln((1 + n) / (1 + df)) + 1` is fitted over the corpus at build time.
/// Vectors are L2-normalized.
#[derive(Debug, Clone)]
pub struct HashedTfIdf {
    dimension: usize,
    idf: Vec<f32>,
}

impl HashedTfIdf {
    /// An unfitted embedder: every bucket has IDF 1.
    pub fn new(dimension: usize) -> Self {
        let dimension = dimension.max(1);
        Self {
            dimension,
            idf: vec![1.0; dimension],
        }
    }

    /// Fit bucket IDF weights over a set of documents.
    pub fn fit<'a>(dimension: usize, documents: impl IntoIterator<Item = &'a str>) -> Self {
        let mut embedder = Self::new(dimension);
        let mut doc_freq = vec![0u32; embedder.dimension];
        let mut n_docs = 0u32;

        for doc in documents {
            n_docs += 1;
            let mut seen = vec![false; embedder.dimension];
            for feature in features(doc) {
                let bucket = embedder.bucket(&feature);
                if !seen[bucket] {
                    seen[bucket] = true;
                    doc_freq[bucket] += 1;
                }
            }
        }

        let n = n_docs as f32;
        embedder.idf = doc_freq
            .into_iter()
            .map(|df| ((1.0 + n) / (1.0 + df as f32)).ln() + 1.0)
            .collect();
        tracing::debug!(
            "fitted hashed tf-idf over {n_docs} document(s), {} buckets",
            embedder.dimension
        );
        embedder
    }

    fn bucket(&self, feature: &str) -> usize {
        (fnv1a(feature.as_bytes()) % self.dimension as u64) as usize
    }
}

impl Embedder for HashedTfIdf {
    fn name(&self) -> &str {
        "hashed-tfidf"
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        let mut counts: HashMap<usize, u32> = HashMap::new();
        for feature in features(text) {
            *counts.entry(self.bucket(&feature)).or_default() += 1;
        }
        if counts.is_empty() {
            return Err(EmbeddingError::EmptyText);
        }

        let mut vector = vec![0.0f32; self.dimension];
        for (bucket, tf) in counts {
            vector[bucket] = (1.0 + (tf as f32).ln()) * self.idf[bucket];
        }
        normalize(&mut vector);
        Ok(vector)
    }
}

const STOPWORDS: &[&str] = &[
    "a", "an", "and", "are", "as", "at", "be", "by", "can", "do", "does", "for", "from", "how",
    "in", "is", "it", "its", "of", "on", "or", "that", "the", "this", "to", "was", "what", "when",
    "where", "which", "with", "why",
];

fn tokenize(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|token| !token.is_empty())
        .map(|token| token.to_lowercase())
        .filter(|token| !STOPWORDS.contains(&token.as_str()))
        .collect()
}

/// Unigrams followed by adjacent-word bigrams.
fn features(text: &str) -> Vec<String> {
    let tokens = tokenize(text);
    let bigrams: Vec<String> = tokens
        .windows(2)
        .map(|pair| format!("{} {}", pair[0], pair[1]))
        .collect();
    tokens.into_iter().chain(bigrams).collect()
}

/// 64-bit FNV-1a; stable across runs and platforms.
fn fnv1a(bytes: &[u8]) -> u64 {
    const OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
    const PRIME: u64 = 0x0000_0100_0000_01b3;
    bytes
        .iter()
        .fold(OFFSET, |hash, &b| (hash ^ u64::from(b)).wrapping_mul(PRIME))
}

/// Cosine similarity clamped into `[0, 1]`.
///
/// Vectors of different lengths, or with a near-zero norm, score 0.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() {
        return 0.0;
    }

    const EPSILON: f32 = 1e-10;

    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a < EPSILON || norm_b < EPSILON {
        0.0
    } else {
        (dot / (norm_a * norm_b)).clamp(0.0, 1.0)
    }
}

/// Normalize a vector to unit length in place. Near-zero vectors are left unchanged.
fn normalize(v: &mut [f32]) {
    let norm_sq: f32 = v.iter().map(|x| x * x).sum();
    if norm_sq > 1e-20 {
        let norm = norm_sq.sqrt();
        for x in v.iter_mut() {
            *x /= norm;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn corpus() -> Vec<&'static str> {
        vec![
            "Explain binary search on a sorted array.",
            "Write an algorithm for merge sort and analyse its complexity.",
            "Describe the producer consumer problem using semaphores.",
        ]
    }

    #[test]
    fn tokenize_drops_stopwords_and_punctuation() {
        assert_eq!(
            tokenize("What is the Time-Complexity of QuickSort?"),
            vec!["time", "complexity", "quicksort"]
        );
    }

    #[test]
    fn features_include_bigrams() {
        let f = features("binary search tree");
        assert!(f.contains(&"binary search".to_string()));
        assert!(f.contains(&"search tree".to_string()));
        assert_eq!(f.len(), 5);
    }

    #[test]
    fn embedding_is_deterministic_and_normalized() {
        let embedder = HashedTfIdf::fit(128, corpus());
        let a = embedder.embed("binary search").unwrap();
        let b = embedder.embed("binary search").unwrap();
        assert_eq!(a, b);
        assert_eq!(a.len(), 128);
        let norm: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
        assert!((norm - 1.0).abs() < 1e-5);
    }

    #[test]
    fn similar_texts_score_higher() {
        let embedder = HashedTfIdf::fit(DEFAULT_DIMENSION, corpus());
        let query = embedder.embed("binary search in a sorted array").unwrap();
        let close = embedder.embed(corpus()[0]).unwrap();
        let far = embedder.embed(corpus()[2]).unwrap();
        assert!(cosine_similarity(&query, &close) > cosine_similarity(&query, &far));
    }

    #[test]
    fn empty_text_fails() {
        let embedder = HashedTfIdf::new(64);
        assert_eq!(embedder.embed("  ?! the of "), Err(EmbeddingError::EmptyText));
    }

    #[test]
    fn cosine_edge_cases() {
        assert_eq!(cosine_similarity(&[1.0, 0.0], &[1.0]), 0.0);
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 0.0]), 0.0);
        assert_eq!(cosine_similarity(&[1.0, 0.0], &[-1.0, 0.0]), 0.0);
        assert!((cosine_similarity(&[1.0, 1.0], &[2.0, 2.0]) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn fnv1a_known_values() {
        assert_eq!(fnv1a(b""), 0xcbf2_9ce4_8422_2325);
        assert_eq!(fnv1a(b"a"), 0xaf63_dc4c_8601_ec8c);
    }
}
