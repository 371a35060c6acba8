//! Flat in-memory vector index with exhaustive similarity search.
//!
//! [`VectorIndex`] stores segments and their embeddings as parallel vectors;
//! position `i` is the only join key. The index is immutable after
//! [`build`](VectorIndex::build), so a shared `Arc<VectorIndex>` can serve
//! concurrent queries without locking.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::document::{SearchResult, Segment};
use crate::embedding::EmbeddingProvider;
use crate::error::{RagError, Result};

/// Scoring function used to rank stored vectors against a query.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Similarity {
    /// Raw dot product. Assumes the embedding model emits comparably scaled vectors.
    #[default]
    Dot,
    /// Dot product of the L2-normalized vectors.
    Cosine,
}

impl Similarity {
    /// Score `a` against `b`. Both slices must have the same length.
    pub fn score(self, a: &[f32], b: &[f32]) -> f32 {
        match self {
            Similarity::Dot => dot(a, b),
            Similarity::Cosine => cosine_similarity(a, b),
        }
    }
}

fn dot(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b.iter()).map(|(x, y)| x * y).sum()
}

/// Returns 0.0 if either vector has zero magnitude.
fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot(a, b) / (norm_a * norm_b)
}

/// Segments and their embeddings, in insertion order.
#[derive(Debug, Clone)]
pub struct VectorIndex {
    segments: Vec<Segment>,
    embeddings: Vec<Vec<f32>>,
    dimensions: usize,
}

impl VectorIndex {
    /// Embed every segment in order and keep the ones that succeed.
    ///
    /// A segment is skipped (and logged) when its embedding fails, comes back
    /// empty, or has a different length than the first accepted vector.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::EmptyIndex`] if no segment survives.
    pub async fn build<I>(provider: &dyn EmbeddingProvider, segments: I) -> Result<Self>
    where
        I: IntoIterator<Item = Segment>,
    {
        let mut kept = Vec::new();
        let mut embeddings: Vec<Vec<f32>> = Vec::new();
        let mut skipped = 0usize;

        for segment in segments {
            let embedding = match provider.embed(&segment.text).await {
                Ok(embedding) if !embedding.is_empty() => embedding,
                Ok(_) => {
                    warn!(page = segment.page, "empty embedding, skipping segment");
                    skipped += 1;
                    continue;
                }
                Err(e) => {
                    warn!(page = segment.page, error = %e, "embedding failed, skipping segment");
                    skipped += 1;
                    continue;
                }
            };

            if let Some(first) = embeddings.first() {
                if first.len() != embedding.len() {
                    warn!(
                        page = segment.page,
                        expected = first.len(),
                        actual = embedding.len(),
                        "embedding dimension mismatch, skipping segment"
                    );
                    skipped += 1;
                    continue;
                }
            }

            debug!(page = segment.page, "indexed segment");
            kept.push(segment);
            embeddings.push(embedding);
        }

        if kept.is_empty() {
            warn!(skipped, "no segment could be embedded");
            return Err(RagError::EmptyIndex);
        }

        let dimensions = embeddings[0].len();
        info!(segment_count = kept.len(), skipped, dimensions, "built vector index");
        Ok(Self { segments: kept, embeddings, dimensions })
    }

    /// Assemble an index from precomputed embeddings.
    ///
    /// # Errors
    ///
    /// - [`RagError::ConfigError`] if the two vectors differ in length or a vector is empty
    /// - [`RagError::EmptyIndex`] if there are no entries
    /// - [`RagError::DimensionMismatch`] if the embeddings differ in length
    pub fn from_parts(segments: Vec<Segment>, embeddings: Vec<Vec<f32>>) -> Result<Self> {
        if segments.len() != embeddings.len() {
            return Err(RagError::ConfigError(format!(
                "{} segments but {} embeddings",
                segments.len(),
                embeddings.len()
            )));
        }
        let Some(first) = embeddings.first() else {
            return Err(RagError::EmptyIndex);
        };
        let dimensions = first.len();
        if dimensions == 0 {
            return Err(RagError::ConfigError("embeddings must not be empty".to_string()));
        }
        if let Some(bad) = embeddings.iter().find(|e| e.len() != dimensions) {
            return Err(RagError::DimensionMismatch { expected: dimensions, actual: bad.len() });
        }
        Ok(Self { segments, embeddings, dimensions })
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Always false for a constructed index.
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn dimensions(&self) -> usize {
        self.dimensions
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn embeddings(&self) -> &[Vec<f32>] {
        &self.embeddings
    }

    fn check_query(&self, query: &[f32]) -> Result<()> {
        if query.len() != self.dimensions {
            return Err(RagError::DimensionMismatch {
                expected: self.dimensions,
                actual: query.len(),
            });
        }
        Ok(())
    }

    fn scores<'a>(
        &'a self,
        query: &'a [f32],
        similarity: Similarity,
    ) -> impl Iterator<Item = (usize, f32)> + 'a {
        self.embeddings.iter().map(move |e| similarity.score(query, e)).enumerate()
    }

    fn result(&self, index: usize, score: f32) -> SearchResult {
        SearchResult { index, segment: self.segments[index].clone(), score }
    }

    /// Return the best-scoring segment. The earliest entry wins ties.
    ///
    /// NaN scores never win; if every score is NaN the first entry is returned.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::DimensionMismatch`] if the query has the wrong length.
    pub fn search(&self, query: &[f32], similarity: Similarity) -> Result<SearchResult> {
        self.check_query(query)?;

        let mut best: Option<(usize, f32)> = None;
        for (index, score) in self.scores(query, similarity) {
            if score.is_nan() {
                continue;
            }
            match best {
                Some((_, top)) if score <= top => {}
                _ => best = Some((index, score)),
            }
        }

        let (index, score) = best.unwrap_or((0, f32::NAN));
        Ok(self.result(index, score))
    }

    /// Return up to `k` segments by descending score, ties in insertion order.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::DimensionMismatch`] if the query has the wrong length.
    pub fn search_top_k(
        &self,
        query: &[f32],
        similarity: Similarity,
        k: usize,
    ) -> Result<Vec<SearchResult>> {
        self.check_query(query)?;

        let mut scored: Vec<(usize, f32)> = self.scores(query, similarity).collect();
        // Stable sort keeps insertion order among equal scores; NaN sinks.
        scored.sort_by(|a, b| match (a.1.is_nan(), b.1.is_nan()) {
            (false, false) => b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal),
            (true, false) => Ordering::Greater,
            (false, true) => Ordering::Less,
            (true, true) => Ordering::Equal,
        });
        scored.truncate(k);

        Ok(scored.into_iter().map(|(index, score)| self.result(index, score)).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn index(vectors: Vec<Vec<f32>>) -> VectorIndex {
        let segments =
            (1..=vectors.len()).map(|page| Segment::from_page(page, &format!("p{page}"))).collect();
        VectorIndex::from_parts(segments, vectors).unwrap()
    }

    #[test]
    fn dot_prefers_larger_magnitude_cosine_does_not() {
        let idx = index(vec![vec![1.0, 0.0], vec![3.0, 3.0]]);
        let query = [1.0, 0.0];

        assert_eq!(idx.search(&query, Similarity::Dot).unwrap().index, 1);
        assert_eq!(idx.search(&query, Similarity::Cosine).unwrap().index, 0);
    }

    #[test]
    fn first_maximal_entry_wins_ties() {
        let idx = index(vec![vec![0.0, 1.0], vec![1.0, 0.0], vec![1.0, 0.0]]);
        let hit = idx.search(&[1.0, 0.0], Similarity::Dot).unwrap();
        assert_eq!(hit.index, 1);
        assert_eq!(hit.segment.page, 2);
    }

    #[test]
    fn top_k_orders_by_score_then_position() {
        let idx = index(vec![vec![1.0], vec![3.0], vec![3.0], vec![2.0]]);
        let hits = idx.search_top_k(&[1.0], Similarity::Dot, 3).unwrap();
        let order: Vec<usize> = hits.iter().map(|h| h.index).collect();
        assert_eq!(order, vec![1, 2, 3]);
    }

    #[test]
    fn query_dimension_is_checked() {
        let idx = index(vec![vec![1.0, 2.0]]);
        let err = idx.search(&[1.0], Similarity::Dot).unwrap_err();
        assert!(matches!(err, RagError::DimensionMismatch { expected: 2, actual: 1 }));
    }

    #[test]
    fn from_parts_rejects_inconsistent_input() {
        let seg = Segment::from_page(1, "x");
        assert!(matches!(VectorIndex::from_parts(vec![], vec![]), Err(RagError::EmptyIndex)));
        assert!(matches!(
            VectorIndex::from_parts(vec![seg.clone()], vec![]),
            Err(RagError::ConfigError(_))
        ));
        assert!(matches!(
            VectorIndex::from_parts(vec![seg.clone(), seg], vec![vec![1.0], vec![1.0, 2.0]]),
            Err(RagError::DimensionMismatch { expected: 1, actual: 2 })
        ));
    }

    #[test]
    fn zero_vector_scores_zero_under_cosine() {
        assert_eq!(Similarity::Cosine.score(&[0.0, 0.0], &[1.0, 1.0]), 0.0);
    }
}
