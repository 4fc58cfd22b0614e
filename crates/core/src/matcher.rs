//! Linear-scan nearest-neighbour search by cosine similarity.

use std::fmt::{self, Display};

use movierec_shared::{
  BlobError, SimilarityError, ZERO_NORM_EPSILON, cosine_similarity,
  similarity::l2_norm,
};
use thiserror::Error;

/// A labelled embedding the query is compared against.
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogEntry {
  pub label: String,
  pub embedding: Vec<f32>,
}

impl CatalogEntry {
  pub fn new(label: impl Into<String>, embedding: Vec<f32>) -> Self {
    Self {
      label: label.into(),
      embedding,
    }
  }
}

/// Why a catalog entry was left out of the comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SkipReason {
  #[error("dimension mismatch: query has {expected}, entry has {actual}")]
  DimensionMismatch { expected: usize, actual: usize },
  #[error("embedding has zero norm")]
  ZeroNormVector,
  #[error("similarity is not a finite number")]
  NonFiniteSimilarity,
  #[error("no embedding stored")]
  MissingEmbedding,
  #[error("embedding blob length {len} is not a multiple of 4")]
  MalformedBlob { len: usize },
}

impl From<SimilarityError> for SkipReason {
  fn from(err: SimilarityError) -> Self {
    match err {
      SimilarityError::DimensionMismatch { expected, actual } => {
        Self::DimensionMismatch { expected, actual }
      }
      SimilarityError::ZeroNorm => Self::ZeroNormVector,
      SimilarityError::NonFinite => Self::NonFiniteSimilarity,
    }
  }
}

impl From<BlobError> for SkipReason {
  fn from(err: BlobError) -> Self {
    match err {
      BlobError::Misaligned { len } => Self::MalformedBlob { len },
    }
  }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SkippedEntry {
  /// Position in the catalog.
  pub index: usize,
  pub label: String,
  pub reason: SkipReason,
}

impl Display for SkippedEntry {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "#{} {:?}: {}", self.index, self.label, self.reason)
  }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BestMatch {
  /// Position of the winning entry in the catalog.
  pub index: usize,
  pub label: String,
  /// Cosine similarity, nominally in [-1.0, 1.0].
  pub score: f32,
  /// Entries that could not be compared, in catalog order.
  pub skipped: Vec<SkippedEntry>,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum MatchError {
  #[error("query embedding is empty")]
  EmptyQuery,
  #[error("query embedding contains NaN or infinite values")]
  NonFiniteQuery,
  #[error("query embedding has zero norm")]
  ZeroNormQuery,
  #[error("catalog is empty")]
  EmptyCatalog,
  #[error("no catalog entry could be compared ({} skipped)", .skipped.len())]
  NoValidEntries { skipped: Vec<SkippedEntry> },
}

/// Find the catalog entry most similar to `query`.
///
/// Entries with a different dimension or a zero norm are skipped and reported
/// in [`BestMatch::skipped`] instead of failing the whole scan. When several
/// entries share the maximum score the first one in catalog order wins.
///
/// # Errors
///
/// - [`MatchError::EmptyQuery`], [`MatchError::NonFiniteQuery`] or
///   [`MatchError::ZeroNormQuery`] if the query is unusable.
/// - [`MatchError::EmptyCatalog`] if there is nothing to compare against.
/// - [`MatchError::NoValidEntries`] if every entry was skipped.
pub fn find_best_match(query: &[f32], catalog: &[CatalogEntry]) -> Result<BestMatch, MatchError> {
  check_query(query)?;
  if catalog.is_empty() {
    return Err(MatchError::EmptyCatalog);
  }

  let mut best: Option<(usize, f32)> = None;
  let mut skipped = Vec::new();

  for (index, entry) in catalog.iter().enumerate() {
    match cosine_similarity(query, &entry.embedding) {
      // strict `>` keeps the earliest entry on ties
      Ok(score) => {
        if best.is_none_or(|(_, best_score)| score > best_score) {
          best = Some((index, score));
        }
      }
      Err(err) => skipped.push(SkippedEntry {
        index,
        label: entry.label.clone(),
        reason: err.into(),
      }),
    }
  }

  match best {
    Some((index, score)) => Ok(BestMatch {
      index,
      label: catalog[index].label.clone(),
      score,
      skipped,
    }),
    None => Err(MatchError::NoValidEntries { skipped }),
  }
}

/// Reject queries no entry could be compared with.
pub(crate) fn check_query(query: &[f32]) -> Result<(), MatchError> {
  if query.is_empty() {
    return Err(MatchError::EmptyQuery);
  }
  if query.iter().any(|x| !x.is_finite()) {
    return Err(MatchError::NonFiniteQuery);
  }
  if l2_norm(query) <= ZERO_NORM_EPSILON {
    return Err(MatchError::ZeroNormQuery);
  }
  Ok(())
}
