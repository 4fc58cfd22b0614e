use thiserror::Error;

/// Norms at or below this are treated as zero.
pub const ZERO_NORM_EPSILON: f64 = 1e-12;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SimilarityError {
  #[error("dimension mismatch: expected {expected}, got {actual}")]
  DimensionMismatch { expected: usize, actual: usize },
  #[error("vector has zero norm")]
  ZeroNorm,
  #[error("similarity is not a finite number")]
  NonFinite,
}

/// Compute cosine similarity between two embedding vectors.
///
/// Returns a value in [-1.0, 1.0] where 1.0 means identical direction. Rounding
/// may push the result marginally outside that range.
///
/// # Errors
///
/// - [`SimilarityError::DimensionMismatch`] if the lengths differ
///   (`expected` is the length of `a`).
/// - [`SimilarityError::ZeroNorm`] if either vector has (near) zero norm,
///   including the empty vector.
/// - [`SimilarityError::NonFinite`] if the vectors contain NaN or infinities.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> Result<f32, SimilarityError> {
  if a.len() != b.len() {
    return Err(SimilarityError::DimensionMismatch {
      expected: a.len(),
      actual: b.len(),
    });
  }

  let mut dot = 0.0_f64;
  let mut norm_a = 0.0_f64;
  let mut norm_b = 0.0_f64;

  for (&x, &y) in a.iter().zip(b.iter()) {
    let x = f64::from(x);
    let y = f64::from(y);
    dot = x.mul_add(y, dot);
    norm_a = x.mul_add(x, norm_a);
    norm_b = y.mul_add(y, norm_b);
  }

  let (norm_a, norm_b) = (norm_a.sqrt(), norm_b.sqrt());
  let denom = norm_a * norm_b;
  if !denom.is_finite() || !dot.is_finite() {
    return Err(SimilarityError::NonFinite);
  }
  if norm_a <= ZERO_NORM_EPSILON || norm_b <= ZERO_NORM_EPSILON {
    return Err(SimilarityError::ZeroNorm);
  }

  #[allow(clippy::cast_possible_truncation)]
  let similarity = (dot / denom) as f32;
  Ok(similarity)
}

/// Euclidean norm, accumulated in `f64`.
#[must_use]
pub fn l2_norm(v: &[f32]) -> f64 {
  v.iter()
    .map(|&x| f64::from(x))
    .fold(0.0_f64, |acc, x| x.mul_add(x, acc))
    .sqrt()
}
