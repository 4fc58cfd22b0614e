//! Binary layout of embeddings stored in the database.
//!
//! An embedding blob is a packed array of IEEE-754 `f32` values in
//! little-endian byte order, 4 bytes per element, with no header or length
//! prefix. The dimension is `blob.len() / 4`.

use thiserror::Error;

const F32_BYTES: usize = size_of::<f32>();

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum BlobError {
  #[error("embedding blob length {len} is not a multiple of 4")]
  Misaligned { len: usize },
}

#[must_use]
pub fn encode_embedding(embedding: &[f32]) -> Vec<u8> {
  let mut out = Vec::with_capacity(embedding.len() * F32_BYTES);
  for value in embedding {
    out.extend_from_slice(&value.to_le_bytes());
  }
  out
}

pub fn decode_embedding(blob: &[u8]) -> Result<Vec<f32>, BlobError> {
  if blob.len() % F32_BYTES != 0 {
    return Err(BlobError::Misaligned { len: blob.len() });
  }

  Ok(
    blob
      .chunks_exact(F32_BYTES)
      .map(|chunk| f32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
      .collect(),
  )
}
