use anyhow::anyhow;
use async_openai::types::embeddings::CreateEmbeddingRequestArgs;
use movierec_shared::AppError;

use crate::{OpenAiEmbedder, embed::prepare_input};

impl OpenAiEmbedder {
  /// Embed multiple texts in a single API call.
  ///
  /// Returns one vector per input, in the same order.
  pub async fn embed_batch(&self, inputs: &[String]) -> Result<Vec<Vec<f32>>, AppError> {
    if inputs.is_empty() {
      return Ok(vec![]);
    }

    let mut args = CreateEmbeddingRequestArgs::default();
    args
      .model(&self.model)
      .input(inputs.iter().map(|i| prepare_input(i)).collect::<Vec<_>>());
    if let Some(dimensions) = self.dimensions {
      args.dimensions(dimensions);
    }
    let request = args.build()?;

    tracing::debug!(model = %self.model, count = inputs.len(), "requesting embeddings");

    let response = self.client.embeddings().create(request).await?;

    // Sort by index to ensure ordering matches input
    let mut data = response.data;
    data.sort_by_key(|e| e.index);

    if data.len() != inputs.len() {
      return Err(
        anyhow!(
          "embedding count mismatch: expected {}, got {}",
          inputs.len(),
          data.len()
        )
        .into(),
      );
    }

    Ok(data.into_iter().map(|e| e.embedding).collect())
  }
}
