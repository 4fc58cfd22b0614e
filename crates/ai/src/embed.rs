use anyhow::anyhow;
use async_openai::{Client, config::OpenAIConfig, types::embeddings::CreateEmbeddingRequestArgs};
use movierec_shared::{AppEnv, AppError};

use crate::EmbeddingProvider;

/// [`EmbeddingProvider`] backed by an OpenAI-compatible `/embeddings` endpoint.
#[derive(Clone)]
pub struct OpenAiEmbedder {
  pub(crate) client: Client<OpenAIConfig>,
  pub(crate) model: String,
  pub(crate) dimensions: Option<u32>,
}

impl OpenAiEmbedder {
  /// # Errors
  ///
  /// Fails when no API key is configured.
  pub fn new(env: &AppEnv) -> Result<Self, AppError> {
    let config = OpenAIConfig::new()
      .with_api_key(env.require_openai_api_key()?)
      .with_api_base(&env.openai_base_url);

    Ok(Self {
      client: Client::with_config(config),
      model: env.openai_embedding_model.clone(),
      dimensions: env.openai_embedding_dimensions,
    })
  }
}

/// Newlines degrade embedding quality for some models; flatten them.
pub(crate) fn prepare_input(input: &str) -> String {
  input.replace(['\r', '\n'], " ")
}

impl EmbeddingProvider for OpenAiEmbedder {
  fn model(&self) -> &str {
    &self.model
  }

  async fn embed(&self, input: &str) -> Result<Vec<f32>, AppError> {
    let mut args = CreateEmbeddingRequestArgs::default();
    args.model(&self.model).input(prepare_input(input));
    if let Some(dimensions) = self.dimensions {
      args.dimensions(dimensions);
    }
    let request = args.build()?;

    tracing::debug!(model = %self.model, chars = input.len(), "requesting embedding");

    let embedding = self
      .client
      .embeddings()
      .create(request)
      .await
      .map(|r| r.data.into_iter())?
      .map(|e| e.embedding)
      .next_back()
      .ok_or_else(|| anyhow!("empty embedding"))?;

    Ok(embedding)
  }

  async fn embed_many(&self, inputs: &[String]) -> Result<Vec<Vec<f32>>, AppError> {
    self.embed_batch(inputs).await
  }
}
