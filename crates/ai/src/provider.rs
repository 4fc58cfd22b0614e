use movierec_shared::AppError;

/// Anything that can turn text into an embedding vector.
///
/// The recommendation code only talks to this trait, so tests can plug in
/// deterministic fixture vectors instead of calling a live API.
pub trait EmbeddingProvider: Send + Sync {
  /// Model identifier, used for logging.
  fn model(&self) -> &str;

  fn embed(&self, input: &str) -> impl Future<Output = Result<Vec<f32>, AppError>> + Send;

  /// Embed multiple texts, returning one vector per input in input order.
  ///
  /// The default implementation calls [`EmbeddingProvider::embed`] once per input.
  fn embed_many(
    &self,
    inputs: &[String],
  ) -> impl Future<Output = Result<Vec<Vec<f32>>, AppError>> + Send {
    async move {
      let mut out = Vec::with_capacity(inputs.len());
      for input in inputs {
        out.push(self.embed(input).await?);
      }
      Ok(out)
    }
  }
}
