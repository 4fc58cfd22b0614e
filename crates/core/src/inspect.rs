use anyhow::{Context, anyhow};
use movierec_entities::movie;
use movierec_shared::{AppError, decode_embedding};
use sea_orm::{DatabaseConnection, EntityTrait, Order, QueryOrder, prelude::Expr};

#[derive(Debug, Clone, PartialEq)]
pub struct EmbeddingSample {
  pub title: String,
  pub embedding: Vec<f32>,
}

impl EmbeddingSample {
  /// The first `n` values (fewer if the embedding is shorter).
  #[must_use]
  pub fn head(&self, n: usize) -> &[f32] {
    &self.embedding[..n.min(self.embedding.len())]
  }
}

/// Decode the embedding of one movie picked at random.
pub async fn inspect_random(db: &DatabaseConnection) -> Result<EmbeddingSample, AppError> {
  let model = movie::Entity::find()
    .order_by(Expr::cust("RANDOM()"), Order::Asc)
    .one(db)
    .await?
    .ok_or_else(|| anyhow!("no movies in the database"))?;

  let blob = model
    .emb
    .ok_or_else(|| anyhow!("movie {:?} has no embedding", model.title))?;
  let embedding = decode_embedding(&blob)
    .with_context(|| format!("failed to read the embedding of {:?}", model.title))?;

  Ok(EmbeddingSample {
    title: model.title,
    embedding,
  })
}
