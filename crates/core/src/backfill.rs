use anyhow::anyhow;
use movierec_ai::EmbeddingProvider;
use movierec_entities::movie;
use movierec_shared::{AppError, encode_embedding};
use sea_orm::{
  ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};

/// Default number of movies embedded per API request.
pub const DEFAULT_BATCH_SIZE: usize = 64;

/// Text the stored embedding of a movie is computed from.
fn embedding_text(model: &movie::Model) -> String {
  if model.description.trim().is_empty() {
    model.title.clone()
  } else {
    model.description.clone()
  }
}

/// Generate and store embeddings for movies that lack one (or all movies
/// when `overwrite` is set). Returns the number of movies updated.
pub async fn backfill_embeddings<P>(
  db: &DatabaseConnection,
  provider: &P,
  batch_size: usize,
  overwrite: bool,
) -> Result<usize, AppError>
where
  P: EmbeddingProvider,
{
  let mut query = movie::Entity::find().order_by_asc(movie::Column::Id);
  if !overwrite {
    query = query.filter(movie::Column::Emb.is_null());
  }
  let movies = query.all(db).await?;

  if movies.is_empty() {
    tracing::info!("all movies already have embeddings");
    return Ok(0);
  }

  tracing::info!(movies = movies.len(), model = provider.model(), "backfilling embeddings");

  let mut updated = 0;
  for batch in movies.chunks(batch_size.max(1)) {
    let inputs = batch.iter().map(embedding_text).collect::<Vec<_>>();
    let embeddings = provider.embed_many(&inputs).await?;
    if embeddings.len() != batch.len() {
      return Err(
        anyhow!(
          "embedding count mismatch: expected {}, got {}",
          batch.len(),
          embeddings.len()
        )
        .into(),
      );
    }

    for (model, embedding) in batch.iter().zip(embeddings) {
      let mut active_model: movie::ActiveModel = model.clone().into();
      active_model.emb = Set(Some(encode_embedding(&embedding)));
      active_model.update(db).await?;
      updated += 1;
    }

    tracing::info!(updated, total = movies.len(), "stored batch");
  }

  Ok(updated)
}
