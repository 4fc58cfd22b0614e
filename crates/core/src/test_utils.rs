use std::{
  collections::HashMap,
  sync::atomic::{AtomicUsize, Ordering},
};

use anyhow::anyhow;
use movierec_ai::EmbeddingProvider;
use movierec_entities::movie;
use movierec_migration::{Migrator, MigratorTrait};
use movierec_shared::AppError;
use sea_orm::{ActiveModelTrait, Database, DatabaseConnection, Set};

/// Fresh in-memory database with all migrations applied.
pub async fn setup_db() -> DatabaseConnection {
  let db = Database::connect("sqlite::memory:").await.unwrap();
  Migrator::up(&db, None).await.unwrap();
  db
}

pub async fn insert_movie(
  db: &DatabaseConnection,
  title: &str,
  description: &str,
  emb: Option<Vec<u8>>,
) -> movie::Model {
  movie::ActiveModel {
    title: Set(title.to_owned()),
    description: Set(description.to_owned()),
    image: Set(String::new()),
    emb: Set(emb),
    ..Default::default()
  }
  .insert(db)
  .await
  .unwrap()
}

/// Returns canned vectors for known texts and fails for anything else.
#[derive(Default)]
pub struct FixtureEmbedder {
  vectors: HashMap<String, Vec<f32>>,
  calls: AtomicUsize,
}

impl FixtureEmbedder {
  pub fn with(mut self, text: &str, vector: &[f32]) -> Self {
    self.vectors.insert(text.to_owned(), vector.to_vec());
    self
  }

  pub fn calls(&self) -> usize {
    self.calls.load(Ordering::SeqCst)
  }
}

impl EmbeddingProvider for FixtureEmbedder {
  fn model(&self) -> &str {
    "fixture"
  }

  async fn embed(&self, input: &str) -> Result<Vec<f32>, AppError> {
    self.calls.fetch_add(1, Ordering::SeqCst);
    self
      .vectors
      .get(input)
      .cloned()
      .ok_or_else(|| anyhow!("no fixture vector for {input:?}").into())
  }
}
