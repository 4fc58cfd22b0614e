use std::path::Path;

use anyhow::{Context, anyhow};
use movierec_entities::movie;
use movierec_shared::{AppError, decode_embedding};
use sea_orm::{DatabaseConnection, EntityTrait, QueryOrder};
use serde::{Deserialize, Serialize};

use crate::matcher::{
  BestMatch, CatalogEntry, MatchError, SkipReason, SkippedEntry, check_query, find_best_match,
};

/// One record of an embeddings file: a JSON array of these.
///
/// Unknown fields are ignored, so files carrying extra movie metadata load fine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieEmbedding {
  pub title: String,
  pub embedding: Vec<f32>,
}

/// The movies a prompt is matched against.
///
/// Movies that could not be loaded (no embedding, malformed blob) keep their
/// position and are reported as skipped entries by [`Catalog::find_best_match`].
#[derive(Debug, Clone, Default)]
pub struct Catalog {
  entries: Vec<CatalogEntry>,
  /// Catalog position of each entry in `entries`.
  positions: Vec<usize>,
  unloadable: Vec<SkippedEntry>,
}

impl Catalog {
  #[must_use]
  pub fn new(entries: Vec<CatalogEntry>) -> Self {
    Self {
      positions: (0..entries.len()).collect(),
      entries,
      unloadable: Vec::new(),
    }
  }

  /// Load an embeddings file.
  pub fn from_json_file(path: &Path) -> Result<Self, AppError> {
    if !path.exists() {
      return Err(anyhow!("embeddings file '{}' not found", path.display()).into());
    }

    let raw = std::fs::read_to_string(path)
      .with_context(|| format!("failed to read embeddings file '{}'", path.display()))?;
    let records: Vec<MovieEmbedding> = serde_json::from_str(&raw)
      .with_context(|| format!("invalid embeddings file '{}'", path.display()))?;

    tracing::debug!(path = %path.display(), movies = records.len(), "loaded embeddings file");

    Ok(Self::new(
      records
        .into_iter()
        .map(|r| CatalogEntry::new(r.title, r.embedding))
        .collect(),
    ))
  }

  /// Load every stored movie, in id order.
  pub async fn from_movies(db: &DatabaseConnection) -> Result<Self, AppError> {
    let movies = movie::Entity::find()
      .order_by_asc(movie::Column::Id)
      .all(db)
      .await?;

    let mut catalog = Self::default();
    for (index, model) in movies.into_iter().enumerate() {
      let decoded = model
        .emb
        .as_deref()
        .ok_or(SkipReason::MissingEmbedding)
        .and_then(|blob| decode_embedding(blob).map_err(SkipReason::from));

      match decoded {
        Ok(embedding) => {
          catalog.positions.push(index);
          catalog
            .entries
            .push(CatalogEntry::new(model.title, embedding));
        }
        Err(reason) => catalog.unloadable.push(SkippedEntry {
          index,
          label: model.title,
          reason,
        }),
      }
    }

    tracing::debug!(
      movies = catalog.entries.len(),
      unloadable = catalog.unloadable.len(),
      "loaded catalog from database"
    );

    Ok(catalog)
  }

  /// Entries with a decoded embedding.
  #[must_use]
  pub fn entries(&self) -> &[CatalogEntry] {
    &self.entries
  }

  /// Movies that were loaded without a usable embedding.
  #[must_use]
  pub fn unloadable(&self) -> &[SkippedEntry] {
    &self.unloadable
  }

  /// True when there are no movies at all, loadable or not.
  #[must_use]
  pub fn is_empty(&self) -> bool {
    self.entries.is_empty() && self.unloadable.is_empty()
  }

  /// Like [`find_best_match`], with unloadable movies reported among the
  /// skipped entries and all indices given as catalog positions.
  pub fn find_best_match(&self, query: &[f32]) -> Result<BestMatch, MatchError> {
    check_query(query)?;
    if self.is_empty() {
      return Err(MatchError::EmptyCatalog);
    }
    if self.entries.is_empty() {
      return Err(MatchError::NoValidEntries {
        skipped: self.unloadable.clone(),
      });
    }

    match find_best_match(query, &self.entries) {
      Ok(best) => Ok(BestMatch {
        index: self.positions[best.index],
        skipped: self.merge_skipped(best.skipped),
        ..best
      }),
      Err(MatchError::NoValidEntries { skipped }) => Err(MatchError::NoValidEntries {
        skipped: self.merge_skipped(skipped),
      }),
      Err(err) => Err(err),
    }
  }

  fn merge_skipped(&self, skipped: Vec<SkippedEntry>) -> Vec<SkippedEntry> {
    let mut merged = skipped
      .into_iter()
      .map(|s| SkippedEntry {
        index: self.positions[s.index],
        ..s
      })
      .chain(self.unloadable.iter().cloned())
      .collect::<Vec<_>>();
    merged.sort_by_key(|s| s.index);
    merged
  }
}

/// Write every stored embedding to `path` in the embeddings file format.
///
/// Returns the number of movies written.
pub async fn export_embeddings(db: &DatabaseConnection, path: &Path) -> Result<usize, AppError> {
  let catalog = Catalog::from_movies(db).await?;
  for skipped in &catalog.unloadable {
    tracing::warn!(movie = %skipped.label, "not exported: {}", skipped.reason);
  }

  let records = catalog
    .entries
    .into_iter()
    .map(|e| MovieEmbedding {
      title: e.label,
      embedding: e.embedding,
    })
    .collect::<Vec<_>>();

  let json = serde_json::to_string(&records)?;
  std::fs::write(path, json)
    .with_context(|| format!("failed to write embeddings file '{}'", path.display()))?;

  tracing::info!(path = %path.display(), movies = records.len(), "exported embeddings");

  Ok(records.len())
}

#[cfg(test)]
mod tests {
  use std::io::Write;

  use movierec_shared::encode_embedding;

  use super::*;
  use crate::test_utils::{insert_movie, setup_db};

  #[test]
  fn loads_json_file_ignoring_extra_fields() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
      file,
      r#"[
        {{"title": "The Pianist", "description": "a pianist", "embedding": [0.1, 0.2]}},
        {{"title": "Up", "embedding": [1, 0]}}
      ]"#
    )
    .unwrap();

    let catalog = Catalog::from_json_file(file.path()).unwrap();
    assert_eq!(
      catalog.entries(),
      &[
        CatalogEntry::new("The Pianist", vec![0.1, 0.2]),
        CatalogEntry::new("Up", vec![1.0, 0.0]),
      ]
    );
    assert!(catalog.unloadable().is_empty());
  }

  #[test]
  fn missing_json_file_names_the_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("movie_embeddings.json");
    let err = Catalog::from_json_file(&path).unwrap_err();
    assert!(err.to_string().contains("movie_embeddings.json"), "{err}");
  }

  #[test]
  fn malformed_json_file_is_an_error() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, r#"{{"title": "not an array"}}"#).unwrap();
    assert!(Catalog::from_json_file(file.path()).is_err());
  }

  #[tokio::test]
  async fn loads_movies_and_keeps_unloadable_ones_in_place() {
    let db = setup_db().await;
    insert_movie(&db, "Amadeus", "", Some(encode_embedding(&[1.0, 0.0]))).await;
    insert_movie(&db, "Untitled", "", None).await;
    insert_movie(&db, "Broken", "", Some(vec![1, 2, 3])).await;
    insert_movie(&db, "Shine", "", Some(encode_embedding(&[0.0, 1.0]))).await;

    let catalog = Catalog::from_movies(&db).await.unwrap();
    let titles: Vec<_> = catalog.entries().iter().map(|e| e.label.as_str()).collect();
    assert_eq!(titles, ["Amadeus", "Shine"]);
    assert_eq!(catalog.entries()[1].embedding, vec![0.0, 1.0]);
    assert_eq!(
      catalog.unloadable(),
      &[
        SkippedEntry {
          index: 1,
          label: "Untitled".to_owned(),
          reason: SkipReason::MissingEmbedding,
        },
        SkippedEntry {
          index: 2,
          label: "Broken".to_owned(),
          reason: SkipReason::MalformedBlob { len: 3 },
        },
      ]
    );

    let best = catalog.find_best_match(&[0.1, 1.0]).unwrap();
    assert_eq!(best.label, "Shine");
    assert_eq!(best.index, 3);
    let skipped: Vec<_> = best.skipped.iter().map(|s| (s.index, s.label.as_str())).collect();
    assert_eq!(skipped, [(1, "Untitled"), (2, "Broken")]);
  }

  #[tokio::test]
  async fn empty_blob_is_a_dimension_mismatch() {
    let db = setup_db().await;
    insert_movie(&db, "Hollow", "", Some(Vec::new())).await;
    insert_movie(&db, "Amadeus", "", Some(encode_embedding(&[1.0, 0.0]))).await;

    let catalog = Catalog::from_movies(&db).await.unwrap();
    let best = catalog.find_best_match(&[1.0, 0.0]).unwrap();
    assert_eq!(best.label, "Amadeus");
    assert_eq!(best.index, 1);
    assert_eq!(
      best.skipped,
      vec![SkippedEntry {
        index: 0,
        label: "Hollow".to_owned(),
        reason: SkipReason::DimensionMismatch {
          expected: 2,
          actual: 0
        },
      }]
    );
  }

  #[tokio::test]
  async fn only_unloadable_movies_means_no_valid_entries() {
    let db = setup_db().await;
    insert_movie(&db, "A", "", None).await;
    insert_movie(&db, "B", "", Some(vec![0; 6])).await;

    let catalog = Catalog::from_movies(&db).await.unwrap();
    assert!(!catalog.is_empty());
    let Err(MatchError::NoValidEntries { skipped }) = catalog.find_best_match(&[1.0]) else {
      panic!("expected NoValidEntries");
    };
    assert_eq!(skipped.len(), 2);
    assert_eq!(skipped[0].reason, SkipReason::MissingEmbedding);
    assert_eq!(skipped[1].reason, SkipReason::MalformedBlob { len: 6 });
  }

  #[tokio::test]
  async fn empty_table_is_an_empty_catalog() {
    let db = setup_db().await;
    let catalog = Catalog::from_movies(&db).await.unwrap();
    assert!(catalog.is_empty());
    assert_eq!(catalog.find_best_match(&[1.0]), Err(MatchError::EmptyCatalog));
  }

  #[test]
  fn matcher_skips_and_unloadable_movies_merge_in_catalog_order() {
    let mut catalog = Catalog::new(vec![
      CatalogEntry::new("short", vec![1.0]),
      CatalogEntry::new("fits", vec![1.0, 1.0]),
    ]);
    // simulate a movie at position 0 that failed to load
    catalog.positions = vec![1, 2];
    catalog.unloadable.push(SkippedEntry {
      index: 0,
      label: "missing".to_owned(),
      reason: SkipReason::MissingEmbedding,
    });

    let best = catalog.find_best_match(&[1.0, 0.0]).unwrap();
    assert_eq!(best.index, 2);
    let skipped: Vec<_> = best.skipped.iter().map(|s| (s.index, s.label.as_str())).collect();
    assert_eq!(skipped, [(0, "missing"), (1, "short")]);
  }

  #[tokio::test]
  async fn export_round_trips_through_the_file_loader() {
    let db = setup_db().await;
    insert_movie(&db, "Amadeus", "", Some(encode_embedding(&[0.5, -0.5]))).await;
    insert_movie(&db, "Untitled", "", None).await;

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("embeddings.json");
    assert_eq!(export_embeddings(&db, &path).await.unwrap(), 1);

    let catalog = Catalog::from_json_file(&path).unwrap();
    assert_eq!(catalog.entries(), &[CatalogEntry::new("Amadeus", vec![0.5, -0.5])]);
  }
}
