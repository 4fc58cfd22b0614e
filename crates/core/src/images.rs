use std::path::Path;

use anyhow::anyhow;
use movierec_entities::movie;
use movierec_shared::AppError;
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, QueryOrder, Set};

/// Where posters live relative to the media root; stored in `movie.image`.
pub const MEDIA_IMAGES_PREFIX: &str = "movie/images";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImageAssignment {
  pub total: usize,
  pub updated: usize,
  /// Titles with no matching poster file.
  pub missing: Vec<String>,
}

/// Poster file name for a movie title.
#[must_use]
pub fn image_file_name(title: &str) -> String {
  format!("m_{title}.png")
}

/// Point every movie at its poster in `images_dir`, when one exists.
pub async fn assign_images(
  db: &DatabaseConnection,
  images_dir: &Path,
) -> Result<ImageAssignment, AppError> {
  if !images_dir.is_dir() {
    return Err(anyhow!("images folder '{}' does not exist", images_dir.display()).into());
  }

  let movies = movie::Entity::find()
    .order_by_asc(movie::Column::Id)
    .all(db)
    .await?;

  let mut result = ImageAssignment {
    total: movies.len(),
    ..Default::default()
  };
  tracing::info!(movies = result.total, "assigning images");

  for model in movies {
    let file_name = image_file_name(&model.title);
    if !images_dir.join(&file_name).is_file() {
      tracing::warn!(movie = %model.title, "no image found");
      result.missing.push(model.title);
      continue;
    }

    let title = model.title.clone();
    let mut active_model: movie::ActiveModel = model.into();
    active_model.image = Set(format!("{MEDIA_IMAGES_PREFIX}/{file_name}"));
    active_model.update(db).await?;

    tracing::info!(movie = %title, "image assigned");
    result.updated += 1;
  }

  Ok(result)
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::test_utils::{insert_movie, setup_db};

  #[tokio::test]
  async fn assigns_only_movies_with_a_poster() {
    let db = setup_db().await;
    let amadeus = insert_movie(&db, "Amadeus", "", None).await;
    let heat = insert_movie(&db, "Heat", "", None).await;

    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("m_Amadeus.png"), b"png").unwrap();
    std::fs::write(dir.path().join("Heat.png"), b"png").unwrap();

    let result = assign_images(&db, dir.path()).await.unwrap();
    assert_eq!(
      result,
      ImageAssignment {
        total: 2,
        updated: 1,
        missing: vec!["Heat".to_owned()],
      }
    );

    let amadeus = movie::Entity::find_by_id(amadeus.id).one(&db).await.unwrap().unwrap();
    assert_eq!(amadeus.image, "movie/images/m_Amadeus.png");
    let heat = movie::Entity::find_by_id(heat.id).one(&db).await.unwrap().unwrap();
    assert_eq!(heat.image, "");
  }

  #[tokio::test]
  async fn missing_folder_is_an_error() {
    let db = setup_db().await;
    let dir = tempfile::tempdir().unwrap();
    let err = assign_images(&db, &dir.path().join("nope")).await.unwrap_err();
    assert!(err.to_string().contains("does not exist"));
  }

  #[test]
  fn file_name_keeps_title_verbatim() {
    assert_eq!(image_file_name("The Pianist"), "m_The Pianist.png");
  }
}
