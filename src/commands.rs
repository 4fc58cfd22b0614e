use movierec_ai::OpenAiEmbedder;
use movierec_core::{
  Catalog, MatchError, SkippedEntry, assign_images, backfill_embeddings, export_embeddings,
  inspect_random, recommend,
};
use movierec_migration::{Migrator, MigratorTrait};
use movierec_shared::{AppEnv, AppError};
use sea_orm::{Database, DatabaseConnection};

use crate::cli::Command;

async fn connect(env: &AppEnv) -> Result<DatabaseConnection, AppError> {
  let db = Database::connect(env.database_url.as_str()).await?;

  // Apply all pending migrations
  // https://www.sea-ql.org/SeaORM/docs/migration/running-migration/#migrating-programmatically
  Migrator::up(&db, None).await?;

  Ok(db)
}

fn print_skipped(skipped: &[SkippedEntry]) {
  if skipped.is_empty() {
    return;
  }
  println!("Skipped {} movie(s):", skipped.len());
  for entry in skipped {
    println!("  {entry}");
  }
}

pub async fn run(command: Command, env: &AppEnv) -> Result<(), AppError> {
  match command {
    Command::Recommend {
      prompt,
      embeddings_file,
    } => {
      let catalog = match embeddings_file {
        Some(path) => Catalog::from_json_file(&path)?,
        None => Catalog::from_movies(&connect(env).await?).await?,
      };
      let embedder = OpenAiEmbedder::new(env)?;

      println!("Prompt: {prompt}");
      let rec = match recommend(&embedder, &catalog, &prompt).await {
        Ok(rec) => rec,
        Err(err) => {
          if let Some(MatchError::NoValidEntries { skipped }) = err.downcast_ref::<MatchError>() {
            print_skipped(skipped);
          }
          return Err(err);
        }
      };
      println!(
        "Recommended movie: {} (similarity: {:.4})",
        rec.title, rec.score
      );
      print_skipped(&rec.skipped);
    }
    Command::AssignImages { images_dir } => {
      let result = assign_images(&connect(env).await?, &images_dir).await?;
      println!(
        "Done. Images updated for {} of {} movies.",
        result.updated, result.total
      );
      for title in &result.missing {
        println!("  no image for: {title}");
      }
    }
    Command::InspectEmbedding { head } => {
      let sample = inspect_random(&connect(env).await?).await?;
      println!("Movie: {}", sample.title);
      println!("Dimensions: {}", sample.embedding.len());
      println!("Embedding: {:?}", sample.embedding);
      println!("First {head} values: {:?}", sample.head(head));
    }
    Command::EmbedMovies {
      batch_size,
      overwrite,
    } => {
      let embedder = OpenAiEmbedder::new(env)?;
      let updated = backfill_embeddings(&connect(env).await?, &embedder, batch_size, overwrite).await?;
      println!("Embedded {updated} movie(s).");
    }
    Command::ExportEmbeddings { output } => {
      let count = export_embeddings(&connect(env).await?, &output).await?;
      println!("Wrote {count} embedding(s) to {}.", output.display());
    }
  }

  Ok(())
}
