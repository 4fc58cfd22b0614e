use std::path::PathBuf;

use clap::{Parser, Subcommand};
use movierec_core::DEFAULT_BATCH_SIZE;

#[derive(Debug, Parser)]
#[command(version, about)]
pub struct Cli {
  /// Env file loaded before `.env`; missing files are ignored
  #[arg(long, global = true, default_value = "openAI.env")]
  pub env_file: PathBuf,

  #[command(subcommand)]
  pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
  /// Recommend the movie whose embedding is closest to a prompt
  Recommend {
    /// Text to embed and compare against the movies
    #[arg(long, default_value = "película de un pianista")]
    prompt: String,
    /// Read movie embeddings from this JSON file instead of the database
    #[arg(long)]
    embeddings_file: Option<PathBuf>,
  },
  /// Set each movie's image to `m_<title>.png` when that file exists
  AssignImages {
    #[arg(long, default_value = "media/movie/images")]
    images_dir: PathBuf,
  },
  /// Print the embedding of a random movie
  InspectEmbedding {
    /// How many leading values to print separately
    #[arg(long, default_value_t = 10)]
    head: usize,
  },
  /// Generate embeddings for movies that do not have one yet
  EmbedMovies {
    #[arg(long, default_value_t = DEFAULT_BATCH_SIZE)]
    batch_size: usize,
    /// Re-embed movies that already have an embedding
    #[arg(long)]
    overwrite: bool,
  },
  /// Write stored embeddings to a JSON file usable with `recommend --embeddings-file`
  ExportEmbeddings {
    #[arg(long)]
    output: PathBuf,
  },
}

#[cfg(test)]
mod tests {
  use clap::CommandFactory;

  use super::*;

  #[test]
  fn cli_is_well_formed() {
    Cli::command().debug_assert();
  }

  #[test]
  fn recommend_defaults() {
    let cli = Cli::try_parse_from(["movierec", "recommend"]).unwrap();
    assert_eq!(cli.env_file, PathBuf::from("openAI.env"));
    let Command::Recommend {
      prompt,
      embeddings_file,
    } = cli.command
    else {
      panic!("expected recommend");
    };
    assert_eq!(prompt, "película de un pianista");
    assert_eq!(embeddings_file, None);
  }

  #[test]
  fn global_env_file_after_subcommand() {
    let cli = Cli::try_parse_from([
      "movierec",
      "embed-movies",
      "--batch-size",
      "8",
      "--overwrite",
      "--env-file",
      "prod.env",
    ])
    .unwrap();
    assert_eq!(cli.env_file, PathBuf::from("prod.env"));
    assert!(matches!(
      cli.command,
      Command::EmbedMovies {
        batch_size: 8,
        overwrite: true
      }
    ));
  }

  #[test]
  fn export_requires_output() {
    assert!(Cli::try_parse_from(["movierec", "export-embeddings"]).is_err());
  }
}
