use std::env;

use anyhow::{Context, anyhow};

use crate::AppError;

const DEFAULT_DATABASE_URL: &str = "sqlite://movies.db?mode=rwc";
const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
const DEFAULT_OPENAI_EMBEDDING_MODEL: &str = "text-embedding-3-small";

/// Process configuration, built once at startup and passed down explicitly.
#[derive(Clone, Debug)]
pub struct AppEnv {
  pub database_url: String,
  pub openai_base_url: String,
  pub openai_api_key: Option<String>,
  pub openai_embedding_model: String,
  pub openai_embedding_dimensions: Option<u32>,
}

impl AppEnv {
  /// Read configuration from the process environment.
  ///
  /// Env files should already have been loaded (see `dotenvy`) before calling this.
  pub fn from_env() -> Result<Self, AppError> {
    Self::from_lookup(|key| env::var(key).ok())
  }

  /// Build configuration from an arbitrary key lookup.
  pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
  where
    F: Fn(&str) -> Option<String>,
  {
    let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

    let openai_embedding_dimensions = var("OPENAI_EMBEDDING_DIMENSIONS")
      .map(|v| {
        v.trim()
          .parse::<u32>()
          .with_context(|| format!("OPENAI_EMBEDDING_DIMENSIONS must be a positive integer, got {v:?}"))
      })
      .transpose()?;

    Ok(Self {
      database_url: var("DATABASE_URL").unwrap_or_else(|| DEFAULT_DATABASE_URL.to_owned()),
      openai_base_url: var("OPENAI_BASE_URL").unwrap_or_else(|| DEFAULT_OPENAI_BASE_URL.to_owned()),
      // `openai_apikey` is the name older env files use
      openai_api_key: var("OPENAI_API_KEY").or_else(|| var("openai_apikey")),
      openai_embedding_model: var("OPENAI_EMBEDDING_MODEL")
        .unwrap_or_else(|| DEFAULT_OPENAI_EMBEDDING_MODEL.to_owned()),
      openai_embedding_dimensions,
    })
  }

  /// The API key, or an error explaining which variable to set.
  pub fn require_openai_api_key(&self) -> Result<&str, AppError> {
    self
      .openai_api_key
      .as_deref()
      .ok_or_else(|| anyhow!("OPENAI_API_KEY must be set to generate embeddings").into())
  }
}
