use movierec_ai::EmbeddingProvider;
use movierec_shared::AppError;

use crate::{
  catalog::Catalog,
  matcher::{MatchError, SkippedEntry},
};

#[derive(Debug, Clone, PartialEq)]
pub struct Recommendation {
  pub title: String,
  pub score: f32,
  /// Catalog entries that could not be compared with the prompt.
  pub skipped: Vec<SkippedEntry>,
}

/// Embed `prompt` and return the most similar movie in `catalog`.
///
/// Skipped entries, including movies whose embedding could not be loaded, are
/// logged and returned alongside the result. The provider is not called when
/// the catalog has nothing comparable.
pub async fn recommend<P>(
  provider: &P,
  catalog: &Catalog,
  prompt: &str,
) -> Result<Recommendation, AppError>
where
  P: EmbeddingProvider,
{
  if catalog.is_empty() {
    return Err(MatchError::EmptyCatalog.into());
  }
  if catalog.entries().is_empty() {
    let skipped = catalog.unloadable().to_vec();
    log_skipped(&skipped);
    return Err(MatchError::NoValidEntries { skipped }.into());
  }

  tracing::info!(prompt, model = provider.model(), "embedding prompt");
  let query = provider.embed(prompt).await?;

  let best = match catalog.find_best_match(&query) {
    Ok(best) => best,
    Err(err) => {
      if let MatchError::NoValidEntries { skipped } = &err {
        log_skipped(skipped);
      }
      return Err(err.into());
    }
  };
  log_skipped(&best.skipped);

  tracing::info!(title = %best.label, score = best.score, "best match");

  Ok(Recommendation {
    title: best.label,
    score: best.score,
    skipped: best.skipped,
  })
}

fn log_skipped(skipped: &[SkippedEntry]) {
  for entry in skipped {
    tracing::warn!(movie = %entry.label, index = entry.index, "skipped: {}", entry.reason);
  }
}
