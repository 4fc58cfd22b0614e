mod matcher;
pub use matcher::{BestMatch, CatalogEntry, MatchError, SkipReason, SkippedEntry, find_best_match};

mod catalog;
pub use catalog::{Catalog, MovieEmbedding, export_embeddings};

mod recommendation;
pub use recommendation::{Recommendation, recommend};

mod images;
pub use images::{ImageAssignment, MEDIA_IMAGES_PREFIX, assign_images, image_file_name};

mod inspect;
pub use inspect::{EmbeddingSample, inspect_random};

mod backfill;
pub use backfill::{DEFAULT_BATCH_SIZE, backfill_embeddings};

#[cfg(test)]
mod test_utils;
