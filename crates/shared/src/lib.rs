mod error;
pub use error::AppError;

mod env;
pub use env::AppEnv;

pub mod blob;
pub use blob::{BlobError, decode_embedding, encode_embedding};

pub mod similarity;
pub use similarity::{SimilarityError, ZERO_NORM_EPSILON, cosine_similarity};
