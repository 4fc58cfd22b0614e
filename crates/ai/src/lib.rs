mod provider;
pub use provider::EmbeddingProvider;

mod embed;
pub use embed::OpenAiEmbedder;

mod embed_many;
