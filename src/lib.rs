pub mod character_category;
pub mod config;
pub mod error;
pub mod grammar;
pub mod input_text;
pub mod plugin;
pub mod text_normalizer;

pub use error::{NormalizerError, NormalizerResult};
pub use text_normalizer::TextNormalizer;
