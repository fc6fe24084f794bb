pub mod budget;
pub mod config;
pub mod error;
pub mod types;

pub use budget::{estimate_tokens, truncate_to_char_boundary, IMAGE_TOKEN_COST};
pub use config::{Config, ModelProvider};
pub use error::AnalyzerError;
pub use types::*;
