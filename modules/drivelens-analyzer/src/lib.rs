pub mod analyzer;
pub mod models;
pub mod summarizer;
pub mod synthesizer;
#[cfg(any(test, feature = "test-support"))]
pub mod testing;

#[cfg(test)]
mod boundary_tests;

pub use analyzer::Analyzer;
pub use summarizer::Summarizer;
pub use synthesizer::Synthesizer;
