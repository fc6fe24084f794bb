use thiserror::Error;

#[derive(Error, Debug)]
pub enum AnalyzerError {
    #[error("no supported files: every selected file was unsupported or failed")]
    NoSupportedFiles,

    #[error("synthesis failed: {0}")]
    Synthesis(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),
}
