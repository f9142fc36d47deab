use thiserror::Error;

/// Failures surfaced to the caller of the extractor.
#[derive(Debug, Error)]
pub enum ExtractError {
    /// No URL was supplied. Safe to show to the end user.
    #[error("a URL is required")]
    MissingUrl,

    /// Anything that went wrong after the URL was accepted.
    #[error("extraction failed: {0}")]
    Failed(String),

    /// The extractor was built from an unusable configuration.
    #[error("invalid extractor configuration: {0}")]
    Config(String),
}

impl ExtractError {
    pub(crate) fn failed(err: impl std::fmt::Display) -> Self {
        ExtractError::Failed(err.to_string())
    }
}

/// Convenient alias for results that use [`ExtractError`].
pub type Result<T> = std::result::Result<T, ExtractError>;
