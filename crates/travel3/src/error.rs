use thiserror::Error;

/// Errors raised while turning a place into a token argument.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MetadataError {
    #[error("place #{index}: required field `{field}` is empty")]
    MissingField { index: usize, field: &'static str },
}

/// Errors raised while loading places from a data source.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("IO error reading {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("invalid place file {path}: {source}")]
    Json {
        path: String,
        source: serde_json::Error,
    },

    #[error("data source {0} contains no places")]
    Empty(String),

    #[error(transparent)]
    Invalid(#[from] MetadataError),
}
