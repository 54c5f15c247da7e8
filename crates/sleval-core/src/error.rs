//! Error types for sleval.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Unknown benchmark: {0}")]
    UnknownBenchmark(String),

    #[error("Benchmark {benchmark} declares {files} manifest files (expected 1 or 2)")]
    ManifestArity { benchmark: String, files: usize },

    #[error("Malformed record in {file} at line {line}: {message}")]
    RecordParse {
        file: String,
        line: usize,
        message: String,
    },

    #[error("Failed to fetch {file}: {source}")]
    Fetch {
        file: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid row order: {0}")]
    Reorder(String),

    #[error("Missing column: {0}")]
    MissingColumn(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, Error>;
