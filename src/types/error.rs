//! Error type shared by every part of the router library.

use std::path::PathBuf;

use thiserror::Error;

use super::criterion::Criterion;

/// Errors raised while loading a network, querying it or presenting
/// results.
#[derive(Debug, Error)]
pub enum RouterError {
    /// A CSV row carried fewer than the five required fields.
    #[error("line {line}: expected 5 fields, found {found}")]
    IncompleteRecord { line: u64, found: usize },

    /// A numeric field could not be parsed or is out of its valid range.
    #[error("line {line}: invalid {field} value '{value}'")]
    MalformedRecord {
        line: u64,
        field: &'static str,
        value: String,
    },

    /// The query references a city that was never loaded.
    #[error("unknown city '{0}'")]
    UnknownCity(String),

    /// No path exists between the two cities.
    #[error("no connection between {origin} and {destination} ({criterion})")]
    Unreachable {
        origin: String,
        destination: String,
        criterion: Criterion,
    },

    /// An accumulated path weight no longer fits in an `f64`.
    #[error("path weight from {origin} to {city} overflows ({criterion})")]
    WeightOverflow {
        origin: String,
        city: String,
        criterion: Criterion,
    },

    /// Invalid settings or values that break the weighting scheme.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The input network file does not exist.
    #[error("network file not found: {}", .0.display())]
    InputNotFound(PathBuf),

    /// Rendering the network image failed.
    #[error("render failed: {0}")]
    Render(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// Convenience result type for router operations.
pub type Result<T> = std::result::Result<T, RouterError>;
