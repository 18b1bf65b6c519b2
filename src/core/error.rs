//! Error types for om38to13
//!
//! Defines all error types used throughout the library.

use crate::core::interval::Interval;
use std::path::PathBuf;
use thiserror::Error;

/// Main error type for om38to13 operations
#[derive(Debug, Error)]
pub enum Om38to13Error {
    /// Interval arithmetic errors
    #[error("Interval error: {0}")]
    Interval(#[from] IntervalError),

    /// Query classification errors
    #[error("Classification error: {0}")]
    Classify(#[from] ClassifyError),

    /// Coordinate string errors
    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    /// Dataset loading errors
    #[error("Load error: {0}")]
    Load(#[from] LoadError),

    /// Reverse table derivation errors
    #[error("Derive error: {0}")]
    Derive(#[from] DeriveError),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors raised by interval construction and arithmetic
///
/// All of these indicate bad input data or a caller that skipped a
/// normalization or overlap check; none of them is recoverable.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum IntervalError {
    /// Negative (or NaN) coordinate passed to the constructor
    #[error("Invalid interval {chromosome}:{start}-{end}: coordinates must be non-negative")]
    InvalidConstruction { chromosome: u32, start: f64, end: f64 },

    /// Reversed interval where a forward one was required
    #[error("Interval {0} is reversed, expected start <= end")]
    InvalidOrder(Interval),

    /// Intersection of intervals that do not overlap
    #[error("Intervals {0} and {1} do not overlap")]
    NoOverlap(Interval, Interval),
}

/// Errors raised by the mapping classifier
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ClassifyError {
    /// Query not covered by any mapping entry
    #[error("No mapping entry covers {query}")]
    NoCoverage { query: Interval },

    #[error(transparent)]
    Interval(#[from] IntervalError),
}

/// Errors raised while parsing a coordinate string
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseError {
    /// Not of the form chr:pos or chr:start-end
    #[error("Incorrectly specified position '{0}', expected chr:pos or chr:start-end")]
    InvalidFormat(String),

    /// Chromosome name not recognized
    #[error("Unknown chromosome '{0}'")]
    InvalidChromosome(String),

    /// Coordinate that is not a number
    #[error("Invalid coordinate '{0}'")]
    InvalidNumber(String),

    /// Query region given with its start after its end
    #[error("Region '{0}' has its start after its end")]
    ReversedRegion(String),

    #[error(transparent)]
    Interval(#[from] IntervalError),
}

/// Errors that can occur while loading dataset files
#[derive(Debug, Error)]
pub enum LoadError {
    /// Record with the wrong number or kind of fields
    #[error("{}:{line}: unexpected data format: {message}", path.display())]
    UnexpectedFormat {
        path: PathBuf,
        line: usize,
        message: String,
    },

    /// Malformed coordinate inside a record
    #[error("{}:{line}: {source}", path.display())]
    InvalidPosition {
        path: PathBuf,
        line: usize,
        #[source]
        source: ParseError,
    },

    /// File not found
    #[error("Data file not found: {}", .0.display())]
    FileNotFound(PathBuf),

    /// I/O error during loading
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors raised while deriving reverse gap/ambiguity tables
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DeriveError {
    /// Alternative entry with no simple counterpart over the same source
    #[error("Alternative mapping of {0} has no overlapping simple mapping")]
    OrphanAlternative(Interval),

    #[error(transparent)]
    Interval(#[from] IntervalError),
}

/// Result type alias for om38to13 operations
pub type Result<T> = std::result::Result<T, Om38to13Error>;

/// Result type alias for interval arithmetic
pub type IntervalResult<T> = std::result::Result<T, IntervalError>;

/// Result type alias for classification
pub type ClassifyResult<T> = std::result::Result<T, ClassifyError>;

/// Result type alias for dataset loading
pub type LoadResult<T> = std::result::Result<T, LoadError>;
