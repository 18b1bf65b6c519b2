//! Core liftover model
//!
//! This module contains the interval model, the dataset collections,
//! and the classifier that explains how a region moves from HG38 to CHM13.

mod classifier;
mod dataset;
mod error;
mod interval;

pub use classifier::{Classifier, Finding, FindingKind, QueryReport};
pub use dataset::{
    Annotation, DatasetLoader, Datasets, EntryKind, MappingEntry, ReverseAmbiguity, ReverseTables,
};
pub use error::{
    ClassifyError, ClassifyResult, DeriveError, IntervalError, IntervalResult, LoadError,
    LoadResult, Om38to13Error, ParseError, Result,
};
pub use interval::{
    chrom_name, chrom_number, parse_query, whole_base, Interval, Orientation, CHROM_X, CHROM_Y,
};
