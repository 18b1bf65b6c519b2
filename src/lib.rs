//! om38to13 - Explain how genomic regions move from HG38 to CHM13-T2T
//!
//! Classifies a query region against precomputed HG38→CHM13 mapping tables
//! and reports where it lands, which parts are unmapped or ambiguous, and
//! which known structural differences between the assemblies overlap it.
//! Used to annotate and filter Bionano optical-mapping SV calls.
//!
//! # Features
//!
//! - Proportional sub-interval mapping with orientation tracking
//! - Reverse-direction gap and ambiguity detection
//! - SMAP annotation (parallel with rayon) and filtering
//! - Plain, gzip and bzip2 data tables
//!
//! # Example
//!
//! ```
//! use om38to13::core::{Classifier, Datasets, FindingKind, Interval, MappingEntry};
//!
//! let entries = vec![MappingEntry::Simple {
//!     source: "chr1:0-100".parse().unwrap(),
//!     target: "chr1:1000-1100".parse().unwrap(),
//! }];
//! let datasets = Datasets::new(entries, vec![], vec![], vec![]);
//! let classifier = Classifier::new(&datasets);
//!
//! let query: Interval = "chr1:10-20".parse().unwrap();
//! let report = classifier.classify(&query).unwrap();
//! assert_eq!(report.findings[0].kind(), FindingKind::Mapped);
//! ```

pub mod config;
pub mod core;
pub mod formats;
pub mod report;

// Re-export commonly used types
pub use config::{DataLayout, DatasetVariant};
pub use core::{
    Annotation, Classifier, ClassifyError, DatasetLoader, Datasets, Finding, FindingKind,
    Interval, IntervalError, LoadError, MappingEntry, Om38to13Error, QueryReport, ReverseTables,
};
pub use formats::smap;
