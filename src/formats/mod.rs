//! File format adapters
//!
//! Adapters for the mapping tables, the annotation table and Bionano SMAP
//! call files.

pub mod io;
pub mod smap;
pub mod tables;

pub use io::{detect_compression, open_reader, split_fields, CompressionFormat, LineIterator};
pub use smap::{
    annotate_smap, filter_smap, AnnotationStats, CommonCall, Inversion, Smap, SmapError,
    Translocation, DEFAULT_DISTANCE,
};
pub use tables::{
    load_annotations, load_mapping_entries, load_reverse_ambiguities, load_reverse_gaps,
    write_reverse_tables,
};
