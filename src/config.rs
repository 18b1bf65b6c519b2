//! Dataset layout on disk
//!
//! All tables live in one data directory. The dataset variant only changes
//! the file-name suffix of the mapping tables.

use crate::core::{DatasetLoader, Datasets, LoadResult};
use crate::formats::tables::{
    load_annotations, load_mapping_entries, load_reverse_ambiguities, load_reverse_gaps,
};
use log::{info, warn};
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Default data directory
pub const DEFAULT_DATA_DIR: &str = "data";

/// Default annotation table file name
pub const DEFAULT_ANNOTATIONS_FILE: &str = "prediction_38.bed";

const FORWARD_STEM: &str = "fromHG38toCHM13";
const REVERSE_STEM: &str = "fromCHM13toHG38";

/// Which alignment data the mapping tables were built from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DatasetVariant {
    /// Alignments and assemblies combined
    AllData,
    /// Alignments only
    #[default]
    JustAlignments,
    /// Assemblies only
    JustAssemblies,
}

impl DatasetVariant {
    /// File-name suffix of the variant's mapping tables
    pub fn suffix(&self) -> &'static str {
        match self {
            DatasetVariant::AllData => "",
            DatasetVariant::JustAlignments => "-alignments",
            DatasetVariant::JustAssemblies => "-assemblies",
        }
    }
}

/// File locations of one dataset variant
#[derive(Debug, Clone)]
pub struct DataLayout {
    pub data_dir: PathBuf,
    pub variant: DatasetVariant,
    pub annotations_file: String,
}

impl Default for DataLayout {
    fn default() -> Self {
        Self::new(DEFAULT_DATA_DIR, DatasetVariant::default())
    }
}

impl DataLayout {
    pub fn new(data_dir: impl Into<PathBuf>, variant: DatasetVariant) -> Self {
        Self {
            data_dir: data_dir.into(),
            variant,
            annotations_file: DEFAULT_ANNOTATIONS_FILE.to_string(),
        }
    }

    fn table(&self, stem: &str, extra: &str) -> PathBuf {
        self.data_dir
            .join(format!("{}{}{}", stem, self.variant.suffix(), extra))
    }

    /// HG38 to CHM13 mapping table
    pub fn forward_table(&self) -> PathBuf {
        self.table(FORWARD_STEM, "")
    }

    /// CHM13 to HG38 mapping table
    pub fn reverse_table(&self) -> PathBuf {
        self.table(REVERSE_STEM, "")
    }

    /// Derived reverse gap table
    pub fn reverse_gaps(&self) -> PathBuf {
        self.table(REVERSE_STEM, "-empty")
    }

    /// Derived reverse ambiguity table
    pub fn reverse_ambiguities(&self) -> PathBuf {
        self.table(REVERSE_STEM, "-alternatives")
    }

    pub fn annotations(&self) -> PathBuf {
        self.data_dir.join(&self.annotations_file)
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}

impl DatasetLoader for DataLayout {
    fn load(&self) -> LoadResult<Datasets> {
        let start = Instant::now();

        let entries = load_mapping_entries(&self.forward_table())?;
        let reverse_gaps = load_reverse_gaps(&self.reverse_gaps())?;
        let reverse_ambiguities = load_reverse_ambiguities(&self.reverse_ambiguities())?;
        let annotations = load_annotations(&self.annotations())?;
        if annotations.is_empty() {
            warn!("No annotation records in {:?}", self.annotations());
        }

        info!(
            "Loaded {:?} dataset from {:?}: {} entries, {} gaps, {} ambiguities, {} annotations in {:.2}s",
            self.variant,
            self.data_dir,
            entries.len(),
            reverse_gaps.len(),
            reverse_ambiguities.len(),
            annotations.len(),
            start.elapsed().as_secs_f64()
        );

        Ok(Datasets::new(entries, reverse_gaps, reverse_ambiguities, annotations))
    }
}
