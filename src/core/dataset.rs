//! In-memory mapping datasets
//!
//! Holds the four read-only collections a query runs against: forward
//! mapping entries, reverse gaps, reverse ambiguity triples and annotation
//! records. Everything is loaded once and never mutated afterwards.

use crate::core::error::{DeriveError, LoadResult};
use crate::core::interval::Interval;

/// Kind of a mapping entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryKind {
    Simple,
    Alternative,
    Empty,
}

/// One row of a mapping table, keyed by its source interval
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MappingEntry {
    /// Unambiguous one-to-one region mapping
    Simple { source: Interval, target: Interval },
    /// One of several competing mappings of the same source region
    Alternative { source: Interval, target: Interval },
    /// Source region absent from the other assembly
    Empty { source: Interval },
}

impl MappingEntry {
    pub fn kind(&self) -> EntryKind {
        match self {
            MappingEntry::Simple { .. } => EntryKind::Simple,
            MappingEntry::Alternative { .. } => EntryKind::Alternative,
            MappingEntry::Empty { .. } => EntryKind::Empty,
        }
    }

    pub fn source(&self) -> &Interval {
        match self {
            MappingEntry::Simple { source, .. }
            | MappingEntry::Alternative { source, .. }
            | MappingEntry::Empty { source } => source,
        }
    }

    /// Target interval, absent for `Empty`
    pub fn target(&self) -> Option<&Interval> {
        match self {
            MappingEntry::Simple { target, .. } | MappingEntry::Alternative { target, .. } => {
                Some(target)
            }
            MappingEntry::Empty { .. } => None,
        }
    }
}

/// Target region reachable from two distinct source regions
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReverseAmbiguity {
    pub target: Interval,
    pub source1: Interval,
    pub source2: Interval,
}

/// Named structural variant expressed in both assemblies
#[derive(Debug, Clone, PartialEq)]
pub struct Annotation {
    pub name: String,
    pub source: Interval,
    pub target: Interval,
}

/// All collections one query is classified against
#[derive(Debug, Clone, Default)]
pub struct Datasets {
    pub entries: Vec<MappingEntry>,
    pub reverse_gaps: Vec<Interval>,
    pub reverse_ambiguities: Vec<ReverseAmbiguity>,
    pub annotations: Vec<Annotation>,
}

impl Datasets {
    pub fn new(
        entries: Vec<MappingEntry>,
        reverse_gaps: Vec<Interval>,
        reverse_ambiguities: Vec<ReverseAmbiguity>,
        annotations: Vec<Annotation>,
    ) -> Self {
        Self {
            entries,
            reverse_gaps,
            reverse_ambiguities,
            annotations,
        }
    }
}

/// Source of a fully loaded [`Datasets`]
///
/// Implemented by the file-backed layout in [`crate::config::DataLayout`];
/// the dataset variant (full data, alignments only, assemblies only) is a
/// property of the implementor, not a separate code path.
pub trait DatasetLoader {
    fn load(&self) -> LoadResult<Datasets>;
}

/// Gap and ambiguity tables of the reverse direction
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReverseTables {
    pub gaps: Vec<Interval>,
    pub ambiguities: Vec<ReverseAmbiguity>,
}

impl ReverseTables {
    /// Derive reverse tables from the reverse direction's mapping entries
    ///
    /// Gaps are the sources of `Empty` entries. Every `Alternative` entry is
    /// paired with each `Simple` entry whose source overlaps it; the shared
    /// part is mapped through both entries to give the two competing
    /// candidates. An `Alternative` without any such `Simple` is an error.
    pub fn derive(entries: &[MappingEntry]) -> Result<Self, DeriveError> {
        let gaps = entries
            .iter()
            .filter_map(|entry| match entry {
                MappingEntry::Empty { source } => Some(*source),
                _ => None,
            })
            .collect();

        let mut ambiguities = Vec::new();
        for entry in entries {
            let MappingEntry::Alternative { source: alt_source, target: alt_target } = entry else {
                continue;
            };

            let mut paired = false;
            for other in entries {
                let MappingEntry::Simple { source, target } = other else {
                    continue;
                };
                if !source.overlaps(alt_source)? {
                    continue;
                }
                let part = alt_source.intersection(source)?;
                ambiguities.push(ReverseAmbiguity {
                    target: part,
                    source1: alt_target.map_subinterval(alt_source, &part)?,
                    source2: target.map_subinterval(source, &part)?,
                });
                paired = true;
            }

            if !paired {
                return Err(DeriveError::OrphanAlternative(*alt_source));
            }
        }

        Ok(Self { gaps, ambiguities })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn iv(chrom: u32, start: f64, end: f64) -> Interval {
        Interval::new(chrom, start, end).unwrap()
    }

    #[test]
    fn test_entry_accessors() {
        let simple = MappingEntry::Simple { source: iv(1, 0.0, 10.0), target: iv(1, 5.0, 15.0) };
        assert_eq!(simple.kind(), EntryKind::Simple);
        assert_eq!(simple.source(), &iv(1, 0.0, 10.0));
        assert_eq!(simple.target(), Some(&iv(1, 5.0, 15.0)));

        let empty = MappingEntry::Empty { source: iv(1, 0.0, 10.0) };
        assert_eq!(empty.kind(), EntryKind::Empty);
        assert_eq!(empty.target(), None);
    }

    #[test]
    fn test_derive_gaps_in_order() {
        let entries = vec![
            MappingEntry::Empty { source: iv(1, 50.0, 60.0) },
            MappingEntry::Simple { source: iv(1, 0.0, 10.0), target: iv(1, 0.0, 10.0) },
            MappingEntry::Empty { source: iv(2, 0.0, 5.0) },
        ];
        let tables = ReverseTables::derive(&entries).unwrap();
        assert_eq!(tables.gaps, vec![iv(1, 50.0, 60.0), iv(2, 0.0, 5.0)]);
        assert!(tables.ambiguities.is_empty());
    }

    #[test]
    fn test_derive_ambiguity() {
        let entries = vec![
            MappingEntry::Simple { source: iv(2, 0.0, 10.0), target: iv(1, 100.0, 110.0) },
            MappingEntry::Alternative { source: iv(2, 4.0, 8.0), target: iv(1, 500.0, 504.0) },
        ];
        let tables = ReverseTables::derive(&entries).unwrap();
        assert_eq!(
            tables.ambiguities,
            vec![ReverseAmbiguity {
                target: iv(2, 4.0, 8.0),
                source1: iv(1, 500.0, 504.0),
                source2: iv(1, 104.0, 108.0),
            }]
        );
    }

    #[test]
    fn test_derive_orphan_alternative() {
        let entries = vec![
            MappingEntry::Simple { source: iv(2, 0.0, 10.0), target: iv(1, 0.0, 10.0) },
            MappingEntry::Alternative { source: iv(2, 40.0, 50.0), target: iv(1, 40.0, 50.0) },
        ];
        assert_eq!(
            ReverseTables::derive(&entries),
            Err(DeriveError::OrphanAlternative(iv(2, 40.0, 50.0)))
        );
    }
}
