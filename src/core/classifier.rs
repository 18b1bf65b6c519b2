//! Mapping classifier
//!
//! Classifies one queried source-assembly interval against the loaded
//! datasets. The algorithm:
//! 1. Collect annotation records whose source overlaps the query
//! 2. For each mapping entry whose source overlaps the query, compute the
//!    covered part of the query
//! 3. `Empty` entries report the part as unmapped
//! 4. `Simple`/`Alternative` entries map the part onto the target assembly,
//!    then look up reverse gaps and reverse ambiguities inside that target
//!
//! Findings keep the load order of the datasets; nothing is sorted by
//! coordinate.

use crate::core::dataset::{Annotation, Datasets, MappingEntry};
use crate::core::error::{ClassifyError, ClassifyResult, IntervalResult};
use crate::core::interval::Interval;
use log::debug;

/// Kind of a mapping finding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FindingKind {
    Mapped,
    AmbiguousMapped,
    Unmapped,
    UnmappedInTarget,
    MultipleSources,
}

impl FindingKind {
    /// Sub-findings are reported under the primary finding that produced them
    pub fn is_nested(&self) -> bool {
        matches!(self, FindingKind::UnmappedInTarget | FindingKind::MultipleSources)
    }
}

/// One classified part of a query
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Finding {
    /// Part of the query mapped by a simple entry
    Mapped {
        interval: Interval,
        target: Interval,
        reversed: bool,
    },
    /// Part of the query mapped by an alternative entry
    AmbiguousMapped {
        interval: Interval,
        target: Interval,
        reversed: bool,
    },
    /// Part of the query with no counterpart in the target assembly
    Unmapped { interval: Interval },
    /// Part of a mapped target with no counterpart back in the source
    UnmappedInTarget { interval: Interval },
    /// Part of a mapped target reachable from two source regions
    MultipleSources {
        interval: Interval,
        source1: Interval,
        source2: Interval,
    },
}

impl Finding {
    pub fn kind(&self) -> FindingKind {
        match self {
            Finding::Mapped { .. } => FindingKind::Mapped,
            Finding::AmbiguousMapped { .. } => FindingKind::AmbiguousMapped,
            Finding::Unmapped { .. } => FindingKind::Unmapped,
            Finding::UnmappedInTarget { .. } => FindingKind::UnmappedInTarget,
            Finding::MultipleSources { .. } => FindingKind::MultipleSources,
        }
    }

    /// Interval the finding is about
    ///
    /// Source-assembly coordinates for primary findings, target-assembly
    /// coordinates for nested ones.
    pub fn interval(&self) -> &Interval {
        match self {
            Finding::Mapped { interval, .. }
            | Finding::AmbiguousMapped { interval, .. }
            | Finding::Unmapped { interval }
            | Finding::UnmappedInTarget { interval }
            | Finding::MultipleSources { interval, .. } => interval,
        }
    }
}

/// Full classification of one query
#[derive(Debug, Clone, PartialEq)]
pub struct QueryReport {
    pub query: Interval,
    /// Annotation records overlapping the query, in load order
    pub annotations: Vec<Annotation>,
    /// Mapping findings, in mapping-entry load order
    pub findings: Vec<Finding>,
}

/// Classifier over a set of immutable datasets
///
/// Holds only a shared reference, so a single classifier can serve many
/// queries, including from several threads.
#[derive(Debug, Clone, Copy)]
pub struct Classifier<'a> {
    datasets: &'a Datasets,
}

impl<'a> Classifier<'a> {
    pub fn new(datasets: &'a Datasets) -> Self {
        Self { datasets }
    }

    /// Classify a query: annotations first, then mapping findings
    ///
    /// Fails with [`ClassifyError::NoCoverage`] when no mapping entry
    /// overlaps the query.
    pub fn classify(&self, query: &Interval) -> ClassifyResult<QueryReport> {
        let annotations = self.annotations_for(query)?;
        let findings = self.map_query(query)?;
        Ok(QueryReport {
            query: *query,
            annotations,
            findings,
        })
    }

    /// Annotation records whose source interval overlaps the query
    pub fn annotations_for(&self, query: &Interval) -> IntervalResult<Vec<Annotation>> {
        let mut hits = Vec::new();
        for annotation in &self.datasets.annotations {
            if annotation.source.overlaps(query)? {
                hits.push(annotation.clone());
            }
        }
        Ok(hits)
    }

    /// Mapping findings for the query
    pub fn map_query(&self, query: &Interval) -> ClassifyResult<Vec<Finding>> {
        let mut findings = Vec::new();
        let mut covered = false;

        for entry in &self.datasets.entries {
            if !entry.source().overlaps(query)? {
                continue;
            }
            covered = true;

            let hit = query.intersection(entry.source())?;
            let (source, target, ambiguous) = match *entry {
                MappingEntry::Empty { .. } => {
                    findings.push(Finding::Unmapped { interval: hit });
                    continue;
                }
                MappingEntry::Simple { source, target } => (source, target, false),
                MappingEntry::Alternative { source, target } => (source, target, true),
            };

            let mapped = target.map_subinterval(&source, &hit)?;
            let reversed = mapped.is_reversed();
            findings.push(if ambiguous {
                Finding::AmbiguousMapped { interval: hit, target: mapped, reversed }
            } else {
                Finding::Mapped { interval: hit, target: mapped, reversed }
            });

            self.target_events(&mapped.forward(), &mut findings)?;
        }

        if !covered {
            return Err(ClassifyError::NoCoverage { query: *query });
        }

        debug!("{}: {} mapping findings", query, findings.len());
        Ok(findings)
    }

    /// Reverse gaps and reverse ambiguities inside a forward target interval
    fn target_events(&self, target: &Interval, findings: &mut Vec<Finding>) -> IntervalResult<()> {
        for gap in &self.datasets.reverse_gaps {
            if gap.overlaps(target)? {
                findings.push(Finding::UnmappedInTarget {
                    interval: gap.intersection(target)?,
                });
            }
        }

        for ambiguity in &self.datasets.reverse_ambiguities {
            if !ambiguity.target.overlaps(target)? {
                continue;
            }
            let part = ambiguity.target.intersection(target)?;
            findings.push(Finding::MultipleSources {
                interval: part,
                source1: ambiguity.source1.map_subinterval(&ambiguity.target, &part)?,
                source2: ambiguity.source2.map_subinterval(&ambiguity.target, &part)?,
            });
        }

        Ok(())
    }
}
