//! SMAP format adapter
//!
//! Reads Bionano structural-variant call files, pairs linked inversion
//! breakpoints, and annotates or filters the calls against the loaded
//! mapping datasets.
//!
//! Columns used (0-based, tab-separated): 0 `SmapEntryID`,
//! 2 `RefcontigID1`, 3 `RefcontigID2`, 6 `RefStartPos`, 7 `RefEndPos`,
//! 12 `LinkID`. A `LinkID` other than -1 marks one half of an inversion.

use crate::core::{chrom_number, Classifier, ClassifyError, Interval, IntervalError, QueryReport};
use crate::formats::io::{open_reader, LineIterator};
use crate::report::{breakpoint, Renderer};
use log::{debug, info};
use rayon::prelude::*;
use std::collections::HashMap;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Default distance around a translocation breakpoint
pub const DEFAULT_DISTANCE: f64 = 10000.0;

/// Absent inversion end coordinate
const MISSING: f64 = -1.0;

/// `LinkID` of an unlinked call
const NO_LINK: i64 = -1;

const COL_ID: usize = 0;
const COL_CHROM1: usize = 2;
const COL_CHROM2: usize = 3;
const COL_START: usize = 6;
const COL_END: usize = 7;
const COL_LINK: usize = 12;

/// SMAP processing error
#[derive(Debug, Error)]
pub enum SmapError {
    #[error("SMAP file not found: {}", .0.display())]
    FileNotFound(PathBuf),

    #[error("Not an SMAP file (expected .smap extension): {}", .0.display())]
    NotSmap(PathBuf),

    #[error("Line {line}: expected at least {expected} columns, found {found}")]
    TooFewColumns { line: usize, expected: usize, found: usize },

    #[error("Line {line}: invalid value '{value}' in column {column}")]
    InvalidField { line: usize, column: usize, value: String },

    #[error("Line {line}: {source}")]
    Interval {
        line: usize,
        #[source]
        source: IntervalError,
    },

    #[error("Inversion {id}: start {x} is after end {y}")]
    InversionOrder { id: i64, x: f64, y: f64 },

    #[error("Inversion {id}: first coordinate cannot be negative")]
    NegativeInversionStart { id: i64 },

    #[error("Inversion {id}: linked entry {link} not found")]
    MissingPartner { id: i64, link: i64 },

    #[error("Inversion {id}: linked entry {partner} is on another chromosome")]
    ChromosomeMismatch { id: i64, partner: i64 },

    #[error("Inversion {id}: linked entry {partner} does not link back")]
    NonReciprocalLink { id: i64, partner: i64 },

    #[error("Failed to build inversion {id}: {source}")]
    InversionInterval {
        id: i64,
        #[source]
        source: IntervalError,
    },

    #[error(transparent)]
    Classify(#[from] ClassifyError),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Call that is neither a translocation nor part of an inversion
#[derive(Debug, Clone, PartialEq)]
pub struct CommonCall {
    pub id: i64,
    pub position: Interval,
}

/// Translocation with a query window around each breakpoint
#[derive(Debug, Clone, PartialEq)]
pub struct Translocation {
    pub id: i64,
    pub chrom_a: u32,
    pub pos_a: f64,
    pub window_a: Interval,
    pub chrom_b: u32,
    pub pos_b: f64,
    pub window_b: Interval,
}

/// Inversion assembled from two linked entries
#[derive(Debug, Clone, PartialEq)]
pub struct Inversion {
    pub id_a: i64,
    pub id_b: i64,
    pub position: Interval,
}

/// One half of an inversion before pairing
#[derive(Debug, Clone, Copy, PartialEq)]
struct InversionPart {
    id: i64,
    link: i64,
    chromosome: u32,
    x: f64,
    y: f64,
}

/// Parsed SMAP file
#[derive(Debug, Clone, Default)]
pub struct Smap {
    /// Header lines (starting with `#`), verbatim
    pub header: Vec<String>,
    /// Original record lines by entry id
    pub original: HashMap<i64, String>,
    pub common: Vec<CommonCall>,
    pub translocations: Vec<Translocation>,
    pub inversions: Vec<Inversion>,
}

fn field<'a>(fields: &[&'a str], column: usize, line: usize) -> Result<&'a str, SmapError> {
    fields.get(column).copied().ok_or(SmapError::TooFewColumns {
        line,
        expected: COL_LINK + 1,
        found: fields.len(),
    })
}

fn parse_id(fields: &[&str], column: usize, line: usize) -> Result<i64, SmapError> {
    let value = field(fields, column, line)?;
    value.trim().parse().map_err(|_| SmapError::InvalidField {
        line,
        column,
        value: value.to_string(),
    })
}

fn parse_chrom(fields: &[&str], column: usize, line: usize) -> Result<u32, SmapError> {
    let value = field(fields, column, line)?;
    chrom_number(value).ok_or_else(|| SmapError::InvalidField {
        line,
        column,
        value: value.to_string(),
    })
}

fn parse_pos(fields: &[&str], column: usize, line: usize) -> Result<f64, SmapError> {
    let value = field(fields, column, line)?;
    value.trim().parse().map_err(|_| SmapError::InvalidField {
        line,
        column,
        value: value.to_string(),
    })
}

/// Window of `distance` on both sides of a breakpoint, clipped at zero
fn window(chromosome: u32, pos: f64, distance: f64, line: usize) -> Result<Interval, SmapError> {
    Interval::new(chromosome, (pos - distance).max(0.0), pos + distance)
        .map_err(|source| SmapError::Interval { line, source })
}

/// File names ending in `.smap`, optionally compressed
///
/// ```
/// use om38to13::formats::smap::is_smap_path;
/// use std::path::Path;
///
/// assert!(is_smap_path(Path::new("calls.smap")));
/// assert!(is_smap_path(Path::new("calls.SMAP.gz")));
/// assert!(!is_smap_path(Path::new("chr1:100-200")));
/// ```
pub fn is_smap_path(path: &Path) -> bool {
    let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
        return false;
    };
    let name = name.to_ascii_lowercase();
    [".smap", ".smap.gz", ".smap.bz2"]
        .iter()
        .any(|suffix| name.ends_with(suffix))
}

impl Smap {
    /// Load an SMAP file
    pub fn from_file(path: &Path, distance: f64) -> Result<Self, SmapError> {
        if !is_smap_path(path) {
            return Err(SmapError::NotSmap(path.to_path_buf()));
        }
        if !path.exists() {
            return Err(SmapError::FileNotFound(path.to_path_buf()));
        }
        let smap = Self::parse_reader(open_reader(path)?, distance)?;
        info!(
            "Loaded {:?}: {} common calls, {} translocations, {} inversions",
            path,
            smap.common.len(),
            smap.translocations.len(),
            smap.inversions.len()
        );
        Ok(smap)
    }

    /// Parse SMAP content from bytes (for testing)
    pub fn parse_bytes(data: &[u8], distance: f64) -> Result<Self, SmapError> {
        Self::parse_reader(data, distance)
    }

    pub fn parse_reader<R: BufRead>(reader: R, distance: f64) -> Result<Self, SmapError> {
        let mut smap = Smap::default();
        let mut parts = Vec::new();

        let mut lines = LineIterator::new(reader);
        while let Some(line) = lines.next_line() {
            let (line_number, line) = line?;
            if line.starts_with('#') {
                smap.header.push(line.trim_end().to_string());
                continue;
            }
            let record = line.trim();
            if record.is_empty() {
                continue;
            }

            let fields: Vec<&str> = record.split('\t').collect();
            let id = parse_id(&fields, COL_ID, line_number)?;
            let link = parse_id(&fields, COL_LINK, line_number)?;
            let chrom1 = parse_chrom(&fields, COL_CHROM1, line_number)?;
            let start = parse_pos(&fields, COL_START, line_number)?;
            let end = parse_pos(&fields, COL_END, line_number)?;

            if link != NO_LINK {
                parts.push(InversionPart {
                    id,
                    link,
                    chromosome: chrom1,
                    x: start,
                    y: end,
                });
            } else if record.contains("trans") {
                let chrom2 = parse_chrom(&fields, COL_CHROM2, line_number)?;
                smap.translocations.push(Translocation {
                    id,
                    chrom_a: chrom1,
                    pos_a: start,
                    window_a: window(chrom1, start, distance, line_number)?,
                    chrom_b: chrom2,
                    pos_b: end,
                    window_b: window(chrom2, end, distance, line_number)?,
                });
            } else {
                let position = Interval::new(chrom1, start, end)
                    .map_err(|source| SmapError::Interval { line: line_number, source })?;
                smap.common.push(CommonCall { id, position });
            }
            smap.original.insert(id, record.to_string());
        }

        smap.inversions = pair_inversions(&parts)?;
        debug!("Paired {} inversion entries into {} inversions", parts.len(), smap.inversions.len());
        Ok(smap)
    }

    /// Write header lines followed by the original lines of `ids`, in order
    pub fn write_selected<W: Write>(&self, w: &mut W, ids: &[i64]) -> io::Result<()> {
        for line in &self.header {
            writeln!(w, "{}", line)?;
        }
        for id in ids {
            if let Some(line) = self.original.get(id) {
                writeln!(w, "{}", line)?;
            }
        }
        Ok(())
    }

    /// All query intervals in report order: common, translocation A and B,
    /// inversion
    pub fn queries(&self) -> Vec<Interval> {
        let mut queries = Vec::with_capacity(
            self.common.len() + 2 * self.translocations.len() + self.inversions.len(),
        );
        queries.extend(self.common.iter().map(|c| c.position));
        for t in &self.translocations {
            queries.push(t.window_a);
            queries.push(t.window_b);
        }
        queries.extend(self.inversions.iter().map(|i| i.position));
        queries
    }
}

/// Pair linked inversion entries
///
/// Each entry carries `x` (start) and `y` (end, or -1 when only one
/// breakpoint is known). The inversion spans the inner breakpoints of the
/// two entries.
fn pair_inversions(parts: &[InversionPart]) -> Result<Vec<Inversion>, SmapError> {
    let mut inversions: Vec<Inversion> = Vec::new();

    for a in parts {
        if a.y != MISSING && a.x > a.y {
            return Err(SmapError::InversionOrder { id: a.id, x: a.x, y: a.y });
        }
        if a.x < 0.0 {
            return Err(SmapError::NegativeInversionStart { id: a.id });
        }
        if inversions.iter().any(|inv| inv.id_a == a.id || inv.id_b == a.id) {
            continue;
        }

        let b = parts
            .iter()
            .find(|p| p.id == a.link)
            .ok_or(SmapError::MissingPartner { id: a.id, link: a.link })?;
        if a.chromosome != b.chromosome {
            return Err(SmapError::ChromosomeMismatch { id: a.id, partner: b.id });
        }
        if b.link != a.id {
            return Err(SmapError::NonReciprocalLink { id: a.id, partner: b.id });
        }

        let (start, end) = if a.y == MISSING {
            if a.x < b.x { (a.x, b.x) } else { (b.y, a.x) }
        } else if b.y == MISSING {
            if b.x < a.x { (b.x, a.x) } else { (a.y, b.x) }
        } else if a.x < b.x {
            (a.y, b.x)
        } else {
            (b.y, a.x)
        };

        let position = Interval::new(a.chromosome, start, end)
            .map_err(|source| SmapError::InversionInterval { id: a.id, source })?;
        inversions.push(Inversion { id_a: a.id, id_b: b.id, position });
    }

    Ok(inversions)
}

/// Annotation statistics
#[derive(Debug, Clone, Default)]
pub struct AnnotationStats {
    pub common: usize,
    pub translocations: usize,
    pub inversions: usize,
    /// Queries with at least one overlapping annotation record
    pub annotated: usize,
}

fn classify_all(
    queries: &[Interval],
    classifier: &Classifier<'_>,
    threads: usize,
) -> Result<Vec<QueryReport>, SmapError> {
    if threads <= 1 {
        return Ok(queries
            .iter()
            .map(|q| classifier.classify(q))
            .collect::<Result<Vec<_>, _>>()?);
    }

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build()
        .map_err(|e| io::Error::new(io::ErrorKind::Other, format!("Failed to create thread pool: {}", e)))?;

    let reports = pool.install(|| {
        queries
            .par_iter()
            .map(|q| classifier.classify(q))
            .collect::<Result<Vec<_>, _>>()
    })?;
    Ok(reports)
}

/// Write an annotated report for every call in the SMAP
///
/// Calls are classified in parallel when `threads > 1`; output order is
/// always the SMAP order (common calls, translocations, inversions).
pub fn annotate_smap<W: Write>(
    smap: &Smap,
    classifier: &Classifier<'_>,
    w: &mut W,
    threads: usize,
) -> Result<AnnotationStats, SmapError> {
    let reports = classify_all(&smap.queries(), classifier, threads)?;
    let mut reports = reports.iter();
    let mut next_report = || reports.next().ok_or_else(|| io::Error::new(io::ErrorKind::Other, "missing report"));

    let top = Renderer::new();
    let nested = Renderer::new().with_indent("\t");
    let mut stats = AnnotationStats::default();

    for call in &smap.common {
        let report = next_report()?;
        let original = smap.original.get(&call.id).map(String::as_str).unwrap_or_default();
        writeln!(w, "{} {} {}", call.id, call.position, original)?;
        top.write_report(w, report)?;
        stats.common += 1;
        stats.annotated += usize::from(!report.annotations.is_empty());
    }

    for t in &smap.translocations {
        writeln!(
            w,
            "{} TRANSLOCATION A={}\tB={}",
            t.id,
            breakpoint(t.chrom_a, t.pos_a),
            breakpoint(t.chrom_b, t.pos_b)
        )?;
        for (label, window) in [("A", &t.window_a), ("B", &t.window_b)] {
            let report = next_report()?;
            writeln!(w, "\t{}: {}", label, window)?;
            nested.write_report(w, report)?;
            stats.annotated += usize::from(!report.annotations.is_empty());
        }
        writeln!(w)?;
        stats.translocations += 1;
    }

    for inv in &smap.inversions {
        let report = next_report()?;
        writeln!(w, "{} {} INVERSION {}", inv.id_a, inv.id_b, inv.position)?;
        top.write_report(w, report)?;
        stats.inversions += 1;
        stats.annotated += usize::from(!report.annotations.is_empty());
    }

    Ok(stats)
}

/// Ids of calls with no overlapping annotation record, sorted
///
/// A translocation is kept only if neither breakpoint window is annotated.
/// Both entries of a kept inversion are returned.
pub fn filter_smap(smap: &Smap, classifier: &Classifier<'_>) -> Result<Vec<i64>, IntervalError> {
    let unannotated = |q: &Interval| -> Result<bool, IntervalError> {
        Ok(classifier.annotations_for(q)?.is_empty())
    };

    let mut ids = Vec::new();
    for call in &smap.common {
        if unannotated(&call.position)? {
            ids.push(call.id);
        }
    }
    for t in &smap.translocations {
        if unannotated(&t.window_a)? && unannotated(&t.window_b)? {
            ids.push(t.id);
        }
    }
    for inv in &smap.inversions {
        if unannotated(&inv.position)? {
            ids.push(inv.id_a);
            ids.push(inv.id_b);
        }
    }
    ids.sort_unstable();
    Ok(ids)
}
