//! Mapping table adapters
//!
//! Line-oriented readers for the four dataset tables and writers for the
//! derived reverse tables. Fields are separated by tabs or semicolons and
//! blank lines are skipped.
//!
//! | Table       | Record                                   |
//! |-------------|------------------------------------------|
//! | mapping     | `S.. src tgt`, `A.. src tgt`, `E.. src`  |
//! | gaps        | `interval`                               |
//! | ambiguities | `target source1 source2`                 |
//! | annotations | `name source target`                     |

use crate::core::{
    Annotation, Interval, LoadError, LoadResult, MappingEntry, ParseError, ReverseAmbiguity,
    ReverseTables,
};
use crate::formats::io::{open_reader, split_fields, LineIterator};
use log::debug;
use std::io::{self, BufRead, Write};
use std::path::Path;

/// Why a single record was rejected
#[derive(Debug)]
enum RecordError {
    Format(String),
    Position(ParseError),
}

impl From<ParseError> for RecordError {
    fn from(e: ParseError) -> Self {
        RecordError::Position(e)
    }
}

fn mapping_record(fields: &[&str]) -> Result<MappingEntry, RecordError> {
    match fields {
        [label, source] if label.starts_with('E') => Ok(MappingEntry::Empty {
            source: source.parse()?,
        }),
        [label, source, target] => {
            let source: Interval = source.parse()?;
            let target: Interval = target.parse()?;
            if label.starts_with('S') {
                Ok(MappingEntry::Simple { source, target })
            } else {
                Ok(MappingEntry::Alternative { source, target })
            }
        }
        _ => Err(RecordError::Format(format!(
            "expected 'E<tab>source' or '<label><tab>source<tab>target', got {} fields",
            fields.len()
        ))),
    }
}

fn gap_record(fields: &[&str]) -> Result<Interval, RecordError> {
    match fields {
        [interval] => Ok(interval.parse()?),
        _ => Err(RecordError::Format(format!("expected one interval, got {} fields", fields.len()))),
    }
}

fn ambiguity_record(fields: &[&str]) -> Result<ReverseAmbiguity, RecordError> {
    match fields {
        [target, source1, source2] => Ok(ReverseAmbiguity {
            target: target.parse()?,
            source1: source1.parse()?,
            source2: source2.parse()?,
        }),
        _ => Err(RecordError::Format(format!("expected 3 intervals, got {} fields", fields.len()))),
    }
}

fn annotation_record(fields: &[&str]) -> Result<Annotation, RecordError> {
    match fields {
        [name, source, target] => Ok(Annotation {
            name: name.to_string(),
            source: source.parse()?,
            target: target.parse()?,
        }),
        _ => Err(RecordError::Format(format!(
            "expected name, source and target, got {} fields",
            fields.len()
        ))),
    }
}

fn read_table<R, T, F>(path: &Path, reader: R, parse: F) -> LoadResult<Vec<T>>
where
    R: BufRead,
    F: Fn(&[&str]) -> Result<T, RecordError>,
{
    let mut records = Vec::new();
    let mut lines = LineIterator::new(reader);
    while let Some(line) = lines.next_line() {
        let (line_number, line) = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        let fields = split_fields(trimmed);
        let record = parse(&fields).map_err(|e| match e {
            RecordError::Format(message) => LoadError::UnexpectedFormat {
                path: path.to_path_buf(),
                line: line_number,
                message,
            },
            RecordError::Position(source) => LoadError::InvalidPosition {
                path: path.to_path_buf(),
                line: line_number,
                source,
            },
        })?;
        records.push(record);
    }
    debug!("Read {} records from {:?}", records.len(), path);
    Ok(records)
}

fn load_table<T, F>(path: &Path, parse: F) -> LoadResult<Vec<T>>
where
    F: Fn(&[&str]) -> Result<T, RecordError>,
{
    if !path.exists() {
        return Err(LoadError::FileNotFound(path.to_path_buf()));
    }
    read_table(path, open_reader(path)?, parse)
}

/// Load a mapping table
pub fn load_mapping_entries(path: &Path) -> LoadResult<Vec<MappingEntry>> {
    load_table(path, mapping_record)
}

/// Load a reverse gap table
pub fn load_reverse_gaps(path: &Path) -> LoadResult<Vec<Interval>> {
    load_table(path, gap_record)
}

/// Load a reverse ambiguity table
pub fn load_reverse_ambiguities(path: &Path) -> LoadResult<Vec<ReverseAmbiguity>> {
    load_table(path, ambiguity_record)
}

/// Load an annotation table
pub fn load_annotations(path: &Path) -> LoadResult<Vec<Annotation>> {
    load_table(path, annotation_record)
}

/// Parse a mapping table from bytes (for testing)
pub fn parse_mapping_bytes(data: &[u8]) -> LoadResult<Vec<MappingEntry>> {
    read_table(Path::new("<memory>"), data, mapping_record)
}

/// Parse an annotation table from bytes (for testing)
pub fn parse_annotation_bytes(data: &[u8]) -> LoadResult<Vec<Annotation>> {
    read_table(Path::new("<memory>"), data, annotation_record)
}

/// Write a gap table, one interval per line
pub fn write_reverse_gaps<W: Write>(writer: &mut W, gaps: &[Interval]) -> io::Result<()> {
    for gap in gaps {
        writeln!(writer, "{}", gap)?;
    }
    Ok(())
}

/// Write an ambiguity table, tab-separated
pub fn write_reverse_ambiguities<W: Write>(
    writer: &mut W,
    ambiguities: &[ReverseAmbiguity],
) -> io::Result<()> {
    for item in ambiguities {
        writeln!(writer, "{}\t{}\t{}", item.target, item.source1, item.source2)?;
    }
    Ok(())
}

/// Write both derived reverse tables next to each other
pub fn write_reverse_tables(gaps_path: &Path, ambiguities_path: &Path, tables: &ReverseTables) -> io::Result<()> {
    let mut gaps = io::BufWriter::new(std::fs::File::create(gaps_path)?);
    write_reverse_gaps(&mut gaps, &tables.gaps)?;
    gaps.flush()?;

    let mut ambiguities = io::BufWriter::new(std::fs::File::create(ambiguities_path)?);
    write_reverse_ambiguities(&mut ambiguities, &tables.ambiguities)?;
    ambiguities.flush()
}
