//! End-to-end tests: data directory on disk, SMAP in, report out

use om38to13::config::{DataLayout, DatasetVariant};
use om38to13::core::{Classifier, DatasetLoader};
use om38to13::formats::{annotate_smap, filter_smap, tables, Smap, SmapError};
use om38to13::report::{ANNOTATION_SECTION, MAPPING_SECTION};
use om38to13::ReverseTables;
use std::fs;
use std::io::Write;
use tempfile::TempDir;

const SMAP: &str = "\
# SMAP File Version:\t0.0
#h SmapEntryID\tQryContigID\tRefcontigID1\tRefcontigID2\tQryStartPos\tQryEndPos\tRefStartPos\tRefEndPos\tConfidence\tType\tXmapID1\tXmapID2\tLinkID
1\t10\t1\t1\t0\t0\t1000\t2000\t0.9\tdeletion\t1\t1\t-1
2\t11\t1\t2\t0\t0\t50000\t30000\t0.9\ttranslocation_interchr\t2\t3\t-1
3\t12\t1\t1\t0\t0\t60000\t61000\t0.9\tinversion\t4\t5\t4
4\t12\t1\t1\t0\t0\t70000\t71000\t0.9\tinversion\t4\t5\t3
5\t13\t1\t1\t0\t0\t90000\t91000\t0.9\tinsertion\t6\t6\t-1
";

fn write_dataset(dir: &TempDir) -> DataLayout {
    let layout = DataLayout::new(dir.path(), DatasetVariant::JustAlignments);
    fs::write(
        layout.forward_table(),
        "S\tchr1:0-100000\tchr1:0-100000\nS\tchr2:0-100000\tchr2:100000-0\n",
    )
    .unwrap();
    fs::write(
        layout.reverse_table(),
        "S\tchr1:0-100000\tchr1:0-100000\nA\tchr1:1500-1600\tchr5:1600-1500\nE\tchr2:70000-70500\n",
    )
    .unwrap();
    fs::write(layout.annotations(), "DEL\tchr1:1800-1900\tchr1:1800-1800\n").unwrap();
    layout
}

fn prepare(layout: &DataLayout) {
    let entries = tables::load_mapping_entries(&layout.reverse_table()).unwrap();
    let derived = ReverseTables::derive(&entries).unwrap();
    tables::write_reverse_tables(&layout.reverse_gaps(), &layout.reverse_ambiguities(), &derived).unwrap();
}

fn annotate(smap: &Smap, layout: &DataLayout, threads: usize) -> String {
    let datasets = layout.load().unwrap();
    let mut out = Vec::new();
    annotate_smap(smap, &Classifier::new(&datasets), &mut out, threads).unwrap();
    String::from_utf8(out).unwrap()
}

#[test]
fn test_prepare_writes_reverse_tables() {
    let dir = TempDir::new().unwrap();
    let layout = write_dataset(&dir);
    prepare(&layout);

    assert_eq!(fs::read_to_string(layout.reverse_gaps()).unwrap(), "chr2:70000-70500\n");
    assert_eq!(
        fs::read_to_string(layout.reverse_ambiguities()).unwrap(),
        "chr1:1500-1600\tchr5:1600-1500\tchr1:1500-1600\n"
    );
}

#[test]
fn test_annotate_report() {
    let dir = TempDir::new().unwrap();
    let layout = write_dataset(&dir);
    prepare(&layout);
    let smap = Smap::parse_bytes(SMAP.as_bytes(), 1000.0).unwrap();

    let text = annotate(&smap, &layout, 1);

    // common call 1 hits the deletion annotation and the reverse ambiguity
    assert!(text.starts_with("1 chr1:1000-2000 1\t10\t1\t1"));
    assert!(text.contains("\t\tDEL chr1:1800-1900 (101) chr1:1800 (1)\n"));
    assert!(text.contains(
        "\t\t\tchr1:1500-1600 in CHM13 have multiple sources in HG38 chr5:1600-1500 chr1:1500-1600\n"
    ));

    // translocation: breakpoint B on chr2 maps reversed and meets a gap
    assert!(text.contains("2 TRANSLOCATION A=chr1:50000\tB=chr2:30000\n"));
    assert!(text.contains("\tA: chr1:49000-51000\n"));
    assert!(text.contains("\tB: chr2:29000-31000\n"));
    assert!(text.contains("\t\t\tchr2:29000-31000 site positions in CHM13 chr2:71000-69000(Reversed)\n"));
    assert!(text.contains("\t\t\t\tchr2:70000-70500 in CHM13 have no mapping to HG38\n"));

    // inversion between the inner breakpoints
    assert!(text.contains("3 4 INVERSION chr1:61000-70000\n"));

    assert_eq!(text.matches(ANNOTATION_SECTION).count(), 5);
    assert_eq!(text.matches(MAPPING_SECTION).count(), 5);
}

#[test]
fn test_parallel_annotation_matches_sequential() {
    let dir = TempDir::new().unwrap();
    let layout = write_dataset(&dir);
    prepare(&layout);
    let smap = Smap::parse_bytes(SMAP.as_bytes(), 1000.0).unwrap();

    assert_eq!(annotate(&smap, &layout, 1), annotate(&smap, &layout, 4));
}

#[test]
fn test_filter_drops_annotated_calls() {
    let dir = TempDir::new().unwrap();
    let layout = write_dataset(&dir);
    prepare(&layout);
    let datasets = layout.load().unwrap();

    let mut smap_file = tempfile::Builder::new().suffix(".smap").tempfile().unwrap();
    smap_file.write_all(SMAP.as_bytes()).unwrap();
    smap_file.flush().unwrap();
    let smap = Smap::from_file(smap_file.path(), 1000.0).unwrap();

    let kept = filter_smap(&smap, &Classifier::new(&datasets)).unwrap();
    assert_eq!(kept, vec![2, 3, 4, 5]);

    let mut out = Vec::new();
    smap.write_selected(&mut out, &kept).unwrap();
    let text = String::from_utf8(out).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 6);
    assert!(lines[0].starts_with("# SMAP"));
    assert!(lines[2].starts_with("2\t"));
    assert!(lines[5].starts_with("5\t"));
}

#[test]
fn test_missing_smap_file() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("calls.smap");
    assert!(matches!(Smap::from_file(&missing, 1000.0), Err(SmapError::FileNotFound(_))));
}

#[test]
fn test_non_smap_input_rejected() {
    let dir = TempDir::new().unwrap();
    let layout = write_dataset(&dir);
    // a data table is not an SMAP, even if it exists
    assert!(matches!(
        Smap::from_file(&layout.forward_table(), 1000.0),
        Err(SmapError::NotSmap(_))
    ));
}

#[test]
fn test_uncovered_call_is_fatal() {
    let dir = TempDir::new().unwrap();
    let layout = write_dataset(&dir);
    prepare(&layout);
    let datasets = layout.load().unwrap();
    let smap = Smap::parse_bytes(
        b"9\t1\t7\t7\t0\t0\t100\t200\t0.9\tdeletion\t1\t1\t-1\n",
        1000.0,
    )
    .unwrap();

    let mut out = Vec::new();
    let err = annotate_smap(&smap, &Classifier::new(&datasets), &mut out, 2).unwrap_err();
    assert!(matches!(err, SmapError::Classify(_)));
}
