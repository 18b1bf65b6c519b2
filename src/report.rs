//! Text rendering of classification results
//!
//! The classifier produces [`Finding`] values only; every piece of wording
//! lives here.

use crate::core::{chrom_name, whole_base, Annotation, Finding, FindingKind, QueryReport};
use std::io::{self, Write};

/// Heading of the annotation section
pub const ANNOTATION_SECTION: &str = "Structural variants induced by transition from HG38 to CHM13-T2T";

/// Heading of the mapping-event section
pub const MAPPING_SECTION: &str = "Ambiguous and other mapping events";

/// Column legend printed under the annotation heading in view mode
pub const ANNOTATION_LEGEND: &str = "Type|HG38 coordinate (size)|CHM13 coordinate (size)";

/// Suffix for a mapped target whose orientation is flipped
pub const REVERSED_NOTE: &str = "(Reversed)";

/// Message for a finding kind
///
/// ```
/// use om38to13::core::FindingKind;
/// use om38to13::report::message;
///
/// assert_eq!(message(FindingKind::Unmapped), "no mapping from HG38 to CHM13");
/// ```
pub fn message(kind: FindingKind) -> &'static str {
    match kind {
        FindingKind::Mapped => "site positions in CHM13",
        FindingKind::AmbiguousMapped => "alternative site mapping in CHM13",
        FindingKind::Unmapped => "no mapping from HG38 to CHM13",
        FindingKind::UnmappedInTarget => "in CHM13 have no mapping to HG38",
        FindingKind::MultipleSources => "in CHM13 have multiple sources in HG38",
    }
}

/// Renders reports with a fixed base indentation
#[derive(Debug, Clone, Default)]
pub struct Renderer {
    indent: String,
    legend: bool,
}

impl Renderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Prefix every line with `indent`
    pub fn with_indent(mut self, indent: &str) -> Self {
        self.indent = indent.to_string();
        self
    }

    /// Print the column legend under the annotation heading
    pub fn with_legend(mut self, legend: bool) -> Self {
        self.legend = legend;
        self
    }

    /// Write both sections of a report followed by a blank line
    pub fn write_report<W: Write>(&self, w: &mut W, report: &QueryReport) -> io::Result<()> {
        let section = format!("{}\t", self.indent);
        let item = format!("{}\t\t", self.indent);

        writeln!(w, "{}{}", section, ANNOTATION_SECTION)?;
        if self.legend {
            writeln!(w, "{}{}", item, ANNOTATION_LEGEND)?;
        }
        if report.annotations.is_empty() {
            writeln!(w, "{}None", item)?;
        } else {
            write_annotations(w, &item, &report.annotations)?;
        }

        writeln!(w, "{}{}", section, MAPPING_SECTION)?;
        write_findings(w, &item, &report.findings)?;
        writeln!(w)
    }
}

/// One line per annotation: name, both intervals and their sizes
pub fn write_annotations<W: Write>(w: &mut W, indent: &str, annotations: &[Annotation]) -> io::Result<()> {
    for annotation in annotations {
        writeln!(
            w,
            "{}{} {} ({}) {} ({})",
            indent,
            annotation.name,
            annotation.source,
            annotation.source.span_len(),
            annotation.target,
            annotation.target.span_len()
        )?;
    }
    Ok(())
}

/// One line per finding; nested findings get one extra tab
pub fn write_findings<W: Write>(w: &mut W, indent: &str, findings: &[Finding]) -> io::Result<()> {
    for finding in findings {
        let kind = finding.kind();
        let nest = if kind.is_nested() { "\t" } else { "" };
        write!(w, "{}{}{} {}", indent, nest, finding.interval(), message(kind))?;
        match finding {
            Finding::Mapped { target, reversed, .. } | Finding::AmbiguousMapped { target, reversed, .. } => {
                write!(w, " {}", target)?;
                if *reversed {
                    write!(w, "{}", REVERSED_NOTE)?;
                }
            }
            Finding::MultipleSources { source1, source2, .. } => {
                write!(w, " {} {}", source1, source2)?;
            }
            Finding::Unmapped { .. } | Finding::UnmappedInTarget { .. } => {}
        }
        writeln!(w)?;
    }
    Ok(())
}

/// `chrN:pos` of a breakpoint
pub fn breakpoint(chromosome: u32, pos: f64) -> String {
    format!("{}:{}", chrom_name(chromosome), whole_base(pos))
}
