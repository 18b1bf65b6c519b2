//! Genomic interval model
//!
//! An [`Interval`] is an inclusive `[start, end]` region on one chromosome.
//! Coordinates are real numbers so that proportional mapping can work on
//! fractional positions before rounding.
//!
//! Orientation is carried by the endpoint order: an interval with
//! `start > end` is *reversed* and encodes a target region whose orientation
//! flips between the two assemblies. Overlap and intersection only accept
//! forward intervals; use [`Interval::forward`] to normalize first.

use crate::core::error::{IntervalError, IntervalResult, ParseError};
use std::fmt;
use std::str::FromStr;

/// Bionano numbering of chromosome X
pub const CHROM_X: u32 = 23;

/// Bionano numbering of chromosome Y
pub const CHROM_Y: u32 = 24;

/// Orientation of an interval relative to the assembly's coordinate axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub enum Orientation {
    /// `start <= end`
    #[default]
    Forward,
    /// `start > end`
    Reversed,
}

/// Genomic interval with inclusive bounds
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Interval {
    chromosome: u32,
    start: f64,
    end: f64,
}

impl Interval {
    /// Create a new interval
    ///
    /// Both coordinates must be non-negative. Endpoints may be given in
    /// either order; `start > end` yields a reversed interval.
    ///
    /// # Examples
    /// ```
    /// use om38to13::core::Interval;
    ///
    /// let iv = Interval::new(1, 100.0, 200.0).unwrap();
    /// assert!(!iv.is_reversed());
    /// assert!(Interval::new(1, -1.0, 200.0).is_err());
    /// ```
    pub fn new(chromosome: u32, start: f64, end: f64) -> IntervalResult<Self> {
        // NaN fails both comparisons
        if !(start >= 0.0 && end >= 0.0) {
            return Err(IntervalError::InvalidConstruction { chromosome, start, end });
        }
        Ok(Self { chromosome, start, end })
    }

    /// Create a single-position interval
    pub fn point(chromosome: u32, pos: f64) -> IntervalResult<Self> {
        Self::new(chromosome, pos, pos)
    }

    #[inline]
    pub fn chromosome(&self) -> u32 {
        self.chromosome
    }

    #[inline]
    pub fn start(&self) -> f64 {
        self.start
    }

    #[inline]
    pub fn end(&self) -> f64 {
        self.end
    }

    /// Smaller of the two endpoints
    #[inline]
    pub fn low(&self) -> f64 {
        self.start.min(self.end)
    }

    /// Larger of the two endpoints
    #[inline]
    pub fn high(&self) -> f64 {
        self.start.max(self.end)
    }

    #[inline]
    pub fn orientation(&self) -> Orientation {
        if self.start > self.end {
            Orientation::Reversed
        } else {
            Orientation::Forward
        }
    }

    #[inline]
    pub fn is_reversed(&self) -> bool {
        self.orientation() == Orientation::Reversed
    }

    /// True if the interval covers a single position
    #[inline]
    pub fn is_point(&self) -> bool {
        self.start == self.end
    }

    /// Same region with endpoints in left-to-right order
    #[inline]
    pub fn forward(&self) -> Self {
        Self {
            chromosome: self.chromosome,
            start: self.low(),
            end: self.high(),
        }
    }

    /// Number of positions covered, counting both endpoints
    ///
    /// ```
    /// use om38to13::core::Interval;
    ///
    /// assert_eq!(Interval::new(1, 100.0, 199.0).unwrap().span_len(), 100.0);
    /// assert_eq!(Interval::new(1, 199.0, 100.0).unwrap().span_len(), 98.0);
    /// ```
    #[inline]
    pub fn span_len(&self) -> f64 {
        (self.end - self.start + 1.0).abs()
    }

    fn require_forward(&self) -> IntervalResult<()> {
        if self.is_reversed() {
            return Err(IntervalError::InvalidOrder(*self));
        }
        Ok(())
    }

    /// Check whether two intervals share at least one position
    ///
    /// Intervals on different chromosomes never overlap. Otherwise both
    /// intervals must be forward. Bounds are inclusive, so touching and
    /// zero-length intervals count as overlapping.
    ///
    /// # Examples
    /// ```
    /// use om38to13::core::Interval;
    ///
    /// let a = Interval::new(1, 0.0, 10.0).unwrap();
    /// let b = Interval::new(1, 10.0, 20.0).unwrap();
    /// assert!(a.overlaps(&b).unwrap());
    ///
    /// let reversed = Interval::new(1, 20.0, 10.0).unwrap();
    /// assert!(a.overlaps(&reversed).is_err());
    /// ```
    pub fn overlaps(&self, other: &Interval) -> IntervalResult<bool> {
        if self.chromosome != other.chromosome {
            return Ok(false);
        }
        self.require_forward()?;
        other.require_forward()?;
        Ok(self.start <= other.end && other.start <= self.end)
    }

    /// Compute the common part of two overlapping forward intervals
    pub fn intersection(&self, other: &Interval) -> IntervalResult<Interval> {
        if !self.overlaps(other)? {
            return Err(IntervalError::NoOverlap(*self, *other));
        }
        Ok(Interval {
            chromosome: self.chromosome,
            start: self.start.max(other.start),
            end: self.end.min(other.end),
        })
    }

    /// Map `part` of `whole` onto the corresponding part of `self`
    ///
    /// `self` is the target-assembly interval that corresponds to `whole`
    /// in the source assembly. The relative position of `part` inside
    /// `whole` is carried over proportionally; each endpoint is rounded to
    /// the nearest integer, ties to even. A reversed `self` yields a result
    /// that runs in the same reversed direction.
    ///
    /// If either `self` or `whole` is a single point the proportional split
    /// is undefined and `self` is returned unchanged.
    ///
    /// `whole` and `part` must be forward. `part` is expected to lie inside
    /// `whole`; no clamping is applied when it does not.
    ///
    /// # Examples
    /// ```
    /// use om38to13::core::Interval;
    ///
    /// let whole = Interval::new(1, 0.0, 10.0).unwrap();
    /// let part = Interval::new(1, 2.0, 8.0).unwrap();
    ///
    /// let target = Interval::new(1, 100.0, 200.0).unwrap();
    /// let mapped = target.map_subinterval(&whole, &part).unwrap();
    /// assert_eq!((mapped.start(), mapped.end()), (120.0, 180.0));
    ///
    /// let target = Interval::new(1, 200.0, 100.0).unwrap();
    /// let mapped = target.map_subinterval(&whole, &part).unwrap();
    /// assert_eq!((mapped.start(), mapped.end()), (180.0, 120.0));
    /// ```
    pub fn map_subinterval(&self, whole: &Interval, part: &Interval) -> IntervalResult<Interval> {
        whole.require_forward()?;
        part.require_forward()?;

        if self.is_point() || whole.is_point() {
            return Ok(*self);
        }

        let width = whole.end - whole.start;
        let start_percent = (part.start - whole.start) / width;
        let end_percent = (part.end - whole.start) / width;

        let project = |percent: f64| -> f64 {
            match self.orientation() {
                Orientation::Forward => self.start + (self.end - self.start) * percent,
                Orientation::Reversed => self.start - (self.start - self.end) * percent,
            }
            .round_ties_even()
        };

        Interval::new(self.chromosome, project(start_percent), project(end_percent))
    }
}

/// Whole-base position for text output, truncated toward zero
pub fn whole_base(pos: f64) -> f64 {
    pos.trunc()
}

/// Renders `chrN:start-end`, or `chrN:pos` for a point, in whole bases
impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let chrom = chrom_name(self.chromosome);
        if self.is_point() {
            write!(f, "{}:{}", chrom, whole_base(self.start))
        } else {
            write!(f, "{}:{}-{}", chrom, whole_base(self.start), whole_base(self.end))
        }
    }
}

impl FromStr for Interval {
    type Err = ParseError;

    /// Parse `chr1:1000-2000`, `chr1:1000`, `1:1000-2000` or `chrX:5`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (chrom, coords) = s
            .rsplit_once(':')
            .ok_or_else(|| ParseError::InvalidFormat(s.to_string()))?;
        if chrom.is_empty() || coords.is_empty() {
            return Err(ParseError::InvalidFormat(s.to_string()));
        }

        let chromosome =
            chrom_number(chrom).ok_or_else(|| ParseError::InvalidChromosome(chrom.to_string()))?;

        let interval = match coords.split_once('-') {
            Some((start, end)) => Interval::new(chromosome, parse_coord(start)?, parse_coord(end)?)?,
            None => Interval::point(chromosome, parse_coord(coords)?)?,
        };
        Ok(interval)
    }
}

/// Parse a region typed by the user into a classifier query
///
/// Data files may carry reversed intervals, but a query must be forward.
///
/// ```
/// use om38to13::core::{parse_query, ParseError};
///
/// assert_eq!(parse_query("chr1:100-200").unwrap().end(), 200.0);
/// assert!(matches!(parse_query("chr1:200-100"), Err(ParseError::ReversedRegion(_))));
/// ```
pub fn parse_query(region: &str) -> Result<Interval, ParseError> {
    let query: Interval = region.parse()?;
    if query.is_reversed() {
        return Err(ParseError::ReversedRegion(region.trim().to_string()));
    }
    Ok(query)
}

fn parse_coord(s: &str) -> Result<f64, ParseError> {
    let valid = !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit() || b == b'.');
    if !valid {
        return Err(ParseError::InvalidNumber(s.to_string()));
    }
    s.parse::<f64>()
        .map_err(|_| ParseError::InvalidNumber(s.to_string()))
}

/// Convert a chromosome name to its Bionano number
///
/// The `chr` prefix is optional and case-insensitive. X and Y map to 23
/// and 24.
///
/// # Examples
/// ```
/// use om38to13::core::chrom_number;
///
/// assert_eq!(chrom_number("chr1"), Some(1));
/// assert_eq!(chrom_number("17"), Some(17));
/// assert_eq!(chrom_number("ChrX"), Some(23));
/// assert_eq!(chrom_number("chrY"), Some(24));
/// assert_eq!(chrom_number("chrM"), None);
/// ```
pub fn chrom_number(chrom: &str) -> Option<u32> {
    let lower = chrom.trim().to_ascii_lowercase();
    let bare = lower.strip_prefix("chr").unwrap_or(&lower);
    match bare {
        "x" => Some(CHROM_X),
        "y" => Some(CHROM_Y),
        _ => bare.parse().ok(),
    }
}

/// Convert a Bionano chromosome number to a `chr`-prefixed name
///
/// ```
/// use om38to13::core::chrom_name;
///
/// assert_eq!(chrom_name(1), "chr1");
/// assert_eq!(chrom_name(23), "chrX");
/// ```
pub fn chrom_name(chromosome: u32) -> String {
    match chromosome {
        CHROM_X => "chrX".to_string(),
        CHROM_Y => "chrY".to_string(),
        n => format!("chr{}", n),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn iv(chrom: u32, start: f64, end: f64) -> Interval {
        Interval::new(chrom, start, end).unwrap()
    }

    #[test]
    fn test_new_rejects_negative() {
        assert!(matches!(
            Interval::new(1, -1.0, 10.0),
            Err(IntervalError::InvalidConstruction { .. })
        ));
        assert!(Interval::new(1, 10.0, -1.0).is_err());
        assert!(Interval::new(1, f64::NAN, 10.0).is_err());
        assert!(Interval::new(1, 0.0, 0.0).is_ok());
    }

    #[test]
    fn test_orientation() {
        assert_eq!(iv(1, 5.0, 10.0).orientation(), Orientation::Forward);
        assert_eq!(iv(1, 5.0, 5.0).orientation(), Orientation::Forward);
        assert_eq!(iv(1, 10.0, 5.0).orientation(), Orientation::Reversed);
        assert_eq!(iv(1, 10.0, 5.0).forward(), iv(1, 5.0, 10.0));
    }

    #[test]
    fn test_overlap_inclusive_bounds() {
        let a = iv(1, 0.0, 10.0);
        assert!(a.overlaps(&iv(1, 10.0, 20.0)).unwrap());
        assert!(a.overlaps(&iv(1, 5.0, 5.0)).unwrap());
        assert!(!a.overlaps(&iv(1, 11.0, 20.0)).unwrap());
    }

    #[test]
    fn test_overlap_other_chromosome() {
        let a = iv(1, 0.0, 10.0);
        assert!(!a.overlaps(&iv(2, 0.0, 10.0)).unwrap());
        // chromosome check comes before the orientation check
        assert!(!a.overlaps(&iv(2, 10.0, 0.0)).unwrap());
    }

    #[test]
    fn test_overlap_reversed_fails() {
        let a = iv(1, 0.0, 10.0);
        let r = iv(1, 10.0, 0.0);
        assert!(matches!(a.overlaps(&r), Err(IntervalError::InvalidOrder(_))));
        assert!(matches!(r.overlaps(&a), Err(IntervalError::InvalidOrder(_))));
    }

    #[test]
    fn test_intersection() {
        let a = iv(1, 0.0, 100.0);
        let b = iv(1, 50.0, 150.0);
        assert_eq!(a.intersection(&b).unwrap(), iv(1, 50.0, 100.0));
        assert_eq!(b.intersection(&a).unwrap(), iv(1, 50.0, 100.0));
        assert_eq!(a.intersection(&iv(1, 25.0, 75.0)).unwrap(), iv(1, 25.0, 75.0));
        assert_eq!(a.intersection(&iv(1, 100.0, 200.0)).unwrap(), iv(1, 100.0, 100.0));
    }

    #[test]
    fn test_intersection_without_overlap() {
        let a = iv(1, 0.0, 10.0);
        assert!(matches!(
            a.intersection(&iv(1, 20.0, 30.0)),
            Err(IntervalError::NoOverlap(_, _))
        ));
        assert!(matches!(
            a.intersection(&iv(2, 0.0, 10.0)),
            Err(IntervalError::NoOverlap(_, _))
        ));
    }

    #[test]
    fn test_map_forward() {
        let target = iv(1, 100.0, 200.0);
        let mapped = target.map_subinterval(&iv(1, 0.0, 10.0), &iv(1, 2.0, 8.0)).unwrap();
        assert_eq!(mapped, iv(1, 120.0, 180.0));
        assert!(!mapped.is_reversed());
    }

    #[test]
    fn test_map_reversed() {
        let target = iv(1, 200.0, 100.0);
        let mapped = target.map_subinterval(&iv(1, 0.0, 10.0), &iv(1, 2.0, 8.0)).unwrap();
        assert_eq!(mapped, iv(1, 180.0, 120.0));
        assert!(mapped.is_reversed());
    }

    #[test]
    fn test_map_degenerate() {
        let point = iv(3, 5.0, 5.0);
        let mapped = point.map_subinterval(&iv(3, 0.0, 10.0), &iv(3, 2.0, 8.0)).unwrap();
        assert_eq!(mapped, point);

        let target = iv(3, 100.0, 200.0);
        let mapped = target.map_subinterval(&iv(3, 7.0, 7.0), &iv(3, 7.0, 7.0)).unwrap();
        assert_eq!(mapped, target);
    }

    #[test]
    fn test_map_keeps_target_chromosome() {
        let target = iv(2, 0.0, 10.0);
        let mapped = target.map_subinterval(&iv(1, 0.0, 10.0), &iv(1, 3.0, 7.0)).unwrap();
        assert_eq!(mapped, iv(2, 3.0, 7.0));
    }

    #[test]
    fn test_map_rounds_ties_to_even() {
        let whole = iv(1, 0.0, 4.0);
        let part = iv(1, 1.0, 3.0);
        // 0.5 -> 0, 1.5 -> 2
        let mapped = iv(1, 0.0, 2.0).map_subinterval(&whole, &part).unwrap();
        assert_eq!(mapped, iv(1, 0.0, 2.0));
        // 2.5 -> 2, 7.5 -> 8
        let mapped = iv(1, 0.0, 10.0).map_subinterval(&whole, &part).unwrap();
        assert_eq!(mapped, iv(1, 2.0, 8.0));
    }

    #[test]
    fn test_map_requires_forward_whole_and_part() {
        let target = iv(1, 100.0, 200.0);
        assert!(matches!(
            target.map_subinterval(&iv(1, 10.0, 0.0), &iv(1, 2.0, 8.0)),
            Err(IntervalError::InvalidOrder(_))
        ));
        assert!(matches!(
            target.map_subinterval(&iv(1, 0.0, 10.0), &iv(1, 8.0, 2.0)),
            Err(IntervalError::InvalidOrder(_))
        ));
    }

    #[test]
    fn test_map_part_outside_whole_is_not_clamped() {
        let target = iv(1, 100.0, 200.0);
        let mapped = target.map_subinterval(&iv(1, 0.0, 10.0), &iv(1, 5.0, 15.0)).unwrap();
        assert_eq!(mapped, iv(1, 150.0, 250.0));
    }

    #[test]
    fn test_parse_range() {
        let parsed: Interval = "chr1:1000-2000".parse().unwrap();
        assert_eq!(parsed, iv(1, 1000.0, 2000.0));
        let parsed: Interval = "17:5-3".parse().unwrap();
        assert_eq!(parsed, iv(17, 5.0, 3.0));
        let parsed: Interval = "chrX:10-20".parse().unwrap();
        assert_eq!(parsed.chromosome(), CHROM_X);
    }

    #[test]
    fn test_parse_point() {
        let parsed: Interval = "chr2:1000".parse().unwrap();
        assert_eq!(parsed, iv(2, 1000.0, 1000.0));
    }

    #[test]
    fn test_parse_invalid() {
        assert!(matches!("chr1".parse::<Interval>(), Err(ParseError::InvalidFormat(_))));
        assert!(matches!("chr1:".parse::<Interval>(), Err(ParseError::InvalidFormat(_))));
        assert!(matches!("chrM:1-2".parse::<Interval>(), Err(ParseError::InvalidChromosome(_))));
        assert!(matches!("chr1:a-2".parse::<Interval>(), Err(ParseError::InvalidNumber(_))));
        assert!(matches!("chr1:-1-2".parse::<Interval>(), Err(ParseError::InvalidNumber(_))));
    }

    #[test]
    fn test_display() {
        assert_eq!(iv(1, 1000.0, 2000.0).to_string(), "chr1:1000-2000");
        assert_eq!(iv(23, 5.0, 5.0).to_string(), "chrX:5");
        assert_eq!(iv(24, 9.0, 3.0).to_string(), "chrY:9-3");
    }

    #[test]
    fn test_display_whole_bases() {
        assert_eq!(iv(1, 1000.5, 2000.9).to_string(), "chr1:1000-2000");
        assert_eq!(iv(1, 7.2, 7.2).to_string(), "chr1:7");
        assert_eq!(whole_base(49000.7), 49000.0);
    }

    #[test]
    fn test_parse_query_rejects_reversed() {
        assert_eq!(parse_query(" chr1:100-200 ").unwrap(), iv(1, 100.0, 200.0));
        assert_eq!(parse_query("chr1:150").unwrap(), iv(1, 150.0, 150.0));
        assert_eq!(
            parse_query("chr1:200-100"),
            Err(ParseError::ReversedRegion("chr1:200-100".to_string()))
        );
        assert!(matches!(parse_query("chr1:x"), Err(ParseError::InvalidNumber(_))));
    }

    #[test]
    fn test_span_len() {
        assert_eq!(iv(1, 0.0, 0.0).span_len(), 1.0);
        assert_eq!(iv(1, 10.0, 19.0).span_len(), 10.0);
    }
}
