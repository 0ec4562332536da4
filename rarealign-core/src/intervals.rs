//! Interval model for anchor-gap decomposition
//!
//! A chain of exact rare-match anchors splits the two sequences into an
//! ordered list of gap regions, one coordinate interval per sequence. The
//! order of that list is the only information later used to reassemble the
//! final alignment, so it is derived once here and never re-sorted.

use serde::{Deserialize, Serialize};
use std::io::Write;
use thiserror::Error;

/// Position or length on a sequence coordinate axis.
pub type SeqPos = u64;

/// Errors in interval derivation and validation
#[derive(Debug, Error)]
pub enum IntervalError {
    #[error("Interval [{start}, {start}+{len}) exceeds sequence extent {extent}")]
    OutOfBounds {
        start: SeqPos,
        len: SeqPos,
        extent: SeqPos,
    },

    #[error("Anchor at ({first}, {second}) is not ordered after the previous anchor")]
    UnorderedAnchor { first: SeqPos, second: SeqPos },

    #[error("Anchor at ({first}, {second}) has zero length")]
    EmptyAnchor { first: SeqPos, second: SeqPos },
}

pub type IntervalResult<T> = Result<T, IntervalError>;

/// A contiguous half-open range on one sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Interval {
    pub start: SeqPos,
    pub len: SeqPos,
}

impl Interval {
    pub fn new(start: SeqPos, len: SeqPos) -> Self {
        Self { start, len }
    }

    pub fn end(&self) -> SeqPos {
        self.start + self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Checks the interval against the extent of its sequence.
    pub fn validate(&self, extent: SeqPos) -> IntervalResult<()> {
        if self.start.checked_add(self.len).map_or(true, |e| e > extent) {
            return Err(IntervalError::OutOfBounds {
                start: self.start,
                len: self.len,
                extent,
            });
        }
        Ok(())
    }

    /// Borrows the addressed bytes out of a sequence.
    pub fn slice<'a>(&self, seq: &'a [u8]) -> IntervalResult<&'a [u8]> {
        self.validate(seq.len() as SeqPos)?;
        Ok(&seq[self.start as usize..self.end() as usize])
    }
}

/// The gap region between two consecutive anchors, one interval per
/// sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntervalPair {
    pub first: Interval,
    pub second: Interval,
}

impl IntervalPair {
    pub fn new(first: Interval, second: Interval) -> Self {
        Self { first, second }
    }
}

/// An exact rare match between the two sequences, used as a trusted
/// alignment checkpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Anchor {
    /// Start of the match on the first sequence
    pub first_start: SeqPos,
    /// Start of the match on the second sequence
    pub second_start: SeqPos,
    /// Exact match length, identical on both sequences
    pub len: SeqPos,
}

impl Anchor {
    pub fn new(first_start: SeqPos, second_start: SeqPos, len: SeqPos) -> Self {
        Self {
            first_start,
            second_start,
            len,
        }
    }
}

/// The ordered decomposition of a sequence pair along an anchor chain.
///
/// `gaps[i]` precedes the i-th anchor; `anchor_runs[i]` is the exact match
/// length of that anchor. There is always one trailing gap, so
/// `gaps.len() == anchor_runs.len() + 1`. The gap index is the ordinal used
/// to reassemble parallel results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainPartition {
    gaps: Vec<IntervalPair>,
    anchor_runs: Vec<SeqPos>,
}

impl ChainPartition {
    pub fn gaps(&self) -> &[IntervalPair] {
        &self.gaps
    }

    pub fn anchor_runs(&self) -> &[SeqPos] {
        &self.anchor_runs
    }

    /// Number of gap ordinals.
    pub fn len(&self) -> usize {
        self.gaps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.gaps.is_empty()
    }
}

/// Derives the ordered gap partition spanned by an anchor chain.
///
/// Anchors must already be in alignment order and non-overlapping on both
/// axes; the produced gap list keeps that order end-to-end. With no anchors
/// the whole pair of sequences becomes a single gap.
pub fn partition_by_anchors(
    anchors: &[Anchor],
    extent_first: SeqPos,
    extent_second: SeqPos,
) -> IntervalResult<ChainPartition> {
    let mut gaps = Vec::with_capacity(anchors.len() + 1);
    let mut anchor_runs = Vec::with_capacity(anchors.len());

    let mut cursor_first: SeqPos = 0;
    let mut cursor_second: SeqPos = 0;

    for anchor in anchors {
        if anchor.len == 0 {
            return Err(IntervalError::EmptyAnchor {
                first: anchor.first_start,
                second: anchor.second_start,
            });
        }
        if anchor.first_start < cursor_first || anchor.second_start < cursor_second {
            return Err(IntervalError::UnorderedAnchor {
                first: anchor.first_start,
                second: anchor.second_start,
            });
        }
        let first = Interval::new(cursor_first, anchor.first_start - cursor_first);
        let second = Interval::new(cursor_second, anchor.second_start - cursor_second);
        first.validate(extent_first)?;
        second.validate(extent_second)?;

        Interval::new(anchor.first_start, anchor.len).validate(extent_first)?;
        Interval::new(anchor.second_start, anchor.len).validate(extent_second)?;

        gaps.push(IntervalPair::new(first, second));
        anchor_runs.push(anchor.len);

        cursor_first = anchor.first_start + anchor.len;
        cursor_second = anchor.second_start + anchor.len;
    }

    // Trailing gap up to the sequence ends
    let first = Interval::new(cursor_first, extent_first - cursor_first);
    let second = Interval::new(cursor_second, extent_second - cursor_second);
    gaps.push(IntervalPair::new(first, second));

    Ok(ChainPartition { gaps, anchor_runs })
}

/// Dumps the gap partition as CSV, a human-inspectable debug artifact.
pub fn dump_partition_csv<W: Write>(partition: &ChainPartition, mut out: W) -> std::io::Result<()> {
    writeln!(
        out,
        "ordinal,first_start,first_len,second_start,second_len"
    )?;
    for (ordinal, pair) in partition.gaps().iter().enumerate() {
        writeln!(
            out,
            "{},{},{},{},{}",
            ordinal, pair.first.start, pair.first.len, pair.second.start, pair.second.len
        )?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partition_without_anchors_is_one_gap() {
        let partition = partition_by_anchors(&[], 100, 80).unwrap();
        assert_eq!(partition.len(), 1);
        assert!(partition.anchor_runs().is_empty());
        assert_eq!(
            partition.gaps()[0],
            IntervalPair::new(Interval::new(0, 100), Interval::new(0, 80))
        );
    }

    #[test]
    fn partition_interleaves_gaps_and_anchors() {
        // anchors: [10, 30) x [5, 25) and [50, 60) x [40, 50)
        let anchors = vec![Anchor::new(10, 5, 20), Anchor::new(50, 40, 10)];
        let partition = partition_by_anchors(&anchors, 100, 90).unwrap();

        assert_eq!(partition.len(), 3);
        assert_eq!(partition.anchor_runs(), &[20, 10]);
        assert_eq!(
            partition.gaps()[0],
            IntervalPair::new(Interval::new(0, 10), Interval::new(0, 5))
        );
        assert_eq!(
            partition.gaps()[1],
            IntervalPair::new(Interval::new(30, 20), Interval::new(25, 15))
        );
        assert_eq!(
            partition.gaps()[2],
            IntervalPair::new(Interval::new(60, 40), Interval::new(50, 40))
        );
    }

    #[test]
    fn partition_rejects_unordered_anchors() {
        let anchors = vec![Anchor::new(50, 40, 10), Anchor::new(10, 5, 20)];
        assert!(matches!(
            partition_by_anchors(&anchors, 100, 90),
            Err(IntervalError::UnorderedAnchor { .. })
        ));
    }

    #[test]
    fn partition_rejects_anchor_past_extent() {
        let anchors = vec![Anchor::new(90, 0, 20)];
        assert!(matches!(
            partition_by_anchors(&anchors, 100, 90),
            Err(IntervalError::OutOfBounds { .. })
        ));
    }

    #[test]
    fn slice_checks_bounds() {
        let seq = b"ACGTACGT";
        assert_eq!(Interval::new(2, 4).slice(seq).unwrap(), b"GTAC");
        assert!(Interval::new(6, 4).slice(seq).is_err());
    }

    #[test]
    fn csv_dump_lists_ordinals() {
        let partition = partition_by_anchors(&[Anchor::new(4, 4, 2)], 10, 10).unwrap();
        let mut buf = Vec::new();
        dump_partition_csv(&partition, &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[1], "0,0,4,0,4");
        assert_eq!(lines[2], "1,6,4,6,4");
    }
}
