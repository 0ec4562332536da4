//! Gap disposition
//!
//! Decides, per gap, whether a full gap-affine alignment is worth running.
//! Degenerate gaps (one side empty) and heavily skewed gaps resolve to a
//! fixed script on the spot; everything else is deferred to the parallel
//! dispatcher.

use crate::cigar::{push_run, CigarOp, EditScript};
use crate::intervals::{IntervalPair, SeqPos};
use serde::{Deserialize, Serialize};

/// Tuning for the skew shortcut.
///
/// When one side of a gap is at most `short_side_max` long and the other
/// exceeds `long_side_min`, the gap is approximated by matching the short
/// side wholesale and charging the remainder as a pure gap. This trades
/// alignment fidelity on extreme length skew against throughput; the
/// defaults are working values, not derived from an accuracy bound.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ShortcutParams {
    /// Max length of the short side still eligible for the shortcut
    pub short_side_max: SeqPos,
    /// Min length of the long side required to trigger it
    pub long_side_min: SeqPos,
}

impl Default for ShortcutParams {
    fn default() -> Self {
        Self {
            short_side_max: 5,
            long_side_min: 100,
        }
    }
}

/// Disposition of one gap, evaluated in priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    /// Both intervals empty, nothing to emit
    Empty,
    /// First interval empty: a single insertion run
    InsertOnly,
    /// Second interval empty: a single deletion run
    DeleteOnly,
    /// First side tiny, second long: match the short side, delete the rest
    SkewFirstShort,
    /// Second side tiny, first long: match the short side, insert the rest
    SkewSecondShort,
    /// No shortcut applies, run the full aligner
    NeedsAlignment,
}

/// Classifies one gap. First matching rule wins.
pub fn classify(pair: &IntervalPair, params: &ShortcutParams) -> Disposition {
    let l1 = pair.first.len;
    let l2 = pair.second.len;

    if l1 == 0 && l2 == 0 {
        Disposition::Empty
    } else if l1 == 0 {
        Disposition::InsertOnly
    } else if l2 == 0 {
        Disposition::DeleteOnly
    } else if l1 <= params.short_side_max && l2 > params.long_side_min {
        Disposition::SkewFirstShort
    } else if l2 <= params.short_side_max && l1 > params.long_side_min {
        Disposition::SkewSecondShort
    } else {
        Disposition::NeedsAlignment
    }
}

/// Materializes the shortcut script for a gap, or `None` when it needs a
/// full alignment. The disposition is derived from the pair itself, so the
/// skew arithmetic can never underflow on a mismatched caller-supplied
/// variant. Runs longer than the 28-bit packing limit are split.
pub fn shortcut_script(pair: &IntervalPair, params: &ShortcutParams) -> Option<EditScript> {
    let l1 = pair.first.len;
    let l2 = pair.second.len;
    let mut script = EditScript::new();

    match classify(pair, params) {
        Disposition::Empty => {}
        Disposition::InsertOnly => push_run(&mut script, CigarOp::Insertion, l2),
        Disposition::DeleteOnly => push_run(&mut script, CigarOp::Deletion, l1),
        Disposition::SkewFirstShort => {
            push_run(&mut script, CigarOp::Match, l1);
            push_run(&mut script, CigarOp::Deletion, l2 - l1);
        }
        Disposition::SkewSecondShort => {
            push_run(&mut script, CigarOp::Match, l2);
            push_run(&mut script, CigarOp::Insertion, l1 - l2);
        }
        Disposition::NeedsAlignment => return None,
    }
    Some(script)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cigar::EditOp;
    use crate::intervals::Interval;

    fn pair(l1: SeqPos, l2: SeqPos) -> IntervalPair {
        IntervalPair::new(Interval::new(0, l1), Interval::new(0, l2))
    }

    fn classify_default(l1: SeqPos, l2: SeqPos) -> Disposition {
        classify(&pair(l1, l2), &ShortcutParams::default())
    }

    #[test]
    fn empty_pair_is_a_noop() {
        assert_eq!(classify_default(0, 0), Disposition::Empty);
        let script = shortcut_script(&pair(0, 0), &ShortcutParams::default()).unwrap();
        assert!(script.is_empty());
    }

    #[test]
    fn one_sided_gaps() {
        assert_eq!(classify_default(0, 10), Disposition::InsertOnly);
        assert_eq!(
            shortcut_script(&pair(0, 10), &ShortcutParams::default()).unwrap(),
            vec![EditOp::new(CigarOp::Insertion, 10)]
        );

        assert_eq!(classify_default(7, 0), Disposition::DeleteOnly);
        assert_eq!(
            shortcut_script(&pair(7, 0), &ShortcutParams::default()).unwrap(),
            vec![EditOp::new(CigarOp::Deletion, 7)]
        );
    }

    #[test]
    fn skew_shortcut_arithmetic() {
        let params = ShortcutParams::default();

        assert_eq!(classify_default(3, 150), Disposition::SkewFirstShort);
        let script = shortcut_script(&pair(3, 150), &params).unwrap();
        assert_eq!(
            script,
            vec![
                EditOp::new(CigarOp::Match, 3),
                EditOp::new(CigarOp::Deletion, 147)
            ]
        );
        // the two runs cover exactly the long side
        assert_eq!(script[0].len as u64 + script[1].len as u64, 150);

        assert_eq!(classify_default(150, 3), Disposition::SkewSecondShort);
        let script = shortcut_script(&pair(150, 3), &params).unwrap();
        assert_eq!(
            script,
            vec![
                EditOp::new(CigarOp::Match, 3),
                EditOp::new(CigarOp::Insertion, 147)
            ]
        );
    }

    #[test]
    fn skew_scripts_are_derived_from_the_pair_itself() {
        // the skew direction comes from the pair's own lengths, so the
        // subtraction is always long minus short, for every skewed shape
        let params = ShortcutParams::default();
        for (l1, l2) in [(1, 101), (5, 150), (101, 1), (150, 5)] {
            let script = shortcut_script(&pair(l1, l2), &params).unwrap();
            let short = l1.min(l2);
            let long = l1.max(l2);
            assert_eq!(script[0], EditOp::new(CigarOp::Match, short as u32));
            assert_eq!(script[1].len as u64, long - short);
        }
    }

    #[test]
    fn near_threshold_pairs_need_alignment() {
        // long side not long enough
        assert_eq!(classify_default(3, 100), Disposition::NeedsAlignment);
        // short side not short enough
        assert_eq!(classify_default(6, 150), Disposition::NeedsAlignment);
        // both comfortably mid-sized
        assert_eq!(classify_default(120, 130), Disposition::NeedsAlignment);
        assert!(shortcut_script(&pair(120, 130), &ShortcutParams::default()).is_none());
    }

    #[test]
    fn classification_is_total_and_exclusive() {
        let params = ShortcutParams::default();
        for l1 in 0..130u64 {
            for l2 in 0..130u64 {
                // exactly one branch fires for every shape
                let d = classify(&pair(l1, l2), &params);
                let again = classify(&pair(l1, l2), &params);
                assert_eq!(d, again);
                match d {
                    Disposition::Empty => assert!(l1 == 0 && l2 == 0),
                    Disposition::InsertOnly => assert!(l1 == 0 && l2 > 0),
                    Disposition::DeleteOnly => assert!(l2 == 0 && l1 > 0),
                    Disposition::SkewFirstShort => {
                        assert!(l1 >= 1 && l1 <= 5 && l2 > 100)
                    }
                    Disposition::SkewSecondShort => {
                        assert!(l2 >= 1 && l2 <= 5 && l1 > 100)
                    }
                    Disposition::NeedsAlignment => {
                        assert!(l1 > 0 && l2 > 0);
                        assert!(!(l1 <= 5 && l2 > 100) && !(l2 <= 5 && l1 > 100));
                    }
                }
            }
        }
    }

    #[test]
    fn thresholds_are_configurable() {
        let params = ShortcutParams {
            short_side_max: 10,
            long_side_min: 20,
        };
        assert_eq!(classify(&pair(8, 50), &params), Disposition::SkewFirstShort);
        assert_eq!(
            classify(&pair(8, 50), &ShortcutParams::default()),
            Disposition::NeedsAlignment
        );
    }
}
