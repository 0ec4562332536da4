//! Gap-affine alignment capability seam
//!
//! The optimal sub-alignment of one gap is delegated to an external engine
//! behind the [`GapAffineAligner`] trait. Engines are not assumed safe for
//! concurrent use on one instance, so the dispatcher asks an
//! [`AlignerFactory`] for a fresh, task-private instance per gap and drops
//! it as soon as the packed operation buffer has been extracted.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors surfaced by an alignment engine
#[derive(Debug, Clone, Error)]
pub enum AlignError {
    #[error("Alignment failed: {0}")]
    AlignmentFailed(String),

    #[error("Out of memory during alignment")]
    OutOfMemory,

    #[error("Engine produced an empty operation buffer for a non-empty gap")]
    EmptyResult,

    #[error("Invalid interval: {0}")]
    InvalidInterval(String),
}

pub type AlignResult<T> = Result<T, AlignError>;

/// Penalty parameterization of the gap-affine-2-piece model: two distinct
/// gap-open/extend regimes, favoring different behavior for short and long
/// gaps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Affine2pPenalties {
    pub match_score: i32,
    /// X > 0
    pub mismatch: i32,
    /// O1 >= 0
    pub gap_opening1: i32,
    /// E1 > 0
    pub gap_extension1: i32,
    /// O2 >= 0
    pub gap_opening2: i32,
    /// E2 > 0
    pub gap_extension2: i32,
}

impl Default for Affine2pPenalties {
    fn default() -> Self {
        Self {
            match_score: 0,
            mismatch: 4,
            gap_opening1: 6,
            gap_extension1: 2,
            gap_opening2: 24,
            gap_extension2: 1,
        }
    }
}

/// One end-to-end pairwise alignment of two byte strings.
///
/// The returned buffer is packed operation words in the layout of
/// [`crate::cigar::decode`]: run length in the upper 28 bits, opcode in the
/// lower 4.
pub trait GapAffineAligner {
    fn align(&mut self, first: &[u8], second: &[u8]) -> AlignResult<Vec<u32>>;
}

/// Creates task-private aligner instances.
///
/// `Sync` because one factory is shared across all worker tasks; the
/// instances it hands out are exclusively owned by the requesting task.
pub trait AlignerFactory: Sync {
    type Aligner: GapAffineAligner;

    fn create(&self, penalties: &Affine2pPenalties) -> AlignResult<Self::Aligner>;
}
