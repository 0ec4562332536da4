//! Parallel sub-alignment dispatch
//!
//! Gaps classified as needing a full alignment are fanned out over a
//! bounded rayon pool, one task per gap ordinal. Every ordinal owns a
//! write-once slot in a container sized before any task starts, so slot
//! writes are disjoint by construction and completion order never matters;
//! the submitting thread blocks until the whole batch has finished.

use crate::align::{Affine2pPenalties, AlignError, AlignerFactory, GapAffineAligner};
use crate::cigar::{from_packed_words, EditScript};
use crate::classify::{shortcut_script, ShortcutParams};
use crate::intervals::{ChainPartition, IntervalPair, SeqPos};
use rayon::prelude::*;
use std::sync::OnceLock;
use thiserror::Error;

/// Errors raised by the dispatcher itself, as opposed to per-gap failures
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("Failed to build worker pool: {0}")]
    PoolBuild(String),
}

pub type DispatchResult<T> = Result<T, DispatchError>;

/// Worker pool sizing.
#[derive(Debug, Clone, Copy, Default)]
pub struct DispatchParams {
    /// Worker thread count; 0 means one per available hardware thread
    pub threads: usize,
}

/// One gap that could not be aligned.
#[derive(Debug, Clone)]
pub struct GapFailure {
    pub ordinal: usize,
    pub error: AlignError,
}

/// Per-ordinal results of one dispatch run.
///
/// Failed ordinals keep a `None` script; sibling results are never
/// discarded because of them.
#[derive(Debug)]
pub struct AlignmentOutcome {
    scripts: Vec<Option<EditScript>>,
    failures: Vec<GapFailure>,
}

impl AlignmentOutcome {
    pub fn script(&self, ordinal: usize) -> Option<&EditScript> {
        self.scripts.get(ordinal).and_then(|s| s.as_ref())
    }

    pub fn scripts(&self) -> &[Option<EditScript>] {
        &self.scripts
    }

    pub fn failures(&self) -> &[GapFailure] {
        &self.failures
    }

    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Anchor-gap pair aligner.
///
/// Classifies each gap of a [`ChainPartition`] and runs the remainder
/// concurrently through task-private aligner instances created by the
/// factory. Penalties, shortcut thresholds and pool size are fixed at
/// construction.
pub struct PairAligner<F: AlignerFactory> {
    factory: F,
    penalties: Affine2pPenalties,
    shortcuts: ShortcutParams,
    params: DispatchParams,
}

impl<F: AlignerFactory> PairAligner<F> {
    pub fn new(
        factory: F,
        penalties: Affine2pPenalties,
        shortcuts: ShortcutParams,
        params: DispatchParams,
    ) -> Self {
        Self {
            factory,
            penalties,
            shortcuts,
            params,
        }
    }

    pub fn with_defaults(factory: F) -> Self {
        Self::new(
            factory,
            Affine2pPenalties::default(),
            ShortcutParams::default(),
            DispatchParams::default(),
        )
    }

    /// Aligns every gap of the partition against the two full sequences.
    ///
    /// Returns once all submitted tasks have completed. Per-gap failures
    /// (malformed intervals, engine failures) are collected into the
    /// outcome instead of aborting the run.
    pub fn align_gaps(
        &self,
        first: &[u8],
        second: &[u8],
        partition: &ChainPartition,
    ) -> DispatchResult<AlignmentOutcome> {
        let gaps = partition.gaps();
        let slots: Vec<OnceLock<Result<EditScript, AlignError>>> =
            (0..gaps.len()).map(|_| OnceLock::new()).collect();

        // Sequential classification pass: resolve shortcuts in place and
        // collect the ordinals that need the full aligner.
        let mut pending: Vec<usize> = Vec::new();
        for (ordinal, pair) in gaps.iter().enumerate() {
            if let Err(err) = validate_pair(pair, first.len() as SeqPos, second.len() as SeqPos) {
                let stored = slots[ordinal].set(Err(err)).is_ok();
                debug_assert!(stored);
                continue;
            }
            match shortcut_script(pair, &self.shortcuts) {
                Some(script) => {
                    let stored = slots[ordinal].set(Ok(script)).is_ok();
                    debug_assert!(stored);
                }
                None => pending.push(ordinal),
            }
        }

        if !pending.is_empty() {
            let threads = if self.params.threads == 0 {
                std::thread::available_parallelism()
                    .map(|n| n.get())
                    .unwrap_or(1)
            } else {
                self.params.threads
            };
            log::info!(
                "Aligning {} of {} gaps on {} worker threads",
                pending.len(),
                gaps.len(),
                threads
            );

            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(threads)
                .build()
                .map_err(|e| DispatchError::PoolBuild(e.to_string()))?;

            // Join barrier: install returns only after every task finished.
            pool.install(|| {
                pending.par_iter().for_each(|&ordinal| {
                    let result = self.align_one(first, second, &gaps[ordinal]);
                    let claimed = slots[ordinal].set(result).is_ok();
                    debug_assert!(claimed, "gap {} written twice", ordinal);
                });
            });
        }

        let mut scripts = Vec::with_capacity(gaps.len());
        let mut failures = Vec::new();
        for (ordinal, slot) in slots.into_iter().enumerate() {
            match slot.into_inner() {
                Some(Ok(script)) => scripts.push(Some(script)),
                Some(Err(error)) => {
                    log::warn!("Gap {} failed: {}", ordinal, error);
                    failures.push(GapFailure { ordinal, error });
                    scripts.push(None);
                }
                // every ordinal was either resolved in the classification
                // pass or claimed by exactly one task
                None => unreachable!("gap {} has no result", ordinal),
            }
        }

        Ok(AlignmentOutcome { scripts, failures })
    }

    /// One full sub-alignment with a task-private engine instance.
    fn align_one(
        &self,
        first: &[u8],
        second: &[u8],
        pair: &IntervalPair,
    ) -> Result<EditScript, AlignError> {
        let sub_first = pair
            .first
            .slice(first)
            .map_err(|e| AlignError::InvalidInterval(e.to_string()))?;
        let sub_second = pair
            .second
            .slice(second)
            .map_err(|e| AlignError::InvalidInterval(e.to_string()))?;

        let mut aligner = self.factory.create(&self.penalties)?;
        let words = aligner.align(sub_first, sub_second)?;
        if words.is_empty() {
            return Err(AlignError::EmptyResult);
        }
        Ok(from_packed_words(&words))
        // aligner dropped here, never reused across gaps
    }
}

fn validate_pair(
    pair: &IntervalPair,
    extent_first: SeqPos,
    extent_second: SeqPos,
) -> Result<(), AlignError> {
    pair.first
        .validate(extent_first)
        .and_then(|_| pair.second.validate(extent_second))
        .map_err(|e| AlignError::InvalidInterval(e.to_string()))
}
