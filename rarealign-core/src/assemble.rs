//! Result reassembly
//!
//! Runs strictly after the dispatcher's join barrier: concatenates the
//! per-gap scripts in ordinal order, interleaving the exact-match runs of
//! the anchors between them, so the final script covers both full
//! sequences. Adjacent runs of the same kind are coalesced.

use crate::cigar::{push_run, script_to_string, CigarOp, EditOp, EditScript};
use crate::dispatch::AlignmentOutcome;
use crate::intervals::ChainPartition;
use std::io::Write;
use thiserror::Error;

/// Errors during final assembly
#[derive(Debug, Error)]
pub enum AssembleError {
    #[error("Cannot assemble, gaps {0:?} failed to align")]
    IncompleteOutcome(Vec<usize>),

    #[error("Outcome holds {got} gap results but the partition has {want}")]
    LengthMismatch { got: usize, want: usize },
}

pub type AssembleResult<T> = Result<T, AssembleError>;

/// Concatenates all gap scripts in ascending ordinal order, with a
/// `SequenceMatch` run for each anchor between consecutive gaps.
///
/// Fails if any ordinal is missing; the outcome itself still holds the
/// partial per-gap results for callers that accept them.
pub fn assemble(
    partition: &ChainPartition,
    outcome: &AlignmentOutcome,
) -> AssembleResult<EditScript> {
    if outcome.scripts().len() != partition.len() {
        return Err(AssembleError::LengthMismatch {
            got: outcome.scripts().len(),
            want: partition.len(),
        });
    }
    if !outcome.is_complete() {
        let failed = outcome.failures().iter().map(|f| f.ordinal).collect();
        return Err(AssembleError::IncompleteOutcome(failed));
    }

    let mut script = EditScript::new();
    for (ordinal, gap_script) in outcome.scripts().iter().enumerate() {
        // is_complete() above guarantees every slot is populated
        for op in gap_script.as_ref().expect("populated slot") {
            append_coalescing(&mut script, *op);
        }
        if let Some(&run) = partition.anchor_runs().get(ordinal) {
            append_coalescing_run(&mut script, CigarOp::SequenceMatch, run);
        }
    }
    log::debug!(
        "Assembled {} gaps and {} anchors into {} operations",
        partition.len(),
        partition.anchor_runs().len(),
        script.len()
    );
    Ok(script)
}

/// Total positions the script consumes on (first, second) sequence.
pub fn script_spans(script: &[EditOp]) -> (u64, u64) {
    let mut first = 0u64;
    let mut second = 0u64;
    for op in script {
        if op.op.consumes_first() {
            first += op.len as u64;
        }
        if op.op.consumes_second() {
            second += op.len as u64;
        }
    }
    (first, second)
}

fn append_coalescing(script: &mut EditScript, op: EditOp) {
    append_coalescing_run(script, op.op, op.len as u64);
}

fn append_coalescing_run(script: &mut EditScript, op: CigarOp, len: u64) {
    if len == 0 {
        return;
    }
    match script.last() {
        Some(last) if last.op == op => {
            let merged = last.len as u64 + len;
            script.pop();
            push_run(script, op, merged);
        }
        _ => push_run(script, op, len),
    }
}

/// Destination for the final alignment, injected by the caller.
pub trait ScriptSink {
    fn write_script(&mut self, script: &[EditOp]) -> anyhow::Result<()>;
}

/// Writes the compact text form (`12M3I9=`) followed by a newline.
pub struct TextScriptWriter<W: Write> {
    inner: W,
}

impl<W: Write> TextScriptWriter<W> {
    pub fn new(inner: W) -> Self {
        Self { inner }
    }

    pub fn into_inner(self) -> W {
        self.inner
    }
}

impl<W: Write> ScriptSink for TextScriptWriter<W> {
    fn write_script(&mut self, script: &[EditOp]) -> anyhow::Result<()> {
        writeln!(self.inner, "{}", script_to_string(script))?;
        Ok(())
    }
}
