//! rarealign core library
//!
//! Anchor-based pairwise genome alignment: a sparse chain of exact
//! rare-match anchors decomposes a global alignment into independent
//! per-gap sub-problems, which are classified, aligned in parallel with a
//! gap-affine-2-piece engine, and reassembled into a single edit script
//! covering both sequences.

pub mod align;
pub mod assemble;
pub mod cigar;
pub mod classify;
pub mod dispatch;
pub mod fasta;
pub mod intervals;

// Re-export commonly used types and functions
pub use align::{Affine2pPenalties, AlignError, AlignerFactory, GapAffineAligner};
pub use assemble::{assemble, script_spans, ScriptSink, TextScriptWriter};
pub use cigar::{decode, encode, CigarOp, EditOp, EditScript, MAX_RUN_LEN};
pub use classify::{classify, Disposition, ShortcutParams};
pub use dispatch::{AlignmentOutcome, DispatchParams, GapFailure, PairAligner};
pub use fasta::{read_sequence_pair, SequenceRecord};
pub use intervals::{partition_by_anchors, Anchor, ChainPartition, Interval, IntervalPair, SeqPos};

/// Version information for the rarealign core library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
