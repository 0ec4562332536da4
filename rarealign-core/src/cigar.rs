//! Binary CIGAR codec for rarealign
//!
//! Edit operations are exchanged with alignment backends as packed 32-bit
//! words: the run length in the upper 28 bits, a 4-bit opcode in the lower
//! 4 bits. The opcode space follows the SAM binary convention.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Errors that can occur while packing edit operations
#[derive(Debug, Error)]
pub enum CigarError {
    #[error("Run length {0} exceeds the 28-bit packing limit")]
    RunLengthOverflow(u64),
}

pub type CigarResult<T> = Result<T, CigarError>;

/// Largest run length representable in a packed word.
pub const MAX_RUN_LEN: u32 = (1 << 28) - 1;

/// A single alignment operation kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CigarOp {
    /// Alignment match, may be a match or a mismatch (M)
    Match,
    /// Insertion relative to the first sequence (I)
    Insertion,
    /// Deletion relative to the first sequence (D)
    Deletion,
    /// Exact sequence match (=)
    SequenceMatch,
    /// Mismatch (X)
    Mismatch,
    /// Opcode outside the recognized set, length still meaningful
    Unknown,
}

impl CigarOp {
    /// The 4-bit opcode used in packed words.
    pub fn code(self) -> u32 {
        match self {
            CigarOp::Match => 0x0,
            CigarOp::Insertion => 0x1,
            CigarOp::Deletion => 0x2,
            CigarOp::SequenceMatch => 0x7,
            CigarOp::Mismatch => 0x8,
            CigarOp::Unknown => 0xF,
        }
    }

    /// Maps a 4-bit opcode back to an operation. Anything outside the
    /// recognized set becomes `Unknown` so that decoding never fails on
    /// opcodes a newer backend might emit.
    pub fn from_code(code: u32) -> Self {
        match code & 0xF {
            0x0 => CigarOp::Match,
            0x1 => CigarOp::Insertion,
            0x2 => CigarOp::Deletion,
            0x7 => CigarOp::SequenceMatch,
            0x8 => CigarOp::Mismatch,
            _ => CigarOp::Unknown,
        }
    }

    /// Text symbol of the operation.
    pub fn symbol(self) -> char {
        match self {
            CigarOp::Match => 'M',
            CigarOp::Insertion => 'I',
            CigarOp::Deletion => 'D',
            CigarOp::SequenceMatch => '=',
            CigarOp::Mismatch => 'X',
            CigarOp::Unknown => '?',
        }
    }

    /// Whether the operation consumes a position on the first sequence.
    pub fn consumes_first(self) -> bool {
        matches!(
            self,
            CigarOp::Match | CigarOp::Deletion | CigarOp::SequenceMatch | CigarOp::Mismatch
        )
    }

    /// Whether the operation consumes a position on the second sequence.
    pub fn consumes_second(self) -> bool {
        matches!(
            self,
            CigarOp::Match | CigarOp::Insertion | CigarOp::SequenceMatch | CigarOp::Mismatch
        )
    }
}

impl TryFrom<char> for CigarOp {
    type Error = char;

    fn try_from(value: char) -> Result<Self, Self::Error> {
        match value {
            'M' => Ok(CigarOp::Match),
            'I' => Ok(CigarOp::Insertion),
            'D' => Ok(CigarOp::Deletion),
            '=' => Ok(CigarOp::SequenceMatch),
            'X' => Ok(CigarOp::Mismatch),
            '?' => Ok(CigarOp::Unknown),
            other => Err(other),
        }
    }
}

/// One run-length encoded edit operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditOp {
    pub op: CigarOp,
    pub len: u32,
}

impl EditOp {
    pub fn new(op: CigarOp, len: u32) -> Self {
        Self { op, len }
    }
}

impl fmt::Display for EditOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.len, self.op.symbol())
    }
}

/// An ordered list of edit operations describing one alignment.
pub type EditScript = Vec<EditOp>;

/// Packs an operation and run length into a 32-bit word.
///
/// Fails if the run length does not fit in 28 bits; truncating a length
/// silently would corrupt the alignment.
pub fn encode(op: CigarOp, len: u32) -> CigarResult<u32> {
    if len > MAX_RUN_LEN {
        return Err(CigarError::RunLengthOverflow(len as u64));
    }
    Ok((len << 4) | op.code())
}

/// Unpacks a 32-bit word into an edit operation.
///
/// Never fails: unrecognized opcodes decode to `CigarOp::Unknown` with the
/// run length preserved, so a whole script survives a single odd word.
pub fn decode(word: u32) -> EditOp {
    EditOp::new(CigarOp::from_code(word & 0xF), word >> 4)
}

/// Appends a run to a script, splitting runs longer than `MAX_RUN_LEN`
/// into several ops so every op stays packable. Zero-length runs are
/// dropped.
pub fn push_run(script: &mut EditScript, op: CigarOp, mut len: u64) {
    while len > MAX_RUN_LEN as u64 {
        script.push(EditOp::new(op, MAX_RUN_LEN));
        len -= MAX_RUN_LEN as u64;
    }
    if len > 0 {
        script.push(EditOp::new(op, len as u32));
    }
}

/// Packs a whole script into its wire form.
pub fn to_packed_words(script: &[EditOp]) -> CigarResult<Vec<u32>> {
    script.iter().map(|e| encode(e.op, e.len)).collect()
}

/// Decodes a packed operation buffer, as produced by an alignment backend,
/// into a script.
pub fn from_packed_words(words: &[u32]) -> EditScript {
    words.iter().map(|&w| decode(w)).collect()
}

/// Renders a script in the conventional compact text form, e.g. `12M3I9M`.
pub fn script_to_string(script: &[EditOp]) -> String {
    script.iter().map(|e| e.to_string()).collect()
}
