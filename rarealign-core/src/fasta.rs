//! Sequence pair loading
//!
//! Reads the two input sequences of an alignment run from a FASTA/FASTQ
//! file using needletail. Bases are uppercased and ambiguous `N` bases are
//! replaced with random nucleotides so the exact-match anchor search and
//! the aligners only ever see A/C/G/T.

use anyhow::Result;
use needletail::parse_fastx_file;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FastaError {
    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Expected exactly 2 sequences, found {0}")]
    WrongSequenceCount(usize),
}

/// One loaded input sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SequenceRecord {
    pub name: String,
    pub seq: Vec<u8>,
}

impl SequenceRecord {
    pub fn len(&self) -> usize {
        self.seq.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seq.is_empty()
    }
}

/// Loads a sequence pair from a FASTA/FASTQ file.
///
/// The file must contain exactly two records; anything else is a usage
/// error, not something to guess around.
pub fn read_sequence_pair<P: AsRef<Path>>(path: P) -> Result<[SequenceRecord; 2]> {
    let mut reader = parse_fastx_file(&path).map_err(|e| FastaError::Parse(e.to_string()))?;

    let mut records = Vec::with_capacity(2);
    let mut count = 0usize;
    let mut rng = StdRng::from_entropy();
    while let Some(record) = reader.next() {
        let record = record.map_err(|e| FastaError::Parse(e.to_string()))?;
        count += 1;
        if count > 2 {
            // the file is already malformed, keep counting for the error
            // message but skip the per-base normalization work
            continue;
        }
        let name = String::from_utf8_lossy(record.id()).into_owned();
        let mut seq = record.seq().into_owned();
        normalize_bases(&mut seq, &mut rng);
        records.push(SequenceRecord { name, seq });
    }

    if count != 2 {
        return Err(FastaError::WrongSequenceCount(count).into());
    }

    log::info!(
        "Loaded sequence pair: {} ({} bp), {} ({} bp)",
        records[0].name,
        records[0].len(),
        records[1].name,
        records[1].len()
    );

    let second = records.pop().expect("two records");
    let first = records.pop().expect("two records");
    Ok([first, second])
}

/// Uppercases all bases and substitutes `N` with a random nucleotide.
fn normalize_bases<R: Rng>(seq: &mut [u8], rng: &mut R) {
    const BASES: [u8; 4] = *b"ACGT";
    for base in seq.iter_mut() {
        *base = base.to_ascii_uppercase();
        if *base == b'N' {
            *base = BASES[rng.gen_range(0..4)];
        }
    }
}
