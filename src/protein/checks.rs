use super::duplicates::{DuplicateFinder, DuplicateStatus};
use super::fasta::{FastaReader, FileFastaReader, ReadMode};
use crate::errors::Result;
use crate::reporting::{NullSink, WarningSink};
use log::*;
use std::io::BufRead;
use std::path::Path;
use std::time::Instant;

/// Residues counted separately because search engines handle them poorly.
pub const AMBIGUOUS_RESIDUES: [char; 6] = ['B', 'J', 'O', 'U', 'X', 'Z'];

/// Sanity counters for a whole database.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DatabaseSummary {
    pub proteins: usize,
    /// Multi-header aware: an entry with three merged headers counts three.
    pub header_lines: usize,
    pub residues: usize,
    pub redundant: usize,
    pub no_start_met: usize,
    pub stop_at_end: usize,
    pub with_stop: usize,
    pub with_gaps: usize,
    /// Entries containing each of [`AMBIGUOUS_RESIDUES`], in that order.
    pub ambiguous: [usize; 6],
}

impl DatabaseSummary {
    /// Entries containing `residue` (one of [`AMBIGUOUS_RESIDUES`]).
    pub fn with_residue(&self, residue: char) -> usize {
        AMBIGUOUS_RESIDUES
            .iter()
            .position(|&r| r == residue)
            .map_or(0, |i| self.ambiguous[i])
    }

    pub fn scan<R: BufRead, S: WarningSink>(reader: FastaReader<R, S>) -> Result<Self> {
        let st = Instant::now();
        let mut summary = Self::default();
        let mut duplicates = DuplicateFinder::new();
        for protein in reader {
            let protein = protein?;
            summary.proteins += 1;
            summary.header_lines += protein.header_count();
            summary.residues += protein.len();
            let sequence = &protein.sequence;
            if !protein.starts_with_met() {
                summary.no_start_met += 1;
            }
            if sequence.ends_with('*') {
                summary.stop_at_end += 1;
            }
            if sequence.contains('*') {
                summary.with_stop += 1;
            }
            if sequence.contains('-') {
                summary.with_gaps += 1;
            }
            for (count, residue) in summary.ambiguous.iter_mut().zip(AMBIGUOUS_RESIDUES) {
                if sequence.contains(residue) {
                    *count += 1;
                }
            }
            if let DuplicateStatus::ExactDuplicate { .. } =
                duplicates.observe(&protein, NullSink)
            {
                summary.redundant += 1;
            }
        }
        info!(
            "Checked {} proteins in {:?}",
            summary.proteins,
            st.elapsed()
        );
        Ok(summary)
    }

    /// Scans a plain or gzip file in validating mode.
    pub fn scan_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::scan(FileFastaReader::open(path, ReadMode::Validate)?)
    }
}

impl std::fmt::Display for DatabaseSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "  total number of input sequences was: {}", self.proteins)?;
        if self.header_lines > self.proteins {
            writeln!(f, "  there were {} header lines", self.header_lines)?;
        }
        writeln!(f, "  total number of residues was: {}", self.residues)?;
        writeln!(f, "  number of redundant sequences was: {}", self.redundant)?;
        writeln!(f, "    translations that do not start with Met: {}", self.no_start_met)?;
        writeln!(f, "    translations that ended with a stop codon: {}", self.stop_at_end)?;
        writeln!(f, "    translations that had premature stop codons: {}", self.with_stop)?;
        writeln!(f, "    translations that contained gaps: {}", self.with_gaps)?;
        let labels = [
            "B (ambiguous N/D)",
            "J (ambiguous I/L)",
            "O (pyrrolysine)",
            "U (selenocysteine)",
            "X (unknown amino acid)",
            "Z (ambiguous Q/E)",
        ];
        for (label, count) in labels.iter().zip(self.ambiguous) {
            writeln!(f, "    translations that had {}: {}", label, count)?;
        }
        Ok(())
    }
}
