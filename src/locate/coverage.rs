use super::locator::DEFAULT_PAD_COUNT;
use crate::protein::models::Protein;
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResidueCoverage {
    /// 1-based.
    pub position: usize,
    pub residue: char,
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Coverage {
    /// Covered positions over sequence length, as a percentage.
    pub percent: f64,
    pub residues: Vec<ResidueCoverage>,
}

impl Coverage {
    pub fn covered_positions(&self) -> usize {
        self.residues.iter().filter(|r| r.count > 0).count()
    }
}

impl Protein {
    /// Sequence coverage from a list of peptides, each with an optional
    /// spectral count (1 when absent). Every residue spanned by a match
    /// accumulates the count of the peptide.
    pub fn coverage<'a, I>(&mut self, peptides: I) -> Coverage
    where
        I: IntoIterator<Item = (&'a str, Option<u64>)>,
    {
        let mut counts: BTreeMap<usize, u64> = BTreeMap::new();
        for (peptide, count) in peptides {
            let count = count.unwrap_or(1);
            for found in self.find_peptide(peptide, DEFAULT_PAD_COUNT) {
                for position in found.start..=found.end {
                    *counts.entry(position).or_insert(0) += count;
                }
            }
        }

        let percent = if self.sequence.is_empty() {
            0.0
        } else {
            100.0 * counts.len() as f64 / self.sequence.chars().count() as f64
        };
        let residues = self
            .sequence
            .chars()
            .enumerate()
            .map(|(i, residue)| ResidueCoverage {
                position: i + 1,
                residue,
                count: counts.get(&(i + 1)).copied().unwrap_or(0),
            })
            .collect();
        Coverage { percent, residues }
    }
}
