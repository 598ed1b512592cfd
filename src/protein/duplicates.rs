use super::models::Protein;
use crate::mass::MassTable;
use crate::reporting::{Warning, WarningSink};
use std::collections::{HashMap, HashSet};

/// Outcome of checking one entry against everything seen before it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DuplicateStatus {
    Unique,
    /// Same length and mass as `of`, but a different sequence.
    Candidate { of: String },
    ExactDuplicate { of: String },
}

/// Sequence length plus average molecular weight in units of 1e-4 Da.
type DuplicateKey = (usize, i64);

/// Finds redundant sequences in a stream of entries.
///
/// Length and mass only pick out candidates; a duplicate is confirmed by
/// comparing the full sequences. Sequences are kept for every distinct key,
/// so memory grows with the number of distinct entries seen.
#[derive(Debug)]
pub struct DuplicateFinder {
    masses: MassTable,
    seen: HashMap<DuplicateKey, Vec<(String, String)>>,
    accessions: HashSet<String>,
    candidates: usize,
    exact_duplicates: usize,
    duplicate_accessions: usize,
}

impl Default for DuplicateFinder {
    fn default() -> Self {
        Self {
            masses: MassTable::average(),
            seen: HashMap::new(),
            accessions: HashSet::new(),
            candidates: 0,
            exact_duplicates: 0,
            duplicate_accessions: 0,
        }
    }
}

impl DuplicateFinder {
    pub fn new() -> Self {
        Self::default()
    }

    fn key(&self, sequence: &str) -> DuplicateKey {
        let (weight, _) = self.masses.molecular_weight(sequence);
        (sequence.len(), (weight * 1e4).round() as i64)
    }

    pub fn observe<S: WarningSink>(&mut self, protein: &Protein, mut sink: S) -> DuplicateStatus {
        if !self.accessions.insert(protein.accession.clone()) {
            self.duplicate_accessions += 1;
            sink.on_warning(Warning::DuplicateAccession {
                accession: protein.accession.clone(),
            });
        }

        let key = self.key(&protein.sequence);
        let entries = self.seen.entry(key).or_default();
        let Some((first, _)) = entries.first() else {
            entries.push((protein.accession.clone(), protein.sequence.clone()));
            return DuplicateStatus::Unique;
        };

        self.candidates += 1;
        sink.on_warning(Warning::DuplicateCandidate {
            accession: protein.accession.clone(),
            previous: first.clone(),
        });

        if let Some((previous, _)) = entries.iter().find(|(_, seq)| *seq == protein.sequence) {
            self.exact_duplicates += 1;
            let previous = previous.clone();
            sink.on_warning(Warning::DuplicateSequence {
                accession: protein.accession.clone(),
                previous: previous.clone(),
            });
            return DuplicateStatus::ExactDuplicate { of: previous };
        }

        let of = first.clone();
        entries.push((protein.accession.clone(), protein.sequence.clone()));
        DuplicateStatus::Candidate { of }
    }

    /// Entries whose length and mass matched an earlier one.
    pub fn candidates(&self) -> usize {
        self.candidates
    }

    pub fn exact_duplicates(&self) -> usize {
        self.exact_duplicates
    }

    pub fn duplicate_accessions(&self) -> usize {
        self.duplicate_accessions
    }
}
