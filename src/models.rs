use serde::Serialize;
use std::fmt::Display;

/// A peptide produced by digestion.
///
/// `start` and `end` are 1-based and inclusive, numbered on the undigested
/// protein.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Peptide {
    pub sequence: String,
    pub start: usize,
    pub end: usize,
    pub mass: f64,
    pub missed_cleavages: usize,
}

impl Peptide {
    pub fn len(&self) -> usize {
        self.sequence.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sequence.is_empty()
    }
}

impl Display for Peptide {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} ({}-{}, {:.4}, missed={})",
            self.sequence, self.start, self.end, self.mass, self.missed_cleavages
        )
    }
}

/// One occurrence of a peptide inside a protein sequence.
///
/// `annotated` carries the flanking residues and the peptide as it was
/// queried, modifications included, e.g. `K.PEPT*IDE.R`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PeptideMatch {
    pub start: usize,
    pub end: usize,
    pub annotated: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pep(sequence: &str, start: usize) -> Peptide {
        Peptide {
            sequence: sequence.to_string(),
            start,
            end: start + sequence.len() - 1,
            mass: 0.0,
            missed_cleavages: 0,
        }
    }

    #[test]
    fn test_peptide_display() {
        let p = pep("AAK", 3);
        assert_eq!(p.len(), 3);
        assert_eq!(p.to_string(), "AAK (3-5, 0.0000, missed=0)");
    }
}
