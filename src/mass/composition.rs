use crate::protein::models::AMINO_ACID_ALPHABET;
use std::collections::{BTreeMap, BTreeSet};

/// Residue counts over the full alphabet (ambiguity codes, stop and gap
/// included). Every alphabet symbol has an entry, zero if absent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Composition {
    pub counts: BTreeMap<char, usize>,
    pub unknown: BTreeSet<char>,
}

impl Composition {
    pub fn from_sequence(sequence: &str) -> Self {
        let mut counts: BTreeMap<char, usize> =
            AMINO_ACID_ALPHABET.chars().map(|c| (c, 0)).collect();
        let mut unknown = BTreeSet::new();
        for c in sequence.chars() {
            match counts.get_mut(&c) {
                Some(count) => *count += 1,
                None => {
                    unknown.insert(c);
                }
            }
        }
        Self { counts, unknown }
    }

    pub fn count(&self, residue: char) -> usize {
        self.counts.get(&residue).copied().unwrap_or(0)
    }

    pub fn total(&self) -> usize {
        self.counts.values().sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_composition() {
        let comp = Composition::from_sequence("MKKPEB*x");
        assert_eq!(comp.count('K'), 2);
        assert_eq!(comp.count('B'), 1);
        assert_eq!(comp.count('*'), 1);
        assert_eq!(comp.count('W'), 0);
        assert_eq!(comp.total(), 7);
        assert_eq!(comp.unknown.iter().collect::<String>(), "x");
        assert_eq!(comp.counts.len(), 28);
    }

    #[test]
    fn test_empty_composition() {
        let comp = Composition::from_sequence("");
        assert_eq!(comp.total(), 0);
        assert!(comp.counts.values().all(|&v| v == 0));
        assert!(comp.unknown.is_empty());
    }
}
