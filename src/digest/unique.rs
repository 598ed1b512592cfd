use crate::models::Peptide;
use log::*;
use std::collections::HashMap;
use std::time::Instant;

/// Folds I and L together: the two are isobaric, so a mass spectrometer
/// cannot tell peptides apart that differ only there.
pub fn mask_isobaric(sequence: &str) -> String {
    sequence.replace(['I', 'L'], "j")
}

/// Which proteins each (I/L masked) peptide sequence comes from.
#[derive(Debug, Default)]
pub struct PeptideIndex {
    index: HashMap<String, Vec<String>>,
}

impl PeptideIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, accession: &str, peptides: &[Peptide]) {
        for peptide in peptides {
            self.index
                .entry(mask_isobaric(&peptide.sequence))
                .or_default()
                .push(accession.to_string());
        }
    }

    pub fn from_digests<'a, I>(digests: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a [Peptide])>,
    {
        let st = Instant::now();
        let mut index = Self::new();
        for (accession, peptides) in digests {
            index.add(accession, peptides);
        }
        info!(
            "Indexed {} distinct peptides in {:?}",
            index.len(),
            st.elapsed()
        );
        index
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Accessions (with repeats) that produced `sequence`.
    pub fn accessions(&self, sequence: &str) -> Option<&[String]> {
        self.index
            .get(&mask_isobaric(sequence))
            .map(|v| v.as_slice())
    }

    /// Copy number of the sequence across the whole digest.
    pub fn copies(&self, sequence: &str) -> usize {
        self.accessions(sequence).map_or(0, |v| v.len())
    }

    pub fn is_unique(&self, sequence: &str) -> bool {
        self.copies(sequence) == 1
    }

    /// The accession list with one occurrence of `accession` removed.
    /// Empty for a unique peptide.
    pub fn other_proteins(&self, sequence: &str, accession: &str) -> Vec<&str> {
        let Some(accessions) = self.accessions(sequence) else {
            return Vec::new();
        };
        if accessions.len() == 1 {
            return Vec::new();
        }
        let mut others: Vec<&str> = accessions.iter().map(|s| s.as_str()).collect();
        if let Some(pos) = others.iter().position(|&a| a == accession) {
            others.remove(pos);
        }
        others
    }

    pub fn summary(&self) -> DigestSummary {
        DigestSummary::from_copy_numbers(
            self.index
                .iter()
                .map(|(seq, accessions)| (seq.as_str(), accessions.len())),
        )
    }
}

/// Shared vs unique statistics over a whole database digest.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DigestSummary {
    /// Redundant counts: every peptide occurrence.
    pub total_peptides: usize,
    pub total_shared: usize,
    pub total_unique: usize,
    /// Non-redundant counts: distinct (masked) sequences.
    pub distinct_peptides: usize,
    pub distinct_shared: usize,
    pub distinct_unique: usize,
    /// Copy number statistics over the shared peptides.
    pub max_copy: Option<(String, usize)>,
    pub min_copy: Option<usize>,
    pub median_copy: Option<f64>,
    pub mean_copy: Option<f64>,
    pub upper_quartile: Option<usize>,
    pub lower_quartile: Option<usize>,
}

impl DigestSummary {
    pub fn from_copy_numbers<'a, I>(copies: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, usize)>,
    {
        let mut summary = DigestSummary::default();
        let mut shared: Vec<usize> = Vec::new();
        for (sequence, count) in copies {
            summary.total_peptides += count;
            summary.distinct_peptides += 1;
            if count == 1 {
                summary.total_unique += 1;
                summary.distinct_unique += 1;
            } else {
                summary.total_shared += count;
                summary.distinct_shared += 1;
                shared.push(count);
            }
            let is_max = match &summary.max_copy {
                Some((best_seq, best)) => {
                    count > *best || (count == *best && sequence < best_seq.as_str())
                }
                None => true,
            };
            if is_max {
                summary.max_copy = Some((sequence.to_string(), count));
            }
        }

        if !shared.is_empty() {
            shared.sort_unstable();
            let n = shared.len();
            summary.min_copy = Some(shared[0]);
            summary.median_copy = Some(if n % 2 == 1 {
                shared[n / 2] as f64
            } else {
                (shared[n / 2 - 1] + shared[n / 2]) as f64 / 2.0
            });
            summary.mean_copy = Some(shared.iter().sum::<usize>() as f64 / n as f64);
            let upper = ((n - 1) as f64 * 0.75).ceil() as usize;
            let lower = ((n - 1) as f64 * 0.25).floor() as usize;
            summary.upper_quartile = Some(shared[upper]);
            summary.lower_quartile = Some(shared[lower]);
        }
        summary
    }

    pub fn fraction_unique(&self) -> f64 {
        percent(self.total_unique, self.total_peptides)
    }

    pub fn fraction_shared(&self) -> f64 {
        percent(self.total_shared, self.total_peptides)
    }

    pub fn fraction_distinct_unique(&self) -> f64 {
        percent(self.distinct_unique, self.distinct_peptides)
    }

    pub fn fraction_distinct_shared(&self) -> f64 {
        percent(self.distinct_shared, self.distinct_peptides)
    }
}

fn percent(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        100.0 * part as f64 / whole as f64
    }
}

impl std::fmt::Display for DigestSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Redundant counts:")?;
        writeln!(f, "   total all peptides: {}", self.total_peptides)?;
        writeln!(f, "   total shared peptides: {}", self.total_shared)?;
        writeln!(f, "   total unique peptides: {}", self.total_unique)?;
        writeln!(f, "   fraction unique: {:.2}", self.fraction_unique())?;
        writeln!(f, "   fraction shared: {:.2}", self.fraction_shared())?;
        writeln!(f, "Non-redundant counts:")?;
        writeln!(f, "   total all non-redundant peptides: {}", self.distinct_peptides)?;
        writeln!(f, "   total shared peptides: {}", self.distinct_shared)?;
        writeln!(f, "   total unique peptides: {}", self.distinct_unique)?;
        writeln!(f, "   fraction unique: {:.2}", self.fraction_distinct_unique())?;
        writeln!(f, "   fraction shared: {:.2}", self.fraction_distinct_shared())?;
        if let (Some((seq, max)), Some(min), Some(median), Some(mean)) = (
            &self.max_copy,
            self.min_copy,
            self.median_copy,
            self.mean_copy,
        ) {
            writeln!(f, "Some shared peptide data:")?;
            writeln!(f, "   max copy number: {} ({})", max, seq)?;
            writeln!(f, "   min copy number: {}", min)?;
            writeln!(f, "   median copy number: {}", median)?;
            writeln!(f, "   average copy number: {:.2}", mean)?;
            if let (Some(upper), Some(lower)) = (self.upper_quartile, self.lower_quartile) {
                writeln!(f, "   upper quartile number: {}", upper)?;
                writeln!(f, "   lower quartile number: {}", lower)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn peps(seqs: &[&str]) -> Vec<Peptide> {
        seqs.iter()
            .map(|s| Peptide {
                sequence: s.to_string(),
                start: 1,
                end: s.len(),
                mass: 0.0,
                missed_cleavages: 0,
            })
            .collect()
    }

    fn index() -> PeptideIndex {
        let a = peps(&["PEPTIDEK", "AAAK", "GGGR"]);
        let b = peps(&["PEPTLDEK", "CCCK"]);
        let c = peps(&["PEPTIDEK", "AAAK"]);
        PeptideIndex::from_digests([
            ("A", a.as_slice()),
            ("B", b.as_slice()),
            ("C", c.as_slice()),
        ])
    }

    #[test]
    fn test_isobaric_masking() {
        assert_eq!(mask_isobaric("PEPTIDELK"), "PEPTjDEjK");
        let idx = index();
        assert_eq!(idx.copies("PEPTIDEK"), 3);
        assert_eq!(idx.copies("PEPTLDEK"), 3);
        assert!(idx.is_unique("CCCK"));
        assert!(!idx.is_unique("AAAK"));
        assert_eq!(idx.copies("WWWK"), 0);
        assert_eq!(idx.len(), 4);
    }

    #[test]
    fn test_other_proteins() {
        let idx = index();
        assert_eq!(idx.other_proteins("PEPTIDEK", "B"), vec!["A", "C"]);
        assert_eq!(idx.other_proteins("AAAK", "A"), vec!["C"]);
        assert!(idx.other_proteins("GGGR", "A").is_empty());
    }

    #[test]
    fn test_summary() {
        let summary = index().summary();
        assert_eq!(summary.total_peptides, 7);
        assert_eq!(summary.total_unique, 2);
        assert_eq!(summary.total_shared, 5);
        assert_eq!(summary.distinct_peptides, 4);
        assert_eq!(summary.distinct_shared, 2);
        assert_eq!(summary.distinct_unique, 2);
        assert_eq!(summary.max_copy, Some(("PEPTjDEK".to_string(), 3)));
        assert_eq!(summary.min_copy, Some(2));
        assert_eq!(summary.median_copy, Some(2.5));
        assert_eq!(summary.upper_quartile, Some(3));
        assert_eq!(summary.lower_quartile, Some(2));
        assert!((summary.fraction_unique() - 100.0 * 2.0 / 7.0).abs() < 1e-9);
        assert!(summary.to_string().contains("max copy number: 3 (PEPTjDEK)"));
    }

    #[test]
    fn test_empty_summary() {
        let summary = PeptideIndex::new().summary();
        assert_eq!(summary.total_peptides, 0);
        assert_eq!(summary.fraction_unique(), 0.0);
        assert!(summary.min_copy.is_none());
    }
}
