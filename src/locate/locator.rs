use crate::digest::unique::mask_isobaric;
use crate::models::PeptideMatch;
use crate::protein::models::{PaddedSequence, Protein};
use regex::Regex;
use std::sync::OnceLock;

pub const DEFAULT_PAD_COUNT: usize = 1;

/// Comet style modification markup, including the old `n`/`c` terminal tags.
fn modification_symbols() -> &'static Regex {
    static SYMBOLS: OnceLock<Regex> = OnceLock::new();
    SYMBOLS.get_or_init(|| Regex::new(r"[*#@^~$%!+nc\[\]]").expect("static pattern"))
}

/// Drops the `X.` / `.Y` bounding residues if present.
pub fn strip_bounding_residues(peptide: &str) -> &str {
    peptide.split('.').nth(1).unwrap_or(peptide)
}

/// The bare residue sequence of an annotated peptide.
pub fn base_peptide(peptide: &str) -> String {
    let core = strip_bounding_residues(peptide);
    modification_symbols().replace_all(core, "").into_owned()
}

impl Protein {
    fn padded(&mut self, pad_count: usize) -> &PaddedSequence {
        let fresh = match self.padded.take() {
            Some(cached) if cached.pad_count == pad_count => cached,
            _ => {
                let pad = "-".repeat(pad_count);
                let padded = format!("{}{}{}", pad, self.sequence, pad);
                let masked = mask_isobaric(&padded);
                PaddedSequence {
                    pad_count,
                    padded,
                    masked,
                }
            }
        };
        self.padded.insert(fresh)
    }

    /// Pad count of the cached padded sequence, if one has been built.
    pub fn cached_pad_count(&self) -> Option<usize> {
        self.padded.as_ref().map(|p| p.pad_count)
    }

    /// Every non-overlapping occurrence of `peptide` in the sequence.
    ///
    /// `peptide` may carry bounding residues (`K.PEPTIDE.R`) and modification
    /// symbols; I and L are treated as the same residue. Coordinates are
    /// 1-based and inclusive. The annotated string shows `pad_count` flanking
    /// residues each side (`-` past the termini) around the peptide text as
    /// given.
    pub fn find_peptide(&mut self, peptide: &str, pad_count: usize) -> Vec<PeptideMatch> {
        let core = strip_bounding_residues(peptide);
        let base = base_peptide(peptide);
        if base.is_empty() {
            return Vec::new();
        }
        let masked_peptide = mask_isobaric(&base);
        let cached = self.padded(pad_count);
        let sequence_end = cached.padded.len() - pad_count;

        cached
            .masked
            .match_indices(masked_peptide.as_str())
            .map(|(start, matched)| (start, start + matched.len()))
            // gap symbols in the query can reach into the padding
            .filter(|&(start, end)| start >= pad_count && end <= sequence_end)
            .map(|(start, end)| {
                let pre = cached
                    .padded
                    .get(start.saturating_sub(pad_count)..start)
                    .unwrap_or_default();
                let post = cached
                    .padded
                    .get(end..(end + pad_count).min(cached.padded.len()))
                    .unwrap_or_default();
                PeptideMatch {
                    start: start + 1 - pad_count,
                    end: end - pad_count,
                    annotated: format!("{}.{}.{}", pre, core, post),
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_annotations() {
        assert_eq!(strip_bounding_residues("K.PEPTIDE.R"), "PEPTIDE");
        assert_eq!(strip_bounding_residues("PEPTIDE"), "PEPTIDE");
        assert_eq!(base_peptide("K.PEPT*IDEM#K.A"), "PEPTIDEMK");
        assert_eq!(base_peptide("n[42]PEPTIDEc"), "42PEPTIDE");
        assert_eq!(base_peptide("-.MKPE@.P"), "MKPE");
    }

    #[test]
    fn test_find_peptide() {
        let mut p = Protein::new("P1", "", "MKPEPTIDEKAAPEPTIDER");
        let matches = p.find_peptide("K.PEPTIDE.K", DEFAULT_PAD_COUNT);
        assert_eq!(matches.len(), 2);
        assert_eq!((matches[0].start, matches[0].end), (3, 9));
        assert_eq!(matches[0].annotated, "K.PEPTIDE.K");
        assert_eq!((matches[1].start, matches[1].end), (13, 19));
        assert_eq!(matches[1].annotated, "A.PEPTIDE.R");
    }

    #[test]
    fn test_termini_use_padding() {
        let mut p = Protein::new("P1", "", "MKPEPTIDEK");
        let n_term = p.find_peptide("MKP", 1);
        assert_eq!((n_term[0].start, n_term[0].end), (1, 3));
        assert_eq!(n_term[0].annotated, "-.MKP.E");
        let c_term = p.find_peptide("DEK", 2);
        assert_eq!((c_term[0].start, c_term[0].end), (8, 10));
        assert_eq!(c_term[0].annotated, "TI.DEK.--");
    }

    #[test]
    fn test_modifications_preserved_in_annotation() {
        let mut p = Protein::new("P1", "", "AAMKPEPTIDEKAA");
        let matches = p.find_peptide("A.M*KPEPT#IDEK.A", 1);
        assert_eq!(matches.len(), 1);
        assert_eq!((matches[0].start, matches[0].end), (3, 12));
        assert_eq!(matches[0].annotated, "A.M*KPEPT#IDEK.A");
    }

    #[test]
    fn test_isoleucine_leucine_ambiguity() {
        let mut with_i = Protein::new("P1", "", "GGPEPTIDEKGG");
        let mut with_l = Protein::new("P2", "", "GGPEPTLDEKGG");
        let spans = |ms: Vec<PeptideMatch>| ms.iter().map(|m| (m.start, m.end)).collect::<Vec<_>>();
        let a = spans(with_i.find_peptide("PEPTIDEK", 1));
        let b = spans(with_i.find_peptide("PEPTLDEK", 1));
        let c = spans(with_l.find_peptide("PEPTIDEK", 1));
        let d = spans(with_l.find_peptide("PEPTLDEK", 1));
        assert_eq!(a, vec![(3, 10)]);
        assert_eq!(a, b);
        assert_eq!(a, c);
        assert_eq!(a, d);
    }

    #[test]
    fn test_cache_follows_pad_count() {
        let mut p = Protein::new("P1", "", "MKPEPTIDEK");
        assert_eq!(p.cached_pad_count(), None);
        p.find_peptide("PEP", 1);
        assert_eq!(p.cached_pad_count(), Some(1));
        p.find_peptide("TIDE", 1);
        assert_eq!(p.cached_pad_count(), Some(1));
        let m = p.find_peptide("PEP", 3);
        assert_eq!(p.cached_pad_count(), Some(3));
        assert_eq!(m[0].annotated, "-MK.PEP.TID");
        assert_eq!((m[0].start, m[0].end), (3, 5));
        p.set_sequence("GGG");
        assert_eq!(p.cached_pad_count(), None);
    }

    #[test]
    fn test_no_match() {
        let mut p = Protein::new("P1", "", "MKPEPTIDEK");
        assert!(p.find_peptide("WWW", 1).is_empty());
        assert!(p.find_peptide("K.*#.R", 1).is_empty());
        assert!(Protein::default().find_peptide("PEP", 1).is_empty());
        assert!(p.find_peptide("-", 2).is_empty());
    }
}
