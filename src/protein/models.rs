use std::collections::BTreeSet;

/// Residue symbols accepted by a validating read: the 20 standard amino
/// acids, the ambiguity / non-standard codes, stop and gap.
pub const AMINO_ACID_ALPHABET: &str = "ACDEFGHIKLMNPQRSTVWYBJOUXZ*-";

/// Separates the sub-headers of merged (NCBI nr style) entries.
pub const MULTI_HEADER_SEPARATOR: char = '\u{1}';

pub fn is_valid_residue(c: char) -> bool {
    AMINO_ACID_ALPHABET.contains(c)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct PaddedSequence {
    pub(crate) pad_count: usize,
    pub(crate) padded: String,
    pub(crate) masked: String,
}

/// A FASTA protein entry.
///
/// The padded/masked copy used by the peptide locator is cached here and
/// rebuilt only when a different pad count is requested.
#[derive(Debug, Clone, Default)]
pub struct Protein {
    pub accession: String,
    pub description: String,
    pub sequence: String,
    pub(crate) padded: Option<PaddedSequence>,
}

impl PartialEq for Protein {
    fn eq(&self, other: &Self) -> bool {
        self.accession == other.accession
            && self.description == other.description
            && self.sequence == other.sequence
    }
}

impl Eq for Protein {}

impl Protein {
    pub fn new(accession: &str, description: &str, sequence: &str) -> Self {
        Self {
            accession: accession.to_string(),
            description: description.to_string(),
            sequence: sequence.to_string(),
            padded: None,
        }
    }

    pub fn len(&self) -> usize {
        self.sequence.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sequence.is_empty()
    }

    /// Replaces the sequence and drops the locator cache.
    pub fn set_sequence(&mut self, sequence: &str) {
        self.sequence = sequence.to_string();
        self.padded = None;
    }

    /// The header line without the leading `>`.
    pub fn header(&self) -> String {
        if self.description.is_empty() {
            self.accession.clone()
        } else {
            format!("{} {}", self.accession, self.description)
        }
    }

    /// Number of merged headers, 1 for an ordinary entry.
    pub fn header_count(&self) -> usize {
        self.description.matches(MULTI_HEADER_SEPARATOR).count() + 1
    }

    /// `(accession, description)` for each merged header.
    pub fn sub_headers(&self) -> Vec<(&str, &str)> {
        let mut segments = self.description.split(MULTI_HEADER_SEPARATOR);
        let mut out = vec![(
            self.accession.as_str(),
            segments.next().unwrap_or_default(),
        )];
        for segment in segments {
            match segment.split_once(char::is_whitespace) {
                Some((acc, desc)) => out.push((acc, desc)),
                None => out.push((segment, "")),
            }
        }
        out
    }

    pub fn starts_with_met(&self) -> bool {
        self.sequence.starts_with('M')
    }

    /// True when a stop codon appears anywhere but the last position.
    pub fn has_internal_stop(&self) -> bool {
        match self.sequence.find('*') {
            Some(pos) => pos + 1 < self.sequence.len(),
            None => false,
        }
    }

    /// Cuts the sequence at the first stop codon. Returns true if anything
    /// was removed.
    pub fn truncate_at_stop(&mut self) -> bool {
        match self.sequence.find('*') {
            Some(pos) => {
                self.sequence.truncate(pos);
                self.padded = None;
                true
            }
            None => false,
        }
    }
}

/// Accumulates one entry while the reader walks its sequence lines.
#[derive(Debug)]
pub struct ProteinBuilder {
    pub accession: String,
    pub description: String,
    pub sequence: String,
    pub rejected: BTreeSet<char>,
}

impl ProteinBuilder {
    /// Splits a header line (with or without the leading `>`). The accession
    /// is the first whitespace token of the line, so `"> P1 desc"` has an
    /// empty accession and `P1 desc` as its description.
    pub fn from_header(header: &str) -> Self {
        let body = header.strip_prefix('>').unwrap_or(header);
        let first = header.split_whitespace().next().unwrap_or_default();
        let accession = first.strip_prefix('>').unwrap_or(first);
        let accession_end = body.find(accession).unwrap_or(0) + accession.len();
        let mut rest = body[accession_end..].chars();
        rest.next();
        Self {
            accession: accession.to_string(),
            description: rest.as_str().to_string(),
            sequence: String::new(),
            rejected: BTreeSet::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.sequence.is_empty()
    }

    pub fn append_sequence(&mut self, line: &str) {
        self.sequence.push_str(&line.to_uppercase());
    }

    /// Appends only alphabet characters; the rest go to `rejected`.
    pub fn append_checked(&mut self, line: &str) {
        for c in line.chars().flat_map(char::to_uppercase) {
            if is_valid_residue(c) {
                self.sequence.push(c);
            } else {
                self.rejected.insert(c);
            }
        }
    }

    pub fn build(self) -> Protein {
        Protein {
            accession: self.accession,
            description: self.description,
            sequence: self.sequence,
            padded: None,
        }
    }
}
