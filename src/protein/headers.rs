use super::models::{Protein, MULTI_HEADER_SEPARATOR};
use log::*;

/// Accession grammars with a known clean-up rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderStyle {
    /// `gi|N|ref|X|...` entries from NCBI nr.
    Ncbi { ref_seq_only: bool },
    /// `sp|ACC|ID` / `tr|ACC|ID` entries.
    UniProt { keep_identifier: bool },
    /// `CONT_xxx|...` contaminant entries.
    Contaminant,
}

/// First entry of a multi-header description.
fn first_description(description: &str) -> &str {
    description
        .split(MULTI_HEADER_SEPARATOR)
        .next()
        .unwrap_or_default()
}

impl HeaderStyle {
    pub fn detect(accession: &str) -> Option<Self> {
        Self::detect_with(accession, false, false)
    }

    pub fn detect_with(accession: &str, ref_seq_only: bool, keep_identifier: bool) -> Option<Self> {
        if accession.starts_with("gi|") {
            Some(HeaderStyle::Ncbi { ref_seq_only })
        } else if accession.starts_with("sp|") || accession.starts_with("tr|") {
            Some(HeaderStyle::UniProt { keep_identifier })
        } else if accession.starts_with("CONT_") {
            Some(HeaderStyle::Contaminant)
        } else {
            None
        }
    }

    /// The cleaned `(accession, description)`, or None when the accession
    /// does not carry the tokens this style needs.
    pub fn clean(&self, accession: &str, description: &str) -> Option<(String, String)> {
        let parts: Vec<&str> = accession.split('|').collect();
        match *self {
            HeaderStyle::Ncbi { ref_seq_only } => {
                let gi = parts.iter().position(|&p| p == "gi");
                let at = if ref_seq_only {
                    parts.iter().position(|&p| p == "ref").or(gi)
                } else {
                    gi
                }?;
                let end = (at + 2).min(parts.len());
                let mut desc = first_description(description).trim_end().to_string();
                if !desc.ends_with('.') {
                    desc.push('.');
                }
                Some((parts[at..end].join("|"), desc))
            }
            HeaderStyle::UniProt { keep_identifier } => {
                if parts.len() < 3 {
                    warn!("{}: fewer than 3 accession elements", accession);
                }
                if parts.len() < 2 {
                    return None;
                }
                let (identifier, number) = (parts[parts.len() - 1], parts[parts.len() - 2]);
                let (kept, other) = if keep_identifier {
                    (identifier, number)
                } else {
                    (number, identifier)
                };
                let desc = first_description(description);
                let desc = desc.split("OS=").next().unwrap_or_default().trim_end();
                let desc = desc.strip_suffix('.').unwrap_or(desc);
                Some((kept.to_string(), format!("{} ({}).", desc, other)))
            }
            HeaderStyle::Contaminant => {
                let (kept, old) = match accession.split_once('|') {
                    Some((kept, old)) => (kept, old),
                    None => (accession, ""),
                };
                let desc = first_description(description).trim();
                let desc = desc.strip_suffix('.').unwrap_or(desc);
                let desc = if old.is_empty() {
                    format!("{}.", desc)
                } else {
                    format!("{} ({}).", desc, old)
                };
                Some((kept.to_string(), desc))
            }
        }
    }

    /// Rewrites the header of `protein` in place. Returns false and leaves
    /// the record alone when the style does not apply.
    pub fn apply(&self, protein: &mut Protein) -> bool {
        match self.clean(&protein.accession, &protein.description) {
            Some((accession, description)) => {
                protein.accession = accession;
                protein.description = description;
                true
            }
            None => false,
        }
    }
}

/// Detects the grammar of `protein.accession` and cleans the header if one
/// matched.
pub fn clean_header(protein: &mut Protein, ref_seq_only: bool, keep_identifier: bool) -> bool {
    HeaderStyle::detect_with(&protein.accession, ref_seq_only, keep_identifier)
        .map_or(false, |style| style.apply(protein))
}
