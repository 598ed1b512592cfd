use crate::protein::models::Protein;

/// Description given to every reversed entry.
pub const DECOY_DESCRIPTION: &str = "REVERSED.";
pub const DEFAULT_DECOY_PREFIX: &str = "REV_";

/// An accession layout whose stable identifier is kept for the decoy.
pub struct AccessionGrammar {
    pub name: &'static str,
    pub matches: fn(&str) -> bool,
    pub stable_id: fn(&str) -> &str,
}

fn pipe_token(accession: &str, index: usize) -> &str {
    accession.split('|').nth(index).unwrap_or_default()
}

fn is_ncbi(accession: &str) -> bool {
    accession.starts_with("gi|")
}

fn is_uniprot(accession: &str) -> bool {
    accession.starts_with("sp|") || accession.starts_with("tr|")
}

fn is_contaminant(accession: &str) -> bool {
    accession.starts_with("CONT_")
}

fn second_token(accession: &str) -> &str {
    pipe_token(accession, 1)
}

fn first_token(accession: &str) -> &str {
    pipe_token(accession, 0)
}

/// Checked in order, first match wins. Anything else keeps the whole
/// accession.
pub static ACCESSION_GRAMMARS: [AccessionGrammar; 3] = [
    // gi|number|db|id|...: the gi number
    AccessionGrammar {
        name: "ncbi",
        matches: is_ncbi,
        stable_id: second_token,
    },
    // sp|ACC|ID: the accession number
    AccessionGrammar {
        name: "uniprot",
        matches: is_uniprot,
        stable_id: second_token,
    },
    AccessionGrammar {
        name: "contaminant",
        matches: is_contaminant,
        stable_id: first_token,
    },
];

/// Makes sure the prefix ends with an underscore.
pub fn normalize_decoy_prefix(prefix: &str) -> String {
    if prefix.ends_with('_') {
        prefix.to_string()
    } else {
        format!("{}_", prefix)
    }
}

pub fn grammar_for(accession: &str) -> Option<&'static AccessionGrammar> {
    ACCESSION_GRAMMARS.iter().find(|g| (g.matches)(accession))
}

/// Decoy accession for `accession`: the prefix plus the stable identifier
/// of a known grammar, or plus the whole accession otherwise.
pub fn decoy_accession(accession: &str, prefix: &str) -> String {
    let prefix = normalize_decoy_prefix(prefix);
    let stable = grammar_for(accession).map_or(accession, |g| (g.stable_id)(accession));
    format!("{}{}", prefix, stable)
}

impl Protein {
    /// Reversed copy of this entry for target/decoy searches.
    pub fn reverse(&self, prefix: &str) -> Protein {
        Protein::new(
            &decoy_accession(&self.accession, prefix),
            DECOY_DESCRIPTION,
            &self.sequence.chars().rev().collect::<String>(),
        )
    }
}
