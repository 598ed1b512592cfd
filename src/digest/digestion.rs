use crate::errors::FastaLibError;
use crate::mass::{MassTable, MassType};
use crate::models::Peptide;
use crate::protein::models::Protein;
use crate::reporting::{Warning, WarningSink};
use log::*;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::ops::Range;
use std::str::FromStr;
use std::time::Instant;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DigestionEnd {
    /// Cut after the site residue.
    CTerm,
    /// Cut before the site residue.
    NTerm,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CleavageSites {
    /// Every residue is a site ("no enzyme").
    Every,
    Residues(&'static str),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CleavageRule {
    pub sites: CleavageSites,
    pub digestion_end: DigestionEnd,
    /// A site followed by this residue is not cut (proline for most
    /// C-terminal enzymes).
    pub skip_suffix: Option<u8>,
}

impl CleavageRule {
    fn is_site(&self, residue: u8) -> bool {
        match self.sites {
            CleavageSites::Every => true,
            CleavageSites::Residues(residues) => residues.as_bytes().contains(&residue),
        }
    }

    /// Splits `sequence` into the zero-missed-cleavage fragments, as byte
    /// ranges covering the whole sequence in order.
    pub fn cleavage_sites(&self, sequence: &str) -> Vec<Range<usize>> {
        let bytes = sequence.as_bytes();
        let mut sites = Vec::new();
        let mut left = 0;
        for (i, &residue) in bytes.iter().enumerate() {
            if !self.is_site(residue) {
                continue;
            }
            let right = match self.digestion_end {
                DigestionEnd::CTerm => i + 1,
                DigestionEnd::NTerm => i,
            };
            if right <= left || right >= bytes.len() || !sequence.is_char_boundary(right) {
                continue;
            }
            if let Some(skip) = self.skip_suffix {
                if bytes[right] == skip {
                    continue;
                }
            }
            sites.push(left..right);
            left = right;
        }
        if left < bytes.len() {
            sites.push(left..bytes.len());
        }
        sites
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Enzyme {
    NoEnzyme,
    #[default]
    Trypsin,
    /// Trypsin that also cuts before proline.
    TrypsinP,
    LysC,
    LysCP,
    LysN,
    ArgC,
    AspN,
    CnBr,
    GluC,
    PepsinA,
    Chymotrypsin,
}

impl Enzyme {
    pub const ALL: [Enzyme; 12] = [
        Enzyme::NoEnzyme,
        Enzyme::Trypsin,
        Enzyme::TrypsinP,
        Enzyme::LysC,
        Enzyme::LysCP,
        Enzyme::LysN,
        Enzyme::ArgC,
        Enzyme::AspN,
        Enzyme::CnBr,
        Enzyme::GluC,
        Enzyme::PepsinA,
        Enzyme::Chymotrypsin,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Enzyme::NoEnzyme => "No_enzyme",
            Enzyme::Trypsin => "trypsin",
            Enzyme::TrypsinP => "trypsin-P",
            Enzyme::LysC => "Lys-C",
            Enzyme::LysCP => "Lys-C-P",
            Enzyme::LysN => "Lys-N",
            Enzyme::ArgC => "Arg-C",
            Enzyme::AspN => "Asp-N",
            Enzyme::CnBr => "CNBr",
            Enzyme::GluC => "Glu-C",
            Enzyme::PepsinA => "PepsinA",
            Enzyme::Chymotrypsin => "chymotrypsin",
        }
    }

    /// Case-insensitive lookup by name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|enzyme| enzyme.name().eq_ignore_ascii_case(name.trim()))
    }

    /// Like [`Enzyme::from_name`] but reports an unrecognized name to `sink`.
    pub fn from_name_or_warn<S: WarningSink>(name: &str, mut sink: S) -> Option<Self> {
        let enzyme = Self::from_name(name);
        if enzyme.is_none() {
            sink.on_warning(Warning::UnknownEnzyme {
                name: name.to_string(),
            });
        }
        enzyme
    }

    pub fn rule(&self) -> CleavageRule {
        use CleavageSites::*;
        use DigestionEnd::*;
        let (sites, digestion_end, skip_suffix) = match self {
            Enzyme::NoEnzyme => (Every, CTerm, None),
            Enzyme::Trypsin => (Residues("KR"), CTerm, Some(b'P')),
            Enzyme::TrypsinP => (Residues("KR"), CTerm, None),
            Enzyme::LysC => (Residues("K"), CTerm, Some(b'P')),
            Enzyme::LysCP => (Residues("K"), CTerm, None),
            Enzyme::LysN => (Residues("K"), NTerm, None),
            Enzyme::ArgC => (Residues("R"), CTerm, Some(b'P')),
            Enzyme::AspN => (Residues("D"), NTerm, None),
            Enzyme::CnBr => (Residues("M"), CTerm, None),
            Enzyme::GluC => (Residues("DE"), CTerm, Some(b'P')),
            Enzyme::PepsinA => (Residues("FL"), CTerm, Some(b'P')),
            Enzyme::Chymotrypsin => (Residues("FWYL"), CTerm, Some(b'P')),
        };
        CleavageRule {
            sites,
            digestion_end,
            skip_suffix,
        }
    }
}

impl FromStr for Enzyme {
    type Err = FastaLibError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s).ok_or_else(|| FastaLibError::UnknownEnzyme(s.to_string()))
    }
}

impl TryFrom<String> for Enzyme {
    type Error = FastaLibError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Enzyme> for String {
    fn from(x: Enzyme) -> Self {
        x.name().to_string()
    }
}

impl std::fmt::Display for Enzyme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DigestionParameters {
    pub enzyme: Enzyme,
    pub low_mass: f64,
    pub high_mass: f64,
    pub min_length: usize,
    pub max_missed_cleavages: usize,
    pub mass_type: MassType,
}

impl Default for DigestionParameters {
    fn default() -> Self {
        Self {
            enzyme: Enzyme::Trypsin,
            low_mass: 500.0,
            high_mass: 5000.0,
            min_length: 7,
            max_missed_cleavages: 2,
            mass_type: MassType::Monoisotopic,
        }
    }
}

impl DigestionParameters {
    /// `None` falls back to strict trypsin.
    pub fn with_enzyme(mut self, enzyme: Option<Enzyme>) -> Self {
        self.enzyme = enzyme.unwrap_or_default();
        self
    }

    pub fn digester(&self) -> Digester {
        Digester::new(self.clone())
    }

    pub fn digest(&self, sequence: &str) -> Vec<Peptide> {
        self.digester().digest(sequence)
    }
}

/// Digestion parameters with the cleavage rule and alkylated-cysteine mass
/// table resolved once, for reuse across many proteins.
#[derive(Debug, Clone)]
pub struct Digester {
    params: DigestionParameters,
    rule: CleavageRule,
    masses: MassTable,
}

impl Digester {
    pub fn new(params: DigestionParameters) -> Self {
        let rule = params.enzyme.rule();
        let masses = MassTable::alkylated(params.mass_type);
        Self {
            params,
            rule,
            masses,
        }
    }

    /// Builds a digester for an enzyme given by name. An unknown name is
    /// reported to `sink` and yields None, so the caller can skip digestion.
    pub fn from_enzyme_name<S: WarningSink>(
        name: &str,
        params: DigestionParameters,
        sink: S,
    ) -> Option<Self> {
        let enzyme = Enzyme::from_name_or_warn(name, sink)?;
        Some(Self::new(DigestionParameters { enzyme, ..params }))
    }

    pub fn params(&self) -> &DigestionParameters {
        &self.params
    }

    pub fn masses(&self) -> &MassTable {
        &self.masses
    }

    fn passes(&self, peptide: &Peptide) -> bool {
        self.params.low_mass <= peptide.mass
            && peptide.mass <= self.params.high_mass
            && peptide.len() >= self.params.min_length
    }

    /// Zero-missed-cleavage fragments, unfiltered.
    pub fn fragments(&self, sequence: &str) -> Vec<Peptide> {
        let water = self.masses.water();
        self.rule
            .cleavage_sites(sequence)
            .into_iter()
            .map(|range| {
                let fragment = &sequence[range.clone()];
                Peptide {
                    sequence: fragment.to_string(),
                    start: range.start + 1,
                    end: range.end,
                    mass: water + self.masses.residues_mass(fragment),
                    missed_cleavages: 0,
                }
            })
            .collect()
    }

    /// All peptides passing the mass and length filters, in fragment order
    /// and, for each starting fragment, by increasing missed cleavages.
    pub fn digest(&self, sequence: &str) -> Vec<Peptide> {
        if sequence.is_empty() {
            return Vec::new();
        }
        let water = self.masses.water();
        let fragments = self.fragments(sequence);
        let mut out = Vec::new();
        for i in 0..fragments.len() {
            if self.passes(&fragments[i]) {
                out.push(fragments[i].clone());
            }
            for j in 1..=self.params.max_missed_cleavages {
                if i + j >= fragments.len() {
                    break;
                }
                let parts = &fragments[i..=i + j];
                let mut combined = Peptide {
                    sequence: String::new(),
                    start: usize::MAX,
                    end: 0,
                    mass: water,
                    missed_cleavages: j,
                };
                for part in parts {
                    combined.sequence.push_str(&part.sequence);
                    combined.start = combined.start.min(part.start);
                    combined.end = combined.end.max(part.end);
                    combined.mass += part.mass - water;
                }
                if self.passes(&combined) {
                    out.push(combined);
                }
            }
        }
        out
    }

    pub fn digest_protein(&self, protein: &Protein) -> Vec<Peptide> {
        self.digest(&protein.sequence)
    }

    /// Digests many proteins in parallel; output order follows the input.
    pub fn digest_multiple(&self, proteins: &[Protein]) -> Vec<Vec<Peptide>> {
        let st = Instant::now();
        let out: Vec<Vec<Peptide>> = proteins
            .par_iter()
            .map(|protein| self.digest_protein(protein))
            .collect();
        debug!(
            "Digested {} proteins with {} in {:?}",
            proteins.len(),
            self.params.enzyme,
            st.elapsed()
        );
        out
    }
}
