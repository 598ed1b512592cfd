//! Residue mass tables, molecular weight and composition.

pub mod composition;

pub use composition::Composition;

use crate::protein::models::Protein;
use crate::reporting::{Warning, WarningSink};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

pub const PROTON_MASS: f64 = 1.007825;

const AVERAGE_WATER: f64 = 18.02;
/// Water used for whole-protein average molecular weight.
const AVERAGE_MW_WATER: f64 = 18.01;
const MONO_WATER: f64 = 18.01057;

const AVERAGE_ALKYLATED_CYS: f64 = 160.197;
const MONO_ALKYLATED_CYS: f64 = 160.03065;

#[rustfmt::skip]
const AVERAGE_RESIDUES: [(u8, f64); 28] = [
    (b'X', 0.0000), (b'G', 57.0513), (b'A', 71.0779), (b'S', 87.0773), (b'P', 97.1152),
    (b'V', 99.1311), (b'T', 101.1039), (b'C', 103.1429), (b'L', 113.1576), (b'I', 113.1576),
    (b'J', 113.1576), (b'N', 114.1026), (b'O', 114.1472), (b'B', 114.5950), (b'D', 115.0874),
    (b'Q', 128.1292), (b'K', 128.1723), (b'Z', 128.6216), (b'E', 129.1140), (b'M', 131.1961),
    (b'H', 137.1393), (b'F', 147.1739), (b'R', 156.1857), (b'Y', 163.1733), (b'W', 186.2099),
    (b'U', 150.0379), (b'*', 0.0), (b'-', 0.0),
];

#[rustfmt::skip]
const MONO_RESIDUES: [(u8, f64); 28] = [
    (b'X', 0.000000), (b'G', 57.021464), (b'A', 71.037114), (b'S', 87.032028), (b'P', 97.052764),
    (b'V', 99.068414), (b'T', 101.047679), (b'C', 103.009185), (b'L', 113.084064), (b'I', 113.084064),
    (b'J', 113.084064), (b'N', 114.042927), (b'O', 114.147200), (b'B', 114.595000), (b'D', 115.026943),
    (b'Q', 128.058578), (b'K', 128.094963), (b'Z', 128.621600), (b'E', 129.042593), (b'M', 131.040485),
    (b'H', 137.058912), (b'F', 147.068414), (b'R', 156.101111), (b'Y', 163.063320), (b'W', 186.079313),
    (b'U', 150.953630), (b'*', 0.0), (b'-', 0.0),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MassType {
    #[serde(alias = "ave")]
    Average,
    #[default]
    #[serde(alias = "mono")]
    Monoisotopic,
}

/// Residue symbol to mass lookup plus the water mass that goes with it.
#[derive(Debug, Clone, PartialEq)]
pub struct MassTable {
    masses: [Option<f64>; 128],
    /// Added once per peptide by digestion.
    water: f64,
    /// Added once per protein by [`MassTable::molecular_weight`].
    mw_water: f64,
}

impl MassTable {
    fn from_entries(entries: &[(u8, f64)], water: f64, mw_water: f64) -> Self {
        let mut masses = [None; 128];
        for &(residue, mass) in entries {
            masses[residue as usize] = Some(mass);
        }
        Self {
            masses,
            water,
            mw_water,
        }
    }

    pub fn average() -> Self {
        Self::from_entries(&AVERAGE_RESIDUES, AVERAGE_WATER, AVERAGE_MW_WATER)
    }

    pub fn monoisotopic() -> Self {
        Self::from_entries(&MONO_RESIDUES, MONO_WATER, MONO_WATER)
    }

    pub fn new(mass_type: MassType) -> Self {
        match mass_type {
            MassType::Average => Self::average(),
            MassType::Monoisotopic => Self::monoisotopic(),
        }
    }

    /// The table used for digestion: cysteine carries the alkylation mass.
    pub fn alkylated(mass_type: MassType) -> Self {
        let mut table = Self::new(mass_type);
        let cys = match mass_type {
            MassType::Average => AVERAGE_ALKYLATED_CYS,
            MassType::Monoisotopic => MONO_ALKYLATED_CYS,
        };
        table.masses[b'C' as usize] = Some(cys);
        table
    }

    pub fn water(&self) -> f64 {
        self.water
    }

    pub fn residue_mass(&self, residue: char) -> Option<f64> {
        if residue.is_ascii() {
            self.masses[residue as usize]
        } else {
            None
        }
    }

    /// Sum of residue masses; unknown symbols count as zero.
    pub fn residues_mass(&self, sequence: &str) -> f64 {
        sequence
            .bytes()
            .map(|b| self.masses.get(b as usize).copied().flatten().unwrap_or(0.0))
            .sum()
    }

    /// Water + proton + residues, along with the symbols that had no mass.
    pub fn molecular_weight(&self, sequence: &str) -> (f64, BTreeSet<char>) {
        let mut unknown = BTreeSet::new();
        let mut molwt = self.mw_water + PROTON_MASS;
        for c in sequence.chars() {
            match self.residue_mass(c) {
                Some(mass) => molwt += mass,
                None => {
                    unknown.insert(c);
                }
            }
        }
        (molwt, unknown)
    }
}

impl Protein {
    /// Molecular weight of the sequence. Unknown symbols are skipped and,
    /// when a sink is given, reported.
    pub fn molecular_weight(&self, table: &MassTable, sink: Option<&mut dyn WarningSink>) -> f64 {
        let (molwt, unknown) = table.molecular_weight(&self.sequence);
        if let Some(sink) = sink {
            if !unknown.is_empty() {
                sink.on_warning(Warning::UnknownSymbols {
                    accession: self.accession.clone(),
                    symbols: unknown,
                });
            }
        }
        molwt
    }

    pub fn composition(&self, sink: Option<&mut dyn WarningSink>) -> Composition {
        let composition = Composition::from_sequence(&self.sequence);
        if let Some(sink) = sink {
            if !composition.unknown.is_empty() {
                sink.on_warning(Warning::UnknownSymbols {
                    accession: self.accession.clone(),
                    symbols: composition.unknown.clone(),
                });
            }
        }
        composition
    }
}
