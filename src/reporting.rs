//! Data-quality warnings and the sinks that receive them.
//!
//! None of these conditions stop a scan. The engine hands each one to a
//! [`WarningSink`] and keeps going, so a single malformed entry cannot halt
//! processing of a multi-million record database.

use std::collections::BTreeSet;
use std::fmt::Display;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Warning {
    /// Characters outside the amino acid alphabet were dropped while reading.
    InvalidCharacters {
        accession: String,
        characters: BTreeSet<char>,
    },
    /// Symbols without a residue mass or frequency slot.
    UnknownSymbols {
        accession: String,
        symbols: BTreeSet<char>,
    },
    UnknownEnzyme {
        name: String,
    },
    /// Same length and mass as an earlier entry, but the sequence was not
    /// (yet) shown to be identical.
    DuplicateCandidate {
        accession: String,
        previous: String,
    },
    DuplicateSequence {
        accession: String,
        previous: String,
    },
    DuplicateAccession {
        accession: String,
    },
}

fn joined(chars: &BTreeSet<char>) -> String {
    chars.iter().collect()
}

impl Display for Warning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Warning::InvalidCharacters {
                accession,
                characters,
            } => write!(
                f,
                "unknown symbol(s) ({}) in {}",
                joined(characters),
                accession
            ),
            Warning::UnknownSymbols { accession, symbols } => write!(
                f,
                "unknown symbol(s) ({}) in {} ignored for mass/composition",
                joined(symbols),
                accession
            ),
            Warning::UnknownEnzyme { name } => {
                write!(f, "Enzyme: {} not recognized, digestion skipped", name)
            }
            Warning::DuplicateCandidate {
                accession,
                previous,
            } => write!(f, "{} may be same as {}", accession, previous),
            Warning::DuplicateSequence {
                accession,
                previous,
            } => write!(f, "{} exact match to {}", previous, accession),
            Warning::DuplicateAccession { accession } => {
                write!(f, "duplicate accession {}", accession)
            }
        }
    }
}

pub trait WarningSink {
    fn on_warning(&mut self, warning: Warning);
}

impl<S: WarningSink + ?Sized> WarningSink for &mut S {
    fn on_warning(&mut self, warning: Warning) {
        (**self).on_warning(warning)
    }
}

/// Forwards every warning to `log::warn!`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogSink;

impl WarningSink for LogSink {
    fn on_warning(&mut self, warning: Warning) {
        log::warn!("{}", warning);
    }
}

/// Drops every warning.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl WarningSink for NullSink {
    fn on_warning(&mut self, _warning: Warning) {}
}

/// Keeps warnings around so the caller can inspect or count them later.
#[derive(Debug, Clone, Default)]
pub struct WarningCollector {
    pub warnings: Vec<Warning>,
}

impl WarningCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.warnings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.warnings.is_empty()
    }
}

impl WarningSink for WarningCollector {
    fn on_warning(&mut self, warning: Warning) {
        self.warnings.push(warning);
    }
}
