//! FASTA protein database toolkit: streaming reader and writer, mass and
//! composition, enzymatic digestion, peptide location and coverage, and
//! target/decoy database construction.

pub mod config;
pub mod decoy;
pub mod digest;
pub mod errors;
pub mod locate;
pub mod mass;
pub mod models;
pub mod protein;
pub mod reporting;

pub use config::EngineConfig;
pub use errors::{FastaLibError, Result};
pub use protein::fasta::{FastaReader, FileFastaReader, ReadMode};
pub use protein::models::Protein;
