pub mod checks;
pub mod duplicates;
pub mod fasta;
pub mod headers;
pub mod models;
pub mod writer;
