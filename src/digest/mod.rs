pub mod digestion;
pub mod report;
pub mod unique;
