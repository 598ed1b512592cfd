pub mod coverage;
pub mod locator;
