pub mod database;
pub mod reverse;
