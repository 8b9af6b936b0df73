pub mod analyze;
pub mod config;
pub mod probe;
pub mod status;
