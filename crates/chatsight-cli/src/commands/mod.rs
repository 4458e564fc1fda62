//! CLI command implementations

pub mod browse;
pub mod code;
pub mod files;
pub mod import;
pub mod parse;
pub mod reprocess;
pub mod status;
pub mod turns;
