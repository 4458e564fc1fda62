//! Output formatting for the three output formats

pub mod colors;
pub mod human;
pub mod json;
pub mod minimal;
