//! Report output: console text and Markdown/JSON files.

pub mod console;
pub mod generator;

pub use generator::write_report;
