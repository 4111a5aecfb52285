//! Command-line wrapper around the conversion pipeline.

pub mod args;
pub mod output;

pub use args::{Cli, OutputFormat};
pub use output::Output;
