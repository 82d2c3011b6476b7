//! CLI module containing argument parsing and output rendering

pub mod args;
pub mod display;

pub use args::Args;
