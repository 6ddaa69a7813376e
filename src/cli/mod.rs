//! Command-line interface module.

mod args;
pub mod compile;
pub mod serve;

pub use args::{Cli, Commands};
