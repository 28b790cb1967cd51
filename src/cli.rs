//! Command-line interface: parse definitions and the route table.

pub mod parse;
pub mod route;

pub use parse::{ApiArgs, Cli, Commands};
pub use route::RunContext;
