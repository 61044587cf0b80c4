//! CLI module
//!
//! Command-line interface over the client.
//!
//! # Commands
//!
//! - `get` / `find-all` / `history` - Read records
//! - `save` / `replace` / `delete` - Write records
//! - `raw` - Arbitrary request
//! - `me` / `login` - Session
//! - `download` - Stream a file to disk

mod commands;
mod runner;

pub use commands::{Cli, Commands, OutputFormat};
pub use runner::Runner;
