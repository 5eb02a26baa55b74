//! CLI command implementations.
//!
//! Each submodule implements one `linkgraph` command. Commands write their
//! report to any [`std::io::Write`] so the binary prints to stdout and tests
//! capture into a buffer.
//!
//! # Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `parse` | Parse a sentence and materialize its linkages |
//! | `stats` | Show atom counts for the store |
//! | `show` | Show one atom with its outgoing and incoming sets |
//! | `config` | Show the effective configuration |
//!
//! # Example Usage
//!
//! ```bash
//! # Materialize a sentence from the demo fixture
//! LINKGRAPH_FIXTURE_PATH=fixtures/en.json linkgraph parse "the cat sat"
//!
//! # Inspect an atom
//! linkgraph show 3f1c...
//! ```

mod config;
mod parse;
mod show;
mod stats;

pub use config::ConfigCommand;
pub use parse::ParseCommand;
pub use show::ShowCommand;
pub use stats::StatsCommand;

use crate::Error;

/// Converts an output write failure.
#[allow(clippy::needless_pass_by_value)]
fn write_error(e: std::io::Error) -> Error {
    Error::OperationFailed {
        operation: "write_output".to_string(),
        cause: e.to_string(),
    }
}
