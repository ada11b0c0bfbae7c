//! CLI module: clap-based argument parsing and configuration mapping.

mod parser;

pub use parser::{Cli, Command, ConvertArgs, FilterArgs, FormatOpt};
