//! fixml - Reformatter and duplicate-line eliminator for XML and MSBuild project files
//!
//! A line-oriented XML cleaner with high-performance parallelization.

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::struct_excessive_bools)]

pub mod cli;
pub mod config;
pub mod error;
pub mod format;
pub mod parser;
pub mod process;
pub mod warnings;

// Re-export commonly used types
pub use cli::{build_cli, parse_args, parse_args_from, CliArgs};
pub use config::Config;
pub use error::Result;
pub use process::{normalize_and_deduplicate, process_document, ProcessReport};
pub use warnings::{has_xml_declaration, XML_DECLARATION};
