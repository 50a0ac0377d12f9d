//! Command-line interface for fixml.
//!
//! Defines CLI arguments using clap builder API

use std::path::PathBuf;

use clap::{Arg, ArgAction, Command};

/// CLI arguments parsed from command line
#[derive(Debug, Clone)]
pub struct CliArgs {
    /// Files or directories to process
    pub inputs: Vec<PathBuf>,

    /// Report processing as logical organization
    pub organize: bool,

    /// Replace the original file instead of writing a companion file
    pub replace: bool,

    /// Apply XML best-practice fixes (inject a missing XML declaration)
    pub fix_warnings: bool,

    /// Output to stdout instead of writing files
    pub stdout: bool,

    /// Recursive directory processing
    pub recursive: bool,

    /// Exclude patterns for files/directories (glob patterns)
    pub exclude: Vec<String>,

    /// Custom XML file extensions (in addition to defaults)
    pub extensions: Vec<String>,

    /// Config file path
    pub config: Option<PathBuf>,

    /// Number of parallel jobs (0 = auto, 1 = sequential)
    pub jobs: Option<usize>,

    /// Silent mode (no output)
    pub silent: bool,

    /// Enable debug output
    pub debug: bool,
}

/// Build the clap Command for parsing CLI arguments
#[must_use]
pub fn build_cli() -> Command {
    Command::new("fixml")
        .version(env!("CARGO_PKG_VERSION"))
        .author("Fred Jones")
        .about("Reformatter and duplicate-line eliminator for XML and MSBuild project files")
        .arg(
            Arg::new("inputs")
                .help("Files or directories to process")
                .value_name("FILE")
                .num_args(1..)
                .required(false)
                .value_parser(clap::value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("organize")
                .short('o')
                .long("organize")
                .help("Apply logical organization")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("replace")
                .short('r')
                .long("replace")
                .help("Replace the original file (a temporary file is written first)")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("fix-warnings")
                .short('f')
                .long("fix-warnings")
                .help("Fix XML warnings (add a missing XML declaration)")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("stdout")
                .short('s')
                .long("stdout")
                .help("Output to stdout instead of writing files")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("recursive")
                .short('R')
                .long("recursive")
                .help("Recursively process directories")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("exclude")
                .short('e')
                .long("exclude")
                .help("Exclude files/directories matching pattern (glob syntax, can be repeated)")
                .value_name("PATTERN")
                .action(ArgAction::Append),
        )
        .arg(
            Arg::new("extension")
                .short('x')
                .long("extension")
                .help("Additional XML file extension (can be repeated, e.g., -x wixproj -x dcproj)")
                .value_name("EXT")
                .action(ArgAction::Append),
        )
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .help("Path to configuration file (overrides auto-discovery)")
                .value_name("FILE")
                .value_parser(clap::value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("jobs")
                .short('j')
                .long("jobs")
                .help("Number of parallel jobs (0=auto, 1=sequential)")
                .value_name("NUM")
                .value_parser(clap::value_parser!(usize)),
        )
        .arg(
            Arg::new("silent")
                .short('S')
                .long("silent")
                .help("Silent mode (no output, for editor integration)")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("debug")
                .short('D')
                .long("debug")
                .help("Enable debug output (shows config discovery and final settings)")
                .action(ArgAction::SetTrue),
        )
}

/// Parse CLI arguments from command line
#[must_use]
pub fn parse_args() -> CliArgs {
    args_from_matches(&build_cli().get_matches())
}

/// Parse CLI arguments from an iterator (for testing)
#[must_use]
pub fn parse_args_from<I, T>(args: I) -> CliArgs
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    args_from_matches(&build_cli().get_matches_from(args))
}

/// Convert clap `ArgMatches` to `CliArgs`
fn args_from_matches(matches: &clap::ArgMatches) -> CliArgs {
    CliArgs {
        inputs: matches
            .get_many::<PathBuf>("inputs")
            .map(|vals| vals.cloned().collect())
            .unwrap_or_default(),
        organize: matches.get_flag("organize"),
        replace: matches.get_flag("replace"),
        fix_warnings: matches.get_flag("fix-warnings"),
        stdout: matches.get_flag("stdout"),
        recursive: matches.get_flag("recursive"),
        exclude: matches
            .get_many::<String>("exclude")
            .map(|vals| vals.cloned().collect())
            .unwrap_or_default(),
        extensions: matches
            .get_many::<String>("extension")
            .map(|vals| vals.cloned().collect())
            .unwrap_or_default(),
        config: matches.get_one::<PathBuf>("config").cloned(),
        jobs: matches.get_one::<usize>("jobs").copied(),
        silent: matches.get_flag("silent"),
        debug: matches.get_flag("debug"),
    }
}
