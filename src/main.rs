//! fixml - Reformatter and duplicate-line eliminator for XML and MSBuild project files

#![warn(clippy::all)]
#![warn(clippy::pedantic)]

use std::fs::File;
use std::io::{self, BufReader, Cursor, IsTerminal, Read, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use fixml::process::{process_document, ProcessReport};
use fixml::warnings::{APPLIED_FIXES, FIX_HINT, MISSING_DECLARATION_WARNING};
use fixml::{parse_args, CliArgs, Config, Result};
use glob::Pattern;
use rayon::prelude::*;
use walkdir::WalkDir;

/// XML file extensions to process
const XML_EXTENSIONS: &[&str] = &[
    "xml", "csproj", "vbproj", "fsproj", "vcxproj", "proj", "props", "targets", "config",
    "nuspec", "resx", "settings", "xaml",
];

fn main() -> Result<()> {
    // Parse CLI arguments
    let args = parse_args();

    // Check if we should read from stdin
    let use_stdin =
        args.inputs.is_empty() || (args.inputs.len() == 1 && args.inputs[0].as_os_str() == "-");

    // If no inputs and running interactively, print usage; otherwise read from stdin
    if args.inputs.is_empty() && io::stdin().is_terminal() {
        print_usage();
        return Ok(());
    }

    if use_stdin {
        // Process stdin - use current directory for config discovery
        let config = build_config(&args, None)?;
        return process_stdin(&config, &args);
    }

    // Build base configuration for parallel processing
    // For explicit config files, we use one config for all files
    // For auto-discovery, each file may have its own config
    let use_per_file_config = args.config.is_none();
    let base_config = if use_per_file_config {
        None
    } else {
        Some(build_config(&args, None)?)
    };

    // Configure thread pool if --jobs specified
    if let Some(jobs) = args.jobs {
        if jobs > 0 {
            if let Err(e) = rayon::ThreadPoolBuilder::new()
                .num_threads(jobs)
                .build_global()
            {
                eprintln!("Warning: failed to configure thread pool: {e}");
            }
        }
    }

    // Exclude patterns and extra extensions for file collection come from
    // the CLI plus whatever config applies at the starting point
    let collection_config = match base_config.as_ref() {
        Some(config) => config.clone(),
        None => build_config(&args, None)?,
    };

    // Collect all files to process
    let files = collect_files(&args, &collection_config);

    if files.is_empty() {
        if !args.silent {
            eprintln!("No XML files found to process.");
        }
        return Ok(());
    }

    // Process files
    let use_sequential = args.stdout || args.jobs == Some(1);
    let errors = if use_sequential {
        // Sequential processing for stdout or --jobs 1
        process_files_sequential(&files, base_config.as_ref(), &args)
    } else {
        // Parallel processing for file output
        process_files_parallel(&files, base_config.as_ref(), &args)
    };

    // Per-file failures never abort the batch but must surface in the exit code
    if errors > 0 {
        let _ = io::stdout().flush();
        std::process::exit(1);
    }

    Ok(())
}

/// Build configuration from CLI args and optional config file
///
/// If `for_path` is provided and no explicit config file is specified,
/// uses auto-discovery to find config files in parent directories.
fn build_config(args: &CliArgs, for_path: Option<&Path>) -> Result<Config> {
    let mut config = if let Some(config_path) = &args.config {
        // Explicit config file specified
        if args.debug {
            eprintln!(
                "[DEBUG] Using explicit config file: {}",
                config_path.display()
            );
        }
        Config::from_toml_file(config_path)?
    } else if let Some(path) = for_path {
        // Auto-discover config files from parent directories
        if args.debug {
            let discovered = Config::discover_config_files(path);
            if discovered.is_empty() {
                eprintln!("[DEBUG] No config files discovered for: {}", path.display());
            } else {
                eprintln!("[DEBUG] Discovered config files for {}:", path.display());
                for f in &discovered {
                    eprintln!("[DEBUG]   - {}", f.display());
                }
            }
        }
        Config::from_discovered_files(path)
    } else {
        // No path provided, use current directory for discovery
        if args.debug {
            let cwd = std::env::current_dir().unwrap_or_default();
            let discovered = Config::discover_config_files(&cwd);
            if discovered.is_empty() {
                eprintln!("[DEBUG] No config files discovered in current directory");
            } else {
                eprintln!("[DEBUG] Discovered config files:");
                for f in &discovered {
                    eprintln!("[DEBUG]   - {}", f.display());
                }
            }
        }
        Config::from_discovered_files(&std::env::current_dir().unwrap_or_default())
    };

    // Override with CLI arguments
    if args.organize {
        config.organize = true;
    }
    if args.fix_warnings {
        config.fix_warnings = true;
    }
    for ext in &args.extensions {
        if !config.extensions.contains(ext) {
            config.extensions.push(ext.clone());
        }
    }
    for pattern in &args.exclude {
        if !config.exclude.contains(pattern) {
            config.exclude.push(pattern.clone());
        }
    }

    // Print final config in debug mode
    if args.debug {
        print_config_debug(&config);
    }

    // Validate configuration
    if let Some(error) = config.validate() {
        anyhow::bail!("Invalid configuration: {error}");
    }

    Ok(config)
}

/// Print configuration values in debug mode
fn print_config_debug(config: &Config) {
    eprintln!("[DEBUG] Configuration:");
    eprintln!("[DEBUG]   organize: {}", config.organize);
    eprintln!("[DEBUG]   fix_warnings: {}", config.fix_warnings);
    eprintln!("[DEBUG]   max_file_size_mb: {}", config.max_file_size_mb);
    if !config.extensions.is_empty() {
        eprintln!("[DEBUG]   extensions: {:?}", config.extensions);
    }
    if !config.exclude.is_empty() {
        eprintln!("[DEBUG]   exclude: {:?}", config.exclude);
    }
}

/// Collect all files to process, handling directories and recursive flag
fn collect_files(args: &CliArgs, config: &Config) -> Vec<PathBuf> {
    // Compile exclude patterns
    let exclude_patterns: Vec<Pattern> = config
        .exclude
        .iter()
        .filter_map(|p| Pattern::new(p).ok())
        .collect();

    // Get custom XML extensions
    let custom_extensions = &config.extensions;

    let mut files = Vec::new();

    for input in &args.inputs {
        if input.is_file() {
            if !is_excluded(input, &exclude_patterns) {
                files.push(input.clone());
            }
        } else if input.is_dir() {
            if args.recursive {
                // Recursive directory traversal
                // Note: WalkDir detects symlink loops when follow_links(true) and
                // returns errors for them. We skip errors via filter_map(ok).
                // max_depth prevents runaway traversal in pathological directory structures.
                for entry in WalkDir::new(input)
                    .follow_links(true)
                    .max_depth(256)
                    .into_iter()
                    .filter_map(std::result::Result::ok)
                {
                    let path = entry.path();
                    if path.is_file()
                        && is_xml_file(path, custom_extensions)
                        && !is_excluded(path, &exclude_patterns)
                    {
                        files.push(path.to_path_buf());
                    }
                }
            } else {
                // Non-recursive: only direct children
                if let Ok(entries) = std::fs::read_dir(input) {
                    for entry in entries.filter_map(std::result::Result::ok) {
                        let path = entry.path();
                        if path.is_file()
                            && is_xml_file(&path, custom_extensions)
                            && !is_excluded(&path, &exclude_patterns)
                        {
                            files.push(path);
                        }
                    }
                }
            }
        }
    }

    files
}

/// Check if a path matches any exclusion pattern
fn is_excluded(path: &Path, patterns: &[Pattern]) -> bool {
    if patterns.is_empty() {
        return false;
    }

    let path_str = path.to_string_lossy();

    for pattern in patterns {
        // Match against full path
        if pattern.matches(&path_str) {
            return true;
        }

        // Match against file name only
        if let Some(file_name) = path.file_name() {
            if pattern.matches(&file_name.to_string_lossy()) {
                return true;
            }
        }

        // Match against each path component (for directory patterns)
        for component in path.components() {
            if let std::path::Component::Normal(c) = component {
                if pattern.matches(&c.to_string_lossy()) {
                    return true;
                }
            }
        }
    }

    false
}

/// Check if a file has an XML extension
/// Checks against both default extensions and any custom extensions provided
fn is_xml_file(path: &Path, custom_extensions: &[String]) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            // Check default extensions
            if XML_EXTENSIONS
                .iter()
                .any(|known| ext.eq_ignore_ascii_case(known))
            {
                return true;
            }
            // Check custom extensions (with or without leading dot)
            for custom in custom_extensions {
                let custom_ext = custom.strip_prefix('.').unwrap_or(custom);
                if ext.eq_ignore_ascii_case(custom_ext) {
                    return true;
                }
            }
            false
        })
}

/// Process files sequentially (for stdout output)
///
/// Returns the number of files that failed.
fn process_files_sequential(
    files: &[PathBuf],
    base_config: Option<&Config>,
    args: &CliArgs,
) -> usize {
    let mut errors = 0;

    for path in files {
        // Use base config if provided, otherwise discover per-file config
        let file_result = if let Some(config) = base_config {
            process_single_file(path, config, args)
        } else {
            match build_config(args, Some(path)) {
                Ok(config) => process_single_file(path, &config, args),
                Err(e) => Err(e),
            }
        };

        if let Err(e) = file_result {
            errors += 1;
            eprintln!("Error processing {}: {}", path.display(), e);
        }
    }

    errors
}

/// Process files in parallel using Rayon
///
/// Returns the number of files that failed.
fn process_files_parallel(
    files: &[PathBuf],
    base_config: Option<&Config>,
    args: &CliArgs,
) -> usize {
    let success_count = AtomicUsize::new(0);
    let error_count = AtomicUsize::new(0);
    let duplicate_count = AtomicUsize::new(0);

    files.par_iter().for_each(|path| {
        // Use base config if provided, otherwise discover per-file config
        let file_result = if let Some(config) = base_config {
            process_single_file(path, config, args)
        } else {
            match build_config(args, Some(path)) {
                Ok(config) => process_single_file(path, &config, args),
                Err(e) => Err(e),
            }
        };

        match file_result {
            Ok(report) => {
                success_count.fetch_add(1, Ordering::Relaxed);
                duplicate_count.fetch_add(report.duplicates_removed, Ordering::Relaxed);
            }
            Err(e) => {
                error_count.fetch_add(1, Ordering::Relaxed);
                eprintln!("Error processing {}: {}", path.display(), e);
            }
        }
    });

    let success = success_count.load(Ordering::Relaxed);
    let errors = error_count.load(Ordering::Relaxed);
    let duplicates = duplicate_count.load(Ordering::Relaxed);

    if !args.silent {
        if errors == 0 {
            eprintln!("Processed {success} files successfully ({duplicates} duplicates removed).");
        } else {
            eprintln!(
                "Processed {success} files, {errors} errors ({duplicates} duplicates removed)."
            );
        }
    }

    errors
}

/// Process a single file
fn process_single_file(path: &Path, config: &Config, args: &CliArgs) -> Result<ProcessReport> {
    // Check file size BEFORE reading to prevent memory exhaustion
    let metadata = std::fs::metadata(path)?;
    let file_size = metadata.len();
    if file_size > config.max_file_size_bytes() {
        if !args.silent {
            eprintln!(
                "Skipping {} ({} MB exceeds limit of {} MB)",
                path.display(),
                file_size / (1024 * 1024),
                config.max_file_size_mb
            );
        }
        return Ok(ProcessReport::default());
    }

    // Read input file into memory
    let mut file_contents = Vec::new();
    File::open(path)?.read_to_end(&mut file_contents)?;

    // Process the document
    let reader = BufReader::new(Cursor::new(&file_contents));
    let mut output = Vec::new();
    let report = process_document(
        reader,
        &mut output,
        config,
        path.to_str().unwrap_or("unknown"),
    )?;

    report_warnings(&report, args.stdout, args);

    // Output results
    if args.stdout {
        io::stdout().write_all(&output)?;
    } else if args.replace {
        // Write a temporary file next to the original, then rename over it
        let temp_path = temp_path_for(path);
        std::fs::write(&temp_path, &output)?;
        set_file_permissions(&temp_path)?;
        if let Err(e) = std::fs::rename(&temp_path, path) {
            let _ = std::fs::remove_file(&temp_path);
            anyhow::bail!("could not replace original file: {e}");
        }
        report_status(path, true, report.duplicates_removed, config, args);
    } else {
        // Write a companion file next to the original
        let companion = companion_path(path);
        std::fs::write(&companion, &output)?;
        set_file_permissions(&companion)?;
        report_status(&companion, false, report.duplicates_removed, config, args);
    }

    Ok(report)
}

/// Print the warning and applied-fix blocks for a processed document
///
/// Warnings normally go to stdout; when stdout carries document text they
/// are routed to stderr instead.
fn report_warnings(report: &ProcessReport, to_stderr: bool, args: &CliArgs) {
    if args.silent {
        return;
    }
    if report.missing_declaration {
        print_block(MISSING_DECLARATION_WARNING, to_stderr);
        if !report.declaration_added {
            print_block(FIX_HINT, to_stderr);
        }
    }
    if report.declaration_added {
        print_block(APPLIED_FIXES, to_stderr);
    }
}

/// Print a message block followed by a blank separator line
fn print_block(text: &str, to_stderr: bool) {
    if to_stderr {
        eprintln!("{text}");
    } else {
        println!("{text}");
    }
}

/// Print the status line naming the written file
fn report_status(
    output_path: &Path,
    replaced: bool,
    duplicates_removed: usize,
    config: &Config,
    args: &CliArgs,
) {
    if args.silent {
        return;
    }

    let mut status = if replaced {
        format!("Original file replaced: {}", output_path.display())
    } else {
        format!("Organized project saved to: {}", output_path.display())
    };
    if duplicates_removed > 0 {
        status.push_str(&format!(" (removed {duplicates_removed} duplicates)"));
    }
    if config.organize {
        status.push_str(" (with logical organization)");
    } else {
        status.push_str(" (preserving original structure)");
    }

    println!("{status}");
}

/// Temporary file path used by --replace, next to the original
fn temp_path_for(path: &Path) -> PathBuf {
    let epoch = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |d| d.as_secs());
    let mut name = path.as_os_str().to_os_string();
    name.push(format!(".tmp.{epoch}"));
    PathBuf::from(name)
}

/// Companion file path: `project.csproj` becomes `project.organized.csproj`,
/// extensionless names get a plain `.organized` suffix
fn companion_path(path: &Path) -> PathBuf {
    let stem = path.file_stem().unwrap_or(path.as_os_str());
    let mut name = stem.to_os_string();
    name.push(".organized");
    if let Some(ext) = path.extension() {
        name.push(".");
        name.push(ext);
    }
    path.with_file_name(name)
}

#[cfg(unix)]
fn set_file_permissions(path: &Path) -> io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o644))
}

#[cfg(not(unix))]
fn set_file_permissions(_path: &Path) -> io::Result<()> {
    Ok(())
}

/// Process input from stdin, output to stdout
fn process_stdin(config: &Config, args: &CliArgs) -> Result<()> {
    // Read all input from stdin
    let mut stdin_contents = Vec::new();
    io::stdin().read_to_end(&mut stdin_contents)?;

    // Check size after reading to prevent processing extremely large input
    #[allow(clippy::cast_possible_truncation)]
    let stdin_size = stdin_contents.len() as u64;
    if stdin_size > config.max_file_size_bytes() {
        anyhow::bail!(
            "stdin input too large ({} MB exceeds limit of {} MB)",
            stdin_size / (1024 * 1024),
            config.max_file_size_mb
        );
    }

    // Process the input
    let reader = BufReader::new(Cursor::new(&stdin_contents));
    let mut output = Vec::new();
    let report = process_document(reader, &mut output, config, "stdin")?;

    // Document text owns stdout here, so warnings go to stderr
    report_warnings(&report, true, args);

    io::stdout().write_all(&output)?;

    if !args.silent {
        if report.duplicates_removed > 0 {
            eprintln!(
                "Processed stdin ({} duplicates removed).",
                report.duplicates_removed
            );
        } else {
            eprintln!("Processed stdin successfully.");
        }
    }

    Ok(())
}

fn print_usage() {
    println!(
        "fixml v{} - XML project file cleaner",
        env!("CARGO_PKG_VERSION")
    );
    println!();
    println!("Reformats XML and MSBuild project files and removes duplicate lines.");
    println!();
    println!("Usage:");
    println!("  fixml [OPTIONS] <FILE>...");
    println!("  fixml [OPTIONS] -R <DIRECTORY>");
    println!("  fixml [OPTIONS] -              # Read from stdin");
    println!("  cat project.csproj | fixml     # Pipe input");
    println!();
    println!("Examples:");
    println!("  fixml project.csproj            # Write project.organized.csproj");
    println!("  fixml -r project.csproj         # Clean the file in place");
    println!("  fixml -f broken.xml             # Also add a missing XML declaration");
    println!("  fixml -R src/                   # Recursively process a directory");
    println!("  fixml -s project.csproj         # Output to stdout");
    println!("  fixml - < project.csproj        # Read from stdin, write to stdout");
    println!();
    println!("Options:");
    println!("  -o, --organize              Apply logical organization");
    println!("  -r, --replace               Replace original file");
    println!("  -f, --fix-warnings          Fix XML warnings");
    println!("  -s, --stdout                Output to stdout");
    println!("  -R, --recursive             Process directories recursively");
    println!("  -e, --exclude <PATTERN>     Exclude files/dirs matching pattern (repeatable)");
    println!("  -x, --extension <EXT>       Additional XML extension (repeatable)");
    println!("  -c, --config <FILE>         Config file path (overrides auto-discovery)");
    println!("  -j, --jobs <NUM>            Parallel jobs (0=auto, 1=sequential)");
    println!("  -S, --silent                Silent mode");
    println!("  -D, --debug                 Enable debug output");
    println!("  -h, --help                  Print help");
    println!();
    println!("Default output is a companion file next to the input:");
    println!("  project.csproj -> project.organized.csproj");
    println!();
    println!("Supported extensions: .xml, .csproj, .vbproj, .fsproj, .vcxproj, .proj,");
    println!("  .props, .targets, .config, .nuspec, .resx, .settings, .xaml (case-insensitive)");
    println!();
    println!("Config file auto-discovery:");
    println!("  Searches for fixml.toml in parent directories starting from the");
    println!("  file being processed up to the root directory.");
    println!("  Also checks fixml.toml in the home directory.");
    println!("  More specific configs (closer to file) override less specific ones.");
}
