//! Main entry point for the memzip CLI application.
//!
//! This binary loads a ZIP archive into memory and lists or extracts it.

use anyhow::{Result, anyhow};
use clap::Parser;
use std::path::{Path, PathBuf};

use memzip::{Archive, Cli, Entry, ZipExtractor, io::read_archive};

/// Application entry point.
///
/// Parses command-line arguments, loads the archive and dispatches to
/// listing or extraction.
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let encoding = cli
        .encoding()
        .ok_or_else(|| anyhow!("unknown charset: {}", cli.charset))?;
    let bytes = read_archive(Path::new(&cli.file)).await?;
    let archive = Archive::new(&bytes).with_encoding(encoding);

    process_zip(archive, &cli).await
}

/// Process a ZIP archive based on CLI options.
///
/// This function handles the comment, listing and extraction modes:
/// - Comment mode (`-z`): Print the archive comment
/// - List mode (`-l` or `-v`): Display archive contents
/// - Extract mode: Extract files matching the specified filters
async fn process_zip(archive: Archive<'_>, cli: &Cli) -> Result<()> {
    let extractor = ZipExtractor::new(archive);

    if cli.comment {
        println!("{}", archive.comment()?);
        return Ok(());
    }

    // List mode: display archive contents and exit
    if cli.list || cli.verbose {
        return list_files(&extractor, cli.verbose);
    }

    // Extract mode: get all entries from the archive
    let entries = extractor.list_files()?;

    // Apply filters to determine which entries to extract:
    // 1. Directories are kept unless junking paths, so empty ones survive
    // 2. If specific files are requested, only include matching entries
    // 3. Exclude entries matching the exclusion patterns
    let to_extract: Vec<_> = entries
        .iter()
        .filter(|e| {
            if e.is_directory() {
                return !cli.junk_paths && !cli.pipe && cli.files.is_empty();
            }

            // If specific files are requested via positional arguments,
            // only include entries that match
            if !cli.files.is_empty() {
                let matches = cli.files.iter().any(|f| {
                    if has_glob_chars(f) {
                        glob_match(f, e.name())
                    } else {
                        // No wildcards: exact match on filename or full path
                        e.name() == f.as_str() || base_name(e.name()) == f.as_str()
                    }
                });
                if !matches {
                    return false;
                }
            }

            // Exclude files matching the -x patterns
            !cli
                .exclude
                .iter()
                .any(|x| e.name().contains(x.as_str()) || glob_match(x, e.name()))
        })
        .collect();

    let multiple_files = cli.pipe && to_extract.iter().filter(|e| e.is_file()).count() > 1;
    for entry in to_extract {
        extract_entry(&extractor, entry, cli, multiple_files).await?;
    }

    Ok(())
}

/// List entries in the ZIP archive.
///
/// Supports two output formats:
/// - Simple format (`-l`): Just entry names, one per line
/// - Verbose format (`-v`): Table with sizes, compression ratio, timestamp and mode
fn list_files(extractor: &ZipExtractor<'_>, verbose: bool) -> Result<()> {
    let entries = extractor.list_files()?;

    if verbose {
        println!(
            "{:>10}  {:>10}  {:>5}  {:>10}  {:>5}  {:>4}  Name",
            "Length", "Size", "Cmpr", "Date", "Time", "Mode"
        );
        println!("{}", "-".repeat(76));
    }

    // Track totals for summary line
    let mut total_uncompressed = 0u64;
    let mut total_compressed = 0u64;
    let mut file_count = 0usize;

    for entry in &entries {
        if !verbose {
            println!("{}", entry.name());
            continue;
        }

        let modified = entry.last_modified();
        let mode = entry
            .mode()
            .map(|m| format!("{m:04o}"))
            .unwrap_or_else(|| "----".to_string());

        println!(
            "{:>10}  {:>10}  {}  {:04}-{:02}-{:02}  {:02}:{:02}  {}  {}",
            entry.uncompressed_size(),
            entry.compressed_size(),
            ratio(entry.compressed_size(), entry.uncompressed_size()),
            modified.year,
            modified.month,
            modified.day,
            modified.hour,
            modified.minute,
            mode,
            entry.name()
        );

        // Accumulate totals (excluding directories)
        if entry.is_file() {
            total_uncompressed += entry.uncompressed_size();
            total_compressed += entry.compressed_size();
            file_count += 1;
        }
    }

    if verbose {
        println!("{}", "-".repeat(76));
        println!(
            "{:>10}  {:>10}  {}  {:>27}  {} files",
            total_uncompressed,
            total_compressed,
            ratio(total_compressed, total_uncompressed),
            "",
            file_count
        );
    }

    Ok(())
}

/// Extract a single entry from the archive.
///
/// Handles various extraction options:
/// - Pipe mode (`-p`): Write to stdout instead of file
/// - Custom output directory (`-d`): Extract to specified directory
/// - Junk paths (`-j`): Ignore directory structure in archive
/// - Overwrite control (`-n`, `-o`): Handle existing files
async fn extract_entry(
    extractor: &ZipExtractor<'_>,
    entry: &Entry<'_>,
    cli: &Cli,
    show_filename: bool,
) -> Result<()> {
    if cli.pipe {
        if show_filename {
            use tokio::io::AsyncWriteExt;
            let mut stdout = tokio::io::stdout();
            stdout
                .write_all(format!("--- {} ---\n", entry.name()).as_bytes())
                .await?;
        }
        return extractor.extract_to_stdout(entry).await;
    }

    if !is_safe_path(entry.name()) {
        if !cli.is_very_quiet() {
            eprintln!("Skipping: {} (path escapes the extraction directory)", entry.name());
        }
        return Ok(());
    }

    let file_name = if cli.junk_paths {
        base_name(entry.name()).to_string()
    } else {
        entry.name().to_string()
    };
    let output_path = match cli.extract_dir {
        Some(ref dir) => PathBuf::from(dir).join(&file_name),
        None => PathBuf::from(&file_name),
    };

    if entry.is_file() && output_path.exists() {
        if cli.never_overwrite {
            if !cli.is_very_quiet() {
                eprintln!("Skipping: {} (file exists)", entry.name());
            }
            return Ok(());
        }

        if !cli.overwrite {
            if !cli.is_very_quiet() {
                eprintln!("Skipping: {} (use -o to overwrite)", entry.name());
            }
            return Ok(());
        }
    }

    if !cli.is_quiet() {
        let action = if entry.is_directory() { "creating" } else { "extracting" };
        println!("{action:>12}: {}", entry.name());
    }

    extractor.extract_to_file(entry, &output_path).await
}

/// Final path component of an archive name, ignoring a trailing '/'.
fn base_name(name: &str) -> &str {
    let trimmed = name.trim_end_matches('/');
    trimmed.rsplit('/').next().unwrap_or(trimmed)
}

/// Reject absolute names, drive prefixes and names with `..` components.
fn is_safe_path(name: &str) -> bool {
    !name.starts_with('/')
        && !name.starts_with('\\')
        && !name.split(['/', '\\']).any(|part| part == ".." || part.contains(':'))
}

/// Space saved by compression, as shown in the verbose listing.
fn ratio(compressed: u64, uncompressed: u64) -> String {
    if uncompressed > 0 && compressed <= uncompressed {
        format!("{:>4}%", 100 - (compressed * 100 / uncompressed))
    } else {
        "  0%".to_string()
    }
}

/// Check if a pattern contains glob wildcard characters.
fn has_glob_chars(pattern: &str) -> bool {
    pattern.contains('*') || pattern.contains('?')
}

/// Simple glob pattern matching supporting `*` and `?` wildcards.
///
/// - `*` matches zero or more characters
/// - `?` matches exactly one character
fn glob_match(pattern: &str, text: &str) -> bool {
    let pattern_chars: Vec<char> = pattern.chars().collect();
    let text_chars: Vec<char> = text.chars().collect();

    fn do_match(pattern: &[char], text: &[char]) -> bool {
        match (pattern.first(), text.first()) {
            (None, None) => true,
            // Star matches zero characters, or one and stays for more
            (Some('*'), _) => {
                do_match(&pattern[1..], text) || (!text.is_empty() && do_match(pattern, &text[1..]))
            }
            (Some('?'), Some(_)) => do_match(&pattern[1..], &text[1..]),
            (Some(p), Some(t)) if *p == *t => do_match(&pattern[1..], &text[1..]),
            _ => false,
        }
    }

    do_match(&pattern_chars, &text_chars)
}
