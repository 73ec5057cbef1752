//! Command-line argument parsing
//!
//! Input comes from a file argument or, when none is given (or `-`), from
//! standard input. Key events are then read from the controlling terminal.

use anyhow::{bail, Context, Result};
use clap::{ArgGroup, Parser};
use crossterm::tty::IsTty;
use std::fs::File;
use std::io::{self, BufRead, BufReader, Read};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::data::record_source::CsvOptions;

/// Page through CSV data in the terminal
#[derive(Parser, Debug, Default)]
#[command(name = "csv-pager", version, about = "Page through CSV data in the terminal")]
#[command(group(ArgGroup::new("delim").args(["tab", "space", "delimiter"])))]
pub struct CliArgs {
    /// CSV file to view; `-` or nothing reads standard input
    #[arg(value_name = "FILE")]
    pub file: Option<PathBuf>,

    /// Treat the first record as data instead of a header
    #[arg(short = 'H', long)]
    pub no_header: bool,

    /// Use tab as the delimiter
    #[arg(short = 't', long)]
    pub tab: bool,

    /// Use a single space as the delimiter
    #[arg(short = 's', long)]
    pub space: bool,

    /// Use CHAR as the delimiter (default ',')
    #[arg(short = 'd', long, value_name = "CHAR")]
    pub delimiter: Option<char>,

    /// Discard the first N lines before parsing
    #[arg(short = 'n', long, value_name = "N", default_value_t = 0)]
    pub skip: usize,

    /// Load configuration from PATH instead of the default location
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Write a commented default config file and exit
    #[arg(long)]
    pub generate_config: bool,

    /// Write the log to PATH instead of the per-user log directory
    #[arg(long, value_name = "PATH", conflicts_with = "no_log")]
    pub log_file: Option<PathBuf>,

    /// Disable logging
    #[arg(long)]
    pub no_log: bool,
}

impl CliArgs {
    /// Input file, or `None` for standard input
    pub fn input_path(&self) -> Option<&Path> {
        self.file
            .as_deref()
            .filter(|path| path.as_os_str() != "-")
    }

    pub fn delimiter(&self) -> Result<u8> {
        let delimiter = if self.tab {
            '\t'
        } else if self.space {
            ' '
        } else {
            self.delimiter.unwrap_or(',')
        };
        if !delimiter.is_ascii() {
            bail!("Delimiter must be a single ASCII character, got '{}'", delimiter);
        }
        Ok(delimiter as u8)
    }

    pub fn csv_options(&self) -> Result<CsvOptions> {
        Ok(CsvOptions {
            delimiter: self.delimiter()?,
            trim_leading_space: true,
        })
    }

    /// Open the input with the skipped lines already consumed.
    ///
    /// Returns `None` when no file was given and standard input is a
    /// terminal, i.e. there is nothing to read.
    pub fn open_input(&self) -> Result<Option<Box<dyn Read>>> {
        let mut reader: Box<dyn BufRead> = match self.input_path() {
            Some(path) => Box::new(BufReader::new(open_file(path)?)),
            None => {
                let stdin = io::stdin();
                if stdin.is_tty() {
                    return Ok(None);
                }
                Box::new(BufReader::new(stdin))
            }
        };

        let skipped = skip_lines(&mut reader, self.skip).context("Failed to skip input lines")?;
        debug!(target: "cli", "Skipped {} of {} requested lines", skipped, self.skip);
        Ok(Some(Box::new(reader)))
    }
}

fn open_file(path: &Path) -> Result<File> {
    let metadata = std::fs::metadata(path)
        .with_context(|| format!("Cannot open {}", path.display()))?;
    if metadata.is_dir() {
        bail!("{} is a directory; input should be a file", path.display());
    }
    File::open(path).with_context(|| format!("Cannot open {}", path.display()))
}

/// Consume up to `n` raw lines. Returns how many were actually skipped.
pub fn skip_lines<R: BufRead + ?Sized>(reader: &mut R, n: usize) -> io::Result<usize> {
    let mut line = Vec::new();
    for skipped in 0..n {
        line.clear();
        if reader.read_until(b'\n', &mut line)? == 0 {
            return Ok(skipped);
        }
    }
    Ok(n)
}
