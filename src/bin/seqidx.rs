//! seqidx CLI
//!
//! Build, inspect and read indexed token corpora.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use seqidx::ingest::{self, IngestOptions, PreTokenized, Tokenizer};
use seqidx::{Config, CorpusReader, CorpusWriter};
use tracing_subscriber::{fmt, EnvFilter};

/// seqidx
#[derive(Parser, Debug)]
#[command(name = "seqidx")]
#[command(about = "Indexed token-sequence storage for tokenized corpora")]
#[command(version)]
struct Args {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Build a corpus from pre-tokenized text (one document per line,
    /// whitespace-separated token ids)
    Build {
        /// Input file
        #[arg(short, long)]
        input: PathBuf,

        /// Output prefix (writes <prefix>.bin and <prefix>.idx)
        #[arg(short, long)]
        output: PathBuf,

        /// Vocabulary size; selects the token width
        #[arg(short, long)]
        vocab_size: u64,

        /// Stop after more than this many bad lines
        #[arg(long, default_value = "100")]
        max_errors: usize,
    },

    /// Print header fields and statistics
    Inspect {
        /// Corpus prefix
        prefix: PathBuf,
    },

    /// Print the token ids of one document
    Get {
        /// Corpus prefix
        prefix: PathBuf,

        /// Document ordinal
        #[arg(short, long, default_value = "0")]
        index: usize,

        /// First token to print
        #[arg(long)]
        start: Option<usize>,

        /// Number of tokens to print
        #[arg(long)]
        count: Option<usize>,
    },

    /// Check the file pair for consistency
    Verify {
        /// Corpus prefix
        prefix: PathBuf,

        /// Also scan the data file and check its CRC32
        #[arg(long)]
        checksum: bool,
    },
}

fn main() {
    // Initialize tracing/logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,seqidx=debug"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    if let Err(e) = run(args.command) {
        tracing::error!("{}", e);
        std::process::exit(1);
    }
}

fn run(command: Commands) -> seqidx::Result<()> {
    match command {
        Commands::Build {
            input,
            output,
            vocab_size,
            max_errors,
        } => {
            let config = Config::for_vocab_size(vocab_size)?;
            tracing::info!("Input: {}", input.display());
            tracing::info!("Output prefix: {}", output.display());
            tracing::info!("Token width: {} (vocab size {})", config.dtype, vocab_size);

            let lines = BufReader::new(File::open(&input)?)
                .lines()
                .map(|line| line.map_err(seqidx::CorpusError::from));

            let mut writer = CorpusWriter::create(&output, &config)?;
            let report = ingest::ingest(
                &mut writer,
                lines,
                &PreTokenized,
                &IngestOptions { max_errors },
            )?;
            let stats = writer.finalize()?;

            println!("{}", stats);
            if report.skipped > 0 || report.errors > 0 {
                tracing::warn!(
                    "Skipped {} empty lines and {} bad lines",
                    report.skipped,
                    report.errors
                );
            }
        }

        Commands::Inspect { prefix } => {
            let reader = CorpusReader::open_prefix(&prefix)?;
            let header = reader.index().header();
            println!("version:         {}", header.version);
            println!("data crc32:      {:#010x}", header.data_crc32);
            println!("{}", reader.stats());
        }

        Commands::Get {
            prefix,
            index,
            start,
            count,
        } => {
            let reader = CorpusReader::open_prefix(&prefix)?;
            let tokens = match (start, count) {
                (None, None) => reader.get(index)?,
                (start, count) => {
                    let start = start.unwrap_or(0);
                    let length = reader.document_len(index)? as usize;
                    let count = count.unwrap_or(length.saturating_sub(start));
                    reader.get_slice(index, start, count)?
                }
            };
            println!("{}", PreTokenized.decode(&tokens)?);
        }

        Commands::Verify { prefix, checksum } => {
            let reader = CorpusReader::open_prefix(&prefix)?;
            if checksum {
                reader.verify_checksum()?;
            }
            println!(
                "OK: {} documents, {} tokens{}",
                reader.len(),
                reader.stats().total_tokens,
                if checksum { ", checksum verified" } else { "" }
            );
        }
    }

    Ok(())
}
