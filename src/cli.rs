//! Command-line interface.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::{AnalyzeConfig, FilterConfig, Strategy};

/// Count barcodes in sequencing reads, on either strand
#[derive(Parser, Debug)]
#[command(name = "bcdemux", version, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Log progress to stderr (equivalent to RUST_LOG=info)
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// Inputs shared by every command.
#[derive(Args, Debug, Clone)]
pub struct InputArgs {
    /// FASTA/FASTQ reads (plain or compressed)
    #[arg(short, long, value_name = "PATH")]
    pub input: PathBuf,

    /// Barcode list, one barcode per line
    #[arg(short, long, value_name = "PATH")]
    pub barcodes: PathBuf,

    /// Write output to this file instead of stdout
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Matching strategy: aho, kmp or bitpar
    #[arg(short, long, default_value_t = Strategy::Aho)]
    pub strategy: Strategy,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Count clean reads per barcode and the number of mixed reads
    ///
    /// Example:
    ///   bcdemux analyze -i reads.fq.gz -b barcodes.txt -o counts.txt
    Analyze {
        #[command(flatten)]
        inputs: InputArgs,

        /// Also report every mixed read and the barcodes found in it
        #[arg(short, long)]
        diagnostics: bool,

        /// Worker threads (0 = all cores)
        #[arg(short, long, default_value_t = 1)]
        threads: usize,
    },

    /// Write through only the reads that contain no barcode
    ///
    /// Example:
    ///   bcdemux filter -i reads.fq.gz -b barcodes.txt -o clean.fq
    Filter {
        #[command(flatten)]
        inputs: InputArgs,
    },
}

impl From<InputArgs> for AnalyzeConfig {
    fn from(args: InputArgs) -> Self {
        let mut config = AnalyzeConfig::new(args.input, args.barcodes);
        config.output = args.output;
        config.strategy = args.strategy;
        config
    }
}

impl From<InputArgs> for FilterConfig {
    fn from(args: InputArgs) -> Self {
        let mut config = FilterConfig::new(args.input, args.barcodes);
        config.output = args.output;
        config.strategy = args.strategy;
        config
    }
}

/// Executes a parsed command line.
pub fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Command::Analyze {
            inputs,
            diagnostics,
            threads,
        } => {
            let mut config = AnalyzeConfig::from(inputs);
            config.diagnostics = diagnostics;
            config.threads = threads;
            config.run()?;
        }
        Command::Filter { inputs } => {
            FilterConfig::from(inputs).run()?;
        }
    }
    Ok(())
}
