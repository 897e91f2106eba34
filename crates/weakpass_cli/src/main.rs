use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::Level;

use weakpass_core::{
    consts::DEFAULT_FP_RATE, inspect, run, FilterParams, Rounding, RunConfig, TextEncoding,
    WordSource,
};

#[derive(Parser)]
#[command(name = "weakpass", version, about = "Flag weak passwords with a Bloom filter")]
struct Cli {
    /// Debug logging on stderr
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,

    /// Only warnings and errors on stderr
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    cmd: Cmd,
}

#[derive(ValueEnum, Clone, Copy)]
enum CliEncoding {
    Latin1,
    Utf8,
}

#[derive(ValueEnum, Clone, Copy)]
enum CliRounding {
    Truncate,
    Standard,
}

impl From<CliEncoding> for TextEncoding {
    fn from(e: CliEncoding) -> Self {
        match e {
            CliEncoding::Latin1 => TextEncoding::Latin1,
            CliEncoding::Utf8 => TextEncoding::Utf8,
        }
    }
}

impl From<CliRounding> for Rounding {
    fn from(r: CliRounding) -> Self {
        match r {
            CliRounding::Truncate => Rounding::Truncate,
            CliRounding::Standard => Rounding::Standard,
        }
    }
}

#[derive(Subcommand)]
enum Cmd {
    /// Build from the corpus, then print a verdict per candidate and a summary
    Check {
        /// JSON run config; flags below override it
        #[arg(long)]
        config: Option<PathBuf>,
        /// Known-bad passwords, one per line
        #[arg(long)]
        corpus: Option<PathBuf>,
        /// Candidate words, one per line
        #[arg(long)]
        queries: Option<PathBuf>,
        #[arg(long)]
        fp_rate: Option<f64>,
        #[arg(long, value_enum)]
        encoding: Option<CliEncoding>,
        #[arg(long, value_enum)]
        rounding: Option<CliRounding>,
        /// Skip the exact reference set and the summary block
        #[arg(long, default_value_t = false)]
        no_stats: bool,
        /// Write verdicts here instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Print filter parameters for a given capacity
    Plan {
        #[arg(long)]
        items: u64,
        #[arg(long, default_value_t = DEFAULT_FP_RATE)]
        fp_rate: f64,
        #[arg(long, value_enum, default_value_t = CliRounding::Truncate)]
        rounding: CliRounding,
    },

    /// Build from the corpus and report how full the filter is
    Inspect {
        #[arg(long)]
        corpus: PathBuf,
        #[arg(long, default_value_t = DEFAULT_FP_RATE)]
        fp_rate: f64,
        #[arg(long, value_enum, default_value_t = CliEncoding::Latin1)]
        encoding: CliEncoding,
        #[arg(long, value_enum, default_value_t = CliRounding::Truncate)]
        rounding: CliRounding,
    },
}

fn init_logging(verbose: bool, quiet: bool) {
    let level = if verbose {
        Level::DEBUG
    } else if quiet {
        Level::WARN
    } else {
        Level::INFO
    };
    // stdout carries verdicts
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

fn print_params(p: &FilterParams) {
    println!("expected_items: {}", p.expected_items);
    println!("fp_rate       : {}", p.fp_rate);
    println!("size (bits)   : {}", p.size);
    println!("hash_count    : {}", p.hash_count);
    println!("bytes         : {}", p.byte_len());
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    match cli.cmd {
        Cmd::Check {
            config,
            corpus,
            queries,
            fp_rate,
            encoding,
            rounding,
            no_stats,
            output,
        } => {
            let mut cfg = match &config {
                Some(p) => RunConfig::load(p)
                    .with_context(|| format!("loading config {}", p.display()))?,
                None => RunConfig::default(),
            };
            if corpus.is_some() {
                cfg.corpus = corpus;
            }
            if queries.is_some() {
                cfg.queries = queries;
            }
            if let Some(p) = fp_rate {
                cfg.fp_rate = p;
            }
            if let Some(e) = encoding {
                cfg.encoding = e.into();
            }
            if let Some(r) = rounding {
                cfg.rounding = r.into();
            }
            if no_stats {
                cfg.stats = false;
            }
            if output.is_some() {
                cfg.output = output;
            }

            // nothing is written before the run settings are known to be good
            cfg.validate()?;
            let summary = match &cfg.output {
                Some(path) => {
                    let dir = match path.parent() {
                        Some(d) if !d.as_os_str().is_empty() => d,
                        _ => Path::new("."),
                    };
                    let mut tmp = NamedTempFile::new_in(dir)
                        .with_context(|| format!("creating temp file in {}", dir.display()))?;
                    let s = {
                        let mut out = BufWriter::new(tmp.as_file_mut());
                        let s = run(&cfg, &mut out)?;
                        out.flush()?;
                        s
                    };
                    tmp.persist(path)
                        .with_context(|| format!("writing {}", path.display()))?;
                    s
                }
                None => {
                    let stdout = io::stdout();
                    let mut out = BufWriter::new(stdout.lock());
                    let s = run(&cfg, &mut out)?;
                    out.flush()?;
                    s
                }
            };
            if let Some(stats) = summary.stats {
                if stats.false_negatives > 0 {
                    anyhow::bail!("{} inserted words were reported absent", stats.false_negatives);
                }
            }
        }

        Cmd::Plan { items, fp_rate, rounding } => {
            let p = FilterParams::plan(items, fp_rate, rounding.into())?;
            print_params(&p);
            println!("expected fp   : {:.6}", p.expected_fp_rate());
        }

        Cmd::Inspect { corpus, fp_rate, encoding, rounding } => {
            let src = WordSource::new(corpus, encoding.into());
            let f = inspect(&src, fp_rate, rounding.into())?;
            print_params(f.params());
            println!("inserted      : {}", f.inserted());
            println!("set bits      : {}", f.set_bits());
            println!("store bytes   : {}", f.byte_len());
            println!("fill ratio    : {:.4}", f.fill_ratio());
            println!("estimated fp  : {:.6}", f.estimated_fp_rate());
        }
    }
    Ok(())
}
