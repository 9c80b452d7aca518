//! Treebank to bracketed tree converter
//!
//! # Usage
//!
//! ```bash
//! # Convert a directory of AGDT files into outputs/win1/
//! treeparenth convert --model win1 AGDT_treebanks/
//!
//! # Concatenate every outparenth*.txt of the model into trees.txt
//! treeparenth merge --model win1
//!
//! # Export the lemma supergraph of trees.txt
//! treeparenth graph --model win1
//! ```

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand};
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;
use treeparenth::config::{DEFAULT_OUT_DIR, model_dir};
use treeparenth::graph::EDGELIST;
use treeparenth::merge::MERGED_TREES;
use treeparenth::{ConvertConfig, Schema, StopList, Treebank, build_from_file, merge_trees, runner};

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

#[derive(Parser)]
#[command(name = "treeparenth")]
#[command(version)]
#[command(about = "Convert dependency treebanks into parenthesized lemma trees")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Root directory of all outputs
    #[arg(long, global = true, default_value = DEFAULT_OUT_DIR)]
    out_dir: PathBuf,

    /// Log skipped sentences and per-file counts
    #[arg(long, short, global = true)]
    verbose: bool,
}

#[derive(Args)]
struct ModelArgs {
    /// Model name; outputs go to <out-dir>/<model>/
    #[arg(long, short)]
    model: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert treebank files, directories or glob patterns
    Convert {
        #[command(flatten)]
        model: ModelArgs,

        /// Input files, directories or glob patterns
        #[arg(required = true)]
        inputs: Vec<String>,

        /// Force a schema (agdt or proiel) instead of detecting it per file
        #[arg(long)]
        schema: Option<Schema>,

        /// Output file suffix (defaults to the schema label)
        #[arg(long)]
        label: Option<String>,

        /// Stopword file, one word per line
        #[arg(long)]
        stops: Option<PathBuf>,

        /// Start from an empty stop list instead of the built-in one
        #[arg(long)]
        no_default_stops: bool,

        /// Additional stopwords, comma separated
        #[arg(long, value_delimiter = ',')]
        extra_stops: Vec<String>,
    },

    /// Merge every bracketed output of a model into trees.txt
    Merge {
        #[command(flatten)]
        model: ModelArgs,
    },

    /// Build the lemma supergraph of trees.txt and write its edge list
    Graph {
        #[command(flatten)]
        model: ModelArgs,

        /// Tree file (defaults to <out-dir>/<model>/trees.txt)
        #[arg(long)]
        input: Option<PathBuf>,

        /// Edge list file (defaults to <out-dir>/<model>/supergraph.edgelist)
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Convert {
            model,
            inputs,
            schema,
            label,
            stops,
            no_default_stops,
            extra_stops,
        } => {
            let mut config = ConvertConfig::new(&cli.out_dir, &model.model);
            config.schema = schema;
            config.label = label;
            config.stops = stop_list(stops, no_default_stops, extra_stops)?;

            let treebank = Treebank::from_inputs(&inputs)
                .context("Failed to expand inputs")?
                .with_schema(schema);
            if treebank.is_empty() {
                bail!("No treebank files found in {}", inputs.join(" "));
            }

            runner::run(&config, &treebank).context("Conversion failed")?;
        }
        Commands::Merge { model } => {
            let dir = model_dir(&cli.out_dir, &model.model);
            merge_trees(&dir).with_context(|| format!("Failed to merge {}", dir.display()))?;
        }
        Commands::Graph {
            model,
            input,
            output,
        } => {
            let dir = model_dir(&cli.out_dir, &model.model);
            let input = input.unwrap_or_else(|| dir.join(MERGED_TREES));
            let output = output.unwrap_or_else(|| dir.join(EDGELIST));

            let graph = build_from_file(&input)
                .with_context(|| format!("Failed to build supergraph of {}", input.display()))?;
            let file = File::create(&output)
                .with_context(|| format!("Failed to create {}", output.display()))?;
            graph
                .write_edgelist(BufWriter::new(file))
                .with_context(|| format!("Failed to write {}", output.display()))?;
            info!(out = %output.display(), edges = graph.edge_count(), "wrote edge list");
        }
    }

    Ok(())
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn stop_list(file: Option<PathBuf>, no_default: bool, extra: Vec<String>) -> Result<StopList> {
    let mut stops = if no_default {
        StopList::default()
    } else {
        StopList::greek()
    };
    if let Some(path) = file {
        let reader = File::open(&path)
            .with_context(|| format!("Failed to open stopword file {}", path.display()))?;
        let words = StopList::from_reader(BufReader::new(reader))
            .with_context(|| format!("Failed to read stopword file {}", path.display()))?;
        stops.extend(words.iter());
    }
    stops.extend(extra);
    Ok(stops)
}
