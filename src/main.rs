use crate::analysis::demon::{Demon, DemonConfig};
use crate::export::communities::{read_communities, write_communities};
use crate::export::translate::{TranslateConfig, read_dictionary, translate};
use crate::ingest::edge_list::load_edge_list;
use crate::ingest::synthetic::{SyntheticConfig, generate, write_edge_list};
use anyhow::Context;
use clap::{Parser, Subcommand};
use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;
use std::time::Instant;
use tracing::info;
use tracing_subscriber::EnvFilter;

pub mod analysis;
pub mod core;
pub mod export;
pub mod ingest;

#[derive(Parser)]
#[command(name = "demon")]
#[command(about = "Democratic estimate of the modular organization of a network", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract overlapping communities from an edge list
    Run {
        /// Edge list, one `u v` pair per line (comma, tab or space separated)
        network_file: PathBuf,
        /// Merging threshold
        epsilon: f64,
        /// Minimum community size; smaller or equal groups are dropped
        #[arg(short = 'c', long, default_value_t = 3)]
        min_com_size: usize,
        /// Output file for the community list
        #[arg(short, long, default_value = "demon_coms.txt")]
        out_file: PathBuf,
        /// Label propagation passes per ego network
        #[arg(long, default_value_t = 10)]
        max_rounds: usize,
        /// Seed for reproducible runs
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Summarize community members against a metadata dictionary
    Translate {
        communities: PathBuf,
        /// Pipe-delimited `id|field|...` file
        dictionary: PathBuf,
        output_dir: PathBuf,
        #[arg(long, default_value_t = 10)]
        min_tag_count: usize,
        #[arg(long, default_value_t = 100)]
        max_tags: usize,
    },
    /// Write a random edge list
    Generate {
        out_file: PathBuf,
        #[arg(long, default_value_t = 1_000)]
        nodes: u32,
        #[arg(long, default_value_t = 5_000)]
        edges: u64,
        #[arg(long, default_value_t = 42)]
        seed: u64,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            network_file,
            epsilon,
            min_com_size,
            out_file,
            max_rounds,
            seed,
        } => {
            let started = Instant::now();
            let (graph, registry, _) = load_edge_list(&network_file)?;
            info!(elapsed = ?started.elapsed(), "graph loading done");

            let cfg = DemonConfig {
                epsilon,
                min_community_size: min_com_size,
                max_rounds,
                seed,
            };
            let started = Instant::now();
            let demon = Demon::new(&graph, cfg)?;
            let (communities, stats) = demon.execute();
            info!(elapsed = ?started.elapsed(), ?stats, "community extraction done");

            let file = File::create(&out_file)
                .with_context(|| format!("cannot create {}", out_file.display()))?;
            let written = write_communities(BufWriter::new(file), &communities, &registry)?;
            info!(communities = written, output = %out_file.display(), "communities written");
        }
        Commands::Translate {
            communities,
            dictionary,
            output_dir,
            min_tag_count,
            max_tags,
        } => {
            let started = Instant::now();
            let file = File::open(&communities)
                .with_context(|| format!("cannot open {}", communities.display()))?;
            let communities = read_communities(file)
                .with_context(|| format!("cannot read {}", communities.display()))?;
            let file = File::open(&dictionary)
                .with_context(|| format!("cannot open {}", dictionary.display()))?;
            let dictionary = read_dictionary(file)?;

            let cfg = TranslateConfig {
                min_tag_count,
                max_tags,
            };
            translate(&communities, &dictionary, &output_dir, &cfg)?;
            info!(elapsed = ?started.elapsed(), "translation done");
        }
        Commands::Generate {
            out_file,
            nodes,
            edges,
            seed,
        } => {
            let cfg = SyntheticConfig {
                node_count: nodes,
                edge_count: edges,
                seed,
            };
            let file = File::create(&out_file)
                .with_context(|| format!("cannot create {}", out_file.display()))?;
            let written = write_edge_list(BufWriter::new(file), generate(&cfg))?;
            info!(edges = written, output = %out_file.display(), "edge list generated");
        }
    }

    Ok(())
}
