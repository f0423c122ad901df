//! Ranks the pages of an HTML corpus both by sampling and by iteration.

use anyhow::{Context, Result};
use clap::Parser;
use page_rank_estimator::{
    crawl, format_ranks,
    page_rank::{iterated, sampled},
    rank_both, DEFAULT_DAMPING, DEFAULT_EPSILON, DEFAULT_SAMPLES,
};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "pagerank")]
#[command(version, about = "PageRank of a directory of HTML pages")]
struct Cli {
    /// Directory holding the `*.html` pages
    corpus: PathBuf,

    /// Probability of following a link instead of jumping anywhere
    #[arg(short, long, default_value_t = DEFAULT_DAMPING)]
    damping: f64,

    /// Number of pages visited by the random surfer
    #[arg(short = 'n', long, default_value_t = DEFAULT_SAMPLES)]
    samples: usize,

    /// Largest per-page change that still counts as converged
    #[arg(short, long, default_value_t = DEFAULT_EPSILON)]
    epsilon: f64,

    /// Seed of the random surfer; drawn from the OS when absent
    #[arg(long)]
    seed: Option<u64>,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let corpus = crawl(&cli.corpus)
        .with_context(|| format!("failed to read corpus {}", cli.corpus.display()))?;
    let sampled = sampled::Config {
        damping: cli.damping,
        samples: cli.samples,
    };
    let iterated = iterated::Config {
        damping: cli.damping,
        epsilon: cli.epsilon,
        ..Default::default()
    };
    let (by_sampling, by_iteration) = rank_both(&corpus, &sampled, &iterated, cli.seed)?;

    print!(
        "{}",
        format_ranks(
            &format!("PageRank Results from Sampling (n = {})", cli.samples),
            &by_sampling
        )
    );
    print!("{}", format_ranks("PageRank Results from Iteration", &by_iteration));
    Ok(())
}
