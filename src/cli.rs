use std::path::PathBuf;

use clap::Parser;

use crate::config::Config;

/// Aggregate book datasets into plot-ready yearly, genre and language counts.
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Configuration file (default: $BOOK_AGGREGATOR_CONFIG or config.toml)
    #[arg(long)]
    pub config: Option<PathBuf>,
    /// Works dataset (path or URL, `.zst` is decompressed)
    #[arg(long)]
    pub works: Option<String>,
    /// Genres dataset (path or URL)
    #[arg(long)]
    pub genres: Option<String>,
    /// Catalog dataset with language codes (path or URL)
    #[arg(long)]
    pub catalog: Option<String>,
    /// Directory for CSV and JSON output; prints a summary when omitted
    #[arg(short, long)]
    pub out: Option<PathBuf>,
    /// Rows in the top languages listing
    #[arg(long)]
    pub top: Option<usize>,
    /// Detailed timings/logs
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Command line values override the config file.
    pub fn apply(&self, cfg: &mut Config) {
        if let Some(s) = &self.works {
            cfg.works = s.clone();
        }
        if let Some(s) = &self.genres {
            cfg.genres = s.clone();
        }
        if let Some(s) = &self.catalog {
            cfg.catalog = s.clone();
        }
        if let Some(n) = self.top {
            cfg.top_n = n;
        }
        if let Some(p) = &self.out {
            cfg.out_dir = Some(p.clone());
        }
    }
}
