use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::Deserialize;

use crate::languages::DEFAULT_TOP_N;
use crate::model::Dataset;
use crate::source::Source;

pub const DEFAULT_CONFIG_PATH: &str = "config.toml";
pub const CONFIG_ENV: &str = "BOOK_AGGREGATOR_CONFIG";

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct Config {
    pub works: String,               // yearly counts input
    pub genres: String,              // dominant genre input
    pub catalog: String,             // language input
    pub top_n: usize,                // rows in the top languages listing
    pub rayon_threads: Option<usize>,
    pub out_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            works: "./data/copy_book_works.json".to_string(),
            genres: "./data/copy_book_genres.json".to_string(),
            catalog: "./data/copy_book_catalog.json".to_string(),
            top_n: DEFAULT_TOP_N,
            rayon_threads: None,
            out_dir: None,
        }
    }
}

impl Config {
    /// Load from `path`, or `$BOOK_AGGREGATOR_CONFIG`, or `config.toml`.
    /// A missing file means defaults; a broken one is an error.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => std::env::var_os(CONFIG_ENV)
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH)),
        };
        match std::fs::read_to_string(&path) {
            Ok(s) => Self::from_toml(&s).with_context(|| format!("parsing {}", path.display())),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::debug!("config: {} not found, using defaults", path.display());
                Ok(Self::default())
            }
            Err(e) => Err(e).with_context(|| format!("reading {}", path.display())),
        }
    }

    pub fn from_toml(s: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(s)?)
    }

    pub fn source(&self, dataset: Dataset) -> Source {
        let raw = match dataset {
            Dataset::Works => &self.works,
            Dataset::Genres => &self.genres,
            Dataset::Catalog => &self.catalog,
        };
        Source::from(raw.as_str())
    }
}
