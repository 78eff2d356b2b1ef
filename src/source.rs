use std::fmt;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Instant;

use tokio::task;

use crate::error::LoadError;
use crate::model::Dataset;

/// Where a dataset's text comes from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Source {
    File(PathBuf),
    Url(String),
}

impl Source {
    /// Resource name ends in `.zst`.
    pub fn is_compressed(&self) -> bool {
        match self {
            Source::File(p) => p.extension().is_some_and(|e| e == "zst"),
            Source::Url(u) => {
                let path = u.split(['?', '#']).next().unwrap_or(u);
                path.ends_with(".zst")
            }
        }
    }
}

impl From<&str> for Source {
    fn from(s: &str) -> Self {
        let lower = s.to_ascii_lowercase();
        if lower.starts_with("http://") || lower.starts_with("https://") {
            Source::Url(s.to_string())
        } else {
            Source::File(PathBuf::from(s))
        }
    }
}

impl FromStr for Source {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Source::from(s))
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Source::File(p) => write!(f, "{}", p.display()),
            Source::Url(u) => f.write_str(u),
        }
    }
}

fn read_all(mut reader: impl Read, compressed: bool) -> std::io::Result<Vec<u8>> {
    let mut buf = Vec::new();
    if compressed {
        zstd::stream::Decoder::new(reader)?.read_to_end(&mut buf)?;
    } else {
        reader.read_to_end(&mut buf)?;
    }
    Ok(buf)
}

/// Blocking fetch of the whole resource as text.
pub fn fetch_text_blocking(source: &Source) -> anyhow::Result<String> {
    let compressed = source.is_compressed();
    let bytes = match source {
        Source::File(path) => {
            let f = File::open(path)?;
            read_all(BufReader::new(f), compressed)?
        }
        Source::Url(url) => {
            let resp = reqwest::blocking::get(url)?.error_for_status()?;
            read_all(resp, compressed)?
        }
    };
    Ok(String::from_utf8(bytes)?)
}

/// Fetch a dataset's text on a blocking worker.
pub async fn fetch_text(dataset: Dataset, source: &Source) -> Result<String, LoadError> {
    let name = source.to_string();
    let source_owned = source.clone();

    log::debug!("{}: GET {}", dataset, name);
    let t0 = Instant::now();
    let text = task::spawn_blocking(move || fetch_text_blocking(&source_owned))
        .await
        .map_err(|e| LoadError::unavailable(dataset, &name, e))?
        .map_err(|e| LoadError::unavailable(dataset, &name, format!("{e:#}")))?;
    log::debug!(
        "{}: fetched in {:.3}s ({} bytes)",
        dataset,
        t0.elapsed().as_secs_f64(),
        text.len()
    );
    Ok(text)
}
