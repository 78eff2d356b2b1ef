use std::time::Instant;

use tokio::task;

use crate::config::Config;
use crate::error::LoadError;
use crate::genres::aggregate_genres;
use crate::languages::aggregate_regions;
use crate::model::{Dataset, GenreCount, Record, RegionReport, YearCount};
use crate::ndjson::parse_records;
use crate::source::{fetch_text, Source};
use crate::years::aggregate_years;

/// One result per dataset; a failure in one never touches the others.
#[derive(Debug)]
pub struct PipelineReport {
    pub years: Result<Vec<YearCount>, LoadError>,
    pub genres: Result<Vec<GenreCount>, LoadError>,
    pub regions: Result<RegionReport, LoadError>,
}

impl PipelineReport {
    pub fn errors(&self) -> Vec<&LoadError> {
        [
            self.years.as_ref().err(),
            self.genres.as_ref().err(),
            self.regions.as_ref().err(),
        ]
        .into_iter()
        .flatten()
        .collect()
    }

    pub fn is_complete(&self) -> bool {
        self.errors().is_empty()
    }
}

/// Fetch + parse one dataset. Parsing runs on a blocking worker.
pub async fn load_records(dataset: Dataset, source: &Source) -> Result<Vec<Record>, LoadError> {
    let text = fetch_text(dataset, source).await?;
    let t0 = Instant::now();
    let records = task::spawn_blocking(move || parse_records(dataset, &text))
        .await
        .unwrap_or_else(|e| std::panic::resume_unwind(e.into_panic()))?;
    log::debug!(
        "{}: parsed {} records in {:.3}s",
        dataset,
        records.len(),
        t0.elapsed().as_secs_f64()
    );
    Ok(records)
}

pub async fn run_years(source: &Source) -> Result<Vec<YearCount>, LoadError> {
    let records = load_records(Dataset::Works, source).await?;
    let years = aggregate_years(&records);
    log::debug!("works: {} distinct years", years.len());
    Ok(years)
}

pub async fn run_genres(source: &Source) -> Result<Vec<GenreCount>, LoadError> {
    let records = load_records(Dataset::Genres, source).await?;
    let genres = aggregate_genres(&records);
    log::debug!("genres: {} distinct dominant genres", genres.len());
    Ok(genres)
}

pub async fn run_regions(source: &Source, top_n: usize) -> Result<RegionReport, LoadError> {
    let records = load_records(Dataset::Catalog, source).await?;
    let report = aggregate_regions(&records, top_n);
    let unmapped = report.unmapped_languages();
    log::debug!(
        "catalog: {} regions, {} language codes ({} without region)",
        report.regions.len(),
        report.language_counts.len(),
        unmapped.len()
    );
    Ok(report)
}

/// Load and aggregate all three datasets concurrently.
pub async fn run_all(cfg: &Config) -> PipelineReport {
    let works_src = cfg.source(Dataset::Works);
    let genres_src = cfg.source(Dataset::Genres);
    let catalog_src = cfg.source(Dataset::Catalog);

    let t0 = Instant::now();
    let (years, genres, regions) = tokio::join!(
        run_years(&works_src),
        run_genres(&genres_src),
        run_regions(&catalog_src, cfg.top_n),
    );
    let report = PipelineReport {
        years,
        genres,
        regions,
    };
    for e in report.errors() {
        log::error!("{e}");
    }
    log::info!(
        "pipeline finished in {:.3}s ({} of {} datasets ok)",
        t0.elapsed().as_secs_f64(),
        Dataset::ALL.len() - report.errors().len(),
        Dataset::ALL.len()
    );
    report
}
