use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::Context;
use chrono::Utc;
use serde::Serialize;

use crate::model::{Dataset, GenreCount, LanguageEntry, RegionCount, YearCount};
use crate::pipeline::PipelineReport;

pub const YEARS_CSV: &str = "years.csv";
pub const GENRES_CSV: &str = "genres.csv";
pub const REGIONS_CSV: &str = "regions.csv";
pub const TOP_LANGUAGES_CSV: &str = "top_languages.csv";
pub const CHARTS_JSON: &str = "charts.json";

fn escape_csv(s: &str) -> String {
    if s.contains(',') || s.contains('"') || s.contains('\n') || s.contains('\r') {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}

pub fn write_years_csv(rows: &[YearCount], out_path: &Path) -> io::Result<()> {
    let mut f = BufWriter::new(File::create(out_path)?);
    writeln!(f, "year,count")?;
    for r in rows {
        writeln!(f, "{},{}", r.year, r.count)?;
    }
    f.flush()
}

pub fn write_genres_csv(rows: &[GenreCount], out_path: &Path) -> io::Result<()> {
    let mut f = BufWriter::new(File::create(out_path)?);
    writeln!(f, "label,count")?;
    for r in rows {
        writeln!(f, "{},{}", escape_csv(&r.label), r.count)?;
    }
    f.flush()
}

pub fn write_regions_csv(rows: &[RegionCount], out_path: &Path) -> io::Result<()> {
    let mut f = BufWriter::new(File::create(out_path)?);
    writeln!(f, "region_code,count")?;
    for r in rows {
        writeln!(f, "{},{}", r.region_code, r.count)?;
    }
    f.flush()
}

pub fn write_top_languages_csv(rows: &[LanguageEntry], out_path: &Path) -> io::Result<()> {
    let mut f = BufWriter::new(File::create(out_path)?);
    writeln!(f, "code,name,count")?;
    for r in rows {
        writeln!(f, "{},{},{}", escape_csv(&r.code), r.name, r.count)?;
    }
    f.flush()
}

#[derive(Serialize)]
struct ExportError {
    dataset: Dataset,
    line: Option<usize>,
    message: String,
}

/// Everything the renderer needs, in one document.
#[derive(Serialize)]
struct Charts<'a> {
    generated_at: String,
    years: Option<&'a [YearCount]>,
    genres: Option<&'a [GenreCount]>,
    regions: Option<&'a [RegionCount]>,
    top_languages: Option<&'a [LanguageEntry]>,
    errors: Vec<ExportError>,
}

pub fn write_json(report: &PipelineReport, out_path: &Path) -> anyhow::Result<()> {
    let regions = report.regions.as_ref().ok();
    let charts = Charts {
        generated_at: Utc::now().to_rfc3339(),
        years: report.years.as_deref().ok(),
        genres: report.genres.as_deref().ok(),
        regions: regions.map(|r| r.regions.as_slice()),
        top_languages: regions.map(|r| r.top_languages.as_slice()),
        errors: report
            .errors()
            .into_iter()
            .map(|e| ExportError {
                dataset: e.dataset(),
                line: e.line(),
                message: e.to_string(),
            })
            .collect(),
    };
    let mut f = BufWriter::new(File::create(out_path)?);
    serde_json::to_writer_pretty(&mut f, &charts)?;
    f.flush()?;
    Ok(())
}

/// Write every successful dataset's CSV plus the JSON document into `out_dir`.
/// Returns the files written.
pub fn export_all(report: &PipelineReport, out_dir: &Path) -> anyhow::Result<Vec<PathBuf>> {
    fs::create_dir_all(out_dir).with_context(|| format!("creating {}", out_dir.display()))?;
    let mut written = Vec::new();

    if let Ok(years) = &report.years {
        let p = out_dir.join(YEARS_CSV);
        write_years_csv(years, &p).with_context(|| format!("writing {}", p.display()))?;
        written.push(p);
    }
    if let Ok(genres) = &report.genres {
        let p = out_dir.join(GENRES_CSV);
        write_genres_csv(genres, &p).with_context(|| format!("writing {}", p.display()))?;
        written.push(p);
    }
    if let Ok(regions) = &report.regions {
        let p = out_dir.join(REGIONS_CSV);
        write_regions_csv(&regions.regions, &p)
            .with_context(|| format!("writing {}", p.display()))?;
        written.push(p);
        let p = out_dir.join(TOP_LANGUAGES_CSV);
        write_top_languages_csv(&regions.top_languages, &p)
            .with_context(|| format!("writing {}", p.display()))?;
        written.push(p);
    }

    let p = out_dir.join(CHARTS_JSON);
    write_json(report, &p).with_context(|| format!("writing {}", p.display()))?;
    written.push(p);

    for p in &written {
        log::debug!("export: wrote {}", p.display());
    }
    Ok(written)
}
