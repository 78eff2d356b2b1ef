use std::process::ExitCode;

use clap::Parser;

use book_aggregator::cli::Cli;
use book_aggregator::config::Config;
use book_aggregator::pipeline::{self, PipelineReport};
use book_aggregator::{export, logging};

fn print_summary(report: &PipelineReport) {
    match &report.years {
        Ok(years) => {
            let total: u64 = years.iter().map(|y| y.count).sum();
            match (years.first(), years.last()) {
                (Some(first), Some(last)) => println!(
                    "years:   {} books, {} distinct years ({}..{})",
                    total,
                    years.len(),
                    first.year,
                    last.year
                ),
                _ => println!("years:   no dated books"),
            }
        }
        Err(e) => println!("years:   FAILED ({e})"),
    }
    match &report.genres {
        Ok(genres) => {
            let top: Vec<String> = genres
                .iter()
                .take(5)
                .map(|g| {
                    let label = if g.label.is_empty() { "-" } else { g.label.as_str() };
                    format!("{} ({})", label, g.count)
                })
                .collect();
            println!("genres:  {} distinct; top: {}", genres.len(), top.join(", "));
        }
        Err(e) => println!("genres:  FAILED ({e})"),
    }
    match &report.regions {
        Ok(r) => {
            println!(
                "regions: {} regions, {} books on map, {} language codes",
                r.regions.len(),
                r.mapped_total(),
                r.language_counts.len()
            );
            for (i, lang) in r.top_languages.iter().enumerate() {
                println!("  {:>2}. {} ({}) {}", i + 1, lang.name, lang.code, lang.count);
            }
        }
        Err(e) => println!("regions: FAILED ({e})"),
    }
}

async fn run(args: Cli) -> anyhow::Result<bool> {
    let mut cfg = Config::load(args.config.as_deref())?;
    args.apply(&mut cfg);

    if let Some(n) = cfg.rayon_threads {
        let _ = rayon::ThreadPoolBuilder::new().num_threads(n).build_global();
    }

    let report = pipeline::run_all(&cfg).await;

    if let Ok(regions) = &report.regions {
        for (code, count) in regions.unmapped_languages() {
            log::debug!("catalog: no region for language '{}' ({} books)", code, count);
        }
    }

    match cfg.out_dir.as_deref() {
        Some(dir) => {
            let files = export::export_all(&report, dir)?;
            log::info!("wrote {} files to {}", files.len(), dir.display());
        }
        None => print_summary(&report),
    }

    Ok(report.is_complete())
}

#[tokio::main(flavor = "multi_thread")]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    let args = Cli::parse();
    logging::init(args.verbose);

    match run(args).await {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            log::error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}
