// src/languages.rs
// Map 3-letter language codes (e.g., "ger") to the ISO3 country used on the
// choropleth map, plus a display name for the top languages listing.

use std::collections::BTreeMap;

use serde_json::Value;

use crate::model::{LanguageEntry, Record, RegionCount, RegionReport};

pub const LANGUAGE_FIELD: &str = "language_code";
pub const DEFAULT_TOP_N: usize = 10;

pub struct Language {
    pub code: &'static str,   // lower-case, as found in the catalog
    pub region: &'static str, // ISO 3166-1 alpha-3
    pub name: &'static str,
}

const fn lang(code: &'static str, region: &'static str, name: &'static str) -> Language {
    Language { code, region, name }
}

// Bibliographic and terminologic variants both appear in the catalog
// (e.g., "ger" and "deu"); they share a region so their counts add up.
pub static LANGUAGES: &[Language] = &[
    lang("eng", "USA", "English"),
    lang("spa", "ESP", "Spanish"),
    lang("fre", "FRA", "French"),
    lang("fra", "FRA", "French"),
    lang("ger", "DEU", "German"),
    lang("deu", "DEU", "German"),
    lang("ita", "ITA", "Italian"),
    lang("por", "PRT", "Portuguese"),
    lang("jpn", "JPN", "Japanese"),
    lang("chi", "CHN", "Chinese"),
    lang("zho", "CHN", "Chinese"),
    lang("rus", "RUS", "Russian"),
    lang("ara", "SAU", "Arabic"),
    lang("dut", "NLD", "Dutch"),
    lang("nld", "NLD", "Dutch"),
    lang("swe", "SWE", "Swedish"),
    lang("nor", "NOR", "Norwegian"),
    lang("dan", "DNK", "Danish"),
    lang("fin", "FIN", "Finnish"),
    lang("pol", "POL", "Polish"),
    lang("tur", "TUR", "Turkish"),
    lang("gre", "GRC", "Greek"),
    lang("ell", "GRC", "Greek"),
    lang("heb", "ISR", "Hebrew"),
    lang("kor", "KOR", "Korean"),
    lang("hin", "IND", "Hindi"),
    lang("ind", "IDN", "Indonesian"),
    lang("per", "IRN", "Persian"),
    lang("cze", "CZE", "Czech"),
    lang("hun", "HUN", "Hungarian"),
    lang("rum", "ROU", "Romanian"),
];

/// Table entry for a lower-case code.
pub fn lookup(code: &str) -> Option<&'static Language> {
    LANGUAGES.iter().find(|l| l.code == code)
}

pub fn region_for(code: &str) -> Option<&'static str> {
    lookup(code).map(|l| l.region)
}

pub fn name_for(code: &str) -> Option<&'static str> {
    lookup(code).map(|l| l.name)
}

/// Lower-cased, non-empty language code of a record.
fn language_code(record: &Record) -> Option<String> {
    match record.get(LANGUAGE_FIELD) {
        Some(Value::String(s)) if !s.is_empty() => Some(s.to_lowercase()),
        _ => None,
    }
}

/// Records per language code, unknown codes included.
pub fn count_languages(records: &[Record]) -> BTreeMap<String, u64> {
    let mut counts = BTreeMap::new();
    for code in records.iter().filter_map(language_code) {
        *counts.entry(code).or_default() += 1;
    }
    counts
}

/// Sum language counts into their regions. Codes outside the table are skipped.
pub fn regions_from_counts(language_counts: &BTreeMap<String, u64>) -> Vec<RegionCount> {
    let mut acc: BTreeMap<&'static str, u64> = BTreeMap::new();
    for (code, count) in language_counts {
        if let Some(region) = region_for(code) {
            *acc.entry(region).or_default() += count;
        }
    }
    acc.into_iter()
        .map(|(region, count)| RegionCount {
            region_code: region.to_string(),
            count,
        })
        .collect()
}

/// The `n` most frequent known languages, descending by count (ties by code).
pub fn top_languages(language_counts: &BTreeMap<String, u64>, n: usize) -> Vec<LanguageEntry> {
    let mut known: Vec<LanguageEntry> = language_counts
        .iter()
        .filter_map(|(code, count)| {
            name_for(code).map(|name| LanguageEntry {
                code: code.clone(),
                name,
                count: *count,
            })
        })
        .collect();
    // BTreeMap order already sorts ties by code; the sort is stable
    known.sort_by_key(|e| std::cmp::Reverse(e.count));
    known.truncate(n);
    known
}

pub fn aggregate_regions(records: &[Record], top_n: usize) -> RegionReport {
    let language_counts = count_languages(records);
    let unknown = language_counts.keys().filter(|c| lookup(c).is_none()).count();
    log::trace!(
        "languages: {} distinct codes, {} without region",
        language_counts.len(),
        unknown
    );

    RegionReport {
        regions: regions_from_counts(&language_counts),
        top_languages: top_languages(&language_counts, top_n),
        language_counts,
    }
}
