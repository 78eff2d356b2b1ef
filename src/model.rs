use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;
use serde_json::{Map, Value};

/// One decoded input line. Keys keep the order they had in the source object.
pub type Record = Map<String, Value>;

/// The three input datasets.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Dataset {
    Works,
    Genres,
    Catalog,
}

impl Dataset {
    pub const ALL: [Dataset; 3] = [Dataset::Works, Dataset::Genres, Dataset::Catalog];

    pub fn name(self) -> &'static str {
        match self {
            Dataset::Works => "works",
            Dataset::Genres => "genres",
            Dataset::Catalog => "catalog",
        }
    }
}

impl fmt::Display for Dataset {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct YearCount {
    pub year: i64,
    pub count: u64,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct GenreCount {
    pub label: String, // dominant genre, "" for records without genres
    pub count: u64,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct RegionCount {
    #[serde(rename = "regionCode")]
    pub region_code: String, // ISO3, e.g. "DEU"
    pub count: u64,
}

/// One row of the top languages listing.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct LanguageEntry {
    pub code: String,
    pub name: &'static str,
    pub count: u64,
}

/// Output of the language aggregation: map counts plus the side listing.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct RegionReport {
    pub regions: Vec<RegionCount>,
    pub language_counts: BTreeMap<String, u64>,
    pub top_languages: Vec<LanguageEntry>,
}

impl RegionReport {
    /// Counted language codes that have no region mapping.
    pub fn unmapped_languages(&self) -> Vec<(&str, u64)> {
        self.language_counts
            .iter()
            .filter(|(code, _)| crate::languages::lookup(code).is_none())
            .map(|(code, count)| (code.as_str(), *count))
            .collect()
    }

    /// Total records that landed on the map.
    pub fn mapped_total(&self) -> u64 {
        self.regions.iter().map(|r| r.count).sum()
    }
}
