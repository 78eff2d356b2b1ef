use rayon::prelude::*;
use serde_json::Value;

use crate::error::LoadError;
use crate::model::{Dataset, Record};

/// Below this many lines the rayon hop costs more than it saves.
const PARALLEL_MIN_LINES: usize = 2048;

/// Non-blank lines with their 0-based physical line index.
pub fn content_lines(text: &str) -> Vec<(usize, &str)> {
    text.lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .collect()
}

fn parse_line(dataset: Dataset, idx: usize, line: &str) -> Result<Record, LoadError> {
    match serde_json::from_str::<Value>(line) {
        Ok(Value::Object(map)) => Ok(map),
        // valid JSON but not an object: a record without fields
        Ok(_) => Ok(Record::new()),
        Err(source) => Err(LoadError::Parse {
            dataset,
            line: idx,
            source,
        }),
    }
}

/// Decode line-delimited JSON into records, in input order.
/// The first malformed line (lowest index) fails the whole batch.
pub fn parse_records(dataset: Dataset, text: &str) -> Result<Vec<Record>, LoadError> {
    let lines = content_lines(text);

    if lines.len() < PARALLEL_MIN_LINES {
        return lines
            .into_iter()
            .map(|(idx, line)| parse_line(dataset, idx, line))
            .collect();
    }

    // Parse everything in parallel, then walk in order so the reported
    // error is always the earliest one.
    let parsed: Vec<Result<Record, LoadError>> = lines
        .par_iter()
        .map(|&(idx, line)| parse_line(dataset, idx, line))
        .collect();
    parsed.into_iter().collect()
}
