use std::collections::HashMap;

use serde_json::Value;

use crate::model::{GenreCount, Record};

pub const GENRES_FIELD: &str = "genres";

fn weight(v: &Value) -> Option<f64> {
    match v {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

/// Highest-weighted category of a record; on ties the earlier key wins.
/// Records without genres get "".
pub fn dominant_genre(record: &Record) -> &str {
    let Some(Value::Object(genres)) = record.get(GENRES_FIELD) else {
        return "";
    };
    let mut best = "";
    let mut best_weight = f64::NEG_INFINITY;
    for (genre, w) in genres {
        // NaN never compares greater
        if let Some(w) = weight(w) {
            if w > best_weight {
                best = genre.as_str();
                best_weight = w;
            }
        }
    }
    best
}

/// Count dominant genres across all records. Every record contributes once.
pub fn aggregate_genres(records: &[Record]) -> Vec<GenreCount> {
    let mut counts: HashMap<&str, u64> = HashMap::new();
    for record in records {
        *counts.entry(dominant_genre(record)).or_default() += 1;
    }

    let mut out: Vec<GenreCount> = counts
        .into_iter()
        .map(|(label, count)| GenreCount {
            label: label.to_string(),
            count,
        })
        .collect();
    out.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.label.cmp(&b.label)));
    out
}

#[cfg(test)]
mod test {
    use super::*;
    use serde_json::json;

    fn rec(v: Value) -> Record {
        v.as_object().unwrap().clone()
    }

    #[test]
    fn tie_goes_to_first_key() {
        let r = rec(json!({"genres": {"a": 3, "b": 3}}));
        assert_eq!(dominant_genre(&r), "a");
        let r = rec(json!({"genres": {"b": 3, "a": 3}}));
        assert_eq!(dominant_genre(&r), "b");
    }

    #[test]
    fn picks_max() {
        let r = rec(json!({"genres": {"fiction": 10, "fantasy, paranormal": 42, "romance": 41}}));
        assert_eq!(dominant_genre(&r), "fantasy, paranormal");
    }

    #[test]
    fn negative_and_string_weights() {
        let r = rec(json!({"genres": {"x": -5, "y": -2}}));
        assert_eq!(dominant_genre(&r), "y");
        let r = rec(json!({"genres": {"x": "7", "y": 3, "z": null}}));
        assert_eq!(dominant_genre(&r), "x");
        let r = rec(json!({"genres": {"only": null}}));
        assert_eq!(dominant_genre(&r), "");
    }

    #[test]
    fn empty_genres_bucket() {
        let records = vec![
            rec(json!({"genres": {}})),
            rec(json!({})),
            rec(json!({"genres": "poetry"})),
            rec(json!({"genres": {"poetry": 1}})),
        ];
        let out = aggregate_genres(&records);
        assert_eq!(
            out,
            vec![
                GenreCount { label: "".into(), count: 3 },
                GenreCount { label: "poetry".into(), count: 1 },
            ]
        );
    }

    #[test]
    fn every_record_counted_once() {
        let records: Vec<Record> = (0..40)
            .map(|i| match i % 4 {
                0 => rec(json!({"genres": {}})),
                1 => rec(json!({"genres": {"history": 2, "biography": 1}})),
                2 => rec(json!({"genres": {"biography": 5}})),
                _ => rec(json!({"genres": {"mystery": 1, "thriller": 1}})),
            })
            .collect();
        let out = aggregate_genres(&records);
        assert_eq!(out.iter().map(|g| g.count).sum::<u64>(), 40);
        assert_eq!(out.len(), 4);
        assert_eq!(aggregate_genres(&records), out);
    }

    #[test]
    fn empty() {
        assert!(aggregate_genres(&[]).is_empty());
    }
}
